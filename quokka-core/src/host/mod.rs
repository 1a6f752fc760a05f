//! 宿主类型绑定
//!
//! 翻译器通过 [`HostTypeProvider`] 查询宿主运行时的类型与成员，
//! 提供者由调用方注入。

mod registry;

pub use registry::{HostRegistry, HostTypeDef};

use crate::types::{Primitive, Type};
use serde::Serialize;

/// 宿主类型种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TypeKind {
    Class,
    /// 只含静态成员
    StaticClass,
    Struct,
    Enum { underlying: Primitive },
}

impl TypeKind {
    pub fn is_value_type(&self) -> bool {
        matches!(self, TypeKind::Struct | TypeKind::Enum { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldInfo {
    pub name: String,
    pub field_type: Type,
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyInfo {
    pub name: String,
    pub property_type: Type,
    pub is_static: bool,
    pub has_getter: bool,
    pub has_setter: bool,
    pub is_virtual: bool,
    /// 声明该属性的类型
    pub owner: Type,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodInfo {
    pub name: String,
    /// 参数类型，宿主泛型方法的类型参数以 `Type::MethodParam` 表示
    pub params: Vec<Type>,
    pub return_type: Type,
    /// 泛型方法的类型参数个数，非泛型为 0
    pub generic_arity: usize,
    pub is_static: bool,
    pub is_virtual: bool,
    /// 声明该方法的类型（继承来的方法为基类）
    pub owner: Type,
}

impl MethodInfo {
    pub fn is_generic(&self) -> bool {
        self.generic_arity > 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstructorInfo {
    pub params: Vec<Type>,
}

/// 嵌套类型
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NestedType {
    pub name: String,
    pub full_name: String,
}

/// 宿主类型的成员视图，所属泛型类型的类型参数已代入
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeMembers {
    pub name: String,
    pub kind: TypeKind,
    pub fields: Vec<FieldInfo>,
    pub properties: Vec<PropertyInfo>,
    pub methods: Vec<MethodInfo>,
    pub constructors: Vec<ConstructorInfo>,
    pub nested_types: Vec<NestedType>,
    pub enum_values: Vec<(String, i64)>,
}

impl TypeMembers {
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn property(&self, name: &str) -> Option<&PropertyInfo> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// 同名方法（所有重载）
    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MethodInfo> {
        self.methods.iter().filter(move |m| m.name == name)
    }

    pub fn nested(&self, name: &str) -> Option<&NestedType> {
        self.nested_types.iter().find(|n| n.name == name)
    }

    pub fn enum_value(&self, name: &str) -> Option<i64> {
        self.enum_values
            .iter()
            .find(|(member, _)| member == name)
            .map(|(_, value)| *value)
    }
}

/// 宿主类型提供者
pub trait HostTypeProvider {
    /// 基本类型关键字
    fn resolve_primitive(&self, name: &str) -> Option<Type>;

    /// 按名称、泛型参数个数与导入路径查找宿主类型，返回全名
    fn resolve_named(&self, name: &str, arity: usize, imports: &[String]) -> Option<String>;

    /// 类型的成员视图
    fn members_of(&self, ty: &Type) -> Option<TypeMembers>;

    /// 用实参实例化泛型类型定义
    fn instantiate_generic(&self, full_name: &str, args: &[Type]) -> Option<Type>;

    fn is_assignable(&self, from: &Type, to: &Type) -> bool;

    fn is_value_type(&self, ty: &Type) -> bool {
        match ty {
            Type::Primitive(primitive) => primitive.is_value_type(),
            Type::Host { .. } => self
                .members_of(ty)
                .is_some_and(|members| members.kind.is_value_type()),
            _ => false,
        }
    }

    /// 枚举类型的底层类型
    fn enum_underlying(&self, ty: &Type) -> Option<Primitive> {
        match ty {
            Type::Host { .. } => match self.members_of(ty)?.kind {
                TypeKind::Enum { underlying } => Some(underlying),
                _ => None,
            },
            _ => None,
        }
    }
}
