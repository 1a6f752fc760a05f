//! 已解析的类型
//!
//! 翻译器、宿主类型提供者与指令流共用同一套类型表示。

use serde::Serialize;
use std::fmt;

/// 基本类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    Void,
    Bool,
    SByte,
    Byte,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    Float,
    Double,
    Char,
    String,
    Object,
}

/// 基本类型关键字表
static PRIMITIVE_TABLE: &[(&str, Primitive)] = &[
    ("void", Primitive::Void),
    ("bool", Primitive::Bool),
    ("sbyte", Primitive::SByte),
    ("byte", Primitive::Byte),
    ("short", Primitive::Short),
    ("ushort", Primitive::UShort),
    ("int", Primitive::Int),
    ("uint", Primitive::UInt),
    ("long", Primitive::Long),
    ("ulong", Primitive::ULong),
    ("float", Primitive::Float),
    ("double", Primitive::Double),
    ("char", Primitive::Char),
    ("string", Primitive::String),
    ("object", Primitive::Object),
];

impl Primitive {
    /// 按关键字查找
    pub fn from_keyword(name: &str) -> Option<Primitive> {
        PRIMITIVE_TABLE
            .iter()
            .find(|(keyword, _)| *keyword == name)
            .map(|(_, primitive)| *primitive)
    }

    pub fn keyword(&self) -> &'static str {
        PRIMITIVE_TABLE
            .iter()
            .find(|(_, primitive)| primitive == self)
            .map(|(keyword, _)| *keyword)
            .unwrap_or("void")
    }

    /// 宿主运行时中对应的类型全名
    pub fn host_name(&self) -> &'static str {
        match self {
            Primitive::Void => "System.Void",
            Primitive::Bool => "System.Boolean",
            Primitive::SByte => "System.SByte",
            Primitive::Byte => "System.Byte",
            Primitive::Short => "System.Int16",
            Primitive::UShort => "System.UInt16",
            Primitive::Int => "System.Int32",
            Primitive::UInt => "System.UInt32",
            Primitive::Long => "System.Int64",
            Primitive::ULong => "System.UInt64",
            Primitive::Float => "System.Single",
            Primitive::Double => "System.Double",
            Primitive::Char => "System.Char",
            Primitive::String => "System.String",
            Primitive::Object => "System.Object",
        }
    }

    pub fn from_host_name(name: &str) -> Option<Primitive> {
        PRIMITIVE_TABLE
            .iter()
            .map(|(_, primitive)| *primitive)
            .find(|primitive| primitive.host_name() == name)
    }

    pub fn is_integral(&self) -> bool {
        matches!(
            self,
            Primitive::SByte
                | Primitive::Byte
                | Primitive::Short
                | Primitive::UShort
                | Primitive::Int
                | Primitive::UInt
                | Primitive::Long
                | Primitive::ULong
        )
    }

    pub fn is_floating(&self) -> bool {
        matches!(self, Primitive::Float | Primitive::Double)
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integral() || self.is_floating()
    }

    pub fn is_value_type(&self) -> bool {
        !matches!(self, Primitive::Void | Primitive::String | Primitive::Object)
    }
}

/// 已解析的类型
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Type {
    Primitive(Primitive),
    Array(Box<Type>),
    /// 宿主类型，`name` 为全名（泛型定义带 `` `N `` 后缀），`args` 为已代入的泛型实参
    Host { name: String, args: Vec<Type> },
    /// 宿主泛型类型定义中的第 n 个类型参数
    TypeParam(usize),
    /// 宿主泛型方法的第 n 个类型参数
    MethodParam(usize),
    /// 用户泛型函数的类型参数占位
    Generic { index: usize, name: String },
}

impl Type {
    pub const VOID: Type = Type::Primitive(Primitive::Void);
    pub const BOOL: Type = Type::Primitive(Primitive::Bool);
    pub const INT: Type = Type::Primitive(Primitive::Int);
    pub const LONG: Type = Type::Primitive(Primitive::Long);
    pub const FLOAT: Type = Type::Primitive(Primitive::Float);
    pub const DOUBLE: Type = Type::Primitive(Primitive::Double);
    pub const CHAR: Type = Type::Primitive(Primitive::Char);
    pub const STRING: Type = Type::Primitive(Primitive::String);
    pub const OBJECT: Type = Type::Primitive(Primitive::Object);

    pub fn host(name: impl Into<String>) -> Type {
        Type::Host {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn array_of(element: Type) -> Type {
        Type::Array(Box::new(element))
    }

    pub fn as_primitive(&self) -> Option<Primitive> {
        match self {
            Type::Primitive(primitive) => Some(*primitive),
            _ => None,
        }
    }

    pub fn is_void(&self) -> bool {
        *self == Type::VOID
    }

    pub fn is_numeric(&self) -> bool {
        self.as_primitive().is_some_and(|p| p.is_numeric())
    }

    pub fn is_integral(&self) -> bool {
        self.as_primitive().is_some_and(|p| p.is_integral())
    }

    /// 宿主运行时中的类型全名
    pub fn host_name(&self) -> Option<String> {
        match self {
            Type::Primitive(primitive) => Some(primitive.host_name().to_string()),
            Type::Array(_) => Some("System.Array".to_string()),
            Type::Host { name, .. } => Some(name.clone()),
            _ => None,
        }
    }

    /// 泛型实参（数组视为以元素类型为实参）
    pub fn type_args(&self) -> Vec<Type> {
        match self {
            Type::Host { args, .. } => args.clone(),
            Type::Array(element) => vec![(**element).clone()],
            _ => Vec::new(),
        }
    }

    /// 代入类型参数
    pub fn substitute(&self, class_args: &[Type], method_args: &[Type]) -> Type {
        match self {
            Type::TypeParam(index) => class_args.get(*index).cloned().unwrap_or_else(|| self.clone()),
            Type::MethodParam(index) => {
                method_args.get(*index).cloned().unwrap_or_else(|| self.clone())
            }
            Type::Array(element) => Type::array_of(element.substitute(class_args, method_args)),
            Type::Host { name, args } => Type::Host {
                name: name.clone(),
                args: args
                    .iter()
                    .map(|arg| arg.substitute(class_args, method_args))
                    .collect(),
            },
            _ => self.clone(),
        }
    }

    /// 用户泛型占位替换为实参
    pub fn substitute_generics(&self, args: &[Type]) -> Type {
        match self {
            Type::Generic { index, .. } => args.get(*index).cloned().unwrap_or_else(|| self.clone()),
            Type::Array(element) => Type::array_of(element.substitute_generics(args)),
            Type::Host { name, args: inner } => Type::Host {
                name: name.clone(),
                args: inner.iter().map(|arg| arg.substitute_generics(args)).collect(),
            },
            _ => self.clone(),
        }
    }
}

/// `System.Collections.Generic.List`1` -> `List`
fn short_name(full: &str) -> &str {
    let tail = full.rsplit('.').next().unwrap_or(full);
    tail.split('`').next().unwrap_or(tail)
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(primitive) => write!(f, "{}", primitive.keyword()),
            Type::Array(element) => write!(f, "{element}[]"),
            Type::Host { name, args } if args.is_empty() => write!(f, "{}", short_name(name)),
            Type::Host { name, args } => {
                let args = args
                    .iter()
                    .map(|a| a.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{}<{}>", short_name(name), args)
            }
            Type::TypeParam(index) => write!(f, "!{index}"),
            Type::MethodParam(index) => write!(f, "!!{index}"),
            Type::Generic { name, .. } => write!(f, "{name}"),
        }
    }
}

impl From<Primitive> for Type {
    fn from(primitive: Primitive) -> Self {
        Type::Primitive(primitive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_keywords() {
        assert_eq!(Primitive::from_keyword("ushort"), Some(Primitive::UShort));
        assert_eq!(Primitive::from_keyword("Int32"), None);
        assert_eq!(Primitive::Double.keyword(), "double");
        assert_eq!(Primitive::from_host_name("System.Char"), Some(Primitive::Char));
    }

    #[test]
    fn test_value_types() {
        assert!(Primitive::Bool.is_value_type());
        assert!(!Primitive::String.is_value_type());
        assert!(!Primitive::Char.is_integral() && Primitive::Char.is_value_type());
    }

    #[test]
    fn test_display() {
        let list = Type::Host {
            name: "System.Collections.Generic.List`1".into(),
            args: vec![Type::INT],
        };
        assert_eq!(list.to_string(), "List<int>");
        assert_eq!(Type::array_of(Type::STRING).to_string(), "string[]");
    }

    #[test]
    fn test_substitute() {
        let generic = Type::Host {
            name: "System.Collections.Generic.Dictionary`2".into(),
            args: vec![Type::TypeParam(1), Type::array_of(Type::MethodParam(0))],
        };
        let concrete = generic.substitute(&[Type::INT, Type::STRING], &[Type::CHAR]);
        assert_eq!(concrete.to_string(), "Dictionary<string, char[]>");

        let placeholder = Type::Generic {
            index: 0,
            name: "T".into(),
        };
        assert_eq!(placeholder.substitute_generics(&[Type::LONG]), Type::LONG);
    }
}
