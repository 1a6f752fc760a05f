//! 内存宿主类型表

use super::{
    ConstructorInfo, FieldInfo, HostTypeProvider, MethodInfo, NestedType, PropertyInfo,
    TypeKind, TypeMembers,
};
use crate::types::{Primitive, Type};
use std::collections::HashMap;
use tracing::trace;

const OBJECT: &str = "System.Object";

/// 宿主类型定义（构建器）
///
/// 成员类型中的 `Type::TypeParam(n)` 表示所属泛型类型的第 n 个类型参数。
#[derive(Debug, Clone)]
pub struct HostTypeDef {
    full_name: String,
    kind: TypeKind,
    generic_arity: usize,
    base: Option<String>,
    fields: Vec<FieldInfo>,
    properties: Vec<PropertyInfo>,
    methods: Vec<MethodInfo>,
    constructors: Vec<ConstructorInfo>,
    nested: Vec<String>,
    enum_values: Vec<(String, i64)>,
}

impl HostTypeDef {
    fn new(full_name: &str, kind: TypeKind) -> Self {
        Self {
            full_name: full_name.to_string(),
            kind,
            generic_arity: 0,
            base: None,
            fields: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            nested: Vec::new(),
            enum_values: Vec::new(),
        }
    }

    pub fn class(full_name: &str) -> Self {
        Self::new(full_name, TypeKind::Class)
    }

    pub fn static_class(full_name: &str) -> Self {
        Self::new(full_name, TypeKind::StaticClass)
    }

    pub fn structure(full_name: &str) -> Self {
        Self::new(full_name, TypeKind::Struct)
    }

    pub fn enumeration(full_name: &str, underlying: Primitive) -> Self {
        Self::new(full_name, TypeKind::Enum { underlying })
    }

    /// 泛型类型定义，全名需带 `` `N `` 后缀
    pub fn generic(mut self, arity: usize) -> Self {
        self.generic_arity = arity;
        self
    }

    pub fn base(mut self, full_name: &str) -> Self {
        self.base = Some(full_name.to_string());
        self
    }

    pub fn field(mut self, name: &str, field_type: Type) -> Self {
        self.fields.push(FieldInfo {
            name: name.to_string(),
            field_type,
            is_static: false,
        });
        self
    }

    pub fn static_field(mut self, name: &str, field_type: Type) -> Self {
        self.fields.push(FieldInfo {
            name: name.to_string(),
            field_type,
            is_static: true,
        });
        self
    }

    fn push_property(mut self, name: &str, property_type: Type, setter: bool, is_static: bool) -> Self {
        self.properties.push(PropertyInfo {
            name: name.to_string(),
            property_type,
            is_static,
            has_getter: true,
            has_setter: setter,
            is_virtual: false,
            owner: Type::host(self.full_name.clone()),
        });
        self
    }

    pub fn property(self, name: &str, property_type: Type, setter: bool) -> Self {
        self.push_property(name, property_type, setter, false)
    }

    pub fn static_property(self, name: &str, property_type: Type, setter: bool) -> Self {
        self.push_property(name, property_type, setter, true)
    }

    fn push_method(
        mut self,
        name: &str,
        params: Vec<Type>,
        return_type: Type,
        generic_arity: usize,
        is_static: bool,
        is_virtual: bool,
    ) -> Self {
        self.methods.push(MethodInfo {
            name: name.to_string(),
            params,
            return_type,
            generic_arity,
            is_static,
            is_virtual,
            owner: Type::host(self.full_name.clone()),
        });
        self
    }

    pub fn method(self, name: &str, params: Vec<Type>, return_type: Type) -> Self {
        self.push_method(name, params, return_type, 0, false, false)
    }

    pub fn virtual_method(self, name: &str, params: Vec<Type>, return_type: Type) -> Self {
        self.push_method(name, params, return_type, 0, false, true)
    }

    pub fn static_method(self, name: &str, params: Vec<Type>, return_type: Type) -> Self {
        self.push_method(name, params, return_type, 0, true, false)
    }

    /// 静态泛型方法，类型参数以 `Type::MethodParam(n)` 表示
    pub fn generic_static_method(
        self,
        name: &str,
        arity: usize,
        params: Vec<Type>,
        return_type: Type,
    ) -> Self {
        self.push_method(name, params, return_type, arity, true, false)
    }

    pub fn constructor(mut self, params: Vec<Type>) -> Self {
        self.constructors.push(ConstructorInfo { params });
        self
    }

    /// 嵌套类型，`full_name` 形如 `Outer+Inner`
    pub fn nested(mut self, full_name: &str) -> Self {
        self.nested.push(full_name.to_string());
        self
    }

    pub fn value(mut self, name: &str, value: i64) -> Self {
        self.enum_values.push((name.to_string(), value));
        self
    }
}

/// 内存中的 [`HostTypeProvider`] 实现
#[derive(Debug, Clone, Default)]
pub struct HostRegistry {
    types: HashMap<String, HostTypeDef>,
}

impl HostRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, def: HostTypeDef) {
        self.types.insert(def.full_name.clone(), def);
    }

    pub fn with(mut self, def: HostTypeDef) -> Self {
        self.register(def);
        self
    }

    pub fn contains(&self, full_name: &str) -> bool {
        self.types.contains_key(full_name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// 类型定义名与所属类型实参
    fn definition_of(&self, ty: &Type) -> Option<(&HostTypeDef, Vec<Type>, Type)> {
        let (name, args, owner) = match ty {
            Type::Primitive(Primitive::Void) => return None,
            Type::Primitive(primitive) => (primitive.host_name().to_string(), Vec::new(), ty.clone()),
            Type::Array(_) => ("System.Array".to_string(), Vec::new(), Type::host("System.Array")),
            Type::Host { name, args } => (name.clone(), args.clone(), ty.clone()),
            Type::Generic { .. } | Type::TypeParam(_) | Type::MethodParam(_) => {
                (OBJECT.to_string(), Vec::new(), Type::OBJECT)
            }
        };
        let def = self.types.get(&name)?;
        Some((def, args, owner))
    }

    fn base_of<'a>(&'a self, def: &'a HostTypeDef) -> Option<&'a HostTypeDef> {
        let base = match &def.base {
            Some(base) => base.as_str(),
            None if def.full_name == OBJECT || def.kind == TypeKind::StaticClass => return None,
            None => OBJECT,
        };
        self.types.get(base)
    }

    fn lookup(&self, candidate: &str, suffix: &str) -> Option<String> {
        let full = format!("{candidate}{suffix}");
        if self.types.contains_key(&full) {
            return Some(full);
        }
        let (outer, inner) = candidate.rsplit_once('.')?;
        let nested = format!("{outer}+{inner}{suffix}");
        self.types.contains_key(&nested).then_some(nested)
    }

    /// 标准库子集
    pub fn standard() -> Self {
        let int = || Type::INT;
        let long = || Type::LONG;
        let double = || Type::DOUBLE;
        let boolean = || Type::BOOL;
        let chr = || Type::CHAR;
        let string = || Type::STRING;
        let object = || Type::OBJECT;
        let color = || Type::host("System.ConsoleColor");
        let folder = || Type::host("System.Environment+SpecialFolder");
        let builder = || Type::host("System.Text.StringBuilder");
        let date = || Type::host("System.DateTime");

        let mut console = HostTypeDef::static_class("System.Console")
            .static_method("WriteLine", vec![], Type::VOID)
            .static_method("ReadLine", vec![], string())
            .static_method("ResetColor", vec![], Type::VOID)
            .static_method("Clear", vec![], Type::VOID)
            .static_property("ForegroundColor", color(), true)
            .static_property("BackgroundColor", color(), true)
            .static_property("Title", string(), true);
        for ty in [
            string(),
            int(),
            Type::Primitive(Primitive::UInt),
            long(),
            Type::Primitive(Primitive::ULong),
            Type::FLOAT,
            double(),
            boolean(),
            chr(),
            object(),
        ] {
            console = console
                .static_method("WriteLine", vec![ty.clone()], Type::VOID)
                .static_method("Write", vec![ty], Type::VOID);
        }

        let console_color = [
            "Black",
            "DarkBlue",
            "DarkGreen",
            "DarkCyan",
            "DarkRed",
            "DarkMagenta",
            "DarkYellow",
            "Gray",
            "DarkGray",
            "Blue",
            "Green",
            "Cyan",
            "Red",
            "Magenta",
            "Yellow",
            "White",
        ]
        .iter()
        .enumerate()
        .fold(
            HostTypeDef::enumeration("System.ConsoleColor", Primitive::Int),
            |def, (value, name)| def.value(name, value as i64),
        );

        let special_folder = [
            ("Desktop", 0),
            ("Programs", 2),
            ("MyDocuments", 5),
            ("Personal", 5),
            ("Favorites", 6),
            ("Startup", 7),
            ("ApplicationData", 26),
            ("LocalApplicationData", 28),
            ("UserProfile", 40),
        ]
        .iter()
        .fold(
            HostTypeDef::enumeration("System.Environment+SpecialFolder", Primitive::Int),
            |def, (name, value)| def.value(name, *value),
        );

        let list_t = || Type::Host {
            name: "System.Collections.Generic.List`1".into(),
            args: vec![Type::TypeParam(0)],
        };

        let mut registry = Self::new()
            .with(
                HostTypeDef::class(OBJECT)
                    .constructor(vec![])
                    .virtual_method("ToString", vec![], string())
                    .virtual_method("GetHashCode", vec![], int())
                    .virtual_method("Equals", vec![object()], boolean()),
            )
            .with(
                HostTypeDef::class("System.String")
                    .constructor(vec![Type::array_of(chr())])
                    .constructor(vec![chr(), int()])
                    .property("Length", int(), false)
                    .method("ToCharArray", vec![], Type::array_of(chr()))
                    .method("ToUpper", vec![], string())
                    .method("ToLower", vec![], string())
                    .method("Trim", vec![], string())
                    .method("Substring", vec![int()], string())
                    .method("Substring", vec![int(), int()], string())
                    .method("Contains", vec![string()], boolean())
                    .method("StartsWith", vec![string()], boolean())
                    .method("EndsWith", vec![string()], boolean())
                    .method("IndexOf", vec![chr()], int())
                    .method("IndexOf", vec![string()], int())
                    .method("Replace", vec![string(), string()], string())
                    .method("get_Chars", vec![int()], chr())
                    .virtual_method("ToString", vec![], string())
                    .static_method("Concat", vec![string(), string()], string())
                    .static_method("Concat", vec![object(), object()], string())
                    .static_method("op_Equality", vec![string(), string()], boolean())
                    .static_method("op_Inequality", vec![string(), string()], boolean())
                    .static_method("IsNullOrEmpty", vec![string()], boolean())
                    .static_field("Empty", string()),
            )
            .with(
                HostTypeDef::structure("System.Int32")
                    .virtual_method("ToString", vec![], string())
                    .method("CompareTo", vec![int()], int())
                    .static_method("Parse", vec![string()], int())
                    .static_field("MaxValue", int())
                    .static_field("MinValue", int()),
            )
            .with(
                HostTypeDef::structure("System.Int64")
                    .virtual_method("ToString", vec![], string())
                    .method("CompareTo", vec![long()], int())
                    .static_method("Parse", vec![string()], long())
                    .static_field("MaxValue", long())
                    .static_field("MinValue", long()),
            )
            .with(
                HostTypeDef::structure("System.Double")
                    .virtual_method("ToString", vec![], string())
                    .static_method("Parse", vec![string()], double())
                    .static_method("IsNaN", vec![double()], boolean())
                    .static_field("PositiveInfinity", double())
                    .static_field("NegativeInfinity", double())
                    .static_field("NaN", double()),
            )
            .with(
                HostTypeDef::structure("System.Boolean")
                    .virtual_method("ToString", vec![], string())
                    .static_method("Parse", vec![string()], boolean()),
            )
            .with(
                HostTypeDef::structure("System.Char")
                    .virtual_method("ToString", vec![], string())
                    .static_method("IsDigit", vec![chr()], boolean())
                    .static_method("IsLetter", vec![chr()], boolean())
                    .static_method("IsWhiteSpace", vec![chr()], boolean())
                    .static_method("ToUpper", vec![chr()], chr())
                    .static_method("ToLower", vec![chr()], chr()),
            )
            .with(console)
            .with(
                HostTypeDef::static_class("System.Math")
                    .static_method("Abs", vec![int()], int())
                    .static_method("Abs", vec![long()], long())
                    .static_method("Abs", vec![double()], double())
                    .static_method("Max", vec![int(), int()], int())
                    .static_method("Max", vec![double(), double()], double())
                    .static_method("Min", vec![int(), int()], int())
                    .static_method("Min", vec![double(), double()], double())
                    .static_method("Sqrt", vec![double()], double())
                    .static_method("Pow", vec![double(), double()], double())
                    .static_method("Floor", vec![double()], double())
                    .static_method("Round", vec![double()], double())
                    .static_field("PI", double())
                    .static_field("E", double()),
            )
            .with(console_color)
            .with(
                HostTypeDef::static_class("System.Environment")
                    .nested("System.Environment+SpecialFolder")
                    .static_method("GetFolderPath", vec![folder()], string())
                    .static_method("Exit", vec![int()], Type::VOID)
                    .static_property("NewLine", string(), false)
                    .static_property("TickCount", int(), false)
                    .static_property("MachineName", string(), false),
            )
            .with(special_folder)
            .with(
                HostTypeDef::class("System.Array")
                    .property("Length", int(), false)
                    .generic_static_method(
                        "Empty",
                        1,
                        vec![],
                        Type::array_of(Type::MethodParam(0)),
                    ),
            )
            .with(
                HostTypeDef::class("System.Text.StringBuilder")
                    .constructor(vec![])
                    .constructor(vec![string()])
                    .property("Length", int(), true)
                    .method("Append", vec![string()], builder())
                    .method("Append", vec![chr()], builder())
                    .method("Append", vec![int()], builder())
                    .method("Append", vec![double()], builder())
                    .method("Append", vec![object()], builder())
                    .method("AppendLine", vec![], builder())
                    .method("AppendLine", vec![string()], builder())
                    .method("Clear", vec![], builder())
                    .virtual_method("ToString", vec![], string()),
            )
            .with(
                HostTypeDef::class("System.Collections.Generic.List`1")
                    .generic(1)
                    .constructor(vec![])
                    .constructor(vec![int()])
                    .property("Count", int(), false)
                    .method("Add", vec![Type::TypeParam(0)], Type::VOID)
                    .method("Insert", vec![int(), Type::TypeParam(0)], Type::VOID)
                    .method("Contains", vec![Type::TypeParam(0)], boolean())
                    .method("IndexOf", vec![Type::TypeParam(0)], int())
                    .method("Remove", vec![Type::TypeParam(0)], boolean())
                    .method("RemoveAt", vec![int()], Type::VOID)
                    .method("get_Item", vec![int()], Type::TypeParam(0))
                    .method("set_Item", vec![int(), Type::TypeParam(0)], Type::VOID)
                    .method("Clear", vec![], Type::VOID)
                    .method("ToArray", vec![], Type::array_of(Type::TypeParam(0)))
                    .method("AddRange", vec![list_t()], Type::VOID),
            )
            .with(
                HostTypeDef::class("System.Collections.Generic.Dictionary`2")
                    .generic(2)
                    .constructor(vec![])
                    .property("Count", int(), false)
                    .method("Add", vec![Type::TypeParam(0), Type::TypeParam(1)], Type::VOID)
                    .method("ContainsKey", vec![Type::TypeParam(0)], boolean())
                    .method("ContainsValue", vec![Type::TypeParam(1)], boolean())
                    .method("Remove", vec![Type::TypeParam(0)], boolean())
                    .method("get_Item", vec![Type::TypeParam(0)], Type::TypeParam(1))
                    .method("set_Item", vec![Type::TypeParam(0), Type::TypeParam(1)], Type::VOID)
                    .method("Clear", vec![], Type::VOID),
            )
            .with(
                HostTypeDef::structure("System.DateTime")
                    .constructor(vec![int(), int(), int()])
                    .static_property("Now", date(), false)
                    .property("Year", int(), false)
                    .property("Month", int(), false)
                    .property("Day", int(), false)
                    .property("Hour", int(), false)
                    .method("AddDays", vec![double()], date())
                    .virtual_method("ToString", vec![], string()),
            )
            .with(
                HostTypeDef::structure("System.ValueTuple`2")
                    .generic(2)
                    .constructor(vec![Type::TypeParam(0), Type::TypeParam(1)])
                    .field("Item1", Type::TypeParam(0))
                    .field("Item2", Type::TypeParam(1))
                    .virtual_method("ToString", vec![], string()),
            );

        for primitive in [
            Primitive::SByte,
            Primitive::Byte,
            Primitive::Short,
            Primitive::UShort,
            Primitive::UInt,
            Primitive::ULong,
            Primitive::Float,
        ] {
            registry.register(
                HostTypeDef::structure(primitive.host_name())
                    .virtual_method("ToString", vec![], string())
                    .static_method("Parse", vec![string()], Type::Primitive(primitive)),
            );
        }
        registry
    }
}

impl HostTypeProvider for HostRegistry {
    fn resolve_primitive(&self, name: &str) -> Option<Type> {
        Primitive::from_keyword(name).map(Type::Primitive)
    }

    fn resolve_named(&self, name: &str, arity: usize, imports: &[String]) -> Option<String> {
        let suffix = if arity > 0 {
            format!("`{arity}")
        } else {
            String::new()
        };
        let found = self.lookup(name, &suffix).or_else(|| {
            imports
                .iter()
                .find_map(|import| self.lookup(&format!("{import}.{name}"), &suffix))
        });
        trace!(target: "quokka::translator", name, arity, found = ?found, "Resolve host type");
        found
    }

    fn members_of(&self, ty: &Type) -> Option<TypeMembers> {
        let (def, args, owner) = self.definition_of(ty)?;

        let mut fields: Vec<FieldInfo> = def
            .fields
            .iter()
            .map(|f| FieldInfo {
                field_type: f.field_type.substitute(&args, &[]),
                ..f.clone()
            })
            .collect();
        let mut properties: Vec<PropertyInfo> = def
            .properties
            .iter()
            .map(|p| PropertyInfo {
                property_type: p.property_type.substitute(&args, &[]),
                owner: owner.clone(),
                ..p.clone()
            })
            .collect();
        let mut methods: Vec<MethodInfo> = def
            .methods
            .iter()
            .map(|m| MethodInfo {
                params: m.params.iter().map(|p| p.substitute(&args, &[])).collect(),
                return_type: m.return_type.substitute(&args, &[]),
                owner: owner.clone(),
                ..m.clone()
            })
            .collect();

        // 继承的实例成员（被同签名成员覆盖的除外）
        let mut current = self.base_of(def);
        while let Some(base) = current {
            let base_owner = Type::host(base.full_name.clone());
            let base_owner = Primitive::from_host_name(&base.full_name)
                .map(Type::Primitive)
                .unwrap_or(base_owner);
            for method in base.methods.iter().filter(|m| !m.is_static) {
                if !methods
                    .iter()
                    .any(|m| m.name == method.name && m.params == method.params)
                {
                    methods.push(MethodInfo {
                        owner: base_owner.clone(),
                        ..method.clone()
                    });
                }
            }
            for property in base.properties.iter().filter(|p| !p.is_static) {
                if !properties.iter().any(|p| p.name == property.name) {
                    properties.push(PropertyInfo {
                        owner: base_owner.clone(),
                        ..property.clone()
                    });
                }
            }
            for field in base.fields.iter().filter(|f| !f.is_static) {
                if !fields.iter().any(|f| f.name == field.name) {
                    fields.push(field.clone());
                }
            }
            current = self.base_of(base);
        }

        Some(TypeMembers {
            name: def.full_name.clone(),
            kind: def.kind,
            fields,
            properties,
            methods,
            constructors: def
                .constructors
                .iter()
                .map(|c| ConstructorInfo {
                    params: c.params.iter().map(|p| p.substitute(&args, &[])).collect(),
                })
                .collect(),
            nested_types: def
                .nested
                .iter()
                .map(|full_name| NestedType {
                    name: full_name
                        .rsplit('+')
                        .next()
                        .unwrap_or(full_name)
                        .to_string(),
                    full_name: full_name.clone(),
                })
                .collect(),
            enum_values: def.enum_values.clone(),
        })
    }

    fn instantiate_generic(&self, full_name: &str, args: &[Type]) -> Option<Type> {
        let def = self.types.get(full_name)?;
        (def.generic_arity == args.len()).then(|| Type::Host {
            name: full_name.to_string(),
            args: args.to_vec(),
        })
    }

    fn is_assignable(&self, from: &Type, to: &Type) -> bool {
        if from == to || *to == Type::OBJECT {
            return true;
        }
        let Some(target) = to.host_name() else {
            return false;
        };
        if matches!(from, Type::Array(_)) {
            return target == "System.Array";
        }
        let Some((def, _, _)) = self.definition_of(from) else {
            return false;
        };
        let mut current = self.base_of(def);
        while let Some(base) = current {
            if base.full_name == target && to.type_args().is_empty() {
                return true;
            }
            current = self.base_of(base);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system() -> Vec<String> {
        vec!["System".to_string()]
    }

    #[test]
    fn test_resolve_named_through_imports() {
        let host = HostRegistry::standard();
        assert_eq!(host.resolve_named("Console", 0, &[]), None);
        assert_eq!(
            host.resolve_named("Console", 0, &system()),
            Some("System.Console".to_string())
        );
        assert_eq!(
            host.resolve_named("System.Math", 0, &[]),
            Some("System.Math".to_string())
        );
        assert_eq!(
            host.resolve_named("Text.StringBuilder", 0, &system()),
            Some("System.Text.StringBuilder".to_string())
        );
    }

    #[test]
    fn test_resolve_generic_and_nested() {
        let host = HostRegistry::standard();
        let imports = vec!["System.Collections.Generic".to_string()];
        assert_eq!(
            host.resolve_named("List", 1, &imports),
            Some("System.Collections.Generic.List`1".to_string())
        );
        assert_eq!(host.resolve_named("List", 0, &imports), None);
        assert_eq!(
            host.resolve_named("Environment.SpecialFolder", 0, &system()),
            Some("System.Environment+SpecialFolder".to_string())
        );
    }

    #[test]
    fn test_members_substitute_type_params() {
        let host = HostRegistry::standard();
        let list = host
            .instantiate_generic("System.Collections.Generic.List`1", &[Type::STRING])
            .unwrap();
        let members = host.members_of(&list).unwrap();
        let add = members.methods_named("Add").next().unwrap();
        assert_eq!(add.params, vec![Type::STRING]);
        assert_eq!(add.owner, list);
        assert_eq!(members.property("Count").unwrap().property_type, Type::INT);
        assert!(host
            .instantiate_generic("System.Collections.Generic.List`1", &[])
            .is_none());
    }

    #[test]
    fn test_object_members_are_inherited() {
        let host = HostRegistry::standard();
        let members = host.members_of(&Type::host("System.Text.StringBuilder")).unwrap();
        let to_string: Vec<_> = members.methods_named("ToString").collect();
        assert_eq!(to_string.len(), 1);
        let hash = members.methods_named("GetHashCode").next().unwrap();
        assert_eq!(hash.owner, Type::OBJECT);

        let console = host.members_of(&Type::host("System.Console")).unwrap();
        assert_eq!(console.methods_named("GetHashCode").count(), 0);
    }

    #[test]
    fn test_primitive_and_array_members() {
        let host = HostRegistry::standard();
        let int_members = host.members_of(&Type::INT).unwrap();
        assert!(int_members.methods_named("Parse").next().unwrap().is_static);
        let array = host.members_of(&Type::array_of(Type::INT)).unwrap();
        assert!(array.property("Length").is_some());
        assert!(host.members_of(&Type::VOID).is_none());
    }

    #[test]
    fn test_enum_and_value_types() {
        let host = HostRegistry::standard();
        let color = Type::host("System.ConsoleColor");
        assert_eq!(host.enum_underlying(&color), Some(Primitive::Int));
        assert_eq!(host.members_of(&color).unwrap().enum_value("Red"), Some(12));
        assert!(host.is_value_type(&color));
        assert!(host.is_value_type(&Type::INT));
        assert!(!host.is_value_type(&Type::STRING));
        let tuple = host
            .instantiate_generic("System.ValueTuple`2", &[Type::INT, Type::BOOL])
            .unwrap();
        assert!(host.is_value_type(&tuple));
    }

    #[test]
    fn test_assignability() {
        let host = HostRegistry::standard();
        assert!(host.is_assignable(&Type::INT, &Type::OBJECT));
        assert!(host.is_assignable(&Type::STRING, &Type::STRING));
        assert!(host.is_assignable(&Type::array_of(Type::INT), &Type::host("System.Array")));
        assert!(!host.is_assignable(&Type::INT, &Type::LONG));
        assert!(!host.is_assignable(&Type::OBJECT, &Type::STRING));
    }
}
