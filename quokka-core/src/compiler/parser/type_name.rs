//! 源码中书写的类型名（尚未解析）

use std::fmt;

/// 类型名：`int`、`List<string>`、`int[]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeName {
    Named { name: String, args: Vec<TypeName> },
    Array(Box<TypeName>),
}

impl TypeName {
    /// 无泛型参数的命名类型
    pub fn named(name: impl Into<String>) -> Self {
        TypeName::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn void() -> Self {
        Self::named("void")
    }

    pub fn array_of(element: TypeName) -> Self {
        TypeName::Array(Box::new(element))
    }

    /// 简单名（无泛型参数、非数组）
    pub fn simple_name(&self) -> Option<&str> {
        match self {
            TypeName::Named { name, args } if args.is_empty() => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeName::Named { name, args } if args.is_empty() => write!(f, "{name}"),
            TypeName::Named { name, args } => {
                let args = args
                    .iter()
                    .map(|a| a.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{name}<{args}>")
            }
            TypeName::Array(element) => write!(f, "{element}[]"),
        }
    }
}
