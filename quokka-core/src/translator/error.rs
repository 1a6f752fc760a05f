//! 语义错误定义

use crate::bytecode::EmitError;
use crate::types::Type;
use std::fmt;

/// 语义错误类型
#[derive(Debug, Clone, PartialEq)]
pub enum TranslateErrorKind {
    UndefinedVariable(String),
    UndefinedFunction(String),
    UndefinedType(String),
    WrongArity {
        name: String,
        expected: usize,
        found: usize,
    },
    /// 二元运算两侧类型不一致
    TypeMismatch {
        op: &'static str,
        left: Type,
        right: Type,
    },
    AssignmentMismatch {
        expected: Type,
        found: Type,
    },
    ArgumentMismatch {
        function: String,
        index: usize,
        expected: Type,
        found: Type,
    },
    /// 运算符不支持该操作数类型
    InvalidOperand {
        op: &'static str,
        operand: Type,
    },
    ConditionNotBool(Type),
    MemberNotFound {
        ty: Type,
        member: String,
    },
    MethodNotFound {
        ty: Type,
        name: String,
        args: Vec<Type>,
    },
    ConstructorNotFound {
        ty: Type,
        args: Vec<Type>,
    },
    NoSetter(String),
    NoGetter(String),
    NoEnclosingLoop(&'static str),
    IsGeneric(String),
    NotGeneric(String),
    TypeArgCount {
        name: String,
        expected: usize,
        found: usize,
    },
    /// `(x) y` 中 `x` 是变量
    AmbiguousCast(String),
    VariableAlreadyExists(String),
    VoidVariable(String),
    TooManyLocals,
    NotIndexable(Type),
    IndexNotInt(Type),
    ArrayLength(usize),
    ReturnMismatch {
        expected: Type,
        found: Type,
    },
    MissingReturn(String),
    DuplicateFunction(String),
    StatementOutsideFunction,
    NestedFunction(String),
    MisplacedImport(String),
    TypeUsedAsValue(Type),
    InvalidCast {
        from: Type,
        to: Type,
    },
    InvalidAssignmentTarget(&'static str),
}

/// 语义错误
#[derive(Debug, Clone, PartialEq)]
pub struct TranslateError {
    pub kind: TranslateErrorKind,
    pub line: usize,
}

pub type TranslateResult<T> = Result<T, TranslateError>;

impl TranslateError {
    pub fn new(kind: TranslateErrorKind, line: usize) -> Self {
        Self { kind, line }
    }
}

fn join_types(types: &[Type]) -> String {
    types
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for TranslateErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslateErrorKind::UndefinedVariable(name) => {
                write!(f, "Undefined variable '{name}'")
            }
            TranslateErrorKind::UndefinedFunction(name) => {
                write!(f, "Undefined function '{name}'")
            }
            TranslateErrorKind::UndefinedType(name) => write!(f, "Undefined type '{name}'"),
            TranslateErrorKind::WrongArity {
                name,
                expected,
                found,
            } => write!(
                f,
                "Function '{name}' expects {expected} arguments, found {found}"
            ),
            TranslateErrorKind::TypeMismatch { op, left, right } => write!(
                f,
                "Type mismatch in '{op}': '{left}' and '{right}'"
            ),
            TranslateErrorKind::AssignmentMismatch { expected, found } => write!(
                f,
                "Cannot assign value of type '{found}' to '{expected}'"
            ),
            TranslateErrorKind::ArgumentMismatch {
                function,
                index,
                expected,
                found,
            } => write!(
                f,
                "Argument {} of '{function}' expects '{expected}', found '{found}'",
                index + 1
            ),
            TranslateErrorKind::InvalidOperand { op, operand } => {
                write!(f, "Operator '{op}' cannot be applied to '{operand}'")
            }
            TranslateErrorKind::ConditionNotBool(ty) => {
                write!(f, "Condition must be of type 'bool', found '{ty}'")
            }
            TranslateErrorKind::MemberNotFound { ty, member } => {
                write!(f, "Member '{member}' not found on type '{ty}'")
            }
            TranslateErrorKind::MethodNotFound { ty, name, args } => write!(
                f,
                "No method '{name}({})' found on '{ty}'",
                join_types(args)
            ),
            TranslateErrorKind::ConstructorNotFound { ty, args } => write!(
                f,
                "No constructor found for '{ty}' with arguments ({})",
                join_types(args)
            ),
            TranslateErrorKind::NoSetter(name) => write!(f, "Property '{name}' has no setter"),
            TranslateErrorKind::NoGetter(name) => write!(f, "Property '{name}' has no getter"),
            TranslateErrorKind::NoEnclosingLoop(keyword) => {
                write!(f, "'{keyword}' used outside of a loop: no enclosing loop")
            }
            TranslateErrorKind::IsGeneric(name) => write!(
                f,
                "Function '{name}' is generic and requires type arguments"
            ),
            TranslateErrorKind::NotGeneric(name) => write!(
                f,
                "Function '{name}' is not generic but type arguments were supplied"
            ),
            TranslateErrorKind::TypeArgCount {
                name,
                expected,
                found,
            } => write!(
                f,
                "Function '{name}' expects {expected} type arguments, found {found}"
            ),
            TranslateErrorKind::AmbiguousCast(name) => write!(
                f,
                "Ambiguous cast or grouping: '{name}' is a variable"
            ),
            TranslateErrorKind::VariableAlreadyExists(name) => {
                write!(f, "Variable '{name}' already exists")
            }
            TranslateErrorKind::VoidVariable(name) => {
                write!(f, "Variable '{name}' cannot be of type 'void'")
            }
            TranslateErrorKind::TooManyLocals => write!(f, "Too many local variables"),
            TranslateErrorKind::NotIndexable(ty) => {
                write!(f, "Type '{ty}' does not support indexing")
            }
            TranslateErrorKind::IndexNotInt(ty) => {
                write!(f, "Array index must be of type 'int', found '{ty}'")
            }
            TranslateErrorKind::ArrayLength(found) => write!(
                f,
                "Array creation requires a single length argument, found {found}"
            ),
            TranslateErrorKind::ReturnMismatch { expected, found } => write!(
                f,
                "Function returns '{expected}' but the returned value is '{found}'"
            ),
            TranslateErrorKind::MissingReturn(name) => write!(
                f,
                "Not all code paths of function '{name}' return a value"
            ),
            TranslateErrorKind::DuplicateFunction(name) => {
                write!(f, "Function '{name}' is already defined")
            }
            TranslateErrorKind::StatementOutsideFunction => {
                write!(f, "Statement outside of a function")
            }
            TranslateErrorKind::NestedFunction(name) => {
                write!(f, "Function '{name}' cannot be declared inside another function")
            }
            TranslateErrorKind::MisplacedImport(path) => {
                write!(f, "Import '{path}' must appear at module level")
            }
            TranslateErrorKind::TypeUsedAsValue(ty) => {
                write!(f, "Type '{ty}' cannot be used as a value")
            }
            TranslateErrorKind::InvalidCast { from, to } => {
                write!(f, "Cannot cast '{from}' to '{to}'")
            }
            TranslateErrorKind::InvalidAssignmentTarget(reason) => {
                write!(f, "Invalid assignment target: {reason}")
            }
        }
    }
}

impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] {}", self.line, self.kind)
    }
}

impl std::error::Error for TranslateError {}

/// 翻译失败
#[derive(Debug, Clone, PartialEq)]
pub enum TranslateFailure {
    /// 收集到的语义错误
    Semantic(Vec<TranslateError>),
    /// 发射器错误，终止整个翻译单元
    Emit(EmitError),
}

impl From<EmitError> for TranslateFailure {
    fn from(err: EmitError) -> Self {
        TranslateFailure::Emit(err)
    }
}

impl fmt::Display for TranslateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslateFailure::Semantic(errors) => {
                write!(f, "{} semantic error(s)", errors.len())
            }
            TranslateFailure::Emit(err) => write!(f, "{err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TranslateError::new(
            TranslateErrorKind::TypeMismatch {
                op: "+",
                left: Type::INT,
                right: Type::FLOAT,
            },
            4,
        );
        assert_eq!(err.to_string(), "[line 4] Type mismatch in '+': 'int' and 'float'");
        let err = TranslateError::new(TranslateErrorKind::IsGeneric("id".into()), 2);
        assert!(err.to_string().contains("is generic"));
    }
}
