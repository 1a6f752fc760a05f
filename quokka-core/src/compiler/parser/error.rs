use crate::compiler::lexer::Coordinate;

/// 语法错误，包含位置信息
#[derive(Debug, Clone, PartialEq)]
pub struct ParserError {
    /// 错误类型
    pub kind: ParserErrorKind,
    /// 错误发生的位置
    pub location: ErrorLocation,
}

/// 错误位置信息
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorLocation {
    /// 特定位置
    At(Coordinate),
    /// 文件末尾
    Eof,
}

/// 语法错误类型
#[derive(Debug, Clone, PartialEq)]
pub enum ParserErrorKind {
    /// 意外的token
    UnexpectedToken {
        found: String,
        expected: Vec<String>,
    },
    /// 无效的数字格式（超出范围等）
    InvalidNumberFormat(String),
    /// 意外的输入结束
    UnexpectedEndOfInput,
    /// 期望标识符
    ExpectedIdentifier { found: String },
    /// 函数参数重名
    DuplicateArgument(String),
    /// 泛型参数重名
    DuplicateGenericParameter(String),
    /// `a == b != c`
    ChainedEquality,
    /// 赋值目标不是变量、索引或成员
    InvalidAssignmentTarget(String),
    /// 嵌套层数超过限制
    NestingTooDeep(usize),
}

impl ParserError {
    /// 在指定位置创建错误
    pub fn at(kind: ParserErrorKind, line: usize, column: usize) -> Self {
        Self {
            kind,
            location: ErrorLocation::At(Coordinate { line, column }),
        }
    }

    /// 在当前位置创建错误（从token获取位置）
    pub fn here(kind: ParserErrorKind, coordinate: Coordinate) -> Self {
        Self {
            kind,
            location: ErrorLocation::At(coordinate),
        }
    }

    /// 在文件末尾创建错误
    pub fn at_eof(kind: ParserErrorKind) -> Self {
        Self {
            kind,
            location: ErrorLocation::Eof,
        }
    }

    /// 获取行号（如果可用）
    pub fn line(&self) -> Option<usize> {
        match &self.location {
            ErrorLocation::At(coord) => Some(coord.line),
            ErrorLocation::Eof => None,
        }
    }

    /// 获取列号（如果可用）
    pub fn column(&self) -> Option<usize> {
        match &self.location {
            ErrorLocation::At(coord) => Some(coord.column),
            ErrorLocation::Eof => None,
        }
    }
}

impl std::fmt::Display for ParserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let location_prefix = match &self.location {
            ErrorLocation::At(coord) => format!("{}:{}", coord.line, coord.column),
            ErrorLocation::Eof => "EOF".to_string(),
        };

        let message = match &self.kind {
            ParserErrorKind::UnexpectedToken { found, expected } => {
                if expected.is_empty() {
                    format!("Unexpected token '{found}'")
                } else {
                    format!(
                        "Unexpected token '{}', expected: {}",
                        found,
                        expected.join(", ")
                    )
                }
            }
            ParserErrorKind::InvalidNumberFormat(s) => {
                format!("Invalid number format: '{s}'")
            }
            ParserErrorKind::UnexpectedEndOfInput => "Unexpected end of input".to_string(),
            ParserErrorKind::ExpectedIdentifier { found } => {
                format!("Expected identifier, found: '{found}'")
            }
            ParserErrorKind::DuplicateArgument(name) => {
                format!("Duplicate argument name '{name}'")
            }
            ParserErrorKind::DuplicateGenericParameter(name) => {
                format!("Duplicate generic parameter '{name}'")
            }
            ParserErrorKind::ChainedEquality => {
                "Equality operators cannot be chained, add parentheses".to_string()
            }
            ParserErrorKind::InvalidAssignmentTarget(target) => {
                format!("Invalid assignment target '{target}'")
            }
            ParserErrorKind::NestingTooDeep(limit) => {
                format!("Expression nesting too deep (limit {limit})")
            }
        };

        write!(f, "[{location_prefix}] {message}")
    }
}

impl std::error::Error for ParserError {}

/// 解析结果类型
pub type ParseResult<T> = Result<T, ParserError>;

/// 辅助函数：创建意外token错误
pub fn unexpected_token(
    found: impl Into<String>,
    expected: Vec<impl Into<String>>,
) -> ParserErrorKind {
    ParserErrorKind::UnexpectedToken {
        found: found.into(),
        expected: expected.into_iter().map(Into::into).collect(),
    }
}

/// 辅助函数：创建期望标识符错误
pub fn expected_identifier(found: impl Into<String>) -> ParserErrorKind {
    ParserErrorKind::ExpectedIdentifier {
        found: found.into(),
    }
}
