//! Lexer 错误类型
//!
//! 提供结构化的词法错误信息，包含错误类型、位置和详细消息。

use std::fmt;

use super::token::Coordinate;

/// 词法错误类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexerErrorKind {
    /// 无效字符
    InvalidChar(char),
    /// 未闭合的字符串
    UnterminatedString,
    /// 未闭合的字符字面量
    UnterminatedChar,
    /// 字符字面量必须恰好包含一个字符
    InvalidCharLiteral(String),
    /// 无效的数字（包括未知后缀）
    InvalidNumber(String),
}

/// 词法错误，包含结构化信息
#[derive(Debug, Clone, PartialEq)]
pub struct LexerError {
    /// 错误类型
    pub kind: LexerErrorKind,
    /// 错误发生的位置
    pub position: Coordinate,
    /// 详细错误消息
    pub message: String,
}

impl LexerError {
    /// 在指定位置创建错误
    pub fn at(kind: LexerErrorKind, position: Coordinate) -> Self {
        let message = Self::format_message(&kind);
        Self {
            kind,
            position,
            message,
        }
    }

    /// 获取行号（1-based）
    pub fn line(&self) -> usize {
        self.position.line
    }

    /// 获取列号（1-based）
    pub fn column(&self) -> usize {
        self.position.column
    }

    fn format_message(kind: &LexerErrorKind) -> String {
        match kind {
            LexerErrorKind::InvalidChar(ch) => format!("Invalid character '{ch}'"),
            LexerErrorKind::UnterminatedString => "Unterminated string literal".to_string(),
            LexerErrorKind::UnterminatedChar => "Unterminated char literal".to_string(),
            LexerErrorKind::InvalidCharLiteral(text) => {
                format!("Char literal must contain exactly one character: '{text}'")
            }
            LexerErrorKind::InvalidNumber(num) => format!("Invalid number format '{num}'"),
        }
    }
}

impl fmt::Display for LexerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}:{}] {}",
            self.position.line, self.position.column, self.message
        )
    }
}

impl std::error::Error for LexerError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_has_position() {
        let err = LexerError::at(LexerErrorKind::InvalidChar('#'), Coordinate::new(3, 7));
        assert_eq!(err.line(), 3);
        assert_eq!(err.column(), 7);
        assert_eq!(err.to_string(), "[3:7] Invalid character '#'");
    }
}
