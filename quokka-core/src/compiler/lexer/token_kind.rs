//! Quokka Token 类型定义

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QuokkaTokenKind {
    // 关键字
    Func,
    Return,
    Let,
    If,
    Else,
    While,
    Do,
    For,
    Break,
    Continue,
    Import,
    New,
    True,
    False,

    // 字面量
    LiteralInteger,
    LiteralFloat,
    LiteralString,
    LiteralChar,

    // 标识符
    Identifier,

    // 双字符符号
    DoubleEqual,
    ExclamationEqual,
    LessThanEqual,
    GreaterThanEqual,
    DoubleAmpersand,
    DoublePipe,
    DoubleLessThan,

    // 单字符符号
    Plus,
    Minus,
    Asterisk,
    Slash,
    Percent,
    Equal,
    LessThan,
    GreaterThan,
    Ampersand,
    Pipe,
    Caret,
    Tilde,
    Exclamation,
    LeftParenthesis,
    RightParenthesis,
    LeftCurlyBrace,
    RightCurlyBrace,
    LeftSquareBracket,
    RightSquareBracket,
    Comma,
    Semicolon,
    Colon,
    Dot,

    #[default]
    Eof,
}

impl QuokkaTokenKind {
    /// 是否为语句起始关键字（用于错误恢复）
    pub fn starts_statement(&self) -> bool {
        matches!(
            self,
            QuokkaTokenKind::Func
                | QuokkaTokenKind::Return
                | QuokkaTokenKind::Let
                | QuokkaTokenKind::If
                | QuokkaTokenKind::While
                | QuokkaTokenKind::Do
                | QuokkaTokenKind::For
                | QuokkaTokenKind::Break
                | QuokkaTokenKind::Continue
                | QuokkaTokenKind::Import
        )
    }

    /// 源码中的书写形式
    pub fn as_str(&self) -> &'static str {
        match self {
            QuokkaTokenKind::Func => "func",
            QuokkaTokenKind::Return => "return",
            QuokkaTokenKind::Let => "let",
            QuokkaTokenKind::If => "if",
            QuokkaTokenKind::Else => "else",
            QuokkaTokenKind::While => "while",
            QuokkaTokenKind::Do => "do",
            QuokkaTokenKind::For => "for",
            QuokkaTokenKind::Break => "break",
            QuokkaTokenKind::Continue => "continue",
            QuokkaTokenKind::Import => "import",
            QuokkaTokenKind::New => "new",
            QuokkaTokenKind::True => "true",
            QuokkaTokenKind::False => "false",
            QuokkaTokenKind::LiteralInteger => "integer literal",
            QuokkaTokenKind::LiteralFloat => "float literal",
            QuokkaTokenKind::LiteralString => "string literal",
            QuokkaTokenKind::LiteralChar => "char literal",
            QuokkaTokenKind::Identifier => "identifier",
            QuokkaTokenKind::DoubleEqual => "==",
            QuokkaTokenKind::ExclamationEqual => "!=",
            QuokkaTokenKind::LessThanEqual => "<=",
            QuokkaTokenKind::GreaterThanEqual => ">=",
            QuokkaTokenKind::DoubleAmpersand => "&&",
            QuokkaTokenKind::DoublePipe => "||",
            QuokkaTokenKind::DoubleLessThan => "<<",
            QuokkaTokenKind::Plus => "+",
            QuokkaTokenKind::Minus => "-",
            QuokkaTokenKind::Asterisk => "*",
            QuokkaTokenKind::Slash => "/",
            QuokkaTokenKind::Percent => "%",
            QuokkaTokenKind::Equal => "=",
            QuokkaTokenKind::LessThan => "<",
            QuokkaTokenKind::GreaterThan => ">",
            QuokkaTokenKind::Ampersand => "&",
            QuokkaTokenKind::Pipe => "|",
            QuokkaTokenKind::Caret => "^",
            QuokkaTokenKind::Tilde => "~",
            QuokkaTokenKind::Exclamation => "!",
            QuokkaTokenKind::LeftParenthesis => "(",
            QuokkaTokenKind::RightParenthesis => ")",
            QuokkaTokenKind::LeftCurlyBrace => "{",
            QuokkaTokenKind::RightCurlyBrace => "}",
            QuokkaTokenKind::LeftSquareBracket => "[",
            QuokkaTokenKind::RightSquareBracket => "]",
            QuokkaTokenKind::Comma => ",",
            QuokkaTokenKind::Semicolon => ";",
            QuokkaTokenKind::Colon => ":",
            QuokkaTokenKind::Dot => ".",
            QuokkaTokenKind::Eof => "end of input",
        }
    }
}

impl fmt::Display for QuokkaTokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
