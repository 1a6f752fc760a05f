//! Token 与 Token 流

use std::ops::Index;

use super::token_kind::QuokkaTokenKind;

/// 源代码坐标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coordinate {
    pub line: usize,
    pub column: usize,
}

impl Default for Coordinate {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl Coordinate {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// 前进一个字符
    pub fn advance(&mut self, c: char) {
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }
}

/// 词法单元
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: QuokkaTokenKind,
    /// 原始文本；字符串/字符字面量为转义后的内容
    pub text: String,
    pub coordinate: Coordinate,
}

impl Token {
    pub fn new(kind: QuokkaTokenKind, text: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            kind,
            text: text.into(),
            coordinate,
        }
    }

    pub fn line(&self) -> usize {
        self.coordinate.line
    }
}

/// 可随机访问、可回退的 token 序列，以 `Eof` 结尾
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    eof: Token,
    lines: Vec<String>,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>, eof_at: Coordinate, source: &str) -> Self {
        Self {
            tokens,
            eof: Token::new(QuokkaTokenKind::Eof, "", eof_at),
            lines: source.lines().map(str::to_string).collect(),
        }
    }

    /// 越界访问返回 `Eof`
    pub fn get(&self, index: usize) -> &Token {
        self.tokens.get(index).unwrap_or(&self.eof)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn eof(&self) -> &Token {
        &self.eof
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    /// 获取指定行（1-based）的源码文本
    pub fn line_text(&self, line: usize) -> Option<&str> {
        line.checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .map(String::as_str)
    }

    /// 源码总行数
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

impl Index<usize> for TokenStream {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        self.get(index)
    }
}
