//! Quokka 语言 Scanner 实现
//!
//! 一次性扫描整个源文件：
//! - 关键字、标识符
//! - 运算符（单字符和双字符）
//! - 数字（`_` 分隔符与类型后缀）、字符串、字符
//! - 行注释与块注释
//!
//! 遇到非法输入时记录错误并跳过，继续扫描。

use tracing::{debug, trace};

use super::error::{LexerError, LexerErrorKind};
use super::token::{Coordinate, Token, TokenStream};
use super::token_kind::QuokkaTokenKind;

/// 关键字表
static KEYWORD_TABLE: &[(&str, QuokkaTokenKind)] = &[
    ("func", QuokkaTokenKind::Func),
    ("return", QuokkaTokenKind::Return),
    ("let", QuokkaTokenKind::Let),
    ("if", QuokkaTokenKind::If),
    ("else", QuokkaTokenKind::Else),
    ("while", QuokkaTokenKind::While),
    ("do", QuokkaTokenKind::Do),
    ("for", QuokkaTokenKind::For),
    ("break", QuokkaTokenKind::Break),
    ("continue", QuokkaTokenKind::Continue),
    ("import", QuokkaTokenKind::Import),
    ("new", QuokkaTokenKind::New),
    ("true", QuokkaTokenKind::True),
    ("false", QuokkaTokenKind::False),
];

/// 整数后缀
pub const INTEGER_SUFFIXES: &[&str] = &["b", "ub", "s", "us", "u", "l", "ul"];
/// 小数后缀
pub const FLOAT_SUFFIXES: &[&str] = &["f", "d"];

pub fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

pub fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Quokka 扫描器
pub struct QuokkaScanner<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
    position: Coordinate,
    /// 当前 token 的起始位置
    token_start: Coordinate,
    tokens: Vec<Token>,
    errors: Vec<LexerError>,
}

impl<'a> QuokkaScanner<'a> {
    pub fn new(source: &'a str) -> Self {
        trace!(target: "quokka::lexer", "Creating new QuokkaScanner");
        Self {
            source,
            chars: source.chars().collect(),
            pos: 0,
            position: Coordinate::default(),
            token_start: Coordinate::default(),
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// 扫描整个输入
    pub fn scan(mut self) -> (TokenStream, Vec<LexerError>) {
        loop {
            self.skip_whitespace_and_comments();
            if self.peek(0).is_none() {
                break;
            }
            self.scan_default();
        }
        debug!(
            target: "quokka::lexer",
            tokens = self.tokens.len(),
            errors = self.errors.len(),
            "Scan finished"
        );
        (
            TokenStream::new(self.tokens, self.position, self.source),
            self.errors,
        )
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn check(&self, expected: char) -> bool {
        self.peek(0) == Some(expected)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek(0)?;
        self.pos += 1;
        self.position.advance(c);
        Some(c)
    }

    fn push(&mut self, kind: QuokkaTokenKind, text: impl Into<String>) {
        let token = Token::new(kind, text, self.token_start);
        trace!(target: "quokka::lexer", kind = ?token.kind, text = %token.text, "Token");
        self.tokens.push(token);
    }

    fn error(&mut self, kind: LexerErrorKind) {
        let err = LexerError::at(kind, self.token_start);
        debug!(target: "quokka::lexer", error = %err, "Lexical error");
        self.errors.push(err);
    }

    /// 默认模式扫描
    fn scan_default(&mut self) {
        self.token_start = self.position;
        let Some(c) = self.peek(0) else {
            return;
        };

        // 根据首字符分发
        match c {
            '+' => self.make_single_char(QuokkaTokenKind::Plus),
            '-' => self.make_single_char(QuokkaTokenKind::Minus),
            '*' => self.make_single_char(QuokkaTokenKind::Asterisk),
            '/' => self.make_single_char(QuokkaTokenKind::Slash),
            '%' => self.make_single_char(QuokkaTokenKind::Percent),
            '^' => self.make_single_char(QuokkaTokenKind::Caret),
            '~' => self.make_single_char(QuokkaTokenKind::Tilde),
            '(' => self.make_single_char(QuokkaTokenKind::LeftParenthesis),
            ')' => self.make_single_char(QuokkaTokenKind::RightParenthesis),
            '{' => self.make_single_char(QuokkaTokenKind::LeftCurlyBrace),
            '}' => self.make_single_char(QuokkaTokenKind::RightCurlyBrace),
            '[' => self.make_single_char(QuokkaTokenKind::LeftSquareBracket),
            ']' => self.make_single_char(QuokkaTokenKind::RightSquareBracket),
            ',' => self.make_single_char(QuokkaTokenKind::Comma),
            ';' => self.make_single_char(QuokkaTokenKind::Semicolon),
            ':' => self.make_single_char(QuokkaTokenKind::Colon),
            '.' => self.make_single_char(QuokkaTokenKind::Dot),
            // `>` 始终单独成词，右移由语法分析器合并
            '>' => self.scan_pair('=', QuokkaTokenKind::GreaterThan, QuokkaTokenKind::GreaterThanEqual),
            '=' => self.scan_pair('=', QuokkaTokenKind::Equal, QuokkaTokenKind::DoubleEqual),
            '!' => self.scan_pair('=', QuokkaTokenKind::Exclamation, QuokkaTokenKind::ExclamationEqual),
            '&' => self.scan_pair('&', QuokkaTokenKind::Ampersand, QuokkaTokenKind::DoubleAmpersand),
            '|' => self.scan_pair('|', QuokkaTokenKind::Pipe, QuokkaTokenKind::DoublePipe),
            '<' => self.scan_lt(),
            '"' => self.scan_string(),
            '\'' => self.scan_char(),
            '0'..='9' => self.scan_number(),
            c if is_identifier_start(c) => self.scan_identifier_or_keyword(),
            _ => {
                self.advance();
                self.error(LexerErrorKind::InvalidChar(c));
            }
        }
    }

    /// 创建单字符 token
    fn make_single_char(&mut self, kind: QuokkaTokenKind) {
        self.advance();
        self.push(kind, kind.as_str());
    }

    /// 扫描 `x` 或 `x<second>` 形式的运算符
    fn scan_pair(&mut self, second: char, single: QuokkaTokenKind, double: QuokkaTokenKind) {
        self.advance();
        let kind = if self.check(second) {
            self.advance();
            double
        } else {
            single
        };
        self.push(kind, kind.as_str());
    }

    /// 扫描 '<' 系列（<, <=, <<）
    fn scan_lt(&mut self) {
        self.advance();
        let kind = match self.peek(0) {
            Some('=') => {
                self.advance();
                QuokkaTokenKind::LessThanEqual
            }
            Some('<') => {
                self.advance();
                QuokkaTokenKind::DoubleLessThan
            }
            _ => QuokkaTokenKind::LessThan,
        };
        self.push(kind, kind.as_str());
    }

    /// 跳过空白符和注释
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match (self.peek(0), self.peek(1)) {
                (Some(c), _) if c.is_whitespace() => {
                    self.advance();
                }
                (Some('/'), Some('/')) => self.skip_line_comment(),
                (Some('/'), Some('*')) => self.skip_block_comment(),
                _ => break,
            }
        }
    }

    /// 跳过单行注释
    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek(0) {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// 跳过多行注释，未闭合时吞掉剩余输入
    fn skip_block_comment(&mut self) {
        self.advance(); // '/'
        self.advance(); // '*'
        while let Some(c) = self.advance() {
            if c == '*' && self.check('/') {
                self.advance();
                break;
            }
        }
    }

    /// 解析转义字符
    fn parse_escape(c: char) -> char {
        match c {
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            '0' => '\0',
            _ => c,
        }
    }

    /// 读取引号内的内容直到 `quote`；未闭合返回 None
    fn read_quoted(&mut self, quote: char) -> Option<String> {
        self.advance(); // 开头引号
        let mut value = String::new();
        loop {
            match self.peek(0) {
                Some(c) if c == quote => {
                    self.advance();
                    return Some(value);
                }
                Some('\n') | None => return None,
                Some('\\') => {
                    self.advance();
                    let escaped = self.advance()?;
                    value.push(Self::parse_escape(escaped));
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
            }
        }
    }

    /// 扫描字符串
    fn scan_string(&mut self) {
        match self.read_quoted('"') {
            Some(value) => self.push(QuokkaTokenKind::LiteralString, value),
            None => self.error(LexerErrorKind::UnterminatedString),
        }
    }

    /// 扫描字符字面量
    fn scan_char(&mut self) {
        match self.read_quoted('\'') {
            Some(value) if is_single_code_unit(&value) => {
                self.push(QuokkaTokenKind::LiteralChar, value)
            }
            Some(value) => self.error(LexerErrorKind::InvalidCharLiteral(value)),
            None => self.error(LexerErrorKind::UnterminatedChar),
        }
    }

    fn read_digits(&mut self, value: &mut String) {
        while let Some(c) = self.peek(0) {
            if c.is_ascii_digit() {
                value.push(c);
            } else if c != '_' {
                break;
            }
            self.advance();
        }
    }

    /// 扫描数字（整数或小数），后缀保留在文本末尾
    fn scan_number(&mut self) {
        let mut value = String::new();
        let mut is_float = false;

        self.read_digits(&mut value);

        if self.check('.') && self.peek(1).is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            value.push('.');
            is_float = true;
            self.read_digits(&mut value);
        }

        let mut suffix = String::new();
        while let Some(c) = self.peek(0) {
            if !is_identifier_continue(c) {
                break;
            }
            suffix.push(c.to_ascii_lowercase());
            self.advance();
        }

        let allowed = if is_float {
            FLOAT_SUFFIXES
        } else {
            INTEGER_SUFFIXES
        };
        // 整数后也允许 `f`/`d`，得到对应的浮点字面量
        let (kind, valid) = if suffix.is_empty() || allowed.contains(&suffix.as_str()) {
            let kind = if is_float {
                QuokkaTokenKind::LiteralFloat
            } else {
                QuokkaTokenKind::LiteralInteger
            };
            (kind, true)
        } else if !is_float && FLOAT_SUFFIXES.contains(&suffix.as_str()) {
            (QuokkaTokenKind::LiteralFloat, true)
        } else {
            (QuokkaTokenKind::LiteralInteger, false)
        };

        value.push_str(&suffix);
        if valid {
            self.push(kind, value);
        } else {
            self.error(LexerErrorKind::InvalidNumber(value));
        }
    }

    /// 扫描标识符或关键字
    fn scan_identifier_or_keyword(&mut self) {
        let mut value = String::new();
        while let Some(c) = self.peek(0) {
            if !is_identifier_continue(c) {
                break;
            }
            value.push(c);
            self.advance();
        }
        let kind = lookup_keyword(&value);
        self.push(kind, value);
    }
}

/// 查找关键字
fn lookup_keyword(word: &str) -> QuokkaTokenKind {
    KEYWORD_TABLE
        .iter()
        .find(|(kw, _)| *kw == word)
        .map(|(_, kind)| *kind)
        .unwrap_or(QuokkaTokenKind::Identifier)
}

/// `char` 是 16 位代码单元，基本多文种平面以外的字符无法放入
fn is_single_code_unit(value: &str) -> bool {
    let mut chars = value.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if u32::from(c) <= 0xFFFF)
}
