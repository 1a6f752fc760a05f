//! API 错误类型
//!
//! 提供统一的错误类型和结构化错误报告。

use quokka_config::Phase;
use serde::Serialize;
use thiserror::Error;

/// 词法错误（结构化）
pub use quokka_core::compiler::lexer::LexerError;

use quokka_core::compiler::parser::ErrorLocation;

/// 语法错误（结构化）
pub use quokka_core::compiler::parser::ParserError;

/// 语义错误（结构化）
pub use quokka_core::translator::TranslateError;

/// 发射器错误
pub use quokka_core::bytecode::EmitError;

/// Quokka 错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuokkaError {
    /// 词法分析错误
    #[error("{0}")]
    Lexer(#[from] LexerError),

    /// 语法分析错误
    #[error("{0}")]
    Parser(#[from] ParserError),

    /// 语义错误
    #[error("{0}")]
    Translate(#[from] TranslateError),

    /// 发射器错误（致命）
    #[error("Emitter error: {0}")]
    Emit(#[from] EmitError),
}

/// 一次编译收集到的全部诊断
#[derive(Error, Debug, Clone, PartialEq)]
#[error("compilation failed with {} error(s)", errors.len())]
pub struct CompileFailure {
    pub errors: Vec<QuokkaError>,
}

impl From<Vec<QuokkaError>> for CompileFailure {
    fn from(errors: Vec<QuokkaError>) -> Self {
        Self { errors }
    }
}

/// `Debug` 输出中的变体名，如 `InvalidChar('#')` -> `InvalidChar`
fn variant_name(kind: &impl std::fmt::Debug) -> String {
    let debug = format!("{kind:?}");
    debug
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .next()
        .unwrap_or_default()
        .to_string()
}

impl QuokkaError {
    /// 获取错误行号（如果有）
    pub fn line(&self) -> Option<usize> {
        match self {
            QuokkaError::Lexer(e) => Some(e.line()),
            QuokkaError::Parser(e) => e.line(),
            QuokkaError::Translate(e) => Some(e.line),
            QuokkaError::Emit(_) => None,
        }
    }

    /// 获取错误列号（如果有）
    pub fn column(&self) -> Option<usize> {
        match self {
            QuokkaError::Lexer(e) => Some(e.column()),
            QuokkaError::Parser(e) => e.column(),
            QuokkaError::Translate(_) | QuokkaError::Emit(_) => None,
        }
    }

    /// 获取错误阶段
    pub fn phase(&self) -> Phase {
        match self {
            QuokkaError::Lexer(_) => Phase::Lexer,
            QuokkaError::Parser(_) => Phase::Parser,
            QuokkaError::Translate(_) => Phase::Translator,
            QuokkaError::Emit(_) => Phase::Emitter,
        }
    }

    /// 转换为结构化错误报告
    ///
    /// CLI 可以直接打印，上层应用可以序列化为 JSON。
    pub fn to_report(&self) -> ErrorReport {
        let (error_kind, message, details) = match self {
            QuokkaError::Lexer(e) => (variant_name(&e.kind), e.message.clone(), None),
            QuokkaError::Parser(e) => {
                let location_type = match &e.location {
                    ErrorLocation::At(_) => "at",
                    ErrorLocation::Eof => "eof",
                };
                (
                    variant_name(&e.kind),
                    e.to_string(),
                    Some(ErrorDetails::Location { location_type }),
                )
            }
            QuokkaError::Translate(e) => (variant_name(&e.kind), e.kind.to_string(), None),
            QuokkaError::Emit(e) => (variant_name(e), e.to_string(), None),
        };
        ErrorReport {
            phase: self.phase().as_str(),
            line: self.line(),
            column: self.column(),
            error_kind,
            message,
            details,
        }
    }
}

/// 结构化错误报告
///
/// 上层应用（CLI、Web、LSP）可以根据自己的需求格式化。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    /// 错误阶段: lexer, parser, translator, emitter
    pub phase: &'static str,
    /// 错误行号（1-based，如果有）
    pub line: Option<usize>,
    /// 错误列号（1-based，如果有）
    pub column: Option<usize>,
    /// 错误类型（可用于程序化处理）
    pub error_kind: String,
    /// 人类可读的错误消息
    pub message: String,
    /// 额外详情（位置类型等）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ErrorDetails>,
}

/// 错误额外详情
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ErrorDetails {
    /// 位置相关信息
    Location { location_type: &'static str },
}

impl std::fmt::Display for ErrorReport {
    /// 默认的 CLI 友好格式
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(col)) => {
                write!(f, "[{}:{}] {} error: {}", line, col, self.phase, self.message)
            }
            (Some(line), None) => {
                write!(f, "[line {}] {} error: {}", line, self.phase, self.message)
            }
            _ => write!(f, "[{}] {} error: {}", self.phase, self.phase, self.message),
        }
    }
}

impl ErrorReport {
    /// 简洁格式（适合终端）
    pub fn to_short(&self) -> String {
        format!("{}: {}", self.phase, self.message)
    }
}
