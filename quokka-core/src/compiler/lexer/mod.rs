//! 词法分析
//!
//! 将源码转换为 [`TokenStream`]，词法错误逐个收集而不中断扫描。

pub mod error;
pub mod scanner;
pub mod token;
pub mod token_kind;

pub use error::{LexerError, LexerErrorKind};
pub use scanner::QuokkaScanner;
pub use token::{Coordinate, Token, TokenStream};
pub use token_kind::QuokkaTokenKind;

/// 扫描整个源文件
pub fn tokenize(source: &str) -> (TokenStream, Vec<LexerError>) {
    QuokkaScanner::new(source).scan()
}
