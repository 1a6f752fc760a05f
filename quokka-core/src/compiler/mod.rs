//! 前端：词法分析与语法分析

pub mod lexer;
pub mod parser;
