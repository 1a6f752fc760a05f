//! 平台相关输出（终端）

pub mod cli;

pub use cli::print_error_with_source;
