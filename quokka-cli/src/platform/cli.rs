//! CLI 格式化输出
//!
//! 提供命令行友好的错误显示和源码上下文打印。源码行取自词法分析器的行表。

use quokka_api::QuokkaError;
use quokka_core::compiler::lexer::TokenStream;
use std::fmt::Write as _;
use std::path::Path;

/// 错误行前后显示的上下文行数
const CONTEXT_LINES: usize = 2;

/// 打印错误并显示源代码上下文
pub fn print_error_with_source(path: &Path, e: &QuokkaError, lines: &TokenStream) {
    eprintln!("❌ {}: {}", path.display(), e.to_report());

    if let Some(line) = e.line() {
        eprint!("{}", render_source_context(lines, line, e.column()));
    }
}

/// 渲染源代码上下文；有列号时在错误行下方标记位置
pub fn render_source_context(
    lines: &TokenStream,
    error_line: usize,
    error_col: Option<usize>,
) -> String {
    let total_lines = lines.line_count();
    let mut out = String::new();

    if error_line == 0 || error_line > total_lines {
        return out;
    }

    let start_line = error_line.saturating_sub(CONTEXT_LINES).max(1);
    let end_line = (error_line + CONTEXT_LINES).min(total_lines);
    let width = end_line.to_string().len();
    let separator = "-".repeat(width + 1);

    let _ = writeln!(out, "{separator}|--");
    for line_idx in start_line..=end_line {
        let text = lines.line_text(line_idx).unwrap_or_default();
        let _ = writeln!(out, "{line_idx:>width$} | {text}");
        if line_idx == error_line {
            if let Some(col) = error_col {
                let marker = " ".repeat(col.saturating_sub(1));
                let _ = writeln!(out, "{:width$} | {marker}^", "");
            }
        }
    }
    let _ = writeln!(out, "{separator}|--");
    out
}
