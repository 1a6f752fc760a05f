//! 目标发射器接口
//!
//! 代码生成器只通过该接口输出指令，不关心最终载体。

use super::instruction::{FunctionSymbol, Instruction, Label, Slot};
use super::program::Program;
use crate::types::Type;
use std::fmt;

/// 发射器错误（致命，终止当前翻译单元）
#[derive(Debug, Clone, PartialEq)]
pub enum EmitError {
    /// 同名函数重复声明
    DuplicateFunction(String),
    /// 未声明的函数句柄
    UnknownFunction(FunctionSymbol),
    /// 已有函数体处于打开状态
    BodyAlreadyOpen(String),
    /// 没有打开的函数体
    NoOpenBody(&'static str),
    /// 函数体已经生成过
    BodyAlreadyEmitted(String),
    /// 函数声明了但没有函数体
    MissingBody(String),
    /// 标签未标记位置
    UnmarkedLabel { function: String, label: Label },
    /// 标签重复标记
    LabelMarkedTwice { function: String, label: Label },
    /// 未定义的标签
    UnknownLabel { function: String, label: Label },
    /// 局部变量槽位耗尽
    TooManyLocals(String),
}

impl fmt::Display for EmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmitError::DuplicateFunction(name) => {
                write!(f, "Function '{name}' declared twice in emitter")
            }
            EmitError::UnknownFunction(symbol) => {
                write!(f, "Unknown function symbol #{}", symbol.0)
            }
            EmitError::BodyAlreadyOpen(name) => {
                write!(f, "Body of function '{name}' is still open")
            }
            EmitError::NoOpenBody(operation) => {
                write!(f, "'{operation}' called outside of a function body")
            }
            EmitError::BodyAlreadyEmitted(name) => {
                write!(f, "Body of function '{name}' emitted twice")
            }
            EmitError::MissingBody(name) => write!(f, "Function '{name}' has no body"),
            EmitError::UnmarkedLabel { function, label } => {
                write!(f, "Label L{} in function '{function}' was never marked", label.0)
            }
            EmitError::LabelMarkedTwice { function, label } => {
                write!(f, "Label L{} in function '{function}' marked twice", label.0)
            }
            EmitError::UnknownLabel { function, label } => {
                write!(f, "Label L{} is not defined in function '{function}'", label.0)
            }
            EmitError::TooManyLocals(name) => {
                write!(f, "Function '{name}' exceeds the local slot limit")
            }
        }
    }
}

impl std::error::Error for EmitError {}

/// 目标发射器
///
/// 出错的 `emit`/`mark_label`/`declare_local` 等调用不会立刻失败，
/// 错误在 `end_body`/`finalize` 时返回。
pub trait Emitter {
    /// 预留函数句柄，不生成函数体
    fn declare_function(
        &mut self,
        name: &str,
        params: &[Type],
        return_type: &Type,
        generics: &[String],
    ) -> Result<FunctionSymbol, EmitError>;

    /// 开始生成函数体
    fn begin_body(&mut self, symbol: FunctionSymbol) -> Result<(), EmitError>;

    fn emit(&mut self, instruction: Instruction);

    fn define_label(&mut self) -> Label;

    /// 把标签绑定到下一条指令
    fn mark_label(&mut self, label: Label);

    fn declare_local(&mut self, ty: &Type) -> Slot;

    /// 设置后续指令对应的源码行
    fn set_line(&mut self, line: usize);

    /// 结束当前函数体，检查所有标签都已标记
    fn end_body(&mut self) -> Result<(), EmitError>;

    /// 丢弃当前函数体（函数存在语义错误时）
    fn abandon_body(&mut self);

    /// 生成最终程序
    fn finalize(self) -> Result<Program, EmitError>
    where
        Self: Sized;
}
