//! API 类型定义
//!
//! 编译的输出类型。

use quokka_core::translator::ModuleTable;
use quokka_core::Program;

/// 编译输出
#[derive(Debug, Clone)]
pub struct CompileOutput {
    /// 生成的程序
    pub program: Program,
    /// 模块符号表（导入与函数签名）
    pub symbols: ModuleTable,
}
