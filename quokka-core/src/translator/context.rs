//! 函数级翻译上下文

use super::scope::VariableTable;
use crate::bytecode::Label;
use crate::types::Type;
use std::collections::HashMap;

/// 循环的跳转目标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopLabels {
    pub continue_label: Label,
    pub break_label: Label,
}

#[derive(Debug, Clone)]
pub struct TranslationContext {
    pub function_name: String,
    pub return_type: Type,
    pub vars: VariableTable,
    /// 泛型参数名 -> 占位类型
    pub generics: HashMap<String, Type>,
    loops: Vec<LoopLabels>,
}

impl TranslationContext {
    pub fn new(
        function_name: impl Into<String>,
        return_type: Type,
        generics: HashMap<String, Type>,
        max_locals: usize,
    ) -> Self {
        Self {
            function_name: function_name.into(),
            return_type,
            vars: VariableTable::new(max_locals),
            generics,
            loops: Vec::new(),
        }
    }

    pub fn push_loop(&mut self, labels: LoopLabels) {
        self.loops.push(labels);
    }

    pub fn pop_loop(&mut self) {
        self.loops.pop();
    }

    /// 最内层循环
    pub fn current_loop(&self) -> Option<LoopLabels> {
        self.loops.last().copied()
    }
}
