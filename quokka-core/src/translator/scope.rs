//! 局部变量表：作用域栈与按类型的空闲槽位表

use super::error::TranslateErrorKind;
use crate::bytecode::{Emitter, Slot};
use crate::types::Type;
use std::collections::HashMap;

/// 局部变量
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub slot: Slot,
    pub ty: Type,
}

/// 函数内的局部变量表
///
/// 名字在所有活动作用域中唯一（不允许遮蔽），离开作用域的槽位
/// 进入对应类型的空闲表，同类型的后续声明优先复用。
#[derive(Debug, Clone)]
pub struct VariableTable {
    variables: HashMap<String, Variable>,
    scopes: Vec<Vec<String>>,
    free: HashMap<Type, Vec<Slot>>,
    allocated: usize,
    max_locals: usize,
}

impl VariableTable {
    pub fn new(max_locals: usize) -> Self {
        Self {
            variables: HashMap::new(),
            scopes: vec![Vec::new()],
            free: HashMap::new(),
            allocated: 0,
            max_locals,
        }
    }

    pub fn begin_scope(&mut self) {
        self.scopes.push(Vec::new());
    }

    /// 退出作用域，返回释放的槽位（按声明顺序）
    pub fn end_scope(&mut self) -> Vec<Variable> {
        let names = self.scopes.pop().unwrap_or_default();
        if self.scopes.is_empty() {
            self.scopes.push(Vec::new());
        }
        let mut released = Vec::with_capacity(names.len());
        for name in names {
            if let Some(variable) = self.variables.remove(&name) {
                self.free
                    .entry(variable.ty.clone())
                    .or_default()
                    .push(variable.slot);
                released.push(variable);
            }
        }
        released
    }

    /// 当前作用域深度
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// 声明变量：同类型空闲槽位优先，否则向发射器申请新槽位
    pub fn declare(
        &mut self,
        name: &str,
        ty: &Type,
        emitter: &mut dyn Emitter,
    ) -> Result<Slot, TranslateErrorKind> {
        if self.variables.contains_key(name) {
            return Err(TranslateErrorKind::VariableAlreadyExists(name.to_string()));
        }
        let reused = self.free.get_mut(ty).and_then(|slots| slots.pop());
        let slot = match reused {
            Some(slot) => slot,
            None => {
                if self.allocated >= self.max_locals {
                    return Err(TranslateErrorKind::TooManyLocals);
                }
                self.allocated += 1;
                emitter.declare_local(ty)
            }
        };
        self.variables.insert(
            name.to_string(),
            Variable {
                slot,
                ty: ty.clone(),
            },
        );
        if let Some(scope) = self.scopes.last_mut() {
            scope.push(name.to_string());
        }
        Ok(slot)
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// 已向发射器申请的槽位数
    pub fn allocated(&self) -> usize {
        self.allocated
    }
}
