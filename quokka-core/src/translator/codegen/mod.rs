//! 代码生成：对函数体自顶向下遍历，经 [`Emitter`] 输出指令

mod call;
mod expr;
mod stmt;

pub use stmt::always_returns;

use super::context::TranslationContext;
use super::error::{TranslateError, TranslateErrorKind, TranslateResult};
use super::resolver::{Coercion, TypeResolver};
use super::symbols::{FunctionInfo, ModuleId, ModuleTable};
use crate::bytecode::{Emitter, Instruction, Label, Slot};
use crate::compiler::parser::stmt::FunctionDecl;
use crate::compiler::parser::StmtKind;
use crate::host::HostTypeProvider;
use crate::types::Type;
use quokka_config::CompilerConfig;
use tracing::{debug, trace};

/// 单个函数体的代码生成器
pub struct CodeGen<'t> {
    pub host: &'t dyn HostTypeProvider,
    pub symbols: &'t ModuleTable,
    pub module: ModuleId,
    pub config: &'t CompilerConfig,
    pub emitter: &'t mut dyn Emitter,
    pub ctx: TranslationContext,
    errors: &'t mut Vec<TranslateError>,
}

impl<'t> CodeGen<'t> {
    pub fn new(
        host: &'t dyn HostTypeProvider,
        symbols: &'t ModuleTable,
        module: ModuleId,
        config: &'t CompilerConfig,
        emitter: &'t mut dyn Emitter,
        ctx: TranslationContext,
        errors: &'t mut Vec<TranslateError>,
    ) -> Self {
        Self {
            host,
            symbols,
            module,
            config,
            emitter,
            ctx,
            errors,
        }
    }

    pub fn resolver(&self) -> TypeResolver<'_> {
        TypeResolver::new(self.host, self.symbols, self.module, &self.ctx)
    }

    pub fn emit(&mut self, instruction: Instruction) {
        self.emitter.emit(instruction);
    }

    pub fn define_label(&mut self) -> Label {
        self.emitter.define_label()
    }

    pub fn mark_label(&mut self, label: Label) {
        self.emitter.mark_label(label);
    }

    /// 记录语义错误，当前语句被放弃
    pub fn report(&mut self, err: TranslateError) {
        debug!(
            target: "quokka::translator",
            function = %self.ctx.function_name,
            error = %err,
            "Semantic error"
        );
        self.errors.push(err);
    }

    pub fn diagnostics_full(&self) -> bool {
        self.errors.len() >= self.config.max_diagnostics
    }

    pub fn declare_variable(&mut self, name: &str, ty: &Type, line: usize) -> TranslateResult<Slot> {
        if ty.is_void() {
            return Err(TranslateError::new(
                TranslateErrorKind::VoidVariable(name.to_string()),
                line,
            ));
        }
        let slot = self
            .ctx
            .vars
            .declare(name, ty, &mut *self.emitter)
            .map_err(|kind| TranslateError::new(kind, line))?;
        trace!(target: "quokka::translator", name, ty = %ty, slot = slot.0, "Declared variable");
        Ok(slot)
    }

    /// 在子作用域中执行，无论成败都会释放该作用域的变量
    pub fn scoped<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> TranslateResult<T>,
    ) -> TranslateResult<T> {
        self.ctx.vars.begin_scope();
        let result = f(self);
        self.end_scope();
        result
    }

    /// 释放作用域：槽位回到空闲表，引用类型槽位清空
    fn end_scope(&mut self) {
        let released = self.ctx.vars.end_scope();
        if !self.config.clear_released_references {
            return;
        }
        for variable in released {
            if self.is_reference(&variable.ty) {
                self.emit(Instruction::LdNull);
                self.emit(Instruction::Stloc(variable.slot));
            }
        }
    }

    pub fn is_reference(&self, ty: &Type) -> bool {
        !ty.is_void() && !self.resolver().needs_box(ty)
    }

    pub fn emit_coercion(&mut self, coercion: Coercion) {
        match coercion {
            Coercion::Identity => {}
            Coercion::Box(ty) => self.emit(Instruction::Box(ty)),
            Coercion::Conv(kind) => self.emit(Instruction::Conv(kind)),
        }
    }

    /// 函数体：参数序言、语句、`void` 函数的 `ret`
    pub fn translate_function(&mut self, info: &FunctionInfo, decl: &FunctionDecl, line: usize) {
        debug!(
            target: "quokka::translator",
            function = %info.name,
            params = info.params.len(),
            "Translating function body"
        );
        for (index, ((name, _), ty)) in info.args.iter().zip(&info.params).enumerate() {
            match self.declare_variable(name, ty, line) {
                Ok(slot) => {
                    self.emit(Instruction::Ldarg(index as u16));
                    self.emit(Instruction::Stloc(slot));
                }
                Err(err) => self.report(err),
            }
        }

        let result = match &decl.body.kind {
            StmtKind::Block(block) => {
                self.scoped(|cg| stmt::translate_statements(cg, &block.statements))
            }
            _ => stmt::translate_stmt(self, &decl.body),
        };
        if let Err(err) = result {
            self.report(err);
        }

        if info.return_type.is_void() {
            self.emit(Instruction::Ret);
        } else if !always_returns(&decl.body) {
            self.report(TranslateError::new(
                TranslateErrorKind::MissingReturn(info.name.clone()),
                line,
            ));
        }
    }
}
