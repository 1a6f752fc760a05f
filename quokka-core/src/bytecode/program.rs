//! 内存中的程序构建器与最终产物

use super::emitter::{EmitError, Emitter};
use super::instruction::{FunctionSymbol, Instruction, Label, Slot};
use crate::types::Type;
use serde::Serialize;
use std::fmt::Write as _;
use tracing::{debug, trace};

/// 已生成的函数
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionBody {
    pub symbol: FunctionSymbol,
    pub name: String,
    pub params: Vec<Type>,
    pub return_type: Type,
    pub generics: Vec<String>,
    /// 槽位类型，下标即槽位号
    pub locals: Vec<Type>,
    /// 标签对应的指令下标，下标即标签号
    pub labels: Vec<usize>,
    pub instructions: Vec<Instruction>,
    /// 每条指令对应的源码行（未开启调试信息时为空）
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<usize>,
}

impl FunctionBody {
    /// 标签解析后的目标下标
    pub fn label_offset(&self, label: Label) -> Option<usize> {
        self.labels.get(label.0 as usize).copied()
    }
}

/// 最终程序
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub module: String,
    pub entry: Option<FunctionSymbol>,
    pub functions: Vec<FunctionBody>,
}

impl Program {
    pub fn function(&self, name: &str) -> Option<&FunctionBody> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// 文本反汇编
    pub fn disassemble(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, ".module {}", self.module);
        for function in &self.functions {
            let params = function
                .params
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            let entry = if self.entry == Some(function.symbol) {
                " .entrypoint"
            } else {
                ""
            };
            let _ = writeln!(
                out,
                "\n.func #{} {} {}({}){}",
                function.symbol.0, function.return_type, function.name, params, entry
            );
            for (slot, ty) in function.locals.iter().enumerate() {
                let _ = writeln!(out, "  .local {slot}: {ty}");
            }
            for (offset, instruction) in function.instructions.iter().enumerate() {
                for (label, _) in function
                    .labels
                    .iter()
                    .enumerate()
                    .filter(|(_, target)| **target == offset)
                {
                    let _ = writeln!(out, "L{label}:");
                }
                let _ = writeln!(out, "  {offset:04}  {instruction}");
            }
            let end = function.instructions.len();
            for (label, _) in function
                .labels
                .iter()
                .enumerate()
                .filter(|(_, target)| **target == end)
            {
                let _ = writeln!(out, "L{label}:");
            }
        }
        out
    }
}

/// 函数声明（函数体生成前）
#[derive(Debug, Clone)]
struct Declaration {
    name: String,
    params: Vec<Type>,
    return_type: Type,
    generics: Vec<String>,
}

/// 正在生成的函数体
#[derive(Debug)]
struct OpenBody {
    symbol: FunctionSymbol,
    locals: Vec<Type>,
    labels: Vec<Option<usize>>,
    instructions: Vec<Instruction>,
    lines: Vec<usize>,
}

/// 内存中的 [`Emitter`] 实现
#[derive(Debug)]
pub struct ProgramBuilder {
    module: String,
    emit_debug_info: bool,
    entry_point: Option<String>,
    max_locals: usize,
    declarations: Vec<Declaration>,
    bodies: Vec<Option<FunctionBody>>,
    open: Option<OpenBody>,
    line: usize,
    /// 误用记录，在 end_body/finalize 时报告
    faults: Vec<EmitError>,
}

impl ProgramBuilder {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            emit_debug_info: true,
            entry_point: None,
            max_locals: u16::MAX as usize,
            declarations: Vec::new(),
            bodies: Vec::new(),
            open: None,
            line: 0,
            faults: Vec::new(),
        }
    }

    pub fn with_debug_info(mut self, enabled: bool) -> Self {
        self.emit_debug_info = enabled;
        self
    }

    pub fn with_entry_point(mut self, name: impl Into<String>) -> Self {
        self.entry_point = Some(name.into());
        self
    }

    pub fn with_max_locals(mut self, max_locals: usize) -> Self {
        self.max_locals = max_locals.min(u16::MAX as usize);
        self
    }

    fn open_name(&self) -> String {
        self.open
            .as_ref()
            .and_then(|body| self.declarations.get(body.symbol.0 as usize))
            .map(|decl| decl.name.clone())
            .unwrap_or_default()
    }

    fn fault(&mut self, err: EmitError) {
        debug!(target: "quokka::emitter", error = %err, "Emitter fault");
        self.faults.push(err);
    }

    fn take_fault(&mut self) -> Result<(), EmitError> {
        if self.faults.is_empty() {
            Ok(())
        } else {
            Err(self.faults.remove(0))
        }
    }
}

impl Emitter for ProgramBuilder {
    fn declare_function(
        &mut self,
        name: &str,
        params: &[Type],
        return_type: &Type,
        generics: &[String],
    ) -> Result<FunctionSymbol, EmitError> {
        if self.declarations.iter().any(|decl| decl.name == name) {
            return Err(EmitError::DuplicateFunction(name.to_string()));
        }
        let symbol = FunctionSymbol(self.declarations.len() as u32);
        self.declarations.push(Declaration {
            name: name.to_string(),
            params: params.to_vec(),
            return_type: return_type.clone(),
            generics: generics.to_vec(),
        });
        self.bodies.push(None);
        trace!(target: "quokka::emitter", name, symbol = symbol.0, "Declared function");
        Ok(symbol)
    }

    fn begin_body(&mut self, symbol: FunctionSymbol) -> Result<(), EmitError> {
        if self.open.is_some() {
            return Err(EmitError::BodyAlreadyOpen(self.open_name()));
        }
        let declaration = self
            .declarations
            .get(symbol.0 as usize)
            .ok_or(EmitError::UnknownFunction(symbol))?;
        if self.bodies[symbol.0 as usize].is_some() {
            return Err(EmitError::BodyAlreadyEmitted(declaration.name.clone()));
        }
        self.open = Some(OpenBody {
            symbol,
            locals: Vec::new(),
            labels: Vec::new(),
            instructions: Vec::new(),
            lines: Vec::new(),
        });
        Ok(())
    }

    fn emit(&mut self, instruction: Instruction) {
        let line = self.line;
        let debug_info = self.emit_debug_info;
        match self.open.as_mut() {
            Some(body) => {
                trace!(target: "quokka::emitter", %instruction, "Emit");
                body.instructions.push(instruction);
                if debug_info {
                    body.lines.push(line);
                }
            }
            None => self.fault(EmitError::NoOpenBody("emit")),
        }
    }

    fn define_label(&mut self) -> Label {
        match self.open.as_mut() {
            Some(body) => {
                body.labels.push(None);
                Label((body.labels.len() - 1) as u32)
            }
            None => {
                self.fault(EmitError::NoOpenBody("define_label"));
                Label(0)
            }
        }
    }

    fn mark_label(&mut self, label: Label) {
        let function = self.open_name();
        let fault = match self.open.as_mut() {
            None => Some(EmitError::NoOpenBody("mark_label")),
            Some(body) => {
                let offset = body.instructions.len();
                match body.labels.get_mut(label.0 as usize) {
                    Some(slot @ None) => {
                        *slot = Some(offset);
                        None
                    }
                    Some(Some(_)) => Some(EmitError::LabelMarkedTwice { function, label }),
                    None => Some(EmitError::UnknownLabel { function, label }),
                }
            }
        };
        if let Some(err) = fault {
            self.fault(err);
        }
    }

    fn declare_local(&mut self, ty: &Type) -> Slot {
        let function = self.open_name();
        let max_locals = self.max_locals;
        let result = match self.open.as_mut() {
            None => Err(EmitError::NoOpenBody("declare_local")),
            Some(body) if body.locals.len() >= max_locals => {
                Err(EmitError::TooManyLocals(function))
            }
            Some(body) => {
                body.locals.push(ty.clone());
                Ok(Slot((body.locals.len() - 1) as u16))
            }
        };
        result.unwrap_or_else(|err| {
            self.fault(err);
            Slot(0)
        })
    }

    fn set_line(&mut self, line: usize) {
        self.line = line;
    }

    fn end_body(&mut self) -> Result<(), EmitError> {
        let function = self.open_name();
        let body = self.open.take().ok_or(EmitError::NoOpenBody("end_body"))?;
        self.take_fault()?;

        let mut labels = Vec::with_capacity(body.labels.len());
        for (index, offset) in body.labels.iter().enumerate() {
            match offset {
                Some(offset) => labels.push(*offset),
                None => {
                    return Err(EmitError::UnmarkedLabel {
                        function,
                        label: Label(index as u32),
                    })
                }
            }
        }

        let declaration = &self.declarations[body.symbol.0 as usize];
        debug!(
            target: "quokka::emitter",
            function = %declaration.name,
            instructions = body.instructions.len(),
            locals = body.locals.len(),
            "Function body finished"
        );
        self.bodies[body.symbol.0 as usize] = Some(FunctionBody {
            symbol: body.symbol,
            name: declaration.name.clone(),
            params: declaration.params.clone(),
            return_type: declaration.return_type.clone(),
            generics: declaration.generics.clone(),
            locals: body.locals,
            labels,
            instructions: body.instructions,
            lines: body.lines,
        });
        Ok(())
    }

    fn abandon_body(&mut self) {
        if let Some(body) = self.open.take() {
            debug!(
                target: "quokka::emitter",
                symbol = body.symbol.0,
                "Function body abandoned"
            );
        }
        self.faults.clear();
    }

    fn finalize(mut self) -> Result<Program, EmitError> {
        if self.open.is_some() {
            return Err(EmitError::BodyAlreadyOpen(self.open_name()));
        }
        self.take_fault()?;

        let mut functions = Vec::with_capacity(self.bodies.len());
        for (declaration, body) in self.declarations.iter().zip(self.bodies) {
            functions.push(body.ok_or_else(|| EmitError::MissingBody(declaration.name.clone()))?);
        }
        let entry = self.entry_point.as_ref().and_then(|entry| {
            functions
                .iter()
                .find(|f| &f.name == entry)
                .map(|f| f.symbol)
        });
        Ok(Program {
            module: self.module,
            entry,
            functions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder_with_main() -> (ProgramBuilder, FunctionSymbol) {
        let mut builder = ProgramBuilder::new("test").with_entry_point("main");
        let symbol = builder
            .declare_function("main", &[], &Type::VOID, &[])
            .unwrap();
        (builder, symbol)
    }

    #[test]
    fn test_build_simple_program() {
        let (mut builder, symbol) = builder_with_main();
        builder.begin_body(symbol).unwrap();
        builder.set_line(3);
        let slot = builder.declare_local(&Type::INT);
        builder.emit(Instruction::LdcI4(1));
        builder.emit(Instruction::Stloc(slot));
        builder.emit(Instruction::Ret);
        builder.end_body().unwrap();

        let program = builder.finalize().unwrap();
        assert_eq!(program.entry, Some(symbol));
        let main = program.function("main").unwrap();
        assert_eq!(main.locals, vec![Type::INT]);
        assert_eq!(main.lines, vec![3, 3, 3]);
        assert!(program.disassemble().contains("0001  stloc 0"));
    }

    #[test]
    fn test_program_serializes_to_json() {
        let (mut builder, symbol) = builder_with_main();
        builder.begin_body(symbol).unwrap();
        let slot = builder.declare_local(&Type::INT);
        builder.emit(Instruction::LdcI4(7));
        builder.emit(Instruction::Stloc(slot));
        builder.emit(Instruction::Ret);
        builder.end_body().unwrap();
        let program = builder.finalize().unwrap();

        let json = serde_json::to_value(&program).unwrap();
        assert_eq!(json["module"], "test");
        let main = &json["functions"][0];
        assert_eq!(main["name"], "main");
        assert_eq!(main["instructions"][0], serde_json::json!({"op": "LdcI4", "arg": 7}));
        assert_eq!(main["instructions"][1], serde_json::json!({"op": "Stloc", "arg": 0}));
        assert_eq!(main["instructions"][2], serde_json::json!({"op": "Ret"}));
    }

    #[test]
    fn test_labels_resolve_to_offsets() {
        let (mut builder, symbol) = builder_with_main();
        builder.begin_body(symbol).unwrap();
        let end = builder.define_label();
        builder.emit(Instruction::Br(end));
        builder.emit(Instruction::LdNull);
        builder.emit(Instruction::Pop);
        builder.mark_label(end);
        builder.emit(Instruction::Ret);
        builder.end_body().unwrap();
        let program = builder.finalize().unwrap();
        assert_eq!(program.functions[0].label_offset(end), Some(3));
    }

    #[test]
    fn test_unmarked_label_is_an_error() {
        let (mut builder, symbol) = builder_with_main();
        builder.begin_body(symbol).unwrap();
        let label = builder.define_label();
        builder.emit(Instruction::Br(label));
        assert!(matches!(
            builder.end_body(),
            Err(EmitError::UnmarkedLabel { .. })
        ));
    }

    #[test]
    fn test_misuse_is_reported() {
        let (mut builder, symbol) = builder_with_main();
        builder.emit(Instruction::Ret);
        builder.begin_body(symbol).unwrap();
        assert!(matches!(builder.begin_body(symbol), Err(EmitError::BodyAlreadyOpen(_))));
        assert_eq!(
            builder.end_body(),
            Err(EmitError::NoOpenBody("emit"))
        );
    }

    #[test]
    fn test_missing_body_and_duplicates() {
        let (mut builder, _) = builder_with_main();
        assert_eq!(
            builder.declare_function("main", &[], &Type::VOID, &[]),
            Err(EmitError::DuplicateFunction("main".into()))
        );
        assert_eq!(
            builder.finalize(),
            Err(EmitError::MissingBody("main".into()))
        );
    }

    #[test]
    fn test_abandoned_body_is_missing() {
        let (mut builder, symbol) = builder_with_main();
        builder.begin_body(symbol).unwrap();
        let label = builder.define_label();
        builder.emit(Instruction::Br(label));
        builder.abandon_body();
        assert!(builder.begin_body(symbol).is_ok());
        builder.abandon_body();
        assert_eq!(builder.finalize(), Err(EmitError::MissingBody("main".into())));
    }

    #[test]
    fn test_debug_info_can_be_disabled() {
        let mut builder = ProgramBuilder::new("test").with_debug_info(false);
        let symbol = builder.declare_function("f", &[], &Type::VOID, &[]).unwrap();
        builder.begin_body(symbol).unwrap();
        builder.emit(Instruction::Ret);
        builder.end_body().unwrap();
        let program = builder.finalize().unwrap();
        assert!(program.functions[0].lines.is_empty());
        assert_eq!(program.entry, None);
    }
}
