//! 翻译器：符号登记（第一遍）+ 类型检查与代码生成（第二遍）
//!
//! 宿主类型信息经注入的 [`HostTypeProvider`] 查询，指令经 [`Emitter`] 输出。

pub mod codegen;
pub mod context;
pub mod error;
pub mod resolver;
pub mod scope;
pub mod symbols;

pub use codegen::CodeGen;
pub use context::{LoopLabels, TranslationContext};
pub use error::{TranslateError, TranslateErrorKind, TranslateFailure, TranslateResult};
pub use resolver::{Coercion, Member, MemberTarget, TypeResolver};
pub use scope::{Variable, VariableTable};
pub use symbols::{FunctionInfo, LookupError, ModuleId, ModuleTable};

use crate::bytecode::{EmitError, Emitter};
use crate::compiler::parser::stmt::FunctionDecl;
use crate::compiler::parser::{Module, StmtKind};
use crate::host::HostTypeProvider;
use crate::types::Type;
use quokka_config::{CompilerConfig, LimitConfig};
use std::collections::HashMap;
use tracing::{debug, info};

/// 一个翻译单元的翻译器
pub struct Translator<'a> {
    host: &'a dyn HostTypeProvider,
    config: &'a CompilerConfig,
    limits: &'a LimitConfig,
    symbols: ModuleTable,
    errors: Vec<TranslateError>,
}

impl<'a> Translator<'a> {
    pub fn new(
        module_name: impl Into<String>,
        host: &'a dyn HostTypeProvider,
        config: &'a CompilerConfig,
        limits: &'a LimitConfig,
    ) -> Self {
        Self {
            host,
            config,
            limits,
            symbols: ModuleTable::new(module_name),
            errors: Vec::new(),
        }
    }

    fn report(&mut self, err: TranslateError) {
        debug!(target: "quokka::translator", error = %err, "Semantic error");
        self.errors.push(err);
    }

    fn diagnostics_full(&self) -> bool {
        self.errors.len() >= self.config.max_diagnostics
    }

    /// 翻译整个模块
    ///
    /// 语义错误在所有函数翻译完后一起返回；发射器错误立即终止。
    pub fn translate(
        mut self,
        module: &Module,
        emitter: &mut dyn Emitter,
    ) -> Result<ModuleTable, TranslateFailure> {
        let root = self.symbols.root();
        info!(
            target: "quokka::translator",
            module = %self.symbols.full_name(root),
            statements = module.statements.len(),
            "Translating module"
        );

        // 导入与非法的顶层语句
        for stmt in &module.statements {
            let kind = match &stmt.kind {
                StmtKind::Import(import) => {
                    self.symbols.add_import(root, import.path.clone());
                    continue;
                }
                StmtKind::Function(_) => continue,
                StmtKind::Break => TranslateErrorKind::NoEnclosingLoop("break"),
                StmtKind::Continue => TranslateErrorKind::NoEnclosingLoop("continue"),
                _ => TranslateErrorKind::StatementOutsideFunction,
            };
            self.report(TranslateError::new(kind, stmt.line));
        }

        // 第一遍：登记函数签名
        let mut declared = Vec::new();
        for stmt in &module.statements {
            if let StmtKind::Function(decl) = &stmt.kind {
                if self.declare_function(decl, stmt.line, emitter)? {
                    declared.push((decl, stmt.line));
                }
            }
        }

        // 第二遍：逐个生成函数体
        for (decl, line) in declared {
            if self.diagnostics_full() {
                debug!(target: "quokka::translator", "Diagnostic limit reached");
                break;
            }
            self.translate_body(decl, line, emitter)?;
        }

        if self.errors.is_empty() {
            info!(target: "quokka::translator", "Translation finished");
            Ok(self.symbols)
        } else {
            self.errors.truncate(self.config.max_diagnostics);
            Err(TranslateFailure::Semantic(self.errors))
        }
    }

    /// 解析签名并预留发射器句柄；签名有误时返回 `false`
    fn declare_function(
        &mut self,
        decl: &FunctionDecl,
        line: usize,
        emitter: &mut dyn Emitter,
    ) -> Result<bool, EmitError> {
        let root = self.symbols.root();
        if self.symbols.contains_function(root, &decl.name) {
            self.report(TranslateError::new(
                TranslateErrorKind::DuplicateFunction(decl.name.clone()),
                line,
            ));
            return Ok(false);
        }

        let generics: Vec<(String, Type)> = decl
            .generics
            .iter()
            .enumerate()
            .map(|(index, name)| {
                (
                    name.clone(),
                    Type::Generic {
                        index,
                        name: name.clone(),
                    },
                )
            })
            .collect();
        let ctx = TranslationContext::new(
            &decl.name,
            Type::VOID,
            generics.iter().cloned().collect::<HashMap<_, _>>(),
            self.limits.max_locals,
        );
        let resolver = TypeResolver::new(self.host, &self.symbols, root, &ctx);
        let params = decl
            .args
            .iter()
            .map(|(_, type_name)| resolver.resolve_type(type_name, line))
            .collect::<TranslateResult<Vec<_>>>();
        let return_type = resolver.resolve_type(&decl.return_type, line);
        let (params, return_type) = match (params, return_type) {
            (Ok(params), Ok(return_type)) => (params, return_type),
            (Err(err), _) | (_, Err(err)) => {
                self.report(err);
                return Ok(false);
            }
        };

        let symbol = emitter.declare_function(&decl.name, &params, &return_type, &decl.generics)?;
        debug!(
            target: "quokka::translator",
            name = %decl.name,
            symbol = symbol.0,
            "Declared function"
        );
        self.symbols.add_function(
            root,
            FunctionInfo {
                name: decl.name.clone(),
                return_type_name: decl.return_type.clone(),
                args: decl.args.clone(),
                generics,
                params,
                return_type,
                symbol,
                line,
            },
        );
        Ok(true)
    }

    /// 生成函数体；存在语义错误时放弃该函数体
    fn translate_body(
        &mut self,
        decl: &FunctionDecl,
        line: usize,
        emitter: &mut dyn Emitter,
    ) -> Result<(), EmitError> {
        let root = self.symbols.root();
        let Ok(info) = self.symbols.find_function(root, &decl.name, None) else {
            return Ok(());
        };
        let info = info.clone();

        emitter.begin_body(info.symbol)?;
        let ctx = TranslationContext::new(
            &info.name,
            info.return_type.clone(),
            info.generic_map(),
            self.limits.max_locals,
        );
        let before = self.errors.len();
        CodeGen::new(
            self.host,
            &self.symbols,
            root,
            self.config,
            &mut *emitter,
            ctx,
            &mut self.errors,
        )
        .translate_function(&info, decl, line);

        if self.errors.len() > before {
            emitter.abandon_body();
            Ok(())
        } else {
            emitter.end_body()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::{Instruction, ProgramBuilder};
    use crate::compiler::lexer::tokenize;
    use crate::compiler::parser::Parser;
    use crate::host::HostRegistry;

    fn translate_source(source: &str) -> (Result<ModuleTable, TranslateFailure>, ProgramBuilder) {
        let (tokens, errors) = tokenize(source);
        assert!(errors.is_empty(), "{errors:?}");
        let (module, errors) = Parser::new(&tokens).parse();
        assert!(errors.is_empty(), "{errors:?}");
        let host = HostRegistry::standard();
        let config = CompilerConfig::default();
        let limits = LimitConfig::default();
        let mut builder = ProgramBuilder::new("test");
        let result = Translator::new("test", &host, &config, &limits).translate(&module, &mut builder);
        (result, builder)
    }

    fn semantic_errors(source: &str) -> Vec<TranslateErrorKind> {
        match translate_source(source).0 {
            Err(TranslateFailure::Semantic(errors)) => errors.into_iter().map(|e| e.kind).collect(),
            other => panic!("expected semantic errors, got {other:?}"),
        }
    }

    #[test]
    fn test_translate_registers_functions() {
        let (result, builder) = translate_source(
            "import System;\nfunc add(a: int, b: int): int { return a + b; }\nfunc main(): void { Console.WriteLine(add(1, 2)); }",
        );
        let symbols = result.unwrap();
        let root = symbols.root();
        assert_eq!(symbols.imports(root), vec!["System".to_string()]);
        assert!(symbols.find_function(root, "add", Some(2)).is_ok());

        let program = builder.finalize().unwrap();
        let add = program.function("add").unwrap();
        assert_eq!(add.instructions.last(), Some(&Instruction::Ret));
        assert!(add.instructions.contains(&Instruction::Add));
    }

    #[test]
    fn test_duplicate_function() {
        let errors = semantic_errors("func f(): void { }\nfunc f(): void { }");
        assert_eq!(errors, vec![TranslateErrorKind::DuplicateFunction("f".into())]);
    }

    #[test]
    fn test_top_level_statements_rejected() {
        let errors = semantic_errors("let x: int;\nbreak;\ncontinue;");
        assert_eq!(
            errors,
            vec![
                TranslateErrorKind::StatementOutsideFunction,
                TranslateErrorKind::NoEnclosingLoop("break"),
                TranslateErrorKind::NoEnclosingLoop("continue"),
            ]
        );
    }

    #[test]
    fn test_missing_return() {
        let errors = semantic_errors("func f(x: int): int { if (x > 0) { return 1; } }");
        assert_eq!(errors, vec![TranslateErrorKind::MissingReturn("f".into())]);

        let (result, _) =
            translate_source("func f(x: int): int { if (x > 0) { return 1; } else { return 2; } }");
        assert!(result.is_ok());
    }

    #[test]
    fn test_errors_in_one_function_keep_others() {
        let (result, builder) = translate_source(
            "func bad(): void { let x: int = true; }\nfunc good(): int { return 1; }",
        );
        let Err(TranslateFailure::Semantic(errors)) = result else {
            panic!("expected semantic errors");
        };
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0].kind,
            TranslateErrorKind::AssignmentMismatch { .. }
        ));
        // 出错的函数没有函数体
        assert!(matches!(
            builder.finalize(),
            Err(EmitError::MissingBody(name)) if name == "bad"
        ));
    }
}
