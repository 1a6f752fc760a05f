//! Quokka API - Compilation orchestration layer
//!
//! Provides unified compilation interface, including:
//! - Compilation flow orchestration
//! - Configuration abstraction (RunConfig)
//! - Unified error handling (QuokkaError)
//!
//! For CLI convenience, this crate provides a global singleton API.
//! For library use, prefer the explicit `compile_with_config(source, &config)` API.

use once_cell::sync::Lazy;
use tracing::{debug, info};

use quokka_core::bytecode::Emitter;
use quokka_core::compiler::lexer::tokenize;
use quokka_core::compiler::parser::Parser;
use quokka_core::{HostRegistry, HostTypeProvider, ProgramBuilder, TranslateFailure, Translator};

// Re-export config
pub mod config;
pub use config::{config as get_config, init as init_config, is_initialized, RunConfig};

// Re-export config types from quokka_config
pub use quokka_config::{CompilerConfig, LimitConfig, Phase};

// Re-export error and types
pub mod error;
pub mod types;
pub use error::{
    CompileFailure, EmitError, ErrorDetails, ErrorReport, LexerError, ParserError, QuokkaError,
    TranslateError,
};
pub use types::CompileOutput;

// Re-export core types
pub use quokka_config;
pub use quokka_core::{Instruction, Program};

static STANDARD_HOST: Lazy<HostRegistry> = Lazy::new(HostRegistry::standard);

/// 标准宿主类型注册表（首次使用时构建）
pub fn standard_host() -> &'static HostRegistry {
    &STANDARD_HOST
}

/// Compile with explicit configuration against the standard host registry
pub fn compile_with_config(
    source: &str,
    config: &RunConfig,
) -> Result<CompileOutput, CompileFailure> {
    compile_with_host(source, config, standard_host())
}

/// Compile with explicit configuration and host type provider
///
/// 词法与语法错误在整个文件范围内收集；只要存在任何一个，就不再进行翻译。
pub fn compile_with_host(
    source: &str,
    config: &RunConfig,
    host: &dyn HostTypeProvider,
) -> Result<CompileOutput, CompileFailure> {
    info!(
        target: "quokka::api",
        module = %config.module_name,
        bytes = source.len(),
        "Starting compilation"
    );

    let (tokens, lexer_errors) = tokenize(source);
    let (module, parser_errors) = Parser::with_limits(&tokens, &config.limits).parse();
    let errors: Vec<QuokkaError> = lexer_errors
        .into_iter()
        .map(QuokkaError::from)
        .chain(parser_errors.into_iter().map(QuokkaError::from))
        .collect();
    if !errors.is_empty() {
        debug!(
            target: "quokka::api",
            count = errors.len(),
            "Front-end errors, skipping translation"
        );
        return Err(errors.into());
    }

    let mut builder = ProgramBuilder::new(&config.module_name)
        .with_debug_info(config.compiler.emit_debug_info)
        .with_entry_point(&config.compiler.entry_point)
        .with_max_locals(config.limits.max_locals);
    let symbols = Translator::new(&config.module_name, host, &config.compiler, &config.limits)
        .translate(&module, &mut builder)
        .map_err(|failure| match failure {
            TranslateFailure::Semantic(errors) => errors
                .into_iter()
                .map(QuokkaError::from)
                .collect::<Vec<_>>()
                .into(),
            TranslateFailure::Emit(err) => CompileFailure::from(vec![QuokkaError::from(err)]),
        })?;
    let program = builder
        .finalize()
        .map_err(|err| CompileFailure::from(vec![QuokkaError::from(err)]))?;

    debug!(
        target: "quokka::api",
        functions = program.functions.len(),
        instructions = program
            .functions
            .iter()
            .map(|f| f.instructions.len())
            .sum::<usize>(),
        "Compilation completed"
    );
    info!(target: "quokka::api", "Compiler completed");

    Ok(CompileOutput { program, symbols })
}

// ==================== Convenience API (using global config) ====================

/// Compile source code (uses global config, default if never initialized)
pub fn compile(source: &str) -> Result<CompileOutput, CompileFailure> {
    compile_with_config(source, get_config())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quokka_core::compiler::parser::ParserErrorKind;
    use quokka_core::translator::TranslateErrorKind;

    const HELLO: &str = "import System;\n\
        func main() {\n\
        \x20   Console.WriteLine(\"Hello\");\n\
        }\n";

    #[test]
    fn test_compile_with_explicit_config() {
        let config = RunConfig::default().with_module_name("hello");
        let output = compile_with_config(HELLO, &config).unwrap();

        assert_eq!(output.program.module, "hello");
        let main = output.program.function("main").unwrap();
        assert_eq!(output.program.entry, Some(main.symbol));
        assert_eq!(main.instructions.last(), Some(&Instruction::Ret));
        // 调试信息：每条指令一行
        assert_eq!(main.lines.len(), main.instructions.len());
        assert_eq!(main.lines[0], 3);

        let root = output.symbols.root();
        assert_eq!(output.symbols.imports(root), vec!["System".to_string()]);
    }

    #[test]
    fn test_debug_info_can_be_disabled() {
        let mut config = RunConfig::default();
        config.compiler.emit_debug_info = false;
        let output = compile_with_config(HELLO, &config).unwrap();
        assert!(output.program.functions[0].lines.is_empty());
    }

    #[test]
    fn test_compile_uses_global_config() {
        let output = compile(HELLO).unwrap();
        assert_eq!(output.program.module, get_config().module_name);
    }

    #[test]
    fn test_front_end_errors_collected_together() {
        let source = "func main() {\n  let x: int = 1 # 2;\n}\nfunc f() { let = ; }";
        let failure = compile_with_config(source, &RunConfig::default()).unwrap_err();

        let phases: Vec<Phase> = failure.errors.iter().map(QuokkaError::phase).collect();
        assert_eq!(phases[0], Phase::Lexer);
        assert!(phases.contains(&Phase::Parser));
        // 前端出错时不进行翻译
        assert!(!phases.contains(&Phase::Translator));
        assert_eq!(failure.errors[0].line(), Some(2));
    }

    #[test]
    fn test_semantic_errors_aggregated() {
        let source = "func main() {\n  let a: int = b;\n  let c: bool = 1;\n}";
        let failure = compile_with_config(source, &RunConfig::default()).unwrap_err();

        assert_eq!(failure.errors.len(), 2);
        assert!(matches!(
            &failure.errors[0],
            QuokkaError::Translate(TranslateError {
                kind: TranslateErrorKind::UndefinedVariable(name),
                line: 2,
            }) if name == "b"
        ));
        assert_eq!(failure.errors[1].line(), Some(3));
        assert_eq!(failure.errors[1].to_report().error_kind, "AssignmentMismatch");
    }

    #[test]
    fn test_nesting_limit_covers_operator_chains() {
        let source = |terms: usize| {
            format!("func main() {{ let x: int = {}; }}", vec!["1"; terms].join(" * "))
        };
        let mut config = RunConfig::default();
        config.limits.max_nesting_depth = 64;

        assert!(compile_with_config(&source(40), &config).is_ok());

        let failure = compile_with_config(&source(1000), &config).unwrap_err();
        assert!(failure.errors.iter().any(|e| matches!(
            e,
            QuokkaError::Parser(err) if err.kind == ParserErrorKind::NestingTooDeep(64)
        )));
    }

    #[test]
    fn test_custom_host_provider() {
        // 空注册表中没有 System.Console
        let host = HostRegistry::new();
        let failure = compile_with_host(HELLO, &RunConfig::default(), &host).unwrap_err();
        assert_eq!(failure.errors.len(), 1);
        assert_eq!(failure.errors[0].phase(), Phase::Translator);
    }

    #[test]
    fn test_standard_host_is_shared() {
        assert!(std::ptr::eq(standard_host(), standard_host()));
        assert!(standard_host().contains("System.Console"));
    }
}
