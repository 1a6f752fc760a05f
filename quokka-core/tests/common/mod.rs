//! 测试辅助工具
//!
//! 提供端到端翻译测试的辅助函数

#![allow(dead_code)]

use quokka_core::bytecode::{
    CallTarget, Emitter, FunctionBody, Instruction, MethodRef, Program, ProgramBuilder,
};
use quokka_core::compiler::lexer::tokenize;
use quokka_core::compiler::parser::{Module, Parser, ParserError};
use quokka_core::host::HostRegistry;
use quokka_core::translator::{TranslateErrorKind, TranslateFailure, Translator};
use quokka_core::{CompilerConfig, LimitConfig, Type};

/// 词法 + 语法分析，词法错误直接失败
pub fn parse(code: &str) -> (Module, Vec<ParserError>) {
    let (tokens, errors) = tokenize(code);
    assert!(errors.is_empty(), "lexer errors: {errors:?}");
    Parser::new(&tokens).parse()
}

/// 翻译源码，返回翻译结果与发射器（用于检查函数体是否生成）
pub fn translate_with(
    code: &str,
    config: &CompilerConfig,
) -> (Result<(), TranslateFailure>, ProgramBuilder) {
    let (module, errors) = parse(code);
    assert!(errors.is_empty(), "parse errors: {errors:?}");
    let host = HostRegistry::standard();
    let limits = LimitConfig::default();
    let mut builder = ProgramBuilder::new("test").with_debug_info(false);
    let result = Translator::new("test", &host, config, &limits)
        .translate(&module, &mut builder)
        .map(|_| ());
    (result, builder)
}

/// 翻译并生成程序，任何错误都视为测试失败
///
/// # Example
/// ```
/// let program = compile("func main() { }");
/// assert!(program.function("main").is_some());
/// ```
pub fn compile(code: &str) -> Program {
    compile_with(code, &CompilerConfig::default())
}

pub fn compile_with(code: &str, config: &CompilerConfig) -> Program {
    let (result, builder) = translate_with(code, config);
    if let Err(failure) = result {
        panic!("translation failed: {failure:?}");
    }
    builder.finalize().expect("finalize failed")
}

/// 只取语义错误
pub fn semantic_errors(code: &str) -> Vec<TranslateErrorKind> {
    match translate_with(code, &CompilerConfig::default()).0 {
        Err(TranslateFailure::Semantic(errors)) => errors.into_iter().map(|e| e.kind).collect(),
        other => panic!("expected semantic errors, got {other:?}"),
    }
}

pub fn body<'a>(program: &'a Program, name: &str) -> &'a [Instruction] {
    &program
        .function(name)
        .unwrap_or_else(|| panic!("function '{name}' not found"))
        .instructions
}

/// 指令文本，跳转目标替换为指令下标，便于比较控制流结构
pub fn topology(function: &FunctionBody) -> Vec<String> {
    let target = |label| {
        function
            .label_offset(label)
            .expect("label must be resolved")
    };
    function
        .instructions
        .iter()
        .map(|instruction| match instruction {
            Instruction::Br(label) => format!("br @{}", target(*label)),
            Instruction::Brfalse(label) => format!("brfalse @{}", target(*label)),
            Instruction::Brtrue(label) => format!("brtrue @{}", target(*label)),
            other => other.to_string(),
        })
        .collect()
}

/// 宿主方法调用指令
pub fn host_call(owner: Type, name: &str, params: Vec<Type>, return_type: Type) -> Instruction {
    Instruction::Call(CallTarget::Host(MethodRef {
        owner,
        name: name.to_string(),
        params,
        return_type,
        type_args: Vec::new(),
    }))
}
