//! 翻译器端到端测试：类型检查、符号表与槽位管理

mod common;
use common::{body, compile, parse, semantic_errors, translate_with};
use quokka_core::bytecode::{
    CallTarget, ConvKind, EmitError, Emitter, FunctionSymbol, Instruction, Slot,
};
use quokka_core::compiler::parser::{ParserErrorKind, StmtKind};
use quokka_core::translator::{TranslateErrorKind, TranslateFailure};
use quokka_core::{CompilerConfig, Type};

fn first_expression(code: &str) -> String {
    let (module, errors) = parse(&format!("func main() {{ x = {code}; }}"));
    assert!(errors.is_empty(), "parse errors: {errors:?}");
    let StmtKind::Function(func) = &module.statements[0].kind else {
        panic!("expected function");
    };
    let StmtKind::Block(block) = &func.body.kind else {
        panic!("expected block");
    };
    let StmtKind::Assign(assign) = &block.statements[0].kind else {
        panic!("expected assignment");
    };
    assign.value.to_string()
}

#[test]
fn test_precedence_and_associativity() {
    assert_eq!(first_expression("1 + 2 * 3"), "(1 + (2 * 3))");
    assert_eq!(first_expression("1 - 2 - 3"), "((1 - 2) - 3)");
    assert_eq!(first_expression("a || b && c == d"), "(a || (b && (c == d)))");
}

#[test]
fn test_chained_equality_is_a_syntax_error() {
    let (_, errors) = parse("func main() { x = a == b != c; }");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ParserErrorKind::ChainedEquality);

    let (_, errors) = parse("func main() { x = (a == b) != c; }");
    assert!(errors.is_empty());
}

#[test]
fn test_parser_recovers_and_collects_diagnostics() {
    let (module, errors) = parse(
        "func main() {
            let a: int = ;
            let b: int = 1;
            a = * 2;
        }
        func other() { }",
    );
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].line(), Some(2));
    assert_eq!(errors[1].line(), Some(4));
    assert!(matches!(module.statements[1].kind, StmtKind::Function(_)));
}

#[test]
fn test_type_mismatch_emits_no_body() {
    let (result, builder) = translate_with(
        "func main() { let x: int = 1 + 1.0; }",
        &CompilerConfig::default(),
    );
    let Err(TranslateFailure::Semantic(errors)) = result else {
        panic!("expected semantic errors");
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].kind,
        TranslateErrorKind::TypeMismatch {
            op: "+",
            left: Type::INT,
            right: Type::FLOAT,
        }
    );
    assert_eq!(errors[0].line, 1);
    assert!(matches!(
        builder.finalize(),
        Err(EmitError::MissingBody(name)) if name == "main"
    ));
}

#[test]
fn test_sibling_blocks_reuse_slots() {
    let program = compile(
        "func main() {
            { let a: int = 1; }
            { let b: int = 2; }
            { let c: string = \"x\"; }
        }",
    );
    let main = program.function("main").unwrap();
    assert_eq!(main.locals, vec![Type::INT, Type::STRING]);
    assert_eq!(
        main.instructions,
        vec![
            Instruction::LdcI4(1),
            Instruction::Stloc(Slot(0)),
            Instruction::LdcI4(2),
            Instruction::Stloc(Slot(0)),
            Instruction::LdStr("x".into()),
            Instruction::Stloc(Slot(1)),
            Instruction::LdNull,
            Instruction::Stloc(Slot(1)),
            Instruction::Ret,
        ]
    );
}

#[test]
fn test_branch_arms_reuse_slots() {
    let program = compile(
        "func main() {
            let c: bool = true;
            if (c) { let a: int = 1; } else if (!c) { let b: int = 2; } else { let d: int = 3; }
        }",
    );
    let main = program.function("main").unwrap();
    assert_eq!(main.locals, vec![Type::BOOL, Type::INT]);
    let stores: Vec<&Instruction> = main
        .instructions
        .iter()
        .filter(|i| matches!(i, Instruction::Stloc(_)))
        .collect();
    assert_eq!(
        stores,
        vec![
            &Instruction::Stloc(Slot(0)),
            &Instruction::Stloc(Slot(1)),
            &Instruction::Stloc(Slot(1)),
            &Instruction::Stloc(Slot(1)),
        ]
    );
}

#[test]
fn test_long_operator_chain() {
    let chain = |n: usize| vec!["1"; n].join(" + ");

    let program = compile(&format!("func main() {{ let x: int = {}; }}", chain(100)));
    let adds = body(&program, "main")
        .iter()
        .filter(|i| **i == Instruction::Add)
        .count();
    assert_eq!(adds, 99);

    let (_, errors) = parse(&format!("func main() {{ let x: int = {}; }}", chain(5000)));
    assert!(errors
        .iter()
        .any(|e| matches!(e.kind, ParserErrorKind::NestingTooDeep(256))));
}

#[test]
fn test_reference_slot_clearing_is_configurable() {
    let config = CompilerConfig {
        clear_released_references: false,
        ..CompilerConfig::default()
    };
    let program = common::compile_with("func main() { { let s: string = \"x\"; } }", &config);
    assert!(!body(&program, "main").contains(&Instruction::LdNull));
}

#[test]
fn test_variable_already_exists() {
    let errors = semantic_errors("func main() { let a: int; { let a: string; } }");
    assert_eq!(
        errors,
        vec![TranslateErrorKind::VariableAlreadyExists("a".into())]
    );
}

#[test]
fn test_generic_call_requires_type_arguments() {
    let generic = "func id<T>(x: T): T { return x; }\n";

    let errors = semantic_errors(&format!("{generic}func main() {{ let a: int = id(5); }}"));
    assert_eq!(errors, vec![TranslateErrorKind::IsGeneric("id".into())]);
    assert!(errors[0].to_string().contains("is generic"));

    let program = compile(&format!("{generic}func main() {{ let a: int = id<int>(5); }}"));
    assert!(body(&program, "main").contains(&Instruction::Call(CallTarget::Local {
        symbol: FunctionSymbol(0),
        type_args: vec![Type::INT],
    })));

    let errors = semantic_errors(&format!("{generic}func main() {{ let a: int = id<string>(5); }}"));
    assert!(matches!(
        errors[0],
        TranslateErrorKind::ArgumentMismatch { index: 0, .. }
    ));
}

#[test]
fn test_type_arguments_on_non_generic_rejected() {
    let errors = semantic_errors(
        "func one(): int { return 1; }\nfunc main() { let a: int = one<int>(); }",
    );
    assert_eq!(errors, vec![TranslateErrorKind::NotGeneric("one".into())]);
}

#[test]
fn test_forward_references() {
    let program = compile(
        "func main() { let x: int = twice(2); }
        func twice(n: int): int { return n * 2; }",
    );
    assert!(body(&program, "main").contains(&Instruction::Call(CallTarget::Local {
        symbol: FunctionSymbol(1),
        type_args: Vec::new(),
    })));
}

#[test]
fn test_undefined_function_and_arity() {
    let errors = semantic_errors("func f(a: int) { }\nfunc main() { f(); g(); }");
    assert_eq!(
        errors,
        vec![
            TranslateErrorKind::WrongArity {
                name: "f".into(),
                expected: 1,
                found: 0,
            },
            TranslateErrorKind::UndefinedFunction("g".into()),
        ]
    );
}

#[test]
fn test_return_checks() {
    let errors = semantic_errors("func f(): int { return true; }");
    assert_eq!(
        errors,
        vec![TranslateErrorKind::ReturnMismatch {
            expected: Type::INT,
            found: Type::BOOL,
        }]
    );

    let errors = semantic_errors("func f() { return 1; }");
    assert!(matches!(errors[0], TranslateErrorKind::ReturnMismatch { .. }));

    let errors = semantic_errors("func f(): int { return; }");
    assert!(matches!(errors[0], TranslateErrorKind::ReturnMismatch { .. }));
}

#[test]
fn test_max_diagnostics_stops_translation() {
    let config = CompilerConfig {
        max_diagnostics: 2,
        ..CompilerConfig::default()
    };
    let (result, _) = translate_with("func main() { a = 1; b = 2; c = 3; d = 4; }", &config);
    let Err(TranslateFailure::Semantic(errors)) = result else {
        panic!("expected semantic errors");
    };
    assert_eq!(errors.len(), 2);
}

#[test]
fn test_void_and_undefined_types() {
    let errors = semantic_errors("func main() { let v: void; let n: Nope; }");
    assert_eq!(
        errors,
        vec![
            TranslateErrorKind::VoidVariable("v".into()),
            TranslateErrorKind::UndefinedType("Nope".into()),
        ]
    );
}

#[test]
fn test_arguments_are_copied_to_locals() {
    let program = compile("func add(a: int, b: int): int { return a + b; }");
    assert_eq!(
        body(&program, "add"),
        &[
            Instruction::Ldarg(0),
            Instruction::Stloc(Slot(0)),
            Instruction::Ldarg(1),
            Instruction::Stloc(Slot(1)),
            Instruction::Ldloc(Slot(0)),
            Instruction::Ldloc(Slot(1)),
            Instruction::Add,
            Instruction::Ret,
        ]
    );
}

#[test]
fn test_ambiguous_cast() {
    let errors = semantic_errors("func main() { let t: int = 1; let y: int = (t) 2; }");
    assert_eq!(errors, vec![TranslateErrorKind::AmbiguousCast("t".into())]);
}

#[test]
fn test_constant_conversions() {
    let program = compile(
        "func main() { let a: byte = 5ub; let b: long = 7l; let c: uint = 3u; let d: char = 'a'; }",
    );
    let main = body(&program, "main");
    assert_eq!(main[0], Instruction::LdcI4(5));
    assert_eq!(main[1], Instruction::Conv(ConvKind::U1));
    assert!(main.contains(&Instruction::LdcI8(7)));
    assert!(main.contains(&Instruction::Conv(ConvKind::U4)));
    assert!(main.contains(&Instruction::LdcI4('a' as i32)));
    assert!(main.contains(&Instruction::Conv(ConvKind::U2)));
}

#[test]
fn test_expression_results_are_popped() {
    let program = compile("func one(): int { return 1; }\nfunc main() { one(); }");
    let main = body(&program, "main");
    assert_eq!(main[1], Instruction::Pop);
    assert!(matches!(main[0], Instruction::Call(_)));
}
