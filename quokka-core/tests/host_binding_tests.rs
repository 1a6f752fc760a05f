//! 宿主类型绑定测试：重载决议、成员访问、接收者与转换

mod common;
use common::{body, compile, host_call, semantic_errors};
use quokka_core::bytecode::{CallTarget, ConvKind, Instruction, MethodRef, Slot};
use quokka_core::translator::TranslateErrorKind;
use quokka_core::Type;

fn date() -> Type {
    Type::host("System.DateTime")
}

#[test]
fn test_overload_exact_before_compatible() {
    let program = compile(
        "import System;
        func main() {
            Console.WriteLine(1);
            Console.WriteLine(Math.Sqrt(4));
            Console.WriteLine(DateTime.Now);
        }",
    );
    let console = || Type::host("System.Console");
    assert_eq!(
        body(&program, "main"),
        &[
            Instruction::LdcI4(1),
            host_call(console(), "WriteLine", vec![Type::INT], Type::VOID),
            Instruction::LdcI4(4),
            Instruction::Conv(ConvKind::R8),
            host_call(
                Type::host("System.Math"),
                "Sqrt",
                vec![Type::DOUBLE],
                Type::DOUBLE
            ),
            host_call(console(), "WriteLine", vec![Type::DOUBLE], Type::VOID),
            host_call(date(), "get_Now", vec![], date()),
            Instruction::Box(date()),
            host_call(console(), "WriteLine", vec![Type::OBJECT], Type::VOID),
            Instruction::Ret,
        ]
    );
}

#[test]
fn test_overload_prefers_widening_over_narrowing() {
    let program = compile(
        "import System;
        func main() {
            let x: double = Math.Abs(1.5f);
        }",
    );
    let math = || Type::host("System.Math");
    let instructions = body(&program, "main");
    assert_eq!(
        &instructions[..3],
        &[
            Instruction::LdcR4(1.5),
            Instruction::Conv(ConvKind::R8),
            host_call(math(), "Abs", vec![Type::DOUBLE], Type::DOUBLE),
        ][..]
    );
    assert!(!instructions.contains(&Instruction::Conv(ConvKind::I4)));
}

#[test]
fn test_locals_shadow_types() {
    let program = compile(
        "import System;
        func main() {
            let Math: int = 3;
            let y: int = Math + 1;
            let Console: string = \"hi\";
            let n: int = Console.Length;
        }",
    );
    let main = body(&program, "main");
    assert!(main.contains(&Instruction::Add));
    assert!(main.contains(&host_call(Type::STRING, "get_Length", vec![], Type::INT)));

    // 没有同名局部变量时按类型解析
    let errors = semantic_errors("import System;\nfunc main() { let m: int = Math; }");
    assert_eq!(
        errors,
        vec![TranslateErrorKind::TypeUsedAsValue(Type::host("System.Math"))]
    );
}

#[test]
fn test_string_concat_and_equality() {
    let program = compile(
        "func greet(name: string): string { return \"Hi \" + name; }
        func same(a: string, b: string): bool { return a == b; }",
    );
    assert!(body(&program, "greet").contains(&host_call(
        Type::STRING,
        "Concat",
        vec![Type::STRING, Type::STRING],
        Type::STRING
    )));
    assert!(body(&program, "same").contains(&host_call(
        Type::STRING,
        "op_Equality",
        vec![Type::STRING, Type::STRING],
        Type::BOOL
    )));
}

#[test]
fn test_value_type_receivers() {
    let program = compile(
        "import System;
        func main() {
            let d: DateTime = new DateTime(2020, 1, 2);
            let y: int = d.Year;
            let s: string = DateTime.Now.ToString();
        }",
    );
    let main = body(&program, "main");
    assert_eq!(
        &main[..8],
        &[
            Instruction::LdcI4(2020),
            Instruction::LdcI4(1),
            Instruction::LdcI4(2),
            Instruction::NewObj(MethodRef {
                owner: date(),
                name: ".ctor".into(),
                params: vec![Type::INT; 3],
                return_type: Type::VOID,
                type_args: vec![],
            }),
            Instruction::Stloc(Slot(0)),
            Instruction::Ldloca(Slot(0)),
            host_call(date(), "get_Year", vec![], Type::INT),
            Instruction::Stloc(Slot(1)),
        ]
    );
    assert_eq!(main[9], Instruction::Box(date()));
    assert_eq!(main[10], host_call(date(), "ToString", vec![], Type::STRING));
}

#[test]
fn test_virtual_call_on_reference() {
    let program = compile(
        "func main() { let o: object = \"x\"; let s: string = o.ToString(); }",
    );
    let main = body(&program, "main");
    assert!(main.contains(&Instruction::CallVirt(MethodRef {
        owner: Type::OBJECT,
        name: "ToString".into(),
        params: vec![],
        return_type: Type::STRING,
        type_args: vec![],
    })));
}

#[test]
fn test_enum_members_and_property_setter() {
    let program = compile(
        "import System;
        func main() {
            let c: ConsoleColor = ConsoleColor.Red;
            Console.ForegroundColor = ConsoleColor.Blue;
        }",
    );
    let color = Type::host("System.ConsoleColor");
    assert_eq!(
        body(&program, "main"),
        &[
            Instruction::LdcI4(12),
            Instruction::Stloc(Slot(0)),
            Instruction::LdcI4(9),
            host_call(
                Type::host("System.Console"),
                "set_ForegroundColor",
                vec![color],
                Type::VOID
            ),
            Instruction::Ret,
        ]
    );

    let errors = semantic_errors("func main() { let s: string = \"abc\"; s.Length = 2; }");
    assert_eq!(errors, vec![TranslateErrorKind::NoSetter("Length".into())]);
}

#[test]
fn test_nested_types_and_generic_methods() {
    let program = compile(
        "import System;
        func main() {
            let f: Environment.SpecialFolder = Environment.SpecialFolder.Desktop;
            let empty: int[] = Array.Empty<int>();
        }",
    );
    let main = body(&program, "main");
    assert_eq!(main[0], Instruction::LdcI4(0));
    assert!(main.contains(&Instruction::Call(CallTarget::Host(
        MethodRef {
            owner: Type::host("System.Array"),
            name: "Empty".into(),
            params: vec![],
            return_type: Type::array_of(Type::INT),
            type_args: vec![Type::INT],
        }
    ))));

    let errors = semantic_errors("import System;\nfunc main() { let e: int[] = Array.Empty(); }");
    assert_eq!(errors, vec![TranslateErrorKind::IsGeneric("Empty".into())]);
}

#[test]
fn test_string_indexing() {
    let program = compile(
        "func first(s: string): char { return s[0]; }
        func patch(s: string) { s[0] = 'x'; }",
    );
    assert_eq!(
        body(&program, "first")[4],
        Instruction::CallVirt(MethodRef {
            owner: Type::STRING,
            name: "get_Chars".into(),
            params: vec![Type::INT],
            return_type: Type::CHAR,
            type_args: vec![],
        })
    );
    let chars = Type::array_of(Type::CHAR);
    assert_eq!(
        &body(&program, "patch")[2..],
        &[
            Instruction::Ldloc(Slot(0)),
            host_call(Type::STRING, "ToCharArray", vec![], chars.clone()),
            Instruction::Dup,
            Instruction::LdcI4(0),
            Instruction::LdcI4('x' as i32),
            Instruction::Conv(ConvKind::U2),
            Instruction::Stelem(Type::CHAR),
            Instruction::NewObj(MethodRef {
                owner: Type::STRING,
                name: ".ctor".into(),
                params: vec![chars],
                return_type: Type::VOID,
                type_args: vec![],
            }),
            Instruction::Stloc(Slot(0)),
            Instruction::Ret,
        ]
    );
}

#[test]
fn test_arrays() {
    let program = compile(
        "func main() { let a: int[] = new int[](3); a[0] = 5; let x: int = a[0]; }",
    );
    let array = Type::array_of(Type::INT);
    assert_eq!(
        body(&program, "main"),
        &[
            Instruction::LdcI4(3),
            Instruction::NewArr(Type::INT),
            Instruction::Stloc(Slot(0)),
            Instruction::Ldloc(Slot(0)),
            Instruction::LdcI4(0),
            Instruction::LdcI4(5),
            Instruction::Stelem(Type::INT),
            Instruction::Ldloc(Slot(0)),
            Instruction::LdcI4(0),
            Instruction::Ldelem(Type::INT),
            Instruction::Stloc(Slot(1)),
            Instruction::LdNull,
            Instruction::Stloc(Slot(0)),
            Instruction::Ret,
        ]
    );
    assert_eq!(program.function("main").unwrap().locals, vec![array, Type::INT]);

    let errors = semantic_errors("func main() { let a: int[] = new int[](1, 2); }");
    assert_eq!(errors, vec![TranslateErrorKind::ArrayLength(2)]);
    let errors = semantic_errors("func main() { let a: int[] = new int[](1l); }");
    assert_eq!(errors, vec![TranslateErrorKind::IndexNotInt(Type::LONG)]);
}

#[test]
fn test_casts() {
    let program = compile(
        "import System;
        func main() {
            let d: double = (double) 5;
            let o: object = (object) 5;
            let i: int = (int) o;
            let s: string = (string) o;
            let c: int = (int) ConsoleColor.Red;
        }",
    );
    let main = body(&program, "main");
    assert_eq!(&main[..2], &[Instruction::LdcI4(5), Instruction::Conv(ConvKind::R8)]);
    assert!(main.contains(&Instruction::Box(Type::INT)));
    assert!(main.contains(&Instruction::UnboxAny(Type::INT)));
    assert!(main.contains(&Instruction::CastClass(Type::STRING)));
    assert!(main.contains(&Instruction::Conv(ConvKind::I4)));
}
