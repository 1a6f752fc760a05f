//! 栈式指令定义

use crate::types::Type;
use serde::Serialize;
use std::fmt;

/// 局部变量槽位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Slot(pub u16);

/// 跳转标签（函数内唯一）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Label(pub u32);

/// 已声明函数的句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FunctionSymbol(pub u32);

/// 数值转换目标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ConvKind {
    I1,
    U1,
    I2,
    U2,
    I4,
    U4,
    I8,
    U8,
    R4,
    R8,
}

/// 宿主方法/构造函数引用（`name` 为 `.ctor` 时表示构造函数）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MethodRef {
    pub owner: Type,
    pub name: String,
    pub params: Vec<Type>,
    pub return_type: Type,
    pub type_args: Vec<Type>,
}

/// 宿主字段引用
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FieldRef {
    pub owner: Type,
    pub name: String,
    pub field_type: Type,
}

/// 调用目标
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CallTarget {
    /// 本翻译单元中的函数
    Local {
        symbol: FunctionSymbol,
        type_args: Vec<Type>,
    },
    /// 宿主方法
    Host(MethodRef),
}

/// 指令
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", content = "arg")]
pub enum Instruction {
    // 常量
    LdcI4(i32),
    LdcI8(i64),
    LdcR4(f32),
    LdcR8(f64),
    LdStr(String),
    LdNull,

    // 参数与局部变量
    Ldarg(u16),
    Ldloc(Slot),
    Ldloca(Slot),
    Stloc(Slot),

    // 栈操作
    Dup,
    Pop,

    // 算术与位运算
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Neg,
    And,
    Or,
    Xor,
    Not,
    Shl,
    Shr,

    // 比较，结果为 bool
    Ceq,
    Cgt,
    Clt,
    Cle,
    Cge,

    // 控制流
    Br(Label),
    Brfalse(Label),
    Brtrue(Label),
    Ret,

    // 转换
    Conv(ConvKind),
    Box(Type),
    UnboxAny(Type),
    CastClass(Type),

    // 调用与对象
    Call(CallTarget),
    CallVirt(MethodRef),
    NewObj(MethodRef),
    NewArr(Type),
    Ldelem(Type),
    Stelem(Type),
    Ldfld(FieldRef),
    Stfld(FieldRef),
    Ldsfld(FieldRef),
    Stsfld(FieldRef),
}

impl Instruction {
    /// 指令助记符
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Instruction::LdcI4(_) => "ldc.i4",
            Instruction::LdcI8(_) => "ldc.i8",
            Instruction::LdcR4(_) => "ldc.r4",
            Instruction::LdcR8(_) => "ldc.r8",
            Instruction::LdStr(_) => "ldstr",
            Instruction::LdNull => "ldnull",
            Instruction::Ldarg(_) => "ldarg",
            Instruction::Ldloc(_) => "ldloc",
            Instruction::Ldloca(_) => "ldloca",
            Instruction::Stloc(_) => "stloc",
            Instruction::Dup => "dup",
            Instruction::Pop => "pop",
            Instruction::Add => "add",
            Instruction::Sub => "sub",
            Instruction::Mul => "mul",
            Instruction::Div => "div",
            Instruction::Rem => "rem",
            Instruction::Neg => "neg",
            Instruction::And => "and",
            Instruction::Or => "or",
            Instruction::Xor => "xor",
            Instruction::Not => "not",
            Instruction::Shl => "shl",
            Instruction::Shr => "shr",
            Instruction::Ceq => "ceq",
            Instruction::Cgt => "cgt",
            Instruction::Clt => "clt",
            Instruction::Cle => "cle",
            Instruction::Cge => "cge",
            Instruction::Br(_) => "br",
            Instruction::Brfalse(_) => "brfalse",
            Instruction::Brtrue(_) => "brtrue",
            Instruction::Ret => "ret",
            Instruction::Conv(_) => "conv",
            Instruction::Box(_) => "box",
            Instruction::UnboxAny(_) => "unbox.any",
            Instruction::CastClass(_) => "castclass",
            Instruction::Call(_) => "call",
            Instruction::CallVirt(_) => "callvirt",
            Instruction::NewObj(_) => "newobj",
            Instruction::NewArr(_) => "newarr",
            Instruction::Ldelem(_) => "ldelem",
            Instruction::Stelem(_) => "stelem",
            Instruction::Ldfld(_) => "ldfld",
            Instruction::Stfld(_) => "stfld",
            Instruction::Ldsfld(_) => "ldsfld",
            Instruction::Stsfld(_) => "stsfld",
        }
    }

    /// 跳转目标（若为跳转指令）
    pub fn branch_target(&self) -> Option<Label> {
        match self {
            Instruction::Br(label) | Instruction::Brfalse(label) | Instruction::Brtrue(label) => {
                Some(*label)
            }
            _ => None,
        }
    }
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = self
            .params
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{} {}::{}", self.return_type, self.owner, self.name)?;
        if !self.type_args.is_empty() {
            let args = self
                .type_args
                .iter()
                .map(|a| a.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, "<{args}>")?;
        }
        write!(f, "({params})")
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}::{}", self.field_type, self.owner, self.name)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = self.mnemonic();
        match self {
            Instruction::LdcI4(v) => write!(f, "{op} {v}"),
            Instruction::LdcI8(v) => write!(f, "{op} {v}"),
            Instruction::LdcR4(v) => write!(f, "{op} {v}"),
            Instruction::LdcR8(v) => write!(f, "{op} {v}"),
            Instruction::LdStr(s) => write!(f, "{op} {s:?}"),
            Instruction::Ldarg(i) => write!(f, "{op} {i}"),
            Instruction::Ldloc(slot)
            | Instruction::Ldloca(slot)
            | Instruction::Stloc(slot) => write!(f, "{op} {}", slot.0),
            Instruction::Br(label) | Instruction::Brfalse(label) | Instruction::Brtrue(label) => {
                write!(f, "{op} L{}", label.0)
            }
            Instruction::Conv(kind) => write!(f, "{op}.{}", format!("{kind:?}").to_lowercase()),
            Instruction::Box(ty)
            | Instruction::UnboxAny(ty)
            | Instruction::CastClass(ty)
            | Instruction::NewArr(ty)
            | Instruction::Ldelem(ty)
            | Instruction::Stelem(ty) => write!(f, "{op} {ty}"),
            Instruction::Call(CallTarget::Local { symbol, type_args }) if type_args.is_empty() => {
                write!(f, "{op} #{}", symbol.0)
            }
            Instruction::Call(CallTarget::Local { symbol, type_args }) => {
                let args = type_args
                    .iter()
                    .map(|a| a.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{op} #{}<{}>", symbol.0, args)
            }
            Instruction::Call(CallTarget::Host(method))
            | Instruction::CallVirt(method)
            | Instruction::NewObj(method) => write!(f, "{op} {method}"),
            Instruction::Ldfld(field)
            | Instruction::Stfld(field)
            | Instruction::Ldsfld(field)
            | Instruction::Stsfld(field) => write!(f, "{op} {field}"),
            _ => write!(f, "{op}"),
        }
    }
}
