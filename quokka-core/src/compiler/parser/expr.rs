use super::type_name::TypeName;
use std::fmt;

// 表达式类型别名
pub type Expr = Box<ExprNode>;

/// 表达式节点：表达式本体 + 起始 token 所在行
#[derive(Debug, Clone, PartialEq)]
pub struct ExprNode {
    pub kind: ExprKind,
    pub line: usize,
}

impl ExprNode {
    pub fn new(kind: ExprKind, line: usize) -> Expr {
        Box::new(Self { kind, line })
    }
}

/// 表达式枚举
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    // 常量
    Constant(Constant),
    // 标识符引用（变量或静态类型）
    Identifier(Identifier),
    // 二元运算
    Binary(Binary),
    // 一元运算
    Unary(Unary),
    // 函数调用 `f<T>(a, b)`
    FunctionCall(FunctionCall),
    // 方法调用 `x.m<T>(a)`
    MethodCall(MethodCall),
    // 成员访问 `x.m`
    MemberAccess(MemberAccess),
    // 索引访问 `x[i]`
    IndexAccess(IndexAccess),
    // 类型转换 `(T) x`
    Cast(Cast),
    // 对象/数组创建 `new T(args)`
    New(NewObject),
}

/// 常量，每种基本类型一个变体
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    SByte(i8),
    Byte(u8),
    Short(i16),
    UShort(u16),
    Int(i32),
    UInt(u32),
    Long(i64),
    ULong(u64),
    Float(f32),
    Double(f64),
    Bool(bool),
    Char(char),
    String(String),
}

/// 二元运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    LogicalOr,
    LogicalAnd,
    BitOr,
    BitXor,
    BitAnd,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    ShiftLeft,
    ShiftRight,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::LogicalOr => "||",
            BinaryOp::LogicalAnd => "&&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::BitAnd => "&",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::ShiftLeft => "<<",
            BinaryOp::ShiftRight => ">>",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
        }
    }

    pub fn is_equality(&self) -> bool {
        matches!(self, BinaryOp::Equal | BinaryOp::NotEqual)
    }

    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            BinaryOp::Less | BinaryOp::LessEqual | BinaryOp::Greater | BinaryOp::GreaterEqual
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::LogicalOr | BinaryOp::LogicalAnd)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 一元运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    LogicalNot,
    BitNot,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::LogicalNot => "!",
            UnaryOp::BitNot => "~",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    pub left: Expr,
    pub op: BinaryOp,
    pub right: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Unary {
    pub op: UnaryOp,
    pub operand: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<Expr>,
    pub type_args: Vec<TypeName>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    pub target: Expr,
    pub name: String,
    pub args: Vec<Expr>,
    pub type_args: Vec<TypeName>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberAccess {
    pub target: Expr,
    pub member: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexAccess {
    pub target: Expr,
    pub index: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cast {
    pub type_name: TypeName,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewObject {
    pub type_name: TypeName,
    pub args: Vec<Expr>,
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn type_args_suffix(type_args: &[TypeName]) -> String {
    if type_args.is_empty() {
        String::new()
    } else {
        format!("<{}>", join(type_args))
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::SByte(v) => write!(f, "{v}"),
            Constant::Byte(v) => write!(f, "{v}"),
            Constant::Short(v) => write!(f, "{v}"),
            Constant::UShort(v) => write!(f, "{v}"),
            Constant::Int(v) => write!(f, "{v}"),
            Constant::UInt(v) => write!(f, "{v}"),
            Constant::Long(v) => write!(f, "{v}"),
            Constant::ULong(v) => write!(f, "{v}"),
            Constant::Float(v) => write!(f, "{v}"),
            Constant::Double(v) => write!(f, "{v}"),
            Constant::Bool(v) => write!(f, "{v}"),
            Constant::Char(v) => write!(f, "{v:?}"),
            Constant::String(v) => write!(f, "{v:?}"),
        }
    }
}

// 完全加括号的输出，便于检查结合性
impl fmt::Display for ExprKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprKind::Constant(c) => write!(f, "{c}"),
            ExprKind::Identifier(id) => write!(f, "{}", id.name),
            ExprKind::Binary(bin) => write!(f, "({} {} {})", bin.left, bin.op, bin.right),
            ExprKind::Unary(un) => write!(f, "({}{})", un.op.as_str(), un.operand),
            ExprKind::FunctionCall(call) => write!(
                f,
                "{}{}({})",
                call.name,
                type_args_suffix(&call.type_args),
                join(&call.args)
            ),
            ExprKind::MethodCall(call) => write!(
                f,
                "{}.{}{}({})",
                call.target,
                call.name,
                type_args_suffix(&call.type_args),
                join(&call.args)
            ),
            ExprKind::MemberAccess(m) => write!(f, "{}.{}", m.target, m.member),
            ExprKind::IndexAccess(i) => write!(f, "{}[{}]", i.target, i.index),
            ExprKind::Cast(c) => write!(f, "(({}) {})", c.type_name, c.value),
            ExprKind::New(n) => write!(f, "new {}({})", n.type_name, join(&n.args)),
        }
    }
}

impl fmt::Display for ExprNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}
