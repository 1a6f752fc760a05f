use super::expr::Expr;
use super::type_name::TypeName;
use std::fmt;

// 语句类型别名
pub type Stmt = Box<StmtNode>;

/// 语句节点：语句本体 + 起始 token 所在行
#[derive(Debug, Clone, PartialEq)]
pub struct StmtNode {
    pub kind: StmtKind,
    pub line: usize,
}

impl StmtNode {
    pub fn new(kind: StmtKind, line: usize) -> Stmt {
        Box::new(Self { kind, line })
    }
}

/// 语句枚举
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    // 函数定义
    Function(FunctionDecl),
    // 代码块 `{ ... }`
    Block(BlockStmt),
    // 变量声明 `let x: T;`
    VarDecl(VarDeclStmt),
    // 赋值 `dest = value;`
    Assign(AssignStmt),
    // 表达式语句
    Expr(ExprStmt),
    // if / else if / else 链
    Branch(BranchStmt),
    While(WhileStmt),
    DoWhile(DoWhileStmt),
    For(ForStmt),
    Return(ReturnStmt),
    Break,
    Continue,
    // 按顺序执行的两条语句（`let x: T = e;` 的展开形式）
    Compound(CompoundStmt),
    // 导入 `import A.B;`
    Import(ImportStmt),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub return_type: TypeName,
    pub args: Vec<(String, TypeName)>,
    pub generics: Vec<String>,
    pub body: Stmt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclStmt {
    pub name: String,
    pub type_name: TypeName,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    /// 标识符、索引访问或成员访问
    pub destination: Expr,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub expression: Expr,
}

/// 条件分支中的一个 `(条件, 代码块)`
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionArm {
    pub condition: Expr,
    pub body: Stmt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BranchStmt {
    pub arms: Vec<ConditionArm>,
    pub else_body: Option<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Stmt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoWhileStmt {
    pub condition: Expr,
    pub body: Stmt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: Stmt,
    pub condition: Expr,
    pub iter: Stmt,
    pub body: Stmt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompoundStmt {
    pub first: Stmt,
    pub second: Stmt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportStmt {
    /// 点分路径，如 `System.Text`
    pub path: String,
}

// 单行摘要输出，代码块只输出语句数量
impl fmt::Display for StmtKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StmtKind::Function(func) => {
                let args = func
                    .args
                    .iter()
                    .map(|(name, ty)| format!("{name}: {ty}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                if func.generics.is_empty() {
                    write!(f, "func {}({}): {}", func.name, args, func.return_type)
                } else {
                    write!(
                        f,
                        "func {}<{}>({}): {}",
                        func.name,
                        func.generics.join(", "),
                        args,
                        func.return_type
                    )
                }
            }
            StmtKind::Block(block) => write!(f, "{{ {} statements }}", block.statements.len()),
            StmtKind::VarDecl(decl) => write!(f, "let {}: {}", decl.name, decl.type_name),
            StmtKind::Assign(assign) => write!(f, "{} = {}", assign.destination, assign.value),
            StmtKind::Expr(e) => write!(f, "{}", e.expression),
            StmtKind::Branch(branch) => {
                write!(f, "if ({})", branch.arms[0].condition)?;
                for arm in &branch.arms[1..] {
                    write!(f, " else if ({})", arm.condition)?;
                }
                if branch.else_body.is_some() {
                    write!(f, " else")?;
                }
                Ok(())
            }
            StmtKind::While(w) => write!(f, "while ({})", w.condition),
            StmtKind::DoWhile(w) => write!(f, "do while ({})", w.condition),
            StmtKind::For(fr) => write!(f, "for ({}; {}; {})", fr.init, fr.condition, fr.iter),
            StmtKind::Return(ret) => match &ret.value {
                Some(value) => write!(f, "return {value}"),
                None => write!(f, "return"),
            },
            StmtKind::Break => write!(f, "break"),
            StmtKind::Continue => write!(f, "continue"),
            StmtKind::Compound(c) => write!(f, "{}; {}", c.first, c.second),
            StmtKind::Import(import) => write!(f, "import {}", import.path),
        }
    }
}

impl fmt::Display for StmtNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}
