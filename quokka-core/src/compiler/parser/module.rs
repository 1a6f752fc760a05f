use super::stmt::Stmt;

/// 一个翻译单元的顶层语句
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleKind {
    pub statements: Vec<Stmt>,
}

pub type Module = Box<ModuleKind>;
