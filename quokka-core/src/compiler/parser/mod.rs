pub mod error;
pub mod expr;
mod expression;
mod module;
pub mod parser;
pub mod stmt;
pub mod type_name;
mod utils;

// 重新导出常用类型
pub use error::{ErrorLocation, ParseResult, ParserError, ParserErrorKind};
pub use expr::{BinaryOp, Constant, Expr, ExprKind, ExprNode, UnaryOp};
pub use module::{Module, ModuleKind};
pub use parser::Parser;
pub use stmt::{Stmt, StmtKind, StmtNode};
pub use type_name::TypeName;
