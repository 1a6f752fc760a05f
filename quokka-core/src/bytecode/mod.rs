//! 栈式指令、发射器接口与内存程序

pub mod emitter;
pub mod instruction;
pub mod program;

pub use emitter::{EmitError, Emitter};
pub use instruction::{
    CallTarget, ConvKind, FieldRef, FunctionSymbol, Instruction, Label, MethodRef, Slot,
};
pub use program::{FunctionBody, Program, ProgramBuilder};
