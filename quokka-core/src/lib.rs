//! Quokka Core - Core compiler (pure logic, no IO)
//!
//! Contains lexer, parser, type resolver and code generator.
//! Only operates on in-memory data structures, no file IO or terminal output.
//!
//! Host type information is injected through [`host::HostTypeProvider`];
//! configuration is passed explicitly via parameters, not via global state.

pub mod bytecode;
pub mod compiler;
pub mod host;
pub mod translator;
pub mod types;

// Re-export common types
pub use bytecode::{Emitter, Instruction, Program, ProgramBuilder};
pub use host::{HostRegistry, HostTypeProvider};
pub use translator::{TranslateError, TranslateFailure, Translator};
pub use types::{Primitive, Type};

// Re-export config types from quokka-config
pub use quokka_config::{CompilerConfig, LimitConfig, Phase};
