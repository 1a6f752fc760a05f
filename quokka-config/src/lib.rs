//! Quokka Config - Pure configuration data structures
//!
//! This crate contains only data structures, no logic or global state.
//! It serves as the shared configuration vocabulary across all Quokka crates.

use serde::Deserialize;

/// Configuration for compiler behavior
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Whether to record source lines for every emitted instruction
    pub emit_debug_info: bool,
    /// Stop translating once this many semantic diagnostics were collected
    pub max_diagnostics: usize,
    /// Name of the function recorded as the program entry point
    pub entry_point: String,
    /// Clear reference-typed slots with a null store when their scope ends
    pub clear_released_references: bool,
}

/// Configuration for translation limits
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LimitConfig {
    /// Maximum number of local slots per function
    pub max_locals: usize,
    /// Maximum expression/statement nesting depth accepted by the parser
    pub max_nesting_depth: usize,
}

/// Compilation phase enum for phase-specific configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Lexer,
    Parser,
    Translator,
    Emitter,
}

impl Phase {
    /// All phases in pipeline order
    pub const ALL: [Phase; 4] = [Phase::Lexer, Phase::Parser, Phase::Translator, Phase::Emitter];

    /// Get the string name of the phase
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Lexer => "lexer",
            Phase::Parser => "parser",
            Phase::Translator => "translator",
            Phase::Emitter => "emitter",
        }
    }

    /// Get the log target name for this phase
    pub fn target(&self) -> String {
        format!("quokka::{}", self.as_str())
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            emit_debug_info: true,
            max_diagnostics: 64,
            entry_point: "main".to_string(),
            clear_released_references: true,
        }
    }
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            max_locals: 65_535,
            max_nesting_depth: 256,
        }
    }
}
