//! CLI 配置
//!
//! 包含 CLI 特有的配置：日志配置和配置文件（编译配置 + 限制 + 日志级别）

use quokka_api::{CompilerConfig, LimitConfig, Phase};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use tracing::Level;

/// CLI 日志配置
#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    pub global: Level,
    pub lexer: Option<Level>,
    pub parser: Option<Level>,
    pub translator: Option<Level>,
    pub emitter: Option<Level>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            global: Level::WARN,
            lexer: None,
            parser: None,
            translator: None,
            emitter: None,
        }
    }
}

impl LogConfig {
    /// Get log level for a specific phase
    pub fn level_for(&self, phase: Phase) -> Level {
        let level = match phase {
            Phase::Lexer => self.lexer,
            Phase::Parser => self.parser,
            Phase::Translator => self.translator,
            Phase::Emitter => self.emitter,
        };
        level.unwrap_or(self.global)
    }
}

/// 配置文件中的日志级别（字符串形式，如 "debug"）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogLevels {
    pub global: Option<String>,
    pub lexer: Option<String>,
    pub parser: Option<String>,
    pub translator: Option<String>,
    pub emitter: Option<String>,
}

/// `--config` 指定的 JSON 配置文件
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub compiler: CompilerConfig,
    pub limits: LimitConfig,
    pub log: LogLevels,
}

fn parse_level(value: Option<&String>) -> Result<Option<Level>, String> {
    value
        .map(|s| Level::from_str(s).map_err(|_| format!("Invalid log level '{s}'")))
        .transpose()
}

impl ConfigFile {
    /// Read and parse a JSON config file
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read '{}': {}", path.display(), e))?;
        Self::parse(&content).map_err(|e| format!("Failed to parse '{}': {}", path.display(), e))
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        serde_json::from_str(content).map_err(|e| e.to_string())
    }

    /// 组合日志配置；命令行给出的全局级别优先
    pub fn log_config(&self, global: Option<Level>) -> Result<LogConfig, String> {
        let file_global = parse_level(self.log.global.as_ref())?;
        Ok(LogConfig {
            global: global.or(file_global).unwrap_or(Level::WARN),
            lexer: parse_level(self.log.lexer.as_ref())?,
            parser: parse_level(self.log.parser.as_ref())?,
            translator: parse_level(self.log.translator.as_ref())?,
            emitter: parse_level(self.log.emitter.as_ref())?,
        })
    }
}
