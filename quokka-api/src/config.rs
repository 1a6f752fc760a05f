//! API 层配置
//!
//! 包含编译配置 RunConfig 和全局单例（供 CLI 使用）

use quokka_config::{CompilerConfig, LimitConfig};
use once_cell::sync::OnceCell;

/// Compilation configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Module name recorded in the produced program
    pub module_name: String,
    /// Whether to dump the disassembly after compilation
    pub dump_bytecode: bool,
    /// Compiler configuration
    pub compiler: CompilerConfig,
    /// Translation limits
    pub limits: LimitConfig,
}

impl RunConfig {
    pub fn with_module_name(mut self, name: impl Into<String>) -> Self {
        self.module_name = name.into();
        self
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            module_name: "main".to_string(),
            dump_bytecode: false,
            compiler: CompilerConfig::default(),
            limits: LimitConfig::default(),
        }
    }
}

// Global config singleton for CLI convenience
static GLOBAL_CONFIG: OnceCell<RunConfig> = OnceCell::new();

/// Initialize global configuration
///
/// Returns the rejected config if one was already installed.
pub fn init(config: RunConfig) -> Result<(), RunConfig> {
    GLOBAL_CONFIG.set(config)
}

/// Get global config reference, installing the default on first use
pub fn config() -> &'static RunConfig {
    GLOBAL_CONFIG.get_or_init(RunConfig::default)
}

/// Check if config is initialized
pub fn is_initialized() -> bool {
    GLOBAL_CONFIG.get().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_run_config() {
        let cfg = RunConfig::default();
        assert_eq!(cfg.module_name, "main");
        assert!(!cfg.dump_bytecode);
        assert!(cfg.compiler.emit_debug_info);
        assert_eq!(cfg.limits.max_locals, 65_535);
    }

    #[test]
    fn test_with_module_name() {
        let cfg = RunConfig::default().with_module_name("hello");
        assert_eq!(cfg.module_name, "hello");
        assert_eq!(cfg.compiler, CompilerConfig::default());
    }

    #[test]
    fn test_global_config_is_set_once() {
        // 全局状态：其他测试可能已经初始化过
        let first = config().clone();
        assert!(is_initialized());
        let rejected = init(RunConfig::default().with_module_name("other"));
        assert!(rejected.is_err());
        assert_eq!(config(), &first);
    }
}
