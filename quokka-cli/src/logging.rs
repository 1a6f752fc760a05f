//! CLI 日志系统初始化
//!
//! 基于 `tracing-subscriber` 实现分阶段日志控制。日志写到 stderr，
//! 标准输出留给反汇编与 JSON 诊断。

use crate::config::LogConfig;
use clap::ValueEnum;
use quokka_api::Phase;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{
    filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// 日志输出格式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// 彩色格式化（开发使用）
    Pretty,
    /// 紧凑格式
    #[default]
    Compact,
    /// JSON 格式（工具集成）
    Json,
}

/// 按阶段构建过滤规则
pub fn targets(log_config: &LogConfig) -> Targets {
    Phase::ALL
        .iter()
        .fold(Targets::new().with_default(log_config.global), |targets, phase| {
            targets.with_target(phase.target(), log_config.level_for(*phase))
        })
        .with_target("quokka::api", log_config.global)
        .with_target("quokka::cli", log_config.global)
}

/// 使用指定格式和日志配置初始化日志系统，可选同时写入文件
pub fn init_with_file(
    log_config: &LogConfig,
    format: LogFormat,
    file: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let targets = targets(log_config);

    let mut layers: Vec<BoxedLayer> =
        vec![create_format_layer(format, io::stderr).with_filter(targets.clone()).boxed()];

    if let Some(path) = file {
        let file_handle = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        layers.push(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file_handle))
                .with_filter(targets)
                .boxed(),
        );
    }

    tracing_subscriber::registry().with(layers).try_init()?;
    Ok(())
}

/// Create formatter layer based on format
fn create_format_layer<W, F>(format: LogFormat, make_writer: F) -> BoxedLayer
where
    W: io::Write + Send + Sync + 'static,
    F: Fn() -> W + Send + Sync + 'static,
{
    match format {
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(true)
            .with_timer(fmt::time::time())
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(false)
            .without_time()
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_timer(fmt::time::time())
            .with_writer(make_writer)
            .boxed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_targets_per_phase() {
        let config = LogConfig {
            global: Level::WARN,
            translator: Some(Level::DEBUG),
            ..LogConfig::default()
        };
        let targets = targets(&config);
        let levels: Vec<(String, LevelFilter)> = targets
            .iter()
            .map(|(target, level)| (target.to_string(), level))
            .collect();
        assert!(levels.contains(&("quokka::translator".to_string(), LevelFilter::DEBUG)));
        assert!(levels.contains(&("quokka::lexer".to_string(), LevelFilter::WARN)));
        assert!(levels.contains(&("quokka::cli".to_string(), LevelFilter::WARN)));
        assert!(targets.would_enable("quokka::translator", &Level::DEBUG));
        assert!(!targets.would_enable("quokka::parser", &Level::INFO));
    }
}
