//! Quokka CLI - Command line interface
//!
//! `quokka build` compiles each source file into a `<stem>.qbc.json` program;
//! `quokka check` only reports diagnostics.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, info, Level};

mod config;
mod logging;
mod platform;

use crate::config::ConfigFile;
use crate::logging::LogFormat;
use crate::platform::print_error_with_source;
use quokka_api::{compile_with_config, get_config, init_config, CompileOutput, RunConfig};
use quokka_core::compiler::lexer::tokenize;

/// 生成文件的扩展名
const ARTIFACT_EXTENSION: &str = "qbc.json";

/// 诊断输出格式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum MessageFormat {
    /// 带源码上下文的终端输出
    #[default]
    Human,
    /// 每行一个 JSON 错误报告（stdout）
    Json,
}

#[derive(Parser)]
#[command(name = "quokka", about = "Quokka programming language compiler", version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// JSON configuration file (compiler, limits and log levels)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Global log level: error, warn, info, debug, trace
    #[arg(long = "log-level", global = true, value_name = "LEVEL")]
    log_level: Option<Level>,

    /// Log output format
    #[arg(long = "log-format", global = true, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,

    /// Also append logs to this file
    #[arg(long = "log-file", global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Diagnostic output format
    #[arg(long = "message-format", global = true, value_enum, default_value_t = MessageFormat::Human)]
    message_format: MessageFormat,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile source files into program artifacts
    Build {
        /// Source files to compile
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output directory for artifacts (defaults to each source file's directory)
        #[arg(short, long = "out-dir", value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// Print the disassembly of every compiled program
        #[arg(long)]
        dump: bool,
    },

    /// Only report diagnostics, write nothing
    Check {
        /// Source files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let file_config = match cli.config.as_deref().map(ConfigFile::load).transpose() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };
    let log_config = match file_config.log_config(cli.log_level) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };
    if let Err(e) = logging::init_with_file(&log_config, cli.log_format, cli.log_file.as_deref())
    {
        eprintln!("Error: Cannot initialize logging: {e}");
        process::exit(1);
    }

    let (files, mode, dump) = match &cli.cmd {
        Commands::Build {
            files,
            out_dir,
            dump,
        } => (
            files,
            Mode::Build {
                out_dir: out_dir.as_deref(),
            },
            *dump,
        ),
        Commands::Check { files } => (files, Mode::Check, false),
    };

    // Initialize API config (global singleton for convenience)
    let run_config = RunConfig {
        dump_bytecode: dump,
        compiler: file_config.compiler,
        limits: file_config.limits,
        ..RunConfig::default()
    };
    if init_config(run_config).is_err() {
        debug!(target: "quokka::cli", "Global config already initialized");
    }

    let mut failed = 0;
    for path in files {
        if !process_file(path, mode, cli.message_format) {
            failed += 1;
        }
    }

    info!(
        target: "quokka::cli",
        files = files.len(),
        failed,
        "Done"
    );
    if failed > 0 {
        process::exit(1);
    }
}

/// 单个文件的处理方式
#[derive(Clone, Copy, Debug)]
enum Mode<'a> {
    Check,
    Build { out_dir: Option<&'a Path> },
}

/// 编译单个文件，返回是否成功
fn process_file(path: &Path, mode: Mode, format: MessageFormat) -> bool {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: Cannot read source file '{}': {}", path.display(), e);
            return false;
        }
    };

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "main".to_string());
    let config = get_config().clone().with_module_name(&stem);
    info!(target: "quokka::cli", file = %path.display(), "Compiling");

    let output = match compile_with_config(&source, &config) {
        Ok(output) => output,
        Err(failure) => {
            report_errors(path, &failure.errors, &source, format);
            return false;
        }
    };

    if config.dump_bytecode {
        print!("{}", output.program.disassemble());
    }

    match mode {
        Mode::Build { out_dir } => {
            let dir = out_dir
                .map(Path::to_path_buf)
                .or_else(|| path.parent().map(Path::to_path_buf))
                .unwrap_or_default();
            match write_artifact(&output, &dir, &stem) {
                Ok(artifact) => {
                    println!("Compiled {} -> {}", path.display(), artifact.display());
                    true
                }
                Err(e) => {
                    eprintln!("Error: {e}");
                    false
                }
            }
        }
        Mode::Check => {
            println!("{}: ok", path.display());
            true
        }
    }
}

fn report_errors(
    path: &Path,
    errors: &[quokka_api::QuokkaError],
    source: &str,
    format: MessageFormat,
) {
    let (lines, _) = tokenize(source);
    for error in errors {
        match format {
            MessageFormat::Human => print_error_with_source(path, error, &lines),
            MessageFormat::Json => match serde_json::to_string(&error.to_report()) {
                Ok(json) => println!("{json}"),
                Err(e) => eprintln!("Error: Cannot serialize report: {e}"),
            },
        }
    }
    eprintln!("{}: {} error(s)", path.display(), errors.len());
}

/// 将程序写为 `<dir>/<stem>.qbc.json`
fn write_artifact(output: &CompileOutput, dir: &Path, stem: &str) -> Result<PathBuf, String> {
    if !dir.as_os_str().is_empty() {
        std::fs::create_dir_all(dir)
            .map_err(|e| format!("Cannot create '{}': {}", dir.display(), e))?;
    }
    let artifact = dir.join(format!("{stem}.{ARTIFACT_EXTENSION}"));
    let json = serde_json::to_string_pretty(&output.program)
        .map_err(|e| format!("Cannot serialize program: {e}"))?;
    std::fs::write(&artifact, json)
        .map_err(|e| format!("Cannot write '{}': {}", artifact.display(), e))?;
    debug!(target: "quokka::cli", artifact = %artifact.display(), "Artifact written");
    Ok(artifact)
}
