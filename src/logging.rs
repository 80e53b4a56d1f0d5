//! Logging System
//!
//! Structured logging via the `tracing` crate. Level, format, and destination
//! come from configuration, with `WORKPAD_LOG`, `WORKPAD_LOG_FORMAT`, and
//! `WORKPAD_LOG_OUTPUT` environment overrides taking precedence.

use crate::error::WorkpadError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether logging is enabled (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file, file+stderr
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path when output includes file; None means use the runtime
    /// default under the platform state directory
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Enable colored output (text format, terminal destinations only)
    #[serde(default = "default_true")]
    pub color: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
        }
    }
}

/// Initialize the logging system. May only be called once per process.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), WorkpadError> {
    let disabled = config.map(|c| !c.enabled).unwrap_or(false);
    if disabled {
        Registry::default()
            .with(EnvFilter::new("off"))
            .with(fmt::layer().with_writer(std::io::sink))
            .init();
        return Ok(());
    }

    let filter = build_env_filter(config);
    let format = determine_format(config)?;
    let output = determine_output(config)?;
    let writer = build_writer(&output, config.and_then(|c| c.file.clone()))?;
    let use_color = config.map(|c| c.color).unwrap_or(true)
        && matches!(output.as_str(), "stdout" | "stderr");

    let base = Registry::default().with(filter);
    if format == "json" {
        base.with(
            fmt::layer()
                .json()
                .with_target(true)
                .with_timer(ChronoUtc::rfc_3339())
                .with_writer(writer),
        )
        .init();
    } else {
        base.with(
            fmt::layer()
                .with_target(true)
                .with_timer(ChronoUtc::rfc_3339())
                .with_ansi(use_color)
                .with_writer(writer),
        )
        .init();
    }

    Ok(())
}

/// Build the level filter from `WORKPAD_LOG` or the configured level.
fn build_env_filter(config: Option<&LoggingConfig>) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_env("WORKPAD_LOG") {
        return filter;
    }
    let level = config.map(|c| c.level.as_str()).unwrap_or("info");
    EnvFilter::new(level)
}

fn determine_format(config: Option<&LoggingConfig>) -> Result<String, WorkpadError> {
    if let Ok(format) = std::env::var("WORKPAD_LOG_FORMAT") {
        if format == "json" || format == "text" {
            return Ok(format);
        }
    }
    let format = config.map(|c| c.format.as_str()).unwrap_or("text");
    if format != "json" && format != "text" {
        return Err(WorkpadError::ConfigError(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            format
        )));
    }
    Ok(format.to_string())
}

fn determine_output(config: Option<&LoggingConfig>) -> Result<String, WorkpadError> {
    let output = std::env::var("WORKPAD_LOG_OUTPUT")
        .ok()
        .unwrap_or_else(|| {
            config
                .map(|c| c.output.clone())
                .unwrap_or_else(default_output)
        });
    match output.as_str() {
        "stdout" | "stderr" | "file" | "file+stderr" => Ok(output),
        other => Err(WorkpadError::ConfigError(format!(
            "Invalid log output: {} (must be 'stdout', 'stderr', 'file', or 'file+stderr')",
            other
        ))),
    }
}

fn build_writer(output: &str, file: Option<PathBuf>) -> Result<BoxMakeWriter, WorkpadError> {
    match output {
        "stdout" => Ok(BoxMakeWriter::new(std::io::stdout)),
        "stderr" => Ok(BoxMakeWriter::new(std::io::stderr)),
        "file" => Ok(BoxMakeWriter::new(open_log_file(file)?)),
        "file+stderr" => Ok(BoxMakeWriter::new(
            open_log_file(file)?.and(std::io::stderr),
        )),
        // determine_output already validated
        other => Err(WorkpadError::ConfigError(format!(
            "Invalid log output: {}",
            other
        ))),
    }
}

fn open_log_file(file: Option<PathBuf>) -> Result<std::fs::File, WorkpadError> {
    let path = match file {
        Some(path) => path,
        None => default_log_file_path()?,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            WorkpadError::ConfigError(format!("Failed to create log directory: {}", e))
        })?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| WorkpadError::ConfigError(format!("Failed to open log file {:?}: {}", path, e)))
}

/// Default log file location under the platform state directory.
pub fn default_log_file_path() -> Result<PathBuf, WorkpadError> {
    let dirs = directories::ProjectDirs::from("", "workpad", "workpad").ok_or_else(|| {
        WorkpadError::ConfigError("Could not determine platform state directory".to_string())
    })?;
    let dir = dirs
        .state_dir()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| dirs.data_dir().to_path_buf());
    Ok(dir.join("workpad.log"))
}
