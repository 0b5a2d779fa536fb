//! Logging setup: a human-readable stderr layer plus an optional JSONL file.
//!
//! Stdout is reserved for command output and the MCP transport, so nothing
//! here ever writes to it.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_PATH_ENV: &str = "READSCORE_LOG_PATH";
const LOG_DIR_ENV: &str = "READSCORE_LOG_DIR";
const LOG_FILE_NAME: &str = "readscore.jsonl";

/// Where JSONL logs go, if anywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Directory holding the log file.
    pub log_dir: Option<PathBuf>,
    /// Log file name within `log_dir`.
    pub file_name: String,
}

impl ObservabilityConfig {
    /// Resolve the log target from the environment, then `config_log_dir`,
    /// then the platform data directory.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        resolve(
            std::env::var_os(LOG_PATH_ENV).map(PathBuf::from),
            std::env::var_os(LOG_DIR_ENV).map(PathBuf::from),
            config_log_dir,
            readscore_core::config::user_data_local_dir()
                .map(|dir| dir.join("logs").into_std_path_buf()),
        )
    }
}

fn resolve(
    explicit_path: Option<PathBuf>,
    env_dir: Option<PathBuf>,
    config_dir: Option<PathBuf>,
    default_dir: Option<PathBuf>,
) -> ObservabilityConfig {
    if let Some(path) = explicit_path {
        let file_name = path
            .file_name()
            .map_or_else(|| LOG_FILE_NAME.to_string(), |n| n.to_string_lossy().into_owned());
        let log_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        return ObservabilityConfig {
            log_dir: Some(log_dir),
            file_name,
        };
    }

    ObservabilityConfig {
        log_dir: env_dir.or(config_dir).or(default_dir),
        file_name: LOG_FILE_NAME.to_string(),
    }
}

/// Build the level filter. `RUST_LOG` wins; otherwise `-q` means errors only,
/// `-v` debug, `-vv` trace, and the configured level applies.
pub fn env_filter(quiet: bool, verbose: u8, config_level: &str) -> EnvFilter {
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some()
        && let Ok(filter) = EnvFilter::try_from_default_env()
    {
        return filter;
    }
    EnvFilter::new(level_directive(quiet, verbose, config_level))
}

fn level_directive(quiet: bool, verbose: u8, config_level: &str) -> &str {
    match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => config_level,
        (false, 1) => "debug",
        (false, _) => "trace",
    }
}

/// Keeps the non-blocking file writer flushing until dropped.
#[must_use = "dropping the guard stops file logging"]
pub struct ObservabilityGuard {
    _file: Option<WorkerGuard>,
}

/// Install the global subscriber.
///
/// A log file that cannot be opened disables file logging with a warning
/// rather than failing the command.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<ObservabilityGuard> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact();

    let (appender, file_error) = match open_log_file(config) {
        Ok(appender) => (appender, None),
        Err(err) => (None, Some(err)),
    };
    let mut file_guard = None;
    let file_layer = appender.map(|appender| {
        let (writer, guard) = tracing_appender::non_blocking(appender);
        file_guard = Some(guard);
        fmt::layer().json().with_writer(writer)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    if let Some(err) = file_error {
        tracing::warn!(error = %format!("{err:#}"), "file logging disabled");
    }

    Ok(ObservabilityGuard { _file: file_guard })
}

/// Open the JSONL log file, or `None` when no log directory is configured.
fn open_log_file(config: &ObservabilityConfig) -> anyhow::Result<Option<RollingFileAppender>> {
    let Some(dir) = config.log_dir.as_deref() else {
        return Ok(None);
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(&config.file_name)
        .build(dir)
        .with_context(|| {
            format!(
                "failed to open log file {}",
                dir.join(&config.file_name).display()
            )
        })?;
    Ok(Some(appender))
}
