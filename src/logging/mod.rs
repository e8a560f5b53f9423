//! Tracing setup for the CLI: a console layer on stderr plus an optional
//! non-blocking file sink under the effective output directory.

use crate::{cli::Command, core::MapdocConfig, Result};
use anyhow::{anyhow, Context};
use std::fs::{create_dir_all, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::prelude::*;

static LOGGER_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Guards that keep the file sink flushing for the duration of the command.
#[derive(Debug)]
pub struct LoggingGuard {
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
    log_file_path: Option<PathBuf>,
}

impl LoggingGuard {
    /// Returns the log file path backed by the file sink, if one is active.
    pub fn log_file_path(&self) -> Option<&Path> {
        self.log_file_path.as_deref()
    }
}

/// Initialize the logging framework for the provided CLI command.
///
/// Filters honor `RUST_LOG` first and fall back to the configured default
/// level. The file sink lands next to the command's other artifacts, under
/// the effective output directory. Errors when invoked more than once per
/// process invocation.
pub fn init(command: &Command) -> Result<LoggingGuard> {
    if LOGGER_INITIALIZED
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        return Err(anyhow!("logging already initialized"));
    }

    let config = MapdocConfig::load(resolve_config_path(command).as_deref())?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .context("failed to configure tracing level")?;

    let (file_layer, file_guard, log_file_path) = if config.logging.file {
        let log_file = resolve_out_dir(command, &config).join("mapdoc.log");
        ensure_log_dir(&log_file)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .with_context(|| format!("failed to open log file {}", log_file.display()))?;

        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false);
        (Some(layer), Some(guard), Some(log_file))
    } else {
        (None, None, None)
    };

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .with(env_filter)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
        log_file_path,
    })
}

fn resolve_config_path(command: &Command) -> Option<PathBuf> {
    match command {
        Command::Generate(args) => args.config.clone(),
        Command::Docs(_) | Command::Lineage(_) | Command::Split(_) => None,
    }
}

fn resolve_out_dir(command: &Command, config: &MapdocConfig) -> PathBuf {
    let override_dir = match command {
        Command::Docs(args) => args.out.clone(),
        Command::Split(args) => args.out.clone(),
        Command::Generate(args) => args.out.clone(),
        Command::Lineage(_) => None,
    };
    override_dir.unwrap_or_else(|| config.output.dir.clone())
}

fn ensure_log_dir(log_file: &Path) -> Result<()> {
    let directory = log_file.parent().ok_or_else(|| {
        anyhow!(
            "log file path {} has no parent directory",
            log_file.display()
        )
    })?;
    create_dir_all(directory)
        .with_context(|| format!("failed to create log directory {}", directory.display()))?;
    Ok(())
}
