//! Rolling file log bootstrap for the routine store.
//!
//! # Responsibility
//! - Start the `flexi_logger` file backend once per process.
//! - Capture panics as sanitized log events.
//!
//! # Invariants
//! - Repeating init with the same level and directory is a no-op.
//! - Init with a different level or directory is rejected.
//! - Init reports failures as `Err` and never panics.
//! - Events carry ids and counts only, never todo text or routine names.

use crate::config::CoreConfig;
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

const LOG_BASENAME: &str = "routinely";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_LOG_FILES: usize = 5;
const PANIC_PAYLOAD_LIMIT: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

struct ActiveLogger {
    level: &'static str,
    dir: PathBuf,
    _handle: LoggerHandle,
}

impl ActiveLogger {
    fn ensure_matches(&self, level: &str, dir: &Path) -> Result<(), String> {
        if self.dir != dir {
            return Err(format!(
                "logging already writes to `{}`; refusing to switch to `{}`",
                self.dir.display(),
                dir.display()
            ));
        }
        if self.level != level {
            return Err(format!(
                "logging already runs at `{}`; refusing to switch to `{level}`",
                self.level
            ));
        }
        Ok(())
    }
}

/// Starts file logging at `level` under the absolute directory `log_dir`.
///
/// # Errors
/// - Unknown level names.
/// - Blank or relative directories, or directories that cannot be created.
/// - Conflicting re-initialization or backend start failure.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), String> {
    let level = parse_level(level)?;
    let dir = parse_log_dir(log_dir)?;

    if let Some(active) = ACTIVE.get() {
        return active.ensure_matches(level, &dir);
    }

    let active = ACTIVE.get_or_try_init(|| start_backend(level, dir.clone()))?;
    active.ensure_matches(level, &dir)
}

/// Starts file logging when `config` names a log directory.
///
/// Returns `Ok(false)` when file logging is disabled by configuration.
pub fn init_from_config(config: &CoreConfig) -> Result<bool, String> {
    match config.log_dir.as_deref() {
        Some(dir) => init_logging(&config.log_level, dir).map(|()| true),
        None => Ok(false),
    }
}

/// Active `(level, directory)` pair, or `None` before init.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    ACTIVE.get().map(|active| (active.level, active.dir.clone()))
}

/// `debug` in debug builds, `info` in release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_backend(level: &'static str, dir: PathBuf) -> Result<ActiveLogger, String> {
    std::fs::create_dir_all(&dir)
        .map_err(|err| format!("cannot create log directory `{}`: {err}", dir.display()))?;

    let handle = Logger::try_with_str(level)
        .map_err(|err| format!("invalid log level `{level}`: {err}"))?
        .log_to_file(FileSpec::default().directory(&dir).basename(LOG_BASENAME))
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("cannot start logger: {err}"))?;

    install_panic_hook();

    info!(
        "event=logging_start module=core status=ok os={} profile={} version={} level={}",
        std::env::consts::OS,
        if cfg!(debug_assertions) { "debug" } else { "release" },
        env!("CARGO_PKG_VERSION"),
        level
    );

    Ok(ActiveLogger {
        level,
        dir,
        _handle: handle,
    })
}

fn parse_level(level: &str) -> Result<&'static str, String> {
    let normalized = level.trim().to_ascii_lowercase();
    let parsed = match normalized.as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" | "warning" => "warn",
        "error" => "error",
        other => {
            return Err(format!(
                "unknown log level `{other}`; use trace, debug, info, warn or error"
            ))
        }
    };
    Ok(parsed)
}

fn parse_log_dir(log_dir: &str) -> Result<PathBuf, String> {
    let trimmed = log_dir.trim();
    if trimmed.is_empty() {
        return Err("log directory must not be blank".to_string());
    }
    let path = PathBuf::from(trimmed);
    if !path.is_absolute() {
        return Err(format!("log directory must be absolute, got `{trimmed}`"));
    }
    Ok(path)
}

fn install_panic_hook() {
    if PANIC_HOOK.set(()).is_err() {
        return;
    }

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map_or_else(|| "unknown".to_string(), |loc| format!("{}:{}", loc.file(), loc.line()));
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(|message| (*message).to_string())
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        error!(
            "event=panic module=core status=error location={} payload={}",
            location,
            one_line(&payload, PANIC_PAYLOAD_LIMIT)
        );
        previous(panic_info);
    }));
}

/// Flattens line breaks and caps `value` at `limit` characters.
fn one_line(value: &str, limit: usize) -> String {
    let flat = value.replace(['\n', '\r'], " ");
    if flat.chars().count() <= limit {
        return flat;
    }
    let mut capped: String = flat.chars().take(limit).collect();
    capped.push_str("...");
    capped
}
