//! File logging for the MCP server and CLI.
//!
//! Stdout belongs to the MCP protocol, so events go to a log file instead.
//! A `tracing-subscriber` fmt layer is installed once per process; [`init`]
//! may be called again to point it at a different file. The filter comes from
//! `CLICKUP_TOOLS_LOG` (default `info`).

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once, PoisonError};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "CLICKUP_TOOLS_LOG";

/// Maximum log file size before rotation (1MB).
const MAX_LOG_SIZE: u64 = 1_048_576;

/// The file events are currently written to.
static LOG_FILE: Mutex<Option<File>> = Mutex::new(None);

static SUBSCRIBER: Once = Once::new();

/// Default log location: `<data_dir>/clickup-tools/clickup-tools.log`.
#[must_use]
pub fn default_log_path() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("clickup-tools").join("clickup-tools.log"))
}

/// Writer handed to the fmt layer; forwards to [`LOG_FILE`] when one is open.
struct LogFileWriter;

impl Write for LogFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = LOG_FILE.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.as_mut() {
            Some(file) => file.write_all(buf).map(|()| buf.len()),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = LOG_FILE.lock().unwrap_or_else(PoisonError::into_inner);
        guard.as_mut().map_or(Ok(()), File::flush)
    }
}

/// Move an oversized log aside to `<name>.log.old`.
fn rotate(path: &Path) {
    if fs::metadata(path).is_ok_and(|m| m.len() > MAX_LOG_SIZE) {
        let _ = fs::rename(path, path.with_extension("log.old"));
    }
}

/// Start logging to `path`.
///
/// # Errors
///
/// Returns an error if the log file cannot be created.
pub fn init(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    rotate(path);

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    *LOG_FILE.lock().unwrap_or_else(PoisonError::into_inner) = Some(file);

    SUBSCRIBER.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
        // Another subscriber may already be installed by the host.
        let _ = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_env_filter(filter)
            .with_writer(|| LogFileWriter)
            .try_init();
    });

    tracing::info!(path = %path.display(), version = crate::VERSION, "logging started");
    Ok(())
}

/// Log a panic with backtrace.
#[allow(deprecated)] // PanicInfo is deprecated but PanicHookInfo requires Rust 1.81+
fn log_panic(info: &panic::PanicInfo<'_>) {
    let location = format_panic_location(info.location());

    let payload = info
        .payload()
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| info.payload().downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());

    tracing::error!(%location, %payload, "panic");

    let backtrace = std::backtrace::Backtrace::capture();
    log_backtrace_str(&backtrace.to_string());
}

fn format_panic_location(location: Option<&panic::Location<'_>>) -> String {
    location.map_or_else(
        || "unknown".to_string(),
        |loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()),
    )
}

fn log_backtrace_str(bt_str: &str) {
    // Backtrace::capture() yields "disabled" unless RUST_BACKTRACE is set
    if bt_str.is_empty() || bt_str.contains("disabled") {
        return;
    }

    for line in bt_str.lines() {
        tracing::error!("  {line}");
    }
}

/// Install a panic hook that logs panics before the default hook runs.
///
/// Call after [`init`].
pub fn install_panic_hook() {
    let original_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        log_panic(info);
        original_hook(info);
    }));

    tracing::debug!("panic hook installed");
}

/// Log process shutdown.
pub fn log_shutdown(exit_code: Option<i32>) {
    match exit_code {
        Some(code) => tracing::info!(code, "shutting down"),
        None => tracing::info!("shutting down normally"),
    }
}

/// Logs the start, duration, and outcome of a tool call.
///
/// ```ignore
/// let mut guard = ToolCallGuard::new("clickup_get_task");
/// // ... run the tool, call guard.mark_error() on failure ...
/// // the end event is logged when the guard drops
/// ```
pub struct ToolCallGuard {
    tool_name: String,
    start: Instant,
    success: bool,
}

impl ToolCallGuard {
    /// Log the start of a call.
    #[must_use]
    pub fn new(tool_name: &str) -> Self {
        tracing::info!(tool = tool_name, "tool call started");
        Self { tool_name: tool_name.to_string(), start: Instant::now(), success: true }
    }

    /// Mark the call as failed.
    pub fn mark_error(&mut self) {
        self.success = false;
    }
}

impl Drop for ToolCallGuard {
    fn drop(&mut self) {
        let duration_ms = u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX);
        let outcome = if self.success { "OK" } else { "ERROR" };
        tracing::info!(tool = %self.tool_name, duration_ms, outcome, "tool call finished");
    }
}
