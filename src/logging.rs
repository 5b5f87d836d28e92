use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the tracing filter directive.
pub const LOG_ENV: &str = "ZEN_LOG";
const DEFAULT_FILTER: &str = "zen_editor_tui=info";
const LOG_FILE: &str = "zen-editor.log";

/// Keeps the background writer alive; logs are flushed when dropped.
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

/// Preferred log directory under the platform data dir.
pub fn default_log_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("zen-editor").join("logs"))
}

fn ensure_log_dir() -> std::io::Result<PathBuf> {
    let preferred = default_log_dir()
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "no data dir"))?;
    std::fs::create_dir_all(&preferred)?;
    Ok(preferred)
}

/// Build the filter from `ZEN_LOG`, falling back to info for this crate.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a daily-rolling file subscriber. The terminal is never written to.
///
/// Returns `None` when no log directory is usable or a subscriber is already set.
pub fn init() -> Option<LoggingGuard> {
    let log_dir = ensure_log_dir()
        .or_else(|_| -> std::io::Result<PathBuf> {
            let dir = std::env::temp_dir().join("zen-editor").join("logs");
            std::fs::create_dir_all(&dir)?;
            Ok(dir)
        })
        .ok()?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let subscriber = tracing_subscriber::registry().with(env_filter()).with(
        tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true),
    );

    if subscriber.try_init().is_err() {
        return None;
    }

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        tracing::error!(panic = %panic_info, "panic");
        previous(panic_info);
    }));

    tracing::info!(log_dir = %log_dir.display(), "tracing initialized");

    Some(LoggingGuard { _guard: guard })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_log_dir_is_namespaced() {
        if let Some(dir) = default_log_dir() {
            assert!(dir.ends_with("zen-editor/logs"));
        }
    }

    #[test]
    fn env_filter_falls_back_to_default() {
        // Only meaningful when the variable is unset in the test environment.
        if std::env::var(LOG_ENV).is_err() {
            assert_eq!(env_filter().to_string(), DEFAULT_FILTER);
        }
    }
}
