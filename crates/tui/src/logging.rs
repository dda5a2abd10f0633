use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, EnvFilter};

/// Logs go to `<data_dir>/roast/logs`; stdout belongs to the terminal UI.
/// Keep the returned guard alive until exit so buffered lines are flushed.
/// Logging is optional: any failure leaves the app running without it.
pub fn init() -> Option<WorkerGuard> {
    init_in(crate::persist::data_dir().map(|d| d.join("logs")))
}

fn init_in(dir: Option<PathBuf>) -> Option<WorkerGuard> {
    let dir = dir?;
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("roast: logging disabled, cannot create {}: {}", dir.display(), e);
        return None;
    }
    let appender = tracing_appender::rolling::daily(&dir, "roast.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
    {
        eprintln!("roast: logging disabled: {}", e);
        return None;
    }
    Some(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwritable_log_dir_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, b"x").unwrap();
        assert!(init_in(Some(file.join("logs"))).is_none());
    }

    #[test]
    fn no_data_dir_means_no_logging() {
        assert!(init_in(None).is_none());
    }
}
