use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::Result;

const LOG_FILE: &str = "coursebow.log";

/// Routes tracing output to a daily rolling file; the terminal is owned by
/// the UI. Keep the guard alive until exit or buffered lines are lost.
///
/// Fails with [`CourseError::Logging`](crate::error::CourseError::Logging) if a global subscriber is already set.
pub fn init_file_logger(log_dir: &Path, verbose: bool) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("coursebow=debug,info")
        } else {
            EnvFilter::new("coursebow=info,warn")
        }
    });

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .compact(),
        )
        .try_init()?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CourseError;

    #[test]
    fn second_install_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let _first = init_file_logger(dir.path(), false);

        let second = init_file_logger(dir.path(), true);
        assert!(matches!(second, Err(CourseError::Logging(_))));
        assert!(dir.path().exists());
    }
}
