//! Logging setup
//!
//! Warnings and errors go to stderr so they never mix with listing output on
//! stdout. Debug mode additionally writes everything to the debug log file.
//! `RUST_LOG` overrides the default filter.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

use crate::utils::get_debug_log_path;

/// Keeps the file writer alive; pending lines are flushed on drop
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Default stderr level for the given mode
pub fn stderr_level(debug: bool) -> LevelFilter {
    if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    }
}

pub fn init_logging(debug: bool) -> LogGuard {
    let env_filter = EnvFilter::builder()
        .with_default_directive(stderr_level(debug).into())
        .from_env_lossy();

    let (file_layer, file_guard) = if debug {
        let log_path = get_debug_log_path();
        let parent_dir = log_path.parent().unwrap_or(Path::new("."));
        let filename = log_path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("sharelist-debug.log");

        let file_appender = tracing_appender::rolling::never(parent_dir, filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let layer = fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_writer(non_blocking)
            .with_filter(LevelFilter::DEBUG);

        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    let stderr_layer = fmt::layer()
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();

    LogGuard {
        _file_guard: file_guard,
    }
}
