//! Logging Infrastructure
//!
//! `tracing-subscriber` with an `EnvFilter`; output goes to stdout, or to a
//! daily rolling file when a log directory is configured and exists.

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Filter used when neither `RUST_LOG` nor a level is given
const DEFAULT_DIRECTIVES: &str = "pizza_server=info,tower_http=info";

/// Initialize the logger on stdout
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize the logger with optional file output
///
/// `RUST_LOG` wins over `log_level`; `log_level` alone applies to this crate
/// and the HTTP layers.
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match log_level {
        Some(level) => EnvFilter::new(format!("pizza_server={level},tower_http={level}")),
        None => EnvFilter::new(DEFAULT_DIRECTIVES),
    });

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.exists()
            && let Some(dir_str) = log_path.to_str()
        {
            let file_appender = tracing_appender::rolling::daily(dir_str, "pizza-server");
            // try_init: a second call (tests) keeps the first subscriber
            let _ = subscriber.with_ansi(false).with_writer(file_appender).try_init();
            return;
        }
    }

    let _ = subscriber.try_init();
}
