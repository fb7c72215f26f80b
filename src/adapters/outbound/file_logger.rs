use chrono::Utc;
use log::LevelFilter;
use std::sync::Arc;

use crate::domains::logger::{DynLogger, MissionLogger};

/// Forwards mission lines to the `log` facade, which `fast_log` drains into a file.
struct FileSink;

impl MissionLogger for FileSink {
    fn info(&self, msg: &str) {
        log::info!("{} - {}", Utc::now().to_rfc3339(), msg);
    }

    fn warn(&self, msg: &str) {
        log::warn!("{} - {}", Utc::now().to_rfc3339(), msg);
    }

    fn error(&self, msg: &str) {
        log::error!("{} - {}", Utc::now().to_rfc3339(), msg);
    }
}

/// Install `fast_log` as the global `log` backend writing to `path`.
/// Fails if another `log` backend is already installed.
pub fn init_file_logger(path: &str) -> Result<DynLogger, String> {
    fast_log::init(
        fast_log::config::Config::new()
            .file(path)
            .level(LevelFilter::Info),
    )
    .map_err(|e| format!("Failed to initialize fast_log at {}: {}", path, e))?;
    Ok(Arc::new(FileSink))
}

/// Flush buffered lines before the process exits.
pub fn flush_file_logger() {
    log::logger().flush();
}
