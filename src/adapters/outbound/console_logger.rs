use chrono::Utc;
use std::sync::Arc;

use crate::domains::logger::{DynLogger, MissionLogger};

/// Writes mission lines to the terminal; errors go to stderr.
struct ConsoleSink;

impl ConsoleSink {
    fn stamp() -> String {
        Utc::now().format("%H:%M:%S%.3f").to_string()
    }
}

impl MissionLogger for ConsoleSink {
    fn info(&self, msg: &str) {
        println!("[{}] INFO  {}", Self::stamp(), msg);
    }

    fn warn(&self, msg: &str) {
        println!("[{}] WARN  {}", Self::stamp(), msg);
    }

    fn error(&self, msg: &str) {
        eprintln!("[{}] ERROR {}", Self::stamp(), msg);
    }
}

/// Console-backed mission logger, also the fallback when no file sink is available.
pub fn init_console_logger() -> DynLogger {
    Arc::new(ConsoleSink)
}
