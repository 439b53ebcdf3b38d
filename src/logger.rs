//! Custom logging module.
//!
//! This module provides a logger implementation that formats log entries and
//! forwards them to a callback, so the host decides where they end up.

use crate::error::AppError;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::{Arc, Mutex};

type LogCallback = Box<dyn Fn(String) + Send + Sync>;

/// Format a log record into a string for display
///
pub fn format_log(record: &Record) -> String {
    let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let level_str = match record.level() {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    };
    format!("{} {} {}", timestamp, level_str, record.args())
}

/// Logger that forwards formatted records at or above its level to a
/// callback.
///
pub struct CustomLogger {
    level: LevelFilter,
    log_callback: Arc<Mutex<Option<LogCallback>>>,
}

impl CustomLogger {
    pub fn new(level: LevelFilter) -> Self {
        CustomLogger {
            level,
            log_callback: Arc::new(Mutex::new(None)),
        }
    }

    pub fn set_log_callback(&self, callback: LogCallback) {
        if let Ok(mut guard) = self.log_callback.lock() {
            *guard = Some(callback);
        }
    }

    /// Install this logger as the global `log` backend.
    ///
    pub fn init(self) -> Result<(), AppError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self)).map_err(|e| AppError::Logger(e.to_string()))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            if let Ok(callback) = self.log_callback.lock() {
                if let Some(ref cb) = *callback {
                    cb(format_log(record));
                }
            }
        }
    }

    fn flush(&self) {}
}
