//! Logging
//!
//! Console and file logging with independent levels and text or JSON
//! line formats, installed as the global `log` backend at startup.

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use log::{Level, LevelFilter};
use parking_lot::Mutex;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("invalid log format: {}. Valid options: text, json", s)),
        }
    }
}

/// Log destination options
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    Console,
    File(PathBuf),
    Both(PathBuf),
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub console_level: LevelFilter,
    pub file_level: Option<LevelFilter>,
    pub format: LogFormat,
    pub destination: LogDestination,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            console_level: LevelFilter::Info,
            file_level: None,
            format: LogFormat::Text,
            destination: LogDestination::Console,
        }
    }
}

/// One structured log line in JSON format
#[derive(Debug, Serialize)]
struct JsonLine<'a> {
    timestamp: &'a str,
    level: &'a str,
    message: &'a str,
}

/// Global logger writing to stderr and optionally an append-mode file.
struct ScanLogger {
    config: LogConfig,
    file: Option<Mutex<File>>,
}

impl ScanLogger {
    fn new(config: LogConfig) -> Result<Self> {
        let file = match &config.destination {
            LogDestination::File(path) | LogDestination::Both(path) => {
                let handle = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("failed to open log file: {}", path.display()))?;
                Some(Mutex::new(handle))
            }
            LogDestination::Console => None,
        };
        Ok(Self { config, file })
    }

    fn render(&self, level: Level, message: &str) -> String {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let level_name = level.to_string().to_uppercase();
        match self.config.format {
            LogFormat::Text => format!("{} [{}] {}", timestamp, level_name, message),
            LogFormat::Json => {
                let line = JsonLine {
                    timestamp: &timestamp,
                    level: &level_name,
                    message,
                };
                serde_json::to_string(&line)
                    .unwrap_or_else(|_| format!("{} [{}] {}", timestamp, level_name, message))
            }
        }
    }

    fn console_enabled(&self, level: Level) -> bool {
        !matches!(self.config.destination, LogDestination::File(_))
            && level <= self.config.console_level
    }

    fn file_enabled(&self, level: Level) -> bool {
        self.file.is_some()
            && level <= self.config.file_level.unwrap_or(self.config.console_level)
    }
}

impl log::Log for ScanLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.console_enabled(metadata.level()) || self.file_enabled(metadata.level())
    }

    fn log(&self, record: &log::Record) {
        let level = record.level();
        let to_console = self.console_enabled(level);
        let to_file = self.file_enabled(level);
        if !to_console && !to_file {
            return;
        }

        let line = self.render(level, &record.args().to_string());
        if to_console {
            let _ = writeln!(io::stderr(), "{}", line);
        }
        if to_file {
            if let Some(file) = &self.file {
                let mut handle = file.lock();
                if let Err(e) = writeln!(handle, "{}", line) {
                    eprintln!("file logging error: {}", e);
                }
            }
        }
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
        if let Some(file) = &self.file {
            let _ = file.lock().flush();
        }
    }
}

/// Initialize the logging system with the given configuration
pub fn init_logger(config: LogConfig) -> Result<()> {
    let max_level = config
        .file_level
        .map(|file_level| file_level.max(config.console_level))
        .unwrap_or(config.console_level);

    let logger = ScanLogger::new(config)?;
    log::set_boxed_logger(Box::new(logger)).context("failed to set global logger")?;
    log::set_max_level(max_level);
    Ok(())
}

/// Convert a level name to a LevelFilter
pub fn parse_log_level(level_str: &str) -> Result<LevelFilter> {
    match level_str.to_lowercase().as_str() {
        "error" => Ok(LevelFilter::Error),
        "warn" => Ok(LevelFilter::Warn),
        "info" => Ok(LevelFilter::Info),
        "debug" => Ok(LevelFilter::Debug),
        "trace" => Ok(LevelFilter::Trace),
        "off" => Ok(LevelFilter::Off),
        _ => Err(anyhow!(
            "invalid log level: {}. Valid levels: error, warn, info, debug, trace, off",
            level_str
        )),
    }
}
