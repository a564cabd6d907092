//! Dual-output logger for navigation diagnostics.
//!
//! This module implements the [`log`] crate's logging facade, writing every
//! record to the console and appending it to a log file. On the V5 Brain the
//! file lives on the SD card; on a host it is wherever the path points.
//!
//! # Usage
//!
//! Initialize the logger once at the start of your program:
//!
//! ```ignore
//! use beacon_nav::fs::logger;
//! use log::LevelFilter;
//!
//! logger::init(LevelFilter::Info)?;
//! ```
//!
//! # Log Output
//!
//! Each line carries the level, the uptime, the module path and the message:
//!
//! ```text
//! INFO [2m 5s 123ms] beacon_nav::motion::turn - turn done: intended 90.00, actual 86.41
//! WARN [2m 7s 10ms] beacon_nav::motion::deadzone - Recovering from deadzone, last valid (12.0, 3.5, 271.2)
//! ```

use std::{
    fmt,
    fs::OpenOptions,
    io::{BufWriter, Write},
    path::Path,
    sync::{Mutex, OnceLock},
    time::Duration,
};

use humantime::format_duration;
use log::{Level, LevelFilter, Metadata, Record};

use crate::error::Result;

/// Default log file name.
pub const DEFAULT_LOG_PATH: &str = "nav_log.txt";

/// A logger writing to the console and, if available, a file.
pub struct NavLogger {
    /// `None` when no file could be opened (e.g. no SD card present).
    file_writer: Mutex<Option<BufWriter<std::fs::File>>>,
}

impl NavLogger {
    fn new(file: Option<std::fs::File>) -> Self {
        Self {
            file_writer: Mutex::new(file.map(BufWriter::new)),
        }
    }
}

impl log::Log for NavLogger {
    fn enabled(&self, metadata: &Metadata) -> bool { metadata.level() <= log::max_level() }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(record.level(), uptime(), record.target(), record.args());

        print!("{}", line);

        if let Ok(mut guard) = self.file_writer.lock()
            && let Some(writer) = guard.as_mut()
        {
            let _ = writer.write_all(line.as_bytes());
        }
    }

    fn flush(&self) {
        if let Ok(mut guard) = self.file_writer.lock()
            && let Some(writer) = guard.as_mut()
        {
            let _ = writer.flush();
        }
    }
}

static LOGGER: OnceLock<NavLogger> = OnceLock::new();

/// Installs the logger, appending to [`DEFAULT_LOG_PATH`] when it can be opened.
///
/// A missing or read-only file system only disables the file output.
///
/// # Errors
///
/// Returns [`NavError::Logger`](crate::error::NavError::Logger) if a logger
/// has already been set.
pub fn init(level: LevelFilter) -> Result<()> {
    let file = open_append(DEFAULT_LOG_PATH).ok();
    install(NavLogger::new(file), level)
}

/// Installs the logger, appending to `path`.
///
/// # Errors
///
/// Returns [`NavError::Io`](crate::error::NavError::Io) if the file cannot be
/// opened, or [`NavError::Logger`](crate::error::NavError::Logger) if a
/// logger has already been set.
pub fn init_with_path<P: AsRef<Path>>(path: P, level: LevelFilter) -> Result<()> {
    let file = open_append(path)?;
    install(NavLogger::new(Some(file)), level)
}

fn open_append<P: AsRef<Path>>(path: P) -> std::io::Result<std::fs::File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn install(logger: NavLogger, level: LevelFilter) -> Result<()> {
    let logger = LOGGER.get_or_init(|| logger);
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Formats one log line, newline included.
pub fn format_line(level: Level, uptime: Duration, target: &str, args: impl fmt::Display) -> String {
    format!("{} [{}] {} - {}\n", level, format_duration(uptime), target, args)
}

/// Time since the user program started, truncated to milliseconds.
fn uptime() -> Duration {
    #[cfg(target_os = "vexos")]
    let dur = vexide::time::user_uptime();
    #[cfg(not(target_os = "vexos"))]
    let dur = {
        static START: OnceLock<std::time::Instant> = OnceLock::new();
        START.get_or_init(std::time::Instant::now).elapsed()
    };
    Duration::from_millis(dur.as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use log::{Level, LevelFilter, debug, info, warn};

    use super::*;
    use crate::error::NavError;

    #[test]
    fn line_layout() {
        let line = format_line(
            Level::Warn,
            Duration::from_millis(125_432),
            "beacon_nav::motion::deadzone",
            "lost coverage",
        );
        assert_eq!(line, "WARN [2m 5s 432ms] beacon_nav::motion::deadzone - lost coverage\n");
    }

    #[test]
    fn uptime_is_millisecond_granular() {
        assert_eq!(uptime().subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn missing_directory_is_io_error() {
        let err = init_with_path("/nonexistent-dir/for/sure/nav.txt", LevelFilter::Info);
        assert!(matches!(err, Err(NavError::Io(_))));
    }

    #[test]
    fn second_install_is_logger_error() {
        let _ = install(NavLogger::new(None), LevelFilter::Off);
        match install(NavLogger::new(None), LevelFilter::Off) {
            Err(e @ NavError::Logger(_)) => {
                assert!(e.to_string().starts_with("logger error: "));
                assert!(std::error::Error::source(&e).is_some());
            }
            other => panic!("expected a logger error, got {:?}", other),
        }
    }

    #[test]
    #[ignore = "installs the global logger and writes to the working directory"]
    fn log_full_test() {
        init(LevelFilter::Trace).expect("Failed to initialize logger");

        debug!("This is a debug message");
        info!("This is an info message");
        warn!("This is a warning message");

        log::logger().flush();
        assert!(log::logger().enabled(&Metadata::builder().level(Level::Warn).target("test").build()));
    }
}
