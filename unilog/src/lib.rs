//! # unilog
//! Timestamped, severity-colored logging to console streams and append-only files.
//!
//! ## Usage
//! ```toml
//! // Cargo.toml
//! ...
//! [dependencies]
//! unilog = "0.1.0"
//! ```
//!
//! ```rust
//! use unilog::{Severity, logger_config};
//!
//! let mut logger = logger_config().build();
//! logger.log(Severity::Info, "ready").unwrap(); // stdout
//! logger.log(Severity::Warn, "low memory").unwrap(); // also stdout: no error stream was given
//! ```
//!
//! ## Logging to files
//! Files are created if they do not exist and appended to if they do. `Info`
//! lines go to the output file, everything else to the error file, which is
//! the output file itself unless one is given.
//!
//! ```rust
//! use unilog::{Severity, logger_config};
//!
//! let path = std::env::temp_dir().join("unilog_doc_app.log");
//! let mut logger = logger_config()
//!     .with_err_stream(std::io::stderr())
//!     .with_out_file(&path)
//!     .expect("Unable to open log file")
//!     .build();
//!
//! logger.log(Severity::Fatal, "disk full").unwrap();
//! logger.close_files().unwrap();
//! assert!(std::fs::read_to_string(&path).unwrap().ends_with("disk full\n"));
//! ```
//!
//! ## Behind the `log` facade
//! ```rust
//! use unilog::logger_config;
//!
//! let _guard = logger_config().init_global().expect("a logger is already installed");
//! log::info!("Hello, world!");
//! // guard flushes the log files when dropped
//! ```

mod config;

use std::{
    io::Write,
    path::Path,
    sync::Mutex,
};

use log::{LevelFilter, Log, SetLoggerError};

pub use config::{UNILOG_CONFIG, UnilogConfig};
pub use unilog_core::{
    LogFile, LogStream, LogWriter, Logger, LoggerParts, ParseSeverityError, Precision, Route,
    Severity, SharedBuffer, TimestampError, UtcFields, color, format_log, format_timestamp,
    get_timestamp, strip_ansi, timestamp,
};

/// Builder for configuring a [`Logger`].
///
/// Unset handles are resolved once, in [`ConfigBuilder::build`], in this order:
/// the output stream becomes stdout, the error stream becomes the output
/// stream, no output file is opened, and the error file becomes the output file.
pub struct ConfigBuilder {
    out_stream: Option<LogStream>,
    err_stream: Option<LogStream>,
    out_file: Option<LogFile>,
    err_file: Option<LogFile>,
    precision: Precision,
    file_ansi: bool,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            out_stream: None,
            err_stream: None,
            out_file: None,
            err_file: None,
            precision: Precision::Millis,
            file_ansi: true,
        }
    }
}

impl ConfigBuilder {
    /// Resolves the defaults and creates the logger.
    pub fn build(self) -> Logger {
        let Self {
            out_stream,
            err_stream,
            out_file,
            err_file,
            precision,
            file_ansi,
        } = self;
        let parts = LoggerParts {
            out_stream: out_stream.unwrap_or_else(LogStream::stdout),
            err_stream,
            out_file: out_file.map(|file| file.with_ansi(file_ansi)),
            err_file: err_file.map(|file| file.with_ansi(file_ansi)),
        };
        Logger::new(parts, precision)
    }

    /// Sets the stream `Info` lines are written to.
    pub fn with_out_stream<W: Write + Send + 'static>(self, stream: W) -> Self {
        Self {
            out_stream: Some(LogStream::new(stream)),
            ..self
        }
    }
    /// Sets the stream `Warn`, `Severe` and `Fatal` lines are written to.
    pub fn with_err_stream<W: Write + Send + 'static>(self, stream: W) -> Self {
        Self {
            err_stream: Some(LogStream::new(stream)),
            ..self
        }
    }
    /// Opens the output file in append mode.
    pub fn with_out_file<P: AsRef<Path>>(self, path: P) -> Result<Self, std::io::Error> {
        Ok(Self {
            out_file: Some(LogFile::new(path)?),
            ..self
        })
    }
    /// Maybe opens the output file.
    pub fn maybe_with_out_file<P: AsRef<Path>>(
        self,
        path: Option<P>,
    ) -> Result<Self, std::io::Error> {
        Ok(Self {
            out_file: path.map(LogFile::new).transpose()?,
            ..self
        })
    }
    /// Opens a dedicated error file in append mode.
    pub fn with_err_file<P: AsRef<Path>>(self, path: P) -> Result<Self, std::io::Error> {
        Ok(Self {
            err_file: Some(LogFile::new(path)?),
            ..self
        })
    }
    /// Maybe opens a dedicated error file.
    pub fn maybe_with_err_file<P: AsRef<Path>>(
        self,
        path: Option<P>,
    ) -> Result<Self, std::io::Error> {
        Ok(Self {
            err_file: path.map(LogFile::new).transpose()?,
            ..self
        })
    }
    /// Sets the timestamp precision.
    pub fn with_precision(self, precision: Precision) -> Self {
        Self { precision, ..self }
    }
    /// Keep (`true`) or strip (`false`) color codes in log files.
    pub fn with_file_ansi(self, file_ansi: bool) -> Self {
        Self { file_ansi, ..self }
    }
    /// Installs the logger as the backend of the `log` crate.
    ///
    /// Every record is logged: `error!` maps to `Severe`, `warn!` to `Warn`,
    /// the rest to `Info`. Returns a guard that flushes the files when dropped.
    #[must_use = "LoggerGuard must be kept alive to flush log files. Do \"let _guard = logger_config().init_global()?;\""]
    pub fn init_global(self) -> Result<LoggerGuard, SetLoggerError> {
        log::set_boxed_logger(Box::new(UnilogBridge {
            logger: Mutex::new(self.build()),
        }))?;
        log::set_max_level(LevelFilter::Trace);
        Ok(LoggerGuard { _private: () })
    }
}

/// Returns a [`ConfigBuilder`] seeded from the `UNILOG_*` environment variables.
pub fn logger_config() -> ConfigBuilder {
    ConfigBuilder {
        precision: UNILOG_CONFIG.precision(),
        file_ansi: UNILOG_CONFIG.FILE_ANSI,
        ..ConfigBuilder::default()
    }
}

/// Guard that flushes the global logger when dropped.
/// Hold this guard for the lifetime of your logging session.
pub struct LoggerGuard {
    _private: (),
}

impl Drop for LoggerGuard {
    fn drop(&mut self) {
        log::logger().flush();
    }
}

/// Adapts a [`Logger`] to the `log` crate.
struct UnilogBridge {
    logger: Mutex<Logger>,
}

impl Log for UnilogBridge {
    fn enabled(&self, _: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        if let Ok(mut logger) = self.logger.lock() {
            logger
                .log(record.level().into(), &record.args().to_string())
                .ok();
        }
    }

    fn flush(&self) {
        if let Ok(mut logger) = self.logger.lock() {
            logger.flush().ok();
        }
    }
}
