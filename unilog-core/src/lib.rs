//! # unilog-core
//! Core pieces of unilog: ANSI color codes, severity labels, fixed-width UTC
//! timestamps, and the stream/file [`Logger`].

pub mod color;
mod log_writer;
mod logger;
mod severity;
pub mod timestamp;

pub use log_writer::{LogFile, LogStream, LogWriter, SharedBuffer, strip_ansi};
pub use logger::{Logger, LoggerParts, format_log};
pub use severity::{ParseSeverityError, Route, Severity};
pub use timestamp::{Precision, TimestampError, UtcFields, format_timestamp, get_timestamp};
