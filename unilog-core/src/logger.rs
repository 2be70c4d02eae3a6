use std::{fmt, io};

use chrono::{DateTime, Utc};

use crate::{
    log_writer::{LogFile, LogStream, LogWriter},
    severity::{Route, Severity},
    timestamp::{Precision, format_timestamp},
};

/// Builds one log line, without the trailing newline.
pub fn format_log(
    severity: Severity,
    message: &str,
    instant: &DateTime<Utc>,
    precision: Precision,
) -> String {
    let time = format_timestamp(instant, precision);
    format!("[{time}] {} {message}", severity.label())
}

/// Handles a [`Logger`] writes to, already opened.
///
/// `err_stream` and `err_file` fall back to their output counterparts when left empty.
#[derive(Debug)]
pub struct LoggerParts {
    pub out_stream: LogStream,
    pub err_stream: Option<LogStream>,
    pub out_file: Option<LogFile>,
    pub err_file: Option<LogFile>,
}

impl LoggerParts {
    pub fn new(out_stream: LogStream) -> Self {
        Self {
            out_stream,
            err_stream: None,
            out_file: None,
            err_file: None,
        }
    }
}

#[derive(Debug)]
enum ErrFile {
    SharedWithOut,
    Dedicated(LogFile),
}

/// Writes timestamped, colored lines to a pair of streams and optional files.
///
/// `Info` lines go to the output stream and file, every other severity to the
/// error stream and file.
pub struct Logger {
    out_stream: LogStream,
    err_stream: Option<LogStream>,
    out_file: Option<LogFile>,
    err_file: ErrFile,
    precision: Precision,
}

impl Logger {
    pub fn new(parts: LoggerParts, precision: Precision) -> Self {
        let LoggerParts {
            out_stream,
            err_stream,
            out_file,
            err_file,
        } = parts;
        Self {
            out_stream,
            err_stream,
            out_file,
            err_file: err_file.map_or(ErrFile::SharedWithOut, ErrFile::Dedicated),
            precision,
        }
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Whether any file is still open.
    pub fn has_files(&self) -> bool {
        self.out_file.is_some() || matches!(self.err_file, ErrFile::Dedicated(_))
    }

    /// Whether error lines land in the output file rather than a file of their own.
    pub fn shares_err_file(&self) -> bool {
        matches!(self.err_file, ErrFile::SharedWithOut)
    }

    /// Logs `message` stamped with the current time.
    pub fn log(&mut self, severity: Severity, message: &str) -> io::Result<()> {
        self.log_at(&Utc::now(), severity, message)
    }

    /// Logs `message` stamped with `instant`.
    ///
    /// The stream and the file are both attempted; the first error is
    /// returned as-is and nothing already written is undone.
    pub fn log_at(
        &mut self,
        instant: &DateTime<Utc>,
        severity: Severity,
        message: &str,
    ) -> io::Result<()> {
        let line = format_log(severity, message, instant, self.precision);
        let (stream, file) = self.sinks(severity.route());
        let stream_result = stream.regular(&line);
        let file_result = file.map_or(Ok(()), |file| file.regular(&line));
        stream_result.and(file_result)
    }

    fn sinks(&mut self, route: Route) -> (&mut LogStream, Option<&mut LogFile>) {
        match route {
            Route::Out => (&mut self.out_stream, self.out_file.as_mut()),
            Route::Err => {
                let stream = self.err_stream.as_mut().unwrap_or(&mut self.out_stream);
                let file = match &mut self.err_file {
                    ErrFile::SharedWithOut => self.out_file.as_mut(),
                    ErrFile::Dedicated(file) => Some(file),
                };
                (stream, file)
            }
        }
    }

    /// Flushes every stream and file.
    pub fn flush(&mut self) -> io::Result<()> {
        let mut result = self.out_stream.flush();
        if let Some(stream) = &mut self.err_stream {
            result = result.and(stream.flush());
        }
        if let Some(file) = &mut self.out_file {
            result = result.and(file.flush());
        }
        if let ErrFile::Dedicated(file) = &mut self.err_file {
            result = result.and(file.flush());
        }
        result
    }

    /// Closes the files, reporting each one through its callback.
    ///
    /// `on_out` runs once the output file is closed, `on_err` once a dedicated
    /// error file is closed. A callback whose file was never opened (or is
    /// shared with the output file) is not called. Streams stay open.
    pub fn close_files_with<O, E>(&mut self, on_out: O, on_err: E)
    where
        O: FnOnce(io::Result<()>),
        E: FnOnce(io::Result<()>),
    {
        if let Some(file) = self.out_file.take() {
            on_out(file.close());
        }
        if let ErrFile::Dedicated(file) =
            std::mem::replace(&mut self.err_file, ErrFile::SharedWithOut)
        {
            on_err(file.close());
        }
    }

    /// Closes the files, returning the first error.
    pub fn close_files(&mut self) -> io::Result<()> {
        let mut result = Ok(());
        if let Some(file) = self.out_file.take() {
            result = file.close();
        }
        if let ErrFile::Dedicated(file) =
            std::mem::replace(&mut self.err_file, ErrFile::SharedWithOut)
        {
            result = result.and(file.close());
        }
        result
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("out_file", &self.out_file.as_ref().map(LogFile::path))
            .field("err_file", &self.err_file)
            .field("precision", &self.precision)
            .finish_non_exhaustive()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.flush().ok();
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, path::Path};

    use super::*;
    use crate::{log_writer::SharedBuffer, timestamp::UtcFields};

    const PREFIX_LEN: usize = 27;

    fn expected_line(severity: Severity, message: &str) -> String {
        format!("{} {message}\n", severity.label())
    }

    fn separate_streams() -> (Logger, SharedBuffer, SharedBuffer) {
        let out = SharedBuffer::new();
        let err = SharedBuffer::new();
        let parts = LoggerParts {
            err_stream: Some(LogStream::new(err.clone())),
            ..LoggerParts::new(LogStream::new(out.clone()))
        };
        (Logger::new(parts, Precision::Millis), out, err)
    }

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_fatal_line() {
        let (mut logger, out, err) = separate_streams();
        let instant = UtcFields::new(2021, 12, 9)
            .with_time(8, 3, 4, 7)
            .to_instant()
            .unwrap();
        logger.log_at(&instant, Severity::Fatal, "disk full").unwrap();
        assert!(out.is_empty());
        assert_eq!(
            err.contents(),
            "[2021-12-09T08:03:04.007Z] \x1b[31m\x1b[91mFATAL\x1b[0m disk full\n"
        );
    }

    #[test]
    fn test_routing_with_separate_streams() {
        for severity in Severity::ALL {
            let (mut logger, out, err) = separate_streams();
            logger.log(severity, "entry").unwrap();
            let (hit, miss) = match severity {
                Severity::Info => (out, err),
                _ => (err, out),
            };
            assert!(miss.is_empty(), "{severity} written to the wrong stream");
            assert_eq!(&hit.contents()[PREFIX_LEN..], expected_line(severity, "entry"));
        }
    }

    #[test]
    fn test_err_stream_defaults_to_out_stream() {
        let out = SharedBuffer::new();
        let mut logger = Logger::new(LoggerParts::new(LogStream::new(out.clone())), Precision::Millis);
        for severity in Severity::ALL {
            logger.log(severity, "entry").unwrap();
            assert_eq!(&out.take()[PREFIX_LEN..], expected_line(severity, "entry"));
        }
    }

    #[test]
    fn test_message_is_not_escaped() {
        let (mut logger, out, _) = separate_streams();
        logger.log(Severity::Info, "a\tb\x1b[1m\nc").unwrap();
        assert!(out.contents().ends_with(" a\tb\x1b[1m\nc\n"));
    }

    #[test]
    fn test_seconds_precision_prefix() {
        let out = SharedBuffer::new();
        let mut logger = Logger::new(LoggerParts::new(LogStream::new(out.clone())), Precision::Seconds);
        logger.log(Severity::Warn, "late").unwrap();
        let line = out.contents();
        assert_eq!(&line[20..25], "+00Z]");
        assert_eq!(&line[26..], expected_line(Severity::Warn, "late"));
    }

    #[test]
    fn test_out_file_shared_by_error_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.log");
        let out = SharedBuffer::new();
        let err = SharedBuffer::new();
        let parts = LoggerParts {
            err_stream: Some(LogStream::new(err.clone())),
            out_file: Some(LogFile::new(&path).unwrap()),
            ..LoggerParts::new(LogStream::new(out.clone()))
        };
        let mut logger = Logger::new(parts, Precision::Millis);
        assert!(logger.shares_err_file());

        logger.log(Severity::Info, "first").unwrap();
        logger.log(Severity::Severe, "second").unwrap();

        let closed = Cell::new(0);
        logger.close_files_with(
            |result| {
                result.unwrap();
                closed.set(closed.get() + 1);
            },
            |_| panic!("shared file closed twice"),
        );
        assert_eq!(closed.get(), 1);
        assert!(!logger.has_files());

        let content = read(&path);
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(&lines[0][PREFIX_LEN..], format!("{} first", Severity::Info.label()));
        assert_eq!(&lines[1][PREFIX_LEN..], format!("{} second", Severity::Severe.label()));
        assert_eq!(&out.contents()[PREFIX_LEN..], expected_line(Severity::Info, "first"));
        assert_eq!(&err.contents()[PREFIX_LEN..], expected_line(Severity::Severe, "second"));
    }

    #[test]
    fn test_file_routing_with_dedicated_err_file() {
        for severity in Severity::ALL {
            let dir = tempfile::tempdir().unwrap();
            let out_path = dir.path().join("out.log");
            let err_path = dir.path().join("err.log");
            let parts = LoggerParts {
                out_file: Some(LogFile::new(&out_path).unwrap()),
                err_file: Some(LogFile::new(&err_path).unwrap()),
                ..LoggerParts::new(LogStream::new(SharedBuffer::new()))
            };
            let mut logger = Logger::new(parts, Precision::Millis);
            assert!(!logger.shares_err_file());
            logger.log(severity, "entry").unwrap();

            let out_closed = Cell::new(false);
            let err_closed = Cell::new(false);
            logger.close_files_with(
                |result| out_closed.set(result.is_ok()),
                |result| err_closed.set(result.is_ok()),
            );
            assert!(out_closed.get() && err_closed.get());

            let (hit, miss) = match severity.route() {
                Route::Out => (out_path, err_path),
                Route::Err => (err_path, out_path),
            };
            assert_eq!(&read(&hit)[PREFIX_LEN..], expected_line(severity, "entry"));
            assert_eq!(read(&miss), "");
        }
    }

    #[test]
    fn test_err_file_without_out_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("err.log");
        let parts = LoggerParts {
            err_file: Some(LogFile::new(&path).unwrap()),
            ..LoggerParts::new(LogStream::new(SharedBuffer::new()))
        };
        let mut logger = Logger::new(parts, Precision::Millis);
        logger.log(Severity::Info, "only stream").unwrap();
        logger.log(Severity::Warn, "file too").unwrap();
        logger.close_files().unwrap();
        assert_eq!(&read(&path)[PREFIX_LEN..], expected_line(Severity::Warn, "file too"));
    }

    #[test]
    fn test_close_without_files() {
        let (mut logger, _, _) = separate_streams();
        assert!(!logger.has_files());
        logger.close_files_with(
            |_| panic!("no output file was opened"),
            |_| panic!("no error file was opened"),
        );
        logger.close_files().unwrap();
    }

    #[test]
    fn test_logging_after_close_reaches_streams_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.log");
        let out = SharedBuffer::new();
        let parts = LoggerParts {
            out_file: Some(LogFile::new(&path).unwrap()),
            ..LoggerParts::new(LogStream::new(out.clone()))
        };
        let mut logger = Logger::new(parts, Precision::Millis);
        logger.log(Severity::Info, "before").unwrap();
        logger.close_files().unwrap();
        logger.close_files().unwrap();
        logger.log(Severity::Info, "after").unwrap();
        assert_eq!(read(&path).lines().count(), 1);
        assert_eq!(out.contents().lines().count(), 2);
    }

    #[test]
    fn test_lines_land_in_call_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.log");
        let parts = LoggerParts {
            out_file: Some(LogFile::new(&path).unwrap()),
            ..LoggerParts::new(LogStream::new(SharedBuffer::new()))
        };
        let mut logger = Logger::new(parts, Precision::Millis);
        for i in 0..100 {
            let severity = Severity::ALL[i % 4];
            logger.log(severity, &format!("line {i}")).unwrap();
        }
        logger.close_files().unwrap();

        let content = read(&path);
        assert!(content.ends_with('\n'));
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 100);
        for (i, line) in lines.iter().enumerate() {
            assert!(line.ends_with(&format!(" line {i}")));
        }
    }

    #[test]
    fn test_drop_flushes_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.log");
        let parts = LoggerParts {
            out_file: Some(LogFile::new(&path).unwrap()),
            ..LoggerParts::new(LogStream::new(SharedBuffer::new()))
        };
        let mut logger = Logger::new(parts, Precision::Millis);
        logger.log(Severity::Info, "kept").unwrap();
        drop(logger);
        assert_eq!(&read(&path)[PREFIX_LEN..], expected_line(Severity::Info, "kept"));
    }

    #[test]
    fn test_stream_error_is_returned() {
        struct Broken;
        impl io::Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.log");
        let parts = LoggerParts {
            out_file: Some(LogFile::new(&path).unwrap()),
            ..LoggerParts::new(LogStream::new(Broken))
        };
        let mut logger = Logger::new(parts, Precision::Millis);
        let err = logger.log(Severity::Info, "still filed").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        logger.close_files().unwrap();
        assert_eq!(read(&path).lines().count(), 1);
    }
}
