use std::{
    borrow::Cow,
    fmt,
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    sync::{Arc, LazyLock, Mutex},
};

use regex::Regex;

static ANSI_SEQUENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\x1b\\[[0-9;]*m").expect("ANSI pattern is valid"));

/// Removes SGR escape sequences (colors and styles) from `line`.
pub fn strip_ansi(line: &str) -> Cow<'_, str> {
    ANSI_SEQUENCE.replace_all(line, "")
}

/// A destination for formatted log lines.
pub trait LogWriter {
    /// Writes `line` followed by a newline.
    fn regular(&mut self, line: &str) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
}

/// A stream handed in by the caller (stdout, stderr, a socket, a buffer...).
///
/// Every line is flushed right away so nothing sits in the logger.
pub struct LogStream {
    stream: Box<dyn Write + Send>,
}

impl LogStream {
    pub fn new<W: Write + Send + 'static>(stream: W) -> Self {
        Self {
            stream: Box::new(stream),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl fmt::Debug for LogStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogStream").finish_non_exhaustive()
    }
}

impl LogWriter for LogStream {
    fn regular(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.stream, "{line}")?;
        self.stream.flush()
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }
}

/// A log file opened in append mode.
#[derive(Debug)]
pub struct LogFile {
    path: PathBuf,
    file: BufWriter<File>,
    ansi: bool,
}

impl LogFile {
    /// Opens `path` for appending, creating it if needed.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, io::Error> {
        let file = File::options().create(true).append(true).open(&path)?;
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            file: BufWriter::new(file),
            ansi: true,
        })
    }

    /// Whether escape sequences are kept in the file. Defaults to `true`.
    pub fn with_ansi(self, ansi: bool) -> Self {
        Self { ansi, ..self }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flushes buffered lines and releases the handle.
    pub fn close(self) -> io::Result<()> {
        let file = self.file.into_inner().map_err(io::IntoInnerError::into_error)?;
        drop(file);
        Ok(())
    }
}

impl LogWriter for LogFile {
    fn regular(&mut self, line: &str) -> io::Result<()> {
        if self.ansi {
            writeln!(self.file, "{line}")
        } else {
            writeln!(self.file, "{}", strip_ansi(line))
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// In-memory sink that can be cloned and read back while a logger writes to it.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        self.inner
            .lock()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().map(|bytes| bytes.is_empty()).unwrap_or(true)
    }

    /// Drains and returns the buffered text.
    pub fn take(&self) -> String {
        self.inner
            .lock()
            .map(|mut bytes| String::from_utf8_lossy(&std::mem::take(&mut *bytes)).into_owned())
            .unwrap_or_default()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut bytes = self
            .inner
            .lock()
            .map_err(|_| io::Error::other("shared buffer lock poisoned"))?;
        bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
