use std::{fmt, str::FromStr};

use crate::color::{FGCYAN, FGRED, FGYELLOW};
#[cfg(test)]
use crate::color::{BOLD, RESET};

/// Severity of a log line.
///
/// Severities are only used to pick a color and a destination; they are not
/// ordered and nothing is ever filtered out by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Warn,
    Severe,
    Fatal,
}

/// Which pair of sinks a line goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Output stream and output file.
    Out,
    /// Error stream and error file.
    Err,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Info,
        Severity::Warn,
        Severity::Severe,
        Severity::Fatal,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Severe => "SEVERE",
            Severity::Fatal => "FATAL",
        }
    }

    /// The name wrapped in its color code and a reset.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Info => "\x1b[36mINFO\x1b[0m",
            Severity::Warn => "\x1b[33mWARN\x1b[0m",
            Severity::Severe => "\x1b[31mSEVERE\x1b[0m",
            Severity::Fatal => "\x1b[31m\x1b[91mFATAL\x1b[0m",
        }
    }

    /// Color prefix used in [`Severity::label`].
    pub fn color(self) -> &'static str {
        match self {
            Severity::Info => FGCYAN,
            Severity::Warn => FGYELLOW,
            Severity::Severe => FGRED,
            Severity::Fatal => "\x1b[31m\x1b[91m",
        }
    }

    pub fn route(self) -> Route {
        match self {
            Severity::Info => Route::Out,
            _ => Route::Err,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown severity '{0}'")]
pub struct ParseSeverityError(String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::ALL
            .into_iter()
            .find(|severity| severity.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseSeverityError(s.to_string()))
    }
}

impl From<log::Level> for Severity {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Severity::Severe,
            log::Level::Warn => Severity::Warn,
            log::Level::Info | log::Level::Debug | log::Level::Trace => Severity::Info,
        }
    }
}

#[test]
fn test_labels() {
    assert_eq!(Severity::Info.label(), format!("{FGCYAN}INFO{RESET}"));
    assert_eq!(Severity::Warn.label(), format!("{FGYELLOW}WARN{RESET}"));
    assert_eq!(Severity::Severe.label(), format!("{FGRED}SEVERE{RESET}"));
    assert_eq!(Severity::Fatal.label(), format!("{FGRED}{BOLD}FATAL{RESET}"));
    for severity in Severity::ALL {
        assert_eq!(
            severity.label(),
            format!("{}{}{RESET}", severity.color(), severity.name())
        );
    }
}

#[test]
fn test_only_info_goes_out() {
    for severity in Severity::ALL {
        let expected = if severity == Severity::Info {
            Route::Out
        } else {
            Route::Err
        };
        assert_eq!(severity.route(), expected);
    }
}

#[test]
fn test_parse() {
    assert_eq!("INFO".parse::<Severity>(), Ok(Severity::Info));
    assert_eq!("fatal".parse::<Severity>(), Ok(Severity::Fatal));
    assert_eq!("Severe".parse::<Severity>(), Ok(Severity::Severe));
    assert!("ERROR".parse::<Severity>().is_err());
    assert_eq!(Severity::Warn.to_string(), "WARN");
}

#[test]
fn test_from_log_level() {
    assert_eq!(Severity::from(log::Level::Error), Severity::Severe);
    assert_eq!(Severity::from(log::Level::Warn), Severity::Warn);
    assert_eq!(Severity::from(log::Level::Info), Severity::Info);
    assert_eq!(Severity::from(log::Level::Debug), Severity::Info);
    assert_eq!(Severity::from(log::Level::Trace), Severity::Info);
}
