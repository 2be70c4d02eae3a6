use std::sync::LazyLock;

use derive_from_env::FromEnv;
use unilog_core::Precision;

/// Settings read from `UNILOG_*` environment variables.
#[derive(FromEnv)]
#[from_env(prefix = "UNILOG")]
#[allow(non_snake_case)]
pub struct UnilogConfig {
    /// Keep ANSI escape sequences in log files.
    #[from_env(default = "true")]
    pub FILE_ANSI: bool,
    /// Second-precision timestamps instead of milliseconds.
    #[from_env(default = "false")]
    pub SECONDS_PRECISION: bool,
}

impl Default for UnilogConfig {
    fn default() -> Self {
        Self {
            FILE_ANSI: true,
            SECONDS_PRECISION: false,
        }
    }
}

impl UnilogConfig {
    pub fn precision(&self) -> Precision {
        if self.SECONDS_PRECISION {
            Precision::Seconds
        } else {
            Precision::Millis
        }
    }
}

/// Environment configuration, read once. Unparsable values fall back to the defaults.
pub static UNILOG_CONFIG: LazyLock<UnilogConfig> =
    LazyLock::new(|| UnilogConfig::from_env().unwrap_or_default());
