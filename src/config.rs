// Runtime configuration. Everything is derived from defaults plus the single
// `HUFFMAN_API_URL` environment variable; nothing is persisted.

use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the transform service base address.
pub const BASE_URL_ENV: &str = "HUFFMAN_API_URL";

/// Base address used when [`BASE_URL_ENV`] is unset or blank.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Caller-side deadline applied to each submission by default.
pub const DEFAULT_REQUEST_DEADLINE: Duration = Duration::from_secs(300);

/// Shape of the synthetic progress shown while a request is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressPolicy {
    /// Percent shown as soon as processing starts.
    pub initial: u8,
    /// Percent added on every emitter tick.
    pub step: u8,
    /// Highest percent the emitter may reach before the request settles.
    pub ceiling: u8,
    /// Time between emitter ticks.
    pub period: Duration,
}

impl Default for ProgressPolicy {
    fn default() -> Self {
        Self {
            initial: 10,
            step: 5,
            ceiling: 90,
            period: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub progress: ProgressPolicy,
    /// `None` lets a submission wait forever.
    pub request_deadline: Option<Duration>,
    /// Directory results are saved into unless the user picks another path.
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            progress: ProgressPolicy::default(),
            request_deadline: Some(DEFAULT_REQUEST_DEADLINE),
            output_dir: default_output_dir(),
        }
    }
}

impl Config {
    /// Build the configuration from `HUFFMAN_API_URL`, falling back to
    /// `http://localhost:8080`.
    pub fn from_env() -> Self {
        let base_url = std::env::var(BASE_URL_ENV).ok();
        Self::default().with_base_url(base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))
    }

    /// Replace the base address. A blank value keeps the default and
    /// trailing slashes are dropped so endpoint paths join cleanly.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let trimmed = base_url.trim().trim_end_matches('/');
        self.base_url = if trimmed.is_empty() {
            DEFAULT_BASE_URL.to_string()
        } else {
            trimmed.to_string()
        };
        self
    }

    pub fn with_progress(mut self, progress: ProgressPolicy) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_request_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.request_deadline = deadline;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }
}

fn default_output_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}
