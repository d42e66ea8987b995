//! Settings for a single dump run

use anyhow::anyhow;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_WORKERS: usize = 10;
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(200);

/// How chatty the per-entry output is
///
/// - 0: only fetched files
/// - 1: also every entry found in the index
/// - 2: also every failure and skipped entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Verbosity(u8);

impl Verbosity {
    pub const QUIET: Verbosity = Verbosity(0);
    pub const FOUND: Verbosity = Verbosity(1);
    pub const ERRORS: Verbosity = Verbosity(2);

    pub fn level(&self) -> u8 {
        self.0
    }

    pub fn shows(&self, level: Verbosity) -> bool {
        *self >= level
    }

    /// Default tracing filter when `RUST_LOG` is not set
    pub fn log_filter(&self) -> &'static str {
        match self.0 {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

impl TryFrom<u8> for Verbosity {
    type Error = anyhow::Error;

    fn try_from(level: u8) -> anyhow::Result<Self> {
        match level {
            0..=2 => Ok(Verbosity(level)),
            _ => Err(anyhow!("Invalid verbosity level: {level} (expected 0, 1 or 2)")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DumpConfig {
    base_url: String,
    /// Directory the destination root is created in
    pub output_dir: PathBuf,
    pub workers: usize,
    pub verbosity: Verbosity,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub max_attempts: usize,
    pub retry_delay: Duration,
    pub user_agent: Option<String>,
    /// Drop the `blob <size>\0` prefix of inflated loose objects
    pub strip_object_header: bool,
}

impl DumpConfig {
    pub fn new(base_url: String) -> Self {
        DumpConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            output_dir: PathBuf::from("."),
            workers: DEFAULT_WORKERS,
            verbosity: Verbosity::default(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
            user_agent: None,
            strip_object_header: false,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_strip_object_header(mut self, strip: bool) -> Self {
        self.strip_object_header = strip;
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.workers == 0 {
            anyhow::bail!("Worker count must be at least 1");
        }
        if self.max_attempts == 0 {
            anyhow::bail!("Attempt count must be at least 1");
        }
        reqwest::Url::parse(&self.base_url)
            .map_err(|e| anyhow!("Invalid base URL {}: {e}", self.base_url))?;

        Ok(())
    }

    /// Name of the destination root: the URL's host and port, `:` replaced by `_`
    pub fn destination_name(&self) -> anyhow::Result<String> {
        let url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| anyhow!("Invalid base URL {}: {e}", self.base_url))?;
        let host = url
            .host_str()
            .ok_or_else(|| anyhow!("Base URL has no host: {}", self.base_url))?;

        Ok(match url.port() {
            Some(port) => format!("{host}_{port}"),
            None => host.to_string(),
        }
        .replace(':', "_"))
    }

    pub fn destination_root(&self) -> anyhow::Result<PathBuf> {
        Ok(self.output_dir.join(self.destination_name()?))
    }
}
