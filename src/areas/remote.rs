//! HTTP access to an exposed `.git` directory
//!
//! Only two kinds of resources are ever requested:
//!
//! - `<base>/index`, fetched once and never retried
//! - `<base>/objects/<aa>/<bbb...>`, zlib-compressed loose objects, retried on
//!   transport errors and non-200 statuses

use crate::areas::config::DumpConfig;
use crate::artifacts::objects::object_id::ObjectId;
use bytes::Bytes;
use fake::rand;
use reqwest::StatusCode;
use std::future::Future;
use std::io::Read;
use std::time::Duration;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info};

const USER_AGENTS: [&str; 5] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.5735.134 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.5735.134 Safari/537.36",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:89.0) Gecko/20100101 Firefox/89.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:91.0) Gecko/20100101 Firefox/91.0",
    "Mozilla/5.0 (Linux; Android 10; SM-G975F) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Mobile Safari/537.36",
];

const MAX_RETRY_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decompress object: {0}")]
    Decompress(#[source] std::io::Error),
}

impl FetchError {
    /// Transport errors and bad statuses may go away; a malformed payload will not
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FetchError::Decompress(_))
    }
}

/// Source of decompressed object content
pub trait ObjectFetcher: Send + Sync {
    fn fetch(&self, oid: &ObjectId) -> impl Future<Output = Result<Bytes, FetchError>> + Send;
}

#[derive(Debug, Clone)]
pub struct Remote {
    client: reqwest::Client,
    base_url: String,
    max_attempts: usize,
    retry_delay: Duration,
    user_agent: Option<String>,
}

impl Remote {
    pub fn new(config: &DumpConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()?;

        Ok(Remote {
            client,
            base_url: config.base_url().to_string(),
            max_attempts: config.max_attempts,
            retry_delay: config.retry_delay,
            user_agent: config.user_agent.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Download the index in a single attempt
    pub async fn fetch_index(&self) -> Result<Bytes, FetchError> {
        self.get("index").await
    }

    /// Download and inflate a loose object, retrying transient failures
    pub async fn fetch_object(&self, oid: &ObjectId) -> Result<Bytes, FetchError> {
        let strategy = ExponentialBackoff::from_millis(2)
            .factor(self.retry_delay.as_millis().min(u64::MAX as u128) as u64)
            .max_delay(MAX_RETRY_DELAY)
            .map(jitter)
            .take(self.max_attempts.saturating_sub(1));

        let object_path = oid.to_object_path();
        let mut attempt = 0;

        RetryIf::start(
            strategy,
            || {
                attempt += 1;
                let object_path = object_path.as_str();
                async move {
                    let compressed = self.get(object_path).await.inspect_err(|err| {
                        info!(%oid, attempt, max_attempts = self.max_attempts, "object fetch failed: {err}");
                    })?;
                    Self::decompress(&compressed)
                }
            },
            FetchError::is_retryable,
        )
        .await
    }

    async fn get(&self, path: &str) -> Result<Bytes, FetchError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, self.user_agent())
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        Ok(response.bytes().await?)
    }

    fn user_agent(&self) -> &str {
        match &self.user_agent {
            Some(user_agent) => user_agent,
            None => USER_AGENTS[rand::random_range(0..USER_AGENTS.len())],
        }
    }

    pub fn decompress(data: &[u8]) -> Result<Bytes, FetchError> {
        let mut decoder = flate2::read::ZlibDecoder::new(data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .map_err(FetchError::Decompress)?;

        Ok(decompressed_content.into())
    }
}

impl ObjectFetcher for Remote {
    fn fetch(&self, oid: &ObjectId) -> impl Future<Output = Result<Bytes, FetchError>> + Send {
        self.fetch_object(oid)
    }
}
