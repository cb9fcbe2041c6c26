//! HTTP delivery to the stream endpoint.

use super::context::ReportContext;
use super::Reporter;
use crate::output::schema::OutputRecord;
use crate::utils::config::{
    DEFAULT_CLIENT_TTL, DEFAULT_CLIENT_TTL_JITTER, DEFAULT_CONNECT_TIMEOUT, DEFAULT_MAX_IDLE_PER_HOST,
    DEFAULT_MAX_RETRIES, DEFAULT_REQUEST_TIMEOUT, DEFAULT_RETRY_BACKOFF, RETRYABLE_STATUS_CODES,
};
use crate::utils::error::ReportError;
use log::{debug, info, warn};
use rand::Rng;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Serialize;
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

/// Delivery policy for `HttpReporter`
#[derive(Debug, Clone)]
pub struct ReporterConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub retry_backoff: Duration,
    pub retryable_statuses: Vec<u16>,
    pub client_ttl: Duration,
    /// Upper bound of the random extension added to each client's TTL
    pub client_ttl_jitter: Duration,
    pub max_idle_per_host: usize,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            retryable_statuses: RETRYABLE_STATUS_CODES.to_vec(),
            client_ttl: DEFAULT_CLIENT_TTL,
            client_ttl_jitter: DEFAULT_CLIENT_TTL_JITTER,
            max_idle_per_host: DEFAULT_MAX_IDLE_PER_HOST,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Pooled client plus the instant after which it is replaced
struct RecycledClient {
    client: Client,
    expires_at: Instant,
}

impl RecycledClient {
    fn build(config: &ReporterConfig) -> Result<Self, ReportError> {
        let client = Client::builder()
            .pool_max_idle_per_host(config.max_idle_per_host)
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(ReportError::RequestFailed)?;

        let jitter_ms = config.client_ttl_jitter.as_millis() as u64;
        let jitter = if jitter_ms == 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(rand::thread_rng().gen_range(0..=jitter_ms))
        };

        Ok(Self {
            client,
            expires_at: Instant::now() + config.client_ttl + jitter,
        })
    }
}

/// Reports records to the stream endpoint as JSON over HTTP POST
///
/// Retries a fixed number of times on a fixed backoff for retryable
/// statuses and transport failures. The underlying connection pool is
/// rebuilt once its TTL runs out.
pub struct HttpReporter {
    endpoint: String,
    config: ReporterConfig,
    client: Mutex<RecycledClient>,
}

impl HttpReporter {
    /// Create a reporter with the default delivery policy
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ReportError> {
        Self::with_config(endpoint, ReporterConfig::default())
    }

    pub fn with_config(
        endpoint: impl Into<String>,
        config: ReporterConfig,
    ) -> Result<Self, ReportError> {
        let client = RecycledClient::build(&config)?;
        Ok(Self {
            endpoint: endpoint.into(),
            config,
            client: Mutex::new(client),
        })
    }

    /// Current client, rebuilt first when it has outlived its TTL
    fn client(&self) -> Result<Client, ReportError> {
        let mut current = self
            .client
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if Instant::now() >= current.expires_at {
            *current = RecycledClient::build(&self.config)?;
            info!("client-recycled: endpoint={}", self.endpoint);
        }
        Ok(current.client.clone())
    }

    /// POST `payload`, retrying per the delivery policy
    fn deliver<T: Serialize + ?Sized>(
        &self,
        ctx: &ReportContext,
        payload: &T,
    ) -> Result<(), ReportError> {
        let body = serde_json::to_vec(payload)?;
        let mut attempt = 0;

        loop {
            ctx.check()?;
            let client = self.client()?;

            let result = client
                .post(&self.endpoint)
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body.clone())
                .timeout(ctx.bound(self.config.request_timeout))
                .send();

            let failure = match result {
                Ok(response) if response.status() == StatusCode::OK => {
                    debug!("Delivered {} bytes to {}", body.len(), self.endpoint);
                    return Ok(());
                }
                Ok(response) => {
                    let status = response.status().as_u16();
                    if !self.config.retryable_statuses.contains(&status) {
                        return Err(ReportError::UnexpectedStatus(status));
                    }
                    ReportError::UnexpectedStatus(status)
                }
                Err(e) if e.is_connect() || e.is_timeout() => ReportError::RequestFailed(e),
                Err(e) => return Err(ReportError::RequestFailed(e)),
            };

            if attempt >= self.config.max_retries {
                return Err(failure);
            }
            attempt += 1;
            warn!(
                "report-retry: attempt={} endpoint={} reason={}",
                attempt, self.endpoint, failure
            );
            thread::sleep(ctx.bound(self.config.retry_backoff));
        }
    }
}

impl Reporter for HttpReporter {
    fn report(&self, ctx: &ReportContext, record: &OutputRecord) -> Result<(), ReportError> {
        self.deliver(ctx, record)
    }

    fn report_batch(
        &self,
        ctx: &ReportContext,
        records: &[OutputRecord],
    ) -> Result<(), ReportError> {
        self.deliver(ctx, records)
    }
}
