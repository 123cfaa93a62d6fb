//! HTTP client with per-service throttling and bounded retry
//!
//! All service traffic goes through [`HttpClient::get`]. Transient
//! failures (timeout, 429, 5xx, connection faults) are retried with
//! exponential backoff up to `max_retries`; 4xx responses are returned
//! immediately. Each remote service owns a [`Throttle`] enforcing a
//! minimum interval between outbound requests — cache hits never reach
//! this layer, so they consume no rate-limit budget.

use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tokio::time::sleep;

use crate::error::HttpError;

const BACKOFF_BASE_MS: u64 = 250;

/// A successful (2xx) response
#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Minimum-interval request pacing for one remote service
pub struct Throttle {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl Throttle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Throttle derived from a requests-per-second budget.
    pub fn per_second(rate: f32) -> Self {
        let interval = if rate > 0.0 {
            Duration::from_secs_f32(1.0 / rate)
        } else {
            Duration::ZERO
        };
        Self::new(interval)
    }

    pub async fn wait(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(t) = *last {
            let elapsed = t.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

pub struct HttpClient {
    client: reqwest::Client,
    max_retries: u32,
}

impl HttpClient {
    pub fn new(user_agent: &str, max_retries: u32) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .build()
            .expect("failed to build reqwest client");
        Self {
            client,
            max_retries,
        }
    }

    /// Throttled GET with retry. Returns Ok only for 2xx responses.
    pub async fn get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        throttle: &Throttle,
    ) -> Result<HttpResponse, HttpError> {
        let mut attempt = 0u32;
        loop {
            throttle.wait().await;
            match self.get_once(url, headers).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    let backoff = Duration::from_millis(BACKOFF_BASE_MS * 2u64.pow(attempt));
                    tracing::debug!(url, attempt, error = %e, "transient failure, retrying");
                    sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn get_once(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<HttpResponse, HttpError> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout
            } else {
                HttpError::RequestFailed {
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        match status {
            200..=299 => {
                let body = response.text().await.map_err(|e| HttpError::RequestFailed {
                    message: e.to_string(),
                })?;
                Ok(HttpResponse { status, body })
            }
            429 => Err(HttpError::RateLimited),
            500..=599 => Err(HttpError::ServerError { status }),
            _ => Err(HttpError::ClientError { status }),
        }
    }
}
