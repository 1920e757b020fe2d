use log::debug;
use reqwest::Client;
use serde_json::Value;
use std::error::Error as StdError;
use std::time::{Duration, Instant};

use crate::error::HostError;
use crate::models::Host;

pub const DEFAULT_ENDPOINT: &str = "/system";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// HTTP client for the metrics agents' `GET /system` endpoint.
///
/// One request per call, bounded by `timeout`. When the timeout fires the
/// request future is dropped, which cancels that host's request only.
/// Failures are classified into [`HostError`] and never retried.
#[derive(Debug, Clone)]
pub struct MetricsClient {
    client: Client,
    timeout: Duration,
    endpoint: String,
}

impl MetricsClient {
    pub fn new(timeout: Duration, endpoint: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let endpoint = if endpoint.starts_with('/') {
            endpoint.to_string()
        } else {
            format!("/{}", endpoint)
        };

        Ok(Self {
            client,
            timeout,
            endpoint,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Agents are addressed as `host:port`; HTTPS is assumed unless the
    /// address carries its own scheme.
    pub fn url_for(&self, host: &Host) -> String {
        let address = host.address.trim_end_matches('/');
        if address.starts_with("http://") || address.starts_with("https://") {
            format!("{}{}", address, self.endpoint)
        } else {
            format!("https://{}{}", address, self.endpoint)
        }
    }

    pub async fn fetch(&self, host: &Host) -> Result<Value, HostError> {
        let start = Instant::now();
        let url = self.url_for(host);

        let result = match tokio::time::timeout(self.timeout, self.request(&url)).await {
            Ok(result) => result,
            Err(_) => Err(HostError::Timeout),
        };

        debug!("fetch {} took: {} ms", url, start.elapsed().as_millis());
        result
    }

    async fn request(&self, url: &str) -> Result<Value, HostError> {
        let response = self.client.get(url).send().await.map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(HostError::BadResponse(status.as_u16()));
        }

        let body = response.bytes().await.map_err(transport_error)?;
        serde_json::from_slice(&body)
            .map_err(|e| HostError::malformed(format!("invalid JSON: {}", e)))
    }
}

fn transport_error(err: reqwest::Error) -> HostError {
    if err.is_timeout() {
        return HostError::Timeout;
    }

    // Keep the cause chain, the top-level message alone rarely names it
    let mut detail = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        detail.push_str(": ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }
    HostError::Unreachable(detail)
}
