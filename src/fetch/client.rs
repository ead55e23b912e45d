//! HTTP transport for the todo endpoint.
//!
//! # Responsibilities
//! - Build `GET {base_url}/todos/{id}` requests
//! - Bound each request by the caller's remaining time budget
//! - Abort in-flight requests when the cancellation token fires

use std::time::Duration;

use futures_util::future::BoxFuture;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::fetch::types::TransportError;

const CLIENT_USER_AGENT: &str = concat!("bounded-fetch/", env!("CARGO_PKG_VERSION"));

/// Per-call context handed to a [`Fetcher`].
#[derive(Debug, Clone)]
pub struct FetchContext {
    /// Fires when the caller stops waiting.
    pub cancel: CancellationToken,
    /// Time left before the caller's deadline.
    pub budget: Duration,
}

/// Retrieves the raw payload for one identifier.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, id: u64, ctx: FetchContext) -> BoxFuture<'_, Result<Vec<u8>, TransportError>>;
}

/// reqwest-backed [`Fetcher`].
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: Url,
}

impl HttpFetcher {
    /// Create a fetcher for `base_url` with a default client.
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a fetcher reusing an existing client.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, TransportError> {
        let base_url: Url = base_url.parse().map_err(|e| {
            TransportError::InvalidRequest(format!("invalid base URL '{}': {}", base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(TransportError::InvalidRequest(format!(
                "invalid base URL '{}'",
                base_url
            )));
        }
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of the todo with the given id.
    pub fn todo_url(&self, id: u64) -> Result<Url, TransportError> {
        let raw = format!("{}/todos/{}", self.base_url.as_str().trim_end_matches('/'), id);
        raw.parse()
            .map_err(|e| TransportError::InvalidRequest(format!("{}: {}", raw, e)))
    }

    async fn get(&self, id: u64, ctx: FetchContext) -> Result<Vec<u8>, TransportError> {
        let url = self.todo_url(id)?;
        tracing::debug!(id, url = %url, budget_ms = ctx.budget.as_millis() as u64, "Sending request");

        let request = self
            .client
            .get(url)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .timeout(ctx.budget)
            .send();

        let response = tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => return Err(TransportError::Cancelled),
            response = request => response.map_err(|e| classify(e, TransportError::Request))?,
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(id, status = %status, "Non-success status");
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        let body = tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => return Err(TransportError::Cancelled),
            body = response.bytes() => body.map_err(|e| classify(e, TransportError::Body))?,
        };

        Ok(body.to_vec())
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, id: u64, ctx: FetchContext) -> BoxFuture<'_, Result<Vec<u8>, TransportError>> {
        Box::pin(self.get(id, ctx))
    }
}

impl std::fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

fn classify(e: reqwest::Error, otherwise: fn(String) -> TransportError) -> TransportError {
    if e.is_timeout() {
        TransportError::TimedOut
    } else {
        otherwise(e.to_string())
    }
}
