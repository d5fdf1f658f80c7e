//! The remote call, behind a narrow capability trait.
//!
//! [`InvocationAdapter`](crate::InvocationAdapter) only ever talks to an
//! [`AssistantTransport`]. [`HttpTransport`] is the production implementation;
//! tests substitute a deterministic fake.

use crate::config::CallerConfig;
use crate::error::{CallerError, Result};
use crate::request::{OutboundRequest, TransportResponse, ACCESS_TOKEN_HEADER};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// Sends one assembled request to the assistant service.
#[async_trait]
pub trait AssistantTransport: Send + Sync {
    /// Perform the call and return the raw status and body.
    ///
    /// Non-success statuses are returned as responses, not errors; the
    /// adapter classifies them. Errors are reserved for calls that produced
    /// no response at all.
    async fn send(&self, request: OutboundRequest) -> Result<TransportResponse>;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport whose client enforces `config.timeout`.
    pub fn new(config: &CallerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CallerError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Wrap an existing client, sharing its connection pool.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AssistantTransport for HttpTransport {
    async fn send(&self, request: OutboundRequest) -> Result<TransportResponse> {
        debug!("POST {}", request.url);

        let response = self
            .client
            .post(&request.url)
            .header(ACCESS_TOKEN_HEADER, &request.access_token)
            .json(&request.payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!("Response status {} ({} bytes)", status, body.len());
        Ok(TransportResponse { status, body })
    }
}
