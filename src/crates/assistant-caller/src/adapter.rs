//! The invocation adapter.
//!
//! Turns a query/instructions pair into exactly one remote call and
//! normalizes the outcome:
//!
//! 1. the query is validated (no I/O happens for a blank query),
//! 2. credentials are resolved from the injected provider,
//! 3. the run request is assembled with the effective instructions,
//! 4. the transport is called once, bounded by the configured timeout,
//! 5. the answer text is extracted and returned verbatim.

use crate::config::CallerConfig;
use crate::credentials::{CredentialProvider, Credentials};
use crate::error::{CallerError, Result, TransportErrorKind};
use crate::request::{AssistantQuery, OutboundRequest, RunPayload, RUN_PATH};
use crate::response::extract_answer;
use crate::transport::{AssistantTransport, HttpTransport};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Forwards queries to the remote assistant.
///
/// Holds no per-call state, so one adapter can serve concurrent invocations
/// behind an `Arc`.
#[derive(Clone)]
pub struct InvocationAdapter {
    config: CallerConfig,
    credentials: Arc<dyn CredentialProvider>,
    transport: Arc<dyn AssistantTransport>,
}

impl std::fmt::Debug for InvocationAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvocationAdapter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl InvocationAdapter {
    /// Create an adapter from its three collaborators.
    pub fn new(
        config: CallerConfig,
        credentials: Arc<dyn CredentialProvider>,
        transport: Arc<dyn AssistantTransport>,
    ) -> Self {
        Self {
            config,
            credentials,
            transport,
        }
    }

    /// Create an adapter that talks HTTP to `config.base_url`.
    pub fn http(config: CallerConfig, credentials: Arc<dyn CredentialProvider>) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;
        Ok(Self::new(config, credentials, Arc::new(transport)))
    }

    /// The adapter configuration.
    pub fn config(&self) -> &CallerConfig {
        &self.config
    }

    /// Ask the assistant `query`, optionally overriding the default instructions.
    pub async fn call(&self, query: &str, instructions: Option<&str>) -> Result<String> {
        let request = AssistantQuery {
            query: query.to_string(),
            instructions: instructions.map(str::to_string),
        };
        self.call_query(&request).await
    }

    /// Same as [`call`](Self::call), taking the request value.
    pub async fn call_query(&self, request: &AssistantQuery) -> Result<String> {
        if let Err(e) = request.validate() {
            warn!("Received empty query");
            return Err(e);
        }

        if request
            .instructions
            .as_deref()
            .map_or(true, |i| i.trim().is_empty())
        {
            debug!("No instructions provided, using default instructions");
        }

        let credentials = self.resolve_credentials().await?;
        let outbound = self.build_request(request, &credentials)?;

        info!(
            "Starting to process user query for assistant {}",
            credentials.assistant_id
        );

        let started = Instant::now();
        let response = match tokio::time::timeout(self.config.timeout, self.transport.send(outbound)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                error!("Remote call failed: {}", e);
                return Err(e);
            }
            Err(_elapsed) => {
                error!("Remote call timed out after {:?}", self.config.timeout);
                return Err(CallerError::transport(
                    TransportErrorKind::Timeout,
                    format!("No response within {:?}", self.config.timeout),
                ));
            }
        };
        let elapsed_ms = started.elapsed().as_millis();

        if !response.is_success() {
            error!(
                "Remote service returned status {} after {}ms",
                response.status, elapsed_ms
            );
            return Err(CallerError::transport(
                TransportErrorKind::Status(response.status),
                response.body,
            ));
        }

        match extract_answer(&response.body) {
            Ok(text) => {
                info!("Received answer ({} chars) in {}ms", text.chars().count(), elapsed_ms);
                Ok(text)
            }
            Err(e) => {
                error!("Remote service reported a failure: {}", e);
                Err(e)
            }
        }
    }

    async fn resolve_credentials(&self) -> Result<Credentials> {
        let credentials = self.credentials.resolve().await.map_err(|e| {
            error!("Credential resolution failed: {}", e);
            e
        })?;
        credentials.validate()?;
        Ok(credentials)
    }

    /// Assemble the outbound request for `request` under `credentials`.
    pub fn build_request(
        &self,
        request: &AssistantQuery,
        credentials: &Credentials,
    ) -> Result<OutboundRequest> {
        let access_token = credentials.access_token().ok_or_else(|| {
            CallerError::Configuration(
                "App key/secret credentials must be exchanged for an access token first".to_string(),
            )
        })?;

        let instructions = request.effective_instructions(&self.config.default_instructions);

        Ok(OutboundRequest {
            url: self.config.endpoint(RUN_PATH),
            access_token: access_token.to_string(),
            payload: RunPayload::new(
                credentials.assistant_id.clone(),
                request.query.clone(),
                instructions,
            ),
        })
    }
}
