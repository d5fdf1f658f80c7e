//! Exchange of an application key/secret pair for an access token.

use crate::config::CallerConfig;
use crate::credentials::{AuthMaterial, CredentialProvider, Credentials};
use crate::error::{CallerError, Result, TransportErrorKind};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

/// Path of the access token endpoint, relative to the API base URL.
pub const ACCESS_TOKEN_PATH: &str = "/v1.0/oauth2/accessToken";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AccessTokenRequest<'a> {
    app_key: &'a str,
    app_secret: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccessTokenResponse {
    access_token: String,
    #[serde(default)]
    expire_in: Option<u64>,
}

/// Provider that turns app key/secret credentials into token credentials.
///
/// Every `resolve` performs a fresh exchange; tokens are not kept between
/// invocations. Token credentials from the inner provider pass through.
#[derive(Debug, Clone)]
pub struct TokenExchangeProvider<P> {
    inner: P,
    client: Client,
    url: String,
}

impl<P: CredentialProvider> TokenExchangeProvider<P> {
    /// Wrap `inner`, exchanging against the endpoint derived from `config`.
    pub fn new(inner: P, config: &CallerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CallerError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            inner,
            client,
            url: config.endpoint(ACCESS_TOKEN_PATH),
        })
    }

    async fn exchange(&self, app_key: &str, app_secret: &str) -> Result<String> {
        debug!("Requesting access token from {}", self.url);

        let response = self
            .client
            .post(&self.url)
            .json(&AccessTokenRequest {
                app_key,
                app_secret,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!("Access token request failed with status {}", status);
            let code = status.as_u16();
            return Err(match code {
                400 | 401 | 403 => CallerError::Configuration(format!(
                    "App key/secret rejected ({}): {}",
                    code, body
                )),
                _ => CallerError::transport(TransportErrorKind::Status(code), body),
            });
        }

        let token: AccessTokenResponse = serde_json::from_str(&body).map_err(|e| {
            CallerError::Configuration(format!("Unreadable access token response: {}", e))
        })?;

        if token.access_token.trim().is_empty() {
            return Err(CallerError::Configuration(
                "Access token response carried an empty token".to_string(),
            ));
        }

        info!(
            "Obtained access token, expires in {} seconds",
            token.expire_in.unwrap_or_default()
        );
        Ok(token.access_token)
    }
}

#[async_trait]
impl<P: CredentialProvider> CredentialProvider for TokenExchangeProvider<P> {
    async fn resolve(&self) -> Result<Credentials> {
        let credentials = self.inner.resolve().await?;
        credentials.validate()?;

        match &credentials.auth {
            AuthMaterial::AccessToken { .. } => Ok(credentials),
            AuthMaterial::AppKeyPair {
                app_key,
                app_secret,
            } => {
                let token = self.exchange(app_key, app_secret).await?;
                Ok(Credentials::with_token(credentials.assistant_id, token))
            }
        }
    }
}
