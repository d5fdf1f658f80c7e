//! Credential context and the providers that supply it.
//!
//! The adapter never reads credentials on its own. A [`CredentialProvider`]
//! is injected at construction time and asked for credentials once per
//! invocation. [`HostContext`] is the provider used when credentials arrive
//! through the host runtime as a flat key/value map.

use crate::error::{CallerError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Host context key for the assistant identifier.
pub const ASSISTANT_ID_KEY: &str = "assistant_id";
/// Host context key for a ready-to-use access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Host context key for the application key.
pub const APP_KEY_KEY: &str = "app_key";
/// Host context key for the application secret.
pub const APP_SECRET_KEY: &str = "app_secret";

/// Authentication material.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthMaterial {
    /// A token that can be sent with the request as-is.
    AccessToken { token: String },
    /// An application key/secret pair that must be exchanged for a token.
    AppKeyPair { app_key: String, app_secret: String },
}

// Secrets stay out of logs and panic messages.
impl fmt::Debug for AuthMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AccessToken { .. } => f
                .debug_struct("AccessToken")
                .field("token", &"<redacted>")
                .finish(),
            Self::AppKeyPair { app_key, .. } => f
                .debug_struct("AppKeyPair")
                .field("app_key", app_key)
                .field("app_secret", &"<redacted>")
                .finish(),
        }
    }
}

/// Credentials for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Assistant that should answer.
    pub assistant_id: String,
    /// How to authenticate.
    pub auth: AuthMaterial,
}

impl Credentials {
    /// Credentials carrying an access token.
    pub fn with_token(assistant_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            assistant_id: assistant_id.into(),
            auth: AuthMaterial::AccessToken {
                token: token.into(),
            },
        }
    }

    /// Credentials carrying an application key/secret pair.
    pub fn with_app_key(
        assistant_id: impl Into<String>,
        app_key: impl Into<String>,
        app_secret: impl Into<String>,
    ) -> Self {
        Self {
            assistant_id: assistant_id.into(),
            auth: AuthMaterial::AppKeyPair {
                app_key: app_key.into(),
                app_secret: app_secret.into(),
            },
        }
    }

    /// The access token, if these credentials carry one.
    pub fn access_token(&self) -> Option<&str> {
        match &self.auth {
            AuthMaterial::AccessToken { token } => Some(token),
            AuthMaterial::AppKeyPair { .. } => None,
        }
    }

    /// Check that every field can be sent over the wire.
    pub fn validate(&self) -> Result<()> {
        check_field(ASSISTANT_ID_KEY, &self.assistant_id)?;
        match &self.auth {
            AuthMaterial::AccessToken { token } => check_field(ACCESS_TOKEN_KEY, token),
            AuthMaterial::AppKeyPair {
                app_key,
                app_secret,
            } => {
                check_field(APP_KEY_KEY, app_key)?;
                check_field(APP_SECRET_KEY, app_secret)
            }
        }
    }
}

fn check_field(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CallerError::Configuration(format!(
            "Credential {} is empty",
            name
        )));
    }
    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(CallerError::Configuration(format!(
            "Credential {} contains whitespace or control characters",
            name
        )));
    }
    Ok(())
}

/// Supplies credentials for an invocation.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Resolve the credentials to use for the next remote call.
    ///
    /// Returns [`CallerError::Configuration`] when none are available.
    async fn resolve(&self) -> Result<Credentials>;
}

/// Provider that always hands out the same credentials.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    credentials: Option<Credentials>,
}

impl StaticCredentials {
    /// Provider returning `credentials`.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials: Some(credentials),
        }
    }

    /// Provider with nothing configured.
    pub fn none() -> Self {
        Self { credentials: None }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentials {
    async fn resolve(&self) -> Result<Credentials> {
        self.credentials
            .clone()
            .ok_or_else(|| CallerError::Configuration("No credentials configured".to_string()))
    }
}

/// Credential entries handed over by the host runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostContext {
    #[serde(default)]
    entries: HashMap<String, String>,
}

impl HostContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry.
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Set an entry.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Get an entry, treating blank values as missing.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Build credentials out of the context entries.
    ///
    /// `assistant_id` is always required. An `access_token` entry wins over an
    /// `app_key`/`app_secret` pair; without one, both halves of the pair are
    /// required. The error names every missing key.
    pub fn credentials(&self) -> Result<Credentials> {
        let mut missing = Vec::new();
        let assistant_id = self.get(ASSISTANT_ID_KEY);
        if assistant_id.is_none() {
            missing.push(ASSISTANT_ID_KEY);
        }

        let auth = if let Some(token) = self.get(ACCESS_TOKEN_KEY) {
            Some(AuthMaterial::AccessToken {
                token: token.to_string(),
            })
        } else {
            let app_key = self.get(APP_KEY_KEY);
            let app_secret = self.get(APP_SECRET_KEY);
            if app_key.is_none() {
                missing.push(APP_KEY_KEY);
            }
            if app_secret.is_none() {
                missing.push(APP_SECRET_KEY);
            }
            app_key.zip(app_secret).map(|(key, secret)| AuthMaterial::AppKeyPair {
                app_key: key.to_string(),
                app_secret: secret.to_string(),
            })
        };

        match (assistant_id, auth) {
            (Some(assistant_id), Some(auth)) if missing.is_empty() => {
                let credentials = Credentials {
                    assistant_id: assistant_id.to_string(),
                    auth,
                };
                credentials.validate()?;
                Ok(credentials)
            }
            _ => Err(CallerError::Configuration(format!(
                "Missing required credential: {}",
                missing.join(", ")
            ))),
        }
    }
}

#[async_trait]
impl CredentialProvider for HostContext {
    async fn resolve(&self) -> Result<Credentials> {
        self.credentials()
    }
}
