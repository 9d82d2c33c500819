//! Authentication for upstream requests.
//!
//! The only scheme is a bearer API key, optionally scoped to an
//! organization. The key is held as a [`SecretString`] and only exposed
//! while writing the `Authorization` header.

use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;

use crate::errors::ProviderError;

/// Authentication provider trait.
pub trait AuthProvider: Send + Sync {
    /// Apply authentication to request headers.
    fn apply_auth(&self, headers: &mut HashMap<String, String>);

    /// Validate the credentials.
    fn validate(&self) -> Result<(), ProviderError>;

    /// Returns true when a non-empty credential is present.
    fn is_configured(&self) -> bool;
}

/// API key authentication provider.
#[derive(Clone)]
pub struct ApiKeyAuth {
    api_key: SecretString,
    organization: Option<String>,
}

impl ApiKeyAuth {
    /// Creates a new API key authentication provider.
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            organization: None,
        }
    }

    /// Creates from a string API key.
    pub fn from_string(api_key: impl Into<String>) -> Self {
        Self::new(SecretString::new(api_key.into()))
    }

    /// Scopes requests to an organization.
    pub fn with_organization(mut self, organization: Option<String>) -> Self {
        self.organization = organization;
        self
    }

    /// Gets a hint of the API key for debugging (last 4 characters).
    pub fn key_hint(&self) -> String {
        let key = self.api_key.expose_secret();
        if key.len() > 4 {
            format!("...{}", &key[key.len() - 4..])
        } else {
            "****".to_string()
        }
    }
}

impl AuthProvider for ApiKeyAuth {
    fn apply_auth(&self, headers: &mut HashMap<String, String>) {
        headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", self.api_key.expose_secret()),
        );
        if let Some(org) = &self.organization {
            headers.insert("OpenAI-Organization".to_string(), org.clone());
        }
    }

    fn validate(&self) -> Result<(), ProviderError> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(ProviderError::Authentication {
                message: "API key cannot be empty".to_string(),
            });
        }

        if !self.api_key.expose_secret().starts_with("sk-") {
            tracing::warn!(
                key_hint = %self.key_hint(),
                "API key does not match expected OpenAI format (sk-*)"
            );
        }

        Ok(())
    }

    fn is_configured(&self) -> bool {
        !self.api_key.expose_secret().trim().is_empty()
    }
}

impl std::fmt::Debug for ApiKeyAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyAuth")
            .field("api_key", &"[REDACTED]")
            .field("key_hint", &self.key_hint())
            .field("organization", &self.organization)
            .finish()
    }
}
