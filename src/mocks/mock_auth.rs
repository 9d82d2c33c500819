use std::collections::HashMap;

use crate::auth::AuthProvider;
use crate::errors::ProviderError;

/// Auth provider writing a fixed bearer token.
#[derive(Debug, Clone)]
pub struct MockAuth {
    token: String,
}

impl MockAuth {
    pub fn new() -> Self {
        Self {
            token: "test-api-key".to_string(),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            token: String::new(),
        }
    }
}

impl Default for MockAuth {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthProvider for MockAuth {
    fn apply_auth(&self, headers: &mut HashMap<String, String>) {
        headers.insert("Authorization".to_string(), format!("Bearer {}", self.token));
    }

    fn validate(&self) -> Result<(), ProviderError> {
        if self.token.is_empty() {
            Err(ProviderError::Authentication {
                message: "API key cannot be empty".to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn is_configured(&self) -> bool {
        !self.token.is_empty()
    }
}
