//! Authentication configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Authentication configuration (HS256 bearer tokens)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Shared secret tokens are signed with
    pub jwt_secret: Option<SecretString>,

    /// Required `iss` claim, if any
    pub issuer: Option<String>,
}

impl AuthConfig {
    pub fn is_configured(&self) -> bool {
        self.jwt_secret
            .as_ref()
            .is_some_and(|s| !s.expose_secret().is_empty())
    }

    /// Validate authentication configuration
    ///
    /// Development may run without a secret, using the token as the user id.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if *environment == Environment::Production && !self.is_configured() {
            return Err(ValidationError::JwtSecretRequired);
        }
        Ok(())
    }
}
