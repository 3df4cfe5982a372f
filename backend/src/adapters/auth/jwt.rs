//! HS256 JWT identity provider.
//!
//! Tokens are issued by the sign-in service and carry `sub`, optional
//! `name` and `email`, and `exp`.

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::UserId;
use crate::ports::{Identity, IdentityChange, IdentityError, IdentityProvider};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub sub: String,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

pub struct JwtIdentityProvider {
    secret: SecretString,
    issuer: Option<String>,
}

impl JwtIdentityProvider {
    pub fn new(secret: SecretString) -> Self {
        Self {
            secret,
            issuer: None,
        }
    }

    /// Only accept tokens whose `iss` matches.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }
        validation
    }
}

impl std::fmt::Debug for JwtIdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtIdentityProvider")
            .field("secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .finish()
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn current_user(&self, token: &str) -> Result<Option<Identity>, IdentityError> {
        let key = DecodingKey::from_secret(self.secret.expose_secret().as_bytes());
        let data = decode::<IdentityClaims>(token, &key, &self.validation()).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Token expired");
                    IdentityError::TokenExpired
                }
                _ => {
                    tracing::warn!("Token validation failed: {}", e);
                    IdentityError::InvalidToken(e.to_string())
                }
            }
        })?;

        let claims = data.claims;
        let user_id =
            UserId::new(claims.sub).map_err(|e| IdentityError::InvalidToken(e.to_string()))?;
        Ok(Some(Identity {
            user_id,
            display_name: claims.name,
            email: claims.email,
        }))
    }

    /// Tokens are stateless, so there is nothing to announce.
    fn changes(&self) -> BoxStream<'static, IdentityChange> {
        stream::empty().boxed()
    }
}
