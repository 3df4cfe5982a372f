//! Identity port: who is signed in.
//!
//! Bearer tokens are resolved to an [`Identity`]. Sign-in and sign-out are
//! also published as a stream so open sessions can react.

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::UserId;

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: UserId,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

impl Identity {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            display_name: None,
            email: None,
        }
    }
}

/// Sign-in state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityChange {
    SignedIn(Identity),
    SignedOut(UserId),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Identity service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Resolves access tokens to users.
///
/// # Contract
///
/// Implementations must:
/// - Return `Ok(None)` when no user is signed in (anonymous access)
/// - Return `IdentityError::InvalidToken` for malformed or forged tokens
/// - Return `IdentityError::TokenExpired` for expired tokens
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve a raw token (without the "Bearer " prefix).
    async fn current_user(&self, token: &str) -> Result<Option<Identity>, IdentityError>;

    /// Stream of sign-in/sign-out events. May never yield.
    fn changes(&self) -> BoxStream<'static, IdentityChange>;
}
