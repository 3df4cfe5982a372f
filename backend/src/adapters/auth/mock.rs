//! Mock identity adapters for testing and local development.
//!
//! # Example
//!
//! ```ignore
//! let identity = MockIdentityProvider::new().with_user("valid-token", "user-123");
//! let user = identity.current_user("valid-token").await?;
//! ```

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use tokio::sync::broadcast;

use crate::domain::foundation::UserId;
use crate::ports::{Identity, IdentityChange, IdentityError, IdentityProvider};

/// Token table with scriptable sign-in/sign-out events.
///
/// Unknown tokens are `InvalidToken`.
#[derive(Debug)]
pub struct MockIdentityProvider {
    tokens: RwLock<HashMap<String, Identity>>,
    force_error: RwLock<Option<IdentityError>>,
    changes: broadcast::Sender<IdentityChange>,
}

impl Default for MockIdentityProvider {
    fn default() -> Self {
        Self {
            tokens: RwLock::default(),
            force_error: RwLock::default(),
            changes: broadcast::channel(16).0,
        }
    }
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn tokens(&self) -> RwLockReadGuard<'_, HashMap<String, Identity>> {
        self.tokens.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn tokens_mut(&self) -> RwLockWriteGuard<'_, HashMap<String, Identity>> {
        self.tokens.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Adds a valid token for `user_id`.
    ///
    /// Blank user ids are ignored.
    pub fn with_user(self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        if let Ok(user_id) = UserId::new(user_id) {
            self.tokens_mut().insert(token.into(), Identity::new(user_id));
        }
        self
    }

    /// Forces every lookup to fail with `error`.
    pub fn with_error(self, error: IdentityError) -> Self {
        *self
            .force_error
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(error);
        self
    }

    /// Registers `token` and announces the sign-in.
    pub fn sign_in(&self, token: impl Into<String>, identity: Identity) {
        self.tokens_mut().insert(token.into(), identity.clone());
        let _ = self.changes.send(IdentityChange::SignedIn(identity));
    }

    /// Forgets every token of `user_id` and announces the sign-out.
    pub fn sign_out(&self, user_id: &UserId) {
        self.tokens_mut().retain(|_, identity| &identity.user_id != user_id);
        let _ = self.changes.send(IdentityChange::SignedOut(user_id.clone()));
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn current_user(&self, token: &str) -> Result<Option<Identity>, IdentityError> {
        if let Some(error) = self
            .force_error
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
        {
            return Err(error);
        }
        self.tokens()
            .get(token)
            .cloned()
            .map(Some)
            .ok_or_else(|| IdentityError::InvalidToken("unknown token".to_string()))
    }

    fn changes(&self) -> BoxStream<'static, IdentityChange> {
        broadcast_stream(self.changes.subscribe())
    }
}

/// Development provider that trusts the token as the user id.
///
/// Only for local use when no signing secret is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DevIdentityProvider;

#[async_trait]
impl IdentityProvider for DevIdentityProvider {
    async fn current_user(&self, token: &str) -> Result<Option<Identity>, IdentityError> {
        UserId::new(token.trim())
            .map(|id| Some(Identity::new(id)))
            .map_err(|e| IdentityError::InvalidToken(e.to_string()))
    }

    fn changes(&self) -> BoxStream<'static, IdentityChange> {
        stream::empty().boxed()
    }
}

/// Lagged receivers skip ahead rather than ending the stream.
fn broadcast_stream(rx: broadcast::Receiver<IdentityChange>) -> BoxStream<'static, IdentityChange> {
    stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(change) => return Some((change, rx)),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    })
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn known_token_resolves() {
        let provider = MockIdentityProvider::new().with_user("tok", "user-1");
        let identity = provider.current_user("tok").await.unwrap().unwrap();
        assert_eq!(identity.user_id.as_str(), "user-1");
        assert!(provider.current_user("other").await.is_err());
    }

    #[tokio::test]
    async fn forced_error_wins() {
        let provider = MockIdentityProvider::new()
            .with_user("tok", "user-1")
            .with_error(IdentityError::ServiceUnavailable("down".into()));
        assert!(matches!(
            provider.current_user("tok").await,
            Err(IdentityError::ServiceUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn sign_in_and_out_are_streamed() {
        let provider = MockIdentityProvider::new();
        let mut changes = provider.changes();
        let user = UserId::new("user-7").unwrap();

        provider.sign_in("tok-7", Identity::new(user.clone()));
        provider.sign_out(&user);

        assert!(matches!(changes.next().await, Some(IdentityChange::SignedIn(_))));
        assert_eq!(changes.next().await, Some(IdentityChange::SignedOut(user)));
        assert!(provider.current_user("tok-7").await.is_err());
    }

    #[tokio::test]
    async fn dev_provider_trusts_token() {
        let identity = DevIdentityProvider.current_user("alice").await.unwrap().unwrap();
        assert_eq!(identity.user_id.as_str(), "alice");
        assert!(DevIdentityProvider.current_user("  ").await.is_err());
    }
}
