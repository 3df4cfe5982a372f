//! Draft Store port - persists the single active draft per session.

use async_trait::async_trait;

use crate::domain::biodata::BiodataDraft;
use crate::domain::foundation::DraftSessionId;

#[derive(Debug, thiserror::Error)]
pub enum DraftStoreError {
    /// Stored data exists but cannot be read back as a draft.
    #[error("Stored draft is corrupted: {0}")]
    Corrupted(String),

    #[error("Failed to serialize draft: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(String),
}

/// Port for draft persistence.
///
/// # Contract
///
/// - `load` returns `Ok(None)` when nothing was saved for the session
/// - `load` returns `DraftStoreError::Corrupted` for unreadable data
/// - `reset` on a missing draft is not an error
#[async_trait]
pub trait DraftStore: Send + Sync {
    async fn load(&self, session: &DraftSessionId) -> Result<Option<BiodataDraft>, DraftStoreError>;

    async fn save(
        &self,
        session: &DraftSessionId,
        draft: &BiodataDraft,
    ) -> Result<(), DraftStoreError>;

    async fn reset(&self, session: &DraftSessionId) -> Result<(), DraftStoreError>;
}
