//! Entitlement Store port - per-user subscription, unlocks and usage.
//!
//! Writes are merge patches; readers never see a half-applied patch.
//! Every successful write is broadcast to subscribers of that user so
//! several open sessions converge on the same record.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::domain::entitlement::{EntitlementError, EntitlementPatch, EntitlementRecord};
use crate::domain::foundation::UserId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntitlementStoreError {
    #[error("Entitlement store unavailable: {0}")]
    Unavailable(String),

    #[error("Entitlement write rejected: {0}")]
    WriteRejected(String),

    #[error("Entitlement record corrupted: {0}")]
    Corrupted(String),

    /// A conditional write found the record at a different revision.
    #[error("Entitlement record changed: expected revision {expected}, found {actual}")]
    Conflict { expected: u64, actual: u64 },
}

impl From<EntitlementStoreError> for EntitlementError {
    fn from(err: EntitlementStoreError) -> Self {
        EntitlementError::Store(err.to_string())
    }
}

/// Port for the authoritative entitlement record.
///
/// # Contract
///
/// Implementations must:
/// - Return a fresh free-tier record for users never written before
/// - Apply each patch atomically with [`EntitlementRecord::merged`] semantics
/// - Return the record as stored after the write
/// - Broadcast the stored record after each successful write
/// - For [`write_at`](Self::write_at), compare the revision and apply the
///   patch under the same lock, failing with
///   [`EntitlementStoreError::Conflict`] when another write got there first
#[async_trait]
pub trait EntitlementStore: Send + Sync {
    async fn read(&self, user_id: &UserId) -> Result<EntitlementRecord, EntitlementStoreError>;

    async fn write(
        &self,
        user_id: &UserId,
        patch: &EntitlementPatch,
    ) -> Result<EntitlementRecord, EntitlementStoreError>;

    /// Like [`write`](Self::write), but only if the stored record is still
    /// at `revision`.
    async fn write_at(
        &self,
        user_id: &UserId,
        revision: u64,
        patch: &EntitlementPatch,
    ) -> Result<EntitlementRecord, EntitlementStoreError>;

    /// Live feed of stored records for `user_id`.
    fn subscribe(&self, user_id: &UserId) -> broadcast::Receiver<EntitlementRecord>;
}
