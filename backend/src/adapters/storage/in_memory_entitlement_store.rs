//! In-Memory Entitlement Store Adapter
//!
//! Holds every user's record in memory. Writes can be made to fail, to be
//! silently lost, or to be overtaken by another writer, which is how tests
//! exercise purchase rollback and conditional writes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, RwLock};

use super::record_feed::RecordFeed;
use crate::domain::entitlement::{EntitlementPatch, EntitlementRecord};
use crate::domain::foundation::UserId;
use crate::ports::{EntitlementStore, EntitlementStoreError};

#[derive(Debug, Clone, Default)]
pub struct InMemoryEntitlementStore {
    records: Arc<RwLock<HashMap<UserId, EntitlementRecord>>>,
    feed: RecordFeed,
    fail_next_write: Arc<AtomicBool>,
    lose_next_write: Arc<AtomicBool>,
    overtake_next_write: Arc<Mutex<Option<EntitlementPatch>>>,
}

impl InMemoryEntitlementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a record as-is, without notifying subscribers
    pub async fn insert(&self, record: EntitlementRecord) {
        self.records.write().await.insert(record.user_id.clone(), record);
    }

    /// The next write returns an error and changes nothing
    pub fn fail_next_write(&self) {
        self.fail_next_write.store(true, Ordering::SeqCst);
    }

    /// The next write reports success but is not stored
    pub fn lose_next_write(&self) {
        self.lose_next_write.store(true, Ordering::SeqCst);
    }

    /// `patch` is stored as if another writer got in just before the next
    /// write, after its caller has already read the record
    pub fn overtake_next_write(&self, patch: EntitlementPatch) {
        *self
            .overtake_next_write
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(patch);
    }

    async fn apply(
        &self,
        user_id: &UserId,
        expected: Option<u64>,
        patch: &EntitlementPatch,
    ) -> Result<EntitlementRecord, EntitlementStoreError> {
        if self.fail_next_write.swap(false, Ordering::SeqCst) {
            return Err(EntitlementStoreError::Unavailable(
                "simulated write failure".to_string(),
            ));
        }

        let overtaking = self
            .overtake_next_write
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();

        let mut records = self.records.write().await;
        let mut current = records
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| EntitlementRecord::new(user_id.clone()));
        if let Some(other) = overtaking {
            current = current.merged(&other);
            records.insert(user_id.clone(), current.clone());
            self.feed.publish(&current);
        }
        if let Some(expected) = expected {
            if current.revision != expected {
                return Err(EntitlementStoreError::Conflict {
                    expected,
                    actual: current.revision,
                });
            }
        }
        let next = current.merged(patch);

        if self.lose_next_write.swap(false, Ordering::SeqCst) {
            return Ok(next);
        }

        records.insert(user_id.clone(), next.clone());
        drop(records);

        self.feed.publish(&next);
        Ok(next)
    }
}

#[async_trait]
impl EntitlementStore for InMemoryEntitlementStore {
    async fn read(&self, user_id: &UserId) -> Result<EntitlementRecord, EntitlementStoreError> {
        Ok(self
            .records
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| EntitlementRecord::new(user_id.clone())))
    }

    async fn write(
        &self,
        user_id: &UserId,
        patch: &EntitlementPatch,
    ) -> Result<EntitlementRecord, EntitlementStoreError> {
        self.apply(user_id, None, patch).await
    }

    async fn write_at(
        &self,
        user_id: &UserId,
        revision: u64,
        patch: &EntitlementPatch,
    ) -> Result<EntitlementRecord, EntitlementStoreError> {
        self.apply(user_id, Some(revision), patch).await
    }

    fn subscribe(&self, user_id: &UserId) -> broadcast::Receiver<EntitlementRecord> {
        self.feed.subscribe(user_id)
    }
}
