//! File-based Entitlement Store Adapter
//!
//! One YAML file per user. Writes are serialized through a single lock and
//! land with write-then-rename, so a patch is either fully stored or not
//! at all.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::{broadcast, Mutex};

use super::record_feed::RecordFeed;
use crate::domain::entitlement::{EntitlementPatch, EntitlementRecord};
use crate::domain::foundation::UserId;
use crate::ports::{EntitlementStore, EntitlementStoreError};

#[derive(Debug, Clone)]
pub struct FileEntitlementStore {
    base_path: PathBuf,
    write_lock: Arc<Mutex<()>>,
    feed: RecordFeed,
}

impl FileEntitlementStore {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            write_lock: Arc::new(Mutex::new(())),
            feed: RecordFeed::default(),
        }
    }

    /// User ids are opaque; hex keeps them filesystem-safe.
    fn record_path(&self, user_id: &UserId) -> PathBuf {
        self.base_path
            .join(format!("{}.yaml", hex::encode(user_id.as_str().as_bytes())))
    }

    async fn load(&self, user_id: &UserId) -> Result<EntitlementRecord, EntitlementStoreError> {
        let yaml = match fs::read_to_string(self.record_path(user_id)).await {
            Ok(yaml) => yaml,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Ok(EntitlementRecord::new(user_id.clone()))
            }
            Err(e) => return Err(EntitlementStoreError::Unavailable(e.to_string())),
        };
        serde_yaml::from_str(&yaml).map_err(|e| EntitlementStoreError::Corrupted(e.to_string()))
    }

    async fn apply(
        &self,
        user_id: &UserId,
        expected: Option<u64>,
        patch: &EntitlementPatch,
    ) -> Result<EntitlementRecord, EntitlementStoreError> {
        let _guard = self.write_lock.lock().await;

        let current = self.load(user_id).await?;
        if let Some(expected) = expected {
            if current.revision != expected {
                return Err(EntitlementStoreError::Conflict {
                    expected,
                    actual: current.revision,
                });
            }
        }
        let next = current.merged(patch);
        let yaml = serde_yaml::to_string(&next)
            .map_err(|e| EntitlementStoreError::WriteRejected(e.to_string()))?;

        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| EntitlementStoreError::Unavailable(e.to_string()))?;
        let path = self.record_path(user_id);
        let tmp = path.with_extension("yaml.tmp");
        fs::write(&tmp, yaml)
            .await
            .map_err(|e| EntitlementStoreError::Unavailable(e.to_string()))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| EntitlementStoreError::Unavailable(e.to_string()))?;

        self.feed.publish(&next);
        Ok(next)
    }
}

#[async_trait]
impl EntitlementStore for FileEntitlementStore {
    async fn read(&self, user_id: &UserId) -> Result<EntitlementRecord, EntitlementStoreError> {
        self.load(user_id).await
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
