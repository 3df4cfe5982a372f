//! File-based Draft Store Adapter
//!
//! Stores each session's draft as a YAML file named after the session id.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::biodata::BiodataDraft;
use crate::domain::foundation::DraftSessionId;
use crate::ports::{DraftStore, DraftStoreError};

/// File-based storage for drafts
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    base_path: PathBuf,
}

impl FileDraftStore {
    /// Create a new file store rooted at `base_path`
    ///
    /// # Example
    /// ```ignore
    /// let store = FileDraftStore::new("./data/drafts");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn draft_path(&self, session: &DraftSessionId) -> PathBuf {
        self.base_path.join(format!("{}.yaml", session))
    }
}

#[async_trait]
impl DraftStore for FileDraftStore {
    async fn load(
        &self,
        session: &DraftSessionId,
    ) -> Result<Option<BiodataDraft>, DraftStoreError> {
        let yaml = match fs::read_to_string(self.draft_path(session)).await {
            Ok(yaml) => yaml,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(DraftStoreError::Io(e.to_string())),
        };

        serde_yaml::from_str(&yaml)
            .map(Some)
            .map_err(|e| DraftStoreError::Corrupted(e.to_string()))
    }

    async fn save(
        &self,
        session: &DraftSessionId,
        draft: &BiodataDraft,
    ) -> Result<(), DraftStoreError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| DraftStoreError::Io(e.to_string()))?;

        let yaml = serde_yaml::to_string(draft)
            .map_err(|e| DraftStoreError::Serialization(e.to_string()))?;

        // Write then rename so a crash never leaves half a file behind.
        let path = self.draft_path(session);
        let tmp = path.with_extension("yaml.tmp");
        fs::write(&tmp, yaml)
            .await
            .map_err(|e| DraftStoreError::Io(e.to_string()))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| DraftStoreError::Io(e.to_string()))
    }

    async fn reset(&self, session: &DraftSessionId) -> Result<(), DraftStoreError> {
        match fs::remove_file(self.draft_path(session)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DraftStoreError::Io(e.to_string())),
        }
    }
}
