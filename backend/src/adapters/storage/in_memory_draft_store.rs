//! In-Memory Draft Store Adapter
//!
//! Useful for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::biodata::BiodataDraft;
use crate::domain::foundation::DraftSessionId;
use crate::ports::{DraftStore, DraftStoreError};

/// Raw stored value; `Corrupt` stands in for data that no longer parses.
#[derive(Debug, Clone)]
enum Slot {
    Draft(BiodataDraft),
    Corrupt(String),
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryDraftStore {
    drafts: Arc<RwLock<HashMap<DraftSessionId, Slot>>>,
}

impl InMemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `load` for `session` fail as corrupted
    pub async fn corrupt(&self, session: &DraftSessionId, reason: impl Into<String>) {
        self.drafts
            .write()
            .await
            .insert(*session, Slot::Corrupt(reason.into()));
    }

    pub async fn draft_count(&self) -> usize {
        self.drafts.read().await.len()
    }
}

#[async_trait]
impl DraftStore for InMemoryDraftStore {
    async fn load(
        &self,
        session: &DraftSessionId,
    ) -> Result<Option<BiodataDraft>, DraftStoreError> {
        match self.drafts.read().await.get(session) {
            None => Ok(None),
            Some(Slot::Draft(draft)) => Ok(Some(draft.clone())),
            Some(Slot::Corrupt(reason)) => Err(DraftStoreError::Corrupted(reason.clone())),
        }
    }

    async fn save(
        &self,
        session: &DraftSessionId,
        draft: &BiodataDraft,
    ) -> Result<(), DraftStoreError> {
        self.drafts
            .write()
            .await
            .insert(*session, Slot::Draft(draft.clone()));
        Ok(())
    }

    async fn reset(&self, session: &DraftSessionId) -> Result<(), DraftStoreError> {
        self.drafts.write().await.remove(session);
        Ok(())
    }
}
