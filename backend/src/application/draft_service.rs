//! DraftService - Live draft sessions backed by the draft store.
//!
//! Each session is opened once, loaded from the store, and kept in memory
//! together with its live preview. Every change is saved back. Persistence
//! is best-effort: failures are logged and editing continues.
//!
//! Sessions left idle are dropped from memory when new ones are opened, and
//! the number held at once is capped. A dropped session is simply reloaded
//! from the store on its next use.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::sync::{MutexGuard, RwLock};
use tracing::{debug, info, warn};

use super::live_preview::LivePreview;
use crate::domain::biodata::{
    BiodataDraft, BiodataField, DraftRevision, DraftSession, Layout, LayoutRegistry,
};
use crate::domain::foundation::DraftSessionId;
use crate::ports::{DraftStore, DraftStoreError};

/// An open draft and the renderer following it.
#[derive(Debug)]
pub struct LiveDraft {
    session: DraftSession,
    preview: LivePreview,
    edits: tokio::sync::Mutex<()>,
    last_used: Mutex<Instant>,
}

impl LiveDraft {
    fn new(session: DraftSession, preview: LivePreview) -> Self {
        Self {
            session,
            preview,
            edits: tokio::sync::Mutex::new(()),
            last_used: Mutex::new(Instant::now()),
        }
    }

    /// Exclusive right to change the draft.
    ///
    /// Saved edits and temporary layout switches both take it, so a save
    /// never captures a layout that is only on screen for an export.
    pub async fn lock_edits(&self) -> MutexGuard<'_, ()> {
        self.edits.lock().await
    }

    fn touch(&self) {
        *self.last_used.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = Instant::now();
    }

    fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(
            *self.last_used.lock().unwrap_or_else(|poisoned| poisoned.into_inner()),
        )
    }

    pub fn session(&self) -> &DraftSession {
        &self.session
    }

    pub fn preview(&self) -> &LivePreview {
        &self.preview
    }
}

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_MAX_OPEN: usize = 1024;

pub struct DraftService {
    store: Arc<dyn DraftStore>,
    registry: LayoutRegistry,
    sessions: RwLock<HashMap<DraftSessionId, Arc<LiveDraft>>>,
    idle_timeout: Duration,
    max_open: usize,
}

impl DraftService {
    pub fn new(store: Arc<dyn DraftStore>, registry: LayoutRegistry) -> Self {
        Self {
            store,
            registry,
            sessions: RwLock::new(HashMap::new()),
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            max_open: DEFAULT_MAX_OPEN,
        }
    }

    /// How long an untouched session stays in memory, and how many are kept.
    pub fn with_limits(mut self, idle_timeout: Duration, max_open: usize) -> Self {
        self.idle_timeout = idle_timeout;
        self.max_open = max_open.max(1);
        self
    }

    pub fn registry(&self) -> &LayoutRegistry {
        &self.registry
    }

    /// Returns the live session, loading it on first use.
    pub async fn open(&self, id: &DraftSessionId) -> Arc<LiveDraft> {
        if let Some(live) = self.sessions.read().await.get(id) {
            live.touch();
            return live.clone();
        }

        let mut sessions = self.sessions.write().await;
        // Another caller may have loaded it while we waited.
        if let Some(live) = sessions.get(id) {
            live.touch();
            return live.clone();
        }

        self.evict(&mut sessions);

        let draft = self.load(id).await;
        let session = DraftSession::new(draft);
        let preview = LivePreview::spawn(self.registry.clone(), session.subscribe());
        let live = Arc::new(LiveDraft::new(session, preview));
        sessions.insert(*id, live.clone());
        live
    }

    /// Drops idle sessions, then the least recently used ones while the cap
    /// would be exceeded. Sessions someone still holds are never dropped.
    fn evict(&self, sessions: &mut HashMap<DraftSessionId, Arc<LiveDraft>>) {
        let now = Instant::now();
        let before = sessions.len();
        sessions.retain(|_, live| {
            Arc::strong_count(live) > 1 || live.idle_for(now) < self.idle_timeout
        });

        while sessions.len() >= self.max_open {
            let oldest = sessions
                .iter()
                .filter(|(_, live)| Arc::strong_count(live) == 1)
                .max_by_key(|(_, live)| live.idle_for(now))
                .map(|(id, _)| *id);
            match oldest {
                Some(id) => {
                    sessions.remove(&id);
                }
                None => break,
            }
        }

        let evicted = before - sessions.len();
        if evicted > 0 {
            info!(evicted, open = sessions.len(), "Evicted idle draft sessions");
        }
    }

    /// Stored draft, or an empty one when nothing usable is stored.
    async fn load(&self, id: &DraftSessionId) -> BiodataDraft {
        match self.store.load(id).await {
            Ok(Some(draft)) => draft,
            Ok(None) => BiodataDraft::new(),
            Err(DraftStoreError::Corrupted(reason)) => {
                warn!(session = %id, reason = %reason, "Discarding corrupted draft");
                if let Err(err) = self.store.reset(id).await {
                    warn!(session = %id, error = %err, "Failed to clear corrupted draft");
                }
                BiodataDraft::new()
            }
            Err(err) => {
                warn!(session = %id, error = %err, "Failed to load draft, starting empty");
                BiodataDraft::new()
            }
        }
    }

    pub async fn current(&self, id: &DraftSessionId) -> DraftRevision {
        self.open(id).await.session().current()
    }

    /// Sets several fields as one revision.
    pub async fn set_fields(
        &self,
        id: &DraftSessionId,
        fields: Vec<(BiodataField, String)>,
    ) -> DraftRevision {
        self.change(id, |draft| {
            for (field, value) in fields {
                draft.set_field(field, value);
            }
        })
        .await
    }

    pub async fn set_layout(&self, id: &DraftSessionId, layout: Layout) -> DraftRevision {
        self.change(id, |draft| draft.layout = layout).await
    }

    pub async fn replace(&self, id: &DraftSessionId, draft: BiodataDraft) -> DraftRevision {
        self.change(id, |current| *current = draft).await
    }

    /// Clears the draft and its stored copy.
    pub async fn reset(&self, id: &DraftSessionId) -> DraftRevision {
        let live = self.open(id).await;
        let _edits = live.lock_edits().await;
        live.session().reset();
        if let Err(err) = self.store.reset(id).await {
            warn!(session = %id, error = %err, "Failed to clear stored draft");
        }
        live.session().current()
    }

    async fn change(
        &self,
        id: &DraftSessionId,
        change: impl FnOnce(&mut BiodataDraft),
    ) -> DraftRevision {
        let live = self.open(id).await;
        let _edits = live.lock_edits().await;
        let before = live.session().revision();
        live.session().update(change);
        let current = live.session().current();
        if current.revision != before {
            self.persist(id, &current.draft).await;
        }
        current
    }

    async fn persist(&self, id: &DraftSessionId, draft: &BiodataDraft) {
        match self.store.save(id, draft).await {
            Ok(()) => debug!(session = %id, "Draft saved"),
            Err(err) => warn!(session = %id, error = %err, "Failed to save draft"),
        }
    }

    /// Forgets the in-memory session. The stored copy is kept.
    pub async fn close(&self, id: &DraftSessionId) {
        self.sessions.write().await.remove(id);
    }

    pub async fn open_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl std::fmt::Debug for DraftService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraftService")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryDraftStore;
    use async_trait::async_trait;

    fn service(store: &InMemoryDraftStore) -> DraftService {
        DraftService::new(Arc::new(store.clone()), LayoutRegistry::standard())
    }

    struct BrokenDraftStore;

    #[async_trait]
    impl DraftStore for BrokenDraftStore {
        async fn load(&self, _: &DraftSessionId) -> Result<Option<BiodataDraft>, DraftStoreError> {
            Err(DraftStoreError::Io("disk unavailable".into()))
        }

        async fn save(&self, _: &DraftSessionId, _: &BiodataDraft) -> Result<(), DraftStoreError> {
            Err(DraftStoreError::Io("disk unavailable".into()))
        }

        async fn reset(&self, _: &DraftSessionId) -> Result<(), DraftStoreError> {
            Err(DraftStoreError::Io("disk unavailable".into()))
        }
    }

    #[tokio::test]
    async fn new_session_starts_empty() {
        let store = InMemoryDraftStore::new();
        let current = service(&store).current(&DraftSessionId::new()).await;
        assert_eq!(current.revision, 0);
        assert!(current.draft.is_blank());
    }

    #[tokio::test]
    async fn changes_are_saved_and_reloaded() {
        let store = InMemoryDraftStore::new();
        let id = DraftSessionId::new();
        service(&store)
            .set_fields(
                &id,
                vec![
                    (BiodataField::FullName, "Kavya Nair".to_string()),
                    (BiodataField::Diet, "Vegetarian".to_string()),
                ],
            )
            .await;

        let reopened = service(&store).current(&id).await;
        assert_eq!(reopened.draft.field(BiodataField::FullName), "Kavya Nair");
        assert_eq!(reopened.draft.field(BiodataField::Diet), "Vegetarian");
    }

    #[tokio::test]
    async fn several_fields_make_one_revision() {
        let store = InMemoryDraftStore::new();
        let id = DraftSessionId::new();
        let revision = service(&store)
            .set_fields(
                &id,
                vec![
                    (BiodataField::Height, "5'6\"".to_string()),
                    (BiodataField::BloodGroup, "O+".to_string()),
                ],
            )
            .await;
        assert_eq!(revision.revision, 1);
    }

    #[tokio::test]
    async fn corrupted_draft_falls_back_to_empty_and_is_cleared() {
        let store = InMemoryDraftStore::new();
        let id = DraftSessionId::new();
        store.corrupt(&id, "unexpected end of input").await;

        let current = service(&store).current(&id).await;

        assert!(current.draft.is_blank());
        assert!(store.load(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn persistence_failures_do_not_block_editing() {
        let service = DraftService::new(Arc::new(BrokenDraftStore), LayoutRegistry::standard());
        let id = DraftSessionId::new();

        let revision = service
            .set_fields(&id, vec![(BiodataField::FullName, "Arjun Mehta".to_string())])
            .await;

        assert_eq!(revision.draft.field(BiodataField::FullName), "Arjun Mehta");
        let reset = service.reset(&id).await;
        assert!(reset.draft.is_blank());
    }

    #[tokio::test]
    async fn reset_clears_stored_copy() {
        let store = InMemoryDraftStore::new();
        let id = DraftSessionId::new();
        let service = service(&store);
        service
            .set_fields(&id, vec![(BiodataField::Phone, "98765 43210".to_string())])
            .await;

        service.reset(&id).await;

        assert!(store.load(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unchanged_value_is_not_a_new_revision() {
        let store = InMemoryDraftStore::new();
        let id = DraftSessionId::new();
        let service = service(&store);
        service.set_layout(&id, Layout::Traditional).await;

        let again = service.set_layout(&id, Layout::Traditional).await;

        assert_eq!(again.revision, 1);
    }

    #[tokio::test]
    async fn sessions_are_shared_until_closed() {
        let store = InMemoryDraftStore::new();
        let service = service(&store);
        let id = DraftSessionId::new();

        let first = service.open(&id).await;
        let second = service.open(&id).await;
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(service.open_count().await, 1);

        service.close(&id).await;
        assert_eq!(service.open_count().await, 0);
    }

    #[tokio::test]
    async fn idle_sessions_are_dropped_and_reload_from_the_store() {
        let store = InMemoryDraftStore::new();
        let service = service(&store).with_limits(Duration::from_millis(20), 16);
        let idle = DraftSessionId::new();
        service
            .set_fields(&idle, vec![(BiodataField::FullName, "Rohan Das".to_string())])
            .await;

        tokio::time::sleep(Duration::from_millis(40)).await;
        service.open(&DraftSessionId::new()).await;

        assert_eq!(service.open_count().await, 1);
        let reloaded = service.current(&idle).await;
        assert_eq!(reloaded.draft.field(BiodataField::FullName), "Rohan Das");
    }

    #[tokio::test]
    async fn cap_drops_least_recently_used_first() {
        let store = InMemoryDraftStore::new();
        let service = service(&store).with_limits(DEFAULT_IDLE_TIMEOUT, 2);
        let first = DraftSessionId::new();
        let second = DraftSessionId::new();
        let third = DraftSessionId::new();

        service.open(&first).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        service.open(&second).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        // Using the first again makes the second the oldest.
        service.open(&first).await;
        service.open(&third).await;

        assert_eq!(service.open_count().await, 2);
        let sessions = service.sessions.read().await;
        assert!(sessions.contains_key(&first));
        assert!(!sessions.contains_key(&second));
        assert!(sessions.contains_key(&third));
    }

    #[tokio::test]
    async fn sessions_in_use_are_never_dropped() {
        let store = InMemoryDraftStore::new();
        let service = service(&store).with_limits(Duration::from_millis(1), 1);
        let held_id = DraftSessionId::new();
        let held = service.open(&held_id).await;

        tokio::time::sleep(Duration::from_millis(10)).await;
        service.open(&DraftSessionId::new()).await;

        assert_eq!(service.open_count().await, 2);
        assert!(Arc::ptr_eq(&held, &service.open(&held_id).await));
    }
}
