//! EntitlementService - Single owner of per-user entitlement state.
//!
//! Reads go to the authoritative store and are evaluated against the clock
//! on every call. Purchases may publish a tentative overlay first, which
//! subscribers see immediately and which is later confirmed or rolled back.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockWriteGuard};

use futures::stream::{self, BoxStream, StreamExt};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::domain::entitlement::{
    EntitlementEngine, EntitlementError, EntitlementPatch, EntitlementRecord, EntitlementSnapshot,
    Evaluation,
};
use crate::domain::foundation::{Timestamp, UserId};
use crate::ports::{EntitlementStore, EntitlementStoreError};

const UPDATE_CAPACITY: usize = 64;

/// Read-evaluate-write cycles tried before giving up on a busy record.
pub const MAX_WRITE_ATTEMPTS: usize = 16;

/// Where an update sits in the two-phase purchase flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdatePhase {
    /// Applied locally, store write still in flight.
    Tentative,
    /// Read back from the store.
    Confirmed,
    /// A tentative update was withdrawn.
    RolledBack,
}

/// Snapshot pushed to subscribers of one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementUpdate {
    pub user_id: UserId,
    pub phase: UpdatePhase,
    pub snapshot: EntitlementSnapshot,
}

pub struct EntitlementService {
    store: Arc<dyn EntitlementStore>,
    engine: EntitlementEngine,
    overlay: RwLock<HashMap<UserId, EntitlementRecord>>,
    updates: broadcast::Sender<EntitlementUpdate>,
}

impl EntitlementService {
    pub fn new(store: Arc<dyn EntitlementStore>, engine: EntitlementEngine) -> Self {
        Self {
            store,
            engine,
            overlay: RwLock::default(),
            updates: broadcast::channel(UPDATE_CAPACITY).0,
        }
    }

    pub fn engine(&self) -> &EntitlementEngine {
        &self.engine
    }

    fn overlay_mut(&self) -> RwLockWriteGuard<'_, HashMap<UserId, EntitlementRecord>> {
        self.overlay.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Authoritative record, straight from the store.
    pub async fn record(&self, user_id: &UserId) -> Result<EntitlementRecord, EntitlementError> {
        Ok(self.store.read(user_id).await?)
    }

    /// Merges `patch` into the stored record.
    pub async fn write(
        &self,
        user_id: &UserId,
        patch: &EntitlementPatch,
    ) -> Result<EntitlementRecord, EntitlementError> {
        Ok(self.store.write(user_id, patch).await?)
    }

    /// Merges `patch` only if the stored record is still at `revision`.
    ///
    /// `Ok(None)` means another write landed first; the caller re-reads
    /// and decides again.
    pub async fn write_at(
        &self,
        user_id: &UserId,
        revision: u64,
        patch: &EntitlementPatch,
    ) -> Result<Option<EntitlementRecord>, EntitlementError> {
        match self.store.write_at(user_id, revision, patch).await {
            Ok(stored) => Ok(Some(stored)),
            Err(EntitlementStoreError::Conflict { expected, actual }) => {
                debug!(user_id = %user_id, expected, actual, "Entitlement record moved on");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn evaluate(&self, record: &EntitlementRecord, now: Timestamp) -> Evaluation {
        self.engine
            .effective_entitlement(&record.subscription, &record.unlocked, &record.usage, now)
    }

    pub async fn snapshot(
        &self,
        user_id: &UserId,
    ) -> Result<EntitlementSnapshot, EntitlementError> {
        self.snapshot_at(user_id, Timestamp::now()).await
    }

    /// Authoritative snapshot at `now`.
    ///
    /// A subscription found expired is persisted as inactive, but only onto
    /// the record it was judged from. If the record changed meanwhile (a
    /// renewal, say) it is read and judged again. If the write fails the
    /// downgraded snapshot is still returned; the next read retries.
    pub async fn snapshot_at(
        &self,
        user_id: &UserId,
        now: Timestamp,
    ) -> Result<EntitlementSnapshot, EntitlementError> {
        for _ in 0..MAX_WRITE_ATTEMPTS {
            let record = self.record(user_id).await?;
            let evaluation = self.evaluate(&record, now);
            let downgrade = match evaluation.downgrade {
                Some(downgrade) => downgrade,
                None => return Ok(evaluation.snapshot),
            };

            warn!(
                user_id = %user_id,
                plan = %record.subscription.plan,
                "Subscription expired, downgrading to free tier"
            );
            let patch = EntitlementPatch::subscription(downgrade.subscription);
            match self.write_at(user_id, record.revision, &patch).await {
                Ok(Some(_)) => return Ok(evaluation.snapshot),
                Ok(None) => continue,
                Err(err) => {
                    warn!(user_id = %user_id, error = %err, "Failed to persist downgrade");
                    return Ok(evaluation.snapshot);
                }
            }
        }
        Err(busy(user_id))
    }

    /// What the user should currently be shown: the tentative overlay if a
    /// purchase is in flight, otherwise the authoritative snapshot.
    pub async fn visible_snapshot(
        &self,
        user_id: &UserId,
        now: Timestamp,
    ) -> Result<EntitlementSnapshot, EntitlementError> {
        let tentative = self
            .overlay
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(user_id)
            .cloned();
        match tentative {
            Some(record) => Ok(self.evaluate(&record, now).snapshot),
            None => self.snapshot_at(user_id, now).await,
        }
    }

    /// Publishes `record` as a not-yet-persisted state.
    pub fn publish_tentative(&self, record: EntitlementRecord, now: Timestamp) {
        let snapshot = self.evaluate(&record, now).snapshot;
        let user_id = record.user_id.clone();
        self.overlay_mut().insert(user_id.clone(), record);
        self.notify(user_id, UpdatePhase::Tentative, snapshot);
    }

    /// Drops the overlay in favour of the stored `record`.
    pub fn confirm(&self, record: &EntitlementRecord, now: Timestamp) {
        self.overlay_mut().remove(&record.user_id);
        let snapshot = self.evaluate(record, now).snapshot;
        self.notify(record.user_id.clone(), UpdatePhase::Confirmed, snapshot);
    }

    /// Withdraws the overlay and republishes `fallback`.
    pub fn roll_back(&self, fallback: &EntitlementRecord, now: Timestamp) {
        self.overlay_mut().remove(&fallback.user_id);
        let snapshot = self.evaluate(fallback, now).snapshot;
        self.notify(fallback.user_id.clone(), UpdatePhase::RolledBack, snapshot);
    }

    pub fn has_tentative(&self, user_id: &UserId) -> bool {
        self.overlay
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains_key(user_id)
    }

    fn notify(&self, user_id: UserId, phase: UpdatePhase, snapshot: EntitlementSnapshot) {
        // No receivers is fine.
        let _ = self.updates.send(EntitlementUpdate {
            user_id,
            phase,
            snapshot,
        });
    }

    /// Live updates for one user.
    ///
    /// Merges overlay changes made through this service with records
    /// written to the store by anyone, so every observer of the same user
    /// converges on the stored state.
    pub fn watch(&self, user_id: &UserId) -> BoxStream<'static, EntitlementUpdate> {
        let own = {
            let user_id = user_id.clone();
            receiver_stream(self.updates.subscribe())
                .filter(move |update| futures::future::ready(update.user_id == user_id))
        };

        let engine = self.engine;
        let stored = receiver_stream(self.store.subscribe(user_id)).map(move |record| {
            let snapshot = engine
                .effective_entitlement(
                    &record.subscription,
                    &record.unlocked,
                    &record.usage,
                    Timestamp::now(),
                )
                .snapshot;
            EntitlementUpdate {
                user_id: record.user_id,
                phase: UpdatePhase::Confirmed,
                snapshot,
            }
        });

        stream::select(own, stored).boxed()
    }
}

/// Every conditional write lost its race.
pub(crate) fn busy(user_id: &UserId) -> EntitlementError {
    EntitlementError::Store(format!(
        "entitlement record for {} kept changing, try again",
        user_id
    ))
}

/// Lagged receivers skip ahead; the stream ends when the sender is gone.
fn receiver_stream<T: Clone + Send + 'static>(
    receiver: broadcast::Receiver<T>,
) -> BoxStream<'static, T> {
    stream::unfold(receiver, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(item) => return Some((item, receiver)),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    })
    .boxed()
}

impl std::fmt::Debug for EntitlementService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntitlementService")
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}
