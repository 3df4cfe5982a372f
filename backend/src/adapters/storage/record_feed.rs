//! Per-user broadcast of stored entitlement records.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::broadcast;

use crate::domain::entitlement::EntitlementRecord;
use crate::domain::foundation::UserId;

const CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone, Default)]
pub(crate) struct RecordFeed {
    channels: Arc<Mutex<HashMap<UserId, broadcast::Sender<EntitlementRecord>>>>,
}

impl RecordFeed {
    fn channels(&self) -> MutexGuard<'_, HashMap<UserId, broadcast::Sender<EntitlementRecord>>> {
        self.channels.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn subscribe(&self, user_id: &UserId) -> broadcast::Receiver<EntitlementRecord> {
        self.channels()
            .entry(user_id.clone())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Sends to current subscribers. Channels nobody listens to are dropped.
    pub(crate) fn publish(&self, record: &EntitlementRecord) {
        let mut channels = self.channels();
        if let Some(sender) = channels.get(&record.user_id) {
            if sender.send(record.clone()).is_err() {
                channels.remove(&record.user_id);
            }
        }
    }
}
