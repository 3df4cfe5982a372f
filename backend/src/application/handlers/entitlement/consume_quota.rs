//! ConsumeQuotaHandler - Counts a view, interest or boost.

use std::sync::Arc;

use tracing::debug;

use crate::application::entitlement_service::{busy, MAX_WRITE_ATTEMPTS};
use crate::application::EntitlementService;
use crate::domain::entitlement::{
    EntitlementError, EntitlementPatch, EntitlementSnapshot, QuotaKind,
};
use crate::domain::foundation::{Timestamp, UserId};

#[derive(Debug, Clone)]
pub struct ConsumeQuotaCommand {
    pub user_id: UserId,
    pub kind: QuotaKind,
}

#[derive(Debug, Clone)]
pub struct ConsumeQuotaResult {
    pub snapshot: EntitlementSnapshot,
}

/// Handler for quota-limited actions.
///
/// An exhausted quota is an expected outcome: the error is returned and
/// nothing is written. Concurrent calls for the same user never grant more
/// than the quota allows; a call that loses the race re-counts.
pub struct ConsumeQuotaHandler {
    entitlements: Arc<EntitlementService>,
}

impl ConsumeQuotaHandler {
    pub fn new(entitlements: Arc<EntitlementService>) -> Self {
        Self { entitlements }
    }

    pub async fn handle(
        &self,
        cmd: ConsumeQuotaCommand,
    ) -> Result<ConsumeQuotaResult, EntitlementError> {
        self.handle_at(cmd, Timestamp::now()).await
    }

    pub async fn handle_at(
        &self,
        cmd: ConsumeQuotaCommand,
        now: Timestamp,
    ) -> Result<ConsumeQuotaResult, EntitlementError> {
        for _ in 0..MAX_WRITE_ATTEMPTS {
            let record = self.entitlements.record(&cmd.user_id).await?;
            let evaluation = self.entitlements.evaluate(&record, now);

            let usage = match self
                .entitlements
                .engine()
                .consume_quota(&evaluation.snapshot, cmd.kind, now)
            {
                Ok(usage) => usage,
                Err(err) => {
                    debug!(user_id = %cmd.user_id, kind = %cmd.kind, "Quota exhausted");
                    return Err(err);
                }
            };

            // Counts are absolute, so they only land on the record they
            // were counted from. An expiry noticed here goes in the same write.
            let patch = EntitlementPatch {
                subscription: evaluation.downgrade.map(|downgrade| downgrade.subscription),
                ..EntitlementPatch::usage(usage)
            };
            if let Some(stored) = self
                .entitlements
                .write_at(&cmd.user_id, record.revision, &patch)
                .await?
            {
                debug!(user_id = %cmd.user_id, kind = %cmd.kind, "Quota consumed");
                return Ok(ConsumeQuotaResult {
                    snapshot: self.entitlements.evaluate(&stored, now).snapshot,
                });
            }
        }
        Err(busy(&cmd.user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryEntitlementStore;
    use crate::domain::entitlement::{EntitlementEngine, Plan, Subscription};
    use crate::domain::entitlement::EntitlementRecord;
    use crate::ports::EntitlementStore;

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse_rfc3339(s).unwrap()
    }

    fn handler(store: &InMemoryEntitlementStore) -> ConsumeQuotaHandler {
        ConsumeQuotaHandler::new(Arc::new(EntitlementService::new(
            Arc::new(store.clone()),
            EntitlementEngine::default(),
        )))
    }

    fn view() -> ConsumeQuotaCommand {
        ConsumeQuotaCommand {
            user_id: user(),
            kind: QuotaKind::View,
        }
    }

    #[tokio::test]
    async fn sixth_view_of_the_day_is_refused_without_counting() {
        let store = InMemoryEntitlementStore::new();
        let handler = handler(&store);
        let now = ts("2024-06-01T06:00:00Z");

        for expected in 1..=5 {
            let result = handler.handle_at(view(), now).await.unwrap();
            assert_eq!(result.snapshot.usage.profiles_viewed_today, expected);
        }
        let before = store.read(&user()).await.unwrap();

        let err = handler.handle_at(view(), now).await.unwrap_err();

        assert!(matches!(err, EntitlementError::QuotaExceeded { kind: QuotaKind::View, limit: 5 }));
        assert_eq!(store.read(&user()).await.unwrap(), before);
    }

    #[tokio::test]
    async fn views_reset_on_the_next_local_day() {
        let store = InMemoryEntitlementStore::new();
        let handler = handler(&store);
        let day_one = ts("2024-06-01T06:00:00Z");
        for _ in 0..5 {
            handler.handle_at(view(), day_one).await.unwrap();
        }

        // 18:30 UTC is midnight in IST.
        let next_day = ts("2024-06-01T18:30:00Z");
        let result = handler.handle_at(view(), next_day).await.unwrap();

        assert_eq!(result.snapshot.usage.profiles_viewed_today, 1);
    }

    #[tokio::test]
    async fn fourth_interest_of_the_month_is_refused() {
        let store = InMemoryEntitlementStore::new();
        let handler = handler(&store);
        let now = ts("2024-06-10T06:00:00Z");
        let interest = || ConsumeQuotaCommand {
            user_id: user(),
            kind: QuotaKind::Interest,
        };

        for _ in 0..3 {
            handler.handle_at(interest(), now).await.unwrap();
        }

        let err = handler.handle_at(interest(), now).await.unwrap_err();
        assert!(matches!(err, EntitlementError::QuotaExceeded { limit: 3, .. }));
    }

    #[tokio::test]
    async fn silver_views_are_unlimited_but_counted() {
        let store = InMemoryEntitlementStore::new();
        let now = ts("2024-06-01T06:00:00Z");
        store
            .insert(EntitlementRecord {
                subscription: Subscription::free().apply_purchased_plan(Plan::Silver, "pay", now),
                ..EntitlementRecord::new(user())
            })
            .await;
        let handler = handler(&store);

        for _ in 0..10 {
            handler.handle_at(view(), now).await.unwrap();
        }
        let snapshot = handler.handle_at(view(), now).await.unwrap().snapshot;
        assert_eq!(snapshot.usage.profiles_viewed_today, 11);
        assert_eq!(snapshot.remaining_views(), None);
    }

    #[tokio::test]
    async fn free_users_cannot_boost() {
        let store = InMemoryEntitlementStore::new();
        let err = handler(&store)
            .handle_at(
                ConsumeQuotaCommand {
                    user_id: user(),
                    kind: QuotaKind::Boost,
                },
                ts("2024-06-01T06:00:00Z"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EntitlementError::QuotaExceeded { kind: QuotaKind::Boost, .. }));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_views_never_exceed_the_daily_limit() {
        let store = InMemoryEntitlementStore::new();
        let handler = Arc::new(handler(&store));
        let now = ts("2024-06-01T06:00:00Z");

        let tasks: Vec<_> = (0..10)
            .map(|_| {
                let handler = handler.clone();
                tokio::spawn(async move { handler.handle_at(view(), now).await })
            })
            .collect();
        let mut granted = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => granted += 1,
                Err(err) => assert!(matches!(err, EntitlementError::QuotaExceeded { .. })),
            }
        }

        assert_eq!(granted, 5);
        let stored = store.read(&user()).await.unwrap();
        assert_eq!(stored.usage.profiles_viewed_today, granted);
    }

    #[tokio::test]
    async fn view_counted_by_another_session_is_not_lost() {
        let store = InMemoryEntitlementStore::new();
        let handler = handler(&store);
        let now = ts("2024-06-01T06:00:00Z");
        handler.handle_at(view(), now).await.unwrap();

        // Another session counts a view after this one has read the record.
        let other = EntitlementService::new(Arc::new(store.clone()), EntitlementEngine::default());
        let seen = other.snapshot_at(&user(), now).await.unwrap();
        let counted = other.engine().consume_quota(&seen, QuotaKind::View, now).unwrap();
        store.overtake_next_write(EntitlementPatch::usage(counted));

        let result = handler.handle_at(view(), now).await.unwrap();

        assert_eq!(result.snapshot.usage.profiles_viewed_today, 3);
        assert_eq!(store.read(&user()).await.unwrap().usage.profiles_viewed_today, 3);
    }
}
