//! Integration tests for quota counting under concurrent use.
//!
//! Several tabs of the same user hit the view quota at once. Every tab
//! shares one file-backed store, and the free tier allows five views a day.

use std::sync::Arc;

use tempfile::TempDir;

use shaadicraft::adapters::storage::FileEntitlementStore;
use shaadicraft::application::handlers::{ConsumeQuotaCommand, ConsumeQuotaHandler};
use shaadicraft::application::EntitlementService;
use shaadicraft::domain::entitlement::{EntitlementEngine, EntitlementError, QuotaKind};
use shaadicraft::domain::foundation::{Timestamp, UserId};
use shaadicraft::ports::EntitlementStore;

fn user() -> UserId {
    UserId::new("user-arjun").unwrap()
}

fn view() -> ConsumeQuotaCommand {
    ConsumeQuotaCommand {
        user_id: user(),
        kind: QuotaKind::View,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn simultaneous_views_are_counted_exactly() {
    let dir = TempDir::new().unwrap();
    let store = FileEntitlementStore::new(dir.path());
    let now = Timestamp::parse_rfc3339("2024-06-01T06:00:00Z").unwrap();

    // Each tab runs its own service over the shared store.
    let tasks: Vec<_> = (0..10)
        .map(|_| {
            let handler = ConsumeQuotaHandler::new(Arc::new(EntitlementService::new(
                Arc::new(store.clone()),
                EntitlementEngine::default(),
            )));
            tokio::spawn(async move { handler.handle_at(view(), now).await })
        })
        .collect();

    let mut granted = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(result) => {
                assert!(result.snapshot.usage.profiles_viewed_today <= 5);
                granted += 1;
            }
            Err(err) => assert!(
                matches!(err, EntitlementError::QuotaExceeded { kind: QuotaKind::View, limit: 5 }),
                "unexpected error: {err:?}"
            ),
        }
    }

    assert_eq!(granted, 5);
    let stored = store.read(&user()).await.unwrap();
    assert_eq!(stored.usage.profiles_viewed_today, granted);
}
