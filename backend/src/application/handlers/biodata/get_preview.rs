//! GetPreviewHandler - Query handler for the live preview.

use std::sync::Arc;

use crate::application::{DraftService, EntitlementService};
use crate::domain::biodata::{PreviewComposer, PreviewViewModel};
use crate::domain::entitlement::{EntitlementError, Subscription, UnlockedFeatures, Usage};
use crate::domain::foundation::{DraftSessionId, Timestamp, UserId};

#[derive(Debug, Clone)]
pub struct GetPreviewQuery {
    /// Signed-out visitors are treated as free users.
    pub user_id: Option<UserId>,
    pub session_id: DraftSessionId,
}

#[derive(Debug, Clone)]
pub struct GetPreviewResult {
    pub revision: u64,
    pub view: PreviewViewModel,
}

pub struct GetPreviewHandler {
    entitlements: Arc<EntitlementService>,
    drafts: Arc<DraftService>,
    composer: PreviewComposer,
}

impl GetPreviewHandler {
    pub fn new(
        entitlements: Arc<EntitlementService>,
        drafts: Arc<DraftService>,
        composer: PreviewComposer,
    ) -> Self {
        Self {
            entitlements,
            drafts,
            composer,
        }
    }

    pub async fn handle(
        &self,
        query: GetPreviewQuery,
    ) -> Result<GetPreviewResult, EntitlementError> {
        let now = Timestamp::now();
        // Preview follows the optimistic view so a just-paid unlock shows at once.
        let snapshot = match &query.user_id {
            Some(user_id) => self.entitlements.visible_snapshot(user_id, now).await?,
            None => {
                self.entitlements
                    .engine()
                    .effective_entitlement(
                        &Subscription::free(),
                        &UnlockedFeatures::default(),
                        &Usage::default(),
                        now,
                    )
                    .snapshot
            }
        };

        let current = self.drafts.current(&query.session_id).await;
        Ok(GetPreviewResult {
            revision: current.revision,
            view: self.composer.compose(&current.draft, &snapshot),
        })
    }
}
