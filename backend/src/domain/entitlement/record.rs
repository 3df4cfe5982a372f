//! Persisted per-user entitlement record and its merge patches.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::{EntitlementEngine, Purchase, Subscription, UnlockedFeatures, Usage, UsagePatch};
use crate::domain::foundation::{Timestamp, UserId};

/// Everything the store keeps for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementRecord {
    pub user_id: UserId,
    #[serde(default)]
    pub subscription: Subscription,
    #[serde(default)]
    pub unlocked: UnlockedFeatures,
    #[serde(default)]
    pub usage: Usage,
    /// Payment references already applied. Replays are ignored.
    #[serde(default)]
    pub applied_payments: BTreeSet<String>,
    /// Orders created at checkout and not yet settled, keyed by order id.
    #[serde(default)]
    pub pending_orders: BTreeMap<String, Purchase>,
    /// Bumped on every write.
    #[serde(default)]
    pub revision: u64,
}

impl EntitlementRecord {
    /// Record for a user the store has never seen.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            subscription: Subscription::free(),
            unlocked: UnlockedFeatures::default(),
            usage: Usage::default(),
            applied_payments: BTreeSet::new(),
            pending_orders: BTreeMap::new(),
            revision: 0,
        }
    }

    pub fn has_applied(&self, payment_reference: &str) -> bool {
        self.applied_payments.contains(payment_reference)
    }

    /// Applies a patch with merge semantics.
    ///
    /// Only the parts the patch names change. Unlocks are unioned, so a
    /// patch can never revoke one.
    pub fn merged(&self, patch: &EntitlementPatch) -> Self {
        let mut next = self.clone();
        if let Some(subscription) = &patch.subscription {
            next.subscription = subscription.clone();
        }
        if let Some(unlocked) = &patch.unlocked {
            next.unlocked = next.unlocked.union(unlocked);
        }
        if let Some(usage) = &patch.usage {
            next.usage = next.usage.merged(usage);
        }
        if let Some(reference) = &patch.applied_payment {
            next.applied_payments.insert(reference.clone());
        }
        if let Some((order_id, purchase)) = &patch.pending_order {
            next.pending_orders.insert(order_id.clone(), *purchase);
        }
        if let Some(order_id) = &patch.settled_order {
            next.pending_orders.remove(order_id);
        }
        next.revision = self.revision.saturating_add(1);
        next
    }

    /// Builds the single patch that applies a verified purchase.
    ///
    /// Returns `None` when `payment_reference` was already applied. The
    /// patch settles the order and records the reference together with the
    /// grant so that it lands all at once or not at all.
    pub fn purchase_patch(
        &self,
        engine: &EntitlementEngine,
        purchase: Purchase,
        order_id: &str,
        payment_reference: &str,
        now: Timestamp,
    ) -> Option<EntitlementPatch> {
        if self.has_applied(payment_reference) {
            return None;
        }

        let base = EntitlementPatch {
            applied_payment: Some(payment_reference.to_string()),
            settled_order: Some(order_id.to_string()),
            ..EntitlementPatch::default()
        };

        Some(match purchase {
            Purchase::Plan(plan) => EntitlementPatch {
                subscription: Some(engine.apply_purchased_plan(
                    &self.subscription,
                    plan,
                    payment_reference,
                    now,
                )),
                ..base
            },
            Purchase::Unlock(kind) => EntitlementPatch {
                unlocked: Some(engine.grant_one_off_unlock(&self.unlocked, kind)),
                ..base
            },
        })
    }

    /// True if every change in `patch` is reflected in this record.
    pub fn reflects(&self, patch: &EntitlementPatch) -> bool {
        let subscription_ok = patch
            .subscription
            .as_ref()
            .map(|s| &self.subscription == s)
            .unwrap_or(true);
        let unlocked_ok = patch
            .unlocked
            .as_ref()
            .map(|u| self.unlocked.contains(u))
            .unwrap_or(true);
        let payment_ok = patch
            .applied_payment
            .as_ref()
            .map(|r| self.has_applied(r))
            .unwrap_or(true);
        subscription_ok && unlocked_ok && payment_ok
    }
}

/// Partial update to an [`EntitlementRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntitlementPatch {
    pub subscription: Option<Subscription>,
    pub unlocked: Option<UnlockedFeatures>,
    pub usage: Option<UsagePatch>,
    pub applied_payment: Option<String>,
    pub pending_order: Option<(String, Purchase)>,
    pub settled_order: Option<String>,
}

impl EntitlementPatch {
    pub fn subscription(subscription: Subscription) -> Self {
        Self {
            subscription: Some(subscription),
            ..Self::default()
        }
    }

    pub fn usage(usage: UsagePatch) -> Self {
        Self {
            usage: Some(usage),
            ..Self::default()
        }
    }

    pub fn pending_order(order_id: impl Into<String>, purchase: Purchase) -> Self {
        Self {
            pending_order: Some((order_id.into(), purchase)),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entitlement::{Plan, UnlockKind};

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    fn now() -> Timestamp {
        Timestamp::parse_rfc3339("2024-06-01T10:00:00Z").unwrap()
    }

    #[test]
    fn new_record_is_free_tier() {
        let record = EntitlementRecord::new(user());
        assert_eq!(record.subscription, Subscription::free());
        assert_eq!(record.revision, 0);
    }

    #[test]
    fn merge_bumps_revision_and_keeps_untouched_parts() {
        let record = EntitlementRecord {
            unlocked: UnlockedFeatures::for_kind(UnlockKind::AdFree),
            ..EntitlementRecord::new(user())
        };
        let patch = EntitlementPatch::subscription(
            Subscription::free().apply_purchased_plan(Plan::Silver, "pay", now()),
        );
        let merged = record.merged(&patch);
        assert_eq!(merged.revision, 1);
        assert_eq!(merged.subscription.plan, Plan::Silver);
        assert!(merged.unlocked.ad_free);
    }

    #[test]
    fn unlock_patch_cannot_revoke() {
        let record = EntitlementRecord {
            unlocked: UnlockedFeatures::for_kind(UnlockKind::UnlockTraditional),
            ..EntitlementRecord::new(user())
        };
        let patch = EntitlementPatch {
            unlocked: Some(UnlockedFeatures::default()),
            ..EntitlementPatch::default()
        };
        assert!(record.merged(&patch).unlocked.traditional_template_unlocked);
    }

    #[test]
    fn purchase_patch_settles_order_and_records_reference() {
        let record = EntitlementRecord::new(user())
            .merged(&EntitlementPatch::pending_order("order_1", Purchase::Plan(Plan::Gold)));
        let engine = EntitlementEngine::default();
        let patch = record
            .purchase_patch(&engine, Purchase::Plan(Plan::Gold), "order_1", "pay_1", now())
            .unwrap();
        let applied = record.merged(&patch);
        assert!(applied.pending_orders.is_empty());
        assert!(applied.has_applied("pay_1"));
        assert_eq!(applied.subscription.plan, Plan::Gold);
        assert!(applied.reflects(&patch));
    }

    #[test]
    fn replayed_payment_produces_no_patch() {
        let engine = EntitlementEngine::default();
        let record = EntitlementRecord::new(user());
        let patch = record
            .purchase_patch(&engine, Purchase::Unlock(UnlockKind::AdFree), "o", "pay_1", now())
            .unwrap();
        let applied = record.merged(&patch);
        assert!(applied
            .purchase_patch(&engine, Purchase::Unlock(UnlockKind::AdFree), "o", "pay_1", now())
            .is_none());
    }

    #[test]
    fn reflects_detects_missing_subscription() {
        let record = EntitlementRecord::new(user());
        let patch = EntitlementPatch::subscription(
            Subscription::free().apply_purchased_plan(Plan::Platinum, "pay", now()),
        );
        assert!(!record.reflects(&patch));
    }

    #[test]
    fn record_roundtrips_through_json() {
        let order = EntitlementPatch::pending_order("order_9", Purchase::Unlock(UnlockKind::AdFree));
        let record = EntitlementRecord::new(user()).merged(&order);
        let json = serde_json::to_string(&record).unwrap();
        let back: EntitlementRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
