//! Entitlement engine: pure functions from stored state and a clock to
//! decisions and patches.
//!
//! Nothing here performs I/O. When an evaluation discovers that a stored
//! subscription has expired, it returns a [`DowngradeRequest`] and the caller
//! decides how to persist it.

use chrono::Duration;

use super::{
    EffectiveUsage, EntitlementError, EntitlementSnapshot, FeatureSet, Plan, QuotaKind,
    QuotaLimits, QuotaPolicy, Subscription, UnlockKind, UnlockedFeatures, Usage, UsagePatch,
};
use crate::domain::foundation::Timestamp;

/// How long after purchase a platinum user keeps a relationship manager.
pub const RELATIONSHIP_MANAGER_DAYS: i64 = 90;

/// Request to persist an expiry the engine observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DowngradeRequest {
    /// Stored subscription with `is_active` cleared.
    pub subscription: Subscription,
}

/// Result of [`EntitlementEngine::effective_entitlement`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub snapshot: EntitlementSnapshot,
    pub downgrade: Option<DowngradeRequest>,
}

/// Computes effective entitlements and quota decisions.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntitlementEngine {
    policy: QuotaPolicy,
}

impl EntitlementEngine {
    pub fn new(policy: QuotaPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &QuotaPolicy {
        &self.policy
    }

    /// Evaluates the stored state at `now`.
    ///
    /// The stored `is_active` flag is never trusted on its own: expiry is
    /// re-checked on every call. A subscription that was active but has
    /// now expired yields free-tier features plus a downgrade request.
    pub fn effective_entitlement(
        &self,
        subscription: &Subscription,
        unlocked: &UnlockedFeatures,
        usage: &Usage,
        now: Timestamp,
    ) -> Evaluation {
        let is_active = subscription.is_active_at(now);
        let effective_plan = if is_active { subscription.plan } else { Plan::Free };

        let downgrade = if subscription.is_active && !is_active {
            Some(DowngradeRequest {
                subscription: subscription.deactivated(),
            })
        } else {
            None
        };

        let relationship_manager_active = is_active
            && subscription.plan == Plan::Platinum
            && subscription
                .start_date
                .map(|start| now.duration_since(&start) < Duration::days(RELATIONSHIP_MANAGER_DAYS))
                .unwrap_or(false);

        let snapshot = EntitlementSnapshot {
            plan: subscription.plan,
            effective_plan,
            is_active,
            expiry_date: subscription.expiry_date,
            features: FeatureSet::for_plan(effective_plan),
            unlocked: *unlocked,
            usage: EffectiveUsage {
                profiles_viewed_today: usage.views_in_window(now, &self.policy),
                interests_sent_this_month: usage.interests_in_window(now, &self.policy),
                boosts_used_this_month: usage.boosts_in_window(now, &self.policy),
                last_boost_used_at: usage.last_boost_used_at,
            },
            limits: QuotaLimits {
                daily_views: self.policy.daily_view_limit,
                monthly_interests: self.policy.monthly_interest_limit,
            },
            relationship_manager_active,
            evaluated_at: now,
        };

        Evaluation {
            snapshot,
            downgrade,
        }
    }

    /// Counts one use of `kind`, or refuses without producing any change.
    ///
    /// Unlimited plans still have views and interests counted so the
    /// numbers stay meaningful after a downgrade.
    pub fn consume_quota(
        &self,
        snapshot: &EntitlementSnapshot,
        kind: QuotaKind,
        now: Timestamp,
    ) -> Result<UsagePatch, EntitlementError> {
        match kind {
            QuotaKind::View => {
                if !snapshot.can_view_profile() {
                    return Err(EntitlementError::quota_exceeded(kind, snapshot.limits.daily_views));
                }
                Ok(UsagePatch {
                    profile_views: Some((
                        snapshot.usage.profiles_viewed_today.saturating_add(1),
                        now,
                    )),
                    ..UsagePatch::default()
                })
            }
            QuotaKind::Interest => {
                if !snapshot.can_send_interest() {
                    return Err(EntitlementError::quota_exceeded(
                        kind,
                        snapshot.limits.monthly_interests,
                    ));
                }
                Ok(UsagePatch {
                    interests: Some((
                        snapshot.usage.interests_sent_this_month.saturating_add(1),
                        now,
                    )),
                    ..UsagePatch::default()
                })
            }
            QuotaKind::Boost => {
                if !snapshot.can_boost() {
                    return Err(EntitlementError::quota_exceeded(
                        kind,
                        snapshot.features.boosts_remaining,
                    ));
                }
                Ok(UsagePatch {
                    last_boost_used_at: Some(now),
                    ..UsagePatch::default()
                })
            }
        }
    }

    /// See [`Subscription::apply_purchased_plan`].
    pub fn apply_purchased_plan(
        &self,
        current: &Subscription,
        plan: Plan,
        payment_reference: &str,
        now: Timestamp,
    ) -> Subscription {
        current.apply_purchased_plan(plan, payment_reference, now)
    }

    /// Adds a one-off unlock. Existing grants are never removed.
    pub fn grant_one_off_unlock(
        &self,
        current: &UnlockedFeatures,
        kind: UnlockKind,
    ) -> UnlockedFeatures {
        current.union(&UnlockedFeatures::for_kind(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::biodata::Layout;
    use proptest::prelude::*;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse_rfc3339(s).unwrap()
    }

    fn engine() -> EntitlementEngine {
        EntitlementEngine::new(QuotaPolicy::default())
    }

    fn free_snapshot_with(usage: &Usage, now: Timestamp) -> EntitlementSnapshot {
        engine()
            .effective_entitlement(&Subscription::free(), &UnlockedFeatures::default(), usage, now)
            .snapshot
    }

    fn viewed(count: u32, at: Timestamp) -> Usage {
        Usage {
            profiles_viewed_today: count,
            last_profile_view_at: Some(at),
            ..Usage::default()
        }
    }

    // Expiry

    #[test]
    fn expired_subscription_reports_inactive_regardless_of_stored_flag() {
        let bought = ts("2023-01-01T00:00:00Z");
        let sub = Subscription::free().apply_purchased_plan(Plan::Silver, "pay", bought);
        assert!(sub.is_active);

        let eval = engine().effective_entitlement(
            &sub,
            &UnlockedFeatures::default(),
            &Usage::default(),
            ts("2024-06-01T00:00:00Z"),
        );
        assert!(!eval.snapshot.is_active);
        assert_eq!(eval.snapshot.effective_plan, Plan::Free);
        assert_eq!(eval.snapshot.features, FeatureSet::free());
    }

    #[test]
    fn first_expired_read_requests_downgrade() {
        let sub =
            Subscription::free().apply_purchased_plan(Plan::Gold, "pay", ts("2023-01-01T00:00:00Z"));
        let eval = engine().effective_entitlement(
            &sub,
            &UnlockedFeatures::default(),
            &Usage::default(),
            ts("2024-06-01T00:00:00Z"),
        );
        let downgrade = eval.downgrade.expect("downgrade requested");
        assert!(!downgrade.subscription.is_active);
        assert_eq!(downgrade.subscription.plan, Plan::Gold);
    }

    #[test]
    fn already_downgraded_subscription_requests_nothing() {
        let sub = Subscription::free()
            .apply_purchased_plan(Plan::Gold, "pay", ts("2023-01-01T00:00:00Z"))
            .deactivated();
        let eval = engine().effective_entitlement(
            &sub,
            &UnlockedFeatures::default(),
            &Usage::default(),
            ts("2024-06-01T00:00:00Z"),
        );
        assert!(eval.downgrade.is_none());
    }

    #[test]
    fn gold_bought_now_is_free_tier_after_366_days() {
        let now = ts("2024-03-01T12:00:00Z");
        let sub = engine().apply_purchased_plan(&Subscription::free(), Plan::Gold, "pay_gold", now);

        let today = engine().effective_entitlement(
            &sub,
            &UnlockedFeatures::default(),
            &Usage::default(),
            now,
        );
        assert!(today.snapshot.is_active);
        assert!(today.snapshot.features.video_profile);

        let later = engine().effective_entitlement(
            &sub,
            &UnlockedFeatures::default(),
            &Usage::default(),
            now.add_days(366),
        );
        assert!(!later.snapshot.is_active);
        assert_eq!(later.snapshot.features, FeatureSet::free());
    }

    #[test]
    fn expiry_keeps_one_off_unlocks() {
        let sub =
            Subscription::free().apply_purchased_plan(Plan::Silver, "pay", ts("2022-01-01T00:00:00Z"));
        let unlocked = UnlockedFeatures::for_kind(UnlockKind::UnlockTraditional);
        let snapshot = engine()
            .effective_entitlement(&sub, &unlocked, &Usage::default(), ts("2024-01-01T00:00:00Z"))
            .snapshot;
        assert!(!snapshot.features.all_templates);
        assert!(snapshot.can_download(Layout::Traditional));
        assert!(snapshot.template_unlocked(Layout::Traditional));
    }

    #[test]
    fn relationship_manager_only_in_first_90_days() {
        let start = ts("2024-01-01T00:00:00Z");
        let sub = Subscription::free().apply_purchased_plan(Plan::Platinum, "pay", start);
        let eval = |now| {
            engine()
                .effective_entitlement(&sub, &UnlockedFeatures::default(), &Usage::default(), now)
                .snapshot
        };
        assert!(eval(start.add_days(89)).relationship_manager_active);
        assert!(!eval(start.add_days(90)).relationship_manager_active);
        assert!(eval(start.add_days(400)).features.relationship_manager);
    }

    // Quota

    #[test]
    fn free_user_with_five_views_today_cannot_view() {
        let now = ts("2024-05-01T06:00:00Z");
        let usage = viewed(5, now);
        let snapshot = free_snapshot_with(&usage, now);
        assert!(!snapshot.can_view_profile());

        let result = engine().consume_quota(&snapshot, QuotaKind::View, now);
        assert_eq!(result, Err(EntitlementError::quota_exceeded(QuotaKind::View, 5)));
    }

    #[test]
    fn consume_view_increments_counter() {
        let now = ts("2024-05-01T06:00:00Z");
        let snapshot = free_snapshot_with(&viewed(2, now), now);
        let patch = engine().consume_quota(&snapshot, QuotaKind::View, now).unwrap();
        assert_eq!(patch.profile_views, Some((3, now)));
        assert!(patch.interests.is_none());
    }

    #[test]
    fn yesterdays_views_do_not_count() {
        let now = ts("2024-05-02T06:00:00Z");
        let snapshot = free_snapshot_with(&viewed(5, ts("2024-05-01T06:00:00Z")), now);
        assert!(snapshot.can_view_profile());
        let patch = engine().consume_quota(&snapshot, QuotaKind::View, now).unwrap();
        assert_eq!(patch.profile_views, Some((1, now)));
    }

    #[test]
    fn fourth_interest_in_a_month_is_refused() {
        let now = ts("2024-05-20T06:00:00Z");
        let usage = Usage {
            interests_sent_this_month: 3,
            last_interest_sent_at: Some(ts("2024-05-03T06:00:00Z")),
            ..Usage::default()
        };
        let snapshot = free_snapshot_with(&usage, now);
        assert!(!snapshot.can_send_interest());
        assert!(engine().consume_quota(&snapshot, QuotaKind::Interest, now).is_err());
    }

    #[test]
    fn unlimited_plan_ignores_view_counter() {
        let now = ts("2024-05-01T06:00:00Z");
        let sub = Subscription::free().apply_purchased_plan(Plan::Silver, "pay", now);
        let snapshot = engine()
            .effective_entitlement(&sub, &UnlockedFeatures::default(), &viewed(50, now), now)
            .snapshot;
        assert!(snapshot.can_view_profile());
        assert_eq!(snapshot.remaining_views(), None);
    }

    #[test]
    fn platinum_gets_one_boost_per_month() {
        let now = ts("2024-05-10T06:00:00Z");
        let bought = ts("2024-01-01T00:00:00Z");
        let sub = Subscription::free().apply_purchased_plan(Plan::Platinum, "pay", bought);
        let fresh = engine()
            .effective_entitlement(&sub, &UnlockedFeatures::default(), &Usage::default(), now)
            .snapshot;
        let patch = engine().consume_quota(&fresh, QuotaKind::Boost, now).unwrap();
        assert_eq!(patch.last_boost_used_at, Some(now));

        let used = Usage::default().merged(&patch);
        let after = engine()
            .effective_entitlement(&sub, &UnlockedFeatures::default(), &used, now.add_days(1))
            .snapshot;
        assert!(!after.can_boost());

        let next_month = engine()
            .effective_entitlement(&sub, &UnlockedFeatures::default(), &used, now.add_days(30))
            .snapshot;
        assert!(next_month.can_boost());
    }

    #[test]
    fn free_user_cannot_boost() {
        let snapshot = free_snapshot_with(&Usage::default(), Timestamp::now());
        assert!(engine().consume_quota(&snapshot, QuotaKind::Boost, Timestamp::now()).is_err());
    }

    // Downloads and contact access

    #[test]
    fn traditional_unlock_flips_only_traditional_download() {
        let now = Timestamp::now();
        let before = free_snapshot_with(&Usage::default(), now);
        assert!(!before.can_download(Layout::Traditional));
        assert!(!before.can_download(Layout::Modern));

        let unlocked = engine()
            .grant_one_off_unlock(&UnlockedFeatures::default(), UnlockKind::UnlockTraditional);
        let after = engine()
            .effective_entitlement(&Subscription::free(), &unlocked, &Usage::default(), now)
            .snapshot;
        assert!(after.can_download(Layout::Traditional));
        assert!(!after.can_download(Layout::Modern));
    }

    #[test]
    fn all_templates_allows_every_download() {
        let now = Timestamp::now();
        let sub = Subscription::free().apply_purchased_plan(Plan::Silver, "pay", now);
        let snapshot = engine()
            .effective_entitlement(&sub, &UnlockedFeatures::default(), &Usage::default(), now)
            .snapshot;
        assert!(snapshot.can_download(Layout::Modern));
        assert!(snapshot.can_download(Layout::Traditional));
        assert!(snapshot.can_access_contact_details());
    }

    #[test]
    fn free_user_cannot_see_contacts() {
        let snapshot = free_snapshot_with(&Usage::default(), Timestamp::now());
        assert!(!snapshot.can_access_contact_details());
    }

    #[test]
    fn granting_twice_is_harmless() {
        let once = engine().grant_one_off_unlock(&UnlockedFeatures::default(), UnlockKind::AdFree);
        let twice = engine().grant_one_off_unlock(&once, UnlockKind::AdFree);
        assert_eq!(once, twice);
    }

    proptest! {
        #[test]
        fn can_view_profile_matches_limit(count in 0u32..20) {
            let now = ts("2024-05-01T06:00:00Z");
            let snapshot = free_snapshot_with(&viewed(count, now), now);
            prop_assert_eq!(snapshot.can_view_profile(), count < 5);
        }

        #[test]
        fn can_send_interest_matches_limit(count in 0u32..20) {
            let now = ts("2024-05-20T06:00:00Z");
            let usage = Usage {
                interests_sent_this_month: count,
                last_interest_sent_at: Some(now),
                ..Usage::default()
            };
            let snapshot = free_snapshot_with(&usage, now);
            prop_assert_eq!(snapshot.can_send_interest(), count < 3);
        }

        #[test]
        fn refused_quota_never_produces_a_patch(count in 5u32..50) {
            let now = ts("2024-05-01T06:00:00Z");
            let snapshot = free_snapshot_with(&viewed(count, now), now);
            prop_assert!(engine().consume_quota(&snapshot, QuotaKind::View, now).is_err());
        }
    }
}
