//! Feature flags granted by each plan.
//!
//! A `FeatureSet` is never edited by hand; it is always derived from a plan
//! through [`FeatureSet::for_plan`].

use serde::{Deserialize, Serialize};

use super::Plan;

/// Capability flags derived from a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSet {
    pub unlimited_views: bool,
    pub unlimited_interests: bool,
    pub contact_access: bool,
    pub priority_listing: bool,
    pub advanced_filters: bool,
    pub ad_free: bool,
    pub verified_badge: bool,
    pub all_templates: bool,
    pub video_profile: bool,
    pub whats_app_alerts: bool,
    pub astro_reports_remaining: u32,
    /// Profile boosts granted per calendar month.
    pub boosts_remaining: u32,
    pub relationship_manager: bool,
}

impl FeatureSet {
    /// Get the feature set for a plan.
    ///
    /// # Plan Configuration
    ///
    /// | Plan | Views/Interests | Contact | Templates | Video/WhatsApp | Astro | Boosts | RM |
    /// |------|-----------------|---------|-----------|----------------|-------|--------|----|
    /// | Free | Limited | No | No | No | 0 | 0 | No |
    /// | Silver | Unlimited | Yes | All | No | 0 | 0 | No |
    /// | Gold | Unlimited | Yes | All | Yes | 5 | 0 | No |
    /// | Platinum | Unlimited | Yes | All | Yes | 10 | 1 | Yes |
    pub fn for_plan(plan: Plan) -> Self {
        match plan {
            Plan::Free => Self::default(),
            Plan::Silver => Self {
                unlimited_views: true,
                unlimited_interests: true,
                contact_access: true,
                priority_listing: true,
                advanced_filters: true,
                ad_free: true,
                verified_badge: true,
                all_templates: true,
                ..Self::default()
            },
            Plan::Gold => Self {
                video_profile: true,
                whats_app_alerts: true,
                astro_reports_remaining: 5,
                ..Self::for_plan(Plan::Silver)
            },
            Plan::Platinum => Self {
                astro_reports_remaining: 10,
                boosts_remaining: 1,
                relationship_manager: true,
                ..Self::for_plan(Plan::Gold)
            },
        }
    }

    /// The free-tier feature set.
    pub fn free() -> Self {
        Self::for_plan(Plan::Free)
    }

    /// True if any premium capability is granted.
    pub fn has_premium_flag(&self) -> bool {
        self != &Self::free()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn any_plan() -> impl Strategy<Value = Plan> {
        prop::sample::select(Plan::ALL.to_vec())
    }

    #[test]
    fn free_plan_grants_no_premium_flag() {
        let features = FeatureSet::for_plan(Plan::Free);
        assert!(!features.has_premium_flag());
        assert!(!features.unlimited_views);
        assert!(!features.all_templates);
        assert_eq!(features.astro_reports_remaining, 0);
    }

    #[test]
    fn silver_unlocks_all_templates_and_contacts() {
        let features = FeatureSet::for_plan(Plan::Silver);
        assert!(features.all_templates);
        assert!(features.contact_access);
        assert!(features.verified_badge);
        assert!(!features.video_profile);
    }

    #[test]
    fn gold_adds_five_astro_reports() {
        let features = FeatureSet::for_plan(Plan::Gold);
        assert!(features.whats_app_alerts);
        assert!(features.video_profile);
        assert_eq!(features.astro_reports_remaining, 5);
        assert!(!features.relationship_manager);
    }

    #[test]
    fn platinum_adds_boost_and_relationship_manager() {
        let features = FeatureSet::for_plan(Plan::Platinum);
        assert_eq!(features.astro_reports_remaining, 10);
        assert_eq!(features.boosts_remaining, 1);
        assert!(features.relationship_manager);
        assert!(features.unlimited_views);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(FeatureSet::for_plan(Plan::Gold)).unwrap();
        assert_eq!(json["whatsAppAlerts"], true);
        assert_eq!(json["astroReportsRemaining"], 5);
    }

    proptest! {
        #[test]
        fn features_for_plan_is_deterministic(plan in any_plan()) {
            prop_assert_eq!(FeatureSet::for_plan(plan), FeatureSet::for_plan(plan));
        }

        #[test]
        fn only_paid_plans_grant_premium(plan in any_plan()) {
            prop_assert_eq!(FeatureSet::for_plan(plan).has_premium_flag(), plan.is_paid());
        }

        #[test]
        fn higher_rank_never_loses_a_flag(a in any_plan(), b in any_plan()) {
            let (low, high) = if a.rank() <= b.rank() { (a, b) } else { (b, a) };
            let low = FeatureSet::for_plan(low);
            let high = FeatureSet::for_plan(high);
            prop_assert!(!low.all_templates || high.all_templates);
            prop_assert!(!low.video_profile || high.video_profile);
            prop_assert!(low.astro_reports_remaining <= high.astro_reports_remaining);
        }
    }
}
