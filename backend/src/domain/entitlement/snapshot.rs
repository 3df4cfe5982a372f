//! Read-only, time-evaluated view of what a user may do.

use serde::{Deserialize, Serialize};

use super::{FeatureSet, Plan, UnlockedFeatures};
use crate::domain::biodata::Layout;
use crate::domain::foundation::Timestamp;

/// Usage counters as seen at evaluation time, after lazy window resets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveUsage {
    pub profiles_viewed_today: u32,
    pub interests_sent_this_month: u32,
    pub boosts_used_this_month: u32,
    pub last_boost_used_at: Option<Timestamp>,
}

/// Quota limits that applied when the snapshot was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaLimits {
    pub daily_views: u32,
    pub monthly_interests: u32,
}

/// Merge of the active plan's features, one-off unlocks and usage.
///
/// Derived on demand; never cache one past the change that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementSnapshot {
    /// Plan on the stored subscription.
    pub plan: Plan,
    /// Plan whose features actually apply; `Free` once expired.
    pub effective_plan: Plan,
    pub is_active: bool,
    pub expiry_date: Option<Timestamp>,
    pub features: FeatureSet,
    pub unlocked: UnlockedFeatures,
    pub usage: EffectiveUsage,
    pub limits: QuotaLimits,
    pub relationship_manager_active: bool,
    pub evaluated_at: Timestamp,
}

impl EntitlementSnapshot {
    pub fn can_view_profile(&self) -> bool {
        self.features.unlimited_views || self.usage.profiles_viewed_today < self.limits.daily_views
    }

    pub fn can_send_interest(&self) -> bool {
        self.features.unlimited_interests
            || self.usage.interests_sent_this_month < self.limits.monthly_interests
    }

    pub fn can_access_contact_details(&self) -> bool {
        self.features.contact_access
    }

    pub fn can_boost(&self) -> bool {
        self.usage.boosts_used_this_month < self.features.boosts_remaining
    }

    /// Either every template is included, or the layout's own download was bought.
    pub fn can_download(&self, layout: Layout) -> bool {
        self.features.all_templates
            || match layout {
                Layout::Modern => self.unlocked.modern_download_unlocked,
                Layout::Traditional => self.unlocked.traditional_download_unlocked,
            }
    }

    /// Whether the layout may be previewed without the paywall overlay.
    pub fn template_unlocked(&self, layout: Layout) -> bool {
        match layout {
            Layout::Modern => true,
            Layout::Traditional => {
                self.features.all_templates || self.unlocked.traditional_template_unlocked
            }
        }
    }

    pub fn is_ad_free(&self) -> bool {
        self.features.ad_free || self.unlocked.ad_free
    }

    /// Views left today, or `None` when unlimited.
    pub fn remaining_views(&self) -> Option<u32> {
        if self.features.unlimited_views {
            None
        } else {
            Some(self.limits.daily_views.saturating_sub(self.usage.profiles_viewed_today))
        }
    }

    /// Interests left this month, or `None` when unlimited.
    pub fn remaining_interests(&self) -> Option<u32> {
        if self.features.unlimited_interests {
            None
        } else {
            Some(
                self.limits
                    .monthly_interests
                    .saturating_sub(self.usage.interests_sent_this_month),
            )
        }
    }
}
