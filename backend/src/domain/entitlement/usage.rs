//! Usage counters and quota windows.
//!
//! Counters are never reset by a scheduled job. Each counter stores the
//! instant it was last bumped, and a read that lands in a later local day
//! (views) or month (interests, boosts) sees zero.

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Kind of rate-limited action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotaKind {
    View,
    Interest,
    Boost,
}

impl std::str::FromStr for QuotaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view" => Ok(QuotaKind::View),
            "interest" => Ok(QuotaKind::Interest),
            "boost" => Ok(QuotaKind::Boost),
            other => Err(format!("unknown quota kind: {}", other)),
        }
    }
}

impl std::fmt::Display for QuotaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            QuotaKind::View => "view",
            QuotaKind::Interest => "interest",
            QuotaKind::Boost => "boost",
        };
        write!(f, "{}", s)
    }
}

/// Limits and calendar used for quota windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaPolicy {
    pub daily_view_limit: u32,
    pub monthly_interest_limit: u32,
    /// Zone whose midnight starts a new day / month.
    pub day_boundary: FixedOffset,
}

impl QuotaPolicy {
    fn utc() -> FixedOffset {
        Utc.fix()
    }

    /// Builds a policy from an offset in minutes east of UTC.
    ///
    /// Invalid offsets fall back to UTC.
    pub fn with_offset_minutes(
        daily_view_limit: u32,
        monthly_interest_limit: u32,
        minutes: i32,
    ) -> Self {
        let day_boundary = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(Self::utc);
        Self {
            daily_view_limit,
            monthly_interest_limit,
            day_boundary,
        }
    }
}

impl Default for QuotaPolicy {
    fn default() -> Self {
        Self::with_offset_minutes(5, 3, 330)
    }
}

/// Stored usage counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Usage {
    pub profiles_viewed_today: u32,
    pub last_profile_view_at: Option<Timestamp>,
    pub interests_sent_this_month: u32,
    pub last_interest_sent_at: Option<Timestamp>,
    pub last_boost_used_at: Option<Timestamp>,
}

impl Usage {
    /// Views counted in the local day containing `now`.
    pub fn views_in_window(&self, now: Timestamp, policy: &QuotaPolicy) -> u32 {
        match self.last_profile_view_at {
            Some(at) if at.same_local_day(&now, &policy.day_boundary) => self.profiles_viewed_today,
            _ => 0,
        }
    }

    /// Interests counted in the local month containing `now`.
    pub fn interests_in_window(&self, now: Timestamp, policy: &QuotaPolicy) -> u32 {
        match self.last_interest_sent_at {
            Some(at) if at.same_local_month(&now, &policy.day_boundary) => {
                self.interests_sent_this_month
            }
            _ => 0,
        }
    }

    /// Boosts used in the local month containing `now`.
    pub fn boosts_in_window(&self, now: Timestamp, policy: &QuotaPolicy) -> u32 {
        match self.last_boost_used_at {
            Some(at) if at.same_local_month(&now, &policy.day_boundary) => 1,
            _ => 0,
        }
    }

    /// Applies a patch, touching only the counters it names.
    pub fn merged(&self, patch: &UsagePatch) -> Self {
        let mut next = self.clone();
        if let Some((count, at)) = patch.profile_views {
            next.profiles_viewed_today = count;
            next.last_profile_view_at = Some(at);
        }
        if let Some((count, at)) = patch.interests {
            next.interests_sent_this_month = count;
            next.last_interest_sent_at = Some(at);
        }
        if let Some(at) = patch.last_boost_used_at {
            next.last_boost_used_at = Some(at);
        }
        next
    }
}

/// Partial usage update.
///
/// Each entry carries the new counter value and the instant it was counted,
/// which also moves the counter into the current window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UsagePatch {
    pub profile_views: Option<(u32, Timestamp)>,
    pub interests: Option<(u32, Timestamp)>,
    pub last_boost_used_at: Option<Timestamp>,
}

impl UsagePatch {
    pub fn is_empty(&self) -> bool {
        self.profile_views.is_none()
            && self.interests.is_none()
            && self.last_boost_used_at.is_none()
    }
}
