//! Subscription plan definitions and the static price catalog.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::EntitlementError;

/// Subscription plan tier.
///
/// Determines the feature set granted while the subscription is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    /// No subscription. 5 profile views a day, 3 interests a month.
    Free,

    /// Yearly plan with unlimited views/interests and every template.
    Silver,

    /// Yearly plan adding video profile, WhatsApp alerts and astro reports.
    Gold,

    /// Lifetime plan adding monthly boosts and a relationship manager.
    Platinum,
}

/// How long a purchased plan stays active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingPeriod {
    /// Nothing is billed.
    None,
    /// Expires one calendar year after purchase.
    Yearly,
    /// Never expires.
    Lifetime,
}

impl Plan {
    /// Every plan, cheapest first.
    pub const ALL: [Plan; 4] = [Plan::Free, Plan::Silver, Plan::Gold, Plan::Platinum];

    /// Returns true if this plan is a paid plan.
    pub fn is_paid(&self) -> bool {
        !matches!(self, Plan::Free)
    }

    /// Returns the wire identifier for this plan.
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Silver => "silver",
            Plan::Gold => "gold",
            Plan::Platinum => "platinum",
        }
    }

    /// Returns the display name for this plan.
    pub fn display_name(&self) -> &'static str {
        match self {
            Plan::Free => "Free",
            Plan::Silver => "Silver",
            Plan::Gold => "Gold",
            Plan::Platinum => "Platinum",
        }
    }

    /// Returns the numeric rank of this plan for comparison.
    pub fn rank(&self) -> u8 {
        match self {
            Plan::Free => 0,
            Plan::Silver => 1,
            Plan::Gold => 2,
            Plan::Platinum => 3,
        }
    }

    /// Price in whole rupees.
    pub fn price_inr(&self) -> u32 {
        match self {
            Plan::Free => 0,
            Plan::Silver => 999,
            Plan::Gold => 2_499,
            Plan::Platinum => 4_999,
        }
    }

    /// Price in paise, the unit the payment gateway expects.
    pub fn price_minor_units(&self) -> u64 {
        u64::from(self.price_inr()) * 100
    }

    /// Billing period for this plan.
    pub fn billing_period(&self) -> BillingPeriod {
        match self {
            Plan::Free => BillingPeriod::None,
            Plan::Silver | Plan::Gold => BillingPeriod::Yearly,
            Plan::Platinum => BillingPeriod::Lifetime,
        }
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Plan {
    type Err = EntitlementError;

    /// Parses an external plan identifier. Unknown values are rejected
    /// rather than defaulted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(Plan::Free),
            "silver" => Ok(Plan::Silver),
            "gold" => Ok(Plan::Gold),
            "platinum" => Ok(Plan::Platinum),
            _ => Err(EntitlementError::UnknownPlan(s.to_string())),
        }
    }
}
