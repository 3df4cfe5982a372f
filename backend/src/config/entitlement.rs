//! Entitlement configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::entitlement::QuotaPolicy;

const MAX_OFFSET_MINUTES: i32 = 14 * 60;

/// Free-tier quotas and the zone whose midnight resets them
#[derive(Debug, Clone, Deserialize)]
pub struct EntitlementConfig {
    #[serde(default = "default_daily_view_limit")]
    pub daily_view_limit: u32,

    #[serde(default = "default_monthly_interest_limit")]
    pub monthly_interest_limit: u32,

    /// Minutes east of UTC. 330 is IST.
    #[serde(default = "default_day_boundary_offset")]
    pub day_boundary_offset_minutes: i32,
}

impl EntitlementConfig {
    pub fn quota_policy(&self) -> QuotaPolicy {
        QuotaPolicy::with_offset_minutes(
            self.daily_view_limit,
            self.monthly_interest_limit,
            self.day_boundary_offset_minutes,
        )
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.daily_view_limit == 0 || self.monthly_interest_limit == 0 {
            return Err(ValidationError::InvalidQuotaLimit);
        }
        if self.day_boundary_offset_minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(ValidationError::InvalidDayBoundary);
        }
        Ok(())
    }
}

impl Default for EntitlementConfig {
    fn default() -> Self {
        Self {
            daily_view_limit: default_daily_view_limit(),
            monthly_interest_limit: default_monthly_interest_limit(),
            day_boundary_offset_minutes: default_day_boundary_offset(),
        }
    }
}

fn default_daily_view_limit() -> u32 {
    5
}

fn default_monthly_interest_limit() -> u32 {
    3
}

fn default_day_boundary_offset() -> i32 {
    330
}
