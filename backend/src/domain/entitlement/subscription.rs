//! Subscription record and purchase application.

use serde::{Deserialize, Serialize};

use super::{BillingPeriod, Plan};
use crate::domain::foundation::Timestamp;

/// A user's current subscription.
///
/// `is_active` is the stored flag as of the last evaluation. It goes stale as
/// time passes, so readers must re-check expiry through the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub plan: Plan,
    pub start_date: Option<Timestamp>,
    /// `None` means the subscription never expires.
    pub expiry_date: Option<Timestamp>,
    pub is_active: bool,
    pub payment_reference: Option<String>,
}

impl Default for Subscription {
    fn default() -> Self {
        Self::free()
    }
}

impl Subscription {
    /// The subscription every user starts with.
    pub fn free() -> Self {
        Self {
            plan: Plan::Free,
            start_date: None,
            expiry_date: None,
            is_active: false,
            payment_reference: None,
        }
    }

    /// Applies a verified purchase of `plan`.
    ///
    /// Replaying the same `payment_reference` returns the current
    /// subscription unchanged, so a retried confirmation never re-grants or
    /// restarts the billing period.
    pub fn apply_purchased_plan(
        &self,
        plan: Plan,
        payment_reference: &str,
        now: Timestamp,
    ) -> Self {
        if self.payment_reference.as_deref() == Some(payment_reference) {
            return self.clone();
        }

        if !plan.is_paid() {
            return Self {
                payment_reference: Some(payment_reference.to_string()),
                ..Self::free()
            };
        }

        let expiry_date = match plan.billing_period() {
            BillingPeriod::Yearly => Some(now.add_years(1)),
            BillingPeriod::Lifetime | BillingPeriod::None => None,
        };

        Self {
            plan,
            start_date: Some(now),
            expiry_date,
            is_active: true,
            payment_reference: Some(payment_reference.to_string()),
        }
    }

    /// True when the subscription has an expiry at or before `now`.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expiry_date
            .map(|expiry| !expiry.is_after(&now))
            .unwrap_or(false)
    }

    /// Whether the subscription grants its plan at `now`, ignoring the stored flag.
    pub fn is_active_at(&self, now: Timestamp) -> bool {
        self.is_active && self.plan.is_paid() && !self.is_expired_at(now)
    }

    /// Same subscription marked inactive.
    pub fn deactivated(&self) -> Self {
        Self {
            is_active: false,
            ..self.clone()
        }
    }
}
