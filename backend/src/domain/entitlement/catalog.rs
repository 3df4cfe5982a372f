//! Price list shown on the plans page and used at checkout.

use serde::Serialize;

use super::{BillingPeriod, FeatureSet, Plan, UnlockKind, UnlockedFeatures};

/// One purchasable plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanEntry {
    pub plan: Plan,
    pub name: &'static str,
    pub price_inr: u32,
    pub billing_period: BillingPeriod,
    pub features: FeatureSet,
    /// Relative link that starts checkout, `None` for the free tier.
    pub checkout_href: Option<String>,
}

/// One purchasable one-off unlock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockEntry {
    pub kind: UnlockKind,
    pub name: &'static str,
    pub price_inr: u32,
    pub grants: UnlockedFeatures,
    pub checkout_href: String,
}

/// Static catalog of plans and unlocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanCatalog;

impl PlanCatalog {
    /// Price of `plan` in paise.
    pub fn price(plan: Plan) -> u64 {
        plan.price_minor_units()
    }

    pub fn plans() -> Vec<PlanEntry> {
        Plan::ALL
            .iter()
            .map(|plan| PlanEntry {
                plan: *plan,
                name: plan.display_name(),
                price_inr: plan.price_inr(),
                billing_period: plan.billing_period(),
                features: FeatureSet::for_plan(*plan),
                checkout_href: plan.is_paid().then(|| Self::plan_href(*plan)),
            })
            .collect()
    }

    pub fn unlocks() -> Vec<UnlockEntry> {
        UnlockKind::ALL
            .iter()
            .map(|kind| UnlockEntry {
                kind: *kind,
                name: kind.display_name(),
                price_inr: kind.price_inr(),
                grants: UnlockedFeatures::for_kind(*kind),
                checkout_href: Self::unlock_href(*kind),
            })
            .collect()
    }

    pub fn plan_href(plan: Plan) -> String {
        format!("/checkout?plan={}", plan.as_str())
    }

    pub fn unlock_href(kind: UnlockKind) -> String {
        format!("/checkout?action={}", kind.as_str())
    }
}
