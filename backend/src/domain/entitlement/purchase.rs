//! Things a user can pay for.

use serde::{Deserialize, Serialize};

use super::{EntitlementError, Plan, UnlockKind};

/// Currency every price in the catalog is quoted in.
pub const CURRENCY: &str = "INR";

/// A purchasable item: a subscription plan or a one-off unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Purchase {
    Plan(Plan),
    Unlock(UnlockKind),
}

impl Purchase {
    /// Parses the `/checkout?plan=X` / `/checkout?action=Y` query.
    ///
    /// Exactly one of the two must be present, and the free plan cannot be
    /// bought.
    pub fn from_checkout_query(
        plan: Option<&str>,
        action: Option<&str>,
    ) -> Result<Self, EntitlementError> {
        match (plan, action) {
            (Some(plan), None) => {
                let plan: Plan = plan.parse()?;
                if !plan.is_paid() {
                    return Err(EntitlementError::InvalidCheckout(
                        "the free plan cannot be purchased".to_string(),
                    ));
                }
                Ok(Purchase::Plan(plan))
            }
            (None, Some(action)) => Ok(Purchase::Unlock(action.parse()?)),
            (Some(_), Some(_)) => Err(EntitlementError::InvalidCheckout(
                "specify either a plan or an action, not both".to_string(),
            )),
            (None, None) => Err(EntitlementError::InvalidCheckout(
                "a plan or an action is required".to_string(),
            )),
        }
    }

    /// Price in paise.
    pub fn price_minor_units(&self) -> u64 {
        match self {
            Purchase::Plan(plan) => plan.price_minor_units(),
            Purchase::Unlock(kind) => kind.price_minor_units(),
        }
    }

    /// Short label for receipts and logs.
    pub fn description(&self) -> String {
        match self {
            Purchase::Plan(plan) => format!("{} plan", plan.display_name()),
            Purchase::Unlock(kind) => kind.display_name().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plan_query() {
        let purchase = Purchase::from_checkout_query(Some("gold"), None).unwrap();
        assert_eq!(purchase, Purchase::Plan(Plan::Gold));
        assert_eq!(purchase.price_minor_units(), 249_900);
    }

    #[test]
    fn parses_action_query() {
        let purchase = Purchase::from_checkout_query(None, Some("unlock_traditional")).unwrap();
        assert_eq!(purchase, Purchase::Unlock(UnlockKind::UnlockTraditional));
        assert_eq!(purchase.price_minor_units(), 1_000);
    }

    #[test]
    fn rejects_unknown_plan() {
        assert!(matches!(
            Purchase::from_checkout_query(Some("bronze"), None),
            Err(EntitlementError::UnknownPlan(_))
        ));
    }

    #[test]
    fn rejects_free_plan_and_ambiguous_queries() {
        assert!(Purchase::from_checkout_query(Some("free"), None).is_err());
        assert!(Purchase::from_checkout_query(Some("gold"), Some("ad_free")).is_err());
        assert!(Purchase::from_checkout_query(None, None).is_err());
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(Purchase::Unlock(UnlockKind::AdFree)).unwrap();
        assert_eq!(json["type"], "unlock");
        assert_eq!(json["id"], "ad_free");
    }
}
