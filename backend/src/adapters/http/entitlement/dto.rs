//! HTTP DTOs for plan, entitlement and checkout endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::{CompletePurchaseResult, StartCheckoutResult};
use crate::domain::entitlement::{
    EntitlementSnapshot, PlanCatalog, PlanEntry, Purchase, UnlockEntry,
};
use crate::ports::{PaymentConfirmation, PaymentOrder};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Same shape as the `/checkout?plan=X` / `/checkout?action=Y` link.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
}

/// What the checkout widget hands back after payment.
///
/// Accepts both our field names and the gateway's `razorpay_*` names.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteCheckoutRequest {
    #[serde(alias = "razorpay_order_id")]
    pub order_id: String,
    #[serde(alias = "razorpay_payment_id")]
    pub payment_id: String,
    #[serde(alias = "razorpay_signature")]
    pub signature: String,
}

impl From<CompleteCheckoutRequest> for PaymentConfirmation {
    fn from(req: CompleteCheckoutRequest) -> Self {
        Self {
            order_id: req.order_id,
            payment_id: req.payment_id,
            signature: req.signature,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlansResponse {
    pub plans: Vec<PlanEntry>,
    pub unlocks: Vec<UnlockEntry>,
}

impl PlansResponse {
    pub fn catalog() -> Self {
        Self {
            plans: PlanCatalog::plans(),
            unlocks: PlanCatalog::unlocks(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementResponse {
    #[serde(flatten)]
    pub snapshot: EntitlementSnapshot,
    /// A payment is being applied; the snapshot already shows it.
    pub pending: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub purchase: Purchase,
    pub description: String,
    pub order: PaymentOrder,
}

impl From<StartCheckoutResult> for CheckoutResponse {
    fn from(result: StartCheckoutResult) -> Self {
        Self {
            purchase: result.purchase,
            description: result.description,
            order: result.order,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteCheckoutResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase: Option<Purchase>,
    pub already_applied: bool,
    pub entitlement: EntitlementSnapshot,
}

impl From<CompletePurchaseResult> for CompleteCheckoutResponse {
    fn from(result: CompletePurchaseResult) -> Self {
        Self {
            purchase: result.purchase,
            already_applied: result.already_applied,
            entitlement: result.snapshot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_request_accepts_gateway_field_names() {
        let req: CompleteCheckoutRequest = serde_json::from_str(
            r#"{"razorpay_order_id":"order_1","razorpay_payment_id":"pay_1","razorpay_signature":"abc"}"#,
        )
        .unwrap();
        let confirmation = PaymentConfirmation::from(req);
        assert_eq!(confirmation.order_id, "order_1");
        assert_eq!(confirmation.payment_id, "pay_1");
        assert_eq!(confirmation.signature, "abc");
    }

    #[test]
    fn catalog_lists_four_plans_and_three_unlocks() {
        let json = serde_json::to_value(PlansResponse::catalog()).unwrap();
        assert_eq!(json["plans"].as_array().unwrap().len(), 4);
        assert_eq!(json["unlocks"].as_array().unwrap().len(), 3);
    }
}
