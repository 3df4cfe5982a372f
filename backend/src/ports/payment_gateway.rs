//! Payment gateway port for one-time INR payments.
//!
//! Checkout creates an order for a fixed amount; the browser completes the
//! payment with the gateway and hands back a signed confirmation, which is
//! verified here before anything is granted.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::entitlement::EntitlementError;

/// Port for payment gateway integrations (e.g., Razorpay).
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create an order for `amount_minor_units` (paise for INR).
    async fn create_order(
        &self,
        amount_minor_units: u64,
        currency: &str,
        receipt: &str,
    ) -> Result<PaymentOrder, PaymentError>;

    /// Check the signature on a payment confirmation.
    ///
    /// A well-formed but forged confirmation yields `success: false`, not an
    /// error. Errors are reserved for the gateway being unusable.
    async fn verify_payment(
        &self,
        confirmation: &PaymentConfirmation,
    ) -> Result<PaymentVerification, PaymentError>;
}

/// Order created at the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOrder {
    pub order_id: String,
    pub amount_minor_units: u64,
    pub currency: String,
    /// Public key id the browser needs to open the checkout widget.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
}

/// What the browser reports after paying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmation {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentVerification {
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentError {
    #[error("Payments are not configured")]
    NotConfigured,

    #[error("Payment gateway error: {0}")]
    Gateway(String),

    #[error("Invalid response from payment gateway: {0}")]
    InvalidResponse(String),
}

impl From<PaymentError> for EntitlementError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::NotConfigured => EntitlementError::PaymentsDisabled,
            other => EntitlementError::PaymentGateway(other.to_string()),
        }
    }
}
