//! Entitlement-specific error types.

use thiserror::Error;

use super::QuotaKind;
use crate::domain::foundation::{DomainError, ErrorCode};

/// Shown whenever a paid entitlement could not be applied.
pub const SUPPORT_MESSAGE: &str =
    "Your payment was received but we could not activate it. Please retry, or contact support with your payment reference.";

/// Errors that can occur in the entitlement domain.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EntitlementError {
    /// Expected branch: the action is blocked until the window resets or
    /// the user upgrades.
    #[error("{kind} quota exhausted ({limit} allowed)")]
    QuotaExceeded { kind: QuotaKind, limit: u32 },

    #[error("Unknown plan: {0}")]
    UnknownPlan(String),

    #[error("Unknown unlock: {0}")]
    UnknownUnlock(String),

    #[error("Invalid checkout request: {0}")]
    InvalidCheckout(String),

    #[error("No pending checkout for order {0}")]
    UnknownOrder(String),

    /// The payment signature did not verify. May indicate tampering.
    #[error("Payment signature mismatch for order {order_id}")]
    SignatureMismatch { order_id: String },

    #[error("Payment gateway error: {0}")]
    PaymentGateway(String),

    #[error("Payments are not configured")]
    PaymentsDisabled,

    /// A verified payment could not be applied to the user's record.
    #[error("Could not apply payment {payment_reference}: {reason}")]
    ApplyFailed {
        payment_reference: String,
        reason: String,
    },

    #[error("Entitlement store error: {0}")]
    Store(String),
}

impl EntitlementError {
    pub fn quota_exceeded(kind: QuotaKind, limit: u32) -> Self {
        EntitlementError::QuotaExceeded { kind, limit }
    }

    pub fn apply_failed(payment_reference: impl Into<String>, reason: impl Into<String>) -> Self {
        EntitlementError::ApplyFailed {
            payment_reference: payment_reference.into(),
            reason: reason.into(),
        }
    }

    /// Maps to a shared error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            EntitlementError::QuotaExceeded { .. } => ErrorCode::QuotaExceeded,
            EntitlementError::UnknownPlan(_) => ErrorCode::UnknownPlan,
            EntitlementError::UnknownUnlock(_) => ErrorCode::UnknownUnlock,
            EntitlementError::InvalidCheckout(_) => ErrorCode::ValidationFailed,
            EntitlementError::UnknownOrder(_) => ErrorCode::UnknownOrder,
            EntitlementError::SignatureMismatch { .. } => ErrorCode::PaymentSignatureMismatch,
            EntitlementError::PaymentGateway(_) => ErrorCode::PaymentGatewayError,
            EntitlementError::PaymentsDisabled => ErrorCode::FeatureDisabled,
            EntitlementError::ApplyFailed { .. } => ErrorCode::EntitlementApplyFailed,
            EntitlementError::Store(_) => ErrorCode::StorageError,
        }
    }

    /// Message safe to show the user.
    pub fn user_message(&self) -> String {
        match self {
            EntitlementError::QuotaExceeded { kind, .. } => match kind {
                QuotaKind::View => "You have used today's free profile views. Upgrade to view unlimited profiles.".to_string(),
                QuotaKind::Interest => "You have used this month's free interests. Upgrade to send unlimited interests.".to_string(),
                QuotaKind::Boost => "No profile boost is available this month.".to_string(),
            },
            EntitlementError::SignatureMismatch { .. } => {
                "We could not verify this payment. No changes were made to your account.".to_string()
            }
            EntitlementError::PaymentGateway(_) => {
                "The payment service is unavailable. Please try again shortly.".to_string()
            }
            EntitlementError::ApplyFailed { .. } => SUPPORT_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<EntitlementError> for DomainError {
    fn from(err: EntitlementError) -> Self {
        let code = err.code();
        let message = err.user_message();
        let domain = DomainError::new(code, message);
        match err {
            EntitlementError::QuotaExceeded { kind, limit } => domain
                .with_detail("quota", kind.to_string())
                .with_detail("limit", limit.to_string()),
            EntitlementError::ApplyFailed {
                payment_reference, ..
            } => domain.with_detail("payment_reference", payment_reference),
            _ => domain,
        }
    }
}
