//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,

    // Unknown identifiers
    UnknownPlan,
    UnknownUnlock,
    UnknownOrder,

    // Entitlement errors
    QuotaExceeded,
    DownloadLocked,
    EntitlementApplyFailed,

    // Payment errors
    PaymentSignatureMismatch,
    PaymentGatewayError,

    // Authorization errors
    Unauthorized,

    // Degraded collaborators
    FeatureDisabled,
    AIProviderError,
    ExportFailed,

    // Infrastructure errors
    StorageError,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::UnknownPlan => "UNKNOWN_PLAN",
            ErrorCode::UnknownUnlock => "UNKNOWN_UNLOCK",
            ErrorCode::UnknownOrder => "UNKNOWN_ORDER",
            ErrorCode::QuotaExceeded => "QUOTA_EXCEEDED",
            ErrorCode::DownloadLocked => "DOWNLOAD_LOCKED",
            ErrorCode::EntitlementApplyFailed => "ENTITLEMENT_APPLY_FAILED",
            ErrorCode::PaymentSignatureMismatch => "PAYMENT_SIGNATURE_MISMATCH",
            ErrorCode::PaymentGatewayError => "PAYMENT_GATEWAY_ERROR",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::FeatureDisabled => "FEATURE_DISABLED",
            ErrorCode::AIProviderError => "AI_PROVIDER_ERROR",
            ErrorCode::ExportFailed => "EXPORT_FAILED",
            ErrorCode::StorageError => "STORAGE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}
