//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Request body limit must be positive")]
    InvalidBodyLimit,

    #[error("Invalid host address: {0}")]
    InvalidHost(String),

    #[error("Invalid Razorpay key id format")]
    InvalidRazorpayKeyId,

    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    #[error("Invalid AI endpoint URL")]
    InvalidAiEndpoint,

    #[error("JWT secret must be set in production")]
    JwtSecretRequired,

    #[error("Quota limits must be positive")]
    InvalidQuotaLimit,

    #[error("Day boundary offset must be within ±14 hours")]
    InvalidDayBoundary,

    #[error("Storage directory must not be empty")]
    InvalidStorageDir,

    #[error("Draft idle timeout and open draft limit must be positive")]
    InvalidDraftLimits,
}
