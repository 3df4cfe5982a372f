//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Payment configuration (Razorpay)
///
/// Both credentials are optional. Without them checkout reports payments
/// as disabled and the rest of the app keeps working.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Razorpay key id (rzp_test_... or rzp_live_...)
    pub razorpay_key_id: Option<String>,

    /// Razorpay key secret, also used to verify payment signatures
    pub razorpay_key_secret: Option<SecretString>,

    /// Currency orders are created in
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Razorpay API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl PaymentConfig {
    /// Both key id and secret are present
    pub fn is_configured(&self) -> bool {
        self.razorpay_key_id.as_ref().is_some_and(|k| !k.is_empty())
            && self
                .razorpay_key_secret
                .as_ref()
                .is_some_and(|s| !s.expose_secret().is_empty())
    }

    /// Check if using Razorpay test mode
    pub fn is_test_mode(&self) -> bool {
        self.razorpay_key_id
            .as_deref()
            .is_some_and(|k| k.starts_with("rzp_test_"))
    }

    /// Validate payment configuration
    ///
    /// Missing credentials are allowed; malformed ones are not.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.currency != "INR" {
            return Err(ValidationError::UnsupportedCurrency(self.currency.clone()));
        }

        if let Some(key_id) = self.razorpay_key_id.as_deref().filter(|k| !k.is_empty()) {
            if !key_id.starts_with("rzp_") {
                return Err(ValidationError::InvalidRazorpayKeyId);
            }
            if self.razorpay_key_secret.is_none() {
                return Err(ValidationError::MissingRequired("RAZORPAY_KEY_SECRET"));
            }
        }

        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            razorpay_key_id: None,
            razorpay_key_secret: None,
            currency: default_currency(),
            api_base_url: default_api_base_url(),
        }
    }
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_api_base_url() -> String {
    "https://api.razorpay.com".to_string()
}
