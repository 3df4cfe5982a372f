//! Razorpay gateway over the REST Orders API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = RazorpayConfig::new("rzp_test_abc", Some("secret".into()));
//! let gateway = RazorpayGateway::new(config);
//! ```

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::ports::{
    PaymentConfirmation, PaymentError, PaymentGateway, PaymentOrder, PaymentVerification,
};

type HmacSha256 = Hmac<Sha256>;

const DEFAULT_BASE_URL: &str = "https://api.razorpay.com";

/// Razorpay API configuration.
#[derive(Clone)]
pub struct RazorpayConfig {
    /// Public key id (rzp_live_... or rzp_test_...).
    key_id: String,

    /// Key secret. Without it no order can be created or verified.
    key_secret: Option<SecretString>,

    /// Base URL for the API (default: https://api.razorpay.com).
    api_base_url: String,
}

impl RazorpayConfig {
    pub fn new(key_id: impl Into<String>, key_secret: Option<SecretString>) -> Self {
        Self {
            key_id: key_id.into(),
            key_secret,
            api_base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    fn secret(&self) -> Result<&SecretString, PaymentError> {
        self.key_secret.as_ref().ok_or(PaymentError::NotConfigured)
    }
}

impl std::fmt::Debug for RazorpayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayConfig")
            .field("key_id", &self.key_id)
            .field("key_secret", &self.key_secret.as_ref().map(|_| "[REDACTED]"))
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

/// Hex HMAC-SHA256 of `order_id|payment_id` under `secret`.
///
/// This is the signature Razorpay hands the browser after a payment.
pub fn sign_payment(
    secret: &str,
    order_id: &str,
    payment_id: &str,
) -> Result<String, PaymentError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| PaymentError::Gateway(format!("invalid signing key: {}", e)))?;
    mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

#[derive(Debug, Serialize)]
struct CreateOrderRequest<'a> {
    amount: u64,
    currency: &'a str,
    receipt: &'a str,
}

#[derive(Debug, Deserialize)]
struct RazorpayOrder {
    id: String,
    amount: u64,
    currency: String,
}

/// Razorpay implementation of `PaymentGateway`.
pub struct RazorpayGateway {
    config: RazorpayConfig,
    http_client: reqwest::Client,
}

impl RazorpayGateway {
    pub fn new(config: RazorpayConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    async fn create_order(
        &self,
        amount_minor_units: u64,
        currency: &str,
        receipt: &str,
    ) -> Result<PaymentOrder, PaymentError> {
        let secret = self.config.secret()?;
        let url = format!("{}/v1/orders", self.config.api_base_url);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(&self.config.key_id, Some(secret.expose_secret()))
            .json(&CreateOrderRequest {
                amount: amount_minor_units,
                currency,
                receipt,
            })
            .send()
            .await
            .map_err(|e| PaymentError::Gateway(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(%status, error = %error_text, "Razorpay create_order failed");
            return Err(PaymentError::Gateway(format!(
                "Razorpay API error ({}): {}",
                status, error_text
            )));
        }

        let order: RazorpayOrder = response
            .json()
            .await
            .map_err(|e| PaymentError::InvalidResponse(e.to_string()))?;

        Ok(PaymentOrder {
            order_id: order.id,
            amount_minor_units: order.amount,
            currency: order.currency,
            key_id: Some(self.config.key_id.clone()),
        })
    }

    async fn verify_payment(
        &self,
        confirmation: &PaymentConfirmation,
    ) -> Result<PaymentVerification, PaymentError> {
        let secret = self.config.secret()?;
        let expected = sign_payment(
            secret.expose_secret(),
            &confirmation.order_id,
            &confirmation.payment_id,
        )?;

        let success: bool = expected
            .as_bytes()
            .ct_eq(confirmation.signature.trim().to_ascii_lowercase().as_bytes())
            .into();

        if !success {
            tracing::warn!(
                order_id = %confirmation.order_id,
                payment_id = %confirmation.payment_id,
                "Payment signature mismatch"
            );
        }

        Ok(PaymentVerification { success })
    }
}
