//! Runtime configuration.
//!
//! Read from `SHAADICRAFT__SECTION__KEY` environment variables, after an
//! optional `.env` file. Every section has defaults, so an empty
//! environment yields a runnable development setup.
//!
//! Collaborator credentials (payment, AI, auth) are optional: when absent the
//! corresponding feature is disabled rather than failing startup.
//!
//! ```no_run
//! use shaadicraft::config::AppConfig;
//!
//! let config = AppConfig::load().expect("configuration");
//! config.validate().expect("valid configuration");
//! println!("Payments enabled: {}", config.payment.is_configured());
//! ```

mod ai;
mod auth;
mod entitlement;
mod error;
mod features;
mod payment;
mod server;
mod storage;

pub use ai::AiConfig;
pub use auth::AuthConfig;
pub use entitlement::EntitlementConfig;
pub use error::{ConfigError, ValidationError};
pub use features::FeatureFlags;
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};
pub use storage::StorageConfig;

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Razorpay checkout
    #[serde(default)]
    pub payment: PaymentConfig,

    /// Gemini introduction writer
    #[serde(default)]
    pub ai: AiConfig,

    /// Bearer token verification
    #[serde(default)]
    pub auth: AuthConfig,

    /// Where drafts and entitlement records live on disk
    #[serde(default)]
    pub storage: StorageConfig,

    /// Free-tier quotas and the reset calendar
    #[serde(default)]
    pub entitlement: EntitlementConfig,

    #[serde(default)]
    pub features: FeatureFlags,
}

impl AppConfig {
    /// `SHAADICRAFT__PAYMENT__RAZORPAY_KEY_ID=rzp_live_x` sets
    /// `payment.razorpay_key_id`.
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env is normal outside development.
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SHAADICRAFT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Checks each section; auth rules depend on the environment.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.payment.validate()?;
        self.ai.validate()?;
        self.auth.validate(&self.server.environment)?;
        self.storage.validate()?;
        self.entitlement.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
