//! Entitlement handlers.
//!
//! ## Commands
//! - Starting checkout for a plan or one-off unlock
//! - Completing a purchase after payment
//! - Consuming a view, interest or boost

mod complete_purchase;
mod consume_quota;
mod start_checkout;

pub use complete_purchase::{
    CompletePurchaseCommand, CompletePurchaseHandler, CompletePurchaseResult,
};
pub use consume_quota::{ConsumeQuotaCommand, ConsumeQuotaHandler, ConsumeQuotaResult};
pub use start_checkout::{StartCheckoutCommand, StartCheckoutHandler, StartCheckoutResult};
