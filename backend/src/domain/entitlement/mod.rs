//! Entitlement domain module.
//!
//! Decides what a user may view, send, unlock and download.
//!
//! # Module Structure
//!
//! - `plan` - Plan tiers, prices and billing periods
//! - `catalog` - Price list for display and checkout
//! - `feature_set` - Capability flags per plan
//! - `unlocks` - Permanent one-off unlocks
//! - `subscription` - Subscription record and purchase application
//! - `usage` - Lazily reset usage counters
//! - `snapshot` - Time-evaluated entitlement view and its queries
//! - `engine` - Pure evaluation, quota and grant operations
//! - `purchase` - Checkout items
//! - `record` - Persisted record and merge patches

mod catalog;
mod engine;
mod errors;
mod feature_set;
mod plan;
mod purchase;
mod record;
mod snapshot;
mod subscription;
mod unlocks;
mod usage;

pub use catalog::{PlanCatalog, PlanEntry, UnlockEntry};
pub use engine::{DowngradeRequest, EntitlementEngine, Evaluation, RELATIONSHIP_MANAGER_DAYS};
pub use errors::{EntitlementError, SUPPORT_MESSAGE};
pub use feature_set::FeatureSet;
pub use plan::{BillingPeriod, Plan};
pub use purchase::{Purchase, CURRENCY};
pub use record::{EntitlementPatch, EntitlementRecord};
pub use snapshot::{EffectiveUsage, EntitlementSnapshot, QuotaLimits};
pub use subscription::Subscription;
pub use unlocks::{UnlockKind, UnlockedFeatures};
pub use usage::{QuotaKind, QuotaPolicy, Usage, UsagePatch};
