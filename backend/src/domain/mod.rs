//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `entitlement` - Plans, unlocks, quotas and the entitlement engine
//! - `biodata` - Drafts, layouts, rendering and preview composition

pub mod biodata;
pub mod entitlement;
pub mod foundation;
