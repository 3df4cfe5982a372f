//! Storage Adapters
//!
//! Implementations of the `DraftStore` and `EntitlementStore` ports.
//!
//! ## Available Adapters
//!
//! - **FileDraftStore** - Drafts as YAML files on disk
//! - **InMemoryDraftStore** - Drafts in memory (testing/development)
//! - **FileEntitlementStore** - Entitlement records as YAML files on disk
//! - **InMemoryEntitlementStore** - Entitlement records in memory
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileDraftStore, InMemoryEntitlementStore};
//!
//! let drafts = FileDraftStore::new("./data/drafts");
//! let entitlements = InMemoryEntitlementStore::new();
//! ```

mod file_draft_store;
mod file_entitlement_store;
mod in_memory_draft_store;
mod in_memory_entitlement_store;
mod record_feed;

pub use file_draft_store::FileDraftStore;
pub use file_entitlement_store::FileEntitlementStore;
pub use in_memory_draft_store::InMemoryDraftStore;
pub use in_memory_entitlement_store::InMemoryEntitlementStore;
