//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! The two services own live state (entitlement overlay, open drafts); the
//! handlers are stateless and built on top of them.

mod draft_service;
pub(crate) mod entitlement_service;
pub mod handlers;
mod live_preview;

pub use draft_service::{DraftService, LiveDraft};
pub use entitlement_service::{EntitlementService, EntitlementUpdate, UpdatePhase};
pub use live_preview::{LivePreview, PreviewFrame};
