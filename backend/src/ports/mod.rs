//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `IdentityProvider` - Who is signed in
//! - `EntitlementStore` - Authoritative per-user entitlement record
//! - `DraftStore` - Persistence of the active draft
//! - `PaymentGateway` - Order creation and payment verification
//! - `IntroWriter` - AI-written introductions
//! - `DocumentRenderer` - Export of a rendered biodata to a file

mod document_renderer;
mod draft_store;
mod entitlement_store;
mod identity_provider;
mod intro_writer;
mod payment_gateway;

pub use document_renderer::{
    DocumentRenderer, ExportedArtifact, PageFormat, RenderError, RenderOptions,
};
pub use draft_store::{DraftStore, DraftStoreError};
pub use entitlement_store::{EntitlementStore, EntitlementStoreError};
pub use identity_provider::{Identity, IdentityChange, IdentityError, IdentityProvider};
pub use intro_writer::{IntroError, IntroWriter};
pub use payment_gateway::{
    PaymentConfirmation, PaymentError, PaymentGateway, PaymentOrder, PaymentVerification,
};
