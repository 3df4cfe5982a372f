//! Biodata domain module.
//!
//! The draft being edited, its layouts and the documents rendered from it.
//!
//! # Module Structure
//!
//! - `draft` - Form fields and shape validation
//! - `layout` - Available layouts
//! - `document` - Rendered node tree and masking
//! - `render` - Per-layout renderers and their registry
//! - `preview` - Paywalled preview composition
//! - `session` - Observable draft with revisions
//! - `intro` - Input for AI-written introductions

mod document;
mod draft;
mod intro;
mod layout;
mod preview;
mod render;
mod session;

pub use document::{DocumentNode, ROOT_NODE_ID};
pub use draft::{BiodataDraft, BiodataField, Section};
pub use intro::{IntroductionRequest, FALLBACK_EMPTY, FALLBACK_ERROR};
pub use layout::Layout;
pub use preview::{CallToAction, Offer, PreviewComposer, PreviewViewModel};
pub use render::{LayoutRegistry, LayoutRenderer, ModernRenderer, TraditionalRenderer};
pub use session::{DraftRevision, DraftSession};
