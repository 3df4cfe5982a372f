//! Biodata handlers.
//!
//! ## Commands
//! - Exporting the draft as a file
//! - Drafting the introduction with AI
//!
//! ## Queries
//! - Live preview with paywall applied

mod draft_introduction;
mod export_biodata;
mod get_preview;

pub use draft_introduction::{
    DraftIntroductionCommand, DraftIntroductionHandler, DraftIntroductionResult,
};
pub use export_biodata::{
    ExportBiodataCommand, ExportBiodataHandler, ExportBiodataResult, ExportError,
};
pub use get_preview::{GetPreviewHandler, GetPreviewQuery, GetPreviewResult};
