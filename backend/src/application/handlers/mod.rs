//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod biodata;
pub mod entitlement;

pub use biodata::{
    DraftIntroductionCommand, DraftIntroductionHandler, DraftIntroductionResult,
    ExportBiodataCommand, ExportBiodataHandler, ExportBiodataResult, ExportError,
    GetPreviewHandler, GetPreviewQuery, GetPreviewResult,
};
pub use entitlement::{
    CompletePurchaseCommand, CompletePurchaseHandler, CompletePurchaseResult,
    ConsumeQuotaCommand, ConsumeQuotaHandler, ConsumeQuotaResult, StartCheckoutCommand,
    StartCheckoutHandler, StartCheckoutResult,
};
