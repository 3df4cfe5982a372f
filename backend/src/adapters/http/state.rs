//! Shared application state.

use std::sync::Arc;

use crate::application::handlers::{
    CompletePurchaseHandler, ConsumeQuotaHandler, DraftIntroductionHandler, ExportBiodataHandler,
    GetPreviewHandler, StartCheckoutHandler,
};
use crate::application::{DraftService, EntitlementService};
use crate::domain::biodata::PreviewComposer;
use crate::ports::{DocumentRenderer, IdentityProvider, IntroWriter, PaymentGateway};

/// Shared application state containing all dependencies.
///
/// Cloned for each request; every dependency is Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub entitlements: Arc<EntitlementService>,
    pub drafts: Arc<DraftService>,
    pub payment_gateway: Arc<dyn PaymentGateway>,
    pub renderer: Arc<dyn DocumentRenderer>,
    pub intro_writer: Arc<dyn IntroWriter>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    // Handlers are created on demand from the shared state.

    pub fn start_checkout_handler(&self) -> StartCheckoutHandler {
        StartCheckoutHandler::new(self.entitlements.clone(), self.payment_gateway.clone())
    }

    pub fn complete_purchase_handler(&self) -> CompletePurchaseHandler {
        CompletePurchaseHandler::new(self.entitlements.clone(), self.payment_gateway.clone())
    }

    pub fn consume_quota_handler(&self) -> ConsumeQuotaHandler {
        ConsumeQuotaHandler::new(self.entitlements.clone())
    }

    pub fn get_preview_handler(&self) -> GetPreviewHandler {
        GetPreviewHandler::new(
            self.entitlements.clone(),
            self.drafts.clone(),
            PreviewComposer::new(self.drafts.registry().clone()),
        )
    }

    pub fn export_handler(&self) -> ExportBiodataHandler {
        ExportBiodataHandler::new(
            self.entitlements.clone(),
            self.drafts.clone(),
            self.renderer.clone(),
        )
    }

    pub fn introduction_handler(&self) -> DraftIntroductionHandler {
        DraftIntroductionHandler::new(self.drafts.clone(), self.intro_writer.clone())
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("entitlements", &self.entitlements)
            .field("drafts", &self.drafts)
            .finish_non_exhaustive()
    }
}
