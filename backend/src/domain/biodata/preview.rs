//! Preview composition and the traditional-template paywall.

use serde::Serialize;

use super::{BiodataDraft, DocumentNode, Layout, LayoutRegistry};
use crate::domain::entitlement::{EntitlementSnapshot, Plan, PlanCatalog, UnlockKind};

const CTA_HEADLINE: &str = "Unlock the Traditional template";
const CTA_BUTTON: &str = "Upgrade Now";

/// What the preview pane shows for a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewViewModel {
    pub layout: Layout,
    /// True when the layout is behind the paywall. The document is then
    /// masked and must not be interactive.
    pub locked: bool,
    pub document: DocumentNode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_to_action: Option<CallToAction>,
    /// Whether ads may be shown around the preview.
    pub show_ads: bool,
}

/// Upgrade prompt attached to a locked preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToAction {
    pub headline: String,
    pub button_text: String,
    pub offers: Vec<Offer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub label: String,
    pub price_inr: u32,
    pub href: String,
}

impl CallToAction {
    fn traditional_unlock() -> Self {
        let unlock = UnlockKind::UnlockTraditional;
        let plan = Plan::Silver;
        Self {
            headline: CTA_HEADLINE.to_string(),
            button_text: CTA_BUTTON.to_string(),
            offers: vec![
                Offer {
                    label: unlock.display_name().to_string(),
                    price_inr: unlock.price_inr(),
                    href: PlanCatalog::unlock_href(unlock),
                },
                Offer {
                    label: format!("{} plan", plan.display_name()),
                    price_inr: plan.price_inr(),
                    href: PlanCatalog::plan_href(plan),
                },
            ],
        }
    }
}

/// Builds preview view models. Pure; no I/O.
#[derive(Debug, Clone, Default)]
pub struct PreviewComposer {
    registry: LayoutRegistry,
}

impl PreviewComposer {
    pub fn new(registry: LayoutRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &LayoutRegistry {
        &self.registry
    }

    /// Renders `draft` in its layout and applies the paywall.
    ///
    /// The content is rendered even when locked, so a later entitlement
    /// change only has to flip the flag.
    pub fn compose(
        &self,
        draft: &BiodataDraft,
        entitlement: &EntitlementSnapshot,
    ) -> PreviewViewModel {
        let document = self.registry.render(draft);
        let locked = !entitlement.template_unlocked(draft.layout);

        PreviewViewModel {
            layout: draft.layout,
            locked,
            document: if locked { document.masked() } else { document },
            call_to_action: locked.then(CallToAction::traditional_unlock),
            show_ads: !entitlement.is_ad_free(),
        }
    }
}
