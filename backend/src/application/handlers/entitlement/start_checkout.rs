//! StartCheckoutHandler - Creates a gateway order for a plan or unlock.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::application::EntitlementService;
use crate::domain::entitlement::{EntitlementError, EntitlementPatch, Purchase, CURRENCY};
use crate::domain::foundation::UserId;
use crate::ports::{PaymentGateway, PaymentOrder};

/// Command to begin a purchase.
///
/// Mirrors the checkout query: exactly one of `plan` or `action` is set.
#[derive(Debug, Clone)]
pub struct StartCheckoutCommand {
    pub user_id: UserId,
    pub plan: Option<String>,
    pub action: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StartCheckoutResult {
    pub purchase: Purchase,
    pub description: String,
    pub order: PaymentOrder,
}

/// Handler for starting checkout.
///
/// The purchase is remembered against the order id so that completion
/// grants what was priced here, not what the browser claims.
pub struct StartCheckoutHandler {
    entitlements: Arc<EntitlementService>,
    gateway: Arc<dyn PaymentGateway>,
}

impl StartCheckoutHandler {
    pub fn new(entitlements: Arc<EntitlementService>, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            entitlements,
            gateway,
        }
    }

    pub async fn handle(
        &self,
        cmd: StartCheckoutCommand,
    ) -> Result<StartCheckoutResult, EntitlementError> {
        // 1. Parse what is being bought; unknown identifiers stop here
        let purchase =
            Purchase::from_checkout_query(cmd.plan.as_deref(), cmd.action.as_deref())?;

        // 2. Create the order at the gateway
        let receipt = format!("rcpt_{}", Uuid::new_v4().simple());
        let order = self
            .gateway
            .create_order(purchase.price_minor_units(), CURRENCY, &receipt)
            .await?;

        // 3. Remember the pending order
        self.entitlements
            .write(
                &cmd.user_id,
                &EntitlementPatch::pending_order(order.order_id.clone(), purchase),
            )
            .await?;

        info!(
            user_id = %cmd.user_id,
            order_id = %order.order_id,
            amount = order.amount_minor_units,
            "Checkout started"
        );

        Ok(StartCheckoutResult {
            description: purchase.description(),
            purchase,
            order,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::razorpay::MockPaymentGateway;
    use crate::adapters::storage::InMemoryEntitlementStore;
    use crate::domain::entitlement::{EntitlementEngine, Plan, UnlockKind};
    use crate::ports::{EntitlementStore, PaymentError};

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    fn setup() -> (StartCheckoutHandler, InMemoryEntitlementStore, MockPaymentGateway) {
        let store = InMemoryEntitlementStore::new();
        let gateway = MockPaymentGateway::new();
        let service = Arc::new(EntitlementService::new(
            Arc::new(store.clone()),
            EntitlementEngine::default(),
        ));
        let handler = StartCheckoutHandler::new(service, Arc::new(gateway.clone()));
        (handler, store, gateway)
    }

    fn command(plan: Option<&str>, action: Option<&str>) -> StartCheckoutCommand {
        StartCheckoutCommand {
            user_id: user(),
            plan: plan.map(String::from),
            action: action.map(String::from),
        }
    }

    #[tokio::test]
    async fn plan_checkout_creates_priced_order_and_pending_entry() {
        let (handler, store, _) = setup();

        let result = handler.handle(command(Some("silver"), None)).await.unwrap();

        assert_eq!(result.purchase, Purchase::Plan(Plan::Silver));
        assert_eq!(result.order.amount_minor_units, 99_900);
        assert_eq!(result.order.currency, "INR");

        let record = store.read(&user()).await.unwrap();
        assert_eq!(
            record.pending_orders.get(&result.order.order_id),
            Some(&Purchase::Plan(Plan::Silver))
        );
    }

    #[tokio::test]
    async fn unlock_checkout_uses_unlock_price() {
        let (handler, _, _) = setup();

        let result = handler
            .handle(command(None, Some("unlock_traditional")))
            .await
            .unwrap();

        assert_eq!(result.purchase, Purchase::Unlock(UnlockKind::UnlockTraditional));
        assert_eq!(result.order.amount_minor_units, 1_000);
    }

    #[tokio::test]
    async fn unknown_plan_is_rejected_before_gateway() {
        let (handler, _, gateway) = setup();

        let err = handler.handle(command(Some("diamond"), None)).await.unwrap_err();

        assert!(matches!(err, EntitlementError::UnknownPlan(_)));
        assert_eq!(gateway.call_count("create_order"), 0);
    }

    #[tokio::test]
    async fn unconfigured_gateway_disables_payments() {
        let (handler, store, gateway) = setup();
        gateway.set_error(PaymentError::NotConfigured);

        let err = handler.handle(command(Some("gold"), None)).await.unwrap_err();

        assert_eq!(err, EntitlementError::PaymentsDisabled);
        assert!(store.read(&user()).await.unwrap().pending_orders.is_empty());
    }

    #[tokio::test]
    async fn gateway_failure_is_reported_as_gateway_error() {
        let (handler, _, gateway) = setup();
        gateway.set_method_error("create_order", PaymentError::Gateway("timeout".into()));

        let err = handler.handle(command(Some("gold"), None)).await.unwrap_err();

        assert!(matches!(err, EntitlementError::PaymentGateway(_)));
    }
}
