//! CompletePurchaseHandler - Verifies a payment and applies what it bought.
//!
//! The grant is two-phase: a tentative snapshot is published right away,
//! then the store write is awaited and read back. Only a read-back that
//! reflects the whole grant confirms it; anything else rolls the overlay
//! back and fails the purchase with a support message.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::application::entitlement_service::{busy, MAX_WRITE_ATTEMPTS};
use crate::application::EntitlementService;
use crate::domain::entitlement::{EntitlementError, EntitlementSnapshot, Purchase};
use crate::domain::foundation::{Timestamp, UserId};
use crate::ports::{PaymentConfirmation, PaymentGateway};

#[derive(Debug, Clone)]
pub struct CompletePurchaseCommand {
    pub user_id: UserId,
    pub confirmation: PaymentConfirmation,
}

#[derive(Debug, Clone)]
pub struct CompletePurchaseResult {
    pub purchase: Option<Purchase>,
    pub snapshot: EntitlementSnapshot,
    /// The payment had been applied before; nothing changed.
    pub already_applied: bool,
}

pub struct CompletePurchaseHandler {
    entitlements: Arc<EntitlementService>,
    gateway: Arc<dyn PaymentGateway>,
}

impl CompletePurchaseHandler {
    pub fn new(entitlements: Arc<EntitlementService>, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            entitlements,
            gateway,
        }
    }

    pub async fn handle(
        &self,
        cmd: CompletePurchaseCommand,
    ) -> Result<CompletePurchaseResult, EntitlementError> {
        self.handle_at(cmd, Timestamp::now()).await
    }

    pub async fn handle_at(
        &self,
        cmd: CompletePurchaseCommand,
        now: Timestamp,
    ) -> Result<CompletePurchaseResult, EntitlementError> {
        let CompletePurchaseCommand {
            user_id,
            confirmation,
        } = cmd;
        let payment_id = confirmation.payment_id.clone();

        // 1. Replays of an applied payment are answered from the record
        let mut record = self.entitlements.record(&user_id).await?;
        if record.has_applied(&payment_id) {
            return Ok(CompletePurchaseResult {
                purchase: None,
                snapshot: self.entitlements.evaluate(&record, now).snapshot,
                already_applied: true,
            });
        }

        // 2. The order must have been created by our checkout
        let purchase = *record
            .pending_orders
            .get(&confirmation.order_id)
            .ok_or_else(|| EntitlementError::UnknownOrder(confirmation.order_id.clone()))?;

        // 3. Verify the signature. Nothing is granted on a mismatch.
        let verification = self.gateway.verify_payment(&confirmation).await?;
        if !verification.success {
            warn!(
                user_id = %user_id,
                order_id = %confirmation.order_id,
                "Payment signature mismatch"
            );
            return Err(EntitlementError::SignatureMismatch {
                order_id: confirmation.order_id,
            });
        }

        // 4-6. Build the grant from the record just read, publish it as
        // tentative and write it onto that same revision. Another write in
        // between (an expiry downgrade, a second purchase) means the grant
        // was computed from stale state: re-read and build it again.
        let mut attempts = 0;
        let patch = loop {
            attempts += 1;
            let patch = match record.purchase_patch(
                self.entitlements.engine(),
                purchase,
                &confirmation.order_id,
                &payment_id,
                now,
            ) {
                Some(patch) => patch,
                None => {
                    if attempts > 1 {
                        self.entitlements.confirm(&record, now);
                    }
                    return Ok(CompletePurchaseResult {
                        purchase: Some(purchase),
                        snapshot: self.entitlements.evaluate(&record, now).snapshot,
                        already_applied: true,
                    });
                }
            };

            self.entitlements.publish_tentative(record.merged(&patch), now);

            let failure = match self
                .entitlements
                .write_at(&user_id, record.revision, &patch)
                .await
            {
                Ok(Some(_)) => break patch,
                Ok(None) if attempts < MAX_WRITE_ATTEMPTS => {
                    match self.entitlements.record(&user_id).await {
                        Ok(fresh) => {
                            record = fresh;
                            continue;
                        }
                        Err(err) => err,
                    }
                }
                Ok(None) => busy(&user_id),
                Err(err) => err,
            };

            error!(
                user_id = %user_id,
                payment_id = %payment_id,
                error = %failure,
                "Failed to apply purchase"
            );
            self.entitlements.roll_back(&record, now);
            return Err(EntitlementError::apply_failed(payment_id, failure.to_string()));
        };

        // 7. Reconcile with a fresh read
        let stored = match self.entitlements.record(&user_id).await {
            Ok(stored) => stored,
            Err(err) => {
                error!(
                    user_id = %user_id,
                    payment_id = %payment_id,
                    error = %err,
                    "Could not read back applied purchase"
                );
                self.entitlements.roll_back(&record, now);
                return Err(EntitlementError::apply_failed(payment_id, err.to_string()));
            }
        };
        if !stored.reflects(&patch) {
            error!(
                user_id = %user_id,
                payment_id = %payment_id,
                "Stored entitlement does not reflect applied purchase"
            );
            self.entitlements.roll_back(&stored, now);
            return Err(EntitlementError::apply_failed(
                payment_id,
                "stored record does not reflect the purchase",
            ));
        }

        self.entitlements.confirm(&stored, now);
        info!(
            user_id = %user_id,
            payment_id = %payment_id,
            purchase = %purchase.description(),
            "Purchase applied"
        );

        Ok(CompletePurchaseResult {
            purchase: Some(purchase),
            snapshot: self.entitlements.evaluate(&stored, now).snapshot,
            already_applied: false,
        })
    }
}
