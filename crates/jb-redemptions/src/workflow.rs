//! Redemption transaction lifecycle.

use crate::code::generate_code;
use jb_ledger::LedgerEngine;
use jb_store::Repository;
use shared_bus::{EventPublisher, PlatformEvent};
use shared_types::{
    now_rfc3339, PlatformConfig, PlatformError, PlatformResult, RedemptionItem,
    RedemptionStatus, RedemptionTransaction, UserId,
};
use std::sync::Arc;
use tracing::{error, info};

/// State machine for point-to-goods exchange transactions.
pub struct RedemptionWorkflow {
    transactions: Arc<Repository<RedemptionTransaction>>,
    ledger: Arc<LedgerEngine>,
    notifier: Arc<dyn EventPublisher>,
    config: Arc<PlatformConfig>,
}

impl RedemptionWorkflow {
    pub fn new(
        transactions: Arc<Repository<RedemptionTransaction>>,
        ledger: Arc<LedgerEngine>,
        notifier: Arc<dyn EventPublisher>,
        config: Arc<PlatformConfig>,
    ) -> Self {
        Self {
            transactions,
            ledger,
            notifier,
            config,
        }
    }

    // -- reads ---------------------------------------------------------------

    /// Current state of a transaction by voucher code.
    pub fn lookup(&self, code: &str) -> PlatformResult<RedemptionTransaction> {
        self.transactions.require(&code.to_string())
    }

    /// All transactions.
    #[must_use]
    pub fn list(&self) -> Vec<RedemptionTransaction> {
        self.transactions.snapshot().as_ref().clone()
    }

    /// One user's transactions.
    #[must_use]
    pub fn list_for_user(&self, user_id: UserId) -> Vec<RedemptionTransaction> {
        self.transactions
            .snapshot()
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect()
    }

    // -- transitions ---------------------------------------------------------

    /// Exchange points for goods: deducts the total up front, then creates
    /// the pending transaction under a fresh voucher code.
    ///
    /// If the balance is short the whole operation fails and nothing is
    /// created. If the transaction record fails to persist after the debit
    /// went durable, the deduction is compensated with an equal credit.
    pub fn create(
        &self,
        user_id: UserId,
        items: Vec<RedemptionItem>,
    ) -> PlatformResult<RedemptionTransaction> {
        let total = validate_items(&items)?;
        let description = charge_description(&items);

        // Deduct-then-create: the debit enforces the balance invariant and
        // fails the operation before any transaction record exists.
        self.ledger.debit(user_id, total, description)?;

        let prefix = self.config.code_prefix;
        let digits = self.config.code_digits;
        let created = self.transactions.commit(move |transactions| {
            // Draw codes until one is free; check-and-insert under the
            // commit lock keeps the code unique.
            let mut code = generate_code(prefix, digits);
            while transactions.iter().any(|t| t.id == code) {
                code = generate_code(prefix, digits);
            }

            let transaction = RedemptionTransaction {
                id: code,
                user_id,
                items,
                total_points: total,
                status: RedemptionStatus::Pending,
                date: now_rfc3339(),
                confirmed_at: None,
            };
            transactions.push(transaction.clone());
            Ok(transaction)
        });

        match created {
            Ok(transaction) => {
                info!(
                    code = %transaction.id,
                    user_id,
                    total_points = total,
                    "Redemption created"
                );
                self.notifier.publish(PlatformEvent::RedemptionsChanged {
                    code: Some(transaction.id.clone()),
                });
                Ok(transaction)
            }
            Err(err) => {
                // The charge is durable but the record is not; give the
                // points back so the caller observes a clean failure.
                if let Err(rollback) =
                    self.ledger
                        .credit(user_id, total, "Pengembalian - transaksi gagal disimpan")
                {
                    error!(
                        user_id,
                        total_points = total,
                        %rollback,
                        "Redemption charge rollback failed; ledger and transactions disagree"
                    );
                }
                Err(err)
            }
        }
    }

    /// Confirm pickup. No balance effect: the points were spent at creation.
    pub fn complete(&self, code: &str) -> PlatformResult<RedemptionTransaction> {
        let key = code.to_string();
        let lock = self.transactions.entity_lock(&key);
        let _guard = lock.lock();

        let transaction = self.transactions.require(&key)?;
        self.guard_pending(&transaction)?;

        let completed = self.set_settled(&key, RedemptionStatus::Completed)?;

        info!(code = %key, user_id = completed.user_id, "Redemption completed");
        self.notifier.publish(PlatformEvent::RedemptionsChanged {
            code: Some(key),
        });
        Ok(completed)
    }

    /// Cancel the reservation and refund the full charge with a
    /// compensating earn entry.
    pub fn cancel(&self, code: &str) -> PlatformResult<RedemptionTransaction> {
        // Transaction lock first, user lock second (inside the ledger call).
        let key = code.to_string();
        let lock = self.transactions.entity_lock(&key);
        let _guard = lock.lock();

        let transaction = self.transactions.require(&key)?;
        self.guard_pending(&transaction)?;

        let refund = self.ledger.credit(
            transaction.user_id,
            transaction.total_points,
            format!("Pengembalian - {key}"),
        )?;

        match self.set_settled(&key, RedemptionStatus::Cancelled) {
            Ok(cancelled) => {
                info!(
                    code = %key,
                    user_id = cancelled.user_id,
                    refunded = cancelled.total_points,
                    "Redemption cancelled"
                );
                self.notifier.publish(PlatformEvent::RedemptionsChanged {
                    code: Some(key),
                });
                Ok(cancelled)
            }
            Err(err) => {
                // Refund went durable but the transaction is still pending;
                // take the refund back so a retry cannot refund twice.
                if let Err(rollback) = self.ledger.debit(
                    transaction.user_id,
                    transaction.total_points,
                    format!("Koreksi pengembalian - {key}"),
                ) {
                    error!(
                        code = %key,
                        user_id = transaction.user_id,
                        refund_entry = refund.id,
                        %rollback,
                        "Refund rollback failed; ledger and transactions disagree"
                    );
                }
                Err(err)
            }
        }
    }

    // -- internals -----------------------------------------------------------

    fn guard_pending(&self, transaction: &RedemptionTransaction) -> PlatformResult<()> {
        if transaction.status != RedemptionStatus::Pending {
            return Err(PlatformError::InvalidState {
                entity: "transaction",
                id: transaction.id.clone(),
                actual: transaction.status.as_str(),
                expected: RedemptionStatus::Pending.as_str(),
            });
        }
        Ok(())
    }

    fn set_settled(
        &self,
        code: &String,
        status: RedemptionStatus,
    ) -> PlatformResult<RedemptionTransaction> {
        self.transactions.commit(|transactions| {
            let t = transactions
                .iter_mut()
                .find(|t| t.id == *code)
                .ok_or_else(|| PlatformError::not_found("transaction", code))?;
            t.status = status;
            t.confirmed_at = Some(now_rfc3339());
            Ok(t.clone())
        })
    }
}

/// Check item sanity and compute the total charge.
fn validate_items(items: &[RedemptionItem]) -> PlatformResult<u64> {
    if items.is_empty() {
        return Err(PlatformError::Validation(
            "redemption requires at least one item".into(),
        ));
    }
    let mut total: u64 = 0;
    for item in items {
        if item.quantity == 0 {
            return Err(PlatformError::Validation(format!(
                "item {} has zero quantity",
                item.name
            )));
        }
        if item.points == 0 {
            return Err(PlatformError::Validation(format!(
                "item {} has zero unit points",
                item.name
            )));
        }
        let line = item
            .points
            .checked_mul(u64::from(item.quantity))
            .ok_or_else(|| PlatformError::Validation("redemption total overflow".into()))?;
        total = total
            .checked_add(line)
            .ok_or_else(|| PlatformError::Validation("redemption total overflow".into()))?;
    }
    Ok(total)
}

fn charge_description(items: &[RedemptionItem]) -> String {
    if items.len() == 1 && items[0].quantity == 1 {
        format!("Tukar {}", items[0].name)
    } else {
        format!("Tukar {} Item", items.len())
    }
}
