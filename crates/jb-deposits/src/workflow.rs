//! Deposit request lifecycle.

use jb_ledger::LedgerEngine;
use jb_store::Repository;
use shared_bus::{EventPublisher, PlatformEvent};
use shared_types::{
    now_rfc3339, DepositMethod, DepositRequest, DepositStatus, DropPoint, DropPointStatus,
    IdGenerator, PlatformConfig, PlatformError, PlatformResult, UserId,
};
use std::sync::Arc;
use tracing::{error, info};

/// State machine for volume-to-points conversion requests.
pub struct DepositWorkflow {
    deposits: Arc<Repository<DepositRequest>>,
    drop_points: Arc<Repository<DropPoint>>,
    ledger: Arc<LedgerEngine>,
    notifier: Arc<dyn EventPublisher>,
    config: Arc<PlatformConfig>,
    request_ids: IdGenerator,
}

impl DepositWorkflow {
    pub fn new(
        deposits: Arc<Repository<DepositRequest>>,
        drop_points: Arc<Repository<DropPoint>>,
        ledger: Arc<LedgerEngine>,
        notifier: Arc<dyn EventPublisher>,
        config: Arc<PlatformConfig>,
    ) -> Self {
        Self {
            deposits,
            drop_points,
            ledger,
            notifier,
            config,
            request_ids: IdGenerator::new(),
        }
    }

    // -- reads ---------------------------------------------------------------

    /// One request by id.
    pub fn get(&self, request_id: u64) -> PlatformResult<DepositRequest> {
        self.deposits.require(&request_id)
    }

    /// All requests, newest first.
    #[must_use]
    pub fn list(&self) -> Vec<DepositRequest> {
        self.deposits.snapshot().as_ref().clone()
    }

    /// One user's requests, newest first.
    #[must_use]
    pub fn list_for_user(&self, user_id: UserId) -> Vec<DepositRequest> {
        self.deposits
            .snapshot()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }

    // -- transitions ---------------------------------------------------------

    /// Create a pending request. Validates the volume and the
    /// method-specific fields before anything is written.
    pub fn submit(
        &self,
        user_id: UserId,
        liters: f64,
        method: DepositMethod,
        note: Option<String>,
    ) -> PlatformResult<DepositRequest> {
        self.validate_volume(liters)?;
        self.validate_method(&method)?;
        // Reject unknown users before creating the request.
        self.ledger.user(user_id)?;

        let request = DepositRequest {
            id: self.request_ids.next_id(),
            user_id,
            amount: liters,
            points: self.config.points_for(liters),
            method,
            status: DepositStatus::Pending,
            date: now_rfc3339(),
            note,
        };

        let stored = request.clone();
        self.deposits.commit(move |requests| {
            // Newest first, matching how the collection is read.
            requests.insert(0, stored);
            Ok(())
        })?;

        info!(
            request_id = request.id,
            user_id,
            liters,
            points = request.points,
            "Deposit request submitted"
        );
        self.notifier.publish(PlatformEvent::DepositsChanged {
            request_id: Some(request.id),
        });
        Ok(request)
    }

    /// Award a pending request: credits the points, bumps the user's deposit
    /// totals and marks the request confirmed.
    pub fn confirm(&self, request_id: u64) -> PlatformResult<DepositRequest> {
        // Request lock first, user lock second (inside the ledger call) -
        // the fixed order every cross-entity operation uses.
        let lock = self.deposits.entity_lock(&request_id);
        let _guard = lock.lock();

        let request = self.deposits.require(&request_id)?;
        self.guard_pending(&request)?;

        let description = format!("Setor Jelantah {}L", request.amount);
        let entry =
            self.ledger
                .apply_deposit(request.user_id, request.amount, request.points, description)?;

        let updated = self.deposits.commit(|requests| {
            let r = requests
                .iter_mut()
                .find(|r| r.id == request_id)
                .ok_or_else(|| PlatformError::not_found("deposit request", request_id))?;
            r.status = DepositStatus::Confirmed;
            Ok(r.clone())
        });

        match updated {
            Ok(confirmed) => {
                info!(
                    request_id,
                    user_id = confirmed.user_id,
                    points = confirmed.points,
                    "Deposit confirmed"
                );
                self.notifier.publish(PlatformEvent::DepositsChanged {
                    request_id: Some(request_id),
                });
                Ok(confirmed)
            }
            Err(err) => {
                // The award is already durable but the request is not;
                // undo the award so the caller observes a clean failure.
                if let Err(rollback) = self.ledger.unapply_deposit(
                    request.user_id,
                    entry.id,
                    request.amount,
                    request.points,
                ) {
                    error!(
                        request_id,
                        user_id = request.user_id,
                        %rollback,
                        "Deposit award rollback failed; ledger and request disagree"
                    );
                }
                Err(err)
            }
        }
    }

    /// Decline a pending request. No balance effect.
    pub fn reject(&self, request_id: u64) -> PlatformResult<DepositRequest> {
        let lock = self.deposits.entity_lock(&request_id);
        let _guard = lock.lock();

        let request = self.deposits.require(&request_id)?;
        self.guard_pending(&request)?;

        let rejected = self.deposits.commit(|requests| {
            let r = requests
                .iter_mut()
                .find(|r| r.id == request_id)
                .ok_or_else(|| PlatformError::not_found("deposit request", request_id))?;
            r.status = DepositStatus::Rejected;
            Ok(r.clone())
        })?;

        info!(request_id, user_id = rejected.user_id, "Deposit rejected");
        self.notifier.publish(PlatformEvent::DepositsChanged {
            request_id: Some(request_id),
        });
        Ok(rejected)
    }

    // -- validation ----------------------------------------------------------

    fn guard_pending(&self, request: &DepositRequest) -> PlatformResult<()> {
        if request.status != DepositStatus::Pending {
            return Err(PlatformError::InvalidState {
                entity: "deposit request",
                id: request.id.to_string(),
                actual: request.status.as_str(),
                expected: DepositStatus::Pending.as_str(),
            });
        }
        Ok(())
    }

    fn validate_volume(&self, liters: f64) -> PlatformResult<()> {
        if !liters.is_finite() || liters <= 0.0 {
            return Err(PlatformError::Validation(
                "deposit volume must be a positive number of liters".into(),
            ));
        }
        if liters < self.config.minimum_deposit_liters {
            return Err(PlatformError::Validation(format!(
                "minimum deposit is {} liters",
                self.config.minimum_deposit_liters
            )));
        }
        Ok(())
    }

    fn validate_method(&self, method: &DepositMethod) -> PlatformResult<()> {
        match method {
            DepositMethod::Courier {
                address,
                contact,
                pickup_date,
            } => {
                if address.trim().is_empty()
                    || contact.trim().is_empty()
                    || pickup_date.trim().is_empty()
                {
                    return Err(PlatformError::Validation(
                        "courier pickup requires address, contact and pickup date".into(),
                    ));
                }
                Ok(())
            }
            DepositMethod::DropPoint { location } => {
                let open = self
                    .drop_points
                    .snapshot()
                    .iter()
                    .any(|dp| dp.name == *location && dp.status == DropPointStatus::Open);
                if !open {
                    return Err(PlatformError::Validation(format!(
                        "{location} is not a known open drop point"
                    )));
                }
                Ok(())
            }
        }
    }
}
