//! Ledger engine - balance mutations under the per-user lock.
//!
//! Every mutation follows the same discipline: take the user's entity lock,
//! run one repository commit that rewrites the wallet and appends the
//! history entry together, release the lock, then publish the invalidation
//! signal. The read of the current balance and the write of the new one can
//! never interleave with another mutation of the same user.

use jb_store::Repository;
use shared_bus::{EventPublisher, PlatformEvent};
use shared_types::{
    today, EntryKind, IdGenerator, PlatformConfig, PlatformError, PlatformResult,
    PointHistoryEntry, User, UserId,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Owns point-balance arithmetic and the append-only history.
pub struct LedgerEngine {
    users: Arc<Repository<User>>,
    notifier: Arc<dyn EventPublisher>,
    config: Arc<PlatformConfig>,
    entry_ids: IdGenerator,
}

impl LedgerEngine {
    pub fn new(
        users: Arc<Repository<User>>,
        notifier: Arc<dyn EventPublisher>,
        config: Arc<PlatformConfig>,
    ) -> Self {
        Self {
            users,
            notifier,
            config,
            entry_ids: IdGenerator::new(),
        }
    }

    // -- reads ---------------------------------------------------------------

    /// Current state of a user's identity and wallet.
    pub fn user(&self, user_id: UserId) -> PlatformResult<User> {
        self.users.require(&user_id)
    }

    /// Current balance.
    pub fn balance(&self, user_id: UserId) -> PlatformResult<u64> {
        Ok(self.user(user_id)?.points)
    }

    /// Ledger entries, newest first.
    pub fn history(&self, user_id: UserId) -> PlatformResult<Vec<PointHistoryEntry>> {
        Ok(self.user(user_id)?.point_history)
    }

    // -- mutations -----------------------------------------------------------

    /// Award points. Always succeeds for an existing user and a positive
    /// amount; appends an earn entry.
    pub fn credit(
        &self,
        user_id: UserId,
        amount: u64,
        description: impl Into<String>,
    ) -> PlatformResult<PointHistoryEntry> {
        let description = description.into();
        require_positive(amount)?;

        let entry = self.mutate_wallet(user_id, |user| {
            let entry = self.new_entry(EntryKind::Earn, amount, description.clone());
            user.points = checked_credit(user.points, amount)?;
            user.point_history.insert(0, entry.clone());
            Ok(entry)
        })?;

        info!(user_id, amount, description = %entry.description, "Points credited");
        self.notify(user_id);
        Ok(entry)
    }

    /// Spend points. Fails with `InsufficientBalance` when the amount
    /// exceeds the current balance, leaving balance and history unchanged;
    /// on success appends a redeem entry.
    pub fn debit(
        &self,
        user_id: UserId,
        amount: u64,
        description: impl Into<String>,
    ) -> PlatformResult<PointHistoryEntry> {
        let description = description.into();
        require_positive(amount)?;

        let entry = self.mutate_wallet(user_id, |user| {
            if amount > user.points {
                return Err(PlatformError::InsufficientBalance {
                    required: amount,
                    available: user.points,
                });
            }
            let entry = self.new_entry(EntryKind::Redeem, amount, description.clone());
            user.points -= amount;
            user.point_history.insert(0, entry.clone());
            Ok(entry)
        })?;

        info!(user_id, amount, description = %entry.description, "Points debited");
        self.notify(user_id);
        Ok(entry)
    }

    /// Award a confirmed deposit: the point credit plus the deposit totals
    /// (`totalDeposited`, CO2 savings) in one committed mutation.
    pub fn apply_deposit(
        &self,
        user_id: UserId,
        liters: f64,
        points: u64,
        description: impl Into<String>,
    ) -> PlatformResult<PointHistoryEntry> {
        let description = description.into();
        require_positive(points)?;
        let co2 = self.config.co2_for(liters);

        let entry = self.mutate_wallet(user_id, |user| {
            let entry = self.new_entry(EntryKind::Earn, points, description.clone());
            user.points = checked_credit(user.points, points)?;
            user.point_history.insert(0, entry.clone());
            user.total_deposited += liters;
            user.co2_saved += co2;
            Ok(entry)
        })?;

        info!(user_id, liters, points, co2_kg = co2, "Deposit award applied");
        self.notify(user_id);
        Ok(entry)
    }

    /// Compensating rollback for [`apply_deposit`](Self::apply_deposit):
    /// removes the awarded entry and restores the wallet totals. Used when
    /// the deposit record itself fails to persist after the award went
    /// durable, so the caller observes "operation failed, nothing changed".
    pub fn unapply_deposit(
        &self,
        user_id: UserId,
        entry_id: u64,
        liters: f64,
        points: u64,
    ) -> PlatformResult<()> {
        let co2 = self.config.co2_for(liters);

        self.mutate_wallet(user_id, |user| {
            user.points = user.points.saturating_sub(points);
            user.total_deposited = (user.total_deposited - liters).max(0.0);
            user.co2_saved = user.co2_saved.saturating_sub(co2);
            user.point_history.retain(|e| e.id != entry_id);
            Ok(())
        })?;

        warn!(user_id, entry_id, points, "Deposit award rolled back");
        self.notify(user_id);
        Ok(())
    }

    // -- internals -----------------------------------------------------------

    /// Mutate one user under their entity lock, committing wallet and
    /// history together. The lock spans the balance read and the save.
    fn mutate_wallet<R>(
        &self,
        user_id: UserId,
        mutate: impl FnOnce(&mut User) -> PlatformResult<R>,
    ) -> PlatformResult<R> {
        let lock = self.users.entity_lock(&user_id);
        let _guard = lock.lock();

        self.users.commit(|users| {
            let user = users
                .iter_mut()
                .find(|u| u.id == user_id)
                .ok_or_else(|| PlatformError::not_found("user", user_id))?;
            mutate(user)
        })
    }

    fn new_entry(&self, kind: EntryKind, amount: u64, description: String) -> PointHistoryEntry {
        PointHistoryEntry {
            id: self.entry_ids.next_id(),
            date: today(),
            description,
            amount,
            kind,
        }
    }

    fn notify(&self, user_id: UserId) {
        self.notifier.publish(PlatformEvent::UsersChanged {
            user_id: Some(user_id),
        });
    }
}

fn require_positive(amount: u64) -> PlatformResult<()> {
    if amount == 0 {
        return Err(PlatformError::Validation(
            "point amount must be positive".into(),
        ));
    }
    Ok(())
}

fn checked_credit(balance: u64, amount: u64) -> PlatformResult<u64> {
    balance
        .checked_add(amount)
        .ok_or_else(|| PlatformError::Validation("point balance overflow".into()))
}
