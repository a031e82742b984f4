//! Platform service - the operation set behind authorization and rate gates.
//!
//! Every operation takes a [`Caller`] the external auth layer has already
//! verified. This layer decides whether that caller may perform the
//! operation and whether the fixed-window limiter admits it, then delegates
//! to the owning workflow. Errors come back as the shared taxonomy for the
//! transport layer to map onto status codes.

use jb_ledger::LedgerEngine;
use jb_deposits::DepositWorkflow;
use jb_redemptions::RedemptionWorkflow;
use jb_store::Repository;
use serde::Serialize;
use shared_bus::{EventFilter, EventPublisher, InMemoryEventBus, PlatformEvent, Subscription};
use shared_types::rate_limiter::presets;
use shared_types::{
    CategoryOverride, DepositMethod, DepositRequest, DepositStatus, DropPoint,
    FixedWindowLimiter, LeaderboardEntry, PlatformConfig, PlatformError, PlatformResult,
    PointHistoryEntry, Product, RateLimitConfig, RateLimitResult, RedemptionItem,
    RedemptionStatus, RedemptionTransaction, Role, User, UserId,
};
use std::sync::Arc;
use tracing::{info, warn};

/// A verified caller identity plus role, as handed over by the auth layer.
#[derive(Clone, Copy, Debug)]
pub struct Caller {
    /// The user this caller acts as, when they have a wallet of their own.
    pub user_id: Option<UserId>,
    pub role: Role,
}

impl Caller {
    /// An ordinary end user.
    #[must_use]
    pub fn user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            role: Role::User,
        }
    }

    /// A moderator without a wallet of their own.
    #[must_use]
    pub fn moderator() -> Self {
        Self {
            user_id: None,
            role: Role::Moderator,
        }
    }

    /// An admin without a wallet of their own.
    #[must_use]
    pub fn admin() -> Self {
        Self {
            user_id: None,
            role: Role::Admin,
        }
    }

    /// Identity component of rate-limit keys.
    fn rate_identity(&self) -> String {
        match self.user_id {
            Some(id) => id.to_string(),
            None => "staff".into(),
        }
    }
}

/// Aggregate figures derived from the current snapshots.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    pub total_users: usize,
    pub total_deposited_liters: f64,
    pub total_co2_saved_kg: u64,
    /// Sum of all current balances.
    pub points_outstanding: u64,
    pub pending_deposits: usize,
    pub pending_redemptions: usize,
}

/// The platform's conceptual operation set, one method per operation.
pub struct PlatformService {
    config: Arc<PlatformConfig>,
    users: Arc<Repository<User>>,
    products: Arc<Repository<Product>>,
    drop_points: Arc<Repository<DropPoint>>,
    overrides: Arc<Repository<CategoryOverride>>,
    ledger: Arc<LedgerEngine>,
    deposits: Arc<DepositWorkflow>,
    redemptions: Arc<RedemptionWorkflow>,
    limiter: Arc<FixedWindowLimiter>,
    bus: Arc<InMemoryEventBus>,
}

impl PlatformService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Arc<PlatformConfig>,
        users: Arc<Repository<User>>,
        products: Arc<Repository<Product>>,
        drop_points: Arc<Repository<DropPoint>>,
        overrides: Arc<Repository<CategoryOverride>>,
        ledger: Arc<LedgerEngine>,
        deposits: Arc<DepositWorkflow>,
        redemptions: Arc<RedemptionWorkflow>,
        limiter: Arc<FixedWindowLimiter>,
        bus: Arc<InMemoryEventBus>,
    ) -> Self {
        Self {
            config,
            users,
            products,
            drop_points,
            overrides,
            ledger,
            deposits,
            redemptions,
            limiter,
            bus,
        }
    }

    // -- deposits ------------------------------------------------------------

    /// Submit an oil drop-off claim for the caller's own wallet.
    pub fn request_deposit(
        &self,
        caller: &Caller,
        liters: f64,
        method: DepositMethod,
        note: Option<String>,
    ) -> PlatformResult<DepositRequest> {
        let user_id = self.require_identity(caller, "request a deposit")?;
        self.deposits.submit(user_id, liters, method, note)
    }

    /// Verify a drop-off and award its points. Staff only, rate limited.
    pub fn confirm_deposit(&self, caller: &Caller, request_id: u64) -> PlatformResult<DepositRequest> {
        self.require_staff(caller, "confirm deposits")?;
        self.gate("deposit-confirm", caller, presets::API_STRICT)?;
        self.deposits.confirm(request_id)
    }

    /// Decline a drop-off claim. Staff only, rate limited.
    pub fn reject_deposit(&self, caller: &Caller, request_id: u64) -> PlatformResult<DepositRequest> {
        self.require_staff(caller, "reject deposits")?;
        self.gate("deposit-confirm", caller, presets::API_STRICT)?;
        self.deposits.reject(request_id)
    }

    /// Deposit requests visible to the caller: staff see all, users their own.
    pub fn deposit_requests(&self, caller: &Caller) -> PlatformResult<Vec<DepositRequest>> {
        if caller.role.is_staff() {
            return Ok(self.deposits.list());
        }
        let user_id = self.require_identity(caller, "list deposit requests")?;
        Ok(self.deposits.list_for_user(user_id))
    }

    // -- redemptions ---------------------------------------------------------

    /// Exchange the caller's points for goods; returns the voucher.
    pub fn create_redemption(
        &self,
        caller: &Caller,
        items: Vec<RedemptionItem>,
    ) -> PlatformResult<RedemptionTransaction> {
        let user_id = self.require_identity(caller, "redeem points")?;
        self.redemptions.create(user_id, items)
    }

    /// Look up a voucher by code. The code itself is the credential.
    pub fn lookup_redemption(&self, code: &str) -> PlatformResult<RedemptionTransaction> {
        self.redemptions.lookup(code)
    }

    /// Confirm a pickup. Staff only, rate limited.
    pub fn complete_redemption(
        &self,
        caller: &Caller,
        code: &str,
    ) -> PlatformResult<RedemptionTransaction> {
        self.require_staff(caller, "complete redemptions")?;
        self.gate("redemption-settle", caller, presets::API_STRICT)?;
        self.redemptions.complete(code)
    }

    /// Cancel a reservation and refund its points. Staff only, rate limited.
    pub fn cancel_redemption(
        &self,
        caller: &Caller,
        code: &str,
    ) -> PlatformResult<RedemptionTransaction> {
        self.require_staff(caller, "cancel redemptions")?;
        self.gate("redemption-settle", caller, presets::API_STRICT)?;
        self.redemptions.cancel(code)
    }

    // -- wallet reads --------------------------------------------------------

    /// A user's current balance. Self or staff.
    pub fn balance(&self, caller: &Caller, user_id: UserId) -> PlatformResult<u64> {
        self.require_self_or_staff(caller, user_id, "read this balance")?;
        self.ledger.balance(user_id)
    }

    /// A user's ledger entries, newest first. Self or staff.
    pub fn history(&self, caller: &Caller, user_id: UserId) -> PlatformResult<Vec<PointHistoryEntry>> {
        self.require_self_or_staff(caller, user_id, "read this history")?;
        self.ledger.history(user_id)
    }

    // -- projections ---------------------------------------------------------

    /// Ranked standings, recomputed from current balances on every call.
    #[must_use]
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        jb_leaderboard::project(&self.users.snapshot(), &self.overrides.snapshot())
    }

    /// Pin a user's leaderboard category. Staff only.
    pub fn set_leaderboard_category(
        &self,
        caller: &Caller,
        user_id: UserId,
        category: String,
    ) -> PlatformResult<()> {
        self.require_staff(caller, "set leaderboard categories")?;
        if category.trim().is_empty() {
            return Err(PlatformError::Validation(
                "category must not be empty".into(),
            ));
        }
        self.users.require(&user_id)?;

        self.overrides.commit(|overrides| {
            match overrides.iter_mut().find(|o| o.user_id == user_id) {
                Some(existing) => existing.category = category.clone(),
                None => overrides.push(CategoryOverride {
                    user_id,
                    category: category.clone(),
                }),
            }
            Ok(())
        })?;

        info!(user_id, "Leaderboard category pinned");
        self.bus.publish(PlatformEvent::LeaderboardChanged);
        Ok(())
    }

    /// Product catalog.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.products.snapshot().as_ref().clone()
    }

    /// Drop point roster.
    #[must_use]
    pub fn drop_points(&self) -> Vec<DropPoint> {
        self.drop_points.snapshot().as_ref().clone()
    }

    /// Aggregate platform figures.
    #[must_use]
    pub fn stats(&self) -> PlatformStats {
        let users = self.users.snapshot();
        let pending_deposits = self
            .deposits
            .list()
            .iter()
            .filter(|r| r.status == DepositStatus::Pending)
            .count();
        let pending_redemptions = self
            .redemptions
            .list()
            .iter()
            .filter(|t| t.status == RedemptionStatus::Pending)
            .count();

        PlatformStats {
            total_users: users.len(),
            total_deposited_liters: users.iter().map(|u| u.total_deposited).sum(),
            total_co2_saved_kg: users.iter().map(|u| u.co2_saved).sum(),
            points_outstanding: users.iter().map(|u| u.points).sum(),
            pending_deposits,
            pending_redemptions,
        }
    }

    // -- infrastructure ------------------------------------------------------

    /// Subscribe to change notifications.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        self.bus.subscribe(filter)
    }

    /// Count a request against a named limit. Exposed so the auth layer can
    /// gate login and registration with the same limiter instance.
    pub fn check_rate(
        &self,
        action: &str,
        identity: &str,
        config: RateLimitConfig,
    ) -> RateLimitResult {
        self.limiter.check(&format!("{action}:{identity}"), config)
    }

    /// Business configuration in effect.
    #[must_use]
    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    // -- guards --------------------------------------------------------------

    fn require_identity(&self, caller: &Caller, action: &'static str) -> PlatformResult<UserId> {
        caller
            .user_id
            .ok_or(PlatformError::Unauthorized { action })
    }

    fn require_staff(&self, caller: &Caller, action: &'static str) -> PlatformResult<()> {
        if !caller.role.is_staff() {
            warn!(role = ?caller.role, action, "Rejected non-staff caller");
            return Err(PlatformError::Unauthorized { action });
        }
        Ok(())
    }

    fn require_self_or_staff(
        &self,
        caller: &Caller,
        user_id: UserId,
        action: &'static str,
    ) -> PlatformResult<()> {
        if caller.role.is_staff() || caller.user_id == Some(user_id) {
            return Ok(());
        }
        Err(PlatformError::Unauthorized { action })
    }

    fn gate(
        &self,
        action: &str,
        caller: &Caller,
        config: RateLimitConfig,
    ) -> PlatformResult<()> {
        let result = self.check_rate(action, &caller.rate_identity(), config);
        if !result.allowed {
            warn!(action, identity = %caller.rate_identity(), "Rate limit exceeded");
            return Err(PlatformError::RateLimited {
                retry_after_ms: result.retry_after_ms(),
            });
        }
        Ok(())
    }
}
