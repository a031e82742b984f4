//! Construction of the platform in dependency order.
//!
//! Leaf-first: store → repositories → ledger → workflows → service. All
//! repositories share one store handle so every collection lives in the
//! same data directory (or the same in-memory map under test).

use crate::service::PlatformService;
use jb_deposits::DepositWorkflow;
use jb_ledger::LedgerEngine;
use jb_redemptions::RedemptionWorkflow;
use jb_store::{
    CollectionStore, InMemoryStore, JsonFileStore, Repository,
};
use shared_bus::{EventPublisher, InMemoryEventBus};
use shared_types::{
    CategoryOverride, DepositRequest, DropPoint, FixedWindowLimiter, PlatformConfig, PlatformResult,
    Product, RedemptionTransaction, User,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// A fully wired platform.
pub struct Platform {
    pub service: Arc<PlatformService>,
    pub bus: Arc<InMemoryEventBus>,
    pub limiter: Arc<FixedWindowLimiter>,
}

/// Wire every component on top of an already-open store.
pub fn build(store: Arc<dyn CollectionStore>, config: PlatformConfig) -> PlatformResult<Platform> {
    let config = Arc::new(config);
    let bus = Arc::new(InMemoryEventBus::new());
    let publisher: Arc<dyn EventPublisher> = bus.clone();
    let limiter = Arc::new(FixedWindowLimiter::new());

    let users: Arc<Repository<User>> = Arc::new(Repository::open(store.clone())?);
    let products: Arc<Repository<Product>> = Arc::new(Repository::open(store.clone())?);
    let drop_points: Arc<Repository<DropPoint>> = Arc::new(Repository::open(store.clone())?);
    let deposits: Arc<Repository<DepositRequest>> = Arc::new(Repository::open(store.clone())?);
    let transactions: Arc<Repository<RedemptionTransaction>> =
        Arc::new(Repository::open(store.clone())?);
    let overrides: Arc<Repository<CategoryOverride>> = Arc::new(Repository::open(store)?);

    let ledger = Arc::new(LedgerEngine::new(
        users.clone(),
        publisher.clone(),
        config.clone(),
    ));
    let deposit_workflow = Arc::new(DepositWorkflow::new(
        deposits,
        drop_points.clone(),
        ledger.clone(),
        publisher.clone(),
        config.clone(),
    ));
    let redemption_workflow = Arc::new(RedemptionWorkflow::new(
        transactions,
        ledger.clone(),
        publisher,
        config.clone(),
    ));

    let service = Arc::new(PlatformService::new(
        config,
        users,
        products,
        drop_points,
        overrides,
        ledger,
        deposit_workflow,
        redemption_workflow,
        limiter.clone(),
        bus.clone(),
    ));

    info!("Platform wired");
    Ok(Platform {
        service,
        bus,
        limiter,
    })
}

/// Open the flat-file store in `data_dir` and wire the platform on it.
pub fn open(data_dir: &Path, config: PlatformConfig) -> PlatformResult<Platform> {
    let store = Arc::new(JsonFileStore::open(data_dir)?);
    build(store, config)
}

/// Wire the platform on a fresh in-memory store. The store handle is
/// returned so tests can seed collections and inject save failures.
pub fn open_in_memory(config: PlatformConfig) -> PlatformResult<(Platform, Arc<InMemoryStore>)> {
    let store = Arc::new(InMemoryStore::new());
    let platform = build(store.clone(), config)?;
    Ok((platform, store))
}

/// Background task that prunes expired rate-limit windows.
pub async fn limiter_sweep_task(limiter: Arc<FixedWindowLimiter>, interval: Duration) {
    let mut sweep_interval = tokio::time::interval(interval);
    sweep_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        sweep_interval.tick().await;
        limiter.sweep();
    }
}
