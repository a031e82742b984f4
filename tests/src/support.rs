//! Shared fixtures for the integration suite.
//!
//! Every test gets a freshly wired platform over an in-memory store, seeded
//! with a small cast of users, the product catalog entries the scenarios
//! reference, and a pair of drop points (one open, one closed). The store
//! handle is returned so tests can inject save failures.

use jb_store::{CollectionStore, InMemoryStore, Repository};
use platform_runtime::wiring::{self, Platform};
use shared_types::{
    DepositMethod, DropPoint, DropPointStatus, PlatformConfig, Product, RedemptionItem, Role,
    User, UserId,
};
use std::sync::Arc;

/// Bayu starts at zero, Siti can afford the expensive items, Budi cannot.
pub const BAYU: UserId = 1;
pub const SITI: UserId = 2;
pub const BUDI: UserId = 3;

/// A wired platform over a seeded in-memory store.
pub fn seeded_platform() -> (Platform, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    seed(&store);
    let platform = wiring::build(store.clone(), PlatformConfig::default())
        .expect("platform wiring should succeed");
    (platform, store)
}

fn seed(store: &Arc<InMemoryStore>) {
    let users: Repository<User> =
        Repository::open(store.clone() as Arc<dyn CollectionStore>).expect("open users");
    users
        .commit(|list| {
            list.push(user(BAYU, "bayu", "Bayu Prasetio", 0));
            list.push(user(SITI, "siti", "Siti Aminah", 300));
            list.push(user(BUDI, "budi", "Budi Santoso", 50));
            Ok(())
        })
        .expect("seed users");

    let drop_points: Repository<DropPoint> =
        Repository::open(store.clone() as Arc<dyn CollectionStore>).expect("open drop points");
    drop_points
        .commit(|list| {
            list.push(DropPoint {
                id: 1,
                name: "Drop Point Alun-Alun".into(),
                address: "Jl. Jend. Sudirman, Cilacap Tengah".into(),
                status: DropPointStatus::Open,
                hours: "08:00 - 17:00".into(),
                phone: "0812-3456-7890".into(),
                area: Some("Cilacap Tengah".into()),
            });
            list.push(DropPoint {
                id: 2,
                name: "Drop Point Adipala".into(),
                address: "Jl. Laut, Adipala".into(),
                status: DropPointStatus::Closed,
                hours: "08:00 - 16:00".into(),
                phone: "0815-9876-1234".into(),
                area: Some("Adipala".into()),
            });
            Ok(())
        })
        .expect("seed drop points");

    let products: Repository<Product> =
        Repository::open(store.clone() as Arc<dyn CollectionStore>).expect("open products");
    products
        .commit(|list| {
            list.push(Product {
                id: 1,
                name: "Sabun Cuci Piring".into(),
                description: "Sabun cuci piring ramah lingkungan 450ml".into(),
                points: 200,
                category: "Kebersihan".into(),
                stock: 50,
            });
            list.push(Product {
                id: 3,
                name: "Voucher Bensin".into(),
                description: "Voucher bensin senilai Rp 20.000".into(),
                points: 500,
                category: "Bahan Bakar".into(),
                stock: 100,
            });
            Ok(())
        })
        .expect("seed products");
}

fn user(id: UserId, username: &str, name: &str, points: u64) -> User {
    User {
        id,
        username: username.into(),
        name: name.into(),
        email: format!("{username}@example.com"),
        points,
        total_deposited: 0.0,
        co2_saved: 0,
        point_history: vec![],
        join_date: None,
        role: Role::User,
    }
}

/// The standard open drop point used by deposit scenarios.
pub fn alun_alun() -> DepositMethod {
    DepositMethod::DropPoint {
        location: "Drop Point Alun-Alun".into(),
    }
}

/// One unit of the 200-point dish soap.
pub fn soap_item() -> RedemptionItem {
    RedemptionItem {
        product_id: 1,
        name: "Sabun Cuci Piring".into(),
        points: 200,
        quantity: 1,
    }
}
