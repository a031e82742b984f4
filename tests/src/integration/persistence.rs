//! Durability: state written through the workflows survives a full restart
//! of the platform over the same data directory.

#[cfg(test)]
mod tests {
    use jb_store::{CollectionStore, JsonFileStore, Repository};
    use platform_runtime::{wiring, Caller};
    use shared_types::{
        DepositMethod, DropPoint, DropPointStatus, PlatformConfig, RedemptionStatus, Role, User,
    };
    use std::sync::Arc;

    fn seed_dir(dir: &std::path::Path) {
        let store = Arc::new(JsonFileStore::open(dir).unwrap());

        let users: Repository<User> =
            Repository::open(store.clone() as Arc<dyn CollectionStore>).unwrap();
        users
            .commit(|list| {
                list.push(User {
                    id: 1,
                    username: "siti".into(),
                    name: "Siti Aminah".into(),
                    email: "siti@example.com".into(),
                    points: 300,
                    total_deposited: 0.0,
                    co2_saved: 0,
                    point_history: vec![],
                    join_date: None,
                    role: Role::User,
                });
                Ok(())
            })
            .unwrap();

        let drop_points: Repository<DropPoint> =
            Repository::open(store as Arc<dyn CollectionStore>).unwrap();
        drop_points
            .commit(|list| {
                list.push(DropPoint {
                    id: 1,
                    name: "Drop Point Alun-Alun".into(),
                    address: "Jl. Jend. Sudirman, Cilacap Tengah".into(),
                    status: DropPointStatus::Open,
                    hours: "08:00 - 17:00".into(),
                    phone: "0812-3456-7890".into(),
                    area: None,
                });
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn test_state_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        seed_dir(dir.path());

        let voucher_code;
        {
            let platform = wiring::open(dir.path(), PlatformConfig::default()).unwrap();
            let service = &platform.service;

            let request = service
                .request_deposit(
                    &Caller::user(1),
                    2.0,
                    DepositMethod::DropPoint {
                        location: "Drop Point Alun-Alun".into(),
                    },
                    None,
                )
                .unwrap();
            service.confirm_deposit(&Caller::admin(), request.id).unwrap();

            let voucher = service
                .create_redemption(
                    &Caller::user(1),
                    vec![shared_types::RedemptionItem {
                        product_id: 1,
                        name: "Sabun Cuci Piring".into(),
                        points: 200,
                        quantity: 1,
                    }],
                )
                .unwrap();
            voucher_code = voucher.id.clone();

            assert_eq!(service.balance(&Caller::user(1), 1).unwrap(), 300);
        }

        // Reopen the same directory: wallets, history and the pending
        // voucher are all still there.
        let reopened = wiring::open(dir.path(), PlatformConfig::default()).unwrap();
        let service = &reopened.service;

        assert_eq!(service.balance(&Caller::user(1), 1).unwrap(), 300);
        let history = service.history(&Caller::user(1), 1).unwrap();
        assert_eq!(history.len(), 2);

        let voucher = service.lookup_redemption(&voucher_code).unwrap();
        assert_eq!(voucher.status, RedemptionStatus::Pending);

        // And the restarted platform keeps working.
        service
            .complete_redemption(&Caller::admin(), &voucher_code)
            .unwrap();
        let stats = service.stats();
        assert_eq!(stats.total_deposited_liters, 2.0);
        assert_eq!(stats.pending_redemptions, 0);
    }
}
