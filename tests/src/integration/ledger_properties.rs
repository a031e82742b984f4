//! Ledger invariants observed through whole flows: balance/history
//! agreement and the non-negative balance guarantee.

#[cfg(test)]
mod tests {
    use crate::support::{alun_alun, seeded_platform, BAYU, BUDI, SITI};
    use platform_runtime::Caller;
    use shared_types::{EntryKind, PlatformError, PointHistoryEntry, RedemptionItem};

    fn history_sum(history: &[PointHistoryEntry]) -> i64 {
        history
            .iter()
            .map(|e| match e.kind {
                EntryKind::Earn => e.amount as i64,
                EntryKind::Redeem => -(e.amount as i64),
            })
            .sum()
    }

    /// After a mixed sequence of deposits, redemptions and a cancellation,
    /// every wallet still satisfies balance == initial + earns - redeems.
    #[test]
    fn test_balance_always_agrees_with_history() {
        let (platform, _store) = seeded_platform();
        let service = &platform.service;
        let initial = [(BAYU, 0i64), (SITI, 300), (BUDI, 50)];

        // Bayu: deposit 3.0 L, redeem 100, deposit 0.5 L.
        let r1 = service
            .request_deposit(&Caller::user(BAYU), 3.0, alun_alun(), None)
            .unwrap();
        service.confirm_deposit(&Caller::admin(), r1.id).unwrap();
        service
            .create_redemption(
                &Caller::user(BAYU),
                vec![RedemptionItem {
                    product_id: 5,
                    name: "Set Alat Tulis Eco".into(),
                    points: 100,
                    quantity: 1,
                }],
            )
            .unwrap();
        let r2 = service
            .request_deposit(&Caller::user(BAYU), 0.5, alun_alun(), None)
            .unwrap();
        service.confirm_deposit(&Caller::admin(), r2.id).unwrap();

        // Siti: redeem 200 then cancel it.
        let voucher = service
            .create_redemption(
                &Caller::user(SITI),
                vec![RedemptionItem {
                    product_id: 1,
                    name: "Sabun Cuci Piring".into(),
                    points: 200,
                    quantity: 1,
                }],
            )
            .unwrap();
        service
            .cancel_redemption(&Caller::admin(), &voucher.id)
            .unwrap();

        for (user_id, start) in initial {
            let caller = Caller::user(user_id);
            let balance = service.balance(&caller, user_id).unwrap() as i64;
            let history = service.history(&caller, user_id).unwrap();
            assert_eq!(
                balance,
                start + history_sum(&history),
                "wallet {user_id} disagrees with its ledger"
            );
        }
    }

    #[test]
    fn test_debit_never_goes_negative() {
        let (platform, _store) = seeded_platform();
        let service = &platform.service;

        // Budi has 50 points; a 200-point redemption must fail whole.
        let err = service
            .create_redemption(
                &Caller::user(BUDI),
                vec![RedemptionItem {
                    product_id: 1,
                    name: "Sabun Cuci Piring".into(),
                    points: 200,
                    quantity: 1,
                }],
            )
            .unwrap_err();
        assert!(matches!(err, PlatformError::InsufficientBalance { .. }));

        // Draining to exactly zero is allowed.
        service
            .create_redemption(
                &Caller::user(BUDI),
                vec![RedemptionItem {
                    product_id: 5,
                    name: "Set Alat Tulis Eco".into(),
                    points: 50,
                    quantity: 1,
                }],
            )
            .unwrap();
        assert_eq!(service.balance(&Caller::user(BUDI), BUDI).unwrap(), 0);

        // And the empty wallet refuses the next charge.
        let err = service
            .create_redemption(
                &Caller::user(BUDI),
                vec![RedemptionItem {
                    product_id: 5,
                    name: "Set Alat Tulis Eco".into(),
                    points: 1,
                    quantity: 1,
                }],
            )
            .unwrap_err();
        assert_eq!(
            err,
            PlatformError::InsufficientBalance {
                required: 1,
                available: 0
            }
        );
    }

    #[test]
    fn test_history_ids_order_entries_newest_first() {
        let (platform, _store) = seeded_platform();
        let service = &platform.service;

        for liters in [1.0, 2.0, 3.0] {
            let request = service
                .request_deposit(&Caller::user(BAYU), liters, alun_alun(), None)
                .unwrap();
            service.confirm_deposit(&Caller::admin(), request.id).unwrap();
        }

        let history = service.history(&Caller::user(BAYU), BAYU).unwrap();
        assert_eq!(history.len(), 3);
        assert!(history[0].id > history[1].id);
        assert!(history[1].id > history[2].id);
        assert_eq!(history[0].description, "Setor Jelantah 3L");
        assert_eq!(history[2].description, "Setor Jelantah 1L");
    }
}
