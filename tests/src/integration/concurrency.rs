//! Races the per-entity locking discipline must win: double confirms,
//! concurrent debits against one wallet, and interleaved commits on the
//! same collection.

#[cfg(test)]
mod tests {
    use crate::support::{alun_alun, seeded_platform, BAYU, SITI};
    use platform_runtime::Caller;
    use shared_types::{PlatformError, RedemptionItem};
    use std::sync::Arc;
    use std::thread;

    /// Two simultaneous confirms of the same pending request: exactly one
    /// succeeds, the other observes the terminal state, and the balance
    /// increases exactly once.
    #[test]
    fn test_concurrent_confirms_award_once() {
        for _ in 0..10 {
            let (platform, _store) = seeded_platform();
            let service = platform.service.clone();

            let request = service
                .request_deposit(&Caller::user(BAYU), 2.0, alun_alun(), None)
                .unwrap();

            let results: Vec<_> = (0..2)
                .map(|_| {
                    let service = Arc::clone(&service);
                    let id = request.id;
                    thread::spawn(move || service.confirm_deposit(&Caller::admin(), id))
                })
                .collect::<Vec<_>>()
                .into_iter()
                .map(|h| h.join().unwrap())
                .collect();

            let confirmed = results.iter().filter(|r| r.is_ok()).count();
            let invalid = results
                .iter()
                .filter(|r| matches!(r, Err(PlatformError::InvalidState { .. })))
                .count();

            assert_eq!(confirmed, 1, "exactly one confirm must win");
            assert_eq!(invalid, 1, "the loser must see the terminal state");
            assert_eq!(service.balance(&Caller::user(BAYU), BAYU).unwrap(), 200);
            assert_eq!(service.history(&Caller::user(BAYU), BAYU).unwrap().len(), 1);
        }
    }

    /// Concurrent debits can never spend more than the wallet holds.
    #[test]
    fn test_concurrent_debits_never_oversell() {
        let (platform, _store) = seeded_platform();
        let service = platform.service.clone();

        // Siti holds 300; four threads try to take 100 each.
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let service = Arc::clone(&service);
                thread::spawn(move || {
                    service.create_redemption(
                        &Caller::user(SITI),
                        vec![RedemptionItem {
                            product_id: 5,
                            name: "Set Alat Tulis Eco".into(),
                            points: 100,
                            quantity: 1,
                        }],
                    )
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let succeeded = results.iter().filter(|r| r.is_ok()).count();
        let short = results
            .iter()
            .filter(|r| matches!(r, Err(PlatformError::InsufficientBalance { .. })))
            .count();

        assert_eq!(succeeded, 3, "only three 100-point charges fit in 300");
        assert_eq!(short, 1);
        assert_eq!(service.balance(&Caller::user(SITI), SITI).unwrap(), 0);
        assert_eq!(service.history(&Caller::user(SITI), SITI).unwrap().len(), 3);
    }

    /// Credits to different users interleave without losing updates even
    /// though they rewrite the same collection.
    #[test]
    fn test_interleaved_wallet_updates_lose_nothing() {
        let (platform, _store) = seeded_platform();
        let service = platform.service.clone();

        let handles: Vec<_> = (0..6)
            .map(|i| {
                let service = Arc::clone(&service);
                thread::spawn(move || {
                    let user = if i % 2 == 0 { BAYU } else { SITI };
                    let request = service
                        .request_deposit(&Caller::user(user), 1.0, alun_alun(), None)
                        .unwrap();
                    service.confirm_deposit(&Caller::admin(), request.id).unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        // Three confirmed liters each: +300 points per wallet.
        assert_eq!(service.balance(&Caller::user(BAYU), BAYU).unwrap(), 300);
        assert_eq!(service.balance(&Caller::user(SITI), SITI).unwrap(), 600);
        assert_eq!(service.stats().pending_deposits, 0);
    }
}
