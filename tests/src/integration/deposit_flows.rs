//! Deposit lifecycle: submit → confirm/reject, exactly-once transitions,
//! and the rollback path when the request fails to persist after the award.

#[cfg(test)]
mod tests {
    use crate::support::{alun_alun, seeded_platform, BAYU};
    use jb_store::Collection;
    use platform_runtime::Caller;
    use shared_types::{DepositStatus, EntryKind, PlatformError};

    /// A user with 0 points deposits 2.0 L at a drop point; after admin
    /// confirmation the balance is 200 with a single earn entry.
    #[test]
    fn test_deposit_happy_path() {
        let (platform, _store) = seeded_platform();
        let service = &platform.service;

        let request = service
            .request_deposit(&Caller::user(BAYU), 2.0, alun_alun(), None)
            .unwrap();
        assert_eq!(request.status, DepositStatus::Pending);
        assert_eq!(request.points, 200);
        assert_eq!(service.balance(&Caller::user(BAYU), BAYU).unwrap(), 0);

        let confirmed = service.confirm_deposit(&Caller::admin(), request.id).unwrap();
        assert_eq!(confirmed.status, DepositStatus::Confirmed);

        assert_eq!(service.balance(&Caller::user(BAYU), BAYU).unwrap(), 200);
        let history = service.history(&Caller::user(BAYU), BAYU).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].kind, EntryKind::Earn);
        assert_eq!(history[0].amount, 200);
        assert_eq!(history[0].description, "Setor Jelantah 2L");
    }

    #[test]
    fn test_confirm_updates_deposit_totals() {
        let (platform, _store) = seeded_platform();
        let service = &platform.service;

        let request = service
            .request_deposit(&Caller::user(BAYU), 2.0, alun_alun(), None)
            .unwrap();
        service.confirm_deposit(&Caller::admin(), request.id).unwrap();

        let stats = service.stats();
        assert_eq!(stats.total_deposited_liters, 2.0);
        assert_eq!(stats.total_co2_saved_kg, 5); // 2.0 L * 2.5 kg/L
    }

    /// Confirming the same request twice mutates the balance exactly once;
    /// the second call surfaces the duplicate as an error.
    #[test]
    fn test_confirm_is_exactly_once() {
        let (platform, _store) = seeded_platform();
        let service = &platform.service;

        let request = service
            .request_deposit(&Caller::user(BAYU), 1.0, alun_alun(), None)
            .unwrap();

        service.confirm_deposit(&Caller::admin(), request.id).unwrap();
        let err = service
            .confirm_deposit(&Caller::admin(), request.id)
            .unwrap_err();

        assert!(matches!(err, PlatformError::InvalidState { .. }));
        assert_eq!(service.balance(&Caller::user(BAYU), BAYU).unwrap(), 100);
        assert_eq!(service.history(&Caller::user(BAYU), BAYU).unwrap().len(), 1);
    }

    #[test]
    fn test_reject_is_terminal_and_award_free() {
        let (platform, _store) = seeded_platform();
        let service = &platform.service;

        let request = service
            .request_deposit(&Caller::user(BAYU), 1.0, alun_alun(), None)
            .unwrap();

        let rejected = service.reject_deposit(&Caller::admin(), request.id).unwrap();
        assert_eq!(rejected.status, DepositStatus::Rejected);
        assert_eq!(service.balance(&Caller::user(BAYU), BAYU).unwrap(), 0);

        // Neither transition can run again from a terminal state.
        assert!(matches!(
            service.reject_deposit(&Caller::admin(), request.id),
            Err(PlatformError::InvalidState { .. })
        ));
        assert!(matches!(
            service.confirm_deposit(&Caller::admin(), request.id),
            Err(PlatformError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_confirm_unknown_request_is_not_found() {
        let (platform, _store) = seeded_platform();

        let err = platform
            .service
            .confirm_deposit(&Caller::admin(), 424242)
            .unwrap_err();
        assert_eq!(err, PlatformError::not_found("deposit request", 424242));
    }

    /// If the deposit collection cannot be saved after the award went
    /// through, the award is rolled back: the caller sees a persistence
    /// error and nothing changed.
    #[test]
    fn test_confirm_rolls_back_award_when_request_save_fails() {
        let (platform, store) = seeded_platform();
        let service = &platform.service;

        let request = service
            .request_deposit(&Caller::user(BAYU), 2.0, alun_alun(), None)
            .unwrap();

        store.fail_saves_for(Some(Collection::DepositRequests));
        let err = service
            .confirm_deposit(&Caller::admin(), request.id)
            .unwrap_err();
        store.fail_saves_for(None);

        assert!(matches!(err, PlatformError::Persistence(_)));
        assert_eq!(service.balance(&Caller::user(BAYU), BAYU).unwrap(), 0);
        assert!(service.history(&Caller::user(BAYU), BAYU).unwrap().is_empty());

        // The request is still pending and can be confirmed once the store
        // recovers.
        let confirmed = service.confirm_deposit(&Caller::admin(), request.id).unwrap();
        assert_eq!(confirmed.status, DepositStatus::Confirmed);
        assert_eq!(service.balance(&Caller::user(BAYU), BAYU).unwrap(), 200);
    }

    /// A save failure during submission leaves no request behind at all.
    #[test]
    fn test_submit_fails_cleanly_when_store_is_down() {
        let (platform, store) = seeded_platform();
        let service = &platform.service;

        store.fail_saves_for(Some(Collection::DepositRequests));
        let err = service
            .request_deposit(&Caller::user(BAYU), 2.0, alun_alun(), None)
            .unwrap_err();
        store.fail_saves_for(None);

        assert!(matches!(err, PlatformError::Persistence(_)));
        assert!(service.deposit_requests(&Caller::admin()).unwrap().is_empty());
    }
}
