#[cfg(test)]
mod tests {
    use crate::api_error::ApiError;
    use crate::auth::Identity;
    use crate::config::AdminConfig;
    use crate::models::{Registration, Tournament, TournamentStatus, TransactionType};
    use crate::service::tournament_service::TournamentService;
    use crate::store::{MemoryStore, TournamentStore, WalletStore};
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;
    use std::sync::Arc;
    use tokio_test::{assert_err, assert_ok};
    use uuid::Uuid;

    fn tournament(
        id: i64,
        status: TournamentStatus,
        max: i32,
        current: i32,
        fee: i64,
    ) -> Tournament {
        let now = Utc::now();
        Tournament {
            id,
            name: "Friday Cup".to_string(),
            game_id: 1,
            status,
            max_players: max,
            current_players: current,
            entry_fee: Decimal::new(fee, 0),
            starts_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn player() -> Identity {
        Identity::new(Uuid::new_v4(), Some("player".to_string()))
    }

    /// Helper to create a service over a fresh in-memory store
    fn create_test_service(admins: Vec<Uuid>) -> (Arc<MemoryStore>, TournamentService) {
        let store = Arc::new(MemoryStore::new());
        let service = TournamentService::new(
            store.clone(),
            Duration::seconds(300),
            AdminConfig { user_uuids: admins },
        );
        (store, service)
    }

    #[tokio::test]
    async fn test_join_increments_player_count() {
        let (store, service) = create_test_service(vec![]);
        store.seed_tournament(tournament(1, TournamentStatus::Registration, 4, 0, 0));

        let receipt = assert_ok!(service.join(1, &player()).await);
        assert_eq!(receipt.current_players, 1);
        assert!(!receipt.already_registered);

        let stored = service.get_tournament(1).await.unwrap();
        assert_eq!(stored.current_players, 1);
        assert_eq!(store.registration_count(1), 1);
    }

    #[tokio::test]
    async fn test_duplicate_join_is_idempotent() {
        let (store, service) = create_test_service(vec![]);
        store.seed_tournament(tournament(1, TournamentStatus::Upcoming, 4, 0, 0));
        let me = player();

        assert_ok!(service.join(1, &me).await);
        let again = assert_ok!(service.join(1, &me).await);

        assert!(again.already_registered);
        assert_eq!(again.current_players, 1);
        assert_eq!(store.registration_count(1), 1);
    }

    #[tokio::test]
    async fn test_join_unknown_tournament() {
        let (_store, service) = create_test_service(vec![]);
        let err = assert_err!(service.join(404, &player()).await);
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_join_outside_registration_window() {
        let (store, service) = create_test_service(vec![]);
        store.seed_tournament(tournament(1, TournamentStatus::Live, 4, 0, 0));

        let err = assert_err!(service.join(1, &player()).await);
        assert!(matches!(err, ApiError::RegistrationClosed));
        assert_eq!(store.registration_count(1), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_joins_for_last_slot() {
        let (store, service) = create_test_service(vec![]);
        store.seed_tournament(tournament(7, TournamentStatus::Registration, 10, 9, 0));
        let service = Arc::new(service);

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.join(7, &player()).await })
            })
            .collect();

        let mut joined = 0;
        let mut full = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(receipt) => {
                    assert!(!receipt.already_registered);
                    joined += 1;
                }
                Err(ApiError::TournamentFull) => full += 1,
                Err(other) => panic!("unexpected error {:?}", other),
            }
        }

        assert_eq!(joined, 1);
        assert_eq!(full, 15);
        let stored = service.get_tournament(7).await.unwrap();
        assert_eq!(stored.current_players, 10);
        assert_eq!(store.registration_count(7), 1);
    }

    #[tokio::test]
    async fn test_unregister_within_cooldown_is_rejected() {
        let (store, service) = create_test_service(vec![]);
        store.seed_tournament(tournament(1, TournamentStatus::Registration, 4, 1, 5));
        let me = player();
        store.seed_registration(Registration::new(
            1,
            me.user_uuid,
            None,
            Utc::now() - Duration::seconds(61),
        ));

        let err = assert_err!(service.unregister(1, &me).await);
        assert!(matches!(err, ApiError::CooldownActive { minutes: 4 }));
        assert!(err.to_string().contains("please wait 4 minutes"));
        assert_eq!(store.registration_count(1), 1);
    }

    #[tokio::test]
    async fn test_unregister_without_registration() {
        let (store, service) = create_test_service(vec![]);
        store.seed_tournament(tournament(1, TournamentStatus::Registration, 4, 0, 5));

        let err = assert_err!(service.unregister(1, &player()).await);
        assert!(matches!(err, ApiError::NotRegistered));
    }

    #[tokio::test]
    async fn test_unregister_refunds_entry_fee_once() {
        let (store, service) = create_test_service(vec![]);
        store.seed_tournament(tournament(42, TournamentStatus::Registration, 4, 1, 5));
        let me = player();
        store.seed_registration(Registration::new(
            42,
            me.user_uuid,
            None,
            Utc::now() - Duration::minutes(10),
        ));

        let receipt = assert_ok!(service.unregister(42, &me).await);
        assert_eq!(receipt.refund_amount, Decimal::new(5, 0));
        assert_eq!(receipt.current_players, 0);

        let wallet = store.get_wallet(me.user_uuid).await.unwrap().unwrap();
        assert_eq!(wallet.balance, Decimal::new(5, 0));

        let transactions = store.list_transactions(me.user_uuid, 20).await.unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].transaction_type, TransactionType::Refund);
        assert_eq!(transactions[0].amount, Decimal::new(5, 0));
        assert_eq!(transactions[0].reference_id.as_deref(), Some("42"));

        // A second withdrawal finds no registration and credits nothing.
        let err = assert_err!(service.unregister(42, &me).await);
        assert!(matches!(err, ApiError::NotRegistered));
        let wallet = store.get_wallet(me.user_uuid).await.unwrap().unwrap();
        assert_eq!(wallet.balance, Decimal::new(5, 0));
    }

    #[tokio::test]
    async fn test_free_tournament_unregister_has_no_refund() {
        let (store, service) = create_test_service(vec![]);
        store.seed_tournament(tournament(3, TournamentStatus::Upcoming, 4, 1, 0));
        let me = player();
        store.seed_registration(Registration::new(
            3,
            me.user_uuid,
            None,
            Utc::now() - Duration::minutes(6),
        ));

        let receipt = assert_ok!(service.unregister(3, &me).await);
        assert_eq!(receipt.refund_amount, Decimal::ZERO);
        assert!(store.get_wallet(me.user_uuid).await.unwrap().is_none());
        assert!(store
            .list_transactions(me.user_uuid, 20)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_unregister_with_drifted_counter_stays_at_zero() {
        let (store, service) = create_test_service(vec![]);
        store.seed_tournament(tournament(9, TournamentStatus::Registration, 4, 0, 5));
        let me = player();
        store.seed_registration(Registration::new(
            9,
            me.user_uuid,
            None,
            Utc::now() - Duration::minutes(10),
        ));

        let receipt = assert_ok!(service.unregister(9, &me).await);
        assert_eq!(receipt.current_players, 0);
        assert_eq!(receipt.refund_amount, Decimal::new(5, 0));
        assert_eq!(service.get_tournament(9).await.unwrap().current_players, 0);
        assert_eq!(store.registration_count(9), 0);
    }

    #[tokio::test]
    async fn test_registration_lifecycle_scenario() {
        let (store, service) = create_test_service(vec![]);
        store.seed_tournament(tournament(42, TournamentStatus::Registration, 2, 1, 5));
        let a = player();
        let b = player();

        let joined = assert_ok!(service.join(42, &a).await);
        assert_eq!(joined.current_players, 2);

        let err = assert_err!(service.join(42, &b).await);
        assert_eq!(err.to_string(), "Tournament is full");

        let again = assert_ok!(service.join(42, &a).await);
        assert!(again.already_registered);
        assert_eq!(again.current_players, 2);

        let err = assert_err!(service.unregister(42, &a).await);
        assert!(err.to_string().contains("please wait 5 minutes"));

        let later = Utc::now() + Duration::seconds(301);
        let withdrawal = store
            .unregister(42, a.user_uuid, later, Duration::seconds(300))
            .await
            .unwrap();
        assert_eq!(withdrawal.current_players, 1);
        assert_eq!(withdrawal.refund.map(|r| r.amount), Some(Decimal::new(5, 0)));

        let wallet = store.get_wallet(a.user_uuid).await.unwrap().unwrap();
        assert_eq!(wallet.balance, Decimal::new(5, 0));
        let refunds: Vec<_> = store
            .list_transactions(a.user_uuid, 20)
            .await
            .unwrap()
            .into_iter()
            .filter(|t| t.transaction_type == TransactionType::Refund)
            .collect();
        assert_eq!(refunds.len(), 1);
    }

    #[tokio::test]
    async fn test_status_change_requires_admin() {
        let admin = Uuid::new_v4();
        let (store, service) = create_test_service(vec![admin]);
        store.seed_tournament(tournament(1, TournamentStatus::Draft, 8, 0, 0));

        let err = assert_err!(
            service
                .update_status(1, TournamentStatus::Registration, &Uuid::new_v4())
                .await
        );
        assert!(matches!(err, ApiError::Forbidden(_)));

        let updated = assert_ok!(
            service
                .update_status(1, TournamentStatus::Registration, &admin)
                .await
        );
        assert_eq!(updated.status, TournamentStatus::Registration);

        let err = assert_err!(
            service
                .update_status(1, TournamentStatus::Completed, &admin)
                .await
        );
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_list_filters_by_status() {
        let (store, service) = create_test_service(vec![]);
        store.seed_tournament(tournament(1, TournamentStatus::Registration, 8, 0, 0));
        store.seed_tournament(tournament(2, TournamentStatus::Live, 8, 0, 0));

        let all = service.list_tournaments(None).await.unwrap();
        assert_eq!(all.len(), 2);

        let open = service
            .list_tournaments(Some(TournamentStatus::Registration))
            .await
            .unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id, 1);

        let err = assert_err!(service.list_players(99).await);
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
