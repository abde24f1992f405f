#[cfg(test)]
mod tests {
    use crate::api_error::ApiError;
    use crate::auth::Identity;
    use crate::models::{CreateTeamRequest, NewTeam, TeamRole, UpdateTeamRequest};
    use crate::service::team_service::TeamService;
    use crate::store::{CreateTeamOutcome, MemoryStore, TeamStore};
    use std::sync::Arc;
    use tokio_test::{assert_err, assert_ok};
    use uuid::Uuid;

    fn create_test_service() -> (Arc<MemoryStore>, TeamService) {
        let store = Arc::new(MemoryStore::new());
        let service = TeamService::new(store.clone());
        (store, service)
    }

    fn create_request(name: &str) -> CreateTeamRequest {
        CreateTeamRequest {
            name: name.to_string(),
            description: Some("Weekend squad".to_string()),
            tag: Some("ALP".to_string()),
            game_id: 3,
        }
    }

    fn update_request(team_id: i64, name: &str) -> UpdateTeamRequest {
        UpdateTeamRequest {
            team_id,
            name: name.to_string(),
            tag: None,
            description: None,
        }
    }

    fn captain() -> Identity {
        Identity::new(Uuid::new_v4(), Some("captain".to_string()))
    }

    #[tokio::test]
    async fn test_create_team_adds_captain_membership() {
        let (store, service) = create_test_service();
        let me = captain();

        let team = assert_ok!(service.create_team(create_request("  Alpha  "), &me).await);
        assert_eq!(team.name, "Alpha");
        assert_eq!(team.captain_user_uuid, me.user_uuid);
        assert!(team.invite_code.starts_with("TEAM_"));

        assert_eq!(store.team_count(), 1);
        assert_eq!(store.member_count(), 1);

        let details = service.get_team(team.id, &me.user_uuid).await.unwrap();
        assert_eq!(details.members.len(), 1);
        assert_eq!(details.members[0].role, TeamRole::Captain);
        assert_eq!(details.members[0].user_name.as_deref(), Some("captain"));
    }

    #[tokio::test]
    async fn test_duplicate_team_name_is_rejected() {
        let (store, service) = create_test_service();

        assert_ok!(service.create_team(create_request("Alpha"), &captain()).await);
        let err = assert_err!(service.create_team(create_request("Alpha"), &captain()).await);

        assert!(matches!(err, ApiError::DuplicateName(_)));
        assert_eq!(store.team_count(), 1);
        assert_eq!(store.member_count(), 1);
    }

    #[tokio::test]
    async fn test_create_team_validation() {
        let (store, service) = create_test_service();

        let err = assert_err!(service.create_team(create_request(" A "), &captain()).await);
        assert!(matches!(err, ApiError::Validation(_)));

        let mut no_game = create_request("Alpha");
        no_game.game_id = 0;
        let err = assert_err!(service.create_team(no_game, &captain()).await);
        assert!(matches!(err, ApiError::Validation(_)));

        assert_eq!(store.team_count(), 0);
        assert_eq!(store.member_count(), 0);
    }

    #[tokio::test]
    async fn test_invite_code_collision_is_reported() {
        let (store, _service) = create_test_service();
        let team = NewTeam {
            name: "Alpha".to_string(),
            tag: None,
            description: None,
            game_id: 1,
            captain_user_uuid: Uuid::new_v4(),
            captain_user_name: None,
        };
        let first = store.create_team(&team, "TEAM_AAAAAAAAA").await.unwrap();
        assert!(matches!(first, CreateTeamOutcome::Created(_)));

        let other = NewTeam {
            name: "Bravo".to_string(),
            ..team
        };
        let second = store.create_team(&other, "TEAM_AAAAAAAAA").await.unwrap();
        assert!(matches!(second, CreateTeamOutcome::InviteCodeTaken));
        assert_eq!(store.team_count(), 1);
    }

    #[tokio::test]
    async fn test_non_captain_update_is_forbidden() {
        let (store, service) = create_test_service();
        let me = captain();
        let team = service.create_team(create_request("Alpha"), &me).await.unwrap();

        let member = Uuid::new_v4();
        store.seed_member(team.id, member, TeamRole::Member);

        let err = assert_err!(
            service
                .update_team(update_request(team.id, "Hijacked"), &member)
                .await
        );
        assert!(matches!(err, ApiError::Forbidden(_)));

        let details = service.get_team(team.id, &me.user_uuid).await.unwrap();
        assert_eq!(details.team.name, "Alpha");
        assert_eq!(details.team.tag.as_deref(), Some("ALP"));
    }

    #[tokio::test]
    async fn test_captain_update_and_rename_conflict() {
        let (_store, service) = create_test_service();
        let me = captain();
        let alpha = service.create_team(create_request("Alpha"), &me).await.unwrap();
        service
            .create_team(create_request("Bravo"), &captain())
            .await
            .unwrap();

        let updated = assert_ok!(
            service
                .update_team(update_request(alpha.id, "Alpha Prime"), &me.user_uuid)
                .await
        );
        assert_eq!(updated.name, "Alpha Prime");
        assert!(updated.tag.is_none());

        // Keeping the current name is not a conflict with itself.
        assert_ok!(
            service
                .update_team(update_request(alpha.id, "Alpha Prime"), &me.user_uuid)
                .await
        );

        let err = assert_err!(
            service
                .update_team(update_request(alpha.id, "Bravo"), &me.user_uuid)
                .await
        );
        assert!(matches!(err, ApiError::DuplicateName(_)));
    }

    #[tokio::test]
    async fn test_get_team_visibility() {
        let (store, service) = create_test_service();
        let me = captain();
        let team = service.create_team(create_request("Alpha"), &me).await.unwrap();
        let member = Uuid::new_v4();
        store.seed_member(team.id, member, TeamRole::Member);

        let details = assert_ok!(service.get_team(team.id, &member).await);
        assert_eq!(details.members.len(), 2);
        assert_eq!(details.members[0].user_uuid, me.user_uuid);

        let err = assert_err!(service.get_team(team.id, &Uuid::new_v4()).await);
        assert!(matches!(err, ApiError::Forbidden(_)));

        let err = assert_err!(service.get_team(999, &me.user_uuid).await);
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_team_is_captain_only() {
        let (store, service) = create_test_service();
        let me = captain();
        let team = service.create_team(create_request("Alpha"), &me).await.unwrap();
        let member = Uuid::new_v4();
        store.seed_member(team.id, member, TeamRole::Member);

        let err = assert_err!(service.delete_team(team.id, &member).await);
        assert!(matches!(err, ApiError::Forbidden(_)));
        assert_eq!(store.team_count(), 1);

        assert_ok!(service.delete_team(team.id, &me.user_uuid).await);
        assert_eq!(store.team_count(), 0);
        assert_eq!(store.member_count(), 0);
    }

    #[tokio::test]
    async fn test_list_my_teams() {
        let (store, service) = create_test_service();
        let me = captain();
        let alpha = service.create_team(create_request("Alpha"), &me).await.unwrap();
        let bravo = service
            .create_team(create_request("Bravo"), &captain())
            .await
            .unwrap();
        store.seed_member(bravo.id, me.user_uuid, TeamRole::Member);

        let mine = service.list_my_teams(&me.user_uuid).await.unwrap();
        let ids: Vec<i64> = mine.iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&alpha.id));
        assert!(ids.contains(&bravo.id));

        assert!(service
            .list_my_teams(&Uuid::new_v4())
            .await
            .unwrap()
            .is_empty());
    }
}
