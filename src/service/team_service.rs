use crate::api_error::ApiError;
use crate::auth::Identity;
use crate::models::{CreateTeamRequest, NewTeam, Team, TeamChanges, TeamDetails, UpdateTeamRequest};
use crate::service::team_guard;
use crate::store::{CreateTeamOutcome, TeamStore};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

const INVITE_CODE_ATTEMPTS: usize = 3;

pub struct TeamService {
    store: Arc<dyn TeamStore>,
}

impl TeamService {
    pub fn new(store: Arc<dyn TeamStore>) -> Self {
        Self { store }
    }

    /// Creates the team with the caller as captain.
    pub async fn create_team(
        &self,
        request: CreateTeamRequest,
        captain: &Identity,
    ) -> Result<Team, ApiError> {
        let request = request.normalized();
        request.validate()?;

        let new_team = NewTeam {
            name: request.name,
            tag: request.tag,
            description: request.description,
            game_id: request.game_id,
            captain_user_uuid: captain.user_uuid,
            captain_user_name: captain.user_name.clone(),
        };

        for attempt in 1..=INVITE_CODE_ATTEMPTS {
            let invite_code = team_guard::generate_invite_code();

            match self.store.create_team(&new_team, &invite_code).await? {
                CreateTeamOutcome::Created(team) => {
                    info!(
                        team_id = team.id,
                        captain_id = %captain.user_uuid,
                        name = %team.name,
                        "Team created"
                    );
                    return Ok(team);
                }
                CreateTeamOutcome::InviteCodeTaken => {
                    warn!(attempt, "Invite code collision, regenerating");
                }
            }
        }

        Err(ApiError::internal_error(
            "Could not allocate a unique invite code",
        ))
    }

    pub async fn update_team(
        &self,
        request: UpdateTeamRequest,
        caller: &Uuid,
    ) -> Result<Team, ApiError> {
        let request = request.normalized();
        request.validate()?;

        let changes = TeamChanges {
            name: request.name,
            tag: request.tag,
            description: request.description,
        };

        let team = self
            .store
            .update_team(request.team_id, *caller, &changes)
            .await
            .map_err(|e| {
                if matches!(e, ApiError::Forbidden(_)) {
                    warn!(
                        team_id = request.team_id,
                        user_id = %caller,
                        "Non-captain team update"
                    );
                }
                e
            })?;

        info!(team_id = team.id, "Team updated");
        Ok(team)
    }

    pub async fn get_team(&self, team_id: i64, caller: &Uuid) -> Result<TeamDetails, ApiError> {
        let details = self
            .store
            .get_team(team_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Team not found"))?;

        team_guard::ensure_can_view(&details, caller)?;
        Ok(details)
    }

    pub async fn delete_team(&self, team_id: i64, caller: &Uuid) -> Result<(), ApiError> {
        self.store.delete_team(team_id, *caller).await?;
        info!(team_id, user_id = %caller, "Team deleted");
        Ok(())
    }

    pub async fn list_my_teams(&self, caller: &Uuid) -> Result<Vec<Team>, ApiError> {
        self.store.list_teams_for_user(*caller).await
    }
}
