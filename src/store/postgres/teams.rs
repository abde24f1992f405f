use super::{PgStore, TEAM_COLUMNS, TEAM_MEMBER_COLUMNS};
use crate::api_error::ApiError;
use crate::db::unique_violation;
use crate::models::{NewTeam, Team, TeamChanges, TeamDetails, TeamMember, TeamRole};
use crate::service::team_guard::{self, duplicate_team_name};
use crate::store::{CreateTeamOutcome, TeamStore};
use async_trait::async_trait;
use sqlx::PgConnection;
use uuid::Uuid;

const NAME_CONSTRAINT: &str = "teams_name_key";
const INVITE_CODE_CONSTRAINT: &str = "teams_invite_code_key";

fn map_team_write_error(err: sqlx::Error) -> ApiError {
    match unique_violation(&err).as_deref() {
        Some(NAME_CONSTRAINT) => duplicate_team_name(),
        _ => ApiError::DatabaseError(err),
    }
}

async fn lock_team(conn: &mut PgConnection, team_id: i64) -> Result<Team, ApiError> {
    sqlx::query_as::<_, Team>(&format!(
        "SELECT {} FROM teams WHERE id = $1 FOR UPDATE",
        TEAM_COLUMNS
    ))
    .bind(team_id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| ApiError::not_found("Team not found"))
}

async fn name_taken(
    conn: &mut PgConnection,
    name: &str,
    except_team_id: Option<i64>,
) -> Result<bool, ApiError> {
    let taken: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM teams WHERE name = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
    )
    .bind(name)
    .bind(except_team_id)
    .fetch_one(conn)
    .await?;

    Ok(taken)
}

#[async_trait]
impl TeamStore for PgStore {
    async fn create_team(
        &self,
        team: &NewTeam,
        invite_code: &str,
    ) -> Result<CreateTeamOutcome, ApiError> {
        let mut tx = self.pool.begin().await?;

        if name_taken(&mut tx, &team.name, None).await? {
            return Err(duplicate_team_name());
        }

        let inserted = sqlx::query_as::<_, Team>(&format!(
            "INSERT INTO teams (name, tag, description, game_id, captain_user_uuid, invite_code) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            TEAM_COLUMNS
        ))
        .bind(&team.name)
        .bind(team.tag.as_deref())
        .bind(team.description.as_deref())
        .bind(team.game_id)
        .bind(team.captain_user_uuid)
        .bind(invite_code)
        .fetch_one(&mut *tx)
        .await;

        let created = match inserted {
            Ok(created) => created,
            Err(err) if unique_violation(&err).as_deref() == Some(INVITE_CODE_CONSTRAINT) => {
                return Ok(CreateTeamOutcome::InviteCodeTaken);
            }
            Err(err) => return Err(map_team_write_error(err)),
        };

        sqlx::query(
            "INSERT INTO team_members (team_id, user_uuid, user_name, role, joined_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(created.id)
        .bind(team.captain_user_uuid)
        .bind(team.captain_user_name.as_deref())
        .bind(TeamRole::Captain)
        .bind(created.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(CreateTeamOutcome::Created(created))
    }

    async fn get_team(&self, team_id: i64) -> Result<Option<TeamDetails>, ApiError> {
        let team = sqlx::query_as::<_, Team>(&format!(
            "SELECT {} FROM teams WHERE id = $1",
            TEAM_COLUMNS
        ))
        .bind(team_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(team) = team else {
            return Ok(None);
        };

        let members = sqlx::query_as::<_, TeamMember>(&format!(
            "SELECT {} FROM team_members WHERE team_id = $1 ORDER BY joined_at ASC, user_uuid ASC",
            TEAM_MEMBER_COLUMNS
        ))
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(TeamDetails { team, members }))
    }

    async fn update_team(
        &self,
        team_id: i64,
        caller: Uuid,
        changes: &TeamChanges,
    ) -> Result<Team, ApiError> {
        let mut tx = self.pool.begin().await?;

        let team = lock_team(&mut tx, team_id).await?;
        team_guard::ensure_captain(&team, &caller)?;

        if changes.name != team.name && name_taken(&mut tx, &changes.name, Some(team_id)).await? {
            return Err(duplicate_team_name());
        }

        let updated = sqlx::query_as::<_, Team>(&format!(
            "UPDATE teams SET name = $2, tag = $3, description = $4, updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            TEAM_COLUMNS
        ))
        .bind(team_id)
        .bind(&changes.name)
        .bind(changes.tag.as_deref())
        .bind(changes.description.as_deref())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_team_write_error)?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_team(&self, team_id: i64, caller: Uuid) -> Result<(), ApiError> {
        let mut tx = self.pool.begin().await?;

        let team = lock_team(&mut tx, team_id).await?;
        team_guard::ensure_captain(&team, &caller)?;

        sqlx::query("DELETE FROM team_members WHERE team_id = $1")
            .bind(team_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(team_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn list_teams_for_user(&self, user_uuid: Uuid) -> Result<Vec<Team>, ApiError> {
        let columns = TEAM_COLUMNS
            .split(", ")
            .map(|c| format!("t.{}", c))
            .collect::<Vec<_>>()
            .join(", ");

        let teams = sqlx::query_as::<_, Team>(&format!(
            "SELECT {} FROM teams t \
             JOIN team_members m ON m.team_id = t.id \
             WHERE m.user_uuid = $1 \
             ORDER BY t.created_at DESC, t.id DESC",
            columns
        ))
        .bind(user_uuid)
        .fetch_all(&self.pool)
        .await?;

        Ok(teams)
    }
}
