use super::wallets::credit_refund;
use super::{PgStore, REGISTRATION_COLUMNS, TOURNAMENT_COLUMNS};
use crate::api_error::ApiError;
use crate::auth::Identity;
use crate::models::{Registration, RegistrationStatus, Tournament, TournamentStatus};
use crate::service::registration_guard::{self, JoinDecision};
use crate::store::{JoinOutcome, TournamentStore, Withdrawal};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgConnection;
use tracing::{debug, warn};
use uuid::Uuid;

async fn lock_tournament(
    conn: &mut PgConnection,
    tournament_id: i64,
) -> Result<Tournament, ApiError> {
    sqlx::query_as::<_, Tournament>(&format!(
        "SELECT {} FROM tournaments WHERE id = $1 FOR UPDATE",
        TOURNAMENT_COLUMNS
    ))
    .bind(tournament_id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| ApiError::not_found("Tournament not found"))
}

async fn lock_registration(
    conn: &mut PgConnection,
    tournament_id: i64,
    user_uuid: Uuid,
) -> Result<Option<Registration>, ApiError> {
    let registration = sqlx::query_as::<_, Registration>(&format!(
        "SELECT {} FROM tournament_players \
         WHERE tournament_id = $1 AND user_uuid = $2 FOR UPDATE",
        REGISTRATION_COLUMNS
    ))
    .bind(tournament_id)
    .bind(user_uuid)
    .fetch_optional(conn)
    .await?;

    Ok(registration)
}

#[async_trait]
impl TournamentStore for PgStore {
    async fn list_tournaments(
        &self,
        status: Option<TournamentStatus>,
    ) -> Result<Vec<Tournament>, ApiError> {
        let tournaments = sqlx::query_as::<_, Tournament>(&format!(
            "SELECT {} FROM tournaments \
             WHERE ($1::tournament_status IS NULL OR status = $1) \
             ORDER BY created_at DESC, id DESC",
            TOURNAMENT_COLUMNS
        ))
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(tournaments)
    }

    async fn get_tournament(&self, tournament_id: i64) -> Result<Option<Tournament>, ApiError> {
        let tournament = sqlx::query_as::<_, Tournament>(&format!(
            "SELECT {} FROM tournaments WHERE id = $1",
            TOURNAMENT_COLUMNS
        ))
        .bind(tournament_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tournament)
    }

    async fn list_registrations(
        &self,
        tournament_id: i64,
    ) -> Result<Vec<Registration>, ApiError> {
        let registrations = sqlx::query_as::<_, Registration>(&format!(
            "SELECT {} FROM tournament_players \
             WHERE tournament_id = $1 ORDER BY joined_at ASC, user_uuid ASC",
            REGISTRATION_COLUMNS
        ))
        .bind(tournament_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(registrations)
    }

    async fn join(
        &self,
        tournament_id: i64,
        player: &Identity,
        now: DateTime<Utc>,
    ) -> Result<JoinOutcome, ApiError> {
        let mut tx = self.pool.begin().await?;

        let tournament = lock_tournament(&mut tx, tournament_id).await?;
        let existing = lock_registration(&mut tx, tournament_id, player.user_uuid).await?;

        if registration_guard::check_join(&tournament, existing.as_ref())?
            == JoinDecision::AlreadyRegistered
        {
            return Ok(JoinOutcome::AlreadyRegistered {
                current_players: tournament.current_players,
            });
        }

        let inserted = sqlx::query(
            "INSERT INTO tournament_players (tournament_id, user_uuid, user_name, joined_at, status) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (tournament_id, user_uuid) DO NOTHING",
        )
        .bind(tournament_id)
        .bind(player.user_uuid)
        .bind(player.user_name.as_deref())
        .bind(now)
        .bind(RegistrationStatus::Registered)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted == 0 {
            return Ok(JoinOutcome::AlreadyRegistered {
                current_players: tournament.current_players,
            });
        }

        // Guarded increment: a zero-row update means the last seat is gone.
        let current_players: Option<i32> = sqlx::query_scalar(
            "UPDATE tournaments \
             SET current_players = current_players + 1, updated_at = NOW() \
             WHERE id = $1 AND current_players < max_players \
             RETURNING current_players",
        )
        .bind(tournament_id)
        .fetch_optional(&mut *tx)
        .await?;

        let current_players = current_players.ok_or(ApiError::TournamentFull)?;

        tx.commit().await?;

        debug!(tournament_id, current_players, "Registration committed");

        Ok(JoinOutcome::Joined { current_players })
    }

    async fn unregister(
        &self,
        tournament_id: i64,
        user_uuid: Uuid,
        now: DateTime<Utc>,
        cooldown: Duration,
    ) -> Result<Withdrawal, ApiError> {
        let mut tx = self.pool.begin().await?;

        let tournament = lock_tournament(&mut tx, tournament_id).await?;
        let existing = lock_registration(&mut tx, tournament_id, user_uuid).await?;

        registration_guard::check_unregister(&tournament, existing.as_ref(), now, cooldown)?;

        let deleted = sqlx::query(
            "DELETE FROM tournament_players WHERE tournament_id = $1 AND user_uuid = $2",
        )
        .bind(tournament_id)
        .bind(user_uuid)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if deleted == 0 {
            return Err(ApiError::NotRegistered);
        }

        let current_players: Option<i32> = sqlx::query_scalar(
            "UPDATE tournaments \
             SET current_players = current_players - 1, updated_at = NOW() \
             WHERE id = $1 AND current_players > 0 \
             RETURNING current_players",
        )
        .bind(tournament_id)
        .fetch_optional(&mut *tx)
        .await?;

        let current_players = match current_players {
            Some(current_players) => current_players,
            None => {
                warn!(
                    tournament_id,
                    user_id = %user_uuid,
                    "Player counter was already zero while a registration existed"
                );
                0
            }
        };

        let refund = registration_guard::refund_for(&tournament);
        if let Some(refund) = &refund {
            credit_refund(&mut tx, user_uuid, refund).await?;
        }

        tx.commit().await?;

        Ok(Withdrawal {
            refund,
            current_players,
        })
    }

    async fn update_status(
        &self,
        tournament_id: i64,
        status: TournamentStatus,
    ) -> Result<Tournament, ApiError> {
        let mut tx = self.pool.begin().await?;

        let tournament = lock_tournament(&mut tx, tournament_id).await?;
        registration_guard::check_transition(&tournament, status)?;

        let updated = sqlx::query_as::<_, Tournament>(&format!(
            "UPDATE tournaments SET status = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            TOURNAMENT_COLUMNS
        ))
        .bind(tournament_id)
        .bind(status)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(updated)
    }
}
