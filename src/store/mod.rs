//! Persistence ports and their adapters.
//!
//! Every operation that checks an invariant and then writes is a single
//! store call, so each adapter can make it atomic on its own terms.

pub mod memory;
pub mod postgres;

use crate::api_error::ApiError;
use crate::auth::Identity;
use crate::models::{
    NewTeam, PlayerProfile, Refund, Registration, Team, TeamChanges, TeamDetails, Tournament,
    TournamentStatus, UpsertProfileRequest, Wallet, WalletTransaction,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined { current_players: i32 },
    AlreadyRegistered { current_players: i32 },
}

#[derive(Debug, Clone)]
pub struct Withdrawal {
    pub refund: Option<Refund>,
    pub current_players: i32,
}

#[derive(Debug, Clone)]
pub enum CreateTeamOutcome {
    Created(Team),
    /// The generated invite code collided with an existing team's code.
    InviteCodeTaken,
}

#[async_trait]
pub trait TournamentStore: Send + Sync {
    async fn list_tournaments(
        &self,
        status: Option<TournamentStatus>,
    ) -> Result<Vec<Tournament>, ApiError>;

    async fn get_tournament(&self, tournament_id: i64) -> Result<Option<Tournament>, ApiError>;

    /// Registrations for a tournament, oldest first.
    async fn list_registrations(&self, tournament_id: i64)
        -> Result<Vec<Registration>, ApiError>;

    /// Registers the player and bumps `current_players` as one atomic unit.
    async fn join(
        &self,
        tournament_id: i64,
        player: &Identity,
        now: DateTime<Utc>,
    ) -> Result<JoinOutcome, ApiError>;

    /// Removes the registration, decrements the counter and credits any
    /// entry-fee refund as one atomic unit.
    async fn unregister(
        &self,
        tournament_id: i64,
        user_uuid: Uuid,
        now: DateTime<Utc>,
        cooldown: Duration,
    ) -> Result<Withdrawal, ApiError>;

    async fn update_status(
        &self,
        tournament_id: i64,
        status: TournamentStatus,
    ) -> Result<Tournament, ApiError>;
}

#[async_trait]
pub trait TeamStore: Send + Sync {
    /// Inserts the team and its captain membership together.
    async fn create_team(
        &self,
        team: &NewTeam,
        invite_code: &str,
    ) -> Result<CreateTeamOutcome, ApiError>;

    /// Team plus members ordered by `joined_at`, oldest first.
    async fn get_team(&self, team_id: i64) -> Result<Option<TeamDetails>, ApiError>;

    async fn update_team(
        &self,
        team_id: i64,
        caller: Uuid,
        changes: &TeamChanges,
    ) -> Result<Team, ApiError>;

    async fn delete_team(&self, team_id: i64, caller: Uuid) -> Result<(), ApiError>;

    async fn list_teams_for_user(&self, user_uuid: Uuid) -> Result<Vec<Team>, ApiError>;
}

#[async_trait]
pub trait WalletStore: Send + Sync {
    async fn get_wallet(&self, user_uuid: Uuid) -> Result<Option<Wallet>, ApiError>;

    /// Most recent transactions first.
    async fn list_transactions(
        &self,
        user_uuid: Uuid,
        limit: i64,
    ) -> Result<Vec<WalletTransaction>, ApiError>;
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, user_uuid: Uuid) -> Result<Option<PlayerProfile>, ApiError>;

    async fn upsert_profile(
        &self,
        user_uuid: Uuid,
        profile: &UpsertProfileRequest,
    ) -> Result<PlayerProfile, ApiError>;
}

pub fn duplicate_username() -> ApiError {
    ApiError::DuplicateName("Username is already taken".to_string())
}
