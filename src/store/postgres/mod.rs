//! Postgres adapter. Check-then-write sequences run inside one transaction
//! that holds `FOR UPDATE` locks on the rows whose invariants they guard.

mod profiles;
mod teams;
mod tournaments;
mod wallets;


use crate::db::DbPool;

const TOURNAMENT_COLUMNS: &str = "id, name, game_id, status, max_players, current_players, \
     entry_fee, starts_at, created_at, updated_at";

const REGISTRATION_COLUMNS: &str = "tournament_id, user_uuid, user_name, joined_at, status";

const TEAM_COLUMNS: &str = "id, name, tag, description, game_id, captain_user_uuid, \
     invite_code, created_at, updated_at";

const TEAM_MEMBER_COLUMNS: &str = "team_id, user_uuid, user_name, role, joined_at";

const WALLET_COLUMNS: &str = "id, user_uuid, balance, created_at, updated_at";

const WALLET_TRANSACTION_COLUMNS: &str = "id, wallet_id, user_uuid, transaction_type, amount, \
     reference_id, description, created_at";

const PROFILE_COLUMNS: &str = "user_uuid, username, display_name, bio, created_at, updated_at";

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}
