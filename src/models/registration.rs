use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A player's seat in a tournament (`tournament_players`).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Registration {
    pub tournament_id: i64,
    pub user_uuid: Uuid,
    pub user_name: Option<String>,
    pub joined_at: DateTime<Utc>,
    pub status: RegistrationStatus,
}

impl Registration {
    pub fn new(
        tournament_id: i64,
        user_uuid: Uuid,
        user_name: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            tournament_id,
            user_uuid,
            user_name,
            joined_at: now,
            status: RegistrationStatus::Registered,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "registration_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Registered,
}
