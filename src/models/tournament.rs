use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tournament {
    pub id: i64,
    pub name: String,
    pub game_id: i64,
    pub status: TournamentStatus,
    pub max_players: i32,
    pub current_players: i32,
    pub entry_fee: Decimal,
    pub starts_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tournament {
    pub fn is_full(&self) -> bool {
        self.current_players >= self.max_players
    }

    pub fn has_entry_fee(&self) -> bool {
        self.entry_fee > Decimal::ZERO
    }
}

/// Tournament lifecycle.
///
/// `draft -> registration -> upcoming -> live -> completed`, with `cancelled`
/// reachable from every state before `live`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "tournament_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TournamentStatus {
    Draft,
    Registration,
    Upcoming,
    Live,
    Completed,
    Cancelled,
}

impl TournamentStatus {
    pub fn can_transition_to(&self, to: &TournamentStatus) -> bool {
        use TournamentStatus::*;
        match (self, to) {
            (Draft, Registration) => true,
            (Registration, Upcoming) => true,
            (Upcoming, Live) => true,
            (Live, Completed) => true,
            (Draft | Registration | Upcoming, Cancelled) => true,
            _ => false,
        }
    }

    pub fn valid_next_states(&self) -> Vec<TournamentStatus> {
        use TournamentStatus::*;
        match self {
            Draft => vec![Registration, Cancelled],
            Registration => vec![Upcoming, Cancelled],
            Upcoming => vec![Live, Cancelled],
            Live => vec![Completed],
            Completed | Cancelled => vec![],
        }
    }

    /// Joining and withdrawing are only possible inside the registration window.
    pub fn is_registration_window(&self) -> bool {
        matches!(self, TournamentStatus::Registration | TournamentStatus::Upcoming)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TournamentStatus::Completed | TournamentStatus::Cancelled)
    }
}

impl std::fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentStatus::Draft => write!(f, "draft"),
            TournamentStatus::Registration => write!(f, "registration"),
            TournamentStatus::Upcoming => write!(f, "upcoming"),
            TournamentStatus::Live => write!(f, "live"),
            TournamentStatus::Completed => write!(f, "completed"),
            TournamentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

// ===== API DTOs =====

#[derive(Debug, Clone, Deserialize)]
pub struct TournamentActionRequest {
    #[serde(alias = "tournamentId")]
    pub tournament_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TournamentListQuery {
    pub status: Option<TournamentStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTournamentStatusRequest {
    pub status: TournamentStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct JoinReceipt {
    pub message: String,
    #[serde(rename = "alreadyRegistered", skip_serializing_if = "std::ops::Not::not")]
    pub already_registered: bool,
    pub current_players: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnregisterReceipt {
    pub message: String,
    pub refund_amount: Decimal,
    pub current_players: i32,
}
