use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub tag: Option<String>,
    pub description: Option<String>,
    pub game_id: i64,
    pub captain_user_uuid: Uuid,
    pub invite_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Team {
    pub fn is_captain(&self, user_uuid: &Uuid) -> bool {
        &self.captain_user_uuid == user_uuid
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TeamMember {
    pub team_id: i64,
    pub user_uuid: Uuid,
    pub user_name: Option<String>,
    pub role: TeamRole,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "team_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TeamRole {
    Captain,
    CoCaptain,
    Member,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamDetails {
    pub team: Team,
    pub members: Vec<TeamMember>,
}

/// Team row plus its captain membership, written as one unit.
#[derive(Debug, Clone)]
pub struct NewTeam {
    pub name: String,
    pub tag: Option<String>,
    pub description: Option<String>,
    pub game_id: i64,
    pub captain_user_uuid: Uuid,
    pub captain_user_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TeamChanges {
    pub name: String,
    pub tag: Option<String>,
    pub description: Option<String>,
}

// ===== API DTOs =====

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTeamRequest {
    #[validate(length(min = 2, max = 64, message = "Team name must be between 2 and 64 characters"))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(length(max = 10))]
    pub tag: Option<String>,
    #[serde(alias = "gameId")]
    #[validate(range(min = 1, message = "A valid game must be selected"))]
    pub game_id: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTeamRequest {
    #[serde(alias = "teamId")]
    pub team_id: i64,
    #[validate(length(min = 2, max = 64, message = "Team name must be between 2 and 64 characters"))]
    pub name: String,
    #[validate(length(max = 10))]
    pub tag: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

/// Body of the multi-action team endpoint, discriminated by `action`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TeamAction {
    Create(CreateTeamRequest),
    Update(UpdateTeamRequest),
    Get {
        #[serde(alias = "teamId")]
        team_id: i64,
    },
    Delete {
        #[serde(alias = "teamId")]
        team_id: i64,
    },
    List,
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl CreateTeamRequest {
    /// Trims free-text fields; blank optional fields become `None`.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: clean(self.description),
            tag: clean(self.tag),
            game_id: self.game_id,
        }
    }
}

impl UpdateTeamRequest {
    pub fn normalized(self) -> Self {
        Self {
            team_id: self.team_id,
            name: self.name.trim().to_string(),
            tag: clean(self.tag),
            description: clean(self.description),
        }
    }
}
