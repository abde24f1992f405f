use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlayerProfile {
    pub user_uuid: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertProfileRequest {
    #[validate(length(min = 3, max = 32, message = "Username must be between 3 and 32 characters"))]
    pub username: String,
    #[serde(alias = "displayName")]
    #[validate(length(max = 64))]
    pub display_name: Option<String>,
    #[validate(length(max = 500))]
    pub bio: Option<String>,
}

impl UpsertProfileRequest {
    pub fn normalized(self) -> Self {
        Self {
            username: self.username.trim().to_string(),
            display_name: self
                .display_name
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            bio: self.bio.filter(|v| !v.trim().is_empty()),
        }
    }
}
