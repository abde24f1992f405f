use super::{PgStore, PROFILE_COLUMNS};
use crate::api_error::ApiError;
use crate::db::unique_violation;
use crate::models::{PlayerProfile, UpsertProfileRequest};
use crate::store::{duplicate_username, ProfileStore};
use async_trait::async_trait;
use uuid::Uuid;

const USERNAME_CONSTRAINT: &str = "player_profiles_username_key";

#[async_trait]
impl ProfileStore for PgStore {
    async fn get_profile(&self, user_uuid: Uuid) -> Result<Option<PlayerProfile>, ApiError> {
        let profile = sqlx::query_as::<_, PlayerProfile>(&format!(
            "SELECT {} FROM player_profiles WHERE user_uuid = $1",
            PROFILE_COLUMNS
        ))
        .bind(user_uuid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn upsert_profile(
        &self,
        user_uuid: Uuid,
        profile: &UpsertProfileRequest,
    ) -> Result<PlayerProfile, ApiError> {
        // Username uniqueness is enforced by player_profiles_username_key.
        sqlx::query_as::<_, PlayerProfile>(&format!(
            "INSERT INTO player_profiles (user_uuid, username, display_name, bio) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_uuid) DO UPDATE \
             SET username = EXCLUDED.username, display_name = EXCLUDED.display_name, \
                 bio = EXCLUDED.bio, updated_at = NOW() \
             RETURNING {}",
            PROFILE_COLUMNS
        ))
        .bind(user_uuid)
        .bind(&profile.username)
        .bind(profile.display_name.as_deref())
        .bind(profile.bio.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match unique_violation(&err).as_deref() {
            Some(USERNAME_CONSTRAINT) => duplicate_username(),
            _ => ApiError::DatabaseError(err),
        })
    }
}
