use crate::api_error::ApiError;
use crate::models::{PlayerProfile, UpsertProfileRequest};
use crate::store::ProfileStore;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

pub struct ProfileService {
    store: Arc<dyn ProfileStore>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    pub async fn get_profile(&self, user_uuid: Uuid) -> Result<PlayerProfile, ApiError> {
        self.store
            .get_profile(user_uuid)
            .await?
            .ok_or_else(|| ApiError::not_found("Profile not found"))
    }

    pub async fn upsert_profile(
        &self,
        user_uuid: Uuid,
        request: UpsertProfileRequest,
    ) -> Result<PlayerProfile, ApiError> {
        let request = request.normalized();
        request.validate()?;

        let profile = self.store.upsert_profile(user_uuid, &request).await?;
        info!(user_id = %user_uuid, username = %profile.username, "Profile saved");
        Ok(profile)
    }
}
