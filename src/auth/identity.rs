use crate::api_error::ApiError;
use actix_web::http::header::HeaderMap;
use serde::Serialize;
use uuid::Uuid;

pub const USER_UUID_HEADER: &str = "x-user-uuid";
pub const USER_NAME_HEADER: &str = "x-user-name";

/// Caller identity asserted by the upstream authentication service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub user_uuid: Uuid,
    pub user_name: Option<String>,
}

impl Identity {
    pub fn new(user_uuid: Uuid, user_name: Option<String>) -> Self {
        Self {
            user_uuid,
            user_name,
        }
    }

    pub fn from_headers(headers: &HeaderMap) -> Result<Self, ApiError> {
        let raw_uuid = headers
            .get(USER_UUID_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::unauthenticated("Authentication required"))?;

        let user_uuid = Uuid::parse_str(raw_uuid)
            .map_err(|_| ApiError::unauthenticated("Invalid user identity"))?;

        let user_name = headers
            .get(USER_NAME_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        Ok(Self::new(user_uuid, user_name))
    }
}
