use crate::api_error::ApiError;
use crate::models::{Team, TeamDetails};
use rand::Rng;
use uuid::Uuid;

pub const INVITE_CODE_PREFIX: &str = "TEAM_";
const INVITE_CODE_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub fn duplicate_team_name() -> ApiError {
    ApiError::DuplicateName("A team with this name already exists".to_string())
}

/// Only the captain may change or delete a team.
pub fn ensure_captain(team: &Team, caller: &Uuid) -> Result<(), ApiError> {
    if !team.is_captain(caller) {
        return Err(ApiError::forbidden("Only the team captain can modify this team"));
    }
    Ok(())
}

/// Team details are visible to the captain and existing members.
pub fn ensure_can_view(details: &TeamDetails, caller: &Uuid) -> Result<(), ApiError> {
    let is_member = details.members.iter().any(|m| &m.user_uuid == caller);
    if !details.team.is_captain(caller) && !is_member {
        return Err(ApiError::forbidden("You are not a member of this team"));
    }
    Ok(())
}

/// `TEAM_` followed by nine upper-case base-36 characters.
pub fn generate_invite_code() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..INVITE_CODE_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{}{}", INVITE_CODE_PREFIX, suffix)
}
