//! Registration rules shared by every store adapter.
//!
//! Adapters call these while holding whatever lock makes the surrounding
//! check-then-write atomic (a row lock in Postgres, the state mutex in memory).

use crate::api_error::ApiError;
use crate::models::{Refund, Registration, Tournament, TournamentStatus};
use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinDecision {
    Admit,
    AlreadyRegistered,
}

/// Checks, in order: registration window, duplicate registration, capacity.
pub fn check_join(
    tournament: &Tournament,
    existing: Option<&Registration>,
) -> Result<JoinDecision, ApiError> {
    if !tournament.status.is_registration_window() {
        return Err(ApiError::RegistrationClosed);
    }

    if existing.is_some() {
        return Ok(JoinDecision::AlreadyRegistered);
    }

    if tournament.is_full() {
        return Err(ApiError::TournamentFull);
    }

    Ok(JoinDecision::Admit)
}

/// Checks, in order: registration window, existing registration, cooldown.
pub fn check_unregister(
    tournament: &Tournament,
    existing: Option<&Registration>,
    now: DateTime<Utc>,
    cooldown: Duration,
) -> Result<(), ApiError> {
    if !tournament.status.is_registration_window() {
        return Err(ApiError::RegistrationClosed);
    }

    let registration = existing.ok_or(ApiError::NotRegistered)?;

    if let Some(remaining) = remaining_cooldown(registration.joined_at, now, cooldown) {
        return Err(ApiError::CooldownActive {
            minutes: minutes_rounded_up(remaining),
        });
    }

    Ok(())
}

pub fn remaining_cooldown(
    joined_at: DateTime<Utc>,
    now: DateTime<Utc>,
    cooldown: Duration,
) -> Option<Duration> {
    let elapsed = now - joined_at;
    if elapsed >= cooldown {
        None
    } else {
        Some(cooldown - elapsed)
    }
}

/// Whole minutes, rounded up, never less than one.
pub fn minutes_rounded_up(remaining: Duration) -> i64 {
    let millis = remaining.num_milliseconds().max(1);
    (millis + 59_999) / 60_000
}

pub fn refund_for(tournament: &Tournament) -> Option<Refund> {
    tournament.has_entry_fee().then(|| Refund {
        amount: tournament.entry_fee,
        tournament_id: tournament.id,
        tournament_name: tournament.name.clone(),
    })
}

pub fn check_transition(tournament: &Tournament, to: TournamentStatus) -> Result<(), ApiError> {
    if tournament.status.is_terminal() {
        return Err(ApiError::bad_request(format!(
            "Tournament is already {} and can no longer change status",
            tournament.status
        )));
    }

    if !tournament.status.can_transition_to(&to) {
        return Err(ApiError::bad_request(format!(
            "Invalid status transition from {} to {}",
            tournament.status, to
        )));
    }
    Ok(())
}
