//! In-process adapter. One mutex guards all state, so every store call is
//! serialised and each check-then-write runs without interleaving.

use crate::api_error::ApiError;
use crate::auth::Identity;
use crate::models::{
    NewTeam, PlayerProfile, Refund, Registration, Team, TeamChanges, TeamDetails, TeamMember,
    TeamRole, Tournament, TournamentStatus, TransactionType, UpsertProfileRequest, Wallet,
    WalletTransaction,
};
use crate::service::registration_guard::{self, JoinDecision};
use crate::service::team_guard::{self, duplicate_team_name};
use crate::store::{
    duplicate_username, CreateTeamOutcome, JoinOutcome, ProfileStore, TeamStore, TournamentStore,
    WalletStore, Withdrawal,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};
use tracing::warn;
use uuid::Uuid;

#[derive(Default)]
struct MemoryState {
    tournaments: BTreeMap<i64, Tournament>,
    registrations: BTreeMap<(i64, Uuid), Registration>,
    teams: BTreeMap<i64, Team>,
    members: Vec<TeamMember>,
    wallets: HashMap<Uuid, Wallet>,
    transactions: Vec<WalletTransaction>,
    profiles: HashMap<Uuid, PlayerProfile>,
    last_team_id: i64,
    last_wallet_id: i64,
    last_transaction_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

impl MemoryState {
    fn credit_refund(&mut self, user_uuid: Uuid, refund: &Refund, now: DateTime<Utc>) {
        let wallet_id = match self.wallets.get_mut(&user_uuid) {
            Some(wallet) => {
                wallet.balance += refund.amount;
                wallet.updated_at = now;
                wallet.id
            }
            None => {
                let id = next_id(&mut self.last_wallet_id);
                self.wallets.insert(
                    user_uuid,
                    Wallet {
                        id,
                        user_uuid,
                        balance: refund.amount,
                        created_at: now,
                        updated_at: now,
                    },
                );
                id
            }
        };

        let id = next_id(&mut self.last_transaction_id);
        self.transactions.push(WalletTransaction {
            id,
            wallet_id,
            user_uuid,
            transaction_type: TransactionType::Refund,
            amount: refund.amount,
            reference_id: Some(refund.reference_id()),
            description: refund.description(),
            created_at: now,
        });
    }

    fn team_name_taken(&self, name: &str, except_team_id: Option<i64>) -> bool {
        self.teams
            .values()
            .any(|t| t.name == name && Some(t.id) != except_team_id)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, ApiError> {
        self.state
            .lock()
            .map_err(|_| ApiError::internal_error("Memory store lock poisoned"))
    }
}

#[async_trait]
impl TournamentStore for MemoryStore {
    async fn list_tournaments(
        &self,
        status: Option<TournamentStatus>,
    ) -> Result<Vec<Tournament>, ApiError> {
        let state = self.lock()?;
        let mut tournaments: Vec<Tournament> = state
            .tournaments
            .values()
            .filter(|t| status.map_or(true, |s| t.status == s))
            .cloned()
            .collect();
        tournaments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(tournaments)
    }

    async fn get_tournament(&self, tournament_id: i64) -> Result<Option<Tournament>, ApiError> {
        Ok(self.lock()?.tournaments.get(&tournament_id).cloned())
    }

    async fn list_registrations(
        &self,
        tournament_id: i64,
    ) -> Result<Vec<Registration>, ApiError> {
        let state = self.lock()?;
        let mut registrations: Vec<Registration> = state
            .registrations
            .values()
            .filter(|r| r.tournament_id == tournament_id)
            .cloned()
            .collect();
        registrations.sort_by(|a, b| {
            a.joined_at
                .cmp(&b.joined_at)
                .then(a.user_uuid.cmp(&b.user_uuid))
        });
        Ok(registrations)
    }

    async fn join(
        &self,
        tournament_id: i64,
        player: &Identity,
        now: DateTime<Utc>,
    ) -> Result<JoinOutcome, ApiError> {
        let mut state = self.lock()?;
        let key = (tournament_id, player.user_uuid);

        let tournament = state
            .tournaments
            .get(&tournament_id)
            .ok_or_else(|| ApiError::not_found("Tournament not found"))?;

        let decision = registration_guard::check_join(tournament, state.registrations.get(&key))?;
        if decision == JoinDecision::AlreadyRegistered {
            return Ok(JoinOutcome::AlreadyRegistered {
                current_players: tournament.current_players,
            });
        }

        state.registrations.insert(
            key,
            Registration::new(tournament_id, player.user_uuid, player.user_name.clone(), now),
        );

        let tournament = state
            .tournaments
            .get_mut(&tournament_id)
            .ok_or_else(|| ApiError::not_found("Tournament not found"))?;
        tournament.current_players += 1;
        tournament.updated_at = now;

        Ok(JoinOutcome::Joined {
            current_players: tournament.current_players,
        })
    }

    async fn unregister(
        &self,
        tournament_id: i64,
        user_uuid: Uuid,
        now: DateTime<Utc>,
        cooldown: Duration,
    ) -> Result<Withdrawal, ApiError> {
        let mut state = self.lock()?;
        let key = (tournament_id, user_uuid);

        let tournament = state
            .tournaments
            .get(&tournament_id)
            .ok_or_else(|| ApiError::not_found("Tournament not found"))?;

        registration_guard::check_unregister(
            tournament,
            state.registrations.get(&key),
            now,
            cooldown,
        )?;
        let refund = registration_guard::refund_for(tournament);

        state.registrations.remove(&key);

        let tournament = state
            .tournaments
            .get_mut(&tournament_id)
            .ok_or_else(|| ApiError::not_found("Tournament not found"))?;
        if tournament.current_players > 0 {
            tournament.current_players -= 1;
        } else {
            warn!(
                tournament_id,
                user_id = %user_uuid,
                "Player counter was already zero while a registration existed"
            );
        }
        tournament.updated_at = now;
        let current_players = tournament.current_players;

        if let Some(refund) = &refund {
            state.credit_refund(user_uuid, refund, now);
        }

        Ok(Withdrawal {
            refund,
            current_players,
        })
    }

    async fn update_status(
        &self,
        tournament_id: i64,
        status: TournamentStatus,
    ) -> Result<Tournament, ApiError> {
        let mut state = self.lock()?;
        let tournament = state
            .tournaments
            .get_mut(&tournament_id)
            .ok_or_else(|| ApiError::not_found("Tournament not found"))?;

        registration_guard::check_transition(tournament, status)?;
        tournament.status = status;
        tournament.updated_at = Utc::now();

        Ok(tournament.clone())
    }
}

#[async_trait]
impl TeamStore for MemoryStore {
    async fn create_team(
        &self,
        team: &NewTeam,
        invite_code: &str,
    ) -> Result<CreateTeamOutcome, ApiError> {
        let mut state = self.lock()?;

        if state.team_name_taken(&team.name, None) {
            return Err(duplicate_team_name());
        }
        if state.teams.values().any(|t| t.invite_code == invite_code) {
            return Ok(CreateTeamOutcome::InviteCodeTaken);
        }

        let now = Utc::now();
        let id = next_id(&mut state.last_team_id);
        let created = Team {
            id,
            name: team.name.clone(),
            tag: team.tag.clone(),
            description: team.description.clone(),
            game_id: team.game_id,
            captain_user_uuid: team.captain_user_uuid,
            invite_code: invite_code.to_string(),
            created_at: now,
            updated_at: now,
        };

        state.teams.insert(id, created.clone());
        state.members.push(TeamMember {
            team_id: id,
            user_uuid: team.captain_user_uuid,
            user_name: team.captain_user_name.clone(),
            role: TeamRole::Captain,
            joined_at: now,
        });

        Ok(CreateTeamOutcome::Created(created))
    }

    async fn get_team(&self, team_id: i64) -> Result<Option<TeamDetails>, ApiError> {
        let state = self.lock()?;
        let Some(team) = state.teams.get(&team_id).cloned() else {
            return Ok(None);
        };

        let mut members: Vec<TeamMember> = state
            .members
            .iter()
            .filter(|m| m.team_id == team_id)
            .cloned()
            .collect();
        members.sort_by(|a, b| {
            a.joined_at
                .cmp(&b.joined_at)
                .then(a.user_uuid.cmp(&b.user_uuid))
        });

        Ok(Some(TeamDetails { team, members }))
    }

    async fn update_team(
        &self,
        team_id: i64,
        caller: Uuid,
        changes: &TeamChanges,
    ) -> Result<Team, ApiError> {
        let mut state = self.lock()?;

        let current = state
            .teams
            .get(&team_id)
            .ok_or_else(|| ApiError::not_found("Team not found"))?;
        team_guard::ensure_captain(current, &caller)?;

        if changes.name != current.name && state.team_name_taken(&changes.name, Some(team_id)) {
            return Err(duplicate_team_name());
        }

        let team = state
            .teams
            .get_mut(&team_id)
            .ok_or_else(|| ApiError::not_found("Team not found"))?;
        team.name = changes.name.clone();
        team.tag = changes.tag.clone();
        team.description = changes.description.clone();
        team.updated_at = Utc::now();

        Ok(team.clone())
    }

    async fn delete_team(&self, team_id: i64, caller: Uuid) -> Result<(), ApiError> {
        let mut state = self.lock()?;

        let team = state
            .teams
            .get(&team_id)
            .ok_or_else(|| ApiError::not_found("Team not found"))?;
        team_guard::ensure_captain(team, &caller)?;

        state.members.retain(|m| m.team_id != team_id);
        state.teams.remove(&team_id);

        Ok(())
    }

    async fn list_teams_for_user(&self, user_uuid: Uuid) -> Result<Vec<Team>, ApiError> {
        let state = self.lock()?;
        let mut teams: Vec<Team> = state
            .members
            .iter()
            .filter(|m| m.user_uuid == user_uuid)
            .filter_map(|m| state.teams.get(&m.team_id).cloned())
            .collect();
        teams.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(teams)
    }
}

#[async_trait]
impl WalletStore for MemoryStore {
    async fn get_wallet(&self, user_uuid: Uuid) -> Result<Option<Wallet>, ApiError> {
        Ok(self.lock()?.wallets.get(&user_uuid).cloned())
    }

    async fn list_transactions(
        &self,
        user_uuid: Uuid,
        limit: i64,
    ) -> Result<Vec<WalletTransaction>, ApiError> {
        let state = self.lock()?;
        let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        Ok(state
            .transactions
            .iter()
            .rev()
            .filter(|t| t.user_uuid == user_uuid)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get_profile(&self, user_uuid: Uuid) -> Result<Option<PlayerProfile>, ApiError> {
        Ok(self.lock()?.profiles.get(&user_uuid).cloned())
    }

    async fn upsert_profile(
        &self,
        user_uuid: Uuid,
        profile: &UpsertProfileRequest,
    ) -> Result<PlayerProfile, ApiError> {
        let mut state = self.lock()?;

        let taken = state
            .profiles
            .values()
            .any(|p| p.username == profile.username && p.user_uuid != user_uuid);
        if taken {
            return Err(duplicate_username());
        }

        let now = Utc::now();
        let entry = state
            .profiles
            .entry(user_uuid)
            .or_insert_with(|| PlayerProfile {
                user_uuid,
                username: profile.username.clone(),
                display_name: None,
                bio: None,
                created_at: now,
                updated_at: now,
            });
        entry.username = profile.username.clone();
        entry.display_name = profile.display_name.clone();
        entry.bio = profile.bio.clone();
        entry.updated_at = now;

        Ok(entry.clone())
    }
}

#[cfg(test)]
impl MemoryStore {
    pub fn seed_tournament(&self, tournament: Tournament) {
        self.state
            .lock()
            .unwrap()
            .tournaments
            .insert(tournament.id, tournament);
    }

    /// Inserts a registration without touching `current_players`.
    pub fn seed_registration(&self, registration: Registration) {
        self.state.lock().unwrap().registrations.insert(
            (registration.tournament_id, registration.user_uuid),
            registration,
        );
    }

    /// Adds a member who joined after everyone created so far.
    pub fn seed_member(&self, team_id: i64, user_uuid: Uuid, role: TeamRole) {
        self.state.lock().unwrap().members.push(TeamMember {
            team_id,
            user_uuid,
            user_name: None,
            role,
            joined_at: Utc::now() + Duration::minutes(1),
        });
    }

    pub fn team_count(&self) -> usize {
        self.state.lock().unwrap().teams.len()
    }

    pub fn member_count(&self) -> usize {
        self.state.lock().unwrap().members.len()
    }

    pub fn registration_count(&self, tournament_id: i64) -> usize {
        self.state
            .lock()
            .unwrap()
            .registrations
            .keys()
            .filter(|(t, _)| *t == tournament_id)
            .count()
    }
}
