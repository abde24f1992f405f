use crate::api_error::ApiError;
use crate::auth::Identity;
use crate::config::AdminConfig;
use crate::models::{JoinReceipt, Registration, Tournament, TournamentStatus, UnregisterReceipt};
use crate::store::{JoinOutcome, TournamentStore};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Tournament browsing, registration and lifecycle administration.
pub struct TournamentService {
    store: Arc<dyn TournamentStore>,
    unregister_cooldown: Duration,
    admin: AdminConfig,
}

impl TournamentService {
    pub fn new(
        store: Arc<dyn TournamentStore>,
        unregister_cooldown: Duration,
        admin: AdminConfig,
    ) -> Self {
        Self {
            store,
            unregister_cooldown,
            admin,
        }
    }

    pub async fn list_tournaments(
        &self,
        status: Option<TournamentStatus>,
    ) -> Result<Vec<Tournament>, ApiError> {
        self.store.list_tournaments(status).await
    }

    pub async fn get_tournament(&self, tournament_id: i64) -> Result<Tournament, ApiError> {
        self.store
            .get_tournament(tournament_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Tournament not found"))
    }

    pub async fn list_players(&self, tournament_id: i64) -> Result<Vec<Registration>, ApiError> {
        // 404 for unknown tournaments rather than an empty list
        self.get_tournament(tournament_id).await?;
        self.store.list_registrations(tournament_id).await
    }

    /// Registers the caller. Joining twice is reported, not rejected.
    pub async fn join(
        &self,
        tournament_id: i64,
        player: &Identity,
    ) -> Result<JoinReceipt, ApiError> {
        info!(
            tournament_id,
            user_id = %player.user_uuid,
            "Join requested"
        );

        let outcome = self.store.join(tournament_id, player, Utc::now()).await;

        match outcome {
            Ok(JoinOutcome::Joined { current_players }) => {
                info!(
                    tournament_id,
                    user_id = %player.user_uuid,
                    current_players,
                    "Player registered"
                );
                Ok(JoinReceipt {
                    message: "Successfully joined tournament".to_string(),
                    already_registered: false,
                    current_players,
                })
            }
            Ok(JoinOutcome::AlreadyRegistered { current_players }) => Ok(JoinReceipt {
                message: "You are already registered for this tournament".to_string(),
                already_registered: true,
                current_players,
            }),
            Err(e) => {
                warn!(
                    tournament_id,
                    user_id = %player.user_uuid,
                    error = %e,
                    "Join rejected"
                );
                Err(e)
            }
        }
    }

    /// Withdraws the caller and refunds any entry fee to their wallet.
    pub async fn unregister(
        &self,
        tournament_id: i64,
        player: &Identity,
    ) -> Result<UnregisterReceipt, ApiError> {
        info!(
            tournament_id,
            user_id = %player.user_uuid,
            "Unregister requested"
        );

        let withdrawal = self
            .store
            .unregister(
                tournament_id,
                player.user_uuid,
                Utc::now(),
                self.unregister_cooldown,
            )
            .await
            .map_err(|e| {
                warn!(
                    tournament_id,
                    user_id = %player.user_uuid,
                    error = %e,
                    "Unregister rejected"
                );
                e
            })?;

        let refund_amount = withdrawal
            .refund
            .as_ref()
            .map_or(Decimal::ZERO, |r| r.amount);

        let message = if refund_amount > Decimal::ZERO {
            format!(
                "Successfully left tournament, {} refunded to your wallet",
                refund_amount
            )
        } else {
            "Successfully left tournament".to_string()
        };

        info!(
            tournament_id,
            user_id = %player.user_uuid,
            refund = %refund_amount,
            current_players = withdrawal.current_players,
            "Player unregistered"
        );

        Ok(UnregisterReceipt {
            message,
            refund_amount,
            current_players: withdrawal.current_players,
        })
    }

    pub async fn update_status(
        &self,
        tournament_id: i64,
        status: TournamentStatus,
        caller: &Uuid,
    ) -> Result<Tournament, ApiError> {
        if !self.admin.is_admin(caller) {
            warn!(user_id = %caller, tournament_id, "Non-admin status change attempt");
            return Err(ApiError::forbidden(
                "Only administrators can change tournament status",
            ));
        }

        let updated = self.store.update_status(tournament_id, status).await?;

        info!(
            tournament_id,
            status = %updated.status,
            admin_id = %caller,
            "Tournament status updated"
        );

        Ok(updated)
    }
}
