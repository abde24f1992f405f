pub mod admin_handler;
pub mod health;
pub mod profile_handler;
pub mod team_handler;
pub mod tournament_handler;
pub mod wallet_handler;

use crate::api_error::ApiError;
use crate::db::DbPool;
use crate::service::{ProfileService, TeamService, TournamentService, WalletService};
use actix_web::web;
use serde::Serialize;
use std::sync::Arc;

/// Shared application state handed to every handler.
pub struct AppState {
    pub tournaments: Arc<TournamentService>,
    pub teams: Arc<TeamService>,
    pub wallets: Arc<WalletService>,
    pub profiles: Arc<ProfileService>,
    /// `None` when running on the in-memory store.
    pub db_pool: Option<DbPool>,
}

/// Success envelope: `{"success": true, ...payload}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Extractor failures render through `ApiError` like every other error.
fn extractor_configs(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::bad_request(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| ApiError::bad_request(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| ApiError::bad_request(err.to_string()).into()),
    );
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    extractor_configs(cfg);
    cfg.route("/api/health", web::get().to(health::health_check));
    tournament_handler::configure_routes(cfg);
    team_handler::configure_routes(cfg);
    wallet_handler::configure_routes(cfg);
    profile_handler::configure_routes(cfg);
    admin_handler::configure_routes(cfg);
}
