use actix_web::{web, App, HttpServer};
use std::io;
use std::sync::Arc;
use tokio::signal;

mod api_error;
mod auth;
mod config;
mod db;
mod http;
mod middleware;
mod models;
mod service;
mod store;
mod telemetry;

use crate::config::{Config, StorageBackend};
use crate::db::{create_pool, run_migrations, DbPool};
use crate::http::AppState;
use crate::middleware::cors_middleware;
use crate::service::{ProfileService, TeamService, TournamentService, WalletService};
use crate::store::{MemoryStore, PgStore, ProfileStore, TeamStore, TournamentStore, WalletStore};
use crate::telemetry::init_telemetry;

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, err))
}

struct Stores {
    tournaments: Arc<dyn TournamentStore>,
    teams: Arc<dyn TeamStore>,
    wallets: Arc<dyn WalletStore>,
    profiles: Arc<dyn ProfileStore>,
}

impl Stores {
    fn from_adapter<S>(adapter: Arc<S>) -> Self
    where
        S: TournamentStore + TeamStore + WalletStore + ProfileStore + 'static,
    {
        Self {
            tournaments: adapter.clone(),
            teams: adapter.clone(),
            wallets: adapter.clone(),
            profiles: adapter,
        }
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    // Load configuration
    let config = Config::from_env().map_err(|e| startup_error("Failed to load configuration", e))?;

    // Initialize telemetry
    init_telemetry(&config.server.rust_log);

    let (stores, db_pool): (Stores, Option<DbPool>) = match config.storage.backend {
        StorageBackend::Postgres => {
            let pool = create_pool(&config)
                .await
                .map_err(|e| startup_error("Failed to create database pool", e))?;
            run_migrations(&pool)
                .await
                .map_err(|e| startup_error("Failed to run migrations", e))?;
            tracing::info!("Using Postgres storage");
            (
                Stores::from_adapter(Arc::new(PgStore::new(pool.clone()))),
                Some(pool),
            )
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, data is lost on restart");
            (Stores::from_adapter(Arc::new(MemoryStore::new())), None)
        }
    };

    let state = web::Data::new(AppState {
        tournaments: Arc::new(TournamentService::new(
            stores.tournaments,
            chrono::Duration::seconds(config.registration.unregister_cooldown_secs),
            config.admin.clone(),
        )),
        teams: Arc::new(TeamService::new(stores.teams)),
        wallets: Arc::new(WalletService::new(stores.wallets)),
        profiles: Arc::new(ProfileService::new(stores.profiles)),
        db_pool,
    });

    tracing::info!(
        "Starting Arena Hub backend server on {}:{}",
        config.server.host,
        config.server.port
    );

    let cors_origins = config.server.cors_allowed_origins.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(cors_middleware(&cors_origins))
            .wrap(actix_web::middleware::Logger::default())
            .configure(crate::http::configure_routes)
    })
    .bind((config.server.host.clone(), config.server.port))?
    .run();

    // Graceful shutdown
    let server_handle = server.handle();
    tokio::spawn(async move {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            return;
        }
        tracing::info!("Shutdown signal received, stopping server...");
        server_handle.stop(true).await;
    });

    server.await
}
