// Service layer module for Arena Hub
pub mod profile_service;
pub mod registration_guard;
pub mod team_guard;
pub mod team_service;
pub mod tournament_service;
pub mod wallet_service;

#[cfg(test)]
mod team_service_test;
#[cfg(test)]
mod tournament_service_test;

pub use profile_service::ProfileService;
pub use team_service::TeamService;
pub use tournament_service::TournamentService;
pub use wallet_service::WalletService;
