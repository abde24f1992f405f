// Core models
pub mod profile;
pub mod registration;
pub mod team;
pub mod tournament;
pub mod wallet;

// Re-export commonly used types
pub use profile::*;
pub use registration::*;
pub use team::*;
pub use tournament::*;
pub use wallet::*;
