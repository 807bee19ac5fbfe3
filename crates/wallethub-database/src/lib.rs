//! # wallethub-database
//!
//! PostgreSQL connection management, embedded migrations and concrete
//! repository implementations for all WalletHub entities.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
