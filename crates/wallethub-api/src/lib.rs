//! # wallethub-api
//!
//! HTTP API layer for WalletHub built on Axum.
//!
//! Provides the wallet and announcement REST endpoints, chat history, health
//! checks, the `/ws` realtime gateway, middleware (CORS, logging), extractors,
//! DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use state::AppState;
