//! # wallethub-entity
//!
//! Domain entity models for WalletHub. Every model maps one table row via
//! `sqlx::FromRow` and serializes to the JSON shape served by the HTTP API.

pub mod announcement;
pub mod chat;
pub mod wallet;
