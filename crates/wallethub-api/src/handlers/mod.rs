//! Route handlers organized by domain.

pub mod announcement;
pub mod chat;
pub mod health;
pub mod wallet;
pub mod ws;
