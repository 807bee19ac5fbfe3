//! Persisted chat messages.

pub mod model;

pub use model::ChatMessage;
