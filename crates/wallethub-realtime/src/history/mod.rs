//! Chat persistence seam and bounded history replay.

pub mod replay;
pub mod store;

pub use replay::HistoryReplay;
pub use store::{MemoryMessageStore, MessageStore};
