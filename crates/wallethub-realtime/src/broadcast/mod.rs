//! Broadcast fan-out to every registered connection.

pub mod router;

pub use router::{BroadcastDrain, BroadcastRouter, FanOutReport};
