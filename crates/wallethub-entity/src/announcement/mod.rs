//! Announcement entity.

pub mod model;

pub use model::Announcement;
