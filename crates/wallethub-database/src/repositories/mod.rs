//! Concrete repository implementations.

pub mod announcement;
pub mod chat;
pub mod wallet;

pub use announcement::AnnouncementRepository;
pub use chat::ChatMessageRepository;
pub use wallet::WalletRepository;
