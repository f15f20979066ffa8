//! External collaborators: source fetching and notification dispatch.

pub mod fetch;
pub mod notify;

// Re-export for convenience
pub use fetch::SourceFetcher;
pub use notify::{Notifier, TelegramNotifier};
