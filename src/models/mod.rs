// src/models/mod.rs

//! Domain models for the watcher application.

mod config;
mod listing;

// Re-export all public types
pub use config::{
    Config, Credentials, FilterConfig, NotifyConfig, SourceConfig, SourceFormat, StateConfig,
    WatcherConfig,
};
pub use listing::Listing;
