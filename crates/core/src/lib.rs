//! Core types, chat synchronization, and file storage for Parley
//!
//! This crate provides the foundational pieces of the Parley chat
//! content-management tool: message and media types, the per-chat JSON file
//! store, and the inbox synchronization routine that diffs an in-memory chat
//! against the on-disk document.

pub mod chat;
pub mod config;
pub mod constants;
pub mod error;
pub mod store;
pub mod types;
pub mod wire;

// Re-exports for convenience
pub use chat::{Chat, SyncReport};
pub use config::ParleyConfig;
pub use error::{Error, Result};
pub use store::ChatStore;
pub use types::*;
