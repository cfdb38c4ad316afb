//! HTTP API server for Parley.
//!
//! This crate exposes the chat file management operations over Axum
//! endpoints: switching and erasing chats, sending composed messages,
//! staging media uploads on the draft, and the polling endpoints the front
//! end uses to decide when to repaint.

#![deny(unsafe_code)]

pub mod chat;
pub mod config;
pub mod error;
pub mod media;
pub mod router;
pub mod server;
pub mod session;

pub use config::*;
pub use error::*;
pub use router::*;
pub use server::*;
