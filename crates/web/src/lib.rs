//! Web front end for Parley.
//!
//! This crate serves the static single-page UI and provides the combined
//! server binary that mounts the HTTP API next to it.

#![deny(unsafe_code)]

/// Static file serving and asset management.
pub mod assets;

/// Error types for web operations.
pub mod error;
