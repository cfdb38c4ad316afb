//! Command-line interface for Parley.
//!
//! This crate provides CLI commands for serving the chat API and for
//! inspecting and manipulating chat files from the terminal.

#![deny(missing_docs, unsafe_code)]

/// CLI command definitions and parsing.
pub mod commands;

/// CLI application entry point and configuration.
pub mod app;

/// Error types for CLI operations.
pub mod error;
