//! # Common Components
//!
//! Shared utilities and data structures used across the client library and
//! its binaries.
//!
//! ## Modules
//!
//! - [`messages`]: Wire types for the steganography service API
//! - [`config`]: Configuration parsing utilities

pub mod config;
pub mod messages;
