//! # Stego Forensics Client
//!
//! Client library for a remote image-steganography service. It packages a
//! selected file (and, for encoding, a message) into multipart HTTP
//! requests against three service endpoints (`/encode`, `/decode`,
//! `/detect`) and renders the outcome onto injected UI surfaces.
//!
//! The steganography engine itself lives behind the service; this crate
//! contains no embedding, extraction, or detection logic.

pub mod client;
pub mod common;

pub use client::{ClientError, Operation, StegoApi, StegoClient};
pub use common::messages::Upload;
