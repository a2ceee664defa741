//! # Client Components
//!
//! The client is split into two main components:
//!
//! ## API Core ([`api`])
//! Handles the primary responsibility: packaging an upload into a
//! multipart request for one of the three service endpoints and
//! translating the response into a typed result or a typed error.
//!
//! ## Client Middleware ([`middleware`])
//! Manages all coordination concerns:
//! - Input validation before any network call
//! - Per-operation in-flight guards
//! - Preview frame lifetime (single-slot holder)
//! - Saving encoded downloads to disk
//! - Rendering every outcome onto the injected surfaces

pub mod api;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod surfaces;

// Re-export for convenience
pub use api::StegoApi;
pub use error::ClientError;
pub use middleware::{Operation, StegoClient};
