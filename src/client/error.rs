//! # Client Error Taxonomy
//!
//! Every failure an operation can hit falls into one of three kinds, and
//! each kind maps to exactly one user-facing status line. Raw transport
//! detail goes to the diagnostic log, never to the user.

use thiserror::Error;

/// Errors produced by client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Required input missing; detected before any network call.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The service answered with a non-success status. `detail` comes from
    /// the structured error body, with a fixed fallback when the body is
    /// absent or unparsable.
    #[error("service error (HTTP {status}): {detail}")]
    Service { status: u16, detail: String },

    /// The request never completed: connectivity failure, timeout, or a
    /// response body that could not be read.
    #[error("transport error: {0}")]
    Transport(String),
}

impl ClientError {
    /// The status line shown to the user for this error.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(message) => message.clone(),
            ClientError::Service { detail, .. } => format!("Error: {}", detail),
            ClientError::Transport(_) => "⚠ Something went wrong!".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_detail_is_surfaced_verbatim() {
        let err = ClientError::Service {
            status: 400,
            detail: "bad image".to_string(),
        };

        assert_eq!(err.user_message(), "Error: bad image");
    }

    #[test]
    fn transport_detail_is_never_surfaced() {
        let err = ClientError::Transport("connection refused (os error 111)".to_string());

        assert_eq!(err.user_message(), "⚠ Something went wrong!");
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn validation_message_passes_through() {
        let err = ClientError::Validation("⚠ Please select a file first.".to_string());

        assert_eq!(err.user_message(), "⚠ Please select a file first.");
    }
}
