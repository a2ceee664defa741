//! # API Core
//!
//! This module contains the minimal core that turns uploads into multipart
//! HTTP requests against the steganography service and translates the
//! responses into typed results.
//!
//! ## Responsibility
//!
//! The [`StegoApi`] struct focuses on a single, well-defined responsibility:
//! - Build the multipart payload for an operation
//! - POST it to the corresponding endpoint
//! - Map success bodies to typed results
//! - Map non-success statuses and transport failures to [`ClientError`]
//!
//! ## Design Philosophy
//!
//! This core component is intentionally minimal and stateless. It does not
//! handle:
//! - Input validation
//! - Surface updates
//! - Download persistence
//! - In-flight tracking
//!
//! Those concerns are delegated to the
//! [`StegoClient`](super::middleware::StegoClient).

use std::time::Duration;

use log::{debug, error, info};
use reqwest::multipart::{Form, Part};

use crate::client::error::ClientError;
use crate::common::messages::{DecodedMessage, Detection, EncodedImage, ErrorBody, Upload};

/// HTTP transport for the three service endpoints.
///
/// Stateless between calls; every method is an independent request against
/// `{base_url}/{endpoint}`.
pub struct StegoApi {
    /// Underlying HTTP client, configured with the request deadline
    http: reqwest::Client,
    /// Service base URL without a trailing slash
    base_url: String,
}

impl StegoApi {
    /// Creates a new API core for the given service base URL.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Where the service is reachable (e.g., "http://127.0.0.1:8000")
    /// * `request_timeout` - Deadline applied to every outbound request
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(request_timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { http, base_url })
    }

    /// POSTs `file` + `message` to `/encode` and returns the encoded image.
    ///
    /// # Returns
    ///
    /// * `Ok(EncodedImage)` - Binary image payload with its content type
    /// * `Err(ClientError)` - Service rejection or transport failure
    pub async fn encode(
        &self,
        upload: &Upload,
        message: &str,
    ) -> Result<EncodedImage, ClientError> {
        let form = Self::file_form(upload).text("message", message.to_string());
        let response = self.post("encode", form).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::service_error(status.as_u16(), response).await);
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("image/png")
            .to_string();

        let bytes = response.bytes().await.map_err(Self::transport)?;
        info!("📥 /encode returned {} bytes ({})", bytes.len(), content_type);

        Ok(EncodedImage {
            bytes: bytes.to_vec(),
            content_type,
        })
    }

    /// POSTs `file` to `/decode` and returns the extracted hidden message.
    pub async fn decode(&self, upload: &Upload) -> Result<DecodedMessage, ClientError> {
        let response = self.post("decode", Self::file_form(upload)).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::service_error(status.as_u16(), response).await);
        }

        response
            .json::<DecodedMessage>()
            .await
            .map_err(Self::transport)
    }

    /// POSTs `file` to `/detect` and returns the classification verdict.
    pub async fn detect(&self, upload: &Upload) -> Result<Detection, ClientError> {
        let response = self.post("detect", Self::file_form(upload)).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::service_error(status.as_u16(), response).await);
        }

        response.json::<Detection>().await.map_err(Self::transport)
    }

    /// Builds the multipart form carrying the `file` part.
    fn file_form(upload: &Upload) -> Form {
        let part = Part::bytes(upload.bytes.clone()).file_name(upload.file_name.clone());
        let part = match part.mime_str(&upload.mime_type) {
            Ok(part) => part,
            // Malformed MIME string: send the part untyped rather than fail
            Err(_) => Part::bytes(upload.bytes.clone()).file_name(upload.file_name.clone()),
        };

        Form::new().part("file", part)
    }

    /// Sends a multipart POST to `{base_url}/{endpoint}`.
    async fn post(&self, endpoint: &str, form: Form) -> Result<reqwest::Response, ClientError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("📡 POST {}", url);

        self.http.post(&url).multipart(form).send().await.map_err(|e| {
            error!("❌ Request to /{} failed: {}", endpoint, e);
            ClientError::Transport(e.to_string())
        })
    }

    /// Extracts the structured `detail` field from an error body, falling
    /// back to a fixed literal when the body is absent or unparsable.
    async fn service_error(status: u16, response: reqwest::Response) -> ClientError {
        let detail = match response.bytes().await {
            Ok(body) => serde_json::from_slice::<ErrorBody>(&body)
                .map(|body| body.detail)
                .unwrap_or_else(|_| "Unknown error".to_string()),
            Err(_) => "Unknown error".to_string(),
        };

        ClientError::Service { status, detail }
    }

    fn transport(e: reqwest::Error) -> ClientError {
        error!("❌ Failed to read service response: {}", e);
        ClientError::Transport(e.to_string())
    }
}
