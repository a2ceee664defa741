//! # Client Middleware
//!
//! This module contains the middleware layer that orchestrates the three
//! user-facing operations over the API core.
//!
//! ## Responsibilities
//!
//! The [`StegoClient`] struct manages high-level coordination:
//! - **Validation**: Rejects calls with missing inputs before any network
//!   request is made
//! - **In-Flight Guards**: Refuses a second invocation of an operation
//!   while one is outstanding (each operation independently)
//! - **Preview Lifetime**: Holds the encoded frame in a single-slot owner
//!   until the surface reports load completion
//! - **Download**: Writes the encoded payload to the output directory as
//!   `encoded.png`
//! - **Status Rendering**: Every exit path, success or failure, ends by
//!   writing a human-readable outcome to the status surface
//!
//! ## Architecture
//!
//! The middleware follows a separation of concerns pattern:
//! - It owns a [`StegoApi`](super::api::StegoApi) instance for the actual
//!   request transmission
//! - It owns the injected surface handles and the preview slot
//! - Optionally it records per-request metrics
//!
//! ## Operation Workflow
//!
//! 1. **Guard**: Mark the operation in flight, or refuse the trigger
//! 2. **Validate**: Check required inputs, reporting in place on failure
//! 3. **Execute**: Delegate to `StegoApi` for the network call
//! 4. **Render**: Translate the result into surface updates

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use log::{error, info, warn};

use crate::client::api::StegoApi;
use crate::client::error::ClientError;
use crate::client::metrics::ClientMetrics;
use crate::client::surfaces::{PreviewFrame, PreviewSlot, PreviewSurface, StatusSurface};
use crate::common::messages::Upload;

/// The name given to every saved encode download.
pub const DOWNLOAD_FILE_NAME: &str = "encoded.png";

const MISSING_FILE_STATUS: &str = "⚠ Please select a file first.";
const MISSING_INPUTS_STATUS: &str = "⚠ Please select a file and enter a message.";
const ENCODE_DONE_STATUS: &str = "✅ Encoded image previewed and downloaded!";

/// The three operations the service exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Encode = 0,
    Decode = 1,
    Detect = 2,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Encode => "encode",
            Operation::Decode => "decode",
            Operation::Detect => "detect",
        }
    }
}

/// Client middleware that turns form state into service calls and renders
/// outcomes onto the injected surfaces.
///
/// Surfaces are passed in at construction time rather than looked up
/// ambiently, so the client runs headless under test.
pub struct StegoClient {
    /// HTTP core for the three endpoints
    api: StegoApi,
    /// Status line handle
    status: Arc<dyn StatusSurface>,
    /// Image preview handle
    preview: Arc<dyn PreviewSurface>,
    /// Directory where encode downloads are written
    output_dir: PathBuf,
    /// Single-slot owner of the ephemeral preview frame
    preview_slot: PreviewSlot,
    /// One guard per operation; triggers are refused while set
    in_flight: [AtomicBool; 3],
    /// Optional per-request metrics sink
    metrics: Option<Arc<Mutex<ClientMetrics>>>,
}

impl StegoClient {
    /// Creates a new client middleware.
    ///
    /// # Arguments
    ///
    /// * `api` - HTTP core configured with the service base URL
    /// * `status` - Where outcome text is written
    /// * `preview` - Where encoded images are rendered
    /// * `output_dir` - Directory for saved downloads (created on demand)
    pub fn new(
        api: StegoApi,
        status: Arc<dyn StatusSurface>,
        preview: Arc<dyn PreviewSurface>,
        output_dir: impl AsRef<Path>,
    ) -> Self {
        Self {
            api,
            status,
            preview,
            output_dir: output_dir.as_ref().to_path_buf(),
            preview_slot: PreviewSlot::new(),
            in_flight: [AtomicBool::new(false), AtomicBool::new(false), AtomicBool::new(false)],
            metrics: None,
        }
    }

    /// Attaches a metrics sink recording every network-bound request.
    pub fn with_metrics(mut self, metrics: Arc<Mutex<ClientMetrics>>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Embeds `message` into the selected file, then previews and downloads
    /// the encoded result.
    ///
    /// Returns `true` when the operation completed successfully. Every exit
    /// path writes a status line; validation failures issue no network
    /// request.
    pub async fn encode(&self, file: Option<Upload>, message: &str) -> bool {
        let Some(_guard) = self.begin(Operation::Encode) else {
            return false;
        };

        let Some(upload) = file else {
            self.reject(Operation::Encode, MISSING_INPUTS_STATUS);
            return false;
        };
        if message.is_empty() {
            self.reject(Operation::Encode, MISSING_INPUTS_STATUS);
            return false;
        }

        let request_id = rand::random::<u64>();
        info!(
            "📤 Sending encode task #{} ({}, {} bytes)",
            request_id,
            upload.file_name,
            upload.bytes.len()
        );

        let started = Instant::now();
        match self.api.encode(&upload, message).await {
            Ok(encoded) => {
                let frame = Arc::new(PreviewFrame {
                    bytes: encoded.bytes,
                    content_type: encoded.content_type,
                    file_name: DOWNLOAD_FILE_NAME.to_string(),
                });

                // The slot drops any frame a previous encode left behind
                // before taking ownership of the new one.
                self.preview_slot.replace(frame.clone());
                self.preview.show(frame.clone());

                if let Err(e) = self.save_download(&frame) {
                    error!("❌ Failed to save {}: {}", DOWNLOAD_FILE_NAME, e);
                    self.record(Operation::Encode, request_id, started, false, Some("save failed"));
                    self.status.set_status("⚠ Something went wrong!");
                    return false;
                }

                self.record(Operation::Encode, request_id, started, true, None);
                self.status.set_status(ENCODE_DONE_STATUS);
                info!("✅ Encode task #{} completed", request_id);
                true
            }
            Err(err) => {
                self.fail(Operation::Encode, request_id, started, err);
                false
            }
        }
    }

    /// Extracts the hidden message from the selected file.
    pub async fn decode(&self, file: Option<Upload>) -> bool {
        let Some(_guard) = self.begin(Operation::Decode) else {
            return false;
        };

        let Some(upload) = file else {
            self.reject(Operation::Decode, MISSING_FILE_STATUS);
            return false;
        };

        let request_id = rand::random::<u64>();
        info!(
            "📤 Sending decode task #{} ({}, {} bytes)",
            request_id,
            upload.file_name,
            upload.bytes.len()
        );

        let started = Instant::now();
        match self.api.decode(&upload).await {
            Ok(decoded) => {
                self.record(Operation::Decode, request_id, started, true, None);
                self.status
                    .set_status(&format!("💬 Hidden message: {}", decoded.message));
                info!("✅ Decode task #{} completed", request_id);
                true
            }
            Err(err) => {
                self.fail(Operation::Decode, request_id, started, err);
                false
            }
        }
    }

    /// Classifies whether the selected file likely hides a message.
    pub async fn detect(&self, file: Option<Upload>) -> bool {
        let Some(_guard) = self.begin(Operation::Detect) else {
            return false;
        };

        let Some(upload) = file else {
            self.reject(Operation::Detect, MISSING_FILE_STATUS);
            return false;
        };

        let request_id = rand::random::<u64>();
        info!(
            "📤 Sending detect task #{} ({}, {} bytes)",
            request_id,
            upload.file_name,
            upload.bytes.len()
        );

        let started = Instant::now();
        match self.api.detect(&upload).await {
            Ok(detection) => {
                self.record(Operation::Detect, request_id, started, true, None);
                self.status
                    .set_status(&format!("🤖 Detection result: {}", detection.summary()));
                info!("✅ Detect task #{} completed", request_id);
                true
            }
            Err(err) => {
                self.fail(Operation::Detect, request_id, started, err);
                false
            }
        }
    }

    /// Releases the ephemeral frame once the preview reports the image has
    /// finished loading.
    pub fn preview_loaded(&self) {
        self.preview_slot.release();
    }

    /// Whether an encode frame is still awaiting its load-complete release.
    pub fn preview_frame_held(&self) -> bool {
        self.preview_slot.is_held()
    }

    /// Marks `op` in flight, refusing the trigger when a previous call of
    /// the same operation is still outstanding.
    fn begin(&self, op: Operation) -> Option<InFlightGuard<'_>> {
        let flag = &self.in_flight[op as usize];
        if flag.swap(true, Ordering::SeqCst) {
            warn!("⏳ {} already in flight; trigger ignored", op.as_str());
            return None;
        }

        Some(InFlightGuard { flag })
    }

    /// Reports a validation failure: the operation never dispatched, so no
    /// request is recorded.
    fn reject(&self, op: Operation, message: &str) {
        let err = ClientError::Validation(message.to_string());
        warn!("⚠️ {} rejected: {}", op.as_str(), err);
        self.status.set_status(&err.user_message());
    }

    /// Reports a failed network-bound request.
    fn fail(&self, op: Operation, request_id: u64, started: Instant, err: ClientError) {
        match &err {
            ClientError::Service { status, detail } => {
                warn!(
                    "⚠️ {} task #{} rejected by service (HTTP {}): {}",
                    op.as_str(),
                    request_id,
                    status,
                    detail
                );
                self.record(op, request_id, started, false, Some("service error"));
            }
            ClientError::Transport(detail) => {
                error!(
                    "❌ {} task #{} transport failure: {}",
                    op.as_str(),
                    request_id,
                    detail
                );
                self.record(op, request_id, started, false, Some("transport error"));
            }
            ClientError::Validation(message) => {
                warn!("⚠️ {} task #{} invalid input: {}", op.as_str(), request_id, message);
            }
        }

        self.status.set_status(&err.user_message());
    }

    /// Writes the encoded payload into the output directory.
    fn save_download(&self, frame: &PreviewFrame) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(&frame.file_name);
        std::fs::write(&path, &frame.bytes)?;
        info!("💾 Saved encoded image to {}", path.display());
        Ok(path)
    }

    fn record(
        &self,
        op: Operation,
        request_id: u64,
        started: Instant,
        success: bool,
        failure_reason: Option<&str>,
    ) {
        if let Some(metrics) = &self.metrics {
            metrics.lock().unwrap().record_request(
                request_id,
                op.as_str(),
                started.elapsed(),
                success,
                failure_reason.map(|reason| reason.to_string()),
            );
        }
    }
}

/// Clears the operation's in-flight flag when the call returns, on every
/// exit path.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::surfaces::{SharedPreview, SharedStatus};
    use std::time::Duration;

    // Points at a closed port; validation paths must return before any
    // network call anyway.
    fn offline_client(status: &SharedStatus, preview: &SharedPreview) -> StegoClient {
        let api = StegoApi::new("http://127.0.0.1:9", Duration::from_millis(200)).unwrap();
        StegoClient::new(
            api,
            Arc::new(status.clone()),
            Arc::new(preview.clone()),
            std::env::temp_dir().join("stego-client-middleware-test"),
        )
    }

    #[tokio::test]
    async fn encode_without_file_reports_validation() {
        let status = SharedStatus::new();
        let preview = SharedPreview::new();
        let client = offline_client(&status, &preview);

        assert!(!client.encode(None, "secret").await);
        assert_eq!(status.text(), MISSING_INPUTS_STATUS);
        assert_eq!(preview.generation(), 0);
    }

    #[tokio::test]
    async fn encode_without_message_reports_validation() {
        let status = SharedStatus::new();
        let preview = SharedPreview::new();
        let client = offline_client(&status, &preview);

        let upload = Upload::new("a.png", "image/png", vec![1, 2, 3]);
        assert!(!client.encode(Some(upload), "").await);
        assert_eq!(status.text(), MISSING_INPUTS_STATUS);
    }

    #[tokio::test]
    async fn decode_and_detect_without_file_report_validation() {
        let status = SharedStatus::new();
        let preview = SharedPreview::new();
        let client = offline_client(&status, &preview);

        assert!(!client.decode(None).await);
        assert_eq!(status.text(), MISSING_FILE_STATUS);

        assert!(!client.detect(None).await);
        assert_eq!(status.text(), MISSING_FILE_STATUS);
    }

    #[tokio::test]
    async fn validation_rejections_record_no_metrics() {
        let status = SharedStatus::new();
        let preview = SharedPreview::new();
        let metrics = Arc::new(Mutex::new(ClientMetrics::new("test".to_string())));
        let client = offline_client(&status, &preview).with_metrics(metrics.clone());

        assert!(!client.decode(None).await);
        assert!(!client.encode(None, "secret").await);

        assert_eq!(status.text(), MISSING_INPUTS_STATUS);
        assert_eq!(metrics.lock().unwrap().aggregate().total_requests, 0);
    }

    #[tokio::test]
    async fn in_flight_guard_clears_after_each_call() {
        let status = SharedStatus::new();
        let preview = SharedPreview::new();
        let client = offline_client(&status, &preview);

        // Validation exits must release the guard too.
        assert!(!client.decode(None).await);
        assert!(!client.decode(None).await);
        assert_eq!(status.text(), MISSING_FILE_STATUS);
    }
}
