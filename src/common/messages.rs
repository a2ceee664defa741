//! # Service Wire Types
//!
//! Payloads exchanged with the steganography service. Requests travel as
//! `multipart/form-data`; responses are either a binary image body
//! (`/encode`) or JSON (`/decode`, `/detect`, and every error body).

use serde::{Deserialize, Serialize};
use std::path::Path;

/// A file selected for upload.
///
/// Present for every operation. The MIME type is sniffed from the file
/// bytes, falling back to a generic binary type when the signature is not
/// recognized.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Original filename, forwarded in the multipart `file` part
    pub file_name: String,
    /// MIME type of the payload (e.g., "image/png")
    pub mime_type: String,
    /// Raw file contents
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Reads a file from disk and sniffs its MIME type from the content.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload.bin".to_string());
        let mime_type = infer::get(&bytes)
            .map(|kind| kind.mime_type().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        Ok(Self {
            file_name,
            mime_type,
            bytes,
        })
    }
}

/// Binary result of a successful `/encode` call.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    /// Encoded image payload
    pub bytes: Vec<u8>,
    /// Content type reported by the service (expected `image/*`)
    pub content_type: String,
}

/// JSON body of a successful `/decode` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodedMessage {
    /// The extracted hidden message
    pub message: String,
}

/// JSON body of a successful `/detect` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    /// Classification label (e.g., "Possibly Stego", "Likely Clean")
    pub result: String,
    /// Which detector produced the verdict (e.g., "heuristic")
    pub mode: String,
    /// Confidence score, when the detector reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
}

impl Detection {
    /// Human-readable one-line verdict.
    ///
    /// A probability of exactly zero is suppressed along with a missing
    /// one. Whether a zero-confidence verdict should display is an open
    /// product question; until it is settled, zero stays hidden.
    pub fn summary(&self) -> String {
        let mut text = format!("{} ({})", self.result, self.mode);
        if let Some(probability) = self.probability {
            if probability != 0.0 {
                text.push_str(&format!(" — Probability: {}", probability));
            }
        }
        text
    }
}

/// JSON error body returned by the service on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable failure description
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_includes_probability_when_present() {
        let detection = Detection {
            result: "stego".to_string(),
            mode: "LSB".to_string(),
            probability: Some(0.87),
        };

        assert_eq!(detection.summary(), "stego (LSB) — Probability: 0.87");
    }

    #[test]
    fn summary_omits_probability_when_absent() {
        let detection = Detection {
            result: "stego".to_string(),
            mode: "LSB".to_string(),
            probability: None,
        };

        assert_eq!(detection.summary(), "stego (LSB)");
    }

    #[test]
    fn summary_suppresses_probability_of_exactly_zero() {
        let detection = Detection {
            result: "Likely Clean".to_string(),
            mode: "heuristic".to_string(),
            probability: Some(0.0),
        };

        assert_eq!(detection.summary(), "Likely Clean (heuristic)");
    }

    #[test]
    fn detection_deserializes_without_probability() {
        let detection: Detection =
            serde_json::from_str(r#"{"result":"stego","mode":"LSB"}"#).unwrap();

        assert_eq!(detection.result, "stego");
        assert_eq!(detection.mode, "LSB");
        assert!(detection.probability.is_none());
    }

    #[test]
    fn upload_mime_falls_back_for_unknown_bytes() {
        let dir = std::env::temp_dir().join("stego-client-upload-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("mystery.dat");
        std::fs::write(&path, b"not an image at all").unwrap();

        let upload = Upload::from_path(&path).unwrap();
        assert_eq!(upload.file_name, "mystery.dat");
        assert_eq!(upload.mime_type, "application/octet-stream");

        std::fs::remove_file(&path).ok();
    }
}
