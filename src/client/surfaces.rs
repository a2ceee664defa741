//! # UI Surfaces
//!
//! Handles to the interactive regions the client writes to: a status line
//! and an image preview. They are injected at construction time so the
//! client runs headless in tests, with recording fakes standing in for a
//! live UI.
//!
//! The module also owns [`PreviewSlot`], the single-slot holder that
//! manages the lifetime of the ephemeral preview frame produced by an
//! encode.

use std::sync::{Arc, Mutex};

/// A frame of encoded-image bytes held for preview and download.
#[derive(Debug, Clone)]
pub struct PreviewFrame {
    /// Encoded image payload
    pub bytes: Vec<u8>,
    /// Content type reported by the service
    pub content_type: String,
    /// Filename offered by the download action
    pub file_name: String,
}

/// Where operation outcomes are written as human-readable text.
pub trait StatusSurface: Send + Sync {
    fn set_status(&self, text: &str);
}

/// Where encoded images are rendered.
///
/// `show` replaces whatever was displayed before; `clear` empties the
/// region.
pub trait PreviewSurface: Send + Sync {
    fn show(&self, frame: Arc<PreviewFrame>);
    fn clear(&self);
}

/// Single-slot owner of the ephemeral preview frame.
///
/// Exactly one frame is held at a time: storing a new frame drops the
/// previous one first, and [`release`](PreviewSlot::release) drops the
/// current one once the surface reports the image has finished loading.
/// Overlapping encodes therefore never strand a frame.
#[derive(Default)]
pub struct PreviewSlot {
    current: Mutex<Option<Arc<PreviewFrame>>>,
}

impl PreviewSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `frame`, releasing any previously held frame first.
    pub fn replace(&self, frame: Arc<PreviewFrame>) {
        let mut slot = self.current.lock().unwrap();
        *slot = Some(frame);
    }

    /// Drops the held frame; called when the preview finishes loading.
    pub fn release(&self) {
        let mut slot = self.current.lock().unwrap();
        *slot = None;
    }

    /// Whether a frame is currently held.
    pub fn is_held(&self) -> bool {
        self.current.lock().unwrap().is_some()
    }

    /// The currently held frame, if any.
    pub fn current(&self) -> Option<Arc<PreviewFrame>> {
        self.current.lock().unwrap().clone()
    }
}

/// Status surface backed by shared text, suitable for polling UIs.
#[derive(Clone, Default)]
pub struct SharedStatus {
    text: Arc<Mutex<String>>,
}

impl SharedStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.text.lock().unwrap().clone()
    }
}

impl StatusSurface for SharedStatus {
    fn set_status(&self, text: &str) {
        *self.text.lock().unwrap() = text.to_string();
    }
}

/// Preview surface backed by a shared slot, suitable for polling UIs.
///
/// The generation counter bumps on every `show`/`clear`; a polling UI
/// re-renders when the generation it last saw is stale.
#[derive(Clone, Default)]
pub struct SharedPreview {
    inner: Arc<Mutex<SharedPreviewState>>,
}

#[derive(Default)]
struct SharedPreviewState {
    frame: Option<Arc<PreviewFrame>>,
    generation: u64,
}

impl SharedPreview {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.inner.lock().unwrap().generation
    }

    pub fn frame(&self) -> Option<Arc<PreviewFrame>> {
        self.inner.lock().unwrap().frame.clone()
    }
}

impl PreviewSurface for SharedPreview {
    fn show(&self, frame: Arc<PreviewFrame>) {
        let mut state = self.inner.lock().unwrap();
        state.frame = Some(frame);
        state.generation += 1;
    }

    fn clear(&self) {
        let mut state = self.inner.lock().unwrap();
        state.frame = None;
        state.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(tag: u8) -> Arc<PreviewFrame> {
        Arc::new(PreviewFrame {
            bytes: vec![tag],
            content_type: "image/png".to_string(),
            file_name: "encoded.png".to_string(),
        })
    }

    #[test]
    fn replace_drops_the_previous_frame() {
        let slot = PreviewSlot::new();
        slot.replace(frame(1));
        slot.replace(frame(2));

        let held = slot.current().unwrap();
        assert_eq!(held.bytes, vec![2]);
    }

    #[test]
    fn release_empties_the_slot() {
        let slot = PreviewSlot::new();
        slot.replace(frame(1));
        assert!(slot.is_held());

        slot.release();
        assert!(!slot.is_held());
        assert!(slot.current().is_none());
    }

    #[test]
    fn shared_preview_bumps_generation_on_show_and_clear() {
        let preview = SharedPreview::new();
        assert_eq!(preview.generation(), 0);

        preview.show(frame(1));
        assert_eq!(preview.generation(), 1);
        assert!(preview.frame().is_some());

        preview.clear();
        assert_eq!(preview.generation(), 2);
        assert!(preview.frame().is_none());
    }
}
