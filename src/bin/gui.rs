//! # GUI Binary Entry Point
//!
//! Desktop shell around the client library: a file picker, a message
//! input, one trigger per operation, a status line, and an encoded-image
//! preview.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin stego-gui -- --config config/client.toml
//! ```
//!
//! With metrics export:
//! ```bash
//! cargo run --bin stego-gui -- --metrics-output ./metrics/session.json
//! ```
//!
//! The shell will:
//! 1. Load configuration from the specified TOML file (defaults apply
//!    when none is given)
//! 2. Build the API core and the client middleware with shared surfaces
//! 3. Dispatch operations onto a tokio runtime, one at a time per
//!    operation (the trigger stays disabled while its request is in
//!    flight)
//! 4. Poll the shared surfaces each frame and render them

use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use eframe::egui::{self, ColorImage, RichText, TextureHandle};
use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;

use stego_client::client::metrics::ClientMetrics;
use stego_client::client::surfaces::{SharedPreview, SharedStatus, StatusSurface};
use stego_client::common::config::{load_config, ClientConfig};
use stego_client::{Operation, StegoApi, StegoClient, Upload};

/// Command-line arguments for the GUI binary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the client configuration file (TOML format)
    ///
    /// Example: config/client.toml
    #[arg(short, long)]
    config: Option<String>,

    /// Path to write metrics JSON output (optional)
    #[arg(long)]
    metrics_output: Option<String>,
}

/// Initialize the logging system with timestamp, level, and message formatting.
///
/// Logs are printed to stdout with INFO level by default.
/// Format: `[HH:MM:SS] [LEVEL] message`
fn init_logger() {
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter_level(LevelFilter::Info)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logger();

    let args = Args::parse();

    let config: ClientConfig = match &args.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    log::info!("🌐 Steganography service at {}", config.service.base_url);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let status = SharedStatus::new();
    let preview = SharedPreview::new();
    let api = StegoApi::new(
        &config.service.base_url,
        Duration::from_secs(config.transfer.request_timeout_secs),
    )?;
    let mut client = StegoClient::new(
        api,
        Arc::new(status.clone()),
        Arc::new(preview.clone()),
        &config.transfer.output_dir,
    );

    let metrics = if args.metrics_output.is_some() {
        let m = Arc::new(Mutex::new(ClientMetrics::new("stego-gui".to_string())));
        client = client.with_metrics(m.clone());
        Some(m)
    } else {
        None
    };

    let client = Arc::new(client);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([540.0, 640.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Stego Forensics",
        options,
        Box::new(move |cc| Ok(Box::new(App::new(cc, runtime, client, status, preview)))),
    )
    .map_err(|e| anyhow::anyhow!("GUI failed: {e}"))?;

    // Export metrics once the window has closed
    if let Some(metrics) = metrics {
        if let Some(output_path) = args.metrics_output {
            let metrics = metrics.lock().unwrap();
            metrics.export_to_json(&output_path)?;
            println!("Metrics exported to: {}", output_path);
        }
    }

    Ok(())
}

/// Status line for a selected file that could not be read from disk.
fn read_failure_status(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    format!("⚠ Could not read {}.", name)
}

// ---------------------------------------------------------------------------
// App state
// ---------------------------------------------------------------------------

struct App {
    runtime: tokio::runtime::Runtime,
    client: Arc<StegoClient>,
    status: SharedStatus,
    preview: SharedPreview,

    // Form state
    selected: Option<PathBuf>,
    message: String,

    // One flag per operation; its trigger is disabled while set
    busy: [bool; 3],
    done_tx: Sender<Operation>,
    done_rx: Receiver<Operation>,

    // Preview rendering
    preview_texture: Option<TextureHandle>,
    seen_generation: u64,
}

impl App {
    fn new(
        _cc: &eframe::CreationContext<'_>,
        runtime: tokio::runtime::Runtime,
        client: Arc<StegoClient>,
        status: SharedStatus,
        preview: SharedPreview,
    ) -> Self {
        let (done_tx, done_rx) = channel();
        Self {
            runtime,
            client,
            status,
            preview,
            selected: None,
            message: String::new(),
            busy: [false; 3],
            done_tx,
            done_rx,
            preview_texture: None,
            seen_generation: 0,
        }
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    fn trigger(&mut self, op: Operation, ctx: &egui::Context) {
        let upload = match &self.selected {
            Some(path) => match Upload::from_path(path) {
                Ok(upload) => Some(upload),
                Err(e) => {
                    // A selected file that cannot be read is not a missing
                    // file; report the read failure and keep the op undispatched.
                    log::error!("❌ Could not read {}: {}", path.display(), e);
                    self.status.set_status(&read_failure_status(path));
                    return;
                }
            },
            None => None,
        };
        let message = self.message.clone();
        let client = self.client.clone();
        let done_tx = self.done_tx.clone();
        let repaint = ctx.clone();

        self.busy[op as usize] = true;
        self.runtime.spawn(async move {
            match op {
                Operation::Encode => {
                    client.encode(upload, &message).await;
                }
                Operation::Decode => {
                    client.decode(upload).await;
                }
                Operation::Detect => {
                    client.detect(upload).await;
                }
            }
            let _ = done_tx.send(op);
            repaint.request_repaint();
        });
    }

    fn poll_done(&mut self) {
        while let Ok(op) = self.done_rx.try_recv() {
            self.busy[op as usize] = false;
        }
    }

    // ------------------------------------------------------------------
    // Preview
    // ------------------------------------------------------------------

    fn poll_preview(&mut self, ctx: &egui::Context) {
        let generation = self.preview.generation();
        if generation == self.seen_generation {
            return;
        }
        self.seen_generation = generation;

        match self.preview.frame() {
            Some(frame) => {
                self.preview_texture = Self::load_texture(ctx, &frame.bytes);
                // The frame is on screen (or failed to render); either way
                // its ephemeral holder can let go now.
                self.client.preview_loaded();
            }
            None => {
                self.preview_texture = None;
            }
        }
    }

    fn load_texture(ctx: &egui::Context, bytes: &[u8]) -> Option<TextureHandle> {
        let img = match image::load_from_memory(bytes) {
            Ok(img) => img,
            Err(e) => {
                log::error!("❌ Could not decode preview image: {}", e);
                return None;
            }
        };
        let rgba = img.to_rgba8();
        let (w, h) = rgba.dimensions();

        let max_dim = 512u32;
        let (tw, th) = if w.max(h) > max_dim {
            let s = max_dim as f64 / w.max(h) as f64;
            ((w as f64 * s) as u32, (h as f64 * s) as u32)
        } else {
            (w, h)
        };

        let thumb = if (tw, th) != (w, h) {
            image::imageops::resize(&rgba, tw, th, image::imageops::FilterType::Triangle)
        } else {
            rgba
        };

        let ci = ColorImage::from_rgba_unmultiplied([tw as usize, th as usize], thumb.as_raw());
        Some(ctx.load_texture("encoded-preview", ci, egui::TextureOptions::default()))
    }

    fn show_preview(ui: &mut egui::Ui, tex: &TextureHandle, max: egui::Vec2) {
        let ts = tex.size_vec2();
        let scale = (max.x / ts.x).min(max.y / ts.y).min(1.0);
        let size = ts * scale;
        ui.add(egui::Image::from_texture(egui::load::SizedTexture::new(
            tex.id(),
            size,
        )));
    }

    // ------------------------------------------------------------------
    // UI sections
    // ------------------------------------------------------------------

    fn ui_file_row(&mut self, ui: &mut egui::Ui) {
        ui.label(RichText::new("Image file").size(12.0));
        ui.horizontal(|ui| {
            let name = self
                .selected
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "No file selected".to_string());
            ui.label(RichText::new(name).size(12.0));

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Select…").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Images", &["png", "jpg", "jpeg", "bmp"])
                        .pick_file()
                    {
                        self.selected = Some(path);
                    }
                }
            });
        });
    }

    fn ui_triggers(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.horizontal(|ui| {
            for (op, label) in [
                (Operation::Encode, "Encode"),
                (Operation::Decode, "Decode"),
                (Operation::Detect, "Detect"),
            ] {
                let enabled = !self.busy[op as usize];
                if ui.add_enabled(enabled, egui::Button::new(label)).clicked() {
                    self.trigger(op, ctx);
                }
                ui.add_space(4.0);
            }
        });
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_done();
        self.poll_preview(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Stego Forensics");
            ui.add_space(8.0);

            self.ui_file_row(ui);
            ui.add_space(8.0);

            ui.label(RichText::new("Hidden message (encode only)").size(12.0));
            ui.add(
                egui::TextEdit::singleline(&mut self.message)
                    .hint_text("Enter the message to embed")
                    .desired_width(f32::INFINITY),
            );
            ui.add_space(10.0);

            self.ui_triggers(ui, ctx);
            ui.add_space(10.0);

            ui.separator();
            ui.label(RichText::new(self.status.text()).size(13.0));
            ui.add_space(10.0);

            if let Some(tex) = &self.preview_texture {
                ui.label(RichText::new("Encoded preview").size(12.0).strong());
                ui.add_space(4.0);
                let max = egui::vec2(ui.available_width(), 360.0);
                Self::show_preview(ui, tex, max);
            }
        });

        if self.busy.iter().any(|b| *b) {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_failure_status_names_the_file() {
        let path = PathBuf::from("/home/user/photos/vacation.png");
        assert_eq!(read_failure_status(&path), "⚠ Could not read vacation.png.");
    }

    #[test]
    fn test_read_failure_status_falls_back_to_full_path() {
        let path = PathBuf::from("/");
        assert_eq!(read_failure_status(&path), "⚠ Could not read /.");
    }
}
