//! Rectangle selection window.
//!
//! Shows the reference screenshot with egui/eframe and lets the user drag a
//! rectangle over it.

pub mod render;
pub mod state;

use anyhow::{anyhow, Result};
use image::RgbaImage;
use std::sync::{Arc, Mutex};

use eframe::egui::{self, ColorImage, TextureHandle};

use crate::calibration::{CaptureArea, RegionSelector};

use state::SelectionState;

const WINDOW_TITLE: &str = "Select the book area and press ENTER";

/// Selection window application.
struct SelectorApp {
    /// Screenshot waiting to be uploaded on the first frame.
    pending_image: Option<ColorImage>,
    texture: Option<TextureHandle>,
    state: SelectionState,
    /// Written when the window closes with a confirmed selection.
    result: Arc<Mutex<Option<CaptureArea>>>,
}

impl SelectorApp {
    fn new(image: &RgbaImage, result: Arc<Mutex<Option<CaptureArea>>>) -> Self {
        let size = [image.width() as usize, image.height() as usize];
        Self {
            pending_image: Some(ColorImage::from_rgba_unmultiplied(size, image.as_raw())),
            texture: None,
            state: SelectionState::new(image.width(), image.height()),
            result,
        }
    }

    fn load_texture(&mut self, ctx: &egui::Context) {
        if let Some(image) = self.pending_image.take() {
            self.texture =
                Some(ctx.load_texture("reference_screenshot", image, egui::TextureOptions::LINEAR));
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        let (confirm, cancel) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Enter) || i.key_pressed(egui::Key::Space),
                i.key_pressed(egui::Key::Escape) || i.key_pressed(egui::Key::C),
            )
        });
        if confirm {
            self.state.confirm();
        } else if cancel {
            self.state.cancel();
        }
    }
}

impl eframe::App for SelectorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.load_texture(ctx);
        self.handle_keys(ctx);

        if self.state.outcome().is_some() {
            if let Ok(mut result) = self.result.lock() {
                *result = self.state.result();
            }
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        egui::TopBottomPanel::top("instructions").show(ctx, |ui| {
            render::render_instructions(ui, &self.state);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(texture) = &self.texture {
                render::render_image(ui, texture, &mut self.state);
            }
        });
    }
}

/// [`RegionSelector`] backed by a native eframe window.
pub struct WindowSelector;

impl RegionSelector for WindowSelector {
    fn select(&self, image: &RgbaImage) -> Result<Option<CaptureArea>> {
        let result = Arc::new(Mutex::new(None));
        let app = SelectorApp::new(image, result.clone());

        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_title(WINDOW_TITLE)
                .with_maximized(true)
                // Disable drag-and-drop to avoid COM conflict with RoInitialize (multithreaded)
                .with_drag_and_drop(false),
            ..Default::default()
        };

        crate::log("Opening selection window...");
        eframe::run_native(WINDOW_TITLE, options, Box::new(|_cc| Ok(Box::new(app))))
            .map_err(|e| anyhow!("Selection window failed: {}", e))?;

        let selected = result
            .lock()
            .map_err(|_| anyhow!("Selection result lock poisoned"))?
            .take();
        crate::log(&match selected {
            Some(area) => format!("Selection window closed with {}", area),
            None => "Selection window closed without a selection".to_string(),
        });
        Ok(selected)
    }
}
