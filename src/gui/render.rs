//! Selection window rendering.

use eframe::egui::{self, Color32, Pos2, Rect, RichText, Stroke, TextureHandle, Vec2};

use super::state::{fit_scale, to_image_coords, to_screen_coords, SelectionState};

const SELECTION_COLOR: Color32 = Color32::from_rgb(0, 255, 0);

/// Render the key help and the current selection.
pub fn render_instructions(ui: &mut egui::Ui, state: &SelectionState) {
    ui.horizontal(|ui| {
        ui.label(RichText::new("Enter / Space").strong());
        ui.label("confirm");
        ui.add_space(12.0);
        ui.label(RichText::new("Esc / C").strong());
        ui.label("cancel");
        ui.add_space(24.0);
        ui.label(state.status_text());
    });
}

/// Render the reference screenshot scaled to fit and handle dragging.
pub fn render_image(ui: &mut egui::Ui, texture: &TextureHandle, state: &mut SelectionState) {
    let [tex_w, tex_h] = texture.size();
    let available = ui.available_size();
    let scale = fit_scale((tex_w as f32, tex_h as f32), (available.x, available.y));
    let size = Vec2::new(tex_w as f32 * scale, tex_h as f32 * scale);

    let response = ui.add(egui::Image::new((texture.id(), size)).sense(egui::Sense::drag()));
    let origin = (response.rect.min.x, response.rect.min.y);

    if let Some(pointer) = response.interact_pointer_pos() {
        if response.drag_started() {
            // Anchor where the button went down, not where the drag threshold was crossed
            let press = ui.input(|i| i.pointer.press_origin()).unwrap_or(pointer);
            state.begin(to_image_coords((press.x, press.y), origin, scale));
        }
        if response.dragged() {
            state.drag_to(to_image_coords((pointer.x, pointer.y), origin, scale));
        }
    }

    if let Some(area) = state.rect() {
        let (x0, y0) = to_screen_coords((area.x as f32, area.y as f32), origin, scale);
        let (x1, y1) = to_screen_coords(
            ((area.x + area.width) as f32, (area.y + area.height) as f32),
            origin,
            scale,
        );
        let rect = Rect::from_min_max(Pos2::new(x0, y0), Pos2::new(x1, y1));
        ui.painter()
            .rect_stroke(rect, 0.0, Stroke::new(2.0, SELECTION_COLOR));

        // Crosshair at the centre of the selection
        let center = rect.center();
        let stroke = Stroke::new(1.0, SELECTION_COLOR);
        ui.painter().line_segment(
            [Pos2::new(rect.min.x, center.y), Pos2::new(rect.max.x, center.y)],
            stroke,
        );
        ui.painter().line_segment(
            [Pos2::new(center.x, rect.min.y), Pos2::new(center.x, rect.max.y)],
            stroke,
        );
    }
}
