//! Selection window state management.
//!
//! Tracks the rectangle being dragged, in reference-image pixels, and how
//! the window was closed.

use crate::calibration::CaptureArea;

/// How the user left the selection window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionOutcome {
    Confirmed,
    Cancelled,
}

/// Rectangle selection state.
#[derive(Debug)]
pub struct SelectionState {
    image_size: (u32, u32),
    anchor: Option<(f32, f32)>,
    current: Option<(f32, f32)>,
    outcome: Option<SelectionOutcome>,
}

impl SelectionState {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image_size: (width, height),
            anchor: None,
            current: None,
            outcome: None,
        }
    }

    /// Starts a new rectangle at `pos` (image coordinates).
    pub fn begin(&mut self, pos: (f32, f32)) {
        self.anchor = Some(pos);
        self.current = Some(pos);
    }

    /// Moves the free corner of the rectangle to `pos`.
    pub fn drag_to(&mut self, pos: (f32, f32)) {
        if self.anchor.is_some() {
            self.current = Some(pos);
        }
    }

    pub fn confirm(&mut self) {
        self.outcome = Some(SelectionOutcome::Confirmed);
    }

    pub fn cancel(&mut self) {
        self.outcome = Some(SelectionOutcome::Cancelled);
    }

    pub fn outcome(&self) -> Option<SelectionOutcome> {
        self.outcome
    }

    /// Current rectangle clamped to the image, or `None` if it has no area.
    pub fn rect(&self) -> Option<CaptureArea> {
        let ((ax, ay), (cx, cy)) = (self.anchor?, self.current?);
        let (w, h) = (self.image_size.0 as f32, self.image_size.1 as f32);

        let left = ax.min(cx).clamp(0.0, w).round();
        let right = ax.max(cx).clamp(0.0, w).round();
        let top = ay.min(cy).clamp(0.0, h).round();
        let bottom = ay.max(cy).clamp(0.0, h).round();

        CaptureArea::new(
            left as i64,
            top as i64,
            (right - left) as i64,
            (bottom - top) as i64,
        )
    }

    /// Rectangle to hand back to the caller: only a confirmed, non-empty one.
    pub fn result(&self) -> Option<CaptureArea> {
        match self.outcome {
            Some(SelectionOutcome::Confirmed) => self.rect(),
            _ => None,
        }
    }

    /// Status line shown above the image.
    pub fn status_text(&self) -> String {
        match self.rect() {
            Some(area) => format!("Selection: {}", area),
            None => "Drag with the left mouse button to select the book area".to_string(),
        }
    }
}

/// Scale that fits an image of `image` size into `available` space without
/// enlarging it.
pub fn fit_scale(image: (f32, f32), available: (f32, f32)) -> f32 {
    if image.0 <= 0.0 || image.1 <= 0.0 {
        return 1.0;
    }
    let scale = (available.0 / image.0).min(available.1 / image.1).min(1.0);
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}

/// Converts a point on screen to image coordinates, given where the image's
/// top-left corner is drawn and its display scale.
pub fn to_image_coords(pos: (f32, f32), origin: (f32, f32), scale: f32) -> (f32, f32) {
    ((pos.0 - origin.0) / scale, (pos.1 - origin.1) / scale)
}

/// Inverse of [`to_image_coords`].
pub fn to_screen_coords(pos: (f32, f32), origin: (f32, f32), scale: f32) -> (f32, f32) {
    (origin.0 + pos.0 * scale, origin.1 + pos.1 * scale)
}
