//! Calibration: choosing the monitor resolution and the capture area.
//!
//! The area can come from the configured default, typed coordinates, or a
//! mouse selection over a reference screenshot followed by fine adjustment
//! of individual edges.

pub mod area;
pub mod preview;
pub mod resolution;
pub mod wizard;

use anyhow::Result;
use image::RgbaImage;

pub use area::{CaptureArea, Edge};
pub use resolution::{select_resolution, Resolution};
pub use wizard::detect_book_area;

/// Interactive rectangle selection over a still image.
pub trait RegionSelector {
    /// Lets the user draw a rectangle over `image`.
    ///
    /// Returns the rectangle in image pixels, or `None` if the user cancelled
    /// or selected nothing.
    fn select(&self, image: &RgbaImage) -> Result<Option<CaptureArea>>;
}
