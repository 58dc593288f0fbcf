//! Reference screenshot normalization and adjustment previews.

use anyhow::Result;
use image::imageops::FilterType;
use image::RgbaImage;
use std::path::Path;

use crate::calibration::{CaptureArea, Resolution};
use crate::capture::{crop_to_rgb, save_png};

/// Rescales a reference screenshot to `selected` when the monitor's live
/// resolution differs. Returns the image and the resolution it is now in.
pub fn normalize_reference(
    screen: RgbaImage,
    live: Resolution,
    selected: Resolution,
) -> (RgbaImage, Resolution) {
    if live == selected {
        return (screen, live);
    }

    crate::log(&format!(
        "Resizing reference screenshot from {} to {}",
        live, selected
    ));
    let resized = image::imageops::resize(
        &screen,
        selected.width,
        selected.height,
        FilterType::Triangle,
    );
    (resized, selected)
}

/// Writes the part of `reference` covered by `area` to `path`.
///
/// Returns `Ok(false)` without writing when the area lies entirely outside
/// the reference image.
pub fn write_preview(reference: &RgbaImage, area: &CaptureArea, path: &Path) -> Result<bool> {
    let crop = crop_to_rgb(reference, area);
    if crop.width() == 0 || crop.height() == 0 {
        return Ok(false);
    }

    save_png(&crop, path)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::tempdir;

    #[test]
    fn test_normalize_keeps_matching_resolution() {
        let screen = RgbaImage::new(40, 30);
        let (img, res) = normalize_reference(screen, Resolution::new(40, 30), Resolution::new(40, 30));

        assert_eq!(img.dimensions(), (40, 30));
        assert_eq!(res, Resolution::new(40, 30));
    }

    #[test]
    fn test_normalize_resizes_to_selected() {
        let screen = RgbaImage::from_pixel(80, 60, Rgba([10, 20, 30, 255]));
        let (img, res) = normalize_reference(screen, Resolution::new(80, 60), Resolution::new(40, 30));

        assert_eq!(img.dimensions(), (40, 30));
        assert_eq!(res, Resolution::new(40, 30));
        assert_eq!(*img.get_pixel(20, 15), Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn test_write_preview_crops_area() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("adjusted_area.png");
        let reference = RgbaImage::new(100, 100);

        let area = CaptureArea { x: 10, y: 20, width: 30, height: 40 };
        assert!(write_preview(&reference, &area, &path).unwrap());

        let written = image::open(&path).unwrap();
        assert_eq!((written.width(), written.height()), (30, 40));
    }

    #[test]
    fn test_write_preview_skips_area_outside_image() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("adjusted_area.png");
        let reference = RgbaImage::new(100, 100);

        let area = CaptureArea { x: 150, y: 0, width: 30, height: 40 };
        assert!(!write_preview(&reference, &area, &path).unwrap());
        assert!(!path.exists());
    }
}
