//! Screen capture and desktop interaction.
//!
//! This module provides:
//! - The [`Desktop`] capability used by the capture flow (`grab_area`, `next_page`, ...)
//! - The platform implementation returned by [`open_desktop`]

#[cfg(windows)]
pub mod monitor;
#[cfg(windows)]
pub mod screenshot;

use anyhow::{Context, Result};
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::{RgbImage, RgbaImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Duration;

use crate::calibration::{CaptureArea, Resolution};

/// Live desktop the pages are captured from.
///
/// Every call is self-contained: capture sessions are opened and closed
/// within a single grab.
pub trait Desktop {
    /// Resolution of the monitor being captured, in physical pixels.
    fn monitor_resolution(&self) -> Result<Resolution>;

    /// Grabs the whole monitor.
    fn grab_screen(&self) -> Result<RgbaImage>;

    /// Grabs exactly the pixels inside `area` (live-screen coordinates).
    fn grab_area(&self, area: &CaptureArea) -> Result<RgbImage>;

    /// Sends the "next page" key to the foreground window.
    fn next_page(&self) -> Result<()>;

    /// Blocks for `duration`.
    fn pause(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Crops `area` out of a full-monitor grab and drops the alpha channel.
///
/// The result is always `area.width` x `area.height`. Pixels beyond the
/// screen edge are black.
pub fn crop_to_rgb(screen: &RgbaImage, area: &CaptureArea) -> RgbImage {
    let visible = image::imageops::crop_imm(screen, area.x, area.y, area.width, area.height);
    let visible = image::DynamicImage::ImageRgba8(visible.to_image()).to_rgb8();
    let mut page = RgbImage::new(area.width, area.height);
    image::imageops::replace(&mut page, &visible, 0, 0);
    page
}

/// Writes `image` as a PNG with fast (still lossless) compression.
pub fn save_png(image: &RgbImage, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let encoder = PngEncoder::new_with_quality(
        BufWriter::new(file),
        CompressionType::Fast,
        PngFilterType::NoFilter,
    );
    image
        .write_with_encoder(encoder)
        .with_context(|| format!("Failed to encode {}", path.display()))?;
    Ok(())
}

/// Opens the desktop for the current platform.
#[cfg(windows)]
pub fn open_desktop(key: crate::automation::input::NextPageKey) -> Result<Box<dyn Desktop>> {
    monitor::enable_dpi_awareness();
    Ok(Box::new(WindowsDesktop { key }))
}

/// Opens the desktop for the current platform.
#[cfg(not(windows))]
pub fn open_desktop(_key: crate::automation::input::NextPageKey) -> Result<Box<dyn Desktop>> {
    Err(anyhow::anyhow!(
        "Screen capture and key simulation are only implemented for Windows"
    ))
}

/// Primary monitor captured with Windows Graphics Capture, pages turned with SendInput.
#[cfg(windows)]
struct WindowsDesktop {
    key: crate::automation::input::NextPageKey,
}

#[cfg(windows)]
impl Desktop for WindowsDesktop {
    fn monitor_resolution(&self) -> Result<Resolution> {
        monitor::primary_monitor_resolution()
    }

    fn grab_screen(&self) -> Result<RgbaImage> {
        screenshot::capture_primary_monitor()
    }

    fn grab_area(&self, area: &CaptureArea) -> Result<RgbImage> {
        let screen = screenshot::capture_primary_monitor()?;
        Ok(crop_to_rgb(&screen, area))
    }

    fn next_page(&self) -> Result<()> {
        crate::automation::input::press_key(self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_crop_to_rgb_takes_exact_pixels() {
        let mut screen = RgbaImage::from_pixel(20, 10, Rgba([0, 0, 0, 255]));
        screen.put_pixel(5, 3, Rgba([200, 100, 50, 255]));

        let area = CaptureArea { x: 5, y: 3, width: 4, height: 2 };
        let cropped = crop_to_rgb(&screen, &area);

        assert_eq!(cropped.dimensions(), (4, 2));
        assert_eq!(cropped.get_pixel(0, 0).0, [200, 100, 50]);
        assert_eq!(cropped.get_pixel(1, 0).0, [0, 0, 0]);
    }

    #[test]
    fn test_save_png_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page_0001.png");
        let mut page = RgbImage::new(8, 8);
        page.put_pixel(3, 4, image::Rgb([1, 2, 3]));

        save_png(&page, &path).unwrap();

        let decoded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(decoded, page);
    }

    #[test]
    fn test_crop_to_rgb_pads_past_edge() {
        let screen = RgbaImage::from_pixel(20, 10, Rgba([9, 9, 9, 255]));
        let area = CaptureArea { x: 15, y: 5, width: 10, height: 10 };

        let cropped = crop_to_rgb(&screen, &area);
        assert_eq!(cropped.dimensions(), (10, 10));
        assert_eq!(cropped.get_pixel(4, 4).0, [9, 9, 9]);
        assert_eq!(cropped.get_pixel(5, 4).0, [0, 0, 0]);
        assert_eq!(cropped.get_pixel(4, 5).0, [0, 0, 0]);
    }

    #[test]
    fn test_off_screen_area_still_saves() {
        let dir = tempfile::tempdir().unwrap();
        let screen = RgbaImage::from_pixel(1920, 1080, Rgba([9, 9, 9, 255]));
        let area = CaptureArea { x: 2000, y: 0, width: 100, height: 100 };

        let cropped = crop_to_rgb(&screen, &area);
        assert_eq!(cropped.dimensions(), (100, 100));
        assert!(cropped.pixels().all(|p| p.0 == [0, 0, 0]));
        save_png(&cropped, &dir.path().join("page_0001.png")).unwrap();
    }

    #[test]
    fn test_default_area_keeps_full_size_on_small_screen() {
        let screen = RgbaImage::new(1920, 1080);
        let area = CaptureArea { x: 1281, y: 145, width: 1349, height: 1880 };

        assert_eq!(crop_to_rgb(&screen, &area).dimensions(), (1349, 1880));
    }
}
