//! Primary monitor discovery.

use anyhow::{anyhow, Result};

use windows::Win32::Foundation::POINT;
use windows::Win32::Graphics::Gdi::{MonitorFromPoint, HMONITOR, MONITOR_DEFAULTTOPRIMARY};
use windows::Win32::UI::HiDpi::{
    SetProcessDpiAwarenessContext, DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2,
};
use windows::Win32::UI::WindowsAndMessaging::{GetSystemMetrics, SM_CXSCREEN, SM_CYSCREEN};

use crate::calibration::Resolution;

/// Opts the process into per-monitor DPI awareness so that metrics and
/// capture coordinates are physical pixels rather than scaled ones.
///
/// Failure (e.g. awareness already set by a manifest) is logged and ignored.
pub fn enable_dpi_awareness() {
    if let Err(e) =
        unsafe { SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2) }
    {
        crate::log(&format!("Could not enable per-monitor DPI awareness: {}", e));
    }
}

/// Returns the handle of the primary monitor (the one containing the origin).
pub fn primary_monitor() -> HMONITOR {
    unsafe { MonitorFromPoint(POINT { x: 0, y: 0 }, MONITOR_DEFAULTTOPRIMARY) }
}

/// Returns the primary monitor's resolution.
pub fn primary_monitor_resolution() -> Result<Resolution> {
    let width = unsafe { GetSystemMetrics(SM_CXSCREEN) };
    let height = unsafe { GetSystemMetrics(SM_CYSCREEN) };

    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => Ok(Resolution::new(w, h)),
        _ => Err(anyhow!(
            "GetSystemMetrics returned an invalid screen size {}x{}",
            width,
            height
        )),
    }
}
