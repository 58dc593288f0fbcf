//! Capture area wizard.
//!
//! Provides interactive area detection using console prompts and, for the
//! mouse option, a selection window followed by per-edge fine adjustment.

use anyhow::Result;
use image::RgbaImage;
use std::path::Path;

use crate::automation::config::CaptureConfig;
use crate::calibration::preview::{normalize_reference, write_preview};
use crate::calibration::{CaptureArea, Edge, RegionSelector, Resolution};
use crate::capture::Desktop;
use crate::console::Console;
use crate::log;

/// The finalized capture area and the resolution it was chosen against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AreaSelection {
    pub area: CaptureArea,
    pub resolution: Resolution,
}

/// Asks how the book area should be defined and produces it.
///
/// Returns `Ok(None)` when the user exits, enters invalid coordinates or
/// cancels the mouse selection. Only infrastructure failures (screen grab,
/// preview write, closed input) are errors.
pub fn detect_book_area(
    console: &mut dyn Console,
    desktop: &dyn Desktop,
    selector: &dyn RegionSelector,
    resolution: Resolution,
    config: &CaptureConfig,
) -> Result<Option<AreaSelection>> {
    console.say("Do you want to use a default area, enter coordinates, or select manually?");
    console.say(&format!("1 - Use default area ({})", config.default_area));
    console.say("2 - Enter coordinates manually");
    console.say("3 - Manual selection with mouse");
    console.say("4 - Exit");

    let option = console.ask("Enter option (1, 2, 3 or 4): ")?;

    let selection = match option.as_str() {
        "1" => {
            let area = config.default_area;
            console.say(&format!("Using default area: {}", area));
            Some(AreaSelection { area, resolution })
        }
        "2" => read_manual_area(console)?.map(|area| AreaSelection { area, resolution }),
        "3" => select_with_mouse(console, desktop, selector, resolution, &config.preview_path)?,
        "4" => {
            console.say("Exiting without selecting an area.");
            None
        }
        _ => {
            console.say("Invalid option. Exiting.");
            None
        }
    };

    match &selection {
        Some(s) => log(&format!(
            "Capture area: {} (reference resolution {})",
            s.area, s.resolution
        )),
        None => log("No capture area selected"),
    }

    Ok(selection)
}

/// Reads x, y, width and height. Any bad value aborts instead of re-prompting.
fn read_manual_area(console: &mut dyn Console) -> Result<Option<CaptureArea>> {
    console.say("Enter the coordinates and size of the area to capture.");

    let mut values = [0i64; 4];
    for (slot, prompt) in values
        .iter_mut()
        .zip(["x (left): ", "y (top): ", "width: ", "height: "])
    {
        let answer = console.ask(prompt)?;
        match answer.parse::<i64>() {
            Ok(value) => *slot = value,
            Err(e) => {
                console.say(&format!("Error entering coordinates: {} ({:?})", e, answer));
                return Ok(None);
            }
        }
    }

    let [x, y, width, height] = values;
    match CaptureArea::new(x, y, width, height) {
        Some(area) => {
            console.say(&format!("Entered area: {}", area));
            Ok(Some(area))
        }
        None => {
            console.say("Invalid values. Aborting.");
            Ok(None)
        }
    }
}

/// Grabs a reference screenshot, lets the user draw the area, then runs the
/// fine adjustment loop.
fn select_with_mouse(
    console: &mut dyn Console,
    desktop: &dyn Desktop,
    selector: &dyn RegionSelector,
    resolution: Resolution,
    preview_path: &Path,
) -> Result<Option<AreaSelection>> {
    let screen = desktop.grab_screen()?;
    let live = Resolution::new(screen.width(), screen.height());
    let (reference, used) = normalize_reference(screen, live, resolution);

    console.say("Please select the book area manually (a window will open).");
    let selected = selector
        .select(&reference)?
        .filter(|area| area.width > 0 && area.height > 0);
    let Some(selected) = selected else {
        console.say("No area selected. Aborting.");
        return Ok(None);
    };

    let area = adjust_area(console, &reference, selected, preview_path)?;
    Ok(Some(AreaSelection {
        area,
        resolution: used,
    }))
}

/// Fine adjustment loop. Writes a preview of the current area before every
/// prompt, so the last preview always matches the returned area.
pub fn adjust_area(
    console: &mut dyn Console,
    reference: &RgbaImage,
    mut area: CaptureArea,
    preview_path: &Path,
) -> Result<CaptureArea> {
    console.say("");
    console.say("--- Fine Adjustment ---");
    console.say("You can enter positive or negative values in pixels.");
    console.say("To stop adjusting, type 'N' and press ENTER.");

    loop {
        console.say("");
        console.say(&format!("Current area: {}", area));
        if write_preview(reference, &area, preview_path)? {
            console.say(&format!(
                "Preview updated (captured area only): {}",
                preview_path.display()
            ));
        } else {
            console.say("Preview skipped: the area lies outside the screenshot.");
        }

        let side = console.ask("Which side to adjust? (left, right, top, bottom) or 'N' to finish: ")?;
        if side.eq_ignore_ascii_case("n") {
            break;
        }
        let Ok(edge) = side.parse::<Edge>() else {
            console.say("Invalid side. Use: left, right, top, bottom or N.");
            continue;
        };

        let value = console.ask(&format!("Adjustment amount for {} (in pixels): ", edge))?;
        let Ok(delta) = value.parse::<i64>() else {
            console.say("Invalid value. Must be an integer.");
            continue;
        };

        match area.adjust(edge, delta) {
            Ok(adjusted) => area = adjusted,
            Err(e) => console.say(&e.to_string()),
        }
    }

    console.say("");
    console.say(&format!("Final adjusted area: {}", area));
    console.say(&format!("Final image saved as {}", preview_path.display()));
    Ok(area)
}
