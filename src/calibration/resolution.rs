//! Monitor resolution selection.

use anyhow::Result;
use std::fmt;

use crate::console::Console;

/// A monitor resolution in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Preset resolutions offered as menu options 1-4.
pub const COMMON_RESOLUTIONS: [(Resolution, &str); 4] = [
    (Resolution::new(1366, 768), "HD"),
    (Resolution::new(1920, 1080), "Full HD"),
    (Resolution::new(2560, 1440), "QHD"),
    (Resolution::new(3840, 2160), "4K"),
];

const CUSTOM_OPTION: &str = "5";

/// Largest custom resolution accepted, four times the largest preset per axis.
pub const MAX_CUSTOM: Resolution = Resolution::new(3840 * 4, 2160 * 4);

/// Prompts for the monitor resolution until a valid choice is made.
pub fn select_resolution(console: &mut dyn Console) -> Result<Resolution> {
    console.say("Select your monitor resolution:");
    for (i, (resolution, label)) in COMMON_RESOLUTIONS.iter().enumerate() {
        console.say(&format!("{} - {} ({})", i + 1, resolution, label));
    }
    console.say(&format!("{} - Custom", CUSTOM_OPTION));

    let resolution = loop {
        let option = console.ask("Option (1-5): ")?;

        if let Some(preset) = preset_for_option(&option) {
            break preset;
        }
        if option != CUSTOM_OPTION {
            console.say("Invalid option.");
            continue;
        }

        match read_custom_resolution(console)? {
            Ok(custom) => break custom,
            Err(msg) => console.say(msg),
        }
    };

    console.say(&format!("Selected resolution: {}", resolution));
    Ok(resolution)
}

fn preset_for_option(option: &str) -> Option<Resolution> {
    let index = match option {
        "1" => 0,
        "2" => 1,
        "3" => 2,
        "4" => 3,
        _ => return None,
    };
    Some(COMMON_RESOLUTIONS[index].0)
}

/// Reads a custom width/height pair. The inner `Err` carries the message to
/// show before returning to the menu prompt.
fn read_custom_resolution(
    console: &mut dyn Console,
) -> Result<std::result::Result<Resolution, &'static str>> {
    let width = console.ask("Monitor width (e.g. 1920): ")?;
    let Ok(width) = width.parse::<i64>() else {
        return Ok(Err("Please enter valid numeric values."));
    };
    let height = console.ask("Monitor height (e.g. 1080): ")?;
    let Ok(height) = height.parse::<i64>() else {
        return Ok(Err("Please enter valid numeric values."));
    };

    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) if w > MAX_CUSTOM.width || h > MAX_CUSTOM.height => {
            Ok(Err("Resolution too large (max 15360x8640)."))
        }
        (Ok(w), Ok(h)) if w > 0 && h > 0 => Ok(Ok(Resolution::new(w, h))),
        _ => Ok(Err("Invalid values.")),
    }
}
