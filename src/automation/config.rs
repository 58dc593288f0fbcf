//! Configuration types for page capture.
//!
//! Loads settings from config.json at startup. Provides the default capture
//! area, timing parameters, the page-turn key and output locations.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use crate::automation::input::NextPageKey;
use crate::calibration::CaptureArea;

/// Global configuration instance, initialized once at startup.
static CONFIG: OnceLock<CaptureConfig> = OnceLock::new();

/// Complete capture configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Area used by the "default area" menu option
    #[serde(default = "default_area")]
    pub default_area: CaptureArea,
    /// Pause before the first capture so the user can focus the reader window
    #[serde(default = "default_warmup_secs")]
    pub warmup_secs: f64,
    /// Delay between pages when the prompt is left blank
    #[serde(default = "default_delay_secs")]
    pub default_delay_secs: f64,
    /// Key that turns to the next page ("left" for right-to-left books)
    #[serde(default)]
    pub next_page_key: NextPageKey,
    /// Session folders are named `<output_prefix>_<YYYYMMDD_HHMMSS>`
    #[serde(default = "default_output_prefix")]
    pub output_prefix: String,
    /// Directory that session folders are created in
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Preview image rewritten during fine adjustment
    #[serde(default = "default_preview_path")]
    pub preview_path: PathBuf,
}

fn default_area() -> CaptureArea {
    CaptureArea {
        x: 1281,
        y: 145,
        width: 1349,
        height: 1880,
    }
}

fn default_warmup_secs() -> f64 {
    10.0
}

fn default_delay_secs() -> f64 {
    1.5
}

fn default_output_prefix() -> String {
    "kindle_captures".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_preview_path() -> PathBuf {
    PathBuf::from("adjusted_area.png")
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            default_area: default_area(),
            warmup_secs: default_warmup_secs(),
            default_delay_secs: default_delay_secs(),
            next_page_key: NextPageKey::default(),
            output_prefix: default_output_prefix(),
            output_dir: default_output_dir(),
            preview_path: default_preview_path(),
        }
    }
}

impl CaptureConfig {
    /// Warm-up pause as a duration. Negative or non-finite values mean no pause.
    pub fn warmup(&self) -> Duration {
        Duration::try_from_secs_f64(self.warmup_secs).unwrap_or(Duration::ZERO)
    }

    /// Delay used when the delay prompt is left blank. Falls back to 1.5s
    /// if the configured value is not a positive number.
    pub fn default_delay(&self) -> Duration {
        match Duration::try_from_secs_f64(self.default_delay_secs) {
            Ok(delay) if !delay.is_zero() => delay,
            _ => Duration::from_secs_f64(default_delay_secs()),
        }
    }
}

/// Parses configuration from JSON text. Missing fields take their defaults.
pub fn parse_config(contents: &str) -> serde_json::Result<CaptureConfig> {
    let config: CaptureConfig = serde_json::from_str(contents)?;
    if config.default_area.width == 0 || config.default_area.height == 0 {
        return Err(serde::de::Error::custom(
            "default_area must have a positive width and height",
        ));
    }
    Ok(config)
}

/// Loads configuration from `path` or returns defaults.
fn load_config_from(path: &Path) -> CaptureConfig {
    crate::log(&format!("Looking for config at: {}", path.display()));

    if !path.exists() {
        crate::log("config.json not found. Using default config.");
        return CaptureConfig::default();
    }

    match fs::read_to_string(path) {
        Ok(contents) => match parse_config(&contents) {
            Ok(config) => {
                crate::log("Config loaded from config.json");
                config
            }
            Err(e) => {
                crate::log(&format!(
                    "Failed to parse config.json: {}. Using defaults.",
                    e
                ));
                CaptureConfig::default()
            }
        },
        Err(e) => {
            crate::log(&format!(
                "Failed to read config.json: {}. Using defaults.",
                e
            ));
            CaptureConfig::default()
        }
    }
}

/// Initializes the global configuration from config.json next to the executable.
pub fn init_config() {
    let config_path = crate::paths::get_exe_dir().join("config.json");
    let _ = CONFIG.set(load_config_from(&config_path));
}

/// Returns a reference to the global configuration, or the defaults if
/// `init_config()` was never called.
pub fn get_config() -> &'static CaptureConfig {
    CONFIG.get_or_init(CaptureConfig::default)
}
