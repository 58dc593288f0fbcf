//! Kindle Page Capturer
//!
//! A console tool that photographs successive pages of an e-reader window:
//! the user marks the page area once, then the tool captures it, saves it as
//! a PNG and presses the next-page key, page after page.

mod automation;
mod calibration;
mod capture;
mod console;
mod gui;
mod paths;
#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;

use crate::automation::{get_config, init_config, RunState};
use crate::console::Terminal;
use crate::gui::WindowSelector;

/// Logs a message to both console and log file with timestamp.
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, msg);
    print!("{}", line);
    let log_path = paths::get_logs_dir().join("kindle_capture.log");
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&log_path) {
        let _ = file.write_all(line.as_bytes());
    }
}

fn install_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        let msg = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        let location = panic_info
            .location()
            .map(|loc| format!(" at {}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_default();
        let log_msg = format!("[PANIC]{} {}\n", location, msg);
        eprint!("{}", log_msg);
        let log_path = paths::get_logs_dir().join("kindle_capture.log");
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&log_path) {
            let _ = file.write_all(log_msg.as_bytes());
        }
    }));
}

/// Windows Graphics Capture needs the WinRT runtime on this thread.
#[cfg(windows)]
fn init_winrt() -> Result<()> {
    unsafe {
        windows::Win32::System::WinRT::RoInitialize(
            windows::Win32::System::WinRT::RO_INIT_MULTITHREADED,
        )?
    };
    Ok(())
}

#[cfg(not(windows))]
fn init_winrt() -> Result<()> {
    Ok(())
}

fn main() -> Result<()> {
    install_panic_hook();

    init_winrt()?;
    paths::ensure_directories().context("Failed to create log directory")?;
    init_config();
    let config = get_config();

    let desktop = capture::open_desktop(config.next_page_key)?;
    log(&format!("Next page key: {}", config.next_page_key));

    match automation::run(&mut Terminal, desktop.as_ref(), &WindowSelector, config) {
        Ok(outcome) => {
            match outcome.state {
                RunState::Done => log(&format!(
                    "Session finished: {} pages in {}",
                    outcome.pages.len(),
                    outcome.session_dir.display()
                )),
                state => log(&format!("Session ended in state: {}", state)),
            }
            Ok(())
        }
        Err(e) => {
            log(&format!("Error: {:#}", e));
            Err(e)
        }
    }
}
