//! Capture runner - main entry point for a capture session.
//!
//! Collects the run parameters, defines the capture area, then loops over
//! the pages: grab, save, turn page, wait.

use anyhow::{Context, Result};
use chrono::Local;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::automation::config::CaptureConfig;
use crate::automation::state::RunState;
use crate::calibration::{
    detect_book_area, select_resolution, CaptureArea, RegionSelector, Resolution,
};
use crate::capture::{save_png, Desktop};
use crate::console::{ask_until, parse_positive_int, parse_positive_secs, Console};
use crate::paths::{create_session_dir, page_file_name};

/// How many pages to capture and how long to wait after each page turn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CapturePlan {
    pub pages: u32,
    pub delay: Duration,
}

/// Result of a capture session.
#[derive(Debug)]
pub struct SessionOutcome {
    /// Final run state (`Done` or `Aborted`)
    pub state: RunState,
    /// Session folder
    pub session_dir: PathBuf,
    /// Saved page files, in capture order
    pub pages: Vec<PathBuf>,
}

/// Tracks the run state and logs every transition.
#[derive(Debug)]
pub struct RunTracker {
    state: RunState,
}

impl RunTracker {
    pub fn new() -> Self {
        Self {
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    fn enter(&mut self, next: RunState) {
        debug_assert!(
            self.state.can_transition_to(&next),
            "invalid transition {} -> {}",
            self.state,
            next
        );
        crate::log(&format!("State: {} -> {}", self.state, next));
        if next.is_terminal() {
            crate::log(&format!("Run finished in state {}", next));
        }
        self.state = next;
    }
}

impl Default for RunTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs the whole interactive program: resolution, page count, delay, then
/// the capture session.
pub fn run(
    console: &mut dyn Console,
    desktop: &dyn Desktop,
    selector: &dyn RegionSelector,
    config: &CaptureConfig,
) -> Result<SessionOutcome> {
    let mut tracker = RunTracker::new();

    console.say("=== Automatic Kindle Page Capturer ===");
    console.say("IMPORTANT: Make sure the Kindle window is open and visible");
    console.say("           with the book on the first page you want to capture.");

    tracker.enter(RunState::SelectingResolution);
    let resolution = select_resolution(console)?;

    let detected = desktop
        .monitor_resolution()
        .context("Failed to detect the monitor resolution")?;
    console.say("");
    console.say("System information:");
    console.say(&format!("Detected resolution: {}", detected));
    console.say(&format!("Selected resolution: {}", resolution));
    if detected != resolution {
        console.say(
            "Warning: the selected resolution differs from the screen. Areas chosen with \
             the mouse are measured on the rescaled screenshot and are not converted back.",
        );
    }

    console.say("");
    let pages = ask_until(console, "Number of pages to capture: ", parse_positive_int)?;
    let default_delay = config.default_delay();
    let delay = ask_until(
        console,
        &format!(
            "Delay between pages (seconds, recommended {}): ",
            default_delay.as_secs_f64()
        ),
        |input| parse_positive_secs(input, default_delay),
    )?;

    console.say("");
    console.say("Switch to the Kindle window and place the book on the first page.");
    console.say("The process has started.");

    let plan = CapturePlan { pages, delay };
    let outcome = capture_session(console, desktop, selector, config, resolution, plan, tracker)?;

    if outcome.state == RunState::Done {
        console.say("");
        console.say("Process completed!");
    }
    Ok(outcome)
}

/// Creates the session folder, defines the capture area and captures the pages.
pub fn capture_session(
    console: &mut dyn Console,
    desktop: &dyn Desktop,
    selector: &dyn RegionSelector,
    config: &CaptureConfig,
    resolution: Resolution,
    plan: CapturePlan,
    mut tracker: RunTracker,
) -> Result<SessionOutcome> {
    let session_dir = create_session_dir(&config.output_dir, &config.output_prefix, &Local::now())?;
    let shown = std::path::absolute(&session_dir).unwrap_or_else(|_| session_dir.clone());
    console.say(&format!("Captures will be saved in: {}", shown.display()));

    tracker.enter(RunState::DetectingArea);
    let Some(selection) = detect_book_area(console, desktop, selector, resolution, config)? else {
        tracker.enter(RunState::Aborted);
        crate::log("Could not continue without detecting the book area.");
        return Ok(SessionOutcome {
            state: tracker.state().clone(),
            session_dir,
            pages: Vec::new(),
        });
    };

    let screen = desktop
        .monitor_resolution()
        .context("Failed to detect the monitor resolution")?;
    if !selection.area.fits_within(screen.width, screen.height) {
        console.say(&format!(
            "Warning: the capture area ({}) extends beyond the {} screen. \
             Pixels outside the screen are saved black.",
            selection.area, screen
        ));
    }

    tracker.enter(RunState::WaitingToStart);
    let warmup = config.warmup();
    crate::log(&format!(
        "Starting captures in {} seconds...",
        warmup.as_secs_f64()
    ));
    desktop.pause(warmup);

    let pages = capture_pages(desktop, &selection.area, plan, &session_dir, &mut tracker)?;
    tracker.enter(RunState::Done);

    Ok(SessionOutcome {
        state: tracker.state().clone(),
        session_dir,
        pages,
    })
}

/// Captures `plan.pages` pages of `area` into `session_dir`.
///
/// Each page is written before the page is turned. No page turn or delay
/// follows the last page.
pub fn capture_pages(
    desktop: &dyn Desktop,
    area: &CaptureArea,
    plan: CapturePlan,
    session_dir: &Path,
    tracker: &mut RunTracker,
) -> Result<Vec<PathBuf>> {
    let mut saved = Vec::with_capacity(plan.pages as usize);

    for page in 1..=plan.pages {
        tracker.enter(RunState::Capturing {
            page,
            total: plan.pages,
        });

        let image = desktop
            .grab_area(area)
            .with_context(|| format!("Failed to capture page {}", page))?;
        let path = session_dir.join(page_file_name(page));
        save_png(&image, &path)?;
        crate::log(&format!(
            "Capture {}/{} saved: {}",
            page,
            plan.pages,
            path.display()
        ));
        saved.push(path);

        if page < plan.pages {
            desktop
                .next_page()
                .with_context(|| format!("Failed to turn the page after page {}", page))?;
            desktop.pause(plan.delay);
        }
    }

    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{DesktopEvent, FakeDesktop, FixedSelector, ScriptedConsole};
    use tempfile::tempdir;

    fn test_config(dir: &Path) -> CaptureConfig {
        CaptureConfig {
            output_dir: dir.to_path_buf(),
            preview_path: dir.join("adjusted_area.png"),
            ..CaptureConfig::default()
        }
    }

    fn area(x: u32, y: u32, width: u32, height: u32) -> CaptureArea {
        CaptureArea { x, y, width, height }
    }

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_capture_three_pages_turns_twice() {
        let dir = tempdir().unwrap();
        let desktop = FakeDesktop::new(200, 200);
        let target = area(10, 10, 20, 30);
        let plan = CapturePlan {
            pages: 3,
            delay: Duration::ZERO,
        };

        let mut tracker = RunTracker::new();
        tracker.state = RunState::WaitingToStart;
        let saved = capture_pages(&desktop, &target, plan, dir.path(), &mut tracker).unwrap();

        assert_eq!(saved.len(), 3);
        assert_eq!(
            file_names(dir.path()),
            vec!["page_0001.png", "page_0002.png", "page_0003.png"]
        );
        assert_eq!(desktop.next_pages(), 2);
        assert_eq!(
            desktop.events(),
            vec![
                DesktopEvent::GrabArea(target),
                DesktopEvent::NextPage,
                DesktopEvent::Pause(Duration::ZERO),
                DesktopEvent::GrabArea(target),
                DesktopEvent::NextPage,
                DesktopEvent::Pause(Duration::ZERO),
                DesktopEvent::GrabArea(target),
            ]
        );
        assert_eq!(*tracker.state(), RunState::Capturing { page: 3, total: 3 });
    }

    #[test]
    fn test_saved_pages_hold_each_grab() {
        let dir = tempdir().unwrap();
        let desktop = FakeDesktop::new(200, 200);
        let plan = CapturePlan {
            pages: 2,
            delay: Duration::from_millis(5),
        };

        let mut tracker = RunTracker::new();
        tracker.state = RunState::WaitingToStart;
        let saved =
            capture_pages(&desktop, &area(0, 0, 4, 4), plan, dir.path(), &mut tracker).unwrap();

        let first = image::open(&saved[0]).unwrap().to_rgb8();
        let second = image::open(&saved[1]).unwrap().to_rgb8();
        assert_eq!(first.dimensions(), (4, 4));
        assert_eq!(first.get_pixel(0, 0).0, [1, 0, 0]);
        assert_eq!(second.get_pixel(0, 0).0, [2, 0, 0]);
    }

    #[test]
    fn test_session_with_default_area() {
        let dir = tempdir().unwrap();
        let config = CaptureConfig {
            default_area: area(5, 5, 10, 10),
            ..test_config(dir.path())
        };
        let desktop = FakeDesktop::new(100, 100);
        let mut console = ScriptedConsole::new(["1"]);
        let plan = CapturePlan {
            pages: 2,
            delay: Duration::from_secs(2),
        };

        let outcome = capture_session(
            &mut console,
            &desktop,
            &FixedSelector::new(None),
            &config,
            Resolution::new(100, 100),
            plan,
            RunTracker::new(),
        )
        .unwrap();

        assert_eq!(outcome.state, RunState::Done);
        assert_eq!(outcome.pages.len(), 2);
        assert!(outcome.session_dir.starts_with(dir.path()));
        let folder = outcome.session_dir.file_name().unwrap().to_string_lossy();
        assert!(folder.starts_with("kindle_captures_"));
        assert_eq!(folder.len(), "kindle_captures_".len() + "YYYYMMDD_HHMMSS".len());

        let events = desktop.events();
        assert_eq!(events[0], DesktopEvent::Pause(Duration::from_secs(10)));
        assert_eq!(events[1], DesktopEvent::GrabArea(area(5, 5, 10, 10)));
    }

    #[test]
    fn test_area_past_screen_edge_warns_and_keeps_full_size() {
        let dir = tempdir().unwrap();
        let config = CaptureConfig {
            default_area: area(1281, 145, 1349, 1880),
            ..test_config(dir.path())
        };
        let desktop = FakeDesktop::new(1920, 1080);
        let mut console = ScriptedConsole::new(["1"]);
        let plan = CapturePlan {
            pages: 1,
            delay: Duration::ZERO,
        };

        let outcome = capture_session(
            &mut console,
            &desktop,
            &FixedSelector::new(None),
            &config,
            Resolution::new(1920, 1080),
            plan,
            RunTracker::new(),
        )
        .unwrap();

        assert_eq!(outcome.state, RunState::Done);
        assert!(console.said(
            "Warning: the capture area (x=1281, y=145, w=1349, h=1880) extends beyond the \
             1920x1080 screen. Pixels outside the screen are saved black."
        ));
        let page = image::open(&outcome.pages[0]).unwrap().to_rgb8();
        assert_eq!(page.dimensions(), (1349, 1880));
        assert_eq!(page.get_pixel(0, 0).0, [1, 0, 0]);
        assert_eq!(page.get_pixel(1348, 1879).0, [0, 0, 0]);
    }

    #[test]
    fn test_session_aborts_without_area() {
        let dir = tempdir().unwrap();
        let desktop = FakeDesktop::new(100, 100);
        let mut console = ScriptedConsole::new(["4"]);
        let plan = CapturePlan {
            pages: 5,
            delay: Duration::ZERO,
        };

        let outcome = capture_session(
            &mut console,
            &desktop,
            &FixedSelector::new(None),
            &test_config(dir.path()),
            Resolution::new(100, 100),
            plan,
            RunTracker::new(),
        )
        .unwrap();

        assert_eq!(outcome.state, RunState::Aborted);
        assert!(outcome.pages.is_empty());
        assert!(desktop.events().is_empty());
        // The session folder is created before the area is chosen
        assert!(outcome.session_dir.is_dir());
        assert!(file_names(&outcome.session_dir).is_empty());
    }

    #[test]
    fn test_full_run_with_mouse_selection() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        let desktop = FakeDesktop::new(320, 240);
        let selector = FixedSelector::new(Some(area(100, 100, 200, 100)));
        let mut console = ScriptedConsole::new([
            "2",         // resolution menu: 1920x1080
            "0", "3",    // pages: rejected, then 3
            "fast", "",  // delay: rejected, then default
            "3",         // area: mouse selection
            "left", "50",
            "n",
        ]);

        let outcome = run(&mut console, &desktop, &selector, &config).unwrap();

        assert_eq!(outcome.state, RunState::Done);
        assert_eq!(outcome.pages.len(), 3);
        assert_eq!(console.remaining(), 0);
        assert!(console.said("Detected resolution: 320x240"));
        assert!(console.said("Selected resolution: 1920x1080"));
        assert!(console.said("Final adjusted area: x=150, y=100, w=150, h=100"));
        assert!(console.said("Process completed!"));

        // Reference screenshot was rescaled to the selected resolution
        assert_eq!(selector.last_image_size(), Some((1920, 1080)));

        assert_eq!(desktop.next_pages(), 2);
        assert!(desktop
            .events()
            .contains(&DesktopEvent::Pause(Duration::from_millis(1500))));
        assert!(desktop
            .events()
            .contains(&DesktopEvent::GrabArea(area(150, 100, 150, 100))));
    }

    #[test]
    fn test_run_fails_when_input_closes() {
        let dir = tempdir().unwrap();
        let desktop = FakeDesktop::new(100, 100);
        let mut console = ScriptedConsole::new(["1"]);

        let result = run(
            &mut console,
            &desktop,
            &FixedSelector::new(None),
            &test_config(dir.path()),
        );
        assert!(result.is_err());
    }
}
