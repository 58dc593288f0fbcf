//! Test doubles for the console, the desktop and the selection window.

use anyhow::{bail, Result};
use image::{RgbImage, Rgba, RgbaImage};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::Duration;

use crate::calibration::{CaptureArea, RegionSelector, Resolution};
use crate::capture::{crop_to_rgb, Desktop};
use crate::console::Console;

/// Console that answers prompts from a fixed script and records output.
pub struct ScriptedConsole {
    answers: VecDeque<String>,
    prompts: Vec<String>,
    lines: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
            lines: Vec::new(),
        }
    }

    /// Number of prompts shown so far.
    pub fn asked(&self) -> usize {
        self.prompts.len()
    }

    /// True if exactly `line` was printed.
    pub fn said(&self, line: &str) -> bool {
        self.lines.iter().any(|l| l == line)
    }

    /// Number of answers not consumed yet.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Console for ScriptedConsole {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        self.prompts.push(prompt.to_string());
        match self.answers.pop_front() {
            Some(answer) => Ok(answer),
            None => bail!("Script exhausted at prompt {:?}", prompt),
        }
    }

    fn say(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

/// Something the fake desktop was asked to do, in call order.
#[derive(Clone, Debug, PartialEq)]
pub enum DesktopEvent {
    GrabScreen,
    GrabArea(CaptureArea),
    NextPage,
    Pause(Duration),
}

/// Desktop with a solid-colour screen that records every call.
pub struct FakeDesktop {
    resolution: Resolution,
    events: RefCell<Vec<DesktopEvent>>,
    grabs: Cell<u8>,
}

impl FakeDesktop {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            resolution: Resolution::new(width, height),
            events: RefCell::new(Vec::new()),
            grabs: Cell::new(0),
        }
    }

    pub fn events(&self) -> Vec<DesktopEvent> {
        self.events.borrow().clone()
    }

    pub fn screen_grabs(&self) -> usize {
        self.count(|e| matches!(e, DesktopEvent::GrabScreen))
    }

    pub fn next_pages(&self) -> usize {
        self.count(|e| matches!(e, DesktopEvent::NextPage))
    }

    fn count(&self, pred: impl Fn(&DesktopEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| pred(e)).count()
    }
}

impl Desktop for FakeDesktop {
    fn monitor_resolution(&self) -> Result<Resolution> {
        Ok(self.resolution)
    }

    fn grab_screen(&self) -> Result<RgbaImage> {
        self.events.borrow_mut().push(DesktopEvent::GrabScreen);
        Ok(RgbaImage::from_pixel(
            self.resolution.width,
            self.resolution.height,
            Rgba([40, 40, 40, 255]),
        ))
    }

    fn grab_area(&self, area: &CaptureArea) -> Result<RgbImage> {
        self.events.borrow_mut().push(DesktopEvent::GrabArea(*area));
        // Each grab gets a distinct shade so saved pages can be told apart
        let shade = self.grabs.get().wrapping_add(1);
        self.grabs.set(shade);
        let screen = RgbaImage::from_pixel(
            self.resolution.width,
            self.resolution.height,
            Rgba([shade, 0, 0, 255]),
        );
        Ok(crop_to_rgb(&screen, area))
    }

    fn next_page(&self) -> Result<()> {
        self.events.borrow_mut().push(DesktopEvent::NextPage);
        Ok(())
    }

    fn pause(&self, duration: Duration) {
        self.events.borrow_mut().push(DesktopEvent::Pause(duration));
    }
}

/// Selector that always returns the same rectangle.
pub struct FixedSelector {
    area: Option<CaptureArea>,
    seen: Cell<Option<(u32, u32)>>,
}

impl FixedSelector {
    pub fn new(area: Option<CaptureArea>) -> Self {
        Self {
            area,
            seen: Cell::new(None),
        }
    }

    /// Size of the image the selector was last shown.
    pub fn last_image_size(&self) -> Option<(u32, u32)> {
        self.seen.get()
    }
}

impl RegionSelector for FixedSelector {
    fn select(&self, image: &RgbaImage) -> Result<Option<CaptureArea>> {
        self.seen.set(Some(image.dimensions()));
        Ok(self.area)
    }
}
