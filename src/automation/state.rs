//! Run state machine for a capture session.
//!
//! A run sequences through: Idle → SelectingResolution → DetectingArea →
//! WaitingToStart → Capturing(1..N) → Done, or stops at Aborted when no
//! capture area was obtained.

use std::fmt;

/// Run states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    /// Nothing has happened yet
    Idle,
    /// Asking for the monitor resolution
    SelectingResolution,
    /// Defining the capture area
    DetectingArea,
    /// No capture area; nothing will be captured
    Aborted,
    /// Warm-up pause before the first page
    WaitingToStart,
    /// Capturing page `page` of `total` (1-based)
    Capturing { page: u32, total: u32 },
    /// All pages captured
    Done,
}

impl RunState {
    /// Returns true for states that end the run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Aborted | RunState::Done)
    }

    /// Returns true if `next` may follow this state.
    pub fn can_transition_to(&self, next: &RunState) -> bool {
        use RunState::*;
        match (self, next) {
            (Idle, SelectingResolution) => true,
            // Capture sessions may start from an already known resolution
            (Idle | SelectingResolution, DetectingArea) => true,
            (DetectingArea, Aborted | WaitingToStart) => true,
            (WaitingToStart, Capturing { page: 1, .. }) => true,
            (Capturing { page, total }, Capturing { page: following, total: same_total }) => {
                *following == page + 1 && same_total == total && following <= total
            }
            (Capturing { page, total }, Done) => page == total,
            _ => false,
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Idle => write!(f, "Idle"),
            RunState::SelectingResolution => write!(f, "Selecting resolution"),
            RunState::DetectingArea => write!(f, "Detecting area"),
            RunState::Aborted => write!(f, "Aborted"),
            RunState::WaitingToStart => write!(f, "Waiting to start"),
            RunState::Capturing { page, total } => write!(f, "Capturing {}/{}", page, total),
            RunState::Done => write!(f, "Done"),
        }
    }
}
