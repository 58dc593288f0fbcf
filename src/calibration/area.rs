//! Capture area geometry and edge adjustment.
//!
//! A capture area is a rectangle in screen pixels. Edges can be nudged by a
//! signed offset; an offset that would push the rectangle off the top/left
//! of the screen or collapse it is rejected and leaves the area unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A rectangle in screen pixel coordinates.
///
/// `width` and `height` are always non-zero once constructed through
/// [`CaptureArea::new`] or an accepted [`CaptureArea::adjust`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureArea {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Reasons an edge adjustment is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdjustError {
    #[error("Invalid adjustment: Area out of bounds or width <= 0")]
    LeftOutOfBounds,
    #[error("Invalid adjustment: Area out of bounds or height <= 0")]
    TopOutOfBounds,
    #[error("Invalid adjustment: width <= 0")]
    NonPositiveWidth,
    #[error("Invalid adjustment: height <= 0")]
    NonPositiveHeight,
}

/// Edge of the capture area that an adjustment applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl FromStr for Edge {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" => Ok(Edge::Left),
            "right" => Ok(Edge::Right),
            "top" => Ok(Edge::Top),
            "bottom" => Ok(Edge::Bottom),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::Left => write!(f, "left"),
            Edge::Right => write!(f, "right"),
            Edge::Top => write!(f, "top"),
            Edge::Bottom => write!(f, "bottom"),
        }
    }
}

impl CaptureArea {
    /// Builds an area from signed components, returning `None` when a
    /// position is negative or a size is not positive.
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Option<Self> {
        if x < 0 || y < 0 || width <= 0 || height <= 0 {
            return None;
        }
        Some(Self {
            x: u32::try_from(x).ok()?,
            y: u32::try_from(y).ok()?,
            width: u32::try_from(width).ok()?,
            height: u32::try_from(height).ok()?,
        })
    }

    /// Returns the area with `edge` moved by `delta` pixels.
    ///
    /// Positive values move the left/top edges inward (right/down) and pull
    /// the right/bottom edges inward (left/up), i.e. positive always shrinks.
    pub fn adjust(&self, edge: Edge, delta: i64) -> Result<Self, AdjustError> {
        let (x, y) = (i64::from(self.x), i64::from(self.y));
        let (w, h) = (i64::from(self.width), i64::from(self.height));

        match edge {
            Edge::Left => x
                .checked_add(delta)
                .zip(w.checked_sub(delta))
                .and_then(|(new_x, new_w)| Self::new(new_x, y, new_w, h))
                .ok_or(AdjustError::LeftOutOfBounds),
            Edge::Right => w
                .checked_sub(delta)
                .and_then(|new_w| Self::new(x, y, new_w, h))
                .ok_or(AdjustError::NonPositiveWidth),
            Edge::Top => y
                .checked_add(delta)
                .zip(h.checked_sub(delta))
                .and_then(|(new_y, new_h)| Self::new(x, new_y, w, new_h))
                .ok_or(AdjustError::TopOutOfBounds),
            Edge::Bottom => h
                .checked_sub(delta)
                .and_then(|new_h| Self::new(x, y, w, new_h))
                .ok_or(AdjustError::NonPositiveHeight),
        }
    }

    /// Returns true if the whole area lies on a `width` x `height` screen.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        u64::from(self.x) + u64::from(self.width) <= u64::from(width)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(height)
    }
}

impl fmt::Display for CaptureArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x={}, y={}, w={}, h={}",
            self.x, self.y, self.width, self.height
        )
    }
}
