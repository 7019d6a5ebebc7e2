#![forbid(unsafe_code)]

//! Widget-side record of an external marker.

use std::fmt;

use tileui_core::hooks::MarkerHandle;

/// What a widget wrote into the marker it owns.
///
/// The handle is opaque; `text`, `x` and `y` are the widget's own record of
/// what it asked the service to place, used to detect staleness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    handle: MarkerHandle,
    text: String,
    x: i32,
    y: i32,
}

impl Marker {
    pub(crate) fn new(handle: MarkerHandle, text: String, x: i32, y: i32) -> Self {
        Self { handle, text, x, y }
    }

    pub fn handle(&self) -> MarkerHandle {
        self.handle
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Absolute tile the marker was placed at.
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// True if the marker still shows `text` at `(x, y)`.
    pub fn matches(&self, text: &str, x: i32, y: i32) -> bool {
        self.text == text && self.x == x && self.y == y
    }
}

/// Marker operation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerError {
    /// `create_marker` was called before any text was set.
    TextUnset,
}

impl fmt::Display for MarkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TextUnset => write!(f, "cannot create marker: text is not set"),
        }
    }
}

impl std::error::Error for MarkerError {}
