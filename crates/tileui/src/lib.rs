#![forbid(unsafe_code)]

//! tileui public facade crate.
//!
//! Re-exports the visual tree, geometry, touch and hook types from the
//! internal crates together with the widget exemplars, and offers a
//! lightweight prelude.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use tileui_core::geometry::{GeometryError, Rect, Sides, Visual};
pub use tileui_core::hooks::{
    CanTouchArgs, CreateMarkerArgs, DeinitializeArgs, DrawArgs, EnabledArgs, HandlerId, Hook,
    HookError, HookManager, HookResult, InitializeArgs, LogArgs, MarkerHandle, RemoveMarkerArgs,
    SetBoundsArgs, SetTopArgs, Severity,
};
pub use tileui_core::logging::LogConfig;
pub use tileui_core::node::{NodeBehavior, NodeConfig, NodeContext, NodeId};
pub use tileui_core::pulse::{PulseHandler, PulsePhase};
pub use tileui_core::session::{SessionId, TouchError, TouchSession};
pub use tileui_core::touch::{ToolFlags, Touch, TouchPhase};
pub use tileui_core::tree::{TreeError, VisualTree};

// --- Widget re-exports -----------------------------------------------------

pub use tileui_widgets::{Background, ItemRack, Marker, MarkerError, Panel};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for tileui hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Geometry(GeometryError),
    Hook(HookError),
    Touch(TouchError),
    Tree(TreeError),
    Marker(MarkerError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Geometry(err) => write!(f, "{err}"),
            Self::Hook(err) => write!(f, "{err}"),
            Self::Touch(err) => write!(f, "{err}"),
            Self::Tree(err) => write!(f, "{err}"),
            Self::Marker(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Geometry(err) => Some(err),
            Self::Hook(err) => Some(err),
            Self::Touch(err) => Some(err),
            Self::Tree(err) => Some(err),
            Self::Marker(err) => Some(err),
        }
    }
}

impl From<GeometryError> for Error {
    fn from(err: GeometryError) -> Self {
        Self::Geometry(err)
    }
}

impl From<HookError> for Error {
    fn from(err: HookError) -> Self {
        Self::Hook(err)
    }
}

impl From<TouchError> for Error {
    fn from(err: TouchError) -> Self {
        Self::Touch(err)
    }
}

impl From<TreeError> for Error {
    fn from(err: TreeError) -> Self {
        Self::Tree(err)
    }
}

impl From<MarkerError> for Error {
    fn from(err: MarkerError) -> Self {
        Self::Marker(err)
    }
}

/// Standard result type for tileui APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Error, HookManager, ItemRack, NodeBehavior, NodeConfig, NodeContext, NodeId,
        PulseHandler, PulsePhase, Rect, Result, SessionId, Severity, Sides, Touch, TouchPhase,
        Visual, VisualTree,
    };

    pub use crate::{core, widgets};
}

pub use tileui_core as core;
pub use tileui_widgets as widgets;
