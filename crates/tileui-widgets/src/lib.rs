#![forbid(unsafe_code)]

//! Widget exemplars built on the tileui visual tree.
//!
//! - [`ItemRack`] owns an external text marker and keeps it placed at its
//!   absolute origin across geometry changes.
//! - [`Background`] stretches over its parent during the update pass.
//! - [`Panel`] groups children and optionally handles touches.

pub mod background;
pub mod item_rack;
pub mod marker;
pub mod panel;

pub use background::Background;
pub use item_rack::ItemRack;
pub use marker::{Marker, MarkerError};
pub use panel::Panel;
