#![forbid(unsafe_code)]

//! Touch input snapshots.
//!
//! A [`Touch`] is one instant of one input contact. It records where the
//! contact started (`absolute_x`, `absolute_y`, frozen at creation) and where
//! it currently is (`x`, `y`), which the tree rewrites into node-local
//! coordinates while dispatching.
//!
//! # Design Notes
//!
//! - A touch is a 1×1 [`Visual`] so it reuses the geometry move machinery.
//! - Auxiliary tool state is a [`ToolFlags`] bitmask over the raw state byte.
//!   Reserved bits 6–7 are preserved so `state_byte()` round-trips.
//! - A forced completion is derived with [`Touch::simulated_end_touch`], never
//!   by mutating the original.

use bitflags::bitflags;

use crate::geometry::{Rect, Visual};
use crate::session::SessionId;

/// Phase of a touch within its lifecycle: `Begin → Moving* → End`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    /// Contact started.
    Begin,
    /// Contact moved while held.
    Moving,
    /// Contact released. Terminal.
    End,
}

bitflags! {
    /// Auxiliary button/tool state carried by a touch, independent of phase.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ToolFlags: u8 {
        const RED      = 0b0000_0001;
        const GREEN    = 0b0000_0010;
        const BLUE     = 0b0000_0100;
        const YELLOW   = 0b0000_1000;
        const ACTUATOR = 0b0001_0000;
        const CUTTER   = 0b0010_0000;
    }
}

/// One input contact at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Touch {
    absolute_x: i32,
    absolute_y: i32,
    bounds: Rect,
    phase: TouchPhase,
    prefix: u8,
    flags: ToolFlags,
    session: Option<SessionId>,
    undo: bool,
}

impl Touch {
    /// Create a touch at `(x, y)` with no prefix and no tool flags.
    #[must_use]
    pub const fn new(x: i32, y: i32, phase: TouchPhase) -> Self {
        Self {
            absolute_x: x,
            absolute_y: y,
            bounds: Rect::point(x, y),
            phase,
            prefix: 0,
            flags: ToolFlags::empty(),
            session: None,
            undo: false,
        }
    }

    /// Set the originating input source id.
    #[must_use]
    pub const fn with_prefix(mut self, prefix: u8) -> Self {
        self.prefix = prefix;
        self
    }

    /// Set tool flags from the raw state byte.
    #[must_use]
    pub const fn with_state_byte(mut self, state_byte: u8) -> Self {
        self.flags = ToolFlags::from_bits_retain(state_byte);
        self
    }

    /// Set tool flags.
    #[must_use]
    pub const fn with_flags(mut self, flags: ToolFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Attach the owning session.
    #[must_use]
    pub const fn with_session(mut self, session: SessionId) -> Self {
        self.session = Some(session);
        self
    }

    /// Mark the touch as a client-side rollback notification.
    #[must_use]
    pub const fn with_undo(mut self, undo: bool) -> Self {
        self.undo = undo;
        self
    }

    /// Derive a terminal copy of this touch.
    ///
    /// Every field is copied except `phase`, which is forced to `End`.
    #[must_use]
    pub fn simulated_end_touch(&self) -> Touch {
        Touch {
            absolute_x: self.absolute_x,
            absolute_y: self.absolute_y,
            bounds: self.bounds,
            phase: TouchPhase::End,
            prefix: self.prefix,
            flags: self.flags,
            session: self.session,
            undo: self.undo,
        }
    }

    pub const fn absolute_x(&self) -> i32 {
        self.absolute_x
    }

    pub const fn absolute_y(&self) -> i32 {
        self.absolute_y
    }

    /// Current x (node-local while being dispatched).
    pub const fn x(&self) -> i32 {
        self.bounds.x
    }

    /// Current y (node-local while being dispatched).
    pub const fn y(&self) -> i32 {
        self.bounds.y
    }

    pub const fn phase(&self) -> TouchPhase {
        self.phase
    }

    pub const fn prefix(&self) -> u8 {
        self.prefix
    }

    pub const fn session(&self) -> Option<SessionId> {
        self.session
    }

    pub const fn is_undo(&self) -> bool {
        self.undo
    }

    pub const fn flags(&self) -> ToolFlags {
        self.flags
    }

    /// Raw state byte, reserved bits included.
    pub const fn state_byte(&self) -> u8 {
        self.flags.bits()
    }

    pub const fn red(&self) -> bool {
        self.flags.contains(ToolFlags::RED)
    }

    pub const fn green(&self) -> bool {
        self.flags.contains(ToolFlags::GREEN)
    }

    pub const fn blue(&self) -> bool {
        self.flags.contains(ToolFlags::BLUE)
    }

    pub const fn yellow(&self) -> bool {
        self.flags.contains(ToolFlags::YELLOW)
    }

    pub const fn actuator(&self) -> bool {
        self.flags.contains(ToolFlags::ACTUATOR)
    }

    pub const fn cutter(&self) -> bool {
        self.flags.contains(ToolFlags::CUTTER)
    }

    /// Move the contact to `(x, y)`. The absolute origin is unchanged.
    pub fn set_position(&mut self, x: i32, y: i32) -> &mut Self {
        self.bounds.x = x;
        self.bounds.y = y;
        self
    }

    /// Set position and size; a negative `width` or `height` keeps the current value.
    pub fn set_xywh(&mut self, x: i32, y: i32, width: i32, height: i32) -> &mut Self {
        self.bounds = self.bounds.with_xywh(x, y, width, height);
        self
    }

    /// Shift the contact by `(dx, dy)`.
    pub fn move_by(&mut self, dx: i32, dy: i32) -> &mut Self {
        self.bounds = self.bounds.translate(dx, dy);
        self
    }

    /// Exact inverse of [`move_by`](Self::move_by).
    pub fn move_back(&mut self, dx: i32, dy: i32) -> &mut Self {
        self.bounds = self.bounds.translate_back(dx, dy);
        self
    }

    /// Touches never collide with each other.
    pub const fn intersects_touch(&self, _other: &Touch) -> bool {
        false
    }
}

impl Visual for Touch {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn bounds_mut(&mut self) -> &mut Rect {
        &mut self.bounds
    }
}
