#![forbid(unsafe_code)]

//! Per-source touch sessions.
//!
//! Each input source owns one [`TouchSession`]. A session validates that its
//! touches arrive in phase order and remembers which node acquired the
//! current touch, so `Moving`/`End` events reach the node that took `Begin`.
//!
//! # Invariants
//!
//! 1. `Begin` is accepted only while idle.
//! 2. `Moving` and `End` are accepted only while a touch is in progress.
//! 3. A rejected touch leaves the session unchanged.
//! 4. After `End` the session is idle again and a fresh `Begin` may follow.

use std::fmt;

use crate::node::NodeId;
use crate::touch::{Touch, TouchPhase};

/// Identifier of the interaction session a touch belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u32);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

/// Touch lifecycle state of one input source.
#[derive(Debug, Clone)]
pub struct TouchSession {
    id: SessionId,
    begin: Option<Touch>,
    last: Option<Touch>,
    target: Option<NodeId>,
    accepted: u64,
}

impl TouchSession {
    /// Create an idle session.
    #[must_use]
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            begin: None,
            last: None,
            target: None,
            accepted: 0,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// True between an accepted `Begin` and the matching `End`.
    pub fn is_active(&self) -> bool {
        self.last
            .as_ref()
            .is_some_and(|touch| touch.phase() != TouchPhase::End)
    }

    /// Validate and record the next touch of this session.
    pub fn accept(&mut self, touch: &Touch) -> Result<(), TouchError> {
        match (touch.phase(), self.is_active()) {
            (TouchPhase::Begin, true) => {
                return Err(TouchError::AlreadyStarted { session: self.id });
            }
            (TouchPhase::Moving | TouchPhase::End, false) => {
                return Err(TouchError::NotStarted {
                    session: self.id,
                    phase: touch.phase(),
                });
            }
            (TouchPhase::Begin, false) => {
                self.begin = Some(touch.clone());
                self.target = None;
            }
            _ => {}
        }
        self.last = Some(touch.clone());
        self.accepted += 1;
        Ok(())
    }

    /// Record the node that took the current touch.
    pub fn acquire(&mut self, node: NodeId) {
        self.target = Some(node);
    }

    /// Forget the acquired node.
    pub fn release(&mut self) -> Option<NodeId> {
        self.target.take()
    }

    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    /// The `Begin` touch of the current (or most recent) lifecycle.
    pub fn begin_touch(&self) -> Option<&Touch> {
        self.begin.as_ref()
    }

    pub fn last_touch(&self) -> Option<&Touch> {
        self.last.as_ref()
    }

    /// Number of touches accepted so far.
    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Terminal copy of the in-flight touch, if any.
    #[must_use]
    pub fn simulated_end(&self) -> Option<Touch> {
        if !self.is_active() {
            return None;
        }
        self.last.as_ref().map(Touch::simulated_end_touch)
    }
}

/// Touch dispatch errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchError {
    /// The touch carries no session reference.
    MissingSession,
    /// `Moving`/`End` arrived while no touch was in progress.
    NotStarted { session: SessionId, phase: TouchPhase },
    /// `Begin` arrived while a touch was still in progress.
    AlreadyStarted { session: SessionId },
}

impl fmt::Display for TouchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSession => write!(f, "touch has no session"),
            Self::NotStarted { session, phase } => {
                write!(f, "{session}: {phase:?} without a preceding Begin")
            }
            Self::AlreadyStarted { session } => {
                write!(f, "{session}: Begin while a touch is in progress")
            }
        }
    }
}

impl std::error::Error for TouchError {}
