#![forbid(unsafe_code)]

//! Visual node building blocks: ids, configuration, behavior and context.

use std::any::Any;
use std::fmt;

use crate::geometry::{Rect, Sides, Visual};
use crate::hooks::{HookManager, Severity};
use crate::pulse::PulseHandler;
use crate::touch::Touch;

/// Generational handle to a node of a [`VisualTree`](crate::tree::VisualTree).
///
/// A removed node's id never resolves again, even if its slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// Build an id from its raw parts.
    pub const fn from_raw(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub const fn index(&self) -> u32 {
        self.index
    }

    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}v{}", self.index, self.generation)
    }
}

/// Per-node touch and layout configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    /// Accept `Begin` touches (and thereby acquire sessions).
    pub use_begin: bool,
    /// Receive `Moving` touches of an acquired session.
    pub use_moving: bool,
    /// Receive the `End` touch of an acquired session.
    pub use_end: bool,
    /// Receive `Moving`/`End` touches outside the node's bounds.
    pub use_outside_touches: bool,
    /// When set, the update pass lays the node out as the parent's area
    /// with these sides applied.
    pub padding: Option<Sides>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            use_begin: true,
            use_moving: true,
            use_end: true,
            use_outside_touches: false,
            padding: None,
        }
    }
}

impl NodeConfig {
    #[must_use]
    pub fn use_begin(mut self, value: bool) -> Self {
        self.use_begin = value;
        self
    }

    #[must_use]
    pub fn use_moving(mut self, value: bool) -> Self {
        self.use_moving = value;
        self
    }

    #[must_use]
    pub fn use_end(mut self, value: bool) -> Self {
        self.use_end = value;
        self
    }

    #[must_use]
    pub fn use_outside_touches(mut self, value: bool) -> Self {
        self.use_outside_touches = value;
        self
    }

    #[must_use]
    pub fn padding(mut self, sides: Sides) -> Self {
        self.padding = Some(sides);
        self
    }
}

/// What a node sees of itself and the tree while handling a pulse or touch.
#[derive(Debug, Clone, Copy)]
pub struct NodeContext<'a> {
    id: NodeId,
    bounds: Rect,
    absolute: (i32, i32),
    enabled: bool,
    hooks: &'a HookManager,
}

impl<'a> NodeContext<'a> {
    pub fn new(
        id: NodeId,
        bounds: Rect,
        absolute: (i32, i32),
        enabled: bool,
        hooks: &'a HookManager,
    ) -> Self {
        Self {
            id,
            bounds,
            absolute,
            enabled,
            hooks,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Bounds relative to the parent.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Absolute position of the node's origin.
    pub fn absolute_xy(&self) -> (i32, i32) {
        self.absolute
    }

    /// Bounds in absolute coordinates.
    pub fn absolute_bounds(&self) -> Rect {
        Rect::new(
            self.absolute.0,
            self.absolute.1,
            self.bounds.width,
            self.bounds.height,
        )
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn hooks(&self) -> &'a HookManager {
        self.hooks
    }

    /// Shorthand for [`HookManager::log`].
    pub fn log(&self, message: impl Into<String>, severity: Severity) {
        self.hooks.log(message, severity);
    }
}

/// Node-specific state and reactions.
///
/// Behaviors react to pulses through [`PulseHandler`], to update passes
/// through [`update`](Self::update), and to touches through
/// [`on_touch`](Self::on_touch).
pub trait NodeBehavior: PulseHandler + Send + 'static {
    /// Short type name used in diagnostics.
    fn name(&self) -> &'static str {
        "node"
    }

    /// Content/update pass: reconcile owned state against the node.
    fn update(&mut self, _ctx: &NodeContext<'_>) {}

    /// Handle a touch in node-local coordinates. Returns `true` if used.
    fn on_touch(&mut self, _touch: &Touch, _ctx: &NodeContext<'_>) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Arena entry of the tree.
pub(crate) struct Node {
    pub(crate) bounds: Rect,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) enabled: bool,
    pub(crate) config: NodeConfig,
    pub(crate) behavior: Box<dyn NodeBehavior>,
}

impl Node {
    pub(crate) fn new(
        bounds: Rect,
        parent: Option<NodeId>,
        config: NodeConfig,
        behavior: Box<dyn NodeBehavior>,
    ) -> Self {
        Self {
            bounds,
            parent,
            children: Vec::new(),
            enabled: true,
            config,
            behavior,
        }
    }
}

impl Visual for Node {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn bounds_mut(&mut self) -> &mut Rect {
        &mut self.bounds
    }
}
