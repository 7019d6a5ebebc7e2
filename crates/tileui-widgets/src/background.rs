#![forbid(unsafe_code)]

//! Background fill that stretches over its parent.

use std::any::Any;

use tileui_core::geometry::{Rect, Sides};
use tileui_core::node::{NodeBehavior, NodeConfig, NodeId};
use tileui_core::pulse::PulseHandler;
use tileui_core::tree::{TreeError, VisualTree};

/// A node covering its parent's whole area.
///
/// Attached with zero size; the next update pass lays it out over the parent.
/// It never starts touch sessions, so touches fall through to the parent.
#[derive(Debug, Clone, Copy, Default)]
pub struct Background;

impl Background {
    /// Configuration a background is attached with.
    pub fn config() -> NodeConfig {
        NodeConfig::default()
            .use_begin(false)
            .padding(Sides::all(0))
    }

    /// Attach a background under `parent`.
    pub fn add_to(tree: &mut VisualTree, parent: NodeId) -> Result<NodeId, TreeError> {
        tree.add_child_with(parent, Rect::default(), Self::config(), Background)
    }
}

impl PulseHandler for Background {}

impl NodeBehavior for Background {
    fn name(&self) -> &'static str {
        "background"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
