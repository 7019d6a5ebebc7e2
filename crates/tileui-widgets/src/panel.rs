#![forbid(unsafe_code)]

//! Plain container node.

use std::any::Any;
use std::fmt;

use tileui_core::node::{NodeBehavior, NodeContext};
use tileui_core::pulse::PulseHandler;
use tileui_core::touch::Touch;

type TouchCallback = Box<dyn FnMut(&Touch, &NodeContext<'_>) -> bool + Send>;

/// A container grouping child nodes, optionally reacting to touches.
///
/// # Example
///
/// ```
/// use tileui_core::geometry::Rect;
/// use tileui_core::hooks::HookManager;
/// use tileui_core::tree::VisualTree;
/// use tileui_widgets::Panel;
///
/// let mut tree = VisualTree::new(HookManager::shared());
/// let panel = tree.add_root(
///     Rect::new(0, 0, 8, 8),
///     Panel::new().on_touch(|touch, _ctx| touch.red()),
/// );
/// assert!(tree.is_alive(panel));
/// ```
#[derive(Default)]
pub struct Panel {
    on_touch: Option<TouchCallback>,
    touches: u64,
}

impl fmt::Debug for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Panel")
            .field("on_touch", &self.on_touch.is_some())
            .field("touches", &self.touches)
            .finish()
    }
}

impl Panel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle touches with `callback`; it returns `true` to use the touch.
    #[must_use]
    pub fn on_touch<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&Touch, &NodeContext<'_>) -> bool + Send + 'static,
    {
        self.on_touch = Some(Box::new(callback));
        self
    }

    /// Touches used so far.
    pub fn touches(&self) -> u64 {
        self.touches
    }
}

impl PulseHandler for Panel {}

impl NodeBehavior for Panel {
    fn name(&self) -> &'static str {
        "panel"
    }

    fn on_touch(&mut self, touch: &Touch, ctx: &NodeContext<'_>) -> bool {
        let Some(callback) = self.on_touch.as_mut() else {
            return false;
        };
        let used = callback(touch, ctx);
        if used {
            self.touches += 1;
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(node = %ctx.id(), phase = ?touch.phase(), used, "panel touch");
        used
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
