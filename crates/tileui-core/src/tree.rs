#![forbid(unsafe_code)]

//! The retained visual-node tree.
//!
//! [`VisualTree`] owns every node in an arena addressed by generational
//! [`NodeId`]s. Each node's bounds are relative to its parent; absolute
//! positions are resolved by walking ancestors on every query, so they can
//! never go stale across a geometry change.
//!
//! # Lifecycle ordering
//!
//! | operation | order |
//! |---|---|
//! | attach | insert → `Initialize` pulse → `initialize` hook |
//! | drop / [`clear`](VisualTree::clear) | [`remove`](VisualTree::remove) on every root, top-most first |
//! | [`set_bounds`](VisualTree::set_bounds) | `PreGeometryChange` → write → `PostGeometryChange` → `set_bounds` hook |
//! | [`set_enabled`](VisualTree::set_enabled) | write → `Enable`/`Disable` → `enabled` hook |
//! | [`draw`](VisualTree::draw) | per node: `draw` hook → `Draw` pulse → children |
//! | [`remove`](VisualTree::remove) | force-end touches → post-order `Dispose` + `deinitialize` hook → free |
//!
//! Pulses go to a single node. Passes (`update`, `draw`, `pulse_subtree`)
//! visit nodes one at a time in pre-order.
//!
//! Only sessions with a touch in progress are kept; a session is forgotten as
//! soon as its `End` (real or synthesized) has been dispatched.
//!
//! # Concurrency
//!
//! Every mutation takes `&mut self`; the caller serializes access to a tree.
//! The [`HookManager`] is shared and may be used from other trees.

use std::any::type_name;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::geometry::{Rect, Sides, Visual};
use crate::hooks::{
    CanTouchArgs, DeinitializeArgs, DrawArgs, EnabledArgs, HookManager, InitializeArgs,
    SetBoundsArgs, SetTopArgs,
};
use crate::node::{Node, NodeBehavior, NodeConfig, NodeContext, NodeId};
use crate::pulse::PulsePhase;
use crate::session::{SessionId, TouchError, TouchSession};
use crate::touch::{Touch, TouchPhase};

/// Tree operation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// The id does not refer to a live node.
    UnknownNode(NodeId),
    /// The node's behavior is not of the requested type.
    BehaviorMismatch {
        node: NodeId,
        expected: &'static str,
    },
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode(id) => write!(f, "unknown node {id}"),
            Self::BehaviorMismatch { node, expected } => {
                write!(f, "{node} is not a {expected}")
            }
        }
    }
}

impl std::error::Error for TreeError {}

struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Retained tree of visual nodes sharing one [`HookManager`].
pub struct VisualTree {
    hooks: Arc<HookManager>,
    slots: Vec<Slot>,
    free: Vec<u32>,
    roots: Vec<NodeId>,
    sessions: HashMap<SessionId, TouchSession>,
    live: usize,
}

impl fmt::Debug for VisualTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisualTree")
            .field("nodes", &self.live)
            .field("roots", &self.roots)
            .field("sessions", &self.sessions.len())
            .finish()
    }
}

impl VisualTree {
    /// Create an empty tree using `hooks` for every node.
    #[must_use]
    pub fn new(hooks: Arc<HookManager>) -> Self {
        Self {
            hooks,
            slots: Vec::new(),
            free: Vec::new(),
            roots: Vec::new(),
            sessions: HashMap::new(),
            live: 0,
        }
    }

    pub fn hooks(&self) -> &Arc<HookManager> {
        &self.hooks
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Top-level nodes, bottom-most first.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node(id).is_ok()
    }

    // -----------------------------------------------------------------------
    // Attach / remove
    // -----------------------------------------------------------------------

    /// Attach a top-level node with default configuration.
    pub fn add_root(&mut self, bounds: Rect, behavior: impl NodeBehavior) -> NodeId {
        self.add_root_with(bounds, NodeConfig::default(), behavior)
    }

    /// Attach a top-level node.
    pub fn add_root_with(
        &mut self,
        bounds: Rect,
        config: NodeConfig,
        behavior: impl NodeBehavior,
    ) -> NodeId {
        let node = Node::new(bounds, None, config, Box::new(behavior));
        let id = self.attach(node, (bounds.x, bounds.y));
        self.roots.push(id);
        self.initialized(id, None);
        id
    }

    /// Attach a child node with default configuration.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        bounds: Rect,
        behavior: impl NodeBehavior,
    ) -> Result<NodeId, TreeError> {
        self.add_child_with(parent, bounds, NodeConfig::default(), behavior)
    }

    /// Attach a child node on top of its existing siblings.
    pub fn add_child_with(
        &mut self,
        parent: NodeId,
        bounds: Rect,
        config: NodeConfig,
        behavior: impl NodeBehavior,
    ) -> Result<NodeId, TreeError> {
        let (px, py) = self.absolute_xy(parent)?;
        let absolute = (px.wrapping_add(bounds.x), py.wrapping_add(bounds.y));
        let node = Node::new(bounds, Some(parent), config, Box::new(behavior));
        let id = self.attach(node, absolute);
        self.node_mut(parent)?.children.push(id);
        self.initialized(id, Some(parent));
        Ok(id)
    }

    /// Insert `node` and send it `Initialize`. `absolute` is its resolved origin.
    fn attach(&mut self, node: Node, absolute: (i32, i32)) -> NodeId {
        let hooks = Arc::clone(&self.hooks);
        let (id, node) = self.alloc(node);
        let ctx = NodeContext::new(id, node.bounds, absolute, node.enabled, &hooks);
        node.behavior.pulse(PulsePhase::Initialize, &ctx);
        id
    }

    fn initialized(&mut self, id: NodeId, parent: Option<NodeId>) {
        #[cfg(feature = "tracing")]
        tracing::debug!(node = %id, parent = ?parent, "node attached");
        self.hooks
            .dispatch(&self.hooks.initialize, &mut InitializeArgs { node: id, parent });
    }

    /// Remove every node, top-most root first.
    ///
    /// Equivalent to [`remove`](Self::remove) on each root: held sessions are
    /// force-ended and every node is disposed exactly once. Runs on drop.
    pub fn clear(&mut self) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("clear", roots = self.roots.len()).entered();
        while let Some(&root) = self.roots.last() {
            if self.remove(root).is_err() {
                // A root id that no longer resolves; forget it.
                self.roots.pop();
            }
        }
    }

    /// Permanently remove a node and its subtree.
    ///
    /// Touch sessions held by any removed node are completed with a synthesized
    /// `End` touch first. Every removed node then receives exactly one
    /// `Dispose` pulse, children before parents.
    pub fn remove(&mut self, id: NodeId) -> Result<(), TreeError> {
        let doomed = self.subtree_post_order(id)?;

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("remove", node = %id, count = doomed.len()).entered();

        let doomed_set: HashSet<NodeId> = doomed.iter().copied().collect();
        let held: Vec<SessionId> = self
            .sessions
            .values()
            .filter(|s| s.target().is_some_and(|t| doomed_set.contains(&t)))
            .map(TouchSession::id)
            .collect();
        for session in held {
            self.force_end(session);
        }

        for &node in &doomed {
            self.send_pulse(node, PulsePhase::Dispose)?;
            self.hooks
                .dispatch(&self.hooks.deinitialize, &mut DeinitializeArgs { node });
        }

        match self.node(id)?.parent {
            Some(parent) => self.node_mut(parent)?.children.retain(|&c| c != id),
            None => self.roots.retain(|&r| r != id),
        }
        for node in doomed {
            self.release(node);
        }
        Ok(())
    }

    fn subtree_post_order(&self, id: NodeId) -> Result<Vec<NodeId>, TreeError> {
        let mut out = Vec::new();
        self.collect_post_order(id, &mut out)?;
        Ok(out)
    }

    fn collect_post_order(&self, id: NodeId, out: &mut Vec<NodeId>) -> Result<(), TreeError> {
        for &child in &self.node(id)?.children {
            self.collect_post_order(child, out)?;
        }
        out.push(id);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Structure queries
    // -----------------------------------------------------------------------

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, TreeError> {
        Ok(self.node(id)?.parent)
    }

    /// Children of `id`, bottom-most first.
    pub fn children(&self, id: NodeId) -> Result<&[NodeId], TreeError> {
        Ok(&self.node(id)?.children)
    }

    pub fn config(&self, id: NodeId) -> Result<&NodeConfig, TreeError> {
        Ok(&self.node(id)?.config)
    }

    /// Move a node above its siblings. Returns `false` if it already was on top.
    pub fn set_top(&mut self, id: NodeId) -> Result<bool, TreeError> {
        let parent = self.node(id)?.parent;
        let siblings = match parent {
            Some(parent) => &mut self.node_mut(parent)?.children,
            None => &mut self.roots,
        };
        if siblings.last() == Some(&id) {
            return Ok(false);
        }
        siblings.retain(|&s| s != id);
        siblings.push(id);
        self.hooks
            .dispatch(&self.hooks.set_top, &mut SetTopArgs { node: id });
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Geometry
    // -----------------------------------------------------------------------

    /// Bounds relative to the parent.
    pub fn bounds(&self, id: NodeId) -> Result<Rect, TreeError> {
        Ok(self.node(id)?.bounds)
    }

    /// Absolute position of the node's origin, summed over its ancestors.
    pub fn absolute_xy(&self, id: NodeId) -> Result<(i32, i32), TreeError> {
        let mut node = self.node(id)?;
        let (mut x, mut y) = (node.bounds.x, node.bounds.y);
        while let Some(parent) = node.parent {
            node = self.node(parent)?;
            x = x.wrapping_add(node.bounds.x);
            y = y.wrapping_add(node.bounds.y);
        }
        Ok((x, y))
    }

    /// Bounds in absolute coordinates.
    pub fn absolute_bounds(&self, id: NodeId) -> Result<Rect, TreeError> {
        let bounds = self.bounds(id)?;
        let (x, y) = self.absolute_xy(id)?;
        Ok(Rect::new(x, y, bounds.width, bounds.height))
    }

    /// Check if an absolute point lies inside the node.
    pub fn contains_point(&self, id: NodeId, x: i32, y: i32) -> Result<bool, TreeError> {
        Ok(self.absolute_bounds(id)?.contains(x, y))
    }

    /// Check if the node's parent-relative bounds overlap a region.
    pub fn intersects(
        &self,
        id: NodeId,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<bool, TreeError> {
        Ok(self.node(id)?.intersects(x, y, width, height))
    }

    /// Node bounds with `sides` applied (layout helper).
    pub fn padding_rect(&self, id: NodeId, sides: Sides) -> Result<Rect, TreeError> {
        Ok(self.node(id)?.padding(sides))
    }

    /// Change a node's bounds. A negative `width`/`height` keeps the current value.
    ///
    /// The node receives `PreGeometryChange` before and `PostGeometryChange`
    /// after the write.
    pub fn set_bounds(
        &mut self,
        id: NodeId,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<&mut Self, TreeError> {
        let old = self.node(id)?.bounds;
        let new = old.with_xywh(x, y, width, height);

        self.send_pulse(id, PulsePhase::PreGeometryChange)?;
        self.node_mut(id)?.bounds = new;
        self.send_pulse(id, PulsePhase::PostGeometryChange)?;

        #[cfg(feature = "tracing")]
        tracing::trace!(node = %id, %old, %new, "bounds changed");
        self.hooks.dispatch(
            &self.hooks.set_bounds,
            &mut SetBoundsArgs { node: id, old, new },
        );
        Ok(self)
    }

    /// Shift a node by `(dx, dy)`.
    pub fn move_by(&mut self, id: NodeId, dx: i32, dy: i32) -> Result<&mut Self, TreeError> {
        let bounds = self.node(id)?.bounds.translate(dx, dy);
        self.set_bounds(id, bounds.x, bounds.y, -1, -1)
    }

    /// Exact inverse of [`move_by`](Self::move_by).
    pub fn move_back(&mut self, id: NodeId, dx: i32, dy: i32) -> Result<&mut Self, TreeError> {
        let bounds = self.node(id)?.bounds.translate_back(dx, dy);
        self.set_bounds(id, bounds.x, bounds.y, -1, -1)
    }

    // -----------------------------------------------------------------------
    // Enabled state
    // -----------------------------------------------------------------------

    pub fn is_enabled(&self, id: NodeId) -> Result<bool, TreeError> {
        Ok(self.node(id)?.enabled)
    }

    /// Enable or disable a node. Returns `false` if nothing changed.
    pub fn set_enabled(&mut self, id: NodeId, value: bool) -> Result<bool, TreeError> {
        let node = self.node_mut(id)?;
        if node.enabled == value {
            return Ok(false);
        }
        node.enabled = value;
        let phase = if value {
            PulsePhase::Enable
        } else {
            PulsePhase::Disable
        };
        self.send_pulse(id, phase)?;
        self.hooks
            .dispatch(&self.hooks.enabled, &mut EnabledArgs { node: id, value });
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Pulses and passes
    // -----------------------------------------------------------------------

    /// Send `phase` to a single node.
    pub fn pulse(&mut self, id: NodeId, phase: PulsePhase) -> Result<(), TreeError> {
        self.send_pulse(id, phase)
    }

    /// Send `phase` to every node of the subtree, parents first.
    pub fn pulse_subtree(&mut self, id: NodeId, phase: PulsePhase) -> Result<(), TreeError> {
        self.send_pulse(id, phase)?;
        for child in self.node(id)?.children.clone() {
            self.pulse_subtree(child, phase)?;
        }
        Ok(())
    }

    fn send_pulse(&mut self, id: NodeId, phase: PulsePhase) -> Result<(), TreeError> {
        let hooks = Arc::clone(&self.hooks);
        let absolute = self.absolute_xy(id)?;
        let node = self.node_mut(id)?;
        let ctx = NodeContext::new(id, node.bounds, absolute, node.enabled, &hooks);
        #[cfg(feature = "tracing")]
        tracing::trace!(node = %id, phase = phase.name(), "pulse");
        node.behavior.pulse(phase, &ctx);
        Ok(())
    }

    /// Run the update pass over a subtree, parents first.
    ///
    /// Nodes with a padding configuration are laid out against their parent
    /// before their behavior updates.
    pub fn update(&mut self, id: NodeId) -> Result<(), TreeError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("update", node = %id).entered();
        self.update_node(id)
    }

    fn update_node(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.apply_layout(id)?;

        let hooks = Arc::clone(&self.hooks);
        let absolute = self.absolute_xy(id)?;
        let node = self.node_mut(id)?;
        let ctx = NodeContext::new(id, node.bounds, absolute, node.enabled, &hooks);
        node.behavior.update(&ctx);

        for child in self.node(id)?.children.clone() {
            self.update_node(child)?;
        }
        Ok(())
    }

    fn apply_layout(&mut self, id: NodeId) -> Result<(), TreeError> {
        let node = self.node(id)?;
        let (Some(sides), Some(parent)) = (node.config.padding, node.parent) else {
            return Ok(());
        };
        let area = self.node(parent)?.bounds;
        let target = Rect::from_size(area.width, area.height).padding(sides);
        if target != node.bounds {
            self.set_bounds(id, target.x, target.y, target.width, target.height)?;
        }
        Ok(())
    }

    /// Draw every enabled node of a subtree. Returns the number of nodes drawn.
    pub fn draw(&mut self, id: NodeId) -> Result<usize, TreeError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("draw", node = %id).entered();
        self.draw_node(id)
    }

    fn draw_node(&mut self, id: NodeId) -> Result<usize, TreeError> {
        if !self.node(id)?.enabled {
            return Ok(0);
        }
        let bounds = self.absolute_bounds(id)?;
        self.hooks
            .dispatch(&self.hooks.draw, &mut DrawArgs { node: id, bounds });
        self.send_pulse(id, PulsePhase::Draw)?;

        let mut drawn = 1;
        for child in self.node(id)?.children.clone() {
            drawn += self.draw_node(child)?;
        }
        Ok(drawn)
    }

    // -----------------------------------------------------------------------
    // Touch dispatch
    // -----------------------------------------------------------------------

    /// Deepest enabled node at an absolute point, top-most siblings first.
    pub fn hit_test(&self, x: i32, y: i32) -> Option<NodeId> {
        self.roots
            .iter()
            .rev()
            .find_map(|&root| self.hit_node(root, x, y))
    }

    fn hit_node(&self, id: NodeId, x: i32, y: i32) -> Option<NodeId> {
        let node = self.node(id).ok()?;
        if !node.enabled || !node.contains(x, y) {
            return None;
        }
        let (lx, ly) = (x.wrapping_sub(node.bounds.x), y.wrapping_sub(node.bounds.y));
        node.children
            .iter()
            .rev()
            .find_map(|&child| self.hit_node(child, lx, ly))
            .or(Some(id))
    }

    /// State of a session with a touch in progress. Idle sessions are not kept.
    pub fn session(&self, id: SessionId) -> Option<&TouchSession> {
        self.sessions.get(&id)
    }

    /// Dispatch a touch. Returns the node that used it, if any.
    ///
    /// `Begin` goes to the deepest node under the contact that admits it;
    /// that node acquires the session. `Moving` and `End` go to the acquired
    /// node. Out-of-order touches are rejected without side effects.
    pub fn touched(&mut self, touch: Touch) -> Result<Option<NodeId>, TouchError> {
        let id = touch.session().ok_or(TouchError::MissingSession)?;
        let mut session = self
            .sessions
            .remove(&id)
            .unwrap_or_else(|| TouchSession::new(id));

        if let Err(err) = session.accept(&touch) {
            #[cfg(feature = "tracing")]
            tracing::warn!(session = %id, error = %err, "touch rejected");
            self.keep(session);
            return Err(err);
        }

        let used = match touch.phase() {
            TouchPhase::Begin => {
                let target = self.begin_touch(&touch);
                if let Some(target) = target {
                    session.acquire(target);
                }
                target
            }
            TouchPhase::Moving => session.target().filter(|&t| self.deliver(t, &touch)),
            TouchPhase::End => session.release().filter(|&t| self.deliver(t, &touch)),
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(session = %id, phase = ?touch.phase(), used = ?used, "touch dispatched");
        self.keep(session);
        Ok(used)
    }

    /// Complete a session's in-flight touch with a synthesized `End`.
    /// Returns the node that used the `End`, if any.
    pub fn end_session(&mut self, id: SessionId) -> Option<NodeId> {
        self.force_end(id)
    }

    fn force_end(&mut self, id: SessionId) -> Option<NodeId> {
        let mut session = self.sessions.remove(&id)?;
        let end = session.simulated_end()?;
        session.accept(&end).ok()?;
        session.release().filter(|&t| self.deliver(t, &end))
    }

    /// Store a session only while it has a touch in progress.
    fn keep(&mut self, session: TouchSession) {
        if session.is_active() {
            self.sessions.insert(session.id(), session);
        }
    }

    fn begin_touch(&mut self, touch: &Touch) -> Option<NodeId> {
        for root in self.roots.clone().into_iter().rev() {
            if let Some(target) = self.begin_at(root, touch) {
                return Some(target);
            }
        }
        None
    }

    /// `touch` is in the coordinates of `id`'s parent.
    fn begin_at(&mut self, id: NodeId, touch: &Touch) -> Option<NodeId> {
        let node = self.node(id).ok()?;
        if !node.enabled || !node.contains(touch.x(), touch.y()) {
            return None;
        }
        let (bounds, children) = (node.bounds, node.children.clone());
        let mut local = touch.clone();
        local.move_back(bounds.x, bounds.y);

        for child in children.into_iter().rev() {
            if let Some(target) = self.begin_at(child, &local) {
                return Some(target);
            }
        }
        self.admit(id, &local).then_some(id)
    }

    /// `touch` is absolute.
    fn deliver(&mut self, id: NodeId, touch: &Touch) -> bool {
        let Ok((x, y)) = self.absolute_xy(id) else {
            return false;
        };
        let Ok(node) = self.node(id) else {
            return false;
        };
        let mut local = touch.clone();
        local.move_back(x, y);
        let size = Rect::from_size(node.bounds.width, node.bounds.height);
        if !node.config.use_outside_touches && !size.contains(local.x(), local.y()) {
            return false;
        }
        self.admit(id, &local)
    }

    /// Admission checks, then the node's touch handler. `touch` is node-local.
    fn admit(&mut self, id: NodeId, touch: &Touch) -> bool {
        let Ok(node) = self.node(id) else {
            return false;
        };
        let wanted = match touch.phase() {
            TouchPhase::Begin => node.config.use_begin,
            TouchPhase::Moving => node.config.use_moving,
            TouchPhase::End => node.config.use_end,
        };
        if !wanted || !node.enabled {
            return false;
        }

        let mut args = CanTouchArgs {
            node: id,
            touch: touch.clone(),
            allowed: true,
        };
        // A failing admission handler denies the touch.
        if !self.hooks.dispatch(&self.hooks.can_touch, &mut args) || !args.allowed {
            return false;
        }

        let hooks = Arc::clone(&self.hooks);
        let Ok(absolute) = self.absolute_xy(id) else {
            return false;
        };
        let Ok(node) = self.node_mut(id) else {
            return false;
        };
        let ctx = NodeContext::new(id, node.bounds, absolute, node.enabled, &hooks);
        node.behavior.on_touch(touch, &ctx)
    }

    // -----------------------------------------------------------------------
    // Behavior access
    // -----------------------------------------------------------------------

    /// Typed view of a node's behavior.
    pub fn behavior<T: NodeBehavior>(&self, id: NodeId) -> Option<&T> {
        self.node(id).ok()?.behavior.as_any().downcast_ref()
    }

    /// Typed mutable view of a node's behavior.
    pub fn behavior_mut<T: NodeBehavior>(&mut self, id: NodeId) -> Option<&mut T> {
        self.node_mut(id).ok()?.behavior.as_any_mut().downcast_mut()
    }

    /// Run `f` with a node's typed behavior and its current context.
    pub fn with_behavior<T: NodeBehavior, R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut T, &NodeContext<'_>) -> R,
    ) -> Result<R, TreeError> {
        let hooks = Arc::clone(&self.hooks);
        let absolute = self.absolute_xy(id)?;
        let node = self.node_mut(id)?;
        let ctx = NodeContext::new(id, node.bounds, absolute, node.enabled, &hooks);
        let behavior = node
            .behavior
            .as_any_mut()
            .downcast_mut::<T>()
            .ok_or(TreeError::BehaviorMismatch {
                node: id,
                expected: type_name::<T>(),
            })?;
        Ok(f(behavior, &ctx))
    }

    // -----------------------------------------------------------------------
    // Arena
    // -----------------------------------------------------------------------

    fn alloc(&mut self, node: Node) -> (NodeId, &mut Node) {
        self.live += 1;
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: None,
                });
                (self.slots.len() - 1) as u32
            }
        };
        let slot = &mut self.slots[index as usize];
        let id = NodeId::from_raw(index, slot.generation);
        (id, slot.node.insert(node))
    }

    fn release(&mut self, id: NodeId) {
        let Some(slot) = self.slots.get_mut(id.index() as usize) else {
            return;
        };
        if slot.generation != id.generation() || slot.node.take().is_none() {
            return;
        }
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index());
        self.live -= 1;
    }

    fn node(&self, id: NodeId) -> Result<&Node, TreeError> {
        self.slots
            .get(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_ref())
            .ok_or(TreeError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, TreeError> {
        self.slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_mut())
            .ok_or(TreeError::UnknownNode(id))
    }
}

impl Drop for VisualTree {
    fn drop(&mut self) {
        self.clear();
    }
}
