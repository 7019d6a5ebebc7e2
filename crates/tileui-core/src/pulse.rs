#![forbid(unsafe_code)]

//! Pulse lifecycle phases.
//!
//! A pulse is a synchronous signal sent to a single node around a mutation
//! of its presented state:
//!
//! 1. pre-phase pulse (node still sees the old state),
//! 2. the mutation,
//! 3. post-phase pulse (node sees the new state).
//!
//! `Dispose` is sent exactly once when a node is permanently removed.
//! Every handler method defaults to a no-op.

use crate::node::NodeContext;

/// Lifecycle signal delivered to one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PulsePhase {
    /// Node was attached to the tree.
    Initialize,
    /// Bounds are about to change; context still holds the old geometry.
    PreGeometryChange,
    /// Bounds changed; context holds the new geometry.
    PostGeometryChange,
    /// Node became enabled.
    Enable,
    /// Node became disabled.
    Disable,
    /// Node is being drawn.
    Draw,
    /// Node is being removed for good.
    Dispose,
}

impl PulsePhase {
    /// Every phase, in lifecycle order.
    pub const ALL: [PulsePhase; 7] = [
        PulsePhase::Initialize,
        PulsePhase::PreGeometryChange,
        PulsePhase::PostGeometryChange,
        PulsePhase::Enable,
        PulsePhase::Disable,
        PulsePhase::Draw,
        PulsePhase::Dispose,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::PreGeometryChange => "pre_geometry_change",
            Self::PostGeometryChange => "post_geometry_change",
            Self::Enable => "enable",
            Self::Disable => "disable",
            Self::Draw => "draw",
            Self::Dispose => "dispose",
        }
    }
}

/// Per-node reaction to pulses, one method per phase.
pub trait PulseHandler {
    /// Route `phase` to its method.
    fn pulse(&mut self, phase: PulsePhase, ctx: &NodeContext<'_>) {
        match phase {
            PulsePhase::Initialize => self.on_initialize(ctx),
            PulsePhase::PreGeometryChange => self.on_pre_geometry_change(ctx),
            PulsePhase::PostGeometryChange => self.on_post_geometry_change(ctx),
            PulsePhase::Enable => self.on_enable(ctx),
            PulsePhase::Disable => self.on_disable(ctx),
            PulsePhase::Draw => self.on_draw(ctx),
            PulsePhase::Dispose => self.on_dispose(ctx),
        }
    }

    fn on_initialize(&mut self, _ctx: &NodeContext<'_>) {}

    fn on_pre_geometry_change(&mut self, _ctx: &NodeContext<'_>) {}

    fn on_post_geometry_change(&mut self, _ctx: &NodeContext<'_>) {}

    fn on_enable(&mut self, _ctx: &NodeContext<'_>) {}

    fn on_disable(&mut self, _ctx: &NodeContext<'_>) {}

    fn on_draw(&mut self, _ctx: &NodeContext<'_>) {}

    /// Release every owned external resource. Must be idempotent.
    fn on_dispose(&mut self, _ctx: &NodeContext<'_>) {}
}
