#![forbid(unsafe_code)]

//! Item rack: a 3×3 widget that owns a text marker.
//!
//! The marker is an external resource placed at the rack's absolute origin.
//! Its position goes stale whenever the rack (or an ancestor) moves, so the
//! rack keeps it in lockstep with the tree:
//!
//! | event | action |
//! |---|---|
//! | `Initialize` pulse, update pass | recreate if missing or stale |
//! | `PreGeometryChange` | remove |
//! | `PostGeometryChange` | create if text is set |
//! | `Dispose` | remove |
//!
//! # Invariants
//!
//! 1. The rack owns at most one marker at any time, and never holds two live
//!    at once: the old one is removed before its replacement is requested.
//! 2. After an update pass the marker's text and position equal the rack's,
//!    and a rack without text has no marker.
//! 3. Removal is idempotent; the remove hook runs once per real handle.

use std::any::Any;

use tileui_core::geometry::Rect;
use tileui_core::hooks::{CreateMarkerArgs, RemoveMarkerArgs, Severity};
use tileui_core::node::{NodeBehavior, NodeContext};
use tileui_core::pulse::PulseHandler;

use crate::marker::{Marker, MarkerError};

/// A 3×3 rack showing a text marker.
#[derive(Debug, Clone, Default)]
pub struct ItemRack {
    text: Option<String>,
    marker: Option<Marker>,
}

impl ItemRack {
    pub const WIDTH: i32 = 3;
    pub const HEIGHT: i32 = 3;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rack bounds with origin `(x, y)`.
    pub const fn bounds_at(x: i32, y: i32) -> Rect {
        Rect::new(x, y, Self::WIDTH, Self::HEIGHT)
    }

    /// Set the text before attaching (builder pattern).
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the text. The marker follows on the next update pass.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// Clear the text. The marker is removed on the next update pass.
    pub fn clear_text(&mut self) {
        self.text = None;
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn marker(&self) -> Option<&Marker> {
        self.marker.as_ref()
    }

    /// Place a marker with the current text at the rack's absolute origin.
    ///
    /// A marker the rack already owns is removed first and its handle is
    /// offered to the service as `existing`, so the service may recycle it.
    /// Returns `Ok(false)` if the marker service declined; the failure is
    /// logged and the rack stays markerless.
    pub fn create_marker(&mut self, ctx: &NodeContext<'_>) -> Result<bool, MarkerError> {
        let Some(text) = self.text.clone() else {
            ctx.log("Can't create marker: text is not set.", Severity::Error);
            return Err(MarkerError::TextUnset);
        };
        Ok(self.place_marker(ctx, text))
    }

    fn place_marker(&mut self, ctx: &NodeContext<'_>, text: String) -> bool {
        let hooks = ctx.hooks();
        let (x, y) = ctx.absolute_xy();
        let existing = self.marker.as_ref().map(Marker::handle);
        self.remove_marker(ctx);
        let mut args = CreateMarkerArgs {
            x,
            y,
            existing,
            owner: ctx.id(),
            text,
            marker: None,
        };
        hooks.dispatch(&hooks.create_marker, &mut args);

        let Some(handle) = args.marker else {
            ctx.log("Can't create new marker.", Severity::Error);
            return false;
        };
        tileui_core::debug!(node = %ctx.id(), x, y, "marker placed");
        self.marker = Some(Marker::new(handle, args.text, x, y));
        true
    }

    /// Remove the owned marker, if any.
    pub fn remove_marker(&mut self, ctx: &NodeContext<'_>) {
        let Some(marker) = self.marker.take() else {
            return;
        };
        let hooks = ctx.hooks();
        hooks.dispatch(
            &hooks.remove_marker,
            &mut RemoveMarkerArgs {
                owner: ctx.id(),
                marker: marker.handle(),
            },
        );
        tileui_core::debug!(node = %ctx.id(), "marker removed");
    }

    /// Recreate the marker if it is missing or no longer matches; drop it
    /// if the text was cleared.
    fn reconcile(&mut self, ctx: &NodeContext<'_>) {
        let Some(text) = self.text.clone() else {
            self.remove_marker(ctx);
            return;
        };
        let (x, y) = ctx.absolute_xy();
        if self
            .marker
            .as_ref()
            .is_some_and(|marker| marker.matches(&text, x, y))
        {
            return;
        }
        self.place_marker(ctx, text);
    }
}

impl PulseHandler for ItemRack {
    fn on_initialize(&mut self, ctx: &NodeContext<'_>) {
        self.reconcile(ctx);
    }

    fn on_pre_geometry_change(&mut self, ctx: &NodeContext<'_>) {
        self.remove_marker(ctx);
    }

    fn on_post_geometry_change(&mut self, ctx: &NodeContext<'_>) {
        if let Some(text) = self.text.clone() {
            self.place_marker(ctx, text);
        }
    }

    fn on_dispose(&mut self, ctx: &NodeContext<'_>) {
        self.remove_marker(ctx);
    }
}

impl NodeBehavior for ItemRack {
    fn name(&self) -> &'static str {
        "item_rack"
    }

    fn update(&mut self, ctx: &NodeContext<'_>) {
        self.reconcile(ctx);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tileui_core::hooks::{HookManager, LogArgs, MarkerHandle};
    use tileui_core::node::NodeId;

    fn ctx_at(hooks: &HookManager, x: i32, y: i32) -> NodeContext<'_> {
        NodeContext::new(
            NodeId::from_raw(0, 0),
            ItemRack::bounds_at(x, y),
            (x, y),
            true,
            hooks,
        )
    }

    #[test]
    fn create_without_text_logs_and_fails() {
        let hooks = HookManager::new();
        let created = Arc::new(Mutex::new(0));
        let logs: Arc<Mutex<Vec<LogArgs>>> = Arc::default();
        let sink = Arc::clone(&created);
        hooks.create_marker.register(move |_| {
            *sink.lock().unwrap() += 1;
            Ok(())
        });
        let sink = Arc::clone(&logs);
        hooks.log.register(move |args| {
            sink.lock().unwrap().push(args.clone());
            Ok(())
        });

        let mut rack = ItemRack::new();
        assert_eq!(
            rack.create_marker(&ctx_at(&hooks, 0, 0)),
            Err(MarkerError::TextUnset)
        );
        assert_eq!(*created.lock().unwrap(), 0);
        let logs = logs.lock().unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].severity, Severity::Error);
        assert!(rack.marker().is_none());
    }

    #[test]
    fn declined_creation_leaves_rack_markerless() {
        let hooks = HookManager::new();
        let logs: Arc<Mutex<Vec<LogArgs>>> = Arc::default();
        let sink = Arc::clone(&logs);
        hooks.log.register(move |args| {
            sink.lock().unwrap().push(args.clone());
            Ok(())
        });

        let mut rack = ItemRack::new().with_text("Hello");
        assert_eq!(rack.create_marker(&ctx_at(&hooks, 1, 1)), Ok(false));
        assert!(rack.marker().is_none());
        let logs = logs.lock().unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].message, "Can't create new marker.");
    }

    #[test]
    fn remove_is_idempotent() {
        let hooks = HookManager::new();
        let removed = Arc::new(Mutex::new(Vec::new()));
        hooks.create_marker.register(|args| {
            args.marker = Some(MarkerHandle::new(7));
            Ok(())
        });
        let sink = Arc::clone(&removed);
        hooks.remove_marker.register(move |args| {
            sink.lock().unwrap().push(args.marker);
            Ok(())
        });

        let ctx = ctx_at(&hooks, 2, 3);
        let mut rack = ItemRack::new().with_text("x");
        assert_eq!(rack.create_marker(&ctx), Ok(true));
        rack.remove_marker(&ctx);
        rack.remove_marker(&ctx);
        assert_eq!(*removed.lock().unwrap(), vec![MarkerHandle::new(7)]);
        assert!(rack.marker().is_none());
    }

    #[test]
    fn replacement_removes_previous_marker_first() {
        let hooks = HookManager::new();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        hooks.create_marker.register(move |args| {
            let mut events = sink.lock().unwrap();
            let handle = events.len() as u64 + 1;
            events.push(format!("create:{:?}", args.existing.map(|h| h.raw())));
            args.marker = Some(MarkerHandle::new(handle));
            Ok(())
        });
        let sink = Arc::clone(&events);
        hooks.remove_marker.register(move |args| {
            sink.lock()
                .unwrap()
                .push(format!("remove:{}", args.marker.raw()));
            Ok(())
        });

        let ctx = ctx_at(&hooks, 0, 0);
        let mut rack = ItemRack::new().with_text("a");
        rack.create_marker(&ctx).unwrap();
        rack.create_marker(&ctx).unwrap();
        assert_eq!(
            *events.lock().unwrap(),
            vec!["create:None", "remove:1", "create:Some(1)"]
        );
        assert_eq!(rack.marker().map(|m| m.handle().raw()), Some(3));
    }

    #[test]
    fn declined_replacement_still_releases_old_marker() {
        let hooks = HookManager::new();
        let accept = Arc::new(Mutex::new(true));
        let removed = Arc::new(Mutex::new(Vec::new()));
        let gate = Arc::clone(&accept);
        hooks.create_marker.register(move |args| {
            if *gate.lock().unwrap() {
                args.marker = Some(MarkerHandle::new(9));
            }
            Ok(())
        });
        let sink = Arc::clone(&removed);
        hooks.remove_marker.register(move |args| {
            sink.lock().unwrap().push(args.marker.raw());
            Ok(())
        });

        let ctx = ctx_at(&hooks, 0, 0);
        let mut rack = ItemRack::new().with_text("a");
        assert_eq!(rack.create_marker(&ctx), Ok(true));
        *accept.lock().unwrap() = false;
        assert_eq!(rack.create_marker(&ctx), Ok(false));
        assert_eq!(*removed.lock().unwrap(), vec![9]);
        assert!(rack.marker().is_none());
    }

    #[test]
    fn update_after_clear_text_removes_marker() {
        let hooks = HookManager::new();
        let removed = Arc::new(Mutex::new(Vec::new()));
        hooks.create_marker.register(|args| {
            args.marker = Some(MarkerHandle::new(5));
            Ok(())
        });
        let sink = Arc::clone(&removed);
        hooks.remove_marker.register(move |args| {
            sink.lock().unwrap().push(args.marker.raw());
            Ok(())
        });

        let ctx = ctx_at(&hooks, 1, 2);
        let mut rack = ItemRack::new().with_text("Hello");
        rack.update(&ctx);
        assert!(rack.marker().is_some());

        rack.clear_text();
        assert!(rack.marker().is_some());
        rack.update(&ctx);
        assert!(rack.marker().is_none());
        rack.update(&ctx);
        assert_eq!(*removed.lock().unwrap(), vec![5]);
    }

    #[test]
    fn update_recreates_stale_text() {
        let hooks = HookManager::new();
        hooks.create_marker.register(|args| {
            args.marker = Some(MarkerHandle::new(args.text.len() as u64));
            Ok(())
        });
        let ctx = ctx_at(&hooks, 5, 5);
        let mut rack = ItemRack::new().with_text("ab");
        rack.update(&ctx);
        assert_eq!(rack.marker().map(Marker::text), Some("ab"));
        rack.set_text("abcd");
        rack.update(&ctx);
        assert_eq!(rack.marker().map(Marker::text), Some("abcd"));
        assert_eq!(rack.marker().map(|m| m.handle().raw()), Some(4));
    }
}
