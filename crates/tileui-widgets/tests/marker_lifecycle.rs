//! Marker lifecycle of [`ItemRack`] driven through a real tree and a fake
//! marker service registered on the hooks.
//!
//! Invariant checked throughout: the service holds exactly the rack's marker
//! (or nothing), never two at once, and after an update pass that marker
//! shows the rack's text at the rack's absolute origin.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use proptest::prelude::*;
use tileui_core::geometry::Rect;
use tileui_core::hooks::{HookManager, LogArgs, MarkerHandle, Severity};
use tileui_core::node::NodeId;
use tileui_core::tree::VisualTree;
use tileui_widgets::{ItemRack, MarkerError, Panel};

// ── Fake marker service ─────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Service {
    next: u64,
    decline: bool,
    live: HashMap<MarkerHandle, (String, i32, i32)>,
    created: Vec<(i32, i32, String)>,
    removed: Vec<MarkerHandle>,
    bogus_removals: usize,
    /// Most markers ever live at the same time.
    peak: usize,
    logs: Vec<LogArgs>,
}

type Shared = Arc<Mutex<Service>>;

fn install(hooks: &HookManager) -> Shared {
    let service: Shared = Arc::default();

    let svc = Arc::clone(&service);
    hooks.create_marker.register(move |args| {
        let mut svc = svc.lock().unwrap();
        svc.created.push((args.x, args.y, args.text.clone()));
        if svc.decline {
            return Ok(());
        }
        svc.next += 1;
        let handle = MarkerHandle::new(svc.next);
        svc.live.insert(handle, (args.text.clone(), args.x, args.y));
        svc.peak = svc.peak.max(svc.live.len());
        args.marker = Some(handle);
        Ok(())
    });

    let svc = Arc::clone(&service);
    hooks.remove_marker.register(move |args| {
        let mut svc = svc.lock().unwrap();
        if svc.live.remove(&args.marker).is_none() {
            svc.bogus_removals += 1;
        }
        svc.removed.push(args.marker);
        Ok(())
    });

    let svc = Arc::clone(&service);
    hooks.log.register(move |args| {
        svc.lock().unwrap().logs.push(args.clone());
        Ok(())
    });

    service
}

fn rack_handle(tree: &VisualTree, rack: NodeId) -> Option<MarkerHandle> {
    tree.behavior::<ItemRack>(rack)
        .and_then(ItemRack::marker)
        .map(|m| m.handle())
}

// ═════════════════════════════════════════════════════════════════════════
// Scenarios
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn create_places_marker_at_rack_origin() {
    let hooks = HookManager::shared();
    let service = install(&hooks);
    let mut tree = VisualTree::new(hooks);
    let rack = tree.add_root(ItemRack::bounds_at(10, 10), ItemRack::new());

    let created = tree
        .with_behavior(rack, |rack: &mut ItemRack, ctx| {
            rack.set_text("Hello");
            rack.create_marker(ctx)
        })
        .unwrap();
    assert_eq!(created, Ok(true));

    let svc = service.lock().unwrap();
    assert_eq!(svc.created, vec![(10, 10, "Hello".to_string())]);
    assert_eq!(svc.live.len(), 1);
    assert_eq!(rack_handle(&tree, rack), svc.live.keys().next().copied());
}

#[test]
fn moving_rack_replaces_marker() {
    let hooks = HookManager::shared();
    let service = install(&hooks);
    let mut tree = VisualTree::new(hooks);
    let rack = tree.add_root(
        ItemRack::bounds_at(10, 10),
        ItemRack::new().with_text("Hello"),
    );
    let first = rack_handle(&tree, rack).unwrap();

    tree.set_bounds(rack, 20, 15, -1, -1).unwrap();

    let svc = service.lock().unwrap();
    assert_eq!(svc.removed, vec![first]);
    assert_eq!(
        svc.created,
        vec![(10, 10, "Hello".to_string()), (20, 15, "Hello".to_string())]
    );
    let second = rack_handle(&tree, rack).unwrap();
    assert_ne!(first, second);
    assert_eq!(svc.live.get(&second), Some(&("Hello".to_string(), 20, 15)));
    assert_eq!(svc.live.len(), 1);
}

#[test]
fn recreating_never_holds_two_markers() {
    let hooks = HookManager::shared();
    let service = install(&hooks);
    let mut tree = VisualTree::new(hooks);
    let rack = tree.add_root(
        ItemRack::bounds_at(4, 4),
        ItemRack::new().with_text("Hello"),
    );

    for _ in 0..3 {
        let created = tree
            .with_behavior(rack, |rack: &mut ItemRack, ctx| rack.create_marker(ctx))
            .unwrap();
        assert_eq!(created, Ok(true));
    }
    tree.set_bounds(rack, 8, 8, -1, -1).unwrap();

    let svc = service.lock().unwrap();
    assert_eq!(svc.peak, 1);
    assert_eq!(svc.live.len(), 1);
    assert_eq!(svc.removed.len(), 4);
    assert_eq!(svc.bogus_removals, 0);
}

#[test]
fn create_without_text_logs_once() {
    let hooks = HookManager::shared();
    let service = install(&hooks);
    let mut tree = VisualTree::new(hooks);
    let rack = tree.add_root(ItemRack::bounds_at(0, 0), ItemRack::new());

    let result = tree
        .with_behavior(rack, |rack: &mut ItemRack, ctx| rack.create_marker(ctx))
        .unwrap();
    assert_eq!(result, Err(MarkerError::TextUnset));

    let svc = service.lock().unwrap();
    assert!(svc.created.is_empty());
    assert_eq!(svc.logs.len(), 1);
    assert_eq!(svc.logs[0].severity, Severity::Error);
    assert_eq!(svc.logs[0].message, "Can't create marker: text is not set.");
}

// ═════════════════════════════════════════════════════════════════════════
// Tree-driven reconciliation
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn text_set_before_attach_creates_once() {
    let hooks = HookManager::shared();
    let service = install(&hooks);
    let mut tree = VisualTree::new(hooks);
    let rack = tree.add_root(ItemRack::bounds_at(3, 4), ItemRack::new().with_text("ore"));
    tree.update(rack).unwrap();
    tree.update(rack).unwrap();

    let svc = service.lock().unwrap();
    assert_eq!(svc.created, vec![(3, 4, "ore".to_string())]);
    assert!(svc.removed.is_empty());
}

#[test]
fn parent_move_is_reconciled_on_update() {
    let hooks = HookManager::shared();
    let service = install(&hooks);
    let mut tree = VisualTree::new(hooks);
    let shelf = tree.add_root(Rect::new(0, 0, 40, 40), Panel::new());
    let rack = tree
        .add_child(shelf, ItemRack::bounds_at(10, 10), ItemRack::new().with_text("x"))
        .unwrap();

    tree.move_by(shelf, 5, 5).unwrap();
    assert_eq!(service.lock().unwrap().live.len(), 1);

    tree.update(shelf).unwrap();
    let svc = service.lock().unwrap();
    let handle = rack_handle(&tree, rack).unwrap();
    assert_eq!(svc.live.get(&handle), Some(&("x".to_string(), 15, 15)));
    assert_eq!(svc.live.len(), 1);
    assert_eq!(svc.bogus_removals, 0);
}

#[test]
fn removal_releases_marker_exactly_once() {
    let hooks = HookManager::shared();
    let service = install(&hooks);
    let mut tree = VisualTree::new(hooks);
    let shelf = tree.add_root(Rect::new(0, 0, 40, 40), Panel::new());
    tree.add_child(shelf, ItemRack::bounds_at(1, 1), ItemRack::new().with_text("a"))
        .unwrap();
    tree.add_child(shelf, ItemRack::bounds_at(5, 1), ItemRack::new().with_text("b"))
        .unwrap();
    assert_eq!(service.lock().unwrap().live.len(), 2);

    tree.remove(shelf).unwrap();
    let svc = service.lock().unwrap();
    assert!(svc.live.is_empty());
    assert_eq!(svc.removed.len(), 2);
    assert_eq!(svc.bogus_removals, 0);
}

#[test]
fn dropping_tree_releases_markers() {
    let hooks = HookManager::shared();
    let service = install(&hooks);
    {
        let mut tree = VisualTree::new(hooks);
        let shelf = tree.add_root(Rect::new(0, 0, 40, 40), Panel::new());
        tree.add_child(shelf, ItemRack::bounds_at(1, 1), ItemRack::new().with_text("Hello"))
            .unwrap();
        tree.add_root(ItemRack::bounds_at(30, 30), ItemRack::new().with_text("top"));
        assert_eq!(service.lock().unwrap().live.len(), 2);
    }

    let svc = service.lock().unwrap();
    assert!(svc.live.is_empty());
    assert_eq!(svc.removed.len(), 2);
    assert_eq!(svc.bogus_removals, 0);
}

#[test]
fn cleared_text_removes_marker_on_update() {
    let hooks = HookManager::shared();
    let service = install(&hooks);
    let mut tree = VisualTree::new(hooks);
    let rack = tree.add_root(
        ItemRack::bounds_at(2, 2),
        ItemRack::new().with_text("Hello"),
    );
    let handle = rack_handle(&tree, rack).unwrap();

    tree.behavior_mut::<ItemRack>(rack).unwrap().clear_text();
    tree.update(rack).unwrap();
    tree.update(rack).unwrap();

    assert_eq!(rack_handle(&tree, rack), None);
    let svc = service.lock().unwrap();
    assert!(svc.live.is_empty());
    assert_eq!(svc.removed, vec![handle]);
    assert_eq!(svc.created.len(), 1);
}

#[test]
fn declined_creation_is_logged_and_retried_on_update() {
    let hooks = HookManager::shared();
    let service = install(&hooks);
    service.lock().unwrap().decline = true;
    let mut tree = VisualTree::new(hooks);
    let rack = tree.add_root(ItemRack::bounds_at(2, 2), ItemRack::new().with_text("t"));

    assert_eq!(rack_handle(&tree, rack), None);
    {
        let svc = service.lock().unwrap();
        assert_eq!(svc.logs.len(), 1);
        assert_eq!(svc.logs[0].message, "Can't create new marker.");
    }

    service.lock().unwrap().decline = false;
    tree.update(rack).unwrap();
    assert!(rack_handle(&tree, rack).is_some());
    assert_eq!(service.lock().unwrap().live.len(), 1);
}

// ═════════════════════════════════════════════════════════════════════════
// Property: marker invariant under arbitrary operation sequences
// ═════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
enum Op {
    SetText(String),
    ClearText,
    MoveRack(i32, i32),
    MoveShelf(i32, i32),
    Decline(bool),
    Update,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        "[a-z]{0,4}".prop_map(Op::SetText),
        Just(Op::ClearText),
        (-50i32..=50, -50i32..=50).prop_map(|(x, y)| Op::MoveRack(x, y)),
        (-50i32..=50, -50i32..=50).prop_map(|(dx, dy)| Op::MoveShelf(dx, dy)),
        any::<bool>().prop_map(Op::Decline),
        Just(Op::Update),
    ]
}

proptest! {
    #[test]
    fn rack_owns_at_most_one_live_marker(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let hooks = HookManager::shared();
        let service = install(&hooks);
        let mut tree = VisualTree::new(hooks);
        let shelf = tree.add_root(Rect::new(0, 0, 100, 100), Panel::new());
        let rack = tree.add_child(shelf, ItemRack::bounds_at(0, 0), ItemRack::new()).unwrap();

        for op in ops {
            match op {
                Op::SetText(text) => {
                    tree.behavior_mut::<ItemRack>(rack).unwrap().set_text(text);
                }
                Op::ClearText => tree.behavior_mut::<ItemRack>(rack).unwrap().clear_text(),
                Op::MoveRack(x, y) => {
                    tree.set_bounds(rack, x, y, -1, -1).unwrap();
                }
                Op::MoveShelf(dx, dy) => {
                    tree.move_by(shelf, dx, dy).unwrap();
                }
                Op::Decline(decline) => service.lock().unwrap().decline = decline,
                Op::Update => tree.update(shelf).unwrap(),
            }

            let svc = service.lock().unwrap();
            let owned = rack_handle(&tree, rack);
            prop_assert_eq!(svc.bogus_removals, 0);
            prop_assert!(svc.peak <= 1);
            prop_assert_eq!(svc.live.len(), usize::from(owned.is_some()));
            if let Some(handle) = owned {
                prop_assert!(svc.live.contains_key(&handle));
            }
        }

        service.lock().unwrap().decline = false;
        tree.update(shelf).unwrap();
        let text = tree
            .behavior::<ItemRack>(rack)
            .and_then(|r| r.text().map(str::to_owned));
        let (x, y) = tree.absolute_xy(rack).unwrap();
        let svc = service.lock().unwrap();
        match (text, rack_handle(&tree, rack)) {
            (Some(text), Some(handle)) => {
                prop_assert_eq!(svc.live.get(&handle), Some(&(text, x, y)));
            }
            (Some(_), None) => prop_assert!(false, "text set but no marker after update"),
            (None, handle) => {
                prop_assert_eq!(handle, None);
                prop_assert!(svc.live.is_empty());
            }
        }

        drop(svc);
        drop(tree);
        let svc = service.lock().unwrap();
        prop_assert!(svc.live.is_empty());
        prop_assert_eq!(svc.bogus_removals, 0);
    }
}
