#![forbid(unsafe_code)]

//! Typed hook channels: the tree's extension points.
//!
//! A [`Hook<T>`] is an ordered list of handlers over a mutable args value.
//! [`HookManager`] groups the fixed set of channels a tree invokes. Hosts
//! register handlers to delegate side effects (marker placement, logging,
//! admission checks) without the tree knowing who implements them.
//!
//! # Invariants
//!
//! 1. Handlers run in registration order, each seeing the effects of the
//!    previous ones on the shared args.
//! 2. Invocation never reorders, retries or parallelizes handlers.
//! 3. A handler error stops the remaining handlers of that invocation only;
//!    [`HookManager::dispatch`] reports it and lets the caller carry on.
//! 4. Invocation runs over a snapshot of the handler list, so a handler may
//!    register or unregister handlers without deadlocking.
//!
//! # Usage
//!
//! ```
//! use tileui_core::hooks::{HookManager, LogArgs, Severity};
//!
//! let hooks = HookManager::shared();
//! hooks.log.register(|args: &mut LogArgs| {
//!     eprintln!("[{:?}] {}", args.severity, args.message);
//!     Ok(())
//! });
//! hooks.log("tree ready", Severity::Info);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::geometry::Rect;
use crate::node::NodeId;
use crate::touch::Touch;

/// Result returned by every hook handler.
pub type HookResult = Result<(), HookError>;

type Handler<T> = Arc<dyn Fn(&mut T) -> HookResult + Send + Sync>;

/// Registration token returned by [`Hook::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

/// An ordered list of handlers for one extension point.
pub struct Hook<T> {
    name: &'static str,
    handlers: RwLock<Vec<(HandlerId, Handler<T>)>>,
    next_id: AtomicU64,
}

impl<T> fmt::Debug for Hook<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook")
            .field("name", &self.name)
            .field("handlers", &self.len())
            .finish()
    }
}

impl<T> Hook<T> {
    /// Create an empty channel.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            handlers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Append a handler. It runs after every handler registered before it.
    pub fn register<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&mut T) -> HookResult + Send + Sync + 'static,
    {
        let id = HandlerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(handler)));
        id
    }

    /// Remove a handler. Returns `false` if it was not registered.
    pub fn unregister(&self, id: HandlerId) -> bool {
        let mut handlers = self
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        handlers.len() != before
    }

    /// Remove every handler.
    pub fn clear(&self) {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every handler in registration order over `args`.
    ///
    /// The first failing handler stops the invocation and its error is returned.
    pub fn invoke(&self, args: &mut T) -> HookResult {
        let snapshot: Vec<Handler<T>> = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();
        for handler in snapshot {
            handler(args)?;
        }
        Ok(())
    }
}

/// Error raised by a hook handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookError {
    message: String,
}

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for HookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hook handler failed: {}", self.message)
    }
}

impl std::error::Error for HookError {}

// ---------------------------------------------------------------------------
// Args
// ---------------------------------------------------------------------------

/// Severity of a [`LogArgs`] message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Diagnostic message routed to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogArgs {
    pub message: String,
    pub severity: Severity,
}

impl LogArgs {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}

/// A node was attached and initialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializeArgs {
    pub node: NodeId,
    pub parent: Option<NodeId>,
}

/// A node is being torn down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeinitializeArgs {
    pub node: NodeId,
}

/// A node is about to be drawn at `bounds` (absolute).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawArgs {
    pub node: NodeId,
    pub bounds: Rect,
}

/// A node's bounds changed from `old` to `new` (both parent-relative).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetBoundsArgs {
    pub node: NodeId,
    pub old: Rect,
    pub new: Rect,
}

/// A node moved to the top of its siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetTopArgs {
    pub node: NodeId,
}

/// A node's enabled flag changed to `value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnabledArgs {
    pub node: NodeId,
    pub value: bool,
}

/// Admission check before a node receives a touch.
///
/// Handlers clear `allowed` to veto the touch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanTouchArgs {
    pub node: NodeId,
    pub touch: Touch,
    pub allowed: bool,
}

/// Opaque handle to an external marker, minted by the host.
///
/// The core only stores and hands it back; it never looks inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(u64);

impl MarkerHandle {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(&self) -> u64 {
        self.0
    }
}

/// Request to place a marker at an absolute tile.
///
/// The handler stores the created handle in `marker`; leaving it `None`
/// signals failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateMarkerArgs {
    pub x: i32,
    pub y: i32,
    /// Marker the owner held until just before this request. It has already
    /// been removed; services may recycle it.
    pub existing: Option<MarkerHandle>,
    pub owner: NodeId,
    pub text: String,
    pub marker: Option<MarkerHandle>,
}

/// Request to remove a marker previously created for `owner`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveMarkerArgs {
    pub owner: NodeId,
    pub marker: MarkerHandle,
}

// ---------------------------------------------------------------------------
// HookManager
// ---------------------------------------------------------------------------

/// The fixed set of hook channels shared by every node of a tree.
#[derive(Debug)]
pub struct HookManager {
    pub initialize: Hook<InitializeArgs>,
    pub deinitialize: Hook<DeinitializeArgs>,
    pub draw: Hook<DrawArgs>,
    pub set_bounds: Hook<SetBoundsArgs>,
    pub set_top: Hook<SetTopArgs>,
    pub enabled: Hook<EnabledArgs>,
    pub can_touch: Hook<CanTouchArgs>,
    pub create_marker: Hook<CreateMarkerArgs>,
    pub remove_marker: Hook<RemoveMarkerArgs>,
    pub log: Hook<LogArgs>,
}

impl Default for HookManager {
    fn default() -> Self {
        Self::new()
    }
}

impl HookManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            initialize: Hook::new("initialize"),
            deinitialize: Hook::new("deinitialize"),
            draw: Hook::new("draw"),
            set_bounds: Hook::new("set_bounds"),
            set_top: Hook::new("set_top"),
            enabled: Hook::new("enabled"),
            can_touch: Hook::new("can_touch"),
            create_marker: Hook::new("create_marker"),
            remove_marker: Hook::new("remove_marker"),
            log: Hook::new("log"),
        }
    }

    /// A new manager behind an `Arc`, ready to inject into a tree.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Invoke `hook`, reporting a handler failure through the log channel.
    ///
    /// Returns `false` if a handler failed.
    pub fn dispatch<T>(&self, hook: &Hook<T>, args: &mut T) -> bool {
        match hook.invoke(args) {
            Ok(()) => true,
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(hook = hook.name(), error = %err, "hook handler failed");
                self.log(
                    format!("{} hook: {}", hook.name(), err.message()),
                    Severity::Warning,
                );
                false
            }
        }
    }

    /// Send a diagnostic to the host. Never fails.
    pub fn log(&self, message: impl Into<String>, severity: Severity) {
        let mut args = LogArgs::new(message, severity);
        #[cfg(feature = "tracing")]
        tracing::debug!(severity = ?args.severity, text = %args.message, "log hook");
        if let Err(_err) = self.log.invoke(&mut args) {
            #[cfg(feature = "tracing")]
            tracing::error!(error = %_err, "log handler failed");
        }
    }
}
