#![forbid(unsafe_code)]

//! Core: geometry, touch sessions, hooks, pulse lifecycle and the visual tree.

pub mod geometry;
pub mod hooks;
pub mod logging;
pub mod node;
pub mod pulse;
pub mod session;
pub mod touch;
pub mod tree;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
