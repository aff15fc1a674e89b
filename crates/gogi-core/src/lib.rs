//! Core systems for GoGi.
//!
//! This crate provides the foundation of the GoGi scenegraph:
//!
//! - **Tree**: arena-backed node tree with ordered children, non-owning
//!   parent handles, unique sibling names and per-node flags
//! - **Properties**: a closed set of style keys with typed values, parsed
//!   from strings where needed
//! - **Signals**: per-node event channels with one connection per receiver
//!   and a FIFO queue for batched dispatch
//! - **Geometry**: points, sizes, rectangles and colors in 96-DPI pixels
//!
//! The whole model is single-threaded. Signal slots are reference counted
//! closures, so the bus is not `Send`.

pub mod error;
pub mod logging;
pub mod property;
pub mod signal;
pub mod tree;
pub mod types;

pub use error::{TreeError, TreeResult};
pub use logging::{TreeDebug, TreeFormatOptions, TreeStyle};
pub use property::{Length, PropValue, PropertyBag, StyleKey, Unit};
pub use signal::{SignalBus, SignalEvent, SignalKind, Slot};
pub use tree::{Node, NodeFlags, NodeId, Tree};
pub use types::{Color, Point, Rect, Size};

static_assertions::assert_impl_all!(Tree: Send, Sync);
static_assertions::assert_not_impl_any!(SignalBus<()>: Send, Sync);
