//! GoGi - a retained-mode scenegraph core.
//!
//! This crate builds on [`gogi_core`] (node tree, properties, signals) and
//! [`gogi_style`] (style resolution) to provide:
//!
//! - **Size negotiation**: bottom-up preferred, min and max sizes
//!   ([`negotiate`])
//! - **Layout**: row, column, grid and stacked containers ([`layout`])
//! - **Update batching**: nested update scopes that collapse into one flush
//!   ([`update`])
//! - **Viewport**: owner of the root node, paint hand-off, hit testing and
//!   resize ([`Viewport`])
//! - **Composites**: spacers, sizing helpers and a [`TabView`]
//!
//! # Example
//!
//! ```
//! use gogi::prelude::*;
//!
//! let mut vp = Viewport::new(Size::new(300.0, 40.0));
//! let row = vp.root();
//! vp.set_prop(row, StyleKey::LayoutMode, LayoutMode::Row).unwrap();
//!
//! let ok = vp.add_child(row, "Button", "ok").unwrap();
//! vp.set_content_size(ok, Size::new(50.0, 20.0)).unwrap();
//! let fill = add_stretch(&mut vp, row).unwrap();
//!
//! assert_eq!(vp.geometry(ok).unwrap().rect.width(), 50.0);
//! assert_eq!(vp.geometry(fill).unwrap().rect.width(), 250.0);
//! ```

pub mod error;
pub mod geometry;
pub mod layout;
pub mod negotiate;
pub mod paint;
pub mod prelude;
pub mod tabs;
pub mod update;
pub mod viewport;
pub mod widgets;

pub use error::{GogiError, Result};
pub use geometry::{AxisReq, Geometry, Orientation, SizeReq};
pub use paint::{PaintItem, Painter, RecordingPainter};
pub use tabs::TabView;
pub use update::{UpdateGuard, UpdateReport, UpdateState, UpdateStats};
pub use viewport::Viewport;
pub use widgets::{add_space, add_stretch};

pub use gogi_core;
pub use gogi_style;

/// Log targets, for use in subscriber filters.
pub mod targets {
    /// Size negotiation and layout.
    pub const LAYOUT: &str = "gogi::layout";
    /// Update scopes and flushes.
    pub const UPDATE: &str = "gogi::update";
    /// Viewport lifecycle, input and paint.
    pub const VIEWPORT: &str = "gogi::viewport";
    /// Tab views.
    pub const TABS: &str = "gogi::tabs";
}
