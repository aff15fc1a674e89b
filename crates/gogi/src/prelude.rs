//! Commonly used types.
//!
//! ```
//! use gogi::prelude::*;
//! ```

// ============================================================================
// Tree, properties and signals
// ============================================================================

pub use gogi_core::{
    Color, Length, NodeId, Point, PropValue, Rect, SignalEvent, SignalKind, Size, StyleKey,
    TreeError, TreeResult, Unit,
};

// ============================================================================
// Style
// ============================================================================

pub use gogi_style::{Align, LayoutMode, PaintStyle, ResolvedStyle, StyleDefaults};

// ============================================================================
// Layout and updates
// ============================================================================

pub use crate::geometry::{Geometry, SizeReq};
pub use crate::update::{UpdateGuard, UpdateReport, UpdateState};
pub use crate::viewport::Viewport;

// ============================================================================
// Painting and composites
// ============================================================================

pub use crate::paint::{PaintItem, Painter, RecordingPainter};
pub use crate::tabs::TabView;
pub use crate::widgets::{add_space, add_stretch};
