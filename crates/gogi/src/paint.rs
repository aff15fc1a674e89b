//! Paint hand-off.
//!
//! The core never rasterizes. After each signalling flush that changed
//! anything, the viewport hands its [`Painter`] the visible nodes in
//! depth-first order together with their geometry and paint style.

use std::cell::RefCell;
use std::rc::Rc;

use gogi_core::{NodeId, Rect};
use gogi_style::PaintStyle;

/// One node to paint.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintItem {
    pub node: NodeId,
    pub type_tag: &'static str,
    pub rect: Rect,
    pub style: PaintStyle,
    pub selected: bool,
}

/// Receives the paint list of each frame.
pub trait Painter {
    fn paint(&mut self, items: &[PaintItem]);
}

/// A painter that keeps every frame it receives.
///
/// Clones share the same frame log, so a test can keep one handle and give
/// the other to the viewport.
#[derive(Debug, Clone, Default)]
pub struct RecordingPainter {
    frames: Rc<RefCell<Vec<Vec<PaintItem>>>>,
}

impl RecordingPainter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.borrow().len()
    }

    /// The most recent frame, if any.
    pub fn last_frame(&self) -> Option<Vec<PaintItem>> {
        self.frames.borrow().last().cloned()
    }

    pub fn clear(&self) {
        self.frames.borrow_mut().clear();
    }
}

impl Painter for RecordingPainter {
    fn paint(&mut self, items: &[PaintItem]) {
        self.frames.borrow_mut().push(items.to_vec());
    }
}
