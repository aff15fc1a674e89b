//! Layout participants and sizing helpers.
//!
//! [`STRETCH_TYPE`] nodes claim leftover space in a row or column; a
//! [`SPACE_TYPE`] node is a fixed 1em gap. Both get their sizing from the
//! built-in type stylesheet, so a stylesheet loaded from TOML can retune
//! them.

use gogi_core::{NodeId, PropValue, StyleKey, TreeResult};
use gogi_style::{SPACE_TYPE, STRETCH_TYPE};

use crate::viewport::Viewport;

/// Append a flexible spacer to `parent`.
pub fn add_stretch(viewport: &mut Viewport, parent: NodeId) -> TreeResult<NodeId> {
    viewport.add_child(parent, STRETCH_TYPE, "")
}

/// Append a fixed 1em spacer to `parent`.
pub fn add_space(viewport: &mut Viewport, parent: NodeId) -> TreeResult<NodeId> {
    viewport.add_child(parent, SPACE_TYPE, "")
}

impl Viewport {
    /// Pin a node's width: preferred, min and max all set to `width`,
    /// which may be pixels or any [`Length`](gogi_core::Length).
    pub fn set_fixed_width(&mut self, id: NodeId, width: impl Into<PropValue>) -> TreeResult<()> {
        let width = width.into();
        let mut batch = self.begin_update();
        batch.set_prop(id, StyleKey::Width, width.clone())?;
        batch.set_prop(id, StyleKey::MinWidth, width.clone())?;
        batch.set_prop(id, StyleKey::MaxWidth, width)
    }

    /// Pin a node's height: preferred, min and max all set to `height`.
    pub fn set_fixed_height(&mut self, id: NodeId, height: impl Into<PropValue>) -> TreeResult<()> {
        let height = height.into();
        let mut batch = self.begin_update();
        batch.set_prop(id, StyleKey::Height, height.clone())?;
        batch.set_prop(id, StyleKey::MinHeight, height.clone())?;
        batch.set_prop(id, StyleKey::MaxHeight, height)
    }

    /// Let a node claim leftover horizontal space.
    pub fn set_stretch_max_width(&mut self, id: NodeId) -> TreeResult<()> {
        self.set_prop(id, StyleKey::MaxWidth, -1.0)
    }

    /// Let a node claim leftover vertical space.
    pub fn set_stretch_max_height(&mut self, id: NodeId) -> TreeResult<()> {
        self.set_prop(id, StyleKey::MaxHeight, -1.0)
    }
}

#[cfg(test)]
mod tests {
    use gogi_core::{Length, Size};
    use gogi_style::LayoutMode;

    use super::*;

    #[test]
    fn test_stretch_pushes_siblings_apart() {
        let mut vp = Viewport::new(Size::new(200.0, 50.0));
        let root = vp.root();
        vp.set_prop(root, StyleKey::LayoutMode, LayoutMode::Row).unwrap();
        let left = vp.add_child(root, "Button", "left").unwrap();
        vp.set_fixed_width(left, 30.0).unwrap();
        let stretch = add_stretch(&mut vp, root).unwrap();
        let right = vp.add_child(root, "Button", "right").unwrap();
        vp.set_fixed_width(right, 30.0).unwrap();

        assert_eq!(vp.tree().node(stretch).unwrap().unique_name(), "Stretch0");
        assert_eq!(vp.geometry(left).unwrap().rect.left(), 0.0);
        assert_eq!(vp.geometry(stretch).unwrap().rect.width(), 140.0);
        assert_eq!(vp.geometry(right).unwrap().rect.left(), 170.0);
        assert_eq!(vp.max_size(stretch).unwrap(), Size::new(-1.0, -1.0));
    }

    #[test]
    fn test_space_is_one_em() {
        let mut vp = Viewport::new(Size::new(200.0, 200.0));
        let root = vp.root();
        let space = add_space(&mut vp, root).unwrap();
        assert_eq!(vp.preferred_size(space).unwrap(), Size::new(16.0, 16.0));
        assert_eq!(vp.min_size(space).unwrap(), Size::new(16.0, 16.0));
    }

    #[test]
    fn test_fixed_sizes_accept_units() {
        let mut vp = Viewport::new(Size::new(200.0, 100.0));
        let root = vp.root();
        let label = vp.add_child(root, "Label", "l").unwrap();
        vp.set_fixed_width(label, Length::em(2.0)).unwrap();
        vp.set_fixed_height(label, Length::percent(50.0)).unwrap();

        let req = vp.size_req(label).unwrap();
        assert_eq!(req.width.pref, 32.0);
        assert_eq!(req.width.min, 32.0);
        assert_eq!(req.width.max, Some(32.0));
        assert_eq!(vp.geometry(label).unwrap().rect.size, Size::new(32.0, 50.0));
    }

    #[test]
    fn test_fixed_height_is_pinned() {
        let mut vp = Viewport::new(Size::new(100.0, 100.0));
        let root = vp.root();
        let bar = vp.add_child(root, "Frame", "bar").unwrap();
        vp.set_fixed_height(bar, 24.0).unwrap();
        vp.set_stretch_max_height(root).unwrap();
        let req = vp.size_req(bar).unwrap();
        assert_eq!(req.height.pref, 24.0);
        assert_eq!(req.height.min, 24.0);
        assert_eq!(req.height.max, Some(24.0));
        assert_eq!(vp.geometry(bar).unwrap().rect.height(), 24.0);
    }
}
