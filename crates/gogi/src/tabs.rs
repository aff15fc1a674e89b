//! Tabbed container.
//!
//! A [`TabView`] is a column holding a row of tab buttons above a stacked
//! container of frames, one frame per button. Clicking a button selects its
//! tab through the signal bus:
//!
//! ```text
//! TabView (column)
//! ├── TabRow (row)      button per tab
//! └── TabStack (stacked) frame per tab, only the current one shown
//! ```
//!
//! Tab buttons are styled through the [`TAB_BUTTON_TYPE`] stylesheet entry
//! (padded, centered text), so defaults files can restyle them.

use gogi_core::{NodeId, SignalEvent, SignalKind, StyleKey, TreeError, TreeResult};
use gogi_style::LayoutMode;

use crate::viewport::Viewport;

const TARGET: &str = "gogi::tabs";

pub const TAB_VIEW_TYPE: &str = "TabView";
pub const TAB_ROW_TYPE: &str = "TabRow";
pub const TAB_STACK_TYPE: &str = "TabStack";
pub use gogi_style::TAB_BUTTON_TYPE;
pub const TAB_FRAME_TYPE: &str = "Frame";

/// Handles to the nodes making up a tab view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabView {
    root: NodeId,
    tab_row: NodeId,
    stack: NodeId,
}

impl TabView {
    /// Build an empty tab view under `parent`.
    pub fn new(viewport: &mut Viewport, parent: NodeId, name: &str) -> TreeResult<Self> {
        let mut batch = viewport.begin_update();
        let root = batch.add_child(parent, TAB_VIEW_TYPE, name)?;
        batch.set_prop(root, StyleKey::LayoutMode, LayoutMode::Column)?;
        batch.set_stretch_max_width(root)?;
        batch.set_stretch_max_height(root)?;

        let tab_row = batch.add_child(root, TAB_ROW_TYPE, "tabs")?;
        batch.set_prop(tab_row, StyleKey::LayoutMode, LayoutMode::Row)?;

        let stack = batch.add_child(root, TAB_STACK_TYPE, "frames")?;
        batch.set_prop(stack, StyleKey::LayoutMode, LayoutMode::Stacked)?;
        batch.set_stretch_max_width(stack)?;
        batch.set_stretch_max_height(stack)?;

        Ok(Self { root, tab_row, stack })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn tab_row(&self) -> NodeId {
        self.tab_row
    }

    pub fn stack(&self) -> NodeId {
        self.stack
    }

    /// Add a tab and return its frame. The first tab is selected.
    pub fn add_tab(&self, viewport: &mut Viewport, label: &str) -> TreeResult<NodeId> {
        let mut batch = viewport.begin_update();
        let button = batch.add_child(self.tab_row, TAB_BUTTON_TYPE, label)?;
        let frame = batch.add_child(self.stack, TAB_FRAME_TYPE, label)?;
        batch.set_stretch_max_width(frame)?;
        batch.set_stretch_max_height(frame)?;

        let view = *self;
        batch.connect(button, SignalKind::Clicked, self.root, move |vp, event| {
            let selected = vp
                .tree()
                .child_index(view.tab_row, event.sender)
                .and_then(|index| view.select_tab(vp, index));
            if let Err(err) = selected {
                tracing::debug!(target: TARGET, button = ?event.sender, %err, "tab click ignored");
            }
        });

        if self.tab_count(&batch) == 1 {
            self.select_tab(&mut batch, 0)?;
        }
        tracing::trace!(target: TARGET, view = ?self.root, label, "added tab");
        Ok(frame)
    }

    /// Show the tab at `index`.
    ///
    /// Emits [`SignalKind::Unselected`] from the previous button,
    /// [`SignalKind::Selected`] from the new one and
    /// [`SignalKind::TabSelected`] from the view with the index as payload.
    /// Selecting the current tab again emits nothing.
    pub fn select_tab(&self, viewport: &mut Viewport, index: usize) -> TreeResult<()> {
        let buttons = viewport.tree().children(self.tab_row)?.to_vec();
        let Some(&button) = buttons.get(index) else {
            return Err(TreeError::IndexOutOfRange {
                index,
                len: buttons.len(),
            });
        };
        let previous = self.current_index(viewport);
        if previous == Some(index) {
            return Ok(());
        }

        let mut batch = viewport.begin_update();
        batch.set_stack_top(self.stack, index)?;
        if let Some(old) = previous.and_then(|p| buttons.get(p).copied()) {
            batch.set_selected(old, false)?;
            batch.emit_signal(old, SignalKind::Unselected);
        }
        batch.set_selected(button, true)?;
        batch.emit_signal(button, SignalKind::Selected);
        batch.emit(SignalEvent::new(SignalKind::TabSelected, self.root).with_payload(index));
        Ok(())
    }

    /// Hide or show the frames, leaving the tab row in place.
    ///
    /// Emits [`SignalKind::TabCollapsed`] or [`SignalKind::TabOpened`] from
    /// the view when the state actually changes.
    pub fn set_collapsed(&self, viewport: &mut Viewport, collapsed: bool) -> TreeResult<()> {
        if self.is_collapsed(viewport) == collapsed {
            return Ok(());
        }
        let mut batch = viewport.begin_update();
        batch.set_visible(self.stack, !collapsed)?;
        let kind = if collapsed {
            SignalKind::TabCollapsed
        } else {
            SignalKind::TabOpened
        };
        tracing::trace!(target: TARGET, view = ?self.root, collapsed, "toggled tab frames");
        batch.emit_signal(self.root, kind);
        Ok(())
    }

    pub fn is_collapsed(&self, viewport: &Viewport) -> bool {
        viewport.tree().get(self.stack).is_some_and(|n| !n.is_visible())
    }

    /// Index of the selected tab.
    pub fn current_index(&self, viewport: &Viewport) -> Option<usize> {
        let tree = viewport.tree();
        tree.children(self.tab_row)
            .ok()?
            .iter()
            .position(|&b| tree.get(b).is_some_and(|n| n.is_selected()))
    }

    pub fn tab_count(&self, viewport: &Viewport) -> usize {
        viewport.tree().children(self.tab_row).map_or(0, <[NodeId]>::len)
    }

    pub fn button(&self, viewport: &Viewport, index: usize) -> TreeResult<NodeId> {
        viewport.tree().child_at(self.tab_row, index)
    }

    pub fn frame(&self, viewport: &Viewport, index: usize) -> TreeResult<NodeId> {
        viewport.tree().child_at(self.stack, index)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use gogi_core::{Point, Size};

    use super::*;

    fn setup() -> (Viewport, TabView, Vec<NodeId>) {
        let mut vp = Viewport::new(Size::new(300.0, 200.0));
        let root = vp.root();
        let tabs = TabView::new(&mut vp, root, "tabs").unwrap();
        let frames = ["one", "two", "three"]
            .into_iter()
            .map(|label| {
                let frame = tabs.add_tab(&mut vp, label).unwrap();
                let button = tabs.button(&vp, tabs.tab_count(&vp) - 1).unwrap();
                vp.set_content_size(button, Size::new(40.0, 20.0)).unwrap();
                frame
            })
            .collect();
        (vp, tabs, frames)
    }

    #[test]
    fn test_first_tab_is_selected() {
        let (vp, tabs, frames) = setup();
        assert_eq!(tabs.tab_count(&vp), 3);
        assert_eq!(tabs.current_index(&vp), Some(0));
        assert!(vp.is_shown(frames[0]));
        assert!(!vp.is_shown(frames[1]));
        assert_eq!(
            vp.geometry(frames[0]).unwrap().rect,
            vp.geometry(frames[2]).unwrap().rect
        );
    }

    #[test]
    fn test_select_emits_signals_in_order() {
        let (mut vp, tabs, frames) = setup();
        let log = Rc::new(RefCell::new(Vec::new()));
        let old = tabs.button(&vp, 0).unwrap();
        let new = tabs.button(&vp, 2).unwrap();
        for (sender, kind) in [
            (old, SignalKind::Unselected),
            (new, SignalKind::Selected),
            (tabs.root(), SignalKind::TabSelected),
        ] {
            let log = Rc::clone(&log);
            vp.connect(sender, kind, vp.root(), move |_, event| {
                log.borrow_mut()
                    .push((event.kind, event.payload_as::<usize>().copied()));
            });
        }

        tabs.select_tab(&mut vp, 2).unwrap();
        assert_eq!(
            *log.borrow(),
            vec![
                (SignalKind::Unselected, None),
                (SignalKind::Selected, None),
                (SignalKind::TabSelected, Some(2)),
            ]
        );
        assert!(vp.is_shown(frames[2]));
        assert!(!vp.is_shown(frames[0]));
        assert!(vp.tree().node(new).unwrap().is_selected());
        assert!(!vp.tree().node(old).unwrap().is_selected());

        // Reselecting is a no-op.
        tabs.select_tab(&mut vp, 2).unwrap();
        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn test_click_selects_tab() {
        let (mut vp, tabs, frames) = setup();
        let second = tabs.button(&vp, 1).unwrap();
        let rect = vp.geometry(second).unwrap().rect;
        // 40x20 of content inside 4px of padding.
        assert_eq!(rect, gogi_core::Rect::new(48.0, 0.0, 48.0, 28.0));

        let hit = vp.click_at(Point::new(rect.left() + 5.0, rect.top() + 5.0));
        assert_eq!(hit, Some(second));
        assert_eq!(tabs.current_index(&vp), Some(1));
        assert!(vp.is_shown(frames[1]));
    }

    #[test]
    fn test_tab_buttons_use_their_stylesheet() {
        let (vp, tabs, _) = setup();
        let button = tabs.button(&vp, 0).unwrap();
        let style = vp.style(button).unwrap();
        assert_eq!(style.padding, 4.0);
        assert_eq!(style.margin, 0.0);
        assert_eq!(style.paint.text_align, gogi_style::Align::Center);
        assert!(style.paint.background_color.is_some());
        assert_eq!(vp.preferred_size(button).unwrap(), Size::new(48.0, 28.0));
    }

    #[test]
    fn test_collapse_hides_frames() {
        let (mut vp, tabs, frames) = setup();
        let log = Rc::new(RefCell::new(Vec::new()));
        for kind in [SignalKind::TabCollapsed, SignalKind::TabOpened] {
            let log = Rc::clone(&log);
            vp.connect(tabs.root(), kind, vp.root(), move |_, event| {
                log.borrow_mut().push(event.kind);
            });
        }

        tabs.set_collapsed(&mut vp, true).unwrap();
        assert!(tabs.is_collapsed(&vp));
        assert!(frames.iter().all(|&f| !vp.is_shown(f)));
        assert!(vp.is_shown(tabs.button(&vp, 0).unwrap()));
        tabs.set_collapsed(&mut vp, true).unwrap();

        tabs.set_collapsed(&mut vp, false).unwrap();
        assert!(!tabs.is_collapsed(&vp));
        assert!(vp.is_shown(frames[0]));
        assert!(!vp.is_shown(frames[1]));
        assert_eq!(
            *log.borrow(),
            vec![SignalKind::TabCollapsed, SignalKind::TabOpened]
        );
    }

    #[test]
    fn test_select_out_of_range() {
        let (mut vp, tabs, _) = setup();
        let err = tabs.select_tab(&mut vp, 7).unwrap_err();
        assert_eq!(err, TreeError::IndexOutOfRange { index: 7, len: 3 });
    }
}
