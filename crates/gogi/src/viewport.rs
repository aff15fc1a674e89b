//! The viewport owns the node tree and drives the flush pipeline.
//!
//! Every mutating method runs inside its own update scope, so a single call
//! outside any batch is flushed immediately, while calls made through an
//! [`UpdateGuard`] collapse into one flush when the outermost guard drops.
//!
//! A flush runs, in order:
//!
//! 1. **Style**: re-resolve dirty nodes top-down. A node whose inherited
//!    values changed forces its descendants to re-resolve.
//! 2. **Size**: re-negotiate dirty nodes bottom-up.
//! 3. **Layout**: place children top-down from the root, descending only
//!    into nodes that are dirty or whose rect or visibility changed.
//!    Percent sizes are finalized here against the parent's content size.
//! 4. **Paint**: hand the visible nodes to the [`Painter`].
//! 5. **Signals**: deliver queued signals in emission order, then emit
//!    [`SignalKind::Updated`] from the root with the [`UpdateReport`].
//!
//! Slots may mutate the viewport; such changes are picked up by another
//! round of the same flush.

use std::fmt;
use std::path::Path;
use std::rc::Rc;

use gogi_core::{
    NodeId, Point, PropValue, Rect, SignalBus, SignalEvent, SignalKind, Size, StyleKey, Tree,
    TreeDebug, TreeError, TreeFormatOptions, TreeResult,
};
use gogi_style::{LayoutMode, ResolvedStyle, StyleDefaults, StyleResolver};
use slotmap::SecondaryMap;

use crate::error::Result;
use crate::geometry::{Geometry, SizeReq};
use crate::layout::{self, LayoutItem};
use crate::negotiate::{self, Intrinsic};
use crate::paint::{PaintItem, Painter};
use crate::update::{UpdateGuard, UpdateReport, UpdateState, UpdateStats, UpdateTracker};

const TARGET: &str = "gogi::viewport";
const UPDATE_TARGET: &str = "gogi::update";
const LAYOUT_TARGET: &str = "gogi::layout";

/// Type tag of the root node.
pub const ROOT_TYPE: &str = "Frame";

/// Rounds a single flush may run before giving up on slots that keep
/// mutating the tree.
const MAX_FLUSH_ROUNDS: usize = 16;

/// Owner of the root node, the caches derived from the tree and the signal
/// bus.
pub struct Viewport {
    tree: Tree,
    root: NodeId,
    size: Size,
    defaults: Rc<StyleDefaults>,
    bus: SignalBus<Viewport>,
    painter: Option<Box<dyn Painter>>,

    styles: SecondaryMap<NodeId, ResolvedStyle>,
    intrinsic: SecondaryMap<NodeId, Intrinsic>,
    reqs: SecondaryMap<NodeId, SizeReq>,
    content: SecondaryMap<NodeId, Size>,
    geometry: SecondaryMap<NodeId, Geometry>,

    updates: UpdateTracker,
    needs_paint: bool,
    paint_list: Vec<PaintItem>,
    stats: UpdateStats,
    last_report: UpdateReport,
}

impl fmt::Debug for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Viewport")
            .field("root", &self.root)
            .field("size", &self.size)
            .field("nodes", &self.tree.len())
            .field("state", &self.updates.state())
            .field("pending_signals", &self.bus.pending())
            .field("has_painter", &self.painter.is_some())
            .finish()
    }
}

impl Viewport {
    /// Create a viewport with the built-in style defaults.
    pub fn new(size: Size) -> Self {
        Self::with_defaults(size, Rc::new(StyleDefaults::default()))
    }

    /// Create a viewport sharing the given defaults.
    pub fn with_defaults(size: Size, defaults: Rc<StyleDefaults>) -> Self {
        let mut tree = Tree::new();
        let root = tree.create_node(ROOT_TYPE, "root");
        let mut viewport = Self {
            tree,
            root,
            size,
            defaults,
            bus: SignalBus::new(),
            painter: None,
            styles: SecondaryMap::new(),
            intrinsic: SecondaryMap::new(),
            reqs: SecondaryMap::new(),
            content: SecondaryMap::new(),
            geometry: SecondaryMap::new(),
            updates: UpdateTracker::default(),
            needs_paint: false,
            paint_list: Vec::new(),
            stats: UpdateStats::default(),
            last_report: UpdateReport::default(),
        };
        viewport.update();
        tracing::debug!(target: TARGET, width = size.width, height = size.height, "created viewport");
        viewport
    }

    /// Create a viewport with defaults loaded from a TOML file.
    pub fn from_config(path: impl AsRef<Path>, size: Size) -> Result<Self> {
        let defaults = StyleDefaults::load(path)?;
        Ok(Self::with_defaults(size, Rc::new(defaults)))
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn defaults(&self) -> &StyleDefaults {
        &self.defaults
    }

    /// Install the painter that receives each new frame.
    pub fn set_painter(&mut self, painter: impl Painter + 'static) {
        self.painter = Some(Box::new(painter));
        self.needs_paint = true;
    }

    // =========================================================================
    // Update scopes
    // =========================================================================

    /// Open an update scope. The scope ends when the guard is dropped.
    pub fn begin_update(&mut self) -> UpdateGuard<'_> {
        UpdateGuard::new(self)
    }

    /// Flush any pending changes now.
    pub fn update(&mut self) {
        self.begin_update().end();
    }

    pub fn update_state(&self) -> UpdateState {
        self.updates.state()
    }

    pub fn stats(&self) -> UpdateStats {
        self.stats
    }

    /// What the most recent flush did.
    pub fn last_report(&self) -> &UpdateReport {
        &self.last_report
    }

    pub(crate) fn updates_mut(&mut self) -> &mut UpdateTracker {
        &mut self.updates
    }

    pub(crate) fn end_update(&mut self, signal: bool) {
        if self.updates.end() {
            self.flush(signal);
        }
    }

    fn scoped<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let mut guard = self.begin_update();
        f(&mut *guard)
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Create a detached node; attach it with [`attach`](Self::attach).
    pub fn create_node(&mut self, type_tag: &'static str, name: impl Into<String>) -> NodeId {
        self.tree.create_node(type_tag, name)
    }

    /// Create a node and append it to `parent`.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        type_tag: &'static str,
        name: impl Into<String>,
    ) -> TreeResult<NodeId> {
        self.scoped(|vp| vp.tree.add_new_child(parent, type_tag, name))
    }

    /// Create a node and append it under an explicit unique name, failing
    /// with [`TreeError::NameConflict`] if a sibling already has it.
    pub fn add_child_with_unique_name(
        &mut self,
        parent: NodeId,
        type_tag: &'static str,
        unique_name: &str,
    ) -> TreeResult<NodeId> {
        self.scoped(|vp| {
            vp.tree.node(parent)?;
            let child = vp.tree.create_node(type_tag, unique_name);
            if let Err(err) = vp.tree.add_child_with_unique_name(parent, child, unique_name) {
                vp.tree.destroy(child)?;
                return Err(err);
            }
            Ok(child)
        })
    }

    /// Append a detached node to `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `child` already has a parent or is an ancestor of `parent`.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> TreeResult<()> {
        self.scoped(|vp| vp.tree.add_child(parent, child))
    }

    /// Insert a detached node at `index` among `parent`'s children.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) -> TreeResult<()> {
        self.scoped(|vp| vp.tree.insert_child(parent, index, child))
    }

    /// Remove `child` and its whole subtree, dropping every cached style,
    /// size and geometry and every signal connection they had.
    ///
    /// A stacked parent keeps showing the same child if it is still there,
    /// and its last child otherwise.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> TreeResult<()> {
        self.scoped(|vp| {
            let index = vp.tree.child_index(parent, child)?;
            let removed = vp.tree.destroy(child)?;
            tracing::debug!(target: TARGET, ?parent, ?child, count = removed.len(), "removed subtree");
            for id in removed {
                vp.forget(id);
            }
            vp.restack_after_removal(parent, index)
        })
    }

    fn restack_after_removal(&mut self, parent: NodeId, removed: usize) -> TreeResult<()> {
        let top = self
            .tree
            .prop(parent, StyleKey::StackTop)
            .and_then(PropValue::as_number)
            .map(|n| n.max(0.0) as usize)
            .or_else(|| self.styles.get(parent).map(|s| s.stack_top));
        let Some(top) = top else {
            return Ok(());
        };
        let len = self.tree.children(parent)?.len();
        let new_top = if removed < top {
            top - 1
        } else {
            top.min(len.saturating_sub(1))
        };
        if new_top != top {
            tracing::trace!(target: TARGET, ?parent, top, new_top, "moved stack top");
            self.tree.set_prop(parent, StyleKey::StackTop, new_top as f32)?;
        }
        Ok(())
    }

    fn forget(&mut self, id: NodeId) {
        self.styles.remove(id);
        self.intrinsic.remove(id);
        self.reqs.remove(id);
        self.content.remove(id);
        self.geometry.remove(id);
        self.bus.disconnect_node(id);
    }

    // =========================================================================
    // Properties and state
    // =========================================================================

    pub fn set_prop(&mut self, id: NodeId, key: StyleKey, value: impl Into<PropValue>) -> TreeResult<()> {
        let value = value.into();
        self.scoped(|vp| vp.tree.set_prop(id, key, value))
    }

    /// Set a property from strings. Returns `false` for unknown keys, which
    /// are ignored.
    pub fn set_prop_str(&mut self, id: NodeId, key: &str, value: &str) -> TreeResult<bool> {
        self.scoped(|vp| vp.tree.set_prop_str(id, key, value))
    }

    pub fn remove_prop(&mut self, id: NodeId, key: StyleKey) -> TreeResult<Option<PropValue>> {
        self.scoped(|vp| vp.tree.remove_prop(id, key))
    }

    /// Show or hide a node. Hidden nodes take no space.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> TreeResult<()> {
        self.scoped(|vp| vp.tree.set_visible(id, visible))
    }

    pub fn set_selected(&mut self, id: NodeId, selected: bool) -> TreeResult<()> {
        self.scoped(|vp| vp.tree.set_selected(id, selected))
    }

    /// Set the intrinsic content size of a node, such as measured text or an
    /// image's natural size.
    ///
    /// A size with an infinite or NaN component is ignored.
    pub fn set_content_size(&mut self, id: NodeId, size: Size) -> TreeResult<()> {
        self.scoped(|vp| {
            vp.tree.node(id)?;
            if !(size.width.is_finite() && size.height.is_finite()) {
                tracing::debug!(target: TARGET, ?id, ?size, "ignoring non-finite content size");
                return Ok(());
            }
            if vp.content.get(id) != Some(&size) {
                vp.content.insert(id, size);
                vp.tree.mark_needs_layout(id);
            }
            Ok(())
        })
    }

    /// Force a node and its ancestors to be laid out again.
    pub fn invalidate(&mut self, id: NodeId) -> TreeResult<()> {
        self.scoped(|vp| {
            vp.tree.node(id)?;
            vp.tree.mark_needs_layout(id);
            Ok(())
        })
    }

    /// Choose which child of a stacked container is shown.
    pub fn set_stack_top(&mut self, stack: NodeId, index: usize) -> TreeResult<()> {
        let len = self.tree.children(stack)?.len();
        if index >= len {
            return Err(TreeError::IndexOutOfRange { index, len });
        }
        self.set_prop(stack, StyleKey::StackTop, index as f32)
    }

    /// The shown child index of a stacked container.
    pub fn stack_top(&self, stack: NodeId) -> Option<usize> {
        self.styles.get(stack).map(|s| s.stack_top)
    }

    // =========================================================================
    // Derived state
    // =========================================================================

    pub fn style(&self, id: NodeId) -> Option<&ResolvedStyle> {
        self.styles.get(id)
    }

    pub fn size_req(&self, id: NodeId) -> Option<SizeReq> {
        self.reqs.get(id).copied()
    }

    pub fn geometry(&self, id: NodeId) -> Option<Geometry> {
        self.geometry.get(id).copied()
    }

    pub fn preferred_size(&self, id: NodeId) -> Option<Size> {
        self.reqs.get(id).map(SizeReq::preferred_size)
    }

    pub fn min_size(&self, id: NodeId) -> Option<Size> {
        self.reqs.get(id).map(SizeReq::min_size)
    }

    /// Max size with -1 meaning stretch and 0 meaning unconstrained.
    pub fn max_size(&self, id: NodeId) -> Option<Size> {
        self.reqs.get(id).map(SizeReq::max_size)
    }

    /// Whether the node was shown by the last layout.
    pub fn is_shown(&self, id: NodeId) -> bool {
        self.geometry.get(id).is_some_and(|g| g.visible)
    }

    // =========================================================================
    // Signals
    // =========================================================================

    /// Connect `receiver` to `sender`'s `kind` signal, replacing any earlier
    /// connection between them. Returns `true` if one was replaced.
    pub fn connect<F>(&mut self, sender: NodeId, kind: SignalKind, receiver: NodeId, slot: F) -> bool
    where
        F: Fn(&mut Viewport, &SignalEvent) + 'static,
    {
        self.bus.connect(sender, kind, receiver, slot)
    }

    pub fn disconnect(&mut self, sender: NodeId, kind: SignalKind, receiver: NodeId) -> bool {
        self.bus.disconnect(sender, kind, receiver)
    }

    pub fn connection_count(&self, sender: NodeId, kind: SignalKind) -> usize {
        self.bus.connection_count(sender, kind)
    }

    /// Emit a signal. Inside an update scope or a flush the event is queued
    /// and delivered after layout; otherwise it is delivered right away,
    /// after any signals still queued.
    pub fn emit(&mut self, event: SignalEvent) {
        if self.updates.is_active() {
            tracing::trace!(target: TARGET, sender = ?event.sender, kind = ?event.kind, "queued signal");
            self.bus.enqueue(event);
            return;
        }
        if self.bus.pending() > 0 {
            // Older signals held back by a silent flush go first.
            self.bus.enqueue(event);
            self.update();
            return;
        }
        self.scoped(|vp| {
            vp.dispatch(&event);
        });
    }

    /// Emit a signal without payload.
    pub fn emit_signal(&mut self, sender: NodeId, kind: SignalKind) {
        self.emit(SignalEvent::new(kind, sender));
    }

    /// Signals waiting for the next signalling flush.
    pub fn pending_signals(&self) -> usize {
        self.bus.pending()
    }

    fn dispatch(&mut self, event: &SignalEvent) -> usize {
        let slots = self.bus.slots_for(event);
        for slot in &slots {
            slot(self, event);
        }
        self.stats.signals_dispatched += slots.len();
        slots.len()
    }

    // =========================================================================
    // Window-facing
    // =========================================================================

    /// Change the viewport size. Everything is restyled, since viewport
    /// units depend on it.
    pub fn resize(&mut self, size: Size) {
        if self.size == size {
            return;
        }
        self.scoped(|vp| {
            tracing::debug!(target: TARGET, width = size.width, height = size.height, "resized");
            vp.size = size;
            let root = vp.root;
            vp.tree.mark_subtree_needs_style(root);
            vp.tree.mark_needs_layout(root);
        });
    }

    /// The topmost shown node containing `point`: the last one in paint
    /// order.
    pub fn node_at(&self, point: Point) -> Option<NodeId> {
        self.tree
            .preorder(self.root)
            .ok()?
            .into_iter()
            .rev()
            .find(|&id| {
                self.geometry
                    .get(id)
                    .is_some_and(|g| g.visible && g.rect.contains(point))
            })
    }

    /// Hit-test `point` and emit [`SignalKind::Clicked`] from the node found.
    pub fn click_at(&mut self, point: Point) -> Option<NodeId> {
        let id = self.node_at(point)?;
        tracing::debug!(target: TARGET, ?id, x = point.x, y = point.y, "click");
        self.emit_signal(id, SignalKind::Clicked);
        Some(id)
    }

    /// The last frame handed to the painter.
    pub fn paint_list(&self) -> &[PaintItem] {
        &self.paint_list
    }

    /// Render the tree for debugging.
    pub fn dump_tree(&self) -> String {
        self.dump_tree_with(TreeFormatOptions::default())
    }

    pub fn dump_tree_with(&self, options: TreeFormatOptions) -> String {
        TreeDebug::with_options(options)
            .format_subtree(&self.tree, self.root)
            .unwrap_or_default()
    }

    // =========================================================================
    // Flush pipeline
    // =========================================================================

    #[tracing::instrument(skip(self), target = "gogi::update", level = "debug")]
    fn flush(&mut self, signal: bool) {
        self.updates.start_flush();
        let mut report = UpdateReport::default();

        loop {
            if report.rounds == MAX_FLUSH_ROUNDS {
                tracing::warn!(
                    target: UPDATE_TARGET,
                    rounds = report.rounds,
                    pending = self.bus.pending(),
                    "flush did not settle; leaving remaining changes for the next update"
                );
                break;
            }
            report.rounds += 1;

            let changed = self.tree.take_changed();
            if changed {
                self.run_passes(&mut report);
                // The passes mark nodes themselves.
                self.tree.take_changed();
            }

            if !signal {
                self.needs_paint |= changed;
                break;
            }
            if changed || self.needs_paint {
                self.paint();
                report.painted = true;
            }
            while let Some(event) = self.bus.pop_queued() {
                self.dispatch(&event);
            }
            if changed {
                let event = SignalEvent::new(SignalKind::Updated, self.root).with_payload(report.clone());
                self.dispatch(&event);
            }
            if !self.tree.has_changes() && self.bus.pending() == 0 {
                break;
            }
        }

        self.stats.flushes += 1;
        if !signal {
            self.stats.silent_flushes += 1;
        }
        self.stats.restyled += report.restyled.len();
        self.stats.measured += report.measured.len();
        self.stats.laid_out += report.laid_out.len();
        tracing::debug!(
            target: UPDATE_TARGET,
            rounds = report.rounds,
            restyled = report.restyled.len(),
            measured = report.measured.len(),
            laid_out = report.laid_out.len(),
            painted = report.painted,
            "flush complete"
        );
        self.last_report = report;
        self.updates.finish_flush();
    }

    fn run_passes(&mut self, report: &mut UpdateReport) {
        self.style_pass(report);
        self.size_pass(report);
        self.layout_pass(report);
    }

    fn style_pass(&mut self, report: &mut UpdateReport) {
        let defaults = Rc::clone(&self.defaults);
        let resolver = StyleResolver::new(&defaults, self.size);

        let mut stack = vec![(self.root, false)];
        while let Some((id, forced)) = stack.pop() {
            let Some(node) = self.tree.get(id) else {
                continue;
            };
            let children = node.children().to_vec();
            let mut force_children = false;

            if forced || node.flags().needs_style || !self.styles.contains_key(id) {
                let parent_style = node.parent().and_then(|p| self.styles.get(p));
                let style = resolver.resolve(node.type_tag(), node.props(), parent_style);
                let old = self.styles.get(id);
                if old != Some(&style) {
                    force_children = old.is_none_or(|old| old.paint != style.paint);
                    if old.is_none_or(|old| !same_layout(old, &style)) {
                        self.tree.mark_needs_layout(id);
                    }
                    self.styles.insert(id, style);
                }
                self.tree.clear_needs_style(id);
                report.restyled.push(id);
            }

            stack.extend(children.into_iter().rev().map(|c| (c, force_children)));
        }
    }

    fn size_pass(&mut self, report: &mut UpdateReport) {
        let order = self.tree.postorder(self.root).unwrap_or_default();
        for id in order {
            let Some(node) = self.tree.get(id) else {
                continue;
            };
            if !node.flags().needs_layout && self.reqs.contains_key(id) {
                continue;
            }
            let Some(style) = self.styles.get(id) else {
                continue;
            };

            let items: Vec<LayoutItem> = self
                .layout_items(id, None)
                .into_iter()
                .map(|(_, item)| item)
                .collect();
            let mut intrinsic = negotiate::aggregate(style, &items);
            if let Some(content) = self.content.get(id) {
                intrinsic.pref = intrinsic.pref.max(*content);
            }
            let intrinsic = intrinsic.padded(style.padding);
            let req = negotiate::size_req(style, intrinsic);
            tracing::trace!(target: LAYOUT_TARGET, ?id, pref = ?req.preferred_size(), "negotiated size");

            self.intrinsic.insert(id, intrinsic);
            self.reqs.insert(id, req);
            report.measured.push(id);
        }
    }

    /// Visible children of `parent` with their requirements. With
    /// `parent_content`, percent sizes are finalized against it.
    fn layout_items(&self, parent: NodeId, parent_content: Option<Size>) -> Vec<(NodeId, LayoutItem)> {
        let Ok(children) = self.tree.children(parent) else {
            return Vec::new();
        };
        children
            .iter()
            .copied()
            .filter(|&c| self.tree.get(c).is_some_and(|n| n.is_visible()))
            .filter_map(|c| {
                let style = self.styles.get(c)?;
                let req = match parent_content {
                    Some(size) if style.has_percent() => negotiate::size_req(
                        &style.finalize(size),
                        self.intrinsic.get(c).copied().unwrap_or_default(),
                    ),
                    _ => *self.reqs.get(c)?,
                };
                Some((c, LayoutItem::new(req, style.margin)))
            })
            .collect()
    }

    fn layout_pass(&mut self, report: &mut UpdateReport) {
        let margin = self.styles.get(self.root).map_or(0.0, |s| s.margin);
        let root_rect = Rect::from_size(self.size).deflate(margin);

        let mut stack = vec![(self.root, root_rect, true)];
        while let Some((id, rect, shown)) = stack.pop() {
            let Some(node) = self.tree.get(id) else {
                continue;
            };
            let moved = self
                .geometry
                .get(id)
                .is_none_or(|g| g.rect != rect || g.visible != shown);
            if !node.flags().needs_layout && !moved {
                continue;
            }
            let children = node.children().to_vec();
            let Some(style) = self.styles.get(id) else {
                continue;
            };
            let stack_top = (style.layout_mode == LayoutMode::Stacked).then_some(style.stack_top);

            let content = rect.deflate(style.padding);
            let items = self.layout_items(id, Some(content.size));
            let layout_items: Vec<LayoutItem> = items.iter().map(|(_, item)| *item).collect();
            let arrangement = layout::arrange(style, content, &layout_items);

            let overflow = shown && arrangement.overflow;
            if overflow {
                tracing::debug!(target: LAYOUT_TARGET, ?id, "children overflow at their minimum size");
                report.overflowed.push(id);
            }
            self.geometry.insert(id, Geometry { rect, visible: shown, overflow });
            self.tree.clear_dirty(id);
            report.laid_out.push(id);

            let mut placed = items
                .iter()
                .map(|(c, _)| *c)
                .zip(arrangement.rects)
                .peekable();
            for (index, child) in children.into_iter().enumerate() {
                match placed.next_if(|(c, _)| *c == child) {
                    Some((_, child_rect)) => {
                        let on_top = stack_top.is_none_or(|top| top == index);
                        stack.push((child, child_rect, shown && on_top));
                    }
                    None => {
                        let collapsed = Rect::new(rect.left(), rect.top(), 0.0, 0.0);
                        stack.push((child, collapsed, false));
                    }
                }
            }
        }
    }

    fn paint(&mut self) {
        let order = self.tree.preorder(self.root).unwrap_or_default();
        let mut items = Vec::with_capacity(order.len());
        for id in order {
            let (Some(node), Some(geometry), Some(style)) =
                (self.tree.get(id), self.geometry.get(id), self.styles.get(id))
            else {
                continue;
            };
            if !geometry.visible {
                continue;
            }
            items.push(PaintItem {
                node: id,
                type_tag: node.type_tag(),
                rect: geometry.rect,
                style: style.paint.clone(),
                selected: node.is_selected(),
            });
        }
        self.paint_list = items;
        if let Some(painter) = self.painter.as_mut() {
            painter.paint(&self.paint_list);
        }
        self.needs_paint = false;
        self.stats.paints += 1;
        tracing::trace!(target: TARGET, items = self.paint_list.len(), "painted");
    }
}

/// Whether two styles differ only in paint attributes.
fn same_layout(a: &ResolvedStyle, b: &ResolvedStyle) -> bool {
    let a = ResolvedStyle {
        paint: b.paint.clone(),
        ..a.clone()
    };
    a == *b
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use gogi_core::Color;

    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(Size::new(200.0, 100.0))
    }

    #[test]
    fn test_root_fills_viewport() {
        let vp = viewport();
        let geometry = vp.geometry(vp.root()).unwrap();
        assert_eq!(geometry.rect, Rect::new(0.0, 0.0, 200.0, 100.0));
        assert!(geometry.visible);
        assert_eq!(vp.update_state(), UpdateState::Idle);
    }

    #[test]
    fn test_single_mutation_flushes_immediately() {
        let mut vp = viewport();
        let root = vp.root();
        let before = vp.stats().flushes;
        let child = vp.add_child(root, "Label", "l").unwrap();
        assert_eq!(vp.stats().flushes, before + 1);
        assert!(vp.geometry(child).is_some());
    }

    #[test]
    fn test_paint_only_change_skips_layout() {
        let mut vp = viewport();
        let root = vp.root();
        let child = vp.add_child(root, "Label", "l").unwrap();
        vp.set_prop(child, StyleKey::Color, Color::RED).unwrap();
        let report = vp.last_report();
        assert_eq!(report.restyled, vec![child]);
        assert!(report.laid_out.is_empty());
        assert!(report.painted);
        assert_eq!(vp.style(child).unwrap().paint.color, Color::RED);
    }

    #[test]
    fn test_inherited_change_restyles_descendants() {
        let mut vp = viewport();
        let root = vp.root();
        let frame = vp.add_child(root, "Frame", "f").unwrap();
        let label = vp.add_child(frame, "Label", "l").unwrap();
        vp.set_prop(frame, StyleKey::Color, Color::BLUE).unwrap();
        assert_eq!(vp.style(label).unwrap().paint.color, Color::BLUE);
        assert_eq!(vp.last_report().restyled, vec![frame, label]);
    }

    #[test]
    fn test_emit_outside_scope_is_immediate() {
        let mut vp = viewport();
        let root = vp.root();
        let seen = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&seen);
        vp.connect(root, SignalKind::Clicked, root, move |_, _| *counter.borrow_mut() += 1);
        vp.emit_signal(root, SignalKind::Clicked);
        assert_eq!(*seen.borrow(), 1);

        {
            let mut batch = vp.begin_update();
            batch.emit_signal(root, SignalKind::Clicked);
            assert_eq!(*seen.borrow(), 1);
            assert_eq!(batch.pending_signals(), 1);
        }
        assert_eq!(*seen.borrow(), 2);
    }

    #[test]
    fn test_same_layout_ignores_paint() {
        let a = ResolvedStyle::default();
        let mut b = a.clone();
        b.paint.color = Color::RED;
        assert!(same_layout(&a, &b));
        b.margin = 3.0;
        assert!(!same_layout(&a, &b));
    }
}
