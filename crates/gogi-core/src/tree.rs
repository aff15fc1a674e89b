//! The node tree.
//!
//! Nodes live in a [`Tree`] arena keyed by [`NodeId`]. A parent owns its
//! ordered children list; each child holds a non-owning parent handle. The
//! tree keeps both sides consistent: a node is in at most one child list, and
//! its parent handle always names the node whose list contains it.
//!
//! Attaching a node that already has a parent, or attaching an ancestor under
//! its own descendant, is a programming error and panics. There is no repair
//! pass for a corrupted tree.
//!
//! # Example
//!
//! ```
//! use gogi_core::tree::Tree;
//!
//! let mut tree = Tree::new();
//! let root = tree.create_node("Frame", "root");
//! let a = tree.add_new_child(root, "Label", "title").unwrap();
//! let b = tree.add_new_child(root, "Label", "title").unwrap();
//!
//! assert_eq!(tree.children(root).unwrap(), &[a, b]);
//! assert_eq!(tree.node(b).unwrap().unique_name(), "title_1");
//! assert_eq!(tree.child_by_name(root, "title").unwrap(), a);
//! ```

use std::collections::HashMap;

use slotmap::{SlotMap, new_key_type};

use crate::error::{TreeError, TreeResult};
use crate::property::{PropValue, PropertyBag, StyleKey};

const TARGET: &str = "gogi_core::tree";

new_key_type! {
    /// A stable handle to a node in a [`Tree`].
    ///
    /// Handles stay valid while the tree is restructured and become stale
    /// once the node is destroyed.
    pub struct NodeId;
}

impl NodeId {
    /// Convert the handle to a raw u64 value, e.g. for logging or interop.
    #[inline]
    pub fn as_raw(self) -> u64 {
        use slotmap::Key;
        self.data().as_ffi()
    }
}

/// Per-node transient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeFlags {
    /// Whether the node takes part in layout and paint.
    pub visible: bool,
    pub selected: bool,
    /// The node's own resolved style is out of date.
    pub needs_style: bool,
    /// The node's size requirements or geometry are out of date.
    pub needs_layout: bool,
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self {
            visible: true,
            selected: false,
            needs_style: true,
            needs_layout: true,
        }
    }
}

/// A node in the tree.
#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    unique_name: String,
    type_tag: &'static str,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    props: PropertyBag,
    flags: NodeFlags,
}

impl Node {
    /// The user-facing name. May be empty and need not be unique.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name, made unique among siblings when the node was attached.
    pub fn unique_name(&self) -> &str {
        &self.unique_name
    }

    /// The node type, e.g. `"Frame"` or `"Stretch"`.
    pub fn type_tag(&self) -> &'static str {
        self.type_tag
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn props(&self) -> &PropertyBag {
        &self.props
    }

    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    pub fn is_visible(&self) -> bool {
        self.flags.visible
    }

    pub fn is_selected(&self) -> bool {
        self.flags.selected
    }
}

/// Arena-backed node tree.
#[derive(Debug, Default)]
pub struct Tree {
    nodes: SlotMap<NodeId, Node>,
    type_counters: HashMap<&'static str, usize>,
    changed: bool,
}

impl Tree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached node. Unnamed nodes are given a unique name of the
    /// form `<type><n>`.
    pub fn create_node(&mut self, type_tag: &'static str, name: impl Into<String>) -> NodeId {
        let name = name.into();
        let unique_name = if name.is_empty() {
            let counter = self.type_counters.entry(type_tag).or_insert(0);
            let generated = format!("{type_tag}{counter}");
            *counter += 1;
            generated
        } else {
            name.clone()
        };
        let id = self.nodes.insert(Node {
            name,
            unique_name,
            type_tag,
            parent: None,
            children: Vec::new(),
            props: PropertyBag::new(),
            flags: NodeFlags::default(),
        });
        tracing::trace!(target: TARGET, ?id, type_tag, "created node");
        self.changed = true;
        id
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of live nodes, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node(&self, id: NodeId) -> TreeResult<&Node> {
        self.nodes.get(id).ok_or(TreeError::StaleNode)
    }

    fn node_mut(&mut self, id: NodeId) -> TreeResult<&mut Node> {
        self.nodes.get_mut(id).ok_or(TreeError::StaleNode)
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Append `child` to `parent`, deriving a unique name if its current one
    /// collides with a sibling.
    ///
    /// # Panics
    ///
    /// Panics if `child` already has a parent or is `parent` or one of its
    /// ancestors.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> TreeResult<()> {
        let len = self.node(parent)?.children.len();
        self.attach(parent, child, len, None)
    }

    /// Insert `child` at `index` in `parent`'s child list.
    ///
    /// # Panics
    ///
    /// Same conditions as [`add_child`](Self::add_child).
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) -> TreeResult<()> {
        let len = self.node(parent)?.children.len();
        if index > len {
            return Err(TreeError::IndexOutOfRange { index, len });
        }
        self.attach(parent, child, index, None)
    }

    /// Append `child` under an explicit unique name. Fails with
    /// [`TreeError::NameConflict`] if a sibling already uses it.
    pub fn add_child_with_unique_name(
        &mut self,
        parent: NodeId,
        child: NodeId,
        unique_name: &str,
    ) -> TreeResult<()> {
        let len = self.node(parent)?.children.len();
        self.attach(parent, child, len, Some(unique_name))
    }

    /// Create a node and append it to `parent`.
    pub fn add_new_child(
        &mut self,
        parent: NodeId,
        type_tag: &'static str,
        name: impl Into<String>,
    ) -> TreeResult<NodeId> {
        self.node(parent)?;
        let child = self.create_node(type_tag, name);
        self.add_child(parent, child)?;
        Ok(child)
    }

    fn attach(
        &mut self,
        parent: NodeId,
        child: NodeId,
        index: usize,
        forced_name: Option<&str>,
    ) -> TreeResult<()> {
        let child_node = self.node(child)?;
        assert!(
            child_node.parent.is_none(),
            "node {:?} ({}) already has a parent",
            child,
            child_node.unique_name
        );
        assert!(
            child != parent && !self.ancestors(parent)?.contains(&child),
            "attaching node {:?} under {:?} would create a cycle",
            child,
            parent
        );

        let unique_name = match forced_name {
            Some(name) => {
                if self.sibling_has_unique_name(parent, name)? {
                    return Err(TreeError::NameConflict(name.to_string()));
                }
                name.to_string()
            }
            None => self.derive_unique_name(parent, &child_node.unique_name)?,
        };

        let child_node = self.node_mut(child)?;
        child_node.unique_name = unique_name;
        child_node.parent = Some(parent);
        self.node_mut(parent)?.children.insert(index, child);

        tracing::trace!(target: TARGET, ?parent, ?child, index, "attached child");
        self.mark_subtree_needs_style(child);
        self.mark_needs_layout(parent);
        Ok(())
    }

    fn sibling_has_unique_name(&self, parent: NodeId, name: &str) -> TreeResult<bool> {
        Ok(self
            .node(parent)?
            .children
            .iter()
            .any(|&c| self.nodes.get(c).is_some_and(|n| n.unique_name == name)))
    }

    fn derive_unique_name(&self, parent: NodeId, base: &str) -> TreeResult<String> {
        if !self.sibling_has_unique_name(parent, base)? {
            return Ok(base.to_string());
        }
        let mut n = 1;
        loop {
            let candidate = format!("{base}_{n}");
            if !self.sibling_has_unique_name(parent, &candidate)? {
                return Ok(candidate);
            }
            n += 1;
        }
    }

    /// Detach `child` from `parent`. The subtree stays in the arena so it can
    /// be re-attached or [destroyed](Self::destroy). Returns the detached
    /// subtree in pre-order.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> TreeResult<Vec<NodeId>> {
        let index = self.child_index(parent, child)?;
        self.node_mut(parent)?.children.remove(index);
        self.node_mut(child)?.parent = None;
        tracing::trace!(target: TARGET, ?parent, ?child, "detached child");
        self.mark_needs_layout(parent);
        self.preorder(child)
    }

    /// Remove a node and all its descendants from the arena, detaching it
    /// from its parent first. Returns the removed ids in pre-order.
    #[tracing::instrument(skip(self), target = "gogi_core::tree", level = "trace")]
    pub fn destroy(&mut self, id: NodeId) -> TreeResult<Vec<NodeId>> {
        if let Some(parent) = self.node(id)?.parent {
            self.remove_child(parent, id)?;
        }
        let removed = self.preorder(id)?;
        tracing::trace!(target: TARGET, ?id, count = removed.len(), "destroying subtree");
        for &node in &removed {
            self.nodes.remove(node);
        }
        self.changed = true;
        Ok(removed)
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    pub fn parent(&self, id: NodeId) -> TreeResult<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    pub fn children(&self, id: NodeId) -> TreeResult<&[NodeId]> {
        Ok(&self.node(id)?.children)
    }

    pub fn child_at(&self, parent: NodeId, index: usize) -> TreeResult<NodeId> {
        let children = self.children(parent)?;
        children
            .get(index)
            .copied()
            .ok_or(TreeError::IndexOutOfRange {
                index,
                len: children.len(),
            })
    }

    /// First child whose name equals `name`.
    pub fn child_by_name(&self, parent: NodeId, name: &str) -> TreeResult<NodeId> {
        self.find_child(parent, name, |n| n.name.as_str())
    }

    pub fn child_by_unique_name(&self, parent: NodeId, name: &str) -> TreeResult<NodeId> {
        self.find_child(parent, name, |n| n.unique_name.as_str())
    }

    fn find_child(
        &self,
        parent: NodeId,
        name: &str,
        key: impl Fn(&Node) -> &str,
    ) -> TreeResult<NodeId> {
        self.children(parent)?
            .iter()
            .copied()
            .find(|&c| self.nodes.get(c).is_some_and(|n| key(n) == name))
            .ok_or_else(|| TreeError::NotFound(name.to_string()))
    }

    /// Position of `child` within `parent`'s children.
    pub fn child_index(&self, parent: NodeId, child: NodeId) -> TreeResult<usize> {
        self.children(parent)?
            .iter()
            .position(|&c| c == child)
            .ok_or_else(|| {
                let name = self
                    .nodes
                    .get(child)
                    .map(|n| n.unique_name.clone())
                    .unwrap_or_default();
                TreeError::NotFound(name)
            })
    }

    /// Ancestors from the immediate parent up to the root.
    pub fn ancestors(&self, id: NodeId) -> TreeResult<Vec<NodeId>> {
        let mut result = Vec::new();
        let mut current = self.node(id)?.parent;
        while let Some(current_id) = current {
            result.push(current_id);
            current = self.nodes.get(current_id).and_then(|n| n.parent);
        }
        Ok(result)
    }

    /// The topmost ancestor, or `id` itself when detached.
    pub fn root_of(&self, id: NodeId) -> TreeResult<NodeId> {
        Ok(self.ancestors(id)?.last().copied().unwrap_or(id))
    }

    /// Depth-first pre-order: the node, then each child subtree in order.
    pub fn preorder(&self, id: NodeId) -> TreeResult<Vec<NodeId>> {
        let mut result = Vec::new();
        self.preorder_into(id, &mut result)?;
        Ok(result)
    }

    fn preorder_into(&self, id: NodeId, result: &mut Vec<NodeId>) -> TreeResult<()> {
        let node = self.node(id)?;
        result.push(id);
        for &child in &node.children {
            self.preorder_into(child, result)?;
        }
        Ok(())
    }

    /// Depth-first post-order: children before parents.
    pub fn postorder(&self, id: NodeId) -> TreeResult<Vec<NodeId>> {
        let mut result = Vec::new();
        self.postorder_into(id, &mut result)?;
        Ok(result)
    }

    fn postorder_into(&self, id: NodeId, result: &mut Vec<NodeId>) -> TreeResult<()> {
        let node = self.node(id)?;
        for &child in &node.children {
            self.postorder_into(child, result)?;
        }
        result.push(id);
        Ok(())
    }

    // =========================================================================
    // Properties and flags
    // =========================================================================

    pub fn prop(&self, id: NodeId, key: StyleKey) -> Option<&PropValue> {
        self.nodes.get(id).and_then(|n| n.props.get(key))
    }

    /// Set a property. Layout-affecting keys also mark the node and its
    /// ancestors as needing layout.
    pub fn set_prop(&mut self, id: NodeId, key: StyleKey, value: impl Into<PropValue>) -> TreeResult<()> {
        let value = value.into();
        let node = self.node_mut(id)?;
        if node.props.get(key) == Some(&value) {
            return Ok(());
        }
        tracing::trace!(target: TARGET, ?id, %key, %value, "set property");
        node.props.set(key, value);
        node.flags.needs_style = true;
        if key.affects_layout() {
            self.mark_needs_layout(id);
        }
        self.changed = true;
        Ok(())
    }

    /// Set a property from string key and value. Unknown keys are ignored;
    /// the return value says whether the key was recognized.
    pub fn set_prop_str(&mut self, id: NodeId, key: &str, value: &str) -> TreeResult<bool> {
        self.node(id)?;
        match StyleKey::from_name(key) {
            Some(key) => {
                self.set_prop(id, key, PropValue::parse(value))?;
                Ok(true)
            }
            None => {
                tracing::debug!(target: TARGET, ?id, key, value, "ignoring unknown property key");
                Ok(false)
            }
        }
    }

    pub fn remove_prop(&mut self, id: NodeId, key: StyleKey) -> TreeResult<Option<PropValue>> {
        let node = self.node_mut(id)?;
        let old = node.props.remove(key);
        if old.is_some() {
            node.flags.needs_style = true;
            if key.affects_layout() {
                self.mark_needs_layout(id);
            }
            self.changed = true;
        }
        Ok(old)
    }

    /// Show or hide a node. Hidden nodes take no space and are not painted.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> TreeResult<()> {
        let node = self.node_mut(id)?;
        if node.flags.visible != visible {
            node.flags.visible = visible;
            self.mark_needs_layout(id);
        }
        Ok(())
    }

    pub fn set_selected(&mut self, id: NodeId, selected: bool) -> TreeResult<()> {
        let node = self.node_mut(id)?;
        if node.flags.selected != selected {
            node.flags.selected = selected;
            self.changed = true;
        }
        Ok(())
    }

    /// Mark a node and all of its ancestors as needing layout.
    pub fn mark_needs_layout(&mut self, id: NodeId) {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.nodes.get_mut(node_id) else {
                break;
            };
            node.flags.needs_layout = true;
            current = node.parent;
        }
        self.changed = true;
    }

    /// Mark a subtree as needing style, e.g. after it moved under a new
    /// parent with different inherited values.
    pub fn mark_subtree_needs_style(&mut self, id: NodeId) {
        let ids = self.preorder(id).unwrap_or_default();
        for node_id in ids {
            if let Some(node) = self.nodes.get_mut(node_id) {
                node.flags.needs_style = true;
                node.flags.needs_layout = true;
            }
        }
        self.changed = true;
    }

    /// Clear the style and layout dirty flags of a single node.
    pub fn clear_dirty(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.flags.needs_style = false;
            node.flags.needs_layout = false;
        }
    }

    /// Clear only the style flag, once the node's style has been resolved.
    pub fn clear_needs_style(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.flags.needs_style = false;
        }
    }

    /// Whether anything changed since the last call, resetting the marker.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    pub fn has_changes(&self) -> bool {
        self.changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with_root() -> (Tree, NodeId) {
        let mut tree = Tree::new();
        let root = tree.create_node("Frame", "root");
        (tree, root)
    }

    #[test]
    fn test_add_and_lookup() {
        let (mut tree, root) = tree_with_root();
        let a = tree.add_new_child(root, "Label", "a").unwrap();
        let b = tree.add_new_child(root, "Label", "b").unwrap();

        assert_eq!(tree.children(root).unwrap(), &[a, b]);
        assert_eq!(tree.parent(a).unwrap(), Some(root));
        assert_eq!(tree.child_at(root, 1).unwrap(), b);
        assert_eq!(tree.child_by_name(root, "b").unwrap(), b);
        assert_eq!(tree.child_index(root, b).unwrap(), 1);
    }

    #[test]
    fn test_lookup_errors() {
        let (mut tree, root) = tree_with_root();
        tree.add_new_child(root, "Label", "a").unwrap();

        assert_eq!(
            tree.child_at(root, 3),
            Err(TreeError::IndexOutOfRange { index: 3, len: 1 })
        );
        assert_eq!(
            tree.child_by_name(root, "missing"),
            Err(TreeError::NotFound("missing".into()))
        );
    }

    #[test]
    fn test_unique_names() {
        let (mut tree, root) = tree_with_root();
        let a = tree.add_new_child(root, "Label", "item").unwrap();
        let b = tree.add_new_child(root, "Label", "item").unwrap();
        let c = tree.add_new_child(root, "Label", "item").unwrap();
        let unnamed0 = tree.add_new_child(root, "Space", "").unwrap();
        let unnamed1 = tree.add_new_child(root, "Space", "").unwrap();

        assert_eq!(tree.node(a).unwrap().unique_name(), "item");
        assert_eq!(tree.node(b).unwrap().unique_name(), "item_1");
        assert_eq!(tree.node(c).unwrap().unique_name(), "item_2");
        assert_eq!(tree.node(unnamed0).unwrap().unique_name(), "Space0");
        assert_eq!(tree.node(unnamed1).unwrap().unique_name(), "Space1");
        assert_eq!(tree.child_by_unique_name(root, "item_1").unwrap(), b);
    }

    #[test]
    fn test_forced_name_conflict() {
        let (mut tree, root) = tree_with_root();
        tree.add_new_child(root, "Label", "taken").unwrap();
        let other = tree.create_node("Label", "other");

        assert_eq!(
            tree.add_child_with_unique_name(root, other, "taken"),
            Err(TreeError::NameConflict("taken".into()))
        );
        assert_eq!(tree.parent(other).unwrap(), None);
        tree.add_child_with_unique_name(root, other, "fresh").unwrap();
        assert_eq!(tree.node(other).unwrap().unique_name(), "fresh");
    }

    #[test]
    fn test_insert_child() {
        let (mut tree, root) = tree_with_root();
        let a = tree.add_new_child(root, "Label", "a").unwrap();
        let b = tree.create_node("Label", "b");
        tree.insert_child(root, 0, b).unwrap();
        assert_eq!(tree.children(root).unwrap(), &[b, a]);

        let c = tree.create_node("Label", "c");
        assert_eq!(
            tree.insert_child(root, 5, c),
            Err(TreeError::IndexOutOfRange { index: 5, len: 2 })
        );
    }

    #[test]
    #[should_panic(expected = "already has a parent")]
    fn test_double_parenting_panics() {
        let (mut tree, root) = tree_with_root();
        let other = tree.create_node("Frame", "other");
        let child = tree.add_new_child(root, "Label", "child").unwrap();
        let _ = tree.add_child(other, child);
    }

    #[test]
    #[should_panic(expected = "cycle")]
    fn test_cycle_panics() {
        let (mut tree, root) = tree_with_root();
        let child = tree.add_new_child(root, "Frame", "child").unwrap();
        let grandchild = tree.add_new_child(child, "Frame", "grandchild").unwrap();
        tree.remove_child(root, child).unwrap();
        let _ = tree.add_child(grandchild, child);
    }

    #[test]
    fn test_remove_and_destroy() {
        let (mut tree, root) = tree_with_root();
        let a = tree.add_new_child(root, "Frame", "a").unwrap();
        let a1 = tree.add_new_child(a, "Label", "a1").unwrap();
        let b = tree.add_new_child(root, "Label", "b").unwrap();

        let detached = tree.remove_child(root, a).unwrap();
        assert_eq!(detached, vec![a, a1]);
        assert_eq!(tree.children(root).unwrap(), &[b]);
        assert_eq!(tree.parent(a).unwrap(), None);
        assert!(tree.contains(a1));

        let removed = tree.destroy(a).unwrap();
        assert_eq!(removed, vec![a, a1]);
        assert!(!tree.contains(a1));
        assert_eq!(tree.node(a1).err(), Some(TreeError::StaleNode));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_traversals() {
        let (mut tree, root) = tree_with_root();
        let a = tree.add_new_child(root, "Frame", "a").unwrap();
        let a1 = tree.add_new_child(a, "Label", "a1").unwrap();
        let b = tree.add_new_child(root, "Label", "b").unwrap();

        assert_eq!(tree.preorder(root).unwrap(), vec![root, a, a1, b]);
        assert_eq!(tree.postorder(root).unwrap(), vec![a1, a, b, root]);
        assert_eq!(tree.ancestors(a1).unwrap(), vec![a, root]);
        assert_eq!(tree.root_of(a1).unwrap(), root);
    }

    #[test]
    fn test_set_prop_marks_ancestors() {
        let (mut tree, root) = tree_with_root();
        let a = tree.add_new_child(root, "Frame", "a").unwrap();
        let a1 = tree.add_new_child(a, "Label", "a1").unwrap();
        for id in [root, a, a1] {
            tree.clear_dirty(id);
        }
        tree.take_changed();

        tree.set_prop(a1, StyleKey::Width, 10.0).unwrap();
        assert!(tree.node(a1).unwrap().flags().needs_style);
        assert!(tree.node(a).unwrap().flags().needs_layout);
        assert!(tree.node(root).unwrap().flags().needs_layout);
        assert!(tree.take_changed());

        // Paint-only keys leave layout alone.
        for id in [root, a, a1] {
            tree.clear_dirty(id);
        }
        tree.set_prop(a1, StyleKey::Color, crate::types::Color::RED).unwrap();
        assert!(tree.node(a1).unwrap().flags().needs_style);
        assert!(!tree.node(root).unwrap().flags().needs_layout);
    }

    #[test]
    fn test_set_prop_str_ignores_unknown() {
        let (mut tree, root) = tree_with_root();
        assert!(tree.set_prop_str(root, "width", "12em").unwrap());
        assert!(!tree.set_prop_str(root, "box-shadow", "none").unwrap());
        assert_eq!(tree.node(root).unwrap().props().len(), 1);
    }

    #[test]
    fn test_setting_same_value_is_not_a_change() {
        let (mut tree, root) = tree_with_root();
        tree.set_prop(root, StyleKey::Margin, 4.0).unwrap();
        tree.clear_dirty(root);
        tree.take_changed();

        tree.set_prop(root, StyleKey::Margin, 4.0).unwrap();
        assert!(!tree.take_changed());
        assert!(!tree.node(root).unwrap().flags().needs_layout);
    }
}
