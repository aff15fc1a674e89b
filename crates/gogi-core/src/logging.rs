//! Logging targets and tree debug output.
//!
//! GoGi logs through the `tracing` crate. Nothing is printed unless the
//! application installs a subscriber:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("gogi::layout=debug,gogi_core=trace")
//!     .init();
//! ```
//!
//! [`TreeDebug`] renders a subtree for inspection:
//!
//! ```
//! use gogi_core::logging::{TreeDebug, TreeFormatOptions, TreeStyle};
//! use gogi_core::tree::Tree;
//!
//! let mut tree = Tree::new();
//! let root = tree.create_node("Frame", "root");
//! tree.add_new_child(root, "Label", "title").unwrap();
//!
//! let options = TreeFormatOptions { style: TreeStyle::Ascii, ..TreeFormatOptions::minimal() };
//! let text = TreeDebug::with_options(options).format_subtree(&tree, root).unwrap();
//! assert_eq!(text, "root\n+-- title\n");
//! ```

use std::fmt::Write;

use crate::error::TreeResult;
use crate::tree::{NodeId, Tree};

/// Log targets, for use in subscriber filters.
pub mod targets {
    /// Root target for the core crate.
    pub const CORE: &str = "gogi_core";
    /// Tree structure and property changes.
    pub const TREE: &str = "gogi_core::tree";
    /// Signal connection and dispatch.
    pub const SIGNAL: &str = "gogi_core::signal";
}

/// Tree drawing style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// Plain ASCII connectors.
    Ascii,
    /// Unicode box-drawing connectors.
    #[default]
    Unicode,
    /// Indentation only.
    Compact,
}

/// Options for [`TreeDebug`].
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    pub style: TreeStyle,
    /// Show unique names instead of plain names.
    pub show_unique_names: bool,
    pub show_types: bool,
    /// List each node's property keys and values below it.
    pub show_properties: bool,
    /// Mark hidden nodes.
    pub show_flags: bool,
    /// Maximum depth to descend (None for unlimited).
    pub max_depth: Option<usize>,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_unique_names: true,
            show_types: true,
            show_properties: false,
            show_flags: true,
            max_depth: None,
        }
    }
}

impl TreeFormatOptions {
    pub fn detailed() -> Self {
        Self {
            show_properties: true,
            ..Default::default()
        }
    }

    pub fn minimal() -> Self {
        Self {
            show_unique_names: false,
            show_types: false,
            show_properties: false,
            show_flags: false,
            ..Default::default()
        }
    }
}

/// Renders node trees as text.
#[derive(Debug, Clone, Default)]
pub struct TreeDebug {
    options: TreeFormatOptions,
}

impl TreeDebug {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format the subtree rooted at `root`.
    pub fn format_subtree(&self, tree: &Tree, root: NodeId) -> TreeResult<String> {
        let mut output = String::new();
        self.format_into(tree, root, 0, &mut Vec::new(), &mut output)?;
        Ok(output)
    }

    /// `open` holds, per ancestor level, whether that level still has
    /// siblings below, which decides if a vertical bar is drawn.
    fn format_into(
        &self,
        tree: &Tree,
        id: NodeId,
        depth: usize,
        open: &mut Vec<bool>,
        output: &mut String,
    ) -> TreeResult<()> {
        if self.options.max_depth.is_some_and(|max| depth > max) {
            return Ok(());
        }
        let node = tree.node(id)?;

        output.push_str(&self.prefix(open));
        let name = if self.options.show_unique_names || node.name().is_empty() {
            node.unique_name()
        } else {
            node.name()
        };
        output.push_str(name);
        if self.options.show_types {
            let _ = write!(output, " ({})", node.type_tag());
        }
        if self.options.show_flags && !node.is_visible() {
            output.push_str(" [hidden]");
        }
        output.push('\n');

        if self.options.show_properties {
            let indent = self.continuation(open, !node.children().is_empty());
            for (key, value) in node.props().iter() {
                let _ = writeln!(output, "{indent}.{key} = {value}");
            }
        }

        let count = node.children().len();
        for (i, &child) in node.children().iter().enumerate() {
            open.push(i + 1 < count);
            self.format_into(tree, child, depth + 1, open, output)?;
            open.pop();
        }
        Ok(())
    }

    fn prefix(&self, open: &[bool]) -> String {
        let Some((&last_open, ancestors)) = open.split_last() else {
            return String::new();
        };
        let (bar, tee, corner, blank) = self.glyphs();
        let mut prefix = String::new();
        for &has_more in ancestors {
            prefix.push_str(if has_more { bar } else { blank });
        }
        prefix.push_str(if last_open { tee } else { corner });
        prefix
    }

    fn continuation(&self, open: &[bool], has_children: bool) -> String {
        let (bar, _, _, blank) = self.glyphs();
        let mut prefix = String::new();
        for &has_more in open {
            prefix.push_str(if has_more { bar } else { blank });
        }
        prefix.push_str(if has_children { bar } else { blank });
        prefix
    }

    fn glyphs(&self) -> (&'static str, &'static str, &'static str, &'static str) {
        match self.options.style {
            TreeStyle::Ascii => ("|   ", "+-- ", "+-- ", "    "),
            TreeStyle::Unicode => (
                "\u{2502}   ",
                "\u{251c}\u{2500}\u{2500} ",
                "\u{2514}\u{2500}\u{2500} ",
                "    ",
            ),
            TreeStyle::Compact => ("  ", "  ", "  ", "  "),
        }
    }
}
