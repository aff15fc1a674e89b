//! Style resolution for GoGi.
//!
//! Turns a node's property bag into a [`ResolvedStyle`]: sizes, margins,
//! alignment, layout mode and paint attributes, with every length normalized
//! to 96-DPI pixels except percentages, which wait for the parent's size.
//!
//! - [`StyleDefaults`]: immutable defaults and per-type stylesheet, loadable
//!   from TOML
//! - [`StyleResolver`]: layered resolution (defaults, inheritance, type
//!   stylesheet, own properties)
//! - [`UnitContext`]: unit normalization

mod defaults;
mod error;
mod resolve;
mod resolved;
mod units;

pub use defaults::{DEFAULT_FONT_SIZE, SPACE_TYPE, STRETCH_TYPE, StyleDefaults, TAB_BUTTON_TYPE};
pub use error::{ConfigError, ConfigResult};
pub use resolve::StyleResolver;
pub use resolved::{Align, Dim, LayoutMode, MaxSize, PaintStyle, ResolvedStyle};
pub use units::UnitContext;

/// Log targets, for use in subscriber filters.
pub mod targets {
    /// Style resolution.
    pub const RESOLVE: &str = "gogi_style::resolve";
    /// Loading defaults.
    pub const DEFAULTS: &str = "gogi_style::defaults";
}
