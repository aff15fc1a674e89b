//! The resolved style record.

use gogi_core::{Color, PropValue, Size};

/// A size component after unit normalization.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Dim {
    /// Not set; content decides.
    #[default]
    Auto,
    Px(f32),
    /// Percent of the parent's content size along the same axis, pending
    /// until the parent has been laid out.
    Percent(f32),
}

impl Dim {
    /// Pixel value if already known.
    pub fn px(self) -> Option<f32> {
        match self {
            Dim::Px(v) => Some(v),
            _ => None,
        }
    }

    /// Pixel value, treating pending percentages and `Auto` as 0.
    pub fn px_or_zero(self) -> f32 {
        self.px().unwrap_or(0.0)
    }

    pub fn is_percent(self) -> bool {
        matches!(self, Dim::Percent(_))
    }

    /// `Auto`, or a value that is neither infinite nor NaN.
    pub fn is_finite(self) -> bool {
        match self {
            Dim::Auto => true,
            Dim::Px(v) | Dim::Percent(v) => v.is_finite(),
        }
    }

    /// Replace a percentage with its pixel value against `parent`.
    pub fn finalize(self, parent: f32) -> Dim {
        match self {
            Dim::Percent(p) => Dim::Px(parent * p / 100.0),
            other => other,
        }
    }
}

/// A max-size constraint.
///
/// Raw numbers encode these the classic way: a negative max means stretch,
/// zero means unconstrained, positive values are a hard limit.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MaxSize {
    /// No limit, and no claim on extra space.
    #[default]
    Unconstrained,
    /// Claim leftover space along this axis.
    Stretch,
    Limit(Dim),
}

impl MaxSize {
    /// Decode a pixel number.
    pub fn from_px(px: f32) -> Self {
        if px < 0.0 {
            MaxSize::Stretch
        } else if px == 0.0 {
            MaxSize::Unconstrained
        } else {
            MaxSize::Limit(Dim::Px(px))
        }
    }

    pub fn is_stretch(self) -> bool {
        self == MaxSize::Stretch
    }

    /// The pixel limit, if any.
    pub fn limit(self) -> Option<f32> {
        match self {
            MaxSize::Limit(dim) => dim.px(),
            _ => None,
        }
    }

    pub fn finalize(self, parent: f32) -> MaxSize {
        match self {
            MaxSize::Limit(dim) => MaxSize::Limit(dim.finalize(parent)),
            other => other,
        }
    }
}

/// Alignment of children along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Align {
    #[default]
    Start,
    Center,
    End,
    /// Spread leftover space evenly between children.
    Justify,
    /// Grow children to fill the available space.
    Stretch,
}

impl Align {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let align = match keyword.to_ascii_lowercase().as_str() {
            "start" | "left" | "top" => Align::Start,
            "center" | "middle" => Align::Center,
            "end" | "right" | "bottom" => Align::End,
            "justify" => Align::Justify,
            "stretch" => Align::Stretch,
            _ => return None,
        };
        Some(align)
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Align::Start => "start",
            Align::Center => "center",
            Align::End => "end",
            Align::Justify => "justify",
            Align::Stretch => "stretch",
        }
    }
}

impl From<Align> for PropValue {
    fn from(value: Align) -> Self {
        PropValue::keyword(value.keyword())
    }
}

/// How a container arranges its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LayoutMode {
    /// Left to right along the horizontal axis.
    Row,
    /// Top to bottom along the vertical axis.
    #[default]
    Column,
    /// Row-major cells in a fixed number of columns.
    Grid,
    /// Every child on top of each other; one visible at a time.
    Stacked,
}

impl LayoutMode {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let mode = match keyword.to_ascii_lowercase().as_str() {
            "row" | "horiz" | "horizontal" => LayoutMode::Row,
            "column" | "col" | "vert" | "vertical" => LayoutMode::Column,
            "grid" => LayoutMode::Grid,
            "stacked" | "stack" => LayoutMode::Stacked,
            _ => return None,
        };
        Some(mode)
    }

    pub fn keyword(self) -> &'static str {
        match self {
            LayoutMode::Row => "row",
            LayoutMode::Column => "column",
            LayoutMode::Grid => "grid",
            LayoutMode::Stacked => "stacked",
        }
    }
}

impl From<LayoutMode> for PropValue {
    fn from(value: LayoutMode) -> Self {
        PropValue::keyword(value.keyword())
    }
}

/// The part of the style a painter needs.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintStyle {
    pub color: Color,
    pub background_color: Option<Color>,
    /// Font size in pixels.
    pub font_size: f32,
    pub font_family: String,
    pub text_align: Align,
}

impl Default for PaintStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            background_color: None,
            font_size: 16.0,
            font_family: "sans-serif".to_string(),
            text_align: Align::Start,
        }
    }
}

/// A node's style after defaults, inheritance and its own properties have
/// been merged and units normalized.
///
/// Percent sizes stay pending until [`finalize`](Self::finalize) is given the
/// parent's content size.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub width: Dim,
    pub height: Dim,
    pub min_width: Dim,
    pub min_height: Dim,
    pub max_width: MaxSize,
    pub max_height: MaxSize,
    /// Space around the node on every side.
    pub margin: f32,
    /// Space between the node's edge and its children or content.
    pub padding: f32,
    /// Gap between adjacent children.
    pub spacing: f32,
    pub horizontal_align: Align,
    pub vertical_align: Align,
    pub layout_mode: LayoutMode,
    pub columns: usize,
    pub stack_top: usize,
    pub paint: PaintStyle,
}

impl Default for ResolvedStyle {
    fn default() -> Self {
        Self {
            width: Dim::Auto,
            height: Dim::Auto,
            min_width: Dim::Auto,
            min_height: Dim::Auto,
            max_width: MaxSize::Unconstrained,
            max_height: MaxSize::Unconstrained,
            margin: 0.0,
            padding: 0.0,
            spacing: 0.0,
            horizontal_align: Align::Start,
            vertical_align: Align::Start,
            layout_mode: LayoutMode::Column,
            columns: 1,
            stack_top: 0,
            paint: PaintStyle::default(),
        }
    }
}

impl ResolvedStyle {
    /// Whether any size component still waits on the parent's size.
    pub fn has_percent(&self) -> bool {
        self.width.is_percent()
            || self.height.is_percent()
            || self.min_width.is_percent()
            || self.min_height.is_percent()
            || matches!(self.max_width, MaxSize::Limit(Dim::Percent(_)))
            || matches!(self.max_height, MaxSize::Limit(Dim::Percent(_)))
    }

    /// Second resolution phase: turn percentages into pixels against the
    /// parent's content size.
    pub fn finalize(&self, parent_content: Size) -> ResolvedStyle {
        let mut style = self.clone();
        style.width = self.width.finalize(parent_content.width);
        style.min_width = self.min_width.finalize(parent_content.width);
        style.max_width = self.max_width.finalize(parent_content.width);
        style.height = self.height.finalize(parent_content.height);
        style.min_height = self.min_height.finalize(parent_content.height);
        style.max_height = self.max_height.finalize(parent_content.height);
        style
    }

    /// Alignment along the horizontal or vertical axis.
    pub fn align(&self, horizontal: bool) -> Align {
        if horizontal {
            self.horizontal_align
        } else {
            self.vertical_align
        }
    }
}
