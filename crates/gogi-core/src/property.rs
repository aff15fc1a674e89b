//! Property bags: the closed set of recognized style keys and their values.
//!
//! Every node carries a [`PropertyBag`] mapping a [`StyleKey`] to a
//! [`PropValue`]. Keys arrive either typed or as strings; string keys that
//! are not recognized are ignored rather than rejected, so stylesheets written
//! for newer versions keep working.
//!
//! # Example
//!
//! ```
//! use gogi_core::property::{Length, PropValue, PropertyBag, StyleKey};
//!
//! let mut bag = PropertyBag::new();
//! bag.set(StyleKey::Width, PropValue::parse("10em"));
//! bag.set(StyleKey::Width, PropValue::Number(120.0));
//!
//! // Later sets replace earlier ones.
//! assert_eq!(bag.get(StyleKey::Width), Some(&PropValue::Number(120.0)));
//! assert_eq!(bag.len(), 1);
//!
//! assert_eq!(PropValue::parse("50%"), PropValue::Length(Length::percent(50.0)));
//! assert_eq!(StyleKey::from_name("align-horiz"), Some(StyleKey::HorizontalAlign));
//! assert_eq!(StyleKey::from_name("z-index"), None);
//! ```

use std::fmt;

use crate::types::Color;

/// The recognized style keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleKey {
    Width,
    Height,
    MinWidth,
    MinHeight,
    MaxWidth,
    MaxHeight,
    Margin,
    /// Space between a container's edge and its children.
    Padding,
    /// Gap between adjacent children of a row, column or grid.
    Spacing,
    /// Number of grid columns.
    Columns,
    HorizontalAlign,
    VerticalAlign,
    LayoutMode,
    /// Index of the visible child of a stacked container.
    StackTop,
    Color,
    BackgroundColor,
    FontSize,
    FontFamily,
    TextAlign,
}

impl StyleKey {
    /// Every recognized key, in declaration order.
    pub const ALL: [StyleKey; 19] = [
        StyleKey::Width,
        StyleKey::Height,
        StyleKey::MinWidth,
        StyleKey::MinHeight,
        StyleKey::MaxWidth,
        StyleKey::MaxHeight,
        StyleKey::Margin,
        StyleKey::Padding,
        StyleKey::Spacing,
        StyleKey::Columns,
        StyleKey::HorizontalAlign,
        StyleKey::VerticalAlign,
        StyleKey::LayoutMode,
        StyleKey::StackTop,
        StyleKey::Color,
        StyleKey::BackgroundColor,
        StyleKey::FontSize,
        StyleKey::FontFamily,
        StyleKey::TextAlign,
    ];

    /// Look up a key by its property name. Returns `None` for unknown keys.
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name.trim() {
            "width" => Self::Width,
            "height" => Self::Height,
            "min-width" => Self::MinWidth,
            "min-height" => Self::MinHeight,
            "max-width" => Self::MaxWidth,
            "max-height" => Self::MaxHeight,
            "margin" => Self::Margin,
            "padding" => Self::Padding,
            "spacing" => Self::Spacing,
            "columns" => Self::Columns,
            "horizontal-align" | "align-horiz" => Self::HorizontalAlign,
            "vertical-align" | "align-vert" => Self::VerticalAlign,
            "layout-mode" | "layout" => Self::LayoutMode,
            "stack-top" => Self::StackTop,
            "color" => Self::Color,
            "background-color" => Self::BackgroundColor,
            "font-size" => Self::FontSize,
            "font-family" => Self::FontFamily,
            "text-align" => Self::TextAlign,
            _ => return None,
        };
        Some(key)
    }

    /// The canonical property name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Width => "width",
            Self::Height => "height",
            Self::MinWidth => "min-width",
            Self::MinHeight => "min-height",
            Self::MaxWidth => "max-width",
            Self::MaxHeight => "max-height",
            Self::Margin => "margin",
            Self::Padding => "padding",
            Self::Spacing => "spacing",
            Self::Columns => "columns",
            Self::HorizontalAlign => "horizontal-align",
            Self::VerticalAlign => "vertical-align",
            Self::LayoutMode => "layout-mode",
            Self::StackTop => "stack-top",
            Self::Color => "color",
            Self::BackgroundColor => "background-color",
            Self::FontSize => "font-size",
            Self::FontFamily => "font-family",
            Self::TextAlign => "text-align",
        }
    }

    /// Whether descendants inherit this key when they do not set it.
    pub fn is_inheritable(self) -> bool {
        matches!(
            self,
            Self::Color | Self::FontSize | Self::FontFamily | Self::TextAlign
        )
    }

    /// Whether a change to this key can move or resize anything.
    ///
    /// Font keys count: em-based lengths and text metrics depend on them.
    pub fn affects_layout(self) -> bool {
        !matches!(
            self,
            Self::Color | Self::BackgroundColor | Self::TextAlign
        )
    }
}

impl fmt::Display for StyleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Units a [`Length`] can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    /// 1/96th of an inch.
    Px,
    /// Current font size.
    Em,
    /// Half the current font size.
    Ex,
    /// Root font size.
    Rem,
    /// 1/72nd of an inch.
    Pt,
    /// 12 points.
    Pc,
    In,
    Cm,
    Mm,
    /// 1% of the viewport width.
    Vw,
    /// 1% of the viewport height.
    Vh,
    /// Percent of the parent's content size. Only resolvable once the parent
    /// has been laid out.
    Percent,
}

impl Unit {
    /// Unit suffixes, longest first so `rem` is tried before `em`.
    const SUFFIXES: [(&'static str, Unit); 12] = [
        ("rem", Unit::Rem),
        ("em", Unit::Em),
        ("ex", Unit::Ex),
        ("px", Unit::Px),
        ("pt", Unit::Pt),
        ("pc", Unit::Pc),
        ("in", Unit::In),
        ("cm", Unit::Cm),
        ("mm", Unit::Mm),
        ("vw", Unit::Vw),
        ("vh", Unit::Vh),
        ("%", Unit::Percent),
    ];

    /// The textual suffix for this unit.
    pub fn suffix(self) -> &'static str {
        Self::SUFFIXES
            .iter()
            .find(|(_, unit)| *unit == self)
            .map(|(s, _)| *s)
            .unwrap_or("px")
    }

    /// Pixels per unit for physical units at 96 DPI, `None` for units that
    /// depend on context.
    pub fn px_per_unit(self) -> Option<f32> {
        match self {
            Unit::Px => Some(1.0),
            Unit::In => Some(96.0),
            Unit::Pt => Some(96.0 / 72.0),
            Unit::Pc => Some(16.0),
            Unit::Cm => Some(96.0 / 2.54),
            Unit::Mm => Some(96.0 / 25.4),
            _ => None,
        }
    }
}

/// A numeric quantity with a unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    pub value: f32,
    pub unit: Unit,
}

impl Length {
    pub const fn new(value: f32, unit: Unit) -> Self {
        Self { value, unit }
    }

    pub const fn px(value: f32) -> Self {
        Self::new(value, Unit::Px)
    }

    pub const fn em(value: f32) -> Self {
        Self::new(value, Unit::Em)
    }

    pub const fn pt(value: f32) -> Self {
        Self::new(value, Unit::Pt)
    }

    pub const fn percent(value: f32) -> Self {
        Self::new(value, Unit::Percent)
    }

    /// Parse `"<number><unit>"`. A bare number is not a length.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Unit::SUFFIXES.iter().find_map(|(suffix, unit)| {
            let number = s.strip_suffix(suffix)?;
            number
                .trim()
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| Length::new(v, *unit))
        })
    }

    /// Whether this length needs the parent's content size to resolve.
    pub fn is_percent(&self) -> bool {
        self.unit == Unit::Percent
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

/// A typed property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    /// A raw number. For length keys this is pixels.
    Number(f32),
    Length(Length),
    /// An enumerated identifier such as `stretch` or `row`.
    Keyword(String),
    Color(Color),
    Str(String),
}

impl PropValue {
    /// Parse a value from its textual form.
    ///
    /// Numbers, lengths, hex colors, and color names are recognized; other
    /// identifiers become keywords and anything else a plain string. Parsing
    /// never fails. `inf` and `nan` are not numbers here.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if let Some(n) = s.parse::<f32>().ok().filter(|n| n.is_finite()) {
            return PropValue::Number(n);
        }
        if let Some(len) = Length::parse(s) {
            return PropValue::Length(len);
        }
        if let Some(color) = Color::parse(s) {
            return PropValue::Color(color);
        }
        let is_ident = !s.is_empty()
            && s.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if is_ident {
            PropValue::Keyword(s.to_ascii_lowercase())
        } else {
            PropValue::Str(s.to_string())
        }
    }

    /// Shorthand for a keyword value.
    pub fn keyword(s: impl Into<String>) -> Self {
        PropValue::Keyword(s.into())
    }

    pub fn as_number(&self) -> Option<f32> {
        match self {
            PropValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Keyword or string contents.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropValue::Keyword(s) | PropValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Number(n) => write!(f, "{n}"),
            PropValue::Length(len) => write!(f, "{len}"),
            PropValue::Keyword(k) => f.write_str(k),
            PropValue::Color(c) => write!(
                f,
                "#{:02x}{:02x}{:02x}{:02x}",
                (c.r * 255.0).round() as u8,
                (c.g * 255.0).round() as u8,
                (c.b * 255.0).round() as u8,
                (c.a * 255.0).round() as u8
            ),
            PropValue::Str(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<f32> for PropValue {
    fn from(value: f32) -> Self {
        PropValue::Number(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Number(value as f32)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        PropValue::Number(value as f32)
    }
}

impl From<Length> for PropValue {
    fn from(value: Length) -> Self {
        PropValue::Length(value)
    }
}

impl From<Color> for PropValue {
    fn from(value: Color) -> Self {
        PropValue::Color(value)
    }
}

/// An ordered property bag.
///
/// Setting a key that is already present replaces its value in place, so the
/// last set wins and iteration order stays the order keys were first set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyBag {
    entries: Vec<(StyleKey, PropValue)>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, returning the previous value for the key.
    pub fn set(&mut self, key: StyleKey, value: PropValue) -> Option<PropValue> {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Set a value from string key and value. Unknown keys are ignored and
    /// reported by returning `false`.
    pub fn set_str(&mut self, key: &str, value: &str) -> bool {
        match StyleKey::from_name(key) {
            Some(key) => {
                self.set(key, PropValue::parse(value));
                true
            }
            None => false,
        }
    }

    pub fn get(&self, key: StyleKey) -> Option<&PropValue> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn remove(&mut self, key: StyleKey) -> Option<PropValue> {
        let index = self.entries.iter().position(|(k, _)| *k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains(&self, key: StyleKey) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StyleKey, &PropValue)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = StyleKey> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(StyleKey, PropValue)> for PropertyBag {
    fn from_iter<I: IntoIterator<Item = (StyleKey, PropValue)>>(iter: I) -> Self {
        let mut bag = PropertyBag::new();
        for (key, value) in iter {
            bag.set(key, value);
        }
        bag
    }
}
