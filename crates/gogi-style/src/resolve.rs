//! Style resolution.
//!
//! A node's style is built in layers, later layers winning:
//!
//! 1. the global defaults,
//! 2. inheritable values from the parent's resolved style,
//! 3. the stylesheet entry for the node's type,
//! 4. the node's own property bag.
//!
//! Font size is resolved first since em-based lengths depend on it; an em
//! font size is relative to the inherited font size. Resolution never fails:
//! malformed values are logged at debug level and skipped.
//!
//! # Example
//!
//! ```
//! use gogi_core::{PropValue, PropertyBag, Size, StyleKey};
//! use gogi_style::{Dim, LayoutMode, StyleDefaults, StyleResolver};
//!
//! let defaults = StyleDefaults::new();
//! let resolver = StyleResolver::new(&defaults, Size::new(800.0, 600.0));
//!
//! let mut props = PropertyBag::new();
//! props.set_str("width", "10em");
//! props.set_str("layout", "row");
//!
//! let style = resolver.resolve("Frame", &props, None);
//! assert_eq!(style.width, Dim::Px(160.0));
//! assert_eq!(style.layout_mode, LayoutMode::Row);
//! ```

use gogi_core::{Color, PropValue, PropertyBag, Size, StyleKey, Unit};

use crate::defaults::StyleDefaults;
use crate::resolved::{Align, Dim, LayoutMode, MaxSize, PaintStyle, ResolvedStyle};
use crate::units::UnitContext;

const TARGET: &str = "gogi_style::resolve";

/// Resolves property bags against defaults and the parent's style.
#[derive(Debug, Clone, Copy)]
pub struct StyleResolver<'a> {
    defaults: &'a StyleDefaults,
    viewport: Size,
}

impl<'a> StyleResolver<'a> {
    pub fn new(defaults: &'a StyleDefaults, viewport: Size) -> Self {
        Self { defaults, viewport }
    }

    /// Resolve a node's style. `parent` is the parent's resolved style, or
    /// `None` for the root.
    pub fn resolve(
        &self,
        type_tag: &str,
        props: &PropertyBag,
        parent: Option<&ResolvedStyle>,
    ) -> ResolvedStyle {
        let sheet = self.defaults.type_style(type_tag);
        let lookup = |key: StyleKey| props.get(key).or_else(|| sheet.and_then(|s| s.get(key)));

        let inherited = match parent {
            Some(p) => p.paint.clone(),
            None => PaintStyle {
                color: self.defaults.color(),
                background_color: None,
                font_size: self.defaults.font_size(),
                font_family: self.defaults.font_family().to_string(),
                text_align: Align::Start,
            },
        };

        let font_size = match lookup(StyleKey::FontSize) {
            Some(value) => self.font_size(value, inherited.font_size).unwrap_or_else(|| {
                tracing::debug!(target: TARGET, type_tag, %value, "ignoring malformed font-size");
                inherited.font_size
            }),
            None => inherited.font_size,
        };

        let mut style = ResolvedStyle {
            paint: PaintStyle {
                font_size,
                background_color: if parent.is_none() {
                    self.defaults.background_color()
                } else {
                    None
                },
                ..inherited
            },
            ..ResolvedStyle::default()
        };

        let ctx = UnitContext::new(font_size, self.defaults.font_size(), self.viewport);
        for key in StyleKey::ALL {
            if key == StyleKey::FontSize {
                continue;
            }
            if let Some(value) = lookup(key) {
                if !apply(&mut style, key, value, &ctx) {
                    tracing::debug!(target: TARGET, type_tag, %key, %value, "ignoring malformed value");
                }
            }
        }
        style
    }

    fn font_size(&self, value: &PropValue, inherited: f32) -> Option<f32> {
        let px = match value {
            PropValue::Number(n) => *n,
            PropValue::Length(len) if len.unit == Unit::Percent => inherited * len.value / 100.0,
            PropValue::Length(len) => {
                let ctx = UnitContext::new(inherited, self.defaults.font_size(), self.viewport);
                ctx.to_px(*len)?
            }
            _ => return None,
        };
        (px > 0.0 && px.is_finite()).then_some(px)
    }
}

/// Apply one property. Returns `false` if the value does not fit the key.
fn apply(style: &mut ResolvedStyle, key: StyleKey, value: &PropValue, ctx: &UnitContext) -> bool {
    match key {
        StyleKey::Width => set(&mut style.width, dim(value, ctx)),
        StyleKey::Height => set(&mut style.height, dim(value, ctx)),
        StyleKey::MinWidth => set(&mut style.min_width, dim(value, ctx)),
        StyleKey::MinHeight => set(&mut style.min_height, dim(value, ctx)),
        StyleKey::MaxWidth => set(&mut style.max_width, max_size(value, ctx)),
        StyleKey::MaxHeight => set(&mut style.max_height, max_size(value, ctx)),
        StyleKey::Margin => set(&mut style.margin, px(value, ctx)),
        StyleKey::Padding => set(&mut style.padding, px(value, ctx).filter(|&p| p >= 0.0)),
        StyleKey::Spacing => set(&mut style.spacing, px(value, ctx)),
        StyleKey::Columns => set(
            &mut style.columns,
            count(value).filter(|&n| n >= 1),
        ),
        StyleKey::StackTop => set(&mut style.stack_top, count(value)),
        StyleKey::HorizontalAlign => set(&mut style.horizontal_align, align(value)),
        StyleKey::VerticalAlign => set(&mut style.vertical_align, align(value)),
        StyleKey::TextAlign => set(&mut style.paint.text_align, align(value)),
        StyleKey::LayoutMode => {
            let mode = value.as_text().and_then(LayoutMode::from_keyword);
            if mode.is_none() {
                tracing::debug!(target: TARGET, %value, "invalid layout mode, using column");
            }
            style.layout_mode = mode.unwrap_or(LayoutMode::Column);
            true
        }
        StyleKey::Color => set(&mut style.paint.color, color(value)),
        StyleKey::BackgroundColor => set(&mut style.paint.background_color, color(value).map(Some)),
        StyleKey::FontFamily => set(
            &mut style.paint.font_family,
            value.as_text().map(str::to_string),
        ),
        StyleKey::FontSize => true,
    }
}

fn set<T>(slot: &mut T, value: Option<T>) -> bool {
    match value {
        Some(v) => {
            *slot = v;
            true
        }
        None => false,
    }
}

fn dim(value: &PropValue, ctx: &UnitContext) -> Option<Dim> {
    let dim = match value {
        PropValue::Number(n) => Dim::Px(*n),
        PropValue::Length(len) if len.is_percent() => Dim::Percent(len.value),
        PropValue::Length(len) => Dim::Px(ctx.to_px(*len)?),
        PropValue::Keyword(k) if k == "auto" => Dim::Auto,
        _ => return None,
    };
    dim.is_finite().then_some(dim)
}

fn max_size(value: &PropValue, ctx: &UnitContext) -> Option<MaxSize> {
    match value {
        PropValue::Keyword(k) if k == "stretch" => Some(MaxSize::Stretch),
        PropValue::Keyword(k) if k == "none" || k == "auto" => Some(MaxSize::Unconstrained),
        PropValue::Length(len) if len.is_percent() && len.value.is_finite() => {
            if len.value < 0.0 {
                Some(MaxSize::Stretch)
            } else {
                Some(MaxSize::Limit(Dim::Percent(len.value)))
            }
        }
        _ => dim(value, ctx).and_then(|d| d.px()).map(MaxSize::from_px),
    }
}

fn px(value: &PropValue, ctx: &UnitContext) -> Option<f32> {
    dim(value, ctx).and_then(Dim::px)
}

fn count(value: &PropValue) -> Option<usize> {
    let n = value.as_number()?;
    (n >= 0.0 && n.fract() == 0.0).then_some(n as usize)
}

fn align(value: &PropValue) -> Option<Align> {
    value.as_text().and_then(Align::from_keyword)
}

fn color(value: &PropValue) -> Option<Color> {
    match value {
        PropValue::Color(c) => Some(*c),
        PropValue::Keyword(k) | PropValue::Str(k) => Color::parse(k),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use gogi_core::Length;

    use super::*;
    use crate::defaults::{SPACE_TYPE, STRETCH_TYPE};

    fn bag(entries: &[(&str, &str)]) -> PropertyBag {
        let mut bag = PropertyBag::new();
        for (k, v) in entries {
            bag.set_str(k, v);
        }
        bag
    }

    #[test]
    fn test_defaults() {
        let defaults = StyleDefaults::new();
        let resolver = StyleResolver::new(&defaults, Size::ZERO);
        let style = resolver.resolve("Frame", &PropertyBag::new(), None);
        assert_eq!(style.width, Dim::Auto);
        assert_eq!(style.max_width, MaxSize::Unconstrained);
        assert_eq!(style.layout_mode, LayoutMode::Column);
        assert_eq!(style.columns, 1);
        assert_eq!(style.paint.font_size, 16.0);
        assert_eq!(style.paint.color, Color::BLACK);
    }

    #[test]
    fn test_round_trip() {
        let defaults = StyleDefaults::new();
        let resolver = StyleResolver::new(&defaults, Size::ZERO);
        let mut props = PropertyBag::new();
        props.set(StyleKey::Width, PropValue::Number(120.0));
        props.set(StyleKey::MinHeight, PropValue::Number(8.0));
        props.set(StyleKey::Margin, PropValue::Number(3.0));
        props.set(StyleKey::Columns, PropValue::Number(3.0));
        props.set(StyleKey::HorizontalAlign, Align::End.into());
        props.set(StyleKey::LayoutMode, LayoutMode::Grid.into());

        let style = resolver.resolve("Frame", &props, None);
        assert_eq!(style.width, Dim::Px(120.0));
        assert_eq!(style.min_height, Dim::Px(8.0));
        assert_eq!(style.margin, 3.0);
        assert_eq!(style.columns, 3);
        assert_eq!(style.horizontal_align, Align::End);
        assert_eq!(style.layout_mode, LayoutMode::Grid);
    }

    #[test]
    fn test_max_sentinels() {
        let defaults = StyleDefaults::new();
        let resolver = StyleResolver::new(&defaults, Size::ZERO);
        let style = resolver.resolve(
            "Frame",
            &bag(&[("max-width", "-1"), ("max-height", "0")]),
            None,
        );
        assert_eq!(style.max_width, MaxSize::Stretch);
        assert_eq!(style.max_height, MaxSize::Unconstrained);

        let style = resolver.resolve("Frame", &bag(&[("max-width", "50%")]), None);
        assert_eq!(style.max_width, MaxSize::Limit(Dim::Percent(50.0)));
    }

    #[test]
    fn test_inheritance() {
        let defaults = StyleDefaults::new();
        let resolver = StyleResolver::new(&defaults, Size::ZERO);
        let parent = resolver.resolve(
            "Frame",
            &bag(&[
                ("color", "red"),
                ("font-size", "20px"),
                ("text-align", "center"),
                ("horizontal-align", "end"),
                ("width", "300"),
                ("background-color", "blue"),
            ]),
            None,
        );
        let child = resolver.resolve("Label", &PropertyBag::new(), Some(&parent));

        assert_eq!(child.paint.color, Color::RED);
        assert_eq!(child.paint.font_size, 20.0);
        assert_eq!(child.paint.text_align, Align::Center);
        // Layout and box properties do not inherit.
        assert_eq!(child.horizontal_align, Align::Start);
        assert_eq!(child.width, Dim::Auto);
        assert_eq!(child.paint.background_color, None);
    }

    #[test]
    fn test_em_uses_own_font_size() {
        let defaults = StyleDefaults::new();
        let resolver = StyleResolver::new(&defaults, Size::ZERO);
        let parent = resolver.resolve("Frame", &bag(&[("font-size", "20px")]), None);
        let child = resolver.resolve(
            "Label",
            &bag(&[("font-size", "2em"), ("width", "2em"), ("height", "1rem")]),
            Some(&parent),
        );
        assert_eq!(child.paint.font_size, 40.0);
        assert_eq!(child.width, Dim::Px(80.0));
        assert_eq!(child.height, Dim::Px(16.0));
    }

    #[test]
    fn test_percent_is_deferred() {
        let defaults = StyleDefaults::new();
        let resolver = StyleResolver::new(&defaults, Size::new(1000.0, 500.0));
        let style = resolver.resolve("Frame", &bag(&[("width", "25%"), ("height", "10vh")]), None);
        assert_eq!(style.width, Dim::Percent(25.0));
        assert_eq!(style.height, Dim::Px(50.0));
        assert_eq!(style.finalize(Size::new(400.0, 0.0)).width, Dim::Px(100.0));
    }

    #[test]
    fn test_malformed_and_invalid_values() {
        let defaults = StyleDefaults::new();
        let resolver = StyleResolver::new(&defaults, Size::ZERO);
        let style = resolver.resolve(
            "Frame",
            &bag(&[
                ("width", "wide"),
                ("columns", "0"),
                ("horizontal-align", "sideways"),
                ("layout-mode", "flex"),
                ("color", "12"),
            ]),
            None,
        );
        assert_eq!(style.width, Dim::Auto);
        assert_eq!(style.columns, 1);
        assert_eq!(style.horizontal_align, Align::Start);
        assert_eq!(style.layout_mode, LayoutMode::Column);
        assert_eq!(style.paint.color, Color::BLACK);
    }

    #[test]
    fn test_non_finite_numbers_are_ignored() {
        let defaults = StyleDefaults::new();
        let resolver = StyleResolver::new(&defaults, Size::ZERO);
        let mut props = PropertyBag::new();
        props.set(StyleKey::Width, PropValue::Number(f32::INFINITY));
        props.set(StyleKey::MinHeight, PropValue::Number(f32::NAN));
        props.set(StyleKey::MaxWidth, PropValue::Length(Length::percent(f32::INFINITY)));
        props.set(StyleKey::Margin, PropValue::Number(f32::NEG_INFINITY));
        props.set(StyleKey::FontSize, PropValue::Number(f32::INFINITY));
        props.set(StyleKey::Columns, PropValue::Number(f32::INFINITY));

        let style = resolver.resolve("Frame", &props, None);
        assert_eq!(style.width, Dim::Auto);
        assert_eq!(style.min_height, Dim::Auto);
        assert_eq!(style.max_width, MaxSize::Unconstrained);
        assert_eq!(style.margin, 0.0);
        assert_eq!(style.paint.font_size, 16.0);
        assert_eq!(style.columns, 1);
    }

    #[test]
    fn test_type_stylesheet_and_own_props() {
        let defaults = StyleDefaults::new();
        let resolver = StyleResolver::new(&defaults, Size::ZERO);

        let stretch = resolver.resolve(STRETCH_TYPE, &PropertyBag::new(), None);
        assert_eq!(stretch.max_width, MaxSize::Stretch);
        assert_eq!(stretch.min_width, Dim::Px(16.0));

        let space = resolver.resolve(SPACE_TYPE, &bag(&[("width", "4")]), None);
        assert_eq!(space.width, Dim::Px(4.0));
        assert_eq!(space.height, Dim::Px(16.0));

        let mut props = PropertyBag::new();
        props.set(StyleKey::MinWidth, Length::px(2.0).into());
        let overridden = resolver.resolve(STRETCH_TYPE, &props, None);
        assert_eq!(overridden.min_width, Dim::Px(2.0));
    }
}
