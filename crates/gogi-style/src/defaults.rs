//! Style defaults and the per-type stylesheet.
//!
//! [`StyleDefaults`] is built once and then shared read-only; the viewport
//! hands it to the resolver on every pass instead of reading global state.
//!
//! Defaults can be loaded from TOML:
//!
//! ```toml
//! font-size = "12pt"
//! font-family = "Go"
//! color = "#202020"
//! background-color = "white"
//!
//! [types.Button]
//! margin = 2
//! background-color = "#eeeeee"
//! ```
//!
//! Unknown keys are ignored, just like unknown property keys on nodes.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use gogi_core::{Color, Length, PropValue, PropertyBag, StyleKey};
use serde::Deserialize;

use crate::error::{ConfigError, ConfigResult};

const TARGET: &str = "gogi_style::defaults";

/// Type tag of the flexible spacer.
pub const STRETCH_TYPE: &str = "Stretch";
/// Type tag of the fixed spacer.
pub const SPACE_TYPE: &str = "Space";
/// Type tag of the buttons in a tab view's tab row.
pub const TAB_BUTTON_TYPE: &str = "TabButton";

/// Baseline font size in pixels (12pt at 96 DPI).
pub const DEFAULT_FONT_SIZE: f32 = 16.0;

/// Immutable style defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDefaults {
    font_size: f32,
    font_family: String,
    color: Color,
    background_color: Option<Color>,
    type_styles: HashMap<String, PropertyBag>,
}

impl Default for StyleDefaults {
    fn default() -> Self {
        let mut type_styles = HashMap::new();

        let stretch: PropertyBag = [
            (StyleKey::MaxWidth, PropValue::Number(-1.0)),
            (StyleKey::MaxHeight, PropValue::Number(-1.0)),
            (StyleKey::MinWidth, PropValue::Length(Length::em(1.0))),
            (StyleKey::MinHeight, PropValue::Length(Length::em(1.0))),
        ]
        .into_iter()
        .collect();
        type_styles.insert(STRETCH_TYPE.to_string(), stretch);

        let space: PropertyBag = [
            (StyleKey::Width, PropValue::Length(Length::em(1.0))),
            (StyleKey::Height, PropValue::Length(Length::em(1.0))),
            (StyleKey::MinWidth, PropValue::Length(Length::em(1.0))),
            (StyleKey::MinHeight, PropValue::Length(Length::em(1.0))),
        ]
        .into_iter()
        .collect();
        type_styles.insert(SPACE_TYPE.to_string(), space);

        let tab_button: PropertyBag = [
            (StyleKey::Padding, PropValue::Number(4.0)),
            (StyleKey::Margin, PropValue::Number(0.0)),
            (StyleKey::TextAlign, PropValue::keyword("center")),
            (StyleKey::BackgroundColor, PropValue::Color(Color::from_rgb(0.9, 0.9, 0.9))),
        ]
        .into_iter()
        .collect();
        type_styles.insert(TAB_BUTTON_TYPE.to_string(), tab_button);

        Self {
            font_size: DEFAULT_FONT_SIZE,
            font_family: "sans-serif".to_string(),
            color: Color::BLACK,
            background_color: None,
            type_styles,
        }
    }
}

impl StyleDefaults {
    /// The built-in defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Root font size in pixels.
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn background_color(&self) -> Option<Color> {
        self.background_color
    }

    /// The stylesheet entry for a node type.
    pub fn type_style(&self, type_tag: &str) -> Option<&PropertyBag> {
        self.type_styles.get(type_tag)
    }

    pub fn with_font_size(mut self, px: f32) -> Self {
        self.font_size = px;
        self
    }

    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_background_color(mut self, color: Option<Color>) -> Self {
        self.background_color = color;
        self
    }

    /// Merge properties into a type's stylesheet entry.
    pub fn with_type_style(mut self, type_tag: impl Into<String>, props: PropertyBag) -> Self {
        let entry = self.type_styles.entry(type_tag.into()).or_default();
        for (key, value) in props.iter() {
            entry.set(key, value.clone());
        }
        self
    }

    /// Parse defaults from TOML, starting from the built-ins.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let file: DefaultsFile = toml::from_str(source)?;
        Ok(file.apply(Self::default()))
    }

    /// Load defaults from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let defaults = Self::from_toml_str(&source)?;
        tracing::debug!(target: TARGET, path = %path.display(), "loaded style defaults");
        Ok(defaults)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
struct DefaultsFile {
    font_size: Option<toml::Value>,
    font_family: Option<String>,
    color: Option<String>,
    background_color: Option<String>,
    types: BTreeMap<String, toml::Table>,
}

impl DefaultsFile {
    fn apply(self, mut defaults: StyleDefaults) -> StyleDefaults {
        if let Some(value) = self.font_size.as_ref().and_then(toml_to_prop) {
            match font_size_px(&value) {
                Some(px) if px > 0.0 && px.is_finite() => defaults.font_size = px,
                _ => tracing::debug!(target: TARGET, %value, "ignoring malformed font-size"),
            }
        }
        if let Some(family) = self.font_family {
            defaults.font_family = family;
        }
        if let Some(color) = self.color {
            match Color::parse(&color) {
                Some(c) => defaults.color = c,
                None => tracing::debug!(target: TARGET, %color, "ignoring malformed color"),
            }
        }
        if let Some(color) = self.background_color {
            match Color::parse(&color) {
                Some(c) => defaults.background_color = Some(c),
                None => tracing::debug!(target: TARGET, %color, "ignoring malformed background-color"),
            }
        }
        for (type_tag, table) in self.types {
            let mut bag = PropertyBag::new();
            for (key, value) in &table {
                let Some(style_key) = StyleKey::from_name(key) else {
                    tracing::debug!(target: TARGET, %type_tag, %key, "ignoring unknown property key");
                    continue;
                };
                if let Some(value) = toml_to_prop(value) {
                    bag.set(style_key, value);
                }
            }
            defaults = defaults.with_type_style(type_tag, bag);
        }
        defaults
    }
}

fn toml_to_prop(value: &toml::Value) -> Option<PropValue> {
    match value {
        toml::Value::String(s) => Some(PropValue::parse(s)),
        toml::Value::Integer(i) => Some(PropValue::Number(*i as f32)),
        toml::Value::Float(f) => Some(*f as f32).filter(|f| f.is_finite()).map(PropValue::Number),
        _ => None,
    }
}

/// Font size in pixels for the root; relative units are taken against the
/// built-in baseline.
fn font_size_px(value: &PropValue) -> Option<f32> {
    match value {
        PropValue::Number(n) => Some(*n),
        PropValue::Length(len) => len.unit.px_per_unit().map(|f| len.value * f).or(match len.unit {
            gogi_core::Unit::Em | gogi_core::Unit::Rem => Some(len.value * DEFAULT_FONT_SIZE),
            _ => None,
        }),
        _ => None,
    }
}
