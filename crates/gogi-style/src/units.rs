//! Unit normalization.
//!
//! Everything resolves to 96-DPI pixels. Physical units convert with fixed
//! factors, font-relative units need the current and root font sizes,
//! viewport units need the viewport size. Percentages are the exception:
//! they depend on the parent's content size, which is only known during
//! layout, so they are kept as [`Dim::Percent`](crate::Dim::Percent) and
//! finished later.
//!
//! ```
//! use gogi_core::{Length, Size, Unit};
//! use gogi_style::UnitContext;
//!
//! let ctx = UnitContext::new(20.0, 16.0, Size::new(800.0, 600.0));
//! assert_eq!(ctx.to_px(Length::em(2.0)), Some(40.0));
//! assert_eq!(ctx.to_px(Length::new(1.0, Unit::Rem)), Some(16.0));
//! assert_eq!(ctx.to_px(Length::new(10.0, Unit::Vh)), Some(60.0));
//! assert_eq!(ctx.to_px(Length::new(1.0, Unit::In)), Some(96.0));
//! assert_eq!(ctx.to_px(Length::percent(50.0)), None);
//! ```

use gogi_core::{Length, Size, Unit};

/// Inputs needed to turn a [`Length`] into pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitContext {
    /// The node's own font size in pixels.
    pub font_size: f32,
    /// The root font size in pixels.
    pub root_font_size: f32,
    pub viewport: Size,
}

impl UnitContext {
    pub fn new(font_size: f32, root_font_size: f32, viewport: Size) -> Self {
        Self {
            font_size,
            root_font_size,
            viewport,
        }
    }

    /// Convert to pixels. Returns `None` for percentages.
    pub fn to_px(&self, length: Length) -> Option<f32> {
        if let Some(factor) = length.unit.px_per_unit() {
            return Some(length.value * factor);
        }
        let px = match length.unit {
            Unit::Em => length.value * self.font_size,
            Unit::Ex => length.value * self.font_size * 0.5,
            Unit::Rem => length.value * self.root_font_size,
            Unit::Vw => length.value * self.viewport.width / 100.0,
            Unit::Vh => length.value * self.viewport.height / 100.0,
            _ => return None,
        };
        Some(px)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_relative_units() {
        let ctx = UnitContext::new(12.0, 16.0, Size::ZERO);
        assert_eq!(ctx.to_px(Length::new(2.0, Unit::Ex)), Some(12.0));
        assert_eq!(ctx.to_px(Length::em(0.5)), Some(6.0));
        assert_eq!(ctx.to_px(Length::new(2.0, Unit::Rem)), Some(32.0));
    }

    #[test]
    fn test_physical_units() {
        let ctx = UnitContext::new(16.0, 16.0, Size::ZERO);
        let px = |l| ctx.to_px(l).unwrap();
        assert!((px(Length::pt(12.0)) - 16.0).abs() < 1e-4);
        assert!((px(Length::new(2.54, Unit::Cm)) - 96.0).abs() < 1e-3);
        assert!((px(Length::new(25.4, Unit::Mm)) - 96.0).abs() < 1e-3);
        assert_eq!(px(Length::new(1.0, Unit::Pc)), 16.0);
    }
}
