//! Size negotiation.
//!
//! Runs bottom-up: a container's intrinsic size is aggregated from its
//! visible children's requirements, then combined with the container's own
//! style into its [`SizeReq`].

use gogi_core::Size;
use gogi_style::{Dim, LayoutMode, MaxSize, ResolvedStyle};

use crate::geometry::{AxisReq, Orientation, SizeReq};
use crate::layout::{LayoutItem, grid_tracks};

/// What a node's content asks for before its own style is applied.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Intrinsic {
    pub pref: Size,
    pub min: Size,
}

impl Intrinsic {
    /// A leaf whose content wants `size`. Its minimum comes from style.
    pub fn content(size: Size) -> Self {
        Self {
            pref: size,
            min: Size::ZERO,
        }
    }

    /// Grow both sizes by `padding` on every side.
    pub fn padded(self, padding: f32) -> Self {
        let grow = |s: Size| Size::new(s.width + 2.0 * padding, s.height + 2.0 * padding);
        Self {
            pref: grow(self.pref),
            min: grow(self.min),
        }
    }
}

/// Aggregate the requirements of a container's visible children.
pub fn aggregate(style: &ResolvedStyle, items: &[LayoutItem]) -> Intrinsic {
    match style.layout_mode {
        LayoutMode::Row => along(Orientation::Horizontal, style.spacing, items),
        LayoutMode::Column => along(Orientation::Vertical, style.spacing, items),
        LayoutMode::Grid => {
            let tracks = grid_tracks(style.columns, items);
            Intrinsic {
                pref: tracks.preferred_size(style.spacing),
                min: tracks.min_size(style.spacing),
            }
        }
        LayoutMode::Stacked => items.iter().fold(Intrinsic::default(), |acc, item| Intrinsic {
            pref: acc.pref.max(outer(item, |a| a.pref)),
            min: acc.min.max(outer(item, |a| a.min)),
        }),
    }
}

/// A child's size including its margin, reading one field of each axis.
fn outer(item: &LayoutItem, field: impl Fn(&AxisReq) -> f32) -> Size {
    let m = 2.0 * item.margin;
    Size::new(field(&item.req.width) + m, field(&item.req.height) + m)
}

/// Sum along the main axis, max across it.
fn along(orientation: Orientation, spacing: f32, items: &[LayoutItem]) -> Intrinsic {
    let gaps = spacing * items.len().saturating_sub(1) as f32;
    let cross = orientation.cross();
    let fold = |field: fn(&AxisReq) -> f32| {
        let (main, cross_max) = items.iter().fold((0.0_f32, 0.0_f32), |(main, cross_max), item| {
            let size = outer(item, field);
            (main + orientation.of(size), cross_max.max(cross.of(size)))
        });
        orientation.make_size(main + gaps, cross_max)
    };
    Intrinsic {
        pref: fold(|a| a.pref),
        min: fold(|a| a.min),
    }
}

/// Combine a node's style with its intrinsic size.
///
/// An unset minimum is one em of the node's font size, lowered to an
/// explicit size or max limit below that and raised to what the children
/// need. Pending percentages are treated as unset here; the layout pass
/// negotiates the node again once its parent's size is known.
pub fn size_req(style: &ResolvedStyle, intrinsic: Intrinsic) -> SizeReq {
    let em = style.paint.font_size;
    SizeReq {
        width: axis_req(
            style.width,
            style.min_width,
            style.max_width,
            intrinsic.pref.width,
            intrinsic.min.width,
            em,
        ),
        height: axis_req(
            style.height,
            style.min_height,
            style.max_height,
            intrinsic.pref.height,
            intrinsic.min.height,
            em,
        ),
    }
}

fn axis_req(
    size: Dim,
    min: Dim,
    max: MaxSize,
    content_pref: f32,
    content_min: f32,
    em: f32,
) -> AxisReq {
    let min = match min {
        Dim::Px(v) => v.max(0.0),
        _ => size
            .px()
            .into_iter()
            .chain(max.limit())
            .fold(em, f32::min)
            .max(content_min)
            .max(0.0),
    };
    let (max, stretch) = match max {
        MaxSize::Stretch => (None, true),
        MaxSize::Unconstrained => (None, false),
        MaxSize::Limit(limit) => (limit.px().map(|m| m.max(min)), false),
    };
    let pref = match size {
        Dim::Px(v) => v,
        _ => content_pref,
    };
    let mut req = AxisReq {
        pref,
        min,
        max,
        stretch,
    };
    req.pref = req.clamp(pref);
    req
}
