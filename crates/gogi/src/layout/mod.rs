//! The layout solver.
//!
//! Given a container's resolved style, its content rect, and the negotiated
//! size requirements of its visible children, [`arrange`] computes one rect
//! per child. Each layout mode is its own algorithm:
//!
//! - **Row / Column** ([`box_layout`]): children along a main axis. Leftover
//!   space goes to stretch children in proportion to their preferred size, or
//!   is placed per the container's alignment. A deficit shrinks children
//!   toward their minimums; if the minimums still do not fit, every child
//!   gets its minimum and the arrangement is flagged as overflowing.
//! - **Grid** ([`grid_layout`]): row-major cells; column widths and row
//!   heights are the largest preferred sizes in each track.
//! - **Stacked** ([`stack_layout`]): every child gets the full content rect.
//!
//! Rects exclude each child's margin: a child with margin `m` occupies its
//! rect plus `m` on every side.

mod box_layout;
mod grid_layout;
mod stack_layout;

use gogi_core::{Rect, Size};
use gogi_style::{Align, LayoutMode, ResolvedStyle};

use crate::geometry::{AxisReq, Orientation, SizeReq};

pub use grid_layout::{GridTracks, grid_tracks};

const EPSILON: f32 = 1e-4;

/// A visible child as seen by its container's layout.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutItem {
    pub req: SizeReq,
    pub margin: f32,
}

impl LayoutItem {
    pub fn new(req: SizeReq, margin: f32) -> Self {
        Self { req, margin }
    }
}

/// The result of laying out one container.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Arrangement {
    /// One rect per item, in item order.
    pub rects: Vec<Rect>,
    /// Children did not fit even at their minimum sizes.
    pub overflow: bool,
    /// Extent actually occupied by the children, including margins and gaps.
    pub used: Size,
}

/// Lay out `items` inside `content` according to the container's style.
pub fn arrange(style: &ResolvedStyle, content: Rect, items: &[LayoutItem]) -> Arrangement {
    match style.layout_mode {
        LayoutMode::Row => box_layout::arrange(Orientation::Horizontal, style, content, items),
        LayoutMode::Column => box_layout::arrange(Orientation::Vertical, style, content, items),
        LayoutMode::Grid => grid_layout::arrange(style, content, items),
        LayoutMode::Stacked => stack_layout::arrange(content, items),
    }
}

/// The container's alignment along `orientation`.
pub(crate) fn align_along(style: &ResolvedStyle, orientation: Orientation) -> Align {
    style.align(orientation == Orientation::Horizontal)
}

/// One item's requirement along a single axis, with its margin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisItem {
    pub pref: f32,
    pub min: f32,
    pub max: Option<f32>,
    pub stretch: bool,
    pub margin: f32,
}

impl AxisItem {
    pub fn new(req: &AxisReq, margin: f32) -> Self {
        Self {
            pref: req.pref,
            min: req.min,
            max: req.max,
            stretch: req.stretch,
            margin,
        }
    }
}

/// Sizes and offsets along one axis.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Distribution {
    pub sizes: Vec<f32>,
    /// Offset of each item's box from the start of the span, margin included.
    pub offsets: Vec<f32>,
    pub overflow: bool,
}

impl Distribution {
    /// Distance from the start of the span to the far edge of the last item,
    /// margin included.
    pub fn extent(&self, items: &[AxisItem]) -> f32 {
        match (self.offsets.last(), self.sizes.last(), items.last()) {
            (Some(offset), Some(size), Some(item)) => offset + size + item.margin,
            _ => 0.0,
        }
    }
}

/// Distribute `available` space along an axis.
///
/// `spacing` separates adjacent items; margins are added around each item.
/// See the module documentation for the policy.
pub fn distribute(items: &[AxisItem], available: f32, spacing: f32, align: Align) -> Distribution {
    let n = items.len();
    if n == 0 {
        return Distribution::default();
    }

    let gaps = spacing * (n - 1) as f32;
    let margins: f32 = items.iter().map(|i| 2.0 * i.margin).sum();
    let space = (available - gaps - margins).max(0.0);

    let mut sizes: Vec<f32> = items.iter().map(|i| i.pref).collect();
    let total_pref: f32 = sizes.iter().sum();

    let mut overflow = false;
    let mut leftover = 0.0;
    if total_pref <= space {
        leftover = grow(&mut sizes, items, space - total_pref, align);
    } else {
        overflow = shrink(&mut sizes, items, total_pref - space);
    }

    let (lead, extra_gap) = if leftover <= EPSILON {
        (0.0, 0.0)
    } else {
        match align {
            Align::Center => (leftover / 2.0, 0.0),
            Align::End => (leftover, 0.0),
            Align::Justify if n > 1 => (0.0, leftover / (n - 1) as f32),
            _ => (0.0, 0.0),
        }
    };

    let mut offsets = Vec::with_capacity(n);
    let mut pos = lead;
    for (item, size) in items.iter().zip(&sizes) {
        pos += item.margin;
        offsets.push(pos);
        pos += size + item.margin + spacing + extra_gap;
    }

    Distribution {
        sizes,
        offsets,
        overflow,
    }
}

/// Hand out `extra` space. Returns what could not be given away.
fn grow(sizes: &mut [f32], items: &[AxisItem], extra: f32, align: Align) -> f32 {
    if extra <= EPSILON {
        return 0.0;
    }
    let stretchers: Vec<usize> = (0..items.len()).filter(|&i| items[i].stretch).collect();
    let targets = if !stretchers.is_empty() {
        stretchers
    } else if align == Align::Stretch {
        (0..items.len()).collect()
    } else {
        return extra;
    };
    share_by_pref(sizes, items, &targets, extra)
}

/// Give `extra` to `targets` in proportion to their preferred sizes (equal
/// shares when those are all zero), never exceeding an item's max.
fn share_by_pref(sizes: &mut [f32], items: &[AxisItem], targets: &[usize], mut extra: f32) -> f32 {
    let mut open = targets.to_vec();
    while extra > EPSILON && !open.is_empty() {
        let total: f32 = open.iter().map(|&i| items[i].pref).sum();
        let count = open.len() as f32;
        let mut given = 0.0;
        let mut capped = Vec::new();
        for &i in &open {
            let share = if total > 0.0 {
                extra * items[i].pref / total
            } else {
                extra / count
            };
            let room = items[i]
                .max
                .map_or(f32::INFINITY, |max| (max - sizes[i]).max(0.0));
            let take = share.min(room);
            sizes[i] += take;
            given += take;
            if take < share {
                capped.push(i);
            }
        }
        extra -= given;
        if capped.is_empty() {
            return 0.0;
        }
        open.retain(|i| !capped.contains(i));
    }
    extra.max(0.0)
}

/// Remove `deficit` by shrinking items toward their minimums in proportion
/// to how far each can shrink. Returns `true` on overflow.
fn shrink(sizes: &mut [f32], items: &[AxisItem], deficit: f32) -> bool {
    let shrinkable: f32 = items.iter().map(|i| (i.pref - i.min).max(0.0)).sum();
    if shrinkable > 0.0 && shrinkable + EPSILON >= deficit {
        let deficit = deficit.min(shrinkable);
        for (size, item) in sizes.iter_mut().zip(items) {
            *size -= deficit * (item.pref - item.min).max(0.0) / shrinkable;
        }
        false
    } else {
        for (size, item) in sizes.iter_mut().zip(items) {
            *size = item.min;
        }
        true
    }
}

/// Size and offset of an item across the container's main axis, or within a
/// grid cell. Returns `(offset, size)` with the offset including the margin.
pub fn place_cross(item: &AxisItem, available: f32, align: Align) -> (f32, f32) {
    let space = (available - 2.0 * item.margin).max(0.0);
    let size = if item.stretch || align == Align::Stretch {
        item.max.map_or(space, |max| space.min(max)).max(item.min)
    } else {
        item.pref.min(space).max(item.min)
    };
    let slack = (space - size).max(0.0);
    let offset = match align {
        Align::Center => slack / 2.0,
        Align::End => slack,
        _ => 0.0,
    };
    (item.margin + offset, size)
}

/// Whether an item's minimum plus margins exceeds the space along an axis.
pub(crate) fn exceeds(item: &AxisItem, available: f32) -> bool {
    item.min + 2.0 * item.margin > available + EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(pref: f32, min: f32) -> AxisItem {
        AxisItem {
            pref,
            min,
            ..Default::default()
        }
    }

    fn stretch(pref: f32) -> AxisItem {
        AxisItem {
            pref,
            stretch: true,
            ..Default::default()
        }
    }

    fn approx(a: &[f32], b: &[f32]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-3)
    }

    #[test]
    fn test_stretch_takes_leftover() {
        let items = [item(50.0, 0.0), item(50.0, 0.0), stretch(20.0)];
        let d = distribute(&items, 300.0, 0.0, Align::Start);
        assert!(approx(&d.sizes, &[50.0, 50.0, 200.0]));
        assert!(approx(&d.offsets, &[0.0, 50.0, 100.0]));
        assert!(!d.overflow);
    }

    #[test]
    fn test_stretch_shares_by_preferred_size() {
        let items = [stretch(10.0), stretch(30.0)];
        let d = distribute(&items, 80.0, 0.0, Align::Start);
        assert!(approx(&d.sizes, &[20.0, 60.0]));

        let zero = [stretch(0.0), stretch(0.0)];
        let d = distribute(&zero, 50.0, 0.0, Align::Start);
        assert!(approx(&d.sizes, &[25.0, 25.0]));
    }

    #[test]
    fn test_alignment_of_leftover() {
        let items = [item(10.0, 0.0), item(10.0, 0.0), item(10.0, 0.0)];

        let d = distribute(&items, 60.0, 0.0, Align::Center);
        assert!(approx(&d.offsets, &[15.0, 25.0, 35.0]));

        let d = distribute(&items, 60.0, 0.0, Align::End);
        assert!(approx(&d.offsets, &[30.0, 40.0, 50.0]));

        let d = distribute(&items, 60.0, 0.0, Align::Justify);
        assert!(approx(&d.offsets, &[0.0, 25.0, 50.0]));
        assert!((d.extent(&items) - 60.0).abs() < 1e-3);

        let d = distribute(&items, 60.0, 0.0, Align::Stretch);
        assert!(approx(&d.sizes, &[20.0, 20.0, 20.0]));
    }

    #[test]
    fn test_shrink_toward_min() {
        let items = [item(100.0, 50.0), item(100.0, 80.0)];
        let d = distribute(&items, 150.0, 0.0, Align::Start);
        // Deficit 50 split 50:20 by shrink room.
        let expected = [100.0 - 50.0 * 50.0 / 70.0, 100.0 - 50.0 * 20.0 / 70.0];
        assert!(approx(&d.sizes, &expected));
        assert!((d.sizes.iter().sum::<f32>() - 150.0).abs() < 1e-3);
        assert!(!d.overflow);
    }

    #[test]
    fn test_overflow_clips_at_min() {
        let items = [item(50.0, 40.0), item(50.0, 40.0), item(50.0, 40.0)];
        let d = distribute(&items, 80.0, 0.0, Align::Start);
        assert!(approx(&d.sizes, &[40.0, 40.0, 40.0]));
        assert!(approx(&d.offsets, &[0.0, 40.0, 80.0]));
        assert!(d.overflow);
    }

    #[test]
    fn test_spacing_and_margins() {
        let items = [
            AxisItem {
                margin: 5.0,
                ..item(10.0, 0.0)
            },
            stretch(0.0),
        ];
        let d = distribute(&items, 100.0, 4.0, Align::Start);
        // 100 - 4 gap - 10 margins - 10 pref = 76 to the stretcher.
        assert!(approx(&d.sizes, &[10.0, 76.0]));
        assert!(approx(&d.offsets, &[5.0, 24.0]));
        assert!((d.extent(&items) - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_max_caps_growth() {
        let items = [
            AxisItem {
                max: Some(15.0),
                ..item(10.0, 0.0)
            },
            item(10.0, 0.0),
        ];
        let d = distribute(&items, 40.0, 0.0, Align::Stretch);
        assert!(approx(&d.sizes, &[15.0, 25.0]));
    }

    #[test]
    fn test_place_cross() {
        let it = item(10.0, 4.0);
        assert_eq!(place_cross(&it, 30.0, Align::Start), (0.0, 10.0));
        assert_eq!(place_cross(&it, 30.0, Align::Center), (10.0, 10.0));
        assert_eq!(place_cross(&it, 30.0, Align::End), (20.0, 10.0));
        assert_eq!(place_cross(&it, 30.0, Align::Justify), (0.0, 10.0));
        assert_eq!(place_cross(&it, 30.0, Align::Stretch), (0.0, 30.0));
        assert_eq!(place_cross(&it, 2.0, Align::Start), (0.0, 4.0));
        assert_eq!(place_cross(&stretch(5.0), 30.0, Align::Start), (0.0, 30.0));

        let capped = AxisItem {
            max: Some(12.0),
            margin: 1.0,
            ..stretch(5.0)
        };
        assert_eq!(place_cross(&capped, 30.0, Align::Start), (1.0, 12.0));
    }
}
