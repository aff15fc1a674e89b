//! Row and column layouts.

use gogi_core::{Point, Rect, Size};
use gogi_style::ResolvedStyle;

use super::{Arrangement, AxisItem, LayoutItem, align_along, distribute, exceeds, place_cross};
use crate::geometry::Orientation;

/// Lay out items along `orientation`.
///
/// The main axis uses the container's alignment for that axis, the cross axis
/// the other one.
pub(super) fn arrange(
    orientation: Orientation,
    style: &ResolvedStyle,
    content: Rect,
    items: &[LayoutItem],
) -> Arrangement {
    let cross = orientation.cross();
    let main_items: Vec<AxisItem> = items
        .iter()
        .map(|item| AxisItem::new(item.req.axis(orientation), item.margin))
        .collect();

    let main_available = orientation.of(content.size);
    let cross_available = cross.of(content.size);
    let dist = distribute(
        &main_items,
        main_available,
        style.spacing,
        align_along(style, orientation),
    );
    let cross_align = align_along(style, cross);

    let mut overflow = dist.overflow;
    let mut cross_used: f32 = 0.0;
    let mut rects = Vec::with_capacity(items.len());

    for (i, item) in items.iter().enumerate() {
        let cross_item = AxisItem::new(item.req.axis(cross), item.margin);
        overflow |= exceeds(&cross_item, cross_available);
        let (cross_offset, cross_size) = place_cross(&cross_item, cross_available, cross_align);
        cross_used = cross_used.max(cross_offset + cross_size + item.margin);

        let offset = orientation.make_size(dist.offsets[i], cross_offset);
        let size = orientation.make_size(dist.sizes[i], cross_size);
        rects.push(Rect {
            origin: Point::new(content.left() + offset.width, content.top() + offset.height),
            size,
        });
    }

    let used: Size = orientation.make_size(dist.extent(&main_items), cross_used);
    Arrangement {
        rects,
        overflow,
        used,
    }
}
