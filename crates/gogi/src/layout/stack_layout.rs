//! Stacked layout.

use gogi_core::Rect;

use super::{Arrangement, AxisItem, LayoutItem, exceeds};
use crate::geometry::Orientation;

/// Every child gets the whole content rect, less its margin. Which child is
/// shown is decided by the viewport from the stack top.
pub(super) fn arrange(content: Rect, items: &[LayoutItem]) -> Arrangement {
    let overflow = items.iter().any(|item| {
        exceeds(
            &AxisItem::new(item.req.axis(Orientation::Horizontal), item.margin),
            content.width(),
        ) || exceeds(
            &AxisItem::new(item.req.axis(Orientation::Vertical), item.margin),
            content.height(),
        )
    });
    Arrangement {
        rects: items.iter().map(|item| content.deflate(item.margin)).collect(),
        overflow,
        used: content.size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::SizeReq;

    #[test]
    fn test_all_children_share_the_rect() {
        let content = Rect::new(4.0, 4.0, 80.0, 60.0);
        let items = [
            LayoutItem::new(SizeReq::default(), 0.0),
            LayoutItem::new(SizeReq::default(), 0.0),
            LayoutItem::new(SizeReq::default(), 2.0),
        ];
        let arr = arrange(content, &items);
        assert_eq!(arr.rects[0], content);
        assert_eq!(arr.rects[1], content);
        assert_eq!(arr.rects[2], Rect::new(6.0, 6.0, 76.0, 56.0));
        assert!(!arr.overflow);
    }

    #[test]
    fn test_min_larger_than_stack_overflows() {
        let mut req = SizeReq::default();
        req.height.min = 100.0;
        let arr = arrange(Rect::new(0.0, 0.0, 50.0, 50.0), &[LayoutItem::new(req, 0.0)]);
        assert!(arr.overflow);
    }
}
