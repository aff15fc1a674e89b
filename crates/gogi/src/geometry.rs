//! Size requirements and assigned geometry.

use gogi_core::{Rect, Size};

/// Layout orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Along the x axis.
    #[default]
    Horizontal,
    /// Along the y axis.
    Vertical,
}

impl Orientation {
    /// Get the cross (perpendicular) orientation.
    #[inline]
    pub fn cross(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }

    /// The component of `size` along this orientation.
    #[inline]
    pub fn of(self, size: Size) -> f32 {
        match self {
            Orientation::Horizontal => size.width,
            Orientation::Vertical => size.height,
        }
    }

    /// Build a size from its component along this orientation and the cross
    /// component.
    #[inline]
    pub fn make_size(self, main: f32, cross: f32) -> Size {
        match self {
            Orientation::Horizontal => Size::new(main, cross),
            Orientation::Vertical => Size::new(cross, main),
        }
    }
}

/// Size requirement along a single axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisReq {
    pub pref: f32,
    pub min: f32,
    /// Hard upper limit, if any.
    pub max: Option<f32>,
    /// Claims leftover space along this axis.
    pub stretch: bool,
}

impl AxisReq {
    /// A requirement that is exactly `size`.
    pub fn fixed(size: f32) -> Self {
        Self {
            pref: size,
            min: size,
            max: Some(size),
            stretch: false,
        }
    }

    /// Clamp a proposed size into `[min, max]`; the minimum wins if they
    /// conflict.
    pub fn clamp(&self, size: f32) -> f32 {
        let size = match self.max {
            Some(max) => size.min(max),
            None => size,
        };
        size.max(self.min)
    }

    /// Max in the classic encoding: -1 for stretch, 0 for unconstrained.
    pub fn encoded_max(&self) -> f32 {
        if self.stretch {
            -1.0
        } else {
            self.max.unwrap_or(0.0)
        }
    }
}

/// Negotiated size requirements of a node, excluding its margin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizeReq {
    pub width: AxisReq,
    pub height: AxisReq,
}

impl SizeReq {
    pub fn axis(&self, orientation: Orientation) -> &AxisReq {
        match orientation {
            Orientation::Horizontal => &self.width,
            Orientation::Vertical => &self.height,
        }
    }

    pub fn preferred_size(&self) -> Size {
        Size::new(self.width.pref, self.height.pref)
    }

    pub fn min_size(&self) -> Size {
        Size::new(self.width.min, self.height.min)
    }

    /// Max size with -1 meaning stretch and 0 meaning unconstrained.
    pub fn max_size(&self) -> Size {
        Size::new(self.width.encoded_max(), self.height.encoded_max())
    }
}

/// Geometry assigned to a node by the last layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Geometry {
    /// The node's box, excluding its margin.
    pub rect: Rect,
    /// Whether the node is shown. False for hidden nodes, their descendants,
    /// and stacked children other than the top one.
    pub visible: bool,
    /// Children could not fit even at their minimum sizes and overflow the
    /// node's box.
    pub overflow: bool,
}
