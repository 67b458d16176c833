use crate::collision_detection;
use crate::error::{QuadtreeError, QuadtreeResult};
use geometry::shapes::{Circle, OrientedRect, Rectangle, ShapeEnum};
use geometry::Quad;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct RectExtent {
    pub(crate) min_x: f32,
    pub(crate) min_y: f32,
    pub(crate) max_x: f32,
    pub(crate) max_y: f32,
}

impl RectExtent {
    /// Identity for `union`; overlaps nothing.
    pub(crate) const EMPTY: Self = Self {
        min_x: f32::INFINITY,
        min_y: f32::INFINITY,
        max_x: f32::NEG_INFINITY,
        max_y: f32::NEG_INFINITY,
    };

    #[inline(always)]
    pub(crate) fn from_rect(rect: &Rectangle) -> Self {
        Self {
            min_x: rect.x,
            min_y: rect.y,
            max_x: rect.x + rect.width,
            max_y: rect.y + rect.height,
        }
    }

    pub(crate) fn from_min_max(
        min_x: f32,
        min_y: f32,
        max_x: f32,
        max_y: f32,
    ) -> QuadtreeResult<Self> {
        validate_rect_extent_bounds(min_x, min_y, max_x, max_y)?;
        Ok(Self {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    #[inline(always)]
    pub(crate) fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    #[inline(always)]
    pub(crate) fn union(self, other: Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    #[inline(always)]
    pub(crate) fn include_point(&mut self, x: f32, y: f32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    #[inline(always)]
    pub(crate) fn center(&self) -> (f32, f32) {
        (
            self.min_x + (self.max_x - self.min_x) * 0.5,
            self.min_y + (self.max_y - self.min_y) * 0.5,
        )
    }

    #[inline(always)]
    pub(crate) fn half_size(&self) -> (f32, f32) {
        (
            (self.max_x - self.min_x) * 0.5,
            (self.max_y - self.min_y) * 0.5,
        )
    }

    pub(crate) fn to_rect(self) -> Rectangle {
        Rectangle::new(
            self.min_x,
            self.min_y,
            self.max_x - self.min_x,
            self.max_y - self.min_y,
        )
    }
}

/// Explicit traversal stack; inline storage covers trees far deeper than the
/// default depth.
pub(crate) type NodeStack = SmallVec<[u32; 64]>;

/// Post-order stack for the maintenance pass: `(node, children_done)`.
pub(crate) type MaintenanceStack = SmallVec<[(u32, bool); 64]>;

#[derive(Clone, Copy, Debug)]
pub(crate) enum Query {
    Rect(RectExtent),
    Circle(Circle),
    Oriented(Quad),
}

impl Query {
    pub(crate) fn from_rect(rect: &Rectangle) -> Self {
        Query::Rect(RectExtent::from_rect(rect))
    }

    pub(crate) fn from_oriented(rect: &OrientedRect) -> Self {
        Query::Oriented(rect.corners())
    }

    pub(crate) fn from_shape(shape: &ShapeEnum) -> Self {
        match shape {
            ShapeEnum::Rectangle(rect) => Self::from_rect(rect),
            ShapeEnum::Circle(circle) => Query::Circle(*circle),
            ShapeEnum::Oriented(rect) => Self::from_oriented(rect),
        }
    }

    /// Whether a node's tight bounds may hold a match.
    #[inline(always)]
    pub(crate) fn overlaps_extent(&self, extent: RectExtent) -> bool {
        match self {
            Query::Rect(query) => collision_detection::extent_extent(query, &extent),
            _ if extent.is_empty() => false,
            Query::Circle(circle) => collision_detection::circle_rectangle(circle, &extent.to_rect()),
            Query::Oriented(quad) => {
                collision_detection::oriented_rectangle(quad, &extent.to_rect())
            }
        }
    }

    #[inline(always)]
    pub(crate) fn overlaps_rect(&self, rect: &Rectangle) -> bool {
        match self {
            Query::Rect(query) => {
                collision_detection::extent_extent(query, &RectExtent::from_rect(rect))
            }
            Query::Circle(circle) => collision_detection::circle_rectangle(circle, rect),
            Query::Oriented(quad) => collision_detection::oriented_rectangle(quad, rect),
        }
    }
}

pub(crate) fn validate_rect_dims(width: f32, height: f32) -> QuadtreeResult<()> {
    if !(width.is_finite() && height.is_finite()) || width < 0.0 || height < 0.0 {
        return Err(QuadtreeError::InvalidRectangleDims { width, height });
    }
    Ok(())
}

pub(crate) fn validate_rect_extent_bounds(
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
) -> QuadtreeResult<()> {
    if !(min_x.is_finite() && min_y.is_finite() && max_x.is_finite() && max_y.is_finite())
        || min_x > max_x
        || min_y > max_y
    {
        return Err(QuadtreeError::InvalidRectExtent {
            min_x,
            min_y,
            max_x,
            max_y,
        });
    }
    Ok(())
}
