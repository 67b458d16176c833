use crate::geometry::{self, Quad};
use nalgebra::Point2;
use rand::Rng;
use std::fmt::Debug;

pub trait Shape: Debug {
    fn bounding_box(&self) -> Rectangle;
}

/// Axis-aligned rectangle anchored at its top-left (minimum) corner.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Rectangle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rectangle {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width * 0.5
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height * 0.5
    }

    pub fn top_left(&self) -> (f32, f32) {
        (self.left(), self.top())
    }

    pub fn top_right(&self) -> (f32, f32) {
        (self.right(), self.top())
    }

    pub fn bottom_left(&self) -> (f32, f32) {
        (self.left(), self.bottom())
    }

    pub fn bottom_right(&self) -> (f32, f32) {
        (self.right(), self.bottom())
    }

    /// Corners in clockwise screen order (y down): top-left, top-right,
    /// bottom-right, bottom-left.
    pub fn corners(&self) -> Quad {
        [
            Point2::new(self.left(), self.top()),
            Point2::new(self.right(), self.top()),
            Point2::new(self.right(), self.bottom()),
            Point2::new(self.left(), self.bottom()),
        ]
    }

    // Squared distance from the point to the closest point of the rectangle
    pub fn distance_to_point(&self, x: f32, y: f32) -> f32 {
        let dx = (x - self.center_x()).abs() - self.width / 2.0;
        let dy = (y - self.center_y()).abs() - self.height / 2.0;
        f32::max(dx, 0.0).powi(2) + f32::max(dy, 0.0).powi(2)
    }

    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.left() && x <= self.right() && y >= self.top() && y <= self.bottom()
    }

    pub fn contains_point_strict(&self, x: f32, y: f32) -> bool {
        x > self.left() && x < self.right() && y > self.top() && y < self.bottom()
    }

    /// Half-open overlap: rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rectangle) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    pub fn expand_to_include(&mut self, other: &Rectangle) {
        let left = f32::min(self.left(), other.left());
        let right = f32::max(self.right(), other.right());
        let top = f32::min(self.top(), other.top());
        let bottom = f32::max(self.bottom(), other.bottom());
        self.x = left;
        self.y = top;
        self.width = right - left;
        self.height = bottom - top;
    }

    /// A random rectangle of at most the given size whose top-left corner lies
    /// inside `self`.
    pub fn random_rect_inside<R: Rng>(&self, max_width: f32, max_height: f32, rng: &mut R) -> Rectangle {
        Rectangle::new(
            self._safe_randf32(rng, self.left(), self.right()),
            self._safe_randf32(rng, self.top(), self.bottom()),
            self._safe_randf32(rng, 0.0, max_width),
            self._safe_randf32(rng, 0.0, max_height),
        )
    }

    fn _safe_randf32<R: Rng>(&self, rng: &mut R, min: f32, max: f32) -> f32 {
        if min >= max {
            return min;
        }
        rng.gen_range(min..max)
    }
}

impl Shape for Rectangle {
    fn bounding_box(&self) -> Rectangle {
        *self
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Circle {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

impl Circle {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Self { x, y, radius }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Shape for Circle {
    fn bounding_box(&self) -> Rectangle {
        Rectangle {
            x: self.x - self.radius,
            y: self.y - self.radius,
            width: self.radius * 2.0,
            height: self.radius * 2.0,
        }
    }
}

/// A rectangle rotated by `rotation` radians around a pivot.
///
/// `(x, y)` is the world position of the pivot and `(origin_x, origin_y)` is
/// the pivot in the rectangle's local, unrotated space, measured from its
/// top-left corner. With `rotation == 0` the rectangle covers
/// `(x - origin_x, y - origin_y, width, height)`.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct OrientedRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rotation: f32,
    pub origin_x: f32,
    pub origin_y: f32,
}

impl OrientedRect {
    pub fn new(
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        rotation: f32,
        origin_x: f32,
        origin_y: f32,
    ) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rotation,
            origin_x,
            origin_y,
        }
    }

    /// Rotates `rect` around the pivot `(origin_x, origin_y)`, given relative to
    /// the rectangle's top-left corner.
    pub fn from_rect(rect: &Rectangle, rotation: f32, origin_x: f32, origin_y: f32) -> Self {
        Self::new(
            rect.x + origin_x,
            rect.y + origin_y,
            rect.width,
            rect.height,
            rotation,
            origin_x,
            origin_y,
        )
    }

    /// Rotates `rect` around its own center.
    pub fn centered(rect: &Rectangle, rotation: f32) -> Self {
        Self::from_rect(rect, rotation, rect.width * 0.5, rect.height * 0.5)
    }

    /// A `thickness`-wide box starting at `(x, y)` and extending (practically)
    /// without end along the direction `(dx, dy)`.
    pub fn ray(x: f32, y: f32, dx: f32, dy: f32, thickness: f32) -> Self {
        Self::ray_angle(x, y, dy.atan2(dx), thickness)
    }

    pub fn ray_angle(x: f32, y: f32, angle: f32, thickness: f32) -> Self {
        Self::new(x, y, f32::MAX, thickness, angle, 0.0, thickness * 0.5)
    }

    /// A `thickness`-wide box covering the segment from `(x1, y1)` to
    /// `(x2, y2)`.
    ///
    /// The rotation is taken from the absolute end point, `atan2(y2, x2)`, not
    /// from the segment direction. Segments that do not point away from the
    /// world origin are therefore rotated off their true direction.
    pub fn line(x1: f32, y1: f32, x2: f32, y2: f32, thickness: f32) -> Self {
        let length = (x2 - x1).hypot(y2 - y1);
        Self::new(x1, y1, length, thickness, y2.atan2(x2), 0.0, thickness * 0.5)
    }

    pub fn corners(&self) -> Quad {
        geometry::corners(self)
    }
}

impl Shape for OrientedRect {
    fn bounding_box(&self) -> Rectangle {
        geometry::bounding_box(&self.corners())
    }
}

#[derive(Clone, Debug)]
pub enum ShapeEnum {
    Circle(Circle),
    Rectangle(Rectangle),
    Oriented(OrientedRect),
}

impl Shape for ShapeEnum {
    fn bounding_box(&self) -> Rectangle {
        match self {
            ShapeEnum::Circle(circle) => circle.bounding_box(),
            ShapeEnum::Rectangle(rectangle) => rectangle.bounding_box(),
            ShapeEnum::Oriented(oriented) => oriented.bounding_box(),
        }
    }
}
