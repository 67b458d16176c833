//! Oriented-rectangle kernel: corner points, enclosing boxes, and the overlap
//! test between an axis-aligned rectangle and a rotated one.
//!
//! The overlap test is the union of three checks (edge crossing, rectangle
//! corner inside the quad, quad corner inside the rectangle). It is not a
//! separating-axis test, and callers should not assume it agrees with one in
//! corner-touching configurations.

use crate::shapes::{OrientedRect, Rectangle};
use nalgebra::{Point2, Rotation2, Vector2};

/// Four corners of a (possibly rotated) rectangle in winding order.
pub type Quad = [Point2<f32>; 4];

type QuadF64 = [Point2<f64>; 4];

/// Corners of `rect`: the local corners `(0,0) (w,0) (w,h) (0,h)` shifted by
/// the pivot, rotated, then translated to the world position.
pub fn corners(rect: &OrientedRect) -> Quad {
    let rotation = Rotation2::new(rect.rotation);
    let origin = Vector2::new(rect.origin_x, rect.origin_y);
    let position = Vector2::new(rect.x, rect.y);
    [
        Vector2::new(0.0, 0.0),
        Vector2::new(rect.width, 0.0),
        Vector2::new(rect.width, rect.height),
        Vector2::new(0.0, rect.height),
    ]
    .map(|local| Point2::from(rotation * (local - origin) + position))
}

/// Smallest axis-aligned rectangle enclosing every corner.
pub fn bounding_box(quad: &Quad) -> Rectangle {
    let mut min_x = quad[0].x;
    let mut min_y = quad[0].y;
    let mut max_x = quad[0].x;
    let mut max_y = quad[0].y;
    for corner in &quad[1..] {
        min_x = min_x.min(corner.x);
        min_y = min_y.min(corner.y);
        max_x = max_x.max(corner.x);
        max_y = max_y.max(corner.y);
    }
    Rectangle::new(min_x, min_y, max_x - min_x, max_y - min_y)
}

/// Whether the closed segments `a1-a2` and `b1-b2` cross or touch.
///
/// Parallel, collinear and zero-length segments never intersect.
pub fn segments_intersect(a1: Point2<f64>, a2: Point2<f64>, b1: Point2<f64>, b2: Point2<f64>) -> bool {
    let r = a2 - a1;
    let s = b2 - b1;
    let denominator = r.perp(&s);
    if denominator == 0.0 {
        return false;
    }
    let offset = b1 - a1;
    let t = offset.perp(&s) / denominator;
    let u = offset.perp(&r) / denominator;
    (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
}

/// Strict containment: `point` must be on the inner side of all four edges.
///
/// Assumes the winding produced by [`corners`] for a non-negative size; a quad
/// with the opposite winding contains nothing.
pub fn point_in_quad(point: Point2<f64>, quad: &[Point2<f64>; 4]) -> bool {
    (0..4).all(|i| {
        let start = quad[i];
        let end = quad[(i + 1) % 4];
        (end - start).perp(&(point - start)) > 0.0
    })
}

/// Overlap between an axis-aligned rectangle and an oriented quad.
///
/// True when any quad edge crosses any rectangle edge, when any rectangle
/// corner lies strictly inside the quad, or when any quad corner lies strictly
/// inside the rectangle.
pub fn intersects(rect: &Rectangle, quad: &Quad) -> bool {
    let quad = widen(quad);
    let rect_corners = widen(&rect.corners());

    for i in 0..4 {
        let (a1, a2) = (quad[i], quad[(i + 1) % 4]);
        for j in 0..4 {
            if segments_intersect(a1, a2, rect_corners[j], rect_corners[(j + 1) % 4]) {
                return true;
            }
        }
    }

    if rect_corners.iter().any(|corner| point_in_quad(*corner, &quad)) {
        return true;
    }

    let (left, top) = (f64::from(rect.left()), f64::from(rect.top()));
    let (right, bottom) = (f64::from(rect.right()), f64::from(rect.bottom()));
    quad.iter()
        .any(|corner| corner.x > left && corner.x < right && corner.y > top && corner.y < bottom)
}

// Ray boxes are f32::MAX long; their cross products overflow f32.
fn widen(quad: &Quad) -> QuadF64 {
    quad.map(|corner| Point2::new(f64::from(corner.x), f64::from(corner.y)))
}
