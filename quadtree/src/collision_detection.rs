use crate::quadtree::types::RectExtent;
use geometry::geometry::intersects;
use geometry::shapes::{Circle, Rectangle};
use geometry::Quad;

// Half-open on both axes: boxes that only share an edge do not collide.
pub fn rectangle_rectangle(a: &Rectangle, b: &Rectangle) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

#[inline(always)]
pub(crate) fn extent_extent(a: &RectExtent, b: &RectExtent) -> bool {
    a.min_x < b.max_x && a.max_x > b.min_x && a.min_y < b.max_y && a.max_y > b.min_y
}

pub fn circle_rectangle(circle: &Circle, rectangle: &Rectangle) -> bool {
    let half_width = rectangle.width / 2.0;
    let half_height = rectangle.height / 2.0;
    let circle_distance_x = (circle.x - rectangle.center_x()).abs();
    let circle_distance_y = (circle.y - rectangle.center_y()).abs();

    if circle_distance_x > half_width + circle.radius {
        return false;
    }
    if circle_distance_y > half_height + circle.radius {
        return false;
    }

    if circle_distance_x <= half_width || circle_distance_y <= half_height {
        return true;
    }

    let corner_dx = circle_distance_x - half_width;
    let corner_dy = circle_distance_y - half_height;
    let corner_distance_sq = corner_dx * corner_dx + corner_dy * corner_dy;

    corner_distance_sq <= circle.radius * circle.radius
}

#[inline(always)]
pub fn oriented_rectangle(quad: &Quad, rectangle: &Rectangle) -> bool {
    intersects(rectangle, quad)
}
