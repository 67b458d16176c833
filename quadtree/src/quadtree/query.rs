use super::storage::{Link, NodeKind, ROOT};
use super::types::{NodeStack, Query};
use super::QuadTree;
use crate::pool::Yield;
use geometry::shapes::{Circle, OrientedRect, Rectangle, ShapeEnum};

impl QuadTree {
    /// Ids whose bounds overlap `rect` (half-open on both axes).
    pub fn query_rect(&self, rect: Rectangle) -> Yield {
        self.collect(&Query::from_rect(&rect))
    }

    pub fn query_rect_with<F>(&self, rect: Rectangle, f: F)
    where
        F: FnMut(u32),
    {
        self.query_with(&Query::from_rect(&rect), f);
    }

    pub fn query_rect_raw(&self, x: f32, y: f32, width: f32, height: f32) -> Yield {
        self.query_rect(Rectangle::new(x, y, width, height))
    }

    pub fn query_rect_raw_with<F>(&self, x: f32, y: f32, width: f32, height: f32, f: F)
    where
        F: FnMut(u32),
    {
        self.query_rect_with(Rectangle::new(x, y, width, height), f);
    }

    /// Ids whose bounds overlap a rotated rectangle.
    ///
    /// Nodes are pruned by testing their bounds against the rotated corners
    /// directly, without first reducing the query to its bounding box.
    pub fn query_oriented(&self, rect: OrientedRect) -> Yield {
        self.collect(&Query::from_oriented(&rect))
    }

    pub fn query_oriented_with<F>(&self, rect: OrientedRect, f: F)
    where
        F: FnMut(u32),
    {
        self.query_with(&Query::from_oriented(&rect), f);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn query_oriented_raw(
        &self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        rotation: f32,
        origin_x: f32,
        origin_y: f32,
    ) -> Yield {
        self.query_oriented(OrientedRect::new(
            x, y, width, height, rotation, origin_x, origin_y,
        ))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn query_oriented_raw_with<F>(
        &self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        rotation: f32,
        origin_x: f32,
        origin_y: f32,
        f: F,
    ) where
        F: FnMut(u32),
    {
        self.query_oriented_with(
            OrientedRect::new(x, y, width, height, rotation, origin_x, origin_y),
            f,
        );
    }

    pub fn query_circle(&self, circle: Circle) -> Yield {
        self.collect(&Query::Circle(circle))
    }

    pub fn query_circle_with<F>(&self, circle: Circle, f: F)
    where
        F: FnMut(u32),
    {
        self.query_with(&Query::Circle(circle), f);
    }

    pub fn query_circle_raw(&self, x: f32, y: f32, radius: f32) -> Yield {
        self.query_circle(Circle::new(x, y, radius))
    }

    pub fn query_circle_raw_with<F>(&self, x: f32, y: f32, radius: f32, f: F)
    where
        F: FnMut(u32),
    {
        self.query_circle_with(Circle::new(x, y, radius), f);
    }

    /// Dispatches on the shape variant.
    pub fn query_shape(&self, shape: &ShapeEnum) -> Yield {
        self.collect(&Query::from_shape(shape))
    }

    pub fn query_shape_with<F>(&self, shape: &ShapeEnum, f: F)
    where
        F: FnMut(u32),
    {
        self.query_with(&Query::from_shape(shape), f);
    }

    /// Ids hit by a `thickness`-wide ray from `(x, y)` along `(dx, dy)`.
    pub fn raycast(&self, x: f32, y: f32, dx: f32, dy: f32, thickness: f32) -> Yield {
        self.query_oriented(OrientedRect::ray(x, y, dx, dy, thickness))
    }

    pub fn raycast_with<F>(&self, x: f32, y: f32, dx: f32, dy: f32, thickness: f32, f: F)
    where
        F: FnMut(u32),
    {
        self.query_oriented_with(OrientedRect::ray(x, y, dx, dy, thickness), f);
    }

    /// Like [`QuadTree::raycast`] with the direction given as an angle in
    /// radians.
    pub fn raycast_angle(&self, x: f32, y: f32, angle: f32, thickness: f32) -> Yield {
        self.query_oriented(OrientedRect::ray_angle(x, y, angle, thickness))
    }

    pub fn raycast_angle_with<F>(&self, x: f32, y: f32, angle: f32, thickness: f32, f: F)
    where
        F: FnMut(u32),
    {
        self.query_oriented_with(OrientedRect::ray_angle(x, y, angle, thickness), f);
    }

    /// Ids hit by a `thickness`-wide segment. See [`OrientedRect::line`] for
    /// how the segment is oriented.
    pub fn linecast(&self, x1: f32, y1: f32, x2: f32, y2: f32, thickness: f32) -> Yield {
        self.query_oriented(OrientedRect::line(x1, y1, x2, y2, thickness))
    }

    pub fn linecast_with<F>(&self, x1: f32, y1: f32, x2: f32, y2: f32, thickness: f32, f: F)
    where
        F: FnMut(u32),
    {
        self.query_oriented_with(OrientedRect::line(x1, y1, x2, y2, thickness), f);
    }

    /// Every tracked id, in ascending order.
    pub fn all(&self) -> Yield {
        let mut result = self.pool.rent();
        self.all_with(|id| result.push(id));
        result
    }

    pub fn all_with<F>(&self, mut f: F)
    where
        F: FnMut(u32),
    {
        for (id, item) in self.items.iter().enumerate() {
            if item.is_live() {
                f(id as u32);
            }
        }
    }

    fn collect(&self, query: &Query) -> Yield {
        let mut result = self.pool.rent();
        self.query_with(query, |id| result.push(id));
        result
    }

    /// Explicit-stack descent: the root is always visited, children only when
    /// their bounds overlap the query, leaf items only when their own bounds
    /// do.
    pub(crate) fn query_with<F>(&self, query: &Query, mut f: F)
    where
        F: FnMut(u32),
    {
        let mut stack = NodeStack::new();
        stack.push(ROOT);

        while let Some(index) = stack.pop() {
            match self.nodes.get(index).kind {
                NodeKind::Empty => {}
                NodeKind::Leaf { head } => {
                    let mut cursor = Link::Next(head);
                    while let Link::Next(id) = cursor {
                        let item = &self.items[id as usize];
                        if query.overlaps_rect(&item.rect) {
                            f(id);
                        }
                        cursor = item.next;
                    }
                }
                NodeKind::Internal { first_child } => {
                    for child in first_child..first_child + 4 {
                        if query.overlaps_extent(self.nodes.get(child).extent) {
                            stack.push(child);
                        }
                    }
                }
            }
        }
    }
}
