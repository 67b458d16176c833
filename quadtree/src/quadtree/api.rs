#[cfg(test)]
use super::storage::Node;
use super::storage::{Item, Link, ROOT};
use super::QuadTree;
use crate::pool::BufferPool;
use geometry::shapes::Rectangle;
use std::ops::Index;
use tracing::debug;

impl QuadTree {
    /// Bounds last passed to `relocate` for a tracked id.
    pub fn get(&self, id: u32) -> Option<Rectangle> {
        self.items
            .get(id as usize)
            .filter(|item| item.is_live())
            .map(|item| item.rect)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of id slots; valid ids are `0..capacity()`.
    pub fn capacity(&self) -> usize {
        self.items.len()
    }

    /// Resizes the id space. Tracked ids at or above `capacity` are removed.
    pub fn set_capacity(&mut self, capacity: usize) {
        if capacity < self.items.len() {
            let mut removed = 0usize;
            for id in capacity as u32..self.items.len() as u32 {
                if self.contains(id) {
                    self.delete(id);
                    removed += 1;
                }
            }
            if removed > 0 {
                debug!(capacity, removed, "capacity shrink removed tracked ids");
            }
        }
        self.items.resize(capacity, Item::FREE);
    }

    /// Forgets every item and collapses the tree to a single empty root. The
    /// world bounds are kept.
    pub fn clear(&mut self) {
        for item in &mut self.items {
            item.next = Link::Free;
        }
        self.len = 0;
        self.pending = self.world;
        self.reset_nodes();
    }

    /// World bounds the split points are currently laid out for.
    pub fn bounds(&self) -> Rectangle {
        self.world.to_rect()
    }

    /// Leaf currently holding `id`; usable as a hint for
    /// [`QuadTree::delete_with_hint`].
    pub fn locate(&self, id: u32) -> Option<u32> {
        let rect = self.get(id)?;
        Some(self.find_node(rect.center_x(), rect.center_y(), ROOT))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Appends the bounds of every non-empty node as of the last `update()`.
    pub fn all_node_bounding_boxes(&self, bounding_boxes: &mut Vec<Rectangle>) {
        bounding_boxes.extend(
            self.nodes
                .as_slice()
                .iter()
                .filter(|node| !node.extent.is_empty())
                .map(|node| node.extent.to_rect()),
        );
    }

    /// Pool the query results are rented from.
    pub fn pool(&self) -> &BufferPool {
        &self.pool
    }

    #[cfg(test)]
    pub(crate) fn nodes(&self) -> &[Node] {
        self.nodes.as_slice()
    }

    #[cfg(test)]
    pub(crate) fn items(&self) -> &[Item] {
        &self.items
    }

    #[cfg(test)]
    pub(crate) fn node_capacity(&self) -> usize {
        self.node_capacity
    }

    #[cfg(test)]
    pub(crate) fn max_depth(&self) -> u32 {
        self.max_depth
    }
}

/// Stored bounds of `id`, tracked or not.
///
/// # Panics
///
/// If `id` is not below [`QuadTree::capacity`].
impl Index<u32> for QuadTree {
    type Output = Rectangle;

    fn index(&self, id: u32) -> &Rectangle {
        &self.items[id as usize].rect
    }
}
