use super::storage::{Item, Link, NodeArena, NodeKind, ROOT};
use super::types::{validate_rect_dims, RectExtent};
use super::{Config, QuadTree, MAX_DEPTH_LIMIT};
use crate::error::{QuadtreeError, QuadtreeResult};
use crate::pool::BufferPool;
use geometry::shapes::Rectangle;

impl QuadTree {
    /// A tree over `bounds` tracking ids in `0..capacity`, with the default
    /// [`Config`].
    pub fn new(bounds: Rectangle, capacity: usize) -> QuadtreeResult<Self> {
        Self::new_with_config(bounds, capacity, Config::default())
    }

    pub fn new_with_config(
        bounds: Rectangle,
        capacity: usize,
        config: Config,
    ) -> QuadtreeResult<Self> {
        let pool = BufferPool::new(capacity, config.pool_size);
        Self::new_with_pool(bounds, capacity, config, pool)
    }

    /// Like [`QuadTree::new_with_config`], but query results are rented from
    /// `pool` instead of a pool owned by the tree.
    pub fn new_with_pool(
        bounds: Rectangle,
        capacity: usize,
        config: Config,
        pool: BufferPool,
    ) -> QuadtreeResult<Self> {
        validate_rect_dims(bounds.width, bounds.height)?;
        let world = RectExtent::from_min_max(bounds.x, bounds.y, bounds.right(), bounds.bottom())?;
        if config.node_capacity == 0 {
            return Err(QuadtreeError::InvalidNodeCapacity {
                node_capacity: config.node_capacity,
            });
        }
        if config.max_depth > MAX_DEPTH_LIMIT {
            return Err(QuadtreeError::InvalidMaxDepth {
                max_depth: config.max_depth,
                limit: MAX_DEPTH_LIMIT,
            });
        }
        let (center_x, center_y) = world.center();
        Ok(Self {
            world,
            pending: world,
            nodes: NodeArena::new(config.max_depth, center_x, center_y),
            items: vec![Item::FREE; capacity],
            len: 0,
            node_capacity: config.node_capacity,
            max_depth: config.max_depth,
            pool,
        })
    }

    /// Starts tracking `id` at `rect`, or moves it there.
    ///
    /// Node bounds are not refreshed until the next [`QuadTree::update`].
    ///
    /// # Panics
    ///
    /// If `id` is not below [`QuadTree::capacity`].
    pub fn relocate(&mut self, id: u32, rect: Rectangle) {
        let (center_x, center_y) = (rect.center_x(), rect.center_y());
        self.pending.include_point(center_x, center_y);
        let destination = self.find_node(center_x, center_y, ROOT);

        let item = self.items[id as usize];
        if item.is_live() {
            let current = self.find_node(item.rect.center_x(), item.rect.center_y(), ROOT);
            if current == destination {
                self.items[id as usize].rect = rect;
                return;
            }
            self.unlink(current, id);
        } else {
            self.len += 1;
        }

        self.items[id as usize].rect = rect;
        self.link(destination, id);
    }

    pub fn relocate_raw(&mut self, id: u32, x: f32, y: f32, width: f32, height: f32) {
        self.relocate(id, Rectangle::new(x, y, width, height));
    }

    /// Stops tracking `id`. Untracked or out-of-range ids are ignored.
    pub fn delete(&mut self, id: u32) {
        self.delete_with_hint(id, ROOT);
    }

    /// Like [`QuadTree::delete`], but the owning leaf is searched for starting
    /// at `node_hint`, typically a value from [`QuadTree::locate`]. A stale
    /// hint falls back to a search from the root.
    pub fn delete_with_hint(&mut self, id: u32, node_hint: u32) {
        if !self.contains(id) {
            return;
        }
        let rect = self.items[id as usize].rect;
        let (center_x, center_y) = (rect.center_x(), rect.center_y());
        let start = if (node_hint as usize) < self.nodes.len() {
            node_hint
        } else {
            ROOT
        };
        let node = self.find_node(center_x, center_y, start);
        if !self.unlink(node, id) {
            let node = self.find_node(center_x, center_y, ROOT);
            self.unlink(node, id);
        }
        self.items[id as usize].next = Link::Free;
        self.len -= 1;
    }

    pub fn contains(&self, id: u32) -> bool {
        self.items
            .get(id as usize)
            .is_some_and(|item| item.is_live())
    }

    /// Descends from `start` by comparing `(x, y)` against each internal
    /// node's split point and returns the first non-internal node reached.
    #[inline]
    pub(crate) fn find_node(&self, x: f32, y: f32, start: u32) -> u32 {
        let mut index = start;
        loop {
            let node = self.nodes.get(index);
            match node.kind {
                NodeKind::Internal { first_child } => {
                    index = first_child + node.child_slot(x, y);
                }
                NodeKind::Empty | NodeKind::Leaf { .. } => return index,
            }
        }
    }

    /// Appends `id` at the tail of `node`'s item list.
    pub(crate) fn link(&mut self, node: u32, id: u32) {
        self.items[id as usize].next = Link::End;
        match self.nodes.get(node).kind {
            NodeKind::Empty => {
                self.nodes.get_mut(node).kind = NodeKind::Leaf { head: id };
            }
            NodeKind::Leaf { head } => {
                let mut tail = head;
                while let Link::Next(next) = self.items[tail as usize].next {
                    tail = next;
                }
                self.items[tail as usize].next = Link::Next(id);
            }
            NodeKind::Internal { .. } => {
                debug_assert!(false, "items are only linked into leaves");
            }
        }
    }

    /// Removes `id` from `node`'s item list. Returns false when it is not
    /// there.
    pub(crate) fn unlink(&mut self, node: u32, id: u32) -> bool {
        let NodeKind::Leaf { head } = self.nodes.get(node).kind else {
            return false;
        };
        let after = self.items[id as usize].next;
        if head == id {
            self.nodes.get_mut(node).kind = match after {
                Link::Next(next) => NodeKind::Leaf { head: next },
                Link::End | Link::Free => NodeKind::Empty,
            };
            return true;
        }

        let mut previous = head;
        while let Link::Next(next) = self.items[previous as usize].next {
            if next == id {
                self.items[previous as usize].next = after;
                return true;
            }
            previous = next;
        }
        false
    }
}
