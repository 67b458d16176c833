use super::storage::{Link, NodeKind, ROOT};
use super::types::{MaintenanceStack, RectExtent};
use super::QuadTree;
use tracing::{debug, trace};

impl QuadTree {
    /// Once-per-frame maintenance.
    ///
    /// Rebuilds the tree if any relocated center fell outside the world
    /// bounds, then refreshes every node's bounds bottom-up and splits leaves
    /// holding `node_capacity` or more items.
    pub fn update(&mut self) {
        if self.pending != self.world {
            self.rebuild();
        }
        self.refresh_nodes();
    }

    fn rebuild(&mut self) {
        let previous = self.world;
        let live: Vec<u32> = (0..self.items.len() as u32)
            .filter(|&id| self.contains(id))
            .collect();
        debug!(
            old = ?previous.to_rect(),
            new = ?self.pending.to_rect(),
            items = live.len(),
            "world bounds grew, rebuilding"
        );

        self.world = self.pending;
        self.reset_nodes();
        for &id in &live {
            self.items[id as usize].next = Link::Free;
        }
        self.len = 0;
        for id in live {
            let rect = self.items[id as usize].rect;
            self.relocate(id, rect);
        }
    }

    /// Drops every node, leaving a single empty root at the world center.
    pub(crate) fn reset_nodes(&mut self) {
        let (center_x, center_y) = self.world.center();
        self.nodes.reset(center_x, center_y);
    }

    /// Post-order walk: children are finished before their parent folds
    /// their bounds. Leaves split here push their new children onto the same
    /// stack.
    fn refresh_nodes(&mut self) {
        let mut stack = MaintenanceStack::new();
        stack.push((ROOT, false));

        while let Some((index, children_done)) = stack.pop() {
            let node = *self.nodes.get(index);
            match node.kind {
                NodeKind::Empty => {
                    self.nodes.get_mut(index).extent = RectExtent::EMPTY;
                }
                NodeKind::Internal { first_child } if children_done => {
                    let extent = (first_child..first_child + 4)
                        .map(|child| self.nodes.get(child).extent)
                        .fold(RectExtent::EMPTY, RectExtent::union);
                    self.nodes.get_mut(index).extent = extent;
                }
                NodeKind::Internal { first_child } => {
                    stack.push((index, true));
                    stack.extend((first_child..first_child + 4).map(|child| (child, false)));
                }
                NodeKind::Leaf { head } => {
                    let (extent, count) = self.leaf_extent(head);
                    if count >= self.node_capacity && node.depth < self.max_depth {
                        let first_child = self.subdivide(index, head, count);
                        stack.push((index, true));
                        stack.extend((first_child..first_child + 4).map(|child| (child, false)));
                    } else {
                        self.nodes.get_mut(index).extent = extent;
                    }
                }
            }
        }
    }

    /// Union of a leaf's item bounds and its item count.
    fn leaf_extent(&self, head: u32) -> (RectExtent, usize) {
        let mut extent = RectExtent::EMPTY;
        let mut count = 0;
        let mut cursor = Link::Next(head);
        while let Link::Next(id) = cursor {
            let item = &self.items[id as usize];
            extent = extent.union(RectExtent::from_rect(&item.rect));
            count += 1;
            cursor = item.next;
        }
        (extent, count)
    }

    /// Turns leaf `index` into an internal node with four fresh children and
    /// moves its items down, keeping their relative order. Returns the first
    /// child.
    fn subdivide(&mut self, index: u32, head: u32, count: usize) -> u32 {
        let parent = *self.nodes.get(index);
        let depth = parent.depth + 1;
        let (half_width, half_height) = self.world.half_size();
        let scale = 0.5f32.powi(depth as i32);
        let (offset_x, offset_y) = (half_width * scale, half_height * scale);
        let (center_x, center_y) = (parent.center_x, parent.center_y);

        let first_child = self.nodes.alloc_children(
            [
                (center_x - offset_x, center_y - offset_y),
                (center_x + offset_x, center_y - offset_y),
                (center_x - offset_x, center_y + offset_y),
                (center_x + offset_x, center_y + offset_y),
            ],
            depth,
        );
        self.nodes.get_mut(index).kind = NodeKind::Internal { first_child };

        let mut tails: [Option<u32>; 4] = [None; 4];
        let mut cursor = Link::Next(head);
        while let Link::Next(id) = cursor {
            let item = self.items[id as usize];
            cursor = item.next;
            let slot = parent.child_slot(item.rect.center_x(), item.rect.center_y());
            let child = first_child + slot;
            self.items[id as usize].next = Link::End;
            match tails[slot as usize] {
                Some(tail) => self.items[tail as usize].next = Link::Next(id),
                None => self.nodes.get_mut(child).kind = NodeKind::Leaf { head: id },
            }
            tails[slot as usize] = Some(id);
        }

        trace!(node = index, depth = parent.depth, items = count, "subdivided leaf");
        first_child
    }
}
