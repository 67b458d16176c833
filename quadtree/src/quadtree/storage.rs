use super::types::RectExtent;
use geometry::shapes::Rectangle;

pub(crate) const ROOT: u32 = 0;

/// Nodes reserved up front are capped so a large `max_depth` does not
/// reserve memory for a tree that will never be that full.
const MAX_NODE_RESERVE: usize = 1 << 16;

/// Position of an item in its node's intrusive list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Link {
    /// Slot not tracked.
    Free,
    /// Last item of the list.
    End,
    Next(u32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NodeKind {
    Empty,
    Leaf { head: u32 },
    /// Children live at `first_child..first_child + 4` in NW, NE, SW, SE order.
    Internal { first_child: u32 },
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Node {
    /// Tight bounds of everything below this node as of the last `update()`.
    pub(crate) extent: RectExtent,
    pub(crate) center_x: f32,
    pub(crate) center_y: f32,
    pub(crate) kind: NodeKind,
    pub(crate) depth: u32,
}

impl Node {
    #[inline(always)]
    pub(crate) fn new(center_x: f32, center_y: f32, depth: u32) -> Self {
        Self {
            extent: RectExtent::EMPTY,
            center_x,
            center_y,
            kind: NodeKind::Empty,
            depth,
        }
    }

    /// Child slot for a point: bit 0 = east, bit 1 = south.
    #[inline(always)]
    pub(crate) fn child_slot(&self, x: f32, y: f32) -> u32 {
        u32::from(x >= self.center_x) | (u32::from(y >= self.center_y) << 1)
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Item {
    pub(crate) rect: Rectangle,
    pub(crate) next: Link,
}

impl Item {
    pub(crate) const FREE: Item = Item {
        rect: Rectangle {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
        },
        next: Link::Free,
    };

    #[inline(always)]
    pub(crate) fn is_live(&self) -> bool {
        self.next != Link::Free
    }
}

/// Bump allocator over a flat node array. `len()` is the free-node pointer:
/// nodes are only ever appended in groups of four and are released all at
/// once by `reset`.
#[derive(Debug)]
pub(crate) struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub(crate) fn new(max_depth: u32, center_x: f32, center_y: f32) -> Self {
        let mut nodes = Vec::with_capacity(node_reserve(max_depth));
        nodes.push(Node::new(center_x, center_y, 0));
        Self { nodes }
    }

    /// Drops every node and starts over with a single empty root. Keeps the
    /// allocation.
    pub(crate) fn reset(&mut self, center_x: f32, center_y: f32) {
        self.nodes.clear();
        self.nodes.push(Node::new(center_x, center_y, 0));
    }

    /// Appends four contiguous nodes and returns the index of the first.
    pub(crate) fn alloc_children(&mut self, centers: [(f32, f32); 4], depth: u32) -> u32 {
        let first_child = self.nodes.len() as u32;
        for (center_x, center_y) in centers {
            self.nodes.push(Node::new(center_x, center_y, depth));
        }
        first_child
    }

    #[inline(always)]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline(always)]
    pub(crate) fn get(&self, index: u32) -> &Node {
        &self.nodes[index as usize]
    }

    #[inline(always)]
    pub(crate) fn get_mut(&mut self, index: u32) -> &mut Node {
        &mut self.nodes[index as usize]
    }

    pub(crate) fn as_slice(&self) -> &[Node] {
        &self.nodes
    }
}

/// `Σ 4^d` for `d` in `0..max_depth`, the node count of a tree filled to one
/// level above its depth limit.
pub(crate) fn node_reserve(max_depth: u32) -> usize {
    (0..max_depth)
        .map(|depth| 4usize.saturating_pow(depth))
        .fold(0usize, usize::saturating_add)
        .clamp(1, MAX_NODE_RESERVE)
}
