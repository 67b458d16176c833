//! Loose quadtree over axis-aligned boxes keyed by caller-owned `u32` ids.
//!
//! Items are filed by the center of their box into the leaf whose split
//! point region contains it, and nodes keep the tight union of whatever ended
//! up below them. Split points never move; only `update()` refreshes bounds,
//! splits crowded leaves, and rebuilds the whole tree once items have wandered
//! outside the world bounds.

use crate::pool::BufferPool;
use std::fmt;

mod api;
mod config;
mod maintenance;
mod mutation;
mod query;
pub(crate) mod storage;
pub(crate) mod types;

pub use config::{Config, MAX_DEPTH_LIMIT};

use storage::{Item, NodeArena};
use types::RectExtent;

pub struct QuadTree {
    /// Bounds the split points were laid out for.
    world: RectExtent,
    /// `world` grown by every relocated box center; differs from `world` when
    /// the next `update()` has to rebuild.
    pending: RectExtent,
    nodes: NodeArena,
    items: Vec<Item>,
    len: usize,
    node_capacity: usize,
    max_depth: u32,
    pool: BufferPool,
}

impl fmt::Debug for QuadTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuadTree")
            .field("bounds", &self.world.to_rect())
            .field("len", &self.len)
            .field("capacity", &self.items.len())
            .field("nodes", &self.nodes.len())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}
