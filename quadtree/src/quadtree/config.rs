/// Deepest subdivision level accepted by [`Config::max_depth`]. Past this the
/// f32 child-center offsets stop halving meaningfully for practical worlds.
pub const MAX_DEPTH_LIMIT: u32 = 24;

#[derive(Debug, Clone)]
pub struct Config {
    /// Buffers a tree-owned result pool keeps for reuse.
    pub pool_size: usize,
    /// A leaf holding this many items splits on the next `update()`.
    pub node_capacity: usize,
    pub max_depth: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            pool_size: 16,
            node_capacity: 8,
            max_depth: 8,
        }
    }
}
