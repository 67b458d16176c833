pub mod collision_detection;
pub mod error;
pub mod pool;
pub mod quadtree;


pub use error::{QuadtreeError, QuadtreeResult};
pub use geometry::shapes;
pub use pool::{BufferPool, Yield};
pub use quadtree::{Config, QuadTree};
