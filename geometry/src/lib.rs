pub mod geometry;
pub mod shapes;

pub use geometry::Quad;
pub use shapes::{Circle, OrientedRect, Rectangle, Shape};
