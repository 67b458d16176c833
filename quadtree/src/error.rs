use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuadtreeError {
    InvalidRectangleDims { width: f32, height: f32 },
    InvalidRectExtent {
        min_x: f32,
        min_y: f32,
        max_x: f32,
        max_y: f32,
    },
    InvalidNodeCapacity { node_capacity: usize },
    InvalidMaxDepth { max_depth: u32, limit: u32 },
}

pub type QuadtreeResult<T> = Result<T, QuadtreeError>;

impl fmt::Display for QuadtreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuadtreeError::InvalidRectangleDims { width, height } => {
                write!(
                    f,
                    "rectangle width/height must be finite and non-negative (width: {}, height: {})",
                    width, height
                )
            }
            QuadtreeError::InvalidRectExtent {
                min_x,
                min_y,
                max_x,
                max_y,
            } => {
                write!(
                    f,
                    "rectangle extents must be finite with min <= max (min_x: {}, min_y: {}, max_x: {}, max_y: {})",
                    min_x, min_y, max_x, max_y
                )
            }
            QuadtreeError::InvalidNodeCapacity { node_capacity } => {
                write!(
                    f,
                    "node capacity must be at least 1 (node_capacity: {})",
                    node_capacity
                )
            }
            QuadtreeError::InvalidMaxDepth { max_depth, limit } => {
                write!(
                    f,
                    "max depth must not exceed {} (max_depth: {})",
                    limit, max_depth
                )
            }
        }
    }
}

impl std::error::Error for QuadtreeError {}
