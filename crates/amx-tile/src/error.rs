use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TileError {
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch { expected: Vec<usize>, got: Vec<usize> },
    #[error("dimension too large: {what} is {got} but tile capacity is {capacity}")]
    DimensionTooLarge {
        what: &'static str,
        got: usize,
        capacity: usize,
    },
    #[error("value {value} at index {index} is outside [{min}, {max}]")]
    OutOfRange {
        index: usize,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, TileError>;
