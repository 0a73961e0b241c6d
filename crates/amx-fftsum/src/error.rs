use amx_tile::TileError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FftsumError {
    #[error("tile error: {0}")]
    Tile(#[from] TileError),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("key partition {index} out of range (have {count})")]
    KeyPartition { index: usize, count: usize },
}

impl FftsumError {
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self, FftsumError::Tile(TileError::ShapeMismatch { .. }))
    }

    pub fn is_dimension_too_large(&self) -> bool {
        matches!(self, FftsumError::Tile(TileError::DimensionTooLarge { .. }))
    }

    pub fn is_out_of_range(&self) -> bool {
        matches!(self, FftsumError::Tile(TileError::OutOfRange { .. }))
    }
}

pub type Result<T> = std::result::Result<T, FftsumError>;
