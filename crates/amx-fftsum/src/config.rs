use amx_tile::{Shape, TileError, TILE_COLSB, TILE_ROWS};

use crate::error::{FftsumError, Result};
use crate::key::{SWIFFT_M, SWIFFT_N};

/// Number of index-matched partition pairs the column dimension is cut into.
pub const PARTITIONS: usize = 4;

/// How wide input values are narrowed to signed 8-bit tile lanes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RangeCheck {
    /// Reject any value outside `[-128, 127]` with `OutOfRange`.
    #[default]
    Strict,
    /// Keep the low byte (two's-complement wrap).
    Wrapping,
}

/// Configuration for the Hadamard column-sum pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FftsumConfig {
    /// Rows of both input matrices (the summed dimension).
    pub m: usize,
    /// Columns of both input matrices (the output length).
    pub n: usize,
    /// Narrowing policy for wide inputs.
    pub range_check: RangeCheck,
}

impl FftsumConfig {
    /// The SWIFFT shape: 32x64 inputs, strict range checking.
    pub fn swifft() -> Self {
        Self::with_dims(SWIFFT_M, SWIFFT_N)
    }

    pub fn with_dims(m: usize, n: usize) -> Self {
        FftsumConfig {
            m,
            n,
            range_check: RangeCheck::Strict,
        }
    }

    pub fn with_range_check(mut self, range_check: RangeCheck) -> Self {
        self.range_check = range_check;
        self
    }

    /// Input shape both operands must have.
    pub fn input_shape(&self) -> Shape {
        Shape::new(self.m, self.n)
    }

    /// Columns per partition (`n / 4`), also the side of each product tile.
    pub fn partition_width(&self) -> usize {
        self.n / PARTITIONS
    }

    /// Check that `m x n` inputs split into four tile-compatible partitions.
    ///
    /// - `m` and `n` must divide evenly by 4 (`ShapeMismatch`);
    /// - a partition is `n / 4` rows of `m` bytes before padding, so
    ///   `n / 4 <= 16` and `m <= 64` (`DimensionTooLarge`).
    pub fn validate(&self) -> Result<()> {
        if self.m == 0 || self.n == 0 {
            return Err(FftsumError::InvalidConfig(format!(
                "dimensions must be non-zero, got {}",
                self.input_shape()
            )));
        }
        Shape::even_split(self.m, PARTITIONS)?;
        let width = Shape::even_split(self.n, PARTITIONS)?;

        if width > TILE_ROWS {
            return Err(TileError::DimensionTooLarge {
                what: "partition width",
                got: width,
                capacity: TILE_ROWS,
            }
            .into());
        }
        if self.m > TILE_COLSB {
            return Err(TileError::DimensionTooLarge {
                what: "summed dimension",
                got: self.m,
                capacity: TILE_COLSB,
            }
            .into());
        }
        Ok(())
    }
}

impl Default for FftsumConfig {
    fn default() -> Self {
        Self::swifft()
    }
}
