use std::sync::Arc;

use amx_tile::{DotKind, EmulatedEngine, Matrix, TileEngine, TileError, TILE_COLSB};

use crate::config::{FftsumConfig, RangeCheck, PARTITIONS};
use crate::error::Result;

/// One index-matched pair of padded operands.
///
/// `lhs` is slice `index` of `transpose(fftout)` padded on the right to
/// `width x 64`; `rhs` is slice `index` of `key` padded on the bottom to
/// `64 x width`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionPair {
    pub index: usize,
    pub lhs: Matrix<i8>,
    pub rhs: Matrix<i8>,
}

/// Computes `sum over rows of (fftout * key)` with one tile product per
/// partition pair.
///
/// The diagonal of `transpose(fftout) x key` is the wanted column sum. Only
/// the four diagonal blocks of that product are ever computed, each as a
/// `width x width` tile, and only their diagonals are kept.
#[derive(Debug, Clone)]
pub struct FftsumPipeline {
    config: FftsumConfig,
    engine: Arc<dyn TileEngine>,
}

impl FftsumPipeline {
    /// Create a pipeline running on the emulated tile unit.
    pub fn new(config: FftsumConfig) -> Result<Self> {
        Self::with_engine(config, Arc::new(EmulatedEngine::new()))
    }

    pub fn with_engine(config: FftsumConfig, engine: Arc<dyn TileEngine>) -> Result<Self> {
        config.validate()?;
        Ok(FftsumPipeline { config, engine })
    }

    pub fn config(&self) -> &FftsumConfig {
        &self.config
    }

    pub fn engine(&self) -> &dyn TileEngine {
        self.engine.as_ref()
    }

    /// Column sum of the Hadamard product of two `m x n` integer matrices.
    ///
    /// Values are narrowed to signed bytes according to the configured
    /// [`RangeCheck`] before any tile is loaded.
    pub fn hadamard_column_sum(&self, fftout: &Matrix<i32>, key: &Matrix<i32>) -> Result<Vec<i32>> {
        self.check_shapes(fftout.shape().dims(), key.shape().dims())?;
        let fftout = self.narrow(fftout)?;
        let key = self.narrow(key)?;
        self.hadamard_column_sum_i8(&fftout, &key)
    }

    /// Column sum of the Hadamard product of two `m x n` byte matrices.
    pub fn hadamard_column_sum_i8(&self, fftout: &Matrix<i8>, key: &Matrix<i8>) -> Result<Vec<i32>> {
        let pairs = self.partition_operands(fftout, key)?;
        let mut out = Vec::with_capacity(self.config.n);
        for pair in &pairs {
            let product = self.partition_product(pair)?;
            log::debug!("partition {}: {} product tile", pair.index, product.shape());
            out.extend(product.diagonal());
        }
        Ok(out)
    }

    /// Transpose, partition and zero-pad both operands.
    ///
    /// Pair `i` holds partition `i` of each operand; partitions are never
    /// cross-paired.
    pub fn partition_operands(&self, fftout: &Matrix<i8>, key: &Matrix<i8>) -> Result<Vec<PartitionPair>> {
        self.check_shapes(fftout.shape().dims(), key.shape().dims())?;
        let width = self.config.partition_width();
        log::debug!(
            "partitioning {} operands into {} pairs of {}x{}",
            fftout.shape(),
            PARTITIONS,
            width,
            TILE_COLSB
        );

        let lhs_parts = fftout.transpose().split_rows(PARTITIONS)?;
        let rhs_parts = key.split_cols(PARTITIONS)?;
        let mut pairs = Vec::with_capacity(PARTITIONS);
        for (index, (lhs, rhs)) in lhs_parts.iter().zip(rhs_parts.iter()).enumerate() {
            pairs.push(PartitionPair {
                index,
                lhs: lhs.pad_to(width, TILE_COLSB)?,
                rhs: rhs.pad_to(TILE_COLSB, width)?,
            });
        }
        Ok(pairs)
    }

    /// The `width x width` tile product of one pair, on a fresh accumulator.
    pub fn partition_product(&self, pair: &PartitionPair) -> Result<Matrix<i32>> {
        Ok(pair.lhs.tile_matmul(&pair.rhs, DotKind::Ssd, self.engine.as_ref())?)
    }

    fn check_shapes(&self, fftout: Vec<usize>, key: Vec<usize>) -> Result<()> {
        if fftout != key {
            return Err(TileError::ShapeMismatch {
                expected: fftout,
                got: key,
            }
            .into());
        }
        let expected = self.config.input_shape().dims();
        if fftout != expected {
            return Err(TileError::ShapeMismatch {
                expected,
                got: fftout,
            }
            .into());
        }
        Ok(())
    }

    fn narrow(&self, matrix: &Matrix<i32>) -> Result<Matrix<i8>> {
        match self.config.range_check {
            RangeCheck::Strict => Ok(matrix.to_i8_strict()?),
            RangeCheck::Wrapping => {
                let outside = matrix.count_outside_i8();
                if outside > 0 {
                    log::warn!("wrapping {} values outside the signed 8-bit range", outside);
                }
                Ok(matrix.to_i8_wrapping())
            }
        }
    }
}

/// Hadamard column sum of two equally shaped matrices on the emulated tile
/// unit, with strict range checking.
pub fn hadamard_column_sum(fftout: &Matrix<i32>, key: &Matrix<i32>) -> Result<Vec<i32>> {
    let config = FftsumConfig::with_dims(fftout.rows(), fftout.cols());
    FftsumPipeline::new(config)?.hadamard_column_sum(fftout, key)
}
