use std::fmt::Debug;

use crate::dtype::DotKind;
use crate::error::{Result, TileError};
use crate::tile::{AccTile, ByteTile};

/// A tile unit able to execute the AMX-INT8 dot-product instructions.
///
/// Implementations must be bit-exact with the hardware contract:
///
/// - for every destination row `m < dst.rows()`, each dword `n` of that row
///   accumulates `src0.row[m].dword[k] . src1.row[k].dword[n]` over
///   `k in 0..src0.bytes_per_row() / 4`, four widened byte products per
///   dword, with wrapping 32-bit arithmetic;
/// - dwords past `dst.cols()` in a written row are zeroed;
/// - every physical row of `dst` at index `dst.rows()` and above is zeroed.
///
/// Shapes are checked with [`validate_operands`] before `dst` is touched.
pub trait TileEngine: Send + Sync + Debug {
    /// Returns the name of this engine (e.g. "emulated").
    fn name(&self) -> &str;

    /// `dst += src0 . src1` under `kind`'s lane signedness.
    fn dot_product(
        &self,
        kind: DotKind,
        dst: &mut AccTile,
        src0: &ByteTile,
        src1: &ByteTile,
    ) -> Result<()>;

    /// Signed-byte multiply-accumulate (`tdpbssd`).
    fn multiply_accumulate(&self, dst: &mut AccTile, src0: &ByteTile, src1: &ByteTile) -> Result<()> {
        self.dot_product(DotKind::Ssd, dst, src0, src1)
    }
}

/// Pre-flight shape checks shared by every engine.
///
/// - `src0` must hold a whole number of dwords per row;
/// - `src1` must have exactly `src0.bytes_per_row() / 4` rows;
/// - `dst` must have exactly as many dwords per row as `src1`.
pub fn validate_operands(dst: &AccTile, src0: &ByteTile, src1: &ByteTile) -> Result<()> {
    let src0_colsb = src0.bytes_per_row();
    if src0_colsb % 4 != 0 {
        return Err(TileError::ShapeMismatch {
            expected: vec![src0.rows(), src0_colsb.next_multiple_of(4)],
            got: src0.shape().dims(),
        });
    }

    let k_groups = src0_colsb / 4;
    if src1.rows() != k_groups {
        return Err(TileError::ShapeMismatch {
            expected: vec![k_groups, src1.cols()],
            got: src1.shape().dims(),
        });
    }

    let src1_colsb = src1.bytes_per_row();
    if src1_colsb % 4 != 0 || dst.cols() != src1_colsb / 4 {
        return Err(TileError::ShapeMismatch {
            expected: vec![dst.rows(), src1_colsb / 4],
            got: dst.shape().dims(),
        });
    }
    Ok(())
}
