//! VNNI layout conversion for the right-hand operand of a tile matmul.
//!
//! The dot-product instructions read `src1` as `K` rows of `N` dwords, each
//! dword holding four consecutive *rows* of the logical `4K x N` matrix for
//! one column. A plain row-major `4K x N` buffer loaded as-is computes
//! something else.

use crate::error::{Result, TileError};
use crate::matrix::Matrix;

/// Rows folded into one dword.
pub const VNNI_GROUP: usize = 4;

/// Convert a logical `[4K, N]` matrix to the `[K, 4N]` tile layout:
/// `packed[k][4n + i] = matrix[4k + i][n]`.
pub fn pack<T: Copy + Default>(matrix: &Matrix<T>) -> Result<Matrix<T>> {
    if matrix.rows() % VNNI_GROUP != 0 {
        return Err(TileError::ShapeMismatch {
            expected: vec![matrix.rows().next_multiple_of(VNNI_GROUP), matrix.cols()],
            got: matrix.shape().dims(),
        });
    }
    let n = matrix.cols();
    Ok(Matrix::from_fn(matrix.rows() / VNNI_GROUP, VNNI_GROUP * n, |k, j| {
        matrix.get(VNNI_GROUP * k + j % VNNI_GROUP, j / VNNI_GROUP)
    }))
}

/// Inverse of [`pack`]: `[K, 4N]` back to `[4K, N]`.
pub fn unpack<T: Copy + Default>(packed: &Matrix<T>) -> Result<Matrix<T>> {
    if packed.cols() % VNNI_GROUP != 0 {
        return Err(TileError::ShapeMismatch {
            expected: vec![packed.rows(), packed.cols().next_multiple_of(VNNI_GROUP)],
            got: packed.shape().dims(),
        });
    }
    Ok(Matrix::from_fn(
        packed.rows() * VNNI_GROUP,
        packed.cols() / VNNI_GROUP,
        |r, n| packed.get(r / VNNI_GROUP, VNNI_GROUP * n + r % VNNI_GROUP),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_layout() {
        // 8x2 matrix with element (r, c) = 10r + c
        let m = Matrix::from_fn(8, 2, |r, c| (10 * r + c) as i32);
        let p = pack(&m).unwrap();
        assert_eq!(p.shape().dims(), vec![2, 8]);
        assert_eq!(p.row(0), &[0, 10, 20, 30, 1, 11, 21, 31]);
        assert_eq!(p.row(1), &[40, 50, 60, 70, 41, 51, 61, 71]);
    }

    #[test]
    fn test_unpack_inverts_pack() {
        let m = Matrix::from_fn(64, 16, |r, c| (r * 3 + c * 7) as i8);
        assert_eq!(unpack(&pack(&m).unwrap()).unwrap(), m);
    }

    #[test]
    fn test_pack_requires_row_groups() {
        let m = Matrix::<i8>::zeros(6, 16);
        assert_eq!(
            pack(&m).unwrap_err(),
            TileError::ShapeMismatch {
                expected: vec![8, 16],
                got: vec![6, 16]
            }
        );
        assert!(unpack(&Matrix::<i8>::zeros(2, 6)).is_err());
    }
}
