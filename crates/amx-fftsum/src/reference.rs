//! Straightforward reference computations in wrapping 32-bit arithmetic.
//!
//! These define the numbers the tiled pipeline must reproduce exactly.

use amx_tile::{Matrix, TileError};

use crate::error::Result;

fn wrapping_product<T: Copy + Into<i64>>(a: T, b: T) -> i32 {
    (a.into() * b.into()) as i32
}

/// `a x b` with wrapping accumulation.
pub fn naive_matmul<T>(a: &Matrix<T>, b: &Matrix<T>) -> Result<Matrix<i32>>
where
    T: Copy + Default + Into<i64>,
{
    if a.cols() != b.rows() {
        return Err(TileError::ShapeMismatch {
            expected: vec![a.cols(), b.cols()],
            got: b.shape().dims(),
        }
        .into());
    }
    Ok(Matrix::from_fn(a.rows(), b.cols(), |i, j| {
        (0..a.cols()).fold(0i32, |acc, p| {
            acc.wrapping_add(wrapping_product(a.get(i, p), b.get(p, j)))
        })
    }))
}

/// `sum over rows of (f * k)`, elementwise product then column sum.
pub fn hadamard_column_sum_naive<T>(f: &Matrix<T>, k: &Matrix<T>) -> Result<Vec<i32>>
where
    T: Copy + Default + Into<i64>,
{
    if f.shape() != k.shape() {
        return Err(TileError::ShapeMismatch {
            expected: f.shape().dims(),
            got: k.shape().dims(),
        }
        .into());
    }
    Ok((0..f.cols())
        .map(|c| {
            (0..f.rows()).fold(0i32, |acc, r| {
                acc.wrapping_add(wrapping_product(f.get(r, c), k.get(r, c)))
            })
        })
        .collect())
}

/// Diagonal of the full, unpartitioned product `transpose(f) x k`.
pub fn full_product_diagonal<T>(f: &Matrix<T>, k: &Matrix<T>) -> Result<Vec<i32>>
where
    T: Copy + Default + Into<i64>,
{
    Ok(naive_matmul(&f.transpose(), k)?.diagonal())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_naive_matmul() {
        let a = Matrix::from_vec(vec![1, 2, 3, 4], 2, 2).unwrap();
        let b = Matrix::from_vec(vec![5, 6, 7, 8], 2, 2).unwrap();
        let c = naive_matmul(&a, &b).unwrap();
        assert_eq!(c.as_slice(), &[19, 22, 43, 50]);
    }

    #[test]
    fn test_naive_matmul_mismatch() {
        let a = Matrix::<i32>::zeros(2, 3);
        assert!(naive_matmul(&a, &a).unwrap_err().is_shape_mismatch());
    }

    #[test]
    fn test_hadamard_column_sum() {
        let f = Matrix::from_vec(vec![1i8, 2, 3, 4, 5, 6], 2, 3).unwrap();
        let k = Matrix::from_vec(vec![1i8, 1, 1, 2, -2, 0], 2, 3).unwrap();
        assert_eq!(hadamard_column_sum_naive(&f, &k).unwrap(), vec![9, -8, 3]);
        assert_eq!(full_product_diagonal(&f, &k).unwrap(), vec![9, -8, 3]);
    }

    #[test]
    fn test_wraps_like_hardware() {
        let f = Matrix::from_vec(vec![i32::MAX, 1], 2, 1).unwrap();
        let k = Matrix::from_vec(vec![1, 1], 2, 1).unwrap();
        assert_eq!(hadamard_column_sum_naive(&f, &k).unwrap(), vec![i32::MIN]);
    }
}
