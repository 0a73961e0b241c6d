//! 9-bit matrix products on 8-bit tiles.
//!
//! SWIFFT works in Z_257, so residues need 9 bits. Each operand is split
//! into its low byte and its high bit; the four unsigned partial products
//! are shifted and summed:
//!
//! `a * b = (ah*bh << 16) + (ah*bl << 8) + (al*bh << 8) + al*bl`

use amx_tile::{DotKind, Matrix, TileEngine, TileError};

use crate::error::Result;

/// Largest value representable by a low byte plus one high bit.
pub const NINE_BIT_MAX: u16 = 0x1FF;

/// Split 9-bit values into `(low byte, high bit)` lane images.
///
/// Lanes are stored as the bit pattern of a `u8` in an `i8`; they must be
/// consumed with an unsigned [`DotKind`].
pub fn bit_split(values: &Matrix<u16>) -> Result<(Matrix<i8>, Matrix<i8>)> {
    if let Some((index, &value)) = values
        .as_slice()
        .iter()
        .enumerate()
        .find(|&(_, &v)| v > NINE_BIT_MAX)
    {
        return Err(TileError::OutOfRange {
            index,
            value: value as i64,
            min: 0,
            max: NINE_BIT_MAX as i64,
        }
        .into());
    }
    let low = values.map(|v| (v & 0xFF) as u8 as i8);
    let high = values.map(|v| ((v >> 8) & 0x01) as i8);
    Ok((low, high))
}

/// `a x b` for 9-bit inputs: `a` is `[m, 4k]`, `b` is `[4k, n]`.
///
/// Four `tdpbuud` tile products, combined with wrapping `u32` arithmetic.
pub fn bit_split_matmul(a: &Matrix<u16>, b: &Matrix<u16>, engine: &dyn TileEngine) -> Result<Matrix<u32>> {
    let (a_lo, a_hi) = bit_split(a)?;
    let (b_lo, b_hi) = bit_split(b)?;

    let hi_hi = a_hi.tile_matmul(&b_hi, DotKind::Uud, engine)?;
    let hi_lo = a_hi.tile_matmul(&b_lo, DotKind::Uud, engine)?;
    let lo_hi = a_lo.tile_matmul(&b_hi, DotKind::Uud, engine)?;
    let lo_lo = a_lo.tile_matmul(&b_lo, DotKind::Uud, engine)?;

    let out: Vec<u32> = hi_hi
        .as_slice()
        .iter()
        .zip(hi_lo.as_slice())
        .zip(lo_hi.as_slice())
        .zip(lo_lo.as_slice())
        .map(|(((&hh, &hl), &lh), &ll)| {
            ((hh as u32) << 16)
                .wrapping_add((hl as u32) << 8)
                .wrapping_add((lh as u32) << 8)
                .wrapping_add(ll as u32)
        })
        .collect();
    Ok(Matrix::from_vec(out, lo_lo.rows(), lo_lo.cols())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use amx_tile::EmulatedEngine;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn naive_u32(a: &Matrix<u16>, b: &Matrix<u16>) -> Matrix<u32> {
        Matrix::from_fn(a.rows(), b.cols(), |i, j| {
            (0..a.cols()).fold(0u32, |acc, p| {
                acc.wrapping_add(a.get(i, p) as u32 * b.get(p, j) as u32)
            })
        })
    }

    #[test]
    fn test_bit_split() {
        let m = Matrix::from_vec(vec![0u16, 255, 256, 257], 1, 4).unwrap();
        let (low, high) = bit_split(&m).unwrap();
        assert_eq!(low.as_slice(), &[0, -1, 0, 1]);
        assert_eq!(high.as_slice(), &[0, 0, 1, 1]);
    }

    #[test]
    fn test_bit_split_rejects_wide_values() {
        let m = Matrix::from_vec(vec![3u16, 512], 1, 2).unwrap();
        assert!(bit_split(&m).unwrap_err().is_out_of_range());
    }

    #[test]
    fn test_matches_naive_fuzz() {
        let engine = EmulatedEngine::new();
        let mut rng = StdRng::seed_from_u64(257);
        for _ in 0..200 {
            let a = Matrix::from_fn(16, 64, |_, _| rng.gen_range(0..257u16));
            let b = Matrix::from_fn(64, 16, |_, _| rng.gen_range(0..257u16));
            assert_eq!(bit_split_matmul(&a, &b, &engine).unwrap(), naive_u32(&a, &b));
        }
    }

    #[test]
    fn test_all_max_residues() {
        let engine = EmulatedEngine::new();
        let a = Matrix::filled(16, 64, 256u16);
        let b = Matrix::filled(64, 16, 256u16);
        let c = bit_split_matmul(&a, &b, &engine).unwrap();
        assert_eq!(c, Matrix::filled(16, 16, 64 * 256 * 256));
    }
}
