pub mod dpbd;

use crate::backend::{validate_operands, TileEngine};
use crate::dtype::DotKind;
use crate::error::Result;
use crate::tile::{AccTile, ByteTile, TILE_DWORDS};

use dpbd::dpbd;

/// Pure-Rust emulation of the AMX-INT8 tile unit.
///
/// Follows the instruction pseudocode row by row: each destination row is
/// copied into a working row, updated across every `(k, n)` pair, then
/// written back before the next row is read.
#[derive(Debug, Clone)]
pub struct EmulatedEngine;

impl EmulatedEngine {
    pub fn new() -> Self {
        EmulatedEngine
    }
}

impl Default for EmulatedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TileEngine for EmulatedEngine {
    fn name(&self) -> &str {
        "emulated"
    }

    fn dot_product(
        &self,
        kind: DotKind,
        dst: &mut AccTile,
        src0: &ByteTile,
        src1: &ByteTile,
    ) -> Result<()> {
        validate_operands(dst, src0, src1)?;
        log::trace!(
            "{}: dst {} += src0 {} . src1 {}",
            kind,
            dst.shape(),
            src0.shape(),
            src1.shape()
        );

        let k_groups = src0.bytes_per_row() / 4;
        let n_dwords = dst.cols();
        for m in 0..dst.rows() {
            let mut tmp = *dst.row(m);
            for k in 0..k_groups {
                let x = src0.dword(m, k);
                for (n, acc) in tmp.iter_mut().enumerate().take(n_dwords) {
                    *acc = dpbd(kind, *acc, x, src1.dword(k, n));
                }
            }
            write_row_and_zero(dst, m, &tmp, n_dwords);
        }
        dst.zero_rows_from(dst.rows());
        Ok(())
    }
}

fn write_row_and_zero(dst: &mut AccTile, m: usize, tmp: &[i32; TILE_DWORDS], n_dwords: usize) {
    let row = dst.row_mut(m);
    row[..n_dwords].copy_from_slice(&tmp[..n_dwords]);
    row[n_dwords..].fill(0);
}
