use std::fmt::Debug;
use std::mem::size_of;

use crate::error::{Result, TileError};
use crate::matrix::Matrix;
use crate::shape::Shape;

/// Physical rows in every tile register.
pub const TILE_ROWS: usize = 16;
/// Physical bytes per tile row.
pub const TILE_COLSB: usize = 64;
/// Physical dwords per tile row.
pub const TILE_DWORDS: usize = TILE_COLSB / 4;

/// Element types a tile can hold.
pub trait TileElement: Copy + Default + Debug + PartialEq + Eq {}

impl TileElement for i8 {}
impl TileElement for i32 {}

/// A fixed-capacity tile register.
///
/// The physical buffer is always `TILE_ROWS x COLS` elements (1 KiB); the
/// logical extent (`rows`, `cols`) is tracked separately and never grows
/// the buffer. Cells outside the logical extent are still addressable
/// through [`Tile::row`], which is how the dot-product instructions observe
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile<T: TileElement, const COLS: usize> {
    cells: [[T; COLS]; TILE_ROWS],
    rows: usize,
    cols: usize,
}

/// Multiplicand tile: 16 rows of 64 signed bytes.
pub type ByteTile = Tile<i8, TILE_COLSB>;
/// Accumulator tile: 16 rows of 16 signed dwords.
pub type AccTile = Tile<i32, TILE_DWORDS>;

impl<T: TileElement, const COLS: usize> Tile<T, COLS> {
    pub const CAPACITY: Shape = Shape::new(TILE_ROWS, COLS);

    /// An all-zero tile configured with a logical `rows x cols` extent.
    pub fn zeroed(rows: usize, cols: usize) -> Result<Self> {
        check_extent::<COLS>(rows, cols)?;
        Ok(Tile {
            cells: [[T::default(); COLS]; TILE_ROWS],
            rows,
            cols,
        })
    }

    /// Load a row-major matrix; the logical extent becomes the matrix shape
    /// and every other physical cell is zero.
    pub fn load(matrix: &Matrix<T>) -> Result<Self> {
        let mut tile = Self::zeroed(matrix.rows(), matrix.cols())?;
        for r in 0..matrix.rows() {
            tile.cells[r][..matrix.cols()].copy_from_slice(matrix.row(r));
        }
        Ok(tile)
    }

    /// Load a contiguous row-major buffer under an explicit `rows x cols`
    /// tile configuration, regardless of the matrix's own shape.
    ///
    /// This is a reshape, never a transpose: byte `i` of the buffer lands
    /// in row `i / cols`, column `i % cols`.
    pub fn load_raw(matrix: &Matrix<T>, rows: usize, cols: usize) -> Result<Self> {
        Self::load(&matrix.reshape_row_major(rows, cols)?)
    }

    /// Copy the logical region out as a row-major matrix.
    pub fn store(&self) -> Matrix<T> {
        Matrix::from_fn(self.rows, self.cols, |r, c| self.cells[r][c])
    }

    /// Logical row count.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Logical element count per row.
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> Shape {
        Shape::new(self.rows, self.cols)
    }

    /// Logical bytes per row (`colsb` in the tile configuration).
    pub fn bytes_per_row(&self) -> usize {
        self.cols * size_of::<T>()
    }

    /// Physical row `r`, including rows past the logical extent.
    ///
    /// # Panics
    /// Panics if `r >= TILE_ROWS`.
    pub fn row(&self, r: usize) -> &[T; COLS] {
        &self.cells[r]
    }

    /// Mutable physical row `r`.
    ///
    /// # Panics
    /// Panics if `r >= TILE_ROWS`.
    pub fn row_mut(&mut self, r: usize) -> &mut [T; COLS] {
        &mut self.cells[r]
    }

    /// Element `(r, c)` of the physical buffer.
    pub fn get(&self, r: usize, c: usize) -> T {
        self.cells[r][c]
    }

    /// Zero the whole physical buffer (`tilezero`).
    pub fn zero(&mut self) {
        for row in self.cells.iter_mut() {
            row.fill(T::default());
        }
    }

    /// Zero every physical row at index `start` and above.
    pub fn zero_rows_from(&mut self, start: usize) {
        for row in self.cells.iter_mut().skip(start) {
            row.fill(T::default());
        }
    }
}

impl ByteTile {
    /// The 4-byte group at dword index `k` of physical row `m`.
    pub fn dword(&self, m: usize, k: usize) -> [i8; 4] {
        let row = &self.cells[m];
        let base = 4 * k;
        [row[base], row[base + 1], row[base + 2], row[base + 3]]
    }
}

fn check_extent<const COLS: usize>(rows: usize, cols: usize) -> Result<()> {
    if rows > TILE_ROWS {
        return Err(TileError::DimensionTooLarge {
            what: "tile rows",
            got: rows,
            capacity: TILE_ROWS,
        });
    }
    if cols > COLS {
        return Err(TileError::DimensionTooLarge {
            what: "tile columns",
            got: cols,
            capacity: COLS,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeroed_extent() {
        let t = AccTile::zeroed(4, 16).unwrap();
        assert_eq!(t.shape(), Shape::new(4, 16));
        assert_eq!(t.bytes_per_row(), 64);
        assert!(t.row(15).iter().all(|&v| v == 0));
        assert_eq!(AccTile::CAPACITY, Shape::new(16, 16));
        assert_eq!(ByteTile::CAPACITY, Shape::new(16, 64));
    }

    #[test]
    fn test_extent_too_large() {
        assert_eq!(
            ByteTile::zeroed(17, 64).unwrap_err(),
            TileError::DimensionTooLarge {
                what: "tile rows",
                got: 17,
                capacity: 16
            }
        );
        assert!(matches!(
            AccTile::zeroed(16, 17),
            Err(TileError::DimensionTooLarge { .. })
        ));
    }

    #[test]
    fn test_load_store() {
        let m = Matrix::from_fn(3, 5, |r, c| (r * 5 + c) as i8);
        let t = ByteTile::load(&m).unwrap();
        assert_eq!(t.shape(), Shape::new(3, 5));
        assert_eq!(t.get(2, 4), 14);
        // cells outside the logical extent are zero
        assert_eq!(t.get(0, 5), 0);
        assert!(t.row(3).iter().all(|&v| v == 0));
        assert_eq!(t.store(), m);
    }

    #[test]
    fn test_load_raw_is_reshape() {
        let m = Matrix::from_fn(64, 16, |r, c| (r + c) as i8);
        let t = ByteTile::load_raw(&m, 16, 64).unwrap();
        assert_eq!(t.shape(), Shape::new(16, 64));
        assert_eq!(t.row(1)[..], m.as_slice()[64..128]);
        assert!(ByteTile::load_raw(&m, 16, 63).is_err());
    }

    #[test]
    fn test_dword() {
        let m = Matrix::from_fn(2, 8, |r, c| (10 * r + c) as i8);
        let t = ByteTile::load(&m).unwrap();
        assert_eq!(t.dword(0, 0), [0, 1, 2, 3]);
        assert_eq!(t.dword(1, 1), [14, 15, 16, 17]);
    }

    #[test]
    fn test_zero_rows_from() {
        let mut t = AccTile::load(&Matrix::filled(16, 16, 9)).unwrap();
        t.zero_rows_from(10);
        assert!(t.row(9).iter().all(|&v| v == 9));
        assert!((10..TILE_ROWS).all(|r| t.row(r).iter().all(|&v| v == 0)));
        t.zero();
        assert!(t.row(0).iter().all(|&v| v == 0));
    }
}
