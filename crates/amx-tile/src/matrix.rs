use crate::backend::TileEngine;
use crate::dtype::DotKind;
use crate::error::{Result, TileError};
use crate::shape::Shape;
use crate::tile::{AccTile, ByteTile};
use crate::vnni;

/// A dense, row-major integer matrix.
///
/// Consecutive elements of a row are contiguous; row `r` starts at offset
/// `r * cols`. This is the only layout tiles load from and store to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix<T> {
    data: Vec<T>,
    shape: Shape,
}

impl<T: Copy + Default> Matrix<T> {
    /// Create a matrix from row-major data.
    ///
    /// Fails with `ShapeMismatch` if `data.len() != rows * cols`.
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize) -> Result<Self> {
        let shape = Shape::new(rows, cols);
        if data.len() != shape.numel() {
            return Err(TileError::ShapeMismatch {
                expected: vec![shape.numel()],
                got: vec![data.len()],
            });
        }
        Ok(Matrix { data, shape })
    }

    /// Create a zero-filled matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, T::default())
    }

    /// Create a matrix with every element set to `value`.
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Matrix {
            data: vec![value; rows * cols],
            shape: Shape::new(rows, cols),
        }
    }

    /// Create a matrix whose element `(r, c)` is `f(r, c)`.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Matrix {
            data,
            shape: Shape::new(rows, cols),
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn rows(&self) -> usize {
        self.shape.rows()
    }

    pub fn cols(&self) -> usize {
        self.shape.cols()
    }

    /// The row-major backing buffer.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Element at `(r, c)`.
    ///
    /// # Panics
    /// Panics if `r >= rows()` or `c >= cols()`.
    pub fn get(&self, r: usize, c: usize) -> T {
        assert!(c < self.cols(), "column {} out of bounds for {}", c, self.shape);
        self.data[self.shape.offset(r, c)]
    }

    /// Set the element at `(r, c)`.
    ///
    /// # Panics
    /// Panics if `r >= rows()` or `c >= cols()`.
    pub fn set(&mut self, r: usize, c: usize, value: T) {
        assert!(c < self.cols(), "column {} out of bounds for {}", c, self.shape);
        let offset = self.shape.offset(r, c);
        self.data[offset] = value;
    }

    /// Row `r` as a contiguous slice.
    pub fn row(&self, r: usize) -> &[T] {
        let start = r * self.cols();
        &self.data[start..start + self.cols()]
    }

    /// Swap rows and columns: element `(r, c)` moves to `(c, r)`.
    ///
    /// This reorders memory. It is *not* interchangeable with
    /// [`Matrix::reshape_row_major`], even when the resulting shapes agree.
    pub fn transpose(&self) -> Matrix<T> {
        let (rows, cols) = (self.rows(), self.cols());
        let mut data = vec![T::default(); self.data.len()];
        for r in 0..rows {
            for c in 0..cols {
                data[c * rows + r] = self.data[r * cols + c];
            }
        }
        Matrix {
            data,
            shape: self.shape.transposed(),
        }
    }

    /// Reinterpret the same row-major buffer under a new shape.
    ///
    /// No element moves; only the row boundaries change. The total number
    /// of elements must remain the same.
    pub fn reshape_row_major(&self, rows: usize, cols: usize) -> Result<Matrix<T>> {
        let new_shape = Shape::new(rows, cols);
        if self.shape.numel() != new_shape.numel() {
            return Err(TileError::ShapeMismatch {
                expected: self.shape.dims(),
                got: new_shape.dims(),
            });
        }
        Ok(Matrix {
            data: self.data.clone(),
            shape: new_shape,
        })
    }

    /// Zero-extend on the trailing side (right and bottom) to `rows x cols`.
    ///
    /// The original region keeps its position and values.
    pub fn pad_to(&self, rows: usize, cols: usize) -> Result<Matrix<T>> {
        if rows < self.rows() || cols < self.cols() {
            return Err(TileError::ShapeMismatch {
                expected: vec![rows.max(self.rows()), cols.max(self.cols())],
                got: vec![rows, cols],
            });
        }
        let mut padded = Matrix::zeros(rows, cols);
        for r in 0..self.rows() {
            let start = r * cols;
            padded.data[start..start + self.cols()].copy_from_slice(self.row(r));
        }
        Ok(padded)
    }

    /// Cut into `parts` equal horizontal slices, top to bottom.
    pub fn split_rows(&self, parts: usize) -> Result<Vec<Matrix<T>>> {
        let slice_rows = Shape::even_split(self.rows(), parts)?;
        let slice_len = slice_rows * self.cols();
        Ok((0..parts)
            .map(|p| Matrix {
                data: self.data[p * slice_len..(p + 1) * slice_len].to_vec(),
                shape: Shape::new(slice_rows, self.cols()),
            })
            .collect())
    }

    /// Cut into `parts` equal vertical slices, left to right.
    pub fn split_cols(&self, parts: usize) -> Result<Vec<Matrix<T>>> {
        let slice_cols = Shape::even_split(self.cols(), parts)?;
        Ok((0..parts)
            .map(|p| {
                let first = p * slice_cols;
                Matrix::from_fn(self.rows(), slice_cols, |r, c| self.get(r, first + c))
            })
            .collect())
    }

    /// Elements `(k, k)` for `k` in `0..min(rows, cols)`, in row order.
    pub fn diagonal(&self) -> Vec<T> {
        (0..self.rows().min(self.cols()))
            .map(|k| self.get(k, k))
            .collect()
    }

    /// Apply `f` to every element, keeping the shape.
    pub fn map<U: Copy + Default>(&self, f: impl FnMut(T) -> U) -> Matrix<U> {
        Matrix {
            data: self.data.iter().copied().map(f).collect(),
            shape: self.shape,
        }
    }
}

impl<T: Copy + Default + Into<i64>> Matrix<T> {
    /// Narrow to signed 8-bit lanes, failing on the first element outside
    /// `[-128, 127]`.
    pub fn to_i8_strict(&self) -> Result<Matrix<i8>> {
        let mut data = Vec::with_capacity(self.data.len());
        for (index, &v) in self.data.iter().enumerate() {
            let wide: i64 = v.into();
            match i8::try_from(wide) {
                Ok(lane) => data.push(lane),
                Err(_) => {
                    return Err(TileError::OutOfRange {
                        index,
                        value: wide,
                        min: i8::MIN as i64,
                        max: i8::MAX as i64,
                    })
                }
            }
        }
        Ok(Matrix {
            data,
            shape: self.shape,
        })
    }

    /// Narrow to signed 8-bit lanes with two's-complement wraparound, the
    /// result of storing each value into an `int8_t`.
    pub fn to_i8_wrapping(&self) -> Matrix<i8> {
        self.map(|v| {
            let wide: i64 = v.into();
            wide as i8
        })
    }

    /// Number of elements outside `[-128, 127]`.
    pub fn count_outside_i8(&self) -> usize {
        self.data
            .iter()
            .filter(|&&v| {
                let wide: i64 = v.into();
                i8::try_from(wide).is_err()
            })
            .count()
    }
}

impl Matrix<i8> {
    /// Tile matrix product: `self` is `[m, 4k]`, `other` is `[4k, n]`, the
    /// result is `[m, n]`.
    ///
    /// `other` is VNNI-packed before it is loaded, so a single dot-product
    /// instruction yields the ordinary matrix product under `kind`'s lane
    /// interpretation.
    pub fn tile_matmul(
        &self,
        other: &Matrix<i8>,
        kind: DotKind,
        engine: &dyn TileEngine,
    ) -> Result<Matrix<i32>> {
        if self.cols() != other.rows() {
            return Err(TileError::ShapeMismatch {
                expected: vec![self.cols(), other.cols()],
                got: other.shape().dims(),
            });
        }
        let src0 = ByteTile::load(self)?;
        let src1 = ByteTile::load(&vnni::pack(other)?)?;
        let mut dst = AccTile::zeroed(self.rows(), other.cols())?;
        engine.dot_product(kind, &mut dst, &src0, &src1)?;
        Ok(dst.store())
    }
}
