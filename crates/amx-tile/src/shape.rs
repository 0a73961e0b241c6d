use crate::error::{Result, TileError};
use std::fmt;

/// The logical extent of a two-dimensional, row-major matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: usize,
    cols: usize,
}

impl Shape {
    /// Create a new `rows x cols` shape.
    pub const fn new(rows: usize, cols: usize) -> Self {
        Shape { rows, cols }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of elements (rows * cols).
    pub fn numel(&self) -> usize {
        self.rows * self.cols
    }

    /// Row-major contiguous strides: `[cols, 1]`.
    pub fn strides(&self) -> [usize; 2] {
        [self.cols, 1]
    }

    /// Flat row-major offset of element `(r, c)`.
    pub fn offset(&self, r: usize, c: usize) -> usize {
        r * self.cols + c
    }

    /// The shape with rows and columns swapped.
    pub fn transposed(&self) -> Shape {
        Shape::new(self.cols, self.rows)
    }

    /// Returns the dimensions as a vector, for error reporting.
    pub fn dims(&self) -> Vec<usize> {
        vec![self.rows, self.cols]
    }

    /// Size of one of `parts` equal slices taken along `len`.
    ///
    /// Fails with `ShapeMismatch` when `len` does not divide evenly.
    pub fn even_split(len: usize, parts: usize) -> Result<usize> {
        if parts == 0 || len % parts != 0 {
            return Err(TileError::ShapeMismatch {
                expected: vec![parts * (len / parts.max(1))],
                got: vec![len],
            });
        }
        Ok(len / parts)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.rows, self.cols)
    }
}

impl From<(usize, usize)> for Shape {
    fn from((rows, cols): (usize, usize)) -> Self {
        Shape::new(rows, cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_shape() {
        let s = Shape::new(16, 64);
        assert_eq!(s.rows(), 16);
        assert_eq!(s.cols(), 64);
        assert_eq!(s.numel(), 1024);
        assert_eq!(s.dims(), vec![16, 64]);
    }

    #[test]
    fn test_strides_and_offset() {
        let s = Shape::new(3, 4);
        assert_eq!(s.strides(), [4, 1]);
        assert_eq!(s.offset(2, 1), 9);
    }

    #[test]
    fn test_transposed() {
        let s = Shape::new(32, 64).transposed();
        assert_eq!(s, Shape::new(64, 32));
    }

    #[test]
    fn test_even_split() {
        assert_eq!(Shape::even_split(64, 4).unwrap(), 16);
        assert_eq!(Shape::even_split(32, 4).unwrap(), 8);
    }

    #[test]
    fn test_even_split_error() {
        assert!(matches!(
            Shape::even_split(30, 4),
            Err(TileError::ShapeMismatch { .. })
        ));
        assert!(Shape::even_split(16, 0).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Shape::new(16, 64).to_string(), "[16, 64]");
    }
}
