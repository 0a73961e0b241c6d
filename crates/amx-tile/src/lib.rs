//! `amx-tile` - Software emulation of AMX-INT8 tile arithmetic.
//!
//! This crate provides:
//! - Fixed-capacity `Tile` registers with a separately tracked logical extent
//! - A row-major `Matrix` type with explicit reshape, transpose, padding and
//!   partitioning helpers
//! - VNNI packing for the right-hand operand of a tile matmul
//! - A `TileEngine` trait and a bit-exact `EmulatedEngine` implementing the
//!   `tdpb[su][su]d` dot-product-accumulate instructions

pub mod backend;
pub mod dtype;
pub mod emulator;
pub mod error;
pub mod matrix;
pub mod shape;
pub mod tile;
pub mod vnni;

// Re-export primary types at the crate root for convenience.
pub use backend::{validate_operands, TileEngine};
pub use dtype::DotKind;
pub use emulator::EmulatedEngine;
pub use error::{Result, TileError};
pub use matrix::Matrix;
pub use shape::Shape;
pub use tile::{AccTile, ByteTile, Tile, TileElement, TILE_COLSB, TILE_DWORDS, TILE_ROWS};
