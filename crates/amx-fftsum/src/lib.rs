//! `amx-fftsum` - the SWIFFT Hadamard column sum mapped onto AMX tiles.
//!
//! `sum over rows of (fftout * key)` for two `m x n` matrices equals the
//! diagonal of `transpose(fftout) x key`. The pipeline computes only the
//! four diagonal blocks of that product, one zero-padded tile product per
//! index-matched partition pair, and concatenates their diagonals.

pub mod bitsplit;
pub mod config;
pub mod error;
pub mod key;
pub mod pipeline;
pub mod reference;

pub use config::{FftsumConfig, RangeCheck, PARTITIONS};
pub use error::{FftsumError, Result};
pub use key::{padded_key_partition, pi_key, pi_key_i8, SWIFFT_M, SWIFFT_N};
pub use pipeline::{hadamard_column_sum, FftsumPipeline, PartitionPair};
