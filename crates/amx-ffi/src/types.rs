use amx_fftsum::{FftsumError, RangeCheck};
use amx_tile::{DotKind, TileError};

/// Status codes returned by all FFI functions.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AmxStatus {
    Ok = 0,
    ErrorInvalidArgument = 1,
    ErrorShapeMismatch = 2,
    ErrorDimensionTooLarge = 3,
    ErrorOutOfRange = 4,
    ErrorInternal = 5,
}

impl From<&TileError> for AmxStatus {
    fn from(err: &TileError) -> Self {
        match err {
            TileError::ShapeMismatch { .. } => AmxStatus::ErrorShapeMismatch,
            TileError::DimensionTooLarge { .. } => AmxStatus::ErrorDimensionTooLarge,
            TileError::OutOfRange { .. } => AmxStatus::ErrorOutOfRange,
            TileError::Other(_) => AmxStatus::ErrorInternal,
        }
    }
}

impl From<&FftsumError> for AmxStatus {
    fn from(err: &FftsumError) -> Self {
        match err {
            FftsumError::Tile(tile) => tile.into(),
            FftsumError::InvalidConfig(_) | FftsumError::KeyPartition { .. } => {
                AmxStatus::ErrorInvalidArgument
            }
        }
    }
}

/// Dot-product instruction selector.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub enum AmxDotKind {
    Ssd = 0,
    Sud = 1,
    Usd = 2,
    Uud = 3,
}

impl From<AmxDotKind> for DotKind {
    fn from(kind: AmxDotKind) -> Self {
        match kind {
            AmxDotKind::Ssd => DotKind::Ssd,
            AmxDotKind::Sud => DotKind::Sud,
            AmxDotKind::Usd => DotKind::Usd,
            AmxDotKind::Uud => DotKind::Uud,
        }
    }
}

/// Narrowing policy for wide inputs.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub enum AmxRangeCheck {
    Strict = 0,
    Wrapping = 1,
}

impl From<AmxRangeCheck> for RangeCheck {
    fn from(check: AmxRangeCheck) -> Self {
        match check {
            AmxRangeCheck::Strict => RangeCheck::Strict,
            AmxRangeCheck::Wrapping => RangeCheck::Wrapping,
        }
    }
}
