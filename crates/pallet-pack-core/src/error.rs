use thiserror::Error;

/// Construction-time misuse only. `Packer::pack` itself is infallible and
/// always returns a complete `PackResult`: geometric rejection and
/// unplaced items are data, not errors.
#[derive(Debug, Error)]
pub enum PackError {
    #[error("invalid box dimensions: length/width/height must be > 0 (got {length}x{width}x{height})")]
    InvalidDimensions {
        length: i32,
        width: i32,
        height: i32,
    },

    #[error("invalid weight: must be > 0 (got {weight})")]
    InvalidWeight { weight: f64 },

    #[error("invalid pallet dimensions: width/depth/height must be > 0 (got {width}x{depth}x{height})")]
    InvalidPalletDimensions {
        width: i32,
        depth: i32,
        height: i32,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("nothing to pack: no pallet has been set")]
    NoPallet,
}

pub type Result<T> = std::result::Result<T, PackError>;
