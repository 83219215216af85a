//! Errors produced when loading or decoding an IDX dataset.

use thiserror::Error;

use crate::error::TensorError;

/// Errors produced by the data module.
///
/// `Io` comes from reading files in [`IdxPathLoader`](super::IdxPathLoader).
/// `Truncated`, `BadMagic` and `CountMismatch` come from
/// [`Mnist::from_idx`](super::Mnist::from_idx) and mean the input is not a
/// matching pair of IDX image and label files. `Tensor` comes from
/// [`Mnist::to_tensors`](super::Mnist::to_tensors).
#[derive(Debug, Error)]
pub enum DataError {
    /// I/O error while reading an input file.
    #[error("data io: {0}")]
    Io(#[from] std::io::Error),

    /// A file is shorter than its header or its declared payload.
    #[error("{what} file truncated: need {needed} bytes, found {actual}")]
    Truncated {
        what: &'static str,
        needed: usize,
        actual: usize,
    },

    /// A header's magic number is not the expected IDX type code.
    #[error("{what} file has magic {found:#010x}, expected {expected:#010x}")]
    BadMagic {
        what: &'static str,
        expected: u32,
        found: u32,
    },

    /// The two files declare different record counts.
    #[error("image count {images} does not match label count {labels}")]
    CountMismatch { images: usize, labels: usize },

    /// The decoded set cannot be ingested as tensors (e.g. it is empty).
    #[error("data ingestion: {0}")]
    Tensor(#[from] TensorError),
}
