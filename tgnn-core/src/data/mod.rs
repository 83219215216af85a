//! Dataset loading: IDX image/label pairs (the MNIST distribution format).
//!
//! [`Mnist::from_idx`] decodes bytes already in memory; [`IdxPathLoader`] reads
//! them from disk first. Decoded sets enter the tensor layer through
//! [`Mnist::to_tensors`], which uses the ordinary literal ingestion path.

mod error;
mod impls;
mod types;

pub use error::DataError;
pub use impls::{load_from_paths, IdxPathLoader};
pub use types::{Mnist, IMAGE_MAGIC, LABEL_MAGIC};

/// Trait for loading an image/label set.
pub trait DataLoader {
    /// Loads and decodes the set.
    fn load(&self) -> Result<Mnist, DataError>;
}
