//! [`DataLoader`](super::super::DataLoader) that reads an IDX image file and an IDX label file from disk.

use std::fs;
use std::path::Path;

use tracing::info;

use super::super::{DataError, DataLoader, Mnist};

/// Loads an image/label pair from two file paths.
#[derive(Clone, Debug)]
pub struct IdxPathLoader<P, Q> {
    pub images: P,
    pub labels: Q,
}

impl<P, Q> IdxPathLoader<P, Q>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    /// Creates a loader for the given image and label paths.
    #[must_use]
    pub fn new(images: P, labels: Q) -> Self {
        IdxPathLoader { images, labels }
    }
}

impl<P, Q> DataLoader for IdxPathLoader<P, Q>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    fn load(&self) -> Result<Mnist, DataError> {
        let image_bytes = fs::read(self.images.as_ref())?;
        let label_bytes = fs::read(self.labels.as_ref())?;
        let set = Mnist::from_idx(&image_bytes, &label_bytes)?;
        info!(
            images = %self.images.as_ref().display(),
            count = set.len(),
            "loaded idx set"
        );
        Ok(set)
    }
}

/// Convenience: load a set using [`IdxPathLoader`].
///
/// # Errors
///
/// - [`DataError::Io`] when either path cannot be read.
/// - Any decoding error of [`Mnist::from_idx`].
pub fn load_from_paths(
    images: impl AsRef<Path>,
    labels: impl AsRef<Path>,
) -> Result<Mnist, DataError> {
    IdxPathLoader::new(images, labels).load()
}
