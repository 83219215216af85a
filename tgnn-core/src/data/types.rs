//! [`Mnist`]: an image/label set decoded from the IDX binary format.

use tracing::debug;

use super::DataError;
use crate::tensor::Tensor;

/// Magic number of an IDX file of unsigned bytes with 3 dimensions (images).
pub const IMAGE_MAGIC: u32 = 0x0000_0803;
/// Magic number of an IDX file of unsigned bytes with 1 dimension (labels).
pub const LABEL_MAGIC: u32 = 0x0000_0801;

const IMAGE_HEADER_LEN: usize = 16;
const LABEL_HEADER_LEN: usize = 8;

/// Decoded images (each `rows * cols` bytes, row-major) and their labels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mnist {
    pub images: Vec<Vec<u8>>,
    pub labels: Vec<u8>,
    pub rows: usize,
    pub cols: usize,
}

impl Mnist {
    /// Decodes a pair of IDX files already read into memory.
    ///
    /// Image header: magic `0x803`, count, rows, cols (big-endian `u32` each).
    /// Label header: magic `0x801`, count. Bytes past the declared payload are
    /// ignored.
    ///
    /// # Errors
    ///
    /// - [`DataError::Truncated`] when a header or payload is short.
    /// - [`DataError::BadMagic`] when a magic number is wrong.
    /// - [`DataError::CountMismatch`] when the counts differ.
    pub fn from_idx(image_bytes: &[u8], label_bytes: &[u8]) -> Result<Self, DataError> {
        check_len("image", image_bytes, IMAGE_HEADER_LEN)?;
        check_len("label", label_bytes, LABEL_HEADER_LEN)?;
        check_magic("image", image_bytes, IMAGE_MAGIC)?;
        check_magic("label", label_bytes, LABEL_MAGIC)?;

        let n_images = be_u32(image_bytes, 4) as usize;
        let n_labels = be_u32(label_bytes, 4) as usize;
        if n_images != n_labels {
            return Err(DataError::CountMismatch {
                images: n_images,
                labels: n_labels,
            });
        }
        let rows = be_u32(image_bytes, 8) as usize;
        let cols = be_u32(image_bytes, 12) as usize;
        let size = rows * cols;

        let image_end = n_images
            .checked_mul(size)
            .and_then(|n| n.checked_add(IMAGE_HEADER_LEN))
            .unwrap_or(usize::MAX);
        check_len("image", image_bytes, image_end)?;
        check_len("label", label_bytes, LABEL_HEADER_LEN + n_labels)?;

        let payload = &image_bytes[IMAGE_HEADER_LEN..image_end];
        let images = if size == 0 {
            vec![Vec::new(); n_images]
        } else {
            payload.chunks_exact(size).map(<[u8]>::to_vec).collect()
        };
        let labels = label_bytes[LABEL_HEADER_LEN..LABEL_HEADER_LEN + n_labels].to_vec();

        debug!(count = n_images, rows, cols, "decoded idx set");
        Ok(Self {
            images,
            labels,
            rows,
            cols,
        })
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Images as a `[n, rows * cols]` tensor and labels as `[n]`, both of fresh leaves.
    ///
    /// # Errors
    ///
    /// [`DataError::Tensor`] when the set is empty or images have no pixels.
    pub fn to_tensors(&self) -> Result<(Tensor, Tensor), DataError> {
        let images = Tensor::new(&self.images)?;
        let labels = Tensor::new(&self.labels)?;
        Ok((images, labels))
    }
}

fn check_len(what: &'static str, bytes: &[u8], needed: usize) -> Result<(), DataError> {
    if bytes.len() < needed {
        return Err(DataError::Truncated {
            what,
            needed,
            actual: bytes.len(),
        });
    }
    Ok(())
}

fn check_magic(what: &'static str, bytes: &[u8], expected: u32) -> Result<(), DataError> {
    let found = be_u32(bytes, 0);
    if found != expected {
        return Err(DataError::BadMagic {
            what,
            expected,
            found,
        });
    }
    Ok(())
}

/// Big-endian `u32` at `at`; the caller has checked the length.
fn be_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}
