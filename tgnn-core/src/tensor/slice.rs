//! Leading-axis range slicing that shares nodes with the source tensor.

use std::ops::Range;

use super::Tensor;
use crate::error::{Result, TensorError};
use crate::shape::Shape;

impl Tensor {
    /// Sub-region selected by one half-open range per leading axis.
    ///
    /// Axes past `ranges.len()` are taken whole. The result shares its nodes
    /// with `self`, so gradients reaching the slice reach the original cells.
    ///
    /// # Errors
    ///
    /// [`TensorError::InvalidSlice`] when there are more ranges than axes, or a
    /// range is empty, reversed, or runs past its axis.
    ///
    /// # Example
    ///
    /// ```
    /// use tgnn_core::Tensor;
    ///
    /// let t = Tensor::new(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
    /// let s = t.slice(&[0..2, 1..3]).unwrap();
    /// assert_eq!(s.values(), vec![2.0, 3.0, 5.0, 6.0]);
    /// ```
    pub fn slice(&self, ranges: &[Range<usize>]) -> Result<Tensor> {
        let reject = |reason| TensorError::InvalidSlice {
            ranges: ranges.iter().map(|r| (r.start, r.end)).collect(),
            shape: self.dims().to_vec(),
            reason,
        };
        if ranges.len() > self.rank() {
            return Err(reject("more ranges than axes"));
        }

        let mut dims = Vec::with_capacity(self.rank());
        for (r, &size) in ranges.iter().zip(self.dims()) {
            if r.start > r.end {
                return Err(reject("start after end"));
            }
            if r.end > size {
                return Err(reject("end past axis size"));
            }
            if r.start == r.end {
                return Err(reject("empty range"));
            }
            dims.push(r.end - r.start);
        }
        dims.extend_from_slice(&self.dims()[ranges.len()..]);
        let shape = Shape::new(&dims)?;

        let data = shape
            .iter()
            .map(|mut pos| {
                for (p, r) in pos.iter_mut().zip(ranges) {
                    *p += r.start;
                }
                self.data[self.offset_of(&pos)].clone()
            })
            .collect();
        Tensor::from_nodes(data, shape)
    }
}
