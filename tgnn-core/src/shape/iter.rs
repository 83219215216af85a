//! Lazy position iterators over a shape.

use std::iter::FusedIterator;

use super::{Position, Shape};

/// Row-major walk over every position of a shape.
///
/// Finite and lazy; calling [`Shape::iter`] again restarts from the first
/// position, and a clone continues independently from where it was taken.
#[derive(Clone, Debug)]
pub struct ShapeIter {
    shape: Shape,
    next: Option<Position>,
    remaining: usize,
}

impl ShapeIter {
    pub(super) fn new(shape: Shape, start: usize) -> Self {
        let total = shape.numel();
        let next = (start < total).then(|| shape.unflatten(start));
        Self {
            remaining: total.saturating_sub(start),
            shape,
            next,
        }
    }

    /// The shape being walked.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }
}

impl Iterator for ShapeIter {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        let current = self.next.take()?;
        self.remaining -= 1;

        // odometer step: bump the last axis, carrying leftward
        let mut following = current.clone();
        let dims = self.shape.dims();
        for axis in (0..following.len()).rev() {
            following[axis] += 1;
            if following[axis] < dims[axis] {
                self.next = Some(following);
                return Some(current);
            }
            following[axis] = 0;
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ShapeIter {}
impl FusedIterator for ShapeIter {}

/// Positions along one axis through a fixed position.
///
/// Yields `pos` with `pos[axis]` replaced by `0, 1, .., size - 1`.
#[derive(Clone, Debug)]
pub struct AxisIter {
    pos: Position,
    axis: usize,
    index: usize,
    size: usize,
}

impl AxisIter {
    pub(super) fn new(pos: Position, axis: usize, size: usize) -> Self {
        Self {
            pos,
            axis,
            index: 0,
            size,
        }
    }
}

impl Iterator for AxisIter {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        if self.index >= self.size {
            return None;
        }
        let mut pos = self.pos.clone();
        pos[self.axis] = self.index;
        self.index += 1;
        Some(pos)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.size - self.index.min(self.size);
        (n, Some(n))
    }
}

impl ExactSizeIterator for AxisIter {}
impl FusedIterator for AxisIter {}

#[cfg(test)]
mod tests {
    use super::super::Shape;
    use crate::error::TensorError;

    #[test]
    fn iter_yields_row_major_positions() {
        let s = Shape::new(&[2, 3]).unwrap();
        let all: Vec<_> = s.iter().collect();
        assert_eq!(
            all,
            vec![
                vec![0, 0],
                vec![0, 1],
                vec![0, 2],
                vec![1, 0],
                vec![1, 1],
                vec![1, 2],
            ]
        );
    }

    #[test]
    fn iter_is_exact_size_and_restartable() {
        let s = Shape::new(&[4, 3, 2]).unwrap();
        let mut it = s.iter();
        assert_eq!(it.len(), 24);
        it.next();
        assert_eq!(it.len(), 23);
        assert_eq!(s.iter().count(), 24);
        assert_eq!(s.iter().next(), Some(vec![0, 0, 0]));
    }

    #[test]
    fn iter_matches_unflatten() {
        let s = Shape::new(&[3, 1, 4]).unwrap();
        for (offset, pos) in s.iter().enumerate() {
            assert_eq!(s.unflatten(offset), pos);
        }
    }

    #[test]
    fn iter_from_starts_mid_shape() {
        let s = Shape::new(&[2, 2]).unwrap();
        let rest: Vec<_> = s.iter_from(&[0, 1]).unwrap().collect();
        assert_eq!(rest, vec![vec![0, 1], vec![1, 0], vec![1, 1]]);
        assert!(s.iter_from(&[2, 0]).is_err());
    }

    #[test]
    fn iter_dimension_varies_one_axis() {
        let s = Shape::new(&[4, 3, 2]).unwrap();
        let got: Vec<_> = s.iter_dimension(&[0, 1, 1], 0).unwrap().collect();
        assert_eq!(
            got,
            vec![vec![0, 1, 1], vec![1, 1, 1], vec![2, 1, 1], vec![3, 1, 1]]
        );

        let got: Vec<_> = s.iter_dimension(&[3, 0, 1], 1).unwrap().collect();
        assert_eq!(got, vec![vec![3, 0, 1], vec![3, 1, 1], vec![3, 2, 1]]);
    }

    #[test]
    fn iter_dimension_rejects_bad_axis_and_position() {
        let s = Shape::new(&[4, 3, 2]).unwrap();
        assert!(matches!(
            s.iter_dimension(&[0, 0, 0], 3),
            Err(TensorError::InvalidAxis { axis: 3, rank: 3 })
        ));
        assert!(matches!(
            s.iter_dimension(&[0, 3, 0], 0),
            Err(TensorError::IndexOutOfBounds { .. })
        ));
    }
}
