//! Linear-offset iteration for broadcasting a source shape onto a larger
//! output shape.

use super::compute_strides;

/// Yields, for every position of `out_shape` in row-major order, the linear
/// offset of the corresponding element in a contiguous source of shape
/// `src_shape`.
///
/// `src_shape` must broadcast onto `out_shape` (trailing alignment, each
/// dimension equal or 1); callers validate this with
/// [`promote_shape`](crate::promote::promote_shape) first.
#[derive(Debug, Clone)]
pub(crate) struct BroadcastIter {
    shape: Vec<usize>,
    /// Source strides aligned to `shape`; 0 along broadcast dimensions.
    strides: Vec<usize>,
    index: Vec<usize>,
    offset: usize,
    remaining: usize,
}

impl BroadcastIter {
    pub(crate) fn new(src_shape: &[usize], out_shape: &[usize]) -> Self {
        let ndim = out_shape.len();
        let src_strides = compute_strides(src_shape);
        let lead = ndim - src_shape.len();

        let mut strides = vec![0usize; ndim];
        for (k, (&extent, &stride)) in src_shape.iter().zip(src_strides.iter()).enumerate() {
            if extent != 1 {
                strides[lead + k] = stride;
            }
        }

        Self {
            shape: out_shape.to_vec(),
            strides,
            index: vec![0; ndim],
            offset: 0,
            remaining: out_shape.iter().product(),
        }
    }
}

impl Iterator for BroadcastIter {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.offset;
        self.remaining -= 1;

        // Increment the output index (odometer style)
        for d in (0..self.shape.len()).rev() {
            self.index[d] += 1;
            self.offset += self.strides[d];
            if self.index[d] < self.shape[d] {
                break;
            }
            self.offset -= self.strides[d] * self.index[d];
            self.index[d] = 0;
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for BroadcastIter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_shape() {
        let offsets: Vec<usize> = BroadcastIter::new(&[2, 3], &[2, 3]).collect();
        assert_eq!(offsets, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_row_broadcast() {
        let offsets: Vec<usize> = BroadcastIter::new(&[3], &[2, 3]).collect();
        assert_eq!(offsets, vec![0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn test_column_broadcast() {
        let offsets: Vec<usize> = BroadcastIter::new(&[2, 1], &[2, 3]).collect();
        assert_eq!(offsets, vec![0, 0, 0, 1, 1, 1]);
    }

    #[test]
    fn test_scalar_source() {
        let offsets: Vec<usize> = BroadcastIter::new(&[], &[2, 2]).collect();
        assert_eq!(offsets, vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_empty_output() {
        assert_eq!(BroadcastIter::new(&[1, 3], &[0, 3]).count(), 0);
    }
}
