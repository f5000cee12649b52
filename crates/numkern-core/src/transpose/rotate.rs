//! Quarter-turn and half-turn rotations of a matrix.

use crate::dtype::Element;
use crate::error::Result;
use crate::tensor::Tensor;

use super::matrix_dims;

impl<T: Element> Tensor<T> {
    /// Rotate a matrix 90 degrees counterclockwise: element `(i, j)` of an
    /// `r x c` input lands at `(c - 1 - j, i)` of the `c x r` output.
    ///
    /// ```
    /// # use numkern_core::tensor::Tensor;
    /// let a = Tensor::from_vec(vec![1, 2, 3, 4], vec![2, 2]).unwrap();
    /// assert_eq!(a.rotl90().unwrap().as_slice(), &[2, 4, 1, 3]);
    /// ```
    pub fn rotl90(&self) -> Result<Tensor<T>> {
        let (r, c) = matrix_dims(self.shape(), "rotl90 requires a matrix")?;
        let src = self.as_slice();
        let mut out = Tensor::zeros(vec![c, r]);
        let dst = out.as_mut_slice();
        for i in 0..r {
            for j in 0..c {
                dst[(c - 1 - j) * r + i] = src[i * c + j];
            }
        }
        Ok(out)
    }

    /// Rotate a matrix 90 degrees clockwise: element `(i, j)` lands at
    /// `(j, r - 1 - i)`.
    pub fn rotr90(&self) -> Result<Tensor<T>> {
        let (r, c) = matrix_dims(self.shape(), "rotr90 requires a matrix")?;
        let src = self.as_slice();
        let mut out = Tensor::zeros(vec![c, r]);
        let dst = out.as_mut_slice();
        for i in 0..r {
            for j in 0..c {
                dst[j * r + (r - 1 - i)] = src[i * c + j];
            }
        }
        Ok(out)
    }

    /// Rotate a matrix 180 degrees. In row-major storage this reverses the
    /// data.
    pub fn rot180(&self) -> Result<Tensor<T>> {
        let (r, c) = matrix_dims(self.shape(), "rot180 requires a matrix")?;
        let data = self.as_slice().iter().rev().copied().collect();
        Tensor::from_vec(data, vec![r, c])
    }

    /// Rotate counterclockwise by `k` quarter turns; negative `k` turns
    /// clockwise.
    pub fn rotl90_k(&self, k: i64) -> Result<Tensor<T>> {
        match k.rem_euclid(4) {
            1 => self.rotl90(),
            2 => self.rot180(),
            3 => self.rotr90(),
            _ => self.rotated_copy("rotl90 requires a matrix"),
        }
    }

    /// Rotate clockwise by `k` quarter turns; `rotr90_k(k) == rotl90_k(-k)`.
    pub fn rotr90_k(&self, k: i64) -> Result<Tensor<T>> {
        match k.rem_euclid(4) {
            1 => self.rotr90(),
            2 => self.rot180(),
            3 => self.rotl90(),
            _ => self.rotated_copy("rotr90 requires a matrix"),
        }
    }

    /// Rotate by `k` half turns.
    pub fn rot180_k(&self, k: i64) -> Result<Tensor<T>> {
        if k.rem_euclid(2) == 1 {
            self.rot180()
        } else {
            self.rotated_copy("rot180 requires a matrix")
        }
    }

    /// The zero-turn case: a plain copy, still restricted to matrices.
    fn rotated_copy(&self, reason: &'static str) -> Result<Tensor<T>> {
        matrix_dims(self.shape(), reason)?;
        Ok(self.clone())
    }
}
