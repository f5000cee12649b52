//! Matrix transposition, quarter-turn rotations and dimension flips.
//!
//! Transposition of a matrix larger than a few leaf blocks is done by a
//! cache-oblivious recursion: the index range is bisected along its longer
//! side until a block holds at most [`KernelConfig::transpose_base`]
//! elements, and each leaf is transposed with plain nested loops. Only the
//! destination is written, and disjoint blocks never overlap.

mod flip;
mod rotate;

use log::{debug, trace};

use crate::config::KernelConfig;
use crate::dtype::Element;
use crate::error::{CoreError, Result};
use crate::tensor::Tensor;

/// A rectangular index range of the source matrix: rows
/// `row..row + rows`, columns `col..col + cols`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Block {
    row: usize,
    col: usize,
    rows: usize,
    cols: usize,
}

/// Write `f(src[i, j])` to `dst[j, i]` for the `m x n` row-major matrix
/// `src`.
fn transpose_kernel<T, F>(dst: &mut [T], src: &[T], m: usize, n: usize, base: usize, f: &F)
where
    T: Copy,
    F: Fn(T) -> T,
{
    let whole = Block {
        row: 0,
        col: 0,
        rows: m,
        cols: n,
    };
    if m * n <= base.saturating_mul(4) {
        transpose_direct(dst, src, m, n, whole, f);
    } else {
        debug!("blocked transpose of {m}x{n} matrix (leaf budget {base})");
        transpose_blocked(dst, src, m, n, whole, base, f);
    }
}

fn transpose_blocked<T, F>(
    dst: &mut [T],
    src: &[T],
    m: usize,
    n: usize,
    block: Block,
    base: usize,
    f: &F,
) where
    T: Copy,
    F: Fn(T) -> T,
{
    if block.rows * block.cols <= base {
        transpose_direct(dst, src, m, n, block, f);
        return;
    }
    let (first, second) = if block.rows > block.cols {
        let half = block.rows >> 1;
        (
            Block { rows: half, ..block },
            Block {
                row: block.row + half,
                rows: block.rows - half,
                ..block
            },
        )
    } else {
        let half = block.cols >> 1;
        (
            Block { cols: half, ..block },
            Block {
                col: block.col + half,
                cols: block.cols - half,
                ..block
            },
        )
    };
    trace!("split {block:?} into {first:?} and {second:?}");
    transpose_blocked(dst, src, m, n, first, base, f);
    transpose_blocked(dst, src, m, n, second, base, f);
}

#[inline]
fn transpose_direct<T, F>(dst: &mut [T], src: &[T], m: usize, n: usize, block: Block, f: &F)
where
    T: Copy,
    F: Fn(T) -> T,
{
    for j in block.col..block.col + block.cols {
        for i in block.row..block.row + block.rows {
            dst[j * m + i] = f(src[i * n + j]);
        }
    }
}

impl<T: Element> Tensor<T> {
    /// Transpose a matrix, or turn a vector of length `n` into a `1 x n`
    /// matrix.
    ///
    /// ```
    /// # use numkern_core::tensor::Tensor;
    /// let a = Tensor::from_vec(vec![1, 2, 3, 4, 5, 6], vec![2, 3]).unwrap();
    /// let t = a.transpose().unwrap();
    /// assert_eq!(t.shape(), &[3, 2]);
    /// assert_eq!(t.as_slice(), &[1, 4, 2, 5, 3, 6]);
    /// ```
    pub fn transpose(&self) -> Result<Tensor<T>> {
        self.transpose_with(&KernelConfig::default())
    }

    pub fn transpose_with(&self, config: &KernelConfig) -> Result<Tensor<T>> {
        let mut out = Tensor::zeros(transposed_shape(self.shape())?);
        self.transpose_into_with(&mut out, config)?;
        Ok(out)
    }

    /// Conjugate transpose. For non-complex element types this is exactly
    /// [`transpose`](Self::transpose).
    pub fn ctranspose(&self) -> Result<Tensor<T>> {
        self.ctranspose_with(&KernelConfig::default())
    }

    pub fn ctranspose_with(&self, config: &KernelConfig) -> Result<Tensor<T>> {
        if !T::IS_COMPLEX {
            return self.transpose_with(config);
        }
        let mut out = Tensor::zeros(transposed_shape(self.shape())?);
        self.ctranspose_into_with(&mut out, config)?;
        Ok(out)
    }

    /// Write the transpose of `self` into `out`.
    ///
    /// `out` must have the reversed shape of a matrix `self`. A vector of
    /// length `n` pairs with a `1 x n` matrix in either direction, in which
    /// case the data is copied unchanged. Any other combination is a
    /// [`CoreError::ShapeMismatch`].
    pub fn transpose_into(&self, out: &mut Tensor<T>) -> Result<()> {
        self.transpose_into_with(out, &KernelConfig::default())
    }

    pub fn transpose_into_with(&self, out: &mut Tensor<T>, config: &KernelConfig) -> Result<()> {
        self.transpose_into_impl(out, config, |x| x)
    }

    /// Write the conjugate transpose of `self` into `out`; shape rules as
    /// for [`transpose_into`](Self::transpose_into).
    pub fn ctranspose_into(&self, out: &mut Tensor<T>) -> Result<()> {
        self.ctranspose_into_with(out, &KernelConfig::default())
    }

    pub fn ctranspose_into_with(&self, out: &mut Tensor<T>, config: &KernelConfig) -> Result<()> {
        self.transpose_into_impl(out, config, T::conj)
    }

    fn transpose_into_impl<F>(&self, out: &mut Tensor<T>, config: &KernelConfig, f: F) -> Result<()>
    where
        F: Fn(T) -> T,
    {
        let out_shape = out.shape().to_vec();
        let mismatch = || CoreError::ShapeMismatch {
            expected: transposed_shape(self.shape()).unwrap_or_default(),
            got: out_shape.clone(),
        };

        match (self.shape(), out_shape.as_slice()) {
            // vector -> 1 x n, or 1 x n -> vector: a straight copy
            (&[len], &[1, out_len]) | (&[1, len], &[out_len]) => {
                if len != out_len {
                    return Err(mismatch());
                }
                for (d, &s) in out.as_mut_slice().iter_mut().zip(self.as_slice()) {
                    *d = f(s);
                }
                Ok(())
            }
            (&[m, n], &[out_m, out_n]) => {
                if out_m != n || out_n != m {
                    return Err(mismatch());
                }
                transpose_kernel(
                    out.as_mut_slice(),
                    self.as_slice(),
                    m,
                    n,
                    config.transpose_base,
                    &f,
                );
                Ok(())
            }
            (&[_] | &[_, _], _) => Err(mismatch()),
            _ => Err(CoreError::InvalidShape {
                shape: self.shape().to_vec(),
                reason: "transpose requires a vector or a matrix",
            }),
        }
    }
}

/// Shape of the transpose of a vector or matrix.
fn transposed_shape(shape: &[usize]) -> Result<Vec<usize>> {
    match *shape {
        [n] => Ok(vec![1, n]),
        [m, n] => Ok(vec![n, m]),
        _ => Err(CoreError::InvalidShape {
            shape: shape.to_vec(),
            reason: "transpose requires a vector or a matrix",
        }),
    }
}

/// Rows and columns of a matrix, or `InvalidShape` for any other rank.
pub(crate) fn matrix_dims(shape: &[usize], op: &'static str) -> Result<(usize, usize)> {
    match *shape {
        [r, c] => Ok((r, c)),
        _ => Err(CoreError::InvalidShape {
            shape: shape.to_vec(),
            reason: op,
        }),
    }
}
