//! Reversal along one dimension.

use log::debug;

use crate::config::KernelConfig;
use crate::dtype::Element;
use crate::error::{CoreError, Result};
use crate::tensor::Tensor;

impl<T: Element> Tensor<T> {
    /// Reverse the order of elements along dimension `dim` (zero-based).
    ///
    /// ```
    /// # use numkern_core::tensor::Tensor;
    /// let a = Tensor::from_vec(vec![1, 2, 3, 4, 5, 6], vec![2, 3]).unwrap();
    /// assert_eq!(a.flipdim(0).unwrap().as_slice(), &[4, 5, 6, 1, 2, 3]);
    /// assert_eq!(a.flipdim(1).unwrap().as_slice(), &[3, 2, 1, 6, 5, 4]);
    /// ```
    pub fn flipdim(&self, dim: usize) -> Result<Tensor<T>> {
        self.flipdim_with(dim, &KernelConfig::default())
    }

    pub fn flipdim_with(&self, dim: usize, config: &KernelConfig) -> Result<Tensor<T>> {
        let shape = self.shape();
        if dim >= shape.len() {
            return Err(CoreError::DimensionOutOfRange {
                dim,
                ndim: shape.len(),
            });
        }

        let extent = shape[dim];
        if extent <= 1 || self.is_empty() {
            return Ok(self.clone());
        }

        let src = self.as_slice();
        let only_axis = shape
            .iter()
            .enumerate()
            .all(|(d, &s)| d == dim || s == 1);
        if only_axis {
            let data = src.iter().rev().copied().collect();
            return Tensor::from_vec(data, shape.to_vec());
        }

        // Each outer block is `extent` runs of `inner` contiguous elements;
        // run k moves to position extent - 1 - k.
        let inner: usize = shape[dim + 1..].iter().product();
        let stride = inner * extent;
        let mut out = Tensor::zeros(shape.to_vec());
        let dst = out.as_mut_slice();

        if inner > config.flip_block_min {
            debug!("flipdim({dim}) on {shape:?}: bulk copy of {inner}-element runs");
            for (out_block, in_block) in dst.chunks_exact_mut(stride).zip(src.chunks_exact(stride)) {
                for (k, run) in in_block.chunks_exact(inner).enumerate() {
                    let at = (extent - 1 - k) * inner;
                    out_block[at..at + inner].copy_from_slice(run);
                }
            }
        } else if inner == 1 {
            for (out_block, in_block) in dst.chunks_exact_mut(stride).zip(src.chunks_exact(stride)) {
                for (d, &s) in out_block.iter_mut().zip(in_block.iter().rev()) {
                    *d = s;
                }
            }
        } else {
            for (out_block, in_block) in dst.chunks_exact_mut(stride).zip(src.chunks_exact(stride)) {
                for k in 0..extent {
                    let from = k * inner;
                    let to = (extent - 1 - k) * inner;
                    let run = &in_block[from..from + inner];
                    for (d, &s) in out_block[to..to + inner].iter_mut().zip(run) {
                        *d = s;
                    }
                }
            }
        }
        Ok(out)
    }
}
