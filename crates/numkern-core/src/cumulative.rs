//! Cumulative sums and products by pairwise recursion.
//!
//! A running sum computed left to right accumulates rounding error linearly
//! in the length of the input. Here the range is instead halved
//! recursively: each half produces its own prefix values, the right half
//! being seeded with everything to its left, and the halves' totals are
//! combined on the way back up. Error then grows with the recursion depth,
//! `O(log n)`, while exact operators (integers) produce the same prefixes as
//! a sequential scan.

use std::borrow::Cow;

use log::trace;

use crate::array::{NdArray, dispatch_numeric};
use crate::config::KernelConfig;
use crate::dtype::Scalar;
use crate::error::{CoreError, Result};
use crate::ops::BinaryOp;
use crate::promote::resolve_accumulate;
use crate::tensor::Tensor;

/// Write the inclusive prefixes `seed op src[0] op ... op src[i]` to
/// `dst[i]` and return the total of `src` alone (without `seed`).
///
/// `src` must be non-empty and as long as `dst`; `base` is at least 2.
fn accumulate_pairwise<T, F>(dst: &mut [T], src: &[T], seed: T, base: usize, op: &F) -> T
where
    T: Copy,
    F: Fn(T, T) -> T,
{
    let n = src.len();
    if n < base {
        let mut partial = src[0];
        dst[0] = op(seed, partial);
        for (d, &s) in dst[1..].iter_mut().zip(&src[1..]) {
            partial = op(partial, s);
            *d = op(seed, partial);
        }
        return partial;
    }

    let half = n >> 1;
    let (dst_left, dst_right) = dst.split_at_mut(half);
    let (src_left, src_right) = src.split_at(half);
    let left = accumulate_pairwise(dst_left, src_left, seed, base, op);
    let right = accumulate_pairwise(dst_right, src_right, op(seed, left), base, op);
    op(left, right)
}

/// Cumulative reduction of a whole slice. The first element is copied
/// through; the rest are accumulated pairwise with it as the seed.
fn accumulate<T, F>(dst: &mut [T], src: &[T], base: usize, op: F)
where
    T: Copy,
    F: Fn(T, T) -> T,
{
    let Some((&first, rest)) = src.split_first() else {
        return;
    };
    dst[0] = first;
    if rest.is_empty() {
        return;
    }
    accumulate_pairwise(&mut dst[1..], rest, first, base.max(2), &op);
}

/// Cumulative reduction along `axis`, lane by lane.
fn accumulate_axis<T, F>(dst: &mut [T], src: &[T], shape: &[usize], axis: usize, base: usize, op: F)
where
    T: Copy + Default,
    F: Fn(T, T) -> T,
{
    let extent = shape[axis];
    let inner: usize = shape[axis + 1..].iter().product();
    let stride = extent * inner;
    if stride == 0 {
        return;
    }
    trace!("cumulative along axis {axis} of {shape:?}: {inner} lanes per block");

    if inner == 1 {
        for (d, s) in dst.chunks_exact_mut(stride).zip(src.chunks_exact(stride)) {
            accumulate(d, s, base, &op);
        }
        return;
    }

    let mut lane = vec![T::default(); extent];
    let mut lane_out = vec![T::default(); extent];
    for (d, s) in dst.chunks_exact_mut(stride).zip(src.chunks_exact(stride)) {
        for e in 0..inner {
            for (k, slot) in lane.iter_mut().enumerate() {
                *slot = s[k * inner + e];
            }
            accumulate(&mut lane_out, &lane, base, &op);
            for (k, &v) in lane_out.iter().enumerate() {
                d[k * inner + e] = v;
            }
        }
    }
}

impl<T: Scalar> Tensor<T> {
    /// Running sum over the elements in storage order. The output has the
    /// shape of the input.
    ///
    /// ```
    /// # use numkern_core::tensor::Tensor;
    /// let v = Tensor::from_vec(vec![1, 2, 3, 4], vec![4]).unwrap();
    /// assert_eq!(v.cumsum().as_slice(), &[1, 3, 6, 10]);
    /// ```
    pub fn cumsum(&self) -> Tensor<T> {
        self.cumsum_with(&KernelConfig::default())
    }

    pub fn cumsum_with(&self, config: &KernelConfig) -> Tensor<T> {
        let mut out = Tensor::zeros(self.shape().to_vec());
        accumulate(
            out.as_mut_slice(),
            self.as_slice(),
            config.pairwise_base,
            T::wrapping_add,
        );
        out
    }

    /// Running product over the elements in storage order.
    pub fn cumprod(&self) -> Tensor<T> {
        self.cumprod_with(&KernelConfig::default())
    }

    pub fn cumprod_with(&self, config: &KernelConfig) -> Tensor<T> {
        let mut out = Tensor::zeros(self.shape().to_vec());
        accumulate(
            out.as_mut_slice(),
            self.as_slice(),
            config.pairwise_base,
            T::wrapping_mul,
        );
        out
    }

    /// Write the running sum into `out`, which must have the same shape.
    pub fn cumsum_into(&self, out: &mut Tensor<T>) -> Result<()> {
        self.cumsum_into_with(out, &KernelConfig::default())
    }

    pub fn cumsum_into_with(&self, out: &mut Tensor<T>, config: &KernelConfig) -> Result<()> {
        self.check_same_shape(out)?;
        accumulate(
            out.as_mut_slice(),
            self.as_slice(),
            config.pairwise_base,
            T::wrapping_add,
        );
        Ok(())
    }

    /// Write the running product into `out`, which must have the same shape.
    pub fn cumprod_into(&self, out: &mut Tensor<T>) -> Result<()> {
        self.cumprod_into_with(out, &KernelConfig::default())
    }

    pub fn cumprod_into_with(&self, out: &mut Tensor<T>, config: &KernelConfig) -> Result<()> {
        self.check_same_shape(out)?;
        accumulate(
            out.as_mut_slice(),
            self.as_slice(),
            config.pairwise_base,
            T::wrapping_mul,
        );
        Ok(())
    }

    /// Running sum along one axis; every lane is reduced independently.
    ///
    /// ```
    /// # use numkern_core::tensor::Tensor;
    /// let a = Tensor::from_vec(vec![1, 2, 3, 4, 5, 6], vec![2, 3]).unwrap();
    /// assert_eq!(a.cumsum_axis(0).unwrap().as_slice(), &[1, 2, 3, 5, 7, 9]);
    /// assert_eq!(a.cumsum_axis(1).unwrap().as_slice(), &[1, 3, 6, 4, 9, 15]);
    /// ```
    pub fn cumsum_axis(&self, axis: usize) -> Result<Tensor<T>> {
        self.cumsum_axis_with(axis, &KernelConfig::default())
    }

    pub fn cumsum_axis_with(&self, axis: usize, config: &KernelConfig) -> Result<Tensor<T>> {
        self.check_axis(axis)?;
        let mut out = Tensor::zeros(self.shape().to_vec());
        accumulate_axis(
            out.as_mut_slice(),
            self.as_slice(),
            self.shape(),
            axis,
            config.pairwise_base,
            T::wrapping_add,
        );
        Ok(out)
    }

    /// Running product along one axis.
    pub fn cumprod_axis(&self, axis: usize) -> Result<Tensor<T>> {
        self.cumprod_axis_with(axis, &KernelConfig::default())
    }

    pub fn cumprod_axis_with(&self, axis: usize, config: &KernelConfig) -> Result<Tensor<T>> {
        self.check_axis(axis)?;
        let mut out = Tensor::zeros(self.shape().to_vec());
        accumulate_axis(
            out.as_mut_slice(),
            self.as_slice(),
            self.shape(),
            axis,
            config.pairwise_base,
            T::wrapping_mul,
        );
        Ok(out)
    }

    fn check_same_shape(&self, out: &Tensor<T>) -> Result<()> {
        if self.shape() == out.shape() {
            Ok(())
        } else {
            Err(CoreError::ShapeMismatch {
                expected: self.shape().to_vec(),
                got: out.shape().to_vec(),
            })
        }
    }

    fn check_axis(&self, axis: usize) -> Result<()> {
        if axis < self.ndim() {
            Ok(())
        } else {
            Err(CoreError::DimensionOutOfRange {
                dim: axis,
                ndim: self.ndim(),
            })
        }
    }
}

// ======================================================================
// Dynamically typed entry points
// ======================================================================

impl NdArray {
    /// Running sum in storage order. Booleans are counted, so a `Bool` array
    /// yields `Int64`; every other element type is kept.
    pub fn cumsum(&self) -> Result<NdArray> {
        self.cumsum_with(&KernelConfig::default())
    }

    pub fn cumsum_with(&self, config: &KernelConfig) -> Result<NdArray> {
        let input = self.widened_for(BinaryOp::Add);
        dispatch_numeric!(&*input, "cumsum", t => Ok(t.cumsum_with(config).into()))
    }

    /// Running product in storage order; `Bool` widens to `Int64`.
    pub fn cumprod(&self) -> Result<NdArray> {
        self.cumprod_with(&KernelConfig::default())
    }

    pub fn cumprod_with(&self, config: &KernelConfig) -> Result<NdArray> {
        let input = self.widened_for(BinaryOp::Mul);
        dispatch_numeric!(&*input, "cumprod", t => Ok(t.cumprod_with(config).into()))
    }

    /// Running sum along `axis`; `Bool` widens to `Int64`.
    pub fn cumsum_axis(&self, axis: usize) -> Result<NdArray> {
        self.cumsum_axis_with(axis, &KernelConfig::default())
    }

    pub fn cumsum_axis_with(&self, axis: usize, config: &KernelConfig) -> Result<NdArray> {
        let input = self.widened_for(BinaryOp::Add);
        dispatch_numeric!(&*input, "cumsum", t => Ok(t.cumsum_axis_with(axis, config)?.into()))
    }

    /// Running product along `axis`; `Bool` widens to `Int64`.
    pub fn cumprod_axis(&self, axis: usize) -> Result<NdArray> {
        self.cumprod_axis_with(axis, &KernelConfig::default())
    }

    pub fn cumprod_axis_with(&self, axis: usize, config: &KernelConfig) -> Result<NdArray> {
        let input = self.widened_for(BinaryOp::Mul);
        dispatch_numeric!(&*input, "cumprod", t => Ok(t.cumprod_axis_with(axis, config)?.into()))
    }

    /// The input converted once to the accumulation type of `op`, borrowed
    /// unchanged when no widening is needed.
    fn widened_for(&self, op: BinaryOp) -> Cow<'_, NdArray> {
        let target = resolve_accumulate(op, self.dtype());
        if target == self.dtype() {
            Cow::Borrowed(self)
        } else {
            Cow::Owned(self.cast(target))
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::dtype::DType;
    use num_complex::Complex;
    use rstest::rstest;

    fn sequential_sum(v: &[i64]) -> Vec<i64> {
        v.iter()
            .scan(0_i64, |acc, &x| {
                *acc += x;
                Some(*acc)
            })
            .collect()
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(2)]
    #[case(127)]
    #[case(128)]
    #[case(129)]
    #[case(1000)]
    fn test_integer_prefixes_match_sequential(#[case] n: usize) {
        let data: Vec<i64> = (0..n).map(|i| i64::try_from(i % 17).unwrap() - 8).collect();
        let v = Tensor::from_vec(data.clone(), vec![n]).unwrap();
        assert_eq!(v.cumsum().as_slice(), sequential_sum(&data).as_slice());
    }

    #[test]
    fn test_small_base_matches_default() {
        let data: Vec<i32> = (0..300).map(|i| i % 7).collect();
        let v = Tensor::from_vec(data, vec![300]).unwrap();
        let tiny = KernelConfig {
            pairwise_base: 2,
            ..KernelConfig::default()
        };
        assert_eq!(v.cumsum_with(&tiny), v.cumsum());
    }

    #[test]
    fn test_pairwise_base_is_clamped() {
        let v = Tensor::from_vec(vec![1, 2, 3], vec![3]).unwrap();
        let degenerate = KernelConfig {
            pairwise_base: 0,
            ..KernelConfig::default()
        };
        assert_eq!(v.cumsum_with(&degenerate).as_slice(), &[1, 3, 6]);
    }

    #[test]
    fn test_cumprod() {
        let v = Tensor::from_vec(vec![2, 3, 4], vec![3]).unwrap();
        assert_eq!(v.cumprod().as_slice(), &[2, 6, 24]);
    }

    #[test]
    fn test_cumsum_preserves_shape() {
        let a = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]).unwrap();
        let c = a.cumsum();
        assert_eq!(c.shape(), &[2, 2]);
        assert_eq!(c.as_slice(), &[1.0, 3.0, 6.0, 10.0]);
    }

    #[test]
    fn test_cumsum_complex() {
        let v = Tensor::from_vec(
            vec![Complex::new(1.0_f64, 1.0), Complex::new(2.0, -3.0)],
            vec![2],
        )
        .unwrap();
        assert_eq!(
            v.cumsum().as_slice(),
            &[Complex::new(1.0, 1.0), Complex::new(3.0, -2.0)]
        );
    }

    #[test]
    fn test_cumsum_wraps() {
        let v = Tensor::from_vec(vec![200_u8, 100], vec![2]).unwrap();
        assert_eq!(v.cumsum().as_slice(), &[200, 44]);
    }

    #[test]
    fn test_into_variants() {
        let v = Tensor::from_vec(vec![1, 2, 3], vec![3]).unwrap();
        let mut out = Tensor::zeros(vec![3]);
        v.cumsum_into(&mut out).unwrap();
        assert_eq!(out.as_slice(), &[1, 3, 6]);
        v.cumprod_into(&mut out).unwrap();
        assert_eq!(out.as_slice(), &[1, 2, 6]);

        let mut wrong = Tensor::zeros(vec![1, 3]);
        assert!(matches!(
            v.cumsum_into(&mut wrong),
            Err(CoreError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_with_variants_honour_config() {
        let tiny = KernelConfig {
            pairwise_base: 2,
            ..KernelConfig::default()
        };
        let data: Vec<i64> = (0..500).map(|i| i % 11 - 5).collect();
        let v = Tensor::from_vec(data.clone(), vec![500]).unwrap();
        let mut out = Tensor::zeros(vec![500]);
        v.cumsum_into_with(&mut out, &tiny).unwrap();
        assert_eq!(out.as_slice(), sequential_sum(&data).as_slice());
        v.cumprod_into_with(&mut out, &tiny).unwrap();
        assert_eq!(out, v.cumprod());

        let a = NdArray::from(Tensor::from_vec(vec![true, false, true, true], vec![2, 2]).unwrap());
        let c = a.cumsum_axis_with(0, &tiny).unwrap();
        assert_eq!(c.dtype(), DType::Int64);
        assert_eq!(c.try_into_tensor::<i64>().unwrap().as_slice(), &[1, 0, 2, 1]);
        assert!(a.cumprod_axis_with(2, &tiny).is_err());
    }

    #[test]
    fn test_axis_variants() {
        let a = Tensor::from_fn(vec![2, 3, 2], |i| i64::try_from(i).unwrap() + 1);
        let c = a.cumprod_axis(1).unwrap();
        assert_eq!(c.shape(), &[2, 3, 2]);
        // lane (0, :, 0) is [1, 3, 5]
        assert_eq!(*c.get(&[0, 2, 0]).unwrap(), 15);
        // lane (1, :, 1) is [8, 10, 12]
        assert_eq!(*c.get(&[1, 2, 1]).unwrap(), 960);

        assert!(a.cumsum_axis(3).is_err());
        let e = Tensor::<f32>::zeros(vec![0, 4]);
        assert!(e.cumsum_axis(1).unwrap().is_empty());
    }

    #[test]
    fn test_ndarray_bool_widens() {
        let b = NdArray::from(Tensor::from_vec(vec![true, true, false], vec![3]).unwrap());
        let c = b.cumsum().unwrap();
        assert_eq!(c.dtype(), DType::Int64);
        assert_eq!(
            c.try_into_tensor::<i64>().unwrap().as_slice(),
            &[1, 2, 2]
        );
        assert_eq!(b.cumprod().unwrap().dtype(), DType::Int64);
    }

    #[test]
    fn test_ndarray_keeps_numeric_type() {
        let a = NdArray::from(Tensor::from_vec(vec![1.5_f32, 2.5], vec![2]).unwrap());
        let c = a.cumsum_axis(0).unwrap();
        assert_eq!(c.dtype(), DType::Float32);
        assert_eq!(c.try_into_tensor::<f32>().unwrap().as_slice(), &[1.5, 4.0]);
    }
}
