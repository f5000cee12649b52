//! Tensor creation functions analogous to `np.zeros`, `np.full`, etc.

use crate::dtype::{Element, Scalar};

use super::{Tensor, compute_strides};

impl<T: Element> Tensor<T> {
    /// Create a tensor filled with the type's default (zero, `false`).
    ///
    /// This is the allocation primitive kernels use for their output
    /// buffers.
    ///
    /// ```
    /// # use numkern_core::tensor::Tensor;
    /// let t = Tensor::<f64>::zeros(vec![2, 3]);
    /// assert_eq!(t.shape(), &[2, 3]);
    /// assert!(t.iter().all(|&x| x == 0.0));
    /// ```
    pub fn zeros(shape: Vec<usize>) -> Self {
        Self::full(shape, T::default())
    }

    /// Create a tensor filled with a constant value.
    pub fn full(shape: Vec<usize>, value: T) -> Self {
        let numel: usize = shape.iter().product();
        let strides = compute_strides(&shape);
        Self {
            data: vec![value; numel],
            shape,
            strides,
        }
    }

    /// Create a tensor whose element at linear position `i` is `f(i)`.
    ///
    /// ```
    /// # use numkern_core::tensor::Tensor;
    /// let t = Tensor::from_fn(vec![2, 2], |i| i % 2 == 0);
    /// assert_eq!(t.as_slice(), &[true, false, true, false]);
    /// ```
    pub fn from_fn<F>(shape: Vec<usize>, f: F) -> Self
    where
        F: FnMut(usize) -> T,
    {
        let numel: usize = shape.iter().product();
        let strides = compute_strides(&shape);
        Self {
            data: (0..numel).map(f).collect(),
            shape,
            strides,
        }
    }
}

impl<T: Scalar> Tensor<T> {
    /// Create a tensor filled with ones.
    pub fn ones(shape: Vec<usize>) -> Self {
        Self::full(shape, T::one())
    }

    /// Create a 1-D tensor with values `[0, 1, 2, ..., n-1]`.
    ///
    /// ```
    /// # use numkern_core::tensor::Tensor;
    /// let t = Tensor::<i32>::arange(5);
    /// assert_eq!(t.as_slice(), &[0, 1, 2, 3, 4]);
    /// ```
    pub fn arange(n: usize) -> Self {
        Self::from_fn(vec![n], T::from_usize)
    }
}
