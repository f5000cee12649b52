//! Dynamically typed arrays.
//!
//! [`NdArray`] holds a [`Tensor`] of any concrete [`DType`]. The elementwise
//! engine works on `NdArray`s because the element type of its result is
//! only known after promotion; shape-only kernels (transpose, rotation,
//! flip, cumulative reductions) dispatch once on the variant and run the
//! typed kernel.

use num_complex::Complex;

use crate::config::KernelConfig;
use crate::dtype::{DType, Element};
use crate::error::{CoreError, Result};
use crate::tensor::Tensor;
use crate::value::Value;

/// An n-dimensional array whose element type is chosen at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum NdArray {
    Bool(Tensor<bool>),
    Int8(Tensor<i8>),
    Int16(Tensor<i16>),
    Int32(Tensor<i32>),
    Int64(Tensor<i64>),
    UInt8(Tensor<u8>),
    UInt16(Tensor<u16>),
    UInt32(Tensor<u32>),
    UInt64(Tensor<u64>),
    Float32(Tensor<f32>),
    Float64(Tensor<f64>),
    Complex32(Tensor<Complex<f32>>),
    Complex64(Tensor<Complex<f64>>),
}

/// Evaluate `$body` with `$t` bound to the typed tensor inside `$array`.
macro_rules! dispatch {
    ($array:expr, $t:ident => $body:expr) => {
        match $array {
            $crate::array::NdArray::Bool($t) => $body,
            $crate::array::NdArray::Int8($t) => $body,
            $crate::array::NdArray::Int16($t) => $body,
            $crate::array::NdArray::Int32($t) => $body,
            $crate::array::NdArray::Int64($t) => $body,
            $crate::array::NdArray::UInt8($t) => $body,
            $crate::array::NdArray::UInt16($t) => $body,
            $crate::array::NdArray::UInt32($t) => $body,
            $crate::array::NdArray::UInt64($t) => $body,
            $crate::array::NdArray::Float32($t) => $body,
            $crate::array::NdArray::Float64($t) => $body,
            $crate::array::NdArray::Complex32($t) => $body,
            $crate::array::NdArray::Complex64($t) => $body,
        }
    };
}

/// Like [`dispatch!`] for bodies that need arithmetic; a `Bool` array is an
/// `UnsupportedOperation` for `$op`.
macro_rules! dispatch_numeric {
    ($array:expr, $op:expr, $t:ident => $body:expr) => {
        match $array {
            $crate::array::NdArray::Bool(_) => Err($crate::error::CoreError::UnsupportedOperation {
                op: $op,
                dtype: $crate::dtype::DType::Bool,
            }),
            $crate::array::NdArray::Int8($t) => $body,
            $crate::array::NdArray::Int16($t) => $body,
            $crate::array::NdArray::Int32($t) => $body,
            $crate::array::NdArray::Int64($t) => $body,
            $crate::array::NdArray::UInt8($t) => $body,
            $crate::array::NdArray::UInt16($t) => $body,
            $crate::array::NdArray::UInt32($t) => $body,
            $crate::array::NdArray::UInt64($t) => $body,
            $crate::array::NdArray::Float32($t) => $body,
            $crate::array::NdArray::Float64($t) => $body,
            $crate::array::NdArray::Complex32($t) => $body,
            $crate::array::NdArray::Complex64($t) => $body,
        }
    };
}

/// Evaluate `$body` with the type alias `$T` naming the native element type
/// of `$dtype`.
macro_rules! with_dtype {
    ($dtype:expr, $T:ident => $body:expr) => {
        match $dtype {
            $crate::dtype::DType::Bool => {
                type $T = bool;
                $body
            }
            $crate::dtype::DType::Int8 => {
                type $T = i8;
                $body
            }
            $crate::dtype::DType::Int16 => {
                type $T = i16;
                $body
            }
            $crate::dtype::DType::Int32 => {
                type $T = i32;
                $body
            }
            $crate::dtype::DType::Int64 => {
                type $T = i64;
                $body
            }
            $crate::dtype::DType::UInt8 => {
                type $T = u8;
                $body
            }
            $crate::dtype::DType::UInt16 => {
                type $T = u16;
                $body
            }
            $crate::dtype::DType::UInt32 => {
                type $T = u32;
                $body
            }
            $crate::dtype::DType::UInt64 => {
                type $T = u64;
                $body
            }
            $crate::dtype::DType::Float32 => {
                type $T = f32;
                $body
            }
            $crate::dtype::DType::Float64 => {
                type $T = f64;
                $body
            }
            $crate::dtype::DType::Complex32 => {
                type $T = ::num_complex::Complex<f32>;
                $body
            }
            $crate::dtype::DType::Complex64 => {
                type $T = ::num_complex::Complex<f64>;
                $body
            }
        }
    };
}

pub(crate) use {dispatch, dispatch_numeric, with_dtype};

impl NdArray {
    // ------------------------------------------------------------------
    // Allocation and construction
    // ------------------------------------------------------------------

    /// Allocate a zero-filled array of the given element type and shape.
    pub fn similar(dtype: DType, shape: Vec<usize>) -> NdArray {
        with_dtype!(dtype, T => NdArray::from(Tensor::<T>::zeros(shape)))
    }

    /// Build an array of `dtype` from dynamically typed values, casting each
    /// one into the element type.
    ///
    /// ```
    /// # use numkern_core::{array::NdArray, dtype::DType, value::Value};
    /// let a = NdArray::from_values(DType::UInt8, vec![2], vec![Value::Int64(3), Value::Bool(true)])
    ///     .unwrap();
    /// assert_eq!(a.dtype(), DType::UInt8);
    /// assert_eq!(a.value_at(0).unwrap(), Value::UInt8(3));
    /// ```
    pub fn from_values(dtype: DType, shape: Vec<usize>, values: Vec<Value>) -> Result<NdArray> {
        Self::fill_from(dtype, shape, values.into_iter().map(Ok))
    }

    /// Collect fallibly produced values into an array of `dtype`. The first
    /// error is returned and the partially filled buffer dropped.
    pub fn fill_from<I>(dtype: DType, shape: Vec<usize>, values: I) -> Result<NdArray>
    where
        I: IntoIterator<Item = Result<Value>>,
    {
        let numel: usize = shape.iter().product();
        with_dtype!(dtype, T => {
            let mut data: Vec<T> = Vec::with_capacity(numel);
            for v in values {
                data.push(T::from_value(v?));
            }
            Ok(Tensor::from_vec(data, shape)?.into())
        })
    }

    /// Convert every element to `dtype`. Casting to the current type is a
    /// copy.
    pub fn cast(&self, dtype: DType) -> NdArray {
        if dtype == self.dtype() {
            return self.clone();
        }
        with_dtype!(dtype, U => dispatch!(self, t => {
            NdArray::from(t.map_into(|x| U::from_value(x.into_value())))
        }))
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The element type.
    pub const fn dtype(&self) -> DType {
        match self {
            NdArray::Bool(_) => DType::Bool,
            NdArray::Int8(_) => DType::Int8,
            NdArray::Int16(_) => DType::Int16,
            NdArray::Int32(_) => DType::Int32,
            NdArray::Int64(_) => DType::Int64,
            NdArray::UInt8(_) => DType::UInt8,
            NdArray::UInt16(_) => DType::UInt16,
            NdArray::UInt32(_) => DType::UInt32,
            NdArray::UInt64(_) => DType::UInt64,
            NdArray::Float32(_) => DType::Float32,
            NdArray::Float64(_) => DType::Float64,
            NdArray::Complex32(_) => DType::Complex32,
            NdArray::Complex64(_) => DType::Complex64,
        }
    }

    pub fn shape(&self) -> &[usize] {
        dispatch!(self, t => t.shape())
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    pub fn numel(&self) -> usize {
        dispatch!(self, t => t.numel())
    }

    pub fn is_empty(&self) -> bool {
        self.numel() == 0
    }

    /// The element at linear (storage-order) position `index`.
    pub fn value_at(&self, index: usize) -> Result<Value> {
        dispatch!(self, t => t
            .as_slice()
            .get(index)
            .map(|&x| x.into_value())
            .ok_or_else(|| CoreError::IndexOutOfBounds {
                index: vec![index],
                shape: t.shape().to_vec(),
            }))
    }

    /// The element at linear position `index`, read straight from the typed
    /// buffer. Callers guarantee `index < self.numel()`.
    #[inline]
    pub(crate) fn element(&self, index: usize) -> Value {
        dispatch!(self, t => t.as_slice()[index].into_value())
    }

    /// All elements in storage order.
    pub fn to_values(&self) -> Vec<Value> {
        dispatch!(self, t => t.iter().map(|&x| x.into_value()).collect())
    }

    /// Borrow the typed tensor, or `TypeMismatch` if the element type is not
    /// `T`.
    pub fn as_tensor<T: Element>(&self) -> Result<&Tensor<T>> {
        T::array_ref(self).ok_or(CoreError::TypeMismatch {
            expected: T::DTYPE,
            got: self.dtype(),
        })
    }

    /// Mutably borrow the typed tensor, or `TypeMismatch`.
    pub fn as_tensor_mut<T: Element>(&mut self) -> Result<&mut Tensor<T>> {
        let got = self.dtype();
        T::array_mut(self).ok_or(CoreError::TypeMismatch {
            expected: T::DTYPE,
            got,
        })
    }

    /// Unwrap the typed tensor, or `TypeMismatch`.
    pub fn try_into_tensor<T: Element>(self) -> Result<Tensor<T>> {
        T::from_array(self).map_err(|a| CoreError::TypeMismatch {
            expected: T::DTYPE,
            got: a.dtype(),
        })
    }

    // ------------------------------------------------------------------
    // Shape kernels
    // ------------------------------------------------------------------

    pub fn transpose(&self) -> Result<NdArray> {
        self.transpose_with(&KernelConfig::default())
    }

    pub fn transpose_with(&self, config: &KernelConfig) -> Result<NdArray> {
        dispatch!(self, t => Ok(t.transpose_with(config)?.into()))
    }

    /// Conjugate transpose; equal to [`transpose`](Self::transpose) unless
    /// the elements are complex.
    pub fn ctranspose(&self) -> Result<NdArray> {
        self.ctranspose_with(&KernelConfig::default())
    }

    pub fn ctranspose_with(&self, config: &KernelConfig) -> Result<NdArray> {
        dispatch!(self, t => Ok(t.ctranspose_with(config)?.into()))
    }

    /// Transpose into `out`, which must have the same element type and the
    /// transposed shape.
    pub fn transpose_into(&self, out: &mut NdArray) -> Result<()> {
        self.transpose_into_with(out, &KernelConfig::default())
    }

    pub fn transpose_into_with(&self, out: &mut NdArray, config: &KernelConfig) -> Result<()> {
        dispatch!(self, t => t.transpose_into_with(out.as_tensor_mut()?, config))
    }

    /// Conjugate-transpose into `out`.
    pub fn ctranspose_into(&self, out: &mut NdArray) -> Result<()> {
        self.ctranspose_into_with(out, &KernelConfig::default())
    }

    pub fn ctranspose_into_with(&self, out: &mut NdArray, config: &KernelConfig) -> Result<()> {
        dispatch!(self, t => t.ctranspose_into_with(out.as_tensor_mut()?, config))
    }

    pub fn rotl90(&self) -> Result<NdArray> {
        dispatch!(self, t => Ok(t.rotl90()?.into()))
    }

    pub fn rotr90(&self) -> Result<NdArray> {
        dispatch!(self, t => Ok(t.rotr90()?.into()))
    }

    pub fn rot180(&self) -> Result<NdArray> {
        dispatch!(self, t => Ok(t.rot180()?.into()))
    }

    pub fn rotl90_k(&self, k: i64) -> Result<NdArray> {
        dispatch!(self, t => Ok(t.rotl90_k(k)?.into()))
    }

    pub fn rotr90_k(&self, k: i64) -> Result<NdArray> {
        dispatch!(self, t => Ok(t.rotr90_k(k)?.into()))
    }

    pub fn rot180_k(&self, k: i64) -> Result<NdArray> {
        dispatch!(self, t => Ok(t.rot180_k(k)?.into()))
    }

    /// Reverse along zero-based dimension `dim`.
    pub fn flipdim(&self, dim: usize) -> Result<NdArray> {
        self.flipdim_with(dim, &KernelConfig::default())
    }

    pub fn flipdim_with(&self, dim: usize, config: &KernelConfig) -> Result<NdArray> {
        dispatch!(self, t => Ok(t.flipdim_with(dim, config)?.into()))
    }
}

impl<T: Element> From<Tensor<T>> for NdArray {
    fn from(t: Tensor<T>) -> Self {
        T::into_array(t)
    }
}
