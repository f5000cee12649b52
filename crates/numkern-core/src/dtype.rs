//! Element types and the numeric trait hierarchy.
//!
//! Every array holds elements of exactly one [`DType`]. On the typed side the
//! trait hierarchy is:
//! ```text
//! Element            (bool, integers, floats, complex)
//!   └── Scalar       (integers, floats, complex: + - * /, zero, one)
//!         └── Float  (f32, f64)
//! ```
//!
//! [`Element`] is what typed storage needs: a `DTYPE` tag, conversion to and
//! from the dynamic [`Value`] and [`NdArray`], and conjugation (the identity
//! unless the type is complex).

use core::fmt;
use core::ops::{Add, Div, Mul, Sub};

use num_complex::Complex;

use crate::array::NdArray;
use crate::tensor::Tensor;
use crate::value::Value;

// ---------------------------------------------------------------------------
// DType / Kind
// ---------------------------------------------------------------------------

/// Concrete element type of an array or a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    /// `Complex<f32>`.
    Complex32,
    /// `Complex<f64>`.
    Complex64,
}

/// Semantic class of a [`DType`]; promotion rules are phrased in kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Integer,
    Float,
    Complex,
}

impl DType {
    /// Every concrete element type, in promotion-table order.
    pub const ALL: [DType; 13] = [
        DType::Bool,
        DType::Int8,
        DType::Int16,
        DType::Int32,
        DType::Int64,
        DType::UInt8,
        DType::UInt16,
        DType::UInt32,
        DType::UInt64,
        DType::Float32,
        DType::Float64,
        DType::Complex32,
        DType::Complex64,
    ];

    #[inline]
    pub const fn kind(self) -> Kind {
        match self {
            DType::Bool => Kind::Bool,
            DType::Int8
            | DType::Int16
            | DType::Int32
            | DType::Int64
            | DType::UInt8
            | DType::UInt16
            | DType::UInt32
            | DType::UInt64 => Kind::Integer,
            DType::Float32 | DType::Float64 => Kind::Float,
            DType::Complex32 | DType::Complex64 => Kind::Complex,
        }
    }

    /// Storage width in bits (a complex counts both components).
    #[inline]
    pub const fn bits(self) -> u32 {
        match self {
            DType::Bool | DType::Int8 | DType::UInt8 => 8,
            DType::Int16 | DType::UInt16 => 16,
            DType::Int32 | DType::UInt32 | DType::Float32 => 32,
            DType::Int64 | DType::UInt64 | DType::Float64 | DType::Complex32 => 64,
            DType::Complex64 => 128,
        }
    }

    /// Whether the type is a signed integer.
    #[inline]
    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            DType::Int8 | DType::Int16 | DType::Int32 | DType::Int64
        )
    }

    #[inline]
    pub const fn is_integer(self) -> bool {
        matches!(self.kind(), Kind::Integer)
    }

    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self.kind(), Kind::Float)
    }

    #[inline]
    pub const fn is_complex(self) -> bool {
        matches!(self.kind(), Kind::Complex)
    }

    /// Type of the real (and imaginary) component: `Float32` for `Complex32`,
    /// `Float64` for `Complex64`, the type itself otherwise.
    #[inline]
    pub const fn real_part(self) -> DType {
        match self {
            DType::Complex32 => DType::Float32,
            DType::Complex64 => DType::Float64,
            other => other,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            DType::Bool => "bool",
            DType::Int8 => "int8",
            DType::Int16 => "int16",
            DType::Int32 => "int32",
            DType::Int64 => "int64",
            DType::UInt8 => "uint8",
            DType::UInt16 => "uint16",
            DType::UInt32 => "uint32",
            DType::UInt64 => "uint64",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
            DType::Complex32 => "complex32",
            DType::Complex64 => "complex64",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Element: anything storable in a tensor
// ---------------------------------------------------------------------------

/// Base trait for every type storable in a [`Tensor`](crate::tensor::Tensor).
///
/// All elements are `Copy`, so kernels may move them with bulk slice copies.
pub trait Element: Copy + fmt::Debug + PartialEq + Default + Send + Sync + 'static {
    /// The dynamic tag for this type.
    const DTYPE: DType;

    /// Whether [`conj`](Element::conj) can change a value.
    const IS_COMPLEX: bool = false;

    /// Wrap into a dynamic [`Value`].
    fn into_value(self) -> Value;

    /// Convert a dynamic value into this type, casting if necessary.
    fn from_value(v: Value) -> Self;

    /// Complex conjugate; the identity for non-complex types.
    #[inline]
    fn conj(self) -> Self {
        self
    }

    /// Wrap a typed tensor as the matching [`NdArray`] variant.
    fn into_array(t: Tensor<Self>) -> NdArray;

    /// Unwrap the tensor if `a` holds this element type, else give `a` back.
    fn from_array(a: NdArray) -> core::result::Result<Tensor<Self>, NdArray>;

    /// Borrow the tensor if `a` holds this element type.
    fn array_ref(a: &NdArray) -> Option<&Tensor<Self>>;

    /// Mutably borrow the tensor if `a` holds this element type.
    fn array_mut(a: &mut NdArray) -> Option<&mut Tensor<Self>>;
}

/// The [`NdArray`] hooks of [`Element`] for the type stored in variant
/// `$variant`.
macro_rules! array_hooks {
    ($variant:ident) => {
        #[inline]
        fn into_array(t: Tensor<Self>) -> NdArray {
            NdArray::$variant(t)
        }

        #[inline]
        fn from_array(a: NdArray) -> core::result::Result<Tensor<Self>, NdArray> {
            match a {
                NdArray::$variant(t) => Ok(t),
                other => Err(other),
            }
        }

        #[inline]
        fn array_ref(a: &NdArray) -> Option<&Tensor<Self>> {
            match a {
                NdArray::$variant(t) => Some(t),
                _ => None,
            }
        }

        #[inline]
        fn array_mut(a: &mut NdArray) -> Option<&mut Tensor<Self>> {
            match a {
                NdArray::$variant(t) => Some(t),
                _ => None,
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Scalar: numbers with arithmetic
// ---------------------------------------------------------------------------

/// Numeric element: supports the four arithmetic operators and has additive
/// and multiplicative identities. `bool` is an [`Element`] but not a `Scalar`.
pub trait Scalar:
    Element + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self> + Div<Output = Self>
{
    /// The additive identity (`0`).
    fn zero() -> Self;

    /// The multiplicative identity (`1`).
    fn one() -> Self;

    /// Convert from `usize` (used for index / shape arithmetic).
    fn from_usize(v: usize) -> Self;

    /// `self + rhs`, wrapping at the type's width for integers.
    fn wrapping_add(self, rhs: Self) -> Self;

    /// `self * rhs`, wrapping at the type's width for integers.
    fn wrapping_mul(self, rhs: Self) -> Self;
}

/// Real IEEE floating-point scalars (`f32`, `f64`).
pub trait Float: Scalar + num_traits::Float {}

// ===========================================================================
// Implementations
// ===========================================================================

impl Element for bool {
    const DTYPE: DType = DType::Bool;

    #[inline]
    fn into_value(self) -> Value {
        Value::Bool(self)
    }

    #[inline]
    fn from_value(v: Value) -> Self {
        v.to_bool()
    }

    array_hooks!(Bool);
}

macro_rules! impl_element_int {
    ($ty:ty, $variant:ident) => {
        impl Element for $ty {
            const DTYPE: DType = DType::$variant;

            #[inline]
            fn into_value(self) -> Value {
                Value::$variant(self)
            }

            #[inline]
            fn from_value(v: Value) -> Self {
                v.to_prim::<$ty>()
            }

            array_hooks!($variant);
        }

        impl Scalar for $ty {
            #[inline]
            fn zero() -> Self {
                0
            }
            #[inline]
            fn one() -> Self {
                1
            }
            #[inline]
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            fn from_usize(v: usize) -> Self {
                v as Self
            }
            #[inline]
            fn wrapping_add(self, rhs: Self) -> Self {
                <$ty>::wrapping_add(self, rhs)
            }
            #[inline]
            fn wrapping_mul(self, rhs: Self) -> Self {
                <$ty>::wrapping_mul(self, rhs)
            }
        }
    };
}

impl_element_int!(i8, Int8);
impl_element_int!(i16, Int16);
impl_element_int!(i32, Int32);
impl_element_int!(i64, Int64);
impl_element_int!(u8, UInt8);
impl_element_int!(u16, UInt16);
impl_element_int!(u32, UInt32);
impl_element_int!(u64, UInt64);

macro_rules! impl_element_float {
    ($ty:ty, $variant:ident, $complex:ident) => {
        impl Element for $ty {
            const DTYPE: DType = DType::$variant;

            #[inline]
            fn into_value(self) -> Value {
                Value::$variant(self)
            }

            #[inline]
            fn from_value(v: Value) -> Self {
                v.to_prim::<$ty>()
            }

            array_hooks!($variant);
        }

        impl Scalar for $ty {
            #[inline]
            fn zero() -> Self {
                0.0
            }
            #[inline]
            fn one() -> Self {
                1.0
            }
            #[inline]
            #[allow(clippy::cast_precision_loss)]
            fn from_usize(v: usize) -> Self {
                v as Self
            }
            #[inline]
            fn wrapping_add(self, rhs: Self) -> Self {
                self + rhs
            }
            #[inline]
            fn wrapping_mul(self, rhs: Self) -> Self {
                self * rhs
            }
        }

        impl Float for $ty {}

        impl Element for Complex<$ty> {
            const DTYPE: DType = DType::$complex;
            const IS_COMPLEX: bool = true;

            #[inline]
            fn into_value(self) -> Value {
                Value::$complex(self)
            }

            #[inline]
            fn from_value(v: Value) -> Self {
                let (re, im) = v.to_parts();
                #[allow(clippy::cast_possible_truncation)]
                Complex::new(re as $ty, im as $ty)
            }

            #[inline]
            fn conj(self) -> Self {
                Complex::conj(&self)
            }

            array_hooks!($complex);
        }

        impl Scalar for Complex<$ty> {
            #[inline]
            fn zero() -> Self {
                Complex::new(0.0, 0.0)
            }
            #[inline]
            fn one() -> Self {
                Complex::new(1.0, 0.0)
            }
            #[inline]
            #[allow(clippy::cast_precision_loss)]
            fn from_usize(v: usize) -> Self {
                Complex::new(v as $ty, 0.0)
            }
            #[inline]
            fn wrapping_add(self, rhs: Self) -> Self {
                self + rhs
            }
            #[inline]
            fn wrapping_mul(self, rhs: Self) -> Self {
                self * rhs
            }
        }
    };
}

impl_element_float!(f32, Float32, Complex32);
impl_element_float!(f64, Float64, Complex64);

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(DType::Bool.kind(), Kind::Bool);
        assert_eq!(DType::UInt16.kind(), Kind::Integer);
        assert_eq!(DType::Float32.kind(), Kind::Float);
        assert_eq!(DType::Complex64.kind(), Kind::Complex);
        assert!(DType::Int8.is_signed());
        assert!(!DType::UInt8.is_signed());
    }

    #[test]
    fn test_real_part() {
        assert_eq!(DType::Complex32.real_part(), DType::Float32);
        assert_eq!(DType::Complex64.real_part(), DType::Float64);
        assert_eq!(DType::Int32.real_part(), DType::Int32);
    }

    #[test]
    fn test_element_tags() {
        assert_eq!(bool::DTYPE, DType::Bool);
        assert_eq!(u32::DTYPE, DType::UInt32);
        assert_eq!(<Complex<f32>>::DTYPE, DType::Complex32);
        assert!(<Complex<f64>>::IS_COMPLEX);
        assert!(!f64::IS_COMPLEX);
    }

    #[test]
    fn test_scalar_zero_one() {
        assert_eq!(f64::zero(), 0.0);
        assert_eq!(i32::one(), 1);
        assert_eq!(<Complex<f64>>::one(), Complex::new(1.0, 0.0));
        assert_eq!(u8::from_usize(255), 255_u8);
        assert_eq!(Scalar::wrapping_add(i8::MAX, 1), i8::MIN);
        assert_eq!(Scalar::wrapping_mul(200_u8, 2), 144);
    }

    #[test]
    fn test_conj() {
        assert_eq!(Complex::new(1.0_f64, 2.0).conj(), Complex::new(1.0, -2.0));
        assert_eq!(Element::conj(3_i32), 3);
    }

    #[test]
    fn test_from_value_casts() {
        assert_eq!(i16::from_value(Value::Float64(-2.75)), -2);
        assert_eq!(u8::from_value(Value::Bool(true)), 1);
        assert!(bool::from_value(Value::Int32(7)));
        assert_eq!(
            <Complex<f32>>::from_value(Value::Int64(3)),
            Complex::new(3.0, 0.0)
        );
    }
}
