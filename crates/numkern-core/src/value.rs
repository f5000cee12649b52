//! Dynamically typed scalar values.
//!
//! A [`Value`] is one element of any [`DType`]. Elementwise kernels read
//! operands as values, apply the operator table in [`ops`](crate::ops), and
//! cast the result into the promoted element type of the output buffer.

use num_complex::Complex;
use num_traits::AsPrimitive;

use crate::dtype::{DType, Element};

/// A single element of any concrete [`DType`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Complex32(Complex<f32>),
    Complex64(Complex<f64>),
}

impl Value {
    /// The element type of this value.
    pub const fn dtype(&self) -> DType {
        match self {
            Value::Bool(_) => DType::Bool,
            Value::Int8(_) => DType::Int8,
            Value::Int16(_) => DType::Int16,
            Value::Int32(_) => DType::Int32,
            Value::Int64(_) => DType::Int64,
            Value::UInt8(_) => DType::UInt8,
            Value::UInt16(_) => DType::UInt16,
            Value::UInt32(_) => DType::UInt32,
            Value::UInt64(_) => DType::UInt64,
            Value::Float32(_) => DType::Float32,
            Value::Float64(_) => DType::Float64,
            Value::Complex32(_) => DType::Complex32,
            Value::Complex64(_) => DType::Complex64,
        }
    }

    /// The zero of `dtype` (`false` for booleans).
    pub fn zero(dtype: DType) -> Value {
        Value::Bool(false).cast(dtype)
    }

    /// Convert to a primitive number with `as` semantics: floats saturate
    /// into integers, integers wrap into narrower integers, `true` is 1 and
    /// complex values contribute their real part.
    pub fn to_prim<T>(self) -> T
    where
        T: Copy + 'static,
        u8: AsPrimitive<T>,
        i8: AsPrimitive<T>,
        i16: AsPrimitive<T>,
        i32: AsPrimitive<T>,
        i64: AsPrimitive<T>,
        u16: AsPrimitive<T>,
        u32: AsPrimitive<T>,
        u64: AsPrimitive<T>,
        f32: AsPrimitive<T>,
        f64: AsPrimitive<T>,
    {
        match self {
            Value::Bool(x) => u8::from(x).as_(),
            Value::Int8(x) => x.as_(),
            Value::Int16(x) => x.as_(),
            Value::Int32(x) => x.as_(),
            Value::Int64(x) => x.as_(),
            Value::UInt8(x) => x.as_(),
            Value::UInt16(x) => x.as_(),
            Value::UInt32(x) => x.as_(),
            Value::UInt64(x) => x.as_(),
            Value::Float32(x) => x.as_(),
            Value::Float64(x) => x.as_(),
            Value::Complex32(z) => z.re.as_(),
            Value::Complex64(z) => z.re.as_(),
        }
    }

    /// Truthiness: any non-zero component is `true`.
    pub fn to_bool(self) -> bool {
        match self {
            Value::Bool(x) => x,
            Value::Complex32(z) => z.re != 0.0 || z.im != 0.0,
            Value::Complex64(z) => z.re != 0.0 || z.im != 0.0,
            other => other.to_prim::<f64>() != 0.0,
        }
    }

    /// Real and imaginary components widened to `f64`.
    pub fn to_parts(self) -> (f64, f64) {
        match self {
            Value::Complex32(z) => (f64::from(z.re), f64::from(z.im)),
            Value::Complex64(z) => (z.re, z.im),
            other => (other.to_prim::<f64>(), 0.0),
        }
    }

    /// Convert to another element type. A cast to the value's own type is the
    /// identity.
    pub fn cast(self, to: DType) -> Value {
        if self.dtype() == to {
            return self;
        }
        match to {
            DType::Bool => Value::Bool(self.to_bool()),
            DType::Int8 => Value::Int8(self.to_prim()),
            DType::Int16 => Value::Int16(self.to_prim()),
            DType::Int32 => Value::Int32(self.to_prim()),
            DType::Int64 => Value::Int64(self.to_prim()),
            DType::UInt8 => Value::UInt8(self.to_prim()),
            DType::UInt16 => Value::UInt16(self.to_prim()),
            DType::UInt32 => Value::UInt32(self.to_prim()),
            DType::UInt64 => Value::UInt64(self.to_prim()),
            DType::Float32 => Value::Float32(self.to_prim()),
            DType::Float64 => Value::Float64(self.to_prim()),
            DType::Complex32 => Value::Complex32(Element::from_value(self)),
            DType::Complex64 => Value::Complex64(Element::from_value(self)),
        }
    }

    /// Extract a native element, casting if the types differ.
    #[inline]
    pub fn extract<T: Element>(self) -> T {
        T::from_value(self)
    }
}

macro_rules! impl_from_native {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )+
    };
}

impl_from_native!(
    bool => Bool,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
    Complex<f32> => Complex32,
    Complex<f64> => Complex64,
);

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_dtype_of_value() {
        assert_eq!(Value::from(true).dtype(), DType::Bool);
        assert_eq!(Value::from(1_u16).dtype(), DType::UInt16);
        assert_eq!(Value::from(Complex::new(0.0_f32, 1.0)).dtype(), DType::Complex32);
    }

    #[test]
    fn test_cast_identity() {
        let v = Value::Float32(1.5);
        assert_eq!(v.cast(DType::Float32), v);
    }

    #[test]
    fn test_cast_float_to_int_saturates() {
        assert_eq!(Value::Float64(1e10).cast(DType::Int8), Value::Int8(127));
        assert_eq!(Value::Float64(-3.9).cast(DType::Int32), Value::Int32(-3));
        assert_eq!(Value::Float64(f64::NAN).cast(DType::Int32), Value::Int32(0));
    }

    #[test]
    fn test_cast_int_wraps() {
        assert_eq!(Value::Int32(300).cast(DType::UInt8), Value::UInt8(44));
        assert_eq!(Value::Int8(-1).cast(DType::UInt16), Value::UInt16(u16::MAX));
    }

    #[test]
    fn test_cast_bool() {
        assert_eq!(Value::Bool(true).cast(DType::Float64), Value::Float64(1.0));
        assert_eq!(Value::Int64(0).cast(DType::Bool), Value::Bool(false));
        assert_eq!(
            Value::Complex64(Complex::new(0.0, 2.0)).cast(DType::Bool),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_cast_complex() {
        let z = Value::Complex64(Complex::new(1.5, -2.0));
        assert_eq!(z.cast(DType::Float64), Value::Float64(1.5));
        assert_eq!(
            Value::Int16(4).cast(DType::Complex32),
            Value::Complex32(Complex::new(4.0, 0.0))
        );
        assert_eq!(
            z.cast(DType::Complex32),
            Value::Complex32(Complex::new(1.5, -2.0))
        );
    }

    #[test]
    fn test_zero() {
        for dtype in DType::ALL {
            let z = Value::zero(dtype);
            assert_eq!(z.dtype(), dtype);
            assert!(!z.to_bool());
        }
    }
}
