//! Array-scalar maps and the `+`/`-` operator aliases on [`NdArray`].

use core::ops::{Add, Neg, Sub};

use log::debug;

use crate::array::{NdArray, dispatch};
use crate::dtype::{DType, Element};
use crate::error::Result;
use crate::ops::{BinaryOp, apply_in, natural_type};
use crate::promote::{Promoted, resolve};
use crate::value::Value;

/// Output type of `array op scalar` or `scalar op array`: the resolver's
/// answer, or the operator's natural type on the generic path.
fn scalar_result_type(op: BinaryOp, array: DType, scalar: DType, scalar_left: bool) -> Result<DType> {
    match resolve(op, array, scalar) {
        Promoted::Typed(dtype) => Ok(dtype),
        Promoted::Any => {
            debug!("{op}: no specialized rule for {array} and scalar {scalar}, using generic path");
            if scalar_left {
                natural_type(op, scalar, array)
            } else {
                natural_type(op, array, scalar)
            }
        }
    }
}

/// `a[i] op s` for every element of `a`. Every [`BinaryOp`] is defined here.
///
/// ```
/// # use numkern_core::{array::NdArray, dtype::DType, elementwise, ops::BinaryOp, tensor::Tensor, value::Value};
/// let a = NdArray::from(Tensor::from_vec(vec![7_i32, 8, 9], vec![3]).unwrap());
/// let q = elementwise::array_scalar(BinaryOp::Div, &a, Value::Int32(2)).unwrap();
/// assert_eq!(q.dtype(), DType::Int32);
/// assert_eq!(q.try_into_tensor::<i32>().unwrap().as_slice(), &[3, 4, 4]);
/// ```
pub fn array_scalar(op: BinaryOp, a: &NdArray, s: Value) -> Result<NdArray> {
    let dtype = scalar_result_type(op, a.dtype(), s.dtype(), false)?;
    dispatch!(a, t => NdArray::fill_from(
        dtype,
        t.shape().to_vec(),
        t.iter().map(|&x| apply_in(op, dtype, x.into_value(), s)),
    ))
}

/// `s op a[i]` for every element of `a`, keeping the operand order for
/// non-commutative operators.
pub fn scalar_array(op: BinaryOp, s: Value, a: &NdArray) -> Result<NdArray> {
    let dtype = scalar_result_type(op, a.dtype(), s.dtype(), true)?;
    dispatch!(a, t => NdArray::fill_from(
        dtype,
        t.shape().to_vec(),
        t.iter().map(|&x| apply_in(op, dtype, s, x.into_value())),
    ))
}

// ======================================================================
// Operator aliases (Result-valued: `(&a + Value::from(1))?`)
// ======================================================================

macro_rules! impl_array_scalar_op {
    ($trait:ident, $method:ident, $op:expr) => {
        impl $trait<Value> for &NdArray {
            type Output = Result<NdArray>;

            fn $method(self, rhs: Value) -> Result<NdArray> {
                array_scalar($op, self, rhs)
            }
        }

        impl $trait<&NdArray> for Value {
            type Output = Result<NdArray>;

            fn $method(self, rhs: &NdArray) -> Result<NdArray> {
                scalar_array($op, self, rhs)
            }
        }

        impl $trait<&NdArray> for &NdArray {
            type Output = Result<NdArray>;

            fn $method(self, rhs: &NdArray) -> Result<NdArray> {
                super::binary($op, self, rhs)
            }
        }
    };
}

impl_array_scalar_op!(Add, add, BinaryOp::Add);
impl_array_scalar_op!(Sub, sub, BinaryOp::Sub);

impl Neg for &NdArray {
    type Output = Result<NdArray>;

    fn neg(self) -> Result<NdArray> {
        super::neg(self)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::tensor::Tensor;
    use num_complex::Complex;
    use rstest::rstest;

    fn arr<T: Element>(data: Vec<T>) -> NdArray {
        let n = data.len();
        NdArray::from(Tensor::from_vec(data, vec![n]).unwrap())
    }

    #[test]
    fn test_order_matters_for_sub() {
        let a = arr(vec![1_i32, 2, 3]);
        let left = array_scalar(BinaryOp::Sub, &a, Value::Int32(10)).unwrap();
        let right = scalar_array(BinaryOp::Sub, Value::Int32(10), &a).unwrap();
        assert_eq!(left, arr(vec![-9_i32, -8, -7]));
        assert_eq!(right, arr(vec![9_i32, 8, 7]));
    }

    #[test]
    fn test_integer_division_keeps_array_type() {
        let a = arr(vec![7_u8, 9]);
        let q = array_scalar(BinaryOp::Div, &a, Value::Int64(2)).unwrap();
        assert_eq!(q, arr(vec![3_u8, 4]));
        let l = scalar_array(BinaryOp::LeftDiv, Value::Int64(2), &a).unwrap();
        assert_eq!(l, arr(vec![3_u8, 4]));
    }

    #[test]
    fn test_wide_divisor_is_not_truncated() {
        let a = arr(vec![100_i8, 50]);
        let q = array_scalar(BinaryOp::Div, &a, Value::Int64(256)).unwrap();
        assert_eq!(q, arr(vec![0_i8, 0]));
        let q = array_scalar(BinaryOp::Div, &a, Value::Int64(1000)).unwrap();
        assert_eq!(q, arr(vec![0_i8, 0]));
        let q = array_scalar(BinaryOp::Div, &a, Value::Int64(-30)).unwrap();
        assert_eq!(q, arr(vec![-3_i8, -1]));
    }

    #[test]
    fn test_wide_dividend_is_not_truncated() {
        let a = arr(vec![100_i8, 7]);
        let q = scalar_array(BinaryOp::Div, Value::Int64(1000), &a).unwrap();
        assert_eq!(q, arr(vec![10_i8, -114]));
        let l = scalar_array(BinaryOp::LeftDiv, Value::Int64(1000), &a).unwrap();
        assert_eq!(l, arr(vec![0_i8, 0]));
        let u = arr(vec![3_u8]);
        assert_eq!(
            array_scalar(BinaryOp::Div, &u, Value::UInt64(u64::MAX)).unwrap(),
            arr(vec![0_u8])
        );
    }

    #[test]
    fn test_bool_scalar_keeps_integer_type() {
        let a = arr(vec![1_i16, 2]);
        let r = array_scalar(BinaryOp::Mul, &a, Value::Bool(true)).unwrap();
        assert_eq!(r.dtype(), DType::Int16);
        let r = scalar_array(BinaryOp::Add, Value::Bool(true), &a).unwrap();
        assert_eq!(r, arr(vec![2_i16, 3]));
    }

    #[rstest]
    #[case(DType::Int8, Value::Int32(1), DType::Int32)]
    #[case(DType::UInt32, Value::Int32(1), DType::UInt32)]
    #[case(DType::Int64, Value::Float32(1.0), DType::Float32)]
    #[case(DType::Float64, Value::Float32(1.0), DType::Float64)]
    #[case(DType::Bool, Value::Float64(1.0), DType::Float64)]
    #[case(DType::Complex32, Value::Float64(1.0), DType::Complex64)]
    #[case(DType::Float32, Value::Complex32(Complex::new(0.0, 1.0)), DType::Complex32)]
    #[case(DType::Bool, Value::Bool(true), DType::Int64)]
    fn test_add_result_types(#[case] array: DType, #[case] s: Value, #[case] expected: DType) {
        let a = NdArray::similar(array, vec![2]);
        assert_eq!(array_scalar(BinaryOp::Add, &a, s).unwrap().dtype(), expected);
    }

    #[test]
    fn test_pow_and_shifts() {
        let a = arr(vec![2_i64, 3]);
        assert_eq!(
            array_scalar(BinaryOp::Pow, &a, Value::Int64(3)).unwrap(),
            arr(vec![8_i64, 27])
        );
        assert_eq!(
            scalar_array(BinaryOp::Shl, Value::Int64(1), &a).unwrap(),
            arr(vec![4_i64, 8])
        );
        assert_eq!(
            array_scalar(BinaryOp::Shr, &a, Value::Int64(1)).unwrap(),
            arr(vec![1_i64, 1])
        );
    }

    #[test]
    fn test_shift_float_is_unsupported() {
        let a = arr(vec![1.0_f32]);
        assert!(matches!(
            array_scalar(BinaryOp::Shl, &a, Value::Int32(1)),
            Err(CoreError::UnsupportedOperation { op: "shl", .. })
        ));
    }

    #[test]
    fn test_true_division_of_floats() {
        let a = arr(vec![1.0_f64, 3.0]);
        assert_eq!(
            array_scalar(BinaryOp::Div, &a, Value::Int32(2)).unwrap(),
            arr(vec![0.5_f64, 1.5])
        );
    }

    #[test]
    fn test_operator_aliases() {
        let a = arr(vec![1_i32, 2]);
        assert_eq!((&a + Value::Int32(1)).unwrap(), arr(vec![2_i32, 3]));
        assert_eq!((Value::Int32(1) - &a).unwrap(), arr(vec![0_i32, -1]));
        assert_eq!((&a - &a).unwrap(), arr(vec![0_i32, 0]));
        assert_eq!((-&a).unwrap(), arr(vec![-1_i32, -2]));

        let b = arr(vec![true, false]);
        assert_eq!((&b + Value::Int8(1)).unwrap(), arr(vec![2_i8, 1]));
        assert_eq!((Value::Int8(1) - &b).unwrap(), arr(vec![0_i8, 1]));
    }

    #[test]
    fn test_operator_alias_shape_mismatch() {
        let a = arr(vec![1_i32, 2]);
        let b = arr(vec![1_i32, 2, 3]);
        assert!((&a + &b).is_err());
    }
}
