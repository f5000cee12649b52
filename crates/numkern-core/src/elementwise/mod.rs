//! Elementwise maps over dynamically typed arrays.
//!
//! Every entry point resolves the output element type first, then fills one
//! buffer of that type in a single pass, reading the operands in place. Binary maps consult
//! [`resolve`]; when no specialized rule applies the call goes down the
//! generic path, where the output takes the natural type of the operator
//! (see [`natural_type`]).
//!
//! Array-array maps broadcast their operands (see
//! [`promote_shape`](crate::promote::promote_shape)); array-scalar maps keep
//! the array's shape.

mod scalar;

pub use scalar::{array_scalar, scalar_array};

use log::debug;

use crate::array::{NdArray, dispatch};
use crate::dtype::{DType, Element};
use crate::error::{CoreError, Result};
use crate::ops::{BinaryOp, UnaryOp, apply_in, apply_unary, natural_type};
use crate::promote::{Promoted, promote_shape, resolve, resolve_unary};
use crate::tensor::BroadcastIter;

// ======================================================================
// Unary maps
// ======================================================================

/// Apply a unary operator to every element.
///
/// The output has the shape of `a` and the element type given by
/// [`resolve_unary`]; an operator undefined for the element type fails
/// before anything is allocated.
pub fn unary(op: UnaryOp, a: &NdArray) -> Result<NdArray> {
    let dtype = resolve_unary(op, a.dtype())?;
    dispatch!(a, t => NdArray::fill_from(
        dtype,
        t.shape().to_vec(),
        t.iter().map(|&x| apply_unary(op, x.into_value())),
    ))
}

/// `-a`. Negating a boolean array produces `Int64`.
pub fn neg(a: &NdArray) -> Result<NdArray> {
    unary(UnaryOp::Neg, a)
}

/// `~a`: bitwise complement of integers, logical not of booleans.
pub fn complement(a: &NdArray) -> Result<NdArray> {
    unary(UnaryOp::Complement, a)
}

/// Complex conjugate; a copy for non-complex arrays.
pub fn conj(a: &NdArray) -> Result<NdArray> {
    if !a.dtype().is_complex() {
        return Ok(a.clone());
    }
    unary(UnaryOp::Conj, a)
}

/// Elementwise sign: -1, 0 or 1 in the input type, `z / |z|` for complex.
pub fn sign(a: &NdArray) -> Result<NdArray> {
    unary(UnaryOp::Sign, a)
}

/// Logical not; booleans only.
pub fn not(a: &NdArray) -> Result<NdArray> {
    unary(UnaryOp::Not, a)
}

/// Real parts, as the component float type for complex input.
pub fn real(a: &NdArray) -> Result<NdArray> {
    unary(UnaryOp::Real, a)
}

/// Imaginary parts; zeros of the same type for real input.
pub fn imag(a: &NdArray) -> Result<NdArray> {
    unary(UnaryOp::Imag, a)
}

/// Conjugate a complex array in place. Other arrays are left untouched.
pub fn conj_inplace(a: &mut NdArray) {
    match a {
        NdArray::Complex32(t) => t.apply(Element::conj),
        NdArray::Complex64(t) => t.apply(Element::conj),
        _ => {}
    }
}

// ======================================================================
// Array-array maps
// ======================================================================

/// Apply `op` to the broadcast-aligned elements of two arrays.
///
/// Only the operators in [`BinaryOp::ARRAY_ARRAY`] are defined between
/// arrays; any other is an `InvalidArgument`. Incompatible shapes are a
/// `ShapeMismatch`.
///
/// ```
/// # use numkern_core::{array::NdArray, dtype::DType, elementwise, ops::BinaryOp, tensor::Tensor};
/// let a = NdArray::from(Tensor::from_vec(vec![5_i64, 5, 5], vec![3]).unwrap());
/// let b = NdArray::from(Tensor::from_vec(vec![1_i64, 2, 3], vec![3]).unwrap());
/// let c = elementwise::binary(BinaryOp::Sub, &a, &b).unwrap();
/// assert_eq!(c.dtype(), DType::Int64);
/// assert_eq!(c.try_into_tensor::<i64>().unwrap().as_slice(), &[4, 3, 2]);
/// ```
pub fn binary(op: BinaryOp, a: &NdArray, b: &NdArray) -> Result<NdArray> {
    if !op.is_array_array() {
        return Err(CoreError::InvalidArgument {
            reason: "operator is not defined between two arrays",
        });
    }
    let shape = promote_shape(a.shape(), b.shape())?;
    match resolve(op, a.dtype(), b.dtype()) {
        Promoted::Typed(dtype) => fill_broadcast(op, dtype, a, b, shape),
        Promoted::Any => {
            debug!(
                "{op}: no specialized rule for {} and {}, using generic broadcast",
                a.dtype(),
                b.dtype()
            );
            broadcast_generic(op, a, b)
        }
    }
}

/// Generic broadcasting path: the result takes the natural type of `op` for
/// the two element types. Validates shapes and operator support itself.
pub fn broadcast_generic(op: BinaryOp, a: &NdArray, b: &NdArray) -> Result<NdArray> {
    let shape = promote_shape(a.shape(), b.shape())?;
    let dtype = natural_type(op, a.dtype(), b.dtype())?;
    fill_broadcast(op, dtype, a, b, shape)
}

fn fill_broadcast(
    op: BinaryOp,
    dtype: DType,
    a: &NdArray,
    b: &NdArray,
    shape: Vec<usize>,
) -> Result<NdArray> {
    let pairs = BroadcastIter::new(a.shape(), &shape).zip(BroadcastIter::new(b.shape(), &shape));
    NdArray::fill_from(
        dtype,
        shape,
        pairs.map(|(ia, ib)| apply_in(op, dtype, a.element(ia), b.element(ib))),
    )
}
