//! Type promotion: which element type an elementwise result gets.
//!
//! [`resolve`] is consulted before any output buffer is allocated. It either
//! names a concrete [`DType`] the result is written into, or answers
//! [`Promoted::Any`], which sends the call down the generic broadcast path
//! where each element keeps the natural type of its operator.

use crate::dtype::{DType, Kind};
use crate::error::{CoreError, Result};
use crate::ops::{BinaryOp, UnaryOp};

/// Outcome of resolving a binary elementwise operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Promoted {
    /// A specialized rule matched; allocate a buffer of this type.
    Typed(DType),
    /// No rule matched; use the generic path.
    Any,
}

impl Promoted {
    /// The concrete type, if one was resolved.
    pub const fn dtype(self) -> Option<DType> {
        match self {
            Promoted::Typed(t) => Some(t),
            Promoted::Any => None,
        }
    }
}

/// Resolve the result element type of `array op other`.
///
/// `array` is the element type of the array operand (the left array for
/// array-array calls) and `other` the type of the scalar or second array.
/// Rules, most specific first:
///
/// 1. integer ⊕ integer under `Div`/`LeftDiv` keeps the array's type;
/// 2. integer ⊕ bool (either side) keeps the integer type;
/// 3. integer ⊕ integer widens to the more general integer type;
/// 4. a float absorbs any bool, integer or narrower float;
/// 5. anything else is [`Promoted::Any`].
///
/// Bitwise and shift operators with a float or complex operand always
/// resolve to `Any`.
pub fn resolve(op: BinaryOp, array: DType, other: DType) -> Promoted {
    use Kind::{Bool, Float, Integer};

    if op.is_bitwise() && (non_integral(array) || non_integral(other)) {
        return Promoted::Any;
    }

    match (array.kind(), other.kind()) {
        (Integer, Integer) if matches!(op, BinaryOp::Div | BinaryOp::LeftDiv) => {
            Promoted::Typed(array)
        }
        (Integer, Bool) => Promoted::Typed(array),
        (Bool, Integer) => Promoted::Typed(other),
        (Integer, Integer) => Promoted::Typed(join_integer(array, other)),
        (Float, Float) => Promoted::Typed(join_float(array, other)),
        (Float, Integer | Bool) => Promoted::Typed(array),
        (Integer | Bool, Float) => Promoted::Typed(other),
        _ => Promoted::Any,
    }
}

fn non_integral(t: DType) -> bool {
    matches!(t.kind(), Kind::Float | Kind::Complex)
}

/// Result type of a unary map over elements of type `dtype`.
///
/// Negating booleans yields `Int64`; `Real`/`Imag` of a complex type yield
/// its component type. `Not` is only defined for booleans and `Complement`
/// for booleans and integers.
pub fn resolve_unary(op: UnaryOp, dtype: DType) -> Result<DType> {
    match (op, dtype.kind()) {
        (UnaryOp::Neg, Kind::Bool) => Ok(DType::Int64),
        (UnaryOp::Complement, Kind::Bool | Kind::Integer) | (UnaryOp::Not, Kind::Bool) => {
            Ok(dtype)
        }
        (UnaryOp::Complement | UnaryOp::Not, _) => Err(CoreError::UnsupportedOperation {
            op: op.name(),
            dtype,
        }),
        (UnaryOp::Real | UnaryOp::Imag, _) => Ok(dtype.real_part()),
        (UnaryOp::Neg | UnaryOp::Conj | UnaryOp::Sign, _) => Ok(dtype),
    }
}

/// Output element type of a cumulative reduction with `op` over `dtype`.
///
/// Summing or multiplying booleans counts them, so the output widens to
/// `Int64`; every other type accumulates in itself.
pub fn resolve_accumulate(op: BinaryOp, dtype: DType) -> DType {
    match (op, dtype) {
        (BinaryOp::Add | BinaryOp::Mul, DType::Bool) => DType::Int64,
        _ => dtype,
    }
}

/// The more general of two integer types: the wider width wins, and at
/// equal width the unsigned type wins.
pub fn join_integer(a: DType, b: DType) -> DType {
    match a.bits().cmp(&b.bits()) {
        core::cmp::Ordering::Greater => a,
        core::cmp::Ordering::Less => b,
        core::cmp::Ordering::Equal if a.is_signed() && !b.is_signed() => b,
        core::cmp::Ordering::Equal => a,
    }
}

/// The wider of two float types.
pub fn join_float(a: DType, b: DType) -> DType {
    if b.bits() > a.bits() { b } else { a }
}

/// The common type two values are converted to by the scalar operators,
/// independent of the operator.
///
/// Booleans join to booleans, integers as in [`join_integer`], floats absorb
/// booleans and integers, and complex absorbs everything. A complex result is
/// `Complex64` if either side carries `f64` precision.
pub fn natural_join(a: DType, b: DType) -> DType {
    use Kind::{Bool, Complex, Float, Integer};

    if a == b {
        return a;
    }
    match (a.kind(), b.kind()) {
        (Complex, _) | (_, Complex) => {
            let wide = |t: DType| matches!(t, DType::Complex64 | DType::Float64);
            if wide(a) || wide(b) {
                DType::Complex64
            } else {
                DType::Complex32
            }
        }
        (Float, Float) => join_float(a, b),
        (Float, _) => a,
        (_, Float) => b,
        (Integer, Integer) => join_integer(a, b),
        (Integer, Bool) => a,
        (Bool, Integer) => b,
        (Bool, Bool) => DType::Bool,
    }
}

/// Broadcast two shapes against each other.
///
/// Shapes are aligned at their trailing dimension (row-major convention);
/// missing leading dimensions count as 1. Each aligned pair must be equal or
/// contain a 1. The result is the elementwise maximum.
pub fn promote_shape(a: &[usize], b: &[usize]) -> Result<Vec<usize>> {
    let ndim = a.len().max(b.len());
    let mut out = vec![0usize; ndim];
    for (i, slot) in out.iter_mut().enumerate() {
        let da = dim_from_end(a, ndim - 1 - i);
        let db = dim_from_end(b, ndim - 1 - i);
        *slot = if da == db || db == 1 {
            da
        } else if da == 1 {
            db
        } else {
            return Err(CoreError::ShapeMismatch {
                expected: a.to_vec(),
                got: b.to_vec(),
            });
        };
    }
    Ok(out)
}

/// Extent of the `k`-th dimension counted from the end, 1 if absent.
fn dim_from_end(shape: &[usize], k: usize) -> usize {
    if k < shape.len() {
        shape[shape.len() - 1 - k]
    } else {
        1
    }
}
