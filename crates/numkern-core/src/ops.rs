//! Operator tags and the operator table.
//!
//! Each [`UnaryOp`] / [`BinaryOp`] maps to a scalar implementation on
//! [`Value`]s. These are the black-box element operators the elementwise
//! engine calls; which *array* element type they write into is decided by
//! the resolver in [`promote`](crate::promote).
//!
//! Binary application happens in two steps: both operands are converted to a
//! single evaluation type, then the operator is evaluated in that type by
//! [`apply_in`]. [`apply_binary`] picks the evaluation type with
//! [`natural_type`]; the typed array paths pass the resolver's result type
//! instead.

use core::fmt;

use num_complex::Complex;

use crate::dtype::{DType, Float, Kind, Scalar};
use crate::error::{CoreError, Result};
use crate::promote::natural_join;
use crate::value::Value;

// ======================================================================
// Operator tags
// ======================================================================

/// Unary elementwise operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// Arithmetic negation (`-x`). Negating a boolean yields an `Int64`.
    Neg,
    /// Bitwise complement (`~x`); logical not on booleans.
    Complement,
    /// Complex conjugate; the identity for non-complex types.
    Conj,
    /// Sign: -1, 0 or 1 in the operand's type (`z / |z|` for complex).
    Sign,
    /// Logical not, booleans only.
    Not,
    /// Real component.
    Real,
    /// Imaginary component (zero for real types).
    Imag,
}

impl UnaryOp {
    pub const ALL: [UnaryOp; 7] = [
        UnaryOp::Neg,
        UnaryOp::Complement,
        UnaryOp::Conj,
        UnaryOp::Sign,
        UnaryOp::Not,
        UnaryOp::Real,
        UnaryOp::Imag,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            UnaryOp::Neg => "neg",
            UnaryOp::Complement => "complement",
            UnaryOp::Conj => "conj",
            UnaryOp::Sign => "sign",
            UnaryOp::Not => "not",
            UnaryOp::Real => "real",
            UnaryOp::Imag => "imag",
        }
    }
}

/// Binary elementwise operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    /// True division `a / b`.
    Div,
    /// Left division `a \ b`, i.e. `b / a`.
    LeftDiv,
    Pow,
    /// Division truncated toward zero.
    IntDiv,
    /// Floored modulus; the result takes the sign of the divisor.
    Mod,
    /// Truncated remainder; the result takes the sign of the dividend.
    Rem,
    Shl,
    Shr,
    And,
    Or,
    Xor,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 14] = [
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Mul,
        BinaryOp::Div,
        BinaryOp::LeftDiv,
        BinaryOp::Pow,
        BinaryOp::IntDiv,
        BinaryOp::Mod,
        BinaryOp::Rem,
        BinaryOp::Shl,
        BinaryOp::Shr,
        BinaryOp::And,
        BinaryOp::Or,
        BinaryOp::Xor,
    ];

    /// Operators defined between two arrays. Everything in [`ALL`](Self::ALL)
    /// is defined between an array and a scalar.
    pub const ARRAY_ARRAY: [BinaryOp; 7] = [
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::IntDiv,
        BinaryOp::Mod,
        BinaryOp::And,
        BinaryOp::Or,
        BinaryOp::Xor,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::Div => "div",
            BinaryOp::LeftDiv => "ldiv",
            BinaryOp::Pow => "pow",
            BinaryOp::IntDiv => "intdiv",
            BinaryOp::Mod => "mod",
            BinaryOp::Rem => "rem",
            BinaryOp::Shl => "shl",
            BinaryOp::Shr => "shr",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Xor => "xor",
        }
    }

    /// `a op b == b op a` for all operands.
    pub const fn is_commutative(self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Mul | BinaryOp::And | BinaryOp::Or | BinaryOp::Xor
        )
    }

    /// Bitwise operators, defined for booleans and integers only.
    pub const fn is_bitwise(self) -> bool {
        matches!(
            self,
            BinaryOp::And | BinaryOp::Or | BinaryOp::Xor | BinaryOp::Shl | BinaryOp::Shr
        )
    }

    /// Truncating divisions: `Div`, `LeftDiv` and `IntDiv`.
    pub const fn is_division(self) -> bool {
        matches!(self, BinaryOp::Div | BinaryOp::LeftDiv | BinaryOp::IntDiv)
    }

    pub const fn is_shift(self) -> bool {
        matches!(self, BinaryOp::Shl | BinaryOp::Shr)
    }

    /// Whether the operator is defined between two arrays.
    pub fn is_array_array(self) -> bool {
        Self::ARRAY_ARRAY.contains(&self)
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn unsupported(op: &'static str, dtype: DType) -> CoreError {
    CoreError::UnsupportedOperation { op, dtype }
}

// ======================================================================
// Unary table
// ======================================================================

/// Apply a unary operator to one value.
///
/// The result type always agrees with
/// [`resolve_unary`](crate::promote::resolve_unary).
pub fn apply_unary(op: UnaryOp, v: Value) -> Result<Value> {
    use UnaryOp::{Complement, Conj, Imag, Neg, Not, Real, Sign};
    use Value as V;

    let out = match (op, v) {
        (Neg, V::Bool(x)) => V::Int64(-i64::from(x)),
        (Neg, V::Int8(x)) => V::Int8(x.wrapping_neg()),
        (Neg, V::Int16(x)) => V::Int16(x.wrapping_neg()),
        (Neg, V::Int32(x)) => V::Int32(x.wrapping_neg()),
        (Neg, V::Int64(x)) => V::Int64(x.wrapping_neg()),
        (Neg, V::UInt8(x)) => V::UInt8(x.wrapping_neg()),
        (Neg, V::UInt16(x)) => V::UInt16(x.wrapping_neg()),
        (Neg, V::UInt32(x)) => V::UInt32(x.wrapping_neg()),
        (Neg, V::UInt64(x)) => V::UInt64(x.wrapping_neg()),
        (Neg, V::Float32(x)) => V::Float32(-x),
        (Neg, V::Float64(x)) => V::Float64(-x),
        (Neg, V::Complex32(z)) => V::Complex32(-z),
        (Neg, V::Complex64(z)) => V::Complex64(-z),

        (Complement | Not, V::Bool(x)) => V::Bool(!x),
        (Complement, V::Int8(x)) => V::Int8(!x),
        (Complement, V::Int16(x)) => V::Int16(!x),
        (Complement, V::Int32(x)) => V::Int32(!x),
        (Complement, V::Int64(x)) => V::Int64(!x),
        (Complement, V::UInt8(x)) => V::UInt8(!x),
        (Complement, V::UInt16(x)) => V::UInt16(!x),
        (Complement, V::UInt32(x)) => V::UInt32(!x),
        (Complement, V::UInt64(x)) => V::UInt64(!x),

        (Conj, V::Complex32(z)) => V::Complex32(z.conj()),
        (Conj, V::Complex64(z)) => V::Complex64(z.conj()),
        (Conj, other) => other,

        (Sign, V::Bool(x)) => V::Bool(x),
        (Sign, V::Int8(x)) => V::Int8(x.signum()),
        (Sign, V::Int16(x)) => V::Int16(x.signum()),
        (Sign, V::Int32(x)) => V::Int32(x.signum()),
        (Sign, V::Int64(x)) => V::Int64(x.signum()),
        (Sign, V::UInt8(x)) => V::UInt8(u8::from(x != 0)),
        (Sign, V::UInt16(x)) => V::UInt16(u16::from(x != 0)),
        (Sign, V::UInt32(x)) => V::UInt32(u32::from(x != 0)),
        (Sign, V::UInt64(x)) => V::UInt64(u64::from(x != 0)),
        (Sign, V::Float32(x)) => V::Float32(float_sign(x)),
        (Sign, V::Float64(x)) => V::Float64(float_sign(x)),
        (Sign, V::Complex32(z)) => V::Complex32(complex_sign(z)),
        (Sign, V::Complex64(z)) => V::Complex64(complex_sign(z)),

        (Real, V::Complex32(z)) => V::Float32(z.re),
        (Real, V::Complex64(z)) => V::Float64(z.re),
        (Real, other) => other,

        (Imag, V::Complex32(z)) => V::Float32(z.im),
        (Imag, V::Complex64(z)) => V::Float64(z.im),
        (Imag, other) => Value::zero(other.dtype()),

        (op, other) => return Err(unsupported(op.name(), other.dtype())),
    };
    Ok(out)
}

fn float_sign<F: Float>(x: F) -> F {
    // Zeros and NaN map to themselves.
    if x.is_nan() || x == <F as Scalar>::zero() {
        x
    } else {
        x.signum()
    }
}

fn complex_sign<F: Float>(z: Complex<F>) -> Complex<F> {
    let r = z.norm();
    if r == <F as Scalar>::zero() { z } else { z / r }
}

// ======================================================================
// Binary table
// ======================================================================

/// The type `a op b` is evaluated in when no array result type forces
/// another one.
///
/// Arithmetic on two booleans widens to `Int64`; true division of integers
/// produces `Float64`; shifts keep the left operand's type. Bitwise
/// operators on floats or complex numbers are unsupported.
pub fn natural_type(op: BinaryOp, a: DType, b: DType) -> Result<DType> {
    if op.is_bitwise() {
        for t in [a, b] {
            if matches!(t.kind(), Kind::Float | Kind::Complex) {
                return Err(unsupported(op.name(), t));
            }
        }
    }
    if op.is_shift() {
        return Ok(if a == DType::Bool { DType::Int64 } else { a });
    }

    let joined = natural_join(a, b);
    let ty = match (op, joined.kind()) {
        (BinaryOp::And | BinaryOp::Or | BinaryOp::Xor, _) => joined,
        (BinaryOp::Div | BinaryOp::LeftDiv, Kind::Bool | Kind::Integer) => DType::Float64,
        (_, Kind::Bool) => DType::Int64,
        _ => joined,
    };
    Ok(ty)
}

/// Apply a binary operator with its natural evaluation type.
pub fn apply_binary(op: BinaryOp, a: Value, b: Value) -> Result<Value> {
    let ty = natural_type(op, a.dtype(), b.dtype())?;
    apply_in(op, ty, a, b)
}

/// Evaluate `a op b` in element type `ty`.
///
/// Both operands are first cast to `ty` (a shift amount is read as an
/// integer instead). Integer arithmetic wraps at the width of `ty`; integer
/// division by zero is an error.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn apply_in(op: BinaryOp, ty: DType, a: Value, b: Value) -> Result<Value> {
    let name = op.name();
    if op.is_shift() {
        if !matches!(b.dtype().kind(), Kind::Bool | Kind::Integer) {
            return Err(unsupported(name, b.dtype()));
        }
        let amount = shift_amount(b);
        let a = a.cast(ty);
        return if ty.is_signed() {
            Ok(Value::Int64(shift_i64(op, a.to_prim(), amount)).cast(ty))
        } else if ty.is_integer() {
            Ok(Value::UInt64(shift_u64(op, a.to_prim(), amount)).cast(ty))
        } else {
            Err(unsupported(name, ty))
        };
    }

    if ty.is_integer() && op.is_division() && is_integral(a) && is_integral(b) {
        return integer_quotient(op, ty, a, b);
    }

    let a = a.cast(ty);
    let b = b.cast(ty);
    let out = match ty {
        DType::Bool => Value::Bool(
            bool_binary(op, a.to_bool(), b.to_bool()).ok_or_else(|| unsupported(name, ty))?,
        ),
        DType::Int8 => Value::Int8(signed_binary(op, a.to_prim(), b.to_prim())? as i8),
        DType::Int16 => Value::Int16(signed_binary(op, a.to_prim(), b.to_prim())? as i16),
        DType::Int32 => Value::Int32(signed_binary(op, a.to_prim(), b.to_prim())? as i32),
        DType::Int64 => Value::Int64(signed_binary(op, a.to_prim(), b.to_prim())?),
        DType::UInt8 => Value::UInt8(unsigned_binary(op, a.to_prim(), b.to_prim())? as u8),
        DType::UInt16 => Value::UInt16(unsigned_binary(op, a.to_prim(), b.to_prim())? as u16),
        DType::UInt32 => Value::UInt32(unsigned_binary(op, a.to_prim(), b.to_prim())? as u32),
        DType::UInt64 => Value::UInt64(unsigned_binary(op, a.to_prim(), b.to_prim())?),
        DType::Float32 => Value::Float32(
            float_binary::<f32>(op, a.to_prim(), b.to_prim())
                .ok_or_else(|| unsupported(name, ty))?,
        ),
        DType::Float64 => Value::Float64(
            float_binary::<f64>(op, a.to_prim(), b.to_prim())
                .ok_or_else(|| unsupported(name, ty))?,
        ),
        DType::Complex32 => Value::Complex32(
            complex_binary(op, a.extract(), b.extract()).ok_or_else(|| unsupported(name, ty))?,
        ),
        DType::Complex64 => Value::Complex64(
            complex_binary(op, a.extract(), b.extract()).ok_or_else(|| unsupported(name, ty))?,
        ),
    };
    Ok(out)
}

fn is_integral(v: Value) -> bool {
    matches!(v.dtype().kind(), Kind::Bool | Kind::Integer)
}

/// An integral operand held exactly; `i128` covers every `i64` and `u64`.
fn wide_integer(v: Value) -> i128 {
    match v {
        Value::UInt64(x) => i128::from(x),
        other => i128::from(other.to_prim::<i64>()),
    }
}

/// Truncating quotient of two integral operands, computed before narrowing
/// so a divisor wider than `ty` is never truncated. The quotient then wraps
/// into `ty`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn integer_quotient(op: BinaryOp, ty: DType, a: Value, b: Value) -> Result<Value> {
    let (num, den) = match op {
        BinaryOp::LeftDiv => (wide_integer(b), wide_integer(a)),
        _ => (wide_integer(a), wide_integer(b)),
    };
    if den == 0 {
        return Err(CoreError::DivisionByZero);
    }
    let q = num / den;
    Ok(if ty.is_signed() {
        Value::Int64(q as i64).cast(ty)
    } else {
        Value::UInt64(q as u64).cast(ty)
    })
}

fn bool_binary(op: BinaryOp, a: bool, b: bool) -> Option<bool> {
    match op {
        BinaryOp::And => Some(a & b),
        BinaryOp::Or => Some(a | b),
        BinaryOp::Xor => Some(a ^ b),
        _ => None,
    }
}

fn nonzero_i64(b: i64) -> Result<i64> {
    if b == 0 { Err(CoreError::DivisionByZero) } else { Ok(b) }
}

fn nonzero_u64(b: u64) -> Result<u64> {
    if b == 0 { Err(CoreError::DivisionByZero) } else { Ok(b) }
}

/// Signed integer arithmetic on operands already held in `i64`. Narrow
/// types are obtained by truncating the result, which matches wrapping at
/// the narrow width for every operator here.
fn signed_binary(op: BinaryOp, a: i64, b: i64) -> Result<i64> {
    let r = match op {
        BinaryOp::Add => a.wrapping_add(b),
        BinaryOp::Sub => a.wrapping_sub(b),
        BinaryOp::Mul => a.wrapping_mul(b),
        BinaryOp::Div | BinaryOp::IntDiv => a.wrapping_div(nonzero_i64(b)?),
        BinaryOp::LeftDiv => b.wrapping_div(nonzero_i64(a)?),
        BinaryOp::Rem => a.wrapping_rem(nonzero_i64(b)?),
        BinaryOp::Mod => {
            let r = a.wrapping_rem(nonzero_i64(b)?);
            if r != 0 && ((r < 0) != (b < 0)) { r + b } else { r }
        }
        BinaryOp::Pow => {
            if b < 0 {
                return Err(CoreError::InvalidArgument {
                    reason: "negative exponent for integer power",
                });
            }
            wrapping_powi(a, b.unsigned_abs())
        }
        BinaryOp::And => a & b,
        BinaryOp::Or => a | b,
        BinaryOp::Xor => a ^ b,
        BinaryOp::Shl | BinaryOp::Shr => shift_i64(op, a, b),
    };
    Ok(r)
}

fn unsigned_binary(op: BinaryOp, a: u64, b: u64) -> Result<u64> {
    let r = match op {
        BinaryOp::Add => a.wrapping_add(b),
        BinaryOp::Sub => a.wrapping_sub(b),
        BinaryOp::Mul => a.wrapping_mul(b),
        BinaryOp::Div | BinaryOp::IntDiv => a / nonzero_u64(b)?,
        BinaryOp::LeftDiv => b / nonzero_u64(a)?,
        BinaryOp::Rem | BinaryOp::Mod => a % nonzero_u64(b)?,
        BinaryOp::Pow => wrapping_powu(a, b),
        BinaryOp::And => a & b,
        BinaryOp::Or => a | b,
        BinaryOp::Xor => a ^ b,
        BinaryOp::Shl | BinaryOp::Shr => shift_u64(op, a, i64::try_from(b).unwrap_or(i64::MAX)),
    };
    Ok(r)
}

fn wrapping_powi(mut base: i64, mut exp: u64) -> i64 {
    let mut acc: i64 = 1;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = acc.wrapping_mul(base);
        }
        base = base.wrapping_mul(base);
        exp >>= 1;
    }
    acc
}

fn wrapping_powu(mut base: u64, mut exp: u64) -> u64 {
    let mut acc: u64 = 1;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = acc.wrapping_mul(base);
        }
        base = base.wrapping_mul(base);
        exp >>= 1;
    }
    acc
}

/// Shift amount as a signed count; `u64` amounts beyond `i64::MAX` saturate.
fn shift_amount(b: Value) -> i64 {
    match b {
        Value::UInt64(x) => i64::try_from(x).unwrap_or(i64::MAX),
        other => other.to_prim(),
    }
}

/// A negative amount shifts the other way. Shifting past the width yields
/// zero, or the sign fill for a right shift of a negative value.
#[allow(clippy::cast_possible_truncation)]
fn shift_i64(op: BinaryOp, x: i64, amount: i64) -> i64 {
    let left = (op == BinaryOp::Shl) == (amount >= 0);
    let k = amount.unsigned_abs().min(64) as u32;
    if left {
        if k >= 64 { 0 } else { x << k }
    } else {
        x >> k.min(63)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn shift_u64(op: BinaryOp, x: u64, amount: i64) -> u64 {
    let left = (op == BinaryOp::Shl) == (amount >= 0);
    let k = amount.unsigned_abs().min(64) as u32;
    if k >= 64 {
        0
    } else if left {
        x << k
    } else {
        x >> k
    }
}

fn float_binary<F: Float>(op: BinaryOp, a: F, b: F) -> Option<F> {
    let zero = <F as Scalar>::zero();
    let r = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::LeftDiv => b / a,
        BinaryOp::Pow => a.powf(b),
        BinaryOp::IntDiv => (a / b).trunc(),
        BinaryOp::Rem => a % b,
        BinaryOp::Mod => {
            let r = a % b;
            if r != zero && ((r < zero) != (b < zero)) { r + b } else { r }
        }
        _ => return None,
    };
    Some(r)
}

fn complex_binary<F: Float>(op: BinaryOp, a: Complex<F>, b: Complex<F>) -> Option<Complex<F>> {
    let r = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::LeftDiv => b / a,
        BinaryOp::Pow => a.powc(b),
        _ => return None,
    };
    Some(r)
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Value::Int32(7), Value::Int32(2), BinaryOp::IntDiv, Value::Int32(3))]
    #[case(Value::Int32(-7), Value::Int32(2), BinaryOp::IntDiv, Value::Int32(-3))]
    #[case(Value::Int32(-7), Value::Int32(3), BinaryOp::Mod, Value::Int32(2))]
    #[case(Value::Int32(-7), Value::Int32(3), BinaryOp::Rem, Value::Int32(-1))]
    #[case(Value::Int32(7), Value::Int32(-3), BinaryOp::Mod, Value::Int32(-2))]
    #[case(Value::Int64(3), Value::Int64(4), BinaryOp::Pow, Value::Int64(81))]
    #[case(Value::Int8(1), Value::Int8(9), BinaryOp::Shl, Value::Int8(0))]
    #[case(Value::Int8(-16), Value::Int8(2), BinaryOp::Shr, Value::Int8(-4))]
    #[case(Value::Int16(1), Value::Int16(-3), BinaryOp::Shr, Value::Int16(8))]
    #[case(Value::UInt8(0xF0), Value::UInt8(0x3C), BinaryOp::Xor, Value::UInt8(0xCC))]
    #[case(Value::Bool(true), Value::Bool(true), BinaryOp::Add, Value::Int64(2))]
    #[case(Value::Bool(true), Value::Bool(false), BinaryOp::Or, Value::Bool(true))]
    #[case(Value::Int32(1), Value::Int32(2), BinaryOp::Div, Value::Float64(0.5))]
    #[case(Value::Int32(4), Value::Int32(2), BinaryOp::LeftDiv, Value::Float64(0.5))]
    #[case(Value::Float64(-7.5), Value::Float64(2.0), BinaryOp::Mod, Value::Float64(0.5))]
    #[case(Value::Float32(1.5), Value::Int32(2), BinaryOp::Mul, Value::Float32(3.0))]
    #[case(Value::UInt8(2), Value::Int8(-1), BinaryOp::Add, Value::UInt8(1))]
    fn test_apply_binary(
        #[case] a: Value,
        #[case] b: Value,
        #[case] op: BinaryOp,
        #[case] expected: Value,
    ) {
        assert_eq!(apply_binary(op, a, b).unwrap(), expected);
    }

    #[test]
    fn test_wrapping_at_width() {
        let r = apply_binary(BinaryOp::Add, Value::Int8(127), Value::Int8(1)).unwrap();
        assert_eq!(r, Value::Int8(-128));
        let r = apply_binary(BinaryOp::Sub, Value::UInt8(0), Value::UInt8(1)).unwrap();
        assert_eq!(r, Value::UInt8(255));
    }

    #[test]
    fn test_division_by_zero() {
        let r = apply_binary(BinaryOp::IntDiv, Value::Int32(1), Value::Int32(0));
        assert_eq!(r, Err(CoreError::DivisionByZero));
        let r = apply_binary(BinaryOp::Mod, Value::UInt16(1), Value::UInt16(0));
        assert_eq!(r, Err(CoreError::DivisionByZero));
    }

    #[test]
    fn test_integer_division_in_forced_type() {
        let r = apply_in(BinaryOp::Div, DType::Int64, Value::Int64(7), Value::Int64(2)).unwrap();
        assert_eq!(r, Value::Int64(3));
    }

    #[rstest]
    #[case(BinaryOp::Div, Value::Int8(100), Value::Int64(256), Value::Int8(0))]
    #[case(BinaryOp::Div, Value::Int8(100), Value::Int64(1000), Value::Int8(0))]
    #[case(BinaryOp::Div, Value::Int8(-100), Value::Int64(3), Value::Int8(-33))]
    #[case(BinaryOp::Div, Value::Int64(1000), Value::Int8(100), Value::Int8(10))]
    #[case(BinaryOp::LeftDiv, Value::Int64(1000), Value::Int8(100), Value::Int8(0))]
    #[case(BinaryOp::Div, Value::UInt8(200), Value::UInt64(u64::MAX), Value::UInt8(0))]
    #[case(BinaryOp::Div, Value::Int16(-300), Value::UInt64(7), Value::Int16(-42))]
    fn test_forced_division_uses_exact_operands(
        #[case] op: BinaryOp,
        #[case] a: Value,
        #[case] b: Value,
        #[case] expected: Value,
    ) {
        assert_eq!(apply_in(op, expected.dtype(), a, b).unwrap(), expected);
    }

    #[test]
    fn test_forced_division_by_zero() {
        let r = apply_in(BinaryOp::Div, DType::Int8, Value::Int8(1), Value::Int64(0));
        assert_eq!(r, Err(CoreError::DivisionByZero));
    }

    #[test]
    fn test_negative_integer_power() {
        let r = apply_binary(BinaryOp::Pow, Value::Int32(2), Value::Int32(-1));
        assert!(matches!(r, Err(CoreError::InvalidArgument { .. })));
    }

    #[test]
    fn test_bitwise_on_float_unsupported() {
        let r = apply_binary(BinaryOp::And, Value::Float64(1.0), Value::Int32(1));
        assert!(matches!(r, Err(CoreError::UnsupportedOperation { .. })));
        let r = apply_binary(BinaryOp::Mod, Value::Complex64(Complex::new(1.0, 0.0)), Value::Int32(1));
        assert!(matches!(r, Err(CoreError::UnsupportedOperation { .. })));
    }

    #[test]
    fn test_complex_arithmetic() {
        let a = Value::Complex64(Complex::new(1.0, 2.0));
        let b = Value::Float64(2.0);
        let r = apply_binary(BinaryOp::Mul, a, b).unwrap();
        assert_eq!(r, Value::Complex64(Complex::new(2.0, 4.0)));
        let r = apply_binary(BinaryOp::Add, Value::Complex32(Complex::new(1.0, 1.0)), Value::Int64(1)).unwrap();
        assert_eq!(r, Value::Complex32(Complex::new(2.0, 1.0)));
    }

    #[rstest]
    #[case(UnaryOp::Neg, Value::Bool(true), Value::Int64(-1))]
    #[case(UnaryOp::Neg, Value::Int32(5), Value::Int32(-5))]
    #[case(UnaryOp::Complement, Value::UInt8(0x0F), Value::UInt8(0xF0))]
    #[case(UnaryOp::Complement, Value::Bool(false), Value::Bool(true))]
    #[case(UnaryOp::Not, Value::Bool(true), Value::Bool(false))]
    #[case(UnaryOp::Sign, Value::Int16(-9), Value::Int16(-1))]
    #[case(UnaryOp::Sign, Value::Float64(0.0), Value::Float64(0.0))]
    #[case(UnaryOp::Sign, Value::Float32(-2.5), Value::Float32(-1.0))]
    #[case(UnaryOp::Conj, Value::Complex64(Complex::new(1.0, 2.0)), Value::Complex64(Complex::new(1.0, -2.0)))]
    #[case(UnaryOp::Conj, Value::Int64(3), Value::Int64(3))]
    #[case(UnaryOp::Real, Value::Complex32(Complex::new(1.5, 2.0)), Value::Float32(1.5))]
    #[case(UnaryOp::Imag, Value::Complex64(Complex::new(1.5, 2.0)), Value::Float64(2.0))]
    #[case(UnaryOp::Imag, Value::Int32(4), Value::Int32(0))]
    fn test_apply_unary(#[case] op: UnaryOp, #[case] v: Value, #[case] expected: Value) {
        assert_eq!(apply_unary(op, v).unwrap(), expected);
    }

    #[test]
    fn test_unary_unsupported() {
        assert!(apply_unary(UnaryOp::Not, Value::Int32(1)).is_err());
        assert!(apply_unary(UnaryOp::Complement, Value::Float64(1.0)).is_err());
    }

    #[test]
    fn test_complex_sign() {
        let r = apply_unary(UnaryOp::Sign, Value::Complex64(Complex::new(3.0, 4.0))).unwrap();
        assert_eq!(r, Value::Complex64(Complex::new(0.6, 0.8)));
    }

    #[test]
    fn test_commutative_set() {
        assert!(BinaryOp::Add.is_commutative());
        assert!(BinaryOp::Xor.is_commutative());
        assert!(!BinaryOp::Sub.is_commutative());
        assert!(BinaryOp::Mod.is_array_array());
        assert!(!BinaryOp::Mul.is_array_array());
    }
}
