//! `numkern-core`: dense-array numeric kernels.
//!
//! Provides the building blocks that sit beneath linear algebra: elementwise
//! maps with type promotion, cache-blocked transposition, quarter-turn
//! rotations, dimension flips, and pairwise cumulative sums and products.
//!
//! # Design
//!
//! - Typed storage is [`Tensor<T>`](tensor::Tensor), generic over the
//!   [`Element`] / [`Scalar`] / [`Float`] trait hierarchy.
//! - [`NdArray`] wraps a tensor of any [`DType`]; the elementwise engine works
//!   on it because a result's element type is only known after promotion.
//! - Every kernel is synchronous and single-threaded and allocates its output
//!   once, after all preconditions have been checked.

pub mod array;
pub mod config;
pub mod cumulative;
pub mod dtype;
pub mod elementwise;
pub mod error;
pub mod ops;
pub mod promote;
pub mod tensor;
pub mod transpose;
pub mod value;

// Re-export key types at crate root for convenience.
pub use array::NdArray;
pub use config::KernelConfig;
pub use dtype::{DType, Element, Float, Kind, Scalar};
pub use error::{CoreError, Result};
pub use ops::{BinaryOp, UnaryOp};
pub use promote::Promoted;
pub use tensor::Tensor;
pub use value::Value;

/// Items intended for glob-import: `use numkern_core::prelude::*;`
pub mod prelude {
    pub use crate::array::NdArray;
    pub use crate::config::KernelConfig;
    pub use crate::dtype::{DType, Element, Float, Kind, Scalar};
    pub use crate::elementwise;
    pub use crate::error::{CoreError, Result};
    pub use crate::ops::{BinaryOp, UnaryOp};
    pub use crate::tensor::Tensor;
    pub use crate::value::Value;
}
