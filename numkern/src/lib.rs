//! # numkern
//!
//! Dense-array numeric kernels: elementwise maps with type promotion,
//! blocked transposition, rotations, flips and pairwise cumulative
//! reductions.
//!
//! One `use numkern::prelude::*;` brings the array types, operator tags and
//! kernel configuration into scope.

pub use numkern_core as core;

/// Glob-import convenience: `use numkern::prelude::*;`
pub mod prelude {
    pub use numkern_core::prelude::*;
}
