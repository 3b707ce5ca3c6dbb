//! Fixed-size 4D linear algebra: `Vector4<T>` and `Matrix4<T>` over `f32`/`f64`.
//!
//! Conventions
//! - `Matrix4` stores its sixteen entries column-major; entry `(r, c)` is at
//!   flat offset `c * 4 + r`. Everything that reads or writes storage (the
//!   array bridge, `as_slice`, nalgebra conversions) agrees on this.
//! - Precisions never mix on the typed API. `dynamic` holds the
//!   runtime-checked wrappers used by front ends.
//! - Every fallible operation checks before it writes; an `Err` leaves the
//!   receiver unchanged.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API; the CLI
//!   and the Python extension are the only callers.

pub mod dynamic;
pub mod error;
pub mod interop;
pub mod mat4;
pub mod rand4;
pub mod scalar;
pub mod vec4;

mod cfg;
mod kernels;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use dynamic::{AnyMatrix4, AnyVector4};
pub use error::{Axis, LinalgError, Result};
pub use interop::{ArrayExport, ArrayView, Layout};
pub use mat4::{ColumnMut, Matrix4};
pub use scalar::{DType, Scalar};
pub use vec4::Vector4;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::dynamic::{AnyMatrix4, AnyVector4};
    pub use crate::error::{LinalgError, Result};
    pub use crate::interop::{ArrayExport, ArrayView, Layout};
    pub use crate::mat4::Matrix4;
    pub use crate::rand4::{Sampler4, SeedReplay, UniformCfg};
    pub use crate::scalar::{DType, Scalar};
    pub use crate::vec4::Vector4;

    /// Aliases matching the Python class names.
    pub type Vector4f = Vector4<f32>;
    pub type Vector4d = Vector4<f64>;
    pub type Matrix4f = Matrix4<f32>;
    pub type Matrix4d = Matrix4<f64>;
}
