//! Tolerance defaults (internal).
//!
//! Policy
//! - Equality on `Vector4`/`Matrix4` is exact. These constants only feed the
//!   caller-side `approx_eq` helpers and the randomized test suites.

/// Max-abs tolerance for single precision comparisons.
pub(crate) const DEFAULT_EPS_F32: f32 = 1e-5;
/// Max-abs tolerance for double precision comparisons.
pub(crate) const DEFAULT_EPS_F64: f64 = 1e-12;
