//! Scalar precisions and the dtype tags of external buffers.
//!
//! Conventions
//! - `Scalar` is sealed: only `f32` and `f64` instantiate `Vector4`/`Matrix4`.
//! - `DType` also names non-float element types, but only so the bridge can
//!   reject them with a precise error.

use std::fmt;
use std::ops::{AddAssign, MulAssign, SubAssign};
use std::str::FromStr;

use num_traits::{AsPrimitive, Float, FromPrimitive, ToPrimitive};

use crate::cfg::{DEFAULT_EPS_F32, DEFAULT_EPS_F64};

/// Element type tag of an external dense array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
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
    Float16,
    Float32,
    Float64,
    Complex64,
    Complex128,
}

impl DType {
    /// Size of one element in bytes.
    pub const fn itemsize(self) -> usize {
        match self {
            DType::Bool | DType::Int8 | DType::UInt8 => 1,
            DType::Int16 | DType::UInt16 | DType::Float16 => 2,
            DType::Int32 | DType::UInt32 | DType::Float32 => 4,
            DType::Int64 | DType::UInt64 | DType::Float64 | DType::Complex64 => 8,
            DType::Complex128 => 16,
        }
    }

    /// Only single and double precision floats can back a `Vector4`/`Matrix4`.
    pub const fn is_supported_float(self) -> bool {
        matches!(self, DType::Float32 | DType::Float64)
    }

    /// NumPy-style short code (`"f8"`, `"i4"`, ...).
    pub const fn code(self) -> &'static str {
        match self {
            DType::Bool => "b1",
            DType::Int8 => "i1",
            DType::Int16 => "i2",
            DType::Int32 => "i4",
            DType::Int64 => "i8",
            DType::UInt8 => "u1",
            DType::UInt16 => "u2",
            DType::UInt32 => "u4",
            DType::UInt64 => "u8",
            DType::Float16 => "f2",
            DType::Float32 => "f4",
            DType::Float64 => "f8",
            DType::Complex64 => "c8",
            DType::Complex128 => "c16",
        }
    }

    /// Parse a short code or a long name. A leading byte-order character
    /// (`<`, `>`, `=`, `|`) is ignored.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim_start_matches(['<', '>', '=', '|']);
        let dtype = match code {
            "b1" | "?" | "bool" => DType::Bool,
            "i1" | "int8" => DType::Int8,
            "i2" | "int16" => DType::Int16,
            "i4" | "int32" => DType::Int32,
            "i8" | "int64" => DType::Int64,
            "u1" | "uint8" => DType::UInt8,
            "u2" | "uint16" => DType::UInt16,
            "u4" | "uint32" => DType::UInt32,
            "u8" | "uint64" => DType::UInt64,
            "f2" | "float16" => DType::Float16,
            "f4" | "float32" | "f32" => DType::Float32,
            "f8" | "float64" | "f64" => DType::Float64,
            "c8" | "complex64" => DType::Complex64,
            "c16" | "complex128" => DType::Complex128,
            _ => return None,
        };
        Some(dtype)
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
            DType::Float16 => "float16",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
            DType::Complex64 => "complex64",
            DType::Complex128 => "complex128",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// Floating-point precision a `Vector4`/`Matrix4` is instantiated over.
///
/// Two instantiations never mix: there is no `Add<Matrix4<f64>> for
/// Matrix4<f32>`, so a precision mismatch is a compile error on the static
/// API. See `crate::dynamic` for the runtime-checked counterpart.
///
/// Float math (`abs`, `sqrt`, `is_finite`, ...) comes from `num_traits::Float`.
pub trait Scalar:
    sealed::Sealed
    + Float
    + FromPrimitive
    + ToPrimitive
    + AsPrimitive<f64>
    + nalgebra::Scalar
    + bytemuck::Pod
    + Default
    + fmt::Display
    + FromStr
    + AddAssign
    + SubAssign
    + MulAssign
{
    const DTYPE: DType;
    const ZERO: Self;
    const ONE: Self;
    /// Tolerance used by `approx_eq` when callers have no better choice.
    const DEFAULT_EPS: Self;

    /// Narrowing/widening cast from double precision (round to nearest).
    fn cast_from(v: f64) -> Self;

    #[inline]
    fn as_f64(self) -> f64 {
        AsPrimitive::<f64>::as_(self)
    }

    /// Decode one native-endian element without passing through another
    /// precision, so every bit pattern (signaling NaNs included) survives.
    ///
    /// # Panics
    /// If `bytes.len()` is not the size of `Self`.
    #[inline]
    fn read_ne(bytes: &[u8]) -> Self {
        bytemuck::pod_read_unaligned(bytes)
    }

    /// Bit pattern widened to 64 bits; used for bit-exact comparisons.
    fn to_bits_u64(self) -> u64;
}

impl Scalar for f32 {
    const DTYPE: DType = DType::Float32;
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const DEFAULT_EPS: Self = DEFAULT_EPS_F32;

    #[inline]
    fn cast_from(v: f64) -> Self {
        v.as_()
    }
    #[inline]
    fn to_bits_u64(self) -> u64 {
        u64::from(self.to_bits())
    }
}

impl Scalar for f64 {
    const DTYPE: DType = DType::Float64;
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const DEFAULT_EPS: Self = DEFAULT_EPS_F64;

    #[inline]
    fn cast_from(v: f64) -> Self {
        v
    }
    #[inline]
    fn to_bits_u64(self) -> u64 {
        self.to_bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dtype_codes_round_trip() {
        for dtype in [
            DType::Bool,
            DType::Int8,
            DType::Int32,
            DType::UInt64,
            DType::Float16,
            DType::Float32,
            DType::Float64,
            DType::Complex128,
        ] {
            assert_eq!(DType::from_code(dtype.code()), Some(dtype));
            assert_eq!(DType::from_code(dtype.name()), Some(dtype));
        }
        assert_eq!(DType::from_code("<f8"), Some(DType::Float64));
        assert_eq!(DType::from_code("|b1"), Some(DType::Bool));
        assert_eq!(DType::from_code("object"), None);
    }

    #[test]
    fn only_two_floats_supported() {
        assert!(DType::Float32.is_supported_float());
        assert!(DType::Float64.is_supported_float());
        assert!(!DType::Float16.is_supported_float());
        assert!(!DType::Int64.is_supported_float());
        assert!(!DType::Complex64.is_supported_float());
        assert_eq!(f32::DTYPE.itemsize(), 4);
        assert_eq!(f64::DTYPE.itemsize(), 8);
    }

    #[test]
    fn narrowing_cast_rounds_to_nearest() {
        let x = 0.1f64;
        assert_eq!(<f32 as Scalar>::cast_from(x), 0.1f32);
        assert_eq!(<f32 as Scalar>::as_f64(0.5), 0.5);
        assert_eq!(<f32 as Scalar>::cast_from(1e300), f32::INFINITY);
    }

    #[test]
    fn native_endian_decode_keeps_every_bit() {
        let quiet_free = f32::from_bits(0x7f80_0001);
        let back = <f32 as Scalar>::read_ne(&quiet_free.to_ne_bytes());
        assert_eq!(back.to_bits(), 0x7f80_0001);
        let neg_zero = <f64 as Scalar>::read_ne(&(-0.0f64).to_ne_bytes());
        assert_eq!(neg_zero.to_bits(), (-0.0f64).to_bits());
    }
}
