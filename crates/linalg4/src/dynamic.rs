//! Values whose precision is only known at runtime.
//!
//! Purpose
//! - Front ends that receive data of either precision (text files, Python
//!   objects) hold `AnyVector4`/`AnyMatrix4` and dispatch once per operation.
//!
//! Conventions
//! - Binary operations require both operands in the same precision and
//!   return `PrecisionMismatch` otherwise. Nothing is promoted implicitly;
//!   `cast` is the explicit escape hatch.
//! - Scalars (`scale`) are given as `f64` and cast to the operand precision.

use crate::error::{LinalgError, Result};
use crate::interop::ArrayView;
use crate::mat4::Matrix4;
use crate::scalar::{DType, Scalar};
use crate::vec4::Vector4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnyVector4 {
    F32(Vector4<f32>),
    F64(Vector4<f64>),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnyMatrix4 {
    F32(Matrix4<f32>),
    F64(Matrix4<f64>),
}

fn unsupported(dtype: DType) -> LinalgError {
    LinalgError::Dtype { found: dtype }
}

/// Apply `$body` to two operands of matching precision, or fail.
macro_rules! same_precision {
    ($ty:ident, $lhs:expr, $rhs:expr, |$a:ident, $b:ident| $body:expr) => {
        match ($lhs, $rhs) {
            ($ty::F32($a), $ty::F32($b)) => Ok($body),
            ($ty::F64($a), $ty::F64($b)) => Ok($body),
            (l, r) => Err(LinalgError::PrecisionMismatch {
                lhs: l.dtype(),
                rhs: r.dtype(),
            }),
        }
    };
}

impl AnyVector4 {
    pub fn dtype(&self) -> DType {
        match self {
            Self::F32(_) => DType::Float32,
            Self::F64(_) => DType::Float64,
        }
    }

    pub fn zeros(dtype: DType) -> Result<Self> {
        match dtype {
            DType::Float32 => Ok(Self::F32(Vector4::zeros())),
            DType::Float64 => Ok(Self::F64(Vector4::zeros())),
            other => Err(unsupported(other)),
        }
    }

    /// Build from `f64` components in the requested precision.
    pub fn from_f64(dtype: DType, values: [f64; 4]) -> Result<Self> {
        let v = Vector4::from_array(values);
        match dtype {
            DType::Float32 => Ok(Self::F32(v.cast())),
            DType::Float64 => Ok(Self::F64(v)),
            other => Err(unsupported(other)),
        }
    }

    /// Import keeping the source precision.
    pub fn from_view(view: &ArrayView<'_>) -> Result<Self> {
        Self::from_view_as(view, view.dtype())
    }

    /// Import, casting to `dtype`.
    pub fn from_view_as(view: &ArrayView<'_>, dtype: DType) -> Result<Self> {
        view.require_float()?;
        match dtype {
            DType::Float32 => Ok(Self::F32(Vector4::from_view(view)?)),
            DType::Float64 => Ok(Self::F64(Vector4::from_view(view)?)),
            other => Err(unsupported(other)),
        }
    }

    pub fn add(&self, rhs: &Self) -> Result<Self> {
        same_precision!(AnyVector4, self, rhs, |a, b| a.add(*b).into())
    }

    pub fn sub(&self, rhs: &Self) -> Result<Self> {
        same_precision!(AnyVector4, self, rhs, |a, b| a.sub(*b).into())
    }

    pub fn dot(&self, rhs: &Self) -> Result<f64> {
        same_precision!(AnyVector4, self, rhs, |a, b| a.dot(b).as_f64())
    }

    pub fn scale(&self, k: f64) -> Self {
        match self {
            Self::F32(v) => Self::F32(v.scale(k as f32)),
            Self::F64(v) => Self::F64(v.scale(k)),
        }
    }

    pub fn equals(&self, rhs: &Self) -> Result<bool> {
        same_precision!(AnyVector4, self, rhs, |a, b| a.equals(b))
    }

    pub fn cast(&self, dtype: DType) -> Result<Self> {
        Self::from_f64(dtype, self.to_f64())
    }

    /// Components widened to `f64` (exact for both precisions).
    pub fn to_f64(&self) -> [f64; 4] {
        match self {
            Self::F32(v) => v.cast::<f64>().to_array(),
            Self::F64(v) => v.to_array(),
        }
    }
}

impl AnyMatrix4 {
    pub fn dtype(&self) -> DType {
        match self {
            Self::F32(_) => DType::Float32,
            Self::F64(_) => DType::Float64,
        }
    }

    pub fn zeros(dtype: DType) -> Result<Self> {
        match dtype {
            DType::Float32 => Ok(Self::F32(Matrix4::zeros())),
            DType::Float64 => Ok(Self::F64(Matrix4::zeros())),
            other => Err(unsupported(other)),
        }
    }

    pub fn identity(dtype: DType) -> Result<Self> {
        match dtype {
            DType::Float32 => Ok(Self::F32(Matrix4::identity())),
            DType::Float64 => Ok(Self::F64(Matrix4::identity())),
            other => Err(unsupported(other)),
        }
    }

    /// Build from row-major `f64` rows in the requested precision.
    pub fn from_rows_f64(dtype: DType, rows: [[f64; 4]; 4]) -> Result<Self> {
        let m = Matrix4::from_rows(rows);
        match dtype {
            DType::Float32 => Ok(Self::F32(m.cast())),
            DType::Float64 => Ok(Self::F64(m)),
            other => Err(unsupported(other)),
        }
    }

    /// Import keeping the source precision.
    pub fn from_view(view: &ArrayView<'_>) -> Result<Self> {
        Self::from_view_as(view, view.dtype())
    }

    /// Import, casting to `dtype`.
    pub fn from_view_as(view: &ArrayView<'_>, dtype: DType) -> Result<Self> {
        view.require_float()?;
        match dtype {
            DType::Float32 => Ok(Self::F32(Matrix4::from_view(view)?)),
            DType::Float64 => Ok(Self::F64(Matrix4::from_view(view)?)),
            other => Err(unsupported(other)),
        }
    }

    pub fn add(&self, rhs: &Self) -> Result<Self> {
        same_precision!(AnyMatrix4, self, rhs, |a, b| a.add(*b).into())
    }

    pub fn sub(&self, rhs: &Self) -> Result<Self> {
        same_precision!(AnyMatrix4, self, rhs, |a, b| a.sub(*b).into())
    }

    pub fn matmul(&self, rhs: &Self) -> Result<Self> {
        same_precision!(AnyMatrix4, self, rhs, |a, b| a.matmul(b).into())
    }

    pub fn mul_vec(&self, v: &AnyVector4) -> Result<AnyVector4> {
        match (self, v) {
            (Self::F32(m), AnyVector4::F32(v)) => Ok(AnyVector4::F32(m.mul_vec(v))),
            (Self::F64(m), AnyVector4::F64(v)) => Ok(AnyVector4::F64(m.mul_vec(v))),
            (m, v) => Err(LinalgError::PrecisionMismatch {
                lhs: m.dtype(),
                rhs: v.dtype(),
            }),
        }
    }

    pub fn scale(&self, k: f64) -> Self {
        match self {
            Self::F32(m) => Self::F32(m.scale(k as f32)),
            Self::F64(m) => Self::F64(m.scale(k)),
        }
    }

    pub fn equals(&self, rhs: &Self) -> Result<bool> {
        same_precision!(AnyMatrix4, self, rhs, |a, b| a.equals(b))
    }

    pub fn transpose(&self) -> Self {
        match self {
            Self::F32(m) => Self::F32(m.transpose()),
            Self::F64(m) => Self::F64(m.transpose()),
        }
    }

    pub fn trace(&self) -> f64 {
        match self {
            Self::F32(m) => m.trace().as_f64(),
            Self::F64(m) => m.trace(),
        }
    }

    pub fn determinant(&self) -> f64 {
        match self {
            Self::F32(m) => m.determinant().as_f64(),
            Self::F64(m) => m.determinant(),
        }
    }

    /// `None` when singular.
    pub fn inverse(&self) -> Option<Self> {
        match self {
            Self::F32(m) => m.inverse().map(Self::F32),
            Self::F64(m) => m.inverse().map(Self::F64),
        }
    }

    pub fn cast(&self, dtype: DType) -> Result<Self> {
        Self::from_rows_f64(dtype, self.rows_f64())
    }

    /// Rows widened to `f64`.
    pub fn rows_f64(&self) -> [[f64; 4]; 4] {
        match self {
            Self::F32(m) => m.cast::<f64>().rows(),
            Self::F64(m) => m.rows(),
        }
    }
}

impl<T: Scalar> From<Vector4<T>> for AnyVector4 {
    fn from(v: Vector4<T>) -> Self {
        match T::DTYPE {
            DType::Float32 => Self::F32(v.cast()),
            _ => Self::F64(v.cast()),
        }
    }
}

impl<T: Scalar> From<Matrix4<T>> for AnyMatrix4 {
    fn from(m: Matrix4<T>) -> Self {
        match T::DTYPE {
            DType::Float32 => Self::F32(m.cast()),
            _ => Self::F64(m.cast()),
        }
    }
}
