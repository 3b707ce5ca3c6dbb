//! Array bridge: import from and export to external dense arrays.
//!
//! Purpose
//! - Move `Vector4`/`Matrix4` values across a boundary that speaks
//!   `(buffer, dtype, shape, byte strides)`, the way NumPy and the Python
//!   buffer protocol describe memory.
//!
//! Conventions
//! - Strides are in bytes and may be negative or non-contiguous. A view's
//!   `offset` is the byte position of element `[0, 0, ...]`.
//! - Import validates in a fixed order: dtype (`Dtype`), then shape
//!   (`Shape`), then reads every entry through the strides and casts it to the
//!   target precision. Stride/extent problems are caught earlier, when the
//!   `ArrayView` is built.
//! - Export always describes entry `(r, c)` correctly for the layout asked
//!   for; column-major matrix exports alias the matrix storage.

mod export;
mod view;

pub use export::ArrayExport;
pub use view::ArrayView;

use crate::error::{check_index, Axis, LinalgError, Result};
use crate::mat4::Matrix4;
use crate::scalar::Scalar;
use crate::vec4::Vector4;

/// Memory order of a contiguous multi-dimensional buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Layout {
    /// Last index varies fastest (C order).
    RowMajor,
    /// First index varies fastest (Fortran order); `Matrix4`'s own storage.
    #[default]
    ColumnMajor,
}

impl Layout {
    /// Contiguous byte strides for `shape`; `Stride` error when a stride
    /// does not fit in `isize`.
    pub fn strides(self, shape: &[usize], itemsize: usize) -> Result<Vec<isize>> {
        let overflow = || LinalgError::stride(format!("strides of shape {shape:?} overflow"));
        let mut strides = vec![0isize; shape.len()];
        let mut step = isize::try_from(itemsize).map_err(|_| overflow())?;
        let order: Vec<usize> = match self {
            Layout::RowMajor => (0..shape.len()).rev().collect(),
            Layout::ColumnMajor => (0..shape.len()).collect(),
        };
        for i in order {
            strides[i] = step;
            step = isize::try_from(shape[i])
                .ok()
                .and_then(|n| step.checked_mul(n))
                .ok_or_else(overflow)?;
        }
        Ok(strides)
    }
}

impl<T: Scalar> Vector4<T> {
    /// Import a length-4 array. Shapes `[4]`, `[4, 1]` and `[1, 4]` are
    /// accepted; values are cast to `T`.
    pub fn from_view(view: &ArrayView<'_>) -> Result<Self> {
        view.require_float()?;
        let data: [T; 4] = match view.shape() {
            [4] => std::array::from_fn(|i| view.read(&[i])),
            [4, 1] => std::array::from_fn(|i| view.read(&[i, 0])),
            [1, 4] => std::array::from_fn(|i| view.read(&[0, i])),
            other => return Err(LinalgError::shape(&[4], other)),
        };
        Ok(Self::from_array(data))
    }

    /// One-dimensional export, stride = itemsize.
    pub fn export(&self) -> ArrayExport<'_, T> {
        ArrayExport::borrowed(self.as_slice(), &[4], Layout::ColumnMajor)
    }
}

impl<T: Scalar> Matrix4<T> {
    /// Import a `[4, 4]` array; entry `(r, c)` of the source becomes entry
    /// `(r, c)` here whatever the source's memory order.
    pub fn from_view(view: &ArrayView<'_>) -> Result<Self> {
        view.require_float()?;
        if view.shape() != [4, 4] {
            return Err(LinalgError::shape(&[4, 4], view.shape()));
        }
        let data: [T; 16] = std::array::from_fn(|i| view.read(&[i % 4, i / 4]));
        Self::from_column_slice(&data)
    }

    /// Export as a `[4, 4]` array in `layout`.
    pub fn export(&self, layout: Layout) -> ArrayExport<'_, T> {
        match layout {
            Layout::ColumnMajor => ArrayExport::borrowed(self.as_slice(), &[4, 4], layout),
            Layout::RowMajor => {
                ArrayExport::owned(self.transpose().as_slice().to_vec(), &[4, 4], layout)
            }
        }
    }

    /// Overwrite column `c` from a length-4 array. The matrix is untouched
    /// on any error.
    pub fn set_column_from(&mut self, c: isize, view: &ArrayView<'_>) -> Result<()> {
        check_index(Axis::Column, c)?;
        let v = Vector4::from_view(view)?;
        self.set_column(c, v)
    }
}

impl<T: Scalar> TryFrom<&ArrayView<'_>> for Vector4<T> {
    type Error = LinalgError;

    fn try_from(view: &ArrayView<'_>) -> Result<Self> {
        Self::from_view(view)
    }
}

impl<T: Scalar> TryFrom<&ArrayView<'_>> for Matrix4<T> {
    type Error = LinalgError;

    fn try_from(view: &ArrayView<'_>) -> Result<Self> {
        Self::from_view(view)
    }
}

#[cfg(test)]
mod tests;
