//! NumPy side of the array bridge.
//!
//! Notes
//! - Contiguous arrays (C or Fortran order) are described to the library by
//!   their own byte strides, without a copy. Other layouts are gathered into a
//!   C-ordered buffer first.
//! - Plain Python sequences are read as `float64`.

use linalg4::{ArrayView, DType, Layout, LinalgError, Matrix4, Result as LinalgResult, Scalar};
use numpy::npyffi::NPY_ORDER;
use numpy::prelude::*;
use numpy::{Element, PyArray1, PyArray2, PyReadonlyArrayDyn, PyUntypedArray};
use pyo3::exceptions::{PyTypeError, PyValueError};
use pyo3::prelude::*;

use crate::errors::to_py;

/// Run `f` on a library view of `obj` (NumPy array or nested sequence).
pub fn with_view<R>(
    obj: &Bound<'_, PyAny>,
    f: impl FnOnce(&ArrayView<'_>) -> LinalgResult<R>,
) -> PyResult<R> {
    if let Ok(arr) = obj.downcast::<PyUntypedArray>() {
        return match dtype_of(arr)? {
            DType::Float32 => typed::<f32, R>(obj, f),
            DType::Float64 => typed::<f64, R>(obj, f),
            other => Err(to_py(LinalgError::Dtype { found: other })),
        };
    }

    let (values, shape) = if let Ok(rows) = obj.extract::<Vec<Vec<f64>>>() {
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != width) {
            return Err(PyValueError::new_err("ragged nested sequence"));
        }
        let shape = vec![rows.len(), width];
        (rows.into_iter().flatten().collect::<Vec<_>>(), shape)
    } else if let Ok(flat) = obj.extract::<Vec<f64>>() {
        let shape = vec![flat.len()];
        (flat, shape)
    } else {
        return Err(PyTypeError::new_err(format!(
            "expected a numpy array or a sequence of numbers, got {}",
            obj.get_type().name()?
        )));
    };
    let view = ArrayView::from_slice(&values, &shape, Layout::RowMajor).map_err(to_py)?;
    f(&view).map_err(to_py)
}

fn typed<T: Scalar + Element, R>(
    obj: &Bound<'_, PyAny>,
    f: impl FnOnce(&ArrayView<'_>) -> LinalgResult<R>,
) -> PyResult<R> {
    let arr: PyReadonlyArrayDyn<'_, T> = obj.extract()?;
    let shape = arr.shape().to_vec();
    if let Ok(slice) = arr.as_slice() {
        let strides = arr.strides().to_vec();
        let view = ArrayView::new(bytemuck::cast_slice(slice), T::DTYPE, &shape, &strides, 0)
            .map_err(to_py)?;
        return f(&view).map_err(to_py);
    }
    let gathered: Vec<T> = arr.as_array().iter().copied().collect();
    let view = ArrayView::from_slice(&gathered, &shape, Layout::RowMajor).map_err(to_py)?;
    f(&view).map_err(to_py)
}

fn dtype_of(arr: &Bound<'_, PyUntypedArray>) -> PyResult<DType> {
    let descr = arr.dtype();
    let code = format!("{}{}", descr.kind() as char, descr.itemsize());
    DType::from_code(&code)
        .ok_or_else(|| PyTypeError::new_err(format!("unsupported array dtype {code}")))
}

/// `"C"`/`"row"` or `"F"`/`"col"`.
pub fn parse_layout(name: &str) -> PyResult<Layout> {
    match name {
        "C" | "c" | "row" => Ok(Layout::RowMajor),
        "F" | "f" | "col" => Ok(Layout::ColumnMajor),
        other => Err(PyValueError::new_err(format!(
            "layout must be 'C' or 'F', got {other:?}"
        ))),
    }
}

/// 4x4 array whose memory order is `layout`.
pub fn export_matrix<'py, T: Scalar + Element>(
    py: Python<'py>,
    m: &Matrix4<T>,
    layout: Layout,
) -> PyResult<Bound<'py, PyArray2<T>>> {
    let out = m.export(layout);
    let order = match layout {
        Layout::RowMajor => NPY_ORDER::NPY_CORDER,
        Layout::ColumnMajor => NPY_ORDER::NPY_FORTRANORDER,
    };
    PyArray1::from_slice_bound(py, out.data()).reshape_with_order([4, 4], order)
}
