//! `Vector4f`/`Vector4d`/`Matrix4f`/`Matrix4d` Python classes.
//!
//! One macro expansion per precision keeps the two families identical.
//! Indexing follows the library: one index on a matrix is a column, two
//! indices an entry; negative indices are errors.

use linalg4::{AnyMatrix4, AnyVector4, DType, LinalgError, Matrix4, Scalar, Vector4};
use numpy::{PyArray1, PyArray2};
use pyo3::exceptions::PyTypeError;
use pyo3::prelude::*;
use pyo3::types::PyTuple;

use crate::array::{export_matrix, parse_layout, with_view};
use crate::errors::to_py;

fn mismatch(lhs: DType, rhs: DType) -> PyErr {
    to_py(LinalgError::PrecisionMismatch { lhs, rhs })
}

fn unsupported(op: &str, lhs: &str, rhs: &Bound<'_, PyAny>) -> PyErr {
    let rhs = rhs
        .get_type()
        .name()
        .map(|n| n.to_string())
        .unwrap_or_else(|_| "?".into());
    PyTypeError::new_err(format!("unsupported operand types for {op}: {lhs} and {rhs}"))
}

macro_rules! precision_classes {
    (
        $t:ty,
        $vec:ident = $vec_name:literal,
        $mat:ident = $mat_name:literal,
        other = ($other_vec:ident, $other_mat:ident)
    ) => {
        #[pyclass(name = $vec_name, module = "linalg4_native")]
        #[derive(Clone)]
        pub struct $vec {
            pub inner: Vector4<$t>,
        }

        impl $vec {
            const DTYPE: DType = <$t as Scalar>::DTYPE;

            /// Same-precision vector operand, or the matching error.
            fn operand(op: &str, other: &Bound<'_, PyAny>) -> PyResult<Vector4<$t>> {
                if let Ok(v) = other.downcast::<$vec>() {
                    return Ok(v.borrow().inner);
                }
                if other.is_instance_of::<$other_vec>() {
                    return Err(mismatch(Self::DTYPE, $other_vec::DTYPE));
                }
                Err(unsupported(op, $vec_name, other))
            }
        }

        #[pymethods]
        impl $vec {
            /// `()`, `(x, y, z, w)` or `(array_like,)`.
            #[new]
            #[pyo3(signature = (*args))]
            fn py_new(args: &Bound<'_, PyTuple>) -> PyResult<Self> {
                let inner = match args.len() {
                    0 => Vector4::zeros(),
                    1 => with_view(&args.get_item(0)?, Vector4::<$t>::from_view)?,
                    4 => Vector4::from_array(args.extract::<[$t; 4]>()?),
                    n => return Err(to_py(LinalgError::Shape { expected: vec![4], got: vec![n] })),
                };
                Ok(Self { inner })
            }

            #[getter]
            fn dtype(&self) -> &'static str {
                Self::DTYPE.name()
            }

            fn __len__(&self) -> usize {
                4
            }

            fn __getitem__(&self, i: isize) -> PyResult<$t> {
                self.inner.get(i).map_err(to_py)
            }

            fn __setitem__(&mut self, i: isize, value: $t) -> PyResult<()> {
                self.inner.set(i, value).map_err(to_py)
            }

            /// Mixed precisions raise `TypeError`, as every other binary op does.
            fn __eq__(&self, other: &Bound<'_, PyAny>) -> PyResult<bool> {
                let rhs = if let Ok(o) = other.downcast::<$vec>() {
                    AnyVector4::from(o.borrow().inner)
                } else if let Ok(o) = other.downcast::<$other_vec>() {
                    AnyVector4::from(o.borrow().inner)
                } else {
                    return Ok(false);
                };
                AnyVector4::from(self.inner).equals(&rhs).map_err(to_py)
            }

            fn __add__(&self, other: &Bound<'_, PyAny>) -> PyResult<Self> {
                let rhs = Self::operand("+", other)?;
                Ok(Self { inner: self.inner.add(rhs) })
            }

            fn __sub__(&self, other: &Bound<'_, PyAny>) -> PyResult<Self> {
                let rhs = Self::operand("-", other)?;
                Ok(Self { inner: self.inner.sub(rhs) })
            }

            fn __neg__(&self) -> Self {
                Self { inner: -self.inner }
            }

            fn __mul__(&self, k: $t) -> Self {
                Self { inner: self.inner.scale(k) }
            }

            fn __rmul__(&self, k: $t) -> Self {
                Self { inner: self.inner.scale(k) }
            }

            fn dot(&self, other: &Bound<'_, PyAny>) -> PyResult<$t> {
                let rhs = Self::operand("dot", other)?;
                Ok(self.inner.dot(&rhs))
            }

            fn norm(&self) -> $t {
                self.inner.norm()
            }

            /// Length-4 array in component order.
            fn numpy<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<$t>> {
                PyArray1::from_slice_bound(py, self.inner.export().data())
            }

            fn __repr__(&self) -> String {
                let [x, y, z, w] = self.inner.to_array();
                format!("{}({x}, {y}, {z}, {w})", $vec_name)
            }

            fn __str__(&self) -> String {
                self.inner.to_string()
            }
        }

        #[pyclass(name = $mat_name, module = "linalg4_native")]
        #[derive(Clone)]
        pub struct $mat {
            pub inner: Matrix4<$t>,
        }

        impl $mat {
            const DTYPE: DType = <$t as Scalar>::DTYPE;

            fn operand(op: &str, other: &Bound<'_, PyAny>) -> PyResult<Matrix4<$t>> {
                if let Ok(m) = other.downcast::<$mat>() {
                    return Ok(m.borrow().inner);
                }
                if other.is_instance_of::<$other_mat>() {
                    return Err(mismatch(Self::DTYPE, $other_mat::DTYPE));
                }
                Err(unsupported(op, $mat_name, other))
            }

            fn wrap(inner: Matrix4<$t>) -> Self {
                Self { inner }
            }
        }

        #[pymethods]
        impl $mat {
            /// `()`, `(d0, d1, d2, d3)`, `(c0, c1, c2, c3)` as vectors,
            /// sixteen scalars row by row, or `(array_like,)`.
            #[new]
            #[pyo3(signature = (*args))]
            fn py_new(args: &Bound<'_, PyTuple>) -> PyResult<Self> {
                let inner = match args.len() {
                    0 => Matrix4::zeros(),
                    1 => with_view(&args.get_item(0)?, Matrix4::<$t>::from_view)?,
                    4 if args.get_item(0)?.is_instance_of::<$vec>() => {
                        let mut cols = [Vector4::<$t>::zeros(); 4];
                        for (i, item) in args.iter().enumerate() {
                            cols[i] = $vec::operand("Matrix4 columns", &item)?;
                        }
                        Matrix4::from_columns(cols[0], cols[1], cols[2], cols[3])
                    }
                    4 => {
                        let [d0, d1, d2, d3] = args.extract::<[$t; 4]>()?;
                        Matrix4::from_diagonal(d0, d1, d2, d3)
                    }
                    16 => {
                        let values = args.extract::<Vec<$t>>()?;
                        Matrix4::from_row_slice(&values).map_err(to_py)?
                    }
                    n => {
                        return Err(to_py(LinalgError::Shape {
                            expected: vec![4, 4],
                            got: vec![n],
                        }))
                    }
                };
                Ok(Self { inner })
            }

            #[staticmethod]
            fn identity() -> Self {
                Self::wrap(Matrix4::identity())
            }

            #[staticmethod]
            fn zeros() -> Self {
                Self::wrap(Matrix4::zeros())
            }

            #[staticmethod]
            fn scaling(sx: $t, sy: $t, sz: $t) -> Self {
                Self::wrap(Matrix4::scaling(sx, sy, sz))
            }

            #[staticmethod]
            fn translation(tx: $t, ty: $t, tz: $t) -> Self {
                Self::wrap(Matrix4::translation(tx, ty, tz))
            }

            #[getter]
            fn dtype(&self) -> &'static str {
                Self::DTYPE.name()
            }

            #[getter(T)]
            fn transposed(&self) -> Self {
                Self::wrap(self.inner.transpose())
            }

            /// `m[c]` is a column snapshot, `m[r, c]` an entry.
            fn __getitem__(&self, py: Python<'_>, idx: &Bound<'_, PyAny>) -> PyResult<PyObject> {
                if let Ok((r, c)) = idx.extract::<(isize, isize)>() {
                    return Ok(self.inner.get(r, c).map_err(to_py)?.into_py(py));
                }
                let c: isize = idx.extract()?;
                let col = self.inner.column(c).map_err(to_py)?;
                Ok(Py::new(py, $vec { inner: col })?.into_py(py))
            }

            /// `m[r, c] = x`, or `m[c] = vector_or_array_like`.
            fn __setitem__(
                &mut self,
                idx: &Bound<'_, PyAny>,
                value: &Bound<'_, PyAny>,
            ) -> PyResult<()> {
                if let Ok((r, c)) = idx.extract::<(isize, isize)>() {
                    let value: $t = value.extract()?;
                    return self.inner.set(r, c, value).map_err(to_py);
                }
                let c: isize = idx.extract()?;
                if value.is_instance_of::<$vec>() || value.is_instance_of::<$other_vec>() {
                    let v = $vec::operand("column assignment", value)?;
                    return self.inner.set_column(c, v).map_err(to_py);
                }
                let inner = &mut self.inner;
                with_view(value, |view| inner.set_column_from(c, view))
            }

            fn column(&self, c: isize) -> PyResult<$vec> {
                Ok($vec { inner: self.inner.column(c).map_err(to_py)? })
            }

            fn row(&self, r: isize) -> PyResult<$vec> {
                Ok($vec { inner: self.inner.row(r).map_err(to_py)? })
            }

            /// Mixed precisions raise `TypeError`, as every other binary op does.
            fn __eq__(&self, other: &Bound<'_, PyAny>) -> PyResult<bool> {
                let rhs = if let Ok(o) = other.downcast::<$mat>() {
                    AnyMatrix4::from(o.borrow().inner)
                } else if let Ok(o) = other.downcast::<$other_mat>() {
                    AnyMatrix4::from(o.borrow().inner)
                } else {
                    return Ok(false);
                };
                AnyMatrix4::from(self.inner).equals(&rhs).map_err(to_py)
            }

            fn __add__(&self, other: &Bound<'_, PyAny>) -> PyResult<Self> {
                let rhs = Self::operand("+", other)?;
                Ok(Self::wrap(self.inner.add(rhs)))
            }

            fn __sub__(&self, other: &Bound<'_, PyAny>) -> PyResult<Self> {
                let rhs = Self::operand("-", other)?;
                Ok(Self::wrap(self.inner.sub(rhs)))
            }

            fn __neg__(&self) -> Self {
                Self::wrap(-self.inner)
            }

            /// Scalar, vector or matrix right-hand side, decided by its type.
            fn __mul__(&self, py: Python<'_>, other: &Bound<'_, PyAny>) -> PyResult<PyObject> {
                if let Ok(v) = other.downcast::<$vec>() {
                    let out = self.inner.mul_vec(&v.borrow().inner);
                    return Ok(Py::new(py, $vec { inner: out })?.into_py(py));
                }
                if other.is_instance_of::<$mat>() || other.is_instance_of::<$other_mat>() {
                    let rhs = Self::operand("*", other)?;
                    return Ok(Py::new(py, Self::wrap(self.inner.matmul(&rhs)))?.into_py(py));
                }
                if other.is_instance_of::<$other_vec>() {
                    return Err(mismatch(Self::DTYPE, $other_vec::DTYPE));
                }
                match other.extract::<$t>() {
                    Ok(k) => Ok(Py::new(py, Self::wrap(self.inner.scale(k)))?.into_py(py)),
                    Err(_) => Err(unsupported("*", $mat_name, other)),
                }
            }

            fn __rmul__(&self, k: $t) -> Self {
                Self::wrap(self.inner.scale(k))
            }

            fn hadamard(&self, other: &Bound<'_, PyAny>) -> PyResult<Self> {
                let rhs = Self::operand("hadamard", other)?;
                Ok(Self::wrap(self.inner.hadamard(&rhs)))
            }

            fn transpose(&self) -> Self {
                Self::wrap(self.inner.transpose())
            }

            fn trace(&self) -> $t {
                self.inner.trace()
            }

            fn determinant(&self) -> $t {
                self.inner.determinant()
            }

            /// `None` when singular.
            fn inverse(&self) -> Option<Self> {
                self.inner.inverse().map(Self::wrap)
            }

            /// 4x4 array; `layout="F"` keeps the column-major storage order.
            #[pyo3(signature = (layout = "C"))]
            fn numpy<'py>(
                &self,
                py: Python<'py>,
                layout: &str,
            ) -> PyResult<Bound<'py, PyArray2<$t>>> {
                export_matrix(py, &self.inner, parse_layout(layout)?)
            }

            /// Storage order (column-major) as a flat array.
            fn flatten<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<$t>> {
                PyArray1::from_slice_bound(py, self.inner.as_slice())
            }

            fn __repr__(&self) -> String {
                let rows = self
                    .inner
                    .rows()
                    .iter()
                    .map(|r| format!("[{}, {}, {}, {}]", r[0], r[1], r[2], r[3]))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}([{rows}])", $mat_name)
            }

            fn __str__(&self) -> String {
                self.inner.to_string()
            }
        }
    };
}

precision_classes!(
    f32,
    PyVector4f = "Vector4f",
    PyMatrix4f = "Matrix4f",
    other = (PyVector4d, PyMatrix4d)
);
precision_classes!(
    f64,
    PyVector4d = "Vector4d",
    PyMatrix4d = "Matrix4d",
    other = (PyVector4f, PyMatrix4f)
);

pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyVector4f>()?;
    m.add_class::<PyVector4d>()?;
    m.add_class::<PyMatrix4f>()?;
    m.add_class::<PyMatrix4d>()?;
    Ok(())
}
