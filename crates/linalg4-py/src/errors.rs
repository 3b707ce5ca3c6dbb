use linalg4::LinalgError;
use pyo3::exceptions::{PyIndexError, PyTypeError, PyValueError};
use pyo3::PyErr;

/// Map library errors onto the closest built-in Python exception.
pub fn to_py(err: LinalgError) -> PyErr {
    let msg = err.to_string();
    match err {
        LinalgError::Shape { .. } | LinalgError::Stride { .. } | LinalgError::Parse { .. } => {
            PyValueError::new_err(msg)
        }
        LinalgError::Index { .. } => PyIndexError::new_err(msg),
        LinalgError::Dtype { .. } | LinalgError::PrecisionMismatch { .. } => {
            PyTypeError::new_err(msg)
        }
    }
}
