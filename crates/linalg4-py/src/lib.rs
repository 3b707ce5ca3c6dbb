//! PyO3 bindings for `linalg4`.
//!
//! Notes
//! - Keep bindings thin: every operation forwards to the Rust value types, and
//!   NumPy arrays cross through the library's `ArrayView`/`ArrayExport` bridge.
//! - Library errors become `ValueError` (shape, strides, parse), `IndexError`
//!   or `TypeError` (dtype, precision mismatch).

use pyo3::prelude::*;

mod array;
mod classes;
mod errors;

#[pymodule]
fn linalg4_native(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", linalg4::VERSION)?;
    classes::register(m)?;
    Ok(())
}
