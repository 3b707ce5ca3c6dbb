//! Validated descriptor over an externally owned dense buffer.

use crate::error::{LinalgError, Result};
use crate::scalar::{DType, Scalar};

use super::Layout;

/// Borrowed `(bytes, dtype, shape, byte strides, offset)` description of an
/// external array.
///
/// Invariants (checked by `new`):
/// - `shape.len() == strides.len()`.
/// - Every element addressed by `shape`/`strides` lies within `bytes`,
///   starting `offset` bytes in (negative strides walk backwards from there).
#[derive(Clone, Debug)]
pub struct ArrayView<'a> {
    bytes: &'a [u8],
    dtype: DType,
    shape: Vec<usize>,
    strides: Vec<isize>,
    offset: usize,
}

impl<'a> ArrayView<'a> {
    pub fn new(
        bytes: &'a [u8],
        dtype: DType,
        shape: &[usize],
        strides: &[isize],
        offset: usize,
    ) -> Result<Self> {
        if shape.len() != strides.len() {
            return Err(LinalgError::stride(format!(
                "{} strides for a rank-{} shape",
                strides.len(),
                shape.len()
            )));
        }
        check_extent(bytes.len(), dtype.itemsize(), shape, strides, offset)?;
        Ok(Self {
            bytes,
            dtype,
            shape: shape.to_vec(),
            strides: strides.to_vec(),
            offset,
        })
    }

    /// Contiguous buffer in the given layout.
    pub fn from_bytes(
        bytes: &'a [u8],
        dtype: DType,
        shape: &[usize],
        layout: Layout,
    ) -> Result<Self> {
        let strides = layout.strides(shape, dtype.itemsize())?;
        Self::new(bytes, dtype, shape, &strides, 0)
    }

    /// Contiguous buffer of any plain-old-data element type tagged `dtype`.
    pub fn from_pod<P: bytemuck::Pod>(
        data: &'a [P],
        dtype: DType,
        shape: &[usize],
        layout: Layout,
    ) -> Result<Self> {
        if std::mem::size_of::<P>() != dtype.itemsize() {
            return Err(LinalgError::stride(format!(
                "element size {} does not match {dtype} itemsize {}",
                std::mem::size_of::<P>(),
                dtype.itemsize()
            )));
        }
        Self::from_bytes(bytemuck::cast_slice(data), dtype, shape, layout)
    }

    /// Contiguous buffer of `f32`/`f64` values.
    pub fn from_slice<T: Scalar>(data: &'a [T], shape: &[usize], layout: Layout) -> Result<Self> {
        Self::from_pod(data, T::DTYPE, shape, layout)
    }

    #[inline]
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Byte strides, one per dimension.
    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `DtypeError` unless the element type is `float32` or `float64`.
    pub(crate) fn require_float(&self) -> Result<()> {
        if self.dtype.is_supported_float() {
            Ok(())
        } else {
            Err(LinalgError::Dtype { found: self.dtype })
        }
    }

    /// Read element `index` (one coordinate per dimension) cast to `T`.
    ///
    /// Same-precision reads copy the stored bits; only a precision change
    /// goes through a numeric cast.
    /// Callers have validated the dtype and that `index` is inside `shape`.
    pub(crate) fn read<T: Scalar>(&self, index: &[usize]) -> T {
        debug_assert_eq!(index.len(), self.shape.len());
        let mut pos = self.offset as isize;
        for (i, &stride) in index.iter().zip(&self.strides) {
            pos += *i as isize * stride;
        }
        let pos = pos as usize;
        let raw = &self.bytes[pos..pos + self.dtype.itemsize()];
        if self.dtype == T::DTYPE {
            return T::read_ne(raw);
        }
        match self.dtype {
            DType::Float32 => T::cast_from(f32::read_ne(raw).as_f64()),
            DType::Float64 => T::cast_from(f64::read_ne(raw)),
            other => unreachable!("read() on unvalidated dtype {other}"),
        }
    }
}

/// Lowest and highest byte touched must stay within `len`.
fn check_extent(
    len: usize,
    itemsize: usize,
    shape: &[usize],
    strides: &[isize],
    offset: usize,
) -> Result<()> {
    if shape.iter().any(|&n| n == 0) {
        return Ok(());
    }
    let overflow = || LinalgError::stride("byte offsets overflow");
    let mut lo = offset as isize;
    let mut hi = offset as isize;
    for (&n, &stride) in shape.iter().zip(strides) {
        let span = isize::try_from(n - 1)
            .ok()
            .and_then(|k| k.checked_mul(stride))
            .ok_or_else(overflow)?;
        if span < 0 {
            lo = lo.checked_add(span).ok_or_else(overflow)?;
        } else {
            hi = hi.checked_add(span).ok_or_else(overflow)?;
        }
    }
    let end = hi
        .checked_add(itemsize as isize)
        .ok_or_else(overflow)?;
    if lo < 0 || end as usize > len {
        return Err(LinalgError::stride(format!(
            "elements span bytes [{lo}, {end}) of a {len}-byte buffer"
        )));
    }
    Ok(())
}
