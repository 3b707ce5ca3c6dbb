//! Buffers handed back to external consumers.

use std::borrow::Cow;

use crate::error::Result;
use crate::scalar::{DType, Scalar};

use super::{ArrayView, Layout};

/// Dense array produced by the bridge: values of type `T` plus the shape and
/// byte strides a consumer needs to address them.
///
/// A column-major matrix export borrows the matrix storage; other layouts own
/// a reordered copy.
#[derive(Clone, Debug)]
pub struct ArrayExport<'a, T: Scalar> {
    data: Cow<'a, [T]>,
    shape: Vec<usize>,
    strides: Vec<isize>,
}

impl<'a, T: Scalar> ArrayExport<'a, T> {
    pub(crate) fn borrowed(data: &'a [T], shape: &[usize], layout: Layout) -> Self {
        Self {
            data: Cow::Borrowed(data),
            strides: export_strides::<T>(shape, layout),
            shape: shape.to_vec(),
        }
    }

    pub(crate) fn owned(data: Vec<T>, shape: &[usize], layout: Layout) -> Self {
        Self {
            data: Cow::Owned(data),
            strides: export_strides::<T>(shape, layout),
            shape: shape.to_vec(),
        }
    }

    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
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
    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    /// `true` when the export aliases the source's storage.
    pub fn is_borrowed(&self) -> bool {
        matches!(self.data, Cow::Borrowed(_))
    }

    /// Element at `index`, addressed through the exported strides.
    pub fn get(&self, index: &[usize]) -> Option<T> {
        if index.len() != self.shape.len() || index.iter().zip(&self.shape).any(|(i, n)| i >= n) {
            return None;
        }
        let itemsize = T::DTYPE.itemsize() as isize;
        let pos: isize = index
            .iter()
            .zip(&self.strides)
            .map(|(&i, &s)| i as isize * s)
            .sum();
        self.data.get((pos / itemsize) as usize).copied()
    }

    /// Detach from the source.
    pub fn into_owned(self) -> ArrayExport<'static, T> {
        ArrayExport {
            data: Cow::Owned(self.data.into_owned()),
            shape: self.shape,
            strides: self.strides,
        }
    }

    /// Describe this export as an import view.
    pub fn view(&self) -> Result<ArrayView<'_>> {
        ArrayView::new(
            bytemuck::cast_slice(self.data()),
            T::DTYPE,
            &self.shape,
            &self.strides,
            0,
        )
    }
}

/// Strides of the bridge's own exports, which are always `[4]` or `[4, 4]`.
fn export_strides<T: Scalar>(shape: &[usize], layout: Layout) -> Vec<isize> {
    debug_assert!(shape.iter().all(|&n| n == 4) && (1..=2).contains(&shape.len()));
    let s = T::DTYPE.itemsize() as isize;
    match (shape.len(), layout) {
        (1, _) => vec![s],
        (_, Layout::RowMajor) => vec![4 * s, s],
        (_, Layout::ColumnMajor) => vec![s, 4 * s],
    }
}
