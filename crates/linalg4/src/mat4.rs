//! 4x4 matrix stored column-major.
//!
//! Conventions
//! - Entry `(r, c)` is stored at flat offset `c * 4 + r`; construction,
//!   indexing and the array bridge all agree on this.
//! - Argument lists that read like a matrix (`new`, `from_row_slice`,
//!   `FromStr`) are row-major; they are transposed into storage here.
//! - `column` returns a snapshot; `column_mut` is a live view borrowed from
//!   the matrix, so writes through it land in the parent.

use std::fmt;
use std::ops::{Add, Index, IndexMut, Mul, Neg, Sub};
use std::str::FromStr;

use crate::error::{check_index, Axis, LinalgError, Result};
use crate::kernels::{self, at};
use crate::scalar::Scalar;
use crate::vec4::{parse_scalars, Vector4};

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix4<T: Scalar> {
    data: [T; 16],
}

impl<T: Scalar> Default for Matrix4<T> {
    fn default() -> Self {
        Self::zeros()
    }
}

impl<T: Scalar> Matrix4<T> {
    /// Build from sixteen values listed row by row.
    #[allow(clippy::too_many_arguments)]
    #[rustfmt::skip]
    pub const fn new(
        m00: T, m01: T, m02: T, m03: T,
        m10: T, m11: T, m12: T, m13: T,
        m20: T, m21: T, m22: T, m23: T,
        m30: T, m31: T, m32: T, m33: T,
    ) -> Self {
        Self {
            data: [
                m00, m10, m20, m30,
                m01, m11, m21, m31,
                m02, m12, m22, m32,
                m03, m13, m23, m33,
            ],
        }
    }

    #[inline]
    pub const fn zeros() -> Self {
        Self { data: [T::ZERO; 16] }
    }

    #[inline]
    pub fn identity() -> Self {
        Self::from_diagonal(T::ONE, T::ONE, T::ONE, T::ONE)
    }

    /// Diagonal `(d0, d1, d2, d3)`, zero elsewhere.
    pub fn from_diagonal(d0: T, d1: T, d2: T, d3: T) -> Self {
        let mut data = [T::ZERO; 16];
        data[at(0, 0)] = d0;
        data[at(1, 1)] = d1;
        data[at(2, 2)] = d2;
        data[at(3, 3)] = d3;
        Self { data }
    }

    /// Argument `i` becomes column `i` verbatim.
    pub fn from_columns(c0: Vector4<T>, c1: Vector4<T>, c2: Vector4<T>, c3: Vector4<T>) -> Self {
        let cols = [c0, c1, c2, c3];
        Self {
            data: std::array::from_fn(|i| cols[i / 4][i % 4]),
        }
    }

    pub fn from_rows(rows: [[T; 4]; 4]) -> Self {
        Self {
            data: std::array::from_fn(|i| rows[i % 4][i / 4]),
        }
    }

    /// Sixteen values in row-major order.
    pub fn from_row_slice(values: &[T]) -> Result<Self> {
        let flat = flat16(values)?;
        Ok(Self {
            data: kernels::transpose(&flat),
        })
    }

    /// Sixteen values in storage (column-major) order.
    pub fn from_column_slice(values: &[T]) -> Result<Self> {
        Ok(Self {
            data: flat16(values)?,
        })
    }

    /// Homogeneous scaling along x, y, z.
    pub fn scaling(sx: T, sy: T, sz: T) -> Self {
        Self::from_diagonal(sx, sy, sz, T::ONE)
    }

    /// Homogeneous translation by `(tx, ty, tz)`.
    pub fn translation(tx: T, ty: T, tz: T) -> Self {
        let mut m = Self::identity();
        m.data[at(0, 3)] = tx;
        m.data[at(1, 3)] = ty;
        m.data[at(2, 3)] = tz;
        m
    }

    /// Internal storage, column-major.
    #[inline]
    pub fn as_array(&self) -> &[T; 16] {
        &self.data
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Copy of the storage, column-major.
    #[inline]
    pub fn flatten(&self) -> [T; 16] {
        self.data
    }

    pub fn rows(&self) -> [[T; 4]; 4] {
        std::array::from_fn(|r| std::array::from_fn(|c| self.data[at(r, c)]))
    }

    /// Snapshot of column `c`.
    pub fn column(&self, c: isize) -> Result<Vector4<T>> {
        let c = check_index(Axis::Column, c)?;
        Ok(self.col(c))
    }

    /// Live view of column `c`; writes go straight to this matrix.
    pub fn column_mut(&mut self, c: isize) -> Result<ColumnMut<'_, T>> {
        let c = check_index(Axis::Column, c)?;
        let (_, tail) = self.data.split_at_mut(c * 4);
        let (col, _) = tail.split_at_mut(4);
        Ok(ColumnMut { col })
    }

    pub fn row(&self, r: isize) -> Result<Vector4<T>> {
        let r = check_index(Axis::Row, r)?;
        Ok(Vector4::new(
            self.data[at(r, 0)],
            self.data[at(r, 1)],
            self.data[at(r, 2)],
            self.data[at(r, 3)],
        ))
    }

    /// Entry at row `r`, column `c`.
    pub fn get(&self, r: isize, c: isize) -> Result<T> {
        let (r, c) = check_pair(r, c)?;
        Ok(self.data[at(r, c)])
    }

    pub fn set(&mut self, r: isize, c: isize, value: T) -> Result<()> {
        let (r, c) = check_pair(r, c)?;
        self.data[at(r, c)] = value;
        Ok(())
    }

    pub fn set_column(&mut self, c: isize, v: Vector4<T>) -> Result<()> {
        let c = check_index(Axis::Column, c)?;
        self.data[c * 4..c * 4 + 4].copy_from_slice(v.as_slice());
        Ok(())
    }

    #[inline]
    pub(crate) fn col(&self, c: usize) -> Vector4<T> {
        Vector4::new(
            self.data[at(0, c)],
            self.data[at(1, c)],
            self.data[at(2, c)],
            self.data[at(3, c)],
        )
    }

    /// Entrywise sum; same as `+`.
    #[inline]
    pub fn add(self, rhs: Self) -> Self {
        Self {
            data: kernels::add(&self.data, &rhs.data),
        }
    }

    /// Entrywise difference; same as `-`.
    #[inline]
    pub fn sub(self, rhs: Self) -> Self {
        Self {
            data: kernels::sub(&self.data, &rhs.data),
        }
    }

    /// `self * k` entrywise.
    #[inline]
    pub fn scale(self, k: T) -> Self {
        Self {
            data: kernels::scale(&self.data, k),
        }
    }

    /// Matrix-vector product; same as `m * v`.
    #[inline]
    pub fn mul_vec(&self, v: &Vector4<T>) -> Vector4<T> {
        Vector4::from_array(kernels::matvec(&self.data, v.as_array()))
    }

    /// Matrix-matrix product; same as `a * b`.
    #[inline]
    pub fn matmul(&self, rhs: &Self) -> Self {
        Self {
            data: kernels::matmul(&self.data, &rhs.data),
        }
    }

    /// Entrywise product.
    #[inline]
    pub fn hadamard(&self, rhs: &Self) -> Self {
        Self {
            data: kernels::hadamard(&self.data, &rhs.data),
        }
    }

    pub fn transpose(&self) -> Self {
        Self {
            data: kernels::transpose(&self.data),
        }
    }

    pub fn transpose_in_place(&mut self) {
        kernels::transpose_in_place(&mut self.data);
    }

    pub fn trace(&self) -> T {
        kernels::trace(&self.data)
    }

    pub fn determinant(&self) -> T {
        kernels::determinant(&self.data)
    }

    /// `None` when the matrix is singular.
    pub fn inverse(&self) -> Option<Self> {
        kernels::inverse(&self.data).map(|data| Self { data })
    }

    /// Named form of `==`: all sixteen entries equal, no tolerance.
    #[inline]
    pub fn equals(&self, rhs: &Self) -> bool {
        self == rhs
    }

    /// Max-abs comparison within `eps`.
    pub fn approx_eq(&self, rhs: &Self, eps: T) -> bool {
        kernels::max_abs_diff(&self.data, &rhs.data) <= eps
    }

    /// Explicit precision conversion.
    pub fn cast<U: Scalar>(&self) -> Matrix4<U> {
        Matrix4 {
            data: self.data.map(|v| U::cast_from(v.as_f64())),
        }
    }
}

/// Mutable view of one column, borrowed from its matrix.
#[derive(Debug)]
pub struct ColumnMut<'a, T: Scalar> {
    col: &'a mut [T],
}

impl<T: Scalar> ColumnMut<'_, T> {
    pub fn get(&self, r: isize) -> Result<T> {
        Ok(self.col[check_index(Axis::Row, r)?])
    }

    pub fn set(&mut self, r: isize, value: T) -> Result<()> {
        let r = check_index(Axis::Row, r)?;
        self.col[r] = value;
        Ok(())
    }

    /// Overwrite the whole column.
    pub fn assign(&mut self, v: Vector4<T>) {
        self.col.copy_from_slice(v.as_slice());
    }

    pub fn to_vector(&self) -> Vector4<T> {
        Vector4::new(self.col[0], self.col[1], self.col[2], self.col[3])
    }
}

fn check_pair(r: isize, c: isize) -> Result<(usize, usize)> {
    Ok((check_index(Axis::Row, r)?, check_index(Axis::Column, c)?))
}

fn flat16<T: Scalar>(values: &[T]) -> Result<[T; 16]> {
    values
        .try_into()
        .map_err(|_| LinalgError::shape(&[4, 4], &[values.len()]))
}

impl<T: Scalar> From<[[T; 4]; 4]> for Matrix4<T> {
    fn from(rows: [[T; 4]; 4]) -> Self {
        Self::from_rows(rows)
    }
}

impl<T: Scalar> From<nalgebra::Matrix4<T>> for Matrix4<T> {
    fn from(m: nalgebra::Matrix4<T>) -> Self {
        // nalgebra stores column-major as well.
        Self {
            data: std::array::from_fn(|i| m[(i % 4, i / 4)]),
        }
    }
}

impl<T: Scalar> From<Matrix4<T>> for nalgebra::Matrix4<T> {
    fn from(m: Matrix4<T>) -> Self {
        nalgebra::Matrix4::from_column_slice(&m.data)
    }
}

/// `m[(row, col)]`; panics out of range. Use `get` for checked access.
impl<T: Scalar> Index<(usize, usize)> for Matrix4<T> {
    type Output = T;

    #[inline]
    fn index(&self, (r, c): (usize, usize)) -> &T {
        assert!(r < 4 && c < 4, "matrix index ({r}, {c}) out of range");
        &self.data[at(r, c)]
    }
}

impl<T: Scalar> IndexMut<(usize, usize)> for Matrix4<T> {
    #[inline]
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut T {
        assert!(r < 4 && c < 4, "matrix index ({r}, {c}) out of range");
        &mut self.data[at(r, c)]
    }
}

impl<T: Scalar> Add for Matrix4<T> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            data: kernels::add(&self.data, &rhs.data),
        }
    }
}

impl<T: Scalar> Sub for Matrix4<T> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self {
            data: kernels::sub(&self.data, &rhs.data),
        }
    }
}

impl<T: Scalar> Neg for Matrix4<T> {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            data: self.data.map(|v| -v),
        }
    }
}

impl<T: Scalar> Mul<T> for Matrix4<T> {
    type Output = Self;

    #[inline]
    fn mul(self, k: T) -> Self {
        self.scale(k)
    }
}

impl<T: Scalar> Mul<Vector4<T>> for Matrix4<T> {
    type Output = Vector4<T>;

    #[inline]
    fn mul(self, v: Vector4<T>) -> Vector4<T> {
        self.mul_vec(&v)
    }
}

impl<T: Scalar> Mul for Matrix4<T> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.matmul(&rhs)
    }
}

macro_rules! scalar_times_matrix {
    ($($t:ty),*) => {$(
        impl Mul<Matrix4<$t>> for $t {
            type Output = Matrix4<$t>;

            #[inline]
            fn mul(self, m: Matrix4<$t>) -> Matrix4<$t> {
                m.scale(self)
            }
        }
    )*};
}
scalar_times_matrix!(f32, f64);

impl<T: Scalar> fmt::Display for Matrix4<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..4 {
            let open = if r == 0 { "( " } else { "  " };
            let a = |c: usize| self.data[at(r, c)];
            write!(f, "{open}{}, {}, {}, {}", a(0), a(1), a(2), a(3))?;
            if r < 3 {
                writeln!(f)?;
            }
        }
        f.write_str(" )")
    }
}

/// Sixteen numbers in row-major order, separated by commas and/or whitespace
/// (the `Display` output parses back).
impl<T: Scalar> FromStr for Matrix4<T> {
    type Err = LinalgError;

    fn from_str(s: &str) -> Result<Self> {
        let values = parse_scalars::<T>(s)?;
        Self::from_row_slice(&values)
    }
}
