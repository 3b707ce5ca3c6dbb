//! Four-component column vector.

use std::fmt;
use std::ops::{Add, Index, IndexMut, Mul, Neg, Sub};
use std::str::FromStr;

use crate::error::{check_index, Axis, LinalgError, Result};
use crate::kernels;
use crate::scalar::Scalar;

/// Column vector `(x, y, z, w)` stored contiguously in that order.
///
/// Invariants:
/// - Always exactly four components; there is no resize.
/// - `==` is exact IEEE equality per component. Use `approx_eq` for tolerances.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector4<T: Scalar> {
    data: [T; 4],
}

impl<T: Scalar> Vector4<T> {
    #[inline]
    pub const fn new(x: T, y: T, z: T, w: T) -> Self {
        Self { data: [x, y, z, w] }
    }

    #[inline]
    pub const fn zeros() -> Self {
        Self { data: [T::ZERO; 4] }
    }

    #[inline]
    pub const fn splat(v: T) -> Self {
        Self { data: [v; 4] }
    }

    #[inline]
    pub const fn from_array(data: [T; 4]) -> Self {
        Self { data }
    }

    /// Build from a slice of exactly four values.
    pub fn from_slice(values: &[T]) -> Result<Self> {
        let data: [T; 4] = values
            .try_into()
            .map_err(|_| LinalgError::shape(&[4], &[values.len()]))?;
        Ok(Self { data })
    }

    #[inline]
    pub fn to_array(self) -> [T; 4] {
        self.data
    }

    #[inline]
    pub fn as_array(&self) -> &[T; 4] {
        &self.data
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn x(&self) -> T {
        self.data[0]
    }
    #[inline]
    pub fn y(&self) -> T {
        self.data[1]
    }
    #[inline]
    pub fn z(&self) -> T {
        self.data[2]
    }
    #[inline]
    pub fn w(&self) -> T {
        self.data[3]
    }

    /// Component `i`; `IndexError` outside `[0, 3]` (including negatives).
    #[inline]
    pub fn get(&self, i: isize) -> Result<T> {
        Ok(self.data[check_index(Axis::Component, i)?])
    }

    /// Overwrite component `i` in place.
    #[inline]
    pub fn set(&mut self, i: isize, value: T) -> Result<()> {
        let i = check_index(Axis::Component, i)?;
        self.data[i] = value;
        Ok(())
    }

    /// Entrywise sum; same as `+`.
    #[inline]
    pub fn add(self, rhs: Self) -> Self {
        Self::from_array(kernels::add(&self.data, &rhs.data))
    }

    /// Entrywise difference; same as `-`.
    #[inline]
    pub fn sub(self, rhs: Self) -> Self {
        Self::from_array(kernels::sub(&self.data, &rhs.data))
    }

    #[inline]
    pub fn scale(self, k: T) -> Self {
        Self::from_array(kernels::scale(&self.data, k))
    }

    /// Componentwise product.
    #[inline]
    pub fn hadamard(self, rhs: Self) -> Self {
        Self::from_array(kernels::hadamard(&self.data, &rhs.data))
    }

    #[inline]
    pub fn dot(&self, rhs: &Self) -> T {
        kernels::dot4(&self.data, &rhs.data)
    }

    #[inline]
    pub fn norm_squared(&self) -> T {
        self.dot(self)
    }

    #[inline]
    pub fn norm(&self) -> T {
        self.norm_squared().sqrt()
    }

    /// Unit vector in the same direction; `None` for the zero vector.
    pub fn normalize(&self) -> Option<Self> {
        let n = self.norm();
        if n == T::ZERO || !n.is_finite() {
            return None;
        }
        Some(Self::from_array(self.data.map(|v| v / n)))
    }

    /// Named form of `==`.
    #[inline]
    pub fn equals(&self, rhs: &Self) -> bool {
        self == rhs
    }

    /// Max-abs comparison within `eps`.
    pub fn approx_eq(&self, rhs: &Self, eps: T) -> bool {
        kernels::max_abs_diff(&self.data, &rhs.data) <= eps
    }

    /// Explicit precision conversion.
    pub fn cast<U: Scalar>(&self) -> Vector4<U> {
        Vector4::from_array(self.data.map(|v| U::cast_from(v.as_f64())))
    }
}

impl<T: Scalar> From<[T; 4]> for Vector4<T> {
    fn from(data: [T; 4]) -> Self {
        Self { data }
    }
}

impl<T: Scalar> From<Vector4<T>> for [T; 4] {
    fn from(v: Vector4<T>) -> Self {
        v.data
    }
}

impl<T: Scalar> From<nalgebra::Vector4<T>> for Vector4<T> {
    fn from(v: nalgebra::Vector4<T>) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl<T: Scalar> From<Vector4<T>> for nalgebra::Vector4<T> {
    fn from(v: Vector4<T>) -> Self {
        nalgebra::Vector4::new(v.data[0], v.data[1], v.data[2], v.data[3])
    }
}

impl<T: Scalar> Index<usize> for Vector4<T> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.data[i]
    }
}

impl<T: Scalar> IndexMut<usize> for Vector4<T> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.data[i]
    }
}

impl<T: Scalar> Add for Vector4<T> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::from_array(kernels::add(&self.data, &rhs.data))
    }
}

impl<T: Scalar> Sub for Vector4<T> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::from_array(kernels::sub(&self.data, &rhs.data))
    }
}

impl<T: Scalar> Neg for Vector4<T> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::from_array(self.data.map(|v| -v))
    }
}

impl<T: Scalar> Mul<T> for Vector4<T> {
    type Output = Self;

    #[inline]
    fn mul(self, k: T) -> Self {
        self.scale(k)
    }
}

macro_rules! scalar_times_vector {
    ($($t:ty),*) => {$(
        impl Mul<Vector4<$t>> for $t {
            type Output = Vector4<$t>;

            #[inline]
            fn mul(self, v: Vector4<$t>) -> Vector4<$t> {
                v.scale(self)
            }
        }
    )*};
}
scalar_times_vector!(f32, f64);

impl<T: Scalar> fmt::Display for Vector4<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z, w] = self.data;
        write!(f, "({x}, {y}, {z}, {w})")
    }
}

/// Four numbers separated by commas and/or whitespace; surrounding
/// parentheses or brackets are ignored.
impl<T: Scalar> FromStr for Vector4<T> {
    type Err = LinalgError;

    fn from_str(s: &str) -> Result<Self> {
        let values = parse_scalars::<T>(s)?;
        Self::from_slice(&values)
    }
}

pub(crate) fn parse_scalars<T: Scalar>(s: &str) -> Result<Vec<T>> {
    s.trim()
        .trim_start_matches(['(', '['])
        .trim_end_matches([')', ']'])
        .split(|c: char| c == ',' || c.is_whitespace() || c == '[' || c == ']')
        .filter(|tok| !tok.is_empty())
        .map(|tok| {
            tok.parse::<T>()
                .map_err(|_| LinalgError::parse(format!("not a number: {tok:?}")))
        })
        .collect()
}
