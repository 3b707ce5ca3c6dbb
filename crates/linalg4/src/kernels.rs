//! Scalar kernels over flat column-major buffers.
//!
//! Entry `(r, c)` of a matrix buffer lives at `c * 4 + r`. Sums are
//! accumulated left to right starting from the `k = 0` term, so results are
//! reproducible for a given precision.

use crate::scalar::Scalar;

pub(crate) type Mat4Buf<T> = [T; 16];
pub(crate) type Vec4Buf<T> = [T; 4];

#[inline]
pub(crate) const fn at(r: usize, c: usize) -> usize {
    c * 4 + r
}

#[inline]
pub(crate) fn add<T: Scalar, const N: usize>(lhs: &[T; N], rhs: &[T; N]) -> [T; N] {
    std::array::from_fn(|i| lhs[i] + rhs[i])
}

#[inline]
pub(crate) fn sub<T: Scalar, const N: usize>(lhs: &[T; N], rhs: &[T; N]) -> [T; N] {
    std::array::from_fn(|i| lhs[i] - rhs[i])
}

#[inline]
pub(crate) fn scale<T: Scalar, const N: usize>(buf: &[T; N], k: T) -> [T; N] {
    std::array::from_fn(|i| buf[i] * k)
}

#[inline]
pub(crate) fn hadamard<T: Scalar, const N: usize>(lhs: &[T; N], rhs: &[T; N]) -> [T; N] {
    std::array::from_fn(|i| lhs[i] * rhs[i])
}

#[inline]
pub(crate) fn dot4<T: Scalar>(lhs: &Vec4Buf<T>, rhs: &Vec4Buf<T>) -> T {
    let mut acc = lhs[0] * rhs[0];
    for i in 1..4 {
        acc += lhs[i] * rhs[i];
    }
    acc
}

/// `out[r] = sum_c m[r, c] * v[c]`.
pub(crate) fn matvec<T: Scalar>(m: &Mat4Buf<T>, v: &Vec4Buf<T>) -> Vec4Buf<T> {
    std::array::from_fn(|r| {
        let mut acc = m[at(r, 0)] * v[0];
        for c in 1..4 {
            acc += m[at(r, c)] * v[c];
        }
        acc
    })
}

/// `out[r, c] = sum_k a[r, k] * b[k, c]`; plain triple loop.
pub(crate) fn matmul<T: Scalar>(a: &Mat4Buf<T>, b: &Mat4Buf<T>) -> Mat4Buf<T> {
    let mut out = [T::ZERO; 16];
    for c in 0..4 {
        for r in 0..4 {
            let mut acc = a[at(r, 0)] * b[at(0, c)];
            for k in 1..4 {
                acc += a[at(r, k)] * b[at(k, c)];
            }
            out[at(r, c)] = acc;
        }
    }
    out
}

pub(crate) fn transpose<T: Scalar>(m: &Mat4Buf<T>) -> Mat4Buf<T> {
    std::array::from_fn(|i| {
        let (r, c) = (i % 4, i / 4);
        m[at(c, r)]
    })
}

pub(crate) fn transpose_in_place<T: Scalar>(m: &mut Mat4Buf<T>) {
    for c in 0..4 {
        for r in (c + 1)..4 {
            m.swap(at(r, c), at(c, r));
        }
    }
}

pub(crate) fn trace<T: Scalar>(m: &Mat4Buf<T>) -> T {
    m[at(0, 0)] + m[at(1, 1)] + m[at(2, 2)] + m[at(3, 3)]
}

/// 2x2 minors of the top two rows (`s`) and bottom two rows (`c`), shared by
/// the determinant and the adjugate.
struct Minors<T> {
    s: [T; 6],
    c: [T; 6],
}

fn minors<T: Scalar>(m: &Mat4Buf<T>) -> Minors<T> {
    let a = |r: usize, c: usize| m[at(r, c)];
    let s = [
        a(0, 0) * a(1, 1) - a(1, 0) * a(0, 1),
        a(0, 0) * a(1, 2) - a(1, 0) * a(0, 2),
        a(0, 0) * a(1, 3) - a(1, 0) * a(0, 3),
        a(0, 1) * a(1, 2) - a(1, 1) * a(0, 2),
        a(0, 1) * a(1, 3) - a(1, 1) * a(0, 3),
        a(0, 2) * a(1, 3) - a(1, 2) * a(0, 3),
    ];
    let c = [
        a(2, 0) * a(3, 1) - a(3, 0) * a(2, 1),
        a(2, 0) * a(3, 2) - a(3, 0) * a(2, 2),
        a(2, 0) * a(3, 3) - a(3, 0) * a(2, 3),
        a(2, 1) * a(3, 2) - a(3, 1) * a(2, 2),
        a(2, 1) * a(3, 3) - a(3, 1) * a(2, 3),
        a(2, 2) * a(3, 3) - a(3, 2) * a(2, 3),
    ];
    Minors { s, c }
}

fn det_from_minors<T: Scalar>(mn: &Minors<T>) -> T {
    let (s, c) = (&mn.s, &mn.c);
    s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1] + s[5] * c[0]
}

/// Laplace expansion along the top two rows.
pub(crate) fn determinant<T: Scalar>(m: &Mat4Buf<T>) -> T {
    det_from_minors(&minors(m))
}

/// Adjugate over determinant; `None` when the determinant is zero or not finite.
pub(crate) fn inverse<T: Scalar>(m: &Mat4Buf<T>) -> Option<Mat4Buf<T>> {
    let mn = minors(m);
    let det = det_from_minors(&mn);
    if det == T::ZERO || !det.is_finite() {
        return None;
    }
    let inv_det = T::ONE / det;
    let a = |r: usize, c: usize| m[at(r, c)];
    let (s, c) = (&mn.s, &mn.c);

    // Row-major listing of the adjugate.
    let adj = [
        a(1, 1) * c[5] - a(1, 2) * c[4] + a(1, 3) * c[3],
        -a(0, 1) * c[5] + a(0, 2) * c[4] - a(0, 3) * c[3],
        a(3, 1) * s[5] - a(3, 2) * s[4] + a(3, 3) * s[3],
        -a(2, 1) * s[5] + a(2, 2) * s[4] - a(2, 3) * s[3],
        -a(1, 0) * c[5] + a(1, 2) * c[2] - a(1, 3) * c[1],
        a(0, 0) * c[5] - a(0, 2) * c[2] + a(0, 3) * c[1],
        -a(3, 0) * s[5] + a(3, 2) * s[2] - a(3, 3) * s[1],
        a(2, 0) * s[5] - a(2, 2) * s[2] + a(2, 3) * s[1],
        a(1, 0) * c[4] - a(1, 1) * c[2] + a(1, 3) * c[0],
        -a(0, 0) * c[4] + a(0, 1) * c[2] - a(0, 3) * c[0],
        a(3, 0) * s[4] - a(3, 1) * s[2] + a(3, 3) * s[0],
        -a(2, 0) * s[4] + a(2, 1) * s[2] - a(2, 3) * s[0],
        -a(1, 0) * c[3] + a(1, 1) * c[1] - a(1, 2) * c[0],
        a(0, 0) * c[3] - a(0, 1) * c[1] + a(0, 2) * c[0],
        -a(3, 0) * s[3] + a(3, 1) * s[1] - a(3, 2) * s[0],
        a(2, 0) * s[3] - a(2, 1) * s[1] + a(2, 2) * s[0],
    ];
    Some(std::array::from_fn(|i| {
        let (r, c) = (i % 4, i / 4);
        adj[r * 4 + c] * inv_det
    }))
}

/// Largest entrywise absolute difference.
pub(crate) fn max_abs_diff<T: Scalar, const N: usize>(lhs: &[T; N], rhs: &[T; N]) -> T {
    let mut worst = T::ZERO;
    for i in 0..N {
        let d = (lhs[i] - rhs[i]).abs();
        if !d.is_finite() || d > worst {
            worst = d;
        }
    }
    worst
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_rows(rows: [[f64; 4]; 4]) -> Mat4Buf<f64> {
        std::array::from_fn(|i| rows[i % 4][i / 4])
    }

    #[test]
    fn offsets_are_column_major() {
        assert_eq!(at(0, 0), 0);
        assert_eq!(at(3, 0), 3);
        assert_eq!(at(0, 1), 4);
        assert_eq!(at(2, 3), 14);
    }

    #[test]
    fn transpose_variants_agree() {
        let m: Mat4Buf<f64> = std::array::from_fn(|i| i as f64);
        let mut n = m;
        transpose_in_place(&mut n);
        assert_eq!(n, transpose(&m));
        assert_eq!(transpose(&n), m);
    }

    #[test]
    fn determinant_of_triangular_is_diagonal_product() {
        let m = from_rows([
            [2.0, 5.0, -1.0, 7.0],
            [0.0, 3.0, 4.0, 1.0],
            [0.0, 0.0, -1.5, 2.0],
            [0.0, 0.0, 0.0, 4.0],
        ]);
        assert_eq!(determinant(&m), 2.0 * 3.0 * -1.5 * 4.0);
    }

    #[test]
    fn inverse_times_matrix_is_identity() {
        let m = from_rows([
            [4.0, 7.0, 2.0, 3.0],
            [0.0, 5.0, 0.0, 1.0],
            [1.0, 0.0, 3.0, 0.0],
            [2.0, 1.0, 0.0, 6.0],
        ]);
        let inv = inverse(&m).expect("invertible");
        let prod = matmul(&inv, &m);
        let eye = from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        assert!(max_abs_diff(&prod, &eye) < 1e-12);
    }

    #[test]
    fn singular_has_no_inverse() {
        let m = from_rows([
            [1.0, 2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0, 8.0],
            [9.0, 10.0, 11.0, 12.0],
            [13.0, 14.0, 15.0, 16.0],
        ]);
        assert_eq!(determinant(&m), 0.0);
        assert!(inverse(&m).is_none());
    }
}
