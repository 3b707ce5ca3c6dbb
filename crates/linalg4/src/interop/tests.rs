use super::*;
use crate::scalar::DType;

fn sample<T: Scalar>() -> Matrix4<T> {
    Matrix4::from_row_slice(
        &(0..16)
            .map(|i| T::cast_from(i as f64 * 0.25 - 1.5))
            .collect::<Vec<_>>(),
    )
    .unwrap()
}

#[test]
fn layout_strides() {
    assert_eq!(Layout::RowMajor.strides(&[4, 4], 8).unwrap(), vec![32, 8]);
    assert_eq!(Layout::ColumnMajor.strides(&[4, 4], 8).unwrap(), vec![8, 32]);
    assert_eq!(Layout::RowMajor.strides(&[4], 4).unwrap(), vec![4]);
    assert_eq!(Layout::ColumnMajor.strides(&[2, 3, 5], 4).unwrap(), vec![4, 8, 24]);
    assert_eq!(Layout::RowMajor.strides(&[2, 3, 5], 4).unwrap(), vec![60, 20, 4]);
}

#[test]
fn huge_shapes_are_a_stride_error() {
    for layout in [Layout::RowMajor, Layout::ColumnMajor] {
        assert!(matches!(
            layout.strides(&[1 << 62, 4], 8),
            Err(LinalgError::Stride { .. })
        ));
        let res = ArrayView::from_slice(&[0.0f64; 16], &[1usize << 62, 4], layout);
        assert!(matches!(res, Err(LinalgError::Stride { .. })), "{layout:?}");
    }
    let res = ArrayView::from_bytes(&[0u8; 16], DType::Float32, &[usize::MAX], Layout::RowMajor);
    assert!(matches!(res, Err(LinalgError::Stride { .. })));
}

#[test]
fn column_major_export_aliases_storage() {
    let m = sample::<f64>();
    let out = m.export(Layout::ColumnMajor);
    assert!(out.is_borrowed());
    assert_eq!(out.shape(), &[4, 4]);
    assert_eq!(out.strides(), &[8, 32]);
    assert_eq!(out.dtype(), DType::Float64);
    assert_eq!(out.data().as_ptr(), m.as_slice().as_ptr());
}

#[test]
fn row_major_export_reorders() {
    let m = sample::<f32>();
    let out = m.export(Layout::RowMajor);
    assert!(!out.is_borrowed());
    assert_eq!(out.strides(), &[16, 4]);
    let rows = m.rows();
    let flat: Vec<f32> = rows.iter().flatten().copied().collect();
    assert_eq!(out.data(), flat.as_slice());
}

#[test]
fn export_entries_match_matrix_entries() {
    let m = sample::<f64>();
    for layout in [Layout::RowMajor, Layout::ColumnMajor] {
        let out = m.export(layout);
        for r in 0..4 {
            for c in 0..4 {
                assert_eq!(out.get(&[r, c]), Some(m[(r, c)]), "{layout:?} ({r}, {c})");
            }
        }
        assert_eq!(out.get(&[4, 0]), None);
        assert_eq!(out.get(&[0]), None);
    }
}

fn bits<T: Scalar>(m: &Matrix4<T>) -> Vec<u64> {
    m.as_slice().iter().map(|v| v.to_bits_u64()).collect()
}

#[test]
fn round_trip_is_bit_exact() {
    fn check<T: Scalar>() {
        let mut m = sample::<T>();
        m.set(1, 2, T::cast_from(1.0 / 3.0)).unwrap();
        for layout in [Layout::RowMajor, Layout::ColumnMajor] {
            let out = m.export(layout);
            let back = Matrix4::<T>::from_view(&out.view().unwrap()).unwrap();
            assert_eq!(bits(&back), bits(&m));
        }
        let v = Vector4::new(T::ONE, T::cast_from(0.1), T::cast_from(-7.5), T::ZERO);
        let back = Vector4::<T>::from_view(&v.export().view().unwrap()).unwrap();
        assert_eq!(back, v);
    }
    check::<f32>();
    check::<f64>();
}

#[test]
fn signaling_nan_and_negative_zero_survive_round_trip() {
    fn check<T: Scalar>(snan: T) {
        let mut m = sample::<T>();
        m.set(0, 0, snan).unwrap();
        m.set(2, 1, -T::ZERO).unwrap();
        m.set(3, 3, T::infinity()).unwrap();
        for layout in [Layout::RowMajor, Layout::ColumnMajor] {
            let back = Matrix4::<T>::from_view(&m.export(layout).view().unwrap()).unwrap();
            assert_eq!(bits(&back), bits(&m), "{layout:?}");
        }
        let v = Vector4::new(snan, -T::ZERO, T::ONE, T::neg_infinity());
        let back = Vector4::<T>::from_view(&v.export().view().unwrap()).unwrap();
        for (got, want) in back.as_slice().iter().zip(v.as_slice()) {
            assert_eq!(got.to_bits_u64(), want.to_bits_u64());
        }
    }
    check(f32::from_bits(0x7f80_0001));
    check(f64::from_bits(0x7ff0_0000_0000_0001));
}

#[test]
fn import_honours_memory_order() {
    let row_major: Vec<f64> = (0..16).map(f64::from).collect();
    let rm = ArrayView::from_slice(&row_major, &[4, 4], Layout::RowMajor).unwrap();
    let cm = ArrayView::from_slice(&row_major, &[4, 4], Layout::ColumnMajor).unwrap();
    let a = Matrix4::<f64>::from_view(&rm).unwrap();
    let b = Matrix4::<f64>::from_view(&cm).unwrap();
    assert_eq!(a.get(0, 1), Ok(1.0));
    assert_eq!(a.get(1, 0), Ok(4.0));
    assert_eq!(b, a.transpose());
}

#[test]
fn vector_shapes() {
    let data = [1.0f32, 2.0, 3.0, 4.0];
    let want = Vector4::new(1.0, 2.0, 3.0, 4.0);
    for shape in [&[4usize][..], &[4, 1][..], &[1, 4][..]] {
        let view = ArrayView::from_slice(&data, shape, Layout::RowMajor).unwrap();
        assert_eq!(Vector4::<f32>::from_view(&view), Ok(want), "{shape:?}");
    }
    let short = ArrayView::from_slice(&data[..3], &[3], Layout::RowMajor).unwrap();
    assert_eq!(
        Vector4::<f32>::from_view(&short),
        Err(LinalgError::Shape {
            expected: vec![4],
            got: vec![3]
        })
    );
    let square = [0.0f32; 4];
    let two_by_two = ArrayView::from_slice(&square, &[2, 2], Layout::RowMajor).unwrap();
    assert!(matches!(
        Vector4::<f32>::from_view(&two_by_two),
        Err(LinalgError::Shape { .. })
    ));
}

#[test]
fn matrix_shape_error() {
    let data = [0.0f64; 12];
    let view = ArrayView::from_slice(&data, &[3, 4], Layout::RowMajor).unwrap();
    assert_eq!(
        Matrix4::<f64>::from_view(&view),
        Err(LinalgError::Shape {
            expected: vec![4, 4],
            got: vec![3, 4]
        })
    );
}

#[test]
fn non_float_dtype_rejected_before_shape() {
    let ints = [1i32, 2, 3];
    let view = ArrayView::from_pod(&ints, DType::Int32, &[3], Layout::RowMajor).unwrap();
    assert_eq!(
        Vector4::<f64>::from_view(&view),
        Err(LinalgError::Dtype {
            found: DType::Int32
        })
    );
    let m = [0i64; 16];
    let view = ArrayView::from_pod(&m, DType::Int64, &[4, 4], Layout::RowMajor).unwrap();
    assert!(matches!(
        Matrix4::<f32>::from_view(&view),
        Err(LinalgError::Dtype { .. })
    ));
}

#[test]
fn pod_size_must_match_dtype() {
    let ints = [1i32; 4];
    assert!(matches!(
        ArrayView::from_pod(&ints, DType::Float64, &[4], Layout::RowMajor),
        Err(LinalgError::Stride { .. })
    ));
}

#[test]
fn import_casts_precision() {
    let data = [0.1f64, 0.2, 0.3, 0.4];
    let view = ArrayView::from_slice(&data, &[4], Layout::RowMajor).unwrap();
    let v = Vector4::<f32>::from_view(&view).unwrap();
    assert_eq!(v.to_array(), [0.1f32, 0.2, 0.3, 0.4]);
    let narrow = [0.5f32, 1.5, -2.5, 8.0];
    let view = ArrayView::from_slice(&narrow, &[4], Layout::RowMajor).unwrap();
    assert_eq!(
        Vector4::<f64>::from_view(&view),
        Ok(Vector4::new(0.5, 1.5, -2.5, 8.0))
    );
}

#[test]
fn strided_and_reversed_views() {
    // Every other element of an 8-long buffer.
    let data: Vec<f64> = (0..8).map(f64::from).collect();
    let bytes: &[u8] = bytemuck::cast_slice(&data);
    let view = ArrayView::new(bytes, DType::Float64, &[4], &[16], 0).unwrap();
    assert_eq!(
        Vector4::<f64>::from_view(&view),
        Ok(Vector4::new(0.0, 2.0, 4.0, 6.0))
    );
    // Reversed: start at the last element and walk back.
    let view = ArrayView::new(bytes, DType::Float64, &[4], &[-8], 7 * 8).unwrap();
    assert_eq!(
        Vector4::<f64>::from_view(&view),
        Ok(Vector4::new(7.0, 6.0, 5.0, 4.0))
    );
}

#[test]
fn sliced_matrix_column_view() {
    // Column 2 of a row-major 4x4 buffer.
    let rows: Vec<f32> = (0..16).map(|i| i as f32).collect();
    let bytes: &[u8] = bytemuck::cast_slice(&rows);
    let view = ArrayView::new(bytes, DType::Float32, &[4], &[16], 2 * 4).unwrap();
    let mut m = Matrix4::<f32>::zeros();
    m.set_column_from(0, &view).unwrap();
    assert_eq!(m.column(0), Ok(Vector4::new(2.0, 6.0, 10.0, 14.0)));
}

#[test]
fn out_of_bounds_views_rejected() {
    let data = [0.0f64; 4];
    let bytes: &[u8] = bytemuck::cast_slice(&data);
    for (strides, offset) in [(&[16isize][..], 0usize), (&[-8][..], 0), (&[8][..], 8)] {
        assert!(
            matches!(
                ArrayView::new(bytes, DType::Float64, &[4], strides, offset),
                Err(LinalgError::Stride { .. })
            ),
            "{strides:?} @ {offset}"
        );
    }
    assert!(matches!(
        ArrayView::new(bytes, DType::Float64, &[4], &[8, 8], 0),
        Err(LinalgError::Stride { .. })
    ));
    assert!(ArrayView::from_slice(&data, &[4, 4], Layout::RowMajor).is_err());
}

#[test]
fn set_column_from_leaves_matrix_on_error() {
    let mut m = sample::<f64>();
    let before = m;
    let good = [9.0f64; 4];
    let view = ArrayView::from_slice(&good, &[4], Layout::RowMajor).unwrap();
    assert_eq!(
        m.set_column_from(4, &view),
        Err(LinalgError::Index {
            axis: crate::error::Axis::Column,
            index: 4
        })
    );
    let short = ArrayView::from_slice(&good[..3], &[3], Layout::RowMajor).unwrap();
    assert!(matches!(
        m.set_column_from(1, &short),
        Err(LinalgError::Shape { .. })
    ));
    assert_eq!(m, before);
    m.set_column_from(3, &view).unwrap();
    assert_eq!(m.column(3), Ok(Vector4::splat(9.0)));
}

#[test]
fn try_from_matches_from_view() {
    let data = [2.0f64; 16];
    let view = ArrayView::from_slice(&data, &[4, 4], Layout::ColumnMajor).unwrap();
    let m: Matrix4<f64> = (&view).try_into().unwrap();
    assert_eq!(m, Matrix4::from_column_slice(&data).unwrap());
    let owned = m.export(Layout::RowMajor).into_owned();
    assert_eq!(owned.data(), &data[..]);
}
