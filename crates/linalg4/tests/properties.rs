use linalg4::prelude::*;
use proptest::prelude::*;

fn integral_matrix() -> impl Strategy<Value = Matrix4<f64>> {
    prop::array::uniform16(-64i32..64).prop_map(|vals| {
        Matrix4::from_column_slice(&vals.map(f64::from)).unwrap()
    })
}

fn real_matrix() -> impl Strategy<Value = Matrix4<f64>> {
    prop::array::uniform16(-1.0e3f64..1.0e3)
        .prop_map(|vals| Matrix4::from_column_slice(&vals).unwrap())
}

fn integral_vector() -> impl Strategy<Value = Vector4<f64>> {
    prop::array::uniform4(-64i32..64).prop_map(|vals| Vector4::from_array(vals.map(f64::from)))
}

// Column snapshots and entry access read the same storage.
proptest! {
    #[test]
    fn prop_column_entry_consistency(m in real_matrix()) {
        for c in 0..4isize {
            let col = m.column(c).unwrap();
            for r in 0..4isize {
                prop_assert_eq!(m.get(r, c).unwrap(), col.get(r).unwrap());
            }
        }
    }
}

// Export then import reproduces the matrix bit for bit.
proptest! {
    #[test]
    fn prop_bridge_round_trip(m in real_matrix(), row_major in any::<bool>()) {
        let layout = if row_major { Layout::RowMajor } else { Layout::ColumnMajor };
        let out = m.export(layout);
        let back = Matrix4::<f64>::from_view(&out.view().unwrap()).unwrap();
        prop_assert_eq!(back, m);

        let single: Matrix4<f32> = m.cast();
        let out = single.export(layout);
        let back = Matrix4::<f32>::from_view(&out.view().unwrap()).unwrap();
        prop_assert_eq!(back, single);
    }
}

proptest! {
    #[test]
    fn prop_add_sub_inverse_exact_on_integers(a in integral_matrix(), b in integral_matrix()) {
        prop_assert_eq!((a + b) - b, a);
        prop_assert_eq!(a.add(b).sub(b), a);
    }
}

proptest! {
    #[test]
    fn prop_add_sub_inverse_within_rounding(a in real_matrix(), b in real_matrix()) {
        prop_assert!(((a + b) - b).approx_eq(&a, 1e-9));
    }
}

proptest! {
    #[test]
    fn prop_scalar_product_commutes(m in real_matrix(), k in -1.0e3f64..1.0e3) {
        prop_assert_eq!(m * k, k * m);
        let f: Matrix4<f32> = m.cast();
        let kf = k as f32;
        prop_assert_eq!(f * kf, kf * f);
    }
}

proptest! {
    #[test]
    fn prop_matmul_associative_and_distributive(
        a in integral_matrix(),
        b in integral_matrix(),
        c in integral_matrix()
    ) {
        prop_assert_eq!((a * b) * c, a * (b * c));
        prop_assert_eq!(a * (b + c), a * b + a * c);

        let (af, bf, cf) = (a.cast::<f32>(), b.cast::<f32>(), c.cast::<f32>());
        prop_assert_eq!((af * bf) * cf, af * (bf * cf));
    }
}

proptest! {
    #[test]
    fn prop_matvec_agrees_with_matmul_column(m in integral_matrix(), v in integral_vector()) {
        let as_matrix = Matrix4::from_columns(v, v, v, v);
        let product = m * as_matrix;
        prop_assert_eq!(product.column(2).unwrap(), m * v);
    }
}

proptest! {
    #[test]
    fn prop_single_entry_perturbation_breaks_equality(
        m in real_matrix(),
        r in 0..4isize,
        c in 0..4isize
    ) {
        let mut n = m;
        prop_assert!(m.equals(&n) && n.equals(&m));
        let old = n.get(r, c).unwrap();
        n.set(r, c, old + 1.0).unwrap();
        prop_assert!(m != n);
        prop_assert!(!n.equals(&m));
    }
}

proptest! {
    #[test]
    fn prop_display_parses_back(m in real_matrix()) {
        let parsed: Matrix4<f64> = m.to_string().parse().unwrap();
        prop_assert_eq!(parsed, m);
    }
}
