// tests/integration_tests.rs
//! End-to-end scenarios exercising the public matrix surface.

use num_complex::Complex;
use tessella::{ComputeMode, Matrix, MatrixError};

#[test]
fn test_arithmetic_workflow() {
    let a = Matrix::from_vec(2, 2, vec![1.0_f64, 2.0, 3.0, 4.0]).unwrap();
    let b = Matrix::from_vec(2, 2, vec![0.5_f64, 0.5, 0.5, 0.5]).unwrap();

    let sum = &a + &b;
    assert_eq!(sum.get(1, 1).unwrap(), 1.5);

    let back = &sum - &b;
    assert_eq!(back, a);

    let product = &a * &b;
    assert_eq!(product.as_slice(), &[1.5, 1.5, 3.5, 3.5]);

    assert_eq!(a.trace().unwrap(), 5.0);
    assert_eq!(a.transpose().as_slice(), &[1.0, 3.0, 2.0, 4.0]);
}

#[test]
fn test_mode_toggle_keeps_multiply_deterministic() {
    // 100x100 inputs multiplied repeatedly while the per-type default is
    // toggled on and off must yield the same result matrix every time.
    let cells: Vec<f64> = (0..100 * 100).map(|v| (v % 17) as f64 * 0.25).collect();
    let a = Matrix::from_vec(100, 100, cells.clone()).unwrap();
    let b = Matrix::from_vec(100, 100, cells.into_iter().rev().collect()).unwrap();

    let reference = a.mul_with_mode(&b, ComputeMode::Sequential).unwrap();
    for _ in 0..3 {
        Matrix::<f64>::set_parallel(true);
        assert_eq!(a.checked_mul(&b).unwrap(), reference);
        Matrix::<f64>::set_parallel(false);
        assert_eq!(a.checked_mul(&b).unwrap(), reference);
    }
}

#[test]
fn test_parallel_add_matches_sequential_on_large_input() {
    let cells: Vec<i32> = (0..64 * 48).collect();
    let a = Matrix::from_vec(64, 48, cells.clone()).unwrap();
    let b = Matrix::from_vec(64, 48, cells.into_iter().map(|v| v * 3).collect()).unwrap();

    let sequential = a.add_with_mode(&b, ComputeMode::Sequential).unwrap();
    let parallel = a.add_with_mode(&b, ComputeMode::Parallel).unwrap();
    assert_eq!(sequential, parallel);
}

#[test]
fn test_dimension_errors_surface_to_the_caller() {
    let a = Matrix::from_vec(2, 2, vec![1, 1, 1, 1]).unwrap();
    let b = Matrix::from_vec(1, 2, vec![1, 1]).unwrap();

    match a.checked_add(&b) {
        Err(MatrixError::DimensionMismatch {
            op,
            left_rows,
            right_rows,
            ..
        }) => {
            assert_eq!(op, "addition");
            assert_eq!(left_rows, 2);
            assert_eq!(right_rows, 1);
        }
        other => panic!("expected a dimension mismatch, got {:?}", other),
    }

    assert!(Matrix::<i32>::from_vec(2, 3, vec![0; 5]).is_err());
}

#[test]
fn test_conjugate_transpose_round_trip() {
    let m = Matrix::from_vec(
        2,
        2,
        vec![
            Complex::new(1.0_f32, 1.0),
            Complex::new(0.0, -2.0),
            Complex::new(3.0, 0.5),
            Complex::new(-1.0, 4.0),
        ],
    )
    .unwrap();

    let adjoint = m.transpose();
    assert_eq!(adjoint.get(1, 2).unwrap(), Complex::new(3.0, -0.5));
    assert_eq!(adjoint.transpose(), m);
}

#[test]
fn test_printed_representation() {
    let m = Matrix::from_vec(2, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
    assert_eq!(m.to_string(), "1\t2\t3\t\n4\t5\t6\t\n");
}

#[test]
fn test_serialized_matrix_survives_a_round_trip() {
    let m = Matrix::from_vec(3, 2, vec![1_i32, -2, 3, -4, 5, -6]).unwrap();
    let bytes = bincode::serialize(&m).unwrap();
    let back: Matrix<i32> = bincode::deserialize(&bytes).unwrap();
    assert_eq!(m, back);
}
