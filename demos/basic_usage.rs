// demos/basic_usage.rs
// Small tour of the matrix type: construction, arithmetic, transpose and
// the per-type parallel mode. Run with `cargo run --example basic_usage`.

use num_complex::Complex;
use tessella::{ComputeMode, Matrix};

fn main() {
    tracing_subscriber::fmt().init();

    let a = Matrix::from_vec(2, 2, vec![1.0_f64, 2.0, 3.0, 4.0]).unwrap();
    let b = Matrix::from_vec(2, 2, vec![4.0_f64, 3.0, 2.0, 1.0]).unwrap();

    println!("a:\n{}", a);
    println!("b:\n{}", b);
    println!("a + b:\n{}", &a + &b);
    println!("a * b:\n{}", &a * &b);
    println!("trace(a) = {}", a.trace().unwrap());
    println!("transpose(a):\n{}", a.transpose());

    // Explicit scheduling, independent of the process-wide default.
    let parallel_product = a.mul_with_mode(&b, ComputeMode::Parallel).unwrap();
    println!("parallel a * b:\n{}", parallel_product);

    // Process-wide default for f64 matrices; the change is logged.
    Matrix::<f64>::set_parallel(true);
    println!("a + b (parallel default):\n{}", &a + &b);
    Matrix::<f64>::set_parallel(false);

    // Complex matrices transpose with conjugation.
    let z = Matrix::from_vec(
        1,
        2,
        vec![Complex::new(1.0_f64, 2.0), Complex::new(3.0, -4.0)],
    )
    .unwrap();
    println!("z:\n{}", z);
    println!("conjugate transpose of z:\n{}", z.transpose());
}
