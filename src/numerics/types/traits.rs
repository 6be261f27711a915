// src/numerics/types/traits.rs
// Element contract for matrix cells, plus the conjugation hook that lets
// complex element types turn transpose into conjugate transpose.

use core::ops::{Add, AddAssign, Mul, Sub};

use num_complex::Complex;

/// Scalar is the contract a type must satisfy to be used as a matrix cell.
///
/// Note: We require Copy, PartialEq and the basic arithmetic ops on Self.
/// `Send + Sync + 'static` let row workers share borrowed storage across
/// threads and let the per-type parallel default be keyed by `TypeId`.
///
/// Implementations must not panic in the arithmetic ops; the row workers
/// have no error channel back to the caller.
pub trait Scalar:
Copy + PartialEq + Send + Sync + 'static
+ Add<Output = Self>
+ Sub<Output = Self>
+ Mul<Output = Self>
+ AddAssign
{
    /// Additive identity, the start value for trace and dot products.
    fn zero() -> Self;

    /// Multiplicative identity.
    fn one() -> Self;

    /// The value written into the transposed cell. Identity by default;
    /// complex types override it with complex conjugation, which makes
    /// `Matrix::transpose` a conjugate transpose for them. Resolved
    /// statically per element type, never branched on at runtime.
    fn conjugate(self) -> Self {
        self
    }
}

impl Scalar for i32 {
    fn zero() -> Self { 0 }
    fn one() -> Self { 1 }
}

impl Scalar for i64 {
    fn zero() -> Self { 0 }
    fn one() -> Self { 1 }
}

impl Scalar for f32 {
    fn zero() -> Self { 0.0 }
    fn one() -> Self { 1.0 }
}

impl Scalar for f64 {
    fn zero() -> Self { 0.0 }
    fn one() -> Self { 1.0 }
}

impl Scalar for Complex<f32> {
    fn zero() -> Self { Complex::new(0.0, 0.0) }
    fn one() -> Self { Complex::new(1.0, 0.0) }

    fn conjugate(self) -> Self {
        self.conj()
    }
}

impl Scalar for Complex<f64> {
    fn zero() -> Self { Complex::new(0.0, 0.0) }
    fn one() -> Self { Complex::new(1.0, 0.0) }

    fn conjugate(self) -> Self {
        self.conj()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conjugate_is_identity_for_real_types() {
        assert_eq!(3_i32.conjugate(), 3);
        assert_eq!((-2.5_f64).conjugate(), -2.5);
    }

    #[test]
    fn test_conjugate_negates_imaginary_part() {
        let z = Complex::new(3.0_f64, 4.0_f64);
        assert_eq!(z.conjugate(), Complex::new(3.0, -4.0));
    }

    #[test]
    fn test_identities() {
        assert_eq!(i64::zero() + i64::one(), 1);
        assert_eq!(
            Complex::<f32>::zero() + Complex::<f32>::one(),
            Complex::new(1.0, 0.0)
        );
    }
}
