pub mod numerics;

pub use numerics::error::MatrixError;
pub use numerics::types::matrix::{Cells, ComputeMode, Matrix};
pub use numerics::types::traits::Scalar;
