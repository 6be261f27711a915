// src/numerics/mod.rs
// Top-level numerics module. Exposes the shared error type and a `types`
// namespace with the matrix submodules.

pub mod error;

pub mod types {
    // The submodules live in src/numerics/types/*.rs
    pub mod matrix;
    pub mod traits;
}
