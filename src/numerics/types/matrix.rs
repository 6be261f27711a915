// src/numerics/types/matrix.rs
// Generic dense row-major matrix with opt-in row-parallel add/multiply.
// Cell access is 1-based at the API surface; storage is a flat 0-based
// vector with the translation centralized in `offset`.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::ops::{Add, Index, IndexMut, Mul, Sub};
use std::sync::{OnceLock, PoisonError, RwLock};
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::numerics::error::MatrixError;

use super::traits::Scalar;

/// How an add or multiply call schedules its row computations.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ComputeMode {
    /// One loop over the rows on the calling thread.
    Sequential,
    /// Fork-join: the output rows are split into contiguous bands, one
    /// scoped worker thread per band, all joined before the call returns.
    Parallel,
}

// Process-wide parallel defaults, one flag per concrete element type.
// Absent entries mean sequential.
static PARALLEL_DEFAULTS: OnceLock<RwLock<HashMap<TypeId, bool>>> = OnceLock::new();

fn parallel_defaults() -> &'static RwLock<HashMap<TypeId, bool>> {
    PARALLEL_DEFAULTS.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Dense two-dimensional matrix over a generic element type.
///
/// Invariants held at all times:
/// - the backing vector holds exactly `rows * cols` cells, row-major;
/// - `rows` and `cols` are both zero or both nonzero;
/// - the default value is a 1x1 matrix holding `T::zero()`, never an
///   empty, dimensionless one.
///
/// `Clone` deep-copies the storage; moves are ordinary Rust moves. Every
/// arithmetic operation yields a fresh, independently owned matrix.
#[derive(Clone, Debug)]
pub struct Matrix<T: Scalar = f32> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

impl<T: Scalar> Default for Matrix<T> {
    fn default() -> Self {
        Self {
            rows: 1,
            cols: 1,
            cells: vec![T::zero()],
        }
    }
}

impl<T: Scalar> Matrix<T> {
    /// Construct a zero-filled matrix of the given shape.
    ///
    /// Fails with `BadShape` when exactly one dimension is zero and with
    /// `AllocationFailed` when the backing storage cannot be reserved.
    pub fn with_dimensions(rows: usize, cols: usize) -> Result<Self, MatrixError> {
        let len = rows
            .checked_mul(cols)
            .ok_or(MatrixError::BadShape { rows, cols, len: 0 })?;
        Self::check_shape(rows, cols, len)?;
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|_| MatrixError::AllocationFailed { cells: len })?;
        cells.resize(len, T::zero());
        Ok(Self { rows, cols, cells })
    }

    /// Zero matrix of the given shape.
    pub fn zero(rows: usize, cols: usize) -> Result<Self, MatrixError> {
        Self::with_dimensions(rows, cols)
    }

    /// Construct a matrix of the given shape from row-major cells.
    ///
    /// Fails with `BadShape` when `cells.len() != rows * cols` or exactly
    /// one dimension is zero.
    pub fn from_vec(rows: usize, cols: usize, cells: Vec<T>) -> Result<Self, MatrixError> {
        Self::check_shape(rows, cols, cells.len())?;
        Ok(Self { rows, cols, cells })
    }

    /// Identity matrix of order `n`.
    pub fn identity(n: usize) -> Result<Self, MatrixError> {
        let mut id = Self::with_dimensions(n, n)?;
        for i in 1..=n {
            id.set(i, i, T::one())?;
        }
        Ok(id)
    }

    // A matrix is either fully empty or fully dimensioned, and the cell
    // count always matches the shape. The product is checked so an
    // overflowing shape fails instead of wrapping in release builds.
    fn check_shape(rows: usize, cols: usize, len: usize) -> Result<(), MatrixError> {
        if rows.checked_mul(cols) != Some(len) || ((rows == 0) ^ (cols == 0)) {
            return Err(MatrixError::BadShape { rows, cols, len });
        }
        Ok(())
    }

    /// Row dimension.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Column dimension.
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    // Single translation point from 1-based cell coordinates to the flat
    // row-major offset, shared by every read and write path.
    fn offset(&self, row: usize, col: usize) -> Result<usize, MatrixError> {
        if row == 0 || col == 0 || row > self.rows || col > self.cols {
            return Err(MatrixError::OutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok((row - 1) * self.cols + (col - 1))
    }

    /// Read the cell at the 1-based position `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Result<T, MatrixError> {
        Ok(self.cells[self.offset(row, col)?])
    }

    /// Write the cell at the 1-based position `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<(), MatrixError> {
        let at = self.offset(row, col)?;
        self.cells[at] = value;
        Ok(())
    }

    /// Borrow one row (1-based) of the backing storage. This is the same
    /// view the parallel workers are handed, one disjoint row at a time.
    pub fn row_slice(&self, row: usize) -> Result<&[T], MatrixError> {
        let start = self.offset(row, 1)?;
        Ok(&self.cells[start..start + self.cols])
    }

    /// All cells in row-major storage order.
    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    /// Read-only iterator over the cells in row-major storage order.
    pub fn iter(&self) -> Cells<'_, T> {
        Cells {
            inner: self.cells.iter(),
        }
    }

    /// Whole-value swap with another matrix.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// Set the process-wide parallel default for this element type.
    ///
    /// The flag is only consulted by add/multiply calls started after the
    /// change; in-flight operations are unaffected. A notification is
    /// emitted only when the value actually changes.
    pub fn set_parallel(enabled: bool) {
        let mut defaults = parallel_defaults()
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let current = defaults.entry(TypeId::of::<T>()).or_insert(false);
        if *current != enabled {
            *current = enabled;
            info!(
                "generic matrix mode changed to {} mode",
                if enabled { "parallel" } else { "non-parallel" }
            );
        }
    }

    /// Read the process-wide parallel default for this element type.
    pub fn parallel_enabled() -> bool {
        parallel_defaults()
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&TypeId::of::<T>())
            .copied()
            .unwrap_or(false)
    }

    fn default_mode() -> ComputeMode {
        if Self::parallel_enabled() {
            ComputeMode::Parallel
        } else {
            ComputeMode::Sequential
        }
    }

    /// Cell-wise sum, scheduled by the per-type parallel default.
    pub fn checked_add(&self, right: &Self) -> Result<Self, MatrixError> {
        self.add_with_mode(right, Self::default_mode())
    }

    /// Cell-wise sum with an explicit schedule.
    ///
    /// Both operands must have the same shape. The result is identical in
    /// either mode; only the scheduling differs.
    pub fn add_with_mode(&self, right: &Self, mode: ComputeMode) -> Result<Self, MatrixError> {
        if self.rows != right.rows || self.cols != right.cols {
            return Err(MatrixError::DimensionMismatch {
                op: "addition",
                left_rows: self.rows,
                left_cols: self.cols,
                right_rows: right.rows,
                right_cols: right.cols,
            });
        }
        let mut sum = Self::with_dimensions(self.rows, self.cols)?;
        let cols = self.cols;
        match mode {
            ComputeMode::Sequential => {
                for row in 0..self.rows {
                    let start = row * cols;
                    add_rows(
                        &mut sum.cells[start..start + cols],
                        &self.cells[start..start + cols],
                        &right.cells[start..start + cols],
                    );
                }
            }
            ComputeMode::Parallel => {
                fork_join_rows(&mut sum.cells, self.rows, cols, |row, out_row| {
                    let start = row * cols;
                    add_rows(
                        out_row,
                        &self.cells[start..start + cols],
                        &right.cells[start..start + cols],
                    );
                });
            }
        }
        Ok(sum)
    }

    /// Cell-wise difference. Always sequential.
    pub fn checked_sub(&self, right: &Self) -> Result<Self, MatrixError> {
        if self.rows != right.rows || self.cols != right.cols {
            return Err(MatrixError::DimensionMismatch {
                op: "subtraction",
                left_rows: self.rows,
                left_cols: self.cols,
                right_rows: right.rows,
                right_cols: right.cols,
            });
        }
        let mut difference = Self::with_dimensions(self.rows, self.cols)?;
        for ((out, a), b) in difference
            .cells
            .iter_mut()
            .zip(&self.cells)
            .zip(&right.cells)
        {
            *out = *a - *b;
        }
        Ok(difference)
    }

    /// Matrix product, scheduled by the per-type parallel default.
    pub fn checked_mul(&self, right: &Self) -> Result<Self, MatrixError> {
        self.mul_with_mode(right, Self::default_mode())
    }

    /// Matrix product with an explicit schedule.
    ///
    /// Requires `self.cols == right.rows`; the result is
    /// `self.rows x right.cols`. The computation unit is one output row,
    /// so workers read both operands but each writes only its own rows.
    pub fn mul_with_mode(&self, right: &Self, mode: ComputeMode) -> Result<Self, MatrixError> {
        if self.cols != right.rows {
            return Err(MatrixError::DimensionMismatch {
                op: "multiplication",
                left_rows: self.rows,
                left_cols: self.cols,
                right_rows: right.rows,
                right_cols: right.cols,
            });
        }
        let mut product = Self::with_dimensions(self.rows, right.cols)?;
        let inner = self.cols;
        let out_cols = right.cols;
        match mode {
            ComputeMode::Sequential => {
                for row in 0..self.rows {
                    let start = row * out_cols;
                    multiply_row(
                        &mut product.cells[start..start + out_cols],
                        &self.cells[row * inner..(row + 1) * inner],
                        &right.cells,
                        out_cols,
                    );
                }
            }
            ComputeMode::Parallel => {
                fork_join_rows(&mut product.cells, self.rows, out_cols, |row, out_row| {
                    multiply_row(
                        out_row,
                        &self.cells[row * inner..(row + 1) * inner],
                        &right.cells,
                        out_cols,
                    );
                });
            }
        }
        Ok(product)
    }

    /// Sum of the main diagonal. Fails with `NotSquare` on a non-square
    /// matrix.
    pub fn trace(&self) -> Result<T, MatrixError> {
        if !self.is_square() {
            return Err(MatrixError::NotSquare {
                rows: self.rows,
                cols: self.cols,
            });
        }
        let mut sum = T::zero();
        for i in 0..self.rows {
            sum += self.cells[i * self.cols + i];
        }
        Ok(sum)
    }

    /// Transpose. Always sequential.
    ///
    /// The [`Scalar::conjugate`] hook is applied to every cell, so complex
    /// matrices come back conjugate-transposed while real ones are plainly
    /// transposed. The substitution is resolved per element type at
    /// compile time.
    pub fn transpose(&self) -> Self {
        let mut cells = Vec::with_capacity(self.cells.len());
        for col in 0..self.cols {
            for row in 0..self.rows {
                cells.push(self.cells[row * self.cols + col].conjugate());
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            cells,
        }
    }
}

/// Adds two row slices cell by cell into the output row.
fn add_rows<T: Scalar>(out: &mut [T], left: &[T], right: &[T]) {
    for j in 0..out.len() {
        out[j] = left[j] + right[j];
    }
}

/// Dot product of a left-matrix row with a right-matrix column, walking the
/// column at a stride of the right matrix's width.
fn dot_product<T: Scalar>(row: &[T], column: &[T], stride: usize) -> T {
    let mut sum = T::zero();
    for (k, cell) in row.iter().enumerate() {
        sum += *cell * column[k * stride];
    }
    sum
}

/// Computes one output row of a matrix product.
fn multiply_row<T: Scalar>(out: &mut [T], left_row: &[T], right: &[T], right_cols: usize) {
    for (j, cell) in out.iter_mut().enumerate() {
        *cell = dot_product(left_row, &right[j..], right_cols);
    }
}

/// Splits the output storage into contiguous row bands and runs one scoped
/// worker thread per band, capped at the CPU count. Bands are disjoint, so
/// the workers need no synchronization; the scope joins every worker before
/// this returns, and a worker panic is resumed here after the join.
fn fork_join_rows<T, F>(out: &mut [T], rows: usize, cols: usize, per_row: F)
where
    T: Scalar,
    F: Fn(usize, &mut [T]) + Send + Sync,
{
    if out.is_empty() {
        return;
    }
    let workers = rows.min(num_cpus::get()).max(1);
    let rows_per_band = rows.div_ceil(workers);
    debug!(rows, workers, "scheduling row-parallel computation");
    thread::scope(|scope| {
        for (band, out_band) in out.chunks_mut(rows_per_band * cols).enumerate() {
            let per_row = &per_row;
            scope.spawn(move || {
                for (i, out_row) in out_band.chunks_mut(cols).enumerate() {
                    per_row(band * rows_per_band + i, out_row);
                }
            });
        }
    });
}

impl<T: Scalar> PartialEq for Matrix<T> {
    /// Shape mismatch compares unequal; it is never an error.
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows && self.cols == other.cols && self.cells == other.cells
    }
}

impl<T: Scalar> Add for &Matrix<T> {
    type Output = Matrix<T>;

    /// Operator form of [`Matrix::checked_add`].
    ///
    /// # Panics
    /// Panics on a shape mismatch; use the checked form to handle the error.
    fn add(self, right: Self) -> Matrix<T> {
        match self.checked_add(right) {
            Ok(sum) => sum,
            Err(error) => panic!("{error}"),
        }
    }
}

impl<T: Scalar> Sub for &Matrix<T> {
    type Output = Matrix<T>;

    /// Operator form of [`Matrix::checked_sub`].
    ///
    /// # Panics
    /// Panics on a shape mismatch; use the checked form to handle the error.
    fn sub(self, right: Self) -> Matrix<T> {
        match self.checked_sub(right) {
            Ok(difference) => difference,
            Err(error) => panic!("{error}"),
        }
    }
}

impl<T: Scalar> Mul for &Matrix<T> {
    type Output = Matrix<T>;

    /// Operator form of [`Matrix::checked_mul`].
    ///
    /// # Panics
    /// Panics when `self.cols != right.rows`; use the checked form to
    /// handle the error.
    fn mul(self, right: Self) -> Matrix<T> {
        match self.checked_mul(right) {
            Ok(product) => product,
            Err(error) => panic!("{error}"),
        }
    }
}

impl<T: Scalar> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    /// 1-based cell read.
    ///
    /// # Panics
    /// Panics when the position is out of bounds; use [`Matrix::get`] for
    /// the checked form.
    fn index(&self, (row, col): (usize, usize)) -> &T {
        match self.offset(row, col) {
            Ok(at) => &self.cells[at],
            Err(error) => panic!("{error}"),
        }
    }
}

impl<T: Scalar> IndexMut<(usize, usize)> for Matrix<T> {
    /// 1-based cell write.
    ///
    /// # Panics
    /// Panics when the position is out of bounds; use [`Matrix::set`] for
    /// the checked form.
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        match self.offset(row, col) {
            Ok(at) => &mut self.cells[at],
            Err(error) => panic!("{error}"),
        }
    }
}

impl<T: Scalar + fmt::Display> fmt::Display for Matrix<T> {
    /// Rows separated by line breaks, each cell followed by a tab.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            for col in 0..self.cols {
                write!(f, "{}\t", self.cells[row * self.cols + col])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Read-only iterator over a matrix's cells in row-major storage order.
///
/// Restartable (call [`Matrix::iter`] again), walkable from both ends, and
/// comparable: two iterators over the same matrix are equal when they stand
/// at the same position, and two exhausted ones always compare equal.
#[derive(Clone, Debug)]
pub struct Cells<'a, T> {
    inner: std::slice::Iter<'a, T>,
}

impl<'a, T> Cells<'a, T> {
    /// Remaining cells as a slice, for random-offset reads.
    pub fn as_slice(&self) -> &'a [T] {
        self.inner.as_slice()
    }
}

impl<'a, T> Iterator for Cells<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Cells<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for Cells<'_, T> {}

impl<T> PartialEq for Cells<'_, T> {
    /// Equal when both stand at the same position. Any two exhausted
    /// iterators compare equal, no matter which end they were drained
    /// from.
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (self.inner.as_slice(), other.inner.as_slice());
        (a.is_empty() && b.is_empty()) || (a.as_ptr() == b.as_ptr() && a.len() == b.len())
    }
}

impl<'a, T: Scalar> IntoIterator for &'a Matrix<T> {
    type Item = &'a T;
    type IntoIter = Cells<'a, T>;

    fn into_iter(self) -> Cells<'a, T> {
        self.iter()
    }
}

// Serde encodes a matrix as the tuple (rows, cols, cells) and routes
// decoding through `from_vec`, so a decoded payload can never violate the
// shape invariants.
impl<T> Serialize for Matrix<T>
where
    T: Scalar + Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        (self.rows, self.cols, &self.cells).serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Matrix<T>
where
    T: Scalar + Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let (rows, cols, cells) = <(usize, usize, Vec<T>)>::deserialize(deserializer)?;
        Matrix::from_vec(rows, cols, cells).map_err(serde::de::Error::custom)
    }
}
