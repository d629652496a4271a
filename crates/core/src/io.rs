//! Reading symmetric matrices from CSV.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::{FactorError, Result};
use crate::matrix::{DenseMatrix, SparseMatrix};

/// Relative asymmetry above which a dense input triggers a warning.
const SYMMETRY_TOLERANCE: f64 = 1e-8;

/// Read a dense square matrix from a headerless CSV file, one matrix row per line.
///
/// Only the lower triangle is used by the factorizations; a noticeably
/// asymmetric input is accepted but logged.
///
/// # Errors
/// `Io`/`Csv` for unreadable files, `Data` for non-numeric fields or a
/// non-square layout.
pub fn read_dense_csv<P: AsRef<Path>>(path: P) -> Result<DenseMatrix<f64>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let matrix = read_dense(file)?;
    log::debug!(
        "read {}x{} dense matrix from '{}'",
        matrix.as_dmatrix().nrows(),
        matrix.as_dmatrix().ncols(),
        path.display()
    );
    Ok(matrix)
}

/// [`read_dense_csv`] from any reader.
pub fn read_dense<R: Read>(reader: R) -> Result<DenseMatrix<f64>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut values = Vec::new();
    let mut nrows = 0;
    for result in reader.records() {
        let record = result?;
        for field in record.iter() {
            let value: f64 = field.parse().map_err(|_| {
                FactorError::Data(format!("Row {}: '{}' is not a number", nrows + 1, field))
            })?;
            values.push(value);
        }
        nrows += 1;
    }

    if values.len() != nrows * nrows {
        return Err(FactorError::Data(format!(
            "Expected a square matrix, got {} rows and {} values",
            nrows,
            values.len()
        )));
    }

    let matrix = DenseMatrix::from_row_slice(nrows, &values);
    warn_if_asymmetric(&values, nrows);
    Ok(matrix)
}

fn warn_if_asymmetric(values: &[f64], n: usize) {
    let mut worst = 0.0_f64;
    for i in 0..n {
        for j in 0..i {
            let (lower, upper) = (values[i * n + j], values[j * n + i]);
            let scale = lower.abs().max(upper.abs()).max(1.0);
            worst = worst.max((lower - upper).abs() / scale);
        }
    }
    if worst > SYMMETRY_TOLERANCE {
        log::warn!(
            "input matrix is not symmetric (max relative difference {worst:.3e}); \
             only the lower triangle will be used"
        );
    }
}

#[derive(Debug, Deserialize)]
struct TripletRecord {
    row: usize,
    col: usize,
    value: f64,
}

/// Read a sparse symmetric matrix from a CSV file with header `row,col,value`.
///
/// The dimension is one more than the largest index and may not exceed the
/// number of distinct entries. Entries above the diagonal are transposed into
/// the lower triangle; an entry given in both triangles must agree.
pub fn read_triplets_csv<P: AsRef<Path>>(path: P) -> Result<SparseMatrix<f64>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let matrix = read_triplets(file)?;
    log::debug!(
        "read {n}x{n} sparse matrix with {} stored entries from '{}'",
        matrix.nnz(),
        path.display(),
        n = crate::matrix::Matrix::nrows(&matrix)
    );
    Ok(matrix)
}

/// [`read_triplets_csv`] from any reader.
pub fn read_triplets<R: Read>(reader: R) -> Result<SparseMatrix<f64>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut entries: BTreeMap<(usize, usize), f64> = BTreeMap::new();
    let mut n = 0;
    for result in reader.deserialize() {
        let record: TripletRecord = result?;
        let (row, col) = if record.row >= record.col {
            (record.row, record.col)
        } else {
            (record.col, record.row)
        };
        let size = row.checked_add(1).ok_or_else(|| {
            FactorError::Data(format!("Index {row} is out of range"))
        })?;
        n = n.max(size);
        if let Some(previous) = entries.insert((row, col), record.value) {
            if previous != record.value {
                return Err(FactorError::Data(format!(
                    "Entries ({row}, {col}) and ({col}, {row}) disagree: {previous} vs {}",
                    record.value
                )));
            }
        }
    }

    // Each row needs at least its diagonal entry, so the dimension can never
    // exceed the number of entries given.
    if n > entries.len() {
        return Err(FactorError::Data(format!(
            "Largest index implies a {n}x{n} matrix but only {} entries were given; \
             list every diagonal entry, zeros included",
            entries.len()
        )));
    }

    let triplets: Vec<(usize, usize, f64)> =
        entries.into_iter().map(|((i, j), v)| (i, j, v)).collect();
    SparseMatrix::from_triplets(n, &triplets)
}
