use std::collections::BTreeMap;

use sprs::{CsMat, TriMat};

use super::Matrix;
use crate::error::{FactorError, Result};
use crate::scalar::Scalar;

/// Sparse matrix storing only explicitly set cells.
///
/// Each row keeps an ordered column -> value map. Reading an absent cell
/// returns a shared zero without allocating; writing through [`Matrix::at`]
/// materializes it. [`Matrix::set`] skips zeros that are not already stored, so
/// factorizing into a sparse output only allocates genuine fill-in.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix<S: Scalar> {
    nrows: usize,
    ncols: usize,
    rows: Vec<BTreeMap<usize, S>>,
    zero: S,
}

impl<S: Scalar> SparseMatrix<S> {
    /// Empty square matrix.
    pub fn new(n: usize) -> Self {
        Self::with_shape(n, n)
    }

    pub fn with_shape(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            rows: vec![BTreeMap::new(); nrows],
            zero: S::zero(),
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::new(n);
        for i in 0..n {
            m.rows[i].insert(i, S::one());
        }
        m
    }

    /// Build a square matrix from `(row, col, value)` triplets.
    /// Duplicate entries at the same position are summed.
    pub fn from_triplets(n: usize, triplets: &[(usize, usize, S)]) -> Result<Self> {
        let mut m = Self::new(n);
        for (row, col, value) in triplets {
            if *row >= n || *col >= n {
                return Err(FactorError::Data(format!(
                    "Triplet ({row}, {col}) is out of bounds for a {n}x{n} matrix"
                )));
            }
            let slot = m.at(*row, *col);
            *slot = slot.add(value);
        }
        Ok(m)
    }

    /// Number of stored cells.
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(BTreeMap::len).sum()
    }

    pub fn is_stored(&self, i: usize, j: usize) -> bool {
        self.rows.get(i).is_some_and(|row| row.contains_key(&j))
    }

    /// Iterate over stored cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &S)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(i, row)| row.iter().map(move |(&j, v)| (i, j, v)))
    }

    /// Convert every stored element; absent cells stay absent.
    pub fn map_values<T: Scalar>(&self, mut f: impl FnMut(usize, usize, &S) -> T) -> SparseMatrix<T> {
        let rows = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| row.iter().map(|(&j, v)| (j, f(i, j, v))).collect())
            .collect();
        SparseMatrix {
            nrows: self.nrows,
            ncols: self.ncols,
            rows,
            zero: T::zero(),
        }
    }
}

impl SparseMatrix<f64> {
    /// Copy the stored entries of an `sprs` matrix (CSC or CSR).
    pub fn from_csmat(matrix: &CsMat<f64>) -> Self {
        let mut m = Self::with_shape(matrix.rows(), matrix.cols());
        for (val, (row, col)) in matrix.iter() {
            m.rows[row].insert(col, *val);
        }
        m
    }

    /// Convert to an `sprs` CSC matrix with the same stored entries.
    pub fn to_csmat(&self) -> CsMat<f64> {
        let mut tri = TriMat::new((self.nrows, self.ncols));
        for (i, j, v) in self.iter() {
            tri.add_triplet(i, j, *v);
        }
        tri.to_csc()
    }
}

impl<S: Scalar> Matrix for SparseMatrix<S> {
    type Elem = S;

    fn nrows(&self) -> usize {
        self.nrows
    }

    fn ncols(&self) -> usize {
        self.ncols
    }

    fn const_at(&self, i: usize, j: usize) -> &S {
        debug_assert!(j < self.ncols, "column {j} out of bounds");
        self.rows[i].get(&j).unwrap_or(&self.zero)
    }

    fn at(&mut self, i: usize, j: usize) -> &mut S {
        assert!(
            i < self.nrows && j < self.ncols,
            "index ({i}, {j}) out of bounds for {}x{} matrix",
            self.nrows,
            self.ncols
        );
        self.rows[i].entry(j).or_insert_with(S::zero)
    }

    fn set(&mut self, i: usize, j: usize, value: S) {
        if value == self.zero && !self.is_stored(i, j) {
            return;
        }
        *self.at(i, j) = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_const_at_does_not_materialize() {
        let m = SparseMatrix::<f64>::new(4);
        assert_eq!(*m.const_at(3, 2), 0.0);
        assert_eq!(m.nnz(), 0);
    }

    #[test]
    fn test_at_is_idempotent() {
        let mut m = SparseMatrix::<f64>::new(3);
        *m.at(1, 0) = 2.5;
        assert_eq!(*m.at(1, 0), 2.5);
        *m.at(1, 0) += 1.0;
        assert_eq!(*m.const_at(1, 0), 3.5);
        assert_eq!(m.nnz(), 1);
    }

    #[test]
    fn test_set_skips_absent_zeros() {
        let mut m = SparseMatrix::<f64>::new(3);
        m.set(2, 0, 0.0);
        assert_eq!(m.nnz(), 0);
        m.set(2, 0, 1.0);
        m.set(2, 0, 0.0);
        assert!(m.is_stored(2, 0));
        assert_eq!(*m.const_at(2, 0), 0.0);
    }

    #[test]
    fn test_from_triplets_sums_duplicates() {
        let m = SparseMatrix::from_triplets(2, &[(0, 0, 1.0), (1, 0, 2.0), (0, 0, 3.0)]).unwrap();
        assert_eq!(*m.const_at(0, 0), 4.0);
        assert_eq!(*m.const_at(1, 0), 2.0);
        assert_eq!(m.nnz(), 2);
    }

    #[test]
    fn test_from_triplets_out_of_bounds() {
        let result = SparseMatrix::from_triplets(2, &[(2, 0, 1.0)]);
        assert!(matches!(result, Err(FactorError::Data(_))));
    }

    #[test]
    fn test_csmat_conversion() {
        let mut tri = TriMat::new((3, 3));
        tri.add_triplet(0, 0, 4.0);
        tri.add_triplet(1, 0, 1.0);
        tri.add_triplet(2, 2, 5.0);
        let cs: CsMat<f64> = tri.to_csc();

        let m = SparseMatrix::from_csmat(&cs);
        assert_eq!(m.nnz(), 3);
        assert_eq!(*m.const_at(1, 0), 1.0);
        assert_eq!(*m.const_at(0, 1), 0.0);

        let back = m.to_csmat();
        assert_eq!(back.nnz(), 3);
        assert_eq!(back.get(2, 2).copied(), Some(5.0));
    }

    #[test]
    fn test_iter_row_major() {
        let m = SparseMatrix::from_triplets(3, &[(2, 1, 1.0), (0, 0, 2.0), (2, 0, 3.0)]).unwrap();
        let cells: Vec<(usize, usize, f64)> = m.iter().map(|(i, j, v)| (i, j, *v)).collect();
        assert_eq!(cells, vec![(0, 0, 2.0), (2, 0, 3.0), (2, 1, 1.0)]);
    }
}
