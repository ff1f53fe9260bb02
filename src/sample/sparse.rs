use rayon::prelude::*;

use crate::error::{AtcError, Result};
use super::dense::DenseMatrix;


/// Sparse matrix in compressed sparse row (CSR) format.
///
/// The non-zero entries of row `i` are
/// `indices[indptr[i]..indptr[i + 1]]` (column indices)
/// paired with `values[indptr[i]..indptr[i + 1]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix {
    pub(crate) n_rows: usize,
    pub(crate) n_cols: usize,
    pub(crate) indptr: Vec<usize>,
    pub(crate) indices: Vec<usize>,
    pub(crate) values: Vec<f64>,
}


impl SparseMatrix {
    /// Construct a CSR matrix from its raw parts.
    pub fn new(
        n_rows: usize,
        n_cols: usize,
        indptr: Vec<usize>,
        indices: Vec<usize>,
        values: Vec<f64>,
    ) -> Result<Self>
    {
        if indptr.len() != n_rows + 1 {
            return Err(AtcError::Shape {
                expected: format!("indptr of length {}", n_rows + 1),
                actual: format!("indptr of length {}", indptr.len()),
            });
        }
        let nnz = indptr[n_rows];
        if indices.len() != nnz || values.len() != nnz {
            return Err(AtcError::Shape {
                expected: format!("{nnz} stored entries"),
                actual: format!(
                    "{} indices and {} values", indices.len(), values.len()
                ),
            });
        }
        if indptr.windows(2).any(|w| w[0] > w[1]) {
            return Err(AtcError::invalid_input("indptr must be non-decreasing"));
        }
        if let Some(&j) = indices.iter().find(|&&j| j >= n_cols) {
            return Err(AtcError::invalid_input(format!(
                "column index {j} is out of range for {n_cols} columns"
            )));
        }
        Ok(Self { n_rows, n_cols, indptr, indices, values })
    }


    /// Construct a CSR matrix from `(row, column, value)` triplets.
    /// Zero values are not stored.
    pub fn from_triplets<T>(n_rows: usize, n_cols: usize, triplets: T)
        -> Result<Self>
        where T: IntoIterator<Item = (usize, usize, f64)>
    {
        let mut rows = vec![Vec::new(); n_rows];
        for (i, j, v) in triplets {
            if i >= n_rows || j >= n_cols {
                return Err(AtcError::invalid_input(format!(
                    "entry ({i}, {j}) is out of range for a \
                     {n_rows} x {n_cols} matrix"
                )));
            }
            if v != 0.0 { rows[i].push((j, v)); }
        }

        let mut indptr = Vec::with_capacity(n_rows + 1);
        let mut indices = Vec::new();
        let mut values = Vec::new();
        indptr.push(0);
        for mut row in rows {
            row.sort_by_key(|&(j, _)| j);
            for (j, v) in row {
                indices.push(j);
                values.push(v);
            }
            indptr.push(indices.len());
        }
        Ok(Self { n_rows, n_cols, indptr, indices, values })
    }


    /// Convert a dense matrix, keeping its non-zero entries.
    pub fn from_dense(dense: &DenseMatrix) -> Self {
        let mut indptr = Vec::with_capacity(dense.n_rows + 1);
        let mut indices = Vec::new();
        let mut values = Vec::new();
        indptr.push(0);
        for i in 0..dense.n_rows {
            for (j, &v) in dense.row(i).iter().enumerate() {
                if v != 0.0 {
                    indices.push(j);
                    values.push(v);
                }
            }
            indptr.push(indices.len());
        }
        Self {
            n_rows: dense.n_rows,
            n_cols: dense.n_cols,
            indptr,
            indices,
            values,
        }
    }


    /// Returns the pair of the number of rows and columns.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }


    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }


    /// Returns an iterator over the stored `(column, value)` pairs of row `i`.
    pub fn row(&self, i: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let range = self.indptr[i]..self.indptr[i + 1];
        self.indices[range.clone()].iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }


    /// Returns the value at `(i, j)`, `0.0` if it is not stored.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.row(i)
            .find(|&(col, _)| col == j)
            .map(|(_, v)| v)
            .unwrap_or(0.0)
    }


    /// Densify.
    pub fn to_dense(&self) -> DenseMatrix {
        let mut dense = DenseMatrix::zeros(self.n_rows, self.n_cols);
        if self.n_cols == 0 { return dense; }
        dense.data.par_chunks_mut(self.n_cols)
            .enumerate()
            .for_each(|(i, dst)| {
                self.row(i).for_each(|(j, v)| { dst[j] = v; });
            });
        dense
    }


    /// Returns a new matrix with `column` stacked on the right.
    /// Zero entries of `column` are not stored.
    pub fn append_column(&self, column: &[f64]) -> Result<Self> {
        if column.len() != self.n_rows {
            return Err(AtcError::Shape {
                expected: format!("a column of length {}", self.n_rows),
                actual: format!("a column of length {}", column.len()),
            });
        }
        let n_new = column.iter().filter(|&&c| c != 0.0).count();
        let mut indptr = Vec::with_capacity(self.n_rows + 1);
        let mut indices = Vec::with_capacity(self.nnz() + n_new);
        let mut values = Vec::with_capacity(self.nnz() + n_new);
        indptr.push(0);
        for (i, &c) in column.iter().enumerate() {
            for (j, v) in self.row(i) {
                indices.push(j);
                values.push(v);
            }
            if c != 0.0 {
                indices.push(self.n_cols);
                values.push(c);
            }
            indptr.push(indices.len());
        }
        Ok(Self {
            n_rows: self.n_rows,
            n_cols: self.n_cols + 1,
            indptr,
            indices,
            values,
        })
    }


    /// Returns the sub-matrix made of the given rows, in the given order.
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        let mut indptr = Vec::with_capacity(rows.len() + 1);
        let mut indices = Vec::new();
        let mut values = Vec::new();
        indptr.push(0);
        for &i in rows {
            for (j, v) in self.row(i) {
                indices.push(j);
                values.push(v);
            }
            indptr.push(indices.len());
        }
        Self { n_rows: rows.len(), n_cols: self.n_cols, indptr, indices, values }
    }
}
