use rayon::prelude::*;

use crate::error::{AtcError, Result};

use std::ops::Index;


/// Dense, row-major matrix of `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    pub(crate) n_rows: usize,
    pub(crate) n_cols: usize,
    pub(crate) data: Vec<f64>,
}


impl DenseMatrix {
    /// Construct a matrix from a row-major buffer.
    /// Fails if `data.len() != n_rows * n_cols`.
    pub fn new(n_rows: usize, n_cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != n_rows * n_cols {
            return Err(AtcError::Shape {
                expected: format!("{} values ({n_rows} x {n_cols})", n_rows * n_cols),
                actual: format!("{} values", data.len()),
            });
        }
        Ok(Self { n_rows, n_cols, data })
    }


    /// Construct a matrix from its rows.
    /// Every row must have the same length.
    pub fn from_rows<T>(rows: T) -> Result<Self>
        where T: AsRef<[Vec<f64>]>
    {
        let rows = rows.as_ref();
        let n_rows = rows.len();
        let n_cols = rows.first().map(|row| row.len()).unwrap_or(0);

        if let Some(row) = rows.iter().find(|row| row.len() != n_cols) {
            return Err(AtcError::Shape {
                expected: format!("rows of length {n_cols}"),
                actual: format!("a row of length {}", row.len()),
            });
        }

        let data = rows.iter()
            .flat_map(|row| row.iter().copied())
            .collect::<Vec<_>>();
        Ok(Self { n_rows, n_cols, data })
    }


    /// Construct a `n_rows x n_cols` matrix filled with zeros.
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self { n_rows, n_cols, data: vec![0.0; n_rows * n_cols] }
    }


    /// Returns the pair of the number of rows and columns.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }


    /// Returns the `i`-th row.
    #[inline(always)]
    pub fn row(&self, i: usize) -> &[f64] {
        let start = i * self.n_cols;
        &self.data[start..start + self.n_cols]
    }


    /// Returns an iterator over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.n_rows).map(move |i| self.row(i))
    }


    /// Returns the `j`-th column as an owned vector.
    pub fn column(&self, j: usize) -> Vec<f64> {
        (0..self.n_rows).map(|i| self[(i, j)]).collect()
    }


    /// Returns the row-major buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data[..]
    }


    /// Returns a new matrix with `column` appended on the right.
    pub fn append_column(&self, column: &[f64]) -> Result<Self> {
        if column.len() != self.n_rows {
            return Err(AtcError::Shape {
                expected: format!("a column of length {}", self.n_rows),
                actual: format!("a column of length {}", column.len()),
            });
        }
        let n_cols = self.n_cols + 1;
        let mut data = vec![0.0; self.n_rows * n_cols];
        data.par_chunks_mut(n_cols)
            .zip(column.par_iter())
            .enumerate()
            .for_each(|(i, (dst, &c))| {
                dst[..self.n_cols].copy_from_slice(self.row(i));
                dst[self.n_cols] = c;
            });
        Ok(Self { n_rows: self.n_rows, n_cols, data })
    }


    /// Returns the sub-matrix made of the given rows, in the given order.
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        let data = rows.iter()
            .flat_map(|&i| self.row(i).iter().copied())
            .collect::<Vec<_>>();
        Self { n_rows: rows.len(), n_cols: self.n_cols, data }
    }
}


impl Index<(usize, usize)> for DenseMatrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        &self.data[i * self.n_cols + j]
    }
}
