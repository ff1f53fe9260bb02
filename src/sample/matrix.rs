use polars::prelude::*;
use rayon::prelude::*;

use crate::error::Result;
use super::dense::DenseMatrix;
use super::sparse::SparseMatrix;


/// An enumeration of the input representations
/// the adapter accepts.
#[derive(Debug, Clone)]
pub enum Matrix {
    /// Named columns. Every column must be castable to `Float64`
    /// before it reaches an estimator that wants a raw array.
    Frame(DataFrame),
    /// Dense row-major array.
    Dense(DenseMatrix),
    /// CSR sparse matrix.
    Sparse(SparseMatrix),
}


impl Matrix {
    /// Returns the pair of the number of rows and columns.
    pub fn shape(&self) -> (usize, usize) {
        match self {
            Self::Frame(df) => df.shape(),
            Self::Dense(m) => m.shape(),
            Self::Sparse(m) => m.shape(),
        }
    }


    /// Returns the number of rows.
    #[inline(always)]
    pub fn n_rows(&self) -> usize {
        self.shape().0
    }


    /// Returns `true` for the sparse representation.
    #[inline(always)]
    pub fn is_sparse(&self) -> bool {
        matches!(self, Self::Sparse(_))
    }


    /// Returns `true` for the data frame representation.
    #[inline(always)]
    pub fn is_frame(&self) -> bool {
        matches!(self, Self::Frame(_))
    }


    /// Column names for frames, `None` otherwise.
    pub fn column_names(&self) -> Option<Vec<String>> {
        match self {
            Self::Frame(df) => Some(
                df.get_column_names()
                    .into_iter()
                    .map(|name| name.to_string())
                    .collect()
            ),
            _ => None,
        }
    }


    /// Convert into a dense row-major array.
    /// Frame columns are cast to `Float64`; nulls become `NaN`.
    pub fn to_dense(&self) -> Result<DenseMatrix> {
        match self {
            Self::Frame(df) => frame_to_dense(df),
            Self::Dense(m) => Ok(m.clone()),
            Self::Sparse(m) => Ok(m.to_dense()),
        }
    }


    /// Consuming version of [`Matrix::to_dense`].
    pub fn into_dense(self) -> Result<DenseMatrix> {
        match self {
            Self::Dense(m) => Ok(m),
            other => other.to_dense(),
        }
    }


    /// Convert into the CSR representation.
    pub fn to_sparse(&self) -> Result<SparseMatrix> {
        match self {
            Self::Sparse(m) => Ok(m.clone()),
            other => Ok(SparseMatrix::from_dense(&other.to_dense()?)),
        }
    }


    /// Returns a new matrix with `column` appended on the right.
    /// Sparse input stays sparse, everything else becomes dense.
    pub fn append_column(&self, column: &[f64]) -> Result<Self> {
        let appended = match self {
            Self::Sparse(m) => Self::Sparse(m.append_column(column)?),
            Self::Dense(m) => Self::Dense(m.append_column(column)?),
            Self::Frame(_) => Self::Dense(self.to_dense()?.append_column(column)?),
        };
        Ok(appended)
    }


    /// Returns the sub-matrix made of the given rows.
    /// A frame is converted to a dense array first.
    pub fn select_rows(&self, rows: &[usize]) -> Result<Self> {
        let selected = match self {
            Self::Sparse(m) => Self::Sparse(m.select_rows(rows)),
            Self::Dense(m) => Self::Dense(m.select_rows(rows)),
            Self::Frame(_) => Self::Dense(self.to_dense()?.select_rows(rows)),
        };
        Ok(selected)
    }
}


impl From<DataFrame> for Matrix {
    fn from(df: DataFrame) -> Self {
        Self::Frame(df)
    }
}


impl From<DenseMatrix> for Matrix {
    fn from(m: DenseMatrix) -> Self {
        Self::Dense(m)
    }
}


impl From<SparseMatrix> for Matrix {
    fn from(m: SparseMatrix) -> Self {
        Self::Sparse(m)
    }
}


/// Convert a column into a vector of `f64`.
fn column_values(series: &Series) -> Result<Vec<f64>> {
    let series = series.cast(&DataType::Float64)?;
    let values = series.f64()?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect::<Vec<_>>();
    Ok(values)
}


fn frame_to_dense(df: &DataFrame) -> Result<DenseMatrix> {
    let (n_rows, n_cols) = df.shape();
    let columns = df.get_columns()
        .par_iter()
        .map(column_values)
        .collect::<Result<Vec<_>>>()?;

    let mut dense = DenseMatrix::zeros(n_rows, n_cols);
    if n_cols == 0 { return Ok(dense); }
    dense.data.par_chunks_mut(n_cols)
        .enumerate()
        .for_each(|(i, dst)| {
            for (j, column) in columns.iter().enumerate() {
                dst[j] = column[i];
            }
        });
    Ok(dense)
}
