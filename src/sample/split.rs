use rand::prelude::*;

use crate::error::{AtcError, Result};
use super::matrix::Matrix;


/// A training/held-out pair produced by [`train_test_split`].
#[derive(Debug, Clone)]
pub struct Split {
    /// Training rows.
    pub x_train: Matrix,
    /// Training targets.
    pub y_train: Vec<f64>,
    /// Held-out rows.
    pub x_test: Matrix,
    /// Held-out targets.
    pub y_test: Vec<f64>,
}


/// Shuffle the rows and split off `test_size` of them.
///
/// The number of held-out rows is `ceil(test_size * n_rows)`.
/// Both parts must be non-empty.
/// Frames are converted to dense arrays by the row selection.
pub fn train_test_split(
    x: &Matrix,
    y: &[f64],
    test_size: f64,
    seed: Option<u64>,
) -> Result<Split>
{
    assert!(
        0f64 < test_size && test_size < 1f64,
        "Test size should be in `(0, 1)`."
    );
    let n_rows = x.n_rows();
    if n_rows != y.len() {
        return Err(AtcError::Shape {
            expected: format!("{} rows", y.len()),
            actual: format!("{n_rows} rows"),
        });
    }

    let n_test = (test_size * n_rows as f64).ceil() as usize;
    let n_train = n_rows.saturating_sub(n_test);
    if n_train == 0 || n_test == 0 {
        return Err(AtcError::invalid_input(format!(
            "Cannot split {n_rows} rows into non-empty \
             training and held-out parts"
        )));
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut ix = (0..n_rows).collect::<Vec<_>>();
    ix.shuffle(&mut rng);

    let (test_ix, train_ix) = ix.split_at(n_test);

    let x_train = x.select_rows(train_ix)?;
    let x_test = x.select_rows(test_ix)?;
    let y_train = train_ix.iter().map(|&i| y[i]).collect();
    let y_test = test_ix.iter().map(|&i| y[i]).collect();

    Ok(Split { x_train, y_train, x_test, y_test })
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::DenseMatrix;

    #[test]
    fn holds_out_fifteen_percent() {
        let rows = (0..20).map(|i| vec![i as f64]).collect::<Vec<_>>();
        let y = (0..20).map(|i| i as f64).collect::<Vec<_>>();
        let x = Matrix::Dense(DenseMatrix::from_rows(rows).unwrap());

        let split = train_test_split(&x, &y, 0.15, Some(7)).unwrap();
        assert_eq!(split.x_test.n_rows(), 3);
        assert_eq!(split.x_train.n_rows(), 17);

        // the rows stay aligned with their targets.
        if let Matrix::Dense(test) = &split.x_test {
            for (row, y) in test.rows().zip(&split.y_test) {
                assert_eq!(row[0], *y);
            }
        }
    }

    #[test]
    fn rejects_single_row() {
        let x = Matrix::Dense(DenseMatrix::from_rows(vec![vec![1.0]]).unwrap());
        assert!(train_test_split(&x, &[1.0], 0.15, None).is_err());
    }
}
