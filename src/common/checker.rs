//! This file defines some functions that checks some pre-conditions
//! E.g., Shape of data

use crate::error::{AtcError, Result};
use crate::sample::Matrix;


/// Check whether the training pair `(x, y)` is valid or not.
#[inline(always)]
pub(crate) fn check_fit_input(x: &Matrix, y: &[f64]) -> Result<()> {
    // `y` must not be empty.
    if y.is_empty() {
        return Err(AtcError::invalid_input("The target `y` is empty"));
    }

    let n_rows = x.n_rows();
    if n_rows != y.len() {
        return Err(AtcError::Shape {
            expected: format!("{} rows in `X`", y.len()),
            actual: format!("{n_rows} rows"),
        });
    }
    Ok(())
}


/// Check whether `x` has `n_rows` rows.
#[inline(always)]
pub(crate) fn check_n_rows(x: &Matrix, n_rows: usize) -> Result<()> {
    let actual = x.n_rows();
    if actual != n_rows {
        return Err(AtcError::Shape {
            expected: format!("{n_rows} rows"),
            actual: format!("{actual} rows"),
        });
    }
    Ok(())
}
