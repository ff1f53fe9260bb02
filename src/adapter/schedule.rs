//! The estimator counts the gradient boosting search walks through.


/// Consecutive non-improving steps after which the search stops.
pub const GB_PATIENCE: usize = 20;


/// `(start, end, step)` ranges of the full schedule.
/// Fine-grained at low counts, coarser at higher counts.
const FULL_RANGES: [(usize, usize, usize); 7] = [
    (1, 50, 1),
    (50, 100, 2),
    (100, 250, 3),
    (250, 500, 5),
    (500, 1_000, 10),
    (1_000, 2_000, 20),
    (2_000, 10_000, 100),
];


/// Number of leading ranges the fast schedule keeps.
const N_FAST_RANGES: usize = 3;


/// Returns the estimator counts to try, in increasing order.
/// With `fast`, the schedule stops below `250`.
pub fn n_estimators_schedule(fast: bool) -> Vec<usize> {
    let n_ranges = if fast { N_FAST_RANGES } else { FULL_RANGES.len() };
    FULL_RANGES[..n_ranges].iter()
        .flat_map(|&(start, end, step)| (start..end).step_by(step))
        .collect()
}
