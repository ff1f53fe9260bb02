//! Progress lines printed by the gradient boosting search.

use colored::Colorize;

const WIDTH: usize = 8;
const FULL_WIDTH: usize = 60;


#[inline(always)]
pub(super) fn print_search_header(eval_name: &str) {
    println!(
        "{:=>FULL_WIDTH$}\n{:^FULL_WIDTH$}\n{:->FULL_WIDTH$}",
        "", "GRADIENT BOOSTING SEARCH".bold(), "",
    );
    println!(
        "  {:>WIDTH$}\t{:>WIDTH$}\t{}",
        "# EST.".bold().red(),
        "SCORE".bold().yellow(),
        eval_name.bold().green(),
    );
}


#[inline(always)]
pub(super) fn print_search_step(n_estimators: usize, score: f64, improved: bool) {
    let score = format!("{score:.3}");
    let score = if improved { score.green() } else { score.normal() };
    println!("  {:>WIDTH$}\t{:>WIDTH$}", n_estimators.to_string().red(), score);
}


#[inline(always)]
pub(super) fn print_search_summary(n_estimators: Option<usize>, best_score: f64) {
    let n_estimators = n_estimators
        .map(|n| n.to_string())
        .unwrap_or_else(|| "unknown".into());
    println!(
        "{:->FULL_WIDTH$}\n\
        + {:<28}\t{:>20}\n\
        + {:<28}\t{:>20}\n\
        {:=>FULL_WIDTH$}",
        "",
        "Best number of estimators".bold(),
        n_estimators.bold().yellow(),
        "Best held-out score".bold(),
        format!("{best_score:.5}").bold().yellow(),
        "",
    );
}
