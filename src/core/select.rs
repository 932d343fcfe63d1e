use num_complex::Complex64 as C64;
use std::cmp::Ordering;

use crate::core::error::EigError;

/// Ascending by real part, ties broken by imaginary part. NaN sorts last.
pub fn complex_order(a: &C64, b: &C64) -> Ordering {
    a.re.total_cmp(&b.re).then_with(|| a.im.total_cmp(&b.im))
}

pub fn sort_eigenvalues(values: &mut [C64]) {
    values.sort_by(complex_order);
}

/// `rank`-th largest value under [`complex_order`]; rank 1 is the largest.
pub fn select_from_top(values: &[C64], rank: usize) -> Result<C64, EigError> {
    if rank == 0 || rank > values.len() {
        return Err(EigError::Index { needed: rank.max(1), available: values.len() });
    }
    let mut sorted = values.to_vec();
    sort_eigenvalues(&mut sorted);
    Ok(sorted[sorted.len() - rank])
}

pub fn second_largest(values: &[C64]) -> Result<C64, EigError> {
    select_from_top(values, 2)
}

/// Shortest round-trip text (`3.0`, `-0.25`, `1e-7`) unless a fixed precision is asked for.
pub fn format_real(value: f64, precision: Option<usize>) -> String {
    match precision {
        Some(digits) => format!("{:.*}", digits, value),
        None => format!("{:?}", value),
    }
}
