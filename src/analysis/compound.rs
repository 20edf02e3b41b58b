//! Compounded accumulation of monthly percentage rates.

/// Compound a sequence of percentage rates: `(∏(1 + r/100) - 1) × 100`.
///
/// An empty sequence accumulates to `0.0`.
pub fn compound(rates: &[f64]) -> f64 {
    let factor = rates.iter().fold(1.0, |acc, r| acc * (1.0 + r / 100.0));
    (factor - 1.0) * 100.0
}

/// Arithmetic sum of the rates, for comparison with the compounded figure.
pub fn simple_sum(rates: &[f64]) -> f64 {
    rates.iter().sum()
}
