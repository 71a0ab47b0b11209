//! Weighted choice helpers.

/// Scale weights so they sum to 1. All-zero input is returned unchanged.
pub fn normalize_probabilities(weights: &[f64]) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    if total == 0.0 {
        return weights.to_vec();
    }
    weights.iter().map(|w| w / total).collect()
}

/// Index of the first entry whose cumulative weight exceeds `amount`.
///
/// Falls back to the last entry when `amount` is past the total, and
/// returns `None` only for an empty slice.
pub fn pick_with_probability(weights: &[f64], amount: f64) -> Option<usize> {
    let mut total = 0.0;
    for (index, weight) in weights.iter().enumerate() {
        total += weight;
        if total > amount {
            return Some(index);
        }
    }
    weights.len().checked_sub(1)
}
