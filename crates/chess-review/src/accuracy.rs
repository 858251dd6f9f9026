//! Accuracy scoring.

/// Share of the evaluation ceiling a side actually realized, as a percentage.
///
/// An exact `sum == ceiling` match is always exactly 100, including the
/// all-zero case of a dead-equal game. With a zero ceiling and a non-zero
/// sum there is nothing to score against, so the result is `None` rather
/// than a computed NaN or infinity.
pub fn accuracy(sum: i64, ceiling: i64) -> Option<f64> {
    if sum == ceiling {
        return Some(100.0);
    }
    if ceiling == 0 {
        return None;
    }
    Some(100.0 * sum as f64 / ceiling as f64)
}
