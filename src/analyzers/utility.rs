//! Summary statistics over rating samples. All return 0.0 for empty input.

/// Computes the arithmetic mean of a slice of values.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Middle value of the sorted sample; the mean of the two middle values when
/// the length is even.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sorted = sorted(values);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Most frequent value. When several values share the highest count, the
/// smallest of them wins.
pub fn mode(values: &[f64]) -> f64 {
    let sorted = sorted(values);
    let mut best = (0.0, 0usize);

    for run in sorted.chunk_by(|a, b| a == b) {
        if run.len() > best.1 {
            best = (run[0], run.len());
        }
    }
    best.0
}

/// Population variance given a pre-computed mean.
pub fn variance(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}

/// Computes the population standard deviation given a pre-computed mean.
pub fn stddev(values: &[f64], mean: f64) -> f64 {
    variance(values, mean).sqrt()
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(median(&[]), 0.0);
        assert_eq!(mode(&[]), 0.0);
        assert_eq!(variance(&[], 0.0), 0.0);
        assert_eq!(stddev(&[], 0.0), 0.0);
    }

    #[test]
    fn test_single_value() {
        assert_eq!(mean(&[7.0]), 7.0);
        assert_eq!(median(&[7.0]), 7.0);
        assert_eq!(mode(&[7.0]), 7.0);
        assert_eq!(variance(&[7.0], 7.0), 0.0);
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[9.0, 1.0, 5.0]), 5.0);
        assert_eq!(median(&[8.0, 10.0]), 9.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn test_mode_picks_most_frequent() {
        assert_eq!(mode(&[7.0, 8.0, 7.0, 9.0]), 7.0);
    }

    #[test]
    fn test_mode_tie_picks_smallest() {
        assert_eq!(mode(&[9.0, 6.0, 9.0, 6.0, 8.0]), 6.0);
        assert_eq!(mode(&[10.0, 8.0]), 8.0);
    }

    #[test]
    fn test_population_variance_and_stddev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let m = mean(&values);
        assert_eq!(m, 5.0);
        assert_eq!(variance(&values, m), 4.0);
        assert_eq!(stddev(&values, m), 2.0);
    }
}
