//! Basic numeric statistics

use serde::{Deserialize, Serialize};

/// Arithmetic mean of `values`, or `0.0` when empty.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Every value multiplied by two.
#[must_use]
pub fn doubled(values: &[f64]) -> Vec<f64> {
    values.iter().map(|v| v * 2.0).collect()
}

/// Summary statistics over a non-empty slice
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
    /// Arithmetic mean
    pub average: f64,
}

impl Statistics {
    /// Compute statistics, or `None` for an empty slice.
    ///
    /// NaN entries are ignored by `min`/`max` but propagate into `average`.
    #[must_use]
    pub fn of(values: &[f64]) -> Option<Self> {
        let (first, rest) = values.split_first()?;
        let (min, max) = rest
            .iter()
            .fold((*first, *first), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
        Some(Self {
            min,
            max,
            average: average(values),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_of_empty_is_zero() {
        assert_eq!(average(&[]), 0.0);
    }

    #[test]
    fn average_of_values() {
        assert_eq!(average(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3.0);
    }

    #[test]
    fn statistics_of_empty_is_none() {
        assert!(Statistics::of(&[]).is_none());
    }

    #[test]
    fn statistics_of_values() {
        let stats = Statistics::of(&[4.0, -2.0, 10.0, 0.0]).unwrap();
        assert_eq!(stats.min, -2.0);
        assert_eq!(stats.max, 10.0);
        assert_eq!(stats.average, 3.0);
    }

    #[test]
    fn statistics_single_value() {
        let stats = Statistics::of(&[7.5]).unwrap();
        assert_eq!(stats, Statistics { min: 7.5, max: 7.5, average: 7.5 });
    }

    #[test]
    fn doubled_then_stats() {
        let stats = Statistics::of(&doubled(&[1.0, 2.0, 3.0, 4.0, 5.0])).unwrap();
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 10.0);
        assert_eq!(stats.average, 6.0);
    }
}
