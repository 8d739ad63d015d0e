//! Small descriptive-statistics helpers over finite `f64` samples.
//!
//! All functions expect inputs that have already been filtered down to finite
//! values (see [`crate::dataset::Dataset::finite_values`]); they return `None`
//! on empty input instead of producing NaN.

/// Arithmetic mean, or `None` for an empty sample.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Quantile with linear interpolation between order statistics.
///
/// `q` is clamped to `[0, 1]`. The input does not need to be sorted.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(quantile_sorted(&sorted, q.clamp(0.0, 1.0)))
}

fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let last = sorted.len() - 1;
    let pos = last as f64 * q;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
    }
}

pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(values.iter().fold((first, first), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    }))
}

/// The three quartile cuts of a sample, plus the derived whisker fences used
/// by the box-and-whisker panels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quartiles {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
}

impl Quartiles {
    pub fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Some(Self {
            q1: quantile_sorted(&sorted, 0.25),
            median: quantile_sorted(&sorted, 0.5),
            q3: quantile_sorted(&sorted, 0.75),
        })
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Fences at 1.5 IQR beyond the box; points outside them are outliers.
    pub fn fences(&self) -> (f64, f64) {
        let reach = 1.5 * self.iqr();
        (self.q1 - reach, self.q3 + reach)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[2.0, 4.0]), Some(3.0));
    }

    #[test]
    fn quantile_interpolates_between_order_statistics() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&values, 0.0), Some(1.0));
        assert_eq!(quantile(&values, 1.0), Some(4.0));
        assert_eq!(quantile(&values, 0.5), Some(2.5));
        // (n - 1) * 0.25 = 0.75 -> 1.0 + 0.75 * (2.0 - 1.0)
        assert_eq!(quantile(&values, 0.25), Some(1.75));
    }

    #[test]
    fn quantile_handles_unsorted_input_and_single_value() {
        assert_eq!(quantile(&[9.0, 1.0, 5.0], 0.5), Some(5.0));
        assert_eq!(quantile(&[7.0], 0.75), Some(7.0));
    }

    #[test]
    fn median_matches_middle_value() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
    }

    #[test]
    fn min_max_scans_whole_slice() {
        assert_eq!(min_max(&[2.0, -1.0, 7.0, 0.0]), Some((-1.0, 7.0)));
        assert_eq!(min_max(&[]), None);
    }

    #[test]
    fn quartiles_and_fences() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let q = Quartiles::of(&values).unwrap();
        assert_eq!(q.q1, 2.0);
        assert_eq!(q.median, 3.0);
        assert_eq!(q.q3, 4.0);
        assert_eq!(q.iqr(), 2.0);
        assert_eq!(q.fences(), (-1.0, 7.0));
    }

    #[test]
    fn quartiles_of_empty_is_none() {
        assert_eq!(Quartiles::of(&[]), None);
    }
}
