//! This module implements some math functions used for tree induction and evaluation.

use crate::data::{Dataset, ValueType};
use crate::regression_tree::RegressionTree;

/// Comparing two number with a costomized floating error threshold.
///
/// # Example
/// ```rust
/// use regtree::fitness::almost_equal_thrs;
/// assert_eq!(true, almost_equal_thrs(1.0, 0.998, 0.01));
/// ```
pub fn almost_equal_thrs(a: ValueType, b: ValueType, thrs: f64) -> bool {
    (a - b).abs() < thrs
}

/// Comparing two number with default floating error threshold.
///
/// # Example
/// ```rust
/// use regtree::fitness::almost_equal;
/// assert_eq!(false, almost_equal(1.0, 0.998));
/// assert_eq!(true, almost_equal(1.0, 0.999998));
/// ```
pub fn almost_equal(a: ValueType, b: ValueType) -> bool {
    (a - b).abs() < 1.0e-5
}

/// Mean class value over the inclusive row range `[begin, end]`.
pub fn average(dataset: &Dataset, begin: usize, end: usize) -> ValueType {
    let mut s: ValueType = 0.0;
    for i in begin..=end {
        s += dataset.class_value(i);
    }
    s / ((end - begin + 1) as ValueType)
}

/// Sum of squared deviations of the class value from its mean over `[begin, end]`.
///
/// This is the impurity measure of a range. It is not divided by the number
/// of rows, so the variances of disjoint ranges add up.
pub fn variance(dataset: &Dataset, begin: usize, end: usize) -> ValueType {
    let mean = average(dataset, begin, end);
    let mut v: ValueType = 0.0;
    for i in begin..=end {
        let d = dataset.class_value(i) - mean;
        v += d * d;
    }
    v
}

/// Running sums over a prefix of a sorted range. Used to score every
/// candidate threshold of a continuous attribute in one pass.
#[cfg_attr(not(feature = "enable_training"), allow(dead_code))]
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct SumCache {
    /// sum of class values
    pub sum_s: f64,
    /// sum of squared class values
    pub sum_ss: f64,
    /// number of rows
    pub sum_c: f64,
}

#[cfg_attr(not(feature = "enable_training"), allow(dead_code))]
impl SumCache {
    pub fn push(&mut self, y: ValueType) {
        self.sum_s += y;
        self.sum_ss += y * y;
        self.sum_c += 1.0;
    }

    pub fn minus(&self, other: &SumCache) -> SumCache {
        SumCache {
            sum_s: self.sum_s - other.sum_s,
            sum_ss: self.sum_ss - other.sum_ss,
            sum_c: self.sum_c - other.sum_c,
        }
    }

    /// Sum of squared deviations, clamped at zero against rounding.
    pub fn variance(&self) -> f64 {
        if self.sum_c <= 0.0 {
            return 0.0;
        }
        let v = self.sum_ss - self.sum_s * self.sum_s / self.sum_c;
        if v < 0.0 {
            0.0
        } else {
            v
        }
    }
}

/// RMSE (Root-Mean-Square deviation) of the tree's predictions over the dataset.
/// Rows the tree cannot route (unseen discrete value) are skipped. Returns
/// `None` when no row could be predicted.
/// See [wikipedia](https://en.wikipedia.org/wiki/Root-mean-square_deviation) for detailed algorithm.
pub fn rmse(tree: &RegressionTree, dataset: &Dataset) -> Option<ValueType> {
    let mut s: ValueType = 0.0;
    let mut c: usize = 0;
    for example in dataset.examples() {
        if let Some(pred) = tree.predict(&example.values) {
            s += (pred - example.class_value).powi(2);
            c += 1;
        }
    }
    if c == 0 {
        None
    } else {
        Some((s / c as ValueType).sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Attribute, Example, Value};
    use approx::assert_abs_diff_eq;

    fn dataset(classes: &[f64]) -> Dataset {
        let examples = classes
            .iter()
            .enumerate()
            .map(|(i, y)| Example::new(vec![Value::Continuous(i as f64)], *y))
            .collect();
        Dataset::new(vec![Attribute::continuous("x", 0)], "y", examples).unwrap()
    }

    #[test]
    fn average_and_variance() {
        let ds = dataset(&[1.0, 2.0, 3.0, 6.0]);
        assert_abs_diff_eq!(average(&ds, 0, 3), 3.0);
        assert_abs_diff_eq!(variance(&ds, 0, 3), 14.0);
        assert_abs_diff_eq!(average(&ds, 1, 1), 2.0);
        assert_abs_diff_eq!(variance(&ds, 1, 1), 0.0);
    }

    #[test]
    fn sum_cache_matches_two_pass() {
        let classes = [0.5, 2.5, 2.0, 9.0, 4.25];
        let ds = dataset(&classes);
        let mut total = SumCache::default();
        for y in classes.iter() {
            total.push(*y);
        }
        let mut prefix = SumCache::default();
        for (i, y) in classes.iter().enumerate().take(classes.len() - 1) {
            prefix.push(*y);
            let suffix = total.minus(&prefix);
            assert_abs_diff_eq!(prefix.variance(), variance(&ds, 0, i), epsilon = 1e-9);
            assert_abs_diff_eq!(
                suffix.variance(),
                variance(&ds, i + 1, classes.len() - 1),
                epsilon = 1e-9
            );
        }
        assert_eq!(SumCache::default().variance(), 0.0);
    }
}
