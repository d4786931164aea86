//! This module implements the attribute model and the partitionable dataset.
//!
//! A [`Dataset`] is an ordered list of [`Example`] rows. Each row carries one
//! [`Value`] per explanatory [`Attribute`] plus a trailing class value. Tree
//! induction reorders rows in place with [`Dataset::sort_range`], so that any
//! contiguous index range can be split into contiguous child ranges.
//!
//! # Example
//! ```
//! use regtree::data::{Attribute, Dataset, Example, Value};
//!
//! let attributes = vec![Attribute::continuous("pgain", 0)];
//! let examples = vec![
//!     Example::new(vec![Value::Continuous(5.0)], 1.0),
//!     Example::new(vec![Value::Continuous(3.0)], 2.0),
//!     Example::new(vec![Value::Continuous(4.0)], 3.0),
//! ];
//! let mut dataset = Dataset::new(attributes, "class", examples).unwrap();
//! let pgain = dataset.attribute(0).clone();
//! dataset.sort_range(&pgain, 0, 2);
//! assert_eq!(dataset.class_value(0), 2.0);
//! ```

use crate::errors::{RegTreeError, Result};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use serde_derive::{Deserialize, Serialize};

macro_rules! def_value_type {
    ($t: tt) => {
        pub type ValueType = $t;
    };
}

// class values and continuous attributes
def_value_type!(f64);

/// A single cell of an explanatory column.
///
/// Values are totally ordered: discrete values lexicographically, continuous
/// values by IEEE total order. A discrete and a continuous value never meet in
/// a validated column; if they do, discrete values sort first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    Discrete(String),
    Continuous(ValueType),
}

impl Value {
    pub fn as_f64(&self) -> Option<ValueType> {
        match self {
            Value::Discrete(_) => None,
            Value::Continuous(v) => Some(*v),
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Discrete(a), Value::Discrete(b)) => a.cmp(b),
            (Value::Continuous(a), Value::Continuous(b)) => a.total_cmp(b),
            (Value::Discrete(_), Value::Continuous(_)) => Ordering::Less,
            (Value::Continuous(_), Value::Discrete(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Discrete(s) => write!(f, "{}", s),
            // keep the decimal point on integral thresholds: "5.0", not "5"
            Value::Continuous(v) => write!(f, "{:?}", v),
        }
    }
}

/// Type of an explanatory attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeKind {
    /// Finite domain, fixed at construction, iterated in natural order.
    Discrete { domain: BTreeSet<String> },
    Continuous,
}

/// An explanatory attribute: a named column of the dataset.
///
/// `index` is the column position and the only key used to read a row's
/// value for this attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    name: String,
    index: usize,
    kind: AttributeKind,
}

impl Attribute {
    pub fn discrete<I, S>(name: &str, index: usize, domain: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Attribute {
            name: name.to_string(),
            index,
            kind: AttributeKind::Discrete {
                domain: domain.into_iter().map(Into::into).collect(),
            },
        }
    }

    pub fn continuous(name: &str, index: usize) -> Self {
        Attribute {
            name: name.to_string(),
            index,
            kind: AttributeKind::Continuous,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn kind(&self) -> &AttributeKind {
        &self.kind
    }

    pub fn is_discrete(&self) -> bool {
        matches!(self.kind, AttributeKind::Discrete { .. })
    }

    /// The declared domain of a discrete attribute, `None` for continuous ones.
    pub fn domain(&self) -> Option<&BTreeSet<String>> {
        match &self.kind {
            AttributeKind::Discrete { domain } => Some(domain),
            AttributeKind::Continuous => None,
        }
    }

    /// Check that `value` may appear in this attribute's column.
    fn accepts(&self, value: &Value) -> bool {
        match (&self.kind, value) {
            (AttributeKind::Discrete { domain }, Value::Discrete(s)) => domain.contains(s),
            (AttributeKind::Continuous, Value::Continuous(v)) => v.is_finite(),
            _ => false,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A training row: one value per explanatory attribute and the class value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub values: Vec<Value>,
    pub class_value: ValueType,
}

impl Example {
    pub fn new(values: Vec<Value>, class_value: ValueType) -> Self {
        Example {
            values,
            class_value,
        }
    }
}

/// The training set.
#[derive(Debug, Clone)]
pub struct Dataset {
    attributes: Vec<Attribute>,
    class_name: String,
    examples: Vec<Example>,
}

impl Dataset {
    /// Build a dataset, checking that every row matches the schema.
    ///
    /// Attributes must be listed by increasing column index starting at 0,
    /// every row must hold one value per attribute of the matching type, and
    /// every number must be finite.
    pub fn new(attributes: Vec<Attribute>, class_name: &str, examples: Vec<Example>) -> Result<Self> {
        if examples.is_empty() {
            return Err(RegTreeError::TrainingData(
                "the training set has no examples".to_string(),
            ));
        }
        for (position, attribute) in attributes.iter().enumerate() {
            if attribute.index != position {
                return Err(RegTreeError::TrainingData(format!(
                    "attribute '{}' has index {} but is listed at column {}",
                    attribute.name, attribute.index, position
                )));
            }
        }
        for (row, example) in examples.iter().enumerate() {
            if example.values.len() != attributes.len() {
                return Err(RegTreeError::TrainingData(format!(
                    "example {} has {} values, expected {}",
                    row,
                    example.values.len(),
                    attributes.len()
                )));
            }
            if !example.class_value.is_finite() {
                return Err(RegTreeError::TrainingData(format!(
                    "example {} has a non-finite class value",
                    row
                )));
            }
            for (attribute, value) in attributes.iter().zip(example.values.iter()) {
                if !attribute.accepts(value) {
                    return Err(RegTreeError::TrainingData(format!(
                        "example {} has value '{}' not allowed for attribute '{}'",
                        row, value, attribute.name
                    )));
                }
            }
        }
        Ok(Dataset {
            attributes,
            class_name: class_name.to_string(),
            examples,
        })
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, index: usize) -> &Attribute {
        &self.attributes[index]
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    pub fn value(&self, row: usize, attribute_index: usize) -> &Value {
        &self.examples[row].values[attribute_index]
    }

    pub fn class_value(&self, row: usize) -> ValueType {
        self.examples[row].class_value
    }

    /// Exchange two whole rows.
    pub fn swap(&mut self, i: usize, j: usize) {
        self.examples.swap(i, j);
    }

    /// Sort the rows in the inclusive range `[lo, hi]` by `attribute`.
    ///
    /// Quicksort with a middle-of-range pivot and a two-way partition
    /// (`<= pivot` / `> pivot`). The smaller side is sorted recursively and
    /// the larger side iteratively, so the stack depth stays logarithmic.
    /// An empty range (`lo > hi`) is left untouched.
    pub fn sort_range(&mut self, attribute: &Attribute, mut lo: usize, mut hi: usize) {
        while lo < hi {
            let pos = self.partition(attribute.index, lo, hi);
            if pos - lo < hi - pos {
                if pos > lo {
                    self.sort_range(attribute, lo, pos - 1);
                }
                lo = pos + 1;
            } else {
                if pos < hi {
                    self.sort_range(attribute, pos + 1, hi);
                }
                // pos > lo here: the left side is the non-empty larger one
                hi = pos - 1;
            }
        }
    }

    /// Partition `[inf, sup]` around its middle element and return the
    /// pivot's final position.
    fn partition(&mut self, column: usize, inf: usize, sup: usize) -> usize {
        let med = inf + (sup - inf) / 2;
        let pivot = self.value(med, column).clone();
        self.swap(inf, med);

        let mut i = inf;
        let mut j = sup;
        loop {
            while i <= sup && *self.value(i, column) <= pivot {
                i += 1;
            }
            // stops at `inf` at the latest, which holds the pivot
            while *self.value(j, column) > pivot {
                j -= 1;
            }
            if i < j {
                self.swap(i, j);
            } else {
                break;
            }
        }
        self.swap(inf, j);
        j
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn mixed_dataset(rows: usize, seed: u64) -> Dataset {
        let mut rng = StdRng::seed_from_u64(seed);
        let letters = ["A", "B", "C", "D", "E"];
        let attributes = vec![
            Attribute::discrete("motor", 0, letters.iter().copied()),
            Attribute::continuous("pgain", 1),
        ];
        let examples = (0..rows)
            .map(|_| {
                let motor = letters[rng.gen_range(0..letters.len())];
                let pgain = f64::from(rng.gen_range(0..6_i32));
                Example::new(
                    vec![Value::Discrete(motor.to_string()), Value::Continuous(pgain)],
                    rng.gen_range(0.0..10.0),
                )
            })
            .collect();
        Dataset::new(attributes, "class", examples).unwrap()
    }

    fn sorted_rows(dataset: &Dataset, lo: usize, hi: usize) -> Vec<String> {
        let mut rows: Vec<String> = dataset.examples[lo..=hi]
            .iter()
            .map(|e| format!("{:?}", e))
            .collect();
        rows.sort();
        rows
    }

    #[test]
    fn sort_range_orders_and_permutes() {
        for seed in 0..20 {
            let mut dataset = mixed_dataset(57, seed);
            for column in 0..2 {
                let (lo, hi) = (3, 49);
                let before = sorted_rows(&dataset, lo, hi);
                let outside: Vec<Example> = dataset.examples[..lo]
                    .iter()
                    .chain(dataset.examples[hi + 1..].iter())
                    .cloned()
                    .collect();

                let attribute = dataset.attribute(column).clone();
                dataset.sort_range(&attribute, lo, hi);

                for i in lo..hi {
                    assert!(dataset.value(i, column) <= dataset.value(i + 1, column));
                }
                assert_eq!(before, sorted_rows(&dataset, lo, hi));
                let after: Vec<Example> = dataset.examples[..lo]
                    .iter()
                    .chain(dataset.examples[hi + 1..].iter())
                    .cloned()
                    .collect();
                assert_eq!(outside, after);
            }
        }
    }

    #[test]
    fn sort_range_trivial_ranges() {
        let mut dataset = mixed_dataset(5, 7);
        let snapshot = dataset.examples.clone();
        let attribute = dataset.attribute(1).clone();
        dataset.sort_range(&attribute, 2, 2);
        dataset.sort_range(&attribute, 3, 2);
        assert_eq!(snapshot, dataset.examples);
    }

    #[test]
    fn sort_range_all_equal_and_reversed() {
        let attributes = vec![Attribute::continuous("x", 0)];
        let examples: Vec<Example> = (0..16)
            .map(|i| Example::new(vec![Value::Continuous(3.0)], f64::from(i)))
            .collect();
        let mut dataset = Dataset::new(attributes.clone(), "y", examples).unwrap();
        dataset.sort_range(&attributes[0], 0, 15);
        let mut classes: Vec<f64> = (0..16).map(|i| dataset.class_value(i)).collect();
        classes.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(classes, (0..16).map(f64::from).collect::<Vec<_>>());

        let examples: Vec<Example> = (0..16)
            .rev()
            .map(|i| Example::new(vec![Value::Continuous(f64::from(i))], 0.0))
            .collect();
        let mut dataset = Dataset::new(attributes.clone(), "y", examples).unwrap();
        dataset.sort_range(&attributes[0], 0, 15);
        for i in 0..16 {
            assert_eq!(dataset.value(i, 0).as_f64(), Some(i as f64));
        }
    }

    #[test]
    fn swap_moves_whole_rows() {
        let mut dataset = mixed_dataset(4, 1);
        let first = dataset.examples[0].clone();
        let last = dataset.examples[3].clone();
        dataset.swap(0, 3);
        assert_eq!(dataset.examples[0], last);
        assert_eq!(dataset.examples[3], first);
    }

    #[test]
    fn rejects_malformed_rows() {
        let attributes = vec![
            Attribute::discrete("motor", 0, vec!["A", "B"]),
            Attribute::continuous("pgain", 1),
        ];
        let empty = Dataset::new(attributes.clone(), "class", Vec::new());
        assert!(empty.is_err());

        let short = vec![Example::new(vec![Value::Discrete("A".to_string())], 1.0)];
        assert!(Dataset::new(attributes.clone(), "class", short).is_err());

        let unknown = vec![Example::new(
            vec![Value::Discrete("Z".to_string()), Value::Continuous(1.0)],
            1.0,
        )];
        assert!(Dataset::new(attributes.clone(), "class", unknown).is_err());

        let swapped = vec![Example::new(
            vec![Value::Continuous(1.0), Value::Discrete("A".to_string())],
            1.0,
        )];
        assert!(Dataset::new(attributes.clone(), "class", swapped).is_err());

        let nan = vec![Example::new(
            vec![Value::Discrete("A".to_string()), Value::Continuous(1.0)],
            f64::NAN,
        )];
        assert!(Dataset::new(attributes, "class", nan).is_err());
    }

    #[test]
    fn value_ordering_and_display() {
        assert!(Value::Discrete("A".to_string()) < Value::Discrete("B".to_string()));
        assert!(Value::Continuous(-1.5) < Value::Continuous(2.0));
        assert_eq!(Value::Continuous(5.0).to_string(), "5.0");
        assert_eq!(Value::Discrete("E".to_string()).to_string(), "E");
    }
}
