//! Nodes of a regression tree.
//!
//! Every node covers a contiguous, inclusive row range `[begin, end]` of the
//! training set and records the variance of the class value over that range.
//! A node is either a leaf predicting the range mean, or a split on one
//! attribute whose [`SplitInfo`]s partition the range into child ranges.

use crate::data::{Attribute, Dataset, Value, ValueType};
use crate::fitness::{average, variance};
use std::fmt;

use serde_derive::{Deserialize, Serialize};

/// Test applied on one outgoing branch of a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparator {
    Equal,
    LessOrEqual,
    Greater,
}

impl Comparator {
    pub fn as_str(self) -> &'static str {
        match self {
            Comparator::Equal => "=",
            Comparator::LessOrEqual => "<=",
            Comparator::Greater => ">",
        }
    }

    /// Whether `value` passes the test against the branch's `split_value`.
    pub fn matches(self, value: &Value, split_value: &Value) -> bool {
        match self {
            Comparator::Equal => value == split_value,
            Comparator::LessOrEqual => value <= split_value,
            Comparator::Greater => value > split_value,
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One outgoing branch of a split node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitInfo {
    /// discrete value or continuous threshold
    pub split_value: Value,
    pub comparator: Comparator,
    /// first row of the child range
    pub begin: usize,
    /// last row of the child range (inclusive)
    pub end: usize,
    /// position of this branch among the node's branches
    pub child_index: usize,
}

impl SplitInfo {
    pub fn new(
        split_value: Value,
        comparator: Comparator,
        begin: usize,
        end: usize,
        child_index: usize,
    ) -> Self {
        SplitInfo {
            split_value,
            comparator,
            begin,
            end,
            child_index,
        }
    }

    /// Human readable test, e.g. `motor = A` or `pgain <= 4.0`.
    pub fn describe(&self, attribute: &Attribute) -> String {
        format!("{} {} {}", attribute.name(), self.comparator, self.split_value)
    }
}

impl fmt::Display for SplitInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "child {} split value{} {} [examples: {}-{}]",
            self.child_index, self.comparator, self.split_value, self.begin, self.end
        )
    }
}

/// Variant-specific payload of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Leaf {
        predicted_value: ValueType,
    },
    /// One child per distinct value present in the range, in domain order.
    DiscreteSplit {
        attribute: Attribute,
        split_variance: ValueType,
        children: Vec<SplitInfo>,
    },
    /// `<= threshold` and `> threshold` children.
    ContinuousSplit {
        attribute: Attribute,
        split_variance: ValueType,
        children: Vec<SplitInfo>,
    },
}

/// A node of the regression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub begin: usize,
    pub end: usize,
    /// sum of squared deviations of the class value over `[begin, end]`
    pub variance: ValueType,
    pub kind: NodeKind,
}

impl Node {
    /// A leaf over `[begin, end]` predicting the mean class value.
    pub fn leaf(dataset: &Dataset, begin: usize, end: usize) -> Self {
        Node {
            begin,
            end,
            variance: variance(dataset, begin, end),
            kind: NodeKind::Leaf {
                predicted_value: average(dataset, begin, end),
            },
        }
    }

    /// A split over `[begin, end]`. The split variance is recomputed from the
    /// child ranges, so it is exact even when branches were scored with
    /// running sums.
    pub fn split(
        dataset: &Dataset,
        begin: usize,
        end: usize,
        attribute: Attribute,
        children: Vec<SplitInfo>,
    ) -> Self {
        let split_variance: ValueType = children
            .iter()
            .map(|s| variance(dataset, s.begin, s.end))
            .sum();
        let kind = if attribute.is_discrete() {
            NodeKind::DiscreteSplit {
                attribute,
                split_variance,
                children,
            }
        } else {
            NodeKind::ContinuousSplit {
                attribute,
                split_variance,
                children,
            }
        };
        Node {
            begin,
            end,
            variance: variance(dataset, begin, end),
            kind,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    pub fn predicted_value(&self) -> Option<ValueType> {
        match self.kind {
            NodeKind::Leaf { predicted_value } => Some(predicted_value),
            _ => None,
        }
    }

    pub fn attribute(&self) -> Option<&Attribute> {
        match &self.kind {
            NodeKind::Leaf { .. } => None,
            NodeKind::DiscreteSplit { attribute, .. }
            | NodeKind::ContinuousSplit { attribute, .. } => Some(attribute),
        }
    }

    /// Branches of a split, empty for a leaf.
    pub fn split_infos(&self) -> &[SplitInfo] {
        match &self.kind {
            NodeKind::Leaf { .. } => &[],
            NodeKind::DiscreteSplit { children, .. }
            | NodeKind::ContinuousSplit { children, .. } => children,
        }
    }

    pub fn number_of_children(&self) -> usize {
        self.split_infos().len()
    }

    /// Total variance after the split: the sum of the child ranges' variances.
    /// For a leaf this is the node's own variance.
    pub fn split_variance(&self) -> ValueType {
        match self.kind {
            NodeKind::Leaf { .. } => self.variance,
            NodeKind::DiscreteSplit { split_variance, .. }
            | NodeKind::ContinuousSplit { split_variance, .. } => split_variance,
        }
    }

    /// The branch listing shown to a client choosing a child, one line per
    /// branch: `index: attribute comparator value`.
    pub fn formulate_query(&self) -> String {
        let mut query = String::new();
        if let Some(attribute) = self.attribute() {
            for (i, s) in self.split_infos().iter().enumerate() {
                query.push_str(&format!("{}: {}\n", i, s.describe(attribute)));
            }
        }
        query
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            NodeKind::Leaf { predicted_value } => write!(
                f,
                "LEAF: class= {:?} [examples: {}-{}] variance= {:?}",
                predicted_value, self.begin, self.end, self.variance
            ),
            NodeKind::DiscreteSplit {
                attribute,
                split_variance,
                children,
            }
            | NodeKind::ContinuousSplit {
                attribute,
                split_variance,
                children,
            } => {
                write!(
                    f,
                    "SPLIT: attribute= {} [examples: {}-{}] variance= {:?} split variance= {:?}",
                    attribute, self.begin, self.end, self.variance, split_variance
                )?;
                for s in children.iter() {
                    write!(f, "\n\t{}", s)?;
                }
                Ok(())
            }
        }
    }
}
