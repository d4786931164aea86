//! Split evaluators.
//!
//! Given an attribute and a row range, an evaluator sorts the range by the
//! attribute and proposes contiguous child ranges together with the total
//! variance after the split. Discrete attributes get one child per distinct
//! value present in the range. Continuous attributes get the single binary
//! threshold minimizing the summed variance of the two sides.

use crate::data::{Attribute, AttributeKind, Dataset, Value};
use crate::fitness::{average, SumCache};
use crate::node::{Comparator, Node, SplitInfo};

/// Build the split node of `attribute` over `[begin, end]`.
///
/// The range is left sorted by `attribute`.
pub fn evaluate(dataset: &mut Dataset, attribute: &Attribute, begin: usize, end: usize) -> Node {
    dataset.sort_range(attribute, begin, end);
    let children = match attribute.kind() {
        AttributeKind::Discrete { .. } => discrete_split_infos(dataset, attribute, begin, end),
        AttributeKind::Continuous => continuous_split_infos(dataset, attribute, begin, end),
    };
    Node::split(dataset, begin, end, attribute.clone(), children)
}

/// One branch per maximal run of equal values in the sorted range.
fn discrete_split_infos(
    dataset: &Dataset,
    attribute: &Attribute,
    begin: usize,
    end: usize,
) -> Vec<SplitInfo> {
    let column = attribute.index();
    let mut children = Vec::new();
    let mut run_begin = begin;
    while run_begin <= end {
        let value = dataset.value(run_begin, column);
        let mut run_end = run_begin;
        while run_end < end && dataset.value(run_end + 1, column) == value {
            run_end += 1;
        }
        let child_index = children.len();
        children.push(SplitInfo::new(
            value.clone(),
            Comparator::Equal,
            run_begin,
            run_end,
            child_index,
        ));
        run_begin = run_end + 1;
    }
    children
}

/// The best `<=` / `>` pair over the sorted range.
///
/// Every boundary between two unequal consecutive values is a candidate;
/// the threshold is the last value on the `<=` side. The first candidate
/// wins ties. When all rows share one value there is no boundary and a
/// single `<=` branch covering the whole range is returned.
fn continuous_split_infos(
    dataset: &Dataset,
    attribute: &Attribute,
    begin: usize,
    end: usize,
) -> Vec<SplitInfo> {
    let column = attribute.index();

    // running sums over class values centered on the range mean
    let mean = average(dataset, begin, end);
    let mut total = SumCache::default();
    for i in begin..=end {
        total.push(dataset.class_value(i) - mean);
    }

    let mut best: Option<(f64, usize)> = None;
    let mut prefix = SumCache::default();
    for i in (begin + 1)..=end {
        prefix.push(dataset.class_value(i - 1) - mean);
        if dataset.value(i, column) == dataset.value(i - 1, column) {
            continue;
        }
        let candidate = prefix.variance() + total.minus(&prefix).variance();
        match best {
            Some((best_variance, _)) if candidate >= best_variance => {}
            _ => best = Some((candidate, i)),
        }
    }

    match best {
        Some((_, boundary)) => {
            let threshold: Value = dataset.value(boundary - 1, column).clone();
            vec![
                SplitInfo::new(
                    threshold.clone(),
                    Comparator::LessOrEqual,
                    begin,
                    boundary - 1,
                    0,
                ),
                SplitInfo::new(threshold, Comparator::Greater, boundary, end, 1),
            ]
        }
        None => vec![SplitInfo::new(
            dataset.value(begin, column).clone(),
            Comparator::LessOrEqual,
            begin,
            end,
            0,
        )],
    }
}
