//! This module implements the regression tree and its induction.
//!
//! Training recursively partitions the row range of a [`Dataset`]:
//!
//! 1. A range holding at most `min_leaf_size` rows becomes a leaf predicting
//!    the mean class value.
//! 2. Otherwise every attribute proposes a split (see [`crate::split`]) and
//!    the one with the lowest total child variance wins. Attributes are tried
//!    by increasing column index and only a strictly better candidate replaces
//!    the current best, so the lowest index wins exact ties.
//! 3. A winning split with a single child cannot separate anything and is
//!    replaced by a leaf; otherwise each child range is trained recursively.
//!
//! `min_leaf_size` is 10% of the training set, rounded down (see
//! [`Config`]).
//!
//! # Example
//! ```
//! use regtree::data::{Attribute, Dataset, Example, Value};
//! use regtree::regression_tree::RegressionTree;
//!
//! let attributes = vec![Attribute::continuous("pgain", 0)];
//! let examples = (0..20)
//!     .map(|i| {
//!         let (x, y) = if i < 10 { (3.0, 1.0) } else { (6.0, 4.0) };
//!         Example::new(vec![Value::Continuous(x)], y)
//!     })
//!     .collect();
//! let mut dataset = Dataset::new(attributes, "class", examples).unwrap();
//! let tree = RegressionTree::fit(&mut dataset);
//!
//! assert_eq!(tree.len(), 3);
//! assert_eq!(tree.predict(&[Value::Continuous(2.5)]), Some(1.0));
//! println!("{}", tree.rules_text());
//! ```

use crate::arena::{ArenaNode, TreeArena, TreeIndex};
#[cfg(feature = "enable_training")]
use crate::config::Config;
use crate::data::{Attribute, Dataset, Value, ValueType};
use crate::errors::{RegTreeError, Result};
use crate::node::{Comparator, Node};
#[cfg(feature = "enable_training")]
use crate::split;
use std::fmt;

use serde_derive::{Deserialize, Serialize};

const TREE_BANNER: &str = "********* TREE **********\n";
const RULES_BANNER: &str = "********* RULES **********\n";
const CLOSING_BANNER: &str = "*************************\n";

/// One branch test on a root-to-leaf path.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub attribute: String,
    pub comparator: Comparator,
    pub value: Value,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.attribute, self.comparator, self.value)
    }
}

/// A root-to-leaf path: the conjunction of its branch tests and the leaf's
/// prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub conditions: Vec<Condition>,
    pub predicted_value: ValueType,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, condition) in self.conditions.iter().enumerate() {
            if i > 0 {
                write!(f, " AND ")?;
            }
            write!(f, "{} ", condition)?;
        }
        write!(f, "==> Class= {:?}", self.predicted_value)
    }
}

/// The regression tree.
///
/// Nodes live in a [`TreeArena`]; a node's arena index is its id. A trained
/// tree is never mutated, so it can be shared by any number of concurrent
/// prediction sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    /// the tree
    tree: TreeArena<Node>,
    /// the explanatory attributes the tree was trained on
    attributes: Vec<Attribute>,
    /// name of the class attribute
    class_name: String,
    /// ranges with at most this many rows became leaves
    min_leaf_size: usize,
}

impl RegressionTree {
    /// Train a tree with the default [`Config`].
    ///
    /// The rows of `dataset` are reordered in place. Afterwards every leaf's
    /// `[begin, end]` range addresses exactly the rows it was trained on.
    #[cfg(feature = "enable_training")]
    pub fn fit(dataset: &mut Dataset) -> Self {
        Self::fit_with_config(&Config::new(), dataset)
    }

    /// Train a tree with the leaf size derived from `config`.
    #[cfg(feature = "enable_training")]
    pub fn fit_with_config(config: &Config, dataset: &mut Dataset) -> Self {
        let min_leaf_size = config.min_leaf_size(dataset.len());
        info!(
            "training regression tree on {} examples, {} attributes, min leaf size {}",
            dataset.len(),
            dataset.attributes().len(),
            min_leaf_size
        );
        let mut tree = RegressionTree {
            tree: TreeArena::new(),
            attributes: dataset.attributes().to_vec(),
            class_name: dataset.class_name().to_string(),
            min_leaf_size,
        };
        if !dataset.is_empty() {
            let last = dataset.len() - 1;
            tree.fit_node(dataset, 0, last, None);
        }
        info!(
            "regression tree trained: {} nodes, {} leaves, depth {}",
            tree.len(),
            tree.leaf_count(),
            tree.depth()
        );
        if config.debug {
            info!("\n{}", tree.tree_text());
        }
        tree
    }

    /// Recursively build the node over `[begin, end]` and its subtree.
    #[cfg(feature = "enable_training")]
    fn fit_node(
        &mut self,
        dataset: &mut Dataset,
        begin: usize,
        end: usize,
        parent: Option<TreeIndex>,
    ) {
        let node = self.choose_node(dataset, begin, end);
        let ranges: Vec<(usize, usize)> = node
            .split_infos()
            .iter()
            .map(|s| (s.begin, s.end))
            .collect();

        let index = match parent {
            None => self.tree.add_root(ArenaNode::new(node)),
            Some(p) => self.tree.add_child(p, ArenaNode::new(node)),
        };
        for (child_begin, child_end) in ranges {
            self.fit_node(dataset, child_begin, child_end, Some(index));
        }
    }

    /// Decide whether `[begin, end]` becomes a leaf or a split, leaving the
    /// range sorted by the winning attribute.
    #[cfg(feature = "enable_training")]
    fn choose_node(&self, dataset: &mut Dataset, begin: usize, end: usize) -> Node {
        if end - begin + 1 <= self.min_leaf_size {
            return Node::leaf(dataset, begin, end);
        }

        let mut best: Option<Node> = None;
        for attribute in self.attributes.iter() {
            let candidate = split::evaluate(dataset, attribute, begin, end);
            let better = match &best {
                None => true,
                Some(current) => candidate.split_variance() < current.split_variance(),
            };
            if better {
                best = Some(candidate);
            }
        }

        match best {
            Some(node) if node.number_of_children() > 1 => {
                // later candidates may have reordered the range
                if let Some(attribute) = node.attribute() {
                    dataset.sort_range(attribute, begin, end);
                    debug!(
                        "split [{}-{}] on '{}' into {} children, variance {} -> {}",
                        begin,
                        end,
                        attribute.name(),
                        node.number_of_children(),
                        node.variance,
                        node.split_variance()
                    );
                }
                node
            }
            Some(node) => {
                warn!(
                    "split [{}-{}] on '{}' has a single child, using a leaf",
                    begin,
                    end,
                    node.attribute().map(|a| a.name()).unwrap_or("")
                );
                Node::leaf(dataset, begin, end)
            }
            None => Node::leaf(dataset, begin, end),
        }
    }

    /// Check the arena is a proper tree consistent with its split infos.
    ///
    /// Used on decoded models: every non-root node has exactly one parent
    /// with a smaller index, and each node has one child per split info.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.tree.is_empty() {
            return Err(RegTreeError::CorruptModel("the tree has no nodes".to_string()));
        }
        let mut referenced = vec![false; self.tree.len()];
        for (position, arena_node) in self.tree.iter().enumerate() {
            if arena_node.index() != position {
                return Err(RegTreeError::CorruptModel(format!(
                    "node {} is stored at position {}",
                    arena_node.index(),
                    position
                )));
            }
            let node = &arena_node.value;
            if node.begin > node.end {
                return Err(RegTreeError::CorruptModel(format!(
                    "node {} has an empty range",
                    position
                )));
            }
            if !node.is_leaf() && node.number_of_children() < 2 {
                return Err(RegTreeError::CorruptModel(format!(
                    "split node {} has {} branches",
                    position,
                    node.number_of_children()
                )));
            }
            if arena_node.children().len() != node.number_of_children() {
                return Err(RegTreeError::CorruptModel(format!(
                    "node {} has {} children but {} branches",
                    position,
                    arena_node.children().len(),
                    node.number_of_children()
                )));
            }
            for (i, s) in node.split_infos().iter().enumerate() {
                if s.child_index != i {
                    return Err(RegTreeError::CorruptModel(format!(
                        "node {} lists branch {} at position {}",
                        position, s.child_index, i
                    )));
                }
            }
            for child in arena_node.children() {
                if *child <= position || *child >= self.tree.len() || referenced[*child] {
                    return Err(RegTreeError::CorruptModel(format!(
                        "node {} has an invalid child {}",
                        position, child
                    )));
                }
                referenced[*child] = true;
            }
        }
        if referenced.iter().skip(1).any(|r| !r) {
            return Err(RegTreeError::CorruptModel(
                "the tree has unreachable nodes".to_string(),
            ));
        }
        Ok(())
    }

    /// The root node's index.
    pub fn root_index(&self) -> TreeIndex {
        self.tree.get_root_index()
    }

    pub fn root(&self) -> Option<&Node> {
        self.node(self.root_index())
    }

    /// The node with the given id.
    pub fn node(&self, index: TreeIndex) -> Option<&Node> {
        self.tree.get_node(index).map(|n| &n.value)
    }

    /// The ids of a node's children, aligned with its split infos.
    pub fn children(&self, index: TreeIndex) -> &[TreeIndex] {
        self.tree
            .get_node(index)
            .map(|n| n.children())
            .unwrap_or(&[])
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn min_leaf_size(&self) -> usize {
        self.min_leaf_size
    }

    /// Return the number of nodes in current tree
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns true if the current tree is empty
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn leaf_count(&self) -> usize {
        self.tree.iter().filter(|n| n.value.is_leaf()).count()
    }

    /// Number of edges on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.tree.walk().iter().map(|(d, _)| *d).max().unwrap_or(0)
    }

    /// Route a full row of explanatory values to a leaf.
    ///
    /// Returns `None` if the row is too short or holds a discrete value the
    /// tree has no branch for.
    pub fn predict(&self, values: &[Value]) -> Option<ValueType> {
        let mut index = self.root_index();
        loop {
            let node = self.node(index)?;
            if let Some(pred) = node.predicted_value() {
                return Some(pred);
            }
            let attribute = node.attribute()?;
            let value = values.get(attribute.index())?;
            let branch = node
                .split_infos()
                .iter()
                .position(|s| s.comparator.matches(value, &s.split_value))?;
            index = *self.children(index).get(branch)?;
        }
    }

    /// Every root-to-leaf path, left to right.
    pub fn rules(&self) -> Vec<Rule> {
        let mut rules = Vec::new();
        let mut stack: Vec<(TreeIndex, Vec<Condition>)> = Vec::new();
        if self.root().is_some() {
            stack.push((self.root_index(), Vec::new()));
        }
        while let Some((index, path)) = stack.pop() {
            let node = match self.node(index) {
                Some(node) => node,
                None => continue,
            };
            if let Some(predicted_value) = node.predicted_value() {
                rules.push(Rule {
                    conditions: path,
                    predicted_value,
                });
                continue;
            }
            let attribute = match node.attribute() {
                Some(attribute) => attribute,
                None => continue,
            };
            let children = self.children(index);
            for (s, child) in node.split_infos().iter().zip(children.iter()).rev() {
                let mut child_path = path.clone();
                child_path.push(Condition {
                    attribute: attribute.name().to_string(),
                    comparator: s.comparator,
                    value: s.split_value.clone(),
                });
                stack.push((*child, child_path));
            }
        }
        rules
    }

    /// The rule dump served to clients.
    pub fn rules_text(&self) -> String {
        let mut s = String::from(RULES_BANNER);
        for rule in self.rules() {
            s.push_str(&format!("{}\n", rule));
        }
        s.push_str(CLOSING_BANNER);
        s
    }

    /// One line per node in pre-order, split nodes followed by their branches.
    pub fn structure(&self) -> String {
        let mut s = String::new();
        for (_, node) in self.tree.walk() {
            s.push_str(&format!("{}\n", node.value));
        }
        s
    }

    /// The structure dump served to clients.
    pub fn tree_text(&self) -> String {
        format!("{}{}{}", TREE_BANNER, self.structure(), CLOSING_BANNER)
    }

    /// For debug use. Print the whole tree.
    pub fn print(&self) {
        println!("{}", self.tree_text());
    }
}
