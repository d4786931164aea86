//! This module implements the config for regression tree induction.
//!
//! The only tree-shaping parameter is the leaf size: a range becomes a leaf
//! once it holds at most `leaf_size_percentage` percent of the training set.

/// Default share of the training set below which a range becomes a leaf.
pub const DEFAULT_LEAF_SIZE_PERCENTAGE: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub leaf_size_percentage: usize,
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

impl Config {
    pub fn new() -> Config {
        Config {
            leaf_size_percentage: DEFAULT_LEAF_SIZE_PERCENTAGE,
            debug: false,
        }
    }

    pub fn set_leaf_size_percentage(&mut self, n: usize) {
        self.leaf_size_percentage = n;
    }

    pub fn set_debug(&mut self, option: bool) {
        self.debug = option;
    }

    /// Minimum leaf size for a training set of `number_of_examples` rows,
    /// rounded down.
    ///
    /// # Example
    /// ```rust
    /// use regtree::config::Config;
    /// let cfg = Config::new();
    /// assert_eq!(cfg.min_leaf_size(20), 2);
    /// assert_eq!(cfg.min_leaf_size(9), 0);
    /// ```
    pub fn min_leaf_size(&self, number_of_examples: usize) -> usize {
        number_of_examples * self.leaf_size_percentage / 100
    }

    pub fn to_string(&self) -> String {
        let mut s = String::from("");
        s.push_str(&format!(
            "leaf size percentage = {}\n",
            self.leaf_size_percentage
        ));
        s.push_str(&format!("debug enabled = {}\n", self.debug));
        s
    }
}
