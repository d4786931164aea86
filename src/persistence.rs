//! Saving and loading trained trees.
//!
//! A model blob is a 4-byte magic, a 1-byte format version and the JSON
//! encoding of the [`RegressionTree`]. Decoding checks all three and then
//! validates the tree's structure, so a foreign or damaged blob fails with a
//! persistence error instead of producing a tree that misbehaves later.
//!
//! # Example
//! ```
//! use regtree::data::{Attribute, Dataset, Example, Value};
//! use regtree::regression_tree::RegressionTree;
//!
//! let attributes = vec![Attribute::continuous("x", 0)];
//! let examples = vec![Example::new(vec![Value::Continuous(1.0)], 42.0)];
//! let mut dataset = Dataset::new(attributes, "y", examples).unwrap();
//! let tree = RegressionTree::fit(&mut dataset);
//!
//! let bytes = tree.to_bytes().unwrap();
//! let restored = RegressionTree::from_bytes(&bytes).unwrap();
//! assert_eq!(tree.tree_text(), restored.tree_text());
//! ```

use crate::errors::{RegTreeError, Result};
use crate::regression_tree::RegressionTree;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Magic bytes identifying a regression tree model.
pub const MAGIC: &[u8; 4] = b"RTRE";

/// Current format version.
pub const FORMAT_VERSION: u8 = 1;

const HEADER_SIZE: usize = 5;

impl RegressionTree {
    /// Encode the tree as an opaque blob.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let payload = serde_json::to_vec(self)?;
        let mut bytes = Vec::with_capacity(HEADER_SIZE + payload.len());
        bytes.extend_from_slice(MAGIC);
        bytes.push(FORMAT_VERSION);
        bytes.extend_from_slice(&payload);
        Ok(bytes)
    }

    /// Decode a blob produced by [`RegressionTree::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(RegTreeError::CorruptModel(format!(
                "blob of {} bytes is shorter than the header",
                bytes.len()
            )));
        }
        if &bytes[..4] != MAGIC {
            return Err(RegTreeError::CorruptModel(
                "not a regression tree model".to_string(),
            ));
        }
        if bytes[4] != FORMAT_VERSION {
            return Err(RegTreeError::CorruptModel(format!(
                "unsupported format version {} (expected {})",
                bytes[4], FORMAT_VERSION
            )));
        }
        let tree: RegressionTree = serde_json::from_slice(&bytes[HEADER_SIZE..])?;
        tree.validate()?;
        Ok(tree)
    }

    /// Save the model to a file.
    pub fn save_model(&self, filename: &str) -> Result<()> {
        let bytes = self.to_bytes()?;
        let mut writer = BufWriter::new(File::create(Path::new(filename))?);
        writer.write_all(&bytes)?;
        writer.flush()?;
        info!("saved regression tree ({} nodes) to {}", self.len(), filename);
        Ok(())
    }

    /// Load a model saved by [`RegressionTree::save_model`].
    pub fn load_model(filename: &str) -> Result<Self> {
        let mut reader = BufReader::new(File::open(Path::new(filename))?);
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let tree = RegressionTree::from_bytes(&bytes)?;
        info!("loaded regression tree ({} nodes) from {}", tree.len(), filename);
        Ok(tree)
    }
}
