//! This module implements a simple n-ary tree arena.
//!
//! The tree supports inserting and retriving elements.
//! Deleteing an element is not supported.
//!
//! All nodes of one tree live in a single [std::vec::Vec](https://doc.rust-lang.org/std/vec/struct.Vec.html).
//! A node's index is handed out sequentially at insertion and doubles as its
//! id, so ids are unique within one tree and no global counter is involved.

/// Node of the tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaNode<T> {
    /// Store information in a node.
    pub value: T,

    /// the index of the node in the arena.
    index: TreeIndex,

    /// Indexes of the children, in insertion order.
    children: Vec<TreeIndex>,
}

impl<T> ArenaNode<T> {
    /// New a node with given value
    ///
    /// # Example
    /// ```
    /// use regtree::arena::ArenaNode;
    /// let root = ArenaNode::new(10.0);
    /// println!("{}", root.value);
    /// ```
    pub fn new(value: T) -> Self {
        ArenaNode {
            value,
            index: 0,
            children: Vec::new(),
        }
    }

    /// The index (id) of this node.
    pub fn index(&self) -> TreeIndex {
        self.index
    }

    /// Indexes of the children, in insertion order.
    pub fn children(&self) -> &[TreeIndex] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// The index to retrive the tree node. Always get the index value from [`TreeArena`] APIs.
/// Don't directly assign a value to an index.
///
/// [`TreeArena`]: struct.TreeArena.html
pub type TreeIndex = usize;

/// The tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeArena<T> {
    tree: Vec<ArenaNode<T>>,
}

impl<T> Default for TreeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TreeArena<T> {
    /// build a new empty tree
    pub fn new() -> Self {
        TreeArena { tree: Vec::new() }
    }

    /// Add a node as the root node. Return the index of the root node.
    /// # Example
    ///
    /// ``` rust
    /// use regtree::arena::{TreeArena, ArenaNode};
    /// let mut tree: TreeArena<f32> = TreeArena::new();
    /// let root = ArenaNode::new(10.0);
    /// let root_index = tree.add_root(root);
    /// assert_eq!(root_index, tree.get_root_index());
    /// ```
    pub fn add_root(&mut self, root: ArenaNode<T>) -> TreeIndex {
        self.add_node(None, root)
    }

    /// Return the index of the root node.
    /// Call this API after inserting root node.
    pub fn get_root_index(&self) -> TreeIndex {
        0
    }

    /// Return the `nth` child of the given `node`
    /// # Example
    ///
    /// ``` rust
    /// use regtree::arena::{TreeArena, ArenaNode};
    /// let mut tree: TreeArena<f32> = TreeArena::new();
    /// let root_index = tree.add_root(ArenaNode::new(10.0));
    /// let _ = tree.add_child(root_index, ArenaNode::new(5.0));
    /// let root = tree.get_node(root_index).expect("Didn't find root node");
    /// let child = tree.get_child(root, 0).expect("Didn't find child");
    /// assert_eq!(5.0, child.value);
    /// ```
    pub fn get_child(&self, node: &ArenaNode<T>, nth: usize) -> Option<&ArenaNode<T>> {
        node.children.get(nth).and_then(|index| self.tree.get(*index))
    }

    /// Return the node with the given index
    pub fn get_node(&self, index: TreeIndex) -> Option<&ArenaNode<T>> {
        self.tree.get(index)
    }

    /// Add a node as the last child of a given `parent` node. Return the index of the added node.
    /// # Example
    ///
    /// ``` rust
    /// use regtree::arena::{TreeArena, ArenaNode};
    /// let mut tree: TreeArena<i32> = TreeArena::new();
    /// let root_index = tree.add_root(ArenaNode::new(1));
    /// let a = tree.add_child(root_index, ArenaNode::new(2));
    /// let b = tree.add_child(root_index, ArenaNode::new(3));
    /// let root = tree.get_node(root_index).unwrap();
    /// assert_eq!(root.children(), &[a, b]);
    /// ```
    pub fn add_child(&mut self, parent: TreeIndex, child: ArenaNode<T>) -> TreeIndex {
        self.add_node(Some(parent), child)
    }

    /// The implmentation of adding a node to the tree. Return the index of the added node.
    /// The first node ever added becomes the root regardless of `parent`.
    fn add_node(&mut self, parent: Option<TreeIndex>, mut child: ArenaNode<T>) -> TreeIndex {
        let position = self.tree.len();
        child.index = position;
        child.children.clear();
        self.tree.push(child);

        if position == 0 {
            return position;
        }
        if let Some(n) = parent.and_then(|p| self.tree.get_mut(p)) {
            n.children.push(position);
        }
        position
    }

    /// Iterate over the nodes in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, ArenaNode<T>> {
        self.tree.iter()
    }

    /// Depth-first pre-order walk from the root, yielding `(depth, node)`.
    /// The root has depth 0.
    pub fn walk(&self) -> Vec<(usize, &ArenaNode<T>)> {
        let mut out = Vec::with_capacity(self.tree.len());
        let mut stack: Vec<(usize, &ArenaNode<T>)> = Vec::new();
        if let Some(root) = self.get_node(self.get_root_index()) {
            stack.push((0, root));
        }
        while let Some((deep, node)) = stack.pop() {
            out.push((deep, node));
            for index in node.children.iter().rev() {
                if let Some(child) = self.tree.get(*index) {
                    stack.push((deep + 1, child));
                }
            }
        }
        out
    }

    /// For debug use. This API will print the whole tree.
    ///
    /// // Output:
    /// //----10.0
    /// //    ----5.0
    /// //    ----6.0
    pub fn print(&self)
    where
        T: std::fmt::Debug,
    {
        for (deep, node) in self.walk() {
            for _i in 0..deep {
                print!("    ");
            }
            println!("----{:?}", node.value);
        }
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}
