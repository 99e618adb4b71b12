//! Lineage tree: samples hung under the chain of quadrant prefixes they
//! share.
//!
//! Nodes live in a flat arena and refer to each other by index, so parent
//! and child navigation is O(1) and there are no reference cycles.

use crate::compute::lineage::LineageTable;
use quadlineage_types::lineage::LineagePath;
use rustc_hash::FxHashMap;

/// Index of a node in its tree's arena.
pub type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    /// A quadrant prefix such as `"3.1"`
    Internal,
    /// A sample
    Leaf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub label: Option<String>,
    pub length: Option<f64>,
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl TreeNode {
    fn new(kind: NodeKind, label: Option<String>, parent: Option<NodeId>) -> Self {
        Self {
            label,
            length: None,
            kind,
            parent,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.kind == NodeKind::Leaf
    }

    pub fn is_root(&self) -> bool {
        self.kind == NodeKind::Root
    }
}

/// Rooted, multi-way tree over sample identifiers.
#[derive(Debug, Clone)]
pub struct LineageTree {
    nodes: Vec<TreeNode>,
    leaves: FxHashMap<String, NodeId>,
}

impl LineageTree {
    pub const ROOT: NodeId = 0;

    fn empty() -> Self {
        Self {
            nodes: vec![TreeNode::new(NodeKind::Root, None, None)],
            leaves: FxHashMap::default(),
        }
    }

    /// Build the tree from `(sample_id, deepest lineage)` pairs.
    ///
    /// One internal node is created per distinct prefix, labelled with the
    /// prefix (`"3"`, `"3.1"`, ...); each sample becomes a leaf below the node
    /// of its full path. Branch lengths are left unset.
    ///
    /// # Examples
    ///
    /// ```
    /// use quadlineage::compute::tree::LineageTree;
    /// use quadlineage_types::lineage::LineagePath;
    ///
    /// let a = LineagePath::parse("3.1.").unwrap();
    /// let b = LineagePath::parse("3.3.").unwrap();
    /// let tree = LineageTree::from_lineages([("a", &a), ("b", &b)]);
    ///
    /// assert_eq!(tree.leaf_count(), 2);
    /// assert_eq!(tree.path_labels("a").unwrap(), vec!["3", "3.1"]);
    /// // "3" plus its two children plus two leaves plus the root
    /// assert_eq!(tree.len(), 6);
    /// ```
    pub fn from_lineages<'a, I>(lineages: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a LineagePath)>,
    {
        let mut tree = Self::empty();
        let mut prefixes: FxHashMap<String, NodeId> = FxHashMap::default();

        for (sample_id, lineage) in lineages {
            let mut parent = Self::ROOT;
            for k in 1..=lineage.depth() {
                let Some(prefix) = lineage.truncate(k) else {
                    break;
                };
                parent = match prefixes.get(&prefix) {
                    Some(&id) => id,
                    None => {
                        let id = tree.push(NodeKind::Internal, Some(prefix.clone()), parent);
                        prefixes.insert(prefix, id);
                        id
                    }
                };
            }

            let leaf = tree.push(NodeKind::Leaf, Some(sample_id.to_string()), parent);
            if tree.leaves.insert(sample_id.to_string(), leaf).is_some() {
                log::warn!("Sample {} appears more than once in the lineages", sample_id);
            }
        }

        log::debug!(
            "Built lineage tree with {} nodes and {} leaves",
            tree.nodes.len(),
            tree.leaves.len()
        );
        tree
    }

    /// Build the tree from a lineage table's deepest paths.
    pub fn from_table(table: &LineageTable) -> Self {
        Self::from_lineages(table.lineages())
    }

    fn push(&mut self, kind: NodeKind, label: Option<String>, parent: NodeId) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(TreeNode::new(kind, label, Some(parent)));
        self.nodes[parent].children.push(id);
        id
    }

    /// Give every node that has no branch length the given one.
    pub fn assign_default_lengths(&mut self, length: f64) {
        for node in self.nodes.iter_mut().filter(|n| n.length.is_none()) {
            node.length = Some(length);
        }
    }

    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    /// Total number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Never true: a tree always has its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    /// Leaf of a sample.
    pub fn find(&self, sample_id: &str) -> Option<NodeId> {
        self.leaves.get(sample_id).copied()
    }

    /// All node ids in preorder, parents before children.
    pub fn traverse(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![Self::ROOT];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id].children.iter().rev());
        }
        order
    }

    /// Preorder iterator over `(id, node)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &TreeNode)> + '_ {
        self.traverse().into_iter().map(move |id| (id, &self.nodes[id]))
    }

    /// Ids of the node's ancestors, nearest first, root last.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.nodes.get(id).and_then(|n| n.parent);
        while let Some(parent) = current {
            out.push(parent);
            current = self.nodes[parent].parent;
        }
        out
    }

    /// Labels of the internal nodes between the root and a sample's leaf,
    /// top level first. These equal the sample's split-depth values.
    pub fn path_labels(&self, sample_id: &str) -> Option<Vec<&str>> {
        let leaf = self.find(sample_id)?;
        let mut labels: Vec<&str> = self
            .ancestors(leaf)
            .into_iter()
            .filter(|&id| self.nodes[id].kind == NodeKind::Internal)
            .filter_map(|id| self.nodes[id].label.as_deref())
            .collect();
        labels.reverse();
        Some(labels)
    }

    /// Samples below a node, in preorder.
    pub fn tips(&self, id: NodeId) -> Vec<&str> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            if node.is_leaf() {
                out.extend(node.label.as_deref());
            }
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Sets of sample ids below each internal node. Two trees over the same
    /// samples group them identically iff these sets are equal.
    pub fn subsets(&self) -> Vec<Vec<String>> {
        let mut sets: Vec<Vec<String>> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.kind == NodeKind::Internal)
            .map(|(id, _)| {
                let mut tips: Vec<String> = self.tips(id).into_iter().map(String::from).collect();
                tips.sort();
                tips
            })
            .collect();
        sets.sort();
        sets
    }
}
