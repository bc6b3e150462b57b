//! Arena of branch-and-bound nodes.

use super::{BranchNode, NodeId};

/// Owns every node created during a branch-and-price run.
///
/// Nodes are addressed by [`NodeId`] and only reference their parent, so
/// sibling subtrees share nothing mutable.
///
/// # Example
/// ```
/// use u_batching::branching::BranchTree;
///
/// let mut tree = BranchTree::new(4);
/// let (together, apart) = tree.branch_pair(tree.root(), 0, 3);
/// assert_eq!(tree.node(together).active_groups().count(), 1);
/// assert!(tree.node(apart).is_disjoint(0, 3));
/// assert_eq!(tree.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct BranchTree {
    nodes: Vec<BranchNode>,
}

impl BranchTree {
    /// Creates a tree holding only the unconstrained root.
    pub fn new(n_jobs: usize) -> Self {
        Self {
            nodes: vec![BranchNode::root(n_jobs)],
        }
    }

    /// Root node id.
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Looks up a node.
    ///
    /// # Panics
    /// If `id` was not issued by this tree.
    #[inline]
    pub fn node(&self, id: NodeId) -> &BranchNode {
        &self.nodes[id.0]
    }

    /// Looks up a node, returning `None` for foreign ids.
    pub fn get(&self, id: NodeId) -> Option<&BranchNode> {
        self.nodes.get(id.0)
    }

    /// Number of nodes, root included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: the root exists from construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a child of `parent` where `a` and `b` share a batch.
    pub fn branch_together(&mut self, parent: NodeId, a: usize, b: usize) -> NodeId {
        let id = NodeId(self.nodes.len());
        let child = self.node(parent).child_together(id, a, b);
        self.nodes.push(child);
        id
    }

    /// Adds a child of `parent` where `a` and `b` never share a batch.
    pub fn branch_apart(&mut self, parent: NodeId, a: usize, b: usize) -> NodeId {
        let id = NodeId(self.nodes.len());
        let child = self.node(parent).child_apart(id, a, b);
        self.nodes.push(child);
        id
    }

    /// Adds both children of a pair branching on `(a, b)`.
    ///
    /// Returns `(together, apart)`.
    pub fn branch_pair(&mut self, parent: NodeId, a: usize, b: usize) -> (NodeId, NodeId) {
        let together = self.branch_together(parent, a, b);
        let apart = self.branch_apart(parent, a, b);
        (together, apart)
    }

    /// Ids from `id` up to the root, following parent links.
    pub fn path(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = vec![id];
        let mut current = self.node(id).parent();
        while let Some(p) = current {
            path.push(p);
            current = self.node(p).parent();
        }
        path
    }
}
