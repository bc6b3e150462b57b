//! Branch-and-bound node.
//!
//! A node carries the logical constraints accumulated from the root:
//! equality groups (jobs that must share a batch) and disjoint pairs (jobs
//! that must not). Constraints are flattened when a node is created, so a
//! node never reads its ancestors and never changes afterwards.
//!
//! # Reference
//! Ryan & Foster (1981), "An integer programming approach to scheduling"

use serde::{Deserialize, Serialize};

/// Index of a node inside a [`BranchTree`](super::BranchTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One node of the branch-and-bound tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchNode {
    id: NodeId,
    parent: Option<NodeId>,
    depth: usize,
    n_jobs: usize,
    /// Sorted job groups; inactive ones are flagged in `removed_groups`.
    equality_groups: Vec<Vec<usize>>,
    removed_groups: Vec<bool>,
    /// Row-major symmetric `n_jobs × n_jobs` matrix.
    disjoint: Vec<bool>,
}

impl BranchNode {
    /// Creates an unconstrained root node.
    pub fn root(n_jobs: usize) -> Self {
        Self {
            id: NodeId(0),
            parent: None,
            depth: 0,
            n_jobs,
            equality_groups: Vec::new(),
            removed_groups: Vec::new(),
            disjoint: vec![false; n_jobs * n_jobs],
        }
    }

    /// Node identifier.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Parent node, `None` at the root.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Distance from the root.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of jobs the constraints range over.
    #[inline]
    pub fn n_jobs(&self) -> usize {
        self.n_jobs
    }

    /// All equality groups ever recorded, including removed ones.
    pub fn equality_groups(&self) -> &[Vec<usize>] {
        &self.equality_groups
    }

    /// Whether group `index` is no longer active.
    pub fn is_removed(&self, index: usize) -> bool {
        self.removed_groups.get(index).copied().unwrap_or(true)
    }

    /// Equality groups still in force.
    pub fn active_groups(&self) -> impl Iterator<Item = &[usize]> + '_ {
        self.equality_groups
            .iter()
            .zip(&self.removed_groups)
            .filter(|(_, removed)| !**removed)
            .map(|(group, _)| group.as_slice())
    }

    /// Index of the active group holding `job`.
    pub fn group_of(&self, job: usize) -> Option<usize> {
        self.equality_groups
            .iter()
            .enumerate()
            .find(|(i, group)| !self.removed_groups[*i] && group.contains(&job))
            .map(|(i, _)| i)
    }

    /// Whether `a` and `b` are forbidden from sharing a batch.
    #[inline]
    pub fn is_disjoint(&self, a: usize, b: usize) -> bool {
        a < self.n_jobs && b < self.n_jobs && self.disjoint[a * self.n_jobs + b]
    }

    /// Disjoint pairs `(a, b)` with `a < b`.
    pub fn disjoint_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.n_jobs;
        (0..n).flat_map(move |a| {
            (a + 1..n)
                .filter(move |&b| self.disjoint[a * n + b])
                .map(move |b| (a, b))
        })
    }

    /// Whether any constraint restricts batch composition.
    pub fn has_constraints(&self) -> bool {
        self.active_groups().any(|g| g.len() > 1) || self.disjoint.iter().any(|&d| d)
    }

    /// Whether no active group contains a disjoint pair.
    ///
    /// An inconsistent node admits no batch containing that group and can be
    /// pruned by the driver.
    pub fn is_consistent(&self) -> bool {
        self.active_groups().all(|group| {
            group
                .iter()
                .enumerate()
                .all(|(i, &a)| group[i + 1..].iter().all(|&b| !self.is_disjoint(a, b)))
        })
    }

    /// Whether this node demands strict (`< 0`) reduced-cost acceptance.
    pub fn is_strict(&self, strict_node_id: Option<usize>) -> bool {
        strict_node_id == Some(self.id.0)
    }

    /// Child forcing `a` and `b` into the same batch.
    pub(crate) fn child_together(&self, id: NodeId, a: usize, b: usize) -> Self {
        let mut child = self.child(id);
        let mut merged = vec![a, b];
        for job in [a, b] {
            if let Some(g) = child.group_of(job) {
                merged.extend_from_slice(&child.equality_groups[g]);
                child.removed_groups[g] = true;
            }
        }
        merged.sort_unstable();
        merged.dedup();
        child.equality_groups.push(merged);
        child.removed_groups.push(false);
        child
    }

    /// Child forbidding `a` and `b` (and their groups) from sharing a batch.
    pub(crate) fn child_apart(&self, id: NodeId, a: usize, b: usize) -> Self {
        let mut child = self.child(id);
        let side_a = child.members(a);
        let side_b = child.members(b);
        let n = child.n_jobs;
        for &x in &side_a {
            for &y in &side_b {
                if x != y {
                    child.disjoint[x * n + y] = true;
                    child.disjoint[y * n + x] = true;
                }
            }
        }
        child
    }

    fn child(&self, id: NodeId) -> Self {
        Self {
            id,
            parent: Some(self.id),
            depth: self.depth + 1,
            ..self.clone()
        }
    }

    /// `job` together with every job of its active group.
    fn members(&self, job: usize) -> Vec<usize> {
        match self.group_of(job) {
            Some(g) => self.equality_groups[g].clone(),
            None => vec![job],
        }
    }
}
