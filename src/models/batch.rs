//! Batch (column) model.
//!
//! A batch is the set of jobs processed together in one machine slot. It is
//! the column the pricing oracle hands to the master problem and the unit the
//! heuristics move jobs between.
//!
//! # Invariant
//! `processing_time` always equals the sum of the member processing times.
//! The job list is private; every mutation goes through [`Batch::add`],
//! [`Batch::remove`] or [`Batch::replace`], which keep the cache in sync.

use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::violation::{report, Violation};
use super::Instance;
use crate::branching::BranchNode;

/// A set of jobs sharing one machine slot.
///
/// Jobs keep their insertion order for deterministic iteration, but two
/// batches compare equal whenever they hold the same job set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Batch {
    jobs: Vec<usize>,
    processing_time: u64,
}

impl Batch {
    /// Creates an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a batch holding `jobs`, computing the load from `instance`.
    ///
    /// # Panics
    /// If a job index is out of range for `instance`.
    pub fn from_jobs(instance: &Instance, jobs: Vec<usize>) -> Self {
        let processing_time = jobs.iter().map(|&j| instance.processing_time(j)).sum();
        Self {
            jobs,
            processing_time,
        }
    }

    /// Member jobs in iteration order.
    #[inline]
    pub fn jobs(&self) -> &[usize] {
        &self.jobs
    }

    /// Cached load (sum of member processing times).
    #[inline]
    pub fn processing_time(&self) -> u64 {
        self.processing_time
    }

    /// Number of jobs.
    #[inline]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether the batch holds no job.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Whether `job` is a member.
    pub fn contains(&self, job: usize) -> bool {
        self.jobs.contains(&job)
    }

    /// Canonical, order-free view of the member jobs.
    pub fn job_set(&self) -> BTreeSet<usize> {
        self.jobs.iter().copied().collect()
    }

    /// Appends `job` and adds its processing time to the load.
    ///
    /// The caller must not add a job that is already a member; doing so
    /// double counts it, which [`Batch::check_feasibility`] reports.
    pub fn add(&mut self, instance: &Instance, job: usize) {
        self.jobs.push(job);
        self.processing_time += instance.processing_time(job);
    }

    /// Removes the first occurrence of `job` (by value).
    ///
    /// Returns `false` and leaves the batch untouched if `job` is absent.
    pub fn remove(&mut self, instance: &Instance, job: usize) -> bool {
        match self.jobs.iter().position(|&j| j == job) {
            Some(pos) => {
                self.jobs.remove(pos);
                self.processing_time -= instance.processing_time(job);
                true
            }
            None => false,
        }
    }

    /// Puts `job` at `position`, returning the job it displaced.
    ///
    /// # Panics
    /// If `position >= len()`.
    pub fn replace(&mut self, instance: &Instance, position: usize, job: usize) -> usize {
        let old = std::mem::replace(&mut self.jobs[position], job);
        self.processing_time = self.processing_time - instance.processing_time(old)
            + instance.processing_time(job);
        old
    }

    /// Whether `job` fits in the remaining capacity.
    #[inline]
    pub fn can_pack(&self, instance: &Instance, job: usize) -> bool {
        instance.processing_time(job) + self.processing_time <= instance.capacity
    }

    /// Whether not even the shortest job of the instance fits any more.
    pub fn no_more_to_pack(&self, instance: &Instance) -> bool {
        instance.min_processing_time() + self.processing_time > instance.capacity
    }

    /// Sorts members by descending processing time (ties keep their order).
    pub fn sort_by_processing_time(&mut self, instance: &Instance) {
        self.jobs
            .sort_by(|&a, &b| instance.processing_time(b).cmp(&instance.processing_time(a)));
    }

    /// Reduced cost of this column under the master's dual prices.
    ///
    /// `(T + t) - duals[n] - duals[n + 1] - Σ duals[job]`, where the two
    /// trailing entries are the batch-count and capacity-slack duals.
    ///
    /// # Panics
    /// If `duals` is shorter than `n_jobs + 2`.
    pub fn reduced_cost(&self, instance: &Instance, duals: &[f64]) -> f64 {
        let n = instance.n_jobs();
        let base = instance.slot_length() as f64 - duals[n] - duals[n + 1];
        self.jobs.iter().fold(base, |rc, &job| rc - duals[job])
    }

    /// Checks membership, the load cache and the capacity.
    ///
    /// # Returns
    /// `Ok(())` if the batch is sound, `Err(violations)` with every problem found.
    pub fn check_feasibility(&self, instance: &Instance) -> Result<(), Vec<Violation>> {
        let mut violations = Vec::new();
        let mut seen = BTreeSet::new();
        let mut actual = 0u64;

        for &job in &self.jobs {
            if job >= instance.n_jobs() {
                violations.push(Violation::UnknownJob { job });
                continue;
            }
            if !seen.insert(job) {
                violations.push(Violation::DuplicateJob { job });
            }
            actual += instance.processing_time(job);
        }

        if actual != self.processing_time {
            violations.push(Violation::ProcessingTimeMismatch {
                cached: self.processing_time,
                actual,
            });
        }
        if actual > instance.capacity {
            violations.push(Violation::CapacityExceeded {
                load: actual,
                capacity: instance.capacity,
            });
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// Like [`Batch::check_feasibility`], logging each violation.
    pub fn is_feasible(&self, instance: &Instance) -> bool {
        report("infeasible batch", self.check_feasibility(instance))
    }

    /// Checks the batch against the branching constraints of `node`.
    ///
    /// Every active equality group must be fully inside or fully outside,
    /// and no disjoint pair may be inside together.
    pub fn check_branching(&self, node: &BranchNode) -> Result<(), Vec<Violation>> {
        let mut violations = Vec::new();

        for group in node.active_groups() {
            if group.len() < 2 {
                continue;
            }
            let inside = group.iter().filter(|&&j| self.contains(j)).count();
            if inside != 0 && inside != group.len() {
                violations.push(Violation::EqualityGroupSplit {
                    group: group.to_vec(),
                });
            }
        }

        let members = self.job_set();
        for (i, &a) in members.iter().enumerate() {
            for &b in members.iter().skip(i + 1) {
                if node.is_disjoint(a, b) {
                    violations.push(Violation::DisjointPairTogether { a, b });
                }
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// Like [`Batch::check_branching`], logging each violation.
    pub fn is_feasible_at(&self, node: &BranchNode) -> bool {
        report("batch violates branching constraints", self.check_branching(node))
    }
}

impl PartialEq for Batch {
    fn eq(&self, other: &Self) -> bool {
        self.job_set() == other.job_set()
    }
}

impl Eq for Batch {}

impl Hash for Batch {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.job_set().hash(state);
    }
}

impl std::fmt::Display for Batch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "jobs: {:?} load: {}", self.jobs, self.processing_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branching::BranchTree;
    use std::collections::HashSet;

    fn sample_instance() -> Instance {
        Instance::new(vec![2, 3, 4, 5], 10, 2)
    }

    fn assert_load_consistent(batch: &Batch, inst: &Instance) {
        let sum: u64 = batch.jobs().iter().map(|&j| inst.processing_time(j)).sum();
        assert_eq!(batch.processing_time(), sum);
    }

    #[test]
    fn test_add_remove_keep_load() {
        let inst = sample_instance();
        let mut b = Batch::new();
        b.add(&inst, 0);
        assert_load_consistent(&b, &inst);
        b.add(&inst, 3);
        assert_load_consistent(&b, &inst);
        assert_eq!(b.processing_time(), 7);

        assert!(b.remove(&inst, 0));
        assert_load_consistent(&b, &inst);
        assert_eq!(b.jobs(), &[3]);

        assert!(!b.remove(&inst, 2));
        assert_load_consistent(&b, &inst);
        assert_eq!(b.processing_time(), 5);
    }

    #[test]
    fn test_replace_keeps_load() {
        let inst = sample_instance();
        let mut b = Batch::from_jobs(&inst, vec![0, 1]);
        let old = b.replace(&inst, 0, 3);
        assert_eq!(old, 0);
        assert_eq!(b.jobs(), &[3, 1]);
        assert_load_consistent(&b, &inst);
        assert_eq!(b.processing_time(), 8);
    }

    #[test]
    fn test_can_pack_and_no_more_to_pack() {
        let inst = sample_instance();
        let mut b = Batch::from_jobs(&inst, vec![3, 1]); // load 8
        assert!(b.can_pack(&inst, 0));
        assert!(!b.can_pack(&inst, 2));
        assert!(!b.no_more_to_pack(&inst));

        b.add(&inst, 0); // load 10
        assert!(b.no_more_to_pack(&inst));
    }

    #[test]
    fn test_equality_ignores_order() {
        let inst = sample_instance();
        let a = Batch::from_jobs(&inst, vec![0, 2, 3]);
        let b = Batch::from_jobs(&inst, vec![3, 0, 2]);
        let c = Batch::from_jobs(&inst, vec![0, 2]);
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<Batch> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_sort_by_processing_time() {
        let inst = sample_instance();
        let mut b = Batch::from_jobs(&inst, vec![0, 3, 1]);
        b.sort_by_processing_time(&inst);
        assert_eq!(b.jobs(), &[3, 1, 0]);
    }

    #[test]
    fn test_reduced_cost() {
        let inst = sample_instance();
        let duals = [1.0, 2.0, 3.0, 4.0, 0.5, 1.5];
        let b = Batch::from_jobs(&inst, vec![1, 3]);
        // (10 + 2) - 0.5 - 1.5 - 2 - 4
        assert!((b.reduced_cost(&inst, &duals) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_feasible_batch() {
        let inst = sample_instance();
        let b = Batch::from_jobs(&inst, vec![0, 1, 3]);
        assert!(b.check_feasibility(&inst).is_ok());
        assert!(b.is_feasible(&inst));
    }

    #[test]
    fn test_capacity_exceeded() {
        let inst = sample_instance();
        let b = Batch::from_jobs(&inst, vec![1, 2, 3]);
        let errors = b.check_feasibility(&inst).unwrap_err();
        assert_eq!(
            errors,
            vec![Violation::CapacityExceeded {
                load: 12,
                capacity: 10
            }]
        );
    }

    #[test]
    fn test_stale_cache_detected() {
        let inst = sample_instance();
        let b: Batch = serde_json::from_str(r#"{"jobs":[0,1],"processing_time":4}"#).unwrap();
        let errors = b.check_feasibility(&inst).unwrap_err();
        assert!(errors.contains(&Violation::ProcessingTimeMismatch {
            cached: 4,
            actual: 5
        }));
    }

    #[test]
    fn test_duplicate_insertion_detected() {
        let inst = sample_instance();
        let mut b = Batch::new();
        b.add(&inst, 1);
        b.add(&inst, 1);
        let errors = b.check_feasibility(&inst).unwrap_err();
        assert!(errors.contains(&Violation::DuplicateJob { job: 1 }));
    }

    #[test]
    fn test_unknown_job_detected() {
        let inst = sample_instance();
        let b: Batch = serde_json::from_str(r#"{"jobs":[7],"processing_time":0}"#).unwrap();
        let errors = b.check_feasibility(&inst).unwrap_err();
        assert_eq!(errors, vec![Violation::UnknownJob { job: 7 }]);
    }

    #[test]
    fn test_branching_feasibility() {
        let inst = sample_instance();
        let mut tree = BranchTree::new(inst.n_jobs());
        let together = tree.branch_together(tree.root(), 0, 1);
        let apart = tree.branch_apart(together, 2, 3);
        let node = tree.node(apart);

        assert!(Batch::from_jobs(&inst, vec![0, 1, 2]).is_feasible_at(node));
        assert!(Batch::from_jobs(&inst, vec![3]).is_feasible_at(node));

        let split = Batch::from_jobs(&inst, vec![0, 3]);
        assert_eq!(
            split.check_branching(node).unwrap_err(),
            vec![Violation::EqualityGroupSplit { group: vec![0, 1] }]
        );

        let clash = Batch::from_jobs(&inst, vec![3, 2]);
        assert_eq!(
            clash.check_branching(node).unwrap_err(),
            vec![Violation::DisjointPairTogether { a: 2, b: 3 }]
        );
    }
}
