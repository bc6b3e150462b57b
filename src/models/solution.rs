//! Solution model.
//!
//! A solution is an ordered sequence of batches. Every batch but the last
//! holds the machine for a full slot `T + t`; the last one releases it as
//! soon as its own jobs are done, so
//!
//! ```text
//! makespan = (T + t) * (k - 1) + load(last)      (k = batch count, 0 if empty)
//! ```

use serde::{Deserialize, Serialize};

use super::violation::{report, Violation};
use super::{Batch, Instance};

/// Ordered batches covering the jobs of an instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    batches: Vec<Batch>,
}

impl Solution {
    /// Creates an empty solution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an ordered list of batches.
    pub fn from_batches(batches: Vec<Batch>) -> Self {
        Self { batches }
    }

    /// Batches in processing order.
    #[inline]
    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    /// Mutable access to the batches. The sequence itself cannot grow or
    /// shrink through this view.
    #[inline]
    pub fn batches_mut(&mut self) -> &mut [Batch] {
        &mut self.batches
    }

    /// Appends a batch at the end of the sequence.
    pub fn push(&mut self, batch: Batch) {
        self.batches.push(batch);
    }

    /// Number of batches.
    #[inline]
    pub fn len(&self) -> usize {
        self.batches.len()
    }

    /// Whether the solution holds no batch.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Consumes the solution, returning its batches.
    pub fn into_batches(self) -> Vec<Batch> {
        self.batches
    }

    /// Makespan derived from the batch sequence.
    pub fn makespan(&self, instance: &Instance) -> u64 {
        match self.batches.last() {
            None => 0,
            Some(last) => {
                instance.slot_length() * (self.batches.len() as u64 - 1) + last.processing_time()
            }
        }
    }

    /// Load of each batch, in order.
    pub fn loads(&self) -> Vec<u64> {
        self.batches.iter().map(Batch::processing_time).collect()
    }

    /// Reorders batches by descending load (stable), leaving the lightest last.
    pub fn sort_by_load_desc(&mut self) {
        self.batches
            .sort_by(|a, b| b.processing_time().cmp(&a.processing_time()));
    }

    /// Drops empty batches, returning how many were removed.
    pub fn prune_empty(&mut self) -> usize {
        let before = self.batches.len();
        self.batches.retain(|b| !b.is_empty());
        before - self.batches.len()
    }

    /// Drops every repeated occurrence of a job, keeping the first one in
    /// batch order, then prunes batches left empty.
    ///
    /// Used to turn an overlapping column selection into a partition.
    pub fn reconstruct(&mut self, instance: &Instance) {
        let mut seen = vec![false; instance.n_jobs()];
        for batch in &mut self.batches {
            let repeated: Vec<usize> = batch
                .jobs()
                .iter()
                .copied()
                .filter(|&job| std::mem::replace(&mut seen[job], true))
                .collect();
            for job in repeated {
                batch.remove(instance, job);
            }
        }
        self.prune_empty();
    }

    /// Checks every batch and that each job is covered exactly once.
    ///
    /// # Returns
    /// `Ok(())` if the solution is a feasible partition, `Err(violations)` otherwise.
    pub fn check_feasibility(&self, instance: &Instance) -> Result<(), Vec<Violation>> {
        let mut violations = Vec::new();
        let mut visits = vec![0usize; instance.n_jobs()];

        for batch in &self.batches {
            if let Err(mut errs) = batch.check_feasibility(instance) {
                violations.append(&mut errs);
            }
            for &job in batch.jobs() {
                if let Some(count) = visits.get_mut(job) {
                    *count += 1;
                }
            }
        }

        for (job, &count) in visits.iter().enumerate() {
            if count != 1 {
                violations.push(Violation::JobCoverage { job, count });
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// Like [`Solution::check_feasibility`], logging each violation.
    pub fn is_feasible(&self, instance: &Instance) -> bool {
        report("infeasible solution", self.check_feasibility(instance))
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "batches: {}", self.batches.len())?;
        let last = self.batches.len().saturating_sub(1);
        for (i, batch) in self.batches.iter().enumerate() {
            if i == last {
                writeln!(f, "last batch: {batch}")?;
            } else {
                writeln!(f, "batch {i}: {batch}")?;
            }
        }
        Ok(())
    }
}
