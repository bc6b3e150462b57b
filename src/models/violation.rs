//! Invariant violations.
//!
//! A violation is a logic defect (a cache out of sync, a job covered twice,
//! a column that breaks the active branching constraints). Violations are
//! reported, never repaired; callers treat any of them as fatal.

use thiserror::Error;

/// A broken batch or solution invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    /// Cached batch load differs from the recomputed sum.
    #[error("cached processing time {cached} differs from recomputed {actual}")]
    ProcessingTimeMismatch {
        /// Value stored in the batch.
        cached: u64,
        /// Sum of member processing times.
        actual: u64,
    },
    /// Batch load is larger than the slot length `T`.
    #[error("batch load {load} exceeds capacity {capacity}")]
    CapacityExceeded {
        /// Recomputed batch load.
        load: u64,
        /// Instance capacity `T`.
        capacity: u64,
    },
    /// A batch refers to a job index outside the instance.
    #[error("job {job} does not exist")]
    UnknownJob {
        /// Offending job index.
        job: usize,
    },
    /// A job is listed more than once inside a single batch.
    #[error("job {job} is listed twice in one batch")]
    DuplicateJob {
        /// Offending job index.
        job: usize,
    },
    /// A job is not covered exactly once by a solution.
    #[error("job {job} is covered {count} times, expected exactly once")]
    JobCoverage {
        /// Offending job index.
        job: usize,
        /// Number of batches containing the job.
        count: usize,
    },
    /// A batch holds part, but not all, of an equality group.
    #[error("equality group {group:?} is split across batches")]
    EqualityGroupSplit {
        /// Members of the split group.
        group: Vec<usize>,
    },
    /// A batch holds both jobs of a disjoint pair.
    #[error("jobs {a} and {b} must not share a batch")]
    DisjointPairTogether {
        /// First job of the pair.
        a: usize,
        /// Second job of the pair.
        b: usize,
    },
}

/// Emits every violation through `tracing` and returns whether none occurred.
pub(crate) fn report(context: &str, result: Result<(), Vec<Violation>>) -> bool {
    match result {
        Ok(()) => true,
        Err(violations) => {
            for v in &violations {
                tracing::error!(%v, "{context}");
            }
            false
        }
    }
}
