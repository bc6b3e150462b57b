//! Problem instance model.
//!
//! An instance describes a single batching machine: a set of jobs with
//! processing times, the fixed slot length `T` every batch occupies, and the
//! changeover `t` inserted between consecutive batches.
//!
//! # Reference
//! Potts & Kovalyov (2000), "Scheduling with batching: A review"

use serde::{Deserialize, Serialize};

/// Immutable batching-machine instance.
///
/// Jobs are addressed by their index into `processing_times`.
///
/// # Time Representation
/// Times are integral and unit-free. The consumer decides whether a unit is
/// a second, a minute or a furnace cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    /// Processing time per job (index = job id).
    pub processing_times: Vec<u64>,
    /// Batch capacity `T`: the slot length of every batch.
    pub capacity: u64,
    /// Changeover time `t` between consecutive batches.
    pub changeover: u64,
}

impl Instance {
    /// Creates an instance from processing times, capacity `T` and changeover `t`.
    pub fn new(processing_times: Vec<u64>, capacity: u64, changeover: u64) -> Self {
        Self {
            processing_times,
            capacity,
            changeover,
        }
    }

    /// Number of jobs.
    #[inline]
    pub fn n_jobs(&self) -> usize {
        self.processing_times.len()
    }

    /// Processing time of `job`.
    ///
    /// # Panics
    /// If `job >= n_jobs()`.
    #[inline]
    pub fn processing_time(&self, job: usize) -> u64 {
        self.processing_times[job]
    }

    /// Machine time charged to every batch that is not the last: `T + t`.
    #[inline]
    pub fn slot_length(&self) -> u64 {
        self.capacity + self.changeover
    }

    /// Smallest processing time over all jobs (0 for an empty instance).
    pub fn min_processing_time(&self) -> u64 {
        self.processing_times.iter().copied().min().unwrap_or(0)
    }

    /// Sum of all processing times.
    pub fn total_processing_time(&self) -> u64 {
        self.processing_times.iter().sum()
    }

    /// Trivial lower bound on the number of batches: `ceil(Σp / T)`.
    ///
    /// Returns 0 when the capacity is zero.
    pub fn lower_bound_batches(&self) -> usize {
        if self.capacity == 0 {
            return 0;
        }
        self.total_processing_time().div_ceil(self.capacity) as usize
    }

    /// Job indices sorted by descending processing time (ties by index).
    pub fn jobs_by_decreasing_time(&self) -> Vec<usize> {
        let mut jobs: Vec<usize> = (0..self.n_jobs()).collect();
        jobs.sort_by(|&a, &b| self.processing_times[b].cmp(&self.processing_times[a]));
        jobs
    }
}
