//! Random instance generation for experiments and tests.
//!
//! Processing times are drawn uniformly from `[min, min(max, T)]`, so every
//! generated instance passes [`validate_instance`](crate::validation::validate_instance)
//! as long as it has jobs and a positive capacity.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::Instance;

/// Parameters of a random batching instance.
///
/// # Example
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use u_batching::generator::InstanceGenerator;
///
/// let generator = InstanceGenerator::new(20, 10, 2).with_processing_range(2, 6);
/// let instance = generator.generate(&mut StdRng::seed_from_u64(1));
/// assert_eq!(instance.n_jobs(), 20);
/// assert!(instance.processing_times.iter().all(|&p| (2..=6).contains(&p)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceGenerator {
    /// Number of jobs.
    pub n_jobs: usize,
    /// Batch capacity `T`.
    pub capacity: u64,
    /// Changeover time `t`.
    pub changeover: u64,
    /// Shortest processing time drawn.
    pub min_processing: u64,
    /// Longest processing time drawn (clamped to `capacity`).
    pub max_processing: u64,
}

impl InstanceGenerator {
    /// Creates a generator drawing processing times from `[1, capacity]`.
    pub fn new(n_jobs: usize, capacity: u64, changeover: u64) -> Self {
        Self {
            n_jobs,
            capacity,
            changeover,
            min_processing: 1,
            max_processing: capacity,
        }
    }

    /// Sets the processing-time range (inclusive).
    pub fn with_processing_range(mut self, min: u64, max: u64) -> Self {
        self.min_processing = min;
        self.max_processing = max;
        self
    }

    /// Sets the changeover time.
    pub fn with_changeover(mut self, changeover: u64) -> Self {
        self.changeover = changeover;
        self
    }

    /// Draws one instance.
    ///
    /// A range left empty by the capacity clamp collapses to its upper end.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Instance {
        let high = self.max_processing.min(self.capacity);
        let low = self.min_processing.min(high);
        let processing_times = (0..self.n_jobs)
            .map(|_| rng.random_range(low..=high))
            .collect();
        Instance::new(processing_times, self.capacity, self.changeover)
    }
}
