//! Construction from master values and first-fit-decreasing packing.

use super::Heuristics;
use crate::models::{Batch, Solution};

impl Heuristics<'_> {
    /// Builds a solution from the master's fractional column values.
    ///
    /// Candidates are scanned in input order; a column is fixed when its
    /// value exceeds `fix_threshold + epsilon` and none of its jobs is
    /// already claimed. Callers wanting value priority sort beforehand.
    /// Unclaimed jobs are packed by [`Heuristics::pack_remains`] in
    /// descending processing time.
    pub fn construct(&self, candidates: &[(Batch, f64)]) -> Solution {
        let n = self.instance.n_jobs();
        let threshold = self.config.fix_threshold + self.config.epsilon;
        let mut remaining = vec![true; n];
        let mut solution = Solution::new();

        for (batch, value) in candidates {
            if *value <= threshold || batch.is_empty() {
                continue;
            }
            if !self.claimable(batch, &remaining) {
                tracing::trace!(jobs = ?batch.jobs(), "column overlaps fixed jobs, skipped");
                continue;
            }
            for &job in batch.jobs() {
                remaining[job] = false;
            }
            solution.push(Batch::from_jobs(self.instance, batch.jobs().to_vec()));
        }
        let fixed = solution.len();

        let jobs: Vec<usize> = self
            .instance
            .jobs_by_decreasing_time()
            .into_iter()
            .filter(|&j| remaining[j])
            .collect();
        self.pack_remains(&mut solution, &jobs);

        tracing::debug!(
            fixed,
            packed = jobs.len(),
            batches = solution.len(),
            makespan = solution.makespan(self.instance),
            "constructed solution"
        );
        solution
    }

    /// First-fit packing of `jobs` (in the given order) into `solution`.
    ///
    /// Batches that cannot take even the shortest job leave the open
    /// frontier for good; a job that fits no open batch starts a new one.
    pub fn pack_remains(&self, solution: &mut Solution, jobs: &[usize]) {
        let mut open: Vec<usize> = (0..solution.len())
            .filter(|&i| !solution.batches()[i].no_more_to_pack(self.instance))
            .collect();

        for &job in jobs {
            let slot = open
                .iter()
                .position(|&i| solution.batches()[i].can_pack(self.instance, job));
            match slot {
                Some(pos) => {
                    let i = open[pos];
                    let batch = &mut solution.batches_mut()[i];
                    batch.add(self.instance, job);
                    if batch.no_more_to_pack(self.instance) {
                        open.remove(pos);
                    }
                }
                None => {
                    let mut batch = Batch::new();
                    batch.add(self.instance, job);
                    let full = batch.no_more_to_pack(self.instance);
                    solution.push(batch);
                    if !full {
                        open.push(solution.len() - 1);
                    }
                }
            }
        }
    }

    /// Every job in range, unclaimed, and listed once.
    fn claimable(&self, batch: &Batch, remaining: &[bool]) -> bool {
        let mut seen = Vec::with_capacity(batch.len());
        batch.jobs().iter().all(|&job| {
            let fresh = !seen.contains(&job);
            seen.push(job);
            fresh && remaining.get(job).copied().unwrap_or(false)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::heuristics::Heuristics;
    use crate::models::{Batch, Instance, Solution};

    #[test]
    fn test_construct_packs_equal_jobs() {
        let inst = Instance::new(vec![3, 3, 3, 3], 6, 1);
        let solution = Heuristics::new(&inst).construct(&[]);
        assert_eq!(solution.loads(), vec![6, 6]);
        assert_eq!(solution.makespan(&inst), 13);
        assert!(solution.is_feasible(&inst));
    }

    #[test]
    fn test_construct_fixes_high_value_columns() {
        let inst = Instance::new(vec![4, 2, 3, 1, 5], 6, 0);
        let candidates = vec![
            (Batch::from_jobs(&inst, vec![1, 2]), 0.9),
            (Batch::from_jobs(&inst, vec![2, 3]), 0.8), // overlaps job 2
            (Batch::from_jobs(&inst, vec![0, 3]), 0.5), // not above threshold
            (Batch::from_jobs(&inst, vec![4, 3]), 0.6),
        ];
        let solution = Heuristics::new(&inst).construct(&candidates);

        assert_eq!(solution.batches()[0].jobs(), &[1, 2]);
        assert_eq!(solution.batches()[1].jobs(), &[4, 3]);
        // job 0 (p = 4) does not fit the open batch [1, 2] (load 5)
        assert_eq!(solution.batches()[2].jobs(), &[0]);
        assert!(solution.is_feasible(&inst));
    }

    #[test]
    fn test_construct_first_come_priority() {
        let inst = Instance::new(vec![1, 1, 1], 3, 0);
        let candidates = vec![
            (Batch::from_jobs(&inst, vec![0, 1]), 0.6),
            (Batch::from_jobs(&inst, vec![0, 1, 2]), 1.0),
        ];
        let solution = Heuristics::new(&inst).construct(&candidates);
        // the 0.6 column comes first and wins; job 2 joins it
        assert_eq!(solution.len(), 1);
        assert_eq!(solution.batches()[0].jobs(), &[0, 1, 2]);
    }

    #[test]
    fn test_construct_skips_malformed_columns() {
        let inst = Instance::new(vec![1, 1], 2, 0);
        let candidates = vec![
            (serde_json::from_str::<Batch>(r#"{"jobs":[0,5],"processing_time":1}"#).unwrap(), 1.0),
            (serde_json::from_str::<Batch>(r#"{"jobs":[1,1],"processing_time":2}"#).unwrap(), 1.0),
        ];
        let solution = Heuristics::new(&inst).construct(&candidates);
        assert!(solution.is_feasible(&inst));
        assert_eq!(solution.len(), 1);
    }

    #[test]
    fn test_pack_remains_first_fit() {
        let inst = Instance::new(vec![5, 4, 3, 2, 2, 1], 7, 1);
        let heuristics = Heuristics::new(&inst);
        let mut solution = Solution::new();
        heuristics.pack_remains(&mut solution, &[0, 1, 2, 3, 4, 5]);

        // 5 → B0, 4 → B1, 3 → B1 (7), 2 → B0 (7), 2 → B2, 1 → B2
        assert_eq!(solution.loads(), vec![7, 7, 3]);
        assert_eq!(solution.batches()[2].jobs(), &[4, 5]);
        assert!(solution.is_feasible(&inst));
    }

    #[test]
    fn test_pack_remains_uses_open_fixed_batches() {
        let inst = Instance::new(vec![2, 2, 2], 6, 0);
        let heuristics = Heuristics::new(&inst);
        let mut solution = Solution::from_batches(vec![Batch::from_jobs(&inst, vec![0])]);
        heuristics.pack_remains(&mut solution, &[1, 2]);
        assert_eq!(solution.len(), 1);
        assert_eq!(solution.loads(), vec![6]);
    }

    #[test]
    fn test_construct_empty_instance() {
        let inst = Instance::new(Vec::new(), 5, 1);
        let solution = Heuristics::new(&inst).construct(&[]);
        assert!(solution.is_empty());
        assert_eq!(solution.makespan(&inst), 0);
    }
}
