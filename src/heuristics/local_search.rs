//! Relocate and exchange neighborhoods, and the local search driving them.

use super::Heuristics;
use crate::models::{Batch, Solution};

impl Heuristics<'_> {
    /// Moves jobs from later batches into earlier batches with spare room.
    ///
    /// Each pass sorts by descending load, then for every batch that can
    /// still take a job scans the later batches from the back and pulls in
    /// every job that fits. Empty batches are pruned. Passes repeat until
    /// one moves nothing (at most `n + 1` passes), so calling this again on
    /// its result is a no-op.
    ///
    /// # Returns
    /// Number of jobs moved.
    pub fn relocate(&self, solution: &mut Solution) -> usize {
        let mut moved = 0;
        for _ in 0..=self.instance.n_jobs() {
            let pass = self.relocate_pass(solution);
            if pass == 0 {
                break;
            }
            moved += pass;
        }
        if moved > 0 {
            tracing::trace!(moved, batches = solution.len(), "relocate");
        }
        moved
    }

    fn relocate_pass(&self, solution: &mut Solution) -> usize {
        solution.sort_by_load_desc();
        let batches = solution.batches_mut();
        let mut moved = 0;

        for i in 0..batches.len() {
            if batches[i].no_more_to_pack(self.instance) {
                continue;
            }
            for j in (i + 1..batches.len()).rev() {
                let (head, tail) = batches.split_at_mut(j);
                let (target, source) = (&mut head[i], &mut tail[0]);
                let candidates = source.jobs().to_vec();
                for job in candidates {
                    if target.can_pack(self.instance, job) {
                        source.remove(self.instance, job);
                        target.add(self.instance, job);
                        moved += 1;
                    }
                }
            }
        }

        solution.prune_empty();
        moved
    }

    /// Swaps a short job of a heavier batch with a longer job of a lighter
    /// one whenever both batches stay within capacity.
    ///
    /// Batches are sorted by descending load first; batches already at
    /// capacity are skipped. All eligible swaps of the pass are applied.
    /// The job held at a position is looked up again after every swap.
    ///
    /// # Returns
    /// Number of swaps applied.
    pub fn exchange(&self, solution: &mut Solution) -> usize {
        solution.sort_by_load_desc();
        let capacity = self.instance.capacity;
        let batches = solution.batches_mut();
        let mut swaps = 0;

        for i in 0..batches.len() {
            if batches[i].processing_time() == capacity {
                continue;
            }
            for index1 in 0..batches[i].len() {
                for j in (i + 1..batches.len()).rev() {
                    let (head, tail) = batches.split_at_mut(j);
                    let (heavy, light) = (&mut head[i], &mut tail[0]);
                    for index2 in 0..light.len() {
                        let a = heavy.jobs()[index1];
                        let b = light.jobs()[index2];
                        if self.instance.processing_time(a) < self.instance.processing_time(b)
                            && self.swap_fits(heavy, a, b)
                            && self.swap_fits(light, b, a)
                        {
                            heavy.replace(self.instance, index1, b);
                            light.replace(self.instance, index2, a);
                            swaps += 1;
                        }
                    }
                }
            }
        }

        if swaps > 0 {
            tracing::trace!(swaps, "exchange");
        }
        swaps
    }

    /// Alternates relocate and exchange while the makespan strictly drops.
    ///
    /// Each round works on a copy, finishes with the lightest batch last,
    /// and is kept only if it beats the current makespan. At most
    /// `max_iterations` rounds run.
    pub fn local_search(&self, solution: Solution) -> Solution {
        let mut best = solution;
        let mut best_makespan = best.makespan(self.instance);

        for round in 0..self.config.max_iterations {
            let mut candidate = best.clone();
            self.relocate(&mut candidate);
            self.exchange(&mut candidate);
            candidate.sort_by_load_desc();

            let makespan = candidate.makespan(self.instance);
            if makespan >= best_makespan {
                tracing::debug!(rounds = round, makespan = best_makespan, "local search converged");
                return best;
            }
            best = candidate;
            best_makespan = makespan;
        }

        tracing::debug!(
            rounds = self.config.max_iterations,
            makespan = best_makespan,
            "local search hit iteration limit"
        );
        best
    }

    /// Whether `batch` stays within capacity with `outgoing` swapped for `incoming`.
    fn swap_fits(&self, batch: &Batch, outgoing: usize, incoming: usize) -> bool {
        batch.processing_time() - self.instance.processing_time(outgoing)
            + self.instance.processing_time(incoming)
            <= self.instance.capacity
    }
}
