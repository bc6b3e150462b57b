//! Branching-pair selection from a fractional master solution.

use std::collections::BTreeMap;

use crate::models::Batch;

/// Picks the job pair to branch on.
///
/// For every pair of jobs, sums the master values of the columns holding
/// both. In an integral solution each sum is 0 or 1; the pair whose sum is
/// closest to 0.5 is returned, preferring the smallest `(a, b)` on ties.
/// Returns `None` when every sum is within `eps` of an integer.
///
/// # Reference
/// Ryan & Foster (1981), "An integer programming approach to scheduling"
pub fn select_branching_pair(columns: &[(Batch, f64)], eps: f64) -> Option<(usize, usize)> {
    let mut together: BTreeMap<(usize, usize), f64> = BTreeMap::new();

    for (batch, value) in columns {
        if *value <= eps {
            continue;
        }
        let members = batch.job_set();
        for (i, &a) in members.iter().enumerate() {
            for &b in members.iter().skip(i + 1) {
                *together.entry((a, b)).or_insert(0.0) += value;
            }
        }
    }

    let mut best: Option<((usize, usize), f64)> = None;
    for (pair, sum) in together {
        let frac = sum - sum.floor();
        if frac <= eps || frac >= 1.0 - eps {
            continue;
        }
        let distance = (frac - 0.5).abs();
        match best {
            Some((_, d)) if d <= distance => {}
            _ => best = Some((pair, distance)),
        }
    }
    best.map(|(pair, _)| pair)
}
