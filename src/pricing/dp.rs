//! Dynamic-programming pricing.
//!
//! # Algorithm
//!
//! 0/1 knapsack over the per-job duals with capacity `T`:
//!
//! ```text
//! dp[0][c] = max(dual[0], 0)                      if p[0] <= c, else 0
//! dp[i][c] = max(dp[i-1][c], dp[i-1][c-p[i]] + dual[i])   if p[i] <= c
//!          = dp[i-1][c]                                     otherwise
//! ```
//!
//! The selected set is rebuilt from `dp[n-1][T]` downwards: job `i` is taken
//! iff `dp[i][c]` differs from `dp[i-1][c]`, so ties resolve to "not taken".
//!
//! # Complexity
//! O(n · T) time, one `n × (T+1)` table reused across calls.
//!
//! # Limitation
//! The recurrence only knows the capacity. Equality groups and disjoint
//! pairs of the active node are enforced afterwards by discarding a
//! violating column, which may lose a profitable constrained one.

use super::{accept_column, check_duals, check_node, Acceptance, PricingError, PricingOracle};
use crate::branching::BranchNode;
use crate::config::PricingConfig;
use crate::models::{Batch, Instance};

/// Optimal knapsack selection for one dual vector.
#[derive(Debug, Clone, PartialEq)]
pub struct KnapsackSolution {
    /// Selected jobs, ascending.
    pub jobs: Vec<usize>,
    /// Terminal table cell `dp[n-1][T]`: the best dual sum.
    pub value: f64,
    /// Total processing time of `jobs`.
    pub load: u64,
}

/// Knapsack-DP pricing oracle.
///
/// # Example
/// ```
/// use u_batching::config::PricingConfig;
/// use u_batching::models::Instance;
/// use u_batching::pricing::{DpPricing, PricingOracle};
///
/// let instance = Instance::new(vec![2, 3, 4], 6, 1);
/// let mut oracle = DpPricing::new(&instance, PricingConfig::default());
///
/// let best = oracle.knapsack(&[4.0, 5.0, 6.0, 0.0, 0.0]).unwrap();
/// assert_eq!(best.jobs, vec![0, 2]);
/// assert_eq!(best.value, 10.0);
///
/// let columns = oracle.price(&[4.0, 5.0, 6.0, 0.0, 0.0]).unwrap();
/// assert_eq!(columns.len(), 1); // rc = 7 - 10 < 0
/// ```
#[derive(Debug, Clone)]
pub struct DpPricing<'a> {
    instance: &'a Instance,
    config: PricingConfig,
    node: BranchNode,
    /// Row-major `n × (T + 1)` table.
    table: Vec<f64>,
}

impl<'a> DpPricing<'a> {
    /// Creates an oracle positioned at an unconstrained root node.
    pub fn new(instance: &'a Instance, config: PricingConfig) -> Self {
        Self {
            instance,
            config,
            node: BranchNode::root(instance.n_jobs()),
            table: Vec::new(),
        }
    }

    /// Node currently installed.
    pub fn node(&self) -> &BranchNode {
        &self.node
    }

    /// Solves the capacity-only knapsack for `duals`.
    pub fn knapsack(&mut self, duals: &[f64]) -> Result<KnapsackSolution, PricingError> {
        check_duals(self.instance, duals)?;
        let n = self.instance.n_jobs();
        if n == 0 {
            return Ok(KnapsackSolution {
                jobs: Vec::new(),
                value: 0.0,
                load: 0,
            });
        }

        let p = &self.instance.processing_times;
        let cap = self.instance.capacity as usize;
        let width = cap + 1;

        self.table.clear();
        self.table.resize(n * width, 0.0);
        let dp = &mut self.table;

        let base = duals[0].max(0.0);
        for c in 0..width {
            if p[0] as usize <= c {
                dp[c] = base;
            }
        }
        for i in 1..n {
            let (prev, row) = dp[(i - 1) * width..(i + 1) * width].split_at_mut(width);
            let w = p[i] as usize;
            for c in 0..width {
                row[c] = if w <= c {
                    prev[c].max(prev[c - w] + duals[i])
                } else {
                    prev[c]
                };
            }
        }

        let value = dp[(n - 1) * width + cap];
        let mut jobs = Vec::new();
        let mut c = cap;
        for i in (1..n).rev() {
            // Cells are copied verbatim when a job is skipped, so exact
            // comparison identifies the taken jobs.
            if dp[i * width + c] != dp[(i - 1) * width + c] {
                jobs.push(i);
                c -= p[i] as usize;
            }
        }
        if p[0] as usize <= c && dp[c] > 0.0 {
            jobs.push(0);
        }
        jobs.reverse();

        let load = jobs.iter().map(|&j| p[j]).sum();
        Ok(KnapsackSolution { jobs, value, load })
    }
}

impl PricingOracle for DpPricing<'_> {
    fn name(&self) -> &'static str {
        "dp"
    }

    fn set_node(&mut self, node: &BranchNode) -> Result<(), PricingError> {
        check_node(self.instance, node)?;
        self.node = node.clone();
        Ok(())
    }

    fn price(&mut self, duals: &[f64]) -> Result<Vec<Batch>, PricingError> {
        let best = self.knapsack(duals)?;
        if best.jobs.is_empty() {
            return Ok(Vec::new());
        }

        let batch = Batch::from_jobs(self.instance, best.jobs);
        if self.config.filter_branching && self.node.has_constraints() {
            if let Err(violations) = batch.check_branching(&self.node) {
                tracing::warn!(
                    node = %self.node.id(),
                    jobs = ?batch.jobs(),
                    violations = violations.len(),
                    "dp column violates branching constraints, discarded"
                );
                return Ok(Vec::new());
            }
        }

        let acceptance = Acceptance::for_node(&self.node, &self.config);
        Ok(accept_column(self.name(), self.instance, duals, acceptance, batch)
            .into_iter()
            .collect())
    }
}
