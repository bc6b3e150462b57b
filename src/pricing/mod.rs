//! Pricing oracles for the batch-selection master problem.
//!
//! Given the master's dual prices, a pricing oracle searches for a batch
//! with negative reduced cost
//!
//! ```text
//! rc(B) = (T + t) - duals[n] - duals[n + 1] - Σ_{j ∈ B} duals[j]
//! ```
//!
//! which is a 0/1 knapsack over the per-job duals with capacity `T`, plus
//! whatever pair constraints the active branch node imposes.
//!
//! | Oracle | Capacity | Branching constraints |
//! |--------|----------|-----------------------|
//! | [`DpPricing`] | exact | relaxed, violators filtered out |
//! | [`ExactPricing`] | exact | exact |
//! | [`HybridPricing`] | exact | DP first, exact fallback |
//!
//! # Reference
//! Desaulniers, Desrosiers & Solomon (2005), "Column Generation", Ch. 1

mod dp;
mod exact;
mod hybrid;

pub use dp::{DpPricing, KnapsackSolution};
pub use exact::ExactPricing;
pub use hybrid::HybridPricing;

use thiserror::Error;

use crate::branching::BranchNode;
use crate::config::{PricingConfig, PricingStrategy};
use crate::models::{Batch, Instance};

/// Contract violations at the oracle boundary.
///
/// Finding no profitable column is not an error: `price` returns an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// Dual vector must hold one entry per job plus the two slack duals.
    #[error("expected {expected} dual prices (jobs + 2 slack duals), got {actual}")]
    DualLength {
        /// `n_jobs + 2`.
        expected: usize,
        /// Supplied length.
        actual: usize,
    },
    /// The node was built for a different number of jobs.
    #[error("branch node covers {actual} jobs, instance has {expected}")]
    NodeMismatch {
        /// Instance job count.
        expected: usize,
        /// Node job count.
        actual: usize,
    },
}

/// A column generator for the master problem.
///
/// Oracles are stateless between calls apart from the node context set by
/// [`PricingOracle::set_node`]; each `price` call depends only on
/// `(duals, node)`.
pub trait PricingOracle {
    /// Oracle name for logs.
    fn name(&self) -> &'static str;

    /// Installs the branch node whose constraints the next calls respect.
    fn set_node(&mut self, node: &BranchNode) -> Result<(), PricingError>;

    /// Returns zero or more columns with negative reduced cost.
    fn price(&mut self, duals: &[f64]) -> Result<Vec<Batch>, PricingError>;
}

/// Reduced-cost acceptance rule.
///
/// One designated node accepts any strictly negative reduced cost; every
/// other node requires the reduced cost to clear a tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Acceptance {
    /// Accept when `rc < 0`.
    Strict,
    /// Accept when `rc < -eps`.
    Tolerant(f64),
}

impl Acceptance {
    /// Rule for `node` under `config`.
    pub fn for_node(node: &BranchNode, config: &PricingConfig) -> Self {
        if node.is_strict(config.strict_node_id) {
            Acceptance::Strict
        } else {
            Acceptance::Tolerant(config.epsilon)
        }
    }

    /// Whether a column with this reduced cost should enter the master.
    #[inline]
    pub fn accepts(&self, reduced_cost: f64) -> bool {
        match *self {
            Acceptance::Strict => reduced_cost < 0.0,
            Acceptance::Tolerant(eps) => reduced_cost < -eps,
        }
    }
}

/// Builds the oracle selected by `config.strategy`.
///
/// # Example
/// ```
/// use u_batching::config::{PricingConfig, PricingStrategy};
/// use u_batching::models::Instance;
/// use u_batching::pricing::build_oracle;
///
/// let instance = Instance::new(vec![2, 2, 2], 4, 2);
/// let config = PricingConfig::default().with_strategy(PricingStrategy::Exact);
/// let mut oracle = build_oracle(&instance, &config);
///
/// let columns = oracle.price(&[5.0, 1.0, 1.0, 0.0, 0.0]).unwrap();
/// assert_eq!(columns.len(), 0); // best column has reduced cost 0
///
/// let columns = oracle.price(&[5.0, 2.0, 1.0, 0.0, 0.0]).unwrap();
/// assert_eq!(columns[0].jobs(), &[0, 1]);
/// ```
pub fn build_oracle<'a>(
    instance: &'a Instance,
    config: &PricingConfig,
) -> Box<dyn PricingOracle + 'a> {
    match config.strategy {
        PricingStrategy::Dynamic => Box::new(DpPricing::new(instance, config.clone())),
        PricingStrategy::Exact => Box::new(ExactPricing::new(instance, config.clone())),
        PricingStrategy::Hybrid => Box::new(HybridPricing::new(instance, config.clone())),
    }
}

pub(crate) fn check_duals(instance: &Instance, duals: &[f64]) -> Result<(), PricingError> {
    let expected = instance.n_jobs() + 2;
    if duals.len() != expected {
        return Err(PricingError::DualLength {
            expected,
            actual: duals.len(),
        });
    }
    Ok(())
}

pub(crate) fn check_node(instance: &Instance, node: &BranchNode) -> Result<(), PricingError> {
    if node.n_jobs() != instance.n_jobs() {
        return Err(PricingError::NodeMismatch {
            expected: instance.n_jobs(),
            actual: node.n_jobs(),
        });
    }
    Ok(())
}

/// Applies the acceptance rule to a candidate, logging the outcome.
pub(crate) fn accept_column(
    oracle: &str,
    instance: &Instance,
    duals: &[f64],
    acceptance: Acceptance,
    batch: Batch,
) -> Option<Batch> {
    let rc = batch.reduced_cost(instance, duals);
    let accepted = acceptance.accepts(rc);
    tracing::debug!(
        oracle,
        reduced_cost = rc,
        accepted,
        jobs = ?batch.jobs(),
        "pricing candidate"
    );
    accepted.then_some(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branching::BranchTree;

    #[test]
    fn test_acceptance_rules() {
        assert!(Acceptance::Strict.accepts(-1e-9));
        assert!(!Acceptance::Strict.accepts(0.0));
        assert!(!Acceptance::Tolerant(1e-6).accepts(-1e-9));
        assert!(Acceptance::Tolerant(1e-6).accepts(-1e-3));
    }

    #[test]
    fn test_acceptance_for_node() {
        let config = PricingConfig::default();
        let mut tree = BranchTree::new(3);
        let (n1, n2) = tree.branch_pair(tree.root(), 0, 1);
        assert_eq!(
            Acceptance::for_node(tree.node(n1), &config),
            Acceptance::Tolerant(config.epsilon)
        );
        assert_eq!(Acceptance::for_node(tree.node(n2), &config), Acceptance::Strict);
    }

    #[test]
    fn test_dual_length_checked() {
        let inst = Instance::new(vec![1, 2], 3, 1);
        assert!(check_duals(&inst, &[0.0; 4]).is_ok());
        assert_eq!(
            check_duals(&inst, &[0.0; 2]),
            Err(PricingError::DualLength {
                expected: 4,
                actual: 2
            })
        );
    }

    #[test]
    fn test_every_strategy_builds() {
        let inst = Instance::new(vec![1, 2], 3, 1);
        for strategy in [
            PricingStrategy::Dynamic,
            PricingStrategy::Exact,
            PricingStrategy::Hybrid,
        ] {
            let config = PricingConfig::default().with_strategy(strategy);
            let mut oracle = build_oracle(&inst, &config);
            assert!(oracle.set_node(&BranchNode::root(2)).is_ok());
            assert_eq!(
                oracle.set_node(&BranchNode::root(3)),
                Err(PricingError::NodeMismatch {
                    expected: 2,
                    actual: 3
                })
            );
            let columns = oracle.price(&[3.0, 3.0, 0.0, 0.0]).unwrap();
            assert_eq!(columns.len(), 1);
            assert_eq!(columns[0].job_set().into_iter().collect::<Vec<_>>(), vec![0, 1]);
        }
    }
}
