//! DP pricing with an exact fallback at constrained nodes.

use super::{DpPricing, ExactPricing, PricingError, PricingOracle};
use crate::branching::BranchNode;
use crate::config::PricingConfig;
use crate::models::{Batch, Instance};

/// Runs the DP oracle, and the exact oracle only when the DP column was
/// discarded or unprofitable at a node carrying branching constraints.
///
/// At an unconstrained node the DP is already exact, so the fallback never
/// fires there.
#[derive(Debug, Clone)]
pub struct HybridPricing<'a> {
    dp: DpPricing<'a>,
    exact: ExactPricing<'a>,
}

impl<'a> HybridPricing<'a> {
    /// Creates both oracles at an unconstrained root node.
    ///
    /// The DP side always filters violating columns, otherwise the fallback
    /// could never trigger.
    pub fn new(instance: &'a Instance, config: PricingConfig) -> Self {
        let dp_config = config.clone().with_filter_branching(true);
        Self {
            dp: DpPricing::new(instance, dp_config),
            exact: ExactPricing::new(instance, config),
        }
    }
}

impl PricingOracle for HybridPricing<'_> {
    fn name(&self) -> &'static str {
        "hybrid"
    }

    fn set_node(&mut self, node: &BranchNode) -> Result<(), PricingError> {
        self.dp.set_node(node)?;
        self.exact.set_node(node)
    }

    fn price(&mut self, duals: &[f64]) -> Result<Vec<Batch>, PricingError> {
        let columns = self.dp.price(duals)?;
        if !columns.is_empty() || !self.dp.node().has_constraints() {
            return Ok(columns);
        }
        tracing::debug!(node = %self.dp.node().id(), "dp pricing empty, falling back to exact");
        self.exact.price(duals)
    }
}
