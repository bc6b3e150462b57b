//! Exact pricing under branching constraints.
//!
//! Solves
//!
//! ```text
//! max  Σ dual[j] z[j]
//! s.t. Σ p[j] z[j] <= T
//!      z[a] = z[b]        for a, b in the same equality group
//!      z[a] + z[b] <= 1   for every disjoint pair (a, b)
//!      z ∈ {0, 1}
//! ```
//!
//! # Algorithm
//! 1. On `set_node`, collapse each active equality group into one item
//!    (union-find over overlapping groups), drop items heavier than `T` or
//!    holding a disjoint pair, and record conflicts between items.
//! 2. On `price`, keep items with positive dual value, order them by value
//!    density and run depth-first branch-and-bound. The bound is the
//!    fractional knapsack over the remaining items, which ignores conflicts
//!    and is therefore valid.
//!
//! The empty selection is always feasible; a node whose constraints leave no
//! profitable item simply yields no column.
//!
//! # Reference
//! Martello & Toth (1990), "Knapsack Problems", Ch. 2.5 (branch-and-bound)

use super::{accept_column, check_duals, check_node, Acceptance, PricingError, PricingOracle};
use crate::branching::BranchNode;
use crate::config::PricingConfig;
use crate::models::{Batch, Instance};

/// Jobs that enter or leave a column together.
#[derive(Debug, Clone)]
struct Item {
    jobs: Vec<usize>,
    weight: u64,
    /// Indices of items that may not be selected alongside this one.
    conflicts: Vec<usize>,
}

/// Exact branch-and-bound pricing oracle.
#[derive(Debug, Clone)]
pub struct ExactPricing<'a> {
    instance: &'a Instance,
    config: PricingConfig,
    node: BranchNode,
    items: Vec<Item>,
}

impl<'a> ExactPricing<'a> {
    /// Creates an oracle positioned at an unconstrained root node.
    pub fn new(instance: &'a Instance, config: PricingConfig) -> Self {
        let mut oracle = Self {
            instance,
            config,
            node: BranchNode::root(instance.n_jobs()),
            items: Vec::new(),
        };
        oracle.rebuild_items();
        oracle
    }

    /// Node currently installed.
    pub fn node(&self) -> &BranchNode {
        &self.node
    }

    /// Best constrained selection: `(jobs ascending, dual sum)`.
    pub fn solve(&self, duals: &[f64]) -> Result<(Vec<usize>, f64), PricingError> {
        check_duals(self.instance, duals)?;

        let mut candidates: Vec<(usize, f64)> = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| (i, item.jobs.iter().map(|&j| duals[j]).sum::<f64>()))
            .filter(|&(_, value)| value > 0.0)
            .collect();
        candidates.sort_by(|&(a, va), &(b, vb)| {
            let da = density(va, self.items[a].weight);
            let db = density(vb, self.items[b].weight);
            db.total_cmp(&da).then(a.cmp(&b))
        });

        let mut search = Search {
            items: &self.items,
            candidates: &candidates,
            capacity: self.instance.capacity,
            blocked: vec![0; self.items.len()],
            chosen: Vec::new(),
            best: Vec::new(),
            best_value: 0.0,
        };
        search.run(0, 0, 0.0);

        let best_value = search.best_value;
        let mut jobs: Vec<usize> = search
            .best
            .iter()
            .flat_map(|&i| self.items[i].jobs.iter().copied())
            .collect();
        jobs.sort_unstable();
        Ok((jobs, best_value))
    }

    fn rebuild_items(&mut self) {
        let n = self.instance.n_jobs();
        let mut parent: Vec<usize> = (0..n).collect();
        for group in self.node.active_groups() {
            for pair in group.windows(2) {
                let (ra, rb) = (find(&mut parent, pair[0]), find(&mut parent, pair[1]));
                if ra != rb {
                    parent[rb] = ra;
                }
            }
        }

        let mut by_root: Vec<Vec<usize>> = vec![Vec::new(); n];
        for job in 0..n {
            let root = find(&mut parent, job);
            by_root[root].push(job);
        }

        let mut items: Vec<Item> = by_root
            .into_iter()
            .filter(|jobs| !jobs.is_empty())
            .map(|jobs| {
                let weight = jobs.iter().map(|&j| self.instance.processing_time(j)).sum();
                Item {
                    jobs,
                    weight,
                    conflicts: Vec::new(),
                }
            })
            .filter(|item| item.weight <= self.instance.capacity && !self.clashes(&item.jobs, &item.jobs))
            .collect();

        for x in 0..items.len() {
            for y in x + 1..items.len() {
                if self.clashes(&items[x].jobs, &items[y].jobs) {
                    items[x].conflicts.push(y);
                    items[y].conflicts.push(x);
                }
            }
        }

        tracing::debug!(
            node = %self.node.id(),
            items = items.len(),
            jobs = n,
            "exact pricing model rebuilt"
        );
        self.items = items;
    }

    fn clashes(&self, xs: &[usize], ys: &[usize]) -> bool {
        xs.iter()
            .any(|&a| ys.iter().any(|&b| a != b && self.node.is_disjoint(a, b)))
    }
}

impl PricingOracle for ExactPricing<'_> {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn set_node(&mut self, node: &BranchNode) -> Result<(), PricingError> {
        check_node(self.instance, node)?;
        self.node = node.clone();
        self.rebuild_items();
        Ok(())
    }

    fn price(&mut self, duals: &[f64]) -> Result<Vec<Batch>, PricingError> {
        let (jobs, _) = self.solve(duals)?;
        if jobs.is_empty() {
            tracing::debug!(node = %self.node.id(), "exact pricing found no profitable item");
            return Ok(Vec::new());
        }
        let batch = Batch::from_jobs(self.instance, jobs);
        if !batch.is_feasible_at(&self.node) {
            return Ok(Vec::new());
        }
        let acceptance = Acceptance::for_node(&self.node, &self.config);
        Ok(accept_column(self.name(), self.instance, duals, acceptance, batch)
            .into_iter()
            .collect())
    }
}

fn find(parent: &mut [usize], mut x: usize) -> usize {
    while parent[x] != x {
        parent[x] = parent[parent[x]];
        x = parent[x];
    }
    x
}

fn density(value: f64, weight: u64) -> f64 {
    if weight == 0 {
        f64::INFINITY
    } else {
        value / weight as f64
    }
}

struct Search<'s> {
    items: &'s [Item],
    /// `(item index, value)` sorted by decreasing density.
    candidates: &'s [(usize, f64)],
    capacity: u64,
    /// Per item, how many chosen items conflict with it.
    blocked: Vec<u32>,
    chosen: Vec<usize>,
    best: Vec<usize>,
    best_value: f64,
}

impl Search<'_> {
    fn run(&mut self, depth: usize, load: u64, value: f64) {
        if value > self.best_value {
            self.best_value = value;
            self.best = self.chosen.clone();
        }
        if depth == self.candidates.len() || self.bound(depth, load, value) <= self.best_value {
            return;
        }

        let (item, item_value) = self.candidates[depth];
        let weight = self.items[item].weight;
        if self.blocked[item] == 0 && load + weight <= self.capacity {
            self.chosen.push(item);
            for &c in &self.items[item].conflicts {
                self.blocked[c] += 1;
            }
            self.run(depth + 1, load + weight, value + item_value);
            for &c in &self.items[item].conflicts {
                self.blocked[c] -= 1;
            }
            self.chosen.pop();
        }
        self.run(depth + 1, load, value);
    }

    /// Fractional knapsack over the candidates from `depth` on.
    fn bound(&self, depth: usize, load: u64, value: f64) -> f64 {
        let mut room = self.capacity - load;
        let mut bound = value;
        for &(item, item_value) in &self.candidates[depth..] {
            if self.blocked[item] > 0 {
                continue;
            }
            let weight = self.items[item].weight;
            if weight <= room {
                room -= weight;
                bound += item_value;
            } else {
                bound += item_value * room as f64 / weight as f64;
                break;
            }
        }
        bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branching::BranchTree;
    use crate::pricing::DpPricing;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_matches_dp_without_constraints() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let n = rng.random_range(1..=9);
            let p: Vec<u64> = (0..n).map(|_| rng.random_range(1..=6)).collect();
            let inst = Instance::new(p, 10, 2);
            let mut duals: Vec<f64> = (0..n).map(|_| rng.random_range(-1.0..4.0)).collect();
            duals.extend([0.0, 0.0]);

            let mut dp = DpPricing::new(&inst, PricingConfig::default());
            let exact = ExactPricing::new(&inst, PricingConfig::default());
            let expected = dp.knapsack(&duals).unwrap().value;
            let (jobs, value) = exact.solve(&duals).unwrap();

            assert!((expected - value).abs() < 1e-9);
            let load: u64 = jobs.iter().map(|&j| inst.processing_time(j)).sum();
            assert!(load <= inst.capacity);
        }
    }

    #[test]
    fn test_respects_disjoint_pair() {
        let inst = Instance::new(vec![2, 3, 4], 6, 1);
        let duals = [4.0, 5.0, 6.0, 0.0, 0.0];
        let mut tree = BranchTree::new(3);
        let apart = tree.branch_apart(tree.root(), 0, 2);

        let mut oracle = ExactPricing::new(&inst, PricingConfig::default());
        oracle.set_node(tree.node(apart)).unwrap();
        let columns = oracle.price(&duals).unwrap();

        // {0, 2} is forbidden; {0, 1} (value 9) is the constrained optimum
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].jobs(), &[0, 1]);
        assert!(columns[0].is_feasible_at(tree.node(apart)));
    }

    #[test]
    fn test_respects_equality_group() {
        let inst = Instance::new(vec![2, 3, 4, 1], 7, 0);
        let duals = [1.0, 6.0, 6.0, 0.5, 0.0, 0.0];
        let mut tree = BranchTree::new(4);
        let together = tree.branch_together(tree.root(), 0, 2);

        let mut oracle = ExactPricing::new(&inst, PricingConfig::default());
        oracle.set_node(tree.node(together)).unwrap();
        let (jobs, value) = oracle.solve(&duals).unwrap();

        // {0, 2} weighs 6 and is worth 7; {1, 3} weighs 4 and is worth 6.5;
        // {0, 2, 3} weighs 7 and is worth 7.5
        assert_eq!(jobs, vec![0, 2, 3]);
        assert!((value - 7.5).abs() < 1e-12);
    }

    #[test]
    fn test_oversized_group_is_dropped() {
        let inst = Instance::new(vec![4, 4, 1], 6, 0);
        let duals = [5.0, 5.0, 1.0, 0.0, 0.0];
        let mut tree = BranchTree::new(3);
        let together = tree.branch_together(tree.root(), 0, 1);

        let mut oracle = ExactPricing::new(&inst, PricingConfig::default());
        oracle.set_node(tree.node(together)).unwrap();
        let (jobs, _) = oracle.solve(&duals).unwrap();
        assert_eq!(jobs, vec![2]);
    }

    #[test]
    fn test_inconsistent_node_yields_nothing() {
        let inst = Instance::new(vec![1, 1], 4, 0);
        let duals = [5.0, 5.0, 0.0, 0.0];
        let mut tree = BranchTree::new(2);
        let apart = tree.branch_apart(tree.root(), 0, 1);
        let both = tree.branch_together(apart, 0, 1);

        let mut oracle = ExactPricing::new(&inst, PricingConfig::default());
        oracle.set_node(tree.node(both)).unwrap();
        assert!(oracle.price(&duals).unwrap().is_empty());
    }

    #[test]
    fn test_strict_node_accepts_tiny_negative() {
        let inst = Instance::new(vec![1], 1, 0);
        let duals = [1.0 + 1e-9, 0.0, 0.0];
        let mut tree = BranchTree::new(1);
        let n1 = tree.branch_together(tree.root(), 0, 0);
        let n2 = tree.branch_together(n1, 0, 0);
        assert_eq!(n2.0, 2);

        let mut oracle = ExactPricing::new(&inst, PricingConfig::default());
        assert!(oracle.price(&duals).unwrap().is_empty());
        oracle.set_node(tree.node(n2)).unwrap();
        assert_eq!(oracle.price(&duals).unwrap().len(), 1);
    }
}
