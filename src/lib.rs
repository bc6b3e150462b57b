//! Branch-and-price building blocks for batching-machine scheduling.
//!
//! Jobs with known processing times are grouped into batches of capacity
//! `T`. Every batch but the last holds the machine for a full slot `T + t`
//! (`t` is the changeover time); the last one ends with its own jobs. The
//! objective is the makespan. This crate provides everything around the
//! master LP: column pricing, branching constraints and primal heuristics.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Instance`, `Batch`, `Solution`, `Violation`
//! - **`branching`**: Immutable branch nodes with together/apart constraints
//!   and the arena holding them
//! - **`pricing`**: `PricingOracle` trait with DP, exact and hybrid oracles
//! - **`heuristics`**: Construction from master values, first-fit packing,
//!   relocate/exchange local search
//! - **`config`**: TOML-loadable solver settings
//! - **`validation`**: Instance integrity checks
//! - **`generator`**: Random instances for experiments
//!
//! # Architecture
//!
//! The master problem and its LP solver stay outside the crate: they hand
//! dual prices to a pricing oracle and fractional column values to the
//! heuristics, and receive batches and integral solutions back.
//!
//! # References
//!
//! - Barnhart et al. (1998), "Branch-and-Price: Column Generation for
//!   Solving Huge Integer Programs"
//! - Ryan & Foster (1981), "An integer programming approach to scheduling"
//! - Potts & Kovalyov (2000), "Scheduling with batching: A review"

pub mod branching;
pub mod config;
pub mod generator;
pub mod heuristics;
pub mod models;
pub mod pricing;
pub mod validation;
