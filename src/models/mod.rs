//! Batching domain models.
//!
//! Provides the data types shared by pricing, branching and the
//! heuristics.
//!
//! # Domain Mappings
//!
//! | u-batching | Branch-and-price | Manufacturing |
//! |------------|------------------|---------------|
//! | Instance | Problem data | Oven / furnace with a fixed cycle |
//! | Batch | Column | One oven load |
//! | Solution | Integral master solution | Load plan |
//! | Violation | Broken invariant | Planning defect |

mod batch;
mod instance;
mod solution;
mod violation;

pub use batch::Batch;
pub use instance::Instance;
pub use solution::Solution;
pub use violation::Violation;
