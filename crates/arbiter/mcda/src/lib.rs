//! # maple-arbiter-mcda
//!
//! Picks among gate-approved candidates scored on several axes at once.
//!
//! ## Pipeline
//!
//! 1. **Pareto filter**: drop every candidate another one dominates
//!    ([`pareto_front`]). Output keeps input order.
//! 2. **Ranking**: order the front with one of two interchangeable
//!    [`Ranker`]s:
//!    - [`RobustWeightRanker`]: win frequency over seeded random simplex
//!      weights, bit-for-bit reproducible for a fixed seed
//!    - [`TopsisRanker`]: closeness to the ideal point after vector
//!      normalization
//!
//! Ties always resolve to the earlier input position.

pub mod pareto;
pub mod ranking;

pub use pareto::{dominates, front_indices, pareto_front, partition_front, ScoredCandidate};
pub use ranking::{rank, sample_simplex, Ranker, RobustWeightRanker, TopsisRanker};
