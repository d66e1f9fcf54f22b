//! # maple-arbiter-metrics
//!
//! Multi-axis ethical scoring of arbiter candidates against a context
//! profile.
//!
//! Every axis is scored by exactly one [`AxisScorer`], registered explicitly
//! in a [`ScorerRegistry`]. The [`MetricsEvaluator`] refuses to build unless
//! the registry covers the whole closed axis set.
//!
//! ## Aggregates
//!
//! - `delta_plus[axis] = max(0, target − value)`
//! - `min_violation[axis] = max(0, floor − value)`
//! - `d2 = ‖delta_plus‖₂`, `d_inf = max(delta_plus)`

pub mod evaluator;
pub mod registry;
pub mod scorer;

pub use evaluator::{CandidateMetrics, MetricsEvaluator};
pub use registry::ScorerRegistry;
pub use scorer::{AxisCues, AxisScorer, LexicalAxisScorer};
