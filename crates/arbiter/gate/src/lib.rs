//! # maple-arbiter-gate
//!
//! Safety gate for arbiter candidates: detect ethical violations, attempt a
//! bounded staged repair, and emit exactly one decision per candidate.
//!
//! ## Invariants
//!
//! - **Hard violations are final**: irreversible harm that cannot be repaired
//!   always yields `Reject`, whatever the thresholds.
//! - **Ordered repair**: stages run as concept mapping, constraint injection,
//!   scope reduction, goal reframe. Each runs at most once and the total is
//!   capped by `max_repairs`.
//! - **Re-checked output**: repaired text goes back through the detector
//!   before it is allowed.
//! - **Pure evaluation**: the same candidate and thresholds always give the
//!   same [`GateResult`](maple_arbiter_types::GateResult).
//!
//! ## Decision flow
//!
//! 1. **Detect**: one [`Violation`](maple_arbiter_types::Violation) per
//!    matched category
//! 2. **Block**: hard or high-impact unrepairable findings reject
//! 3. **Escalate**: optional, for severe findings held back by low confidence
//! 4. **Allow**: repair trigger under `τ_repair`
//! 5. **Repair**: staged rewrite, re-detect, then allow with repair or reject

pub mod detector;
pub mod gate;
pub mod repair;

pub use detector::{CategoryRule, DetectorConfig, Indicator, ViolationDetector};
pub use gate::{aggregate_trigger, EscalationPolicy, GateThresholds, SafetyGate};
pub use repair::{
    ConstraintInjectionStage, ConstraintRule, RepairEngine, RepairOutcome, RepairStage,
    RepairTables, StageEdit, Substitution, SubstitutionStage,
};
