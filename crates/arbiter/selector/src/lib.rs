//! # maple-arbiter
//!
//! Deterministic arbitration over an ensemble of candidate proposals: select
//! at most one that is policy-safe and preferable across the ethical axes.
//!
//! ## Pipeline
//!
//! 1. **Gate** every candidate ([`SafetyGate`]): allow, repair, reject or
//!    escalate
//! 2. **Score** the accepted ones, repaired text included, against the
//!    active [`ContextProfile`]
//! 3. **Filter** to the Pareto front
//! 4. **Rank** the front ([`RankingMethod`]) and take the top entry
//!
//! ## Invariants
//!
//! - **Per-call configuration**: thresholds, method and seed travel in a
//!   [`SelectionConfig`]; nothing is read from global state.
//! - **Input-order merge**: parallel gate and scoring results are merged in
//!   input order, so ties always resolve the same way.
//! - **Full accounting**: each candidate ends up rejected, on the Pareto
//!   front, or accepted but dominated. See
//!   [`SelectionReport::accounts_for_all`].
//! - **No-winner is a value**: an empty accepted set yields
//!   `selected_id = None`, not an error.

pub mod config;
pub mod report;
pub mod selector;

pub use config::SelectionConfig;
pub use report::SelectionReport;
pub use selector::Selector;

pub use maple_arbiter_gate::{EscalationPolicy, GateThresholds, SafetyGate};
pub use maple_arbiter_metrics::{CandidateMetrics, MetricsEvaluator, ScorerRegistry};
pub use maple_arbiter_types::{
    canonical_profile, default_profile, elevated_risk_profile, ArbiterError, Candidate,
    CandidateId, ContextProfile, GateDecision, GateResult, RankingMethod, RejectReason,
    RejectedCandidate, SelectionResult,
};
