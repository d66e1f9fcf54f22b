//! # maple-arbiter-types
//!
//! Shared data model for the Arbiter, which chooses at most one policy-safe
//! proposal out of an ensemble of independently produced candidates.
//!
//! ## Invariants
//!
//! - **Clamped scores**: an [`AxisScore`] is always inside `[0, 1]`, whatever
//!   a scorer hands in. Out-of-range values are clamped, never rejected.
//! - **Immutable candidates**: a repair produces a *new* [`Candidate`] with the
//!   same identifier. Earlier stages never observe the rewrite.
//! - **Closed sets**: the axis set ([`Axis`]), violation categories
//!   ([`ViolationCategory`]) and repair stages ([`RepairStageKind`]) are fixed
//!   enums, so every consumer handles them exhaustively.
//! - **Single-call lifetime**: nothing here outlives one selection call.

pub mod axis;
pub mod candidate;
pub mod decision;
pub mod error;
pub mod phrase;
pub mod profile;
pub mod repair;
pub mod selection;
pub mod violation;

pub use axis::{clamp_unit, Axis, AxisScore, AxisScores, ScoreVector, AXIS_COUNT};
pub use candidate::{validate_batch, Candidate, CandidateId};
pub use decision::{GateDecision, GateResult, RejectReason};
pub use error::ArbiterError;
pub use phrase::PhrasePattern;
pub use profile::{
    canonical_profile, default_profile, elevated_risk_profile, AxisBounds, ContextProfile,
    DEFAULT_PROFILE, ELEVATED_RISK_PROFILE,
};
pub use repair::{RepairAction, RepairStageKind};
pub use selection::{RankedCandidate, RankingMethod, RejectedCandidate, SelectionResult};
pub use violation::{Violation, ViolationCategory};
