use thiserror::Error;

use crate::axis::Axis;
use crate::candidate::CandidateId;

/// Errors from the Arbiter.
///
/// Only malformed input or configuration is an error. Rejected, escalated
/// and "nothing selected" outcomes are ordinary values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArbiterError {
    #[error("candidate at position {index} has an empty identifier")]
    EmptyCandidateId { index: usize },

    #[error("duplicate candidate identifier: {0}")]
    DuplicateCandidateId(CandidateId),

    #[error("threshold {name} must be within [0, 1], got {value}")]
    InvalidThreshold { name: String, value: f64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown context profile: {0}")]
    UnknownProfile(String),

    #[error("no scorer registered for axis {0}")]
    MissingScorer(Axis),

    #[error("axis {0} registered twice")]
    DuplicateScorer(Axis),

    #[error("missing value for axis {0}")]
    MissingAxis(Axis),

    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}
