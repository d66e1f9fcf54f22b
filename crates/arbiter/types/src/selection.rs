use std::fmt;

use serde::{Deserialize, Serialize};

use crate::candidate::CandidateId;
use crate::decision::RejectReason;
use crate::violation::Violation;

/// MCDA strategy used to order the Pareto front.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum RankingMethod {
    /// Win frequency over seeded random weight vectors
    RobustWeights { samples: usize },
    /// Closeness to the ideal point after vector normalization
    Topsis,
}

impl RankingMethod {
    pub const DEFAULT_SAMPLES: usize = 1000;

    pub fn as_str(&self) -> &'static str {
        match self {
            RankingMethod::RobustWeights { .. } => "robust_weights",
            RankingMethod::Topsis => "topsis",
        }
    }
}

impl Default for RankingMethod {
    fn default() -> Self {
        RankingMethod::RobustWeights {
            samples: Self::DEFAULT_SAMPLES,
        }
    }
}

impl fmt::Display for RankingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankingMethod::RobustWeights { samples } => write!(f, "robust_weights({samples})"),
            RankingMethod::Topsis => f.write_str("topsis"),
        }
    }
}

/// One entry in a ranking, best first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub id: CandidateId,
    pub score: f64,
}

/// A candidate that did not reach ranking.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RejectedCandidate {
    pub id: CandidateId,
    pub reason: RejectReason,
    pub detail: String,
    pub violations: Vec<Violation>,
}

/// Outcome of one selection call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
    /// Top-ranked candidate, `None` when nothing was accepted
    pub selected_id: Option<CandidateId>,
    /// Pareto front in input order
    pub pareto_set: Vec<CandidateId>,
    /// Rejected candidates in input order
    pub rejected: Vec<RejectedCandidate>,
    pub method: RankingMethod,
}

impl SelectionResult {
    pub fn is_empty(&self) -> bool {
        self.selected_id.is_none()
    }
}
