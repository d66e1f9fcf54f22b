use std::fmt;

use serde::{Deserialize, Serialize};

use crate::candidate::CandidateId;
use crate::repair::RepairAction;
use crate::violation::Violation;

/// Outcome of gating one candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateDecision {
    /// Safe as written
    Allow,
    /// Safe after the recorded repairs
    AllowWithRepair,
    /// Must not be selected
    Reject,
    /// Detection too uncertain to decide; a human or upstream policy decides
    Escalate,
}

impl GateDecision {
    /// Whether the candidate may enter scoring.
    pub fn is_accepted(&self) -> bool {
        matches!(self, GateDecision::Allow | GateDecision::AllowWithRepair)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GateDecision::Allow => "allow",
            GateDecision::AllowWithRepair => "allow_with_repair",
            GateDecision::Reject => "reject",
            GateDecision::Escalate => "escalate",
        }
    }
}

impl fmt::Display for GateDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a candidate did not reach ranking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Irreversible harm, never repairable
    HardViolation,
    /// Non-repairable violation at or above the reject threshold
    Unrepairable,
    /// Repair was attempted and did not produce a safe text
    RepairFailed,
    /// Gate escalated instead of deciding
    Escalated,
    /// Accepted by the gate but below a context-profile floor
    BelowFloor,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::HardViolation => "hard violation, unrepairable",
            RejectReason::Unrepairable => "unrepairable violation above reject threshold",
            RejectReason::RepairFailed => "repair attempted and failed",
            RejectReason::Escalated => "escalated for review",
            RejectReason::BelowFloor => "below context profile floor",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full record of one gate evaluation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GateResult {
    pub candidate_id: CandidateId,
    pub decision: GateDecision,
    /// Rewritten text, present only for `AllowWithRepair`
    pub repaired_text: Option<String>,
    /// Repairs applied, in application order
    pub actions: Vec<RepairAction>,
    /// Violations on the final text (post-repair when repair ran)
    pub violations: Vec<Violation>,
    /// Violations on the original text
    pub pre_repair_violations: Vec<Violation>,
    /// Aggregate repair trigger: max impact among repairable violations
    pub trigger: f64,
    /// Set for `Reject` and `Escalate`
    pub reject_reason: Option<RejectReason>,
    /// Human-readable account of the decision
    pub rationale: String,
}

impl GateResult {
    pub fn is_accepted(&self) -> bool {
        self.decision.is_accepted()
    }

    pub fn was_repaired(&self) -> bool {
        self.decision == GateDecision::AllowWithRepair
    }

    /// Why this candidate is kept out of ranking, if it is.
    pub fn rejection(&self) -> Option<RejectReason> {
        match self.decision {
            GateDecision::Allow | GateDecision::AllowWithRepair => None,
            GateDecision::Escalate => Some(RejectReason::Escalated),
            GateDecision::Reject => Some(self.reject_reason.unwrap_or(RejectReason::RepairFailed)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_predicates() {
        assert!(GateDecision::Allow.is_accepted());
        assert!(GateDecision::AllowWithRepair.is_accepted());
        assert!(!GateDecision::Reject.is_accepted());
        assert!(!GateDecision::Escalate.is_accepted());
    }

    #[test]
    fn reject_reasons_are_distinguishable() {
        assert_ne!(
            RejectReason::HardViolation.to_string(),
            RejectReason::RepairFailed.to_string()
        );
        let json = serde_json::to_string(&RejectReason::RepairFailed).unwrap();
        assert_eq!(json, "\"repair_failed\"");
    }
}
