use maple_arbiter_types::{
    ArbiterError, Candidate, GateDecision, GateResult, RejectReason, Violation,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::detector::ViolationDetector;
use crate::repair::RepairEngine;

/// When to escalate instead of deciding.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EscalationPolicy {
    /// A severe, non-repairable finding below this confidence escalates
    pub min_confidence: f64,
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self {
            min_confidence: 0.5,
        }
    }
}

/// Thresholds for one gate evaluation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateThresholds {
    /// Repairable impact at or above which repair is attempted (τ_repair)
    pub repair: f64,
    /// Non-repairable impact at or above which the candidate is rejected (τ_reject)
    pub reject: f64,
    /// Maximum number of repair stages applied
    pub max_repairs: usize,
    /// Escalation is off unless a policy is given
    pub escalation: Option<EscalationPolicy>,
}

impl Default for GateThresholds {
    fn default() -> Self {
        Self {
            repair: 0.3,
            reject: 0.5,
            max_repairs: 4,
            escalation: None,
        }
    }
}

impl GateThresholds {
    pub fn validate(&self) -> Result<(), ArbiterError> {
        check_unit("repair", self.repair)?;
        check_unit("reject", self.reject)?;
        if let Some(policy) = &self.escalation {
            check_unit("escalation.min_confidence", policy.min_confidence)?;
        }
        Ok(())
    }
}

fn check_unit(name: &str, value: f64) -> Result<(), ArbiterError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ArbiterError::InvalidThreshold {
            name: name.to_string(),
            value,
        })
    }
}

/// The safety gate: detection, optional repair, and a single decision.
///
/// Decision order:
/// 1. A hard violation rejects outright.
/// 2. A non-repairable violation with impact ≥ `reject` rejects.
/// 3. With an escalation policy, a severe non-repairable finding held back
///    only by low confidence escalates.
/// 4. The aggregate trigger (max impact among repairable violations) below
///    `repair` allows the text as is.
/// 5. Otherwise the text is repaired and re-detected. The repaired text is
///    rejected if rules 1 or 2 block it, or if its own trigger is still at or
///    above `repair`; otherwise it is `AllowWithRepair`.
pub struct SafetyGate {
    detector: ViolationDetector,
    repair: RepairEngine,
}

impl SafetyGate {
    pub fn new(detector: ViolationDetector, repair: RepairEngine) -> Self {
        Self { detector, repair }
    }

    /// Gate over the reference detector and repair tables.
    pub fn standard() -> Result<Self, ArbiterError> {
        Ok(Self::new(
            ViolationDetector::standard()?,
            RepairEngine::standard()?,
        ))
    }

    pub fn detector(&self) -> &ViolationDetector {
        &self.detector
    }

    pub fn repair_engine(&self) -> &RepairEngine {
        &self.repair
    }

    /// Evaluate one candidate. Pure in `(candidate, thresholds)`.
    pub fn evaluate(&self, candidate: &Candidate, thresholds: &GateThresholds) -> GateResult {
        let violations = self.detector.detect(candidate.text());
        let trigger = aggregate_trigger(&violations);

        if let Some((reason, detail)) = blocking(&violations, thresholds) {
            warn!(
                candidate = %candidate.id(),
                reason = %reason,
                detail = %detail,
                "Candidate rejected"
            );
            return GateResult {
                candidate_id: candidate.id().clone(),
                decision: GateDecision::Reject,
                repaired_text: None,
                actions: Vec::new(),
                pre_repair_violations: violations.clone(),
                violations,
                trigger,
                reject_reason: Some(reason),
                rationale: detail,
            };
        }

        if let Some(detail) = escalation(&violations, thresholds) {
            warn!(candidate = %candidate.id(), detail = %detail, "Candidate escalated");
            return GateResult {
                candidate_id: candidate.id().clone(),
                decision: GateDecision::Escalate,
                repaired_text: None,
                actions: Vec::new(),
                pre_repair_violations: violations.clone(),
                violations,
                trigger,
                reject_reason: Some(RejectReason::Escalated),
                rationale: detail,
            };
        }

        if trigger < thresholds.repair {
            debug!(candidate = %candidate.id(), trigger, "Candidate allowed");
            return GateResult {
                candidate_id: candidate.id().clone(),
                decision: GateDecision::Allow,
                repaired_text: None,
                actions: Vec::new(),
                pre_repair_violations: violations.clone(),
                violations,
                trigger,
                reject_reason: None,
                rationale: format!(
                    "repair trigger {:.3} below threshold {:.3}",
                    trigger, thresholds.repair
                ),
            };
        }

        let Some(outcome) = self
            .repair
            .repair(candidate, &violations, thresholds.max_repairs)
        else {
            warn!(candidate = %candidate.id(), trigger, "Repair produced no safe text");
            return GateResult {
                candidate_id: candidate.id().clone(),
                decision: GateDecision::Reject,
                repaired_text: None,
                actions: Vec::new(),
                pre_repair_violations: violations.clone(),
                violations,
                trigger,
                reject_reason: Some(RejectReason::RepairFailed),
                rationale: format!(
                    "repair attempted at trigger {:.3} and no applicable repair was found",
                    trigger
                ),
            };
        };

        let residual = self.detector.detect(&outcome.text);
        if let Some(detail) = residual_block(&residual, thresholds) {
            warn!(
                candidate = %candidate.id(),
                detail = %detail,
                "Repaired text still blocked"
            );
            return GateResult {
                candidate_id: candidate.id().clone(),
                decision: GateDecision::Reject,
                repaired_text: None,
                actions: outcome.actions,
                violations: residual,
                pre_repair_violations: violations,
                trigger,
                reject_reason: Some(RejectReason::RepairFailed),
                rationale: format!("repair attempted and failed: {detail}"),
            };
        }

        debug!(
            candidate = %candidate.id(),
            stages = outcome.actions.len(),
            residual = residual.len(),
            "Candidate allowed with repair"
        );
        GateResult {
            candidate_id: candidate.id().clone(),
            decision: GateDecision::AllowWithRepair,
            rationale: format!(
                "repaired in {} stage(s) from trigger {:.3}",
                outcome.actions.len(),
                trigger
            ),
            repaired_text: Some(outcome.text),
            actions: outcome.actions,
            violations: residual,
            pre_repair_violations: violations,
            trigger,
            reject_reason: None,
        }
    }
}

/// Maximum impact among repairable violations; zero when there are none.
pub fn aggregate_trigger(violations: &[Violation]) -> f64 {
    violations
        .iter()
        .filter(|v| v.repairable)
        .map(Violation::impact)
        .fold(0.0, f64::max)
}

fn blocking(violations: &[Violation], thresholds: &GateThresholds) -> Option<(RejectReason, String)> {
    if let Some(hard) = violations.iter().find(|v| v.is_hard()) {
        return Some((
            RejectReason::HardViolation,
            format!("hard violation, unrepairable: {hard}"),
        ));
    }
    violations
        .iter()
        .find(|v| !v.repairable && v.impact() >= thresholds.reject)
        .map(|v| {
            (
                RejectReason::Unrepairable,
                format!(
                    "unrepairable {} with impact {:.3} at or above {:.3}",
                    v,
                    v.impact(),
                    thresholds.reject
                ),
            )
        })
}

/// Why a repaired text is still unacceptable, if it is.
fn residual_block(residual: &[Violation], thresholds: &GateThresholds) -> Option<String> {
    if let Some((_, detail)) = blocking(residual, thresholds) {
        return Some(detail);
    }
    let remaining = aggregate_trigger(residual);
    (remaining >= thresholds.repair).then(|| {
        format!(
            "residual trigger {:.3} at or above {:.3}",
            remaining, thresholds.repair
        )
    })
}

fn escalation(violations: &[Violation], thresholds: &GateThresholds) -> Option<String> {
    let policy = thresholds.escalation?;
    violations
        .iter()
        .find(|v| {
            !v.repairable && v.severity >= thresholds.reject && v.confidence < policy.min_confidence
        })
        .map(|v| {
            format!(
                "{} is severe but confidence {:.2} is below {:.2}",
                v, v.confidence, policy.min_confidence
            )
        })
}
