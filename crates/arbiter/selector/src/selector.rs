use maple_arbiter_gate::SafetyGate;
use maple_arbiter_mcda::{partition_front, rank, ScoredCandidate};
use maple_arbiter_metrics::{CandidateMetrics, MetricsEvaluator};
use maple_arbiter_types::{
    canonical_profile, validate_batch, ArbiterError, Axis, Candidate, ContextProfile, GateResult,
    RejectReason, RejectedCandidate, SelectionResult,
};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::SelectionConfig;
use crate::report::SelectionReport;

/// Chooses at most one candidate out of an ensemble.
///
/// Every candidate goes through the safety gate. Survivors are scored
/// against the context profile, Pareto-filtered and ranked; the top entry
/// wins. Gate and scoring run in parallel, but results are merged back in
/// input order before any ordering-sensitive step.
pub struct Selector {
    gate: SafetyGate,
    evaluator: MetricsEvaluator,
}

impl Selector {
    pub fn new(gate: SafetyGate, evaluator: MetricsEvaluator) -> Self {
        Self { gate, evaluator }
    }

    /// Selector over the reference detector, repair tables and scorers.
    pub fn standard() -> Result<Self, ArbiterError> {
        Ok(Self::new(SafetyGate::standard()?, MetricsEvaluator::standard()?))
    }

    pub fn gate(&self) -> &SafetyGate {
        &self.gate
    }

    pub fn evaluator(&self) -> &MetricsEvaluator {
        &self.evaluator
    }

    pub fn select(
        &self,
        candidates: &[Candidate],
        profile: &ContextProfile,
        config: &SelectionConfig,
    ) -> Result<SelectionResult, ArbiterError> {
        Ok(self
            .select_with_diagnostics(candidates, profile, config)?
            .result)
    }

    /// [`Self::select`] with the profile resolved by name.
    pub fn select_with_profile_name(
        &self,
        candidates: &[Candidate],
        profile_name: &str,
        config: &SelectionConfig,
    ) -> Result<SelectionResult, ArbiterError> {
        self.select(candidates, &canonical_profile(profile_name)?, config)
    }

    pub fn select_with_diagnostics(
        &self,
        candidates: &[Candidate],
        profile: &ContextProfile,
        config: &SelectionConfig,
    ) -> Result<SelectionReport, ArbiterError> {
        config.validate()?;
        validate_batch(candidates)?;

        let gate_results: Vec<GateResult> = candidates
            .par_iter()
            .map(|c| self.gate.evaluate(c, &config.thresholds))
            .collect();

        let mut rejected: Vec<(usize, RejectedCandidate)> = Vec::new();
        let mut accepted: Vec<(usize, Candidate)> = Vec::new();
        for (index, (candidate, gate)) in candidates.iter().zip(&gate_results).enumerate() {
            match gate.rejection() {
                Some(reason) => rejected.push((
                    index,
                    RejectedCandidate {
                        id: gate.candidate_id.clone(),
                        reason,
                        detail: gate.rationale.clone(),
                        violations: gate.violations.clone(),
                    },
                )),
                None => {
                    let effective = match &gate.repaired_text {
                        Some(text) => candidate.with_text(text.clone()),
                        None => candidate.clone(),
                    };
                    accepted.push((index, effective));
                }
            }
        }

        let metrics: Vec<CandidateMetrics> = accepted
            .par_iter()
            .map(|(_, c)| self.evaluator.evaluate(c, profile))
            .collect();

        let mut scored = Vec::with_capacity(metrics.len());
        for ((index, _), m) in accepted.iter().zip(&metrics) {
            if config.enforce_floors && m.has_min_violation {
                debug!(candidate = %m.candidate_id, "Candidate below profile floor");
                rejected.push((
                    *index,
                    RejectedCandidate {
                        id: m.candidate_id.clone(),
                        reason: RejectReason::BelowFloor,
                        detail: floor_detail(m),
                        violations: gate_results[*index].violations.clone(),
                    },
                ));
            } else {
                scored.push(ScoredCandidate {
                    id: m.candidate_id.clone(),
                    vector: m.scores.vector(),
                });
            }
        }
        rejected.sort_by_key(|(index, _)| *index);

        let (front, dominated) = partition_front(&scored);
        let ranking = rank(&front, config.method, config.seed);
        let selected_id = ranking.first().map(|r| r.id.clone());

        info!(
            total = candidates.len(),
            rejected = rejected.len(),
            accepted = scored.len(),
            pareto = front.len(),
            method = %config.method,
            profile = profile.name(),
            winner = selected_id.as_ref().map(|id| id.as_str()).unwrap_or("none"),
            "Selection complete"
        );

        let result = SelectionResult {
            selected_id,
            pareto_set: front.iter().map(|c| c.id.clone()).collect(),
            rejected: rejected.into_iter().map(|(_, r)| r).collect(),
            method: config.method,
        };

        Ok(SelectionReport {
            total: candidates.len(),
            rejected_count: result.rejected.len(),
            accepted_count: scored.len(),
            pareto_size: front.len(),
            method: config.method,
            dominated: dominated.into_iter().map(|c| c.id).collect(),
            gate_results,
            metrics,
            ranking,
            result,
        })
    }
}

fn floor_detail(metrics: &CandidateMetrics) -> String {
    let axes: Vec<&str> = metrics.below_floor().iter().map(Axis::as_str).collect();
    format!(
        "below {} profile floor on {}",
        metrics.profile,
        axes.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use maple_arbiter_types::{default_profile, RankingMethod};

    fn selector() -> Selector {
        Selector::standard().unwrap()
    }

    #[test]
    fn empty_batch_selects_nothing() {
        let report = selector()
            .select_with_diagnostics(&[], &default_profile(), &SelectionConfig::default())
            .unwrap();
        assert!(report.result.is_empty());
        assert_eq!(report.total, 0);
        assert!(report.accounts_for_all());
    }

    #[test]
    fn invalid_config_fails_before_gating() {
        let config = SelectionConfig::default().with_method(RankingMethod::RobustWeights { samples: 0 });
        let result = selector().select(
            &[Candidate::new("a", "fine")],
            &default_profile(),
            &config,
        );
        assert!(matches!(result, Err(ArbiterError::InvalidConfig(_))));
    }

    #[test]
    fn repaired_text_is_what_gets_scored() {
        let report = selector()
            .select_with_diagnostics(
                &[Candidate::new("b", "We will control users to protect them")],
                &default_profile(),
                &SelectionConfig::default(),
            )
            .unwrap();
        let metrics = &report.metrics[0];
        // The injected consent qualifier is an autonomy cue
        assert!(metrics.scores.value(Axis::Autonomy) > 0.5);
        assert_eq!(report.result.selected_id.as_ref().map(|id| id.as_str()), Some("b"));
    }

    #[test]
    fn floor_enforcement_moves_candidates_to_rejected() {
        let candidates = [
            Candidate::new("risky", "A reckless and dangerous shortcut"),
            Candidate::new("careful", "A safe and fair rollout"),
        ];
        let config = SelectionConfig::default().enforcing_floors();
        let report = selector()
            .select_with_diagnostics(&candidates, &default_profile(), &config)
            .unwrap();

        assert_eq!(report.result.rejected.len(), 1);
        assert_eq!(report.result.rejected[0].id.as_str(), "risky");
        assert_eq!(report.result.rejected[0].reason, RejectReason::BelowFloor);
        assert!(report.result.rejected[0].detail.contains("safety"));
        assert_eq!(report.metrics.len(), 2);
        assert!(report.accounts_for_all());

        let relaxed = selector()
            .select(&candidates, &default_profile(), &SelectionConfig::default())
            .unwrap();
        assert!(relaxed.rejected.is_empty());
    }
}
