use maple_arbiter_types::{
    ArbiterError, Axis, AxisScores, Candidate, CandidateId, ContextProfile, AXIS_COUNT,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::registry::ScorerRegistry;
use crate::scorer::AxisScorer;

/// Axis scores of one candidate plus their distances from the active profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CandidateMetrics {
    pub candidate_id: CandidateId,
    pub profile: String,
    pub scores: AxisScores,
    /// `max(0, target − value)` per axis, canonical order
    pub delta_plus: [f64; AXIS_COUNT],
    /// `max(0, floor − value)` per axis, canonical order
    pub min_violation: [f64; AXIS_COUNT],
    pub has_min_violation: bool,
    /// Euclidean norm of `delta_plus`
    pub d2: f64,
    /// Largest entry of `delta_plus`
    pub d_inf: f64,
}

impl CandidateMetrics {
    /// Derive the aggregates from raw scores.
    pub fn compute(candidate_id: CandidateId, scores: AxisScores, profile: &ContextProfile) -> Self {
        let delta_plus = Axis::ALL.map(|a| (profile.target(a) - scores.value(a)).max(0.0));
        let min_violation = Axis::ALL.map(|a| (profile.floor(a) - scores.value(a)).max(0.0));
        let d2 = delta_plus.iter().map(|d| d * d).sum::<f64>().sqrt();
        let d_inf = delta_plus.iter().copied().fold(0.0, f64::max);

        Self {
            candidate_id,
            profile: profile.name().to_string(),
            has_min_violation: min_violation.iter().any(|m| *m > 0.0),
            scores,
            delta_plus,
            min_violation,
            d2,
            d_inf,
        }
    }

    pub fn delta_plus_for(&self, axis: Axis) -> f64 {
        self.delta_plus[axis.index()]
    }

    pub fn min_violation_for(&self, axis: Axis) -> f64 {
        self.min_violation[axis.index()]
    }

    /// Axes whose value falls under the profile floor.
    pub fn below_floor(&self) -> Vec<Axis> {
        Axis::ALL
            .into_iter()
            .filter(|a| self.min_violation_for(*a) > 0.0)
            .collect()
    }
}

/// Scores candidates on every axis through one registered scorer per axis.
pub struct MetricsEvaluator {
    /// Canonical axis order
    scorers: Vec<Box<dyn AxisScorer>>,
}

impl MetricsEvaluator {
    /// Fails with `MissingScorer` unless every axis is registered.
    pub fn new(registry: ScorerRegistry) -> Result<Self, ArbiterError> {
        Ok(Self {
            scorers: registry.into_ordered()?,
        })
    }

    /// Evaluator over the lexical scorers.
    pub fn standard() -> Result<Self, ArbiterError> {
        Self::new(ScorerRegistry::standard()?)
    }

    /// Raw axis → score mapping.
    pub fn score(&self, candidate: &Candidate, profile: &ContextProfile) -> AxisScores {
        AxisScores::from_fn(|axis| self.scorers[axis.index()].score(candidate, profile))
    }

    /// Scores plus profile aggregates.
    pub fn evaluate(&self, candidate: &Candidate, profile: &ContextProfile) -> CandidateMetrics {
        let metrics =
            CandidateMetrics::compute(candidate.id().clone(), self.score(candidate, profile), profile);
        debug!(
            candidate = %candidate.id(),
            profile = profile.name(),
            d2 = metrics.d2,
            d_inf = metrics.d_inf,
            below_floor = metrics.has_min_violation,
            "Candidate scored"
        );
        metrics
    }
}
