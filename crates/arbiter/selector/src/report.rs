use std::collections::BTreeMap;

use maple_arbiter_metrics::CandidateMetrics;
use maple_arbiter_types::{CandidateId, GateResult, RankedCandidate, RankingMethod, SelectionResult};
use serde::{Deserialize, Serialize};

/// A [`SelectionResult`] plus everything that led to it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectionReport {
    pub result: SelectionResult,
    pub total: usize,
    pub rejected_count: usize,
    /// Candidates that reached Pareto filtering
    pub accepted_count: usize,
    pub pareto_size: usize,
    pub method: RankingMethod,
    /// Accepted but dominated, input order
    pub dominated: Vec<CandidateId>,
    /// One per input candidate, input order
    pub gate_results: Vec<GateResult>,
    /// One per gate-accepted candidate, input order
    pub metrics: Vec<CandidateMetrics>,
    /// The Pareto front, best first
    pub ranking: Vec<RankedCandidate>,
}

impl SelectionReport {
    /// Every input candidate sits in exactly one of: rejected, Pareto set,
    /// dominated.
    pub fn accounts_for_all(&self) -> bool {
        let mut buckets: BTreeMap<&CandidateId, usize> = BTreeMap::new();
        let placed = self
            .result
            .rejected
            .iter()
            .map(|r| &r.id)
            .chain(&self.result.pareto_set)
            .chain(&self.dominated);
        for id in placed {
            *buckets.entry(id).or_default() += 1;
        }

        self.gate_results.len() == self.total
            && buckets.len() == self.total
            && self
                .gate_results
                .iter()
                .all(|g| buckets.get(&g.candidate_id) == Some(&1))
    }

    /// Gate result for `id`, if it was part of the call.
    pub fn gate_result(&self, id: &CandidateId) -> Option<&GateResult> {
        self.gate_results.iter().find(|g| &g.candidate_id == id)
    }

    pub fn metrics_for(&self, id: &CandidateId) -> Option<&CandidateMetrics> {
        self.metrics.iter().find(|m| &m.candidate_id == id)
    }
}
