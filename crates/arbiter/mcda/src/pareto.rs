use maple_arbiter_types::{CandidateId, ScoreVector};
use serde::{Deserialize, Serialize};

/// A candidate reduced to its identifier and axis values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub id: CandidateId,
    pub vector: ScoreVector,
}

impl ScoredCandidate {
    pub fn new(id: impl Into<CandidateId>, vector: impl Into<ScoreVector>) -> Self {
        Self {
            id: id.into(),
            vector: vector.into(),
        }
    }
}

/// `a` dominates `b`: at least as good on every axis, strictly better on one.
pub fn dominates(a: &ScoreVector, b: &ScoreVector) -> bool {
    let mut strictly_better = false;
    for (x, y) in a.values().iter().zip(b.values()) {
        if x < y {
            return false;
        }
        if x > y {
            strictly_better = true;
        }
    }
    strictly_better
}

/// Indices of the non-dominated vectors, in input order.
///
/// Identical vectors never dominate each other, so duplicates on the front
/// all stay; ranking later resolves them by input order.
pub fn front_indices(vectors: &[ScoreVector]) -> Vec<usize> {
    (0..vectors.len())
        .filter(|&i| {
            !vectors
                .iter()
                .enumerate()
                .any(|(j, other)| j != i && dominates(other, &vectors[i]))
        })
        .collect()
}

/// The non-dominated subset of `candidates`, in input order.
pub fn pareto_front(candidates: &[ScoredCandidate]) -> Vec<ScoredCandidate> {
    let vectors: Vec<ScoreVector> = candidates.iter().map(|c| c.vector).collect();
    front_indices(&vectors)
        .into_iter()
        .map(|i| candidates[i].clone())
        .collect()
}

/// Split into `(front, dominated)`, both in input order.
pub fn partition_front(
    candidates: &[ScoredCandidate],
) -> (Vec<ScoredCandidate>, Vec<ScoredCandidate>) {
    let vectors: Vec<ScoreVector> = candidates.iter().map(|c| c.vector).collect();
    let on_front = front_indices(&vectors);
    let mut front = Vec::with_capacity(on_front.len());
    let mut dominated = Vec::new();
    let mut next = on_front.iter().peekable();
    for (i, candidate) in candidates.iter().enumerate() {
        if next.peek() == Some(&&i) {
            next.next();
            front.push(candidate.clone());
        } else {
            dominated.push(candidate.clone());
        }
    }
    (front, dominated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn v(values: [f64; 5]) -> ScoreVector {
        ScoreVector::new(values)
    }

    fn ids(front: &[ScoredCandidate]) -> Vec<&str> {
        front.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn dominance_needs_one_strict_axis() {
        let a = v([0.6, 0.5, 0.5, 0.5, 0.5]);
        let b = v([0.5, 0.5, 0.5, 0.5, 0.5]);
        assert!(dominates(&a, &b));
        assert!(!dominates(&b, &a));
        assert!(!dominates(&a, &a));
    }

    #[test]
    fn single_candidate_is_its_own_front() {
        let only = [ScoredCandidate::new("solo", [0.1; 5])];
        assert_eq!(ids(&pareto_front(&only)), vec!["solo"]);
    }

    #[test]
    fn dominated_candidate_is_dropped() {
        let set = [
            ScoredCandidate::new("weak", [0.4; 5]),
            ScoredCandidate::new("strong", [0.6; 5]),
        ];
        assert_eq!(ids(&pareto_front(&set)), vec!["strong"]);
    }

    #[test]
    fn complementary_candidates_both_survive() {
        let set = [
            ScoredCandidate::new("open", [0.5, 0.5, 0.5, 0.95, 0.5]),
            ScoredCandidate::new("safe", [0.95, 0.5, 0.5, 0.5, 0.5]),
        ];
        assert_eq!(ids(&pareto_front(&set)), vec!["open", "safe"]);
    }

    #[test]
    fn identical_vectors_keep_input_order() {
        let set = [
            ScoredCandidate::new("b", [0.5; 5]),
            ScoredCandidate::new("a", [0.5; 5]),
            ScoredCandidate::new("low", [0.2; 5]),
        ];
        let (front, dominated) = partition_front(&set);
        assert_eq!(ids(&front), vec!["b", "a"]);
        assert_eq!(ids(&dominated), vec!["low"]);
    }

    #[test]
    fn empty_input_has_empty_front() {
        assert!(pareto_front(&[]).is_empty());
    }

    fn vectors() -> impl Strategy<Value = Vec<ScoreVector>> {
        prop::collection::vec(
            prop::array::uniform5(0u8..=4).prop_map(|a| ScoreVector::new(a.map(|x| x as f64 / 4.0))),
            0..12,
        )
    }

    proptest! {
        #[test]
        fn front_is_mutually_non_dominated(vs in vectors()) {
            let front = front_indices(&vs);
            if !vs.is_empty() {
                prop_assert!(!front.is_empty());
            }
            for &i in &front {
                for &j in &front {
                    prop_assert!(!dominates(&vs[i], &vs[j]));
                }
            }
        }

        #[test]
        fn every_dropped_vector_has_a_dominator_on_the_front(vs in vectors()) {
            let front = front_indices(&vs);
            for i in (0..vs.len()).filter(|i| !front.contains(i)) {
                prop_assert!(front.iter().any(|&f| dominates(&vs[f], &vs[i])));
            }
        }
    }
}
