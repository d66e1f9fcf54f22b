//! Property tests: determinism and full accounting of every selection.

use maple_arbiter::*;
use proptest::prelude::*;
use std::sync::OnceLock;

fn selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::standard().unwrap())
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

const FRAGMENTS: &[&str] = &[
    "a safe plan",
    "with privacy protections",
    "that explains each step",
    "for everyone in the community",
    "a fair and balanced rollout",
    "control users",
    "to protect them",
    "dominate the market",
    "destroy the records",
    "hook users early",
    "exclude rural users",
    "track all purchases",
    "we refuse to manipulate anyone",
    "with hidden fees",
];

fn arb_text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 1..4).prop_map(|parts| parts.join(" "))
}

fn arb_candidates() -> impl Strategy<Value = Vec<Candidate>> {
    prop::collection::vec(arb_text(), 0..8).prop_map(|texts| {
        texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| Candidate::new(format!("c{i}"), text))
            .collect()
    })
}

fn arb_method() -> impl Strategy<Value = RankingMethod> {
    prop_oneof![
        (1usize..200).prop_map(|samples| RankingMethod::RobustWeights { samples }),
        Just(RankingMethod::Topsis),
    ]
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_candidate_is_accounted_for(
        candidates in arb_candidates(),
        method in arb_method(),
        seed in any::<u64>(),
        enforce_floors in any::<bool>(),
    ) {
        let selector = selector();
        let mut config = SelectionConfig::default().with_method(method).with_seed(seed);
        config.enforce_floors = enforce_floors;

        let report = selector
            .select_with_diagnostics(&candidates, &default_profile(), &config)
            .unwrap();

        prop_assert!(report.accounts_for_all());
        prop_assert_eq!(report.total, candidates.len());
        prop_assert_eq!(
            report.rejected_count + report.pareto_size + report.dominated.len(),
            candidates.len()
        );
        prop_assert_eq!(report.result.selected_id.is_none(), report.pareto_size == 0);
        if let Some(winner) = &report.result.selected_id {
            prop_assert!(report.result.pareto_set.contains(winner));
        }
    }

    #[test]
    fn selection_is_reproducible(
        candidates in arb_candidates(),
        method in arb_method(),
        seed in any::<u64>(),
    ) {
        let selector = selector();
        let config = SelectionConfig::default().with_method(method).with_seed(seed);

        let first = selector.select(&candidates, &default_profile(), &config).unwrap();
        let second = selector.select(&candidates, &default_profile(), &config).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn hard_violations_never_win(candidates in arb_candidates()) {
        let selector = selector();
        let report = selector
            .select_with_diagnostics(&candidates, &default_profile(), &SelectionConfig::default())
            .unwrap();

        for gate in &report.gate_results {
            if gate.pre_repair_violations.iter().any(|v| v.is_hard()) {
                prop_assert_eq!(gate.decision, GateDecision::Reject);
                prop_assert_ne!(report.result.selected_id.as_ref(), Some(&gate.candidate_id));
            }
        }
    }
}
