//! Staged text repair.
//!
//! Stages run in the fixed order concept mapping → constraint injection →
//! scope reduction → goal reframe, each at most once. The engine stops as
//! soon as no stage has a pending trigger in the current text, or when the
//! caller's stage budget is spent.

pub mod stages;
pub mod tables;

use maple_arbiter_types::{ArbiterError, Candidate, RepairAction, RepairStageKind, Violation};
use tracing::debug;

pub use stages::{ConstraintInjectionStage, SubstitutionStage};
pub use tables::{ConstraintRule, RepairTables, Substitution};

/// Text produced by one stage application.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageEdit {
    pub text: String,
    pub description: String,
}

/// One repair stage: a pure text transform.
pub trait RepairStage: Send + Sync {
    /// Which stage of the fixed order this is.
    fn kind(&self) -> RepairStageKind;

    /// Whether the text still holds something this stage would rewrite.
    fn is_triggered(&self, text: &str) -> bool;

    /// Apply the stage. `None` when nothing in `text` triggers it.
    fn apply(&self, text: &str) -> Option<StageEdit>;
}

/// Successful repair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepairOutcome {
    pub text: String,
    pub actions: Vec<RepairAction>,
}

impl RepairOutcome {
    /// The repaired candidate: same identifier, new text.
    pub fn apply_to(&self, candidate: &Candidate) -> Candidate {
        candidate.with_text(self.text.clone())
    }
}

/// Runs the repair stages over a candidate's text.
pub struct RepairEngine {
    stages: Vec<Box<dyn RepairStage>>,
}

impl RepairEngine {
    pub fn new(tables: &RepairTables) -> Result<Self, ArbiterError> {
        Ok(Self::with_stages(vec![
            Box::new(SubstitutionStage::new(
                RepairStageKind::ConceptMapping,
                &tables.concept_map,
            )?),
            Box::new(ConstraintInjectionStage::new(&tables.constraints)?),
            Box::new(SubstitutionStage::new(
                RepairStageKind::ScopeReduction,
                &tables.scope_map,
            )?),
            Box::new(SubstitutionStage::new(
                RepairStageKind::GoalReframe,
                &tables.goal_map,
            )?),
        ]))
    }

    /// Engine over the reference tables.
    pub fn standard() -> Result<Self, ArbiterError> {
        Self::new(&RepairTables::default())
    }

    /// Engine over custom stages. Stages are put into precedence order;
    /// stages of the same kind keep the order given.
    pub fn with_stages(mut stages: Vec<Box<dyn RepairStage>>) -> Self {
        stages.sort_by_key(|s| s.kind());
        Self { stages }
    }

    /// Whether any stage would still rewrite `text`.
    pub fn has_pending_trigger(&self, text: &str) -> bool {
        self.stages.iter().any(|s| s.is_triggered(text))
    }

    /// Attempt to repair `candidate`, applying at most `max_stages` stages.
    ///
    /// Only the repairable subset of `violations` is addressed. Returns
    /// `None` when there is nothing repairable, when no stage changed the
    /// text, or when a hard violation's evidence survives the rewrite.
    pub fn repair(
        &self,
        candidate: &Candidate,
        violations: &[Violation],
        max_stages: usize,
    ) -> Option<RepairOutcome> {
        if !violations.iter().any(|v| v.repairable) {
            return None;
        }

        let mut text = candidate.text().to_string();
        let mut actions = Vec::new();

        for stage in &self.stages {
            if actions.len() >= max_stages || !self.has_pending_trigger(&text) {
                break;
            }
            if let Some(edit) = stage.apply(&text) {
                debug!(
                    candidate = %candidate.id(),
                    stage = %stage.kind(),
                    description = %edit.description,
                    "Repair stage applied"
                );
                text = edit.text;
                actions.push(RepairAction::new(stage.kind(), edit.description));
            }
        }

        if actions.is_empty() {
            return None;
        }

        let lowered = text.to_lowercase();
        let hard_survives = violations
            .iter()
            .filter(|v| v.is_hard())
            .flat_map(|v| &v.evidence)
            .any(|e| lowered.contains(&e.to_lowercase()));
        if hard_survives {
            debug!(candidate = %candidate.id(), "Hard violation survives repair");
            return None;
        }

        Some(RepairOutcome { text, actions })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maple_arbiter_types::ViolationCategory;

    fn engine() -> RepairEngine {
        RepairEngine::standard().unwrap()
    }

    fn dignity(evidence: &str) -> Violation {
        Violation::new(
            ViolationCategory::DignityViolation,
            0.6,
            0.8,
            vec![evidence.into()],
            true,
        )
    }

    #[test]
    fn concept_mapping_then_constraint_injection() {
        let candidate = Candidate::new("b", "We will control users to protect them");
        let outcome = engine()
            .repair(&candidate, &[dignity("control users")], 4)
            .unwrap();

        assert_eq!(
            outcome.text,
            "We will support users to protect them. \
             Any intervention requires the informed consent of the people affected."
        );
        let stages: Vec<_> = outcome.actions.iter().map(|a| a.stage).collect();
        assert_eq!(
            stages,
            vec![
                RepairStageKind::ConceptMapping,
                RepairStageKind::ConstraintInjection
            ]
        );
        assert_eq!(outcome.apply_to(&candidate).id(), candidate.id());
    }

    #[test]
    fn stops_when_nothing_is_pending() {
        let candidate = Candidate::new("x", "Please coerce nobody");
        let outcome = engine().repair(&candidate, &[dignity("coerce")], 4).unwrap();
        assert_eq!(outcome.actions.len(), 1);
        assert_eq!(outcome.text, "Please invite nobody");
    }

    #[test]
    fn stage_budget_is_respected() {
        let candidate = Candidate::new(
            "y",
            "We will manipulate users and track all purchases to maximize engagement",
        );
        let outcome = engine()
            .repair(&candidate, &[dignity("manipulate")], 1)
            .unwrap();
        assert_eq!(outcome.actions.len(), 1);
        assert_eq!(outcome.actions[0].stage, RepairStageKind::ConceptMapping);

        let full = engine()
            .repair(&candidate, &[dignity("manipulate")], 4)
            .unwrap();
        let stages: Vec<_> = full.actions.iter().map(|a| a.stage).collect();
        assert_eq!(stages, RepairStageKind::ORDER.to_vec());
        assert!(full.text.contains("track relevant purchases"));
        assert!(full.text.contains("support user wellbeing"));
        assert!(!engine().has_pending_trigger(&full.text));
    }

    #[test]
    fn nothing_repairable_means_no_repair() {
        let candidate = Candidate::new("z", "Dominate every market");
        let domination = Violation::new(
            ViolationCategory::DominationCapture,
            0.7,
            0.9,
            vec!["Dominate".into()],
            false,
        );
        assert!(engine().repair(&candidate, &[domination], 4).is_none());
        assert!(engine().repair(&candidate, &[], 4).is_none());
    }

    #[test]
    fn untouched_text_means_no_repair() {
        let candidate = Candidate::new("w", "Ignore minorities in planning");
        let exclusion = Violation::new(
            ViolationCategory::StructuralExclusion,
            0.7,
            0.75,
            vec!["Ignore minorities".into()],
            true,
        );
        assert!(engine().repair(&candidate, &[exclusion], 4).is_none());
    }

    #[test]
    fn surviving_hard_violation_blocks_repair() {
        let candidate = Candidate::new("h", "Manipulate them, then destroy the records");
        let hard = Violation::new(
            ViolationCategory::IrreversibleHarm,
            0.7,
            0.9,
            vec!["destroy".into()],
            false,
        );
        assert!(engine()
            .repair(&candidate, &[dignity("Manipulate"), hard], 4)
            .is_none());
    }

    #[test]
    fn zero_budget_repairs_nothing() {
        let candidate = Candidate::new("q", "We will coerce them");
        assert!(engine().repair(&candidate, &[dignity("coerce")], 0).is_none());
    }

    #[test]
    fn repair_is_deterministic() {
        let candidate = Candidate::new("d", "Force users to share all data, always");
        let a = engine().repair(&candidate, &[dignity("Force users")], 4);
        let b = engine().repair(&candidate, &[dignity("Force users")], 4);
        assert_eq!(a, b);
    }

    struct Shout;

    impl RepairStage for Shout {
        fn kind(&self) -> RepairStageKind {
            RepairStageKind::GoalReframe
        }
        fn is_triggered(&self, text: &str) -> bool {
            text.contains("quiet")
        }
        fn apply(&self, text: &str) -> Option<StageEdit> {
            self.is_triggered(text).then(|| StageEdit {
                text: text.replace("quiet", "LOUD"),
                description: "shouted".into(),
            })
        }
    }

    #[test]
    fn custom_stages_are_sorted_into_precedence_order() {
        let concept =
            SubstitutionStage::new(RepairStageKind::ConceptMapping, &[Substitution::new("a", "b")])
                .unwrap();
        let engine = RepairEngine::with_stages(vec![Box::new(Shout), Box::new(concept)]);
        let outcome = engine
            .repair(&Candidate::new("s", "a quiet plan"), &[dignity("a")], 4)
            .unwrap();
        let stages: Vec<_> = outcome.actions.iter().map(|a| a.stage).collect();
        assert_eq!(
            stages,
            vec![RepairStageKind::ConceptMapping, RepairStageKind::GoalReframe]
        );
        assert_eq!(outcome.text, "b LOUD plan");
    }
}
