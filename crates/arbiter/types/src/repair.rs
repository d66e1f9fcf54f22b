use std::fmt;

use serde::{Deserialize, Serialize};

/// Repair stages, in the fixed order they are attempted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairStageKind {
    /// Swap antagonistic or coercive vocabulary for cooperative equivalents
    ConceptMapping,
    /// Append explicit safety, consent or privacy qualifiers
    ConstraintInjection,
    /// Narrow absolute claims
    ScopeReduction,
    /// Rewrite stated objectives toward the injected constraints
    GoalReframe,
}

impl RepairStageKind {
    pub const ORDER: [RepairStageKind; 4] = [
        RepairStageKind::ConceptMapping,
        RepairStageKind::ConstraintInjection,
        RepairStageKind::ScopeReduction,
        RepairStageKind::GoalReframe,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RepairStageKind::ConceptMapping => "concept_mapping",
            RepairStageKind::ConstraintInjection => "constraint_injection",
            RepairStageKind::ScopeReduction => "scope_reduction",
            RepairStageKind::GoalReframe => "goal_reframe",
        }
    }
}

impl fmt::Display for RepairStageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A repair that was actually applied to a candidate's text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairAction {
    pub stage: RepairStageKind,
    pub description: String,
}

impl RepairAction {
    pub fn new(stage: RepairStageKind, description: impl Into<String>) -> Self {
        Self {
            stage,
            description: description.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_order_is_fixed() {
        let mut sorted = RepairStageKind::ORDER;
        sorted.sort();
        assert_eq!(sorted, RepairStageKind::ORDER);
        assert_eq!(RepairStageKind::ORDER[0], RepairStageKind::ConceptMapping);
        assert_eq!(RepairStageKind::ORDER[3], RepairStageKind::GoalReframe);
    }
}
