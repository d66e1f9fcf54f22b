use std::fmt;

use serde::{Deserialize, Serialize};

use crate::axis::clamp_unit;

/// Closed set of violation categories the detector can report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCategory {
    /// Harm that cannot be undone once done
    IrreversibleHarm,
    /// Domination or capture of people, markets or institutions
    DominationCapture,
    /// Treating people as objects to be controlled or manipulated
    DignityViolation,
    /// Deliberately engineering dependency or lock-in
    DependencyEngineering,
    /// Shutting groups out by construction
    StructuralExclusion,
}

impl ViolationCategory {
    pub const ALL: [ViolationCategory; 5] = [
        ViolationCategory::IrreversibleHarm,
        ViolationCategory::DominationCapture,
        ViolationCategory::DignityViolation,
        ViolationCategory::DependencyEngineering,
        ViolationCategory::StructuralExclusion,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            ViolationCategory::IrreversibleHarm => "irreversible_harm",
            ViolationCategory::DominationCapture => "domination_capture",
            ViolationCategory::DignityViolation => "dignity_violation",
            ViolationCategory::DependencyEngineering => "dependency_engineering",
            ViolationCategory::StructuralExclusion => "structural_exclusion",
        }
    }

    /// Irreversible and domination-class harm cannot be rewritten away.
    pub fn default_repairable(&self) -> bool {
        !matches!(
            self,
            ViolationCategory::IrreversibleHarm | ViolationCategory::DominationCapture
        )
    }
}

impl fmt::Display for ViolationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One detected violation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub category: ViolationCategory,
    /// Strength of the finding (0.0–1.0)
    pub severity: f64,
    /// How sure the detector is (0.0–1.0)
    pub confidence: f64,
    /// Matched indicator phrases, in text order
    pub evidence: Vec<String>,
    pub repairable: bool,
}

impl Violation {
    pub fn new(
        category: ViolationCategory,
        severity: f64,
        confidence: f64,
        evidence: Vec<String>,
        repairable: bool,
    ) -> Self {
        Self {
            category,
            severity: clamp_unit(severity),
            confidence: clamp_unit(confidence),
            evidence,
            repairable,
        }
    }

    /// `severity × confidence`.
    pub fn impact(&self) -> f64 {
        self.severity * self.confidence
    }

    /// Irreversible harm that no repair may address. Always forces rejection.
    pub fn is_hard(&self) -> bool {
        self.category == ViolationCategory::IrreversibleHarm && !self.repairable
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (severity {:.2}, confidence {:.2})",
            self.category, self.severity, self.confidence
        )
    }
}
