use maple_arbiter_types::{ArbiterError, PhrasePattern, RepairStageKind};

use super::tables::{ConstraintRule, Substitution};
use super::{RepairStage, StageEdit};

struct CompiledSubstitution {
    pattern: PhrasePattern,
    replacement: String,
}

/// A stage that rewrites phrases in place from a substitution table.
///
/// Concept mapping, scope reduction and goal reframing are all this
/// transform over different tables.
pub struct SubstitutionStage {
    kind: RepairStageKind,
    substitutions: Vec<CompiledSubstitution>,
}

impl SubstitutionStage {
    pub fn new(kind: RepairStageKind, table: &[Substitution]) -> Result<Self, ArbiterError> {
        let substitutions = table
            .iter()
            .map(|sub| {
                Ok(CompiledSubstitution {
                    pattern: PhrasePattern::compile(&sub.from)?,
                    replacement: sub.to.clone(),
                })
            })
            .collect::<Result<Vec<_>, ArbiterError>>()?;
        Ok(Self {
            kind,
            substitutions,
        })
    }
}

impl RepairStage for SubstitutionStage {
    fn kind(&self) -> RepairStageKind {
        self.kind
    }

    fn is_triggered(&self, text: &str) -> bool {
        self.substitutions.iter().any(|s| s.pattern.is_match(text))
    }

    fn apply(&self, text: &str) -> Option<StageEdit> {
        let mut current = text.to_string();
        let mut applied = Vec::new();

        for sub in &self.substitutions {
            if sub.pattern.is_match(&current) {
                current = sub.pattern.replace_all(&current, &sub.replacement);
                applied.push(format!(
                    "replaced '{}' with '{}'",
                    sub.pattern.phrase(),
                    sub.replacement
                ));
            }
        }

        if applied.is_empty() {
            return None;
        }
        Some(StageEdit {
            text: current,
            description: applied.join("; "),
        })
    }
}

struct CompiledConstraint {
    triggers: Vec<PhrasePattern>,
    qualifier: String,
}

impl CompiledConstraint {
    fn is_pending(&self, text: &str) -> bool {
        self.triggers.iter().any(|t| t.is_match(text))
            && !text.to_lowercase().contains(&self.qualifier.to_lowercase())
    }
}

/// Appends explicit safety, consent and privacy qualifiers.
pub struct ConstraintInjectionStage {
    constraints: Vec<CompiledConstraint>,
}

impl ConstraintInjectionStage {
    pub fn new(rules: &[ConstraintRule]) -> Result<Self, ArbiterError> {
        let mut constraints = Vec::with_capacity(rules.len());
        for rule in rules {
            let triggers = rule
                .triggers
                .iter()
                .map(|t| PhrasePattern::compile(t))
                .collect::<Result<Vec<_>, _>>()?;
            constraints.push(CompiledConstraint {
                triggers,
                qualifier: rule.qualifier.trim().to_string(),
            });
        }
        Ok(Self { constraints })
    }
}

impl RepairStage for ConstraintInjectionStage {
    fn kind(&self) -> RepairStageKind {
        RepairStageKind::ConstraintInjection
    }

    fn is_triggered(&self, text: &str) -> bool {
        self.constraints.iter().any(|c| c.is_pending(text))
    }

    fn apply(&self, text: &str) -> Option<StageEdit> {
        let pending: Vec<&str> = self
            .constraints
            .iter()
            .filter(|c| c.is_pending(text))
            .map(|c| c.qualifier.as_str())
            .collect();
        if pending.is_empty() {
            return None;
        }

        let mut current = text.trim_end().to_string();
        if !current.is_empty() && !current.ends_with(['.', '!', '?']) {
            current.push('.');
        }
        for qualifier in &pending {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(qualifier);
        }

        Some(StageEdit {
            text: current,
            description: format!("appended: {}", pending.join(" ")),
        })
    }
}
