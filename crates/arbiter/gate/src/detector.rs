use maple_arbiter_types::{ArbiterError, PhrasePattern, Violation, ViolationCategory};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One indicator phrase and how strongly a match signals its category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    pub phrase: String,
    /// Contribution of a single match (0.0–1.0)
    pub weight: f64,
}

impl Indicator {
    pub fn new(phrase: impl Into<String>, weight: f64) -> Self {
        Self {
            phrase: phrase.into(),
            weight,
        }
    }
}

/// Indicator table for one category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: ViolationCategory,
    pub indicators: Vec<Indicator>,
    /// Confidence of an un-negated match
    pub base_confidence: f64,
    pub repairable: bool,
}

impl CategoryRule {
    /// Rule with the category's default repairability.
    pub fn new(category: ViolationCategory, base_confidence: f64, indicators: Vec<Indicator>) -> Self {
        Self {
            category,
            indicators,
            base_confidence,
            repairable: category.default_repairable(),
        }
    }
}

/// Pattern tables and negation handling for the detector.
///
/// The phrases are data. The detector's contract only depends on their
/// shape, never on the particular vocabulary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub categories: Vec<CategoryRule>,
    /// Words that, shortly before a match, mark it as refused or condemned
    pub negation_cues: Vec<String>,
    /// How many words before a match, within its clause, are searched for a
    /// negation cue
    pub negation_window: usize,
    /// Multiplier applied to the confidence of a negated match
    pub negation_discount: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        use ViolationCategory::*;

        let categories = vec![
            CategoryRule::new(
                IrreversibleHarm,
                0.9,
                vec![
                    Indicator::new("destroy*", 0.7),
                    Indicator::new("annihilat*", 0.9),
                    Indicator::new("kill*", 0.9),
                    Indicator::new("wipe out", 0.8),
                    Indicator::new("poison*", 0.8),
                    Indicator::new("permanently harm*", 0.9),
                    Indicator::new("irreversible harm", 0.9),
                ],
            ),
            CategoryRule::new(
                DominationCapture,
                0.9,
                vec![
                    Indicator::new("dominat*", 0.7),
                    Indicator::new("subjugat*", 0.8),
                    Indicator::new("monopoli*", 0.6),
                    Indicator::new("crush competitors", 0.6),
                    Indicator::new("eliminate competition", 0.6),
                    Indicator::new("total control", 0.7),
                    Indicator::new("capture the regulator*", 0.7),
                ],
            ),
            CategoryRule::new(
                DignityViolation,
                0.8,
                vec![
                    Indicator::new("control users", 0.6),
                    Indicator::new("control people", 0.6),
                    Indicator::new("manipulat*", 0.6),
                    Indicator::new("coerc*", 0.7),
                    Indicator::new("force users", 0.6),
                    Indicator::new("humiliat*", 0.6),
                    Indicator::new("exploit*", 0.6),
                    Indicator::new("surveil*", 0.5),
                    Indicator::new("track all", 0.5),
                ],
            ),
            CategoryRule::new(
                DependencyEngineering,
                0.75,
                vec![
                    Indicator::new("addict*", 0.6),
                    Indicator::new("make them dependent", 0.6),
                    Indicator::new("hook users", 0.6),
                    Indicator::new("lock in", 0.5),
                    Indicator::new("lock-in", 0.5),
                    Indicator::new("hard to cancel", 0.5),
                    Indicator::new("no way to leave", 0.6),
                    Indicator::new("maximize engagement", 0.4),
                ],
            ),
            CategoryRule::new(
                StructuralExclusion,
                0.75,
                vec![
                    Indicator::new("exclud*", 0.5),
                    Indicator::new("exclusion*", 0.5),
                    Indicator::new("deny access", 0.6),
                    Indicator::new("shut out", 0.5),
                    Indicator::new("only for premium", 0.5),
                    Indicator::new("ignore minorit*", 0.7),
                ],
            ),
        ];

        let negation_cues = [
            "not", "never", "no", "don't", "won't", "cannot", "nor", "without", "refuse",
            "refuses", "reject", "rejects", "condemn", "condemns", "oppose", "opposes", "against",
            "avoid", "avoids", "prevent", "prevents", "prohibit", "prohibits",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        Self {
            categories,
            negation_cues,
            negation_window: 4,
            negation_discount: 0.3,
        }
    }
}

/// Punctuation a negation cue does not reach across.
const CLAUSE_BREAKS: [char; 5] = ['.', '!', '?', ';', ':'];

struct CompiledIndicator {
    pattern: PhrasePattern,
    weight: f64,
}

struct CompiledRule {
    category: ViolationCategory,
    indicators: Vec<CompiledIndicator>,
    base_confidence: f64,
    repairable: bool,
}

/// Rule-based violation detector.
///
/// Pure: holds only compiled, immutable tables, so one detector can serve
/// any number of threads.
pub struct ViolationDetector {
    rules: Vec<CompiledRule>,
    negation_cues: Vec<String>,
    negation_window: usize,
    negation_discount: f64,
}

impl ViolationDetector {
    pub fn new(config: DetectorConfig) -> Result<Self, ArbiterError> {
        if !(0.0..=1.0).contains(&config.negation_discount) {
            return Err(ArbiterError::InvalidThreshold {
                name: "negation_discount".into(),
                value: config.negation_discount,
            });
        }

        let mut rules = Vec::with_capacity(config.categories.len());
        for rule in config.categories {
            let mut indicators = Vec::with_capacity(rule.indicators.len());
            for indicator in rule.indicators {
                indicators.push(CompiledIndicator {
                    pattern: PhrasePattern::compile(&indicator.phrase)?,
                    weight: maple_arbiter_types::clamp_unit(indicator.weight),
                });
            }
            rules.push(CompiledRule {
                category: rule.category,
                indicators,
                base_confidence: maple_arbiter_types::clamp_unit(rule.base_confidence),
                repairable: rule.repairable,
            });
        }

        Ok(Self {
            rules,
            negation_cues: config
                .negation_cues
                .into_iter()
                .map(|c| c.to_lowercase())
                .collect(),
            negation_window: config.negation_window,
            negation_discount: config.negation_discount,
        })
    }

    /// Detector over the reference tables.
    pub fn standard() -> Result<Self, ArbiterError> {
        Self::new(DetectorConfig::default())
    }

    /// Detect violations in `text`, at most one per category, in table order.
    ///
    /// Severity combines every match in the category as a noisy-OR of the
    /// indicator weights, so it grows with each extra match and never
    /// exceeds 1. Confidence is the strongest single match; a match preceded
    /// by a negation cue counts at a discount instead of being dropped.
    pub fn detect(&self, text: &str) -> Vec<Violation> {
        let mut violations = Vec::new();

        for rule in &self.rules {
            let mut miss_probability = 1.0;
            let mut confidence: f64 = 0.0;
            let mut evidence = Vec::new();

            for indicator in &rule.indicators {
                for found in indicator.pattern.find_iter(text) {
                    miss_probability *= 1.0 - indicator.weight;
                    let negated = self.is_negated(&text[..found.start()]);
                    let match_confidence = if negated {
                        rule.base_confidence * self.negation_discount
                    } else {
                        rule.base_confidence
                    };
                    confidence = confidence.max(match_confidence);
                    evidence.push(found.as_str().to_string());
                }
            }

            if evidence.is_empty() {
                continue;
            }

            let violation = Violation::new(
                rule.category,
                1.0 - miss_probability,
                confidence,
                evidence,
                rule.repairable,
            );
            debug!(
                category = %violation.category,
                severity = violation.severity,
                confidence = violation.confidence,
                matches = violation.evidence.len(),
                "Violation detected"
            );
            violations.push(violation);
        }

        violations
    }

    /// Whether a cue sits within the window before a match, inside the same
    /// clause.
    fn is_negated(&self, preceding: &str) -> bool {
        let clause = preceding
            .rfind(|c: char| CLAUSE_BREAKS.contains(&c))
            .map_or(preceding, |at| &preceding[at + 1..]);
        clause
            .split_whitespace()
            .rev()
            .take(self.negation_window)
            .map(|word| {
                word.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                    .to_lowercase()
            })
            .any(|word| self.negation_cues.iter().any(|cue| *cue == word))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> ViolationDetector {
        ViolationDetector::standard().unwrap()
    }

    fn find(violations: &[Violation], category: ViolationCategory) -> Option<&Violation> {
        violations.iter().find(|v| v.category == category)
    }

    #[test]
    fn empty_and_clean_text_yield_nothing() {
        assert!(detector().detect("").is_empty());
        assert!(detector()
            .detect("A collaborative plan with explicit privacy protections")
            .is_empty());
    }

    #[test]
    fn domination_is_detected_and_unrepairable() {
        let violations = detector().detect("Dominate and subjugate all markets");
        let v = find(&violations, ViolationCategory::DominationCapture).unwrap();
        assert!(!v.repairable);
        assert!(!v.is_hard());
        assert_eq!(v.evidence, vec!["Dominate".to_string(), "subjugate".to_string()]);
        // 1 - (1 - 0.7)(1 - 0.8)
        assert!((v.severity - 0.94).abs() < 1e-9);
        assert!((v.confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn irreversible_harm_is_hard() {
        let violations = detector().detect("We will destroy the wetlands");
        let v = find(&violations, ViolationCategory::IrreversibleHarm).unwrap();
        assert!(v.is_hard());
    }

    #[test]
    fn severity_grows_with_matches() {
        let one = detector().detect("We will manipulate voters");
        let two = detector().detect("We will manipulate and coerce voters");
        let s1 = find(&one, ViolationCategory::DignityViolation).unwrap().severity;
        let s2 = find(&two, ViolationCategory::DignityViolation).unwrap().severity;
        assert!(s2 > s1);
        assert!(s2 <= 1.0);
    }

    #[test]
    fn negation_discounts_confidence() {
        let plain = detector().detect("We will manipulate voters");
        let negated = detector().detect("We refuse to manipulate voters");
        let c_plain = find(&plain, ViolationCategory::DignityViolation).unwrap().confidence;
        let v_negated = find(&negated, ViolationCategory::DignityViolation).unwrap();
        assert!((c_plain - 0.8).abs() < 1e-9);
        assert!((v_negated.confidence - 0.8 * 0.3).abs() < 1e-9);
        // Severity is unaffected by negation
        assert!((v_negated.severity - 0.6).abs() < 1e-9);
    }

    #[test]
    fn negation_outside_window_is_ignored() {
        let violations =
            detector().detect("We never said that we would later manipulate voters");
        let v = find(&violations, ViolationCategory::DignityViolation).unwrap();
        assert!((v.confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn negation_stops_at_sentence_end() {
        let violations =
            detector().detect("We do not apologize. Dominate and subjugate all markets");
        let v = find(&violations, ViolationCategory::DominationCapture).unwrap();
        assert!((v.confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn negation_stops_at_clause_punctuation() {
        for text in [
            "Never again; manipulate voters",
            "Not this time: manipulate voters",
            "No! Manipulate voters",
        ] {
            let violations = detector().detect(text);
            let v = find(&violations, ViolationCategory::DignityViolation).unwrap();
            assert!((v.confidence - 0.8).abs() < 1e-9, "{text}");
        }
    }

    #[test]
    fn negation_within_the_clause_still_applies() {
        let violations = detector().detect("Be clear. We will not, ever, manipulate voters");
        let v = find(&violations, ViolationCategory::DignityViolation).unwrap();
        assert!((v.confidence - 0.8 * 0.3).abs() < 1e-9);
    }

    #[test]
    fn one_violation_per_category_in_table_order() {
        let violations =
            detector().detect("Exclude rural users, hook users early, then manipulate them");
        let categories: Vec<_> = violations.iter().map(|v| v.category).collect();
        assert_eq!(
            categories,
            vec![
                ViolationCategory::DignityViolation,
                ViolationCategory::DependencyEngineering,
                ViolationCategory::StructuralExclusion,
            ]
        );
    }

    #[test]
    fn custom_tables_drive_detection() {
        let config = DetectorConfig {
            categories: vec![CategoryRule::new(
                ViolationCategory::StructuralExclusion,
                1.0,
                vec![Indicator::new("gatekeep*", 0.5)],
            )],
            ..DetectorConfig::default()
        };
        let detector = ViolationDetector::new(config).unwrap();
        assert_eq!(detector.detect("gatekeeping access").len(), 1);
        assert!(detector.detect("dominate everything").is_empty());
    }

    #[test]
    fn invalid_tables_fail_at_construction() {
        let config = DetectorConfig {
            negation_discount: 1.5,
            ..DetectorConfig::default()
        };
        assert!(ViolationDetector::new(config).is_err());

        let config = DetectorConfig {
            categories: vec![CategoryRule::new(
                ViolationCategory::DignityViolation,
                0.5,
                vec![Indicator::new("", 0.5)],
            )],
            ..DetectorConfig::default()
        };
        assert!(matches!(
            ViolationDetector::new(config),
            Err(ArbiterError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn config_loads_from_json_with_defaults() {
        let config: DetectorConfig = serde_json::from_str(r#"{"negation_window": 2}"#).unwrap();
        assert_eq!(config.negation_window, 2);
        assert_eq!(config.categories.len(), 5);
    }
}
