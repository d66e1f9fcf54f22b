use maple_arbiter_types::{ArbiterError, Axis, AxisScore, Candidate, ContextProfile, PhrasePattern};
use serde::{Deserialize, Serialize};

/// Scores one axis of one candidate.
///
/// Implementations may return anything; [`AxisScore`] clamps on
/// construction.
pub trait AxisScorer: Send + Sync {
    /// The axis this scorer measures.
    fn axis(&self) -> Axis;

    /// Score `candidate` on [`Self::axis`] under `profile`.
    fn score(&self, candidate: &Candidate, profile: &ContextProfile) -> AxisScore;
}

const BASELINE: f64 = 0.5;
const POSITIVE_STEP: f64 = 0.15;
const NEGATIVE_STEP: f64 = 0.2;
const CONFIDENCE_BASE: f64 = 0.4;
const CONFIDENCE_STEP: f64 = 0.15;
const CONFIDENCE_CAP: f64 = 0.95;

/// Cue vocabulary for a lexical scorer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisCues {
    pub axis: Axis,
    /// Phrases that raise the axis value
    pub positive: Vec<String>,
    /// Phrases that lower it
    pub negative: Vec<String>,
}

impl AxisCues {
    pub fn new(axis: Axis, positive: &[&str], negative: &[&str]) -> Self {
        Self {
            axis,
            positive: positive.iter().map(|p| p.to_string()).collect(),
            negative: negative.iter().map(|n| n.to_string()).collect(),
        }
    }

    /// Reference vocabulary for `axis`.
    pub fn standard(axis: Axis) -> Self {
        match axis {
            Axis::Safety => Self::new(
                axis,
                &["safe*", "protect*", "privacy", "secur*", "caution*"],
                &["harm*", "danger*", "reckless*", "destroy*", "unsafe"],
            ),
            Axis::Fairness => Self::new(
                axis,
                &["fair*", "equitab*", "equal*", "impartial*", "balanced"],
                &["bias*", "discriminat*", "favorit*", "unfair*"],
            ),
            Axis::Autonomy => Self::new(
                axis,
                &[
                    "consent*", "choice*", "choose*", "opt out", "opt-out", "opt in", "voluntar*",
                    "autonom*", "dignity",
                ],
                &["control*", "manipulat*", "coerc*", "force*", "compel*"],
            ),
            Axis::Transparency => Self::new(
                axis,
                &["transparen*", "explain*", "disclos*", "open*", "audit*", "accountab*"],
                &["secret*", "hidden", "conceal*", "obscur*", "covert*"],
            ),
            Axis::Inclusion => Self::new(
                axis,
                &[
                    "inclus*", "includ*", "accessib*", "collaborat*", "everyone", "diverse",
                    "diversity", "community",
                ],
                &["exclu*", "marginaliz*", "only for premium", "shut out", "elite*"],
            ),
        }
    }
}

/// Cue-counting scorer.
///
/// Starts from a neutral 0.5, moves up per positive cue present and down per
/// negative cue present. Confidence grows with the number of cues seen.
pub struct LexicalAxisScorer {
    axis: Axis,
    positive: Vec<PhrasePattern>,
    negative: Vec<PhrasePattern>,
}

impl LexicalAxisScorer {
    pub fn new(cues: &AxisCues) -> Result<Self, ArbiterError> {
        Ok(Self {
            axis: cues.axis,
            positive: compile_all(&cues.positive)?,
            negative: compile_all(&cues.negative)?,
        })
    }

    pub fn standard(axis: Axis) -> Result<Self, ArbiterError> {
        Self::new(&AxisCues::standard(axis))
    }
}

fn compile_all(phrases: &[String]) -> Result<Vec<PhrasePattern>, ArbiterError> {
    phrases.iter().map(|p| PhrasePattern::compile(p)).collect()
}

fn first_matches(patterns: &[PhrasePattern], text: &str) -> Vec<String> {
    patterns
        .iter()
        .filter_map(|p| p.find_iter(text).next().map(|m| m.as_str().to_string()))
        .collect()
}

impl AxisScorer for LexicalAxisScorer {
    fn axis(&self) -> Axis {
        self.axis
    }

    fn score(&self, candidate: &Candidate, profile: &ContextProfile) -> AxisScore {
        let text = candidate.text();
        let positive = first_matches(&self.positive, text);
        let negative = first_matches(&self.negative, text);

        let value = BASELINE + POSITIVE_STEP * positive.len() as f64
            - NEGATIVE_STEP * negative.len() as f64;
        let seen = (positive.len() + negative.len()) as f64;
        let confidence = (CONFIDENCE_BASE + CONFIDENCE_STEP * seen).min(CONFIDENCE_CAP);

        let evidence = positive
            .iter()
            .map(|cue| format!("+{cue}"))
            .chain(negative.iter().map(|cue| format!("-{cue}")))
            .collect();
        let mut score = AxisScore::new(value, confidence, evidence);

        let floor = profile.floor(self.axis);
        if score.value() < floor {
            score.push_evidence(format!("below {} floor {:.2}", profile.name(), floor));
        }
        score
    }
}
