use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ArbiterError;

/// Number of axes in the closed axis set.
pub const AXIS_COUNT: usize = 5;

/// An independent ethical dimension along which candidates are scored.
///
/// Higher is better on every axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Freedom from harm, protection of people and their data
    Safety,
    /// Even-handed treatment, no favoured or penalised groups
    Fairness,
    /// Respect for choice, consent and dignity
    Autonomy,
    /// Openness about intent, method and limitations
    Transparency,
    /// Reach to everyone affected, including the marginalised
    Inclusion,
}

impl Axis {
    /// Every axis, in canonical order. Score vectors are indexed in this order.
    pub const ALL: [Axis; AXIS_COUNT] = [
        Axis::Safety,
        Axis::Fairness,
        Axis::Autonomy,
        Axis::Transparency,
        Axis::Inclusion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::Safety => "safety",
            Axis::Fairness => "fairness",
            Axis::Autonomy => "autonomy",
            Axis::Transparency => "transparency",
            Axis::Inclusion => "inclusion",
        }
    }

    /// Position of this axis in [`Axis::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Axis::Safety => 0,
            Axis::Fairness => 1,
            Axis::Autonomy => 2,
            Axis::Transparency => 3,
            Axis::Inclusion => 4,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clamp to `[0, 1]`. NaN maps to 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// A single axis measurement.
///
/// Construction always clamps `value` and `confidence` into `[0, 1]`, so a
/// misbehaving scorer can never push an out-of-range number downstream.
/// Deserialization goes through the same constructor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "AxisScoreRepr")]
pub struct AxisScore {
    value: f64,
    confidence: f64,
    evidence: Vec<String>,
}

#[derive(Deserialize)]
struct AxisScoreRepr {
    value: f64,
    confidence: f64,
    #[serde(default)]
    evidence: Vec<String>,
}

impl From<AxisScoreRepr> for AxisScore {
    fn from(repr: AxisScoreRepr) -> Self {
        AxisScore::new(repr.value, repr.confidence, repr.evidence)
    }
}

impl AxisScore {
    pub fn new(value: f64, confidence: f64, evidence: Vec<String>) -> Self {
        Self {
            value: clamp_unit(value),
            confidence: clamp_unit(confidence),
            evidence,
        }
    }

    /// Score with no supporting evidence.
    pub fn bare(value: f64, confidence: f64) -> Self {
        Self::new(value, confidence, Vec::new())
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn evidence(&self) -> &[String] {
        &self.evidence
    }

    /// Append an evidence line. Values stay untouched.
    pub fn push_evidence(&mut self, line: impl Into<String>) {
        self.evidence.push(line.into());
    }
}

/// A complete axis → score mapping.
///
/// Always holds exactly one score per axis; the map form only exists on the
/// wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<Axis, AxisScore>",
    into = "BTreeMap<Axis, AxisScore>"
)]
pub struct AxisScores {
    scores: [AxisScore; AXIS_COUNT],
}

impl AxisScores {
    /// Build a mapping by scoring every axis in canonical order.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: FnMut(Axis) -> AxisScore,
    {
        Self {
            scores: Axis::ALL.map(f),
        }
    }

    pub fn get(&self, axis: Axis) -> &AxisScore {
        &self.scores[axis.index()]
    }

    pub fn value(&self, axis: Axis) -> f64 {
        self.get(axis).value()
    }

    /// Iterate `(axis, score)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Axis, &AxisScore)> {
        Axis::ALL.into_iter().zip(self.scores.iter())
    }

    /// The plain value vector, dropping confidence and evidence.
    pub fn vector(&self) -> ScoreVector {
        ScoreVector::new(self.scores.each_ref().map(AxisScore::value))
    }
}

impl TryFrom<BTreeMap<Axis, AxisScore>> for AxisScores {
    type Error = ArbiterError;

    fn try_from(mut map: BTreeMap<Axis, AxisScore>) -> Result<Self, Self::Error> {
        if let Some(missing) = Axis::ALL.into_iter().find(|a| !map.contains_key(a)) {
            return Err(ArbiterError::MissingAxis(missing));
        }
        Ok(Self::from_fn(|axis| {
            map.remove(&axis)
                .unwrap_or_else(|| AxisScore::bare(0.0, 0.0))
        }))
    }
}

impl From<AxisScores> for BTreeMap<Axis, AxisScore> {
    fn from(scores: AxisScores) -> Self {
        Axis::ALL.into_iter().zip(scores.scores).collect()
    }
}

/// Plain per-axis values in canonical axis order, clamped to `[0, 1]`.
///
/// This is what Pareto filtering and MCDA ranking operate on.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; AXIS_COUNT]", into = "[f64; AXIS_COUNT]")]
pub struct ScoreVector([f64; AXIS_COUNT]);

impl ScoreVector {
    pub fn new(values: [f64; AXIS_COUNT]) -> Self {
        Self(values.map(clamp_unit))
    }

    pub fn get(&self, axis: Axis) -> f64 {
        self.0[axis.index()]
    }

    pub fn values(&self) -> &[f64; AXIS_COUNT] {
        &self.0
    }

    /// Weighted sum against a weight vector in canonical axis order.
    pub fn weighted_sum(&self, weights: &[f64; AXIS_COUNT]) -> f64 {
        self.0.iter().zip(weights).map(|(v, w)| v * w).sum()
    }
}

impl From<[f64; AXIS_COUNT]> for ScoreVector {
    fn from(values: [f64; AXIS_COUNT]) -> Self {
        Self::new(values)
    }
}

impl From<ScoreVector> for [f64; AXIS_COUNT] {
    fn from(vector: ScoreVector) -> Self {
        vector.0
    }
}
