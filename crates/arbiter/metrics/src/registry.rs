use std::collections::BTreeMap;

use maple_arbiter_types::{ArbiterError, Axis};

use crate::scorer::{AxisScorer, LexicalAxisScorer};

/// Explicit axis → scorer table.
///
/// Each axis takes exactly one scorer. Registering a second one for the same
/// axis is an error rather than a silent replacement.
#[derive(Default)]
pub struct ScorerRegistry {
    scorers: BTreeMap<Axis, Box<dyn AxisScorer>>,
}

impl ScorerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the lexical scorer for every axis.
    pub fn standard() -> Result<Self, ArbiterError> {
        let mut registry = Self::new();
        for axis in Axis::ALL {
            registry.register(Box::new(LexicalAxisScorer::standard(axis)?))?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, scorer: Box<dyn AxisScorer>) -> Result<(), ArbiterError> {
        let axis = scorer.axis();
        if self.scorers.contains_key(&axis) {
            return Err(ArbiterError::DuplicateScorer(axis));
        }
        self.scorers.insert(axis, scorer);
        Ok(())
    }

    /// Builder form of [`Self::register`].
    pub fn with(mut self, scorer: Box<dyn AxisScorer>) -> Result<Self, ArbiterError> {
        self.register(scorer)?;
        Ok(self)
    }

    pub fn contains(&self, axis: Axis) -> bool {
        self.scorers.contains_key(&axis)
    }

    pub fn len(&self) -> usize {
        self.scorers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scorers.is_empty()
    }

    /// Remove and return the scorers in canonical axis order, failing on the
    /// first axis without one.
    pub(crate) fn into_ordered(mut self) -> Result<Vec<Box<dyn AxisScorer>>, ArbiterError> {
        Axis::ALL
            .into_iter()
            .map(|axis| {
                self.scorers
                    .remove(&axis)
                    .ok_or(ArbiterError::MissingScorer(axis))
            })
            .collect()
    }
}
