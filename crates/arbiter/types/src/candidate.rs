use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ArbiterError;

/// Caller-assigned candidate identifier. Unique within one selection call.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(String);

impl CandidateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CandidateId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CandidateId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A proposal produced by one of the upstream agents.
///
/// Read-only once built. [`Candidate::with_text`] returns a new value that
/// keeps the identifier, which is how repairs are represented.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    id: CandidateId,
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    metadata: BTreeMap<String, serde_json::Value>,
}

impl Candidate {
    pub fn new(id: impl Into<CandidateId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            source: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Tag the producing agent.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// A copy of this candidate carrying `text` instead of the original.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            id: self.id.clone(),
            text: text.into(),
            source: self.source.clone(),
            metadata: self.metadata.clone(),
        }
    }

    pub fn id(&self) -> &CandidateId {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn metadata(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.metadata
    }
}

/// Check a batch before any processing: identifiers must be non-blank and
/// unique. The first problem found is reported.
pub fn validate_batch(candidates: &[Candidate]) -> Result<(), ArbiterError> {
    let mut seen = HashSet::with_capacity(candidates.len());
    for (index, candidate) in candidates.iter().enumerate() {
        if candidate.id.is_blank() {
            return Err(ArbiterError::EmptyCandidateId { index });
        }
        if !seen.insert(&candidate.id) {
            return Err(ArbiterError::DuplicateCandidateId(candidate.id.clone()));
        }
    }
    Ok(())
}
