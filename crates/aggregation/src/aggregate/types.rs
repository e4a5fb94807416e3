use crate::aggregate::traits::SourceError;
use crate::{CandidateKey, SourceId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Payload {
    Embed {
        url: String,
    },
    Media {
        url: String,
        hls: bool,
        referer: Option<String>,
    },
    Magnet {
        uri: String,
        name: String,
    },
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl MetadataValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetadataValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            MetadataValue::Number(number) => Some(*number),
            _ => None,
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::Text(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::Text(value)
    }
}

impl From<u64> for MetadataValue {
    fn from(value: u64) -> Self {
        MetadataValue::Number(value as f64)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        MetadataValue::Flag(value)
    }
}

pub type Metadata = BTreeMap<String, MetadataValue>;

/// One playable or downloadable option produced by one upstream.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Candidate {
    pub source_id: SourceId,
    pub key: CandidateKey,
    pub payload: Payload,
    pub metadata: Metadata,
}

impl Candidate {
    pub fn new(source_id: SourceId, key: CandidateKey, payload: Payload) -> Self {
        Self {
            source_id,
            key,
            payload,
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, name: &str, value: impl Into<MetadataValue>) -> Self {
        self.metadata.insert(name.to_string(), value.into());
        self
    }

    pub fn metadata_text(&self, name: &str) -> Option<&str> {
        self.metadata.get(name).and_then(MetadataValue::as_text)
    }

    pub fn metadata_number(&self, name: &str) -> Option<f64> {
        self.metadata.get(name).and_then(MetadataValue::as_number)
    }
}

/// Result of one source settling.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceOutcome {
    pub source_id: SourceId,
    pub result: Result<Vec<Candidate>, SourceError>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct AggregationResult {
    candidates: Vec<Candidate>,
    completed_sources: usize,
    total_sources: usize,
    errors: BTreeMap<SourceId, SourceError>,
    seen_keys: HashSet<CandidateKey>,
    settled_sources: HashSet<SourceId>,
}

impl AggregationResult {
    pub fn begin(total_sources: usize) -> Self {
        Self {
            total_sources,
            ..Self::default()
        }
    }

    /// Merges a settled source. Candidates whose key was already seen are dropped,
    /// so the first arrival wins. Returns the number of candidates appended.
    pub fn apply(&mut self, outcome: SourceOutcome) -> usize {
        let SourceOutcome { source_id, result } = outcome;

        if !self.settled_sources.insert(source_id.clone()) {
            debug!(%source_id, "Source already settled in this batch, ignoring");
            return 0;
        }

        self.completed_sources += 1;

        match result {
            Ok(candidates) => {
                let before = self.candidates.len();

                for candidate in candidates {
                    if self.seen_keys.insert(candidate.key.clone()) {
                        self.candidates.push(candidate);
                    } else {
                        debug!(%source_id, key = %candidate.key, "Dropping duplicate candidate");
                    }
                }

                self.candidates.len() - before
            }
            Err(error) => {
                self.errors.insert(source_id, error);
                0
            }
        }
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn candidate(&self, key: &CandidateKey) -> Option<&Candidate> {
        self.candidates.iter().find(|c| &c.key == key)
    }

    pub fn contains(&self, key: &CandidateKey) -> bool {
        self.seen_keys.contains(key)
    }

    pub fn completed_sources(&self) -> usize {
        self.completed_sources
    }

    pub fn total_sources(&self) -> usize {
        self.total_sources
    }

    pub fn errors(&self) -> &BTreeMap<SourceId, SourceError> {
        &self.errors
    }

    pub fn is_complete(&self) -> bool {
        self.completed_sources >= self.total_sources
    }

    /// Every source settled and none of them produced a candidate.
    pub fn is_exhausted(&self) -> bool {
        self.is_complete() && self.candidates.is_empty()
    }
}
