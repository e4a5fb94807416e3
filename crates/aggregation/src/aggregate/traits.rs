use crate::aggregate::types::Candidate;
use crate::{CandidateKey, ResourceId, SourceId};
use async_trait::async_trait;
use std::time::Duration;

/// Failure of a single upstream. Recorded against the source, never fatal to a batch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SourceError {
    #[error("Source did not respond within {0:?}")]
    Timeout(Duration),
    #[error("Source request failed: {0}")]
    Http(String),
    #[error("Unable to parse source response: {0}")]
    Parse(String),
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum SelectionError {
    #[error("Candidate {0} is not present in the current result")]
    UnknownCandidate(CandidateKey),
    #[error("There is no active request to select from")]
    NoActiveRequest,
}

#[async_trait]
pub trait CandidateSource: Send + Sync {
    fn id(&self) -> SourceId;
    async fn fetch(&self, resource_id: &ResourceId) -> Result<Vec<Candidate>, SourceError>;
}
