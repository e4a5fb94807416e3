use crate::aggregate::traits::{CandidateSource, SourceError};
use crate::aggregate::types::{Candidate, Payload};
use crate::{ResourceId, SourceId};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub(crate) fn stream_candidate(source: &str, key: &str) -> Candidate {
    Candidate::new(
        source.into(),
        key.into(),
        Payload::Embed {
            url: format!("https://embed.example/{}/{}", source, key),
        },
    )
}

/// Answers every resource with candidates derived from the resource id after an optional delay.
pub(crate) struct SourceMock {
    id: &'static str,
    keys: Vec<&'static str>,
    delay: Duration,
    failure: Option<SourceError>,
    pub(crate) calls: AtomicUsize,
}

impl SourceMock {
    pub(crate) fn with_keys(id: &'static str, keys: Vec<&'static str>) -> Self {
        Self {
            id,
            keys,
            delay: Duration::ZERO,
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing(id: &'static str, failure: SourceError) -> Self {
        Self {
            failure: Some(failure),
            ..Self::with_keys(id, vec![])
        }
    }

    pub(crate) fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn shared(self) -> Arc<dyn CandidateSource> {
        Arc::new(self)
    }
}

#[async_trait]
impl CandidateSource for SourceMock {
    fn id(&self) -> SourceId {
        self.id.into()
    }

    async fn fetch(&self, resource_id: &ResourceId) -> Result<Vec<Candidate>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }

        Ok(self
            .keys
            .iter()
            .map(|key| stream_candidate(self.id, &format!("{}-{}", resource_id, key)))
            .collect())
    }
}

/// Returns the same fixed candidates for any resource.
pub(crate) struct FixedSourceMock {
    pub(crate) id: &'static str,
    pub(crate) candidates: Vec<Candidate>,
}

#[async_trait]
impl CandidateSource for FixedSourceMock {
    fn id(&self) -> SourceId {
        self.id.into()
    }

    async fn fetch(&self, _resource_id: &ResourceId) -> Result<Vec<Candidate>, SourceError> {
        Ok(self.candidates.clone())
    }
}
