use crate::services::ProviderSource;
use aggregation::{Candidate, CandidateSource, ResourceId, SourceError, SourceId};
use async_trait::async_trait;
use source_providers::{Catalog, SourceClient, SourceDescriptor};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Fetches a fixed resource id regardless of the one requested, for upstreams that name the
/// same title differently (e.g. live matches listing per-source ids).
struct PinnedSource {
    inner: Arc<dyn CandidateSource>,
    resource_id: ResourceId,
}

#[async_trait]
impl CandidateSource for PinnedSource {
    fn id(&self) -> SourceId {
        self.inner.id()
    }

    async fn fetch(&self, _resource_id: &ResourceId) -> Result<Vec<Candidate>, SourceError> {
        self.inner.fetch(&self.resource_id).await
    }
}

#[derive(Default)]
pub(crate) struct Catalogs {
    sources: HashMap<Catalog, Vec<Arc<dyn CandidateSource>>>,
}

impl Catalogs {
    pub(crate) fn from_descriptors(
        descriptors: Vec<SourceDescriptor>,
        client: Arc<SourceClient>,
        timeout: Duration,
    ) -> Self {
        let mut catalogs = Self::default();

        for descriptor in descriptors {
            let catalog = descriptor.catalog;
            let source = ProviderSource::new(descriptor, Arc::clone(&client), timeout);

            catalogs.insert(catalog, Arc::new(source));
        }

        catalogs
    }

    pub(crate) fn insert(&mut self, catalog: Catalog, source: Arc<dyn CandidateSource>) {
        self.sources.entry(catalog).or_default().push(source);
    }

    /// Sources of `catalog`. Those named in `source_ids` fetch their own resource id.
    pub(crate) fn sources(
        &self,
        catalog: Catalog,
        source_ids: &HashMap<String, ResourceId>,
    ) -> Vec<Arc<dyn CandidateSource>> {
        self.sources
            .get(&catalog)
            .map(|sources| {
                sources
                    .iter()
                    .map(|source| match source_ids.get(source.id().as_str()) {
                        Some(resource_id) => Arc::new(PinnedSource {
                            inner: Arc::clone(source),
                            resource_id: resource_id.clone(),
                        }) as Arc<dyn CandidateSource>,
                        None => Arc::clone(source),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}
