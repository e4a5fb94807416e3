use crate::aggregate::traits::{CandidateSource, SourceError};
use crate::aggregate::types::SourceOutcome;
use crate::ResourceId;
use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, Stream};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Issues one fetch per source concurrently and yields each outcome as soon as that
/// source settles. Dropping the returned stream drops every fetch still in flight.
pub fn fan_out(
    resource_id: &ResourceId,
    sources: &[Arc<dyn CandidateSource>],
    timeout: Duration,
) -> impl Stream<Item = SourceOutcome> + Send + Unpin + 'static {
    sources
        .iter()
        .map(|source| fetch_one(Arc::clone(source), resource_id.clone(), timeout))
        .collect::<FuturesUnordered<_>>()
}

fn fetch_one(
    source: Arc<dyn CandidateSource>,
    resource_id: ResourceId,
    timeout: Duration,
) -> BoxFuture<'static, SourceOutcome> {
    async move {
        let source_id = source.id();

        debug!(%source_id, %resource_id, "Fetching candidates");

        let result = match tokio::time::timeout(timeout, source.fetch(&resource_id)).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout(timeout)),
        };

        match &result {
            Ok(candidates) => {
                debug!(%source_id, count = candidates.len(), "Source settled");
            }
            Err(error) => {
                warn!(%source_id, %resource_id, %error, "Source failed");
            }
        }

        SourceOutcome { source_id, result }
    }
    .boxed()
}
