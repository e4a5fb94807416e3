use aggregation::PeriodicTask;
use async_lock::RwLock;
use async_trait::async_trait;
use source_providers::{LiveMatch, ProviderError, SourceClient};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[async_trait]
pub(crate) trait LiveMatchFeed: Send + Sync {
    async fn fetch(&self) -> Result<Vec<LiveMatch>, ProviderError>;
}

pub(crate) struct RemoteFeed {
    client: Arc<SourceClient>,
    url: String,
}

impl RemoteFeed {
    pub(crate) fn new(client: Arc<SourceClient>, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl LiveMatchFeed for RemoteFeed {
    async fn fetch(&self) -> Result<Vec<LiveMatch>, ProviderError> {
        self.client.fetch_live_matches(&self.url).await
    }
}

/// Last successfully fetched list of live matches. A failed refresh keeps the previous list.
pub(crate) struct LiveMatches {
    matches: RwLock<Vec<LiveMatch>>,
    feed: Arc<dyn LiveMatchFeed>,
}

impl LiveMatches {
    pub(crate) fn new(feed: Arc<dyn LiveMatchFeed>) -> Self {
        Self {
            matches: RwLock::new(vec![]),
            feed,
        }
    }

    pub(crate) async fn list(&self) -> Vec<LiveMatch> {
        self.matches.read().await.clone()
    }

    pub(crate) async fn refresh(&self) {
        let matches = match self.feed.fetch().await {
            Ok(matches) => matches,
            Err(error) => {
                warn!(?error, "Unable to refresh live matches");
                return;
            }
        };

        info!(count = matches.len(), "Live matches refreshed");

        *self.matches.write().await = matches;
    }

    pub(crate) fn start_refresh(self: &Arc<Self>, period: Duration) -> PeriodicTask {
        let this = Arc::clone(self);

        PeriodicTask::start(period, move || {
            let this = Arc::clone(&this);
            async move { this.refresh().await }
        })
    }
}
