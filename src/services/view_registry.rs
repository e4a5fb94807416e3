use crate::services::Catalogs;
use crate::types::ViewId;
use aggregation::{
    AggregationSession, CandidateKey, PeriodicTask, ResourceId, SelectionError, SessionSettings,
    Snapshot,
};
use async_lock::Mutex;
use source_providers::Catalog;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

struct OpenView {
    session: Arc<AggregationSession>,
    last_used: Instant,
}

/// Owns one aggregation session per open view.
pub(crate) struct ViewRegistry {
    sessions: Mutex<HashMap<ViewId, OpenView>>,
    catalogs: Arc<Catalogs>,
    settings: SessionSettings,
}

impl ViewRegistry {
    pub(crate) fn new(catalogs: Arc<Catalogs>, settings: SessionSettings) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            catalogs,
            settings,
        }
    }

    async fn session(&self, view_id: &ViewId) -> Arc<AggregationSession> {
        let mut sessions = self.sessions.lock().await;

        let view = sessions.entry(view_id.clone()).or_insert_with(|| {
            debug!(%view_id, "Opening view");
            OpenView {
                session: Arc::new(AggregationSession::new(self.settings.clone())),
                last_used: Instant::now(),
            }
        });
        view.last_used = Instant::now();

        Arc::clone(&view.session)
    }

    async fn find(&self, view_id: &ViewId) -> Option<Arc<AggregationSession>> {
        let mut sessions = self.sessions.lock().await;
        let view = sessions.get_mut(view_id)?;
        view.last_used = Instant::now();

        Some(Arc::clone(&view.session))
    }

    pub(crate) async fn request(
        &self,
        view_id: &ViewId,
        catalog: Catalog,
        resource_id: ResourceId,
        source_ids: &HashMap<String, ResourceId>,
    ) -> Snapshot {
        let session = self.session(view_id).await;
        let sources = self.catalogs.sources(catalog, source_ids);

        info!(%view_id, %catalog, %resource_id, "Requesting sources for view");

        session.request(resource_id, sources);

        session.snapshot()
    }

    pub(crate) async fn select(
        &self,
        view_id: &ViewId,
        key: &CandidateKey,
    ) -> Result<Snapshot, SelectionError> {
        match self.find(view_id).await {
            Some(session) => session.select(key),
            None => Err(SelectionError::NoActiveRequest),
        }
    }

    /// Returns the current snapshot, or the next one if `wait` is given and something changes in time.
    /// Unknown views read as empty and are not opened.
    pub(crate) async fn snapshot(&self, view_id: &ViewId, wait: Option<Duration>) -> Snapshot {
        let session = match self.find(view_id).await {
            Some(session) => session,
            None => return Snapshot::empty(),
        };

        match wait {
            Some(within) if !session.snapshot().is_final() => session.next_update(within).await,
            _ => session.snapshot(),
        }
    }

    pub(crate) async fn close(&self, view_id: &ViewId) {
        if let Some(view) = self.sessions.lock().await.remove(view_id) {
            view.session.abandon();
            debug!(%view_id, "View closed");
        }
    }

    /// Drops views untouched for longer than `max_idle`, cancelling their requests.
    pub(crate) async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();

        sessions.retain(|view_id, view| {
            let idle = view.last_used.elapsed() > max_idle;
            if idle {
                view.session.abandon();
                debug!(%view_id, "Evicting idle view");
            }
            !idle
        });

        before - sessions.len()
    }

    pub(crate) fn start_eviction(self: &Arc<Self>, max_idle: Duration) -> PeriodicTask {
        let this = Arc::clone(self);

        PeriodicTask::start(max_idle, move || {
            let this = Arc::clone(&this);
            async move {
                let evicted = this.evict_idle(max_idle).await;
                if evicted > 0 {
                    info!(evicted, "Idle views evicted");
                }
            }
        })
    }

    #[cfg(test)]
    pub(crate) async fn open_views(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
