use crate::aggregate::fetcher::fan_out;
use crate::aggregate::presentation::{control_surface, render, ControlSurface, Presentation};
use crate::aggregate::ranking::{ArrivalOrder, Ranker};
use crate::aggregate::selection::{Selection, SelectionState};
use crate::aggregate::traits::{CandidateSource, SelectionError};
use crate::aggregate::types::{AggregationResult, Candidate, SourceOutcome};
use crate::{CandidateKey, Generation, ResourceId};
use futures::StreamExt;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);
const DEFAULT_GRACE_DELAY: Duration = Duration::from_secs(3);

#[derive(Clone)]
pub struct SessionSettings {
    pub timeout: Duration,
    pub grace_delay: Duration,
    pub ranker: Arc<dyn Ranker>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            grace_delay: DEFAULT_GRACE_DELAY,
            ranker: Arc::new(ArrivalOrder),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub generation: Generation,
    pub resource_id: Option<ResourceId>,
    pub state: SelectionState,
    pub candidates: Vec<Candidate>,
    pub completed_sources: usize,
    pub total_sources: usize,
    pub errors: BTreeMap<String, String>,
    pub controls: ControlSurface,
    pub active: Option<Presentation>,
}

impl Snapshot {
    /// Nothing further will change until a new request is issued.
    pub fn is_final(&self) -> bool {
        match self.state {
            SelectionState::Empty | SelectionState::Failed => true,
            SelectionState::HasCandidates { .. } => self.completed_sources >= self.total_sources,
            SelectionState::Loading { .. } => false,
        }
    }

    /// Snapshot of a session that never received a request.
    pub fn empty() -> Self {
        SessionShared::default().snapshot(&ArrivalOrder)
    }
}

#[derive(Default)]
struct SessionShared {
    generation: Generation,
    resource_id: Option<ResourceId>,
    result: AggregationResult,
    selection: Selection,
    grace_elapsed: bool,
}

impl SessionShared {
    fn reset(&mut self) -> Generation {
        self.generation = self.generation.next();
        self.resource_id.take();
        self.result = AggregationResult::default();
        self.selection.reset();
        self.grace_elapsed = false;

        self.generation
    }

    fn snapshot(&self, ranker: &dyn Ranker) -> Snapshot {
        let state = SelectionState::derive(
            self.resource_id.is_some(),
            &self.result,
            &self.selection,
            self.grace_elapsed,
        );
        let ranked = ranker.rank(self.result.candidates());
        let chosen = self.selection.chosen();

        Snapshot {
            generation: self.generation,
            resource_id: self.resource_id.clone(),
            state,
            controls: control_surface(&ranked, chosen),
            active: chosen.and_then(|key| self.result.candidate(key)).map(render),
            candidates: ranked.into_iter().cloned().collect(),
            completed_sources: self.result.completed_sources(),
            total_sources: self.result.total_sources(),
            errors: self
                .result
                .errors()
                .iter()
                .map(|(source_id, error)| (source_id.to_string(), error.to_string()))
                .collect(),
        }
    }
}

struct SessionInner {
    shared: Mutex<SessionShared>,
    updates: watch::Sender<Snapshot>,
    ranker: Arc<dyn Ranker>,
}

impl SessionInner {
    fn lock(&self) -> MutexGuard<'_, SessionShared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, shared: &SessionShared) {
        self.updates.send_replace(shared.snapshot(&*self.ranker));
    }

    /// Returns false when the batch has been superseded.
    fn apply_outcome(&self, generation: Generation, outcome: SourceOutcome) -> bool {
        let mut guard = self.lock();

        if guard.generation != generation {
            debug!(
                %generation,
                source_id = %outcome.source_id,
                "Discarding completion of a superseded request"
            );
            return false;
        }

        let shared = &mut *guard;
        shared.result.apply(outcome);
        shared.selection.sync(&shared.result);

        self.publish(shared);

        true
    }

    fn is_exhausted(&self, generation: Generation) -> bool {
        let shared = self.lock();

        shared.generation == generation && shared.result.is_exhausted()
    }

    fn elapse_grace(&self, generation: Generation) {
        let mut shared = self.lock();

        if shared.generation != generation {
            return;
        }

        shared.grace_elapsed = true;

        info!(%generation, "No source produced a candidate");

        self.publish(&shared);
    }
}

/// Aggregation state owned by a single view. Each request fully supersedes the previous one.
pub struct AggregationSession {
    settings: SessionSettings,
    inner: Arc<SessionInner>,
    in_flight: Mutex<Option<JoinHandle<()>>>,
}

impl AggregationSession {
    pub fn new(settings: SessionSettings) -> Self {
        let shared = SessionShared::default();
        let (updates, _) = watch::channel(shared.snapshot(&*settings.ranker));

        Self {
            inner: Arc::new(SessionInner {
                shared: Mutex::new(shared),
                updates,
                ranker: Arc::clone(&settings.ranker),
            }),
            settings,
            in_flight: Mutex::new(None),
        }
    }

    /// Requests are serialized on the in-flight slot, so the spawned batch always matches the
    /// latest generation.
    pub fn request(
        &self,
        resource_id: ResourceId,
        sources: Vec<Arc<dyn CandidateSource>>,
    ) -> Generation {
        let mut in_flight = self.lock_in_flight();

        let generation = {
            let mut shared = self.inner.lock();
            let generation = shared.reset();
            self.inner.publish(&shared);

            shared.resource_id.replace(resource_id.clone());
            shared.result = AggregationResult::begin(sources.len());
            self.inner.publish(&shared);

            generation
        };

        info!(%generation, %resource_id, sources = sources.len(), "New aggregation request");

        let task = tokio::spawn(run_batch(
            Arc::clone(&self.inner),
            generation,
            resource_id,
            sources,
            self.settings.timeout,
            self.settings.grace_delay,
        ));

        if let Some(previous) = in_flight.replace(task) {
            previous.abort();
        }

        generation
    }

    pub fn abandon(&self) {
        let mut in_flight = self.lock_in_flight();

        let generation = {
            let mut shared = self.inner.lock();
            let generation = shared.reset();
            self.inner.publish(&shared);
            generation
        };

        if let Some(previous) = in_flight.take() {
            previous.abort();
        }

        debug!(%generation, "Aggregation request abandoned");
    }

    pub fn select(&self, key: &CandidateKey) -> Result<Snapshot, SelectionError> {
        let mut guard = self.inner.lock();

        if guard.resource_id.is_none() {
            return Err(SelectionError::NoActiveRequest);
        }

        let shared = &mut *guard;
        shared.selection.choose(key, &shared.result)?;

        debug!(generation = %shared.generation, %key, "Candidate selected");

        self.inner.publish(shared);

        Ok(shared.snapshot(&*self.inner.ranker))
    }

    pub fn snapshot(&self) -> Snapshot {
        self.inner.updates.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.inner.updates.subscribe()
    }

    /// Waits up to `within` for the next published snapshot.
    pub async fn next_update(&self, within: Duration) -> Snapshot {
        let mut updates = self.subscribe();

        let _ = tokio::time::timeout(within, updates.changed()).await;

        self.snapshot()
    }

    /// Waits up to `within` for the current request to reach a final state.
    pub async fn settled(&self, within: Duration) -> Snapshot {
        let mut updates = self.subscribe();

        let waiting = async {
            loop {
                if updates.borrow_and_update().is_final() {
                    return;
                }

                if updates.changed().await.is_err() {
                    return;
                }
            }
        };

        let _ = tokio::time::timeout(within, waiting).await;

        self.snapshot()
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for AggregationSession {
    fn drop(&mut self) {
        if let Some(task) = self.lock_in_flight().take() {
            task.abort();
        }
    }
}

async fn run_batch(
    inner: Arc<SessionInner>,
    generation: Generation,
    resource_id: ResourceId,
    sources: Vec<Arc<dyn CandidateSource>>,
    timeout: Duration,
    grace_delay: Duration,
) {
    let mut outcomes = fan_out(&resource_id, &sources, timeout);

    while let Some(outcome) = outcomes.next().await {
        if !inner.apply_outcome(generation, outcome) {
            return;
        }
    }

    if !inner.is_exhausted(generation) {
        return;
    }

    debug!(%generation, ?grace_delay, "All sources settled empty, waiting before reporting");

    tokio::time::sleep(grace_delay).await;

    inner.elapse_grace(generation);
}
