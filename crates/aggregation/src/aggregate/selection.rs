use crate::aggregate::traits::SelectionError;
use crate::aggregate::types::AggregationResult;
use crate::CandidateKey;
use serde::Serialize;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Selection {
    chosen: Option<CandidateKey>,
}

impl Selection {
    pub fn chosen(&self) -> Option<&CandidateKey> {
        self.chosen.as_ref()
    }

    /// Defaults to the first candidate by arrival. An existing choice is kept.
    pub fn sync(&mut self, result: &AggregationResult) {
        if self.chosen.is_none() {
            self.chosen = result.candidates().first().map(|c| c.key.clone());
        }
    }

    pub fn choose(
        &mut self,
        key: &CandidateKey,
        result: &AggregationResult,
    ) -> Result<(), SelectionError> {
        if !result.contains(key) {
            return Err(SelectionError::UnknownCandidate(key.clone()));
        }

        self.chosen.replace(key.clone());

        Ok(())
    }

    pub fn reset(&mut self) {
        self.chosen.take();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionState {
    Empty,
    Loading { completed: usize, total: usize },
    HasCandidates { chosen: CandidateKey },
    Failed,
}

impl SelectionState {
    pub fn derive(
        has_request: bool,
        result: &AggregationResult,
        selection: &Selection,
        grace_elapsed: bool,
    ) -> Self {
        if !has_request {
            return SelectionState::Empty;
        }

        if let Some(chosen) = selection.chosen() {
            return SelectionState::HasCandidates {
                chosen: chosen.clone(),
            };
        }

        if result.is_exhausted() && grace_elapsed {
            return SelectionState::Failed;
        }

        SelectionState::Loading {
            completed: result.completed_sources(),
            total: result.total_sources(),
        }
    }
}
