use crate::aggregate::selection::{Selection, SelectionState};
use crate::aggregate::test_sources::stream_candidate;
use crate::aggregate::traits::{SelectionError, SourceError};
use crate::aggregate::types::{AggregationResult, SourceOutcome};
use crate::{CandidateKey, SourceId};
use std::time::Duration;

fn success(source: &str, keys: &[&str]) -> SourceOutcome {
    SourceOutcome {
        source_id: source.into(),
        result: Ok(keys.iter().map(|key| stream_candidate(source, key)).collect()),
    }
}

fn failure(source: &str, error: SourceError) -> SourceOutcome {
    SourceOutcome {
        source_id: source.into(),
        result: Err(error),
    }
}

#[test]
fn test_first_arrival_wins_on_duplicate_keys() {
    let mut result = AggregationResult::begin(2);

    let mut first = success("alpha", &["same"]);
    if let Ok(candidates) = &mut first.result {
        candidates[0] = candidates[0].clone().with_metadata("language", "English");
    }
    let mut second = success("bravo", &["same"]);
    if let Ok(candidates) = &mut second.result {
        candidates[0] = candidates[0].clone().with_metadata("language", "Spanish");
    }

    assert_eq!(1, result.apply(first));
    assert_eq!(0, result.apply(second));

    assert_eq!(1, result.candidates().len());
    assert_eq!("alpha", *result.candidates()[0].source_id);
    assert_eq!(
        Some("English"),
        result.candidates()[0].metadata_text("language")
    );
}

#[test]
fn test_duplicates_within_one_source_collapse() {
    let mut result = AggregationResult::begin(1);

    assert_eq!(2, result.apply(success("alpha", &["a", "b", "a"])));
    assert_eq!(2, result.candidates().len());
}

#[test]
fn test_failures_are_recorded_per_source() {
    let mut result = AggregationResult::begin(3);

    result.apply(failure("alpha", SourceError::Timeout(Duration::from_secs(8))));
    assert!(!result.is_complete());

    result.apply(failure("bravo", SourceError::Http("503 Service Unavailable".into())));
    result.apply(success("charlie", &[]));

    assert!(result.is_complete());
    assert!(result.is_exhausted());
    assert_eq!(2, result.errors().len());
    assert!(result.errors().contains_key(&SourceId::from("alpha")));
    assert!(result.errors().contains_key(&SourceId::from("bravo")));
}

#[test]
fn test_repeated_completion_of_same_source_is_ignored() {
    let mut result = AggregationResult::begin(2);

    result.apply(success("alpha", &["a"]));
    result.apply(success("alpha", &["b"]));

    assert_eq!(1, result.completed_sources());
    assert_eq!(1, result.candidates().len());
    assert!(!result.is_complete());
}

#[test]
fn test_selection_defaults_to_first_arrival_and_keeps_user_choice() {
    let mut result = AggregationResult::begin(2);
    let mut selection = Selection::default();

    selection.sync(&result);
    assert_eq!(None, selection.chosen());

    result.apply(success("alpha", &["a1", "a2"]));
    selection.sync(&result);
    assert_eq!(Some(&CandidateKey::from("a1")), selection.chosen());

    selection.choose(&CandidateKey::from("a2"), &result).unwrap();
    result.apply(success("bravo", &["b1"]));
    selection.sync(&result);
    assert_eq!(Some(&CandidateKey::from("a2")), selection.chosen());

    assert_eq!(
        Err(SelectionError::UnknownCandidate(CandidateKey::from("zz"))),
        selection.choose(&CandidateKey::from("zz"), &result)
    );
    assert_eq!(Some(&CandidateKey::from("a2")), selection.chosen());
}

#[test]
fn test_state_derivation() {
    let mut result = AggregationResult::begin(2);
    let selection = Selection::default();

    assert_eq!(
        SelectionState::Empty,
        SelectionState::derive(false, &result, &selection, false)
    );
    assert_eq!(
        SelectionState::Loading {
            completed: 0,
            total: 2
        },
        SelectionState::derive(true, &result, &selection, false)
    );

    result.apply(success("alpha", &[]));
    result.apply(failure("bravo", SourceError::Parse("expected array".into())));

    // Exhausted, but the grace delay has not elapsed yet.
    assert_eq!(
        SelectionState::Loading {
            completed: 2,
            total: 2
        },
        SelectionState::derive(true, &result, &selection, false)
    );
    assert_eq!(
        SelectionState::Failed,
        SelectionState::derive(true, &result, &selection, true)
    );
}
