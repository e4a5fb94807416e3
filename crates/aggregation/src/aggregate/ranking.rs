use crate::aggregate::types::Candidate;
use serde::Deserialize;
use std::sync::Arc;

/// Orders candidates for presentation. Never changes which candidate is chosen by default.
pub trait Ranker: Send + Sync {
    fn rank<'a>(&self, candidates: &'a [Candidate]) -> Vec<&'a Candidate>;
}

pub struct ArrivalOrder;

impl Ranker for ArrivalOrder {
    fn rank<'a>(&self, candidates: &'a [Candidate]) -> Vec<&'a Candidate> {
        candidates.iter().collect()
    }
}

const QUALITY_PRIORITY: [&str; 4] = ["2160p", "1080p", "720p", "480p"];

fn get_candidate_priority(candidate: &Candidate) -> (usize, i64) {
    let quality_priority = candidate
        .metadata_text("quality")
        .and_then(|quality| {
            let quality = quality.to_lowercase();
            QUALITY_PRIORITY.iter().position(|label| {
                quality.contains(label) || (*label == "2160p" && quality.contains("4k"))
            })
        })
        .unwrap_or(QUALITY_PRIORITY.len());
    let seeders = candidate.metadata_number("seeders").unwrap_or(0.0) as i64;

    (quality_priority, -seeders)
}

pub struct QualityPriority;

impl Ranker for QualityPriority {
    fn rank<'a>(&self, candidates: &'a [Candidate]) -> Vec<&'a Candidate> {
        let mut ranked: Vec<_> = candidates.iter().collect();

        // Stable, so arrival order breaks remaining ties.
        ranked.sort_by_key(|c| get_candidate_priority(c));

        ranked
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMode {
    #[default]
    Arrival,
    Quality,
}

impl RankingMode {
    pub fn ranker(&self) -> Arc<dyn Ranker> {
        match self {
            RankingMode::Arrival => Arc::new(ArrivalOrder),
            RankingMode::Quality => Arc::new(QualityPriority),
        }
    }
}
