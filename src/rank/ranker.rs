//! Final thresholding and deterministic ordering.

use std::collections::HashSet;

use serde::Serialize;

use super::aggregate::AggregateScore;

/// Subjects ordered by score descending, ties by ascending IRI.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RankedResult {
    entries: Vec<AggregateScore>,
}

impl RankedResult {
    /// Ranked entries with their scores.
    pub fn entries(&self) -> &[AggregateScore] {
        &self.entries
    }

    /// Subject IRIs in rank order.
    pub fn subjects(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.subject.as_str())
    }

    pub fn into_subjects(self) -> Vec<String> {
        self.entries.into_iter().map(|e| e.subject).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Drop scores below `aggregate_cutoff`, sort, and optionally truncate.
///
/// The order depends only on the scores, never on input order: equal scores
/// fall back to the subject IRI. A subject listed twice keeps its best entry.
pub fn rank(
    scores: Vec<AggregateScore>,
    aggregate_cutoff: f64,
    max_results: Option<usize>,
) -> RankedResult {
    let mut entries: Vec<AggregateScore> = scores
        .into_iter()
        .filter(|s| s.score >= aggregate_cutoff)
        .collect();

    entries.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.subject.cmp(&b.subject))
    });

    let mut seen = HashSet::new();
    entries.retain(|e| seen.insert(e.subject.clone()));

    if let Some(limit) = max_results {
        entries.truncate(limit);
    }

    RankedResult { entries }
}
