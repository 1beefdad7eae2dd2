//! Weighted aggregation of per-literal scores into one score per subject.

use std::collections::BTreeMap;

use serde::Serialize;

use super::PredicateWeights;
use super::similarity::MatchCandidate;

/// Weighted total for one subject. Always ≥ 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateScore {
    pub subject: String,
    pub score: f64,
}

#[derive(Debug, Default)]
struct PredicateGroup {
    sum: f64,
    count: usize,
}

impl PredicateGroup {
    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Fold passing candidates into one weighted score per subject.
///
/// Per subject: mean raw score per predicate, times that predicate's weight,
/// summed over predicates in weight-table order. Candidates on predicates
/// outside the table contribute nothing; subjects left with no contribution
/// are dropped rather than reported at zero.
pub fn aggregate(
    candidates: &[MatchCandidate<'_>],
    weights: &PredicateWeights,
) -> Vec<AggregateScore> {
    let mut groups: BTreeMap<&str, BTreeMap<&str, PredicateGroup>> = BTreeMap::new();
    for candidate in candidates {
        let group = groups
            .entry(candidate.subject)
            .or_default()
            .entry(candidate.predicate)
            .or_default();
        group.sum += candidate.score;
        group.count += 1;
    }

    groups
        .into_iter()
        .filter_map(|(subject, by_predicate)| {
            let mut total = 0.0;
            let mut contributed = false;
            for (predicate, weight) in weights.iter() {
                let Some(mean) = by_predicate.get(predicate).and_then(PredicateGroup::mean) else {
                    continue;
                };
                total += mean * weight;
                contributed = true;
            }
            contributed.then(|| AggregateScore {
                subject: subject.to_owned(),
                score: total,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAME: &str = "http://schema.org/name";
    const DESC: &str = "http://schema.org/description";
    const KEYWORDS: &str = "http://schema.org/keywords";

    fn weights() -> PredicateWeights {
        PredicateWeights::new([(NAME, 1.0), (DESC, 0.5), (KEYWORDS, 0.5)]).unwrap()
    }

    fn hit<'a>(subject: &'a str, predicate: &'a str, score: f64) -> MatchCandidate<'a> {
        MatchCandidate {
            subject,
            predicate,
            value: "",
            score,
        }
    }

    fn score_of(scores: &[AggregateScore], subject: &str) -> f64 {
        scores
            .iter()
            .find(|s| s.subject == subject)
            .map(|s| s.score)
            .unwrap()
    }

    #[test]
    fn single_predicate_is_weighted() {
        let scores = aggregate(&[hit("http://x/s1", DESC, 90.0)], &weights());
        assert_eq!(scores.len(), 1);
        assert!((score_of(&scores, "http://x/s1") - 45.0).abs() < 1e-9);
    }

    #[test]
    fn repeated_predicate_is_averaged_not_summed() {
        let candidates = [
            hit("http://x/s1", KEYWORDS, 100.0),
            hit("http://x/s1", KEYWORDS, 80.0),
            hit("http://x/s1", KEYWORDS, 72.0),
        ];
        let scores = aggregate(&candidates, &weights());
        // mean 84 × 0.5
        assert!((score_of(&scores, "http://x/s1") - 42.0).abs() < 1e-9);
    }

    #[test]
    fn predicates_sum_across_fields() {
        let candidates = [
            hit("http://x/s1", NAME, 80.0),
            hit("http://x/s1", DESC, 100.0),
            hit("http://x/s1", DESC, 90.0),
        ];
        let scores = aggregate(&candidates, &weights());
        // 80 × 1.0 + 95 × 0.5
        assert!((score_of(&scores, "http://x/s1") - 127.5).abs() < 1e-9);
    }

    #[test]
    fn subjects_are_scored_independently() {
        let candidates = [hit("http://x/s2", NAME, 75.0), hit("http://x/s1", DESC, 100.0)];
        let scores = aggregate(&candidates, &weights());
        assert_eq!(scores.len(), 2);
        assert!((score_of(&scores, "http://x/s1") - 50.0).abs() < 1e-9);
        assert!((score_of(&scores, "http://x/s2") - 75.0).abs() < 1e-9);
    }

    #[test]
    fn unweighted_predicates_contribute_nothing() {
        let candidates = [hit("http://x/s1", "http://schema.org/license", 100.0)];
        assert!(aggregate(&candidates, &weights()).is_empty());
    }

    #[test]
    fn no_candidates_no_scores() {
        assert!(aggregate(&[], &weights()).is_empty());
    }

    #[test]
    fn empty_group_has_no_mean() {
        assert_eq!(PredicateGroup::default().mean(), None);
    }
}
