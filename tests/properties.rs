//! Property-based tests for the ranking engine.
//!
//! These check invariants that must hold for any catalogue and query:
//! - ranking is deterministic and its order is total
//! - every ranked score is non-negative and clears the aggregate cutoff
//! - the empty-query listing is exactly the profiled subjects
//! - scaling every weight scales every total
//! - raising one weight never lowers a total and leaves unrelated totals alone

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;

use plaza_search::graph::{Triple, TripleStore};
use plaza_search::rank::aggregate::aggregate;
use plaza_search::rank::similarity::{normalize_query, partial_ratio, score_candidates};
use plaza_search::rank::{self, PredicateWeights, RankingConfig, SearchOutcome, profile};

const NAME: &str = "http://schema.org/name";
const DESC: &str = "http://schema.org/description";
const KEYWORDS: &str = "http://schema.org/keywords";
const LICENSE: &str = "http://schema.org/license";

fn arb_triple() -> impl Strategy<Value = Triple> {
    (
        0..5usize,
        prop::sample::select(vec![NAME, DESC, KEYWORDS, LICENSE]),
        "[a-z]{1,8}( [a-z]{1,8}){0,2}",
    )
        .prop_map(|(s, p, o)| Triple::literal(format!("http://x/s{s}"), p, o))
}

fn arb_store() -> impl Strategy<Value = TripleStore> {
    prop::collection::vec(arb_triple(), 0..24).prop_map(TripleStore::from_triples)
}

fn arb_query() -> impl Strategy<Value = String> {
    "[a-z]{1,6}"
}

fn weights(scale: f64) -> PredicateWeights {
    PredicateWeights::new([(NAME, 1.0 * scale), (DESC, 0.5 * scale), (KEYWORDS, 0.6 * scale)])
        .unwrap()
}

fn ranked(outcome: SearchOutcome) -> rank::RankedResult {
    match outcome {
        SearchOutcome::Ranked(ranked) => ranked,
        SearchOutcome::Listing { .. } => panic!("non-empty query produced a listing"),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn ranking_is_deterministic(store in arb_store(), query in arb_query()) {
        let config = RankingConfig::new(weights(1.0), 70.0, 50.0).unwrap();
        let first = rank::search(&store, &query, &config).unwrap();
        let second = rank::search(&store, &query, &config).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn ranked_order_is_total_and_thresholded(
        store in arb_store(),
        query in arb_query(),
        aggregate_cutoff in 0.0f64..120.0,
    ) {
        let config = RankingConfig::new(weights(1.0), 60.0, aggregate_cutoff).unwrap();
        let result = ranked(rank::search(&store, &query, &config).unwrap());

        let mut seen = HashSet::new();
        for entry in result.entries() {
            prop_assert!(entry.score >= 0.0);
            prop_assert!(entry.score >= aggregate_cutoff);
            prop_assert!(seen.insert(entry.subject.clone()), "duplicate {}", entry.subject);
        }
        for pair in result.entries().windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(
                a.score > b.score || (a.score == b.score && a.subject < b.subject),
                "{:?} before {:?}", a, b
            );
        }
    }

    #[test]
    fn listing_is_profiled_subjects_in_first_seen_order(store in arb_store()) {
        let config = RankingConfig::new(weights(1.0), 70.0, 50.0).unwrap();
        let outcome = rank::search(&store, "  ", &config).unwrap();
        prop_assert!(!outcome.is_ranked());

        let allowed = [NAME, DESC, KEYWORDS];
        let mut expected: Vec<&str> = Vec::new();
        for triple in store.iter() {
            if allowed.contains(&triple.predicate.as_str()) && !expected.contains(&triple.subject.as_str()) {
                expected.push(triple.subject.as_str());
            }
        }
        prop_assert_eq!(outcome.subjects(), expected);
    }

    #[test]
    fn scaling_weights_scales_totals(store in arb_store(), query in arb_query()) {
        let full = RankingConfig::new(weights(1.0), 70.0, 0.0).unwrap();
        let half = RankingConfig::new(weights(0.5), 70.0, 0.0).unwrap();
        let full = ranked(rank::search(&store, &query, &full).unwrap());
        let half = ranked(rank::search(&store, &query, &half).unwrap());

        prop_assert_eq!(full.len(), half.len());
        for (f, h) in full.entries().iter().zip(half.entries()) {
            prop_assert_eq!(&f.subject, &h.subject);
            prop_assert!((f.score * 0.5 - h.score).abs() < 1e-9);
        }
    }

    #[test]
    fn profile_build_is_idempotent(store in arb_store()) {
        let w = weights(1.0);
        prop_assert_eq!(profile::build(&store, &w), profile::build(&store, &w));
    }

    #[test]
    fn raising_one_weight_is_monotone(store in arb_store(), query in arb_query()) {
        let base = weights(1.0);
        let raised = PredicateWeights::new([(NAME, 1.0), (DESC, 0.9), (KEYWORDS, 0.6)]).unwrap();

        let profile = profile::build(&store, &base);
        let candidates = score_candidates(&profile, &normalize_query(&query), 70.0);
        let with_desc: HashSet<&str> = candidates
            .iter()
            .filter(|c| c.predicate == DESC)
            .map(|c| c.subject)
            .collect();

        let before: HashMap<String, f64> = aggregate(&candidates, &base)
            .into_iter()
            .map(|s| (s.subject, s.score))
            .collect();
        let after: HashMap<String, f64> = aggregate(&candidates, &raised)
            .into_iter()
            .map(|s| (s.subject, s.score))
            .collect();

        prop_assert_eq!(before.len(), after.len());
        for (subject, total) in &before {
            let raised_total = after[subject];
            if with_desc.contains(subject.as_str()) {
                prop_assert!(raised_total >= *total, "{} dropped: {} -> {}", subject, total, raised_total);
            } else {
                prop_assert_eq!(raised_total, *total);
            }
        }
    }

    #[test]
    fn partial_ratio_is_bounded(query in "[a-z]{0,16}", literal in "[a-z ]{0,16}") {
        let score = partial_ratio(&query, &literal);
        prop_assert!((0.0..=100.0).contains(&score));
    }

    #[test]
    fn embedded_query_scores_full_marks(
        prefix in "[a-z ]{0,8}",
        query in "[a-z]{1,8}",
        suffix in "[a-z ]{0,8}",
    ) {
        let literal = format!("{prefix}{query}{suffix}");
        prop_assert_eq!(partial_ratio(&query, &literal), 100.0);
    }
}
