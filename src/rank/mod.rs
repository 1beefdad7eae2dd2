//! Literal ranking engine.
//!
//! Given a [`TripleStore`], a free-text query and a [`RankingConfig`], ranks
//! subjects by how well their literal values match the query:
//!
//! 1. [`profile`] groups literals per subject and predicate (allow-list only)
//! 2. [`similarity`] scores each literal against the normalized query
//! 3. [`aggregate`] folds passing scores into one weighted total per subject
//! 4. [`ranker`] applies the aggregate cutoff and orders the survivors
//!
//! An empty query skips steps 2-4 and lists every profiled subject instead.
//!
//! The engine is pure: no I/O, no logging, no state kept between calls.

pub mod aggregate;
pub mod profile;
pub mod ranker;
pub mod similarity;

use std::collections::HashSet;

use serde::Serialize;

use crate::error::{SearchError, SearchResult};
use crate::graph::TripleStore;

pub use aggregate::AggregateScore;
pub use profile::SubjectProfile;
pub use ranker::RankedResult;
pub use similarity::MatchCandidate;

const SCHEMA_NAME: &str = "http://schema.org/name";
const SCHEMA_DESCRIPTION: &str = "http://schema.org/description";
const SCHEMA_FEATURE_LIST: &str = "http://schema.org/featureList";
const SCHEMA_PROGRAMMING_LANGUAGE: &str = "http://schema.org/programmingLanguage";
const SCHEMA_KEYWORDS: &str = "http://schema.org/keywords";
const IMAG_RELATED_TO_ORGANIZATION: &str =
    "https://imaging-plaza.epfl.ch/ontology#relatedToOrganization";

/// Default per-literal admission threshold.
pub const DEFAULT_RAW_CUTOFF: f64 = 70.0;
/// Default subject-level ranking threshold.
pub const DEFAULT_AGGREGATE_CUTOFF: f64 = 50.0;

/// Ordered predicate → weight table. Its keys form the predicate allow-list.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PredicateWeights {
    entries: Vec<(String, f64)>,
}

impl PredicateWeights {
    /// Build a validated table.
    ///
    /// Every weight must be finite and in (0, 1], and each predicate may
    /// appear only once.
    pub fn new<P: Into<String>>(
        entries: impl IntoIterator<Item = (P, f64)>,
    ) -> SearchResult<Self> {
        let mut seen = HashSet::new();
        let mut table = Vec::new();
        for (predicate, weight) in entries {
            let predicate = predicate.into();
            if !weight.is_finite() || weight <= 0.0 || weight > 1.0 {
                return Err(SearchError::InvalidConfiguration {
                    message: format!("weight {weight} for <{predicate}> is outside (0, 1]"),
                });
            }
            if !seen.insert(predicate.clone()) {
                return Err(SearchError::InvalidConfiguration {
                    message: format!("predicate <{predicate}> is weighted twice"),
                });
            }
            table.push((predicate, weight));
        }
        Ok(Self { entries: table })
    }

    /// The weight table used by the imaging software catalogue.
    pub fn imaging_defaults() -> Self {
        Self {
            entries: default_weight_entries()
                .into_iter()
                .map(|(p, w)| (p.to_string(), w))
                .collect(),
        }
    }

    /// Weight for `predicate`, if it is on the allow-list.
    pub fn get(&self, predicate: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(p, _)| p == predicate)
            .map(|&(_, w)| w)
    }

    /// Predicates and weights in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(p, w)| (p.as_str(), *w))
    }

    /// Predicates in table order.
    pub fn predicates(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(p, _)| p.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub(crate) fn default_weight_entries() -> Vec<(&'static str, f64)> {
    vec![
        (SCHEMA_NAME, 1.0),
        (SCHEMA_DESCRIPTION, 0.5),
        (SCHEMA_FEATURE_LIST, 0.6),
        (SCHEMA_PROGRAMMING_LANGUAGE, 0.5),
        (SCHEMA_KEYWORDS, 0.5),
        (IMAG_RELATED_TO_ORGANIZATION, 0.5),
    ]
}

/// Everything one ranking call needs. Passed explicitly; never global.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingConfig {
    weights: PredicateWeights,
    raw_cutoff: f64,
    aggregate_cutoff: f64,
    max_results: Option<usize>,
}

impl RankingConfig {
    /// Build a validated configuration. Cutoffs must be finite and non-negative.
    pub fn new(
        weights: PredicateWeights,
        raw_cutoff: f64,
        aggregate_cutoff: f64,
    ) -> SearchResult<Self> {
        for (name, value) in [("raw", raw_cutoff), ("aggregate", aggregate_cutoff)] {
            if !value.is_finite() || value < 0.0 {
                return Err(SearchError::InvalidConfiguration {
                    message: format!("{name} cutoff {value} must be a non-negative number"),
                });
            }
        }
        Ok(Self {
            weights,
            raw_cutoff,
            aggregate_cutoff,
            max_results: None,
        })
    }

    /// Keep at most `limit` ranked subjects.
    pub fn with_max_results(mut self, limit: Option<usize>) -> Self {
        self.max_results = limit;
        self
    }

    pub fn weights(&self) -> &PredicateWeights {
        &self.weights
    }

    pub fn raw_cutoff(&self) -> f64 {
        self.raw_cutoff
    }

    pub fn aggregate_cutoff(&self) -> f64 {
        self.aggregate_cutoff
    }

    pub fn max_results(&self) -> Option<usize> {
        self.max_results
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            weights: PredicateWeights::imaging_defaults(),
            raw_cutoff: DEFAULT_RAW_CUTOFF,
            aggregate_cutoff: DEFAULT_AGGREGATE_CUTOFF,
            max_results: None,
        }
    }
}

/// Result of one search call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// A query was given: subjects ordered by aggregate score. May be empty.
    Ranked(RankedResult),
    /// No query: every profiled subject, first-seen order, unranked.
    Listing { subjects: Vec<String> },
}

impl SearchOutcome {
    /// Subject IRIs in output order, whichever mode produced them.
    pub fn subjects(&self) -> Vec<&str> {
        match self {
            SearchOutcome::Ranked(ranked) => ranked.subjects().collect(),
            SearchOutcome::Listing { subjects } => subjects.iter().map(String::as_str).collect(),
        }
    }

    pub fn into_subjects(self) -> Vec<String> {
        match self {
            SearchOutcome::Ranked(ranked) => ranked.into_subjects(),
            SearchOutcome::Listing { subjects } => subjects,
        }
    }

    pub fn is_ranked(&self) -> bool {
        matches!(self, SearchOutcome::Ranked(_))
    }
}

/// Rank the subjects of `store` against `query`.
///
/// A query that normalizes to nothing lists every subject with at least one
/// allow-listed literal, ignoring cutoffs. Otherwise the weight table must be
/// non-empty, and a query that matches nothing yields an empty ranking.
pub fn search(
    store: &TripleStore,
    query: &str,
    config: &RankingConfig,
) -> SearchResult<SearchOutcome> {
    let profile = profile::build(store, config.weights());

    let normalized = similarity::normalize_query(query);
    if normalized.is_empty() {
        return Ok(SearchOutcome::Listing {
            subjects: profile.subjects().map(str::to_owned).collect(),
        });
    }

    if config.weights().is_empty() {
        return Err(SearchError::InvalidConfiguration {
            message: "scoring requires at least one weighted predicate".into(),
        });
    }

    let candidates = similarity::score_candidates(&profile, &normalized, config.raw_cutoff());
    let scores = aggregate::aggregate(&candidates, config.weights());
    Ok(SearchOutcome::Ranked(ranker::rank(
        scores,
        config.aggregate_cutoff(),
        config.max_results(),
    )))
}
