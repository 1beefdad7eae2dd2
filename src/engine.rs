//! Search facade: fetch, parse, rank.
//!
//! `SearchEngine` wires a [`TripleSource`] to the pure ranking engine. It is
//! the only place where a request touches I/O, and the only place that logs.

use std::time::Instant;

use crate::error::PlazaResult;
use crate::graph::TripleStore;
use crate::rank::{self, RankingConfig, SearchOutcome};
use crate::source::{Filter, TripleSource};

/// One configured search pipeline. Holds no per-request state.
pub struct SearchEngine {
    source: Box<dyn TripleSource>,
    ranking: RankingConfig,
}

impl SearchEngine {
    pub fn new(source: impl TripleSource + 'static, ranking: RankingConfig) -> Self {
        Self {
            source: Box::new(source),
            ranking,
        }
    }

    pub fn ranking(&self) -> &RankingConfig {
        &self.ranking
    }

    /// Fetch the filtered triples and rank them against `query`.
    pub fn search(&self, query: &str, filters: &[Filter]) -> PlazaResult<SearchOutcome> {
        let started = Instant::now();
        let data = self.source.fetch(filters)?;
        let store = TripleStore::parse_ntriples(&data)?;
        let outcome = rank::search(&store, query, &self.ranking)?;
        tracing::info!(
            query,
            filters = filters.len(),
            triples = store.len(),
            results = outcome.subjects().len(),
            ranked = outcome.is_ranked(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "search complete"
        );
        Ok(outcome)
    }
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("ranking", &self.ranking)
            .finish_non_exhaustive()
    }
}
