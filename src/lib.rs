//! # plaza-search
//!
//! Relevance-ranked fuzzy search over software metadata stored as RDF.
//!
//! ## Architecture
//!
//! - **Triple store** (`graph`): immutable, predicate-indexed triples parsed from N-Triples
//! - **Ranking engine** (`rank`): literal profiles, partial fuzzy scoring, weighted
//!   per-predicate means, thresholded deterministic ranking
//! - **Sources** (`source`): SPARQL CONSTRUCT fetch from a graph store, or a local file
//! - **Facade** (`engine`): fetch → parse → rank for one request
//!
//! ## Library usage
//!
//! ```
//! use plaza_search::graph::{Triple, TripleStore};
//! use plaza_search::rank::{self, RankingConfig};
//!
//! let store = TripleStore::from_triples(vec![
//!     Triple::literal("http://x/s1", "http://schema.org/name", "Image Segmenter"),
//!     Triple::literal("http://x/s1", "http://schema.org/description", "tool"),
//! ]);
//! let outcome = rank::search(&store, "Segmenter", &RankingConfig::default()).unwrap();
//! assert_eq!(outcome.subjects(), vec!["http://x/s1"]);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod rank;
pub mod response;
pub mod source;
