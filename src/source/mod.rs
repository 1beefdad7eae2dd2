//! Graph-store collaborators: where the triples for one request come from.
//!
//! A [`TripleSource`] turns a set of structured [`Filter`]s into N-Triples
//! text. The ranking engine never calls a source itself; callers fetch first
//! and hand the parsed [`TripleStore`](crate::graph::TripleStore) over.

pub mod graphdb;
pub mod query;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{SourceError, SourceResult};

pub use graphdb::GraphDbSource;

/// A structured filter: subjects must carry `schema` with one of `selected`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    /// Short name, used to derive the SPARQL variable.
    pub key: String,
    /// Predicate IRI to constrain.
    pub schema: String,
    /// Accepted literal values. An empty selection disables the filter.
    #[serde(default)]
    pub selected: Vec<String>,
}

/// Decode a JSON filter list, as sent in the `filters` request parameter.
///
/// Blank input means "no filters".
pub fn parse_filters(json: &str) -> SourceResult<Vec<Filter>> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(json).map_err(|e| SourceError::InvalidFilters {
        message: e.to_string(),
    })
}

/// Anything that can supply N-Triples for a filtered request.
pub trait TripleSource: Send + Sync {
    /// Fetch the triples matching `filters` as N-Triples text.
    fn fetch(&self, filters: &[Filter]) -> SourceResult<String>;
}

/// Reads a fixed N-Triples file. Filters are ignored.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TripleSource for FileSource {
    fn fetch(&self, _filters: &[Filter]) -> SourceResult<String> {
        std::fs::read_to_string(&self.path).map_err(|e| SourceError::Io {
            path: self.path.display().to_string(),
            source: e,
        })
    }
}
