//! Search service configuration, persisted as TOML.
//!
//! Everything the ranking engine needs is converted into an explicit
//! [`RankingConfig`] value; nothing is read from globals at ranking time.
//! Graph-store connection details may be overridden from the environment
//! (`GRAPHDB_URL`, `GRAPHDB_USER`, `GRAPHDB_PASSWORD`).

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult, SearchResult};
use crate::rank::{
    DEFAULT_AGGREGATE_CUTOFF, DEFAULT_RAW_CUTOFF, PredicateWeights, RankingConfig,
    default_weight_entries,
};
use crate::source::GraphDbSource;
use crate::source::query::DEFAULT_GRAPH_URI;

pub const ENV_GRAPHDB_URL: &str = "GRAPHDB_URL";
pub const ENV_GRAPHDB_USER: &str = "GRAPHDB_USER";
pub const ENV_GRAPHDB_PASSWORD: &str = "GRAPHDB_PASSWORD";

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub ranking: RankingSection,
    #[serde(default)]
    pub graph: GraphSection,
}

/// `[ranking]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingSection {
    /// Minimum raw score for a literal to count as a match.
    #[serde(default = "default_raw_cutoff")]
    pub raw_cutoff: f64,
    /// Minimum weighted total for a subject to be ranked.
    #[serde(default = "default_aggregate_cutoff")]
    pub aggregate_cutoff: f64,
    /// Keep at most this many ranked subjects.
    #[serde(default)]
    pub max_results: Option<usize>,
    /// Weighted predicate allow-list, in priority order.
    #[serde(default = "default_weights")]
    pub weights: Vec<WeightEntry>,
}

/// One `[[ranking.weights]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub predicate: String,
    pub weight: f64,
}

/// `[graph]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSection {
    /// SPARQL endpoint URL.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Named graph to read.
    #[serde(default = "default_graph_uri")]
    pub graph_uri: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_raw_cutoff() -> f64 {
    DEFAULT_RAW_CUTOFF
}
fn default_aggregate_cutoff() -> f64 {
    DEFAULT_AGGREGATE_CUTOFF
}
fn default_weights() -> Vec<WeightEntry> {
    default_weight_entries()
        .into_iter()
        .map(|(predicate, weight)| WeightEntry {
            predicate: predicate.to_string(),
            weight,
        })
        .collect()
}
fn default_graph_uri() -> String {
    DEFAULT_GRAPH_URI.into()
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for RankingSection {
    fn default() -> Self {
        Self {
            raw_cutoff: default_raw_cutoff(),
            aggregate_cutoff: default_aggregate_cutoff(),
            max_results: None,
            weights: default_weights(),
        }
    }
}

impl Default for GraphSection {
    fn default() -> Self {
        Self {
            endpoint: None,
            graph_uri: default_graph_uri(),
            username: None,
            password: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SearchConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml(&content).map_err(|message| ConfigError::Parse {
            path: path.display().to_string(),
            message,
        })
    }

    /// Load from `path` if given, otherwise defaults; then apply the environment.
    pub fn resolve(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Save to a TOML file. The password is never written.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = self.to_toml().map_err(|message| ConfigError::Parse {
            path: path.display().to_string(),
            message,
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Render as pretty TOML.
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| e.to_string())
    }

    /// Override graph connection settings from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v: &String| !v.trim().is_empty());
        if let Some(url) = non_empty(ENV_GRAPHDB_URL) {
            self.graph.endpoint = Some(url);
        }
        if let Some(user) = non_empty(ENV_GRAPHDB_USER) {
            self.graph.username = Some(user);
        }
        if let Some(password) = non_empty(ENV_GRAPHDB_PASSWORD) {
            self.graph.password = Some(password);
        }
    }

    /// Validated ranking configuration.
    pub fn ranking_config(&self) -> SearchResult<RankingConfig> {
        let weights = PredicateWeights::new(
            self.ranking
                .weights
                .iter()
                .map(|w| (w.predicate.clone(), w.weight)),
        )?;
        Ok(
            RankingConfig::new(weights, self.ranking.raw_cutoff, self.ranking.aggregate_cutoff)?
                .with_max_results(self.ranking.max_results),
        )
    }

    /// Graph-store source for the configured endpoint.
    pub fn graph_source(&self) -> ConfigResult<GraphDbSource> {
        let endpoint = self
            .graph
            .endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or(ConfigError::MissingEndpoint)?;
        let mut source = GraphDbSource::new(endpoint)
            .with_graph(self.graph.graph_uri.clone())
            .with_timeout(Duration::from_secs(self.graph.timeout_secs));
        if let Some(username) = &self.graph.username {
            source = source.with_credentials(
                username.clone(),
                self.graph.password.clone().unwrap_or_default(),
            );
        }
        Ok(source)
    }
}
