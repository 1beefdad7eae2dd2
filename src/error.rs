//! Rich diagnostic error types for plaza-search.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so callers know exactly what
//! went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for plaza-search.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text, source spans) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum PlazaError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Search errors
// ---------------------------------------------------------------------------

/// Failures surfaced by the ranking engine.
///
/// Both variants are input defects: the engine never retries and never
/// downgrades them to an empty result.
#[derive(Debug, Error, Diagnostic)]
pub enum SearchError {
    #[error("malformed triple input: {message}")]
    #[diagnostic(
        code(plaza::search::malformed_input),
        help(
            "The triple data could not be parsed as N-Triples. \
             Check the graph store response or the input file for syntax errors."
        )
    )]
    MalformedInput { message: String },

    #[error("invalid ranking configuration: {message}")]
    #[diagnostic(
        code(plaza::search::invalid_config),
        help(
            "Weights must lie in (0, 1], predicates may appear only once, \
             cutoffs must be non-negative, and scoring needs at least one weighted predicate."
        )
    )]
    InvalidConfiguration { message: String },
}

// ---------------------------------------------------------------------------
// Source errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum SourceError {
    #[error("graph store returned HTTP {status}: {body}")]
    #[diagnostic(
        code(plaza::source::status),
        help(
            "The SPARQL endpoint rejected the request. Check the endpoint URL, \
             the repository name and the credentials."
        )
    )]
    Status { status: u16, body: String },

    #[error("transport error talking to {endpoint}: {message}")]
    #[diagnostic(
        code(plaza::source::transport),
        help("The graph store could not be reached. Is it running and is the URL correct?")
    )]
    Transport { endpoint: String, message: String },

    #[error("failed to read triples from {path}")]
    #[diagnostic(
        code(plaza::source::io),
        help("Ensure the N-Triples file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid filters: {message}")]
    #[diagnostic(
        code(plaza::source::invalid_filters),
        help(
            "Filters must be a JSON list of objects like \
             [{{\"key\": \"license\", \"schema\": \"http://schema.org/license\", \"selected\": [\"MIT\"]}}]."
        )
    )]
    InvalidFilters { message: String },
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(plaza::config::read),
        help("Ensure the config file exists and is valid TOML.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {message}")]
    #[diagnostic(
        code(plaza::config::parse),
        help("Check the TOML syntax and the field names in the config file.")
    )]
    Parse { path: String, message: String },

    #[error("failed to write config: {path}")]
    #[diagnostic(
        code(plaza::config::write),
        help("Ensure you have write permissions to the target directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no graph store endpoint configured")]
    #[diagnostic(
        code(plaza::config::missing_endpoint),
        help("Set `graph.endpoint` in the config file or export GRAPHDB_URL.")
    )]
    MissingEndpoint,
}

pub type PlazaResult<T> = std::result::Result<T, PlazaError>;
pub type SearchResult<T> = std::result::Result<T, SearchError>;
pub type SourceResult<T> = std::result::Result<T, SourceError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
