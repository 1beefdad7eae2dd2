//! SPARQL-endpoint source (GraphDB or any SPARQL 1.1 protocol server).
//!
//! Uses `ureq` for synchronous HTTP. Failures are reported once; retry and
//! backoff belong to whoever drives the request.

use std::time::{Duration, Instant};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::{SourceError, SourceResult};

use super::query::{DEFAULT_GRAPH_URI, build_construct_query};
use super::{Filter, TripleSource};

/// Longest error body kept in a [`SourceError::Status`].
const MAX_ERROR_BODY: usize = 500;

/// Username/password pair for HTTP Basic authentication.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    fn header_value(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {token}")
    }
}

/// Fetches N-Triples from a SPARQL endpoint with a CONSTRUCT query.
#[derive(Debug, Clone)]
pub struct GraphDbSource {
    endpoint: String,
    graph_uri: String,
    credentials: Option<Credentials>,
    timeout: Duration,
}

impl GraphDbSource {
    /// Source for `endpoint` reading the default catalogue graph, 30 s timeout.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            graph_uri: DEFAULT_GRAPH_URI.to_string(),
            credentials: None,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_graph(mut self, graph_uri: impl Into<String>) -> Self {
        self.graph_uri = graph_uri.into();
        self
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn graph_uri(&self) -> &str {
        &self.graph_uri
    }

    /// The query this source sends for `filters`.
    pub fn query_for(&self, filters: &[Filter]) -> String {
        build_construct_query(&self.graph_uri, filters)
    }
}

impl TripleSource for GraphDbSource {
    fn fetch(&self, filters: &[Filter]) -> SourceResult<String> {
        let query = self.query_for(filters);
        let started = Instant::now();
        tracing::debug!(
            endpoint = %self.endpoint,
            graph = %self.graph_uri,
            filters = filters.len(),
            "sending CONSTRUCT query"
        );

        let agent = ureq::AgentBuilder::new().timeout(self.timeout).build();
        let mut request = agent
            .post(&self.endpoint)
            .set("Accept", "application/n-triples");
        if let Some(credentials) = &self.credentials {
            request = request.set("Authorization", &credentials.header_value());
        }

        match request.send_form(&[("query", query.as_str())]) {
            Ok(response) => {
                let body = response.into_string().map_err(|e| SourceError::Transport {
                    endpoint: self.endpoint.clone(),
                    message: format!("failed to read response body: {e}"),
                })?;
                tracing::info!(
                    endpoint = %self.endpoint,
                    bytes = body.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "graph store responded"
                );
                Ok(body)
            }
            Err(ureq::Error::Status(status, response)) => {
                let mut body = response.into_string().unwrap_or_default();
                if body.len() > MAX_ERROR_BODY {
                    let cut = (0..=MAX_ERROR_BODY)
                        .rev()
                        .find(|&i| body.is_char_boundary(i))
                        .unwrap_or(0);
                    body.truncate(cut);
                    body.push_str("...");
                }
                tracing::warn!(endpoint = %self.endpoint, status, "graph store rejected query");
                Err(SourceError::Status { status, body })
            }
            Err(ureq::Error::Transport(transport)) => {
                tracing::warn!(endpoint = %self.endpoint, error = %transport, "graph store unreachable");
                Err(SourceError::Transport {
                    endpoint: self.endpoint.clone(),
                    message: transport.to_string(),
                })
            }
        }
    }
}
