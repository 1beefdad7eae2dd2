//! SPARQL-results-JSON envelope for search output.
//!
//! Front-ends consume search results the same way they consume a `SELECT ?s`
//! answer from the graph store, so the ordered subject list is wrapped in
//! that shape.

use serde::{Deserialize, Serialize};

/// `{"head": {"vars": ["s"]}, "results": {"bindings": [...]}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectBindings {
    pub head: Head,
    pub results: Bindings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Head {
    pub vars: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bindings {
    pub bindings: Vec<Binding>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    pub s: BoundTerm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundTerm {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

impl SubjectBindings {
    /// Wrap `subjects` in order. Blank nodes are typed `bnode`.
    pub fn from_subjects<S: AsRef<str>>(subjects: impl IntoIterator<Item = S>) -> Self {
        let bindings = subjects
            .into_iter()
            .map(|subject| {
                let subject = subject.as_ref();
                let (kind, value) = match subject.strip_prefix("_:") {
                    Some(label) => ("bnode", label),
                    None => ("uri", subject),
                };
                Binding {
                    s: BoundTerm {
                        kind: kind.to_string(),
                        value: value.to_string(),
                    },
                }
            })
            .collect();
        Self {
            head: Head {
                vars: vec!["s".to_string()],
            },
            results: Bindings { bindings },
        }
    }

    /// Subject values in order.
    pub fn subjects(&self) -> impl Iterator<Item = &str> {
        self.results.bindings.iter().map(|b| b.s.value.as_str())
    }
}
