//! Triple model and the immutable in-memory triple store.
//!
//! The store holds exactly what the graph-store collaborator returned for one
//! request. Literal objects are reduced to plain strings at ingest so nothing
//! downstream ever has to inspect datatypes or language tags.

pub mod store;

pub use store::TripleStore;

use serde::{Deserialize, Serialize};

/// The object position of a triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Object {
    /// Plain lexical form of an RDF literal.
    Literal(String),
    /// IRI (without angle brackets) or blank node (`_:id`).
    Iri(String),
}

impl Object {
    /// The literal text, if this object is a literal.
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Object::Literal(value) => Some(value),
            Object::Iri(_) => None,
        }
    }
}

/// A triple (subject, predicate, object).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    /// Subject IRI or blank node.
    pub subject: String,
    /// Predicate IRI.
    pub predicate: String,
    /// Literal or IRI object.
    pub object: Object,
}

impl Triple {
    /// Create a triple with a literal object.
    pub fn literal(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: Object::Literal(value.into()),
        }
    }

    /// Create a triple with an IRI object.
    pub fn iri(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: Object::Iri(object.into()),
        }
    }
}

/// Strip one pair of surrounding angle brackets from an IRI, if present.
pub fn clean_iri(term: &str) -> &str {
    term.strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
        .unwrap_or(term)
}
