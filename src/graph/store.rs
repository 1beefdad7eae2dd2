//! Immutable in-memory triple store.
//!
//! Triples keep their source order; a predicate index gives the profile
//! builder direct access to the handful of predicates it cares about.

use std::collections::{HashMap, HashSet};

use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::Term;

use crate::error::{SearchError, SearchResult};

use super::{Object, Triple, clean_iri};

/// A read-only bag of triples, indexed by predicate.
#[derive(Debug, Clone, Default)]
pub struct TripleStore {
    triples: Vec<Triple>,
    by_predicate: HashMap<String, Vec<usize>>,
}

impl TripleStore {
    /// Build a store from already-typed triples. Duplicates are kept.
    pub fn from_triples(triples: impl IntoIterator<Item = Triple>) -> Self {
        let triples: Vec<Triple> = triples.into_iter().collect();
        let mut by_predicate: HashMap<String, Vec<usize>> = HashMap::new();
        for (pos, triple) in triples.iter().enumerate() {
            by_predicate
                .entry(triple.predicate.clone())
                .or_default()
                .push(pos);
        }
        Self {
            triples,
            by_predicate,
        }
    }

    /// Parse N-Triples text.
    ///
    /// Empty or whitespace-only input yields an empty store: an upstream that
    /// matched nothing is not malformed. Literal objects are reduced to their
    /// lexical form here, once.
    pub fn parse_ntriples(input: &str) -> SearchResult<Self> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }

        let mut triples = Vec::new();
        for quad in RdfParser::from_format(RdfFormat::NTriples).for_reader(input.as_bytes()) {
            let quad = quad.map_err(|e| SearchError::MalformedInput {
                message: e.to_string(),
            })?;
            let object = match quad.object {
                Term::Literal(literal) => Object::Literal(literal.value().to_owned()),
                other => Object::Iri(clean_iri(&other.to_string()).to_owned()),
            };
            triples.push(Triple {
                subject: clean_iri(&quad.subject.to_string()).to_owned(),
                predicate: quad.predicate.into_string(),
                object,
            });
        }

        Ok(Self::from_triples(triples))
    }

    /// Triples with the given predicate, in source order.
    pub fn with_predicate<'a>(&'a self, predicate: &str) -> impl Iterator<Item = &'a Triple> + 'a {
        self.by_predicate
            .get(predicate)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|&pos| &self.triples[pos])
    }

    /// Triples whose predicate is a member of `predicates`, in source order.
    pub fn matching<'a>(
        &'a self,
        predicates: &'a HashSet<&str>,
    ) -> impl Iterator<Item = &'a Triple> + 'a {
        self.triples
            .iter()
            .filter(|t| predicates.contains(t.predicate.as_str()))
    }

    /// All triples in source order.
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Distinct subjects in first-seen order.
    pub fn subjects(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.triples
            .iter()
            .map(|t| t.subject.as_str())
            .filter(|s| seen.insert(*s))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAME: &str = "http://schema.org/name";
    const DESC: &str = "http://schema.org/description";

    const DATA: &str = r#"
<http://x/s1> <http://schema.org/name> "Image Segmenter" .
<http://x/s1> <http://schema.org/description> "A tool"@en .
<http://x/s1> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://schema.org/SoftwareSourceCode> .
<http://x/s2> <http://schema.org/name> "42"^^<http://www.w3.org/2001/XMLSchema#integer> .
"#;

    #[test]
    fn parses_literals_to_plain_strings() {
        let store = TripleStore::parse_ntriples(DATA).unwrap();
        assert_eq!(store.len(), 4);

        let names: Vec<_> = store
            .with_predicate(NAME)
            .map(|t| t.object.as_literal().unwrap())
            .collect();
        assert_eq!(names, vec!["Image Segmenter", "42"]);

        let desc = store.with_predicate(DESC).next().unwrap();
        assert_eq!(desc.subject, "http://x/s1");
        assert_eq!(desc.object, Object::Literal("A tool".into()));
    }

    #[test]
    fn iri_objects_are_not_literals() {
        let store = TripleStore::parse_ntriples(DATA).unwrap();
        let ty = store
            .with_predicate("http://www.w3.org/1999/02/22-rdf-syntax-ns#type")
            .next()
            .unwrap();
        assert_eq!(
            ty.object,
            Object::Iri("http://schema.org/SoftwareSourceCode".into())
        );
    }

    #[test]
    fn empty_input_is_empty_store() {
        assert!(TripleStore::parse_ntriples("").unwrap().is_empty());
        assert!(TripleStore::parse_ntriples("  \n\t ").unwrap().is_empty());
    }

    #[test]
    fn malformed_input_is_rejected() {
        let err = TripleStore::parse_ntriples("<http://x/s1> <http://schema.org/name> .\n")
            .unwrap_err();
        assert!(matches!(err, SearchError::MalformedInput { .. }));

        let err = TripleStore::parse_ntriples("this is not rdf").unwrap_err();
        assert!(matches!(err, SearchError::MalformedInput { .. }));
    }

    #[test]
    fn matching_filters_by_predicate_set() {
        let store = TripleStore::parse_ntriples(DATA).unwrap();
        let set: HashSet<&str> = [DESC].into_iter().collect();
        let hits: Vec<_> = store.matching(&set).collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].predicate, DESC);
    }

    #[test]
    fn unknown_predicate_yields_nothing() {
        let store = TripleStore::parse_ntriples(DATA).unwrap();
        assert_eq!(store.with_predicate("http://x/unknown").count(), 0);
    }

    #[test]
    fn duplicates_are_preserved() {
        let t = Triple::literal("http://x/s1", NAME, "Alpha");
        let store = TripleStore::from_triples(vec![t.clone(), t]);
        assert_eq!(store.with_predicate(NAME).count(), 2);
        assert_eq!(store.subjects(), vec!["http://x/s1"]);
    }
}
