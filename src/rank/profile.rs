//! Literal profile: subject → predicate → literal values.

use std::collections::{BTreeMap, HashSet};

use crate::graph::TripleStore;

use super::PredicateWeights;

/// Literal values per subject and predicate, restricted to the allow-list.
///
/// Built fresh for every request. Literal lists keep source order and keep
/// duplicates, since duplicates count towards per-predicate means.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectProfile {
    order: Vec<String>,
    literals: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl SubjectProfile {
    /// Distinct subjects in first-seen order.
    pub fn subjects(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Predicate → literals for one subject.
    pub fn get(&self, subject: &str) -> Option<&BTreeMap<String, Vec<String>>> {
        self.literals.get(subject)
    }

    /// Literals of one (subject, predicate) pair; empty if absent.
    pub fn literals(&self, subject: &str, predicate: &str) -> &[String] {
        self.literals
            .get(subject)
            .and_then(|by_pred| by_pred.get(predicate))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every (subject, predicate, literals) group, subjects in first-seen
    /// order and predicates in lexical order.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &str, &[String])> {
        self.order.iter().flat_map(move |subject| {
            self.literals
                .get(subject)
                .into_iter()
                .flatten()
                .map(move |(predicate, values)| {
                    (subject.as_str(), predicate.as_str(), values.as_slice())
                })
        })
    }

    /// Number of distinct subjects.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn push(&mut self, subject: &str, predicate: &str, value: &str) {
        if !self.literals.contains_key(subject) {
            self.order.push(subject.to_owned());
        }
        self.literals
            .entry(subject.to_owned())
            .or_default()
            .entry(predicate.to_owned())
            .or_default()
            .push(value.to_owned());
    }
}

/// Group the literal objects of `store` by subject and predicate.
///
/// One pass over the store in source order, visiting only predicates in
/// `weights`. IRI objects are skipped, so a subject with no allow-listed
/// literal never appears.
pub fn build(store: &TripleStore, weights: &PredicateWeights) -> SubjectProfile {
    let allowed: HashSet<&str> = weights.predicates().collect();
    let mut profile = SubjectProfile::default();
    for triple in store.matching(&allowed) {
        if let Some(value) = triple.object.as_literal() {
            profile.push(&triple.subject, &triple.predicate, value);
        }
    }
    profile
}
