//! Fuzzy similarity scoring of one query against one literal.
//!
//! Queries are short keywords and literals are free text, so the scorer is a
//! *partial* matcher: the shorter string is slid across the longer one and the
//! best-aligned window decides the score.

use rayon::prelude::*;
use unicode_normalization::UnicodeNormalization;

use super::SubjectProfile;

/// Similarity of a query and literal, in [0, 100].
pub type RawScore = f64;

/// A literal that passed the per-literal cutoff.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate<'a> {
    pub subject: &'a str,
    pub predicate: &'a str,
    pub value: &'a str,
    pub score: RawScore,
}

/// NFC, lower-case, all whitespace removed.
///
/// Multi-word queries collapse into a single token on purpose: word order
/// and spacing do not matter for keyword search over free text.
pub fn normalize_query(query: &str) -> String {
    query
        .nfc()
        .flat_map(char::to_lowercase)
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// NFC, lower-case, surrounding whitespace trimmed.
pub fn normalize_literal(literal: &str) -> String {
    literal.trim().nfc().flat_map(char::to_lowercase).collect()
}

/// Best normalized Levenshtein similarity between `query` and any equally
/// long window of `literal`, scaled to [0, 100].
///
/// Only the query slides: a literal shorter than the query is compared whole,
/// so a one-letter literal cannot claim a long query. Inputs are expected to
/// be normalized already. An empty side scores 0; a query found verbatim in
/// the literal scores 100 without running the DP.
pub fn partial_ratio(query: &str, literal: &str) -> RawScore {
    let query_len = query.chars().count();
    let literal_len = literal.chars().count();

    if query_len == 0 || literal_len == 0 {
        return 0.0;
    }
    if literal.contains(query) {
        return 100.0;
    }
    if literal_len <= query_len {
        return strsim::normalized_levenshtein(query, literal) * 100.0;
    }

    let literal_chars: Vec<char> = literal.chars().collect();
    let mut window = String::with_capacity(query.len());
    let mut best = 0.0_f64;
    for start in 0..=literal_len - query_len {
        window.clear();
        window.extend(&literal_chars[start..start + query_len]);
        let sim = strsim::normalized_levenshtein(query, &window);
        if sim > best {
            best = sim;
        }
    }
    best * 100.0
}

/// Score every literal of `profile` against an already-normalized query.
///
/// Keeps literals scoring at least `raw_cutoff` (and above zero). Scoring fans
/// out over rayon; the result keeps profile order regardless of scheduling.
pub fn score_candidates<'a>(
    profile: &'a SubjectProfile,
    normalized_query: &str,
    raw_cutoff: f64,
) -> Vec<MatchCandidate<'a>> {
    if normalized_query.is_empty() {
        return Vec::new();
    }

    let work: Vec<(&str, &str, &str)> = profile
        .groups()
        .flat_map(|(subject, predicate, values)| {
            values
                .iter()
                .map(move |value| (subject, predicate, value.as_str()))
        })
        .collect();

    work.par_iter()
        .filter_map(|&(subject, predicate, value)| {
            let score = partial_ratio(normalized_query, &normalize_literal(value));
            (score > 0.0 && score >= raw_cutoff).then_some(MatchCandidate {
                subject,
                predicate,
                value,
                score,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Triple, TripleStore};
    use crate::rank::{PredicateWeights, profile};

    #[test]
    fn query_normalization_strips_all_whitespace() {
        assert_eq!(normalize_query("  Image  Segmenter\t"), "imagesegmenter");
        assert_eq!(normalize_query("   "), "");
        assert_eq!(normalize_query("ÄRGER"), "ärger");
    }

    #[test]
    fn literal_normalization_keeps_inner_spaces() {
        assert_eq!(normalize_literal("  Image Segmenter "), "image segmenter");
    }

    #[test]
    fn decomposed_and_composed_forms_match() {
        let composed = normalize_literal("caf\u{e9}");
        let decomposed = normalize_query("cafe\u{301}");
        assert_eq!(partial_ratio(&decomposed, &composed), 100.0);
    }

    #[test]
    fn substring_scores_full_marks() {
        assert_eq!(partial_ratio("segmenter", "image segmenter"), 100.0);
        assert_eq!(partial_ratio("image", "image segmenter"), 100.0);
    }

    #[test]
    fn short_literal_does_not_claim_longer_query() {
        assert!(partial_ratio("microscopyregistration", "r") < 10.0);
        assert!(partial_ratio("imagesegmenter", "segmenter") < 70.0);
        // A literal shorter than the query but nearly equal still scores.
        assert!(partial_ratio("segmenters", "segmenter") > 85.0);
    }

    #[test]
    fn near_substring_scores_high() {
        // One substitution in a nine-character window.
        let score = partial_ratio("segmentor", "image segmenter tool");
        assert!(score > 85.0 && score < 100.0, "score was {score}");
    }

    #[test]
    fn unrelated_text_scores_low() {
        assert!(partial_ratio("segmenter", "tool") < 70.0);
        assert!(partial_ratio("gamma", "alpha") < 70.0);
        assert!(partial_ratio("gamma", "beta") < 70.0);
    }

    #[test]
    fn empty_side_scores_zero() {
        assert_eq!(partial_ratio("", "anything"), 0.0);
        assert_eq!(partial_ratio("query", ""), 0.0);
        assert_eq!(partial_ratio("", ""), 0.0);
    }

    #[test]
    fn scores_stay_in_range() {
        for (a, b) in [("abc", "xyz"), ("abc", "abd"), ("a", "bbbbbbbb"), ("xyz", "xyz")] {
            let s = partial_ratio(a, b);
            assert!((0.0..=100.0).contains(&s), "{a} vs {b} gave {s}");
        }
    }

    #[test]
    fn candidates_respect_cutoff_and_order() {
        let name = "http://schema.org/name";
        let desc = "http://schema.org/description";
        let store = TripleStore::from_triples(vec![
            Triple::literal("http://x/s1", name, "Image Segmenter"),
            Triple::literal("http://x/s1", desc, "tool"),
            Triple::literal("http://x/s2", desc, "A segmenter for cells"),
        ]);
        let weights = PredicateWeights::new([(name, 1.0), (desc, 0.5)]).unwrap();
        let profile = profile::build(&store, &weights);

        let hits = score_candidates(&profile, "segmenter", 70.0);
        let summary: Vec<_> = hits.iter().map(|c| (c.subject, c.predicate)).collect();
        assert_eq!(summary, vec![("http://x/s1", name), ("http://x/s2", desc)]);
        assert!(hits.iter().all(|c| c.score == 100.0));
    }

    #[test]
    fn empty_query_never_qualifies() {
        let name = "http://schema.org/name";
        let store = TripleStore::from_triples(vec![Triple::literal("http://x/s1", name, "Alpha")]);
        let weights = PredicateWeights::new([(name, 1.0)]).unwrap();
        let profile = profile::build(&store, &weights);
        assert!(score_candidates(&profile, "", 0.0).is_empty());
    }
}
