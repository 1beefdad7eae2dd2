//! SPARQL CONSTRUCT builder for the literal subgraph of software entries.

use std::fmt::Write;

use super::Filter;

/// Named graph holding the published catalogue.
pub const DEFAULT_GRAPH_URI: &str = "https://imaging-plaza.epfl.ch/finalGraph";

/// Build a CONSTRUCT query returning every literal-valued triple of the
/// `schema:SoftwareSourceCode` subjects in `graph_uri` that satisfy all
/// `filters`. Filters with an empty selection are skipped.
pub fn build_construct_query(graph_uri: &str, filters: &[Filter]) -> String {
    let mut conditions = String::new();
    for (idx, filter) in filters.iter().enumerate() {
        if filter.selected.is_empty() {
            continue;
        }
        let var = format!("f{idx}_{}", sanitize_var(&filter.key));
        let values = filter
            .selected
            .iter()
            .map(|v| string_literal(v))
            .collect::<Vec<_>>()
            .join(", ");
        // Writing into a String cannot fail.
        let _ = write!(
            conditions,
            "\n      ?s <{}> ?{var} .\n      FILTER(?{var} IN ({values}))",
            escape_iri(&filter.schema)
        );
    }

    format!(
        "PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
PREFIX schema: <http://schema.org/>

CONSTRUCT {{
  ?s ?p ?o .
}}
WHERE {{
  GRAPH <{graph}> {{
      ?s rdf:type schema:SoftwareSourceCode ;
         ?p ?o .
      FILTER(isLiteral(?o)){conditions}
  }}
}}
",
        graph = escape_iri(graph_uri),
    )
}

/// Reduce a filter key to SPARQL variable characters.
fn sanitize_var(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Quote a value as a SPARQL string literal.
fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Percent-encode characters that may not appear inside `<...>`.
fn escape_iri(iri: &str) -> String {
    let mut out = String::with_capacity(iri.len());
    for c in iri.chars() {
        match c {
            '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' => {
                let _ = write!(out, "%{:02X}", c as u32);
            }
            c if c <= ' ' => {
                let _ = write!(out, "%{:02X}", c as u32);
            }
            _ => out.push(c),
        }
    }
    out
}
