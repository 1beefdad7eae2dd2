//! plaza-search CLI: rank RDF software metadata against a keyword query.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use plaza_search::config::SearchConfig;
use plaza_search::engine::SearchEngine;
use plaza_search::rank::SearchOutcome;
use plaza_search::response::SubjectBindings;
use plaza_search::source::{FileSource, parse_filters};

#[derive(Parser)]
#[command(name = "plaza-search", version, about = "Fuzzy search over RDF software metadata")]
struct Cli {
    /// TOML configuration file (defaults apply when omitted).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the subjects of a local N-Triples file.
    Rank {
        /// Path to the N-Triples file.
        #[arg(long)]
        input: PathBuf,

        /// Free-text query. Empty lists every subject unranked.
        #[arg(long, default_value = "")]
        query: String,

        /// Print the SPARQL-results-JSON envelope instead of plain lines.
        #[arg(long)]
        json: bool,
    },

    /// Fetch from the configured graph store, then rank.
    Search {
        /// Free-text query. Empty lists every subject unranked.
        #[arg(long, default_value = "")]
        query: String,

        /// JSON filter list, e.g. '[{"key":"license","schema":"http://schema.org/license","selected":["MIT"]}]'.
        #[arg(long)]
        filters: Option<String>,

        /// Print the SPARQL-results-JSON envelope instead of plain lines.
        #[arg(long)]
        json: bool,
    },

    /// Print the CONSTRUCT query sent to the graph store.
    Sparql {
        /// JSON filter list.
        #[arg(long)]
        filters: Option<String>,
    },

    /// Print the effective configuration as TOML.
    Config,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = SearchConfig::resolve(cli.config.as_deref())?;

    match cli.command {
        Commands::Rank { input, query, json } => {
            let engine = SearchEngine::new(FileSource::new(&input), config.ranking_config()?);
            let outcome = engine.search(&query, &[])?;
            print_outcome(&outcome, json)?;
        }

        Commands::Search {
            query,
            filters,
            json,
        } => {
            let filters = parse_filters(filters.as_deref().unwrap_or_default())?;
            let engine = SearchEngine::new(config.graph_source()?, config.ranking_config()?);
            let outcome = engine.search(&query, &filters)?;
            print_outcome(&outcome, json)?;
        }

        Commands::Sparql { filters } => {
            let filters = parse_filters(filters.as_deref().unwrap_or_default())?;
            let query = plaza_search::source::query::build_construct_query(
                &config.graph.graph_uri,
                &filters,
            );
            println!("{query}");
        }

        Commands::Config => {
            let rendered = config.to_toml().map_err(|e| miette::miette!("{e}"))?;
            print!("{rendered}");
        }
    }

    Ok(())
}

fn print_outcome(outcome: &SearchOutcome, json: bool) -> Result<()> {
    print!("{}", render_outcome(outcome, json)?);
    Ok(())
}

/// Text printed for one search: the JSON envelope, or one line per subject.
fn render_outcome(outcome: &SearchOutcome, json: bool) -> Result<String> {
    if json {
        let envelope = SubjectBindings::from_subjects(outcome.subjects());
        let mut rendered = serde_json::to_string_pretty(&envelope).into_diagnostic()?;
        rendered.push('\n');
        return Ok(rendered);
    }

    let mut out = String::new();
    match outcome {
        SearchOutcome::Ranked(ranked) => {
            if ranked.is_empty() {
                out.push_str("No matches.\n");
            }
            for (rank, entry) in ranked.entries().iter().enumerate() {
                out.push_str(&format!(
                    "{:>3}. {:>7.2}  {}\n",
                    rank + 1,
                    entry.score,
                    entry.subject
                ));
            }
        }
        SearchOutcome::Listing { subjects } => {
            for subject in subjects {
                out.push_str(subject);
                out.push('\n');
            }
        }
    }
    Ok(out)
}
