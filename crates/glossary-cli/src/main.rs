//! `glossary` CLI: parse, validate, index, query, relate and scaffold term files.
//!
//! ## Usage
//!
//! ```sh
//! # Parse a term file to pretty-printed JSON (stdin → stdout)
//! cat data/terms/agent.yml | glossary parse
//!
//! # Validate every term file in data/terms
//! glossary validate
//!
//! # Validate with a JSON schema's `required` list and a rules override file
//! glossary validate --schema schema/term.schema.json --rules rules.yml
//!
//! # Build build/glossary.json and build/search-index.json
//! glossary index --site-assets-dir docs/assets
//!
//! # Scaffold data/terms/assurance-case.yml
//! glossary new --term "Assurance case"
//!
//! # Query the corpus
//! glossary list --role policy --q retrieval
//! glossary show retrieval-augmented-generation
//! glossary info
//!
//! # Write build/related.json and one Markdown include per term
//! glossary related --top-k 5
//! ```
//!
//! Logs go to stderr. Set `RUST_LOG` or pass `--verbose` to see them.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use glossary_core::{
    build_search_index, glossary_payload, related_markdown, related_terms, scaffold,
    validate_dir, Corpus, GlossaryError, TermQuery, ValidationRules,
};
use serde_json::Value as JsonValue;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

const SEARCH_ASSET_NAME: &str = "glossary-search.json";
const DEFAULT_SITE_URL: &str = "https://san-serif-sentiments.github.io/ai-glossary/terms";

#[derive(Parser)]
#[command(
    name = "glossary",
    version,
    about = "Parse, validate and index AI glossary term files"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug output to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args)]
struct DataDir {
    /// Directory containing YAML term files
    #[arg(long, default_value = "data/terms")]
    data_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a single YAML document to JSON
    Parse {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Validate glossary term files
    Validate {
        #[command(flatten)]
        data: DataDir,
        /// JSON schema whose `required` array lists the mandatory fields
        #[arg(long)]
        schema: Option<PathBuf>,
        /// YAML rules file overriding the built-in validation policy
        #[arg(long)]
        rules: Option<PathBuf>,
    },
    /// Build JSON outputs from glossary data
    Index {
        #[command(flatten)]
        data: DataDir,
        /// Directory for generated JSON files
        #[arg(long, default_value = "build")]
        output_dir: PathBuf,
        /// Also copy the search index here as glossary-search.json
        #[arg(long)]
        site_assets_dir: Option<PathBuf>,
    },
    /// Create a new glossary term scaffold
    New {
        /// Canonical term name (e.g., 'Assurance case')
        #[arg(long)]
        term: String,
        #[command(flatten)]
        data: DataDir,
        /// Allow overwriting an existing file if it already exists
        #[arg(long)]
        overwrite: bool,
    },
    /// List terms matching the given filters as a JSON array
    List {
        #[command(flatten)]
        data: DataDir,
        /// Case-insensitive text search over term, aliases and short definition
        #[arg(long)]
        q: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        alias: Option<String>,
        #[arg(long)]
        role: Option<String>,
    },
    /// Print one term by slug
    Show {
        slug: String,
        #[command(flatten)]
        data: DataDir,
    },
    /// Print corpus metadata
    Info {
        #[command(flatten)]
        data: DataDir,
    },
    /// Suggest related terms by TF-IDF similarity
    Related {
        #[command(flatten)]
        data: DataDir,
        /// Directory for related.json
        #[arg(long, default_value = "build")]
        output_dir: PathBuf,
        /// Directory for the per-term Markdown includes
        #[arg(long, default_value = "site/docs/includes/related")]
        includes_dir: PathBuf,
        /// Suggestions kept per term
        #[arg(long, default_value_t = glossary_core::related::DEFAULT_TOP_K)]
        top_k: usize,
        /// Base URL the term links point under
        #[arg(long, default_value = DEFAULT_SITE_URL)]
        site_url: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Parse { input, output } => {
            let text = read_input(input.as_deref())?;
            let value = glossary_core::parse(&text).context("Failed to parse YAML")?;
            let pretty = serde_json::to_string_pretty(&value)?;
            write_output(output.as_deref(), &format!("{pretty}\n"))?;
        }
        Commands::Validate {
            data,
            schema,
            rules,
        } => {
            let rules = load_rules(rules.as_deref(), schema.as_deref())?;
            let report = validate_dir(&data.data_dir, &rules)
                .with_context(|| format!("Failed to list {}", data.data_dir.display()))?;
            if report.files_checked == 0 {
                bail!("No term files found in {}", data.data_dir.display());
            }
            if !report.is_valid() {
                eprintln!("Validation failed:");
                for violation in &report.violations {
                    eprintln!(" - {violation}");
                }
                process::exit(1);
            }
            println!("Validated {} term(s) successfully.", report.files_checked);
        }
        Commands::Index {
            data,
            output_dir,
            site_assets_dir,
        } => {
            let corpus = load_corpus(&data.data_dir)?;
            let glossary = glossary_payload(&corpus).context("Failed to build glossary payload")?;
            let search = serde_json::to_value(build_search_index(&corpus))?;

            let glossary_path = output_dir.join("glossary.json");
            write_json(&glossary_path, &glossary)?;
            write_json(&output_dir.join("search-index.json"), &search)?;
            if let Some(assets) = site_assets_dir {
                write_json(&assets.join(SEARCH_ASSET_NAME), &search)?;
            }

            println!(
                "Wrote {} term(s) to {} and search index.",
                corpus.len(),
                glossary_path.display()
            );
        }
        Commands::New {
            term,
            data,
            overwrite,
        } => {
            let term = term.trim();
            if term.is_empty() {
                bail!("--term cannot be blank");
            }
            let today = chrono::Local::now().date_naive();
            let destination = match scaffold(&data.data_dir, term, overwrite, today) {
                Ok(path) => path,
                Err(err @ GlossaryError::AlreadyExists { .. }) => {
                    bail!("{err}. Use --overwrite to replace it.")
                }
                Err(err) => return Err(anyhow::Error::new(err).context("Failed to write scaffold")),
            };
            println!("Created scaffold at {}", destination.display());
        }
        Commands::List {
            data,
            q,
            category,
            status,
            alias,
            role,
        } => {
            let corpus = load_corpus(&data.data_dir)?;
            let query = TermQuery {
                q,
                category,
                status,
                alias,
                role,
            };
            let terms = corpus
                .search(&query)
                .into_iter()
                .map(|document| document.to_json())
                .collect::<glossary_core::error::Result<Vec<_>>>()?;
            print_json(&JsonValue::Array(terms))?;
        }
        Commands::Show { slug, data } => {
            let corpus = load_corpus(&data.data_dir)?;
            let Some(document) = corpus.get(&slug) else {
                bail!("Term not found: {slug}");
            };
            print_json(&document.to_json()?)?;
        }
        Commands::Info { data } => {
            let corpus = load_corpus(&data.data_dir)?;
            print_json(&serde_json::to_value(corpus.summary())?)?;
        }
        Commands::Related {
            data,
            output_dir,
            includes_dir,
            top_k,
            site_url,
        } => {
            let corpus = load_corpus(&data.data_dir)?;
            let related = related_terms(&corpus, top_k);

            let json_path = output_dir.join("related.json");
            write_json(&json_path, &serde_json::to_value(&related)?)?;

            fs::create_dir_all(&includes_dir).with_context(|| {
                format!("Failed to create directory: {}", includes_dir.display())
            })?;
            for (slug, list) in related.iter() {
                let path = includes_dir.join(format!("{slug}.md"));
                fs::write(&path, related_markdown(list, &site_url))
                    .with_context(|| format!("Failed to write file: {}", path.display()))?;
            }

            println!(
                "Wrote related data: {} and {}/*.md",
                json_path.display(),
                includes_dir.display()
            );
        }
    }

    Ok(())
}

/// Install a stderr `fmt` subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn load_rules(rules: Option<&Path>, schema: Option<&Path>) -> Result<ValidationRules> {
    let mut loaded = match rules {
        Some(path) => ValidationRules::from_path(path)
            .with_context(|| format!("Failed to load rules from {}", path.display()))?,
        None => ValidationRules::default(),
    };
    if let Some(path) = schema {
        loaded = loaded
            .with_schema(path)
            .with_context(|| format!("Failed to load schema from {}", path.display()))?;
    }
    debug!(required = loaded.required_fields.len(), "validation rules ready");
    Ok(loaded)
}

/// Load the corpus, failing on the first unreadable file or an empty directory.
fn load_corpus(dir: &Path) -> Result<Corpus> {
    let report = Corpus::load_dir(dir)
        .with_context(|| format!("Failed to list {}", dir.display()))?;
    if let Some(failure) = report.failures.into_iter().next() {
        return Err(anyhow::Error::new(failure).context("Failed to load term file"));
    }
    if report.files_read == 0 {
        bail!("No term files found in {}", dir.display());
    }
    Ok(report.corpus)
}

fn print_json(value: &JsonValue) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn write_json(path: &Path, value: &JsonValue) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let pretty = serde_json::to_string_pretty(value)?;
    fs::write(path, pretty).with_context(|| format!("Failed to write file: {}", path.display()))
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
