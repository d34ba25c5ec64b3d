use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use search_core::duplicates::remove_duplicates;
use search_core::paginator::paginate;
use search_core::process_queries::{process_queries, process_queries_joined};
use search_core::request_queue::RequestQueue;
use search_core::{DocId, Document, DocumentStatus, ExecutionPolicy, SearchConfig, SearchServer};
use tracing_subscriber::{fmt, EnvFilter};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

mod input;

#[derive(Parser)]
#[command(name = "search-cli")]
#[command(about = "Query an in-memory TF-IDF search engine built from JSON documents", long_about = None)]
struct Cli {
    #[command(flatten)]
    engine: EngineArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct EngineArgs {
    /// Input path (JSON/JSONL file or a directory of them)
    #[arg(long, global = true, default_value = ".")]
    input: PathBuf,
    /// Space-separated stop words
    #[arg(long, global = true, env = "SEARCH_STOP_WORDS", default_value = "")]
    stop_words: String,
    /// JSON file with engine settings
    #[arg(long, global = true, env = "SEARCH_CONFIG")]
    config: Option<PathBuf>,
    /// Use the parallel execution policy
    #[arg(long, global = true, default_value_t = false)]
    parallel: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank documents for one or more queries
    Search {
        #[arg(required = true)]
        queries: Vec<String>,
        /// Only documents with this status
        #[arg(long)]
        status: Option<DocumentStatus>,
        /// Print results in pages of this size
        #[arg(long)]
        page_size: Option<usize>,
        /// Emit JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show which query words a document contains
    Match {
        #[arg(long)]
        query: String,
        #[arg(long)]
        id: DocId,
    },
    /// Remove documents whose word sets repeat an earlier document
    Dedup,
    /// Run one query per line of a file
    Batch {
        queries: PathBuf,
        /// Print a single flattened list
        #[arg(long, default_value_t = false)]
        joined: bool,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let started = Instant::now();
    let mut server = build_server(&cli.engine)?;
    let policy = if cli.engine.parallel { ExecutionPolicy::Parallel } else { ExecutionPolicy::Sequential };
    tracing::info!(documents = server.document_count(), took_s = started.elapsed().as_secs_f64(), "engine ready");

    match cli.command {
        Commands::Search { queries, status, page_size, json } => {
            let mut telemetry = RequestQueue::new(&server);
            for query in &queries {
                search(&mut telemetry, policy, query, status, page_size, json)?;
            }
            println!("{} of {} requests found nothing", telemetry.no_result_requests(), queries.len());
            Ok(())
        }
        Commands::Match { query, id } => {
            let matched = server.match_document_with_policy(policy, &query, id)?;
            println!("{{ document_id = {id}, status = {}, words = {:?} }}", matched.status, matched.words);
            Ok(())
        }
        Commands::Dedup => {
            let removed = remove_duplicates(&mut server);
            println!("removed {removed:?}, {} documents left", server.document_count());
            Ok(())
        }
        Commands::Batch { queries, joined } => batch(&server, &queries, joined),
    }
}

fn build_server(args: &EngineArgs) -> Result<SearchServer> {
    let config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
            SearchConfig::from_json_str(&raw).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => SearchConfig::default(),
    };
    let mut server = SearchServer::with_config(args.stop_words.split_whitespace(), config)?;
    input::load(&mut server, &args.input)?;
    Ok(server)
}

fn search(
    telemetry: &mut RequestQueue<'_>,
    policy: ExecutionPolicy,
    query: &str,
    status: Option<DocumentStatus>,
    page_size: Option<usize>,
    json: bool,
) -> Result<()> {
    let started = Instant::now();
    let docs = match status {
        Some(status) => telemetry.add_find_request_by_status_with_policy(policy, query, status)?,
        None => telemetry.add_find_request_with_policy(policy, query)?,
    };
    tracing::info!(query, hits = docs.len(), %policy, took_s = started.elapsed().as_secs_f64(), "search complete");

    if json {
        println!("{}", serde_json::to_string_pretty(&docs)?);
        return Ok(());
    }
    match page_size {
        Some(size) => {
            for (n, page) in paginate(&docs, size)?.enumerate() {
                println!("Page {}: {page}", n + 1);
            }
        }
        None => print_documents(&docs),
    }
    Ok(())
}

fn batch(server: &SearchServer, path: &Path, joined: bool) -> Result<()> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading queries {}", path.display()))?;
    let queries: Vec<&str> = raw.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let started = Instant::now();

    if joined {
        print_documents(&process_queries_joined(server, &queries)?);
    } else {
        let results = process_queries(server, &queries)?;
        let mut telemetry = RequestQueue::new(server);
        for (query, docs) in queries.iter().zip(&results) {
            telemetry.record(docs.len());
            println!("{} documents for '{query}'", docs.len());
            print_documents(docs);
        }
        tracing::info!(no_result_requests = telemetry.no_result_requests(), "batch telemetry");
    }
    tracing::info!(queries = queries.len(), took_s = started.elapsed().as_secs_f64(), "batch complete");
    Ok(())
}

fn print_documents(docs: &[Document]) {
    for doc in docs {
        println!("{doc}");
    }
}
