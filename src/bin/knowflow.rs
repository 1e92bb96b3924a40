//! KnowFlow CLI: ingest documents, inspect their graphs, search sentences.
//!
//! Usage:
//!   knowflow ingest [FILES]... [--url URL]... [--format json|txt]
//!   knowflow search QUERY [--file FILE]... [--url URL]... [--json]
//!   knowflow config
//!
//! Papers live in memory for the duration of one command.

use clap::{Parser, Subcommand};
use knowflow::{Config, ExportFormat, KnowflowApi, PaperId, PaperStatus};
use std::path::PathBuf;
use tracing::{debug, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "knowflow",
    version,
    about = "Turn documents into knowledge graphs and search them"
)]
struct Cli {
    /// Path to a YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log level when RUST_LOG is unset (overrides the config file)
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest files and URLs, then report each paper's status
    Ingest {
        /// Local files to upload
        files: Vec<PathBuf>,
        /// Remote references to ingest
        #[arg(long = "url")]
        urls: Vec<String>,
        /// Also print an export of every ready paper (json or txt)
        #[arg(long, value_parser = parse_format)]
        format: Option<ExportFormat>,
    },
    /// Ingest files and URLs, then search their sentences
    Search {
        /// Free-text query
        query: String,
        /// Local files to upload
        #[arg(long = "file")]
        files: Vec<PathBuf>,
        /// Remote references to ingest
        #[arg(long = "url")]
        urls: Vec<String>,
        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration
    Config,
}

fn parse_format(s: &str) -> Result<ExportFormat, String> {
    s.parse().map_err(|e: knowflow::ApiError| e.to_string())
}

fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}

/// Upload every file and URL, returning the ids that were accepted
fn submit(api: &KnowflowApi, files: &[PathBuf], urls: &[String]) -> Result<Vec<PaperId>, String> {
    let mut ids = Vec::with_capacity(files.len() + urls.len());
    for path in files {
        let content = std::fs::read(path)
            .map_err(|e| format!("cannot read '{}': {}", path.display(), e))?;
        let filename = path.file_name().map(|n| n.to_string_lossy().to_string());
        ids.push(
            api.ingest_upload(filename.as_deref(), &content)
                .map_err(|e| e.to_string())?,
        );
    }
    for url in urls {
        ids.push(api.ingest_reference(url).map_err(|e| e.to_string())?);
    }
    debug!(papers = ids.len(), "submitted");
    Ok(ids)
}

/// Wait for every paper to settle; returns how many ended in ERROR
async fn settle(api: &KnowflowApi, config: &Config, ids: &[PaperId]) -> Result<usize, String> {
    let mut failed = 0;
    for id in ids {
        let view = api
            .wait_until_settled(id, config.poll_interval(), config.ingest_timeout())
            .await
            .map_err(|e| e.to_string())?;
        if view.status == PaperStatus::Error {
            warn!(paper_id = %id, "paper failed");
            failed += 1;
        }
    }
    Ok(failed)
}

async fn cmd_ingest(
    api: &KnowflowApi,
    config: &Config,
    files: &[PathBuf],
    urls: &[String],
    format: Option<ExportFormat>,
) -> i32 {
    if files.is_empty() && urls.is_empty() {
        eprintln!("Error: nothing to ingest (give files or --url)");
        return 1;
    }
    let ids = match submit(api, files, urls) {
        Ok(ids) => ids,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let failed = match settle(api, config, &ids).await {
        Ok(n) => n,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    println!("{:<36}  {:<10}  {}", "PAPER", "STATUS", "TITLE");
    println!("{}", "-".repeat(72));
    for id in &ids {
        match api.status(id) {
            Ok(view) => {
                println!("{:<36}  {:<10}  {}", id, view.status, view.title);
                if let Some(message) = view.error_message {
                    println!("{:<36}  {:<10}  {}", "", "", message);
                }
            }
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    if let Some(format) = format {
        for id in &ids {
            match api.export(id, format) {
                Ok(export) => {
                    println!();
                    println!("# {} ({})", id, format);
                    println!("{}", export.body());
                }
                Err(e) => eprintln!("Skipping {}: {}", id, e),
            }
        }
    }

    if failed > 0 {
        2
    } else {
        0
    }
}

async fn cmd_search(
    api: &KnowflowApi,
    config: &Config,
    query: &str,
    files: &[PathBuf],
    urls: &[String],
    json: bool,
) -> i32 {
    let ids = match submit(api, files, urls) {
        Ok(ids) => ids,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    if let Err(e) = settle(api, config, &ids).await {
        eprintln!("Error: {}", e);
        return 1;
    }

    let response = api.search(query);
    if json {
        match serde_json::to_string_pretty(&response) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        }
        return 0;
    }

    if response.results.is_empty() {
        println!("No results.");
        return 0;
    }
    println!("{:>6}  {:<12}  {}", "SCORE", "SECTION", "TEXT");
    println!("{}", "-".repeat(72));
    for hit in &response.results {
        println!("{:>6.3}  {:<12}  {}", hit.score, hit.section, hit.text);
    }
    0
}

fn cmd_config(config: &Config) -> i32 {
    match config.to_yaml() {
        Ok(yaml) => {
            print!("{}", yaml);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    init_logging(&config.log_level);

    let api = KnowflowApi::in_memory();
    let code = match cli.command {
        Commands::Ingest { files, urls, format } => {
            cmd_ingest(&api, &config, &files, &urls, format).await
        }
        Commands::Search {
            query,
            files,
            urls,
            json,
        } => cmd_search(&api, &config, &query, &files, &urls, json).await,
        Commands::Config => cmd_config(&config),
    };
    std::process::exit(code);
}
