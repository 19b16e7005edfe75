//! # PdfKb — PDF URL Knowledge Base
//!
//! Ingests the configured PDF URLs, then answers queries.
//!
//! Usage:
//!   pdfkb                                   # load config URLs, read queries from stdin
//!   pdfkb --url https://host/menu.pdf       # ingest a specific URL instead
//!   pdfkb --query "list all the dishes"     # answer and exit
//!   pdfkb --recreate --json --query curry   # fresh load, JSON output

use anyhow::Result;
use clap::Parser;
use pdfkb_core::PdfKbConfig;
use pdfkb_knowledge::KnowledgeBase;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pdfkb", version, about = "📚 PdfKb — search text extracted from PDF URLs")]
struct Cli {
    /// Config file (default: ~/.pdfkb/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// PDF URL to ingest (repeatable, overrides config)
    #[arg(short, long = "url")]
    urls: Vec<String>,

    /// Clear the knowledge base before loading
    #[arg(long)]
    recreate: bool,

    /// Upsert into the vector index
    #[arg(long)]
    upsert: bool,

    /// Query to answer (repeatable); omit for interactive mode
    #[arg(short, long = "query")]
    queries: Vec<String>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Skip writing debug text files
    #[arg(long)]
    no_debug: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "pdfkb=debug,pdfkb_knowledge=debug"
    } else {
        "pdfkb=info,pdfkb_knowledge=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => PdfKbConfig::load_from(path)?,
        None => PdfKbConfig::load()?,
    };
    if !cli.urls.is_empty() {
        config.knowledge.urls = cli.urls.clone();
    }
    if cli.no_debug {
        config.knowledge.debug_enabled = false;
    }

    let mut kb = KnowledgeBase::from_config(&config)?;
    let report = kb.load(cli.recreate, cli.upsert).await;
    if report.skipped_count() > 0 {
        tracing::warn!(
            "⚠️ {} of {} URL(s) skipped",
            report.skipped_count(),
            kb.urls().len()
        );
    }

    if !cli.queries.is_empty() {
        for query in &cli.queries {
            print_results(&kb, query, cli.json)?;
        }
        return Ok(());
    }

    // Interactive mode
    println!("📚 PdfKb v{}", env!("CARGO_PKG_VERSION"));
    println!(
        "   📄 Records:  {} ({} chars)",
        kb.store().len(),
        kb.store().total_chars()
    );
    println!("   🍜 Entities: {}", kb.entities().len());
    println!("   Type a query, or 'exit' to quit.\n");

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let query = line?;
        let trimmed = query.trim();
        if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
            break;
        }
        if trimmed.is_empty() {
            continue;
        }
        print_results(&kb, &query, cli.json)?;
    }

    Ok(())
}

fn print_results(kb: &KnowledgeBase, query: &str, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&kb.query(query))?);
    } else {
        for line in kb.search(query) {
            println!("{line}");
        }
        println!();
    }
    Ok(())
}
