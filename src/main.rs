use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::warn;

use laborlex::db::{ListFilter, Store};
use laborlex::{pdf, pipeline, Classifier, Jurisdiction, ParseReport, PipelineError};

const DEFAULT_DB_PATH: &str = "data/laborlex.sqlite";

#[derive(Parser)]
#[command(name = "laborlex", about = "Labor-law PDF ingestion into SQLite")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum JurisdictionArg {
    /// Philippine Labor Code articles
    Ph,
    /// Hong Kong Employment Ordinance sections
    Hk,
}

impl From<JurisdictionArg> for Jurisdiction {
    fn from(arg: JurisdictionArg) -> Self {
        match arg {
            JurisdictionArg::Ph => Jurisdiction::Philippine,
            JurisdictionArg::Hk => Jurisdiction::HongKong,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Extract, classify and store provisions from PDF files
    Ingest {
        /// PDF files to ingest
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Database path (default: LABORLEX_DB or data/laborlex.sqlite)
        #[arg(long)]
        db: Option<PathBuf>,
        /// Force a jurisdiction and skip the classifier call
        #[arg(short, long, value_enum)]
        jurisdiction: Option<JurisdictionArg>,
    },
    /// Parse one PDF and print what would be stored, without storing it
    Parse {
        /// PDF file to parse
        file: PathBuf,
        /// Force a jurisdiction and skip the classifier call
        #[arg(short, long, value_enum)]
        jurisdiction: Option<JurisdictionArg>,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show stored provision counts per jurisdiction and category
    Stats {
        /// Database path (default: LABORLEX_DB or data/laborlex.sqlite)
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// List stored provisions
    List {
        /// Database path (default: LABORLEX_DB or data/laborlex.sqlite)
        #[arg(long)]
        db: Option<PathBuf>,
        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,
        /// Filter by jurisdiction
        #[arg(short, long, value_enum)]
        jurisdiction: Option<JurisdictionArg>,
        /// Show only repealed provisions
        #[arg(long)]
        repealed: bool,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// Verify credentials and database access
    Check {
        /// Database path (default: LABORLEX_DB or data/laborlex.sqlite)
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Ingest { files, db, jurisdiction } => {
            let store = open_store(db.as_deref())?;
            let mode = ingest_mode(jurisdiction.map(Into::into));

            println!("Ingesting {} files...", files.len());
            let mut docs = Vec::with_capacity(files.len());
            let mut skipped = 0usize;
            for path in &files {
                match prepare_one(path, &mode).await {
                    Ok(doc) => docs.push(doc),
                    Err(e) => {
                        skipped += 1;
                        println!("  {}: skipped ({:#})", display_name(path), e);
                    }
                }
            }
            if docs.is_empty() {
                println!("No documents to store ({} skipped).", skipped);
                return Ok(());
            }

            let reports = parse_documents(&docs);
            let saved = persist_reports(&store, &reports)?;

            for r in &reports {
                println!(
                    "  {}: {} provisions ({} dropped) [{}]",
                    r.source_file,
                    r.provisions.len(),
                    r.dropped.len(),
                    r.jurisdiction
                );
            }
            println!(
                "Saved {} provisions from {} files ({} skipped).",
                saved,
                reports.len(),
                skipped
            );
            Ok(())
        }
        Commands::Parse { file, jurisdiction, json } => {
            let mode = ingest_mode(jurisdiction.map(Into::into));
            let doc = prepare_one(&file, &mode).await?;
            let report = pipeline::process_text(&doc.text, &doc.name, doc.jurisdiction);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
            Ok(())
        }
        Commands::Stats { db } => {
            let store = open_store(db.as_deref())?;
            let counts = store.category_counts()?;
            if counts.is_empty() {
                println!("Store is empty. Run 'ingest' first.");
                return Ok(());
            }
            println!("{:<4} | {:<10} | {:>6} | {:>8}", "Jur", "Category", "Total", "Repealed");
            println!("{}", "-".repeat(38));
            for c in &counts {
                println!(
                    "{:<4} | {:<10} | {:>6} | {:>8}",
                    c.jurisdiction, c.category, c.total, c.repealed
                );
            }
            println!("\n{} provisions total", store.total()?);
            Ok(())
        }
        Commands::List { db, category, jurisdiction, repealed, limit } => {
            let store = open_store(db.as_deref())?;
            let rows = store.list(&ListFilter {
                category: category.as_deref(),
                jurisdiction: jurisdiction.map(Into::into),
                repealed: repealed.then_some(true),
                limit,
            })?;
            if rows.is_empty() {
                println!("No provisions found.");
                return Ok(());
            }

            println!(
                "{:<4} | {:<10} | {:<7} | {:<9} | {:<4} | {:<44}",
                "Jur", "Id", "Old no.", "Category", "Rep", "Title"
            );
            println!("{}", "-".repeat(92));
            for r in &rows {
                let old_no = r.superseded.map(|n| n.to_string()).unwrap_or_else(|| "-".into());
                println!(
                    "{:<4} | {:<10} | {:<7} | {:<9} | {:<4} | {:<44}",
                    r.jurisdiction,
                    truncate(&r.identifier, 10),
                    old_no,
                    r.category,
                    if r.repealed { "yes" } else { "" },
                    truncate(&r.title, 44),
                );
            }
            println!("\n{} provisions", rows.len());
            Ok(())
        }
        Commands::Check { db } => {
            let key_ok = std::env::var("OPENROUTER_API_KEY")
                .map(|k| !k.is_empty())
                .unwrap_or(false);
            println!(
                "OPENROUTER_API_KEY: {}",
                if key_ok { "set" } else { "missing (classification will fall back to PH)" }
            );
            let path = resolve_db_path(db.as_deref());
            match open_store(db.as_deref()) {
                Ok(store) => println!("database {}: ok ({} provisions)", path.display(), store.total()?),
                Err(e) => println!("database {}: {:#}", path.display(), e),
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

/// How the ingest path decides a document's jurisdiction.
enum Mode {
    Forced(Jurisdiction),
    Classify(Classifier),
}

fn ingest_mode(forced: Option<Jurisdiction>) -> Mode {
    match forced {
        Some(jurisdiction) => Mode::Forced(jurisdiction),
        None => Mode::Classify(classifier_from_env()),
    }
}

fn classifier_from_env() -> Classifier {
    match std::env::var("OPENROUTER_API_KEY") {
        Ok(key) if !key.is_empty() => Classifier::new(key),
        _ => {
            warn!("OPENROUTER_API_KEY is not set; classification will fall back to PH");
            Classifier::new("")
        }
    }
}

struct PreparedDoc {
    name: String,
    text: String,
    jurisdiction: Jurisdiction,
}

/// Read one PDF, extract its text and settle its jurisdiction.
async fn prepare_one(path: &Path, mode: &Mode) -> anyhow::Result<PreparedDoc> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let text = pdf::extract_text(&bytes)?;
    let jurisdiction = match mode {
        Mode::Forced(jurisdiction) => *jurisdiction,
        Mode::Classify(classifier) => classifier
            .classify(&text)
            .await
            .jurisdiction()
            .ok_or(PipelineError::ContentRejected)?,
    };
    Ok(PreparedDoc {
        name: display_name(path),
        text,
        jurisdiction,
    })
}

fn parse_documents(docs: &[PreparedDoc]) -> Vec<ParseReport> {
    use rayon::prelude::*;

    docs.par_iter()
        .map(|doc| pipeline::process_text(&doc.text, &doc.name, doc.jurisdiction))
        .collect()
}

fn persist_reports(store: &Store, reports: &[ParseReport]) -> anyhow::Result<usize> {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(reports.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let mut saved = 0;
    for report in reports {
        saved += store.save(&report.provisions)?;
        pb.inc(1);
    }
    pb.finish_and_clear();
    Ok(saved)
}

fn print_report(report: &ParseReport) {
    println!(
        "{}: {} provisions ({} dropped) [{}]",
        report.source_file,
        report.provisions.len(),
        report.dropped.len(),
        report.jurisdiction
    );
    if report.provisions.is_empty() {
        println!(
            "No provisions extracted. The document may not match the {} heading format.",
            report.jurisdiction
        );
        return;
    }

    println!("{:>4} | {:<10} | {:<9} | {:<4} | {:<50}", "#", "Id", "Category", "Rep", "Title");
    println!("{}", "-".repeat(88));
    for (i, p) in report.provisions.iter().enumerate() {
        println!(
            "{:>4} | {:<10} | {:<9} | {:<4} | {:<50}",
            i + 1,
            truncate(&p.identifier, 10),
            p.category,
            if p.repealed { "yes" } else { "" },
            truncate(&p.title, 50),
        );
    }
    for d in &report.dropped {
        println!("  dropped {:?}: {}", d.identifier, d.reason);
    }
}

fn resolve_db_path(flag: Option<&Path>) -> PathBuf {
    if let Some(path) = flag {
        return path.to_path_buf();
    }
    match std::env::var("LABORLEX_DB") {
        Ok(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_DB_PATH),
    }
}

fn open_store(flag: Option<&Path>) -> anyhow::Result<Store> {
    let path = resolve_db_path(flag);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let store = Store::open(&path).with_context(|| format!("opening {}", path.display()))?;
    Ok(store)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
