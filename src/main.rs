use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use product_normalizer::db;
use product_normalizer::normalizer::{process_content, NormalizeOptions, DEFAULT_MAX_DESCRIPTION_WORDS};

#[derive(Parser)]
#[command(name = "product_normalizer", about = "Normalize scraped product descriptions into structured content")]
struct Cli {
    /// SQLite database path
    #[arg(long, global = true, default_value = db::DB_PATH)]
    db: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct NormalizeArgs {
    /// Emit flagged placeholder reviews when none can be parsed
    #[arg(long)]
    synthetic_reviews: bool,
    /// Word cap for the clean description
    #[arg(long, default_value_t = DEFAULT_MAX_DESCRIPTION_WORDS)]
    max_words: usize,
    /// Reference time for placeholder review dates (RFC 3339, default: now)
    #[arg(long)]
    now: Option<String>,
}

impl NormalizeArgs {
    fn options(&self) -> anyhow::Result<NormalizeOptions> {
        let now = match &self.now {
            Some(s) => DateTime::parse_from_rfc3339(s)
                .with_context(|| format!("invalid --now timestamp '{}'", s))?
                .with_timezone(&Utc),
            None => Utc::now(),
        };
        Ok(NormalizeOptions {
            max_description_words: self.max_words,
            synthetic_reviews: self.synthetic_reviews,
            now,
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize one listing file (or stdin with "-") and print JSON
    Normalize {
        input: PathBuf,
        #[command(flatten)]
        args: NormalizeArgs,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Import *.txt / *.html listings from a directory
    Import { dir: PathBuf },
    /// Normalize pending imported listings
    Process {
        /// Max listings to process (default: all pending)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        #[command(flatten)]
        args: NormalizeArgs,
    },
    /// Print stored normalized content for a listing
    Show { slug: String },
    /// Show import/processing statistics
    Stats,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    match cli.command {
        Commands::Normalize { input, args, pretty } => {
            let raw = read_input(&input)?;
            let content = process_content(&raw, &args.options()?);
            let json = if pretty {
                serde_json::to_string_pretty(&content)?
            } else {
                serde_json::to_string(&content)?
            };
            println!("{}", json);
            return Ok(());
        }
        Commands::Import { dir } => {
            let conn = db::connect(&cli.db)?;
            db::init_schema(&conn)?;
            let rows = read_listing_dir(&dir)?;
            let inserted = db::insert_raw(&conn, &rows)?;
            println!("Imported {} new listings ({} files found)", inserted, rows.len());
        }
        Commands::Process { limit, args } => {
            let conn = db::connect(&cli.db)?;
            db::init_schema(&conn)?;
            let pending = db::fetch_unprocessed(&conn, limit)?;
            if pending.is_empty() {
                println!("No pending listings. Run 'import' first.");
                return Ok(());
            }
            println!("Processing {} listings...", pending.len());
            let counts = process_listings(&conn, &pending, &args.options()?)?;
            counts.print();
        }
        Commands::Show { slug } => {
            let conn = db::connect(&cli.db)?;
            db::init_schema(&conn)?;
            match db::fetch_processed(&conn, &slug)? {
                Some(content) => println!("{}", serde_json::to_string_pretty(&content)?),
                None => bail!("no processed listing for '{}'", slug),
            }
        }
        Commands::Stats => {
            let conn = db::connect(&cli.db)?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Imported:      {}", s.imported);
            println!("Processed:     {}", s.processed);
            println!("Pending:       {}", s.pending);
            println!("With reviews:  {}", s.with_reviews);
            println!("Placeholder:   {}", s.synthetic);
            println!("With shipping: {}", s.with_shipping);
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }
    Ok(())
}

fn read_input(input: &Path) -> anyhow::Result<String> {
    if input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))
    }
}

fn read_listing_dir(dir: &Path) -> anyhow::Result<Vec<db::RawRow>> {
    let mut rows = Vec::new();
    let entries = std::fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        let is_listing = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("txt" | "html" | "htm")
        );
        if !is_listing {
            continue;
        }
        let Some(slug) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
            continue;
        };
        match std::fs::read_to_string(&path) {
            Ok(raw) => rows.push(db::RawRow {
                slug,
                source: Some(path.display().to_string()),
                raw,
            }),
            Err(e) => warn!("Skipping {}: {}", path.display(), e),
        }
    }
    rows.sort_by(|a, b| a.slug.cmp(&b.slug));
    info!("Found {} listing files in {}", rows.len(), dir.display());
    Ok(rows)
}

struct ProcessCounts {
    listings: usize,
    with_reviews: usize,
    synthetic: usize,
    with_shipping: usize,
}

impl ProcessCounts {
    fn print(&self) {
        println!(
            "Saved {} listings ({} with reviews, {} with placeholder reviews, {} with shipping info).",
            self.listings, self.with_reviews, self.synthetic, self.with_shipping,
        );
    }
}

fn process_listings(
    conn: &rusqlite::Connection,
    pending: &[db::RawProduct],
    options: &NormalizeOptions,
) -> anyhow::Result<ProcessCounts> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(pending.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let mut counts = ProcessCounts {
        listings: 0,
        with_reviews: 0,
        synthetic: 0,
        with_shipping: 0,
    };

    for chunk in pending.chunks(500) {
        let rows: Vec<db::ProcessedRow> = chunk
            .par_iter()
            .map(|p| db::ProcessedRow {
                raw_id: p.id,
                slug: p.slug.clone(),
                content: process_content(&p.raw, options),
            })
            .collect();

        for r in &rows {
            let reviews = r.content.extracted_reviews.as_deref().unwrap_or_default();
            counts.with_reviews += usize::from(!reviews.is_empty());
            counts.synthetic += usize::from(reviews.iter().any(|x| x.synthetic));
            counts.with_shipping += usize::from(r.content.shipping_info.is_some());
        }
        counts.listings += rows.len();

        db::save_processed(conn, &rows)?;
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    info!("Processed {} listings", counts.listings);
    Ok(counts)
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
