//! Lapkeu CLI binary.
//!
//! Provides the command-line interface for downloading IDX financial
//! statement workbooks and consolidating them into ratio-analysis
//! workbooks.

use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use chrono::Datelike;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use lapkeu::{CancelToken, EntityCode, IdxDownloader, Pipeline, Quarter, output_path};

#[derive(Parser)]
#[command(name = "lapkeu")]
#[command(about = "IDX financial statement consolidation toolkit", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Consolidate a directory of downloaded workbooks into one output workbook
    Combine {
        /// Directory of downloaded XBRL workbooks
        source_dir: PathBuf,

        /// Directory the consolidated workbook is written to
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// Report year, used for the output file name (defaults to the
        /// current year)
        #[arg(long)]
        year: Option<u16>,

        /// Report quarter (Q1-Q4)
        #[arg(long, default_value = "Q1")]
        quarter: String,

        /// Spill reshaped fragments to this staging directory
        #[arg(long)]
        staging: Option<PathBuf>,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Download quarterly workbooks from the IDX endpoint
    Download {
        /// Entity codes to download (e.g. BBCA TLKM)
        #[arg(required = true)]
        codes: Vec<String>,

        /// Report year (defaults to the current year)
        #[arg(long)]
        year: Option<u16>,

        /// Report quarter (Q1-Q4)
        #[arg(long, default_value = "Q1")]
        quarter: String,

        /// Directory downloads are written into
        #[arg(long, default_value = "downloads")]
        dest_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Combine {
            source_dir,
            output_dir,
            year,
            quarter,
            staging,
            json,
        } => combine(source_dir, output_dir, year, &quarter, staging, json).await,
        Commands::Download {
            codes,
            year,
            quarter,
            dest_dir,
        } => download(&codes, year, &quarter, &dest_dir).await,
    }
}

async fn combine(
    source_dir: PathBuf,
    output_dir: PathBuf,
    year: Option<u16>,
    quarter: &str,
    staging: Option<PathBuf>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let quarter: Quarter = quarter.parse()?;
    let year = default_year(year);
    let out = output_path(&output_dir, year, &quarter.to_string());

    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    bar.enable_steady_tick(Duration::from_millis(120));

    let progress_bar = bar.clone();
    let mut pipeline = Pipeline::new(&source_dir, &out)
        .with_cancel_token(cancel_on_ctrl_c())
        .with_progress(move |report| progress_bar.set_message(report.to_string()));
    if let Some(staging) = staging {
        pipeline = pipeline.with_staging_dir(staging);
    }

    let summary = pipeline.run().await?;
    bar.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "Workbooks: {} classified, {} skipped",
        summary.workbooks, summary.workbooks_skipped
    );
    for statement in &summary.statements {
        println!(
            "  {}: {} fragments, {} skipped",
            statement.kind, statement.fragments, statement.skipped
        );
    }
    println!(
        "Quotes: {} fetched, {} failed",
        summary.quotes, summary.quotes_failed
    );
    println!("Output: {}", summary.output_path.display());
    if summary.is_partial() {
        eprintln!("Some items were skipped; see the log for details.");
    }
    Ok(())
}

async fn download(
    codes: &[String],
    year: Option<u16>,
    quarter: &str,
    dest_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let quarter: Quarter = quarter.parse()?;
    let year = default_year(year);
    let codes: Vec<EntityCode> = codes
        .iter()
        .map(|code| code.parse())
        .collect::<lapkeu::Result<_>>()?;

    let cancel = cancel_on_ctrl_c();
    let downloader = IdxDownloader::new();
    if let Err(e) = downloader.warm_up().await {
        eprintln!("Warning: portal warm-up failed: {e}");
    }

    let target = dest_dir.join(format!("XBRL_{year}_{quarter}"));
    let bar = ProgressBar::new(codes.len() as u64);
    bar.set_style(ProgressStyle::with_template(
        "{bar:40.cyan/blue} {pos}/{len} {msg}",
    )?);

    let mut failed = 0;
    for code in &codes {
        cancel.checkpoint()?;
        bar.set_message(code.to_string());
        if let Err(e) = downloader.download(code, year, quarter, &target).await {
            eprintln!("{code}: {e}");
            failed += 1;
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    println!(
        "Downloaded {} of {} workbooks into {}",
        codes.len() - failed,
        codes.len(),
        target.display()
    );
    Ok(())
}

fn default_year(year: Option<u16>) -> u16 {
    year.unwrap_or_else(|| chrono::Utc::now().year() as u16)
}

fn cancel_on_ctrl_c() -> CancelToken {
    let cancel = CancelToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });
    cancel
}
