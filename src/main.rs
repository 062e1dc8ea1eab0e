use anyhow::{Context, Result};
use clap::Parser;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use seams_fix::batch::{self, BatchConfig};
use seams_fix::corrector::{BoundaryCorrector, CorrectorConfig};

#[derive(Parser, Debug)]
#[command(name = "seams-fix")]
#[command(about = "Repairs sentence boundaries around abbreviations and embedded punctuation")]
#[command(version)]
struct Args {
    /// Files to correct; reads stdin and writes stdout when none are given
    files: Vec<PathBuf>,

    /// Directory for `<stem>_seams_fix.txt` outputs (default: next to each input)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Stats output file path
    #[arg(long)]
    stats_out: Option<PathBuf>,

    /// Abort on first error
    #[arg(long)]
    fail_fast: bool,

    /// Treat each input line as an already-segmented fragment
    #[arg(long)]
    no_segment: bool,

    /// JSON corrector configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the merge pass limit
    #[arg(long)]
    max_merge_passes: Option<usize>,

    /// Debug-level logging
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // WHY: logs go to stderr so stdout stays clean for corrected sentences
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .json()
        .init();

    info!("Starting seams-fix");
    info!(?args, "Parsed CLI arguments");

    let mut config = match &args.config {
        Some(path) => CorrectorConfig::from_json_file(path)?,
        None => CorrectorConfig::default(),
    };
    if let Some(passes) = args.max_merge_passes {
        config.max_merge_passes = passes;
    }
    if args.no_segment {
        config.segment_input = false;
    }

    for file in &args.files {
        if !file.is_file() {
            anyhow::bail!("Input file does not exist: {}", file.display());
        }
    }

    let segment_input = config.segment_input;
    let corrector = Arc::new(BoundaryCorrector::new(config)?);

    if args.files.is_empty() {
        return correct_stdin(&corrector, segment_input);
    }

    let batch_config = BatchConfig {
        fail_fast: args.fail_fast,
        output_dir: args.output_dir.clone(),
        segment_input,
    };
    let stats = batch::process_files(corrector, args.files.clone(), batch_config).await?;

    if let Some(stats_path) = &args.stats_out {
        batch::write_run_stats(&stats, stats_path).await?;
        info!("Wrote run stats to {}", stats_path.display());
    }

    println!("seams-fix v{} - correction complete", env!("CARGO_PKG_VERSION"));
    println!("  Files processed: {}", stats.files_processed);
    if stats.files_failed > 0 {
        println!("  Files failed: {}", stats.files_failed);
    }
    println!("  Sentences written: {}", stats.total_sentences_detected);

    Ok(())
}

fn correct_stdin(corrector: &BoundaryCorrector, segment_input: bool) -> Result<()> {
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read stdin")?;

    let correction = corrector.correct_document(&text, segment_input);
    info!(
        "Corrected stdin: {} fragments -> {} sentences",
        correction.fragments_in,
        correction.sentences.len()
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for sentence in &correction.sentences {
        writeln!(out, "{sentence}")?;
    }
    out.flush()?;
    Ok(())
}
