// WHY: Concurrent file correction for the CLI with per-file and per-run statistics
// Reads and writes are async; correction itself runs on the blocking pool against one shared corrector

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::corrector::BoundaryCorrector;

/// Batch behaviour switches
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Abort the whole run on the first failing file
    pub fail_fast: bool,
    /// Write outputs here instead of next to each input
    pub output_dir: Option<PathBuf>,
    /// Run the segmenter; otherwise each input line is one fragment
    pub segment_input: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            output_dir: None,
            segment_input: true,
        }
    }
}

/// Per-file processing statistics
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FileStats {
    pub path: String,
    pub chars_processed: u64,
    /// Fragments handed to the corrector
    pub fragments_in: u64,
    pub sentences_out: u64,
    pub processing_time_ms: u64,
    /// "success" or "failed"
    pub status: String,
    pub error: Option<String>,
}

impl FileStats {
    fn failed(path: &Path, error: &anyhow::Error, elapsed_ms: u64) -> Self {
        Self {
            path: path.display().to_string(),
            chars_processed: 0,
            fragments_in: 0,
            sentences_out: 0,
            processing_time_ms: elapsed_ms,
            status: "failed".to_string(),
            error: Some(format!("{error:#}")),
        }
    }
}

/// Aggregate statistics for one CLI run
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RunStats {
    /// Seconds since the Unix epoch
    pub run_start: u64,
    pub total_processing_time_ms: u64,
    pub total_chars_processed: u64,
    pub total_sentences_detected: u64,
    pub files_processed: u64,
    pub files_failed: u64,
    pub file_stats: Vec<FileStats>,
}

/// `<stem>_seams_fix.txt` next to the source, or inside `output_dir`
pub fn output_path_for(source: &Path, output_dir: Option<&Path>) -> PathBuf {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");
    let file_name = format!("{stem}_seams_fix.txt");
    match output_dir {
        Some(dir) => dir.join(file_name),
        None => source.with_file_name(file_name),
    }
}

/// One `index\tsentence` line per sentence, newline-terminated
pub fn format_sentences(sentences: &[String]) -> String {
    let mut out = String::new();
    for (index, sentence) in sentences.iter().enumerate() {
        out.push_str(&format!("{index}\t{sentence}\n"));
    }
    out
}

/// Correct one file and write its output
pub async fn correct_file(
    corrector: Arc<BoundaryCorrector>,
    path: PathBuf,
    config: Arc<BatchConfig>,
) -> Result<FileStats> {
    let start = Instant::now();

    let text = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let chars_processed = text.chars().count() as u64;

    let segment = config.segment_input;
    let correction = tokio::task::spawn_blocking(move || corrector.correct_document(&text, segment))
        .await
        .with_context(|| format!("Correction task failed for {}", path.display()))?;

    let out_path = output_path_for(&path, config.output_dir.as_deref());
    let file = tokio::fs::File::create(&out_path)
        .await
        .with_context(|| format!("Failed to create {}", out_path.display()))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(format_sentences(&correction.sentences).as_bytes())
        .await
        .with_context(|| format!("Failed to write {}", out_path.display()))?;
    writer.flush().await?;

    let stats = FileStats {
        path: path.display().to_string(),
        chars_processed,
        fragments_in: correction.fragments_in as u64,
        sentences_out: correction.sentences.len() as u64,
        processing_time_ms: start.elapsed().as_millis() as u64,
        status: "success".to_string(),
        error: None,
    };
    info!(
        "Corrected {}: {} fragments -> {} sentences in {}ms",
        stats.path, stats.fragments_in, stats.sentences_out, stats.processing_time_ms
    );
    Ok(stats)
}

/// Correct every file concurrently
///
/// Without `fail_fast` a failing file is recorded in its stats and the run
/// continues; with it the first failure aborts the remaining tasks.
pub async fn process_files(
    corrector: Arc<BoundaryCorrector>,
    paths: Vec<PathBuf>,
    config: BatchConfig,
) -> Result<RunStats> {
    let run_start = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let start = Instant::now();

    if let Some(dir) = &config.output_dir {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    info!("Processing {} files", paths.len());
    let config = Arc::new(config);
    let mut tasks = JoinSet::new();
    for path in paths {
        let corrector = Arc::clone(&corrector);
        let config = Arc::clone(&config);
        tasks.spawn(async move {
            let started = Instant::now();
            let result = correct_file(corrector, path.clone(), config).await;
            (path, started.elapsed().as_millis() as u64, result)
        });
    }

    let mut file_stats = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let (path, elapsed_ms, result) = joined.context("File task panicked")?;
        match result {
            Ok(stats) => file_stats.push(stats),
            Err(e) if config.fail_fast => {
                tasks.abort_all();
                return Err(e.context(format!("Aborting run after failure in {}", path.display())));
            }
            Err(e) => {
                warn!("Failed to process {}: {:#}", path.display(), e);
                file_stats.push(FileStats::failed(&path, &e, elapsed_ms));
            }
        }
    }
    file_stats.sort_by(|a, b| a.path.cmp(&b.path));

    let succeeded = file_stats.iter().filter(|s| s.status == "success");
    let stats = RunStats {
        run_start,
        total_processing_time_ms: start.elapsed().as_millis() as u64,
        total_chars_processed: succeeded.clone().map(|s| s.chars_processed).sum(),
        total_sentences_detected: succeeded.clone().map(|s| s.sentences_out).sum(),
        files_processed: succeeded.count() as u64,
        files_failed: file_stats.iter().filter(|s| s.status == "failed").count() as u64,
        file_stats,
    };

    info!(
        "Run complete: {} processed, {} failed, {} sentences",
        stats.files_processed, stats.files_failed, stats.total_sentences_detected
    );
    Ok(stats)
}

pub async fn write_run_stats(stats: &RunStats, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(stats).context("Failed to serialize run stats")?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write stats file {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn corrector() -> Arc<BoundaryCorrector> {
        Arc::new(BoundaryCorrector::with_default_config().unwrap())
    }

    #[test]
    fn test_output_path_for() {
        let source = Path::new("/data/book-0.txt");
        assert_eq!(output_path_for(source, None), PathBuf::from("/data/book-0_seams_fix.txt"));
        assert_eq!(
            output_path_for(source, Some(Path::new("/out"))),
            PathBuf::from("/out/book-0_seams_fix.txt")
        );
    }

    #[test]
    fn test_format_sentences() {
        let sentences = vec!["First one.".to_string(), "Second one.".to_string()];
        assert_eq!(format_sentences(&sentences), "0\tFirst one.\n1\tSecond one.\n");
        assert_eq!(format_sentences(&[]), "");
    }

    #[tokio::test]
    async fn test_process_files_writes_outputs() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("notes.txt");
        fs::write(&input, "See e.g. The Odyssey for details. It weighs 10 lbs. The box is heavy.").unwrap();

        let stats = process_files(corrector(), vec![input.clone()], BatchConfig::default())
            .await
            .unwrap();

        assert_eq!(stats.files_processed, 1);
        assert_eq!(stats.files_failed, 0);
        let output = fs::read_to_string(output_path_for(&input, None)).unwrap();
        assert_eq!(
            output,
            "0\tSee e.g. The Odyssey for details.\n1\tIt weighs 10 lbs.\n2\tThe box is heavy.\n"
        );
        assert_eq!(stats.file_stats[0].sentences_out, 3);
    }

    #[tokio::test]
    async fn test_missing_file_recorded_without_fail_fast() {
        let temp_dir = TempDir::new().unwrap();
        let good = temp_dir.path().join("good.txt");
        fs::write(&good, "One sentence here.").unwrap();
        let missing = temp_dir.path().join("missing.txt");

        let stats = process_files(corrector(), vec![good, missing], BatchConfig::default())
            .await
            .unwrap();

        assert_eq!(stats.files_processed, 1);
        assert_eq!(stats.files_failed, 1);
        let failed = stats.file_stats.iter().find(|s| s.status == "failed").unwrap();
        assert!(failed.error.as_deref().unwrap().contains("Failed to read"));
    }

    #[tokio::test]
    async fn test_fail_fast_aborts() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.txt");
        let config = BatchConfig {
            fail_fast: true,
            ..BatchConfig::default()
        };

        assert!(process_files(corrector(), vec![missing], config).await.is_err());
    }

    #[tokio::test]
    async fn test_run_stats_json() {
        let temp_dir = TempDir::new().unwrap();
        let stats = RunStats {
            run_start: 1,
            total_processing_time_ms: 2,
            total_chars_processed: 3,
            total_sentences_detected: 4,
            files_processed: 1,
            files_failed: 0,
            file_stats: Vec::new(),
        };
        let path = temp_dir.path().join("stats.json");
        write_run_stats(&stats, &path).await.unwrap();

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["total_sentences_detected"], 4);
        assert!(value["file_stats"].as_array().unwrap().is_empty());
    }
}
