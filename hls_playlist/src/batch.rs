//! Batch processing of playlist directories
//!
//! Discovers `.m3u8`/`.m3u` files under a directory and runs each through the
//! pipeline, either in order on the calling thread or on scoped worker threads.
//! Every file is parsed independently; results come back in discovery order.

use crate::config::compile_time::batch_processing::{MAX_FILES_PER_BATCH, MAX_WORKER_THREADS};
use crate::config::RuntimeConfig;
use crate::file_processor::has_playlist_extension;
use crate::logging::{codes, Code};
use crate::pipeline::{self, PipelineError, PipelineResult};
use crate::{log_debug, log_error, log_info, log_success, log_warning};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Worker threads; 1 runs sequentially on the calling thread
    pub max_threads: usize,
    pub recursive: bool,
    /// Process only the first `n` files in sorted order
    pub max_files: Option<usize>,
    /// Print one line per file to stderr
    pub progress_reporting: bool,
    /// Stop scheduling new files after the first failure
    pub fail_fast: bool,
    pub runtime: RuntimeConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_threads: thread::available_parallelism()
                .map(|n| n.get().min(MAX_WORKER_THREADS))
                .unwrap_or(4),
            recursive: true,
            max_files: None,
            progress_reporting: false,
            fail_fast: false,
            runtime: RuntimeConfig::default(),
        }
    }
}

impl BatchConfig {
    /// Thread count actually used, within `1..=MAX_WORKER_THREADS`
    pub fn effective_threads(&self) -> usize {
        self.max_threads.clamp(1, MAX_WORKER_THREADS.max(1))
    }
}

#[derive(Debug, Default)]
pub struct BatchResults {
    pub successful_files: Vec<(PathBuf, PipelineResult)>,
    pub failed_files: Vec<(PathBuf, PipelineError)>,
    pub processing_duration: Duration,
    pub files_processed: usize,
    pub files_discovered: usize,
}

impl BatchResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success_count(&self) -> usize {
        self.successful_files.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failed_files.len()
    }

    /// Files discovered but never started because of fail-fast
    pub fn skipped_count(&self) -> usize {
        self.files_discovered.saturating_sub(self.files_processed)
    }

    /// Validation warnings across all successfully parsed files
    pub fn warning_count(&self) -> usize {
        self.successful_files
            .iter()
            .map(|(_, result)| result.document.warnings.len())
            .sum()
    }

    pub fn success_rate(&self) -> f64 {
        if self.files_processed == 0 {
            0.0
        } else {
            self.success_count() as f64 / self.files_processed as f64
        }
    }

    pub fn add_success(&mut self, file_path: PathBuf, result: PipelineResult) {
        self.successful_files.push((file_path, result));
        self.files_processed += 1;
    }

    pub fn add_failure(&mut self, file_path: PathBuf, error: PipelineError) {
        self.failed_files.push((file_path, error));
        self.files_processed += 1;
    }

    pub fn summary(&self) -> String {
        format!(
            "Batch processing completed: {} files processed, {} successful ({:.1}%), {} failed, {} warnings, {:.2}s total",
            self.files_processed,
            self.success_count(),
            self.success_rate() * 100.0,
            self.failure_count(),
            self.warning_count(),
            self.processing_duration.as_secs_f64()
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("No playlist files found in directory: {path}")]
    NoFilesFound { path: String },

    #[error("IO error during directory traversal of {path}: {message}")]
    IoError { path: String, message: String },

    #[error("Worker thread failed: {message}")]
    WorkerFailure { message: String },

    #[error("Too many files found: more than {max}")]
    TooManyFiles { max: usize },
}

impl BatchError {
    pub fn error_code(&self) -> Code {
        match self {
            BatchError::DirectoryNotFound { .. } => codes::batch::DIRECTORY_NOT_FOUND,
            BatchError::NoFilesFound { .. } => codes::batch::NO_PLAYLISTS_FOUND,
            BatchError::IoError { .. } => codes::batch::BATCH_IO_ERROR,
            BatchError::WorkerFailure { .. } => codes::batch::WORKER_FAILURE,
            BatchError::TooManyFiles { .. } => codes::batch::TOO_MANY_FILES,
        }
    }
}

fn logged(error: BatchError) -> BatchError {
    log_error!(error.error_code(), error.to_string());
    error
}

// ============================================================================
// FILE DISCOVERY
// ============================================================================

/// Find playlist files under `dir_path`, sorted by path
pub fn discover_playlist_files(
    dir_path: &Path,
    config: &BatchConfig,
) -> Result<Vec<PathBuf>, BatchError> {
    log_info!("Starting file discovery",
        "directory" => dir_path.display(),
        "recursive" => config.recursive);

    if !dir_path.is_dir() {
        return Err(logged(BatchError::DirectoryNotFound {
            path: dir_path.display().to_string(),
        }));
    }

    let mut files = Vec::new();
    walk_directory(dir_path, config.recursive, &mut files).map_err(logged)?;

    if files.is_empty() {
        return Err(logged(BatchError::NoFilesFound {
            path: dir_path.display().to_string(),
        }));
    }

    files.sort();
    if let Some(max_files) = config.max_files {
        if files.len() > max_files {
            log_info!("Limiting batch to the first files",
                "files_found" => files.len(),
                "limit" => max_files);
            files.truncate(max_files);
        }
    }

    log_success!(
        codes::success::FILE_DISCOVERY_COMPLETE,
        "File discovery completed",
        "files_found" => files.len(),
        "directory" => dir_path.display()
    );

    Ok(files)
}

fn walk_directory(
    dir_path: &Path,
    recursive: bool,
    files: &mut Vec<PathBuf>,
) -> Result<(), BatchError> {
    let max_depth = if recursive { usize::MAX } else { 1 };

    for entry in WalkDir::new(dir_path).follow_links(true).max_depth(max_depth) {
        let entry = entry.map_err(|e| BatchError::IoError {
            path: e
                .path()
                .unwrap_or(dir_path)
                .display()
                .to_string(),
            message: e.to_string(),
        })?;

        let path = entry.path();
        if entry.file_type().is_file() && has_playlist_extension(path) {
            if files.len() >= MAX_FILES_PER_BATCH {
                return Err(BatchError::TooManyFiles {
                    max: MAX_FILES_PER_BATCH,
                });
            }
            files.push(path.to_path_buf());
        }
    }

    Ok(())
}

// ============================================================================
// BATCH PROCESSING
// ============================================================================

fn report_progress(config: &BatchConfig, file_id: usize, total: usize, path: &Path) {
    if config.progress_reporting {
        eprintln!("Processing file {} of {}: {}", file_id + 1, total, path.display());
    }
}

/// Process every file on the calling thread
pub fn process_directory_sequential(
    dir_path: &Path,
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    let start_time = Instant::now();
    log_info!("Starting sequential batch processing", "directory" => dir_path.display());

    let files = discover_playlist_files(dir_path, config)?;
    let mut results = BatchResults {
        files_discovered: files.len(),
        ..BatchResults::default()
    };

    for (file_id, file_path) in files.iter().enumerate() {
        report_progress(config, file_id, files.len(), file_path);

        match pipeline::process_file_with_id(file_path, file_id, &config.runtime) {
            Ok(result) => results.add_success(file_path.clone(), result),
            Err(error) => {
                results.add_failure(file_path.clone(), error);
                if config.fail_fast {
                    log_warning!(
                        codes::batch::WORKER_FAILURE,
                        "Fail-fast mode enabled, stopping batch processing",
                        "file" => file_path.display()
                    );
                    break;
                }
            }
        }
    }

    results.processing_duration = start_time.elapsed();
    log_completion(&results, 1);
    Ok(results)
}

type Outcome = (usize, PathBuf, Result<PipelineResult, PipelineError>);

/// Process files on scoped worker threads pulling from a shared index
pub fn process_directory_parallel(
    dir_path: &Path,
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    let start_time = Instant::now();
    let threads = config.effective_threads();
    log_info!("Starting parallel batch processing",
        "directory" => dir_path.display(),
        "max_threads" => threads);

    let files = discover_playlist_files(dir_path, config)?;
    let workers = threads.min(files.len());
    log_debug!("Parallel processing configuration",
        "total_files" => files.len(),
        "workers" => workers);

    let next_index = AtomicUsize::new(0);
    let stop = AtomicBool::new(false);
    let outcomes: Mutex<Vec<Outcome>> = Mutex::new(Vec::with_capacity(files.len()));

    let worker_failures = {
        // Workers copy these shared references into their `move` closures
        let (files, next_index, stop, outcomes) = (&files, &next_index, &stop, &outcomes);
        thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    scope.spawn(move || loop {
                        if stop.load(Ordering::Relaxed) {
                            break;
                        }
                        let file_id = next_index.fetch_add(1, Ordering::Relaxed);
                        let Some(file_path) = files.get(file_id) else {
                            break;
                        };
                        report_progress(config, file_id, files.len(), file_path);

                        let outcome =
                            pipeline::process_file_with_id(file_path, file_id, &config.runtime);
                        if outcome.is_err() && config.fail_fast {
                            stop.store(true, Ordering::Relaxed);
                        }
                        outcomes
                            .lock()
                            .unwrap_or_else(|poisoned| poisoned.into_inner())
                            .push((file_id, file_path.clone(), outcome));
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join())
                .filter(Result::is_err)
                .count()
        })
    };

    if worker_failures > 0 {
        return Err(logged(BatchError::WorkerFailure {
            message: format!("{} worker thread(s) panicked", worker_failures),
        }));
    }

    let mut outcomes = outcomes
        .into_inner()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    outcomes.sort_by_key(|(file_id, _, _)| *file_id);

    let mut results = BatchResults {
        files_discovered: files.len(),
        ..BatchResults::default()
    };
    for (_, file_path, outcome) in outcomes {
        match outcome {
            Ok(result) => results.add_success(file_path, result),
            Err(error) => results.add_failure(file_path, error),
        }
    }
    if stop.load(Ordering::Relaxed) {
        log_warning!(
            codes::batch::WORKER_FAILURE,
            "Fail-fast mode enabled, remaining files were not scheduled",
            "skipped" => results.skipped_count()
        );
    }

    results.processing_duration = start_time.elapsed();
    log_completion(&results, workers);
    Ok(results)
}

fn log_completion(results: &BatchResults, threads: usize) {
    log_success!(
        codes::success::BATCH_COMPLETE,
        "Batch processing completed",
        "files_processed" => results.files_processed,
        "successful" => results.success_count(),
        "failed" => results.failure_count(),
        "warnings" => results.warning_count(),
        "threads_used" => threads,
        "duration_ms" => format!("{:.2}", results.processing_duration.as_secs_f64() * 1000.0)
    );
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Sequential when one thread is configured, parallel otherwise
pub fn process_directory_with_config(
    dir_path: &Path,
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    if config.effective_threads() == 1 {
        process_directory_sequential(dir_path, config)
    } else {
        process_directory_parallel(dir_path, config)
    }
}
