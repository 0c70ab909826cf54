use clap::Parser;
use hls_playlist::config::RuntimeConfig;
use hls_playlist::logging::LogLevel;
use hls_playlist::utils::SourceMap;
use hls_playlist::{batch, file_processor, lexical, logging, pipeline, render};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const EXIT_FAILURE: i32 = 1;
const EXIT_USAGE: i32 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "hls-playlist",
    version,
    about = "Parse and validate RFC 8216 HLS playlists",
    long_about = "Parses media and master playlists into a validated document model.\n\
                  A single file prints a summary, its JSON model or its re-rendered text.\n\
                  A directory is searched for .m3u8/.m3u files which are parsed in parallel.\n\
                  \n\
                  Exit status: 0 when every playlist parsed, 1 when any failed, 2 on bad configuration."
)]
struct Cli {
    /// Playlist file or directory of playlists
    input: PathBuf,

    /// Print the parsed document as JSON
    #[arg(long, conflicts_with = "render")]
    json: bool,

    /// Print the document re-rendered as M3U8 (single file only)
    #[arg(long)]
    render: bool,

    /// Load runtime preferences from a TOML file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of worker threads (default: available cores)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    threads: Option<u16>,

    /// Process directory files one at a time
    #[arg(long)]
    sequential: bool,

    /// Don't search subdirectories
    #[arg(long)]
    no_recursive: bool,

    /// Process at most N files, in path order
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    max_files: Option<u32>,

    /// Stop scheduling files after the first failure
    #[arg(long)]
    fail_fast: bool,

    /// Suppress progress reporting and log output
    #[arg(short, long)]
    quiet: bool,

    /// Print debug log events to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let runtime = match load_runtime_config(&cli) {
        Ok(runtime) => runtime,
        Err(error) => {
            eprintln!("Error: {}", error);
            std::process::exit(EXIT_USAGE);
        }
    };

    // Preferences must be in place before the logger reads them
    logging::config::init_runtime_preferences(runtime.logging.clone())?;
    logging::init_global_logging()?;
    file_processor::init_file_processor_logging()?;
    lexical::init_lexical_logging()?;

    if cli.verbose {
        eprintln!("{}", pipeline::get_pipeline_info().report());
        eprintln!("{}", logging::config::get_config_summary());
    }

    if cli.input.is_file() {
        process_single_file(&cli.input, &cli, &runtime)?;
    } else if cli.input.is_dir() {
        let config = build_batch_config(&cli, runtime);
        process_directory_batch(&cli.input, &cli, &config)?;
    } else {
        eprintln!("Error: Input must be a playlist file (.m3u8, .m3u) or directory");
        eprintln!("  Path: {}", cli.input.display());
        std::process::exit(EXIT_FAILURE);
    }

    Ok(())
}

fn load_runtime_config(cli: &Cli) -> Result<RuntimeConfig, hls_playlist::config::ConfigError> {
    let mut runtime = match &cli.config {
        Some(path) => RuntimeConfig::from_toml_file(path)?,
        None => RuntimeConfig::default(),
    };

    if cli.verbose {
        runtime.logging.enable_console_logging = true;
        runtime.logging.min_log_level = LogLevel::Debug;
    }
    if cli.quiet {
        runtime.logging.enable_console_logging = false;
        runtime.logging.enable_cargo_style_output = false;
    }

    Ok(runtime)
}

fn build_batch_config(cli: &Cli, runtime: RuntimeConfig) -> batch::BatchConfig {
    let defaults = batch::BatchConfig::default();
    let max_threads = if cli.sequential {
        1
    } else {
        cli.threads.map(usize::from).unwrap_or(defaults.max_threads)
    };

    batch::BatchConfig {
        max_threads,
        recursive: !cli.no_recursive,
        max_files: cli.max_files.map(|n| n as usize),
        progress_reporting: !cli.quiet && !cli.json,
        fail_fast: cli.fail_fast,
        runtime,
    }
}

/// Cargo-style report goes to stderr so stdout stays machine-readable
fn print_cargo_style_summary() {
    if !logging::config::use_cargo_style_output() {
        return;
    }
    if let Some(summary) = logging::cargo_style_summary() {
        if !summary.trim().is_empty() {
            eprintln!("{}", summary);
        }
    }
}

fn process_single_file(
    file_path: &Path,
    cli: &Cli,
    runtime: &RuntimeConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match pipeline::process_file_with_config(file_path, runtime) {
        Ok(result) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result.document)?);
            } else if cli.render {
                print!("{}", render::render(&result.document));
            } else if !cli.quiet {
                print_document_summary(file_path, &result);
            }
            print_cargo_style_summary();
        }
        Err(error) => {
            eprintln!("FAILED: {}: {}", file_path.display(), error);
            print_detailed_error(&error);
            if let Some(excerpt) = source_excerpt(file_path, &error) {
                eprint!("{}", excerpt);
            }
            print_cargo_style_summary();
            std::process::exit(EXIT_FAILURE);
        }
    }

    Ok(())
}

fn print_document_summary(file_path: &Path, result: &pipeline::PipelineResult) {
    let doc = &result.document;
    println!("{}: {} playlist", file_path.display(), doc.kind.as_str());

    if let Some(version) = doc.version {
        println!("  Version: {}", version);
    }
    if doc.is_master() {
        println!("  Variants: {}", doc.variants.len());
        println!("  Renditions: {}", doc.renditions.len());
        println!("  I-frame variants: {}", doc.i_frame_variants.len());
    } else {
        if let Some(target) = doc.target_duration {
            println!("  Target duration: {}s", target);
        }
        println!(
            "  Segments: {} ({:.3}s total)",
            doc.segments.len(),
            doc.total_duration()
        );
        println!("  Media sequence: {}", doc.media_sequence);
        println!("  Ended: {}", doc.end_list);
    }
    if !doc.unknown_tags.is_empty() {
        println!("  Unrecognized tags: {}", doc.unknown_tags.len());
    }
    println!(
        "  Parsed {} lines in {:.2}ms ({:.0} lines/sec)",
        result.tokenizer_metrics.total_lines,
        result.processing_duration.as_secs_f64() * 1000.0,
        result.lines_per_second()
    );

    if doc.has_warnings() {
        println!("  Warnings:");
        for warning in &doc.warnings {
            println!("    warning[{}]: {}", warning.kind.code(), warning.message);
        }
    }
}

fn print_detailed_error(error: &pipeline::PipelineError) {
    if let Some(kind) = error.kind() {
        eprintln!("  kind: {}", kind);
    }
    if let Some(line) = error.line() {
        eprintln!("  line: {}", line);
    }
    eprintln!("  code: {}", error.error_code());
}

/// The failing line quoted from the playlist, when the error has one and the
/// file is readable text
fn source_excerpt(file_path: &Path, error: &pipeline::PipelineError) -> Option<String> {
    let line = error.line()?;
    let source = std::fs::read_to_string(file_path).ok()?;
    Some(SourceMap::new(source).format_error(line, &error.to_string()))
}

fn process_directory_batch(
    dir_path: &Path,
    cli: &Cli,
    config: &batch::BatchConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    if cli.render {
        eprintln!("Warning: --render applies to single files only; ignoring");
    }
    if !cli.quiet && !cli.json {
        println!("Starting batch processing: {}", dir_path.display());
        println!(
            "Configuration: {} threads, recursive={}, fail_fast={}",
            config.effective_threads(),
            config.recursive,
            config.fail_fast
        );
        if let Some(max_files) = config.max_files {
            println!("File limit: {} files maximum", max_files);
        }
    }

    match batch::process_directory_with_config(dir_path, config) {
        Ok(results) => {
            if cli.json {
                let documents: BTreeMap<String, _> = results
                    .successful_files
                    .iter()
                    .map(|(path, result)| (path.display().to_string(), &result.document))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&documents)?);
            } else if !cli.quiet {
                print_batch_results(&results);
            }
            print_cargo_style_summary();

            if results.failure_count() > 0 {
                std::process::exit(EXIT_FAILURE);
            }
        }
        Err(error) => {
            eprintln!("Batch processing failed: {}", error);
            print_cargo_style_summary();
            std::process::exit(EXIT_FAILURE);
        }
    }

    Ok(())
}

fn print_batch_results(results: &batch::BatchResults) {
    println!("\n{}", results.summary());
    println!("  Files discovered: {}", results.files_discovered);
    if results.skipped_count() > 0 {
        println!("  Skipped after failure: {}", results.skipped_count());
    }

    if results.processing_duration.as_secs_f64() > 0.0 && !results.successful_files.is_empty() {
        let total_bytes: usize = results
            .successful_files
            .iter()
            .map(|(_, result)| result.source_bytes)
            .sum();
        println!(
            "  Processing rate: {:.0} bytes/sec",
            total_bytes as f64 / results.processing_duration.as_secs_f64()
        );
    }

    if results.failure_count() > 0 {
        println!("\nFailed Files:");
        for (file_path, error) in &results.failed_files {
            let kind = error
                .kind()
                .map(|k| k.to_string())
                .unwrap_or_else(|| error.error_code().to_string());
            println!("  {}: [{}] {}", file_path.display(), kind, error);
        }
    }

    if results.success_count() > 0 && results.success_count() <= 10 {
        println!("\nSuccessful Files:");
        for (file_path, result) in &results.successful_files {
            println!(
                "  {}: {} playlist, {} segments, {} variants",
                file_path.display(),
                result.document.kind.as_str(),
                result.document.segments.len(),
                result.document.variants.len()
            );
        }
    } else if results.success_count() > 10 {
        println!("\n{} files processed successfully", results.success_count());
    }
}
