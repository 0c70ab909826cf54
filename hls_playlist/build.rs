// Generates `compile_time` limit constants from config/<profile>.toml
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(serde::Deserialize)]
struct Limits {
    file_processing: FileLimits,
    lexical: LexicalLimits,
    attributes: AttributeLimits,
    assembly: AssemblyLimits,
    validation: ValidationLimits,
    batch_processing: BatchLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct FileLimits {
    max_file_size: u64,
    large_file_threshold: u64,
    max_line_count: usize,
}

#[derive(serde::Deserialize)]
struct LexicalLimits {
    max_line_length: usize,
}

#[derive(serde::Deserialize)]
struct AttributeLimits {
    max_attributes_per_tag: usize,
    max_quoted_string_length: usize,
}

#[derive(serde::Deserialize)]
struct AssemblyLimits {
    max_segments: usize,
}

#[derive(serde::Deserialize)]
struct ValidationLimits {
    target_duration_tolerance: f64,
}

#[derive(serde::Deserialize)]
struct BatchLimits {
    max_worker_threads: usize,
    max_files_per_batch: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    max_error_collection: usize,
    log_buffer_size: usize,
    max_log_message_length: usize,
    max_log_events_per_file: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=HLS_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=HLS_CONFIG_DIR");

    let profile = env::var("HLS_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_path = limits_path(&profile);
    println!("cargo:rerun-if-changed={}", config_path.display());

    let text = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        panic!(
            "cannot read limits for profile '{}' at {}: {}",
            profile,
            config_path.display(),
            e
        )
    });
    let limits: Limits = toml::from_str(&text)
        .unwrap_or_else(|e| panic!("{} is not a valid limits file: {}", config_path.display(), e));

    let problems = check_limits(&limits, &profile);
    if !problems.is_empty() {
        panic!(
            "{} has inconsistent limits:\n  {}",
            config_path.display(),
            problems.join("\n  ")
        );
    }

    let out_dir = env::var("OUT_DIR").unwrap_or_else(|e| panic!("OUT_DIR unset: {}", e));
    let generated = render_constants(&limits, &profile);
    fs::write(Path::new(&out_dir).join("constants.rs"), generated)
        .unwrap_or_else(|e| panic!("cannot write generated limits: {}", e));
}

/// `HLS_CONFIG_DIR` is resolved against the workspace root, one level above this crate
fn limits_path(profile: &str) -> PathBuf {
    let config_dir = env::var("HLS_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_default());
    let workspace_root = manifest_dir.parent().unwrap_or(&manifest_dir).to_path_buf();
    workspace_root.join(config_dir).join(format!("{}.toml", profile))
}

fn check_limits(limits: &Limits, profile: &str) -> Vec<String> {
    let mut problems = Vec::new();
    let mut require = |ok: bool, problem: &str| {
        if !ok {
            problems.push(problem.to_string());
        }
    };

    let files = &limits.file_processing;
    require(files.max_file_size <= 1_000_000_000, "max_file_size is above 1 GB");
    require(
        files.large_file_threshold <= files.max_file_size,
        "large_file_threshold is above max_file_size",
    );
    // Every playlist has at least the #EXTM3U line
    require(files.max_line_count >= 1, "max_line_count must be at least 1");
    require(
        (8..=1_048_576).contains(&limits.lexical.max_line_length),
        "max_line_length must fit #EXTM3U and stay at or below 1 MiB",
    );
    require(
        limits.attributes.max_attributes_per_tag >= 1,
        "max_attributes_per_tag must be at least 1",
    );
    require(
        limits.attributes.max_quoted_string_length <= limits.lexical.max_line_length,
        "max_quoted_string_length is longer than a line may be",
    );
    require(
        limits.assembly.max_segments <= files.max_line_count,
        "max_segments is above max_line_count; each segment needs a URI line",
    );
    require(
        (0.0..=5.0).contains(&limits.validation.target_duration_tolerance),
        "target_duration_tolerance must be between 0.0 and 5.0 seconds",
    );
    require(
        (1..=64).contains(&limits.batch_processing.max_worker_threads),
        "max_worker_threads must be between 1 and 64",
    );
    require(
        limits.logging.max_log_events_per_file <= limits.logging.log_buffer_size,
        "max_log_events_per_file is above log_buffer_size",
    );
    require(
        limits.logging.max_log_message_length >= 80,
        "max_log_message_length must be at least 80",
    );

    if profile == "production" {
        require(
            files.max_file_size <= 50_000_000,
            "production max_file_size is above 50 MB",
        );
        require(
            limits.assembly.max_segments <= 1_000_000,
            "production max_segments is above one million",
        );
    }

    problems
}

fn render_constants(limits: &Limits, profile: &str) -> String {
    let files = &limits.file_processing;
    let modules: [(&str, Vec<(&str, &str, String)>); 7] = [
        (
            "file_processing",
            vec![
                ("MAX_FILE_SIZE", "u64", files.max_file_size.to_string()),
                ("LARGE_FILE_THRESHOLD", "u64", files.large_file_threshold.to_string()),
                ("MAX_LINE_COUNT", "usize", files.max_line_count.to_string()),
            ],
        ),
        (
            "lexical",
            vec![("MAX_LINE_LENGTH", "usize", limits.lexical.max_line_length.to_string())],
        ),
        (
            "attributes",
            vec![
                (
                    "MAX_ATTRIBUTES_PER_TAG",
                    "usize",
                    limits.attributes.max_attributes_per_tag.to_string(),
                ),
                (
                    "MAX_QUOTED_STRING_LENGTH",
                    "usize",
                    limits.attributes.max_quoted_string_length.to_string(),
                ),
            ],
        ),
        (
            "assembly",
            vec![("MAX_SEGMENTS", "usize", limits.assembly.max_segments.to_string())],
        ),
        (
            "validation",
            vec![(
                "TARGET_DURATION_TOLERANCE",
                "f64",
                format!("{:?}", limits.validation.target_duration_tolerance),
            )],
        ),
        (
            "batch_processing",
            vec![
                (
                    "MAX_WORKER_THREADS",
                    "usize",
                    limits.batch_processing.max_worker_threads.to_string(),
                ),
                (
                    "MAX_FILES_PER_BATCH",
                    "usize",
                    limits.batch_processing.max_files_per_batch.to_string(),
                ),
            ],
        ),
        (
            "logging",
            vec![
                ("MAX_ERROR_COLLECTION", "usize", limits.logging.max_error_collection.to_string()),
                ("LOG_BUFFER_SIZE", "usize", limits.logging.log_buffer_size.to_string()),
                ("MAX_LOG_MESSAGE_LENGTH", "usize", limits.logging.max_log_message_length.to_string()),
                ("MAX_LOG_EVENTS_PER_FILE", "usize", limits.logging.max_log_events_per_file.to_string()),
            ],
        ),
    ];

    let mut out = format!("// Limits for the '{}' profile, generated by build.rs\n\npub mod compile_time {{\n", profile);
    for (module, constants) in &modules {
        let _ = writeln!(out, "    pub mod {} {{", module);
        for (name, ty, value) in constants {
            let _ = writeln!(out, "        pub const {}: {} = {};", name, ty, value);
        }
        out.push_str("    }\n");
    }
    out.push_str("}\n");
    out
}
