use crate::config::compile_time::{assembly, file_processing};
use crate::file_processor::PLAYLIST_EXTENSIONS;
use crate::tags::TagKind;

/// Capabilities of the parsing pipeline, for `--version`-style reports
#[derive(Debug, Clone)]
pub struct PipelineInfo {
    pub stages: Vec<&'static str>,
    pub known_tags: usize,
    pub max_file_size: u64,
    pub max_segments: usize,
    pub supported_extensions: Vec<String>,
    pub build_profile: &'static str,
}

impl PipelineInfo {
    pub fn report(&self) -> String {
        format!(
            "HLS Playlist Pipeline:\n\
             - Stages: {}\n\
             - Known Tags: {}\n\
             - Max File Size: {} MB\n\
             - Max Segments: {}\n\
             - Supported Extensions: {}\n\
             - Build Profile: {}",
            self.stages.join(" -> "),
            self.known_tags,
            self.max_file_size / (1024 * 1024),
            self.max_segments,
            self.supported_extensions.join(", "),
            self.build_profile
        )
    }

    pub fn summary(&self) -> String {
        format!(
            "{}-stage RFC 8216 playlist parser supporting {} extensions ({} known tags)",
            self.stages.len(),
            self.supported_extensions.join(", "),
            self.known_tags
        )
    }
}

pub fn get_pipeline_info() -> PipelineInfo {
    PipelineInfo {
        stages: vec!["tokenize", "resolve", "assemble", "validate"],
        known_tags: TagKind::ALL.len(),
        max_file_size: file_processing::MAX_FILE_SIZE,
        max_segments: assembly::MAX_SEGMENTS,
        supported_extensions: PLAYLIST_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        build_profile: crate::config::build_info::profile(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_report() {
        let info = get_pipeline_info();
        assert_eq!(info.known_tags, 22);
        assert!(info.report().contains("tokenize -> resolve -> assemble -> validate"));
        assert!(info.summary().starts_with("4-stage"));
        assert!(info.summary().contains("m3u8, m3u"));
    }
}
