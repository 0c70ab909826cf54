//! RFC 8216 HLS playlist parser
//!
//! Text goes through four stages: line tokenizing, tag resolution (attribute
//! lists included), playlist assembly and model validation. The result is an
//! immutable [`PlaylistDocument`] that [`render`] can turn back into text.
//!
//! ```no_run
//! let text = std::fs::read_to_string("index.m3u8").unwrap();
//! let doc = hls_playlist::parse_playlist(&text).unwrap();
//! println!("{} segments", doc.segments.len());
//! ```

// Internal modules
#[macro_use]
pub mod logging;

pub mod assembler;
pub mod attributes;
pub mod batch;
pub mod config;
pub mod error;
pub mod file_processor;
pub mod lexical;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod semantic;
pub mod tags;
pub mod utils;
pub mod validation;

// Re-export key types for library consumers
pub use batch::{BatchConfig, BatchError, BatchResults};
pub use config::RuntimeConfig;
pub use error::ParseErrorKind;
pub use model::PlaylistDocument;
pub use pipeline::{
    parse_playlist, parse_playlist_with_config, process_file, PipelineError, PipelineResult,
};
pub use render::render;
