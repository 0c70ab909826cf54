//! Playlist assembler
//!
//! State machine that attaches segment tags to the URI that follows them
//! and collects playlist-level tags into the document.

pub mod error;
pub mod machine;

pub use error::AssemblyError;
pub use machine::{AssemblerState, PlaylistAssembler};
