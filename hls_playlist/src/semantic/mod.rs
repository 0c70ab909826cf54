//! Tag semantic resolver
//!
//! Turns a classified tag line into typed fields, enforcing each tag's
//! required attributes, value forms and enumerations.

mod attrs;
pub mod error;
mod master_tags;
mod media_tags;
pub mod resolver;

pub use attrs::parse_date_time;
pub use error::SemanticError;
pub use resolver::{resolve, ResolvedTag};
