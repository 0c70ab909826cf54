//! Attribute-list parser
//!
//! Decodes `NAME=VALUE,NAME=VALUE` text into typed values by lexical form.

pub mod error;
pub mod parser;
pub mod value;

pub use error::AttributeError;
pub use parser::{parse_attribute_list, AttributeList};
pub use value::{parse_decimal_float, parse_decimal_integer, parse_sub_range, AttributeValue};
