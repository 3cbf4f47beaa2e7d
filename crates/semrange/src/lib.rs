//! Semantic version precedence and range matching
//!
//! This crate provides semantic version parsing and precedence ordering, and
//! range expressions such as `>=1.2.3 <2.0.0 || 3.0.0` that versions can be
//! tested against.

mod cache;
pub mod range;
mod validate;
mod version;
mod version_parser;

pub use cache::ParseCache;
pub use range::{parse_range, satisfies, Comparator, Operator, RangeError, RangeErrorKind, VersionRange};
pub use validate::{is_numeric, is_valid_identifier, is_valid_metadata};
pub use version::Version;
pub use version_parser::{parse_version, Component, NumberProblem, ParseMode, VersionError};
