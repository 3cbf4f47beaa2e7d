//! Range expressions: parsing, comparators and evaluation

mod comparator;
mod operator;
mod parser;
mod version_range;

pub use comparator::Comparator;
pub use operator::Operator;
pub use parser::{parse_range, RangeError, RangeErrorKind};
pub use version_range::{satisfies, VersionRange};
