//! A single operator + version constraint

use std::fmt;

use super::Operator;
use crate::version::Version;

/// One atomic constraint, such as `>=1.2.3`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Comparator {
    operator: Operator,
    version: Version,
}

impl Comparator {
    pub fn new(operator: Operator, version: Version) -> Self {
        Comparator { operator, version }
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Check if `candidate` satisfies this comparator
    pub fn matches(&self, candidate: &Version) -> bool {
        self.operator.test(candidate.compare(&self.version))
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator, self.version)
    }
}
