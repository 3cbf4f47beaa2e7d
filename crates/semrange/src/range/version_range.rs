//! Parsed range expressions and their evaluation

use std::fmt;
use std::str::FromStr;

use super::parser::{parse_range, RangeError};
use super::Comparator;
use crate::version::Version;

/// A disjunction of comparator sets.
///
/// A version satisfies the range when it satisfies every comparator of at
/// least one set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionRange {
    sets: Vec<Vec<Comparator>>,
}

impl VersionRange {
    /// Parse a range string
    pub fn parse(range: &str) -> Result<Self, RangeError> {
        parse_range(range)
    }

    /// Build a range from comparator sets. Every set must hold at least one
    /// comparator, and there must be at least one set.
    pub fn from_sets(sets: Vec<Vec<Comparator>>) -> Result<Self, RangeError> {
        if sets.is_empty() || sets.iter().any(Vec::is_empty) {
            return Err(RangeError::EmptySet);
        }
        Ok(Self::from_validated(sets))
    }

    pub(crate) fn from_validated(sets: Vec<Vec<Comparator>>) -> Self {
        VersionRange { sets }
    }

    /// The comparator sets, in the order they were written
    pub fn sets(&self) -> &[Vec<Comparator>] {
        &self.sets
    }

    /// Check if a version satisfies this range
    pub fn satisfies(&self, version: &Version) -> bool {
        self.sets
            .iter()
            .any(|set| set.iter().all(|comparator| comparator.matches(version)))
    }

    /// Check if any of the versions satisfies this range
    pub fn any_satisfies<'v, I>(&self, versions: I) -> bool
    where
        I: IntoIterator<Item = &'v Version>,
    {
        versions.into_iter().any(|version| self.satisfies(version))
    }

    /// Check if all of the versions satisfy this range. Vacuously true for
    /// no versions.
    pub fn all_satisfy<'v, I>(&self, versions: I) -> bool
    where
        I: IntoIterator<Item = &'v Version>,
    {
        versions.into_iter().all(|version| self.satisfies(version))
    }

    /// Return the satisfying versions, in their original order
    pub fn filter_satisfying<'v, I>(&self, versions: I) -> Vec<&'v Version>
    where
        I: IntoIterator<Item = &'v Version>,
    {
        versions.into_iter().filter(|version| self.satisfies(version)).collect()
    }

    /// Return the satisfying version with the highest precedence.
    ///
    /// Of several satisfying versions with equal precedence, the last one
    /// given wins.
    pub fn max_satisfying<'v, I>(&self, versions: I) -> Option<&'v Version>
    where
        I: IntoIterator<Item = &'v Version>,
    {
        versions
            .into_iter()
            .filter(|version| self.satisfies(version))
            .max_by(|a, b| a.compare(b))
    }

    /// Return the satisfying version with the lowest precedence.
    ///
    /// Of several satisfying versions with equal precedence, the first one
    /// given wins.
    pub fn min_satisfying<'v, I>(&self, versions: I) -> Option<&'v Version>
    where
        I: IntoIterator<Item = &'v Version>,
    {
        versions
            .into_iter()
            .filter(|version| self.satisfies(version))
            .min_by(|a, b| a.compare(b))
    }
}

/// Check if `version` satisfies `range`
pub fn satisfies(range: &VersionRange, version: &Version) -> bool {
    range.satisfies(version)
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, set) in self.sets.iter().enumerate() {
            if i > 0 {
                f.write_str(" || ")?;
            }
            for (j, comparator) in set.iter().enumerate() {
                if j > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{}", comparator)?;
            }
        }
        Ok(())
    }
}

impl FromStr for VersionRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_range(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for VersionRange {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for VersionRange {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        parse_range(&s).map_err(serde::de::Error::custom)
    }
}
