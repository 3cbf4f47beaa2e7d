//! Semantic version values and their precedence rules

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::validate::{is_numeric, is_valid_identifier, is_valid_metadata};
use crate::version_parser::{self, ParseMode, VersionError};

/// An immutable semantic version.
///
/// Equality (`==`) takes build metadata into account, while precedence
/// ([`Version::compare`]) and [`Version::equivalent_to`] ignore it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    major: u64,
    minor: u64,
    patch: u64,
    identifiers: Vec<String>,
    metadata: Vec<String>,
}

impl Version {
    /// Create a version with no pre-release identifiers or metadata
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            identifiers: Vec::new(),
            metadata: Vec::new(),
        }
    }

    /// Create `major.minor.0`
    pub fn major_minor(major: u64, minor: u64) -> Self {
        Version::new(major, minor, 0)
    }

    /// Create a version with pre-release identifiers and build metadata.
    ///
    /// Fails on the first identifier or metadata item that is not valid.
    pub fn with_identifiers<I, M>(
        major: u64,
        minor: u64,
        patch: u64,
        identifiers: I,
        metadata: M,
    ) -> Result<Self, VersionError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
        M: IntoIterator,
        M::Item: Into<String>,
    {
        let identifiers = identifiers
            .into_iter()
            .map(Into::into)
            .map(|id: String| {
                if is_valid_identifier(&id) {
                    Ok(id)
                } else {
                    Err(VersionError::InvalidIdentifier(id))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let metadata = metadata
            .into_iter()
            .map(Into::into)
            .map(|item: String| {
                if is_valid_metadata(&item) {
                    Ok(item)
                } else {
                    Err(VersionError::InvalidMetadata(item))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_validated(major, minor, patch, identifiers, metadata))
    }

    pub(crate) fn from_validated(
        major: u64,
        minor: u64,
        patch: u64,
        identifiers: Vec<String>,
        metadata: Vec<String>,
    ) -> Self {
        Version {
            major,
            minor,
            patch,
            identifiers,
            metadata,
        }
    }

    /// Parse a version string in strict mode
    pub fn parse(version: &str) -> Result<Self, VersionError> {
        version_parser::parse(version, ParseMode::Strict)
    }

    /// Parse a version string using the given mode
    pub fn parse_with(version: &str, mode: ParseMode) -> Result<Self, VersionError> {
        version_parser::parse(version, mode)
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    /// Pre-release identifiers, in the order they were given
    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    /// Build metadata items, in the order they were given
    pub fn metadata(&self) -> &[String] {
        &self.metadata
    }

    /// Check if this is a pre-release version
    pub fn is_prerelease(&self) -> bool {
        !self.identifiers.is_empty()
    }

    /// Compare the precedence of two versions. Build metadata is ignored.
    pub fn compare(&self, other: &Version) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| compare_identifiers(&self.identifiers, &other.identifiers))
    }

    /// Compare two possibly absent versions, where absence has the lowest
    /// precedence of all.
    pub fn compare_opt(left: Option<&Version>, right: Option<&Version>) -> Ordering {
        match (left, right) {
            (Some(left), Some(right)) => left.compare(right),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        }
    }

    /// Check if two versions are equal when build metadata is ignored
    pub fn equivalent_to(&self, other: &Version) -> bool {
        self.major == other.major
            && self.minor == other.minor
            && self.patch == other.patch
            && self.identifiers == other.identifiers
    }

    /// Check if `candidate` can replace this version without introducing
    /// breaking changes.
    pub fn compatible_with(&self, candidate: &Version) -> bool {
        if self.equivalent_to(candidate) {
            return true;
        }

        if self.major != candidate.major {
            return false;
        }

        // Anything may change while the major version is zero
        if self.major == 0 || candidate.major == 0 {
            return false;
        }

        // A pre-release of a later minor or patch is taken to already ship
        // everything this release has.
        if !self.is_prerelease()
            && candidate.is_prerelease()
            && (candidate.minor, candidate.patch) > (self.minor, self.patch)
        {
            return true;
        }

        if self.is_prerelease() || candidate.is_prerelease() {
            return false;
        }

        candidate.compare(self) == Ordering::Greater
    }

    /// Render as `major.minor[.patch][-identifiers]`, leaving out a zero
    /// patch version and all build metadata.
    pub fn concise(&self) -> String {
        self.render_concise(String::new())
    }

    /// Same as [`Version::concise`] with a leading `v`
    pub fn concise_prefixed(&self) -> String {
        self.render_concise(String::from("v"))
    }

    fn render_concise(&self, mut out: String) -> String {
        out.push_str(&format!("{}.{}", self.major, self.minor));
        if self.patch > 0 {
            out.push('.');
            out.push_str(&self.patch.to_string());
        }
        if self.is_prerelease() {
            out.push('-');
            out.push_str(&self.identifiers.join("."));
        }
        out
    }
}

fn compare_identifiers(left: &[String], right: &[String]) -> Ordering {
    match (left.is_empty(), right.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }

    for (l, r) in left.iter().zip(right) {
        if l == r {
            continue;
        }

        return match (is_numeric(l), is_numeric(r)) {
            (true, true) => compare_numeric(l, r),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => l.as_bytes().cmp(r.as_bytes()),
        };
    }

    left.len().cmp(&right.len())
}

/// Compare two digit strings by numeric value, whatever their length
fn compare_numeric(left: &str, right: &str) -> Ordering {
    let left = left.trim_start_matches('0');
    let right = right.trim_start_matches('0');
    left.len().cmp(&right.len()).then_with(|| left.cmp(right))
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    /// Precedence order, with build metadata breaking ties so that the
    /// order agrees with `==`.
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other).then_with(|| self.metadata.cmp(&other.metadata))
    }
}

impl fmt::Display for Version {
    /// `{}` renders the canonical form, `{:#}` adds a `v` prefix
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.write_str("v")?;
        }
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.identifiers.is_empty() {
            write!(f, "-{}", self.identifiers.join("."))?;
        }
        if !self.metadata.is_empty() {
            write!(f, "+{}", self.metadata.join("."))?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Version {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Version {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        Version::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_prerelease_precedence_chain() {
        let chain = [
            "1.0.0-alpha",
            "1.0.0-alpha.1",
            "1.0.0-alpha.beta",
            "1.0.0-beta",
            "1.0.0-beta.2",
            "1.0.0-beta.11",
            "1.0.0-rc.1",
            "1.0.0",
        ];
        for pair in chain.windows(2) {
            assert_eq!(v(pair[0]).compare(&v(pair[1])), Ordering::Less, "{} < {}", pair[0], pair[1]);
            assert_eq!(v(pair[1]).compare(&v(pair[0])), Ordering::Greater, "{} > {}", pair[1], pair[0]);
        }
    }

    #[test]
    fn test_compare_numeric_components() {
        assert_eq!(v("1.0.0").compare(&v("2.0.0")), Ordering::Less);
        assert_eq!(v("2.1.0").compare(&v("2.0.9")), Ordering::Greater);
        assert_eq!(v("2.1.10").compare(&v("2.1.9")), Ordering::Greater);
        assert_eq!(v("1.2.3").compare(&v("1.2.3")), Ordering::Equal);
        assert_eq!(v("1.2.3-rc.1").compare(&v("1.2.3-rc.1")), Ordering::Equal);
    }

    #[test]
    fn test_compare_huge_numeric_identifiers() {
        let small = v("1.0.0-18446744073709551615");
        let big = v("1.0.0-18446744073709551616");
        let bigger = v("1.0.0-100000000000000000000000");
        assert_eq!(small.compare(&big), Ordering::Less);
        assert_eq!(big.compare(&bigger), Ordering::Less);
        assert_eq!(bigger.compare(&v("1.0.0-a")), Ordering::Less);
    }

    #[test]
    fn test_compare_is_ordinal() {
        // Uppercase sorts before lowercase in byte order
        assert_eq!(v("1.0.0-Beta").compare(&v("1.0.0-alpha")), Ordering::Less);
        assert_eq!(v("1.0.0-a-b").compare(&v("1.0.0-a")), Ordering::Greater);
    }

    #[test]
    fn test_compare_ignores_metadata() {
        let a = v("1.0.0-rc.1+build.1");
        let b = v("1.0.0-rc.1+build.2");
        assert_eq!(a.compare(&b), Ordering::Equal);
        assert!(a.equivalent_to(&b));
        assert_ne!(a, b);
        assert_ne!(a.cmp(&b), Ordering::Equal);
    }

    #[test]
    fn test_compare_opt() {
        let version = v("0.0.0-0");
        assert_eq!(Version::compare_opt(Some(&version), None), Ordering::Greater);
        assert_eq!(Version::compare_opt(None, Some(&version)), Ordering::Less);
        assert_eq!(Version::compare_opt(None, None), Ordering::Equal);
        assert_eq!(Version::compare_opt(Some(&version), Some(&version)), Ordering::Equal);
    }

    #[test]
    fn test_equivalent_to_is_order_sensitive() {
        assert!(!v("1.0.0-a.b").equivalent_to(&v("1.0.0-b.a")));
        assert!(!v("1.0.0-a").equivalent_to(&v("1.0.0")));
        assert!(v("1.0.0+x").equivalent_to(&v("1.0.0")));
    }

    #[test]
    fn test_compatible_with() {
        assert!(v("1.0.0").compatible_with(&v("1.1.0")));
        assert!(!v("1.1.0").compatible_with(&v("1.0.0")));
        assert!(v("1.0.0").compatible_with(&v("1.0.0+build")));
        assert!(!v("1.0.0").compatible_with(&v("2.0.0")));

        // Unstable major versions
        assert!(!v("0.1.0").compatible_with(&v("0.2.0")));
        assert!(!v("0.1.0").compatible_with(&v("0.1.1")));
        assert!(v("0.1.0").compatible_with(&v("0.1.0")));

        // Pre-release of a later minor/patch
        assert!(v("1.0.0").compatible_with(&v("1.1.0-alpha")));
        assert!(v("1.0.0").compatible_with(&v("1.0.1-rc.1")));
        assert!(!v("1.1.0").compatible_with(&v("1.1.0-rc.1")));
        assert!(!v("1.1.0").compatible_with(&v("1.0.5-rc.1")));

        // Pre-release base
        assert!(!v("1.0.0-rc.1").compatible_with(&v("1.0.0")));
        assert!(!v("1.0.0-rc.1").compatible_with(&v("1.0.0-rc.2")));
        assert!(v("1.0.0-rc.1").compatible_with(&v("1.0.0-rc.1")));
    }

    #[test]
    fn test_with_identifiers() {
        let version = Version::with_identifiers(1, 3, 0, ["rc", "1"], ["20150925", "1"]).unwrap();
        assert_eq!(version.to_string(), "1.3.0-rc.1+20150925.1");

        assert_eq!(
            Version::with_identifiers(0, 0, 0, ["0150"], Vec::<String>::new()),
            Err(VersionError::InvalidIdentifier("0150".to_string()))
        );
        assert_eq!(
            Version::with_identifiers(0, 0, 0, Vec::<String>::new(), ["Löffel"]),
            Err(VersionError::InvalidMetadata("Löffel".to_string()))
        );
        assert_eq!(
            Version::with_identifiers(0, 0, 0, [""], Vec::<String>::new()),
            Err(VersionError::InvalidIdentifier(String::new()))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Version::new(1, 0, 0).to_string(), "1.0.0");
        assert_eq!(v("1.2.0-rc.1").to_string(), "1.2.0-rc.1");
        assert_eq!(format!("{:#}", v("1.3.1-rc.1+20150925.1")), "v1.3.1-rc.1+20150925.1");
    }

    #[test]
    fn test_concise() {
        assert_eq!(v("1.0.0").concise(), "1.0");
        assert_eq!(v("1.1.1").concise(), "1.1.1");
        assert_eq!(v("1.2.0-rc.1").concise(), "1.2-rc.1");
        assert_eq!(v("1.3.1-rc.1+20150925.1").concise(), "1.3.1-rc.1");
    }

    #[test]
    fn test_concise_prefixed() {
        assert_eq!(v("1.0.0").concise_prefixed(), "v1.0");
        assert_eq!(v("1.1.1").concise_prefixed(), "v1.1.1");
        assert_eq!(v("1.2.0-rc.1").concise_prefixed(), "v1.2-rc.1");
        assert_eq!(v("1.3.1-rc.1+20150925.1").concise_prefixed(), "v1.3.1-rc.1");
    }

    #[test]
    fn test_major_minor() {
        let version = Version::major_minor(1, 2);
        assert_eq!(version, v("1.2.0"));
        assert_eq!(version.patch(), 0);
        assert!(!version.is_prerelease());
    }

    #[test]
    fn test_sort_uses_precedence() {
        let mut versions = vec![v("1.0.0"), v("1.0.0-rc.1"), v("0.9.0"), v("1.0.0-beta.11"), v("1.0.0-beta.2")];
        versions.sort();
        let sorted: Vec<String> = versions.iter().map(ToString::to_string).collect();
        assert_eq!(sorted, ["0.9.0", "1.0.0-beta.2", "1.0.0-beta.11", "1.0.0-rc.1", "1.0.0"]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_round_trip() {
        let version = v("1.2.3-rc.1+build");
        let json = serde_json::to_string(&version).unwrap();
        assert_eq!(json, "\"1.2.3-rc.1+build\"");
        assert_eq!(serde_json::from_str::<Version>(&json).unwrap(), version);
        assert!(serde_json::from_str::<Version>("\"1.2\"").is_err());
    }
}
