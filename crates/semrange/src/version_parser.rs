//! Version string parsing

use std::fmt;
use thiserror::Error;

use crate::validate::{is_valid_identifier, is_valid_metadata, is_version_char};
use crate::version::Version;

/// Controls which optional syntax the version parser accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParseMode {
    /// Only `major.minor.patch[-pre][+meta]`
    #[default]
    Strict,
    /// Additionally accept a single leading `v` or `V`
    AllowPrefix,
}

impl ParseMode {
    fn allows_prefix(self) -> bool {
        matches!(self, ParseMode::AllowPrefix)
    }
}

/// The numeric components of a version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    Major,
    Minor,
    Patch,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Component::Major => "major",
            Component::Minor => "minor",
            Component::Patch => "patch",
        };
        f.write_str(name)
    }
}

/// Why a numeric component was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberProblem {
    NonNumeric,
    Overflow,
    LeadingZero,
}

impl fmt::Display for NumberProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            NumberProblem::NonNumeric => "not a number",
            NumberProblem::Overflow => "too large",
            NumberProblem::LeadingZero => "leading zeros are not allowed",
        };
        f.write_str(reason)
    }
}

/// Error type for version parsing and construction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("The version string cannot be empty or composed entirely of whitespace")]
    Empty,
    #[error("Invalid character {0:?} in version string")]
    InvalidCharacter(char),
    #[error("The version string must have exactly three numeric components")]
    Malformed,
    #[error("Invalid {component} version \"{value}\": {problem}")]
    InvalidNumber {
        component: Component,
        value: String,
        problem: NumberProblem,
    },
    #[error("Invalid pre-release identifier \"{0}\"")]
    InvalidIdentifier(String),
    #[error("Invalid build metadata item \"{0}\"")]
    InvalidMetadata(String),
}

/// Parse a version string in strict mode
pub fn parse_version(input: &str) -> Result<Version, VersionError> {
    parse(input, ParseMode::Strict)
}

/// Parse a version string using the given mode
pub fn parse(input: &str, mode: ParseMode) -> Result<Version, VersionError> {
    let result = parse_inner(input, mode);
    if let Err(ref err) = result {
        log::debug!("Rejected version {:?} ({:?}): {}", input, mode, err);
    }
    result
}

fn parse_inner(input: &str, mode: ParseMode) -> Result<Version, VersionError> {
    let version = input.trim();
    if version.is_empty() {
        return Err(VersionError::Empty);
    }

    if let Some(c) = version.chars().find(|c| !is_version_char(*c)) {
        return Err(VersionError::InvalidCharacter(c));
    }

    let version = match version.strip_prefix(['v', 'V']) {
        Some(rest) if mode.allows_prefix() => rest,
        _ => version,
    };

    // Metadata is everything after the first '+', so any '+' left in it
    // fails item validation below.
    let (head, metadata) = match version.split_once('+') {
        Some((head, metadata)) => (head, Some(metadata)),
        None => (version, None),
    };

    let (core, identifiers) = match head.split_once('-') {
        Some((core, identifiers)) => (core, Some(identifiers)),
        None => (head, None),
    };

    let parts: Vec<&str> = core.split('.').collect();
    if parts.len() != 3 {
        return Err(VersionError::Malformed);
    }

    let major = parse_number(Component::Major, parts[0])?;
    let minor = parse_number(Component::Minor, parts[1])?;
    let patch = parse_number(Component::Patch, parts[2])?;

    let identifiers = match identifiers {
        Some(identifiers) => split_items(identifiers, is_valid_identifier, VersionError::InvalidIdentifier)?,
        None => Vec::new(),
    };
    let metadata = match metadata {
        Some(metadata) => split_items(metadata, is_valid_metadata, VersionError::InvalidMetadata)?,
        None => Vec::new(),
    };

    Ok(Version::from_validated(major, minor, patch, identifiers, metadata))
}

fn parse_number(component: Component, value: &str) -> Result<u64, VersionError> {
    let error = |problem| VersionError::InvalidNumber {
        component,
        value: value.to_string(),
        problem,
    };

    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(error(NumberProblem::NonNumeric));
    }
    if value.len() > 1 && value.starts_with('0') {
        return Err(error(NumberProblem::LeadingZero));
    }

    value.parse::<u64>().map_err(|_| error(NumberProblem::Overflow))
}

fn split_items(
    items: &str,
    is_valid: fn(&str) -> bool,
    invalid: fn(String) -> VersionError,
) -> Result<Vec<String>, VersionError> {
    items
        .split('.')
        .map(|item| {
            if is_valid(item) {
                Ok(item.to_string())
            } else {
                Err(invalid(item.to_string()))
            }
        })
        .collect()
}
