//! Optional memoization of parsed versions and ranges

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::range::{parse_range, RangeError, VersionRange};
use crate::version::Version;
use crate::version_parser::{self, ParseMode, VersionError};

/// A cache of parse results, keyed by input string.
///
/// The cache is owned by its caller and can be shared between threads, for
/// example behind an `Arc`. Only successful parses are stored.
#[derive(Debug, Default)]
pub struct ParseCache {
    versions: RwLock<HashMap<String, Arc<Version>>>,
    ranges: RwLock<HashMap<String, Arc<VersionRange>>>,
}

impl ParseCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a version string in strict mode, reusing an earlier result
    pub fn version(&self, input: &str) -> Result<Arc<Version>, VersionError> {
        lookup_or_insert(&self.versions, input, |s| version_parser::parse(s, ParseMode::Strict))
    }

    /// Parse a range string, reusing an earlier result
    pub fn range(&self, input: &str) -> Result<Arc<VersionRange>, RangeError> {
        lookup_or_insert(&self.ranges, input, parse_range)
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        read_len(&self.versions) + read_len(&self.ranges)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all cached entries
    pub fn clear(&self) {
        write_clear(&self.versions);
        write_clear(&self.ranges);
    }
}

fn lookup_or_insert<T, E>(
    map: &RwLock<HashMap<String, Arc<T>>>,
    input: &str,
    parse: impl FnOnce(&str) -> Result<T, E>,
) -> Result<Arc<T>, E> {
    // A poisoned lock still holds complete entries, since values are only
    // inserted once fully built.
    let cached = map
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .get(input)
        .cloned();
    if let Some(value) = cached {
        log::trace!("parse cache hit for {:?}", input);
        return Ok(value);
    }

    log::trace!("parse cache miss for {:?}", input);
    let value = Arc::new(parse(input)?);

    let mut map = map.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    // Another thread may have raced us here; keep whichever landed first
    let value = map.entry(input.to_string()).or_insert(value).clone();
    Ok(value)
}

fn read_len<T>(map: &RwLock<HashMap<String, T>>) -> usize {
    map.read().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
}

fn write_clear<T>(map: &RwLock<HashMap<String, T>>) {
    map.write().unwrap_or_else(|poisoned| poisoned.into_inner()).clear();
}
