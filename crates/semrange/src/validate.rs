//! Validation of pre-release identifiers and build metadata items

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Both identifiers and metadata items share the same character class
    static ref COMPONENT_RE: Regex = Regex::new(r"^[0-9A-Za-z-]+$").unwrap();

    static ref NUMERIC_RE: Regex = Regex::new(r"^[0-9]+$").unwrap();
}

/// Check if a string is made up entirely of ASCII digits
pub fn is_numeric(s: &str) -> bool {
    NUMERIC_RE.is_match(s)
}

/// Check if a string is a valid pre-release identifier.
///
/// Numeric identifiers must not carry leading zeros, unless the identifier
/// is exactly `0`.
pub fn is_valid_identifier(s: &str) -> bool {
    if !COMPONENT_RE.is_match(s) {
        return false;
    }

    !(s.len() > 1 && s.starts_with('0') && is_numeric(s))
}

/// Check if a string is a valid build metadata item
pub fn is_valid_metadata(s: &str) -> bool {
    COMPONENT_RE.is_match(s)
}

/// Check if a character may appear anywhere in a version string
pub(crate) fn is_version_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '+'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_metadata() {
        let valid = [
            "001",
            "20130313144700",
            "exp",
            "sha",
            "5114f85",
            "contains-some-hyphens",
            "-leading-hyphen",
            "trailing-hyphen-",
            "-leading-and-trailing-",
        ];
        for item in valid {
            assert!(is_valid_metadata(item), "rejected {:?}", item);
        }
    }

    #[test]
    fn test_invalid_components() {
        let invalid = [
            "",
            " ",
            "infix space",
            " leading space",
            "trailing space ",
            " leading and trailing ",
            "Tür",
            "jalapeño",
            "çava",
            "?",
        ];
        for item in invalid {
            assert!(!is_valid_identifier(item), "accepted identifier {:?}", item);
            assert!(!is_valid_metadata(item), "accepted metadata {:?}", item);
        }
    }

    #[test]
    fn test_identifier_leading_zeros() {
        assert!(is_valid_identifier("0"));
        assert!(is_valid_identifier("00nonnumber"));
        assert!(is_valid_identifier("10"));
        assert!(!is_valid_identifier("0150"));
        assert!(!is_valid_identifier("00"));
        assert!(is_valid_metadata("0150"));
    }

    #[test]
    fn test_is_numeric() {
        assert!(is_numeric("0"));
        assert!(is_numeric("18446744073709551616000"));
        assert!(!is_numeric(""));
        assert!(!is_numeric("1a"));
        assert!(!is_numeric("-1"));
    }
}
