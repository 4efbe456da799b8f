//! Validated short code newtype.

use serde::{Serialize, Serializer};
use std::fmt;

/// Number of characters in every short code.
pub const SHORT_CODE_LENGTH: usize = 6;

/// A 6-character code drawn from `[A-Za-z0-9]`.
///
/// Codes are immutable once assigned. Anything that fails [`ShortCode::parse`]
/// can never exist in the registry, so callers may treat it as not found
/// without a store round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShortCode(String);

impl ShortCode {
    /// Parses a raw path segment into a short code.
    ///
    /// Returns `None` unless `raw` is exactly [`SHORT_CODE_LENGTH`] ASCII
    /// alphanumeric characters.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.len() == SHORT_CODE_LENGTH && raw.bytes().all(|b| b.is_ascii_alphanumeric()) {
            Some(Self(raw.to_string()))
        } else {
            None
        }
    }

    /// Wraps a string the caller has already produced from the code alphabet.
    pub(crate) fn new_unchecked(code: String) -> Self {
        debug_assert!(Self::parse(&code).is_some(), "invalid short code: {code}");
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ShortCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for ShortCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
