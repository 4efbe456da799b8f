//! Short code generation.
//!
//! Codes are 6 independent, uniform draws over the 62-symbol alphabet
//! `[A-Za-z0-9]`, giving 62^6 (about 56.8 billion) possible codes. There is no
//! checksum and no sequential component; uniqueness is established against
//! the registry by the caller.

use rand::Rng;
use rand::distr::Alphanumeric;

use crate::domain::entities::{SHORT_CODE_LENGTH, ShortCode};

/// Codes that would shadow a fixed route.
///
/// `GET /health` is routed before `GET /{short_code}`, so a mapping with this
/// code could never be resolved.
pub const RESERVED_CODES: &[&str] = &["health"];

/// Draws one random candidate code.
///
/// The candidate is not checked against the registry.
pub fn generate_code() -> ShortCode {
    let mut rng = rand::rng();

    loop {
        let candidate: String = (&mut rng)
            .sample_iter(Alphanumeric)
            .take(SHORT_CODE_LENGTH)
            .map(char::from)
            .collect();

        if !is_reserved(&candidate) {
            return ShortCode::new_unchecked(candidate);
        }
    }
}

/// Returns true if `code` collides with a route segment.
pub fn is_reserved(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}
