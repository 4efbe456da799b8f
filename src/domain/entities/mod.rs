//! Core domain entities.
//!
//! - [`UrlMapping`] - A persisted `short_code -> original_url` row
//! - [`NewUrlMapping`] - Input for creating a row
//! - [`ShortCode`] - A 6-character alphanumeric code

pub mod short_code;
pub mod url_mapping;

pub use short_code::{SHORT_CODE_LENGTH, ShortCode};
pub use url_mapping::{NewUrlMapping, UrlMapping};
