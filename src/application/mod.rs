//! Application layer services implementing business logic.
//!
//! - [`services::shortener_service::ShortenerService`] - Shorten and resolve workflows

pub mod services;
