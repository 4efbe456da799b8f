//! Infrastructure layer for external integrations.
//!
//! # Modules
//!
//! - [`cache`] - Resolution cache (Redis and in-process implementations)
//! - [`persistence`] - PostgreSQL code registry

pub mod cache;
pub mod persistence;
