//! PostgreSQL repository implementations.
//!
//! - [`PgUrlMappingRepository`] - Code registry backed by the `urls` table

pub mod pg_url_mapping_repository;

pub use pg_url_mapping_repository::PgUrlMappingRepository;
