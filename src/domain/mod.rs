//! Domain layer containing the mapping model and the registry contract.
//!
//! # Architecture
//!
//! - [`entities`] - [`entities::UrlMapping`] and the validated [`entities::ShortCode`]
//! - [`repositories`] - Registry trait implemented by the infrastructure layer
//!
//! The domain layer has no dependencies on infrastructure or presentation layers.
//! The shorten/resolve protocol itself lives in
//! [`crate::application::services::ShortenerService`].

pub mod entities;
pub mod repositories;
