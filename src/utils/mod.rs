//! Utility functions.
//!
//! - [`code_generator`] - Random short code generation

pub mod code_generator;
