//! Configuration module for msgwire.
//!
//! Handles loading and validating messaging configuration from TOML files.

mod settings;

pub use settings::*;
