//! Application glue module
//!
//! Configuration loading and validation.

mod config;

pub use config::{Config, ConfigError};
