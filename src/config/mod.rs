//! Stage configuration and constants.
//!
//! This module provides:
//! - Configuration constants (defaults, sample configuration)
//! - The TOML-backed [`GeoIpConfig`] and its [`LookupSpec`] entries
//! - CLI logging option types

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{
    ConfigValidationError, GeoIpConfig, HostOptions, LogFormat, LogLevel, LookupSpec,
};
