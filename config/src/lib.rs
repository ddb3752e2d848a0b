//! # Config Crate
//!
//! Centralized configuration for the OpenSCAD → GLB conversion pipeline.
//! All magic numbers and tunable parameters are defined here to ensure
//! consistency across crates and easy configuration management.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{ConverterConfig, COMPILER_TIMEOUT_SECS};
//!
//! let config = ConverterConfig::default();
//! assert_eq!(config.timeout.as_secs(), COMPILER_TIMEOUT_SECS);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **OpenSCAD Compatible**: Defaults match the `openscad` command line
//! - **No Dependencies**: Plain std types only

pub mod constants;

#[cfg(test)]
mod tests;
