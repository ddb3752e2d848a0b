//! # OpenSCAD Convert
//!
//! Turns OpenSCAD source text into a GLB asset by running the external
//! `openscad` compiler and feeding its OFF output through the mesh pipeline.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use config::constants::ConverterConfig;
//! use openscad_convert::{ConversionError, Converter};
//!
//! # async fn run() -> Result<(), ConversionError> {
//! let converter = Converter::new(ConverterConfig::default()).expect("valid config");
//! match converter.convert("color(\"red\") cube(5);").await {
//!     Ok(output) => println!("{} vertices, {} bytes", output.vertex_count, output.asset.len()),
//!     Err(err) => eprintln!("failed at {}: {err}", err.stage()),
//! }
//! # Ok(())
//! # }
//! ```

pub mod compiler;
pub mod converter;
pub mod error;
pub mod request;

pub use converter::{ConversionOutput, Converter};
pub use error::{ConversionError, ConversionResult, FailureReason};
pub use request::{RequestId, ScratchFiles};
