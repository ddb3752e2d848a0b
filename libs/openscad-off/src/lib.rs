//! # OpenSCAD OFF
//!
//! Reader and writer for the Object File Format meshes produced by
//! `openscad -o model.off model.scad`.
//!
//! ## Usage
//!
//! ```rust
//! use openscad_off::parse_off;
//!
//! let mesh = parse_off("OFF\n4 1 0\n0 0 0\n1 0 0\n1 1 0\n0 1 0\n4 0 1 2 3\n")?;
//! assert_eq!(mesh.face_count(), 1);
//! assert_eq!(mesh.faces()[0].len(), 4); // quads stay quads
//! # Ok::<(), openscad_off::OffError>(())
//! ```

pub mod error;
pub mod parser;
pub mod writer;

pub use error::{OffError, OffErrorKind, OffResult};
pub use parser::parse_off;
pub use writer::write_off;
