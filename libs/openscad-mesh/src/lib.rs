//! # OpenSCAD Mesh
//!
//! In-memory polygon mesh shared by every stage of the conversion pipeline,
//! plus the axis remap applied between parsing and export.
//!
//! ## Architecture
//!
//! ```text
//! openscad-off (parse) → Mesh → transform::z_up_to_y_up → Mesh → openscad-glb
//! ```
//!
//! Faces stay polygons (triangles, quads, n-gons) until the exporter needs
//! triangles, so the parser and the transform stay format-agnostic.
//!
//! ## Usage
//!
//! ```rust
//! use glam::DVec3;
//! use openscad_mesh::{transform, Mesh, MeshColors};
//!
//! let mesh = Mesh::new(
//!     vec![DVec3::ZERO, DVec3::X, DVec3::Y],
//!     vec![vec![0, 1, 2]],
//!     MeshColors::None,
//! )?;
//! let y_up = transform::z_up_to_y_up(&mesh);
//! assert_eq!(y_up.vertices()[2], DVec3::NEG_Z);
//! # Ok::<(), openscad_mesh::MeshError>(())
//! ```

pub mod color;
pub mod error;
pub mod mesh;
pub mod transform;

pub use color::{Color, MeshColors};
pub use error::{MeshError, MeshResult};
pub use mesh::{Face, Mesh};
