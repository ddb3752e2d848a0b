//! # OpenSCAD GLB
//!
//! Writes [`openscad_mesh::Mesh`] values as binary glTF 2.0 (`.glb`) and reads
//! them back for verification.
//!
//! ## Layout
//!
//! One scene, one node, one mesh with a single indexed triangle primitive
//! and one buffer embedded in the `BIN` chunk:
//!
//! ```text
//! BIN: POSITION (VEC3 f32) | COLOR_0 (VEC4 f32, optional) | indices (u8/u16/u32)
//! ```
//!
//! No normals are written; viewers derive flat normals from the triangles.
//!
//! ## Usage
//!
//! ```rust
//! use glam::DVec3;
//! use openscad_glb::{export_glb, inspect};
//! use openscad_mesh::{Color, Mesh, MeshColors};
//!
//! let quad = Mesh::new(
//!     vec![DVec3::ZERO, DVec3::X, DVec3::new(1.0, 1.0, 0.0), DVec3::Y],
//!     vec![vec![0, 1, 2, 3]],
//!     MeshColors::PerFace(vec![Color::rgb(1.0, 0.0, 0.0)]),
//! )?;
//! let glb = export_glb(&quad)?;
//! assert_eq!(&glb[..4], b"glTF");
//!
//! let summary = inspect(&glb)?;
//! assert_eq!(summary.triangle_count, 2);
//! assert!(summary.has_colors);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod buffers;
pub mod container;
pub mod document;
pub mod error;
pub mod export;
pub mod inspect;
pub mod triangulate;

pub use buffers::GeometryBuffers;
pub use error::{ExportError, ExportResult};
pub use export::{export_glb, index_component_type};
pub use inspect::{inspect, GlbSummary};
