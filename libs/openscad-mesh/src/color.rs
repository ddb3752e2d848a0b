//! # Mesh Colors
//!
//! Normalized RGBA colors and their binding to mesh elements.

use config::constants::COLOR_BYTE_MAX;

/// An RGBA color with every component normalized to `[0, 1]`.
///
/// # Example
///
/// ```rust
/// use openscad_mesh::Color;
///
/// let red = Color::rgb(1.0, 0.0, 0.0);
/// assert_eq!(red.a, 1.0);
/// assert_eq!(Color::from_bytes(255, 0, 0, 255), red);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Opaque white, the neutral multiplier for vertex colors.
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);

    /// Creates an opaque color.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Creates a color with explicit alpha.
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from 0–255 components.
    pub fn from_bytes(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgba(
            f32::from(r) / COLOR_BYTE_MAX,
            f32::from(g) / COLOR_BYTE_MAX,
            f32::from(b) / COLOR_BYTE_MAX,
            f32::from(a) / COLOR_BYTE_MAX,
        )
    }

    /// Returns the components as `[r, g, b, a]`.
    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Returns true when the color is not fully opaque.
    #[inline]
    pub fn is_translucent(self) -> bool {
        self.a < 1.0
    }

    /// Bit pattern usable as a hash key.
    #[inline]
    pub fn to_bits(self) -> [u32; 4] {
        self.to_array().map(f32::to_bits)
    }
}

impl From<[f32; 4]> for Color {
    fn from(c: [f32; 4]) -> Self {
        Self::rgba(c[0], c[1], c[2], c[3])
    }
}

/// Colors attached to a mesh, with their association made explicit.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MeshColors {
    /// Untextured mesh.
    #[default]
    None,
    /// One color per vertex, in vertex order.
    PerVertex(Vec<Color>),
    /// One color per face, in face order.
    PerFace(Vec<Color>),
}

impl MeshColors {
    /// Number of color records.
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All color records regardless of binding.
    pub fn as_slice(&self) -> &[Color] {
        match self {
            MeshColors::None => &[],
            MeshColors::PerVertex(colors) | MeshColors::PerFace(colors) => colors,
        }
    }

    /// Name of the binding, for diagnostics.
    pub fn binding(&self) -> &'static str {
        match self {
            MeshColors::None => "none",
            MeshColors::PerVertex(_) => "vertex",
            MeshColors::PerFace(_) => "face",
        }
    }

    /// Returns true when any color is not fully opaque.
    pub fn has_translucency(&self) -> bool {
        self.as_slice().iter().any(|c| c.is_translucent())
    }
}
