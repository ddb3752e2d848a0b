//! # Converter
//!
//! Runs one request through the pipeline:
//!
//! ```text
//! Received → CompilerInvoked → MeshParsed → Transformed → Exported → Complete
//!     └───────────────┴──────────────┴────────────┴───────────┴──→ Failed
//! ```
//!
//! Requests share nothing but the scratch directory, where each one owns
//! two uniquely named files for its lifetime.

use config::constants::{ConfigError, ConverterConfig, SCRATCH_FILE_PREFIX};
use openscad_glb::export_glb;
use openscad_mesh::transform::z_up_to_y_up;
use openscad_off::parse_off;
use pipeline_types::{ConversionMetadata, Stage};
use tracing::info;

use crate::compiler::run_compiler;
use crate::error::{ConversionError, ConversionResult};
use crate::request::Request;

/// Result of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOutput {
    /// Vertices in the compiler's mesh.
    pub vertex_count: usize,
    /// Polygon faces in the compiler's mesh, before triangulation.
    pub face_count: usize,
    /// Color entries in the compiler's mesh.
    pub color_count: usize,
    /// Length of the source text in bytes.
    pub source_length: usize,
    /// The GLB file.
    pub asset: Vec<u8>,
}

impl ConversionOutput {
    /// Serializable summary for API replies.
    pub fn metadata(&self) -> ConversionMetadata {
        ConversionMetadata {
            vertices: self.vertex_count,
            faces: self.face_count,
            colors: self.color_count,
            glb_size: self.asset.len(),
            source_length: self.source_length,
        }
    }
}

/// OpenSCAD source to GLB converter.
///
/// A converter holds only its configuration, so one instance can serve any
/// number of concurrent [`convert`](Converter::convert) calls.
///
/// # Examples
/// ```no_run
/// use config::constants::ConverterConfig;
/// use openscad_convert::Converter;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let converter = Converter::new(ConverterConfig::default())?;
/// let output = converter.convert("cube(10);").await?;
/// std::fs::write("cube.glb", &output.asset)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Converter {
    config: ConverterConfig,
}

impl Converter {
    /// Creates a converter after validating `config`.
    pub fn new(config: ConverterConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Converts OpenSCAD source text to a GLB asset.
    ///
    /// The compiler runs exactly once per call. Scratch files are removed
    /// before this returns, on success and on every failure.
    ///
    /// # Errors
    ///
    /// - [`ConversionError::InvalidInput`] for blank or oversized source,
    ///   before anything touches the filesystem
    /// - [`ConversionError::CompilationFailed`] when the compiler fails,
    ///   times out, cannot start, or writes no mesh
    /// - [`ConversionError::MalformedMesh`] when its output cannot be parsed
    /// - [`ConversionError::EmptyMesh`] when the model has no geometry
    /// - [`ConversionError::Io`] when a scratch file cannot be written or read
    pub async fn convert(&self, source: &str) -> ConversionResult<ConversionOutput> {
        self.check_source(source)?;

        let mut request = Request::new(SCRATCH_FILE_PREFIX, &self.config.scratch_dir);
        let result = self.run(&mut request, source).await;
        match &result {
            Ok(output) => {
                request.advance();
                info!(
                    request = %request.id,
                    stage = %request.stage(),
                    vertices = output.vertex_count,
                    faces = output.face_count,
                    colors = output.color_count,
                    glb_bytes = output.asset.len(),
                    "conversion complete"
                );
            }
            Err(err) => request.fail(err),
        }
        result
    }

    fn check_source(&self, source: &str) -> ConversionResult<()> {
        if source.trim().is_empty() {
            return Err(ConversionError::InvalidInput(
                "source text is empty".to_string(),
            ));
        }
        if source.len() > self.config.max_source_bytes {
            return Err(ConversionError::InvalidInput(format!(
                "source text is {} bytes, limit is {}",
                source.len(),
                self.config.max_source_bytes
            )));
        }
        Ok(())
    }

    async fn run(&self, request: &mut Request, source: &str) -> ConversionResult<ConversionOutput> {
        let source_path = request.scratch.source().to_path_buf();
        let mesh_path = request.scratch.mesh().to_path_buf();

        tokio::fs::write(&source_path, source)
            .await
            .map_err(|err| ConversionError::io(Stage::Received, &source_path, err))?;

        request.advance();
        run_compiler(&self.config, &source_path, &mesh_path).await?;

        let text = tokio::fs::read_to_string(&mesh_path)
            .await
            .map_err(|err| ConversionError::io(Stage::MeshParsed, &mesh_path, err))?;
        let mesh = parse_off(&text)?;
        if mesh.is_empty() {
            return Err(ConversionError::EmptyMesh {
                vertices: mesh.vertex_count(),
                faces: mesh.face_count(),
            });
        }
        request.advance();

        let mesh = z_up_to_y_up(&mesh);
        request.advance();

        let asset = export_glb(&mesh)?;
        request.advance();

        Ok(ConversionOutput {
            vertex_count: mesh.vertex_count(),
            face_count: mesh.face_count(),
            color_count: mesh.color_count(),
            source_length: source.len(),
            asset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_reports_asset_size() {
        let output = ConversionOutput {
            vertex_count: 8,
            face_count: 6,
            color_count: 0,
            source_length: 9,
            asset: vec![0; 1024],
        };
        let meta = output.metadata();
        assert_eq!(meta.glb_size, 1024);
        assert_eq!(meta.vertices, 8);
        assert_eq!(meta.source_length, 9);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = ConverterConfig::default().with_timeout(std::time::Duration::ZERO);
        assert!(Converter::new(config).is_err());
    }
}
