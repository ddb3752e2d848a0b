//! Subcommand implementations.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use config::constants::ConverterConfig;
use openscad_convert::Converter;
use openscad_mesh::transform::z_up_to_y_up;
use tracing::info;

/// Options of the `convert` subcommand.
pub struct ConvertArgs {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub openscad: Option<PathBuf>,
    pub openscad_args: Vec<String>,
    pub timeout: Option<u64>,
    pub metadata: bool,
}

/// Compiles `args.input` with OpenSCAD and writes the GLB.
pub fn convert(args: ConvertArgs) -> Result<()> {
    let mut config = ConverterConfig::from_env().context("invalid SCAD2GLB_* environment")?;
    if let Some(program) = args.openscad {
        config = config.with_program(program);
    }
    if !args.openscad_args.is_empty() {
        config = config.with_extra_args(args.openscad_args);
    }
    if let Some(secs) = args.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    let converter = Converter::new(config).context("invalid converter settings")?;

    let source = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let converted = runtime
        .block_on(converter.convert(&source))
        .with_context(|| format!("failed to convert {}", args.input.display()))?;

    let output = output_path(&args.input, args.output);
    write_file(&output, &converted.asset)?;
    info!(
        output = %output.display(),
        vertices = converted.vertex_count,
        faces = converted.face_count,
        "wrote GLB"
    );

    if args.metadata {
        println!("{}", serde_json::to_string_pretty(&converted.metadata())?);
    }
    Ok(())
}

/// Converts an existing OFF mesh without invoking OpenSCAD.
///
/// With `dump_off`, the Y-up mesh is also written back out as OFF.
pub fn off_to_glb(input: &Path, output: Option<PathBuf>, dump_off: Option<&Path>) -> Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let mesh = openscad_off::parse_off(&text)
        .with_context(|| format!("failed to parse {}", input.display()))?;
    let y_up = z_up_to_y_up(&mesh);
    let asset = openscad_glb::export_glb(&y_up)
        .with_context(|| format!("failed to export {}", input.display()))?;

    if let Some(path) = dump_off {
        write_file(path, openscad_off::write_off(&y_up).as_bytes())?;
    }

    let output = output_path(input, output);
    write_file(&output, &asset)?;
    info!(
        output = %output.display(),
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "wrote GLB"
    );
    Ok(())
}

/// Prints the summary of a GLB file as JSON.
pub fn inspect(file: &Path) -> Result<()> {
    let bytes =
        std::fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    let summary = openscad_glb::inspect(&bytes)
        .with_context(|| format!("{} is not a valid GLB file", file.display()))?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn output_path(input: &Path, output: Option<PathBuf>) -> PathBuf {
    output.unwrap_or_else(|| input.with_extension("glb"))
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_swaps_extension() {
        assert_eq!(
            output_path(Path::new("models/cube.scad"), None),
            PathBuf::from("models/cube.glb")
        );
        assert_eq!(
            output_path(Path::new("mesh.off"), Some(PathBuf::from("out/x.glb"))),
            PathBuf::from("out/x.glb")
        );
    }
}
