//! scad2glb: OpenSCAD to GLB converter
//!
//! # Commands
//!
//! - `scad2glb convert <INPUT.scad>` - compile with `openscad`, write `.glb`
//! - `scad2glb off-to-glb <INPUT.off>` - convert an existing OFF mesh
//! - `scad2glb inspect <FILE.glb>` - print a JSON summary of a GLB file
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`
//! (e.g. `RUST_LOG=debug scad2glb convert model.scad`).

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Convert OpenSCAD models to binary glTF
#[derive(Parser)]
#[command(name = "scad2glb")]
#[command(about = "Convert OpenSCAD models to binary glTF (.glb)", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile an OpenSCAD file and export the mesh as GLB
    Convert {
        /// OpenSCAD source file
        #[arg(name = "INPUT")]
        input: PathBuf,

        /// Output file (defaults to INPUT with a .glb extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// OpenSCAD executable (overrides SCAD2GLB_OPENSCAD)
        #[arg(long)]
        openscad: Option<PathBuf>,

        /// Extra argument passed to OpenSCAD before `-o`, repeatable
        #[arg(long = "openscad-arg", allow_hyphen_values = true)]
        openscad_args: Vec<String>,

        /// Compiler timeout in seconds (overrides SCAD2GLB_TIMEOUT_SECS)
        #[arg(long)]
        timeout: Option<u64>,

        /// Print conversion metadata as JSON on stdout
        #[arg(long)]
        metadata: bool,
    },

    /// Convert an OFF mesh (Z-up) to GLB (Y-up)
    OffToGlb {
        /// OFF mesh file
        #[arg(name = "INPUT")]
        input: PathBuf,

        /// Output file (defaults to INPUT with a .glb extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the Y-up mesh as OFF to this path
        #[arg(long)]
        dump_off: Option<PathBuf>,
    },

    /// Print a JSON summary of a GLB file
    Inspect {
        /// GLB file
        #[arg(name = "FILE")]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            openscad,
            openscad_args,
            timeout,
            metadata,
        } => commands::convert(commands::ConvertArgs {
            input,
            output,
            openscad,
            openscad_args,
            timeout,
            metadata,
        }),
        Commands::OffToGlb {
            input,
            output,
            dump_off,
        } => commands::off_to_glb(&input, output, dump_off.as_deref()),
        Commands::Inspect { file } => commands::inspect(&file),
    }
}
