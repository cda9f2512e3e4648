//! ico3d terminal tool - view, inspect and export icospheres
//!
//! Controls in `view`:
//!   - WASD / Arrow Keys: Rotate the sphere
//!   - +/-: More or less subdivision
//!   - T: Toggle Lambert / UV checker shading
//!   - Space: Pause spinning
//!   - Q/ESC: Quit
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use ico3d_core::{stl, IcoSphereGeometry, IcoSphereParams, Mesh, DEFAULT_MAX_ITERATIONS};
use ico3d_terminal::{TerminalApp, Viewer};
use log::info;

#[derive(Parser, Debug)]
#[command(name = "ico3d-terminal", version, about = "Icosphere generation tools")]
struct Cli {
    /// Log verbosity level.
    #[arg(long, value_enum, global = true, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Spin the sphere in the terminal
    View {
        #[command(flatten)]
        sphere: SphereArgs,
    },
    /// Print vertex, triangle and seam statistics
    Stats {
        #[command(flatten)]
        sphere: SphereArgs,
    },
    /// Write the sphere as an STL file
    Export {
        #[command(flatten)]
        sphere: SphereArgs,
        /// Output file path.
        #[arg(long, value_name = "FILE", default_value = "icosphere.stl")]
        out: PathBuf,
        /// Write ASCII STL instead of binary.
        #[arg(long)]
        ascii: bool,
    },
}

#[derive(Args, Debug)]
struct SphereArgs {
    /// Subdivision passes applied to the icosahedron.
    #[arg(long, short, default_value_t = 2)]
    iterations: u32,
    /// Refuse iteration counts above this.
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: u32,
}

impl SphereArgs {
    fn params(&self) -> IcoSphereParams {
        IcoSphereParams::new()
            .with_iterations(self.iterations)
            .with_max_iterations(self.max_iterations)
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

fn init_logger(level: LogLevel) {
    let mut builder = env_logger::Builder::new();
    builder.target(env_logger::Target::Stderr);
    builder.filter_level(level.into());
    builder.parse_default_env();

    if let Err(err) = builder.try_init() {
        eprintln!("Failed to initialize logger: {}", err);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_level);

    match cli.cmd {
        Command::View { sphere } => {
            let viewer = Viewer::new(sphere.params()).context("Failed to generate icosphere")?;
            let mut app = TerminalApp::new(viewer)?;
            app.run()?;
        }
        Command::Stats { sphere } => {
            let geometry = IcoSphereGeometry::generate(&sphere.params())
                .context("Failed to generate icosphere")?;
            print_stats(&geometry, &mut io::stdout().lock())?;
        }
        Command::Export { sphere, out, ascii } => {
            let geometry = IcoSphereGeometry::generate(&sphere.params())
                .context("Failed to generate icosphere")?;
            let mesh = Mesh::from(&geometry);
            let name = format!("icosphere_{}", geometry.iterations());

            let file = File::create(&out)
                .with_context(|| format!("Failed to create {}", out.display()))?;
            let mut writer = BufWriter::new(file);
            if ascii {
                stl::write_ascii_stl(&mesh, &name, &mut writer)?;
            } else {
                stl::write_binary_stl(&mesh, &name, &mut writer)?;
            }
            writer.flush()?;
            info!("Exported {} to {}", geometry, out.display());
        }
    }

    Ok(())
}

fn print_stats<W: Write>(geometry: &IcoSphereGeometry, out: &mut W) -> io::Result<()> {
    writeln!(out, "iterations:           {}", geometry.iterations())?;
    writeln!(out, "vertices:             {}", geometry.vertex_count())?;
    writeln!(out, "  added:              {}", geometry.added_vertex_count())?;
    writeln!(out, "triangles:            {}", geometry.triangle_count())?;
    writeln!(out, "  from subdivision:   {}", geometry.subdivided_triangle_count())?;
    writeln!(out, "  seam duplicates:    {}", geometry.seam_triangle_count())?;
    writeln!(out, "position floats:      {}", geometry.positions().len())?;
    writeln!(out, "normal floats:        {}", geometry.normals().len())?;
    writeln!(out, "tex coord floats:     {}", geometry.tex_coords().len())?;
    Ok(())
}
