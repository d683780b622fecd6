//! microslice CLI - slice an STL file into g-code.
//!
//! Usage:
//!   microslice <STL_FILE> [GCODE_FILE] [options]
//!
//! Exit codes: 0 on success, 1 on usage errors (missing input, bad
//! options), 2 on processing errors.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use microslice::config::Options;
use microslice::geometry::Point3;
use microslice::pipeline::Pipeline;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

/// A mesh slicer for fused-filament 3D printing
#[derive(Parser, Debug)]
#[command(name = "microslice")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input mesh file (STL)
    #[arg(value_name = "STL_FILE")]
    input: Option<PathBuf>,

    /// Output g-code file [default: the input path with a .gcode extension]
    #[arg(value_name = "GCODE_FILE")]
    output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Load options from a JSON file; flags below override its values
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Thickness of the first layer (µm)
    #[arg(long, value_name = "UM")]
    initial_layer_thickness: Option<i64>,

    /// Thickness of the layers above the first (µm)
    #[arg(long, value_name = "UM")]
    layer_thickness: Option<i64>,

    /// Print speed on the first layer (mm/s)
    #[arg(long, value_name = "MM_S")]
    initial_layer_speed: Option<f64>,

    /// Print speed on the other layers (mm/s)
    #[arg(long, value_name = "MM_S")]
    layer_speed: Option<f64>,

    /// Print speed for the outermost perimeter (mm/s)
    #[arg(long, value_name = "MM_S")]
    outer_perimeter_speed: Option<f64>,

    /// Number of concentric walls
    #[arg(long, value_name = "N")]
    inset_count: Option<usize>,

    /// Overlap between infill and innermost wall, percent of bead width
    #[arg(long, value_name = "PERCENT")]
    infill_overlap_percent: Option<u32>,

    /// Sparse infill density in percent; 0 disables sparse infill
    #[arg(long, value_name = "PERCENT")]
    infill_percent: Option<u32>,

    /// Width of one extruded bead (µm)
    #[arg(long, value_name = "UM")]
    extrusion_width: Option<i64>,

    /// Filament diameter (µm)
    #[arg(long, value_name = "UM")]
    filament_diameter: Option<i64>,

    /// Print bed center x (µm)
    #[arg(long, value_name = "UM")]
    center_x: Option<i64>,

    /// Print bed center y (µm)
    #[arg(long, value_name = "UM")]
    center_y: Option<i64>,

    /// Vertex welding distance in the mesh optimizer (µm)
    #[arg(long, value_name = "UM")]
    meld_distance: Option<i64>,

    /// Endpoint gap bridged when joining open slice polygons (µm)
    #[arg(long, value_name = "UM")]
    join_polygon_snap_distance: Option<i64>,

    /// Closing gap accepted for nearly-closed slice polygons (µm)
    #[arg(long, value_name = "UM")]
    finish_polygon_snap_distance: Option<i64>,
}

impl Cli {
    /// Resolve the effective options: config file first, flags on top.
    fn options(&self) -> Result<Options> {
        let mut options = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config file {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing config file {}", path.display()))?
            }
            None => Options::default(),
        };

        if let Some(v) = self.initial_layer_thickness {
            options.print.initial_layer_thickness = v;
        }
        if let Some(v) = self.layer_thickness {
            options.print.layer_thickness = v;
        }
        if let Some(v) = self.initial_layer_speed {
            options.print.initial_layer_speed = v;
        }
        if let Some(v) = self.layer_speed {
            options.print.layer_speed = v;
        }
        if let Some(v) = self.outer_perimeter_speed {
            options.print.outer_perimeter_speed = v;
        }
        if let Some(v) = self.inset_count {
            options.print.inset_count = v;
        }
        if let Some(v) = self.infill_overlap_percent {
            options.print.infill_overlap_percent = v;
        }
        if let Some(v) = self.infill_percent {
            options.print.infill_percent = v;
        }
        if let Some(v) = self.extrusion_width {
            options.printer.extrusion_width = v;
        }
        if let Some(v) = self.filament_diameter {
            options.filament.filament_diameter = v;
        }
        if let Some(v) = self.center_x {
            options.printer.center = Point3::new(v, options.printer.center.y, 0);
        }
        if let Some(v) = self.center_y {
            options.printer.center = Point3::new(options.printer.center.x, v, 0);
        }
        if let Some(v) = self.meld_distance {
            options.meld_distance = v;
        }
        if let Some(v) = self.join_polygon_snap_distance {
            options.join_polygon_snap_distance = v;
        }
        if let Some(v) = self.finish_polygon_snap_distance {
            options.finish_polygon_snap_distance = v;
        }

        options
            .validate()
            .map_err(|e| anyhow::anyhow!(e))
            .context("invalid options")?;
        Ok(options)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.debug {
        LevelFilter::Debug
    } else if cli.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    let Some(input) = cli.input.clone() else {
        eprintln!("the STL_FILE path has to be specified");
        return ExitCode::from(1);
    };

    let options = match cli.options() {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{err:#}");
            return ExitCode::from(1);
        }
    };

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| input.with_extension("gcode"));

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .expect("spinner template is valid"),
    );
    spinner.set_message(format!("slicing {}", input.display()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = Pipeline::new(options).process(&input, &output);
    match result {
        Ok(()) => {
            spinner.finish_with_message(format!("wrote {}", output.display()));
            ExitCode::SUCCESS
        }
        Err(err) => {
            spinner.finish_and_clear();
            eprintln!("error while processing file: {err}");
            ExitCode::from(2)
        }
    }
}
