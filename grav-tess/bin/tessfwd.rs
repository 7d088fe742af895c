//! Forward-model one gravity field component of a tesseroid model on a
//! regular observation grid.
//!
//! Usage:
//!   cargo run --release --bin tessfwd -- --model crust.txt --field gzz \
//!       --region -10 10 -10 10 --shape 101 101 --height 250000
//!   cargo run --release --bin tessfwd -- --config run.json
//!   cargo run --release --bin tessfwd -- --help

use anyhow::{bail, Context};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use grav_common::{GlqOrders, GridResult, GridSpec, RunConfig};
use grav_tess::core::io::read_model;
use grav_tess::{calc_field_batch, AdaptiveSettings, FieldComponent, ObservationPoint};

#[derive(Parser, Debug)]
#[command(name = "tessfwd")]
#[command(about = "Tesseroid gravity forward modeling on a regular grid", long_about = None)]
struct Args {
    /// JSON run configuration; other flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tesseroid model file (7 columns: W E S N TOP BOTTOM DENSITY)
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Field component (pot, gx, gy, gz, gxx, gxy, gxz, gyy, gyz, gzz)
    #[arg(short, long)]
    field: Option<FieldComponent>,

    /// Grid region in degrees: west east south north
    #[arg(short, long, num_args = 4, value_names = ["W", "E", "S", "N"])]
    region: Option<Vec<f64>>,

    /// Grid shape: points along longitude and latitude
    #[arg(long, num_args = 2, value_names = ["NLON", "NLAT"])]
    shape: Option<Vec<usize>>,

    /// Observation height above the reference sphere (m)
    #[arg(long)]
    height: Option<f64>,

    /// Gauss-Legendre order for all three integration directions
    #[arg(short, long)]
    order: Option<usize>,

    /// Disable adaptive subdivision (plain fixed-order integration)
    #[arg(long)]
    no_adaptive: bool,

    /// Override the adaptive distance-size ratio
    #[arg(long)]
    ratio: Option<f64>,

    /// Number of parallel threads (default: all cores)
    #[arg(short = 't', long)]
    threads: Option<usize>,

    /// Output path; stdout when absent. A `.json` suffix selects JSON output
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to set thread pool")?;
        println!("Using {} threads", threads);
    }

    // Start from the configuration file (or defaults) and apply overrides
    let mut config = match &args.config {
        Some(path) => {
            println!("Loading configuration from: {}", path.display());
            RunConfig::from_file(path).map_err(|e| anyhow::anyhow!(e))?
        }
        None => {
            let Some(model) = args.model.clone() else {
                bail!("either --config or --model is required");
            };
            RunConfig {
                model,
                grid: GridSpec::default(),
                field: "gz".to_string(),
                glq: GlqOrders::default(),
                adaptive: true,
                ratio: None,
                output: None,
            }
        }
    };
    if let Some(model) = args.model {
        config.model = model;
    }
    if let Some(field) = args.field {
        config.field = field.name().to_string();
    }
    if let Some(region) = args.region {
        config.grid.west = region[0];
        config.grid.east = region[1];
        config.grid.south = region[2];
        config.grid.north = region[3];
    }
    if let Some(shape) = args.shape {
        config.grid.nlon = shape[0];
        config.grid.nlat = shape[1];
    }
    if let Some(height) = args.height {
        config.grid.height = height;
    }
    if let Some(order) = args.order {
        config.glq = GlqOrders {
            lon: order,
            lat: order,
            r: order,
        };
    }
    if args.no_adaptive {
        config.adaptive = false;
    }
    if args.ratio.is_some() {
        config.ratio = args.ratio;
    }
    if args.output.is_some() {
        config.output = args.output;
    }

    let component: FieldComponent = config
        .field
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let model = read_model(&config.model)
        .with_context(|| format!("failed to load model {}", config.model.display()))?;
    println!(
        "Loaded {} tesseroids from {}",
        model.len(),
        config.model.display()
    );

    let grid_points = config.grid.points();
    println!(
        "Computing {} on a {} x {} grid at height {} m ({})",
        component.name(),
        config.grid.nlon,
        config.grid.nlat,
        config.grid.height,
        if config.adaptive {
            "adaptive"
        } else {
            "fixed order"
        }
    );

    let points: Vec<ObservationPoint> = grid_points
        .iter()
        .map(|&(lon, lat, height)| ObservationPoint::from_height(lon, lat, height))
        .collect();
    let settings = config.adaptive.then(|| match config.ratio {
        Some(ratio) => AdaptiveSettings::with_ratio(ratio),
        None => AdaptiveSettings::default(),
    });

    let batch = calc_field_batch(&model, &points, component, config.glq, settings.as_ref())?;

    let diag = &batch.diagnostics;
    if diag.degenerate_points > 0 {
        log::warn!(
            "{} points coincided with model elements; their values are unreliable",
            diag.degenerate_points
        );
    }
    if diag.degraded_evaluations > 0 {
        log::warn!(
            "{} evaluations hit the subdivision stack capacity; consider a \
             greater observation height",
            diag.degraded_evaluations
        );
    }

    let result = GridResult::new(component.name(), grid_points, batch.values.to_vec());
    match &config.output {
        Some(path) if path.extension().is_some_and(|ext| ext == "json") => {
            result.save_json(path).map_err(|e| anyhow::anyhow!(e))?;
            println!("Saved JSON results to: {}", path.display());
        }
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            result.write_table(BufWriter::new(file))?;
            println!("Saved results to: {}", path.display());
        }
        None => result.write_table(io::stdout().lock())?,
    }
    io::stdout().flush()?;
    println!("Done!");

    Ok(())
}
