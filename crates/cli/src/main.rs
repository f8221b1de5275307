//! bathysmooth CLI - navigationally safe bathymetric surfaces

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use bathysmooth_algorithms::morphology::{rolling_coin, shoal_buffer, StructuringElement};
use bathysmooth_algorithms::pipeline::{Pipeline, Step};
use bathysmooth_algorithms::smoothing::laplacian_smooth;
use bathysmooth_algorithms::surface::vertical_offset;
use bathysmooth_core::io::{default_output_path, read_geotiff, write_geotiff};
use bathysmooth_core::DepthGrid;

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "bathysmooth")]
#[command(author, version, about = "Navigationally safe bathymetric surface generalization", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a depth grid
    Info {
        /// Input GeoTIFF
        input: PathBuf,
    },
    /// Print the coin (disk structuring element) mask
    Coin {
        /// Coin radius in cells (1-50)
        #[arg(short, long)]
        radius: usize,
        /// Crop the outer ring of the disk
        #[arg(long)]
        trim: bool,
    },
    /// Expand shoals by one cell (3x3 focal maximum)
    Buffer {
        /// Input GeoTIFF
        input: PathBuf,
        /// Output file [default: <input>_smoothed_surface.tif]
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Close pits narrower than a rolling coin
    RollingCoin {
        /// Input GeoTIFF
        input: PathBuf,
        /// Output file [default: <input>_smoothed_surface.tif]
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Coin radius in cells (1-50)
        #[arg(short, long)]
        radius: usize,
        /// Crop the outer ring of the coin
        #[arg(long)]
        trim: bool,
        /// Run shoal buffering before the coin
        #[arg(long)]
        buffer: bool,
    },
    /// Iterative Laplacian smoothing that never deepens a sounding
    Laplacian {
        /// Input GeoTIFF
        input: PathBuf,
        /// Output file [default: <input>_smoothed_surface.tif]
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Number of smoothing passes
        #[arg(short = 'n', long, default_value = "1")]
        iterations: usize,
    },
    /// Add a constant to every data cell
    Offset {
        /// Input GeoTIFF
        input: PathBuf,
        /// Output file [default: <input>_smoothed_surface.tif]
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Offset added to each sounding (positive is shoaler)
        #[arg(long, allow_hyphen_values = true)]
        value: f32,
    },
    /// Run an ordered pipeline of steps
    Run {
        /// Input GeoTIFF
        input: PathBuf,
        /// Output file [default: <input>_smoothed_surface.tif]
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Step: buffer, rollcoin:R[:trim], laplacian:N, offset:V (repeatable)
        #[arg(short, long = "step", value_name = "STEP")]
        steps: Vec<String>,
        /// JSON pipeline file; its steps run before any --step
        #[arg(short, long)]
        pipeline: Option<PathBuf>,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set default subscriber")
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn read_grid(path: &Path) -> Result<DepthGrid> {
    let pb = spinner("Reading depth grid...");
    let grid = read_geotiff(path)
        .with_context(|| format!("Failed to read depth grid from {}", path.display()))?;
    pb.finish_and_clear();
    info!("Input: {} x {}", grid.cols(), grid.rows());
    Ok(grid)
}

fn write_result(grid: &DepthGrid, path: &Path) -> Result<()> {
    let pb = spinner("Writing output...");
    write_geotiff(grid, path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    pb.finish_and_clear();
    Ok(())
}

fn output_path(input: &Path, output: Option<PathBuf>) -> PathBuf {
    output.unwrap_or_else(|| default_output_path(input))
}

fn done(name: &str, path: &Path, elapsed: Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

/// Read, transform and write one grid, timing only the transform
fn process<F>(name: &str, input: &Path, output: Option<PathBuf>, transform: F) -> Result<()>
where
    F: FnOnce(&mut DepthGrid) -> Result<()>,
{
    let output = output_path(input, output);
    let mut grid = read_grid(input)?;

    let pb = spinner(&format!("{}...", name));
    let start = Instant::now();
    transform(&mut grid)?;
    let elapsed = start.elapsed();
    pb.finish_and_clear();

    write_result(&grid, &output)?;
    done(name, &output, elapsed);
    Ok(())
}

fn build_pipeline(steps: &[String], file: Option<&Path>) -> Result<Pipeline> {
    let mut pipeline = match file {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read pipeline file {}", path.display()))?;
            Pipeline::from_json(&text).context("Failed to parse pipeline file")?
        }
        None => Pipeline::default(),
    };

    for spec in steps {
        let step: Step = spec.parse().context("Failed to parse --step")?;
        pipeline.push(step);
    }

    if pipeline.is_empty() {
        bail!("No steps given; use --step or --pipeline");
    }
    Ok(pipeline)
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Info { input } => {
            let grid = read_grid(&input)?;
            let (rows, cols) = grid.shape();
            let bounds = grid.bounds();
            let stats = grid.statistics();

            println!("File: {}", input.display());
            println!("Dimensions: {} x {} ({} cells)", cols, rows, grid.len());
            println!("Resolution: {} x {}", grid.x_res(), grid.y_res());
            println!(
                "Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
                bounds.0, bounds.1, bounds.2, bounds.3
            );
            println!("NoData: {}", grid.nodata());
            println!("\nStatistics:");
            if let Some(min) = stats.min {
                println!("  Deepest: {:.4}", min);
            }
            if let Some(max) = stats.max {
                println!("  Shoalest: {:.4}", max);
            }
            if let Some(mean) = stats.mean {
                println!("  Mean: {:.4}", mean);
            }
            println!(
                "  Valid cells: {} ({:.1}%)",
                stats.valid_count,
                100.0 * stats.valid_count as f64 / grid.len() as f64
            );
        }

        Commands::Coin { radius, trim } => {
            let coin = StructuringElement::build(radius, trim).context("Invalid coin")?;
            println!(
                "Coin radius {} ({}), {} active cells",
                coin.radius(),
                if trim { "trimmed" } else { "untrimmed" },
                coin.active_count()
            );
            println!("{}", coin);
        }

        Commands::Buffer { input, output } => {
            process("Shoal buffer", &input, output, |grid| {
                shoal_buffer(grid).context("Failed to buffer shoals")
            })?;
        }

        Commands::RollingCoin {
            input,
            output,
            radius,
            trim,
            buffer,
        } => {
            // Validate before any I/O
            let coin = StructuringElement::build(radius, trim).context("Invalid coin")?;
            debug!("Coin:\n{}", coin);
            process("Rolling coin", &input, output, |grid| {
                if buffer {
                    shoal_buffer(grid).context("Failed to buffer shoals")?;
                }
                rolling_coin(grid, &coin).context("Failed to roll coin")
            })?;
        }

        Commands::Laplacian {
            input,
            output,
            iterations,
        } => {
            if iterations == 0 {
                bail!("--iterations must be at least 1");
            }
            process("Laplacian", &input, output, |grid| {
                laplacian_smooth(grid, iterations).context("Failed to smooth")
            })?;
        }

        Commands::Offset {
            input,
            output,
            value,
        } => {
            if !value.is_finite() {
                bail!("--value must be finite");
            }
            process("Offset", &input, output, |grid| {
                vertical_offset(grid, value).context("Failed to apply offset")
            })?;
        }

        Commands::Run {
            input,
            output,
            steps,
            pipeline,
        } => {
            let pipeline = build_pipeline(&steps, pipeline.as_deref())?;
            pipeline.validate().context("Invalid pipeline")?;
            info!("Pipeline: {} step(s)", pipeline.steps.len());
            process("Pipeline", &input, output, |grid| {
                pipeline.run(grid).context("Pipeline failed")
            })?;
        }
    }

    Ok(())
}
