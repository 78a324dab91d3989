//! Grid tool.
//!
//! Command-line front-end over the grid engine:
//! - Inspect GSLIB grids (structure, null count, statistics)
//! - Resample, crop and flip grids
//! - Generate Gaussian pyramids, one GSLIB file per level
//! - Compare two grids with a distance metric

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use grid_engine::ResampleMethod;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use commands::{RegionBounds, Session, TargetShape};

#[derive(Parser, Debug)]
#[command(name = "grid-tool")]
#[command(about = "Inspect and transform GSLIB grids")]
struct Args {
    /// YAML configuration file
    #[arg(long, env = "GRID_TOOL_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Value that marks empty cells in GSLIB files (overrides the config)
    #[arg(long, global = true, allow_hyphen_values = true)]
    null_sentinel: Option<f64>,

    /// Grid shape I,J or I,J,K for files without an embedded structure
    #[arg(long, global = true)]
    shape: Option<String>,

    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print structure, counts and statistics
    Info {
        input: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resample to a new shape
    Resample {
        input: PathBuf,
        output: PathBuf,

        /// nearest or bilinear (default from config)
        #[arg(long)]
        method: Option<String>,

        #[arg(long)]
        i_count: usize,

        #[arg(long)]
        j_count: usize,

        /// Target layer count; 3D nearest-neighbour only
        #[arg(long)]
        k_count: Option<usize>,
    },

    /// Extract an inclusive index range
    Region {
        input: PathBuf,
        output: PathBuf,

        #[arg(long, allow_hyphen_values = true)]
        i1: i32,
        #[arg(long, allow_hyphen_values = true)]
        i2: i32,
        #[arg(long, allow_hyphen_values = true)]
        j1: i32,
        #[arg(long, allow_hyphen_values = true)]
        j2: i32,
        #[arg(long, requires = "k2", allow_hyphen_values = true)]
        k1: Option<i32>,
        #[arg(long, requires = "k1", allow_hyphen_values = true)]
        k2: Option<i32>,
    },

    /// Reverse the row order of a 2D grid
    Flip { input: PathBuf, output: PathBuf },

    /// Write a Gaussian pyramid, one file per level
    Pyramid {
        input: PathBuf,

        /// Directory for the level files
        output_dir: PathBuf,
    },

    /// Distance between two grids of equal cell count
    Distance {
        left: PathBuf,
        right: PathBuf,

        /// manhattan or euclidean
        #[arg(long, default_value = "euclidean")]
        metric: String,
    },
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn init_tracing(level: Level, json: bool) -> Result<()> {
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(parse_level(&args.log_level), args.log_json)?;

    let mut engine_config = config::load_config(args.config.as_deref())?;
    if let Some(sentinel) = args.null_sentinel {
        engine_config.null_sentinel = sentinel;
    }
    config::validate(&engine_config)?;

    let shape = args.shape.as_deref().map(config::parse_shape).transpose()?;
    let session = Session {
        config: engine_config,
        shape,
    };

    match args.command {
        Command::Info { input, json } => commands::info(&session, &input, json)?,
        Command::Resample {
            input,
            output,
            method,
            i_count,
            j_count,
            k_count,
        } => {
            let method = method
                .as_deref()
                .map(ResampleMethod::from_str)
                .unwrap_or(session.config.resample_method);
            let target = TargetShape {
                i_count,
                j_count,
                k_count,
            };
            commands::resample(&session, &input, &output, method, &target)?;
        }
        Command::Region {
            input,
            output,
            i1,
            i2,
            j1,
            j2,
            k1,
            k2,
        } => {
            let bounds = RegionBounds {
                i: (i1, i2),
                j: (j1, j2),
                k: k1.zip(k2),
            };
            commands::region(&session, &input, &output, &bounds)?;
        }
        Command::Flip { input, output } => commands::flip(&session, &input, &output)?,
        Command::Pyramid { input, output_dir } => {
            let written = commands::pyramid(&session, &input, &output_dir)?;
            info!(files = written.len(), dir = %output_dir.display(), "Wrote pyramid levels");
        }
        Command::Distance {
            left,
            right,
            metric,
        } => {
            let metric = commands::parse_metric(&metric)?;
            commands::distance(&session, &left, &right, metric)?;
        }
    }

    Ok(())
}
