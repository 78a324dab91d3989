//! Subcommand implementations.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use grid_engine::{
    DistanceMetric, Grid, GridEngineConfig, GridStructure, NumericGrid, ResampleMethod,
};
use serde::Serialize;
use tracing::info;

/// Shared inputs for every subcommand.
pub struct Session {
    pub config: GridEngineConfig,
    /// Shape used when the file carries no embedded structure.
    pub shape: Option<GridStructure>,
}

impl Session {
    /// Load a GSLIB file as a numeric grid.
    ///
    /// With a shape the values are read into a grid of that shape; otherwise
    /// the structure embedded in the title line is used.
    pub fn load(&self, path: &Path) -> Result<NumericGrid> {
        let sentinel = self.config.null_sentinel;
        let grid = match &self.shape {
            Some(structure) => {
                let mut grid = NumericGrid::new(structure.clone());
                grid.read_gslib(path, sentinel)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                grid
            }
            None => Grid::<f64>::open_gslib(path, sentinel)
                .map(NumericGrid::from)
                .with_context(|| format!("Failed to open {}", path.display()))?,
        };

        info!(
            path = %path.display(),
            cells = grid.count(),
            nulls = grid.null_cell_count(),
            "Loaded grid"
        );
        Ok(grid)
    }

    /// Write a grid with the configured title, column name and sentinel.
    pub fn save(&self, grid: &Grid<f64>, path: &Path, title: &str) -> Result<()> {
        grid.write_gslib(path, title, &self.config.column_name, self.config.null_sentinel)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), cells = grid.count(), "Wrote grid");
        Ok(())
    }
}

// ============================================================================
// info
// ============================================================================

/// Summary printed by `info`.
#[derive(Debug, Serialize)]
pub struct GridSummary {
    pub structure: GridStructure,
    pub cells: usize,
    pub nulls: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub average: Option<f64>,
    pub range: Option<f64>,
}

impl GridSummary {
    pub fn of(grid: &NumericGrid) -> Self {
        Self {
            structure: grid.structure().clone(),
            cells: grid.count(),
            nulls: grid.null_cell_count(),
            min: grid.min(),
            max: grid.max(),
            average: grid.average(),
            range: grid.range(),
        }
    }
}

fn show(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.6}", v))
}

pub fn info(session: &Session, input: &Path, json: bool) -> Result<()> {
    let grid = session.load(input)?;
    let summary = GridSummary::of(&grid);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("structure: {}", summary.structure);
    println!("cells:     {}", summary.cells);
    println!("nulls:     {}", summary.nulls);
    println!("min:       {}", show(summary.min));
    println!("max:       {}", show(summary.max));
    println!("average:   {}", show(summary.average));
    println!("range:     {}", show(summary.range));
    Ok(())
}

// ============================================================================
// resample / region / flip
// ============================================================================

/// Target shape for `resample`.
pub struct TargetShape {
    pub i_count: usize,
    pub j_count: usize,
    pub k_count: Option<usize>,
}

pub fn resample(
    session: &Session,
    input: &Path,
    output: &Path,
    method: ResampleMethod,
    target: &TargetShape,
) -> Result<()> {
    let grid = session.load(input)?;
    let resampled: Grid<f64> = match (method, target.k_count) {
        (ResampleMethod::Nearest, None) => grid
            .nearest_neighbor_resample(target.i_count, target.j_count)?
            .into_inner(),
        (ResampleMethod::Nearest, Some(k)) => {
            grid.nearest_neighbor_resample_3d(target.i_count, target.j_count, k)?
        }
        (ResampleMethod::Bilinear, None) => grid
            .bilinear_resample(target.i_count, target.j_count)?
            .into_inner(),
        (ResampleMethod::Bilinear, Some(_)) => {
            bail!("Bilinear resampling only supports 2D grids")
        }
    };

    info!(
        method = %method,
        from = %grid.structure(),
        to = %resampled.structure(),
        "Resampled grid"
    );
    session.save(&resampled, output, &session.config.title)
}

/// Inclusive index bounds for `region`.
pub struct RegionBounds {
    pub i: (i32, i32),
    pub j: (i32, i32),
    pub k: Option<(i32, i32)>,
}

pub fn region(session: &Session, input: &Path, output: &Path, bounds: &RegionBounds) -> Result<()> {
    let grid = session.load(input)?;
    let (i1, i2) = bounds.i;
    let (j1, j2) = bounds.j;
    let region = match bounds.k {
        Some((k1, k2)) => grid.region_by_range_3d(i1, i2, j1, j2, k1, k2)?,
        None => grid.region_by_range(i1, i2, j1, j2)?.into_inner(),
    };
    session.save(&region, output, &session.config.title)
}

pub fn flip(session: &Session, input: &Path, output: &Path) -> Result<()> {
    let grid = session.load(input)?;
    let flipped = grid.reverse_up_down_2d()?;
    session.save(&flipped, output, &session.config.title)
}

// ============================================================================
// pyramid
// ============================================================================

/// File name for one pyramid level, e.g. `porosity_L2.out`.
pub fn level_path(output_dir: &Path, stem: &str, level: u32) -> PathBuf {
    output_dir.join(format!("{}_L{}.out", stem, level))
}

pub fn pyramid(session: &Session, input: &Path, output_dir: &Path) -> Result<Vec<PathBuf>> {
    let grid = session.load(input)?;
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("grid");

    let levels = grid.pyramid(&session.config.pyramid)?;
    let mut written = Vec::with_capacity(levels.len());
    for level in &levels {
        let path = level_path(output_dir, stem, level.level);
        let title = format!("{} L{}", session.config.title, level.level);
        session.save(&level.grid, &path, &title)?;
        written.push(path);
    }

    info!(levels = levels.len(), "Pyramid generation complete");
    Ok(written)
}

// ============================================================================
// distance
// ============================================================================

/// Parse a metric name as accepted by `--metric`.
pub fn parse_metric(name: &str) -> Result<DistanceMetric> {
    match name.trim().to_lowercase().as_str() {
        "manhattan" | "0" => Ok(DistanceMetric::Manhattan),
        "euclidean" | "1" => Ok(DistanceMetric::Euclidean),
        other => bail!("Unknown distance metric '{}'", other),
    }
}

pub fn distance(session: &Session, left: &Path, right: &Path, metric: DistanceMetric) -> Result<f64> {
    let a = session.load(left)?;
    let b = session.load(right)?;
    let d = a.distance(&b, metric)?;
    println!("{}", d);
    Ok(d)
}
