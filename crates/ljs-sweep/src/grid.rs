use std::ops::Range;

use ljs_config::{AxisSpec, GridSpec};
use ljs_core::errors::{ErrorInfo, SweepError};
use serde::{Deserialize, Serialize};

/// One (temperature, density) combination of the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    /// Temperature of the run.
    pub temperature: f64,
    /// Density of the run.
    pub density: f64,
}

/// Selects one contiguous slice of the enumerated grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSpec {
    count: usize,
    index: usize,
}

impl ChunkSpec {
    /// Validates `0 <= index < count`.
    pub fn new(count: usize, index: usize) -> Result<Self, SweepError> {
        if count == 0 {
            return Err(SweepError::Grid(
                ErrorInfo::new("chunk_count", "chunk count must be at least one")
                    .with_hint("use a chunk count of 1 to run the whole grid at once"),
            ));
        }
        if index >= count {
            return Err(SweepError::Grid(
                ErrorInfo::new("chunk_index", "chunk index out of range")
                    .with_context("chunk_index", index.to_string())
                    .with_context("chunk_count", count.to_string()),
            ));
        }
        Ok(Self { count, index })
    }

    /// The single chunk covering the whole grid.
    pub fn whole() -> Self {
        Self { count: 1, index: 0 }
    }

    /// Number of chunks the grid is split into.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Position of this chunk.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Index range of this chunk within a sequence of `len` items.
    ///
    /// The first `len % count` chunks hold one extra item.
    pub fn bounds(&self, len: usize) -> Range<usize> {
        let base = len / self.count;
        let extra = len % self.count;
        let start = self.index * base + self.index.min(extra);
        let size = base + usize::from(self.index < extra);
        start..start + size
    }

    /// Returns this chunk's slice of `items`.
    pub fn select<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.bounds(items.len())]
    }
}

impl Default for ChunkSpec {
    fn default() -> Self {
        Self::whole()
    }
}

/// Evenly spaced samples from `start` to `stop`, both endpoints included.
///
/// A single sample yields `start`; the last sample is exactly `stop`.
pub fn linspace(start: f64, stop: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let span = stop - start;
            let denominator = (steps - 1) as f64;
            (0..steps)
                .map(|step| {
                    if step == steps - 1 {
                        stop
                    } else {
                        start + (step as f64 / denominator) * span
                    }
                })
                .collect()
        }
    }
}

fn axis_values(axis: &AxisSpec, name: &str) -> Result<Vec<f64>, SweepError> {
    if axis.steps == 0 {
        return Err(SweepError::Grid(
            ErrorInfo::new("axis_steps", "axis needs at least one step").with_context("axis", name),
        ));
    }
    Ok(linspace(axis.start, axis.stop, axis.steps as usize))
}

/// Enumerates every grid point, temperature outer and density inner.
///
/// Directory naming and chunk boundaries both depend on this order.
pub fn plan_grid(grid: &GridSpec) -> Result<Vec<GridPoint>, SweepError> {
    let temperatures = axis_values(&grid.temperature, "temperature")?;
    let densities = axis_values(&grid.density, "density")?;
    let mut points = Vec::with_capacity(temperatures.len() * densities.len());
    for &temperature in &temperatures {
        for &density in &densities {
            points.push(GridPoint {
                temperature,
                density,
            });
        }
    }
    Ok(points)
}

/// Enumerates the grid and returns the points of one chunk.
pub fn plan_chunk(grid: &GridSpec, chunk: ChunkSpec) -> Result<Vec<GridPoint>, SweepError> {
    let points = plan_grid(grid)?;
    Ok(chunk.select(&points).to_vec())
}
