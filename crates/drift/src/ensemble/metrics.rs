use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{HIGH_REACH_THRESHOLD, LOW_REACH_THRESHOLD, STEPS_PER_YEAR};

/// Summary of an ensemble at its current step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftMetrics {
    pub particle_count: usize,
    pub beached_count: usize,
    pub ocean_count: usize,
    pub beached_fraction: f64,
    /// Share of particles that never beached.
    pub ocean_reach_fraction: f64,
    pub median_distance_km: f64,
    pub mean_distance_km: f64,
    pub max_distance_km: f64,
    pub steps_elapsed: usize,
    pub elapsed_years: f64,
}

impl DriftMetrics {
    pub fn from_state(beached: &[bool], distances_km: &[f64], steps_elapsed: usize) -> Self {
        let particle_count = beached.len();
        let beached_count = beached.iter().filter(|&&b| b).count();
        let ocean_count = particle_count - beached_count;
        let beached_fraction = if particle_count == 0 {
            0.0
        } else {
            beached_count as f64 / particle_count as f64
        };

        Self {
            particle_count,
            beached_count,
            ocean_count,
            beached_fraction,
            ocean_reach_fraction: 1.0 - beached_fraction,
            median_distance_km: median(distances_km),
            mean_distance_km: mean(distances_km),
            max_distance_km: distances_km.iter().copied().fold(0.0, f64::max),
            steps_elapsed,
            elapsed_years: steps_elapsed as f64 / STEPS_PER_YEAR,
        }
    }

    pub fn category(&self) -> ReachCategory {
        ReachCategory::from_fraction(self.ocean_reach_fraction)
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Middle value, averaging the two central values for even lengths.
fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Coarse likelihood that released material reaches open ocean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReachCategory {
    Low,
    Medium,
    High,
}

impl ReachCategory {
    pub fn from_fraction(ocean_reach_fraction: f64) -> Self {
        if ocean_reach_fraction < LOW_REACH_THRESHOLD {
            ReachCategory::Low
        } else if ocean_reach_fraction < HIGH_REACH_THRESHOLD {
            ReachCategory::Medium
        } else {
            ReachCategory::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReachCategory::Low => "LOW",
            ReachCategory::Medium => "MEDIUM",
            ReachCategory::High => "HIGH",
        }
    }
}

impl fmt::Display for ReachCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 2D histogram of recorded positions over a fixed geographic window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityHeatmap {
    pub lat_bins: usize,
    pub lon_bins: usize,
    /// `lat_bins + 1` ascending edges.
    pub lat_edges: Vec<f64>,
    /// `lon_bins + 1` ascending edges.
    pub lon_edges: Vec<f64>,
    /// Row-major by latitude bin.
    pub counts: Vec<u32>,
}

impl DensityHeatmap {
    pub fn new(
        lat_range: (f64, f64),
        lon_range: (f64, f64),
        lat_bins: usize,
        lon_bins: usize,
    ) -> Self {
        Self {
            lat_bins,
            lon_bins,
            lat_edges: edges(lat_range, lat_bins),
            lon_edges: edges(lon_range, lon_bins),
            counts: vec![0; lat_bins * lon_bins],
        }
    }

    /// Count one position. Points outside the window (or NaN) are ignored;
    /// the upper edge of each axis belongs to the last bin.
    pub fn add(&mut self, lat: f64, lon: f64) {
        let (Some(r), Some(c)) = (
            bin_index(lat, &self.lat_edges, self.lat_bins),
            bin_index(lon, &self.lon_edges, self.lon_bins),
        ) else {
            return;
        };
        self.counts[r * self.lon_bins + c] += 1;
    }

    pub fn get(&self, lat_bin: usize, lon_bin: usize) -> u32 {
        self.counts[lat_bin * self.lon_bins + lon_bin]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }
}

fn edges(range: (f64, f64), bins: usize) -> Vec<f64> {
    let width = (range.1 - range.0) / bins.max(1) as f64;
    (0..=bins).map(|i| range.0 + i as f64 * width).collect()
}

fn bin_index(x: f64, edges: &[f64], bins: usize) -> Option<usize> {
    let (lo, hi) = (*edges.first()?, *edges.last()?);
    if bins == 0 || !(x >= lo && x <= hi) {
        return None;
    }
    let idx = ((x - lo) / (hi - lo) * bins as f64) as usize;
    Some(idx.min(bins - 1))
}
