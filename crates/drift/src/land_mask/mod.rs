//! Land/ocean classification for the drift domain.
//!
//! Coastlines are stored as data (latitude-indexed longitude tables plus
//! rectangular exclusion zones) rather than baked into the integrator, so a
//! coarser or finer mask can be swapped in without touching the physics.
//! A `RasterMask` can be baked from any classifier for constant-time lookups.

mod coastline;
mod raster;

pub use coastline::{Coastline, CoastlineMask, LandSide, LatLonBox};
pub use raster::RasterMask;

use serde::{Deserialize, Serialize};

use crate::config::{
    COAST_PROBE_RADIUS_DEG, COAST_PROBE_SAMPLES, FAR_FROM_COAST_KM, KM_PER_DEGREE,
};
use crate::drift_error::DriftError;

/// Anything that can tell land from ocean at a geographic point.
pub trait LandClassifier {
    /// Returns `true` when `(lat, lon)` lies on land. Must be pure.
    fn is_on_land(&self, lat: f64, lon: f64) -> bool;

    /// Batched classification over parallel coordinate slices.
    fn classify(&self, lat: &[f64], lon: &[f64]) -> Vec<bool> {
        lat.iter()
            .zip(lon)
            .map(|(&la, &lo)| self.is_on_land(la, lo))
            .collect()
    }
}

/// The land mask used by the ocean model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LandMask {
    Coastlines(CoastlineMask),
    Raster(RasterMask),
}

impl Default for LandMask {
    fn default() -> Self {
        LandMask::Coastlines(CoastlineMask::north_atlantic())
    }
}

impl LandMask {
    /// Bake this mask into a raster of `cell_deg` cells over the given window.
    pub fn rasterize(
        &self,
        lat_range: (f64, f64),
        lon_range: (f64, f64),
        cell_deg: f64,
    ) -> Result<Self, DriftError> {
        Ok(LandMask::Raster(RasterMask::bake(
            self, lat_range, lon_range, cell_deg,
        )?))
    }
}

impl LandClassifier for LandMask {
    fn is_on_land(&self, lat: f64, lon: f64) -> bool {
        match self {
            LandMask::Coastlines(mask) => mask.is_on_land(lat, lon),
            LandMask::Raster(mask) => mask.is_on_land(lat, lon),
        }
    }
}

/// Approximate distance in km from `(lat, lon)` to the nearest land.
///
/// Probes a small square stencil of offsets around the point and keeps the
/// closest one that classifies as land. Coast beyond the stencil is invisible:
/// the result is then `FAR_FROM_COAST_KM`.
pub fn distance_to_coast_km<M: LandClassifier + ?Sized>(mask: &M, lat: f64, lon: f64) -> f64 {
    let mid = COAST_PROBE_SAMPLES / 2;
    let spacing = 2.0 * COAST_PROBE_RADIUS_DEG / (COAST_PROBE_SAMPLES - 1) as f64;
    let mut min_dist = FAR_FROM_COAST_KM;

    for i in 0..COAST_PROBE_SAMPLES {
        let dlat = -COAST_PROBE_RADIUS_DEG + i as f64 * spacing;
        for j in 0..COAST_PROBE_SAMPLES {
            if i == mid && j == mid {
                continue;
            }
            let dlon = -COAST_PROBE_RADIUS_DEG + j as f64 * spacing;
            if mask.is_on_land(lat + dlat, lon + dlon) {
                let dist_km = (dlat * dlat + dlon * dlon).sqrt() * KM_PER_DEGREE;
                min_dist = min_dist.min(dist_km);
            }
        }
    }

    min_dist
}
