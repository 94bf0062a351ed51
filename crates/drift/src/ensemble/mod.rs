//! Lock-step particle ensemble: spawning, stepping, history and metrics.

mod history;
mod metrics;

#[cfg(test)]
mod tests;

pub use history::{HistoryRetention, ParticleSnapshot, TrajectoryHistory};
pub use metrics::{DensityHeatmap, DriftMetrics, ReachCategory};

use bevy::log::{debug, warn};
use bevy::prelude::Resource;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{
    DEG_TO_RAD, HEATMAP_LAT_RANGE, HEATMAP_LON_RANGE, KM_PER_DEGREE, MAX_RESAMPLE_ROUNDS,
};
use crate::drift_error::DriftError;
use crate::ocean::OceanModel;

/// Where and how widely particles are released.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReleasePoint {
    pub lat: f64,
    pub lon: f64,
    pub radius_km: f64,
}

impl ReleasePoint {
    pub fn new(lat: f64, lon: f64, radius_km: f64) -> Self {
        Self {
            lat,
            lon,
            radius_km,
        }
    }

    pub fn validate(&self) -> Result<(), DriftError> {
        if !self.lat.is_finite() || !self.lon.is_finite() {
            return Err(DriftError::InvalidRelease(format!(
                "non-finite coordinates ({}, {})",
                self.lat, self.lon
            )));
        }
        if !self.radius_km.is_finite() || self.radius_km <= 0.0 {
            return Err(DriftError::InvalidRelease(format!(
                "radius must be positive, got {} km",
                self.radius_km
            )));
        }
        Ok(())
    }
}

/// One particle's recorded path, oldest first.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Trajectory {
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
}

/// N drifting particles advanced together through an [`OceanModel`].
#[derive(Resource, Debug, Clone)]
pub struct ParticleEnsemble {
    model: OceanModel,
    release: ReleasePoint,
    lat: Vec<f64>,
    lon: Vec<f64>,
    beached: Vec<bool>,
    distance_km: Vec<f64>,
    history: TrajectoryHistory,
    steps: usize,
}

impl ParticleEnsemble {
    /// Spawn `n` particles offshore of `release`, keeping every step.
    pub fn spawn<R: Rng + ?Sized>(
        model: OceanModel,
        rng: &mut R,
        n: usize,
        release: ReleasePoint,
    ) -> Result<Self, DriftError> {
        Self::spawn_with_retention(model, rng, n, release, HistoryRetention::Full)
    }

    pub fn spawn_with_retention<R: Rng + ?Sized>(
        model: OceanModel,
        rng: &mut R,
        n: usize,
        release: ReleasePoint,
        retention: HistoryRetention,
    ) -> Result<Self, DriftError> {
        release.validate()?;
        if n == 0 {
            return Err(DriftError::EmptyEnsemble);
        }

        let (mut lat, mut lon) =
            model.spawn_offshore(rng, release.lat, release.lon, n, release.radius_km);
        if lat.is_empty() {
            return Err(DriftError::NoOceanAtRelease {
                lat: release.lat,
                lon: release.lon,
                radius_km: release.radius_km,
            });
        }
        if lat.len() < n {
            warn!(
                "Only {} of {} particles found ocean within {} km of ({:.4}, {:.4})",
                lat.len(),
                n,
                release.radius_km,
                release.lat,
                release.lon
            );
        }

        resample_land_points(&model, rng, &release, &mut lat, &mut lon)?;

        let count = lat.len();
        let beached = vec![false; count];
        let initial = ParticleSnapshot {
            lat: lat.clone(),
            lon: lon.clone(),
            beached: beached.clone(),
        };

        Ok(Self {
            model,
            release,
            lat,
            lon,
            beached,
            distance_km: vec![0.0; count],
            history: TrajectoryHistory::new(retention, initial),
            steps: 0,
        })
    }

    /// Advance one week: integrate, strand, accumulate distance, record.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let (new_lat, new_lon) = self
            .model
            .rk4_step(rng, &self.lat, &self.lon, &self.beached);
        let new_beached =
            self.model
                .check_beaching(rng, &new_lat, &new_lon, &self.beached, self.steps);

        for i in 0..self.lat.len() {
            if new_beached[i] {
                continue;
            }
            let dlat = new_lat[i] - self.lat[i];
            let dlon = new_lon[i] - self.lon[i];
            let dx = dlon * (self.lat[i] * DEG_TO_RAD).cos() * KM_PER_DEGREE;
            let dy = dlat * KM_PER_DEGREE;
            self.distance_km[i] += (dx * dx + dy * dy).sqrt();
        }

        self.lat = new_lat;
        self.lon = new_lon;
        self.beached = new_beached;
        self.steps += 1;
        self.history.record(self.steps, self.current_positions());

        debug!(
            "Drift step {}: {} of {} particles beached",
            self.steps,
            self.beached.iter().filter(|&&b| b).count(),
            self.beached.len()
        );
    }

    pub fn simulate<R: Rng + ?Sized>(&mut self, rng: &mut R, n_steps: usize) {
        self.simulate_with(rng, n_steps, |_, _| {});
    }

    /// Step `n_steps` times, handing the callback the 0-based step index and
    /// a read-only view after each step.
    pub fn simulate_with<R, F>(&mut self, rng: &mut R, n_steps: usize, mut callback: F)
    where
        R: Rng + ?Sized,
        F: FnMut(usize, &ParticleEnsemble),
    {
        for i in 0..n_steps {
            self.step(rng);
            callback(i, self);
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn particle_count(&self) -> usize {
        self.lat.len()
    }

    pub fn steps_elapsed(&self) -> usize {
        self.steps
    }

    pub fn latitudes(&self) -> &[f64] {
        &self.lat
    }

    pub fn longitudes(&self) -> &[f64] {
        &self.lon
    }

    pub fn beached(&self) -> &[bool] {
        &self.beached
    }

    pub fn distances_km(&self) -> &[f64] {
        &self.distance_km
    }

    pub fn model(&self) -> &OceanModel {
        &self.model
    }

    pub fn release(&self) -> ReleasePoint {
        self.release
    }

    pub fn history(&self) -> &TrajectoryHistory {
        &self.history
    }

    pub fn current_positions(&self) -> ParticleSnapshot {
        ParticleSnapshot {
            lat: self.lat.clone(),
            lon: self.lon.clone(),
            beached: self.beached.clone(),
        }
    }

    /// Copy of the snapshot recorded after step `step` (0 is the release).
    pub fn positions_at_step(&self, step: usize) -> Result<ParticleSnapshot, DriftError> {
        if step > self.steps {
            return Err(DriftError::StepOutOfRange {
                step,
                steps_elapsed: self.steps,
            });
        }
        self.history
            .get(step)
            .cloned()
            .ok_or(DriftError::StepNotRetained(step))
    }

    /// Per-particle paths through every `stride`-th retained snapshot,
    /// starting at the first. The latest snapshot is only included when it
    /// falls on the stride. A stride of 0 is treated as 1.
    pub fn trajectory_arrays(&self, stride: usize) -> Vec<Trajectory> {
        let picked: Vec<&ParticleSnapshot> = self
            .history
            .iter()
            .map(|(_, s)| s)
            .step_by(stride.max(1))
            .collect();

        (0..self.particle_count())
            .map(|p| Trajectory {
                lat: picked.iter().map(|s| s.lat[p]).collect(),
                lon: picked.iter().map(|s| s.lon[p]).collect(),
            })
            .collect()
    }

    /// Histogram of every retained position on the fixed North Atlantic window.
    pub fn density_heatmap(&self, lat_bins: usize, lon_bins: usize) -> DensityHeatmap {
        let mut map = DensityHeatmap::new(HEATMAP_LAT_RANGE, HEATMAP_LON_RANGE, lat_bins, lon_bins);
        for (_, snapshot) in self.history.iter() {
            for (&la, &lo) in snapshot.lat.iter().zip(&snapshot.lon) {
                map.add(la, lo);
            }
        }
        map
    }

    pub fn metrics(&self) -> DriftMetrics {
        DriftMetrics::from_state(&self.beached, &self.distance_km, self.steps)
    }

    pub fn probability_category(&self) -> ReachCategory {
        self.metrics().category()
    }
}

/// Replace any spawned point the land mask flags with a fresh offshore draw.
fn resample_land_points<R: Rng + ?Sized>(
    model: &OceanModel,
    rng: &mut R,
    release: &ReleasePoint,
    lat: &mut [f64],
    lon: &mut [f64],
) -> Result<(), DriftError> {
    for _ in 0..MAX_RESAMPLE_ROUNDS {
        let on_land: Vec<usize> = model
            .classify_land(lat, lon)
            .iter()
            .enumerate()
            .filter_map(|(i, &land)| land.then_some(i))
            .collect();
        if on_land.is_empty() {
            return Ok(());
        }

        warn!("Resampling {} spawned particles flagged as land", on_land.len());
        let (new_lat, new_lon) =
            model.spawn_offshore(rng, release.lat, release.lon, on_land.len(), release.radius_km);
        for ((&i, la), lo) in on_land.iter().zip(new_lat).zip(new_lon) {
            lat[i] = la;
            lon[i] = lo;
        }
    }

    if model.classify_land(lat, lon).iter().any(|&b| b) {
        return Err(DriftError::NoOceanAtRelease {
            lat: release.lat,
            lon: release.lon,
            radius_km: release.radius_km,
        });
    }
    Ok(())
}
