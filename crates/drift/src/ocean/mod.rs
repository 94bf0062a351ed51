//! Synthetic North Atlantic ocean field.
//!
//! `OceanModel` is immutable once built. Every stochastic operation takes the
//! random generator as an argument, so two ensembles can share one model while
//! drawing from independent streams.

pub mod currents;
mod integrator;
pub mod params;

pub use integrator::{meters_to_degrees, meters_to_degrees_at};
pub use params::{
    BeachingParams, BoundaryCurrentParams, GyreParams, JetSegment, OceanParams,
    ReturnCurrentParams, TradeWindParams,
};

use bevy::log::debug;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::Deserialize;

use crate::config::{DEG_TO_RAD, KM_PER_DEGREE, SPAWN_ROUNDS_PER_PARTICLE};
use crate::drift_error::DriftError;
use crate::land_mask::{self, LandClassifier, LandMask};

/// JSON form accepted by [`OceanModel::from_json`]: parameter overrides at
/// the top level plus an optional `land` mask.
#[derive(Deserialize)]
struct ModelDocument {
    #[serde(flatten)]
    params: OceanParams,
    #[serde(default)]
    land: LandMask,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OceanModel {
    params: OceanParams,
    land: LandMask,
}

impl OceanModel {
    pub fn new(params: OceanParams, land: LandMask) -> Self {
        Self { params, land }
    }

    /// Parameters and land mask from a JSON document; absent fields keep
    /// their defaults.
    pub fn from_json(json: &str) -> Result<Self, DriftError> {
        let doc: ModelDocument = serde_json::from_str(json)?;
        Ok(Self::new(doc.params, doc.land))
    }

    pub fn params(&self) -> &OceanParams {
        &self.params
    }

    pub fn land_mask(&self) -> &LandMask {
        &self.land
    }

    /// Integration step in seconds.
    pub fn dt(&self) -> f64 {
        self.params.dt_seconds
    }

    // -----------------------------------------------------------------------
    // Deterministic field
    // -----------------------------------------------------------------------

    pub fn velocity_at(&self, lat: f64, lon: f64) -> (f64, f64) {
        currents::total_velocity(&self.params, lat, lon)
    }

    /// Velocity `(u, v)` in m/s at every position.
    pub fn velocity_field(&self, lat: &[f64], lon: &[f64]) -> (Vec<f64>, Vec<f64>) {
        lat.iter()
            .zip(lon)
            .map(|(&la, &lo)| self.velocity_at(la, lo))
            .unzip()
    }

    // -----------------------------------------------------------------------
    // Diffusion
    // -----------------------------------------------------------------------

    /// Standard deviation in metres of one diffusive displacement.
    pub fn diffusion_sigma(&self) -> f64 {
        (2.0 * self.params.diffusion_coefficient * self.params.dt_seconds).sqrt()
    }

    /// `n` Gaussian displacements per axis, in metres. All `du` are drawn
    /// before any `dv`.
    pub fn diffusion_step<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> (Vec<f64>, Vec<f64>) {
        let sigma = self.diffusion_sigma();
        let du = (0..n)
            .map(|_| sigma * rng.sample::<f64, _>(StandardNormal))
            .collect();
        let dv = (0..n)
            .map(|_| sigma * rng.sample::<f64, _>(StandardNormal))
            .collect();
        (du, dv)
    }

    // -----------------------------------------------------------------------
    // Land interaction
    // -----------------------------------------------------------------------

    pub fn is_on_land(&self, lat: f64, lon: f64) -> bool {
        self.land.is_on_land(lat, lon)
    }

    pub fn classify_land(&self, lat: &[f64], lon: &[f64]) -> Vec<bool> {
        self.land.classify(lat, lon)
    }

    pub fn distance_to_coast_km(&self, lat: &[f64], lon: &[f64]) -> Vec<f64> {
        lat.iter()
            .zip(lon)
            .map(|(&la, &lo)| land_mask::distance_to_coast_km(&self.land, la, lo))
            .collect()
    }

    /// Strand unbeached particles near the coast with the configured
    /// probability. Nothing happens before `min_steps` have elapsed.
    ///
    /// One uniform draw is consumed per unbeached particle, in index order,
    /// whether or not it is near the coast. `lat`, `lon` and `beached` are
    /// parallel slices of equal length.
    pub fn check_beaching<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        lat: &[f64],
        lon: &[f64],
        beached: &[bool],
        step_number: usize,
    ) -> Vec<bool> {
        debug_assert_eq!(lat.len(), lon.len(), "check_beaching: lat/lon length mismatch");
        debug_assert_eq!(lat.len(), beached.len(), "check_beaching: beached length mismatch");
        let mut next = beached.to_vec();
        let rules = &self.params.beaching;
        if step_number < rules.min_steps || beached.iter().all(|&b| b) {
            return next;
        }

        for (i, is_beached) in next.iter_mut().enumerate() {
            if *is_beached {
                continue;
            }
            let dist = land_mask::distance_to_coast_km(&self.land, lat[i], lon[i]);
            let roll: f64 = rng.gen();
            if dist <= rules.trigger_distance_km && roll < rules.probability {
                *is_beached = true;
            }
        }
        next
    }

    // -----------------------------------------------------------------------
    // Spawning
    // -----------------------------------------------------------------------

    /// Rejection-sample up to `n` ocean points within `radius_km` of the centre.
    ///
    /// Radius is drawn uniformly in `[0, R]`, which concentrates points toward
    /// the centre. At most `10 * n` sampling rounds run; callers must check the
    /// returned length, which can be short when the disk is mostly land.
    pub fn spawn_offshore<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        center_lat: f64,
        center_lon: f64,
        n: usize,
        radius_km: f64,
    ) -> (Vec<f64>, Vec<f64>) {
        let radius_deg = radius_km / KM_PER_DEGREE;
        let lon_scale = (center_lat * DEG_TO_RAD).cos();
        let max_rounds = n * SPAWN_ROUNDS_PER_PARTICLE;

        let mut lats = Vec::with_capacity(n);
        let mut lons = Vec::with_capacity(n);
        let mut rounds = 0;

        while lats.len() < n && rounds < max_rounds {
            let wanted = n - lats.len();
            let angles: Vec<f64> = (0..wanted)
                .map(|_| rng.gen::<f64>() * std::f64::consts::TAU)
                .collect();
            let radii: Vec<f64> = (0..wanted).map(|_| rng.gen::<f64>() * radius_deg).collect();

            for (angle, r) in angles.into_iter().zip(radii) {
                let lat = center_lat + r * angle.cos();
                let lon = center_lon + r * angle.sin() / lon_scale;
                if !self.is_on_land(lat, lon) {
                    lats.push(lat);
                    lons.push(lon);
                }
            }
            rounds += 1;
        }

        if lats.len() < n {
            debug!(
                "spawn_offshore: {} of {} points after {} rounds around ({:.3}, {:.3})",
                lats.len(),
                n,
                rounds,
                center_lat,
                center_lon
            );
        }
        (lats, lons)
    }
}
