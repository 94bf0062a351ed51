/// One simulated week, the fixed integration step.
pub const SECONDS_PER_STEP: f64 = 7.0 * 24.0 * 3600.0;
pub const STEPS_PER_YEAR: f64 = 52.0;
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;
pub const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;
/// Kilometres per degree of latitude.
pub const KM_PER_DEGREE: f64 = 111.32;

/// Added to the longitude scale so the conversion stays finite at the poles.
pub const POLE_EPSILON: f64 = 1e-10;

/// Spawn radius for ordinary coastal releases.
pub const COASTAL_RELEASE_RADIUS_KM: f64 = 20.0;
/// Inland sites release at their ocean outlet with a wider spread.
pub const OUTLET_RELEASE_RADIUS_KM: f64 = 30.0;

/// Distance reported when no sampled offset around a point hits land.
pub const FAR_FROM_COAST_KM: f64 = 999.0;
/// Half-width in degrees of the coastal-distance sampling stencil.
pub const COAST_PROBE_RADIUS_DEG: f64 = 0.3;
/// Samples per axis of the coastal-distance stencil (origin excluded).
pub const COAST_PROBE_SAMPLES: usize = 7;

/// Rejection-sampling rounds allowed per requested particle.
pub const SPAWN_ROUNDS_PER_PARTICLE: usize = 10;

/// Fixed geographic window of the density heatmap, degrees.
pub const HEATMAP_LAT_RANGE: (f64, f64) = (5.0, 65.0);
pub const HEATMAP_LON_RANGE: (f64, f64) = (-100.0, 20.0);

pub const LOW_REACH_THRESHOLD: f64 = 0.3;
pub const HIGH_REACH_THRESHOLD: f64 = 0.6;

/// Passes the ensemble constructor makes to replace spawned points the land
/// mask still flags.
pub const MAX_RESAMPLE_ROUNDS: usize = 8;
