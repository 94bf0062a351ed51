use serde::{Deserialize, Serialize};

use crate::config::SECONDS_PER_STEP;
use crate::land_mask::LatLonBox;

/// Closed gyre with a Gaussian radial speed profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GyreParams {
    pub center_lat: f64,
    pub center_lon: f64,
    /// Radius in degrees at which speed has decayed to `peak_speed / e`.
    pub radius_deg: f64,
    /// m/s
    pub peak_speed: f64,
}

impl Default for GyreParams {
    fn default() -> Self {
        Self {
            center_lat: 30.0,
            center_lon: -40.0,
            radius_deg: 20.0,
            peak_speed: 0.5,
        }
    }
}

/// One straight piece of a western boundary current.
///
/// Active only inside `zone`. The jet axis is `path_lon + (lat - path_lat) * path_slope`
/// and the velocity is `(u_factor, v_factor) * strength * profile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JetSegment {
    pub zone: LatLonBox,
    pub path_lon: f64,
    pub path_lat: f64,
    /// Degrees of longitude per degree of latitude.
    pub path_slope: f64,
    pub u_factor: f64,
    pub v_factor: f64,
}

impl JetSegment {
    #[inline]
    pub fn axis_lon(&self, lat: f64) -> f64 {
        self.path_lon + (lat - self.path_lat) * self.path_slope
    }
}

/// Fast narrow jet hugging the American coast (the Gulf Stream).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryCurrentParams {
    /// m/s
    pub strength: f64,
    /// Cross-track e-folding width, degrees of longitude.
    pub width_deg: f64,
    pub segments: Vec<JetSegment>,
}

impl Default for BoundaryCurrentParams {
    fn default() -> Self {
        Self {
            strength: 2.0,
            width_deg: 2.0,
            segments: vec![
                // Florida to Cape Hatteras: mostly northward.
                JetSegment {
                    zone: LatLonBox::new(25.0, 35.0, -80.0, -70.0),
                    path_lon: -75.0,
                    path_lat: 25.0,
                    path_slope: 0.0,
                    u_factor: 0.3,
                    v_factor: 1.0,
                },
                // Separation from the shelf: veers northeast.
                JetSegment {
                    zone: LatLonBox::new(35.0, 42.0, -75.0, -65.0),
                    path_lon: -75.0,
                    path_lat: 35.0,
                    path_slope: 10.0 / 7.0,
                    u_factor: 1.5,
                    v_factor: 0.7,
                },
            ],
        }
    }
}

/// Broad eastward drift toward Europe (the North Atlantic Current).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnCurrentParams {
    pub zone: LatLonBox,
    /// m/s
    pub strength: f64,
    pub center_lat: f64,
    /// Latitudinal e-folding scale, degrees.
    pub efold_deg: f64,
    pub u_factor: f64,
    pub v_factor: f64,
}

impl Default for ReturnCurrentParams {
    fn default() -> Self {
        Self {
            zone: LatLonBox::new(40.0, 55.0, -50.0, -10.0),
            strength: 2.0,
            center_lat: 47.0,
            efold_deg: 5.0,
            u_factor: 0.8,
            v_factor: 0.1,
        }
    }
}

/// Trade-wind windage on floating debris.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeWindParams {
    pub lat_min: f64,
    pub lat_max: f64,
    /// Latitude of full strength; weight falls linearly to zero at
    /// `center_lat ± half_width_deg`.
    pub center_lat: f64,
    pub half_width_deg: f64,
    /// Wind vector, m/s.
    pub wind_u: f64,
    pub wind_v: f64,
    /// Fraction of the wind transferred to the particle.
    pub windage: f64,
}

impl Default for TradeWindParams {
    fn default() -> Self {
        Self {
            lat_min: 10.0,
            lat_max: 30.0,
            center_lat: 20.0,
            half_width_deg: 10.0,
            wind_u: -5.0,
            wind_v: 2.0,
            windage: 0.03,
        }
    }
}

/// Probabilistic stranding near the coast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeachingParams {
    /// Chance per step that a near-coast particle strands.
    pub probability: f64,
    pub trigger_distance_km: f64,
    /// No particle strands before this many steps have elapsed.
    pub min_steps: usize,
}

impl Default for BeachingParams {
    fn default() -> Self {
        Self {
            probability: 0.15,
            trigger_distance_km: 15.0,
            min_steps: 4,
        }
    }
}

/// Full parameter set of the ocean model. Missing JSON fields keep defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OceanParams {
    pub gyre: GyreParams,
    pub boundary_current: BoundaryCurrentParams,
    pub return_current: ReturnCurrentParams,
    pub trade_wind: TradeWindParams,
    /// Isotropic eddy diffusivity, m^2/s.
    pub diffusion_coefficient: f64,
    pub beaching: BeachingParams,
    /// Integration step, seconds.
    pub dt_seconds: f64,
}

impl Default for OceanParams {
    fn default() -> Self {
        Self {
            gyre: GyreParams::default(),
            boundary_current: BoundaryCurrentParams::default(),
            return_current: ReturnCurrentParams::default(),
            trade_wind: TradeWindParams::default(),
            diffusion_coefficient: 100.0,
            beaching: BeachingParams::default(),
            dt_seconds: SECONDS_PER_STEP,
        }
    }
}
