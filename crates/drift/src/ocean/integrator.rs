//! Stochastic RK4 advection over geographic coordinates.

use rand::Rng;

use super::OceanModel;
use crate::config::{DEG_TO_RAD, EARTH_RADIUS_M, POLE_EPSILON};

/// Convert a metre displacement at `lat` into `(dlon, dlat)` degrees.
#[inline]
pub fn meters_to_degrees_at(lat: f64, dx_m: f64, dy_m: f64) -> (f64, f64) {
    let dlat = dy_m / (EARTH_RADIUS_M * DEG_TO_RAD);
    let dlon = dx_m / (EARTH_RADIUS_M * (lat * DEG_TO_RAD).cos() * DEG_TO_RAD + POLE_EPSILON);
    (dlon, dlat)
}

/// Batched [`meters_to_degrees_at`]; returns `(dlon, dlat)`.
pub fn meters_to_degrees(lat: &[f64], dx_m: &[f64], dy_m: &[f64]) -> (Vec<f64>, Vec<f64>) {
    lat.iter()
        .zip(dx_m.iter().zip(dy_m))
        .map(|(&la, (&dx, &dy))| meters_to_degrees_at(la, dx, dy))
        .unzip()
}

/// Degree displacement of one RK stage evaluated at the given positions.
struct Stage {
    dlon: Vec<f64>,
    dlat: Vec<f64>,
}

impl OceanModel {
    fn rk_stage<R: Rng + ?Sized>(&self, rng: &mut R, lat: &[f64], lon: &[f64]) -> Stage {
        let dt = self.dt();
        let (u, v) = self.velocity_field(lat, lon);
        let (du, dv) = self.diffusion_step(rng, lat.len());

        let dx: Vec<f64> = u.iter().zip(&du).map(|(u, du)| u * dt + du).collect();
        let dy: Vec<f64> = v.iter().zip(&dv).map(|(v, dv)| v * dt + dv).collect();
        let (dlon, dlat) = meters_to_degrees(lat, &dx, &dy);
        Stage { dlon, dlat }
    }

    /// Advance every unbeached particle by one step with classical RK4.
    ///
    /// Each of the four stages draws fresh diffusion. Beached particles keep
    /// their exact position. Latitude is clamped to [-90, 90] and longitude
    /// wrapped back into [-180, 180].
    ///
    /// `lat`, `lon` and `beached` are parallel slices of equal length.
    pub fn rk4_step<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        lat: &[f64],
        lon: &[f64],
        beached: &[bool],
    ) -> (Vec<f64>, Vec<f64>) {
        debug_assert_eq!(lat.len(), lon.len(), "rk4_step: lat/lon length mismatch");
        debug_assert_eq!(lat.len(), beached.len(), "rk4_step: beached length mismatch");
        let active: Vec<usize> = (0..lat.len()).filter(|&i| !beached[i]).collect();
        if active.is_empty() {
            return (lat.to_vec(), lon.to_vec());
        }

        let lat0: Vec<f64> = active.iter().map(|&i| lat[i]).collect();
        let lon0: Vec<f64> = active.iter().map(|&i| lon[i]).collect();
        let offset = |base: &[f64], delta: &[f64], scale: f64| -> Vec<f64> {
            base.iter().zip(delta).map(|(b, d)| b + scale * d).collect()
        };

        let k1 = self.rk_stage(rng, &lat0, &lon0);
        let k2 = self.rk_stage(
            rng,
            &offset(&lat0, &k1.dlat, 0.5),
            &offset(&lon0, &k1.dlon, 0.5),
        );
        let k3 = self.rk_stage(
            rng,
            &offset(&lat0, &k2.dlat, 0.5),
            &offset(&lon0, &k2.dlon, 0.5),
        );
        let k4 = self.rk_stage(
            rng,
            &offset(&lat0, &k3.dlat, 1.0),
            &offset(&lon0, &k3.dlon, 1.0),
        );

        let mut new_lat = lat.to_vec();
        let mut new_lon = lon.to_vec();
        for (j, &i) in active.iter().enumerate() {
            let dlat = (k1.dlat[j] + 2.0 * k2.dlat[j] + 2.0 * k3.dlat[j] + k4.dlat[j]) / 6.0;
            let dlon = (k1.dlon[j] + 2.0 * k2.dlon[j] + 2.0 * k3.dlon[j] + k4.dlon[j]) / 6.0;
            new_lat[i] += dlat;
            new_lon[i] += dlon;
        }

        for la in &mut new_lat {
            *la = la.clamp(-90.0, 90.0);
        }
        for lo in &mut new_lon {
            *lo = wrap_longitude(*lo);
        }
        (new_lat, new_lon)
    }
}

/// Single ±360 shift, enough for one step's displacement.
#[inline]
fn wrap_longitude(lon: f64) -> f64 {
    if lon < -180.0 {
        lon + 360.0
    } else if lon > 180.0 {
        lon - 360.0
    } else {
        lon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meters_to_degrees_equator() {
        let (dlon, dlat) = meters_to_degrees_at(0.0, 111_194.9, 111_194.9);
        assert!((dlat - 1.0).abs() < 1e-4, "dlat={dlat}");
        assert!((dlon - 1.0).abs() < 1e-4, "dlon={dlon}");
    }

    #[test]
    fn test_meters_to_degrees_longitude_stretches_with_latitude() {
        let (dlon_eq, _) = meters_to_degrees_at(0.0, 10_000.0, 0.0);
        let (dlon_60, _) = meters_to_degrees_at(60.0, 10_000.0, 0.0);
        assert!((dlon_60 / dlon_eq - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_meters_to_degrees_finite_at_pole() {
        let (dlon, dlat) = meters_to_degrees_at(90.0, 1000.0, 1000.0);
        assert!(dlon.is_finite());
        assert!(dlat.is_finite());
    }

    #[test]
    fn test_batched_conversion_matches_pointwise() {
        let lat = [10.0, 45.0, -30.0];
        let dx = [500.0, -2000.0, 0.0];
        let dy = [0.0, 1500.0, -700.0];
        let (dlon, dlat) = meters_to_degrees(&lat, &dx, &dy);
        for i in 0..3 {
            let (lo, la) = meters_to_degrees_at(lat[i], dx[i], dy[i]);
            assert_eq!(dlon[i], lo);
            assert_eq!(dlat[i], la);
        }
    }

    #[test]
    fn test_wrap_longitude() {
        assert_eq!(wrap_longitude(181.0), -179.0);
        assert_eq!(wrap_longitude(-181.0), 179.0);
        assert_eq!(wrap_longitude(180.0), 180.0);
        assert_eq!(wrap_longitude(-75.0), -75.0);
    }
}
