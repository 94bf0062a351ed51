//! Analytic velocity profiles. Each returns `(u, v)` in m/s and is exactly
//! zero outside its activation region.

use super::params::{
    BoundaryCurrentParams, GyreParams, OceanParams, ReturnCurrentParams, TradeWindParams,
};

/// Gyre: Gaussian speed decay with distance from the centre, direction
/// rotated 90 degrees counter-clockwise from the radius vector (westward on
/// the northern flank, northward on the eastern flank).
pub fn gyre_velocity(gyre: &GyreParams, lat: f64, lon: f64) -> (f64, f64) {
    let dlat = lat - gyre.center_lat;
    let dlon = lon - gyre.center_lon;
    let r = (dlat * dlat + dlon * dlon).sqrt() / gyre.radius_deg;
    let speed = gyre.peak_speed * (-r * r).exp();
    let angle = dlat.atan2(dlon);
    (-speed * angle.sin(), speed * angle.cos())
}

/// Sum over the jet segments whose zone contains the point.
pub fn boundary_current_velocity(jet: &BoundaryCurrentParams, lat: f64, lon: f64) -> (f64, f64) {
    let mut u = 0.0;
    let mut v = 0.0;
    for segment in &jet.segments {
        if !segment.zone.contains(lat, lon) {
            continue;
        }
        let offset = (lon - segment.axis_lon(lat)).abs() / jet.width_deg;
        let profile = (-offset * offset).exp();
        u += segment.u_factor * jet.strength * profile;
        v += segment.v_factor * jet.strength * profile;
    }
    (u, v)
}

pub fn return_current_velocity(current: &ReturnCurrentParams, lat: f64, lon: f64) -> (f64, f64) {
    if !current.zone.contains(lat, lon) {
        return (0.0, 0.0);
    }
    let y = (lat - current.center_lat) / current.efold_deg;
    let profile = (-y * y).exp();
    (
        current.u_factor * current.strength * profile,
        current.v_factor * current.strength * profile,
    )
}

/// Triangular weight peaking at the band centre, clipped to zero.
pub fn windage_velocity(wind: &TradeWindParams, lat: f64) -> (f64, f64) {
    if lat < wind.lat_min || lat > wind.lat_max {
        return (0.0, 0.0);
    }
    let weight = (1.0 - (lat - wind.center_lat).abs() / wind.half_width_deg).max(0.0);
    (
        wind.windage * wind.wind_u * weight,
        wind.windage * wind.wind_v * weight,
    )
}

/// Superposition of every circulation feature at one point.
pub fn total_velocity(params: &OceanParams, lat: f64, lon: f64) -> (f64, f64) {
    let (ug, vg) = gyre_velocity(&params.gyre, lat, lon);
    let (ub, vb) = boundary_current_velocity(&params.boundary_current, lat, lon);
    let (ur, vr) = return_current_velocity(&params.return_current, lat, lon);
    let (uw, vw) = windage_velocity(&params.trade_wind, lat);
    (ug + ub + ur + uw, vg + vb + vr + vw)
}
