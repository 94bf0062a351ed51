//! Named release locations and how they map to a spawn disk.

use serde::{Deserialize, Serialize};

use crate::config::{COASTAL_RELEASE_RADIUS_KM, OUTLET_RELEASE_RADIUS_KM};
use crate::drift_error::DriftError;
use crate::ensemble::{HistoryRetention, ParticleEnsemble, ReleasePoint};
use crate::ocean::OceanModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseKind {
    #[default]
    Coastal,
    /// Discharges to the sea through a river mouth or estuary.
    Inland,
    #[serde(other)]
    Other,
}

/// Ocean entry point for an inland site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Outlet {
    pub lat: f64,
    pub lon: f64,
}

/// A city or facility particles are released from.
///
/// Field names follow the city catalogue JSON (`city`, `type`, `outlet`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseSite {
    #[serde(rename = "city")]
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: ReleaseKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outlet: Option<Outlet>,
}

impl ReleaseSite {
    pub fn coastal(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
            region: None,
            kind: ReleaseKind::Coastal,
            outlet: None,
        }
    }

    pub fn inland(name: impl Into<String>, lat: f64, lon: f64, outlet: Outlet) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
            region: None,
            kind: ReleaseKind::Inland,
            outlet: Some(outlet),
        }
    }

    pub fn new_york() -> Self {
        let mut site = Self::coastal("New York", 40.7128, -74.0060);
        site.region = Some("North America".to_string());
        site
    }

    /// Inland sites with a known outlet release there over a wider disk;
    /// everything else releases at the site itself.
    pub fn release_point(&self) -> ReleasePoint {
        match (self.kind, self.outlet) {
            (ReleaseKind::Inland, Some(outlet)) => {
                ReleasePoint::new(outlet.lat, outlet.lon, OUTLET_RELEASE_RADIUS_KM)
            }
            _ => ReleasePoint::new(self.lat, self.lon, COASTAL_RELEASE_RADIUS_KM),
        }
    }

    pub fn load_catalogue(json: &str) -> Result<Vec<Self>, DriftError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for ReleaseSite {
    fn default() -> Self {
        Self::new_york()
    }
}

impl ParticleEnsemble {
    /// Build an ensemble released from a named site.
    pub fn from_site<R: rand::Rng + ?Sized>(
        model: OceanModel,
        rng: &mut R,
        site: &ReleaseSite,
        n: usize,
        retention: HistoryRetention,
    ) -> Result<Self, DriftError> {
        Self::spawn_with_retention(model, rng, n, site.release_point(), retention)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coastal_site_releases_in_place() {
        let p = ReleaseSite::new_york().release_point();
        assert_eq!((p.lat, p.lon, p.radius_km), (40.7128, -74.0060, 20.0));
    }

    #[test]
    fn test_inland_site_uses_outlet() {
        let outlet = Outlet {
            lat: 29.95,
            lon: -89.25,
        };
        let p = ReleaseSite::inland("St. Louis", 38.627, -90.199, outlet).release_point();
        assert_eq!((p.lat, p.lon, p.radius_km), (29.95, -89.25, 30.0));
    }

    #[test]
    fn test_inland_without_outlet_falls_back() {
        let mut site = ReleaseSite::coastal("Somewhere", 45.0, -60.0);
        site.kind = ReleaseKind::Inland;
        let p = site.release_point();
        assert_eq!((p.lat, p.lon, p.radius_km), (45.0, -60.0, 20.0));
    }

    #[test]
    fn test_catalogue_parsing() {
        let json = r#"[
            {"city": "Boston", "lat": 42.36, "lon": -71.06, "region": "US East"},
            {"city": "Albany", "lat": 42.65, "lon": -73.75, "type": "inland",
             "outlet": {"lat": 40.6, "lon": -73.9}},
            {"city": "Lisbon", "lat": 38.72, "lon": -9.14, "type": "capital"}
        ]"#;
        let sites = ReleaseSite::load_catalogue(json).expect("valid catalogue");
        assert_eq!(sites.len(), 3);
        assert_eq!(sites[0].kind, ReleaseKind::Coastal);
        assert_eq!(sites[1].release_point().radius_km, 30.0);
        assert_eq!(sites[2].kind, ReleaseKind::Other);
        assert_eq!(sites[2].release_point().lat, 38.72);
    }

    #[test]
    fn test_catalogue_parse_error() {
        let err = ReleaseSite::load_catalogue("[{\"city\": 3}]").unwrap_err();
        assert!(matches!(err, DriftError::Config(_)));
    }
}
