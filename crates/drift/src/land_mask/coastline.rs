use serde::{Deserialize, Serialize};

use super::LandClassifier;

/// Which side of a coastline curve is land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LandSide {
    /// Land lies west of the curve (an eastern seaboard).
    West,
    /// Land lies east of the curve (a western seaboard).
    East,
}

/// A coastline approximated as longitude as a piecewise-linear function of
/// latitude, active over `[lat_min, lat_max]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coastline {
    pub name: String,
    pub lat_min: f64,
    pub lat_max: f64,
    /// `(lat, lon)` breakpoints in ascending latitude.
    pub knots: Vec<(f64, f64)>,
    pub land_side: LandSide,
    /// Extra degrees the coast is pushed toward land before testing.
    #[serde(default)]
    pub buffer_deg: f64,
}

impl Coastline {
    /// Coast longitude at `lat`, held constant beyond the first/last knot.
    pub fn coast_lon(&self, lat: f64) -> f64 {
        let (first, last) = match (self.knots.first(), self.knots.last()) {
            (Some(f), Some(l)) => (*f, *l),
            _ => return f64::NAN,
        };
        if lat <= first.0 {
            return first.1;
        }
        if lat >= last.0 {
            return last.1;
        }
        for pair in self.knots.windows(2) {
            let (lat0, lon0) = pair[0];
            let (lat1, lon1) = pair[1];
            if lat <= lat1 {
                let t = (lat - lat0) / (lat1 - lat0);
                return lon0 + t * (lon1 - lon0);
            }
        }
        last.1
    }

    /// True when the point is inside the active band and on the land side.
    pub fn is_landward(&self, lat: f64, lon: f64) -> bool {
        if lat < self.lat_min || lat > self.lat_max {
            return false;
        }
        let coast = self.coast_lon(lat);
        match self.land_side {
            LandSide::West => lon < coast - self.buffer_deg,
            LandSide::East => lon > coast + self.buffer_deg,
        }
    }
}

/// Axis-aligned latitude/longitude rectangle, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLonBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl LatLonBox {
    pub const fn new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Self {
        Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        }
    }

    #[inline]
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.lat_min && lat <= self.lat_max && lon >= self.lon_min && lon <= self.lon_max
    }
}

/// Land mask built from coastline curves plus enclosed-basin rectangles.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CoastlineMask {
    pub coastlines: Vec<Coastline>,
    /// Regions treated as land outright (inland seas, semi-enclosed basins).
    pub exclusions: Vec<LatLonBox>,
}

impl CoastlineMask {
    /// The stylized North Atlantic basin: the American eastern seaboard, the
    /// European/African western seaboard, the Mediterranean and the Caribbean.
    pub fn north_atlantic() -> Self {
        let americas = Coastline {
            name: "north_america".to_string(),
            lat_min: 25.0,
            lat_max: 60.0,
            knots: vec![
                (25.0, -80.5),
                (30.0, -81.5),
                (35.0, -77.0),
                (40.0, -75.5),
                (45.0, -68.0),
                (50.0, -61.0),
                (55.0, -58.0),
                (60.0, -56.0),
            ],
            land_side: LandSide::West,
            buffer_deg: 0.0,
        };
        let europe_africa = Coastline {
            name: "europe_africa".to_string(),
            lat_min: 10.0,
            lat_max: 60.0,
            knots: vec![
                (10.0, -17.0),
                (20.0, -16.0),
                (30.0, -9.0),
                (35.0, -9.0),
                (40.0, -9.0),
                (45.0, -2.0),
                (50.0, -5.0),
                (55.0, -7.0),
                (60.0, -10.0),
            ],
            land_side: LandSide::East,
            buffer_deg: 0.2,
        };

        Self {
            coastlines: vec![americas, europe_africa],
            exclusions: vec![
                // Mediterranean
                LatLonBox::new(30.0, 46.0, 0.0, 36.0),
                // Caribbean
                LatLonBox::new(10.0, 25.0, -85.0, -60.0),
            ],
        }
    }
}

impl LandClassifier for CoastlineMask {
    fn is_on_land(&self, lat: f64, lon: f64) -> bool {
        self.coastlines.iter().any(|c| c.is_landward(lat, lon))
            || self.exclusions.iter().any(|b| b.contains(lat, lon))
    }
}
