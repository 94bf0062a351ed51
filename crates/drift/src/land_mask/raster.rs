use serde::{Deserialize, Serialize};

use super::LandClassifier;
use crate::drift_error::DriftError;

/// Precomputed boolean land grid. Points outside the grid are ocean.
///
/// Always holds exactly `rows * cols` cells with a positive cell size;
/// deserialization goes through the same checks as [`RasterMask::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RasterDocument")]
pub struct RasterMask {
    lat_min: f64,
    lon_min: f64,
    cell_deg: f64,
    rows: usize,
    cols: usize,
    /// Row-major by latitude.
    cells: Vec<bool>,
}

/// Unchecked wire form of a raster.
#[derive(Deserialize)]
struct RasterDocument {
    lat_min: f64,
    lon_min: f64,
    cell_deg: f64,
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl TryFrom<RasterDocument> for RasterMask {
    type Error = DriftError;

    fn try_from(doc: RasterDocument) -> Result<Self, Self::Error> {
        RasterMask::new(
            doc.lat_min,
            doc.lon_min,
            doc.cell_deg,
            doc.rows,
            doc.cols,
            doc.cells,
        )
    }
}

fn check_cell_size(cell_deg: f64) -> Result<(), DriftError> {
    if cell_deg.is_finite() && cell_deg > 0.0 {
        Ok(())
    } else {
        Err(DriftError::Config(format!(
            "raster cell size must be positive, got {cell_deg}"
        )))
    }
}

impl RasterMask {
    pub fn new(
        lat_min: f64,
        lon_min: f64,
        cell_deg: f64,
        rows: usize,
        cols: usize,
        cells: Vec<bool>,
    ) -> Result<Self, DriftError> {
        check_cell_size(cell_deg)?;
        if !lat_min.is_finite() || !lon_min.is_finite() {
            return Err(DriftError::Config(format!(
                "raster origin must be finite, got ({lat_min}, {lon_min})"
            )));
        }
        if rows.checked_mul(cols) != Some(cells.len()) {
            return Err(DriftError::Config(format!(
                "raster of {rows}x{cols} needs {} cells, got {}",
                rows.saturating_mul(cols),
                cells.len()
            )));
        }
        Ok(Self {
            lat_min,
            lon_min,
            cell_deg,
            rows,
            cols,
            cells,
        })
    }

    /// Sample `source` at every cell centre of the window.
    pub fn bake<M: LandClassifier + ?Sized>(
        source: &M,
        lat_range: (f64, f64),
        lon_range: (f64, f64),
        cell_deg: f64,
    ) -> Result<Self, DriftError> {
        check_cell_size(cell_deg)?;
        let span = |range: (f64, f64)| -> Result<usize, DriftError> {
            let n = ((range.1 - range.0) / cell_deg).ceil();
            if n.is_finite() && n >= 0.0 {
                Ok(n as usize)
            } else {
                Err(DriftError::Config(format!(
                    "raster window {range:?} is not a finite ascending range"
                )))
            }
        };
        let rows = span(lat_range)?;
        let cols = span(lon_range)?;

        let mut cells = Vec::with_capacity(rows.saturating_mul(cols));
        for r in 0..rows {
            let lat = lat_range.0 + (r as f64 + 0.5) * cell_deg;
            for c in 0..cols {
                let lon = lon_range.0 + (c as f64 + 0.5) * cell_deg;
                cells.push(source.is_on_land(lat, lon));
            }
        }
        Self::new(lat_range.0, lon_range.0, cell_deg, rows, cols, cells)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell_deg(&self) -> f64 {
        self.cell_deg
    }

    fn cell_index(&self, lat: f64, lon: f64) -> Option<usize> {
        let r = ((lat - self.lat_min) / self.cell_deg).floor();
        let c = ((lon - self.lon_min) / self.cell_deg).floor();
        if !(r >= 0.0 && c >= 0.0) {
            return None;
        }
        let (r, c) = (r as usize, c as usize);
        (r < self.rows && c < self.cols).then(|| r * self.cols + c)
    }

    /// Fraction of cells marked as land.
    pub fn land_fraction(&self) -> f64 {
        if self.cells.is_empty() {
            return 0.0;
        }
        self.cells.iter().filter(|&&l| l).count() as f64 / self.cells.len() as f64
    }
}

impl LandClassifier for RasterMask {
    fn is_on_land(&self, lat: f64, lon: f64) -> bool {
        self.cell_index(lat, lon)
            .and_then(|i| self.cells.get(i).copied())
            .unwrap_or(false)
    }
}
