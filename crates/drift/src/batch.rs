//! Sequential multi-site runs sharing one generator.

use bevy::log::{info, warn};
use rand::Rng;
use serde::Serialize;

use crate::drift_error::DriftError;
use crate::ensemble::{DriftMetrics, HistoryRetention, ParticleEnsemble, ReachCategory};
use crate::ocean::OceanModel;
use crate::release_site::ReleaseSite;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteReport {
    pub site: String,
    pub lat: f64,
    pub lon: f64,
    pub metrics: DriftMetrics,
    pub category: ReachCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteFailure {
    pub site: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BatchReport {
    pub reports: Vec<SiteReport>,
    pub failures: Vec<SiteFailure>,
}

impl BatchReport {
    pub fn to_json(&self) -> Result<String, DriftError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Run every site in order for `n_steps`, drawing from the same generator.
///
/// A site that cannot be spawned is recorded as a failure and the batch moves on.
/// Histories are not kept beyond the latest step.
pub fn run_batch<R: Rng + ?Sized>(
    model: &OceanModel,
    rng: &mut R,
    sites: &[ReleaseSite],
    particles_per_site: usize,
    n_steps: usize,
) -> BatchReport {
    let mut batch = BatchReport::default();

    for site in sites {
        let mut ensemble = match ParticleEnsemble::from_site(
            model.clone(),
            rng,
            site,
            particles_per_site,
            HistoryRetention::Window(1),
        ) {
            Ok(e) => e,
            Err(e) => {
                warn!("Skipping {}: {}", site.name, e);
                batch.failures.push(SiteFailure {
                    site: site.name.clone(),
                    error: e.to_string(),
                });
                continue;
            }
        };

        ensemble.simulate(rng, n_steps);
        let metrics = ensemble.metrics();
        let category = metrics.category();
        info!(
            "{}: {} reach open ocean ({:.1}%), median drift {:.0} km",
            site.name,
            category,
            metrics.ocean_reach_fraction * 100.0,
            metrics.median_distance_km
        );
        batch.reports.push(SiteReport {
            site: site.name.clone(),
            lat: site.lat,
            lon: site.lon,
            metrics,
            category,
        });
    }

    batch
}
