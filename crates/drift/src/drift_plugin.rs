//! Bevy integration: one ensemble advanced a week per fixed tick.
//!
//! ```text
//! Spawn  →  Advance  →  Report
//! ```
//!
//! * **Spawn** – rebuilds the ensemble when `DriftConfig` changes after startup.
//! * **Advance** – one `ParticleEnsemble::step` per tick until the horizon.
//! * **Report** – progress logging; only reads the ensemble.

use bevy::log::{error, info};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::drift_error::DriftError;
use crate::drift_rng::{DriftRng, DEFAULT_SEED};
use crate::ensemble::{DriftMetrics, HistoryRetention, ParticleEnsemble, ReachCategory};
use crate::land_mask::LandMask;
use crate::ocean::{OceanModel, OceanParams};
use crate::release_site::ReleaseSite;

/// Twenty years of weekly steps.
pub const DEFAULT_HORIZON_STEPS: usize = 1040;

/// What to simulate, loadable from JSON. Missing fields take defaults.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    pub site: ReleaseSite,
    pub particles: usize,
    pub horizon_steps: usize,
    pub seed: u64,
    pub retention: HistoryRetention,
    /// Log a progress line every this many steps; 0 disables it.
    pub progress_interval: usize,
    pub ocean: OceanParams,
    pub land: LandMask,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            site: ReleaseSite::new_york(),
            particles: 1000,
            horizon_steps: DEFAULT_HORIZON_STEPS,
            seed: DEFAULT_SEED,
            retention: HistoryRetention::Full,
            progress_interval: 100,
            ocean: OceanParams::default(),
            land: LandMask::default(),
        }
    }
}

impl DriftConfig {
    pub fn from_json(json: &str) -> Result<Self, DriftError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn model(&self) -> OceanModel {
        OceanModel::new(self.ocean.clone(), self.land.clone())
    }

    /// Seeded generator and freshly spawned ensemble for this config.
    pub fn build(&self) -> Result<(ParticleEnsemble, DriftRng), DriftError> {
        let model = self.model();
        let mut rng = DriftRng::from_seed_u64(self.seed);
        let ensemble =
            ParticleEnsemble::from_site(model, &mut rng.0, &self.site, self.particles, self.retention)?;
        Ok((ensemble, rng))
    }
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum DriftSet {
    Spawn,
    Advance,
    Report,
}

/// Whether the current run has reached its horizon or failed to start.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct DriftStatus {
    pub finished: bool,
    pub failure: Option<DriftError>,
}

/// Sent once when an ensemble reaches the configured horizon.
#[derive(Event, Debug, Clone)]
pub struct DriftFinished {
    pub site: String,
    pub metrics: DriftMetrics,
    pub category: ReachCategory,
}

fn install_ensemble(commands: &mut Commands, status: &mut DriftStatus, config: &DriftConfig) {
    *status = DriftStatus::default();
    match config.build() {
        Ok((ensemble, rng)) => {
            info!(
                "Released {} particles from {} ({:.4}, {:.4}) for {} steps",
                ensemble.particle_count(),
                config.site.name,
                ensemble.release().lat,
                ensemble.release().lon,
                config.horizon_steps
            );
            commands.insert_resource(ensemble);
            commands.insert_resource(rng);
        }
        Err(e) => {
            error!("Could not release particles from {}: {}", config.site.name, e);
            commands.remove_resource::<ParticleEnsemble>();
            status.failure = Some(e);
        }
    }
}

pub fn spawn_ensemble(
    mut commands: Commands,
    config: Res<DriftConfig>,
    mut status: ResMut<DriftStatus>,
) {
    install_ensemble(&mut commands, &mut status, &config);
}

/// Start over whenever the config is replaced or edited.
pub fn respawn_on_config_change(
    mut commands: Commands,
    config: Res<DriftConfig>,
    mut status: ResMut<DriftStatus>,
) {
    if !config.is_changed() || config.is_added() {
        return;
    }
    install_ensemble(&mut commands, &mut status, &config);
}

pub fn advance_drift(
    config: Res<DriftConfig>,
    mut ensemble: ResMut<ParticleEnsemble>,
    mut rng: ResMut<DriftRng>,
    mut status: ResMut<DriftStatus>,
    mut finished: EventWriter<DriftFinished>,
) {
    if status.finished {
        return;
    }
    if ensemble.steps_elapsed() < config.horizon_steps {
        ensemble.step(&mut rng.0);
    }
    if ensemble.steps_elapsed() >= config.horizon_steps {
        status.finished = true;
        let metrics = ensemble.metrics();
        let category = metrics.category();
        info!(
            "{} finished after {:.1} years: {} ({:.1}% reach open ocean)",
            config.site.name,
            metrics.elapsed_years,
            category,
            metrics.ocean_reach_fraction * 100.0
        );
        finished.send(DriftFinished {
            site: config.site.name.clone(),
            metrics,
            category,
        });
    }
}

pub fn report_progress(config: Res<DriftConfig>, ensemble: Res<ParticleEnsemble>) {
    let step = ensemble.steps_elapsed();
    if !ensemble.is_changed()
        || step == 0
        || config.progress_interval == 0
        || step % config.progress_interval != 0
    {
        return;
    }
    let metrics = ensemble.metrics();
    info!(
        "Step {}/{} ({:.1} y): {} beached, {} drifting, mean {:.0} km",
        step,
        config.horizon_steps,
        metrics.elapsed_years,
        metrics.beached_count,
        metrics.ocean_count,
        metrics.mean_distance_km
    );
}

pub struct DriftPlugin;

impl Plugin for DriftPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DriftConfig>()
            .init_resource::<DriftRng>()
            .init_resource::<DriftStatus>()
            .add_event::<DriftFinished>()
            .configure_sets(
                FixedUpdate,
                (DriftSet::Spawn, DriftSet::Advance, DriftSet::Report).chain(),
            )
            .add_systems(Startup, spawn_ensemble)
            .add_systems(
                FixedUpdate,
                (
                    respawn_on_config_change.in_set(DriftSet::Spawn),
                    advance_drift
                        .in_set(DriftSet::Advance)
                        .run_if(resource_exists::<ParticleEnsemble>),
                    report_progress
                        .in_set(DriftSet::Report)
                        .run_if(resource_exists::<ParticleEnsemble>),
                ),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_from_partial_json() {
        let config = DriftConfig::from_json(r#"{"particles": 25, "seed": 7}"#).unwrap();
        assert_eq!(config.particles, 25);
        assert_eq!(config.seed, 7);
        assert_eq!(config.horizon_steps, DEFAULT_HORIZON_STEPS);
        assert_eq!(config.site, ReleaseSite::new_york());
    }

    #[test]
    fn test_config_retention_json() {
        let config =
            DriftConfig::from_json(r#"{"retention": {"window": 12}}"#).expect("valid config");
        assert_eq!(config.retention, HistoryRetention::Window(12));
    }

    #[test]
    fn test_config_land_mask_from_json() {
        let raster = LandMask::default()
            .rasterize((30.0, 50.0), (-80.0, -60.0), 0.25)
            .unwrap();
        let json = format!(r#"{{"land": {}}}"#, serde_json::to_string(&raster).unwrap());
        let config = DriftConfig::from_json(&json).expect("valid config");
        assert_eq!(config.land, raster);
        assert_eq!(config.model().land_mask(), &raster);
        assert_eq!(DriftConfig::default().land, LandMask::default());
    }

    #[test]
    fn test_config_build_is_seeded() {
        let config = DriftConfig {
            particles: 30,
            ..Default::default()
        };
        let (a, _) = config.build().unwrap();
        let (b, _) = config.build().unwrap();
        assert_eq!(a.current_positions(), b.current_positions());
        assert_eq!(a.particle_count(), 30);
    }
}
