//! # TestDrift: headless harness for the drift plugin
//!
//! Wraps `bevy::app::App` + `DriftPlugin` over `MinimalPlugins` so tests can
//! drive fixed ticks directly and inspect the resulting resources.

use bevy::app::App;
use bevy::prelude::*;

use crate::drift_plugin::{DriftConfig, DriftFinished, DriftPlugin, DriftStatus};
use crate::ensemble::{DriftMetrics, HistoryRetention, ParticleEnsemble};
use crate::release_site::ReleaseSite;

pub struct TestDrift {
    app: App,
}

impl Default for TestDrift {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDrift {
    /// Small default run: 100 particles off New York for 52 steps.
    pub fn new() -> Self {
        Self::with_config(DriftConfig {
            particles: 100,
            horizon_steps: 52,
            progress_interval: 0,
            ..Default::default()
        })
    }

    pub fn with_config(config: DriftConfig) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(config);
        app.add_plugins(DriftPlugin);
        // Run Startup so the ensemble exists before the first tick.
        app.update();
        Self { app }
    }

    pub fn with_site(site: ReleaseSite, particles: usize, horizon_steps: usize) -> Self {
        Self::with_config(DriftConfig {
            site,
            particles,
            horizon_steps,
            progress_interval: 0,
            ..Default::default()
        })
    }

    pub fn with_retention(retention: HistoryRetention) -> Self {
        Self::with_config(DriftConfig {
            particles: 50,
            horizon_steps: 20,
            progress_interval: 0,
            retention,
            ..Default::default()
        })
    }

    // -----------------------------------------------------------------------
    // Simulation
    // -----------------------------------------------------------------------

    /// Run the `FixedUpdate` schedule `n` times, one drift step each.
    pub fn tick(&mut self, n: usize) {
        for _ in 0..n {
            self.app.world_mut().run_schedule(FixedUpdate);
        }
    }

    /// Tick until the run finishes, at most `limit` times. Returns ticks run.
    pub fn run_to_horizon(&mut self, limit: usize) -> usize {
        let mut ticks = 0;
        while !self.status().finished && ticks < limit {
            self.tick(1);
            ticks += 1;
        }
        ticks
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    pub fn resource<T: Resource>(&self) -> &T {
        self.app.world().resource::<T>()
    }

    pub fn config_mut(&mut self) -> Mut<'_, DriftConfig> {
        self.app.world_mut().resource_mut::<DriftConfig>()
    }

    pub fn ensemble(&self) -> Option<&ParticleEnsemble> {
        self.app.world().get_resource::<ParticleEnsemble>()
    }

    pub fn status(&self) -> &DriftStatus {
        self.resource::<DriftStatus>()
    }

    pub fn steps_elapsed(&self) -> usize {
        self.ensemble().map_or(0, ParticleEnsemble::steps_elapsed)
    }

    pub fn metrics(&self) -> Option<DriftMetrics> {
        self.ensemble().map(ParticleEnsemble::metrics)
    }

    /// Every `DriftFinished` event still buffered.
    pub fn finished_events(&self) -> Vec<DriftFinished> {
        self.resource::<Events<DriftFinished>>()
            .iter_current_update_events()
            .cloned()
            .collect()
    }
}
