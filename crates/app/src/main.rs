//! Headless driftcast runner.
//!
//! * `DRIFTCAST_CONFIG=<path>` – JSON `DriftConfig` for a single-site run.
//! * `DRIFTCAST_BATCH=<path>` – JSON array of release sites; every site runs
//!   for the configured horizon and a batch report is printed.
//!
//! Reports go to stdout as JSON, logs to stderr.

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;

use drift::{
    run_batch, DriftConfig, DriftFinished, DriftPlugin, DriftRng, DriftStatus, ReleaseSite,
    SiteReport,
};

/// Fixed ticks per second; each tick is one simulated week.
const STEPS_PER_SECOND: f64 = 1000.0;

fn main() -> AppExit {
    let config = match load_config() {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("driftcast: {msg}");
            return AppExit::error();
        }
    };

    if let Ok(path) = std::env::var("DRIFTCAST_BATCH") {
        return run_batch_mode(&path, &config);
    }

    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::ZERO)),
        LogPlugin::default(),
    ))
    .insert_resource(Time::<Fixed>::from_hz(STEPS_PER_SECOND))
    .insert_resource(config)
    .add_plugins(DriftPlugin)
    .add_systems(Update, exit_when_done);

    app.run()
}

fn load_config() -> Result<DriftConfig, String> {
    let Ok(path) = std::env::var("DRIFTCAST_CONFIG") else {
        return Ok(DriftConfig::default());
    };
    let json = std::fs::read_to_string(&path).map_err(|e| format!("{path}: {e}"))?;
    DriftConfig::from_json(&json).map_err(|e| format!("{path}: {e}"))
}

fn run_batch_mode(path: &str, config: &DriftConfig) -> AppExit {
    // Only the log plugin is needed; the batch itself runs outside any schedule.
    let mut app = App::new();
    app.add_plugins(LogPlugin::default());

    let sites = match std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|json| ReleaseSite::load_catalogue(&json).map_err(|e| e.to_string()))
    {
        Ok(s) => s,
        Err(e) => {
            error!("Could not load sites from {}: {}", path, e);
            return AppExit::error();
        }
    };

    let model = config.model();
    let mut rng = DriftRng::from_seed_u64(config.seed);
    let batch = run_batch(
        &model,
        &mut rng.0,
        &sites,
        config.particles,
        config.horizon_steps,
    );
    info!(
        "Batch done: {} sites reported, {} failed",
        batch.reports.len(),
        batch.failures.len()
    );

    match batch.to_json() {
        Ok(json) => {
            println!("{json}");
            AppExit::Success
        }
        Err(e) => {
            error!("{}", e);
            AppExit::error()
        }
    }
}

fn exit_when_done(
    config: Res<DriftConfig>,
    status: Res<DriftStatus>,
    mut finished: EventReader<DriftFinished>,
    mut exit: EventWriter<AppExit>,
) {
    if status.failure.is_some() {
        exit.send(AppExit::error());
        return;
    }
    for event in finished.read() {
        let report = SiteReport {
            site: event.site.clone(),
            lat: config.site.lat,
            lon: config.site.lon,
            metrics: event.metrics.clone(),
            category: event.category,
        };
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => error!("Could not serialize report: {}", e),
        }
        exit.send(AppExit::Success);
    }
}
