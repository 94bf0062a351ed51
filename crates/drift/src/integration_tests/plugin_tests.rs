use crate::drift_error::DriftError;
use crate::drift_plugin::DriftConfig;
use crate::ensemble::HistoryRetention;
use crate::release_site::ReleaseSite;
use crate::test_harness::TestDrift;

// ====================================================================
// Startup
// ====================================================================

#[test]
fn test_startup_spawns_ensemble() {
    let drift = TestDrift::new();
    let ensemble = drift.ensemble().expect("ensemble inserted at startup");
    assert_eq!(ensemble.particle_count(), 100);
    assert_eq!(ensemble.steps_elapsed(), 0);
    assert!(!drift.status().finished);
    assert!(drift.status().failure.is_none());
}

#[test]
fn test_unspawnable_site_records_failure() {
    let mut drift = TestDrift::with_site(ReleaseSite::coastal("Adriatic", 43.0, 15.0), 20, 10);
    assert!(drift.ensemble().is_none());
    assert!(matches!(
        drift.status().failure,
        Some(DriftError::NoOceanAtRelease { .. })
    ));

    // Advancing without an ensemble is a no-op.
    drift.tick(5);
    assert_eq!(drift.steps_elapsed(), 0);
    assert!(drift.finished_events().is_empty());
}

// ====================================================================
// Advancing
// ====================================================================

#[test]
fn test_one_step_per_tick() {
    let mut drift = TestDrift::new();
    drift.tick(3);
    assert_eq!(drift.steps_elapsed(), 3);
    drift.tick(7);
    assert_eq!(drift.steps_elapsed(), 10);
}

#[test]
fn test_stops_at_horizon_and_fires_once() {
    let mut drift = TestDrift::with_site(ReleaseSite::new_york(), 40, 12);
    let ticks = drift.run_to_horizon(100);
    assert_eq!(ticks, 12);
    assert!(drift.status().finished);

    drift.tick(5);
    assert_eq!(drift.steps_elapsed(), 12);

    let events = drift.finished_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].site, "New York");
    assert_eq!(events[0].metrics.steps_elapsed, 12);
    assert_eq!(events[0].category, events[0].metrics.category());
    assert_eq!(Some(events[0].metrics.clone()), drift.metrics());
}

#[test]
fn test_retention_from_config() {
    let mut drift = TestDrift::with_retention(HistoryRetention::Window(3));
    drift.tick(10);
    let ensemble = drift.ensemble().expect("ensemble");
    assert_eq!(ensemble.history().retained_steps(), vec![0, 8, 9, 10]);
    assert!(ensemble.positions_at_step(5).is_err());
}

#[test]
fn test_config_change_restarts_run() {
    let mut drift = TestDrift::new();
    drift.tick(6);
    assert_eq!(drift.steps_elapsed(), 6);

    drift.config_mut().particles = 25;
    drift.tick(1);
    let ensemble = drift.ensemble().expect("respawned ensemble");
    assert_eq!(ensemble.particle_count(), 25);
    // Rebuilt in Spawn, then advanced once in the same tick.
    assert_eq!(ensemble.steps_elapsed(), 1);
}

#[test]
fn test_zero_horizon_finishes_immediately() {
    let mut drift = TestDrift::with_config(DriftConfig {
        particles: 10,
        horizon_steps: 0,
        progress_interval: 0,
        ..Default::default()
    });
    drift.tick(1);
    assert!(drift.status().finished);
    assert_eq!(drift.steps_elapsed(), 0);
    assert_eq!(drift.finished_events().len(), 1);
}
