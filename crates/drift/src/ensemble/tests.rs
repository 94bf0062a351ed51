use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::*;
use crate::land_mask::LandMask;
use crate::ocean::OceanParams;

const NYC: ReleasePoint = ReleasePoint {
    lat: 40.7128,
    lon: -74.0060,
    radius_km: 20.0,
};

fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

fn nyc_ensemble(seed: u64, n: usize) -> (ParticleEnsemble, ChaCha8Rng) {
    let mut rng = rng(seed);
    let ens = ParticleEnsemble::spawn(OceanModel::default(), &mut rng, n, NYC)
        .expect("NYC has ocean offshore");
    (ens, rng)
}

/// Still water next to the US coast where every nearby particle strands at once.
fn sticky_coast() -> OceanModel {
    let mut params = OceanParams::default();
    params.gyre.peak_speed = 0.0;
    params.boundary_current.strength = 0.0;
    params.return_current.strength = 0.0;
    params.trade_wind.windage = 0.0;
    params.beaching.probability = 1.0;
    params.beaching.trigger_distance_km = 50.0;
    params.beaching.min_steps = 0;
    OceanModel::new(params, LandMask::default())
}

// ====================================================================
// Construction
// ====================================================================

#[test]
fn test_spawn_initial_state() {
    let (ens, _) = nyc_ensemble(1, 200);
    assert_eq!(ens.particle_count(), 200);
    assert_eq!(ens.steps_elapsed(), 0);
    assert!(ens.beached().iter().all(|&b| !b));
    assert!(ens.distances_km().iter().all(|&d| d == 0.0));
    assert_eq!(ens.history().len(), 1);
    assert_eq!(ens.positions_at_step(0).unwrap(), ens.current_positions());
    assert!(ens
        .model()
        .classify_land(ens.latitudes(), ens.longitudes())
        .iter()
        .all(|&land| !land));
}

#[test]
fn test_spawn_rejects_bad_release() {
    let model = OceanModel::default();
    let mut rng = rng(0);

    let nan = ReleasePoint::new(f64::NAN, -74.0, 20.0);
    assert!(matches!(
        ParticleEnsemble::spawn(model.clone(), &mut rng, 10, nan),
        Err(DriftError::InvalidRelease(_))
    ));

    let zero_radius = ReleasePoint::new(40.7, -74.0, 0.0);
    assert!(matches!(
        ParticleEnsemble::spawn(model.clone(), &mut rng, 10, zero_radius),
        Err(DriftError::InvalidRelease(_))
    ));

    assert_eq!(
        ParticleEnsemble::spawn(model, &mut rng, 0, NYC).unwrap_err(),
        DriftError::EmptyEnsemble
    );
}

#[test]
fn test_spawn_all_land_fails() {
    // Interior of the Mediterranean exclusion box.
    let release = ReleasePoint::new(38.0, 18.0, 20.0);
    let err = ParticleEnsemble::spawn(OceanModel::default(), &mut rng(3), 50, release).unwrap_err();
    assert!(matches!(err, DriftError::NoOceanAtRelease { .. }));
}

// ====================================================================
// Stepping
// ====================================================================

#[test]
fn test_no_beaching_before_min_steps() {
    let (mut ens, mut rng) = nyc_ensemble(7, 300);
    ens.simulate(&mut rng, 4);
    assert_eq!(ens.steps_elapsed(), 4);
    assert!(ens.beached().iter().all(|&b| !b));
}

#[test]
fn test_beached_particles_are_frozen() {
    let release = ReleasePoint::new(40.7, -74.3, 10.0);
    let mut rng = rng(11);
    let mut ens = ParticleEnsemble::spawn(sticky_coast(), &mut rng, 200, release).unwrap();

    let mut prev = ens.current_positions();
    let mut prev_dist = ens.distances_km().to_vec();
    for _ in 0..12 {
        ens.step(&mut rng);
        let now = ens.current_positions();
        for i in 0..now.len() {
            if prev.beached[i] {
                assert!(now.beached[i], "particle {i} un-beached");
                assert_eq!(now.lat[i], prev.lat[i]);
                assert_eq!(now.lon[i], prev.lon[i]);
                assert_eq!(ens.distances_km()[i], prev_dist[i]);
            }
        }
        prev = now;
        prev_dist = ens.distances_km().to_vec();
    }
    assert!(ens.metrics().beached_count > 0);
}

#[test]
fn test_distance_is_monotone() {
    let (mut ens, mut rng) = nyc_ensemble(5, 150);
    let mut prev = ens.distances_km().to_vec();
    ens.simulate_with(&mut rng, 20, |_, e| {
        for (now, before) in e.distances_km().iter().zip(&prev) {
            assert!(*now >= *before);
            assert!(now.is_finite());
        }
        prev = e.distances_km().to_vec();
    });
    assert!(ens.metrics().max_distance_km > 0.0);
}

#[test]
fn test_simulate_with_reports_each_step() {
    let (mut ens, mut rng) = nyc_ensemble(9, 20);
    let mut seen = Vec::new();
    ens.simulate_with(&mut rng, 5, |i, e| seen.push((i, e.steps_elapsed())));
    assert_eq!(seen, vec![(0, 1), (1, 2), (2, 3), (3, 4), (4, 5)]);
    assert_eq!(ens.history().len(), 6);
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let run = || {
        let (mut ens, mut rng) = nyc_ensemble(42, 1000);
        ens.simulate(&mut rng, 52);
        ens
    };
    let a = run();
    let b = run();
    assert_eq!(a.metrics(), b.metrics());
    assert_eq!(a.current_positions(), b.current_positions());

    let reach = a.metrics().ocean_reach_fraction;
    assert!(reach > 0.0 && reach < 1.0, "reach={reach}");
    assert_eq!(a.metrics().elapsed_years, 1.0);
}

// ====================================================================
// History and queries
// ====================================================================

#[test]
fn test_latest_snapshot_matches_current() {
    let (mut ens, mut rng) = nyc_ensemble(2, 50);
    ens.simulate(&mut rng, 8);
    assert_eq!(
        ens.positions_at_step(ens.steps_elapsed()).unwrap(),
        ens.current_positions()
    );
    assert_eq!(
        ens.positions_at_step(9).unwrap_err(),
        DriftError::StepOutOfRange {
            step: 9,
            steps_elapsed: 8
        }
    );
}

#[test]
fn test_stride_retention_drops_steps() {
    let mut rng = rng(4);
    let mut ens = ParticleEnsemble::spawn_with_retention(
        OceanModel::default(),
        &mut rng,
        30,
        NYC,
        HistoryRetention::Stride(4),
    )
    .unwrap();
    ens.simulate(&mut rng, 10);

    assert_eq!(ens.history().retained_steps(), vec![0, 4, 8, 10]);
    assert!(ens.positions_at_step(8).is_ok());
    assert_eq!(
        ens.positions_at_step(5).unwrap_err(),
        DriftError::StepNotRetained(5)
    );
    assert_eq!(ens.positions_at_step(10).unwrap(), ens.current_positions());
}

#[test]
fn test_trajectory_stride_subsamples_from_start() {
    let (mut ens, mut rng) = nyc_ensemble(6, 25);
    ens.simulate(&mut rng, 10);

    let every = ens.trajectory_arrays(1);
    assert_eq!(every.len(), 25);
    assert_eq!(every[0].lat.len(), 11);
    assert_eq!(every[3].lat[10], ens.latitudes()[3]);

    let strided = ens.trajectory_arrays(3);
    assert_eq!(strided[0].lat.len(), 4); // steps 0, 3, 6, 9
    assert_eq!(strided[3].lat[3], ens.positions_at_step(9).unwrap().lat[3]);
    assert_eq!(strided[3].lon[0], ens.positions_at_step(0).unwrap().lon[3]);

    // The final step appears only when it falls on the stride.
    let by_five = ens.trajectory_arrays(5);
    assert_eq!(by_five[0].lat.len(), 3); // steps 0, 5, 10
    assert_eq!(by_five[3].lat[2], ens.latitudes()[3]);

    // Stride 0 behaves like 1.
    assert_eq!(ens.trajectory_arrays(0), every);
}

#[test]
fn test_density_heatmap_counts_history() {
    let (mut ens, mut rng) = nyc_ensemble(8, 40);
    ens.simulate(&mut rng, 10);
    let map = ens.density_heatmap(30, 60);
    assert_eq!(map.counts.len(), 30 * 60);
    assert_eq!(map.lat_edges[0], 5.0);
    assert_eq!(*map.lon_edges.last().unwrap(), 20.0);
    assert_eq!(map.total(), 11 * 40);
}

#[test]
fn test_probability_category_tracks_metrics() {
    let (mut ens, mut rng) = nyc_ensemble(10, 100);
    ens.simulate(&mut rng, 12);
    assert_eq!(ens.probability_category(), ens.metrics().category());
}
