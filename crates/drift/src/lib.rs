//! Lagrangian drift of buoyant particles through a stylised North Atlantic.
//!
//! The [`ocean`] module holds the analytic velocity field, stochastic RK4
//! integrator, land classification and offshore spawning. [`ensemble`]
//! advances N particles in lock-step and summarises where they end up.
//! [`DriftPlugin`] runs an ensemble inside a Bevy app.

pub mod batch;
pub mod config;
pub mod drift_error;
pub mod drift_plugin;
pub mod drift_rng;
pub mod ensemble;
pub mod land_mask;
pub mod ocean;
pub mod release_site;

#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

pub use batch::{run_batch, BatchReport, SiteFailure, SiteReport};
pub use drift_error::DriftError;
pub use drift_plugin::{DriftConfig, DriftFinished, DriftPlugin, DriftSet, DriftStatus};
pub use drift_rng::DriftRng;
pub use ensemble::{
    DensityHeatmap, DriftMetrics, HistoryRetention, ParticleEnsemble, ParticleSnapshot,
    ReachCategory, ReleasePoint, Trajectory,
};
pub use land_mask::{LandClassifier, LandMask};
pub use ocean::{OceanModel, OceanParams};
pub use release_site::{Outlet, ReleaseKind, ReleaseSite};
