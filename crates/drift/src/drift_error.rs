// ---------------------------------------------------------------------------
// DriftError: failures surfaced by the drift engine
// ---------------------------------------------------------------------------

use std::fmt;

/// Errors returned by ensemble construction and history lookups.
#[derive(Debug, Clone, PartialEq)]
pub enum DriftError {
    /// A history lookup asked for a step outside `[0, steps_elapsed]`.
    StepOutOfRange { step: usize, steps_elapsed: usize },
    /// The step exists but the retention policy did not keep its snapshot.
    StepNotRetained(usize),
    /// Release coordinates or radius are not usable numbers.
    InvalidRelease(String),
    /// An ensemble was requested with zero particles.
    EmptyEnsemble,
    /// Rejection sampling found no ocean point around the release site.
    NoOceanAtRelease { lat: f64, lon: f64, radius_km: f64 },
    /// Ocean parameter overrides could not be parsed.
    Config(String),
}

impl fmt::Display for DriftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriftError::StepOutOfRange {
                step,
                steps_elapsed,
            } => write!(f, "Step {step} out of range [0, {steps_elapsed}]"),
            DriftError::StepNotRetained(step) => {
                write!(f, "Step {step} was dropped by the history retention policy")
            }
            DriftError::InvalidRelease(msg) => write!(f, "Invalid release: {msg}"),
            DriftError::EmptyEnsemble => write!(f, "Ensemble needs at least one particle"),
            DriftError::NoOceanAtRelease {
                lat,
                lon,
                radius_km,
            } => write!(
                f,
                "No ocean within {radius_km} km of ({lat:.4}, {lon:.4})"
            ),
            DriftError::Config(msg) => write!(f, "Config error: {msg}"),
        }
    }
}

impl std::error::Error for DriftError {}

impl From<serde_json::Error> for DriftError {
    fn from(e: serde_json::Error) -> Self {
        DriftError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drift_error_display_out_of_range() {
        let err = DriftError::StepOutOfRange {
            step: 60,
            steps_elapsed: 52,
        };
        let msg = format!("{err}");
        assert!(msg.contains("60"), "got: {msg}");
        assert!(msg.contains("[0, 52]"), "got: {msg}");
    }

    #[test]
    fn test_drift_error_display_no_ocean() {
        let err = DriftError::NoOceanAtRelease {
            lat: 45.0,
            lon: -100.0,
            radius_km: 20.0,
        };
        let msg = format!("{err}");
        assert!(msg.contains("No ocean"), "got: {msg}");
        assert!(msg.contains("45.0000"), "got: {msg}");
    }

    #[test]
    fn test_drift_error_from_json() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: DriftError = json_err.into();
        assert!(matches!(err, DriftError::Config(_)));
    }

    #[test]
    fn test_drift_error_is_error_trait() {
        let err = DriftError::EmptyEnsemble;
        assert!(std::error::Error::source(&err).is_none());
        assert!(format!("{err:?}").contains("EmptyEnsemble"));
    }
}
