//! Run configuration: airframe constants, controller gains and time grids.

use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::error::SimError;
use crate::gnc::ControlGains;
use crate::vehicle::PhysicalConstants;

// ---------------------------------------------------------------------------
// Time grids
// ---------------------------------------------------------------------------

/// Integrator and controller periods. The controller period must be a whole
/// multiple of the integrator period.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Timing {
    pub dt: f64,             // integration step, s
    pub control_period: f64, // controller update period, s
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            dt: 2.5e-3,             // 400 Hz
            control_period: 10e-3,  // 100 Hz
        }
    }
}

impl Timing {
    /// Number of integrator steps per controller update.
    pub fn control_ratio(&self) -> Result<usize, SimError> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(SimError::InvalidTiming(format!(
                "dt must be positive, got {}",
                self.dt
            )));
        }
        if !(self.control_period.is_finite() && self.control_period > 0.0) {
            return Err(SimError::InvalidTiming(format!(
                "control_period must be positive, got {}",
                self.control_period
            )));
        }
        let ratio = self.control_period / self.dt;
        let n = ratio.round();
        if n < 1.0 || (ratio - n).abs() > 1e-9 * n {
            return Err(SimError::InvalidTiming(format!(
                "control_period {} is not a whole multiple of dt {}",
                self.control_period, self.dt
            )));
        }
        Ok(n as usize)
    }

    /// Whole integrator steps that fit in `horizon`.
    pub fn steps_in(&self, horizon: f64) -> usize {
        if !(horizon > 0.0) {
            return 0;
        }
        (horizon / self.dt + 1e-9).floor() as usize
    }
}

// ---------------------------------------------------------------------------
// Full parameter set
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimParams {
    pub vehicle: PhysicalConstants,
    pub gains: ControlGains,
    pub timing: Timing,
}

impl SimParams {
    pub fn validate(&self) -> Result<(), SimError> {
        self.vehicle.validate()?;
        self.timing.control_ratio()?;
        Ok(())
    }

    /// Parse and validate a TOML document. Missing tables and keys keep
    /// their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, LoadError> {
        let params: SimParams = toml::from_str(s)?;
        params.validate()?;
        Ok(params)
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// An error that occurs during loading of a parameter file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Cannot load the parameter file: {0}")]
    FileLoadError(#[from] std::io::Error),

    #[error("Cannot read the parameter file: {0}")]
    DeserialiseError(#[from] toml::de::Error),

    #[error("Invalid parameters: {0}")]
    Invalid(#[from] SimError),
}

/// Load a parameter file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<SimParams, LoadError> {
    let params_str = read_to_string(path)?;
    SimParams::from_toml_str(&params_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_ratio_is_four() {
        assert_eq!(Timing::default().control_ratio().unwrap(), 4);
    }

    #[test]
    fn fractional_ratio_rejected() {
        let t = Timing { dt: 3e-3, control_period: 10e-3 };
        assert!(matches!(t.control_ratio(), Err(SimError::InvalidTiming(_))));
    }

    #[test]
    fn controller_faster_than_integrator_rejected() {
        let t = Timing { dt: 10e-3, control_period: 2.5e-3 };
        assert!(t.control_ratio().is_err());
    }

    #[test]
    fn non_positive_dt_rejected() {
        let t = Timing { dt: 0.0, control_period: 10e-3 };
        assert!(t.control_ratio().is_err());
    }

    #[test]
    fn steps_truncate_to_whole_steps() {
        let t = Timing::default();
        assert_eq!(t.steps_in(0.04), 16);
        assert_eq!(t.steps_in(1.0), 400);
        assert_eq!(t.steps_in(0.006), 2);
        assert_eq!(t.steps_in(0.0), 0);
        assert_eq!(t.steps_in(-1.0), 0);
    }

    #[test]
    fn empty_document_gives_defaults() {
        let p = SimParams::from_toml_str("").unwrap();
        assert_eq!(p, SimParams::default());
    }

    #[test]
    fn partial_override() {
        let p = SimParams::from_toml_str(
            r#"
            [vehicle]
            mass = 0.3

            [gains.position]
            kp = 0.1
            kd = 0.3

            [timing]
            control_period = 0.02
            "#,
        )
        .unwrap();
        assert_relative_eq!(p.vehicle.mass, 0.3);
        assert_relative_eq!(p.vehicle.gravity, 9.81);
        assert_relative_eq!(p.gains.position.kp, 0.1);
        assert_relative_eq!(p.gains.attitude.kp, 0.75);
        assert_eq!(p.timing.control_ratio().unwrap(), 8);
    }

    #[test]
    fn invalid_values_rejected() {
        let err = SimParams::from_toml_str("[timing]\ndt = 0.003\n").unwrap_err();
        assert!(matches!(err, LoadError::Invalid(SimError::InvalidTiming(_))));
    }

    #[test]
    fn malformed_toml_rejected() {
        let err = SimParams::from_toml_str("[vehicle\nmass = ").unwrap_err();
        assert!(matches!(err, LoadError::DeserialiseError(_)));
    }

    #[test]
    fn load_from_file() {
        let path = std::env::temp_dir().join(format!("twinrotor-params-{}.toml", std::process::id()));
        std::fs::write(&path, "[vehicle]\nmax_motor_speed = 16000.0\n").unwrap();
        let p = load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_relative_eq!(p.vehicle.max_motor_speed, 16000.0);
    }

    #[test]
    fn shipped_params_match_defaults() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/params/default.toml");
        let p = load(path).unwrap();
        assert_eq!(p.gains, ControlGains::default());
        assert_eq!(p.timing, Timing::default());
        assert_relative_eq!(p.vehicle.max_tilt, PhysicalConstants::default().max_tilt, epsilon = 1e-15);
        assert_relative_eq!(p.vehicle.thrust_coeff, 1.744e-8);
    }

    #[test]
    fn missing_file_reported() {
        let err = load("/nonexistent/twinrotor.toml").unwrap_err();
        assert!(matches!(err, LoadError::FileLoadError(_)));
    }
}
