use serde::Deserialize;

use crate::vehicle::PhysicalConstants;

// ---------------------------------------------------------------------------
// PD law (single axis, derivative taken from a measured rate)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Pd {
    pub kp: f64,
    pub kd: f64,
}

impl Pd {
    pub const fn new(kp: f64, kd: f64) -> Self {
        Self { kp, kd }
    }

    pub fn output(&self, error: f64, rate_error: f64) -> f64 {
        self.kp * error + self.kd * rate_error
    }
}

// ---------------------------------------------------------------------------
// Cascade gains and saturation fractions
// ---------------------------------------------------------------------------

/// Gains of the position and attitude loops.
///
/// Saturation limits are stored as fractions of the airframe capability so
/// the same gains carry over to a different [`PhysicalConstants`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControlGains {
    pub position: Pd,
    pub attitude: Pd,
    pub vertical_force_min_frac: f64, // of max_thrust
    pub vertical_force_max_frac: f64,
    pub torque_min_frac: f64, // of max_torque
    pub torque_max_frac: f64,
}

impl Default for ControlGains {
    fn default() -> Self {
        Self {
            position: Pd::new(0.075, 0.25),
            attitude: Pd::new(0.75, 0.05),
            vertical_force_min_frac: 0.2,
            vertical_force_max_frac: 0.8,
            torque_min_frac: -0.4,
            torque_max_frac: 0.4,
        }
    }
}

impl ControlGains {
    /// `(min, max)` commanded vertical force, N.
    pub fn vertical_force_limits(&self, c: &PhysicalConstants) -> (f64, f64) {
        let f = c.max_thrust();
        (self.vertical_force_min_frac * f, self.vertical_force_max_frac * f)
    }

    /// `(min, max)` commanded torque, N m.
    pub fn torque_limits(&self, c: &PhysicalConstants) -> (f64, f64) {
        let t = c.max_torque();
        (self.torque_min_frac * t, self.torque_max_frac * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn pd_combines_error_and_rate() {
        let pd = Pd::new(2.0, 0.5);
        assert_relative_eq!(pd.output(1.0, -4.0), 0.0);
        assert_relative_eq!(pd.output(0.5, 0.0), 1.0);
    }

    #[test]
    fn default_limits() {
        let g = ControlGains::default();
        let c = PhysicalConstants::default();
        let (fmin, fmax) = g.vertical_force_limits(&c);
        assert_relative_eq!(fmin, 0.2 * 3.924, epsilon = 1e-9);
        assert_relative_eq!(fmax, 0.8 * 3.924, epsilon = 1e-9);
        let (tmin, tmax) = g.torque_limits(&c);
        assert_relative_eq!(tmin, -tmax);
        assert_relative_eq!(tmax, 0.4 * 0.3924, epsilon = 1e-9);
    }
}
