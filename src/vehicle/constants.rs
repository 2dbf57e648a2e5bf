use serde::Deserialize;

use crate::error::SimError;

// ---------------------------------------------------------------------------
// Physical constants shared by the dynamics model and the controller
// ---------------------------------------------------------------------------

/// Airframe and actuator parameters of a planar twin-rotor vehicle.
///
/// Thrust follows a quadratic law `f = thrust_coeff * w^2` and each motor
/// tracks its speed command through a first-order lag of time constant
/// `motor_time_constant`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicalConstants {
    pub mass: f64,                // kg
    pub gravity: f64,             // m/s^2
    pub arm_length: f64,          // m, motor to centre of mass
    pub thrust_coeff: f64,        // N per (speed unit)^2
    pub inertia: f64,             // kg m^2, about the out-of-plane axis
    pub motor_time_constant: f64, // s
    pub max_motor_speed: f64,     // speed units
    pub max_tilt: f64,            // rad
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            mass: 0.25,
            gravity: 9.81,
            arm_length: 0.1,
            thrust_coeff: 1.744e-8,
            inertia: 2e-4,
            motor_time_constant: 0.005,
            max_motor_speed: 15_000.0,
            max_tilt: 15.0_f64.to_radians(),
        }
    }
}

impl PhysicalConstants {
    /// Thrust of a single motor at full speed.
    pub fn max_thrust(&self) -> f64 {
        self.thrust_coeff * self.max_motor_speed.powi(2)
    }

    /// Torque produced by one motor at full speed with the other stopped.
    pub fn max_torque(&self) -> f64 {
        self.arm_length * self.max_thrust()
    }

    pub fn weight(&self) -> f64 {
        self.mass * self.gravity
    }

    /// Per-motor speed at which the two motors together carry the weight.
    pub fn hover_speed(&self) -> f64 {
        (self.weight() / (2.0 * self.thrust_coeff)).sqrt()
    }

    /// Thrust of one motor spinning at `speed`.
    pub fn thrust(&self, speed: f64) -> f64 {
        self.thrust_coeff * speed * speed
    }

    /// Inverse of [`thrust`](Self::thrust), saturated to `[0, max_motor_speed]`.
    /// Negative thrust demands map to a stopped motor.
    pub fn speed_for_thrust(&self, force: f64) -> f64 {
        (force.max(0.0) / self.thrust_coeff)
            .sqrt()
            .clamp(0.0, self.max_motor_speed)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        let positive = [
            ("mass", self.mass),
            ("gravity", self.gravity),
            ("arm_length", self.arm_length),
            ("thrust_coeff", self.thrust_coeff),
            ("inertia", self.inertia),
            ("motor_time_constant", self.motor_time_constant),
            ("max_motor_speed", self.max_motor_speed),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SimError::InvalidConstants(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if !(self.max_tilt > 0.0 && self.max_tilt < std::f64::consts::FRAC_PI_2) {
            return Err(SimError::InvalidConstants(format!(
                "max_tilt must lie in (0, pi/2), got {}",
                self.max_tilt
            )));
        }
        if self.weight() >= 2.0 * self.max_thrust() {
            return Err(SimError::InvalidConstants(format!(
                "weight {:.3} N exceeds total thrust {:.3} N",
                self.weight(),
                2.0 * self.max_thrust()
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    /// 250 g twin-rotor used throughout the demos.
    pub fn mini() -> PhysicalConstants {
        PhysicalConstants::default()
    }

    /// Heavier airframe flying close to its thrust margin.
    pub fn heavy() -> PhysicalConstants {
        PhysicalConstants {
            mass: 0.3,
            inertia: 3e-4,
            ..PhysicalConstants::default()
        }
    }
}
