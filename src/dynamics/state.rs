use std::ops::{Add, Mul};

use nalgebra::Vector2;

use crate::error::SimError;
use crate::sim::integrator::Integrable;

// ---------------------------------------------------------------------------
// Planar state: motor speeds, position, velocity, tilt, tilt rate
// ---------------------------------------------------------------------------

/// Full vehicle state at a single point in time.
/// Frame: inertial x right, y up. Attitude is positive counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleState {
    pub motor_speed: Vector2<f64>, // speed tracked by motors 1 and 2
    pub position: Vector2<f64>,    // m
    pub velocity: Vector2<f64>,    // m/s
    pub attitude: f64,             // rad
    pub angular_rate: f64,         // rad/s
}

impl VehicleState {
    /// Everything at rest at the origin, motors stopped.
    pub fn zero() -> Self {
        Self {
            motor_speed: Vector2::zeros(),
            position: Vector2::zeros(),
            velocity: Vector2::zeros(),
            attitude: 0.0,
            angular_rate: 0.0,
        }
    }

    /// At rest at `position` with both motors already spinning at `speed`.
    pub fn at_rest(position: Vector2<f64>, speed: f64) -> Self {
        Self {
            motor_speed: Vector2::new(speed, speed),
            position,
            ..Self::zero()
        }
    }

    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }

    pub fn attitude_deg(&self) -> f64 {
        self.attitude.to_degrees()
    }

    /// Fails with the name of the first non-finite field.
    pub fn check_finite(&self) -> Result<(), SimError> {
        let fields = [
            ("motor_speed", self.motor_speed.iter().all(|v| v.is_finite())),
            ("position", self.position.iter().all(|v| v.is_finite())),
            ("velocity", self.velocity.iter().all(|v| v.is_finite())),
            ("attitude", self.attitude.is_finite()),
            ("angular_rate", self.angular_rate.is_finite()),
        ];
        match fields.iter().find(|(_, ok)| !ok) {
            Some((field, _)) => Err(SimError::NonFinite { field: *field }),
            None => Ok(()),
        }
    }
}

impl Default for VehicleState {
    fn default() -> Self {
        Self::zero()
    }
}

// ---------------------------------------------------------------------------
// State derivative
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateDeriv {
    pub dmotor: Vector2<f64>,
    pub dpos: Vector2<f64>,
    pub dvel: Vector2<f64>,
    pub dattitude: f64,
    pub drate: f64,
}

impl Add for StateDeriv {
    type Output = StateDeriv;

    fn add(self, rhs: StateDeriv) -> StateDeriv {
        StateDeriv {
            dmotor: self.dmotor + rhs.dmotor,
            dpos: self.dpos + rhs.dpos,
            dvel: self.dvel + rhs.dvel,
            dattitude: self.dattitude + rhs.dattitude,
            drate: self.drate + rhs.drate,
        }
    }
}

impl Mul<f64> for StateDeriv {
    type Output = StateDeriv;

    fn mul(self, k: f64) -> StateDeriv {
        StateDeriv {
            dmotor: self.dmotor * k,
            dpos: self.dpos * k,
            dvel: self.dvel * k,
            dattitude: self.dattitude * k,
            drate: self.drate * k,
        }
    }
}

impl Integrable for VehicleState {
    type Deriv = StateDeriv;

    fn apply(&self, d: &StateDeriv, dt: f64) -> VehicleState {
        VehicleState {
            motor_speed: self.motor_speed + d.dmotor * dt,
            position: self.position + d.dpos * dt,
            velocity: self.velocity + d.dvel * dt,
            attitude: self.attitude + d.dattitude * dt,
            angular_rate: self.angular_rate + d.drate * dt,
        }
    }
}

// ---------------------------------------------------------------------------
// Motor command output
// ---------------------------------------------------------------------------

/// Speed setpoints for motors 1 and 2, held until the next controller update.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotorCommand {
    pub speed: Vector2<f64>,
}

impl MotorCommand {
    pub fn new(w1: f64, w2: f64) -> Self {
        Self { speed: Vector2::new(w1, w2) }
    }

    /// Both motors at the same speed.
    pub fn uniform(w: f64) -> Self {
        Self::new(w, w)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
