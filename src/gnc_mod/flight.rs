use log::trace;
use nalgebra::Vector2;

use super::gains::ControlGains;
use super::mixer;
use super::tilt::{desired_tilt, TiltCommand};
use crate::dynamics::state::{MotorCommand, VehicleState};
use crate::vehicle::PhysicalConstants;

// ---------------------------------------------------------------------------
// Cascaded flight controller: position PD -> tilt -> attitude PD -> mixing
// ---------------------------------------------------------------------------

/// Intermediate quantities of one controller evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlOutput {
    pub tilt: TiltCommand,
    /// Commanded force `(fx, fy)` after vertical and tilt saturation.
    pub force: Vector2<f64>,
    pub vertical_saturated: bool,
    pub torque: f64,
    pub torque_saturated: bool,
    /// Per-motor thrust after mixing.
    pub thrusts: Vector2<f64>,
    pub command: MotorCommand,
}

#[derive(Debug, Clone)]
pub struct FlightController {
    pub constants: PhysicalConstants,
    pub gains: ControlGains,
}

impl FlightController {
    pub fn new(constants: PhysicalConstants, gains: ControlGains) -> Self {
        Self { constants, gains }
    }

    /// Run the full cascade for the measured `state` and position `reference`.
    pub fn evaluate(&self, state: &VehicleState, reference: &Vector2<f64>) -> ControlOutput {
        let c = &self.constants;
        let g = &self.gains;

        // --- Position loop (velocity reference is zero) ---
        let e_pos = reference - state.position;
        let e_vel = -state.velocity;
        let fx = g.position.output(e_pos.x, e_vel.x);
        let fy_raw = g.position.output(e_pos.y, e_vel.y) + c.weight();
        let (fy_min, fy_max) = g.vertical_force_limits(c);
        let fy = fy_raw.clamp(fy_min, fy_max);
        let vertical_saturated = fy != fy_raw;

        // --- Tilt ---
        let tilt = desired_tilt(fx, fy, c.max_tilt);
        if let TiltCommand::Saturated { phi, .. } = tilt {
            trace!("tilt saturated: fx {:.4} N -> phi {:.2} deg", fx, phi.to_degrees());
        }
        let force = Vector2::new(tilt.fx(), fy);
        let total_thrust = force.norm();

        // --- Attitude loop (rate reference is zero) ---
        let torque_raw = g
            .attitude
            .output(tilt.phi() - state.attitude, -state.angular_rate);
        let (t_min, t_max) = g.torque_limits(c);
        let torque = torque_raw.clamp(t_min, t_max);
        let torque_saturated = torque != torque_raw;
        if torque_saturated {
            trace!("torque saturated: {:.4} -> {:.4} N m", torque_raw, torque);
        }

        // --- Mixing and inverse actuator map ---
        let thrusts = mixer::mix(total_thrust, torque);
        let command = mixer::motor_speeds(&thrusts, c);

        ControlOutput {
            tilt,
            force,
            vertical_saturated,
            torque,
            torque_saturated,
            thrusts,
            command,
        }
    }
}

impl Default for FlightController {
    fn default() -> Self {
        Self::new(PhysicalConstants::default(), ControlGains::default())
    }
}

impl super::Controller for FlightController {
    fn control(&mut self, state: &VehicleState, reference: &Vector2<f64>) -> MotorCommand {
        self.evaluate(state, reference).command
    }

    fn name(&self) -> &str {
        "FlightController"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
