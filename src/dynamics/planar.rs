use nalgebra::{Rotation2, Vector2};

use crate::dynamics::state::{MotorCommand, StateDeriv, VehicleState};
use crate::vehicle::PhysicalConstants;

// ---------------------------------------------------------------------------
// Planar twin-rotor equations of motion
// ---------------------------------------------------------------------------

/// Compute state derivatives for a commanded pair of motor speeds.
///
/// Model:
///   1. Motors   — first-order lag toward the commanded speed
///   2. Thrust   — quadratic in motor speed, along the body y axis
///   3. Torque   — arm length times the thrust difference (motor 1 minus motor 2)
///   4. Gravity  — constant, inertial -y
///
/// The law is autonomous; `_t` is accepted so the function plugs straight
/// into [`rk4_step`](crate::sim::integrator::rk4_step).
pub fn derivatives(
    _t: f64,
    state: &VehicleState,
    cmd: &MotorCommand,
    constants: &PhysicalConstants,
) -> StateDeriv {
    let w = state.motor_speed;

    // --- Motor lag ---
    let dmotor = (cmd.speed - w) / constants.motor_time_constant;

    // --- Thrust and torque ---
    let f1 = constants.thrust(w.x);
    let f2 = constants.thrust(w.y);
    let torque = constants.arm_length * (f1 - f2);

    // --- Body → inertial ---
    let f_body = Vector2::new(0.0, f1 + f2);
    let f_inertial = Rotation2::new(state.attitude) * f_body;
    let f_gravity = Vector2::new(0.0, -constants.weight());

    StateDeriv {
        dmotor,
        dpos: state.velocity,
        dvel: (f_inertial + f_gravity) / constants.mass,
        dattitude: state.angular_rate,
        drate: torque / constants.inertia,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn hovering(c: &PhysicalConstants) -> VehicleState {
        VehicleState::at_rest(Vector2::new(0.0, 5.0), c.hover_speed())
    }

    #[test]
    fn hover_is_equilibrium() {
        let c = PhysicalConstants::default();
        let s = hovering(&c);
        let d = derivatives(0.0, &s, &MotorCommand::uniform(c.hover_speed()), &c);
        assert_abs_diff_eq!(d.dvel.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(d.dvel.y, 0.0, epsilon = 1e-9);
        assert_eq!(d.dattitude, 0.0);
        assert_eq!(d.drate, 0.0);
        assert_abs_diff_eq!(d.dmotor.norm(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn free_fall_with_motors_off() {
        let c = PhysicalConstants::default();
        let d = derivatives(0.0, &VehicleState::zero(), &MotorCommand::default(), &c);
        assert_abs_diff_eq!(d.dvel.y, -c.gravity, epsilon = 1e-12);
        assert_eq!(d.dvel.x, 0.0);
    }

    #[test]
    fn motors_lag_toward_command() {
        let c = PhysicalConstants::default();
        let d = derivatives(0.0, &VehicleState::zero(), &MotorCommand::new(1000.0, 500.0), &c);
        assert_abs_diff_eq!(d.dmotor.x, 1000.0 / c.motor_time_constant, epsilon = 1e-6);
        assert_abs_diff_eq!(d.dmotor.y, 500.0 / c.motor_time_constant, epsilon = 1e-6);
    }

    #[test]
    fn faster_motor_one_spins_counter_clockwise() {
        let c = PhysicalConstants::default();
        let mut s = hovering(&c);
        s.motor_speed.x *= 1.1;
        let d = derivatives(0.0, &s, &MotorCommand::uniform(c.hover_speed()), &c);
        assert!(d.drate > 0.0, "expected positive angular acceleration, got {}", d.drate);
    }

    #[test]
    fn positive_tilt_pushes_toward_negative_x() {
        let c = PhysicalConstants::default();
        let mut s = hovering(&c);
        s.attitude = 0.2;
        let d = derivatives(0.0, &s, &MotorCommand::uniform(c.hover_speed()), &c);
        assert!(d.dvel.x < 0.0);
        // Vertical thrust component drops below the weight
        assert!(d.dvel.y < 0.0);
    }

    #[test]
    fn position_and_attitude_rates_pass_through() {
        let c = PhysicalConstants::default();
        let mut s = VehicleState::zero();
        s.velocity = Vector2::new(1.5, -2.0);
        s.angular_rate = 0.3;
        let d = derivatives(0.0, &s, &MotorCommand::default(), &c);
        assert_eq!(d.dpos, s.velocity);
        assert_eq!(d.dattitude, 0.3);
    }
}
