use nalgebra::Vector2;

use crate::dynamics::state::MotorCommand;
use crate::vehicle::PhysicalConstants;

// ---------------------------------------------------------------------------
// Motor mixing and inverse actuator map
// ---------------------------------------------------------------------------

/// Split total thrust evenly, then bias it by `|torque| / 2` toward motor 1
/// for a non-negative torque and toward motor 2 otherwise.
///
/// Components are floored at zero: a torque demand larger than the thrust
/// budget saturates one motor at rest instead of asking for negative thrust.
pub fn mix(total_thrust: f64, torque: f64) -> Vector2<f64> {
    let half = total_thrust / 2.0;
    let delta = torque.abs() / 2.0;
    let f12 = if torque >= 0.0 {
        Vector2::new(half + delta, half - delta)
    } else {
        Vector2::new(half - delta, half + delta)
    };
    f12.map(|f| f.max(0.0))
}

/// Motor speeds producing the per-motor thrusts `f12`, each in `[0, w_max]`.
pub fn motor_speeds(f12: &Vector2<f64>, constants: &PhysicalConstants) -> MotorCommand {
    MotorCommand {
        speed: f12.map(|f| constants.speed_for_thrust(f)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_torque_is_symmetric() {
        let f = mix(2.4, 0.0);
        assert_eq!(f.x, f.y);
        assert_relative_eq!(f.x, 1.2);
        let c = PhysicalConstants::default();
        let w = motor_speeds(&f, &c);
        assert_eq!(w.speed.x, w.speed.y);
    }

    #[test]
    fn torque_sign_selects_motor() {
        let pos = mix(2.0, 0.2);
        assert_relative_eq!(pos.x, 1.1);
        assert_relative_eq!(pos.y, 0.9);
        let neg = mix(2.0, -0.2);
        assert_relative_eq!(neg.x, 0.9);
        assert_relative_eq!(neg.y, 1.1);
    }

    #[test]
    fn excess_torque_floors_at_zero() {
        let f = mix(0.1, 0.5);
        assert_eq!(f.y, 0.0);
        assert_relative_eq!(f.x, 0.3);
        let w = motor_speeds(&f, &PhysicalConstants::default());
        assert!(w.speed.iter().all(|s| s.is_finite() && *s >= 0.0));
    }

    #[test]
    fn speeds_never_exceed_max() {
        let c = PhysicalConstants::default();
        let w = motor_speeds(&Vector2::new(50.0, 0.5), &c);
        assert_eq!(w.speed.x, c.max_motor_speed);
        assert!(w.speed.y < c.max_motor_speed);
    }
}
