// ---------------------------------------------------------------------------
// Guidance: desired tilt from the commanded force vector
// ---------------------------------------------------------------------------

/// Outcome of the tilt computation. Each variant carries the angle fed to the
/// attitude loop and the horizontal force consistent with it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TiltCommand {
    WithinLimits { phi: f64, fx: f64 },
    /// `phi == sign * max_tilt`, `fx` recomputed from the vertical force.
    Saturated { sign: f64, phi: f64, fx: f64 },
}

impl TiltCommand {
    pub fn phi(&self) -> f64 {
        match *self {
            TiltCommand::WithinLimits { phi, .. } | TiltCommand::Saturated { phi, .. } => phi,
        }
    }

    pub fn fx(&self) -> f64 {
        match *self {
            TiltCommand::WithinLimits { fx, .. } | TiltCommand::Saturated { fx, .. } => fx,
        }
    }

    pub fn is_saturated(&self) -> bool {
        matches!(self, TiltCommand::Saturated { .. })
    }
}

/// Tilt that points the thrust axis along `(fx, fy)`.
///
/// A positive attitude rotates thrust toward -x, hence `atan2(-fx, fy)`.
/// Beyond `max_tilt` the angle is clamped and `fx` becomes `fy * tan(phi)`.
pub fn desired_tilt(fx: f64, fy: f64, max_tilt: f64) -> TiltCommand {
    let phi = (-fx).atan2(fy);
    if phi.abs() > max_tilt {
        let sign = phi.signum();
        let phi = sign * max_tilt;
        TiltCommand::Saturated { sign, phi, fx: fy * phi.tan() }
    } else {
        TiltCommand::WithinLimits { phi, fx }
    }
}
