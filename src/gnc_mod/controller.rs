use nalgebra::Vector2;

use crate::dynamics::state::{MotorCommand, VehicleState};

/// Trait for flight controllers.
///
/// Implement this to plug a different control law into the
/// [`Stepper`](crate::sim::Stepper). It is called once per control period
/// with the pre-step state; the returned command is held until the next call.
pub trait Controller {
    /// Compute motor speed commands from the measured state and the
    /// position reference.
    fn control(&mut self, state: &VehicleState, reference: &Vector2<f64>) -> MotorCommand;

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}

/// Ignores the reference and always returns the same command.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenLoop {
    pub command: MotorCommand,
}

impl Controller for OpenLoop {
    fn control(&mut self, _state: &VehicleState, _reference: &Vector2<f64>) -> MotorCommand {
        self.command
    }

    fn name(&self) -> &str {
        "OpenLoop"
    }
}
