pub mod planar;
pub mod state;

pub use planar::derivatives;
pub use state::{MotorCommand, StateDeriv, VehicleState};
