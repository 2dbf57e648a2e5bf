pub mod controller;
pub mod gains;
pub mod tilt;
pub mod mixer;
pub mod flight;

pub use controller::{Controller, OpenLoop};
pub use gains::{ControlGains, Pd};
pub use tilt::{desired_tilt, TiltCommand};
pub use flight::{ControlOutput, FlightController};
