pub mod config;
pub mod dynamics;
pub mod error;
mod gnc_mod;
pub mod logger;
pub mod sim;
pub mod vehicle;

// The gnc module: expose gnc_mod as `gnc` publicly
pub mod gnc {
    pub use crate::gnc_mod::*;
}

pub mod types {
    pub use crate::config::{SimParams, Timing};
    pub use crate::dynamics::state::{MotorCommand, StateDeriv, VehicleState};
    pub use crate::gnc::ControlGains;
    pub use crate::vehicle::PhysicalConstants;
}

pub use error::SimError;
pub use sim::Stepper;
