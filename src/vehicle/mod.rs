pub mod constants;
pub mod mission;

pub use constants::PhysicalConstants;
pub use mission::{Arena, Course};
