pub mod integrator;
pub mod runner;
pub mod event;
pub mod session;

pub use runner::{Stepper, Trace};
pub use integrator::{rk4_step, Integrable};
pub use session::Session;
