use nalgebra::Vector2;

use crate::dynamics::state::VehicleState;
use crate::vehicle::{Arena, PhysicalConstants};

// ---------------------------------------------------------------------------
// Simulation events
// ---------------------------------------------------------------------------

/// Kinds of simulation events.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    WaypointReached,
    ArenaExit,
    TiltLimit { attitude: f64 },
    MotorLimit { motor: usize, speed: f64 },
}

/// A discrete event that occurred during simulation.
#[derive(Debug, Clone)]
pub struct SimEvent {
    pub time: f64,
    pub kind: EventKind,
    pub state: VehicleState,
}

/// Trait for passive event detectors.
/// Implementations inspect consecutive states and report events.
pub trait EventDetector {
    fn check(&mut self, prev: &VehicleState, current: &VehicleState) -> Option<EventKind>;
}

/// Fires once the vehicle is inside `radius` of the reference and slower
/// than `max_speed`. Re-arms after [`retarget`](Self::retarget).
pub struct WaypointCapture {
    pub reference: Vector2<f64>,
    pub radius: f64,
    pub max_speed: f64,
    fired: bool,
}

impl WaypointCapture {
    pub fn new(reference: Vector2<f64>, radius: f64, max_speed: f64) -> Self {
        Self { reference, radius, max_speed, fired: false }
    }

    pub fn retarget(&mut self, reference: Vector2<f64>) {
        self.reference = reference;
        self.fired = false;
    }
}

impl EventDetector for WaypointCapture {
    fn check(&mut self, _prev: &VehicleState, current: &VehicleState) -> Option<EventKind> {
        if self.fired {
            return None;
        }
        let close = (current.position - self.reference).norm() < self.radius;
        if close && current.speed() < self.max_speed {
            self.fired = true;
            Some(EventKind::WaypointReached)
        } else {
            None
        }
    }
}

/// Detects the vehicle leaving the arena.
pub struct ArenaExit {
    pub arena: Arena,
}

impl EventDetector for ArenaExit {
    fn check(&mut self, prev: &VehicleState, current: &VehicleState) -> Option<EventKind> {
        if self.arena.contains(&prev.position) && !self.arena.contains(&current.position) {
            Some(EventKind::ArenaExit)
        } else {
            None
        }
    }
}

/// Reports the first state of each excursion beyond the tilt or motor limits.
pub struct LimitMonitor {
    pub max_tilt: f64,
    pub max_motor_speed: f64,
}

impl LimitMonitor {
    pub fn new(constants: &PhysicalConstants) -> Self {
        Self {
            max_tilt: constants.max_tilt,
            max_motor_speed: constants.max_motor_speed,
        }
    }

    fn motor_violation(&self, s: &VehicleState) -> Option<(usize, f64)> {
        s.motor_speed
            .iter()
            .position(|w| *w < 0.0 || *w > self.max_motor_speed)
            .map(|i| (i, s.motor_speed[i]))
    }
}

impl EventDetector for LimitMonitor {
    fn check(&mut self, prev: &VehicleState, current: &VehicleState) -> Option<EventKind> {
        if current.attitude.abs() > self.max_tilt && prev.attitude.abs() <= self.max_tilt {
            return Some(EventKind::TiltLimit { attitude: current.attitude });
        }
        match (self.motor_violation(prev), self.motor_violation(current)) {
            (None, Some((motor, speed))) => Some(EventKind::MotorLimit { motor, speed }),
            _ => None,
        }
    }
}
