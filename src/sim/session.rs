use log::{info, warn};

use super::event::{ArenaExit, EventDetector, EventKind, LimitMonitor, SimEvent, WaypointCapture};
use super::runner::Stepper;
use crate::dynamics::state::VehicleState;
use crate::error::SimError;
use crate::vehicle::{Arena, Course};

/// Speed below which a vehicle inside the capture radius counts as arrived, m/s.
const CAPTURE_SPEED: f64 = 0.25;

// ---------------------------------------------------------------------------
// Course flight, one frame at a time
// ---------------------------------------------------------------------------

/// Flies a [`Course`] frame by frame.
///
/// After every frame the detectors run on the new state. A waypoint capture
/// moves the reference to the next waypoint (a single-waypoint course holds
/// station), and leaving the arena puts the vehicle back at its initial state
/// without touching the waypoint index.
pub struct Session {
    stepper: Stepper,
    course: Course,
    initial: VehicleState,
    state: VehicleState,
    time: f64,
    capture: WaypointCapture,
    arena_exit: ArenaExit,
    limits: LimitMonitor,
    events: Vec<SimEvent>,
}

impl Session {
    pub fn new(
        stepper: Stepper,
        course: Course,
        arena: Arena,
        initial: VehicleState,
        capture_radius: f64,
    ) -> Self {
        let capture = WaypointCapture::new(course.current(), capture_radius, CAPTURE_SPEED);
        let limits = LimitMonitor::new(stepper.constants());
        Self {
            stepper,
            course,
            initial,
            state: initial,
            time: 0.0,
            capture,
            arena_exit: ArenaExit { arena },
            limits,
            events: Vec::new(),
        }
    }

    pub fn stepper(&self) -> &Stepper {
        &self.stepper
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn arena(&self) -> &Arena {
        &self.arena_exit.arena
    }

    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Every event since the session started.
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Advance by `period` seconds and return the events raised in this frame.
    pub fn frame(&mut self, period: f64) -> Result<&[SimEvent], SimError> {
        if !(period.is_finite() && period > 0.0) {
            return Err(SimError::InvalidTiming(format!(
                "frame period must be positive, got {}",
                period
            )));
        }

        let prev = self.state;
        let state = self.stepper.step(period, prev, self.course.current());
        state.check_finite()?;
        self.time += period;

        let first = self.events.len();
        let detectors: [&mut dyn EventDetector; 3] =
            [&mut self.capture, &mut self.arena_exit, &mut self.limits];
        let fired: Vec<EventKind> = detectors
            .into_iter()
            .filter_map(|d| d.check(&prev, &state))
            .collect();

        for kind in fired {
            let t = self.time;
            match &kind {
                EventKind::WaypointReached => {
                    info!("t={:.2}s reached waypoint {} at ({:.2}, {:.2})",
                        t, self.course.index(), state.position.x, state.position.y);
                    if self.course.len() > 1 {
                        let next = self.course.advance();
                        self.capture.retarget(next);
                    }
                }
                EventKind::ArenaExit => {
                    warn!("t={:.2}s left the arena at ({:.1}, {:.1}), resetting",
                        t, state.position.x, state.position.y);
                }
                EventKind::TiltLimit { attitude } => {
                    warn!("t={:.2}s tilt {:.1} deg beyond limit", t, attitude.to_degrees());
                }
                EventKind::MotorLimit { motor, speed } => {
                    warn!("t={:.2}s motor {} at {:.0} out of range", t, motor + 1, speed);
                }
            }
            self.events.push(SimEvent { time: t, kind, state });
        }

        self.state = if self.arena_exit.arena.contains(&state.position) {
            state
        } else {
            self.initial
        };
        Ok(&self.events[first..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimParams;
    use crate::vehicle::mission::presets;
    use nalgebra::Vector2;

    fn stepper() -> Stepper {
        Stepper::from_params(&SimParams::default()).unwrap()
    }

    fn hovering_at(s: &Stepper, p: Vector2<f64>) -> VehicleState {
        VehicleState::at_rest(p, s.constants().hover_speed())
    }

    #[test]
    fn capture_advances_course() {
        let s = stepper();
        let start = hovering_at(&s, Vector2::new(0.0, 0.0));
        let mut session = Session::new(s, presets::tour(), Arena::default(), start, 0.5);

        let fired = session.frame(0.04).unwrap();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].kind, EventKind::WaypointReached);
        assert_eq!(session.course().index(), 1);
        assert_eq!(session.course().current(), Vector2::new(0.0, 10.0));

        // Far from the new waypoint, nothing fires
        assert!(session.frame(0.04).unwrap().is_empty());
        assert_eq!(session.course().index(), 1);
    }

    #[test]
    fn single_waypoint_course_holds_station() {
        let s = stepper();
        let start = hovering_at(&s, Vector2::new(0.0, 10.0));
        let mut session = Session::new(s, presets::hover(), Arena::default(), start, 0.5);

        assert_eq!(session.frame(0.04).unwrap().len(), 1);
        for _ in 0..10 {
            assert!(session.frame(0.04).unwrap().is_empty());
        }
        assert_eq!(session.course().index(), 0);
        assert_eq!(session.events().len(), 1);
        assert!((session.state().position - Vector2::new(0.0, 10.0)).norm() < 1e-3);
    }

    #[test]
    fn leaving_arena_resets_to_initial_state() {
        let s = stepper();
        let mut start = hovering_at(&s, Vector2::new(39.99, 5.0));
        start.velocity = Vector2::new(5.0, 0.0);
        let mut session = Session::new(s, presets::tour(), Arena::default(), start, 0.5);

        let fired = session.frame(0.04).unwrap();
        assert!(fired.iter().any(|e| e.kind == EventKind::ArenaExit));
        let exit = fired.iter().find(|e| e.kind == EventKind::ArenaExit).unwrap();
        assert!(exit.state.position.x > 40.0);
        assert_eq!(*session.state(), start);
        assert_eq!(session.course().index(), 0);
    }

    #[test]
    fn configured_arena_drives_reset() {
        let s = stepper();
        let start = hovering_at(&s, Vector2::new(0.0, 0.0));
        let arena = Arena { x_min: -1.0, x_max: 1.0, y_min: -1.0, y_max: 0.5 };
        let mut session = Session::new(s, presets::hover(), arena, start, 0.5);

        let mut exits = 0;
        for _ in 0..100 {
            let fired = session.frame(0.04).unwrap();
            exits += fired.iter().filter(|e| e.kind == EventKind::ArenaExit).count();
            assert!(session.arena().contains(&session.state().position));
        }
        assert!(exits > 0);
    }

    #[test]
    fn rejects_bad_frame_period() {
        let s = stepper();
        let mut session = Session::new(s, presets::tour(), Arena::default(), VehicleState::zero(), 0.5);
        for period in [0.0, -0.04, f64::NAN, f64::INFINITY] {
            assert!(matches!(session.frame(period), Err(SimError::InvalidTiming(_))));
        }
        assert_eq!(session.time(), 0.0);
        assert_eq!(*session.state(), VehicleState::zero());
    }

    #[test]
    fn clock_advances_per_frame() {
        let s = stepper();
        let mut session = Session::new(s, presets::tour(), Arena::default(), VehicleState::zero(), 0.5);
        for _ in 0..25 {
            session.frame(0.04).unwrap();
        }
        assert!((session.time() - 1.0).abs() < 1e-12);
    }
}
