use log::debug;
use nalgebra::Vector2;

use super::integrator::rk4_step;
use crate::config::{SimParams, Timing};
use crate::dynamics;
use crate::dynamics::state::{MotorCommand, VehicleState};
use crate::error::SimError;
use crate::gnc::{ControlGains, Controller, FlightController};
use crate::vehicle::PhysicalConstants;

// ---------------------------------------------------------------------------
// Multi-rate stepper: RK4 at dt, controller at control_period, ZOH between
// ---------------------------------------------------------------------------

/// Advances a [`VehicleState`] over a horizon with the controller in the loop.
///
/// Each call is independent: the time grids restart at zero and the only
/// thing carried between calls is the state the caller passes back in.
#[derive(Debug, Clone)]
pub struct Stepper {
    constants: PhysicalConstants,
    gains: ControlGains,
    timing: Timing,
    ratio: usize,
}

/// Per-tick record of a horizon: `states[k]` is the state before tick `k`
/// (the last entry is the final state) and `commands[k]` the command held
/// during tick `k`.
#[derive(Debug, Clone, Default)]
pub struct Trace {
    pub states: Vec<VehicleState>,
    pub commands: Vec<MotorCommand>,
}

impl Trace {
    /// Pre-allocated for `steps` ticks, capped so long horizons grow on demand.
    fn with_capacity(steps: usize) -> Self {
        let cap = steps.min(200_000);
        Self {
            states: Vec::with_capacity(cap + 1),
            commands: Vec::with_capacity(cap),
        }
    }
}

impl Stepper {
    pub fn new(
        constants: PhysicalConstants,
        gains: ControlGains,
        timing: Timing,
    ) -> Result<Self, SimError> {
        constants.validate()?;
        let ratio = timing.control_ratio()?;
        Ok(Self { constants, gains, timing, ratio })
    }

    pub fn from_params(params: &SimParams) -> Result<Self, SimError> {
        Self::new(params.vehicle.clone(), params.gains.clone(), params.timing.clone())
    }

    pub fn constants(&self) -> &PhysicalConstants {
        &self.constants
    }

    pub fn gains(&self) -> &ControlGains {
        &self.gains
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Integrator steps per controller update.
    pub fn control_ratio(&self) -> usize {
        self.ratio
    }

    /// The cascaded controller configured with this stepper's constants and gains.
    pub fn controller(&self) -> FlightController {
        FlightController::new(self.constants.clone(), self.gains.clone())
    }

    /// State after `horizon` seconds under the cascaded controller tracking
    /// `reference`.
    pub fn step(&self, horizon: f64, state: VehicleState, reference: Vector2<f64>) -> VehicleState {
        let mut controller = self.controller();
        self.step_with(&mut controller, horizon, state, reference)
    }

    /// Same as [`step`](Self::step) with a custom controller.
    pub fn step_with(
        &self,
        controller: &mut dyn Controller,
        horizon: f64,
        state: VehicleState,
        reference: Vector2<f64>,
    ) -> VehicleState {
        self.run(controller, horizon, state, &reference, |_, _, _| {})
    }

    /// Same as [`step`](Self::step), keeping every intermediate state and
    /// held command.
    pub fn trace(&self, horizon: f64, state: VehicleState, reference: Vector2<f64>) -> Trace {
        let mut trace = Trace::with_capacity(self.timing.steps_in(horizon));
        let mut controller = self.controller();
        let last = self.run(&mut controller, horizon, state, &reference, |_, x, cmd| {
            trace.states.push(*x);
            trace.commands.push(*cmd);
        });
        trace.states.push(last);
        trace
    }

    fn run<F>(
        &self,
        controller: &mut dyn Controller,
        horizon: f64,
        state: VehicleState,
        reference: &Vector2<f64>,
        mut observe: F,
    ) -> VehicleState
    where
        F: FnMut(usize, &VehicleState, &MotorCommand),
    {
        let dt = self.timing.dt;
        let n = self.timing.steps_in(horizon);
        let constants = &self.constants;

        let mut x = state;
        let mut held = MotorCommand { speed: state.motor_speed };
        let mut updates = 0usize;

        for k in 0..n {
            // Controller update on the coarse grid, from the pre-step state
            if k % self.ratio == 0 {
                held = controller.control(&x, reference);
                updates += 1;
            }
            observe(k, &x, &held);

            let t = k as f64 * dt;
            x = rk4_step(
                |t, s: &VehicleState, u: &MotorCommand| dynamics::derivatives(t, s, u, constants),
                t,
                dt,
                &x,
                &held,
            );
        }

        debug!(
            "{}: {} steps, {} control updates, pos ({:.3}, {:.3}), phi {:.2} deg",
            controller.name(),
            n,
            updates,
            x.position.x,
            x.position.y,
            x.attitude_deg()
        );
        x
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
