use std::error::Error;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};

use twinrotor_sim::config::{self, SimParams};
use twinrotor_sim::dynamics::VehicleState;
use twinrotor_sim::logger;
use twinrotor_sim::sim::event::EventKind;
use twinrotor_sim::sim::{Session, Stepper};
use twinrotor_sim::vehicle::constants::presets as airframes;
use twinrotor_sim::vehicle::mission::{presets, Arena, Course};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CourseArg {
    Tour,
    Hover,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VehicleArg {
    Mini,
    Heavy,
}

/// Parse a strictly positive, finite number of seconds or metres.
fn positive(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|e| format!("{}", e))?;
    if v.is_finite() && v > 0.0 {
        Ok(v)
    } else {
        Err(format!("must be positive and finite, got {}", s))
    }
}

/// Headless twin-rotor flight: fly a waypoint course frame by frame.
#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Args {
    /// TOML file overriding vehicle constants, gains and timing
    #[clap(long, short)]
    params: Option<PathBuf>,

    #[clap(long, value_enum, default_value = "tour")]
    course: CourseArg,

    /// Airframe preset, replacing the vehicle table of the parameter file
    #[clap(long, value_enum)]
    vehicle: Option<VehicleArg>,

    /// Number of frames to simulate
    #[clap(long, short, default_value_t = 1500)]
    frames: usize,

    /// Simulated time per frame, s
    #[clap(long, default_value_t = 0.04, value_parser = positive)]
    frame_period: f64,

    /// Distance to the waypoint counted as reached, m
    #[clap(long, default_value_t = 0.5, value_parser = positive)]
    capture_radius: f64,

    /// Pace frames to wall-clock time
    #[clap(long)]
    realtime: bool,

    #[clap(long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    logger::init(args.log_level)?;

    let mut params = match &args.params {
        Some(path) => {
            info!("Loading parameters from {:?}", path);
            config::load(path)?
        }
        None => SimParams::default(),
    };
    match args.vehicle {
        Some(VehicleArg::Mini) => params.vehicle = airframes::mini(),
        Some(VehicleArg::Heavy) => params.vehicle = airframes::heavy(),
        None => {}
    }
    let stepper = Stepper::from_params(&params)?;
    let constants = stepper.constants().clone();
    let gains = stepper.gains().clone();

    let course: Course = match args.course {
        CourseArg::Tour => presets::tour(),
        CourseArg::Hover => presets::hover(),
    };
    info!(
        "Flying course '{}' ({} waypoints), {} frames of {} s",
        course.name,
        course.len(),
        args.frames,
        args.frame_period
    );

    let mut session = Session::new(
        stepper,
        course,
        Arena::default(),
        VehicleState::zero(),
        args.capture_radius,
    );
    let mut max_speed = 0.0_f64;
    let mut max_tilt = 0.0_f64;

    // -----------------------------------------------------------------------
    // Frame loop
    // -----------------------------------------------------------------------
    println!();
    println!("  {:>7}  {:>8}  {:>8}  {:>7}  {:>7}  {:>8}  {:>8}  {:>3}",
        "t [s]", "x [m]", "y [m]", "|v|", "phi", "w1", "w2", "wp");
    println!("  ──────────────────────────────────────────────────────────────────────");

    let print_every = ((1.0 / args.frame_period).round() as usize).max(1);
    let budget = Duration::from_secs_f64(args.frame_period);

    for frame in 0..args.frames {
        let frame_start = Instant::now();

        session.frame(args.frame_period)?;
        let state = *session.state();
        max_speed = max_speed.max(state.speed());
        max_tilt = max_tilt.max(state.attitude.abs());

        if frame % print_every == 0 || frame + 1 == args.frames {
            println!(
                "  {:>7.2}  {:>8.3}  {:>8.3}  {:>7.3}  {:>7.2}  {:>8.0}  {:>8.0}  {:>3}",
                session.time(),
                state.position.x,
                state.position.y,
                state.speed(),
                state.attitude_deg(),
                state.motor_speed.x,
                state.motor_speed.y,
                session.course().index()
            );
        }

        if args.realtime {
            if let Some(rest) = budget.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(rest);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Summary
    // -----------------------------------------------------------------------
    let events = session.events();
    let reached = events.iter().filter(|e| e.kind == EventKind::WaypointReached).count();
    let resets = events.iter().filter(|e| e.kind == EventKind::ArenaExit).count();
    let state = session.state();
    let course = session.course();
    let timing = session.stepper().timing();

    println!();
    println!("====================================================================");
    println!("  TWIN-ROTOR FLIGHT — {}", course.name);
    println!("====================================================================");
    println!(
        "  Mass:          {:>8.3} kg    Max thrust:   {:>8.3} N/motor",
        constants.mass,
        constants.max_thrust()
    );
    println!(
        "  Hover speed:   {:>8.0}       Max speed:    {:>8.0}",
        constants.hover_speed(),
        constants.max_motor_speed
    );
    println!(
        "  Position PD:   {:>8.3} / {:<6.3} Attitude PD: {:>6.3} / {:<6.3}",
        gains.position.kp, gains.position.kd, gains.attitude.kp, gains.attitude.kd
    );
    println!(
        "  dt:            {:>8.4} s     Control:      {:>8.4} s (x{})",
        timing.dt,
        timing.control_period,
        session.stepper().control_ratio()
    );
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  Flight time:   {:>8.2} s", session.time());
    println!("  Waypoints:     {:>8}       Arena resets: {:>8}", reached, resets);
    println!(
        "  Max speed:     {:>8.2} m/s   Max tilt:     {:>8.2} deg",
        max_speed,
        max_tilt.to_degrees()
    );
    println!(
        "  Final pos:     ({:.2}, {:.2}) m, {:.2} m from waypoint {}",
        state.position.x,
        state.position.y,
        (course.current() - state.position).norm(),
        course.index()
    );
    println!("====================================================================");
    println!();

    Ok(())
}
