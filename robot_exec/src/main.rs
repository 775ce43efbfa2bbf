//! Main robot executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Start the colour sort task on its own thread
//!     - Autonomous period: run the selected routine to completion
//!     - Driver control loop, until the driver input script ends:
//!         - Controller input acquisition
//!         - Teleop processing
//!         - Equipment command
//!     - Stop the colour sort task and all equipment
//!
//! # Modules
//!
//! All cyclic modules (e.g. `teleop`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State` trait.
//!

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread;
use std::time::{Duration, Instant};
use structopt::StructOpt;

// Internal
use hw_if::eqpt::{
    chassis::Chassis,
    spinner::{ActId, ALL_ACT_IDS},
};
use robot_lib::{
    arbiter::{ActuatorArbiter, CmdSource},
    auto::{AutoExec, AutoRoutine},
    chassis::ChassisParams,
    color_sort::{ColorSort, SortEnable, SortTask},
    data_store::DataStore,
    delay::StdDelay,
    params::RobotExecParams,
    robot::Robot,
    sim::{SimChassis, SimHueSensor, SimMotor, SimParams, SimPneumatic},
};
use util::{
    logger::{logger_init, LevelFilter},
    module::State,
    raise_error,
    script_interpreter::{PendingInput, ScriptInterpreter},
    session::Session,
};

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[derive(Debug, StructOpt)]
#[structopt(name = "robot_exec", about = "Robot executable with colour sorting")]
struct Opt {
    /// Autonomous routine to run (test, left, right or skills), overrides robot_exec.toml
    #[structopt(short, long)]
    routine: Option<AutoRoutine>,

    /// Driver input script replayed during driver control
    #[structopt(short, long, parse(from_os_str))]
    script: Option<PathBuf>,

    /// Go straight to driver control
    #[structopt(long)]
    skip_auto: bool,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opt = Opt::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("robot_exec", "sessions")
        .wrap_err("Failed to create the session")?;

    // Initialise logger, the sort task is noisy at trace
    logger_init(
        LevelFilter::Trace,
        &[
            ("robot_lib::color_sort", LevelFilter::Debug),
            ("robot_lib::sim", LevelFilter::Debug),
        ],
        &session,
    )
    .wrap_err("Failed to initialise logging")?;

    info!("Robot Executable\n");
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI arguments: {:?}", opt);

    // ---- LOAD PARAMETERS ----

    let exec_params: RobotExecParams = util::params::load("robot_exec.toml")
        .wrap_err("Could not load exec params")?;

    let chassis_params: ChassisParams = util::params::load("chassis.toml")
        .wrap_err("Could not load chassis params")?;

    exec_params
        .ports
        .validate(&chassis_params)
        .wrap_err("Invalid port assignments")?;

    let sim_params: SimParams = util::params::load("sim.toml")
        .wrap_err("Could not load sim params")?;

    info!("Exec parameters loaded");
    debug!("Ports: {:?}", exec_params.ports);

    // ---- LOAD DRIVER SCRIPT ----

    let mut script = match opt.script {
        Some(ref path) => {
            info!("Loading driver script from {:?}", path);

            let si = ScriptInterpreter::new(path).wrap_err("Failed to load script")?;

            info!(
                "Loaded script lasts {:.02} s and contains {} entries\n",
                si.get_duration(),
                si.get_num_entries()
            );

            Some(si)
        }
        None => {
            info!("No driver script provided, driver control will be skipped\n");
            None
        }
    };

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    ds.teleop
        .init("teleop.toml", &session)
        .wrap_err("Failed to initialise TeleopCtrl")?;
    info!("TeleopCtrl init complete");

    let mut color_sort = ColorSort::default();
    color_sort
        .init("color_sort.toml", &session)
        .wrap_err("Failed to initialise ColorSort")?;
    info!("ColorSort init complete");

    info!("Module initialisation complete\n");

    // ---- INITIALISE EQUIPMENT ----

    let arbiter = ActuatorArbiter::new();
    for id in ALL_ACT_IDS.iter() {
        arbiter
            .register(*id, SimMotor::new(*id))
            .wrap_err("Failed to register spinner")?;
    }

    let sort_enable = SortEnable::new(false);
    let shutdown = Arc::new(AtomicBool::new(false));

    let mut robot = Robot::new(
        SimChassis::new(chassis_params),
        SimPneumatic::default(),
        arbiter.clone(),
        sort_enable.clone(),
    );

    info!("Calibrating chassis");
    robot.chassis.calibrate();

    // ---- START COLOUR SORT TASK ----

    let mut sort_task = SortTask::new(
        color_sort,
        SimHueSensor::new(&sim_params),
        arbiter.channel(ActId::TopSpinner, CmdSource::Sort),
        arbiter.channel(ActId::BottomSpinner, CmdSource::Sort),
        StdDelay,
        sort_enable.clone(),
    );

    let sort_shutdown = shutdown.clone();
    let sort_thread = thread::Builder::new()
        .name("color_sort".into())
        .spawn(move || {
            sort_task.run(&sort_shutdown);
            sort_task.summary()
        })
        .wrap_err("Failed to spawn the colour sort task")?;

    // ---- AUTONOMOUS ----

    let routine = opt.routine.unwrap_or(exec_params.auto_routine);

    if opt.skip_auto {
        info!("Autonomous skipped");
    } else {
        AutoExec::new(routine)
            .run(&mut robot, &mut StdDelay, &shutdown)
            .wrap_err("Autonomous routine failed")?;
    }

    // ---- DRIVER CONTROL ----

    if let Some(ref mut si) = script {
        let cycle_period = Duration::from_millis(ds.teleop.params().cycle_period_ms);
        let cycle_frequency_hz = ds.teleop.params().cycle_frequency_hz();
        let teleop_start = Instant::now();

        info!("Beginning driver control\n");

        loop {
            // Get cycle start time
            let cycle_start_instant = Instant::now();

            ds.cycle_start(cycle_frequency_hz);

            // ---- CONTROLLER INPUT ----

            match si.get_pending(teleop_start.elapsed().as_secs_f64()) {
                PendingInput::None => (),
                PendingInput::Some(state) => ds.controller = state,
                PendingInput::EndOfScript => {
                    info!("End of driver script reached, stopping");
                    break;
                }
            }

            // ---- TELEOP PROCESSING ----

            // A failed cycle leaves the equipment on the previous cycle's commands
            if let Some(output) = ds.proc_teleop() {
                robot
                    .apply_teleop(&output)
                    .wrap_err("Failed to command the equipment")?;
            }

            if ds.is_1_hz_cycle {
                let pose = robot.chassis.pose();
                info!(
                    "Pose: x {:.2} in, y {:.2} in, theta {:.1} deg",
                    pose.x_in, pose.y_in, pose.theta_deg
                );
            }

            // ---- CYCLE MANAGEMENT ----

            let cycle_dur = Instant::now() - cycle_start_instant;

            // Get sleep duration
            match cycle_period.checked_sub(cycle_dur) {
                Some(d) => {
                    ds.cycle_end(false);
                    thread::sleep(d);
                }
                None => {
                    warn!(
                        "Cycle overran by {:.06} s",
                        (cycle_dur - cycle_period).as_secs_f64()
                    );
                    ds.cycle_end(true);
                }
            }
        }
    }

    // ---- SHUTDOWN ----

    info!("Stopping the colour sort task");

    sort_enable.set(false);
    shutdown.store(true, Ordering::Relaxed);

    let summary = match sort_thread.join() {
        Ok(s) => s,
        Err(_) => raise_error!("The colour sort task panicked"),
    };

    info!(
        "Colour sort summary: {} target, {} other ({} invalid hue), {} demands rejected",
        summary.num_target,
        summary.num_other,
        summary.num_invalid_hue,
        arbiter.num_rejected().wrap_err("Failed to read the arbiter")?
    );
    session.save("color_sort_summary.json", summary);

    robot.stop_all().wrap_err("Failed to stop the equipment")?;

    info!("End of execution");

    session.exit();

    Ok(())
}
