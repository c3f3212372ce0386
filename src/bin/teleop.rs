// Keyboard teleop as a virtual joystick: W/S forward, A/D turn, R/F speed, [/] cap, Q quit
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use tank_drive_runtime::config::{DEFAULT_VELOCITY_CAP, TOPIC_JOYSTICK, TOPIC_VELOCITY_CAP};
use tank_drive_runtime::input::Controller;
use tank_drive_runtime::messages::{CapUpdate, JoystickSample, StickAxes};

const DEFLECTIONS: [i32; 3] = [40, 80, 127]; // axis units
const CAP_STEP: i32 = 25;
const CAP_MAX: i32 = 200;
const INPUT_TIMEOUT_MS: u64 = 100; // Recenter the stick after this much time with no input

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Keyboard virtual joystick for the tank drive runtime
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Cap the runtime was started with, so [/] step from the right value
    #[arg(
        long,
        default_value_t = DEFAULT_VELOCITY_CAP,
        value_parser = clap::value_parser!(i32).range(0..=CAP_MAX as i64),
    )]
    velocity_cap: i32,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let args = Args::parse();
    tracing_subscriber::fmt().with_env_filter("info").init();

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;
    let pub_joystick = session.declare_publisher(TOPIC_JOYSTICK).await?;
    let pub_cap = session.declare_publisher(TOPIC_VELOCITY_CAP).await?;

    info!("Controls: W/S=forward/back, A/D=turn, R/F=deflection, [/]=velocity cap, Q=quit");
    info!("Deflection: LOW");
    info!("Velocity cap: {}", args.velocity_cap);

    enable_raw_mode()?;
    let result = run_teleop(&pub_joystick, &pub_cap, args.velocity_cap).await;
    disable_raw_mode()?;

    result
}

async fn run_teleop(
    pub_joystick: &zenoh::pubsub::Publisher<'_>,
    pub_cap: &zenoh::pubsub::Publisher<'_>,
    mut velocity_cap: i32,
) -> Result<(), BoxError> {
    let mut deflection_idx: usize = 0;

    // Persistent stick state
    let mut axes = StickAxes::default();
    let mut last_movement_input = Instant::now();

    loop {
        // Poll for key with 20ms timeout (50Hz effective rate)
        if event::poll(Duration::from_millis(20))? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                let pressed = kind == KeyEventKind::Press || kind == KeyEventKind::Repeat;
                let deflection = DEFLECTIONS[deflection_idx];

                match code {
                    KeyCode::Char('w') if pressed => {
                        axes.left_y = deflection;
                        last_movement_input = Instant::now();
                    }
                    KeyCode::Char('s') if pressed => {
                        axes.left_y = -deflection;
                        last_movement_input = Instant::now();
                    }
                    KeyCode::Char('d') if pressed => {
                        axes.left_x = deflection;
                        last_movement_input = Instant::now();
                    }
                    KeyCode::Char('a') if pressed => {
                        axes.left_x = -deflection;
                        last_movement_input = Instant::now();
                    }

                    KeyCode::Char('r') if pressed => {
                        deflection_idx = (deflection_idx + 1).min(DEFLECTIONS.len() - 1);
                        print_deflection(deflection_idx);
                    }
                    KeyCode::Char('f') if pressed => {
                        deflection_idx = deflection_idx.saturating_sub(1);
                        print_deflection(deflection_idx);
                    }

                    KeyCode::Char(']') if pressed => {
                        velocity_cap = step_cap(velocity_cap, CAP_STEP);
                        publish_cap(pub_cap, velocity_cap).await?;
                    }
                    KeyCode::Char('[') if pressed => {
                        velocity_cap = step_cap(velocity_cap, -CAP_STEP);
                        publish_cap(pub_cap, velocity_cap).await?;
                    }

                    KeyCode::Char('q') | KeyCode::Esc if pressed => break,

                    _ => {}
                }
            }
        }

        if last_movement_input.elapsed() > Duration::from_millis(INPUT_TIMEOUT_MS) {
            axes = StickAxes::default();
        }

        // Always publish at ~50Hz so the runtime watchdog stays fed
        let sample = JoystickSample {
            controller: Controller::Primary,
            axes,
        };
        pub_joystick.put(serde_json::to_string(&sample)?).await?;
    }

    Ok(())
}

fn step_cap(velocity_cap: i32, delta: i32) -> i32 {
    (velocity_cap + delta).clamp(0, CAP_MAX)
}

async fn publish_cap(
    publisher: &zenoh::pubsub::Publisher<'_>,
    velocity_cap: i32,
) -> Result<(), BoxError> {
    let json = serde_json::to_string(&CapUpdate { velocity_cap })?;
    publisher.put(json).await?;
    if velocity_cap == 0 {
        warn!("Velocity cap: 0 (robot will not move)");
    } else {
        info!("Velocity cap: {}", velocity_cap);
    }
    Ok(())
}

fn print_deflection(idx: usize) {
    let label = ["LOW", "MED", "HIGH"][idx];
    info!("Deflection: {}", label);
}
