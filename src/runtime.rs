// Fixed-rate drive loop with watchdog
// Samples the latest joystick state each tick, mixes it and forwards the
// left/right setpoints. A stale joystick stream stops the robot.

use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::config::{
    RuntimeConfig, TOPIC_HEALTH, TOPIC_JOYSTICK, TOPIC_PHASE, TOPIC_RT_DRIVE, TOPIC_VELOCITY_CAP,
};
use crate::drive::{ActuatorError, DriveCommand, Mixer, WheelGroups};
use crate::input::{JoystickState, StickBinding};
use crate::messages::{CapUpdate, DriveActuation, JoystickSample, Phase, RuntimeHealth};

pub struct Runtime {
    mixer: Mixer,
    joystick: JoystickState,
    binding: StickBinding,
    cmd_timeout: Duration,
    sample_received_at: Option<Instant>,
    phase: Phase,
    health: RuntimeHealth,
}

impl Runtime {
    pub fn new(config: &RuntimeConfig) -> Self {
        Self {
            mixer: Mixer::new(config.velocity_cap),
            joystick: JoystickState::new(),
            binding: config.binding,
            cmd_timeout: config.cmd_timeout,
            sample_received_at: None,
            phase: config.start_phase,
            health: RuntimeHealth::CmdStale, // Start stale until first sample
        }
    }

    pub fn health(&self) -> RuntimeHealth {
        self.health
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn velocity_cap(&self) -> i32 {
        self.mixer.cap().get()
    }

    /// Process incoming joystick sample
    pub fn on_sample(&mut self, sample: &JoystickSample, now: Instant) {
        debug!("Received joystick sample: {:?}", sample);
        self.joystick.update(sample);
        if sample.controller == self.binding.controller {
            self.sample_received_at = Some(now);
        }
    }

    /// Apply a cap change; invalid values keep the current cap
    pub fn on_cap_update(&mut self, update: CapUpdate) {
        let previous = self.mixer.cap().get();
        match self.mixer.set_cap(update.velocity_cap) {
            Ok(()) => info!(
                "Velocity cap changed: {} -> {}",
                previous, update.velocity_cap
            ),
            Err(e) => warn!("Ignoring cap update: {}", e),
        }
    }

    pub fn on_phase(&mut self, phase: Phase) {
        if phase != self.phase {
            info!("Phase changed: {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    /// Compute drive output based on phase and watchdog state
    pub fn compute_drive(&mut self, now: Instant) -> DriveCommand {
        if self.phase != Phase::OperatorControl {
            self.health = RuntimeHealth::Disabled;
            return DriveCommand::zero();
        }

        let Some(received_at) = self.sample_received_at else {
            // No sample ever received
            self.health = RuntimeHealth::CmdStale;
            return DriveCommand::zero();
        };

        let age = now.saturating_duration_since(received_at);
        if age > self.cmd_timeout {
            // Watchdog triggered - stop the robot
            if self.health != RuntimeHealth::CmdStale {
                warn!("Joystick stale ({:?} old), stopping robot", age);
            }
            self.health = RuntimeHealth::CmdStale;
            self.joystick.clear();
            return DriveCommand::zero();
        }

        self.health = RuntimeHealth::Ok;
        let (axis_y, axis_x) = self.binding.sample(&self.joystick);
        self.mixer.mix(axis_y, axis_x)
    }

    /// Compute one cycle's output and hand it to the wheel groups
    ///
    /// On a failed write the groups are stopped (best effort) and health
    /// goes to `ActuatorFault` until a later cycle applies cleanly.
    pub fn step<A: WheelGroups>(
        &mut self,
        now: Instant,
        actuator: &mut A,
    ) -> Result<DriveCommand, ActuatorError> {
        let drive = self.compute_drive(now);
        debug!("Drive output: left={}, right={}", drive.left, drive.right);

        if let Err(e) = actuator.apply(drive) {
            warn!("Failed to apply drive output: {}", e);
            self.health = RuntimeHealth::ActuatorFault;
            if let Err(stop_err) = actuator.stop() {
                warn!("Failed to stop wheel groups: {}", stop_err);
            }
            return Err(e);
        }
        Ok(drive)
    }

    /// Stop the wheel groups before the runtime exits
    pub fn shutdown<A: WheelGroups>(&mut self, actuator: &mut A) -> Result<(), ActuatorError> {
        self.joystick.clear();
        self.sample_received_at = None;
        self.health = RuntimeHealth::CmdStale;
        actuator.stop()?;
        info!("Drivetrain stopped");
        Ok(())
    }
}

type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub async fn run<A: WheelGroups>(config: RuntimeConfig, actuator: &mut A) -> Result<(), BoxError> {
    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;

    info!("Setting up publishers and subscribers...");
    let sub_joystick = session.declare_subscriber(TOPIC_JOYSTICK).await?;
    let sub_cap = session.declare_subscriber(TOPIC_VELOCITY_CAP).await?;
    let sub_phase = session.declare_subscriber(TOPIC_PHASE).await?;
    let pub_drive = session.declare_publisher(TOPIC_RT_DRIVE).await?;
    let pub_health = session.declare_publisher(TOPIC_HEALTH).await?;

    let mut runtime = Runtime::new(&config);
    let mut tick = interval(config.loop_period);

    info!(
        "Runtime started: {:?} period, {}ms watchdog timeout, velocity cap {}",
        config.loop_period,
        config.cmd_timeout.as_millis(),
        runtime.velocity_cap()
    );
    info!(
        "Subscribed to: {}, {}, {}",
        TOPIC_JOYSTICK, TOPIC_VELOCITY_CAP, TOPIC_PHASE
    );
    info!("Publishing to: {}, {}", TOPIC_RT_DRIVE, TOPIC_HEALTH);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    // Every exit from this block, Ok or Err, falls through to the stop below
    let result: Result<(), BoxError> = async {
        loop {
            tokio::select! {
                _ = tick.tick() => {}
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
            }

            // 1. Drain all pending messages (non-blocking), keep latest
            while let Ok(Some(sample)) = sub_phase.try_recv() {
                match serde_json::from_slice::<Phase>(&sample.payload().to_bytes()) {
                    Ok(phase) => runtime.on_phase(phase),
                    Err(e) => warn!("Failed to parse phase: {}", e),
                }
            }
            while let Ok(Some(sample)) = sub_cap.try_recv() {
                match serde_json::from_slice::<CapUpdate>(&sample.payload().to_bytes()) {
                    Ok(update) => runtime.on_cap_update(update),
                    Err(e) => warn!("Failed to parse cap update: {}", e),
                }
            }
            while let Ok(Some(sample)) = sub_joystick.try_recv() {
                match serde_json::from_slice::<JoystickSample>(&sample.payload().to_bytes()) {
                    Ok(joystick) => runtime.on_sample(&joystick, Instant::now()),
                    Err(e) => warn!("Failed to parse joystick sample: {}", e),
                }
            }

            // 2. Compute and apply drive output (includes watchdog logic)
            let commanded = runtime
                .step(Instant::now(), &mut *actuator)
                .unwrap_or_else(|_| DriveCommand::zero());

            // 3. Publish what was actually commanded, and health
            let actuation_json = serde_json::to_string(&DriveActuation::from(commanded))?;
            pub_drive.put(actuation_json).await?;

            let health_json = serde_json::to_string(&runtime.health())?;
            pub_health.put(health_json).await?;
        }
        Ok(())
    }
    .await;

    if let Err(e) = &result {
        warn!("Drive loop failed: {}", e);
    }
    let stopped = runtime.shutdown(actuator);

    let stop_json = serde_json::to_string(&DriveActuation::default())?;
    if let Err(e) = pub_drive.put(stop_json).await {
        warn!("Failed to publish stop actuation: {}", e);
    }

    // A loop error takes precedence over a failed stop
    result?;
    stopped?;
    Ok(())
}
