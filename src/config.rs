// Timeouts, topics, drive configuration
use std::time::Duration;

use clap::Parser;

use crate::drive::{MixError, VelocityCap};
use crate::input::{Axis, Controller, StickBinding};
use crate::messages::Phase;

// Runtime loop frequency
pub const LOOP_HZ: u64 = 50;

// Command timeout for watchdog
pub const CMD_TIMEOUT: Duration = Duration::from_millis(250);

// Default wheel-group velocity cap
pub const DEFAULT_VELOCITY_CAP: i32 = 100;

// Zenoh topics
pub const TOPIC_JOYSTICK: &str = "tank/input/joystick"; // stick readings
pub const TOPIC_VELOCITY_CAP: &str = "tank/config/velocity_cap"; // cap updates
pub const TOPIC_PHASE: &str = "tank/state/phase"; // competition phase
pub const TOPIC_RT_DRIVE: &str = "tank/rt/drive"; // actuation
pub const TOPIC_HEALTH: &str = "tank/state/health"; // health status

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Cap(#[from] MixError),

    #[error("Loop rate must be between 1 and 1000 Hz, got {0}")]
    LoopRate(u64),

    #[error("Command timeout must be non-zero")]
    ZeroTimeout,
}

/// Tank drive runtime: joystick in, wheel-group velocities out
#[derive(Debug, Clone, Parser)]
#[command(version)]
pub struct Args {
    /// Maximum magnitude of any wheel-group velocity command
    #[arg(long, default_value_t = DEFAULT_VELOCITY_CAP, allow_negative_numbers = true)]
    pub velocity_cap: i32,

    /// Control loop frequency in Hz
    #[arg(long, default_value_t = LOOP_HZ)]
    pub loop_hz: u64,

    /// Stop the drivetrain when no joystick sample arrives for this long
    #[arg(long, default_value_t = CMD_TIMEOUT.as_millis() as u64)]
    pub cmd_timeout_ms: u64,

    /// Controller whose stick drives the base
    #[arg(long, value_enum, default_value_t = Controller::Primary)]
    pub controller: Controller,

    /// Axis used for forward/back
    #[arg(long, value_enum, default_value_t = Axis::LeftY)]
    pub forward_axis: Axis,

    /// Axis used for turning
    #[arg(long, value_enum, default_value_t = Axis::LeftX)]
    pub turn_axis: Axis,

    /// Phase to assume until the field controller publishes one
    #[arg(long, value_enum, default_value_t = Phase::OperatorControl)]
    pub start_phase: Phase,
}

impl Args {
    pub fn runtime_config(&self) -> Result<RuntimeConfig, ConfigError> {
        let velocity_cap = VelocityCap::new(self.velocity_cap)?;

        if !(1..=1000).contains(&self.loop_hz) {
            return Err(ConfigError::LoopRate(self.loop_hz));
        }
        if self.cmd_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(RuntimeConfig {
            velocity_cap,
            loop_period: loop_period(self.loop_hz),
            cmd_timeout: Duration::from_millis(self.cmd_timeout_ms),
            binding: StickBinding {
                controller: self.controller,
                forward: self.forward_axis,
                turn: self.turn_axis,
            },
            start_phase: self.start_phase,
        })
    }
}

fn loop_period(hz: u64) -> Duration {
    Duration::from_nanos(1_000_000_000 / hz)
}

/// Validated runtime settings
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub velocity_cap: VelocityCap,
    pub loop_period: Duration,
    pub cmd_timeout: Duration,
    pub binding: StickBinding,
    pub start_phase: Phase,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            velocity_cap: VelocityCap::DEFAULT,
            loop_period: loop_period(LOOP_HZ),
            cmd_timeout: CMD_TIMEOUT,
            binding: StickBinding::default(),
            start_phase: Phase::OperatorControl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("tank-drive-runtime").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]).runtime_config().unwrap();
        assert_eq!(config.velocity_cap.get(), 100);
        assert_eq!(config.loop_period, Duration::from_millis(20));
        assert_eq!(config.cmd_timeout, CMD_TIMEOUT);
        assert_eq!(config.binding, StickBinding::default());
        assert_eq!(config.start_phase, Phase::OperatorControl);
    }

    #[test]
    fn test_overrides() {
        let config = parse(&[
            "--velocity-cap",
            "200",
            "--controller",
            "partner",
            "--forward-axis",
            "right-y",
            "--start-phase",
            "disabled",
        ])
        .runtime_config()
        .unwrap();
        assert_eq!(config.velocity_cap.get(), 200);
        assert_eq!(config.binding.controller, Controller::Partner);
        assert_eq!(config.binding.forward, Axis::RightY);
        assert_eq!(config.binding.turn, Axis::LeftX);
        assert_eq!(config.start_phase, Phase::Disabled);
    }

    #[test]
    fn test_negative_cap_rejected() {
        let err = parse(&["--velocity-cap", "-5"]).runtime_config().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Cap(MixError::InvalidCap { cap: -5 })
        ));
    }

    #[test]
    fn test_bad_loop_rate_rejected() {
        let err = parse(&["--loop-hz", "0"]).runtime_config().unwrap_err();
        assert!(matches!(err, ConfigError::LoopRate(0)));
    }

    #[test]
    fn test_loop_period_not_truncated() {
        let config = parse(&["--loop-hz", "600"]).runtime_config().unwrap();
        assert_eq!(config.loop_period, Duration::from_nanos(1_666_666));

        let config = parse(&["--loop-hz", "1000"]).runtime_config().unwrap();
        assert_eq!(config.loop_period, Duration::from_millis(1));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = parse(&["--cmd-timeout-ms", "0"])
            .runtime_config()
            .unwrap_err();
        assert!(matches!(err, ConfigError::ZeroTimeout));
    }
}
