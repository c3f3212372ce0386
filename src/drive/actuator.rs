// Wheel-group actuator interface
//
// The control loop hands each mixed command to whatever implements
// `WheelGroups`. Motor composition and units are owned by the implementor.

use std::fmt;

use tracing::{debug, info};

use super::mixer::{DriveCommand, VelocityCommand};

/// One logical side of the drivetrain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelGroup {
    Left,
    Right,
}

impl fmt::Display for WheelGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WheelGroup::Left => write!(f, "left"),
            WheelGroup::Right => write!(f, "right"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ActuatorError {
    #[error("Wheel group {group} rejected velocity: {reason}")]
    Rejected { group: WheelGroup, reason: String },
}

/// Sink for wheel-group velocity setpoints
pub trait WheelGroups {
    fn set_group_velocity(
        &mut self,
        group: WheelGroup,
        velocity: VelocityCommand,
    ) -> Result<(), ActuatorError>;

    /// Apply both sides of a mixed command
    fn apply(&mut self, cmd: DriveCommand) -> Result<(), ActuatorError> {
        self.set_group_velocity(WheelGroup::Left, cmd.left)?;
        self.set_group_velocity(WheelGroup::Right, cmd.right)
    }

    /// Command zero velocity on both sides
    fn stop(&mut self) -> Result<(), ActuatorError> {
        self.apply(DriveCommand::zero())
    }
}

/// Simulated wheel groups that only log and remember setpoints
#[derive(Debug, Default)]
pub struct LoggingActuator {
    last: DriveCommand,
    writes: u64,
}

impl LoggingActuator {
    pub fn new() -> Self {
        info!("Using simulated wheel groups (no hardware attached)");
        Self::default()
    }

    /// Last setpoints written to each group
    pub fn last_command(&self) -> DriveCommand {
        self.last
    }

    /// Number of individual group writes so far
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl WheelGroups for LoggingActuator {
    fn set_group_velocity(
        &mut self,
        group: WheelGroup,
        velocity: VelocityCommand,
    ) -> Result<(), ActuatorError> {
        debug!("Setting {} group velocity: {}", group, velocity);
        match group {
            WheelGroup::Left => self.last.left = velocity,
            WheelGroup::Right => self.last.right = velocity,
        }
        self.writes += 1;
        Ok(())
    }
}
