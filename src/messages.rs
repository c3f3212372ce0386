// Define message types for the runtime

use serde::{Deserialize, Serialize};

use crate::drive::{AxisReading, DriveCommand, VelocityCommand};
use crate::input::{Axis, Controller};

/// Raw stick readings for one controller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickAxes {
    #[serde(default)]
    pub left_x: AxisReading,
    #[serde(default)]
    pub left_y: AxisReading,
    #[serde(default)]
    pub right_x: AxisReading,
    #[serde(default)]
    pub right_y: AxisReading,
}

impl StickAxes {
    pub fn get(&self, axis: Axis) -> AxisReading {
        match axis {
            Axis::LeftX => self.left_x,
            Axis::LeftY => self.left_y,
            Axis::RightX => self.right_x,
            Axis::RightY => self.right_y,
        }
    }
}

// Joystick state from teleop -> runtime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoystickSample {
    #[serde(default)]
    pub controller: Controller,
    pub axes: StickAxes,
}

// Runtime adjustment of the velocity cap
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CapUpdate {
    pub velocity_cap: i32,
}

// Wheel-group setpoints from runtime -> drivetrain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveActuation {
    pub left: VelocityCommand,
    pub right: VelocityCommand,
}

impl From<DriveCommand> for DriveActuation {
    fn from(cmd: DriveCommand) -> Self {
        Self {
            left: cmd.left,
            right: cmd.right,
        }
    }
}

/// Health status published by runtime
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeHealth {
    Ok,
    CmdStale,
    Disabled,
    ActuatorFault,
}

/// Competition phase, mirrors the field controller's lifecycle
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Initialize,
    Disabled,
    Autonomous,
    OperatorControl,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_joystick_sample() {
        let json = r#"{"controller":"partner","axes":{"left_x":-20,"left_y":90}}"#;
        let sample: JoystickSample = serde_json::from_str(json).unwrap();
        assert_eq!(sample.controller, Controller::Partner);
        assert_eq!(sample.axes.get(Axis::LeftY), 90);
        assert_eq!(sample.axes.get(Axis::LeftX), -20);
        assert_eq!(sample.axes.get(Axis::RightX), 0);
    }

    #[test]
    fn test_controller_defaults_to_primary() {
        let sample: JoystickSample = serde_json::from_str(r#"{"axes":{}}"#).unwrap();
        assert_eq!(sample.controller, Controller::Primary);
        assert_eq!(sample.axes, StickAxes::default());
    }

    #[test]
    fn test_actuation_wire_format() {
        let actuation = DriveActuation::from(DriveCommand::new(100, -40));
        let json = serde_json::to_string(&actuation).unwrap();
        assert_eq!(json, r#"{"left":100,"right":-40}"#);
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(
            serde_json::to_string(&RuntimeHealth::CmdStale).unwrap(),
            r#""cmd_stale""#
        );
        assert_eq!(
            serde_json::to_string(&RuntimeHealth::ActuatorFault).unwrap(),
            r#""actuator_fault""#
        );
        let phase: Phase = serde_json::from_str(r#""operator_control""#).unwrap();
        assert_eq!(phase, Phase::OperatorControl);
    }
}
