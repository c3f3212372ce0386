// Operator input devices
//
// The mixer never reads a device itself. Readings are sampled through
// `InputDevice` by the control loop and passed in as plain integers.

use serde::{Deserialize, Serialize};

use crate::drive::AxisReading;
use crate::messages::{JoystickSample, StickAxes};

/// Which handheld controller a reading comes from
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Controller {
    #[default]
    Primary,
    Partner,
}

/// Analog stick axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    LeftX,
    LeftY,
    RightX,
    RightY,
}

/// Query interface for analog axis readings
pub trait InputDevice {
    fn axis(&self, controller: Controller, axis: Axis) -> AxisReading;
}

/// Which axes drive the mixer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StickBinding {
    pub controller: Controller,
    pub forward: Axis,
    pub turn: Axis,
}

impl Default for StickBinding {
    // Single-stick arcade: left stick does both
    fn default() -> Self {
        Self {
            controller: Controller::Primary,
            forward: Axis::LeftY,
            turn: Axis::LeftX,
        }
    }
}

impl StickBinding {
    /// Returns (forward, turn) readings from the bound controller
    pub fn sample(&self, device: &dyn InputDevice) -> (AxisReading, AxisReading) {
        (
            device.axis(self.controller, self.forward),
            device.axis(self.controller, self.turn),
        )
    }
}

/// Last known stick readings for both controllers
#[derive(Debug, Clone, Default)]
pub struct JoystickState {
    primary: StickAxes,
    partner: StickAxes,
}

impl JoystickState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, sample: &JoystickSample) {
        match sample.controller {
            Controller::Primary => self.primary = sample.axes,
            Controller::Partner => self.partner = sample.axes,
        }
    }

    /// Zero every axis on both controllers
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl InputDevice for JoystickState {
    fn axis(&self, controller: Controller, axis: Axis) -> AxisReading {
        match controller {
            Controller::Primary => self.primary.get(axis),
            Controller::Partner => self.partner.get(axis),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(controller: Controller, left_x: i32, left_y: i32, right_y: i32) -> JoystickSample {
        JoystickSample {
            controller,
            axes: StickAxes {
                left_x,
                left_y,
                right_x: 0,
                right_y,
            },
        }
    }

    #[test]
    fn test_default_binding_reads_left_stick() {
        let mut state = JoystickState::new();
        state.update(&sample(Controller::Primary, 30, 50, -99));
        assert_eq!(StickBinding::default().sample(&state), (50, 30));
    }

    #[test]
    fn test_controllers_are_independent() {
        let mut state = JoystickState::new();
        state.update(&sample(Controller::Primary, 1, 2, 3));
        state.update(&sample(Controller::Partner, 10, 20, 30));
        assert_eq!(state.axis(Controller::Primary, Axis::LeftY), 2);
        assert_eq!(state.axis(Controller::Partner, Axis::LeftY), 20);
        assert_eq!(state.axis(Controller::Partner, Axis::RightY), 30);
    }

    #[test]
    fn test_split_binding() {
        let mut state = JoystickState::new();
        state.update(&sample(Controller::Partner, -64, 0, 127));
        let binding = StickBinding {
            controller: Controller::Partner,
            forward: Axis::RightY,
            turn: Axis::LeftX,
        };
        assert_eq!(binding.sample(&state), (127, -64));
    }

    #[test]
    fn test_clear_zeroes_axes() {
        let mut state = JoystickState::new();
        state.update(&sample(Controller::Primary, 30, 50, 0));
        state.clear();
        assert_eq!(StickBinding::default().sample(&state), (0, 0));
    }
}
