// Drive control for a two-sided (tank) wheeled base
//
// Provides:
// - Single-stick tank mixing (axis readings -> left/right velocities)
// - Wheel-group actuator interface and a simulated implementation

pub mod actuator;
pub mod mixer;

pub use actuator::{ActuatorError, LoggingActuator, WheelGroup, WheelGroups};
pub use mixer::{
    AxisReading, DriveCommand, MixError, Mixer, VelocityCap, VelocityCommand, mix, mix_with_cap,
};
