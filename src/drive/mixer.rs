// Single-stick tank mixing for a two-sided drivetrain
// Converts forward (Y) and turn (X) axis readings into left/right wheel-group velocities.

/// Signed joystick displacement along one axis, nominally -127..=127
pub type AxisReading = i32;

/// Target velocity for one wheel group, in the same units as the cap
pub type VelocityCommand = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MixError {
    #[error("Invalid velocity cap {cap}: must not be negative")]
    InvalidCap { cap: i32 },
}

/// Maximum magnitude any wheel-group command may take
///
/// Zero is accepted and forces every output to 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct VelocityCap(i32);

impl VelocityCap {
    pub const DEFAULT: VelocityCap = VelocityCap(100);

    pub fn new(cap: i32) -> Result<Self, MixError> {
        if cap < 0 {
            return Err(MixError::InvalidCap { cap });
        }
        Ok(Self(cap))
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl Default for VelocityCap {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i32> for VelocityCap {
    type Error = MixError;

    fn try_from(cap: i32) -> Result<Self, Self::Error> {
        Self::new(cap)
    }
}

/// Left/right velocity pair produced from one pair of readings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriveCommand {
    pub left: VelocityCommand,
    pub right: VelocityCommand,
}

impl DriveCommand {
    pub fn new(left: VelocityCommand, right: VelocityCommand) -> Self {
        Self { left, right }
    }

    pub fn zero() -> Self {
        Self::default()
    }
}

/// Mix two axis readings with a raw cap value
///
/// # Arguments
/// * `axis_y` - Forward/back reading (positive = forward)
/// * `axis_x` - Left/right reading (positive = turn right)
/// * `cap` - Maximum output magnitude, must be >= 0
pub fn mix(axis_y: AxisReading, axis_x: AxisReading, cap: i32) -> Result<DriveCommand, MixError> {
    let cap = VelocityCap::new(cap)?;
    Ok(mix_with_cap(axis_y, axis_x, cap))
}

/// Mix two axis readings with an already validated cap
pub fn mix_with_cap(axis_y: AxisReading, axis_x: AxisReading, cap: VelocityCap) -> DriveCommand {
    // i64 so the sum of two i32 readings cannot wrap
    let y = i64::from(axis_y);
    let x = i64::from(axis_x);

    DriveCommand {
        left: clamp_to_cap(y + x, cap),
        right: clamp_to_cap(y - x, cap),
    }
}

fn clamp_to_cap(raw: i64, cap: VelocityCap) -> VelocityCommand {
    let limit = i64::from(cap.get());
    // |result| <= cap <= i32::MAX, so the narrowing is lossless
    raw.clamp(-limit, limit) as VelocityCommand
}

/// Drive mixer holding the currently configured cap
#[derive(Debug, Clone, Default)]
pub struct Mixer {
    cap: VelocityCap,
}

impl Mixer {
    pub fn new(cap: VelocityCap) -> Self {
        Self { cap }
    }

    pub fn cap(&self) -> VelocityCap {
        self.cap
    }

    /// Replace the cap; a rejected value keeps the previous one
    pub fn set_cap(&mut self, cap: i32) -> Result<(), MixError> {
        self.cap = VelocityCap::new(cap)?;
        Ok(())
    }

    pub fn mix(&self, axis_y: AxisReading, axis_x: AxisReading) -> DriveCommand {
        let cap = self.cap;
        mix_with_cap(axis_y, axis_x, cap)
    }
}
