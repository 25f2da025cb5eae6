//! Scaling mode and its name lookup

use std::fmt;

/// How a buffer is scaled when its size differs from the window's
///
/// Stored as the raw wire value; unrecognized values survive a round trip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct ScalingMode(pub u32);

impl ScalingMode {
    /// Keep the window size fixed until a buffer of matching size arrives
    pub const FREEZE: ScalingMode = ScalingMode(0);
    /// Scale the buffer to the window in both dimensions
    pub const SCALE_TO_WINDOW: ScalingMode = ScalingMode(1);
    /// Scale uniformly, cropping whatever overflows the window
    pub const SCALE_CROP: ScalingMode = ScalingMode(2);
    /// Crop to the window without scaling
    pub const NO_SCALE_CROP: ScalingMode = ScalingMode(3);

    /// Fixed label for this mode ("Unknown" if unrecognized)
    pub fn name(self) -> &'static str {
        scaling_mode_name(self.0)
    }

    /// True for the four modes with a defined meaning
    pub fn is_known(self) -> bool {
        self.0 <= Self::NO_SCALE_CROP.0
    }
}

impl From<u32> for ScalingMode {
    fn from(raw: u32) -> Self {
        ScalingMode(raw)
    }
}

impl From<ScalingMode> for u32 {
    fn from(mode: ScalingMode) -> Self {
        mode.0
    }
}

impl fmt::Display for ScalingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Label for a raw scaling-mode value
pub fn scaling_mode_name(mode: u32) -> &'static str {
    match ScalingMode(mode) {
        ScalingMode::FREEZE => "FREEZE",
        ScalingMode::SCALE_TO_WINDOW => "SCALE_TO_WINDOW",
        ScalingMode::SCALE_CROP => "SCALE_CROP",
        ScalingMode::NO_SCALE_CROP => "NO_SCALE_CROP",
        _ => "Unknown",
    }
}
