//! Color/data-space tags

/// Interpretation of a buffer's sample values
///
/// Packed as standard, transfer function and range fields. Values are
/// passed through unchanged; nothing here validates a combination.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Dataspace(pub i32);

impl Dataspace {
    const STANDARD_SHIFT: u32 = 16;
    const TRANSFER_SHIFT: u32 = 22;
    const RANGE_SHIFT: u32 = 27;

    const STANDARD_MASK: i32 = 63 << Self::STANDARD_SHIFT;
    const TRANSFER_MASK: i32 = 31 << Self::TRANSFER_SHIFT;
    const RANGE_MASK: i32 = 7 << Self::RANGE_SHIFT;

    pub const UNKNOWN: Dataspace = Dataspace(0);
    pub const ARBITRARY: Dataspace = Dataspace(1);

    /// BT.709 primaries, linear transfer, full range
    pub const SRGB_LINEAR: Dataspace = Dataspace((1 << 16) | (1 << 22) | (1 << 27));
    /// BT.709 primaries, sRGB transfer, full range
    pub const SRGB: Dataspace = Dataspace((1 << 16) | (2 << 22) | (1 << 27));
    /// DCI-P3 primaries, sRGB transfer, full range
    pub const DISPLAY_P3: Dataspace = Dataspace((10 << 16) | (2 << 22) | (1 << 27));
    /// BT.601 625-line primaries, SMPTE 170M transfer, limited range
    pub const JFIF: Dataspace = Dataspace((2 << 16) | (3 << 22) | (1 << 27));

    /// Color primaries field
    pub fn standard(self) -> i32 {
        (self.0 & Self::STANDARD_MASK) >> Self::STANDARD_SHIFT
    }

    /// Transfer function field
    pub fn transfer(self) -> i32 {
        (self.0 & Self::TRANSFER_MASK) >> Self::TRANSFER_SHIFT
    }

    /// Value range field
    pub fn range(self) -> i32 {
        (self.0 & Self::RANGE_MASK) >> Self::RANGE_SHIFT
    }
}

impl From<i32> for Dataspace {
    fn from(raw: i32) -> Self {
        Dataspace(raw)
    }
}
