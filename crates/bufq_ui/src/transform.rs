//! Buffer orientation bitmask

use bitflags::bitflags;

bitflags! {
    /// Orientation applied to a buffer's contents before display
    ///
    /// Rotations are built from flips: 180 degrees is both flips, 270 is
    /// 180 plus 90. Bits outside the known set are retained unchanged.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Transform: u32 {
        /// Mirror horizontally
        const FLIP_H = 0x01;
        /// Mirror vertically
        const FLIP_V = 0x02;
        /// Rotate 90 degrees clockwise
        const ROT_90 = 0x04;
        /// Rotate 180 degrees
        const ROT_180 = Self::FLIP_H.bits() | Self::FLIP_V.bits();
        /// Rotate 270 degrees clockwise
        const ROT_270 = Self::ROT_180.bits() | Self::ROT_90.bits();
        /// Apply the inverse of the display's own transform
        const INVERSE_DISPLAY = 0x08;

        const _ = !0;
    }
}

impl Transform {
    /// True if width and height trade places on screen
    pub fn swaps_dimensions(&self) -> bool {
        self.contains(Transform::ROT_90)
    }
}
