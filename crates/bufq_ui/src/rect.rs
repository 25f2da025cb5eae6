//! Integer rectangle

use bytemuck::{Pod, Zeroable};

/// Axis-aligned rectangle with exclusive right/bottom edges
///
/// Laid out as four native `i32`s so it can be written to the wire as-is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    /// The "no rectangle" sentinel (negative width and height)
    pub const INVALID: Rect = Rect {
        left: 0,
        top: 0,
        right: -1,
        bottom: -1,
    };

    /// Zero-sized rectangle at the origin
    pub const EMPTY: Rect = Rect {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle at the origin with the given size
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub const fn width(&self) -> i32 {
        self.right.wrapping_sub(self.left)
    }

    pub const fn height(&self) -> i32 {
        self.bottom.wrapping_sub(self.top)
    }

    /// Valid rectangles have non-negative width and height
    pub const fn is_valid(&self) -> bool {
        self.width() >= 0 && self.height() >= 0
    }

    /// True if the rectangle covers no pixels (invalid ones included)
    pub const fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Reset to the invalid sentinel
    pub fn make_invalid(&mut self) {
        *self = Self::INVALID;
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::INVALID
    }
}
