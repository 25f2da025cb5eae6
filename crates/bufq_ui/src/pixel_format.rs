//! Pixel formats

/// Layout of a buffer's pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct PixelFormat(pub i32);

impl PixelFormat {
    pub const UNKNOWN: PixelFormat = PixelFormat(0);
    pub const RGBA_8888: PixelFormat = PixelFormat(1);
    pub const RGBX_8888: PixelFormat = PixelFormat(2);
    pub const RGB_888: PixelFormat = PixelFormat(3);
    pub const RGB_565: PixelFormat = PixelFormat(4);
    pub const BGRA_8888: PixelFormat = PixelFormat(5);

    /// Bytes per pixel, if the format is one of the packed RGB layouts
    pub fn bytes_per_pixel(self) -> Option<u32> {
        match self {
            PixelFormat::RGBA_8888 | PixelFormat::RGBX_8888 | PixelFormat::BGRA_8888 => Some(4),
            PixelFormat::RGB_888 => Some(3),
            PixelFormat::RGB_565 => Some(2),
            _ => None,
        }
    }
}
