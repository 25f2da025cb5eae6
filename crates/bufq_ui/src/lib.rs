//! bufq UI - graphics value types and flattenable buffer objects
//!
//! Plain-data types that travel inside a buffer record ([`Rect`],
//! [`Transform`], [`ScalingMode`], [`Dataspace`], [`PixelFormat`]) and the
//! two descriptor-carrying objects that can be embedded in one
//! ([`GraphicBuffer`], [`Fence`]).

mod dataspace;
mod fence;
mod graphic_buffer;
mod pixel_format;
mod rect;
mod scaling_mode;
mod transform;

pub use dataspace::Dataspace;
pub use fence::Fence;
pub use graphic_buffer::{GraphicBuffer, NativeHandle};
pub use pixel_format::PixelFormat;
pub use rect::Rect;
pub use scaling_mode::{scaling_mode_name, ScalingMode};
pub use transform::Transform;

/// Maximum descriptors accepted in a decoded native handle
pub const MAX_NATIVE_FDS: usize = 1024;

/// Maximum integers accepted in a decoded native handle
pub const MAX_NATIVE_INTS: usize = 1024;
