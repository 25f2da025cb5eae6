//! Buffer item record codec

use crate::INVALID_BUFFER_SLOT;
use bitflags::bitflags;
use bufq_flatten::{
    unflatten_from, FdReader, FdWriter, FlattenError, Flattenable, ReadCursor, Result, WriteCursor,
};
use bufq_ui::{scaling_mode_name, Dataspace, Fence, GraphicBuffer, Rect, ScalingMode, Transform};
use std::mem::size_of;
use std::os::fd::OwnedFd;

bitflags! {
    /// Leading flag word: which optional objects follow it
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ContentFlags: u32 {
        /// A graphic buffer follows the flag word
        const GRAPHIC_BUFFER = 1 << 0;
        /// A fence follows (after the graphic buffer, if any)
        const FENCE = 1 << 1;
    }
}

/// A queued buffer and the metadata that travels with it
///
/// `B` and `F` are the embedded buffer and fence types. Either may be
/// absent: an item without a buffer only updates metadata, and an item
/// without a fence refers to a buffer that is ready to use.
#[derive(Debug, PartialEq)]
pub struct BufferItem<B = GraphicBuffer, F = Fence> {
    /// Region of the buffer to display; invalid means "no crop"
    pub crop: Rect,
    pub transform: Transform,
    pub scaling_mode: ScalingMode,
    /// Presentation time in nanoseconds
    pub timestamp: i64,
    /// True if `timestamp` was generated at queue time rather than supplied
    pub is_auto_timestamp: bool,
    pub dataspace: Dataspace,
    /// Producer-assigned frame number
    pub frame_number: u64,
    /// Pool slot, or [`INVALID_BUFFER_SLOT`]
    pub slot: i32,
    /// The consumer may skip this item if a newer one is queued
    pub is_droppable: bool,
    /// The consumer has acquired this buffer before
    pub acquire_called: bool,
    pub transform_to_display_inverse: bool,
    pub graphic_buffer: Option<B>,
    pub fence: Option<F>,
}

impl<B, F> BufferItem<B, F> {
    /// Size of the leading flag word
    pub const FLAGS_SIZE: usize = size_of::<u32>();

    /// Size of the packed plain-data block
    pub const POD_SIZE: usize = size_of::<Rect>()
        + size_of::<u32>() // transform
        + size_of::<u32>() // scaling mode
        + size_of::<i64>() // timestamp
        + size_of::<bool>() // is auto timestamp
        + size_of::<i32>() // dataspace
        + size_of::<u64>() // frame number
        + size_of::<i32>() // slot
        + size_of::<bool>() // is droppable
        + size_of::<bool>() // acquire called
        + size_of::<bool>(); // transform to display inverse

    /// An empty item: no crop, no slot, no buffer, no fence
    pub fn new() -> Self {
        Self {
            crop: Rect::INVALID,
            transform: Transform::empty(),
            scaling_mode: ScalingMode::FREEZE,
            timestamp: 0,
            is_auto_timestamp: false,
            dataspace: Dataspace::UNKNOWN,
            frame_number: 0,
            slot: INVALID_BUFFER_SLOT,
            is_droppable: false,
            acquire_called: false,
            transform_to_display_inverse: false,
            graphic_buffer: None,
            fence: None,
        }
    }

    /// Size of the packed plain-data block
    pub fn pod_size(&self) -> usize {
        Self::POD_SIZE
    }

    /// Flag word describing which optional objects are present
    pub fn content_flags(&self) -> ContentFlags {
        let mut flags = ContentFlags::empty();
        flags.set(ContentFlags::GRAPHIC_BUFFER, self.graphic_buffer.is_some());
        flags.set(ContentFlags::FENCE, self.fence.is_some());
        flags
    }

    /// Label for a raw scaling-mode value
    pub fn scaling_mode_name(mode: u32) -> &'static str {
        scaling_mode_name(mode)
    }

    fn write_pod(&self, buf: &mut WriteCursor<'_>) -> Result<()> {
        buf.write(&self.crop)?;
        buf.write(&self.transform.bits())?;
        buf.write(&self.scaling_mode.0)?;
        buf.write(&self.timestamp)?;
        buf.write_bool(self.is_auto_timestamp)?;
        buf.write(&self.dataspace.0)?;
        buf.write(&self.frame_number)?;
        buf.write(&self.slot)?;
        buf.write_bool(self.is_droppable)?;
        buf.write_bool(self.acquire_called)?;
        buf.write_bool(self.transform_to_display_inverse)
    }

    /// Read the plain-data block into an item with no embedded objects
    fn read_pod(buf: &mut ReadCursor<'_>) -> Result<Self> {
        Ok(Self {
            crop: buf.read()?,
            transform: Transform::from_bits_retain(buf.read()?),
            scaling_mode: ScalingMode(buf.read()?),
            timestamp: buf.read()?,
            is_auto_timestamp: buf.read_bool()?,
            dataspace: Dataspace(buf.read()?),
            frame_number: buf.read()?,
            slot: buf.read()?,
            is_droppable: buf.read_bool()?,
            acquire_called: buf.read_bool()?,
            transform_to_display_inverse: buf.read_bool()?,
            graphic_buffer: None,
            fence: None,
        })
    }
}

impl<B: Flattenable + Default, F: Flattenable + Default> BufferItem<B, F> {
    /// Decode a fresh item from a received message
    ///
    /// Descriptors taken by the embedded objects are removed from `fds`.
    pub fn decode(bytes: &[u8], fds: &mut [Option<OwnedFd>]) -> Result<Self> {
        unflatten_from(bytes, fds)
    }
}

impl<B, F> Default for BufferItem<B, F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Unflatten a fresh `T`, then skip padding to the next 4-byte boundary
fn unflatten_embedded<T: Flattenable + Default>(
    object: &'static str,
    buf: &mut ReadCursor<'_>,
    fds: &mut FdReader<'_>,
) -> Result<T> {
    let mut value = T::default();
    value
        .unflatten(buf, fds)
        .map_err(|e| FlattenError::embedded_decode(object, e))?;
    buf.align4()?;
    Ok(value)
}

impl<B: Flattenable + Default, F: Flattenable + Default> Flattenable for BufferItem<B, F> {
    fn flattened_size(&self) -> usize {
        let mut size = Self::FLAGS_SIZE;
        if let Some(buffer) = &self.graphic_buffer {
            size += bufq_flatten::align_up(buffer.flattened_size(), 4);
        }
        if let Some(fence) = &self.fence {
            size += bufq_flatten::align_up(fence.flattened_size(), 4);
        }
        size + Self::POD_SIZE
    }

    fn fd_count(&self) -> usize {
        self.graphic_buffer.as_ref().map_or(0, B::fd_count)
            + self.fence.as_ref().map_or(0, F::fd_count)
    }

    fn flatten(&self, buf: &mut WriteCursor<'_>, fds: &mut FdWriter<'_>) -> Result<()> {
        buf.check_remaining(self.flattened_size())?;
        fds.check_remaining(self.fd_count())?;

        // Flags are written last, once the embedded objects have succeeded
        let flags_offset = buf.position();
        buf.advance(Self::FLAGS_SIZE)?;

        let mut flags = ContentFlags::empty();
        if let Some(buffer) = &self.graphic_buffer {
            buffer
                .flatten(buf, fds)
                .map_err(|e| FlattenError::embedded_encode("graphic buffer", e))?;
            buf.align4()?;
            flags |= ContentFlags::GRAPHIC_BUFFER;
        }
        if let Some(fence) = &self.fence {
            fence
                .flatten(buf, fds)
                .map_err(|e| FlattenError::embedded_encode("fence", e))?;
            buf.align4()?;
            flags |= ContentFlags::FENCE;
        }

        // An embedded object may have written more than it reported
        buf.check_remaining(Self::POD_SIZE)?;
        self.write_pod(buf)?;
        buf.patch(flags_offset, &flags.bits())?;

        tracing::trace!(
            "Flattened buffer item: frame {} slot {} flags {:?} ({} bytes, {} fds)",
            self.frame_number,
            self.slot,
            flags,
            buf.position() - flags_offset,
            self.fd_count()
        );
        Ok(())
    }

    fn unflatten(&mut self, buf: &mut ReadCursor<'_>, fds: &mut FdReader<'_>) -> Result<()> {
        let start = buf.position();
        let flags = ContentFlags::from_bits_truncate(buf.read::<u32>()?);

        let graphic_buffer = if flags.contains(ContentFlags::GRAPHIC_BUFFER) {
            Some(unflatten_embedded::<B>("graphic buffer", buf, fds)?)
        } else {
            None
        };
        let fence = if flags.contains(ContentFlags::FENCE) {
            Some(unflatten_embedded::<F>("fence", buf, fds)?)
        } else {
            None
        };

        buf.check_remaining(Self::POD_SIZE)?;
        let item = Self {
            graphic_buffer,
            fence,
            ..Self::read_pod(buf)?
        };

        // Replace everything at once; previous embedded objects are dropped
        *self = item;

        tracing::trace!(
            "Unflattened buffer item: frame {} slot {} flags {:?} ({} bytes)",
            self.frame_number,
            self.slot,
            flags,
            buf.position() - start
        );
        Ok(())
    }
}
