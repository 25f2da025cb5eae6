//! Shareable graphics buffer

use crate::{PixelFormat, Rect, MAX_NATIVE_FDS, MAX_NATIVE_INTS};
use bufq_flatten::{FdReader, FdWriter, FlattenError, Flattenable, ReadCursor, Result, WriteCursor};
use std::io;
use std::os::fd::{AsFd, OwnedFd};

/// Header word identifying a flattened graphics buffer
const MAGIC: u32 = u32::from_be_bytes(*b"GB01");

/// Number of u32 words in the flattened header
const HEADER_WORDS: usize = 13;

fn check_limits(num_fds: usize, num_ints: usize) -> Result<()> {
    if num_fds > MAX_NATIVE_FDS || num_ints > MAX_NATIVE_INTS {
        return Err(FlattenError::InvalidValue("native handle exceeds size limits"));
    }
    Ok(())
}

/// Allocator-specific handle: descriptors plus opaque integers
///
/// Owns its descriptors; they are closed when the handle is dropped.
#[derive(Debug, Default)]
pub struct NativeHandle {
    fds: Vec<OwnedFd>,
    ints: Vec<i32>,
}

impl NativeHandle {
    /// Build a handle, rejecting oversized descriptor or integer lists
    pub fn new(fds: Vec<OwnedFd>, ints: Vec<i32>) -> Result<Self> {
        check_limits(fds.len(), ints.len())?;
        Ok(Self { fds, ints })
    }

    pub fn fds(&self) -> &[OwnedFd] {
        &self.fds
    }

    pub fn ints(&self) -> &[i32] {
        &self.ints
    }

    /// Release the descriptors and integers
    pub fn into_parts(self) -> (Vec<OwnedFd>, Vec<i32>) {
        (self.fds, self.ints)
    }

    pub fn num_fds(&self) -> usize {
        self.fds.len()
    }

    pub fn num_ints(&self) -> usize {
        self.ints.len()
    }

    /// Duplicate every descriptor into an independent handle
    pub fn duplicate(&self) -> io::Result<NativeHandle> {
        let fds = self
            .fds
            .iter()
            .map(OwnedFd::try_clone)
            .collect::<io::Result<Vec<_>>>()?;
        Ok(NativeHandle {
            fds,
            ints: self.ints.clone(),
        })
    }
}

/// Buffer metadata plus the native handle that backs its memory
///
/// A buffer without a handle describes memory that has not been allocated
/// (or was not transferred).
#[derive(Debug, Default)]
pub struct GraphicBuffer {
    pub width: u32,
    pub height: u32,
    pub stride: u32,
    pub format: PixelFormat,
    pub layer_count: u32,
    pub usage: u64,
    pub id: u64,
    pub generation_number: u32,
    pub handle: Option<NativeHandle>,
}

impl GraphicBuffer {
    /// Describe a single-layer buffer with no backing memory yet
    pub fn new(width: u32, height: u32, format: PixelFormat, usage: u64) -> Self {
        Self {
            width,
            height,
            stride: width,
            format,
            layer_count: 1,
            usage,
            ..Default::default()
        }
    }

    /// Attach the handle that backs this buffer
    pub fn with_handle(mut self, handle: NativeHandle) -> Self {
        self.handle = Some(handle);
        self
    }

    /// Full-buffer rectangle
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width as i32, self.height as i32)
    }

    fn num_fds(&self) -> usize {
        self.handle.as_ref().map_or(0, NativeHandle::num_fds)
    }

    fn num_ints(&self) -> usize {
        self.handle.as_ref().map_or(0, NativeHandle::num_ints)
    }
}

impl Flattenable for GraphicBuffer {
    fn flattened_size(&self) -> usize {
        (HEADER_WORDS + self.num_ints()) * std::mem::size_of::<u32>()
    }

    fn fd_count(&self) -> usize {
        self.num_fds()
    }

    fn flatten(&self, buf: &mut WriteCursor<'_>, fds: &mut FdWriter<'_>) -> Result<()> {
        // Never emit a handle the decoder would refuse
        check_limits(self.num_fds(), self.num_ints())?;
        buf.check_remaining(self.flattened_size())?;
        fds.check_remaining(self.fd_count())?;

        let header: [u32; HEADER_WORDS] = [
            MAGIC,
            self.width,
            self.height,
            self.stride,
            self.format.0 as u32,
            self.layer_count,
            self.usage as u32,
            (self.id >> 32) as u32,
            self.id as u32,
            self.generation_number,
            self.num_fds() as u32,
            self.num_ints() as u32,
            (self.usage >> 32) as u32,
        ];
        buf.write(&header)?;

        if let Some(handle) = &self.handle {
            buf.write_bytes(bytemuck::cast_slice(&handle.ints))?;
            for fd in &handle.fds {
                fds.push(fd.as_fd())?;
            }
        }
        Ok(())
    }

    fn unflatten(&mut self, buf: &mut ReadCursor<'_>, fds: &mut FdReader<'_>) -> Result<()> {
        let header: [u32; HEADER_WORDS] = buf.read()?;
        if header[0] != MAGIC {
            return Err(FlattenError::BadMagic {
                expected: MAGIC,
                actual: header[0],
            });
        }

        let num_fds = header[10] as usize;
        let num_ints = header[11] as usize;
        check_limits(num_fds, num_ints)?;
        buf.check_remaining(num_ints * std::mem::size_of::<i32>())?;
        fds.check_remaining(num_fds)?;

        let handle = if num_fds > 0 || num_ints > 0 {
            let raw = buf.read_bytes(num_ints * std::mem::size_of::<i32>())?;
            let ints: Vec<i32> = raw
                .chunks_exact(std::mem::size_of::<i32>())
                .map(bytemuck::pod_read_unaligned)
                .collect();
            let owned = (0..num_fds)
                .map(|_| fds.take())
                .collect::<Result<Vec<_>>>()?;
            Some(NativeHandle { fds: owned, ints })
        } else {
            None
        };

        *self = GraphicBuffer {
            width: header[1],
            height: header[2],
            stride: header[3],
            format: PixelFormat(header[4] as i32),
            layer_count: header[5],
            usage: (u64::from(header[12]) << 32) | u64::from(header[6]),
            id: (u64::from(header[7]) << 32) | u64::from(header[8]),
            generation_number: header[9],
            handle,
        };
        Ok(())
    }
}
