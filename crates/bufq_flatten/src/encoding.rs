//! Write cursor over a caller-supplied byte region

use crate::{align_up, FlattenError, Result};
use bytemuck::NoUninit;

/// Output cursor for flattening
///
/// Wraps a fixed destination region. The cursor advances as bytes are
/// written and `remaining()` shrinks accordingly; the region itself stays
/// owned by the caller.
#[derive(Debug)]
pub struct WriteCursor<'a> {
    /// Destination region
    buf: &'a mut [u8],
    /// Bytes consumed so far
    pos: usize,
}

impl<'a> WriteCursor<'a> {
    /// Create a cursor positioned at the start of `buf`
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Offset from the start of the region
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left in the region
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Total size of the region
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Bytes written so far
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.pos]
    }

    /// Fail with `InsufficientSpace` unless `needed` bytes are left
    pub fn check_remaining(&self, needed: usize) -> Result<()> {
        if self.remaining() < needed {
            return Err(FlattenError::InsufficientSpace {
                needed,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    /// Move forward `n` bytes without writing them
    pub fn advance(&mut self, n: usize) -> Result<()> {
        self.check_remaining(n)?;
        self.pos += n;
        Ok(())
    }

    /// Zero-pad up to the next multiple of `alignment`
    ///
    /// Alignment is relative to the start of the region. Returns the number
    /// of padding bytes consumed.
    pub fn align(&mut self, alignment: usize) -> Result<usize> {
        let padding = align_up(self.pos, alignment) - self.pos;
        self.check_remaining(padding)?;
        self.buf[self.pos..self.pos + padding].fill(0);
        self.pos += padding;
        Ok(padding)
    }

    /// Zero-pad up to the next 4-byte boundary
    pub fn align4(&mut self) -> Result<usize> {
        self.align(4)
    }

    /// Write raw bytes
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.check_remaining(data.len())?;
        self.buf[self.pos..self.pos + data.len()].copy_from_slice(data);
        self.pos += data.len();
        Ok(())
    }

    /// Write a plain value in native byte order, unpadded
    pub fn write<T: NoUninit>(&mut self, value: &T) -> Result<()> {
        self.write_bytes(bytemuck::bytes_of(value))
    }

    /// Write a bool as a single byte
    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_bytes(&[u8::from(value)])
    }

    /// Overwrite a value at `offset` inside the already-consumed region
    ///
    /// Used to fill in a header whose contents depend on what follows it.
    /// The cursor position does not move.
    pub fn patch<T: NoUninit>(&mut self, offset: usize, value: &T) -> Result<()> {
        let bytes = bytemuck::bytes_of(value);
        match offset.checked_add(bytes.len()) {
            Some(end) if end <= self.pos => {
                self.buf[offset..end].copy_from_slice(bytes);
                Ok(())
            }
            _ => Err(FlattenError::InvalidOperation(
                "patch outside the consumed region",
            )),
        }
    }
}
