//! Read cursor over a received byte region

use crate::{align_up, FlattenError, Result};
use bytemuck::AnyBitPattern;

/// Input cursor for unflattening
#[derive(Debug, Clone)]
pub struct ReadCursor<'a> {
    /// Source region
    bytes: &'a [u8],
    /// Bytes consumed so far
    pos: usize,
}

impl<'a> ReadCursor<'a> {
    /// Create a cursor positioned at the start of `bytes`
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Offset from the start of the region
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    /// Fail with `Truncated` unless `needed` bytes are left
    pub fn check_remaining(&self, needed: usize) -> Result<()> {
        if self.remaining() < needed {
            return Err(FlattenError::Truncated {
                needed,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    /// Skip `n` bytes
    pub fn advance(&mut self, n: usize) -> Result<()> {
        self.check_remaining(n)?;
        self.pos += n;
        Ok(())
    }

    /// Skip padding up to the next multiple of `alignment`
    ///
    /// Returns the number of padding bytes consumed.
    pub fn align(&mut self, alignment: usize) -> Result<usize> {
        let padding = align_up(self.pos, alignment) - self.pos;
        self.advance(padding)?;
        Ok(padding)
    }

    /// Skip padding up to the next 4-byte boundary
    pub fn align4(&mut self) -> Result<usize> {
        self.align(4)
    }

    /// Read raw bytes
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.check_remaining(len)?;
        let data = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(data)
    }

    /// Read a plain value in native byte order, unpadded
    pub fn read<T: AnyBitPattern>(&mut self) -> Result<T> {
        let data = self.read_bytes(std::mem::size_of::<T>())?;
        Ok(bytemuck::pod_read_unaligned(data))
    }

    /// Read a single-byte bool
    pub fn read_bool(&mut self) -> Result<bool> {
        match self.read::<u8>()? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(FlattenError::InvalidBool { value }),
        }
    }
}
