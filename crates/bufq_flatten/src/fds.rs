//! File-descriptor cursors
//!
//! Descriptors travel out-of-band from the bytes (e.g. as `SCM_RIGHTS`
//! ancillary data). They are consumed in the same order the byte stream is
//! written or read.

use crate::{FlattenError, Result};
use std::os::fd::{AsRawFd, BorrowedFd, OwnedFd, RawFd};

/// Output cursor for descriptors
///
/// Flattening only borrows descriptors; the object being flattened keeps
/// ownership, and the raw values are valid for as long as it lives.
#[derive(Debug)]
pub struct FdWriter<'a> {
    slots: &'a mut [RawFd],
    pos: usize,
}

impl<'a> FdWriter<'a> {
    /// Create a cursor positioned at the first slot
    pub fn new(slots: &'a mut [RawFd]) -> Self {
        Self { slots, pos: 0 }
    }

    /// Descriptors written so far
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Free slots left
    pub fn remaining(&self) -> usize {
        self.slots.len() - self.pos
    }

    /// Fail with `NotEnoughFds` unless `needed` slots are free
    pub fn check_remaining(&self, needed: usize) -> Result<()> {
        if self.remaining() < needed {
            return Err(FlattenError::NotEnoughFds {
                needed,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    /// Append one descriptor
    pub fn push(&mut self, fd: BorrowedFd<'_>) -> Result<()> {
        self.check_remaining(1)?;
        self.slots[self.pos] = fd.as_raw_fd();
        self.pos += 1;
        Ok(())
    }

    /// Descriptors written so far
    pub fn written(&self) -> &[RawFd] {
        &self.slots[..self.pos]
    }
}

/// Input cursor for received descriptors
///
/// Taking a descriptor moves its ownership to the caller and leaves `None`
/// in the slot. Slots not consumed by an unflatten remain owned by whoever
/// supplied the array and are closed when it is dropped.
#[derive(Debug)]
pub struct FdReader<'a> {
    fds: &'a mut [Option<OwnedFd>],
    pos: usize,
}

impl<'a> FdReader<'a> {
    /// Create a cursor positioned at the first received descriptor
    pub fn new(fds: &'a mut [Option<OwnedFd>]) -> Self {
        Self { fds, pos: 0 }
    }

    /// Descriptors consumed so far
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Descriptors left
    pub fn remaining(&self) -> usize {
        self.fds.len() - self.pos
    }

    /// Fail with `NotEnoughFds` unless `needed` descriptors are left
    pub fn check_remaining(&self, needed: usize) -> Result<()> {
        if self.remaining() < needed {
            return Err(FlattenError::NotEnoughFds {
                needed,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    /// Take ownership of the next descriptor
    pub fn take(&mut self) -> Result<OwnedFd> {
        self.check_remaining(1)?;
        let fd = self.fds[self.pos]
            .take()
            .ok_or(FlattenError::InvalidOperation("descriptor already taken"))?;
        self.pos += 1;
        Ok(fd)
    }
}
