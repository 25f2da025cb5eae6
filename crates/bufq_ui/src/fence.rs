//! Synchronization fence

use bufq_flatten::{FdReader, FdWriter, FlattenError, Flattenable, ReadCursor, Result, WriteCursor};
use std::io;
use std::os::fd::{AsFd, BorrowedFd, OwnedFd};

/// A sync fence backed by a file descriptor
///
/// A fence without a descriptor is already signaled ("no fence"). The
/// descriptor is closed when the fence is dropped.
#[derive(Debug, Default)]
pub struct Fence {
    fd: Option<OwnedFd>,
}

impl Fence {
    /// Bytes a flattened fence occupies (the descriptor count word)
    pub const FLATTENED_SIZE: usize = std::mem::size_of::<u32>();

    /// A fence that is already signaled
    pub const fn no_fence() -> Self {
        Fence { fd: None }
    }

    /// Wrap an existing sync-fence descriptor
    pub fn new(fd: OwnedFd) -> Self {
        Fence { fd: Some(fd) }
    }

    /// True if a descriptor is held
    pub fn is_valid(&self) -> bool {
        self.fd.is_some()
    }

    /// Borrow the descriptor, if any
    pub fn as_fd(&self) -> Option<BorrowedFd<'_>> {
        self.fd.as_ref().map(AsFd::as_fd)
    }

    /// Release the descriptor, leaving "no fence" behind
    pub fn take(&mut self) -> Option<OwnedFd> {
        self.fd.take()
    }

    /// Consume the fence, returning its descriptor
    pub fn into_fd(self) -> Option<OwnedFd> {
        self.fd
    }

    /// Duplicate the descriptor into an independent fence
    pub fn duplicate(&self) -> io::Result<Fence> {
        match &self.fd {
            Some(fd) => Ok(Fence::new(fd.try_clone()?)),
            None => Ok(Fence::no_fence()),
        }
    }
}

impl Flattenable for Fence {
    fn flattened_size(&self) -> usize {
        Self::FLATTENED_SIZE
    }

    fn fd_count(&self) -> usize {
        usize::from(self.is_valid())
    }

    fn flatten(&self, buf: &mut WriteCursor<'_>, fds: &mut FdWriter<'_>) -> Result<()> {
        buf.check_remaining(self.flattened_size())?;
        fds.check_remaining(self.fd_count())?;

        buf.write(&(self.fd_count() as u32))?;
        if let Some(fd) = self.as_fd() {
            fds.push(fd)?;
        }
        Ok(())
    }

    fn unflatten(&mut self, buf: &mut ReadCursor<'_>, fds: &mut FdReader<'_>) -> Result<()> {
        if self.fd.is_some() {
            return Err(FlattenError::InvalidOperation("fence already holds a descriptor"));
        }

        let num_fds = buf.read::<u32>()? as usize;
        if num_fds > 1 {
            return Err(FlattenError::InvalidValue("fence carries at most one descriptor"));
        }
        fds.check_remaining(num_fds)?;

        if num_fds == 1 {
            self.fd = Some(fds.take()?);
        }
        Ok(())
    }
}
