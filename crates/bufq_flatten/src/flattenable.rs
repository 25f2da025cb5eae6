//! The flattenable capability

use crate::{FdReader, FdWriter, ReadCursor, Result, WriteCursor};
use std::os::fd::{OwnedFd, RawFd};

/// An object that can be flattened into bytes plus descriptors
///
/// The size queries must be pure and must never under-report what
/// `flatten` consumes. `unflatten` is called on a freshly constructed
/// (default) value.
pub trait Flattenable {
    /// Bytes `flatten` will write
    fn flattened_size(&self) -> usize;

    /// Descriptors `flatten` will write
    fn fd_count(&self) -> usize;

    /// Write this object at the cursors, advancing both
    fn flatten(&self, buf: &mut WriteCursor<'_>, fds: &mut FdWriter<'_>) -> Result<()>;

    /// Rebuild this object from the cursors, advancing both
    fn unflatten(&mut self, buf: &mut ReadCursor<'_>, fds: &mut FdReader<'_>) -> Result<()>;
}

/// Flatten `value` into freshly allocated, exactly sized regions
///
/// Returns the bytes and the raw descriptors. The descriptors stay owned by
/// `value` and must be sent before it is dropped.
pub fn flatten_to_vec<T: Flattenable + ?Sized>(value: &T) -> Result<(Vec<u8>, Vec<RawFd>)> {
    let mut bytes = vec![0u8; value.flattened_size()];
    let mut fds = vec![-1; value.fd_count()];

    let mut cursor = WriteCursor::new(&mut bytes);
    let mut fd_cursor = FdWriter::new(&mut fds);
    value.flatten(&mut cursor, &mut fd_cursor)?;

    let (len, fd_len) = (cursor.position(), fd_cursor.position());
    bytes.truncate(len);
    fds.truncate(fd_len);
    Ok((bytes, fds))
}

/// Unflatten a fresh `T` from a received message
///
/// Descriptors taken by `T` are removed from `fds`.
pub fn unflatten_from<T: Flattenable + Default>(
    bytes: &[u8],
    fds: &mut [Option<OwnedFd>],
) -> Result<T> {
    let mut value = T::default();
    let mut cursor = ReadCursor::new(bytes);
    let mut fd_cursor = FdReader::new(fds);
    value.unflatten(&mut cursor, &mut fd_cursor)?;
    Ok(value)
}
