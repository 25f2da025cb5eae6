//! bufq flatten - byte and descriptor cursors for cross-process records
//!
//! Objects implementing [`Flattenable`] are written into a caller-supplied
//! byte region plus a caller-supplied descriptor array, and rebuilt from the
//! pair on the receiving side.
//!
//! # Wire Format
//!
//! - Native byte order on both ends, no version tag
//! - Plain values are packed without padding
//! - Alignment is relative to the start of the region and padding is zeroed
//! - File descriptors are passed out-of-band, in the order they are written
//!
//! # Example
//!
//! ```ignore
//! use bufq_flatten::{flatten_to_vec, unflatten_from};
//!
//! let (bytes, raw_fds) = flatten_to_vec(&item)?;
//! // send bytes + raw_fds over a unix socket...
//!
//! let item: BufferItem = unflatten_from(&bytes, &mut received_fds)?;
//! ```

mod decoding;
mod encoding;
mod error;
mod fds;
mod flattenable;

pub use decoding::ReadCursor;
pub use encoding::WriteCursor;
pub use error::{FlattenError, Result};
pub use fds::{FdReader, FdWriter};
pub use flattenable::{flatten_to_vec, unflatten_from, Flattenable};

/// Round `value` up to a multiple of `alignment` (a power of two)
pub const fn align_up(value: usize, alignment: usize) -> usize {
    (value + alignment - 1) & !(alignment - 1)
}

/// Prelude for common imports
pub mod prelude {
    pub use super::{
        FdReader, FdWriter, FlattenError, Flattenable, ReadCursor, Result, WriteCursor,
    };
}
