//! bufq GUI - the buffer item record exchanged between queue endpoints
//!
//! A [`BufferItem`] is flattened into one contiguous byte region plus a
//! descriptor array:
//!
//! ```text
//! ┌───────────────┬──────────────────────┬──────────────┬──────────────────┐
//! │ flags (u32)   │ graphic buffer + pad │ fence + pad  │ plain data (52)  │
//! │ bit0 bit1     │ present if bit0      │ if bit1      │ crop ... inverse │
//! └───────────────┴──────────────────────┴──────────────┴──────────────────┘
//! descriptors: [graphic buffer fds..., fence fd]
//! ```

mod buffer_item;

pub use buffer_item::{BufferItem, ContentFlags};
pub use bufq_ui::scaling_mode_name;

/// Number of slots in a buffer pool
pub const NUM_BUFFER_SLOTS: usize = 64;

/// Slot value meaning "not associated with any pool slot"
pub const INVALID_BUFFER_SLOT: i32 = -1;
