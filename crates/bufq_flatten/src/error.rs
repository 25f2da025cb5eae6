//! Flatten error types

use thiserror::Error;

/// Errors produced while flattening or unflattening an object
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlattenError {
    /// Destination byte region is smaller than what must be written
    #[error("Insufficient space: needed {needed} bytes, {available} available")]
    InsufficientSpace { needed: usize, available: usize },

    /// Source byte region ended before the object was complete
    #[error("Truncated input: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    /// Descriptor array too small (encode) or exhausted (decode)
    #[error("Not enough file descriptors: needed {needed}, {available} available")]
    NotEnoughFds { needed: usize, available: usize },

    /// An embedded object failed to flatten
    #[error("Failed to flatten embedded {object}: {source}")]
    EmbeddedEncodeFailed {
        object: &'static str,
        #[source]
        source: Box<FlattenError>,
    },

    /// An embedded object failed to unflatten
    #[error("Failed to unflatten embedded {object}: {source}")]
    EmbeddedDecodeFailed {
        object: &'static str,
        #[source]
        source: Box<FlattenError>,
    },

    /// Boolean byte was neither 0 nor 1
    #[error("Invalid boolean value: {value}")]
    InvalidBool { value: u8 },

    /// Object header carried the wrong magic number
    #[error("Invalid magic: expected {expected:#010x}, got {actual:#010x}")]
    BadMagic { expected: u32, actual: u32 },

    /// Decoded value is out of range
    #[error("Invalid value: {0}")]
    InvalidValue(&'static str),

    /// Operation not allowed in the object's current state
    #[error("Invalid operation: {0}")]
    InvalidOperation(&'static str),
}

impl FlattenError {
    /// Wrap an error returned by an embedded object's `flatten`
    pub fn embedded_encode(object: &'static str, source: FlattenError) -> Self {
        FlattenError::EmbeddedEncodeFailed {
            object,
            source: Box::new(source),
        }
    }

    /// Wrap an error returned by an embedded object's `unflatten`
    pub fn embedded_decode(object: &'static str, source: FlattenError) -> Self {
        FlattenError::EmbeddedDecodeFailed {
            object,
            source: Box::new(source),
        }
    }

    /// The innermost error, looking through embedded-object wrappers
    pub fn root_cause(&self) -> &FlattenError {
        match self {
            FlattenError::EmbeddedEncodeFailed { source, .. }
            | FlattenError::EmbeddedDecodeFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// True if the input ran out of bytes, at any nesting depth
    pub fn is_truncated(&self) -> bool {
        matches!(self.root_cause(), FlattenError::Truncated { .. })
    }

    /// True if the output ran out of bytes, at any nesting depth
    pub fn is_insufficient_space(&self) -> bool {
        matches!(self.root_cause(), FlattenError::InsufficientSpace { .. })
    }
}

/// Result type for flatten operations
pub type Result<T> = std::result::Result<T, FlattenError>;
