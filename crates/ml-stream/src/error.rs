//! Decode errors for the binary stream codec.

use std::io;
use std::string::FromUtf8Error;

/// Failure to reconstruct a value from an inbound binary stream.
///
/// A decode error means the stream is corrupt or was produced by a peer
/// speaking a different protocol. No partially decoded value is ever
/// returned alongside it.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("unexpected end of stream at offset {offset}")]
    UnexpectedEof { offset: u64 },

    #[error("length prefix declares {declared} bytes but only {available} remain")]
    LengthMismatch { declared: usize, available: usize },

    #[error("declared length {declared} exceeds limit of {limit} bytes")]
    LengthLimitExceeded { declared: usize, limit: usize },

    #[error("malformed variable-length integer at offset {offset}")]
    MalformedVInt { offset: u64 },

    #[error("invalid boolean byte 0x{value:02x} at offset {offset}")]
    InvalidBoolean { value: u8, offset: u64 },

    #[error("invalid UTF-8 string at offset {offset}: {source}")]
    InvalidUtf8 {
        offset: u64,
        #[source]
        source: FromUtf8Error,
    },

    #[error("{remaining} trailing bytes after decoded value")]
    TrailingBytes { remaining: usize },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to decode field '{field}': {source}")]
    Field {
        field: &'static str,
        #[source]
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    /// Attach the name of the field being decoded when this error occurred.
    pub fn in_field(self, field: &'static str) -> Self {
        DecodeError::Field {
            field,
            source: Box::new(self),
        }
    }

    /// Name of the innermost field this error was attached to, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            DecodeError::Field { field, source } => source.field().or(Some(*field)),
            _ => None,
        }
    }

    /// The underlying framing error with any field context stripped.
    pub fn root_cause(&self) -> &DecodeError {
        match self {
            DecodeError::Field { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Returns true if the stream ended before the value was complete.
    pub fn is_truncation(&self) -> bool {
        matches!(
            self.root_cause(),
            DecodeError::UnexpectedEof { .. } | DecodeError::LengthMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_context_is_reported() {
        let err = DecodeError::UnexpectedEof { offset: 4 }.in_field("status");

        assert_eq!(err.field(), Some("status"));
        assert!(err.is_truncation());
        assert!(err.to_string().contains("'status'"));
        assert!(err.to_string().contains("offset 4"));
    }

    #[test]
    fn test_root_cause_unwraps_nested_fields() {
        let err = DecodeError::InvalidBoolean { value: 7, offset: 9 }
            .in_field("inner")
            .in_field("outer");

        assert_eq!(err.field(), Some("inner"));
        assert!(matches!(
            err.root_cause(),
            DecodeError::InvalidBoolean { value: 7, offset: 9 }
        ));
        assert!(!err.is_truncation());
    }

    #[test]
    fn test_length_mismatch_is_truncation() {
        let err = DecodeError::LengthMismatch {
            declared: 10,
            available: 3,
        };
        assert!(err.is_truncation());
        assert_eq!(err.field(), None);
    }
}
