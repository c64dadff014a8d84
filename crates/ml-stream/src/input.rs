//! Reading side of the binary stream codec.

use std::io::Read;

use crate::error::DecodeError;

/// Default upper bound on a declared string length (16 MiB).
pub const DEFAULT_MAX_STRING_BYTES: usize = 16 * 1024 * 1024;

/// Bounds applied while decoding, checked before any allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamLimits {
    /// Largest string length prefix accepted, in bytes.
    pub max_string_bytes: usize,
}

impl Default for StreamLimits {
    fn default() -> Self {
        Self {
            max_string_bytes: DEFAULT_MAX_STRING_BYTES,
        }
    }
}

/// A value that can be reconstructed from a binary stream.
pub trait Readable: Sized {
    /// Decode one value, consuming exactly the bytes it was encoded with.
    fn read_from<R: Read>(input: &mut StreamInput<R>) -> Result<Self, DecodeError>;

    /// Decode a value that must occupy the whole of `bytes`.
    fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut input = StreamInput::new(bytes);
        let value = Self::read_from(&mut input)?;
        let remaining = input.into_inner().len();
        if remaining > 0 {
            return Err(DecodeError::TrailingBytes { remaining });
        }
        Ok(value)
    }
}

/// Cursor-tracking reader over an inbound binary stream.
///
/// Every read either consumes exactly the bytes of the item it returns or
/// fails; `position()` always reflects the bytes taken from the underlying
/// reader.
#[derive(Debug)]
pub struct StreamInput<R> {
    inner: R,
    position: u64,
    limits: StreamLimits,
}

impl<R: Read> StreamInput<R> {
    /// Wrap a reader using the default limits.
    pub fn new(inner: R) -> Self {
        Self::with_limits(inner, StreamLimits::default())
    }

    /// Wrap a reader with explicit decode limits.
    pub fn with_limits(inner: R, limits: StreamLimits) -> Self {
        Self {
            inner,
            position: 0,
            limits,
        }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn limits(&self) -> StreamLimits {
        self.limits
    }

    /// Unwrap the underlying reader, positioned just after the last read.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Decode a value implementing [`Readable`].
    pub fn read<T: Readable>(&mut self) -> Result<T, DecodeError> {
        T::read_from(self)
    }

    /// Read a single byte.
    pub fn read_byte(&mut self) -> Result<u8, DecodeError> {
        let offset = self.position;
        let mut buf = [0u8; 1];
        self.inner.read_exact(&mut buf).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                DecodeError::UnexpectedEof { offset }
            } else {
                DecodeError::Io(e)
            }
        })?;
        self.position += 1;
        Ok(buf[0])
    }

    /// Read a one-byte boolean. Only `0x00` and `0x01` are valid.
    pub fn read_bool(&mut self) -> Result<bool, DecodeError> {
        let offset = self.position;
        match self.read_byte()? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(DecodeError::InvalidBoolean { value, offset }),
        }
    }

    /// Read an unsigned variable-length integer (7 bits per byte, low
    /// groups first, at most 5 bytes).
    pub fn read_vint(&mut self) -> Result<u32, DecodeError> {
        let offset = self.position;
        let mut value = 0u32;
        let mut shift = 0u32;
        loop {
            let byte = self.read_byte()?;
            // The fifth byte may only carry the top 4 bits of a u32.
            if shift == 28 && byte & 0xf0 != 0 {
                return Err(DecodeError::MalformedVInt { offset });
            }
            value |= u32::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
        }
    }

    /// Read a vInt length prefix followed by that many UTF-8 bytes.
    pub fn read_string(&mut self) -> Result<String, DecodeError> {
        let declared = self.read_vint()? as usize;
        let limit = self.limits.max_string_bytes;
        if declared > limit {
            return Err(DecodeError::LengthLimitExceeded { declared, limit });
        }

        let offset = self.position;
        let mut bytes = Vec::with_capacity(declared);
        let available = self
            .inner
            .by_ref()
            .take(declared as u64)
            .read_to_end(&mut bytes)?;
        self.position += available as u64;
        if available < declared {
            return Err(DecodeError::LengthMismatch {
                declared,
                available,
            });
        }

        String::from_utf8(bytes).map_err(|source| DecodeError::InvalidUtf8 { offset, source })
    }

    /// Read a presence flag, then a string only if the flag is set.
    pub fn read_optional_string(&mut self) -> Result<Option<String>, DecodeError> {
        if self.read_bool()? {
            Ok(Some(self.read_string()?))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_vint_single_and_multi_byte() {
        let bytes = [0x05, 0xac, 0x02, 0xff, 0xff, 0xff, 0xff, 0x0f];
        let mut input = StreamInput::new(&bytes[..]);

        assert_eq!(input.read_vint().unwrap(), 5);
        assert_eq!(input.read_vint().unwrap(), 300);
        assert_eq!(input.read_vint().unwrap(), u32::MAX);
        assert_eq!(input.position(), 8);
    }

    #[test]
    fn test_read_vint_rejects_overlong_encoding() {
        let bytes = [0x80, 0x80, 0x80, 0x80, 0x80, 0x01];
        let mut input = StreamInput::new(&bytes[..]);

        let err = input.read_vint().unwrap_err();
        assert!(matches!(err, DecodeError::MalformedVInt { offset: 0 }));
    }

    #[test]
    fn test_read_vint_rejects_bits_beyond_u32() {
        let bytes = [0xff, 0xff, 0xff, 0xff, 0x1f];
        let mut input = StreamInput::new(&bytes[..]);

        assert!(matches!(
            input.read_vint().unwrap_err(),
            DecodeError::MalformedVInt { .. }
        ));
    }

    #[test]
    fn test_read_vint_truncated() {
        let bytes = [0x80, 0x80];
        let mut input = StreamInput::new(&bytes[..]);

        let err = input.read_vint().unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedEof { offset: 2 }));
    }

    #[test]
    fn test_read_bool() {
        let bytes = [0x00, 0x01, 0x02];
        let mut input = StreamInput::new(&bytes[..]);

        assert!(!input.read_bool().unwrap());
        assert!(input.read_bool().unwrap());
        assert!(matches!(
            input.read_bool().unwrap_err(),
            DecodeError::InvalidBoolean { value: 2, offset: 2 }
        ));
    }

    #[test]
    fn test_read_string() {
        let bytes = [0x03, b'a', b'b', b'c', 0x00];
        let mut input = StreamInput::new(&bytes[..]);

        assert_eq!(input.read_string().unwrap(), "abc");
        assert_eq!(input.read_string().unwrap(), "");
        assert_eq!(input.position(), 5);
    }

    #[test]
    fn test_read_string_length_exceeds_remaining() {
        let bytes = [0x0a, b'a', b'b'];
        let mut input = StreamInput::new(&bytes[..]);

        let err = input.read_string().unwrap_err();
        assert!(matches!(
            err,
            DecodeError::LengthMismatch {
                declared: 10,
                available: 2
            }
        ));
    }

    #[test]
    fn test_read_string_respects_limit() {
        let bytes = [0x05, b'h', b'e', b'l', b'l', b'o'];
        let limits = StreamLimits { max_string_bytes: 4 };
        let mut input = StreamInput::with_limits(&bytes[..], limits);

        let err = input.read_string().unwrap_err();
        assert!(matches!(
            err,
            DecodeError::LengthLimitExceeded {
                declared: 5,
                limit: 4
            }
        ));
        // Nothing past the prefix was consumed.
        assert_eq!(input.position(), 1);
    }

    #[test]
    fn test_read_string_invalid_utf8() {
        let bytes = [0x02, 0xc3, 0x28];
        let mut input = StreamInput::new(&bytes[..]);

        assert!(matches!(
            input.read_string().unwrap_err(),
            DecodeError::InvalidUtf8 { offset: 1, .. }
        ));
    }

    #[test]
    fn test_read_optional_string_absent_reads_only_flag() {
        let bytes = [0x00, 0x03, b'x', b'y', b'z'];
        let mut input = StreamInput::new(&bytes[..]);

        assert_eq!(input.read_optional_string().unwrap(), None);
        assert_eq!(input.position(), 1);
        assert_eq!(input.into_inner(), &[0x03, b'x', b'y', b'z'][..]);
    }

    #[test]
    fn test_read_optional_string_present_empty() {
        let bytes = [0x01, 0x00];
        let mut input = StreamInput::new(&bytes[..]);

        assert_eq!(input.read_optional_string().unwrap(), Some(String::new()));
    }
}
