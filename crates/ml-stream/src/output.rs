//! Writing side of the binary stream codec.
//!
//! Write failures from the underlying writer are returned unchanged.

use std::io::{self, Write};

/// A value that can be encoded onto a binary stream.
pub trait Writeable {
    /// Append this value's encoding to `out`.
    fn write_to<W: Write>(&self, out: &mut StreamOutput<W>) -> io::Result<()>;

    /// Encode into a freshly allocated buffer.
    fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut out = StreamOutput::new(Vec::new());
        self.write_to(&mut out)?;
        Ok(out.into_inner())
    }
}

/// Cursor-tracking writer for the outbound binary stream.
#[derive(Debug)]
pub struct StreamOutput<W> {
    inner: W,
    position: u64,
}

impl<W: Write> StreamOutput<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, position: 0 }
    }

    /// Number of bytes written so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Encode a value implementing [`Writeable`].
    pub fn write<T: Writeable + ?Sized>(&mut self, value: &T) -> io::Result<()> {
        value.write_to(self)
    }

    fn write_raw(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.inner.write_all(bytes)?;
        self.position += bytes.len() as u64;
        Ok(())
    }

    pub fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.write_raw(&[byte])
    }

    /// Write a one-byte boolean (`0x00` or `0x01`).
    pub fn write_bool(&mut self, value: bool) -> io::Result<()> {
        self.write_byte(u8::from(value))
    }

    /// Write an unsigned variable-length integer, 7 bits per byte.
    pub fn write_vint(&mut self, value: u32) -> io::Result<()> {
        let mut buf = [0u8; 5];
        let mut len = 0;
        let mut rest = value;
        while rest >= 0x80 {
            buf[len] = (rest as u8 & 0x7f) | 0x80;
            rest >>= 7;
            len += 1;
        }
        buf[len] = rest as u8;
        self.write_raw(&buf[..=len])
    }

    /// Write a vInt byte-length prefix followed by the UTF-8 bytes.
    pub fn write_string(&mut self, value: &str) -> io::Result<()> {
        let len = u32::try_from(value.len()).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("string of {} bytes does not fit a u32 length prefix", value.len()),
            )
        })?;
        self.write_vint(len)?;
        self.write_raw(value.as_bytes())
    }

    /// Write a presence flag, then the string only when present.
    pub fn write_optional_string(&mut self, value: Option<&str>) -> io::Result<()> {
        match value {
            Some(value) => {
                self.write_bool(true)?;
                self.write_string(value)
            }
            None => self.write_bool(false),
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(f: impl FnOnce(&mut StreamOutput<Vec<u8>>) -> io::Result<()>) -> Vec<u8> {
        let mut out = StreamOutput::new(Vec::new());
        f(&mut out).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_write_vint() {
        assert_eq!(encoded(|o| o.write_vint(0)), vec![0x00]);
        assert_eq!(encoded(|o| o.write_vint(127)), vec![0x7f]);
        assert_eq!(encoded(|o| o.write_vint(128)), vec![0x80, 0x01]);
        assert_eq!(encoded(|o| o.write_vint(300)), vec![0xac, 0x02]);
        assert_eq!(
            encoded(|o| o.write_vint(u32::MAX)),
            vec![0xff, 0xff, 0xff, 0xff, 0x0f]
        );
    }

    #[test]
    fn test_write_string_uses_byte_length() {
        // "é" is two bytes in UTF-8.
        assert_eq!(encoded(|o| o.write_string("é")), vec![0x02, 0xc3, 0xa9]);
        assert_eq!(encoded(|o| o.write_string("")), vec![0x00]);
    }

    #[test]
    fn test_write_optional_string() {
        assert_eq!(encoded(|o| o.write_optional_string(None)), vec![0x00]);
        assert_eq!(
            encoded(|o| o.write_optional_string(Some("m"))),
            vec![0x01, 0x01, b'm']
        );
        assert_eq!(
            encoded(|o| o.write_optional_string(Some(""))),
            vec![0x01, 0x00]
        );
    }

    #[test]
    fn test_position_tracks_bytes_written() {
        let mut out = StreamOutput::new(Vec::new());
        out.write_string("abc").unwrap();
        assert_eq!(out.position(), 4);
        out.write_bool(true).unwrap();
        assert_eq!(out.position(), 5);
        assert_eq!(out.get_ref().len(), 5);
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer went away"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_passes_through() {
        let mut out = StreamOutput::new(BrokenPipe);
        let err = out.write_string("task").unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(out.position(), 0);
    }
}
