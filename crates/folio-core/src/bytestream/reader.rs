/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::io::{ErrorKind, Read};

use crate::bytestream::ByteIoError;
use crate::log::error;

enum SourceInner<'a> {
    Reader(&'a mut dyn Read),
    Memory { data: &'a [u8], position: usize },
    Invalid
}

/// Where a decoder pulls its bytes from
///
/// # Example
/// ```
/// use folio_core::bytestream::ByteSource;
///
/// let mut source = ByteSource::from_slice(&[1, 2, 3]);
/// let mut buf = [0; 8];
/// // short reads are not errors
/// assert_eq!(source.read_bytes(&mut buf).unwrap(), 3);
/// assert_eq!(source.read_bytes(&mut buf).unwrap(), 0);
/// ```
pub struct ByteSource<'a> {
    inner:    SourceInner<'a>,
    consumed: u64
}

impl<'a> ByteSource<'a> {
    /// Read from a span of memory
    ///
    /// An empty span gives an invalid source
    pub fn from_slice(data: &'a [u8]) -> ByteSource<'a> {
        let inner = if data.is_empty() {
            error!("cannot read from an empty memory span");
            SourceInner::Invalid
        } else {
            SourceInner::Memory { data, position: 0 }
        };
        ByteSource { inner, consumed: 0 }
    }

    /// Read from an already opened reader, e.g. a file
    pub fn from_reader(reader: &'a mut dyn Read) -> ByteSource<'a> {
        ByteSource {
            inner:    SourceInner::Reader(reader),
            consumed: 0
        }
    }

    /// A source that fails every read
    pub const fn invalid() -> ByteSource<'static> {
        ByteSource {
            inner:    SourceInner::Invalid,
            consumed: 0
        }
    }

    pub const fn is_valid(&self) -> bool {
        !matches!(self.inner, SourceInner::Invalid)
    }

    /// Return true if bytes come from memory rather than a reader
    pub const fn is_memory(&self) -> bool {
        matches!(self.inner, SourceInner::Memory { .. })
    }

    /// Number of bytes handed out so far
    pub const fn position(&self) -> u64 {
        self.consumed
    }

    /// Read up to `buf.len()` bytes, returning how many were read
    ///
    /// A reader is read until `buf` is full or it reports end of file,
    /// a memory span copies whatever is left. Reading less than asked
    /// is not an error, callers needing an exact amount should use
    /// [`read_exact_bytes`](Self::read_exact_bytes)
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize, ByteIoError> {
        let read = match &mut self.inner {
            SourceInner::Reader(reader) => {
                let mut filled = 0;
                while filled < buf.len() {
                    match reader.read(&mut buf[filled..]) {
                        Ok(0) => break,
                        Ok(n) => filled += n,
                        Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                        Err(e) => return Err(ByteIoError::StdIoError(e))
                    }
                }
                filled
            }
            SourceInner::Memory { data, position } => {
                let remaining = &data[*position..];
                let size = remaining.len().min(buf.len());
                buf[..size].copy_from_slice(&remaining[..size]);
                *position += size;
                size
            }
            SourceInner::Invalid => {
                error!("read error, invalid reader state");
                return Err(ByteIoError::InvalidStream("read"));
            }
        };
        self.consumed += read as u64;

        Ok(read)
    }

    /// Read exact bytes required to fill `buf` or return an error if that isn't possible
    ///
    /// A memory source does not advance when there are not enough bytes left
    pub fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), ByteIoError> {
        if let SourceInner::Memory { data, position } = &self.inner {
            let remaining = data.len() - *position;
            if remaining < buf.len() {
                return Err(ByteIoError::NotEnoughBytes(buf.len(), remaining));
            }
        }
        let read = self.read_bytes(buf)?;

        if read != buf.len() {
            return Err(ByteIoError::NotEnoughBytes(buf.len(), read));
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8, ByteIoError> {
        let mut byte = [0];
        self.read_exact_bytes(&mut byte)?;
        Ok(byte[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16, ByteIoError> {
        let mut bytes = [0; 2];
        self.read_exact_bytes(&mut bytes)?;
        Ok(u16::from_le_bytes(bytes))
    }

    /// Discard exactly `count` bytes
    pub fn skip(&mut self, count: usize) -> Result<(), ByteIoError> {
        match &mut self.inner {
            SourceInner::Memory { data, position } => {
                let remaining = data.len() - *position;
                if remaining < count {
                    return Err(ByteIoError::NotEnoughBytes(count, remaining));
                }
                *position += count;
                self.consumed += count as u64;
                Ok(())
            }
            _ => {
                let mut scratch = [0_u8; 256];
                let mut left = count;

                while left > 0 {
                    let chunk = left.min(scratch.len());
                    self.read_exact_bytes(&mut scratch[..chunk])?;
                    left -= chunk;
                }
                Ok(())
            }
        }
    }

    /// Read all bytes remaining in this source to `sink` until we hit eof
    ///
    /// # Returns
    /// - `Ok(usize)` The actual number of bytes added to the sink
    pub fn read_to_end(&mut self, sink: &mut Vec<u8>) -> Result<usize, ByteIoError> {
        let read = match &mut self.inner {
            SourceInner::Reader(reader) => reader.read_to_end(sink)?,
            SourceInner::Memory { data, position } => {
                let remaining = &data[*position..];
                sink.try_reserve_exact(remaining.len())
                    .map_err(|_| ByteIoError::OutOfMemory(remaining.len()))?;
                sink.extend_from_slice(remaining);
                *position = data.len();
                remaining.len()
            }
            SourceInner::Invalid => {
                error!("read error, invalid reader state");
                return Err(ByteIoError::InvalidStream("read"));
            }
        };
        self.consumed += read as u64;

        Ok(read)
    }
}

impl Read for ByteSource<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.read_bytes(buf).map_err(|e| e.into())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use crate::bytestream::{ByteIoError, ByteSource};

    #[test]
    fn memory_short_read() {
        let data = [10_u8, 20, 30, 40, 50];
        let mut source = ByteSource::from_slice(&data);
        let mut buf = [0; 3];

        assert_eq!(source.read_bytes(&mut buf).unwrap(), 3);
        assert_eq!(buf, [10, 20, 30]);
        assert_eq!(source.read_bytes(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], &[40, 50]);
        assert_eq!(source.read_bytes(&mut buf).unwrap(), 0);
        assert_eq!(source.position(), 5);
    }

    #[test]
    fn exact_read_does_not_advance_on_failure() {
        let data = [1_u8, 2, 3];
        let mut source = ByteSource::from_slice(&data);
        let mut buf = [0; 4];

        assert!(matches!(
            source.read_exact_bytes(&mut buf),
            Err(ByteIoError::NotEnoughBytes(4, 3))
        ));
        assert_eq!(source.read_u8().unwrap(), 1);
        assert_eq!(source.read_u16_le().unwrap(), u16::from_le_bytes([2, 3]));
    }

    #[test]
    fn reader_pass_through() {
        let mut cursor = Cursor::new(vec![7_u8; 1000]);
        let mut source = ByteSource::from_reader(&mut cursor);
        let mut buf = [0; 600];

        assert_eq!(source.read_bytes(&mut buf).unwrap(), 600);
        assert_eq!(source.read_bytes(&mut buf).unwrap(), 400);
        assert!(source.read_exact_bytes(&mut buf).is_err());
    }

    #[test]
    fn skip_and_remaining() {
        let data: Vec<u8> = (0..=255).collect();
        let mut memory = ByteSource::from_slice(&data);
        memory.skip(250).unwrap();
        assert!(memory.skip(10).is_err());

        let mut rest = Vec::new();
        assert_eq!(memory.read_to_end(&mut rest).unwrap(), 6);
        assert_eq!(rest, [250, 251, 252, 253, 254, 255]);

        let mut cursor = Cursor::new(data.clone());
        let mut reader = ByteSource::from_reader(&mut cursor);
        reader.skip(255).unwrap();
        assert_eq!(reader.read_u8().unwrap(), 255);
    }

    #[test]
    fn nested_sources() {
        use std::io::Read;

        let data = [1_u8, 2, 3, 4];
        let mut inner = ByteSource::from_slice(&data);
        inner.skip(1).unwrap();

        let mut outer = ByteSource::from_reader(&mut inner);
        assert_eq!(outer.read_u16_le().unwrap(), u16::from_le_bytes([2, 3]));

        let mut rest = Vec::new();
        outer.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, [4]);
        assert_eq!(outer.position(), 3);
        assert!(ByteSource::invalid().read(&mut [0; 1]).is_err());
    }

    #[test]
    fn empty_span_is_invalid() {
        let mut source = ByteSource::from_slice(&[]);
        assert!(!source.is_valid());
        assert!(source.read_bytes(&mut [0; 4]).is_err());
        assert!(source.read_to_end(&mut Vec::new()).is_err());
    }
}
