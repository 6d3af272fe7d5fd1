/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::io::Write;

use crate::bytestream::{ByteIoError, EncodedBlob};
use crate::log::{error, trace};

/// Capacity of a memory destination after the first write
pub const MIN_CAPACITY: usize = 8192;

/// A memory destination that grows geometrically
///
/// The first write reserves [`MIN_CAPACITY`] bytes, afterwards the
/// capacity doubles until the pending write fits. If an allocation
/// fails the whole buffer is released and the buffer stays empty.
#[derive(Debug, Default)]
pub struct GrowableBuffer {
    data:     Vec<u8>,
    capacity: usize
}

impl GrowableBuffer {
    pub const fn new() -> GrowableBuffer {
        GrowableBuffer {
            data:     Vec::new(),
            capacity: 0
        }
    }

    /// Number of bytes written so far
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Reserved capacity, always a power of two multiple of
    /// [`MIN_CAPACITY`] until the buffer is shrunk
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Append `bytes`, growing as needed
    pub fn extend(&mut self, bytes: &[u8]) -> Result<(), ByteIoError> {
        let required = match self.data.len().checked_add(bytes.len()) {
            Some(required) => required,
            None => {
                self.release();
                return Err(ByteIoError::OutOfMemory(usize::MAX));
            }
        };

        if required > self.capacity {
            let mut new_capacity = self.capacity.max(MIN_CAPACITY);

            while new_capacity < required {
                match new_capacity.checked_mul(2) {
                    Some(doubled) => new_capacity = doubled,
                    None => {
                        self.release();
                        return Err(ByteIoError::OutOfMemory(usize::MAX));
                    }
                }
            }
            if self
                .data
                .try_reserve_exact(new_capacity - self.data.len())
                .is_err()
            {
                error!("cannot grow memory buffer to {new_capacity} bytes");
                self.release();
                return Err(ByteIoError::OutOfMemory(new_capacity));
            }
            trace!("memory buffer grown to {new_capacity} bytes");
            self.capacity = new_capacity;
        }
        self.data.extend_from_slice(bytes);

        Ok(())
    }

    /// Drop the content and the allocation
    pub fn release(&mut self) {
        self.data = Vec::new();
        self.capacity = 0;
    }

    /// Trim the allocation to the bytes actually written
    pub fn shrink(&mut self) {
        self.data.shrink_to_fit();
        self.capacity = self.data.len();
    }

    /// Convert the content into a blob of exactly [`len`](Self::len) bytes
    pub fn into_blob(self) -> EncodedBlob {
        EncodedBlob::from(self.data)
    }
}

enum SinkInner<'a> {
    Writer(&'a mut dyn Write),
    Memory(GrowableBuffer),
    Invalid
}

/// Where an encoder pushes its bytes to
///
/// A sink is finalized after a successful encode and discarded
/// after a failed one.
///
/// # Example
/// ```
/// use folio_core::bytestream::ByteSink;
///
/// let mut sink = ByteSink::memory();
/// sink.write_all_bytes(b"GIF89a").unwrap();
/// sink.finalize().unwrap();
///
/// let blob = sink.into_blob().unwrap();
/// assert_eq!(blob.data(), b"GIF89a");
/// ```
pub struct ByteSink<'a> {
    inner:   SinkInner<'a>,
    written: u64
}

impl<'a> ByteSink<'a> {
    /// A sink collecting bytes in memory
    pub const fn memory() -> ByteSink<'static> {
        ByteSink {
            inner:   SinkInner::Memory(GrowableBuffer::new()),
            written: 0
        }
    }

    /// A sink forwarding to an already opened writer, e.g. a file
    pub fn from_writer(writer: &'a mut dyn Write) -> ByteSink<'a> {
        ByteSink {
            inner:   SinkInner::Writer(writer),
            written: 0
        }
    }

    /// A sink that fails every write
    pub const fn invalid() -> ByteSink<'static> {
        ByteSink {
            inner:   SinkInner::Invalid,
            written: 0
        }
    }

    pub const fn is_valid(&self) -> bool {
        !matches!(self.inner, SinkInner::Invalid)
    }

    pub const fn is_memory(&self) -> bool {
        matches!(self.inner, SinkInner::Memory(_))
    }

    /// Total number of bytes accepted by this sink
    pub const fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Write all of `buf` or fail
    pub fn write_all_bytes(&mut self, buf: &[u8]) -> Result<(), ByteIoError> {
        match &mut self.inner {
            SinkInner::Writer(writer) => writer.write_all(buf)?,
            SinkInner::Memory(buffer) => buffer.extend(buf)?,
            SinkInner::Invalid => {
                error!("write error, invalid writer state");
                return Err(ByteIoError::InvalidStream("write"));
            }
        }
        self.written += buf.len() as u64;

        Ok(())
    }

    /// Complete the output
    ///
    /// Memory is shrunk to the written size, a memory sink that
    /// never received a byte is released and reported as
    /// [`ByteIoError::EmptyOutput`]. Writers are flushed.
    pub fn finalize(&mut self) -> Result<(), ByteIoError> {
        match &mut self.inner {
            SinkInner::Writer(writer) => writer.flush()?,
            SinkInner::Memory(buffer) => {
                if buffer.is_empty() {
                    error!("encoder produced no output");
                    buffer.release();
                    return Err(ByteIoError::EmptyOutput);
                }
                buffer.shrink();
            }
            SinkInner::Invalid => {
                error!("finalize error, invalid writer state");
                return Err(ByteIoError::InvalidStream("finalize"));
            }
        }
        Ok(())
    }

    /// Throw away whatever was collected in memory
    ///
    /// Bytes already handed to a writer cannot be taken back,
    /// for writers this does nothing.
    pub fn discard(&mut self) {
        if let SinkInner::Memory(buffer) = &mut self.inner {
            buffer.release();
        }
    }

    /// Take the collected bytes of a memory sink
    ///
    /// Returns `None` for writer sinks and for memory sinks that
    /// hold no bytes
    pub fn into_blob(self) -> Option<EncodedBlob> {
        match self.inner {
            SinkInner::Memory(buffer) if !buffer.is_empty() => Some(buffer.into_blob()),
            _ => None
        }
    }

    /// Bytes collected so far by a memory sink
    pub fn memory_contents(&self) -> Option<&[u8]> {
        match &self.inner {
            SinkInner::Memory(buffer) => Some(buffer.as_slice()),
            _ => None
        }
    }
}

impl Write for ByteSink<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.write_all_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.inner {
            SinkInner::Writer(writer) => writer.flush(),
            SinkInner::Memory(_) => Ok(()),
            SinkInner::Invalid => Err(ByteIoError::InvalidStream("flush").into())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::bytestream::{ByteIoError, ByteSink, GrowableBuffer, MIN_CAPACITY};

    #[test]
    fn buffer_growth_doubles() {
        let mut buffer = GrowableBuffer::new();
        assert_eq!(buffer.capacity(), 0);

        buffer.extend(&[1]).unwrap();
        assert_eq!(buffer.capacity(), MIN_CAPACITY);

        buffer.extend(&vec![2; MIN_CAPACITY]).unwrap();
        assert_eq!(buffer.capacity(), MIN_CAPACITY * 2);
        assert_eq!(buffer.len(), MIN_CAPACITY + 1);

        // one big write jumps several doublings at once
        buffer.extend(&vec![3; MIN_CAPACITY * 5]).unwrap();
        assert_eq!(buffer.capacity(), MIN_CAPACITY * 8);
        assert_eq!(buffer.len(), MIN_CAPACITY * 6 + 1);
    }

    #[test]
    fn memory_sink_exact_size() {
        use nanorand::Rng;

        // randomize inputs
        let mut payload = vec![0_u8; 20_000];
        nanorand::WyRand::new().fill(&mut payload);
        let mut sink = ByteSink::memory();

        for chunk in payload.chunks(333) {
            sink.write_all_bytes(chunk).unwrap();
        }
        assert_eq!(sink.bytes_written(), 20_000);
        sink.finalize().unwrap();

        let blob = sink.into_blob().unwrap();
        assert_eq!(blob.len(), 20_000);
        assert_eq!(blob.data(), &payload[..]);
    }

    #[test]
    fn empty_memory_sink_fails() {
        let mut sink = ByteSink::memory();
        assert!(matches!(sink.finalize(), Err(ByteIoError::EmptyOutput)));
        assert!(sink.into_blob().is_none());
    }

    #[test]
    fn discard_releases_memory() {
        let mut sink = ByteSink::memory();
        sink.write_all_bytes(&[1; 100]).unwrap();
        sink.discard();
        assert_eq!(sink.memory_contents(), Some(&[][..]));
        assert!(sink.into_blob().is_none());
    }

    #[test]
    fn writer_sink_pass_through() {
        let mut out = Vec::new();
        {
            let mut sink = ByteSink::from_writer(&mut out);
            sink.write_all_bytes(b"abc").unwrap();
            write!(sink, "{}", 42).unwrap();
            sink.finalize().unwrap();
            assert_eq!(sink.bytes_written(), 5);
            assert!(sink.memory_contents().is_none());
        }
        assert_eq!(out, b"abc42");
    }

    #[test]
    fn invalid_sink_fails() {
        let mut sink = ByteSink::invalid();
        assert!(!sink.is_valid());
        assert!(sink.write_all_bytes(&[0]).is_err());
        assert!(sink.finalize().is_err());
        assert!(sink.write(&[0]).is_err());
    }
}
