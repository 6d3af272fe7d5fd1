/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A simple implementation of a bytestream reader
//! and writer.
//!
//! Codecs never know whether they talk to a file or to memory,
//! they only see a [`ByteSource`] when decoding and a [`ByteSink`]
//! when encoding.
//!
//! - A source wraps either any [`Read`](std::io::Read) implementation or a
//!   borrowed byte span.
//! - A sink wraps either any [`Write`](std::io::Write) implementation or a
//!   [`GrowableBuffer`] which becomes an [`EncodedBlob`] once finalized.
//!
//! A source or sink constructed without a usable target is invalid,
//! all operations on it log an error and fail.
pub use blob::{BlobSlot, EncodedBlob};
pub use reader::ByteSource;
pub use writer::{ByteSink, GrowableBuffer, MIN_CAPACITY};

mod blob;
mod reader;
mod writer;

use std::fmt::{Debug, Display, Formatter};

/// Errors raised by byte sources and sinks
pub enum ByteIoError {
    /// Underlying reader or writer failed
    StdIoError(std::io::Error),
    /// Fewer bytes than requested were available
    /// (requested, read)
    NotEnoughBytes(usize, usize),
    /// Growing a memory destination failed, carries the capacity
    /// we tried to reach
    OutOfMemory(usize),
    /// A memory destination was finalized without any byte written
    EmptyOutput,
    /// The stream was constructed without a usable target
    InvalidStream(&'static str),
    Generic(&'static str)
}

impl Debug for ByteIoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ByteIoError::StdIoError(err) => {
                writeln!(f, "Underlying I/O error {}", err)
            }
            ByteIoError::NotEnoughBytes(expected, found) => {
                writeln!(f, "Not enough bytes, expected {expected} but found {found}")
            }
            ByteIoError::OutOfMemory(capacity) => {
                writeln!(f, "Out of memory, cannot grow buffer to {capacity} bytes")
            }
            ByteIoError::EmptyOutput => {
                writeln!(f, "Buffer is empty, nothing was written")
            }
            ByteIoError::InvalidStream(operation) => {
                writeln!(f, "Cannot {operation}, invalid stream state")
            }
            ByteIoError::Generic(err) => {
                writeln!(f, "Generic I/O error: {err}")
            }
        }
    }
}

impl Display for ByteIoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for ByteIoError {}

impl From<std::io::Error> for ByteIoError {
    fn from(value: std::io::Error) -> Self {
        ByteIoError::StdIoError(value)
    }
}

impl From<&'static str> for ByteIoError {
    fn from(value: &'static str) -> Self {
        ByteIoError::Generic(value)
    }
}

impl From<ByteIoError> for std::io::Error {
    fn from(value: ByteIoError) -> Self {
        match value {
            ByteIoError::StdIoError(err) => err,
            ByteIoError::NotEnoughBytes(..) => {
                std::io::Error::new(std::io::ErrorKind::UnexpectedEof, value)
            }
            ByteIoError::OutOfMemory(_) => {
                std::io::Error::new(std::io::ErrorKind::OutOfMemory, value)
            }
            _ => std::io::Error::other(value)
        }
    }
}
