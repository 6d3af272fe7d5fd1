/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fmt::{Debug, Formatter};
use std::ops::Deref;

/// Bytes produced by an encode-to-memory operation
///
/// The allocation is exactly as large as the encoded data.
/// Ownership moves to whoever receives the blob, dropping it
/// releases the memory.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedBlob {
    data: Box<[u8]>
}

impl EncodedBlob {
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data.into_vec()
    }
}

impl From<Vec<u8>> for EncodedBlob {
    fn from(value: Vec<u8>) -> Self {
        EncodedBlob {
            data: value.into_boxed_slice()
        }
    }
}

impl Deref for EncodedBlob {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl AsRef<[u8]> for EncodedBlob {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl Debug for EncodedBlob {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "EncodedBlob({} bytes)", self.data.len())
    }
}

/// A place holding at most one [`EncodedBlob`]
///
/// Setting a new blob releases the previous one first,
/// the slot never holds two blobs or leaks one.
#[derive(Debug, Default)]
pub struct BlobSlot {
    blob: Option<EncodedBlob>
}

impl BlobSlot {
    pub const fn new() -> BlobSlot {
        BlobSlot { blob: None }
    }

    /// Replace the current content with `blob`
    pub fn set(&mut self, blob: EncodedBlob) {
        self.clear();
        self.blob = Some(blob);
    }

    /// Release the current content, if any
    pub fn clear(&mut self) {
        self.blob = None;
    }

    /// Move the content out, leaving the slot empty
    pub fn take(&mut self) -> Option<EncodedBlob> {
        self.blob.take()
    }

    pub fn get(&self) -> Option<&EncodedBlob> {
        self.blob.as_ref()
    }

    pub fn data(&self) -> Option<&[u8]> {
        self.blob.as_ref().map(|x| x.data())
    }

    /// Size of the content, zero when the slot is empty
    pub fn len(&self) -> usize {
        self.blob.as_ref().map_or(0, |x| x.len())
    }

    pub fn is_empty(&self) -> bool {
        self.blob.is_none()
    }
}
