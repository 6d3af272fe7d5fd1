/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible during image decoding, encoding and file handling
use std::fmt::{Debug, Display, Formatter};

use folio_core::bytestream::ByteIoError;
use folio_gif::{GifDecoderErrors, GifEncoderErrors};

use crate::codecs::ImageFormat;

/// All possible image errors that can occur.
///
/// This is the grandfather of image errors and contains
/// all decoding, encoding and I/O errors possible
pub enum ImageErrors {
    /// The operation needs an image without pixels but pixels exist
    ImageNotEmpty,
    /// The operation needs pixels but the image holds none
    NoImageBuffer,
    /// Width or height is zero
    ZeroDimensions(usize, usize),
    /// `width * height * components` doesn't fit in memory
    TooLargeDimensions(usize, usize),
    /// Allocating the given number of bytes failed
    OutOfMemory(usize),
    /// Input buffer is empty
    EmptyInput,
    /// No codec handles this format
    NoCodecForFormat(ImageFormat),
    /// A codec exists but doesn't do anything yet
    CodecNotImplemented(&'static str),
    /// Format could not be guessed from a file name
    UnknownFileType(String),
    /// Decoding failed, carries the codec message
    ImageDecodeErrors(String),
    /// Encoding failed, carries the codec message
    EncodeErrors(String),
    GifDecodeErrors(GifDecoderErrors),
    GifEncodeErrors(GifEncoderErrors),
    IoErrors(ByteIoError),
    FileIoErrors(std::io::Error),
    GenericString(String),
    GenericStr(&'static str)
}

impl Debug for ImageErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ImageNotEmpty => {
                writeln!(f, "Image already holds pixel data")
            }
            Self::NoImageBuffer => writeln!(f, "No image buffer present"),
            Self::ZeroDimensions(width, height) => {
                writeln!(f, "Invalid dimensions {width}x{height}, both must be non zero")
            }
            Self::TooLargeDimensions(width, height) => {
                writeln!(f, "Dimensions {width}x{height} are too large")
            }
            Self::OutOfMemory(size) => {
                writeln!(f, "Out of memory, cannot allocate {size} bytes")
            }
            Self::EmptyInput => writeln!(f, "Input buffer is empty"),
            Self::NoCodecForFormat(format) => {
                writeln!(f, "No codec present for format {format:?}")
            }
            Self::CodecNotImplemented(name) => {
                writeln!(f, "The {name} codec is not implemented")
            }
            Self::UnknownFileType(name) => {
                writeln!(f, "Cannot determine image format of {name}")
            }
            Self::ImageDecodeErrors(err) => {
                writeln!(f, "Decoding failed: {err}")
            }
            Self::EncodeErrors(err) => {
                writeln!(f, "Encoding failed: {err}")
            }
            Self::GifDecodeErrors(err) => {
                writeln!(f, "Gif decoding failed: {err:?}")
            }
            Self::GifEncodeErrors(err) => {
                writeln!(f, "Gif encoding failed: {err:?}")
            }
            Self::IoErrors(err) => writeln!(f, "{err:?}"),
            Self::FileIoErrors(err) => writeln!(f, "{err}"),
            Self::GenericString(err) => writeln!(f, "{err}"),
            Self::GenericStr(err) => writeln!(f, "{err}")
        }
    }
}

impl Display for ImageErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for ImageErrors {}

impl From<GifDecoderErrors> for ImageErrors {
    fn from(from: GifDecoderErrors) -> Self {
        ImageErrors::GifDecodeErrors(from)
    }
}

impl From<GifEncoderErrors> for ImageErrors {
    fn from(from: GifEncoderErrors) -> Self {
        ImageErrors::GifEncodeErrors(from)
    }
}

impl From<ByteIoError> for ImageErrors {
    fn from(from: ByteIoError) -> Self {
        ImageErrors::IoErrors(from)
    }
}

impl From<std::io::Error> for ImageErrors {
    fn from(from: std::io::Error) -> Self {
        ImageErrors::FileIoErrors(from)
    }
}

impl From<&'static str> for ImageErrors {
    fn from(from: &'static str) -> Self {
        ImageErrors::GenericStr(from)
    }
}

impl From<String> for ImageErrors {
    fn from(from: String) -> Self {
        ImageErrors::GenericString(from)
    }
}
