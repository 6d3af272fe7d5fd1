/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::fmt::{Debug, Display, Formatter};

use folio_core::bytestream::ByteIoError;

/// Errors that can occur when decoding a GIF file
pub enum GifDecoderErrors {
    /// File is not a gif
    NotAGif,
    /// A generic error
    Static(&'static str),
    /// To large dimensions for width or height
    TooLargeDimensions(&'static str, usize, usize),
    /// Zero width or height
    ZeroDimensions(usize, usize),
    /// Sub-image `(left, top, width, height)` does not fit the screen
    FrameOutOfBounds(usize, usize, usize, usize),
    /// Neither a global nor a local color table is present
    NoColorTable,
    /// The file ended before any image was found
    NoImage,
    /// The compressed raster is corrupt
    LzwError(weezl::LzwError),
    /// Underlying input output errors
    IoErrors(ByteIoError),
    /// A calculation that wasn't meant to overflow overflowed
    OverflowError(&'static str),
    /// Too small size
    TooSmallSize(usize, usize)
}

impl Debug for GifDecoderErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GifDecoderErrors::NotAGif => {
                writeln!(f, "Not a gif, magic bytes didn't match")
            }
            GifDecoderErrors::Static(v) => {
                writeln!(f, "{}", v)
            }
            GifDecoderErrors::TooLargeDimensions(a, b, c) => {
                writeln!(
                    f,
                    "Too large dimensions for {a} expected less than {b} but found {c}"
                )
            }
            GifDecoderErrors::ZeroDimensions(w, h) => {
                writeln!(f, "Invalid dimensions {w}x{h}, both must be non zero")
            }
            GifDecoderErrors::FrameOutOfBounds(left, top, width, height) => {
                writeln!(
                    f,
                    "Image of {width}x{height} at ({left},{top}) exceeds the logical screen"
                )
            }
            GifDecoderErrors::NoColorTable => {
                writeln!(f, "No color table present for the image")
            }
            GifDecoderErrors::NoImage => {
                writeln!(f, "File contains no image")
            }
            GifDecoderErrors::LzwError(err) => {
                writeln!(f, "Corrupt image data: {err}")
            }
            Self::OverflowError(err) => {
                writeln!(
                    f,
                    "A calculation that wasn't meant to overflow overflowed :{err}"
                )
            }
            Self::TooSmallSize(at_least, present) => {
                writeln!(f, "Expected a size of {at_least} but found {present}")
            }
            Self::IoErrors(err) => {
                writeln!(f, "{:?}", err)
            }
        }
    }
}

impl Display for GifDecoderErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for GifDecoderErrors {}

impl From<&'static str> for GifDecoderErrors {
    fn from(value: &'static str) -> Self {
        Self::Static(value)
    }
}

impl From<ByteIoError> for GifDecoderErrors {
    fn from(value: ByteIoError) -> Self {
        GifDecoderErrors::IoErrors(value)
    }
}

impl From<weezl::LzwError> for GifDecoderErrors {
    fn from(value: weezl::LzwError) -> Self {
        GifDecoderErrors::LzwError(value)
    }
}

/// Errors that can occur when encoding a GIF file
pub enum GifEncoderErrors {
    /// Width or height is zero or doesn't fit 16 bits
    UnsupportedDimensions(usize, usize),
    /// Pixel buffer length doesn't match the dimensions
    /// (expected, found)
    LengthMismatch(usize, usize),
    LzwError(weezl::LzwError),
    IoErrors(ByteIoError),
    Static(&'static str)
}

impl Debug for GifEncoderErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GifEncoderErrors::UnsupportedDimensions(w, h) => {
                writeln!(
                    f,
                    "Cannot encode {w}x{h} image, dimensions must be between 1 and 65535"
                )
            }
            GifEncoderErrors::LengthMismatch(expected, found) => {
                writeln!(
                    f,
                    "Expected pixel buffer of length {expected} but found {found}"
                )
            }
            GifEncoderErrors::LzwError(err) => {
                writeln!(f, "Compression failed: {err}")
            }
            GifEncoderErrors::IoErrors(err) => {
                writeln!(f, "{:?}", err)
            }
            GifEncoderErrors::Static(err) => {
                writeln!(f, "{err}")
            }
        }
    }
}

impl Display for GifEncoderErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for GifEncoderErrors {}

impl From<ByteIoError> for GifEncoderErrors {
    fn from(value: ByteIoError) -> Self {
        GifEncoderErrors::IoErrors(value)
    }
}

impl From<weezl::LzwError> for GifEncoderErrors {
    fn from(value: weezl::LzwError) -> Self {
        GifEncoderErrors::LzwError(value)
    }
}

impl From<&'static str> for GifEncoderErrors {
    fn from(value: &'static str) -> Self {
        GifEncoderErrors::Static(value)
    }
}
